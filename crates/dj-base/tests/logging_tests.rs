use dj_base::logging::{FileLogger, StdoutLogger, format_timestamp};
use log::{LevelFilter, Log};
use std::fs;

fn record_at(level: log::Level, message: std::fmt::Arguments<'_>) -> log::Record<'_> {
    log::RecordBuilder::new()
        .level(level)
        .target("virtual_dj")
        .file(Some("pipeline.rs"))
        .line(Some(42))
        .args(message)
        .build()
}

#[test]
fn test_stdout_logger_respects_level() {
    let logger = StdoutLogger::new(LevelFilter::Info);

    let info = log::MetadataBuilder::new().level(log::Level::Info).build();
    let debug = log::MetadataBuilder::new().level(log::Level::Debug).build();

    assert!(logger.enabled(&info));
    assert!(!logger.enabled(&debug));

    // should not panic
    logger.log(&record_at(log::Level::Info, format_args!("gesture fired")));
    logger.flush();
}

#[test]
fn test_file_logger_writes_record_with_target_and_location() {
    let dir = std::env::temp_dir().join(format!("dj-log-test-{}-write", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let logger = FileLogger::new(&dir, LevelFilter::Debug).expect("Failed to create FileLogger");
    logger.log(&record_at(log::Level::Warn, format_args!("backend call failed")));
    logger.flush();

    let entries: Vec<_> = fs::read_dir(&dir).unwrap().filter_map(|e| e.ok()).collect();
    assert_eq!(entries.len(), 1, "Should have exactly one log file");

    let content = fs::read_to_string(entries[0].path()).unwrap();
    assert!(content.contains("WARN"));
    assert!(content.contains("virtual_dj"));
    assert!(content.contains("pipeline.rs:42"));
    assert!(content.contains("backend call failed"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_file_logger_drops_filtered_records() {
    let dir = std::env::temp_dir().join(format!("dj-log-test-{}-filter", std::process::id()));
    let _ = fs::remove_dir_all(&dir);

    let logger = FileLogger::new(&dir, LevelFilter::Warn).unwrap();
    logger.log(&record_at(log::Level::Debug, format_args!("dropped frame")));
    logger.flush();

    let entries: Vec<_> = fs::read_dir(&dir).unwrap().filter_map(|e| e.ok()).collect();
    let content = fs::read_to_string(entries[0].path()).unwrap();
    assert!(content.is_empty());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_format_timestamp_shape() {
    let ts = format_timestamp();
    assert_eq!(ts.len(), 19);
    assert_eq!(&ts[4..5], "-");
    assert_eq!(&ts[10..11], "T");
    assert_eq!(&ts[16..17], ":");
}
