use dj_base::Vec2;
use dj_hands::{DetectError, DetectorConfig, LandmarkDetector, SubprocessDetector};
use dj_video::{VideoData, VideoFrame};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn shell(script: &str) -> DetectorConfig {
    DetectorConfig {
        program: PathBuf::from("sh"),
        args: vec!["-c".to_string(), script.to_string()],
        ready_timeout: Duration::from_secs(5),
        ..DetectorConfig::default()
    }
}

fn frame() -> VideoFrame {
    VideoFrame {
        data: VideoData::Jpeg(vec![0xff, 0xd8, 0xd9]),
        size: Vec2::new(2, 2),
        captured_at: Instant::now(),
    }
}

#[tokio::test]
async fn test_missing_program_fails_to_spawn() {
    let config = DetectorConfig {
        program: PathBuf::from("/nonexistent/hand-detector"),
        ..DetectorConfig::default()
    };
    assert!(matches!(SubprocessDetector::spawn(&config).await, Err(DetectError::Spawn(_))));
}

#[tokio::test]
async fn test_detector_must_signal_ready() {
    let result = SubprocessDetector::spawn(&shell("echo LOADING; sleep 1")).await;
    assert!(matches!(result, Err(DetectError::Spawn(_))));
}

#[tokio::test]
async fn test_detector_round_trip() {
    // 16 header bytes + 3 payload bytes per frame
    let script = r#"echo READY
head -c 19 > /dev/null; echo '{"hands": []}'
head -c 19 > /dev/null; echo '{"error": "no model"}'
head -c 19 > /dev/null"#;
    let mut detector = SubprocessDetector::spawn(&shell(script)).await.unwrap();

    assert!(detector.detect(&frame()).await.unwrap().is_empty());
    assert!(matches!(detector.detect(&frame()).await, Err(DetectError::Detector(_))));
    assert!(matches!(detector.detect(&frame()).await, Err(DetectError::Exited(_))));
}

#[tokio::test]
async fn test_empty_program_fails_to_spawn() {
    let result = SubprocessDetector::spawn(&DetectorConfig::default()).await;
    assert!(matches!(result, Err(DetectError::Spawn(_))));
}

#[tokio::test]
async fn test_restart_brings_back_an_exited_detector() {
    // answers one frame, then quits
    let script = r#"echo READY
head -c 19 > /dev/null; echo '{"hands": []}'"#;
    let mut detector = SubprocessDetector::spawn(&shell(script)).await.unwrap();

    assert!(detector.detect(&frame()).await.unwrap().is_empty());
    assert!(matches!(detector.detect(&frame()).await, Err(DetectError::Exited(_))));

    detector.restart().await.unwrap();
    assert!(detector.detect(&frame()).await.unwrap().is_empty());
}
