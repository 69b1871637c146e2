use crate::backend::{self, AnyBackend};
use crate::cli::Cli;
use crate::config::{AppConfig, ConfigError};
use crate::error::AppError;
use crate::run::{self, RunSummary, StopReason};
use dj_base::StopSignal;
use dj_control::{Dispatcher, MediaBackend};
use dj_gesture::GesturePipeline;
use dj_hands::{HandStream, ReplayStream};

/// Everything the frame loop needs apart from the hand stream.
struct Session {
    pipeline: GesturePipeline,
    dispatcher: Dispatcher<AnyBackend>,
    stop: StopSignal,
}

impl Session {
    async fn drive(&mut self, mut stream: impl HandStream) -> Result<RunSummary, AppError> {
        log::info!("running; press q and Enter or Ctrl-C to stop");
        let summary = run::run_loop(&mut stream, &mut self.pipeline, &mut self.dispatcher, &self.stop).await?;
        Ok(summary)
    }
}

/// Configure, connect and run until stopped.
pub async fn run(cli: Cli) -> Result<RunSummary, AppError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env(|name| std::env::var(name).ok());
    config.apply_cli(&cli);

    init_logging(&config)?;
    config.validate()?;

    let pipeline = GesturePipeline::new(config.gesture_config()).map_err(ConfigError::from)?;

    let backend = backend::connect(&config).await?;
    log::info!("using {} backend", backend.name());
    let dispatcher = Dispatcher::new(backend)
        .with_volume_step(config.backend.volume_step)
        .with_call_timeout(config.call_timeout());

    let stop = StopSignal::new();
    run::watch_ctrl_c(stop.clone());
    run::spawn_stdin_watcher(stop.clone());

    let mut session = Session {
        pipeline,
        dispatcher,
        stop,
    };

    let summary = match &cli.replay {
        Some(path) => session.drive(ReplayStream::open(path).await?).await?,
        None => run_live(&config, &cli, &mut session).await?,
    };

    report(&summary);
    Ok(summary)
}

fn init_logging(config: &AppConfig) -> Result<(), AppError> {
    let level = config.log_level()?;
    match &config.log.dir {
        Some(dir) => dj_base::init_file_logger(dir, level).map_err(AppError::Logger),
        None => {
            dj_base::init_stdout_logger(level);
            Ok(())
        }
    }
}

#[cfg(feature = "v4l2")]
async fn run_live(config: &AppConfig, cli: &Cli, session: &mut Session) -> Result<RunSummary, AppError> {
    use dj_hands::{CameraTracker, RecordingStream, SubprocessDetector};

    let detector_config = config.detector_config()?;
    let camera = dj_video::V4l2Camera::new(config.camera_config())?;
    let detector = SubprocessDetector::spawn(&detector_config).await?;
    let tracker = CameraTracker::new(camera, detector)
        .with_frame_timeout(config.frame_timeout())
        .with_frame_stride(config.camera.frame_stride)
        .with_min_detection_confidence(config.detector.min_detection_confidence);

    match &cli.record {
        Some(path) => session.drive(RecordingStream::create(tracker, path)?).await,
        None => session.drive(tracker).await,
    }
}

#[cfg(not(feature = "v4l2"))]
async fn run_live(_config: &AppConfig, _cli: &Cli, _session: &mut Session) -> Result<RunSummary, AppError> {
    Err(AppError::Camera(dj_video::CameraError::Device(
        "built without camera support, use --replay".to_string(),
    )))
}

fn report(summary: &RunSummary) {
    let reason = match summary.reason {
        StopReason::Signal => "stopped by user",
        StopReason::StreamEnded => "replay finished",
    };
    log::info!(
        "{}: {} ticks, {} with a hand, {} dropped, {} gestures",
        reason,
        summary.ticks,
        summary.hands,
        summary.dropped,
        summary.events
    );
    log::info!(
        "backend calls: {} ok, {} failed, {} timed out",
        summary.dispatch.succeeded,
        summary.dispatch.failed,
        summary.dispatch.timed_out
    );
}
