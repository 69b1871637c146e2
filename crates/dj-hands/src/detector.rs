use crate::{DetectError, HandObservation};
use dj_video::VideoFrame;
use std::path::PathBuf;
use std::time::Duration;

/// The pipeline follows a single hand. Extra detections are discarded.
pub const MAX_TRACKED_HANDS: usize = 1;

/// Hand landmark detector.
///
/// Returns every hand found in the frame, in the detector's own order
/// (possibly empty).
#[allow(async_fn_in_trait)]
pub trait LandmarkDetector {
    async fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<HandObservation>, DetectError>;

    /// Bring the detector back after it exited or a request was abandoned.
    /// Detectors without outside state have nothing to do.
    async fn restart(&mut self) -> Result<(), DetectError> {
        Ok(())
    }
}

/// Configuration for the external landmark detector process.
#[derive(Clone, Debug)]
pub struct DetectorConfig {
    /// Executable to run, e.g. a Python interpreter. There is no usable
    /// default; it must be configured.
    pub program: PathBuf,
    /// Arguments placed before the confidence flags, e.g. the script path.
    pub args: Vec<String>,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    /// How long to wait for the `READY` line after spawning.
    pub ready_timeout: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::new(),
            args: Vec::new(),
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.7,
            ready_timeout: Duration::from_secs(30),
        }
    }
}

/// Pick the hand the pipeline follows: the first one scoring at least
/// `min_score`. Returns `None` if no hand qualifies.
pub fn select_primary_hand(hands: Vec<HandObservation>, min_score: f32) -> Option<HandObservation> {
    let total = hands.len();
    let primary = hands.into_iter().find(|hand| hand.score >= min_score);

    if primary.is_some() && total > MAX_TRACKED_HANDS {
        log::debug!(
            "{} hands detected, following the first of them and ignoring the rest",
            total
        );
    }
    primary
}
