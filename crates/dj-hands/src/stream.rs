use crate::{DetectError, HandError, LandmarkDetector, LandmarkFrame, select_primary_hand};
use dj_video::{CameraError, FrameSource};
use std::time::{Duration, Instant};

/// One step of a hand stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// The primary hand was found.
    Hand(LandmarkFrame),
    /// A frame was processed and contained no usable hand.
    NoHand(Duration),
    /// No frame could be processed (timeout, capture or detector hiccup).
    /// Advances no pipeline state.
    Dropped,
}

/// Source of ticks for the gesture pipeline.
///
/// `Ok(None)` means the stream has ended (only replays end).
#[allow(async_fn_in_trait)]
pub trait HandStream {
    async fn next_tick(&mut self) -> Result<Option<Tick>, HandError>;
}

/// Restart of a detector that exited or stopped answering.
#[derive(Debug, Clone, Copy)]
struct PendingRestart {
    failed_attempts: u32,
    not_before: Instant,
}

/// Live hand stream: camera frames run through a landmark detector.
///
/// A detector that exits or does not answer within the frame timeout is
/// restarted; frames are dropped meanwhile. Failed restarts back off
/// exponentially and the stream fails once `max_restart_attempts` of them
/// have failed in a row.
pub struct CameraTracker<S, D> {
    source: S,
    detector: D,
    frame_timeout: Duration,
    frame_stride: u64,
    min_detection_confidence: f32,
    restart_backoff: Duration,
    max_restart_attempts: u32,
    pending_restart: Option<PendingRestart>,
    started: Instant,
    frames_seen: u64,
}

impl<S: FrameSource, D: LandmarkDetector> CameraTracker<S, D> {
    /// Create a tracker with a 1 s frame timeout, no frame skipping, a 0.5
    /// hand score threshold and up to 5 detector restarts starting 1 s
    /// apart.
    pub fn new(source: S, detector: D) -> Self {
        Self {
            source,
            detector,
            frame_timeout: Duration::from_secs(1),
            frame_stride: 1,
            min_detection_confidence: 0.5,
            restart_backoff: Duration::from_secs(1),
            max_restart_attempts: 5,
            pending_restart: None,
            started: Instant::now(),
            frames_seen: 0,
        }
    }

    /// Maximum wait for a frame, and for the detector's answer to it,
    /// before the frame counts as dropped.
    pub fn with_frame_timeout(mut self, timeout: Duration) -> Self {
        self.frame_timeout = timeout;
        self
    }

    /// Only run detection on every `stride`-th captured frame.
    pub fn with_frame_stride(mut self, stride: u32) -> Self {
        self.frame_stride = u64::from(stride.max(1));
        self
    }

    /// Hands scoring below this are ignored.
    pub fn with_min_detection_confidence(mut self, confidence: f32) -> Self {
        self.min_detection_confidence = confidence;
        self
    }

    /// Delay after the first failed detector restart; doubles with each
    /// further failure.
    pub fn with_restart_backoff(mut self, backoff: Duration) -> Self {
        self.restart_backoff = backoff;
        self
    }

    pub fn with_max_restart_attempts(mut self, attempts: u32) -> Self {
        self.max_restart_attempts = attempts.max(1);
        self
    }

    /// Timestamps are measured from this instant.
    pub fn with_epoch(mut self, started: Instant) -> Self {
        self.started = started;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    fn schedule_restart(&mut self) {
        self.pending_restart = Some(PendingRestart {
            failed_attempts: 0,
            not_before: Instant::now(),
        });
    }

    /// Returns `Ok(false)` while the detector is still down.
    async fn ensure_detector(&mut self) -> Result<bool, HandError> {
        let Some(pending) = self.pending_restart else {
            return Ok(true);
        };
        if Instant::now() < pending.not_before {
            return Ok(false);
        }

        match self.detector.restart().await {
            Ok(()) => {
                log::info!("landmark detector restarted");
                self.pending_restart = None;
                Ok(true)
            }
            Err(e) => {
                let failed_attempts = pending.failed_attempts + 1;
                if failed_attempts >= self.max_restart_attempts {
                    log::error!("landmark detector could not be restarted, giving up: {}", e);
                    return Err(HandError::Detect(e));
                }

                let delay = self
                    .restart_backoff
                    .saturating_mul(1 << (failed_attempts - 1).min(5));
                log::warn!("landmark detector restart failed, retrying in {:?}: {}", delay, e);
                self.pending_restart = Some(PendingRestart {
                    failed_attempts,
                    not_before: Instant::now() + delay,
                });
                Ok(false)
            }
        }
    }
}

impl<S: FrameSource, D: LandmarkDetector> HandStream for CameraTracker<S, D> {
    async fn next_tick(&mut self) -> Result<Option<Tick>, HandError> {
        let frame = loop {
            let frame = match tokio::time::timeout(self.frame_timeout, self.source.recv()).await {
                Err(_) => {
                    log::debug!("no frame within {:?}, dropping", self.frame_timeout);
                    return Ok(Some(Tick::Dropped));
                }
                // the capture thread is gone, nothing more will arrive
                Ok(Err(CameraError::Channel(msg))) => {
                    return Err(HandError::Camera(CameraError::Channel(msg)));
                }
                Ok(Err(e)) => {
                    log::warn!("frame capture failed, dropping: {}", e);
                    return Ok(Some(Tick::Dropped));
                }
                Ok(Ok(frame)) => frame,
            };

            self.frames_seen += 1;
            if self.frames_seen % self.frame_stride == 0 {
                break frame;
            }
        };

        let timestamp = frame.captured_at.saturating_duration_since(self.started);

        if !self.ensure_detector().await? {
            return Ok(Some(Tick::Dropped));
        }

        let detected = tokio::time::timeout(self.frame_timeout, self.detector.detect(&frame)).await;
        match detected {
            Ok(Ok(hands)) => Ok(Some(
                match select_primary_hand(hands, self.min_detection_confidence) {
                    Some(hand) => Tick::Hand(hand.into_frame(timestamp)),
                    None => Tick::NoHand(timestamp),
                },
            )),
            // the request is abandoned, so the detector's pipes are out of step
            Err(_) => {
                log::warn!(
                    "landmark detector did not answer within {:?}, restarting it",
                    self.frame_timeout
                );
                self.schedule_restart();
                Ok(Some(Tick::Dropped))
            }
            Ok(Err(e @ (DetectError::Exited(_) | DetectError::Spawn(_)))) => {
                log::warn!("landmark detector lost, restarting it: {}", e);
                self.schedule_restart();
                Ok(Some(Tick::Dropped))
            }
            Ok(Err(e)) => {
                log::warn!("landmark detection failed, dropping frame: {}", e);
                Ok(Some(Tick::Dropped))
            }
        }
    }
}
