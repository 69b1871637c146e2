use crate::{Action, BackendError, MediaBackend};
use dj_gesture::GestureEvent;
use std::time::Duration;

/// Outcome counters for dispatched events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub succeeded: u64,
    pub failed: u64,
    pub timed_out: u64,
}

impl DispatchStats {
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed + self.timed_out
    }
}

/// Sends each gesture event to the backend as one call.
///
/// A failing or hanging call is logged and counted, never returned: the
/// event is consumed either way and is not retried.
pub struct Dispatcher<B> {
    backend: B,
    volume_step: i32,
    call_timeout: Duration,
    stats: DispatchStats,
}

impl<B: MediaBackend> Dispatcher<B> {
    /// Create a dispatcher with a 10 point volume step and a 3 s call
    /// timeout.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            volume_step: 10,
            call_timeout: Duration::from_secs(3),
            stats: DispatchStats::default(),
        }
    }

    pub fn with_volume_step(mut self, step: u8) -> Self {
        self.volume_step = i32::from(step);
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Perform the action bound to `event`. Returns the action attempted.
    pub async fn dispatch(&mut self, event: &GestureEvent) -> Action {
        let action = Action::for_gesture(event.gesture);
        log::info!("{} -> {} on {}", event.gesture, action, self.backend.name());

        let call = perform(&mut self.backend, action, self.volume_step);
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(())) => self.stats.succeeded += 1,
            Ok(Err(e)) => {
                log::warn!("{} failed: {}", action, e);
                self.stats.failed += 1;
            }
            Err(_) => {
                log::warn!("{} failed: {}", action, BackendError::Timeout);
                self.stats.timed_out += 1;
            }
        }
        action
    }
}

async fn perform<B: MediaBackend>(backend: &mut B, action: Action, step: i32) -> Result<(), BackendError> {
    match action {
        Action::TogglePlayPause => backend.toggle_play_pause().await,
        Action::NextTrack => backend.next_track().await,
        Action::PreviousTrack => backend.previous_track().await,
        Action::VolumeUp => backend.set_volume(step).await,
        Action::VolumeDown => backend.set_volume(-step).await,
        Action::ToggleMute => backend.toggle_mute().await,
    }
}
