use crate::BackendError;

/// A music player the gestures control.
///
/// Calls are made one at a time, from the frame loop.
#[allow(async_fn_in_trait)]
pub trait MediaBackend {
    /// Short name for log messages.
    fn name(&self) -> &'static str;

    async fn toggle_play_pause(&mut self) -> Result<(), BackendError>;

    async fn next_track(&mut self) -> Result<(), BackendError>;

    async fn previous_track(&mut self) -> Result<(), BackendError>;

    /// Change the volume by `delta` percentage points (clamped to 0..=100).
    async fn set_volume(&mut self, delta: i32) -> Result<(), BackendError>;

    /// Mute, or restore the volume from before muting.
    async fn toggle_mute(&mut self) -> Result<(), BackendError>;
}
