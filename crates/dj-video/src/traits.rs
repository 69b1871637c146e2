use crate::{CameraError, VideoFrame};

/// Async frame source.
///
/// `recv` waits for the next captured frame. Callers that need a bound on
/// the wait wrap the call in `tokio::time::timeout` and treat an elapsed
/// timeout as a dropped frame.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Receive the next frame from the camera.
    async fn recv(&mut self) -> Result<VideoFrame, CameraError>;
}
