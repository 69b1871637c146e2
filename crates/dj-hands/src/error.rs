use dj_video::CameraError;
use std::fmt;

#[derive(Debug)]
pub enum DetectError {
    /// The detector process could not be started or never became ready.
    Spawn(String),
    /// The detector process exited or closed its pipes.
    Exited(String),
    Io(String),
    /// The detector answered with something that is not a detection result.
    Protocol(String),
    /// The detector reported an error for this frame.
    Detector(String),
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectError::Spawn(msg) => write!(f, "detector spawn error: {msg}"),
            DetectError::Exited(msg) => write!(f, "detector exited: {msg}"),
            DetectError::Io(msg) => write!(f, "detector io error: {msg}"),
            DetectError::Protocol(msg) => write!(f, "detector protocol error: {msg}"),
            DetectError::Detector(msg) => write!(f, "detector error: {msg}"),
        }
    }
}

impl std::error::Error for DetectError {}

impl From<std::io::Error> for DetectError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::UnexpectedEof => {
                DetectError::Exited(err.to_string())
            }
            _ => DetectError::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DetectError {
    fn from(err: serde_json::Error) -> Self {
        DetectError::Protocol(err.to_string())
    }
}

/// Unrecoverable hand stream failure.
#[derive(Debug)]
pub enum HandError {
    Camera(CameraError),
    Detect(DetectError),
    Io(std::io::Error),
}

impl fmt::Display for HandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandError::Camera(err) => write!(f, "camera: {err}"),
            HandError::Detect(err) => write!(f, "{err}"),
            HandError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for HandError {}

impl From<CameraError> for HandError {
    fn from(err: CameraError) -> Self {
        HandError::Camera(err)
    }
}

impl From<DetectError> for HandError {
    fn from(err: DetectError) -> Self {
        HandError::Detect(err)
    }
}

impl From<std::io::Error> for HandError {
    fn from(err: std::io::Error) -> Self {
        HandError::Io(err)
    }
}
