use crate::config::ConfigError;
use dj_control::BackendError;
use dj_hands::{DetectError, HandError};
use dj_video::CameraError;
use std::{fmt, io};

/// Fatal error ending the run, with the exit status it maps to.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Logger(io::Error),
    Camera(CameraError),
    Detector(DetectError),
    Stream(HandError),
    Backend(BackendError),
}

impl AppError {
    /// 2 for configuration, 3 for the camera or detector, 4 for the
    /// media backend.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::Logger(_) => 2,
            AppError::Camera(_) | AppError::Detector(_) | AppError::Stream(_) => 3,
            AppError::Backend(_) => 4,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "{err}"),
            AppError::Logger(err) => write!(f, "cannot open log directory: {err}"),
            AppError::Camera(err) => write!(f, "camera unavailable: {err}"),
            AppError::Detector(err) => write!(f, "landmark detector unavailable: {err}"),
            AppError::Stream(err) => write!(f, "hand tracking failed: {err}"),
            AppError::Backend(err) => write!(f, "media backend unavailable: {err}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<DetectError> for AppError {
    fn from(err: DetectError) -> Self {
        AppError::Detector(err)
    }
}

impl From<HandError> for AppError {
    fn from(err: HandError) -> Self {
        match err {
            HandError::Camera(err) => AppError::Camera(err),
            err => AppError::Stream(err),
        }
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Backend(err)
    }
}
