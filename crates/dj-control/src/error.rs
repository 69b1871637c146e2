use std::fmt;

#[derive(Debug)]
pub enum BackendError {
    /// The request could not be sent or its answer not read.
    Http(String),
    /// The service answered with an error status.
    Status { status: u16, message: String },
    /// No playback device is available to act on.
    NoActiveDevice,
    /// Authorization failed or the credentials were rejected.
    Auth(String),
    Io(std::io::Error),
    /// The service answered with something unexpected.
    Protocol(String),
    /// The call did not complete in time.
    Timeout,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Http(msg) => write!(f, "http error: {msg}"),
            BackendError::Status { status, message } => {
                write!(f, "request failed with status {status}: {message}")
            }
            BackendError::NoActiveDevice => write!(f, "no active playback device"),
            BackendError::Auth(msg) => write!(f, "authorization failed: {msg}"),
            BackendError::Io(err) => write!(f, "io error: {err}"),
            BackendError::Protocol(msg) => write!(f, "protocol error: {msg}"),
            BackendError::Timeout => write!(f, "backend call timed out"),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BackendError::Timeout
        } else if err.is_decode() {
            BackendError::Protocol(err.to_string())
        } else {
            BackendError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Protocol(err.to_string())
    }
}
