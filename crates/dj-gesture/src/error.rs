use std::fmt;

/// Invalid gesture recognition settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `debounce_frames` must be at least 1.
    DebounceFrames,
    /// `motion_window` must be at least 1.
    MotionWindow,
    /// `max_staleness` must be longer than zero.
    Staleness,
    /// A threshold that must be a positive, finite number.
    Threshold { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::DebounceFrames => write!(f, "debounce_frames must be at least 1"),
            ConfigError::MotionWindow => write!(f, "motion_window must be at least 1"),
            ConfigError::Staleness => write!(f, "max_staleness must be greater than zero"),
            ConfigError::Threshold { name, value } => {
                write!(f, "{} must be a positive number, got {}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
