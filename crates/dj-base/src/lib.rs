//! Shared building blocks for the gesture DJ crates: small vector math,
//! the process logger and the pipeline stop signal.

pub mod logging;
pub mod stop;
pub mod vec2;
pub mod vec3;

pub use logging::{FileLogger, StdoutLogger, default_level, init_file_logger, init_stdout_logger};
pub use stop::StopSignal;
pub use vec2::Vec2;
pub use vec3::Vec3;

// Re-export log crate so downstream crates can use dj_base::log::*
pub use log;
