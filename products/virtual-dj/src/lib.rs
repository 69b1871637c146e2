//! `virtual-dj`: play, skip and adjust music with hand gestures in front of
//! a webcam.
//!
//! Wiring only; the work happens in `dj-hands` (landmarks), `dj-gesture`
//! (recognition) and `dj-control` (players).

pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod run;

pub use app::run;
pub use backend::AnyBackend;
pub use cli::{BackendKind, Cli};
pub use config::{AppConfig, ConfigError};
pub use error::AppError;
pub use run::{RunSummary, StopReason, run_loop};
