//! Webcam frame acquisition for the gesture pipeline.
//!
//! This crate provides the `FrameSource` trait for async frame capture and
//! a V4L2 backend. Frames are handed on undecoded (JPEG or YUYV bytes); the
//! landmark detector does its own decoding.

pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::{CameraConfig, PixelFormat};
pub use error::CameraError;
pub use frame::{VideoData, VideoFrame};
pub use traits::FrameSource;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
