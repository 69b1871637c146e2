//! Gesture recognition for the media controller.
//!
//! Each processed frame flows through three stages:
//!
//! 1. [`FeatureExtractor`] reduces the hand's 21 landmarks to finger
//!    extension flags, the palm centroid and its velocity.
//! 2. [`GestureClassifier`] maps the features (plus a short motion window)
//!    to at most one [`Gesture`].
//! 3. [`Debouncer`] turns the per-frame labels into [`GestureEvent`]s: a
//!    label must hold for several consecutive frames, and each gesture has
//!    its own cooldown tracked in a [`CooldownTable`].
//!
//! [`GesturePipeline`] chains the three. None of the stages can fail at
//! runtime; missing or malformed hands simply produce no gesture.

pub mod classifier;
pub mod config;
pub mod cooldown;
pub mod debounce;
pub mod error;
pub mod features;
pub mod gesture;
pub mod pipeline;

pub use classifier::{GestureClassifier, classify};
pub use config::{GestureConfig, RearmPolicy};
pub use cooldown::CooldownTable;
pub use debounce::{Debouncer, Phase};
pub use error::ConfigError;
pub use features::{FINGER_COUNT, FeatureExtractor, FeatureVector, Finger, palm_centroid};
pub use gesture::{GESTURE_COUNT, Gesture, GestureEvent};
pub use pipeline::GesturePipeline;
