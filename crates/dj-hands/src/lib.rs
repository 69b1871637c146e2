//! Hand landmark acquisition.
//!
//! A [`HandStream`] yields one [`Tick`] per processed frame: the primary
//! hand's landmarks, "no hand", or a dropped frame. Two streams exist: the
//! live [`CameraTracker`] (frame source + external landmark detector) and
//! [`ReplayStream`], which plays back a session recorded with
//! [`RecordingStream`].
//!
//! Only one hand is ever tracked. When the detector reports several hands,
//! [`select_primary_hand`] keeps the first sufficiently confident one and
//! the rest are ignored.

pub mod detector;
pub mod error;
pub mod landmarks;
pub mod replay;
pub mod stream;
pub mod subprocess;
pub mod wire;

pub use detector::{DetectorConfig, LandmarkDetector, MAX_TRACKED_HANDS, select_primary_hand};
pub use error::{DetectError, HandError};
pub use landmarks::{
    HandLandmark, HandObservation, Handedness, LANDMARK_COUNT, Landmark, LandmarkFrame,
};
pub use replay::{RecordingStream, ReplayStream};
pub use stream::{CameraTracker, HandStream, Tick};
pub use subprocess::SubprocessDetector;
