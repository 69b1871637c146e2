//! Media control: turning confirmed gestures into player commands.
//!
//! [`Dispatcher`] maps each [`GestureEvent`](dj_gesture::GestureEvent) to one
//! call on a [`MediaBackend`]. Two backends exist: [`SpotifyBackend`]
//! drives the Spotify Web API (OAuth, needs a premium account and an open
//! Spotify client), [`VlcBackend`] drives a local VLC through its `rc`
//! interface.

pub mod action;
pub mod backend;
pub mod dispatch;
pub mod error;
pub mod spotify;
pub mod vlc;
pub mod volume;

pub use action::Action;
pub use backend::MediaBackend;
pub use dispatch::{DispatchStats, Dispatcher};
pub use error::BackendError;
pub use spotify::{SpotifyBackend, SpotifyConfig};
pub use vlc::{VlcBackend, VlcConfig};
pub use volume::VolumeState;
