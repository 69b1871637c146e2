use crate::cli::BackendKind;
use crate::config::AppConfig;
use crate::error::AppError;
use dj_control::{BackendError, MediaBackend, SpotifyBackend, VlcBackend};

/// The backend picked at startup.
pub enum AnyBackend {
    Spotify(SpotifyBackend),
    Vlc(VlcBackend),
}

/// Connect the backend chosen in `config`.
///
/// For Spotify this may run the interactive authorization and waits until
/// the user has approved access in the browser.
pub async fn connect(config: &AppConfig) -> Result<AnyBackend, AppError> {
    match config.backend.kind {
        BackendKind::Remote => {
            let spotify = config.spotify_config()?;
            log::info!("connecting to Spotify");
            Ok(AnyBackend::Spotify(SpotifyBackend::connect(spotify).await?))
        }
        BackendKind::Local => {
            let vlc = config.vlc_config();
            log::info!("connecting to VLC at {}", vlc.address());
            Ok(AnyBackend::Vlc(VlcBackend::connect(vlc).await?))
        }
    }
}

impl MediaBackend for AnyBackend {
    fn name(&self) -> &'static str {
        match self {
            AnyBackend::Spotify(backend) => backend.name(),
            AnyBackend::Vlc(backend) => backend.name(),
        }
    }

    async fn toggle_play_pause(&mut self) -> Result<(), BackendError> {
        match self {
            AnyBackend::Spotify(backend) => backend.toggle_play_pause().await,
            AnyBackend::Vlc(backend) => backend.toggle_play_pause().await,
        }
    }

    async fn next_track(&mut self) -> Result<(), BackendError> {
        match self {
            AnyBackend::Spotify(backend) => backend.next_track().await,
            AnyBackend::Vlc(backend) => backend.next_track().await,
        }
    }

    async fn previous_track(&mut self) -> Result<(), BackendError> {
        match self {
            AnyBackend::Spotify(backend) => backend.previous_track().await,
            AnyBackend::Vlc(backend) => backend.previous_track().await,
        }
    }

    async fn set_volume(&mut self, delta: i32) -> Result<(), BackendError> {
        match self {
            AnyBackend::Spotify(backend) => backend.set_volume(delta).await,
            AnyBackend::Vlc(backend) => backend.set_volume(delta).await,
        }
    }

    async fn toggle_mute(&mut self) -> Result<(), BackendError> {
        match self {
            AnyBackend::Spotify(backend) => backend.toggle_mute().await,
            AnyBackend::Vlc(backend) => backend.toggle_mute().await,
        }
    }
}
