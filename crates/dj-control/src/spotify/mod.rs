pub mod api;
pub mod auth;

use crate::{BackendError, MediaBackend, VolumeState};
use api::{ApiErrorBody, Device, DeviceList, PlaybackState, TransferRequest, UserProfile};
use auth::Token;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

/// Spotify application credentials and service endpoints.
#[derive(Clone, Debug)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Must match a redirect URI registered for the application; the
    /// callback listener binds to its host and port.
    pub redirect_uri: String,
    pub token_cache: PathBuf,
    pub accounts_url: String,
    pub api_url: String,
    /// How long to wait for the user to authorize in the browser.
    pub auth_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: "http://localhost:8888/callback".to_string(),
            token_cache: PathBuf::from(".spotify_token.json"),
            accounts_url: "https://accounts.spotify.com".to_string(),
            api_url: "https://api.spotify.com".to_string(),
            auth_timeout: Duration::from_secs(300),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Spotify Connect player, controlled through the Web API.
///
/// Commands go to the currently active device. Volume is tracked locally
/// from the last value set.
pub struct SpotifyBackend {
    client: Client,
    config: SpotifyConfig,
    token: Token,
    volume: VolumeState,
}

impl SpotifyBackend {
    /// Authorize (cached token, refresh, or interactive login), then check
    /// the account and look for an active device.
    pub async fn connect(config: SpotifyConfig) -> Result<Self, BackendError> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(BackendError::Auth("missing client id or client secret".to_string()));
        }

        let client = build_client(&config)?;
        let token = auth::authorize(&client, &config).await?;
        let mut backend = Self {
            client,
            config,
            token,
            volume: VolumeState::default(),
        };

        backend.check_account().await?;

        match backend.devices().await {
            Ok(devices) => match devices.iter().find(|d| d.is_active) {
                Some(device) => {
                    log::info!("Active Spotify device: {}", device.name);
                    if let Some(percent) = device.volume_percent {
                        backend.volume = VolumeState::new(percent);
                    }
                }
                None if devices.is_empty() => {
                    log::warn!("No Spotify devices found, open Spotify on any device")
                }
                None => log::warn!("No active Spotify device, start playing something on Spotify"),
            },
            Err(e) => log::warn!("could not list Spotify devices: {}", e),
        }

        Ok(backend)
    }

    /// Use an existing token, skipping authorization and the startup
    /// checks.
    pub fn with_token(config: SpotifyConfig, token: Token) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(&config)?,
            config,
            token,
            volume: VolumeState::default(),
        })
    }

    pub fn volume(&self) -> VolumeState {
        self.volume
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    async fn check_account(&mut self) -> Result<(), BackendError> {
        let profile: UserProfile = self
            .get_json("/v1/me")
            .await?
            .ok_or_else(|| BackendError::Protocol("empty profile".to_string()))?;

        let product = profile.product.as_deref().unwrap_or("unknown");
        if product != "premium" {
            log::warn!(
                "Spotify account type is {}, playback control needs premium",
                product
            );
        }
        log::info!(
            "Authenticated Spotify user {}",
            profile.display_name.as_deref().unwrap_or("(unnamed)")
        );
        Ok(())
    }

    async fn ensure_token(&mut self) -> Result<(), BackendError> {
        if !self.token.is_expired(auth::unix_now()) {
            return Ok(());
        }
        let refresh_token = self
            .token
            .refresh_token
            .clone()
            .ok_or_else(|| BackendError::Auth("token expired and cannot be refreshed".to_string()))?;

        self.token = auth::refresh(&self.client, &self.config, &refresh_token).await?;
        auth::store(&self.config, &self.token);
        log::debug!("Spotify token refreshed");
        Ok(())
    }

    async fn request(
        &mut self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> Result<Response, BackendError> {
        self.ensure_token().await?;

        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);
        let mut request = self
            .client
            .request(method, url)
            .bearer_auth(&self.token.access_token)
            .query(query);
        request = match body {
            Some(json) => request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(json),
            None => request.body(""),
        };

        let response = request.send().await?;
        check_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&mut self, path: &str) -> Result<Option<T>, BackendError> {
        let response = self.request(Method::GET, path, &[], None).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn devices(&mut self) -> Result<Vec<Device>, BackendError> {
        let list: Option<DeviceList> = self.get_json("/v1/me/player/devices").await?;
        Ok(list.unwrap_or_default().devices)
    }

    async fn active_device(&mut self) -> Result<Device, BackendError> {
        self.devices()
            .await?
            .into_iter()
            .find(|d| d.is_active && d.is_controllable())
            .ok_or(BackendError::NoActiveDevice)
    }

    /// Run a player command on the active device.
    async fn command(
        &mut self,
        method: Method,
        path: &str,
        mut query: Vec<(&str, String)>,
    ) -> Result<(), BackendError> {
        let device = self.active_device().await?;
        if let Some(id) = device.id {
            query.push(("device_id", id));
        }
        log::debug!("spotify {} {} on {}", method, path, device.name);
        self.request(method, path, &query, None).await?;
        Ok(())
    }

    async fn transfer(&mut self, device: &Device) -> Result<(), BackendError> {
        let Some(id) = &device.id else {
            return Err(BackendError::NoActiveDevice);
        };
        log::info!("Transferring playback to {}", device.name);
        let body = serde_json::to_string(&TransferRequest {
            device_ids: vec![id.clone()],
            play: true,
        })?;
        self.request(Method::PUT, "/v1/me/player", &[], Some(body)).await?;
        Ok(())
    }

    async fn apply_volume(&mut self, next: VolumeState) -> Result<(), BackendError> {
        self.command(
            Method::PUT,
            "/v1/me/player/volume",
            vec![("volume_percent", next.level().to_string())],
        )
        .await?;
        self.volume = next;
        log::info!("Spotify volume {}%", next.level());
        Ok(())
    }
}

fn build_client(config: &SpotifyConfig) -> Result<Client, BackendError> {
    Ok(Client::builder().timeout(config.request_timeout).build()?)
}

/// Turn error statuses into errors, keeping the API's own message.
async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let (message, reason) = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => (body.error.message, body.error.reason),
        Err(_) => (text, None),
    };

    if reason.as_deref() == Some("NO_ACTIVE_DEVICE") {
        return Err(BackendError::NoActiveDevice);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(BackendError::Auth(message));
    }
    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

impl MediaBackend for SpotifyBackend {
    fn name(&self) -> &'static str {
        "spotify"
    }

    /// Pauses if playing, resumes otherwise. Without an active device,
    /// playback is moved to the first available one and started there.
    async fn toggle_play_pause(&mut self) -> Result<(), BackendError> {
        let devices = self.devices().await?;
        if !devices.iter().any(|d| d.is_active && d.is_controllable()) {
            let first = devices
                .iter()
                .find(|d| d.is_controllable())
                .ok_or(BackendError::NoActiveDevice)?;
            return self.transfer(first).await;
        }

        let playing = self
            .get_json::<PlaybackState>("/v1/me/player")
            .await?
            .is_some_and(|state| state.is_playing);

        if playing {
            log::info!("Pausing Spotify playback");
            self.command(Method::PUT, "/v1/me/player/pause", Vec::new()).await
        } else {
            log::info!("Starting Spotify playback");
            self.command(Method::PUT, "/v1/me/player/play", Vec::new()).await
        }
    }

    async fn next_track(&mut self) -> Result<(), BackendError> {
        self.command(Method::POST, "/v1/me/player/next", Vec::new()).await
    }

    async fn previous_track(&mut self) -> Result<(), BackendError> {
        self.command(Method::POST, "/v1/me/player/previous", Vec::new()).await
    }

    async fn set_volume(&mut self, delta: i32) -> Result<(), BackendError> {
        let next = self.volume.adjusted(delta);
        self.apply_volume(next).await
    }

    async fn toggle_mute(&mut self) -> Result<(), BackendError> {
        let next = self.volume.mute_toggled();
        self.apply_volume(next).await
    }
}
