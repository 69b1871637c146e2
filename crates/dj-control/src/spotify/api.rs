//! Spotify Web API payloads, only the fields the backend reads.

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Device {
    /// Missing for restricted devices, which cannot be controlled.
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_restricted: bool,
    pub volume_percent: Option<u8>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DeviceList {
    #[serde(default)]
    pub devices: Vec<Device>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlaybackState {
    #[serde(default)]
    pub is_playing: bool,
    pub device: Option<Device>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserProfile {
    pub display_name: Option<String>,
    /// `premium`, `free` or `open`.
    pub product: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct TransferRequest {
    pub device_ids: Vec<String>,
    pub play: bool,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    pub reason: Option<String>,
}

/// Answer of the accounts service token endpoint.
#[derive(Deserialize, Debug, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
}

impl Device {
    pub fn is_controllable(&self) -> bool {
        self.id.is_some() && !self.is_restricted
    }
}
