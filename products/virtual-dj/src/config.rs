use crate::cli::{BackendKind, Cli};
use dj_control::{SpotifyConfig, VlcConfig};
use dj_gesture::{Gesture, GestureConfig, RearmPolicy};
use dj_hands::DetectorConfig;
use dj_video::{CameraConfig, PixelFormat};
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{fmt, io};

pub const ENV_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "SPOTIFY_REDIRECT_URI";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse(toml::de::Error),
    Gesture(dj_gesture::ConfigError),
    /// A Spotify credential is neither in the file nor in the environment.
    MissingCredential(&'static str),
    /// Live capture needs `detector.program`.
    MissingDetector,
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read config {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "invalid config: {err}"),
            ConfigError::Gesture(err) => write!(f, "invalid gesture settings: {err}"),
            ConfigError::MissingCredential(name) => {
                write!(f, "missing Spotify credential: set {name} or [backend.spotify] in the config file")
            }
            ConfigError::MissingDetector => write!(
                f,
                "no hand landmark detector: set detector.program (and detector.args) in the config file"
            ),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<dj_gesture::ConfigError> for ConfigError {
    fn from(err: dj_gesture::ConfigError) -> Self {
        ConfigError::Gesture(err)
    }
}

/// Everything `virtual-dj` can be told through its TOML file.
///
/// Every key is optional.
///
/// ```toml
/// [camera]
/// index = 0
/// frame_stride = 4
///
/// [detector]
/// program = "python3"
/// args = ["hands_helper.py"]
///
/// [gesture]
/// debounce_frames = 3
///
/// [gesture.cooldowns]
/// open_palm_ms = 2000
///
/// [backend]
/// kind = "local"
///
/// [backend.vlc]
/// port = 4212
/// ```
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub camera: CameraSection,
    pub detector: DetectorSection,
    pub gesture: GestureSection,
    pub backend: BackendSection,
    pub log: LogSection,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatName {
    #[default]
    Jpeg,
    Yuyv,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSection {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub buffer_count: u32,
    pub format: FormatName,
    pub frame_timeout_ms: u64,
    /// Run detection on every n-th frame only.
    pub frame_stride: u32,
}

impl Default for CameraSection {
    fn default() -> Self {
        let camera = CameraConfig::default();
        Self {
            index: camera.index(),
            width: camera.width(),
            height: camera.height(),
            fps: camera.fps(),
            buffer_count: camera.buffer_count(),
            format: FormatName::Jpeg,
            frame_timeout_ms: 1000,
            frame_stride: 1,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorSection {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    pub ready_timeout_secs: u64,
}

impl Default for DetectorSection {
    fn default() -> Self {
        let detector = DetectorConfig::default();
        Self {
            program: detector.program,
            args: detector.args,
            min_detection_confidence: detector.min_detection_confidence,
            min_tracking_confidence: detector.min_tracking_confidence,
            ready_timeout_secs: detector.ready_timeout.as_secs(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RearmName {
    #[default]
    Release,
    Cooldown,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct GestureSection {
    pub debounce_frames: u32,
    pub rearm: RearmName,
    pub extension_ratio: f32,
    pub stillness_speed: f32,
    pub swipe_speed: f32,
    pub move_speed: f32,
    pub motion_window: usize,
    pub max_staleness_ms: u64,
    pub cooldowns: CooldownSection,
}

impl Default for GestureSection {
    fn default() -> Self {
        let gesture = GestureConfig::default();
        Self {
            debounce_frames: gesture.debounce_frames(),
            rearm: RearmName::Release,
            extension_ratio: gesture.extension_ratio(),
            stillness_speed: gesture.stillness_speed(),
            swipe_speed: gesture.swipe_speed(),
            move_speed: gesture.move_speed(),
            motion_window: gesture.motion_window(),
            max_staleness_ms: gesture.max_staleness().as_millis() as u64,
            cooldowns: CooldownSection::default(),
        }
    }
}

/// Per-gesture cooldowns in milliseconds.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct CooldownSection {
    pub open_palm_ms: u64,
    pub swipe_right_ms: u64,
    pub swipe_left_ms: u64,
    pub move_up_ms: u64,
    pub move_down_ms: u64,
    pub fist_ms: u64,
}

impl Default for CooldownSection {
    fn default() -> Self {
        let gesture = GestureConfig::default();
        let ms = |g: Gesture| gesture.cooldown(g).as_millis() as u64;
        Self {
            open_palm_ms: ms(Gesture::OpenPalm),
            swipe_right_ms: ms(Gesture::SwipeRight),
            swipe_left_ms: ms(Gesture::SwipeLeft),
            move_up_ms: ms(Gesture::MoveUp),
            move_down_ms: ms(Gesture::MoveDown),
            fist_ms: ms(Gesture::Fist),
        }
    }
}

impl CooldownSection {
    fn millis(&self, gesture: Gesture) -> u64 {
        match gesture {
            Gesture::OpenPalm => self.open_palm_ms,
            Gesture::SwipeRight => self.swipe_right_ms,
            Gesture::SwipeLeft => self.swipe_left_ms,
            Gesture::MoveUp => self.move_up_ms,
            Gesture::MoveDown => self.move_down_ms,
            Gesture::Fist => self.fist_ms,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSection {
    pub kind: BackendKind,
    /// Volume change per move gesture, in percent.
    pub volume_step: u8,
    pub call_timeout_ms: u64,
    pub spotify: SpotifySection,
    pub vlc: VlcSection,
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            kind: BackendKind::Remote,
            volume_step: 10,
            call_timeout_ms: 3000,
            spotify: SpotifySection::default(),
            vlc: VlcSection::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct SpotifySection {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub token_cache: PathBuf,
}

impl Default for SpotifySection {
    fn default() -> Self {
        let spotify = SpotifyConfig::default();
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: spotify.redirect_uri,
            token_cache: spotify.token_cache,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct VlcSection {
    pub host: String,
    pub port: u16,
}

impl Default for VlcSection {
    fn default() -> Self {
        let vlc = VlcConfig::default();
        Self {
            host: vlc.host,
            port: vlc.port,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    pub level: Option<String>,
    /// Write dated log files here instead of logging to stdout.
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load the file at `path`, or use the defaults when there is none.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Take Spotify credentials from the environment; they win over the
    /// file.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        let spotify = &mut self.backend.spotify;
        if let Some(id) = var(ENV_CLIENT_ID) {
            spotify.client_id = Some(id);
        }
        if let Some(secret) = var(ENV_CLIENT_SECRET) {
            spotify.client_secret = Some(secret);
        }
        if let Some(uri) = var(ENV_REDIRECT_URI) {
            spotify.redirect_uri = uri;
        }
    }

    /// Command line options win over everything else.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(kind) = cli.backend {
            self.backend.kind = kind;
        }
        if let Some(index) = cli.camera {
            self.camera.index = index;
        }
        if let Some(level) = cli.log_level {
            self.log.level = Some(level.to_string());
        }
        if let Some(dir) = &cli.log_dir {
            self.log.dir = Some(dir.clone());
        }
    }

    /// Check everything needed before any device is opened.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture_config().validate()?;
        self.log_level()?;

        if self.camera.frame_stride == 0 {
            return Err(ConfigError::Invalid("camera.frame_stride must be at least 1".to_string()));
        }
        if self.camera.frame_timeout_ms == 0 {
            return Err(ConfigError::Invalid("camera.frame_timeout_ms must be greater than zero".to_string()));
        }
        for (name, value) in [
            ("detector.min_detection_confidence", self.detector.min_detection_confidence),
            ("detector.min_tracking_confidence", self.detector.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!("{name} must be between 0 and 1, got {value}")));
            }
        }
        if !(1..=100).contains(&self.backend.volume_step) {
            return Err(ConfigError::Invalid(format!(
                "backend.volume_step must be between 1 and 100, got {}",
                self.backend.volume_step
            )));
        }
        if self.backend.call_timeout_ms == 0 {
            return Err(ConfigError::Invalid("backend.call_timeout_ms must be greater than zero".to_string()));
        }
        if self.backend.kind == BackendKind::Remote {
            self.spotify_config()?;
        }
        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        match &self.log.level {
            Some(level) => level
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("unknown log level {level:?}"))),
            None => Ok(dj_base::default_level()),
        }
    }

    pub fn camera_config(&self) -> CameraConfig {
        let format = match self.camera.format {
            FormatName::Jpeg => PixelFormat::Jpeg,
            FormatName::Yuyv => PixelFormat::Yuyv,
        };
        CameraConfig::default()
            .with_index(self.camera.index)
            .with_width(self.camera.width)
            .with_height(self.camera.height)
            .with_fps(self.camera.fps)
            .with_buffer_count(self.camera.buffer_count)
            .with_format(format)
    }

    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.camera.frame_timeout_ms)
    }

    /// Detector settings; fails when no helper program is configured.
    /// Only live runs need one.
    pub fn detector_config(&self) -> Result<DetectorConfig, ConfigError> {
        if self.detector.program.as_os_str().is_empty() {
            return Err(ConfigError::MissingDetector);
        }
        Ok(DetectorConfig {
            program: self.detector.program.clone(),
            args: self.detector.args.clone(),
            min_detection_confidence: self.detector.min_detection_confidence,
            min_tracking_confidence: self.detector.min_tracking_confidence,
            ready_timeout: Duration::from_secs(self.detector.ready_timeout_secs),
        })
    }

    pub fn gesture_config(&self) -> GestureConfig {
        let section = &self.gesture;
        let rearm = match section.rearm {
            RearmName::Release => RearmPolicy::OnRelease,
            RearmName::Cooldown => RearmPolicy::OnCooldown,
        };
        let mut config = GestureConfig::default()
            .with_debounce_frames(section.debounce_frames)
            .with_rearm(rearm)
            .with_extension_ratio(section.extension_ratio)
            .with_stillness_speed(section.stillness_speed)
            .with_swipe_speed(section.swipe_speed)
            .with_move_speed(section.move_speed)
            .with_motion_window(section.motion_window)
            .with_max_staleness(Duration::from_millis(section.max_staleness_ms));
        for gesture in Gesture::ALL {
            config = config.with_cooldown(
                gesture,
                Duration::from_millis(section.cooldowns.millis(gesture)),
            );
        }
        config
    }

    /// Spotify settings; fails when a credential is missing.
    pub fn spotify_config(&self) -> Result<SpotifyConfig, ConfigError> {
        let section = &self.backend.spotify;
        let client_id = section
            .client_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::MissingCredential(ENV_CLIENT_ID))?;
        let client_secret = section
            .client_secret
            .clone()
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::MissingCredential(ENV_CLIENT_SECRET))?;

        Ok(SpotifyConfig {
            client_id,
            client_secret,
            redirect_uri: section.redirect_uri.clone(),
            token_cache: section.token_cache.clone(),
            request_timeout: self.call_timeout(),
            ..SpotifyConfig::default()
        })
    }

    pub fn vlc_config(&self) -> VlcConfig {
        VlcConfig {
            host: self.backend.vlc.host.clone(),
            port: self.backend.vlc.port,
            ..VlcConfig::default()
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.call_timeout_ms)
    }
}
