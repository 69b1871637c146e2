use crate::{BackendError, MediaBackend, VolumeState};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Address of VLC's remote control interface, as started with
/// `vlc --extraintf rc --rc-host 127.0.0.1:4212`.
#[derive(Clone, Debug)]
pub struct VlcConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
}

impl Default for VlcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4212,
            connect_timeout: Duration::from_secs(2),
        }
    }
}

impl VlcConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// VLC's `volume` command runs from 0 to 256 (100 %) and beyond.
fn rc_volume(percent: u8) -> u32 {
    u32::from(percent) * 256 / 100
}

/// Local VLC player driven through its `rc` interface.
///
/// The connection is reopened on the next command after it breaks.
pub struct VlcBackend {
    config: VlcConfig,
    stream: Option<TcpStream>,
    volume: VolumeState,
}

impl VlcBackend {
    /// Connect to a running VLC.
    pub async fn connect(config: VlcConfig) -> Result<Self, BackendError> {
        let stream = open(&config).await?;
        log::info!("Connected to VLC at {}", config.address());
        Ok(Self {
            config,
            stream: Some(stream),
            volume: VolumeState::default(),
        })
    }

    pub fn volume(&self) -> VolumeState {
        self.volume
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, command: &str) -> Result<(), BackendError> {
        let mut stream = match self.stream.take() {
            Some(stream) if drain(&stream) => stream,
            previous => {
                if previous.is_some() {
                    log::debug!("VLC closed the connection");
                }
                log::info!("Reconnecting to VLC at {}", self.config.address());
                open(&self.config).await?
            }
        };

        stream.write_all(format!("{command}\n").as_bytes()).await?;
        log::debug!("vlc <- {}", command);
        self.stream = Some(stream);
        Ok(())
    }

    async fn apply_volume(&mut self, next: VolumeState) -> Result<(), BackendError> {
        self.send(&format!("volume {}", rc_volume(next.level()))).await?;
        self.volume = next;
        log::info!("VLC volume {}%", next.level());
        Ok(())
    }
}

async fn open(config: &VlcConfig) -> Result<TcpStream, BackendError> {
    let stream = tokio::time::timeout(config.connect_timeout, TcpStream::connect(config.address()))
        .await
        .map_err(|_| BackendError::Timeout)??;
    stream.set_nodelay(true)?;
    Ok(stream)
}

/// Discard whatever VLC printed (prompts, status lines). Returns false if
/// the connection has been closed.
fn drain(stream: &TcpStream) -> bool {
    let mut buf = [0u8; 1024];
    loop {
        match stream.try_read(&mut buf) {
            Ok(0) => return false,
            Ok(_) => continue,
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return true,
            Err(_) => return false,
        }
    }
}

impl MediaBackend for VlcBackend {
    fn name(&self) -> &'static str {
        "vlc"
    }

    async fn toggle_play_pause(&mut self) -> Result<(), BackendError> {
        self.send("pause").await
    }

    async fn next_track(&mut self) -> Result<(), BackendError> {
        self.send("next").await
    }

    async fn previous_track(&mut self) -> Result<(), BackendError> {
        self.send("prev").await
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
