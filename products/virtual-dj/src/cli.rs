use clap::{Parser, ValueEnum};
use log::LevelFilter;
use serde::Deserialize;
use std::path::PathBuf;

/// Which media player the gestures drive.
#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Spotify through the Web API.
    #[default]
    Remote,
    /// A local VLC through its rc interface.
    Local,
}

#[derive(Parser, Debug, Default)]
#[command(name = "virtual-dj", version, about = "Control music playback with hand gestures")]
pub struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Camera index (`/dev/video<N>`).
    #[arg(long, value_name = "N")]
    pub camera: Option<usize>,

    /// Play back a recorded hand session instead of using the camera.
    #[arg(long, value_name = "FILE", conflicts_with = "record")]
    pub replay: Option<PathBuf>,

    /// Record the live hand session to a file.
    #[arg(long, value_name = "FILE")]
    pub record: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", value_parser = parse_level)]
    pub log_level: Option<LevelFilter>,

    /// Log into dated files in this directory instead of stdout.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

fn parse_level(text: &str) -> Result<LevelFilter, String> {
    text.parse()
        .map_err(|_| format!("expected one of off, error, warn, info, debug, trace; got {text:?}"))
}
