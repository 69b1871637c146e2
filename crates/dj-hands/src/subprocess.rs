use crate::wire::DetectionJson;
use crate::{DetectError, DetectorConfig, HandObservation, LandmarkDetector};
use dj_video::VideoFrame;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Landmark detector running as a child process (typically a MediaPipe
/// hands script).
///
/// # Protocol
///
/// The child is started as
/// `<program> <args..> --min-detection-confidence C --min-tracking-confidence T`
/// and must print `READY` on its own line once its model is loaded.
/// For each frame the parent writes four little-endian `u32`s
/// (format tag, width, height, payload length) followed by the payload.
/// The child answers with one line of JSON:
///
/// ```json
/// {"hands": [{"handedness": "Right", "score": 0.94,
///             "landmarks": [{"x": 0.51, "y": 0.62, "z": -0.01, "visibility": 0.99}, ...]}],
///  "error": null}
/// ```
///
/// Format tags: 0 = JPEG, 1 = YUYV.
pub struct SubprocessDetector {
    config: DetectorConfig,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    line: String,
}

impl SubprocessDetector {
    /// Start the detector and wait for it to report ready.
    pub async fn spawn(config: &DetectorConfig) -> Result<Self, DetectError> {
        if config.program.as_os_str().is_empty() {
            return Err(DetectError::Spawn("no detector program configured".to_string()));
        }
        log::info!("Starting hand landmark detector: {}", config.program.display());

        let mut child = Command::new(&config.program)
            .args(&config.args)
            .arg("--min-detection-confidence")
            .arg(config.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(config.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                DetectError::Spawn(format!("failed to start {}: {e}", config.program.display()))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DetectError::Spawn("detector stdin not captured".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DetectError::Spawn("detector stdout not captured".to_string()))?;

        let mut detector = Self {
            config: config.clone(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            line: String::new(),
        };

        let ready = tokio::time::timeout(config.ready_timeout, detector.read_line())
            .await
            .map_err(|_| DetectError::Spawn("detector did not become ready in time".to_string()))??;
        if ready.trim() != "READY" {
            return Err(DetectError::Spawn(format!(
                "detector did not signal ready, got: {}",
                ready.trim()
            )));
        }

        log::info!("Hand landmark detector ready");
        Ok(detector)
    }

    async fn read_line(&mut self) -> Result<String, DetectError> {
        self.line.clear();
        let read = self.stdout.read_line(&mut self.line).await?;
        if read == 0 {
            return Err(DetectError::Exited("detector closed its output".to_string()));
        }
        Ok(self.line.clone())
    }

    async fn write_frame(&mut self, frame: &VideoFrame) -> Result<(), DetectError> {
        let payload = frame.data.bytes();
        let payload_len = u32::try_from(payload.len())
            .map_err(|_| DetectError::Protocol(format!("frame too large: {} bytes", payload.len())))?;

        let mut header = [0u8; 16];
        header[0..4].copy_from_slice(&frame.data.format_tag().to_le_bytes());
        header[4..8].copy_from_slice(&(frame.size.x as u32).to_le_bytes());
        header[8..12].copy_from_slice(&(frame.size.y as u32).to_le_bytes());
        header[12..16].copy_from_slice(&payload_len.to_le_bytes());

        self.stdin.write_all(&header).await?;
        self.stdin.write_all(payload).await?;
        self.stdin.flush().await?;
        Ok(())
    }
}

impl LandmarkDetector for SubprocessDetector {
    async fn detect(&mut self, frame: &VideoFrame) -> Result<Vec<HandObservation>, DetectError> {
        self.write_frame(frame).await?;

        let response = self.read_line().await?;
        let result: DetectionJson = serde_json::from_str(response.trim())?;

        if let Some(error) = result.error {
            return Err(DetectError::Detector(error));
        }

        Ok(result
            .hands
            .into_iter()
            .filter_map(|hand| hand.into_observation())
            .collect())
    }

    /// Kill the child and start a fresh one. Any answer still in flight
    /// is lost with the old pipes.
    async fn restart(&mut self) -> Result<(), DetectError> {
        if let Err(e) = self.child.kill().await {
            log::debug!("old detector already gone: {}", e);
        }
        let config = self.config.clone();
        *self = Self::spawn(&config).await?;
        Ok(())
    }
}

impl Drop for SubprocessDetector {
    fn drop(&mut self) {
        if self.child.start_kill().is_ok() {
            log::debug!("hand landmark detector stopped");
        }
    }
}
