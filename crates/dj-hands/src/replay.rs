use crate::wire::TickRecord;
use crate::{HandError, HandStream, Tick};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Plays back a recorded session, one JSON tick per line.
///
/// Blank lines are skipped; a line that does not parse replays as a dropped
/// frame.
pub struct ReplayStream<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl ReplayStream<BufReader<tokio::fs::File>> {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, HandError> {
        let file = tokio::fs::File::open(path.as_ref()).await?;
        log::info!("replaying hand session from {}", path.as_ref().display());
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> ReplayStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }
}

impl<R: AsyncBufRead + Unpin> HandStream for ReplayStream<R> {
    async fn next_tick(&mut self) -> Result<Option<Tick>, HandError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line).await? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let text = self.line.trim();
            if text.is_empty() {
                continue;
            }

            return Ok(Some(match serde_json::from_str::<TickRecord>(text) {
                Ok(record) => Tick::from(record),
                Err(e) => {
                    log::warn!("replay line {} unreadable, dropping: {}", self.line_number, e);
                    Tick::Dropped
                }
            }));
        }
    }
}

/// Passes ticks through from an inner stream while appending them to a
/// replay file.
///
/// A failing write is logged and recording stops; the live stream keeps
/// running.
pub struct RecordingStream<H> {
    inner: H,
    writer: Option<BufWriter<File>>,
}

impl<H: HandStream> RecordingStream<H> {
    pub fn create(inner: H, path: impl AsRef<Path>) -> Result<Self, HandError> {
        let file = File::create(path.as_ref())?;
        log::info!("recording hand session to {}", path.as_ref().display());
        Ok(Self {
            inner,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn inner(&self) -> &H {
        &self.inner
    }

    fn write(&mut self, tick: &Tick) {
        let Some(writer) = self.writer.as_mut() else {
            return;
        };

        let result = serde_json::to_string(&TickRecord::from(tick))
            .map_err(std::io::Error::from)
            .and_then(|json| writeln!(writer, "{json}"));

        if let Err(e) = result {
            log::warn!("recording stopped: {}", e);
            self.writer = None;
        }
    }
}

impl<H: HandStream> HandStream for RecordingStream<H> {
    async fn next_tick(&mut self) -> Result<Option<Tick>, HandError> {
        let tick = self.inner.next_tick().await?;
        if let Some(tick) = &tick {
            self.write(tick);
        }
        Ok(tick)
    }
}

impl<H> Drop for RecordingStream<H> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush().ok();
        }
    }
}
