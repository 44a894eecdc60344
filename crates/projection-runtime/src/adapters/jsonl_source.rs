//! # JSON-Lines Event Source
//!
//! Replays envelopes from a file, one JSON object per line, in file order.
//! Blank lines are ignored; undecodable lines (including invalid UTF-8) are
//! logged and skipped. Only end of file or an I/O failure closes the source.

use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use token_projection::{EventEnvelope, EventSource};
use tracing::warn;

/// Event source over a JSON-lines file.
pub struct JsonLinesEventSource {
    reader: BufReader<File>,
    buffer: Vec<u8>,
    line_number: usize,
    skipped: usize,
}

impl JsonLinesEventSource {
    /// Open `path` for replay.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self {
            reader: BufReader::new(file),
            buffer: Vec::new(),
            line_number: 0,
            skipped: 0,
        })
    }

    /// Lines that could not be decoded so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[async_trait]
impl EventSource for JsonLinesEventSource {
    async fn next_event(&mut self) -> Option<EventEnvelope> {
        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer).await {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    warn!(line = self.line_number + 1, error = %err, "Event log read failed, closing source");
                    return None;
                }
            }
            self.line_number += 1;

            if self.buffer.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice(&self.buffer) {
                Ok(envelope) => return Some(envelope),
                Err(err) => {
                    self.skipped += 1;
                    warn!(line = self.line_number, error = %err, "Skipping undecodable event line");
                }
            }
        }
    }
}
