//! Message bus collaborator — delivers already-deserialized topic/body pairs.
//!
//! The relay core does not manage the subscription lifecycle; it consumes
//! frames from whatever implements [`BusSource`]. The shipped implementation
//! streams newline-delimited JSON from the bus bridge endpoint.

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::SourceError;

/// One inbound bus message.
#[derive(Debug, Clone, Deserialize)]
pub struct BusMessage {
    /// Event family and sub-kind, e.g. `org.fedoraproject.prod.buildsys.tag`.
    pub topic: String,
    /// Arbitrarily-shaped event body; each callback knows its own shape.
    pub body: Value,
}

/// Source of bus messages. `Ok(None)` means the stream ended.
#[async_trait]
pub trait BusSource: Send {
    async fn next_message(&mut self) -> Result<Option<BusMessage>, SourceError>;
}

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Vec<u8>>> + Send>>;

/// Streams `{"topic": ..., "body": ...}` frames, one per line, from the bus
/// bridge. Malformed frames are logged and skipped.
pub struct HttpBusSource {
    client: reqwest::Client,
    bus_url: String,
    stream: Option<ByteStream>,
    buffer: Vec<u8>,
}

impl HttpBusSource {
    pub fn new(bus_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            bus_url: bus_url.into(),
            stream: None,
            buffer: Vec::new(),
        }
    }

    async fn connect(&mut self) -> Result<(), SourceError> {
        let response = self
            .client
            .get(&self.bus_url)
            .send()
            .await
            .map_err(|e| SourceError::Connect(e.to_string()))?
            .error_for_status()
            .map_err(|e| SourceError::Connect(e.to_string()))?;

        info!(url = %self.bus_url, "Connected to bus bridge");
        let stream = response.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec()));
        self.stream = Some(Box::pin(stream));
        Ok(())
    }

    /// Take the next complete line out of the buffer, if one is there.
    fn take_line(&mut self) -> Option<Vec<u8>> {
        let newline = self.buffer.iter().position(|b| *b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop();
        Some(line)
    }
}

/// Parse one frame; `None` for blank or malformed lines.
fn parse_frame(line: &[u8]) -> Option<BusMessage> {
    if line.iter().all(u8::is_ascii_whitespace) {
        return None;
    }

    match serde_json::from_slice::<BusMessage>(line) {
        Ok(message) => Some(message),
        Err(e) => {
            warn!(error = %e, "Skipping malformed bus frame");
            None
        }
    }
}

#[async_trait]
impl BusSource for HttpBusSource {
    async fn next_message(&mut self) -> Result<Option<BusMessage>, SourceError> {
        if self.stream.is_none() {
            self.connect().await?;
        }

        loop {
            if let Some(line) = self.take_line() {
                if let Some(message) = parse_frame(&line) {
                    return Ok(Some(message));
                }
                continue;
            }

            let stream = self.stream.as_mut().expect("stream connected above");
            match stream.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => return Err(SourceError::Stream(e.to_string())),
                None => {
                    // Stream ended; a trailing unterminated line is still a frame.
                    let rest = std::mem::take(&mut self.buffer);
                    return Ok(parse_frame(&rest));
                }
            }
        }
    }
}
