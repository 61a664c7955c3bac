//! Newline-delimited JSON input

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Key under which the stream producer wraps each payload
pub const ENVELOPE_KEY: &str = "@data";

#[derive(Debug)]
pub enum Line {
    Blank,
    Malformed(serde_json::Error),
    /// Parsed payload with any envelope already removed
    Document(Value),
}

/// Classify one raw input line
pub fn parse_line(raw: &[u8]) -> Line {
    let trimmed = raw.trim_ascii();
    if trimmed.is_empty() {
        return Line::Blank;
    }

    match serde_json::from_slice::<Value>(trimmed) {
        Ok(document) => Line::Document(unwrap_envelope(document)),
        Err(e) => Line::Malformed(e),
    }
}

pub fn unwrap_envelope(document: Value) -> Value {
    match document {
        Value::Object(mut fields) if fields.contains_key(ENVELOPE_KEY) => fields
            .remove(ENVELOPE_KEY)
            .unwrap_or(Value::Null),
        other => other,
    }
}

/// Reads one line at a time. Bytes are not required to be UTF-8; invalid
/// text surfaces as a malformed line rather than a read error.
pub struct DocumentReader<R> {
    inner: R,
    buf: Vec<u8>,
    line_no: u64,
}

impl<R: AsyncBufRead + Unpin> DocumentReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            line_no: 0,
        }
    }

    /// Number of lines consumed so far; also the 1-based number of the last line
    pub fn line_no(&self) -> u64 {
        self.line_no
    }

    /// `Ok(None)` at end of stream
    pub async fn next_line(&mut self) -> std::io::Result<Option<Line>> {
        self.buf.clear();
        let read = self.inner.read_until(b'\n', &mut self.buf).await?;
        if read == 0 {
            return Ok(None);
        }

        self.line_no += 1;
        Ok(Some(parse_line(&self.buf)))
    }
}
