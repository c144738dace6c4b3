// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded line splitting over an async byte stream.
//!
//! Lines end at `\n`; a `\r` directly before it is stripped too. A partial
//! line left at end-of-stream is emitted as a final line. A line whose content
//! is longer than the configured bound is an error rather than being
//! truncated, and ends the sequence.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::error::ReadError;

/// Lazy, finite sequence of text lines read from one byte stream.
pub struct LineReader<R> {
    inner: BufReader<R>,
    buf: Vec<u8>,
    max_line_bytes: usize,
    finished: bool,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    /// `max_line_bytes` bounds the content of a single line, excluding the terminator.
    pub fn new(stream: R, max_line_bytes: usize) -> Self {
        Self {
            inner: BufReader::new(stream),
            buf: Vec::new(),
            max_line_bytes: max_line_bytes.max(1),
            finished: false,
        }
    }

    /// Next line, `Ok(None)` once the stream closed or after an error.
    pub async fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        if self.finished {
            return Ok(None);
        }
        match self.read_line().await {
            Ok(Some(line)) => Ok(Some(line)),
            Ok(None) => {
                self.finished = true;
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                self.buf.clear();
                Err(e)
            }
        }
    }

    /// Read and throw away everything left in the stream.
    ///
    /// Keeps the writer from blocking on a full pipe after the sequence ended early.
    pub async fn discard_remaining(mut self) -> std::io::Result<u64> {
        let mut discarded = 0u64;
        loop {
            let n = {
                let available = self.inner.fill_buf().await?;
                available.len()
            };
            if n == 0 {
                return Ok(discarded);
            }
            self.inner.consume(n);
            discarded += n as u64;
        }
    }

    async fn read_line(&mut self) -> Result<Option<String>, ReadError> {
        loop {
            let (consumed, complete) = {
                let available = self.inner.fill_buf().await?;
                if available.is_empty() {
                    if self.buf.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(self.take_line()));
                }
                match available.iter().position(|&b| b == b'\n') {
                    Some(pos) => {
                        push_bounded(&mut self.buf, &available[..pos], self.max_line_bytes)?;
                        (pos + 1, true)
                    }
                    None => {
                        push_bounded(&mut self.buf, available, self.max_line_bytes)?;
                        (available.len(), false)
                    }
                }
            };
            self.inner.consume(consumed);
            if complete {
                return Ok(Some(self.take_line()));
            }
        }
    }

    fn take_line(&mut self) -> String {
        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();
        line
    }
}

/// Append `bytes` to the pending line unless its content would exceed `limit`.
fn push_bounded(buf: &mut Vec<u8>, bytes: &[u8], limit: usize) -> Result<(), ReadError> {
    let pending = buf.len() + bytes.len();
    // A trailing '\r' is part of the terminator when '\n' follows it.
    let content = match bytes.last().or(buf.last()) {
        Some(b'\r') => pending - 1,
        _ => pending,
    };
    if content > limit {
        return Err(ReadError::LineTooLong { limit });
    }
    buf.extend_from_slice(bytes);
    Ok(())
}

#[cfg(test)]
#[path = "lines_tests.rs"]
mod tests;
