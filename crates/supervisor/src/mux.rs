// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output fan-in.
//!
//! Each program gets one bounded channel. Its lifecycle task and both stream
//! readers hold [`OutputSink`] clones that stamp every record with the
//! program's index, so the channel closes only once all three are done.
//! A full channel suspends the sender; nothing is buffered beyond the
//! channel capacity and nothing is dropped while a receiver exists.

use std::sync::Arc;

use atst_core::{Output, OutputKind, StreamSource};
use futures_util::stream::{self, BoxStream, SelectAll, StreamExt};
use tokio::sync::mpsc;

use crate::error::ProcessError;

/// Every program's records merged into one stream.
///
/// Ends after every underlying receiver has ended.
pub type MergedOutputs = SelectAll<BoxStream<'static, Output>>;

/// Producer handle for one program's records.
#[derive(Clone)]
pub struct OutputSink {
    index: usize,
    command: Arc<str>,
    tx: mpsc::Sender<Output>,
}

impl OutputSink {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Deliver one record, waiting for channel capacity.
    ///
    /// Returns `false` when the receiver is gone; the record is discarded.
    pub async fn send(&self, kind: impl Into<OutputKind>, msg: impl Into<String>) -> bool {
        let output = Output::new(self.index, &*self.command, kind, msg);
        self.tx.send(output).await.is_ok()
    }

    pub async fn line(&self, source: StreamSource, line: String) -> bool {
        self.send(source, line).await
    }

    pub async fn failure(&self, err: &ProcessError) -> bool {
        self.send(err.kind(), err.to_string()).await
    }

    /// Whether the consumer dropped its receiver.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer handle for one program's records.
pub struct OutputReceiver {
    index: usize,
    rx: mpsc::Receiver<Output>,
}

impl OutputReceiver {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Next record in production order, `None` once the program is finished.
    pub async fn recv(&mut self) -> Option<Output> {
        self.rx.recv().await
    }

    /// Drain every remaining record.
    pub async fn collect(mut self) -> Vec<Output> {
        let mut outputs = Vec::new();
        while let Some(output) = self.rx.recv().await {
            outputs.push(output);
        }
        outputs
    }

    pub fn into_stream(self) -> BoxStream<'static, Output> {
        stream::unfold(self.rx, |mut rx| async move {
            let output = rx.recv().await?;
            Some((output, rx))
        })
        .boxed()
    }
}

/// Create the channel for the program at `index`. Capacity is clamped to
/// `1..=MAX_OUTPUT_BUFFER`.
pub(crate) fn channel(
    index: usize,
    command: &str,
    capacity: usize,
) -> (OutputSink, OutputReceiver) {
    let (tx, rx) = mpsc::channel(capacity.clamp(1, crate::env::MAX_OUTPUT_BUFFER));
    (OutputSink { index, command: Arc::from(command), tx }, OutputReceiver { index, rx })
}

/// Fan several receivers into one stream.
///
/// Records from one receiver keep their order; records from different
/// receivers interleave in arrival order.
pub fn merge(receivers: impl IntoIterator<Item = OutputReceiver>) -> MergedOutputs {
    stream::select_all(receivers.into_iter().map(OutputReceiver::into_stream))
}

#[cfg(test)]
#[path = "mux_tests.rs"]
mod tests;
