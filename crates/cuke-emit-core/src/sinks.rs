//! Message sinks.
//!
//! None of these report delivery problems to the sender; failures are
//! logged and the envelope is dropped.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use cuke_emit_proto::MessageSink;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{error, warn};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panic mid-write leaves at worst a partial line; keep going
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Writes each envelope as one line of JSON (NDJSON).
#[derive(Debug)]
pub struct NdjsonSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> NdjsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_line<E: Serialize>(&self, envelope: &E) -> io::Result<()> {
        let mut writer = lock(&self.writer);
        serde_json::to_writer(&mut *writer, envelope)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl NdjsonSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl NdjsonSink<BufWriter<File>> {
    /// Opens `path` for appending, creating it if needed.
    pub fn append_to(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<E: Serialize, W: Write + Send> MessageSink<E> for NdjsonSink<W> {
    fn send(&self, envelope: E) {
        if let Err(e) = self.write_line(&envelope) {
            error!(error = %e, "Failed to write envelope");
        }
    }
}

/// Keeps every envelope in memory.
#[derive(Debug)]
pub struct MemorySink<E> {
    envelopes: Mutex<Vec<E>>,
}

impl<E> Default for MemorySink<E> {
    fn default() -> Self {
        Self {
            envelopes: Mutex::new(Vec::new()),
        }
    }
}

impl<E> MemorySink<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything received so far.
    pub fn take(&self) -> Vec<E> {
        std::mem::take(&mut *lock(&self.envelopes))
    }

    pub fn len(&self) -> usize {
        lock(&self.envelopes).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Send> MessageSink<E> for MemorySink<E> {
    fn send(&self, envelope: E) {
        lock(&self.envelopes).push(envelope);
    }
}

/// Hands envelopes to an async consumer over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink<E> {
    tx: mpsc::UnboundedSender<E>,
}

impl<E> ChannelSink<E> {
    /// Creates the sink and the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<E>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl<E: Send> MessageSink<E> for ChannelSink<E> {
    fn send(&self, envelope: E) {
        if self.tx.send(envelope).is_err() {
            warn!("Envelope receiver closed; dropping envelope");
        }
    }
}
