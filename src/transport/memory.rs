//! In-memory line stream with explicit read and write queues.
//!
//! Scripts the remote side of a conversation: queue what the remote
//! "sends" with [`MemoryStream::add_read`], then inspect what the
//! connection wrote with [`MemoryStream::take_writes`].
//!
//! # Example
//!
//! ```
//! use dnode_sync_client::transport::{LineStream, MemoryStream};
//!
//! let remote = MemoryStream::new();
//! let mut local = remote.clone();
//!
//! remote.add_read("read line\n");
//! local.write_all(b"written line\n").unwrap();
//!
//! assert_eq!(local.read_line().unwrap().as_deref(), Some("read line\n"));
//! assert_eq!(remote.take_writes(), vec!["written line\n".to_string()]);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::{Bytes, BytesMut};

use super::LineStream;

#[derive(Debug, Default)]
struct Queues {
    /// Bytes queued for the connection to read.
    pending: BytesMut,
    /// One entry per `write_all` call, oldest first.
    written: Vec<Bytes>,
}

/// Cloneable handle to a shared pair of in-memory queues.
///
/// All clones see the same queues, so a test can keep one handle while the
/// connection owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    inner: Arc<Mutex<Queues>>,
}

impl MemoryStream {
    /// Create a stream with both queues empty.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Queues> {
        // Queues hold plain data, so a panic elsewhere cannot leave them inconsistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue data to be returned by subsequent reads.
    ///
    /// Data is split into lines on `\n` when read, so one call may queue
    /// several lines, or a line may be queued in several parts.
    pub fn add_read(&self, data: impl AsRef<[u8]>) {
        self.lock().pending.extend_from_slice(data.as_ref());
    }

    /// Drain and return everything written so far, one string per write.
    pub fn take_writes(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().written)
            .into_iter()
            .map(|chunk| String::from_utf8_lossy(&chunk).into_owned())
            .collect()
    }

    /// Number of queued bytes not yet read.
    pub fn pending_read_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Clear both queues.
    pub fn reset(&self) {
        let mut queues = self.lock();
        queues.pending.clear();
        queues.written.clear();
    }
}

impl LineStream for MemoryStream {
    fn read_line(&mut self) -> std::io::Result<Option<String>> {
        let mut queues = self.lock();
        if queues.pending.is_empty() {
            return Ok(None);
        }

        let end = match queues.pending.iter().position(|&b| b == b'\n') {
            Some(pos) => pos + 1,
            None => queues.pending.len(),
        };
        let line = queues.pending.split_to(end).freeze();

        String::from_utf8(line.to_vec())
            .map(Some)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.lock().written.push(Bytes::copy_from_slice(bytes));
        Ok(())
    }
}
