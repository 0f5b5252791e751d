//! Asynchronous file → image reference conversion.
//!
//! Each request reads one file on a worker thread and reports back over a channel.
//! Results are picked up on the owner's turn through [`Ingestor::poll`] or
//! [`Ingestor::wait_next`]; nothing is applied behind the owner's back.

mod image_ref;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use thiserror::Error;

pub use image_ref::{ImageRef, DEFAULT_PLACEHOLDER};
pub(crate) use image_ref::encode_data_url;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read image file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type IngestResult<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IngestTicket(u64);

impl IngestTicket {
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Finished ingestion, carrying the routing key given at request time.
#[derive(Debug)]
pub struct IngestCompletion<K> {
    pub ticket: IngestTicket,
    pub key: K,
    pub result: IngestResult<ImageRef>,
}

#[derive(Debug)]
pub struct Ingestor<K> {
    tx: mpsc::Sender<IngestCompletion<K>>,
    rx: mpsc::Receiver<IngestCompletion<K>>,
    next_ticket: u64,
    in_flight: usize,
}

impl<K: Send + 'static> Ingestor<K> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            next_ticket: 1,
            in_flight: 0,
        }
    }

    /// Starts reading `path` and returns immediately.
    pub fn request(&mut self, path: impl Into<PathBuf>, key: K) -> IngestTicket {
        let path = path.into();
        let ticket = IngestTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.saturating_add(1);
        self.in_flight += 1;
        tracing::debug!(ticket = ticket.0, path = %path.display(), "ingestion requested");

        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let result = read_image_file(&path);
            let _ = tx.send(IngestCompletion {
                ticket,
                key,
                result,
            });
        });
        ticket
    }

    /// Drains every completion that has arrived so far, in completion order.
    pub fn poll(&mut self) -> Vec<IngestCompletion<K>> {
        let mut completed = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(completion) => {
                    self.in_flight = self.in_flight.saturating_sub(1);
                    completed.push(completion);
                }
                Err(mpsc::TryRecvError::Empty) | Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }
        completed
    }

    /// Blocks for at most `timeout` waiting on the next completion.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<IngestCompletion<K>> {
        if self.in_flight == 0 {
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(completion)
            }
            Err(_) => None,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl<K: Send + 'static> Default for Ingestor<K> {
    fn default() -> Self {
        Self::new()
    }
}

// No type or size checks: whatever the user picked is embedded as-is.
fn read_image_file(path: &Path) -> IngestResult<ImageRef> {
    let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(encode_data_url(&bytes))
}
