//! Background persist worker.
//!
//! Mutations snapshot the full ledger and enqueue it here together with the
//! identity current at mutation time; a single writer thread drains the queue
//! in order. One consumer means writes are totally ordered, so a later save
//! can never be overwritten by a straggling earlier one, and an enqueued save
//! always completes against the identity it was captured under even if the
//! profile email changes afterwards.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use log::{debug, warn};

use crate::domain::models::PersistedLedger;

use super::ledger_repository::LedgerRepository;

enum Job {
    Save {
        identity: String,
        payload: Option<PersistedLedger>,
    },
    Flush(Sender<()>),
}

/// Single-threaded write queue over a [`LedgerRepository`].
pub struct PersistWorker {
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl PersistWorker {
    pub fn spawn(repository: LedgerRepository) -> Self {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || {
            for job in receiver {
                match job {
                    Job::Save { identity, payload } => {
                        // Failures are already logged by the repository; the
                        // in-memory session keeps going either way.
                        if repository.save(payload.as_ref(), &identity) {
                            debug!("Persisted ledger for identity '{}'", identity);
                        }
                    }
                    Job::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });
        Self {
            sender: Some(sender),
            handle: Some(handle),
        }
    }

    /// Queue a full-ledger save under `identity`. `None` forgets that
    /// identity's stored data.
    pub fn enqueue(&self, identity: String, payload: Option<PersistedLedger>) {
        if let Some(sender) = &self.sender {
            if sender.send(Job::Save { identity, payload }).is_err() {
                warn!("Persist worker is gone; dropping queued save");
            }
        }
    }

    /// Block until every save queued before this call has completed.
    pub fn flush(&self) {
        let (ack_sender, ack_receiver) = mpsc::channel();
        if let Some(sender) = &self.sender {
            if sender.send(Job::Flush(ack_sender)).is_ok() {
                let _ = ack_receiver.recv();
            }
        }
    }
}

impl Drop for PersistWorker {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain remaining jobs and exit.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
