//! Background fetch worker.
//!
//! A single worker thread runs fetches one at a time, so overlapping refresh
//! triggers serialize (FIFO) instead of racing or cancelling each other. The
//! request channel is bounded to one pending entry: while a fetch is in
//! flight exactly one more may queue behind it, and further triggers are
//! coalesced since the queued fetch already returns the freshest data.
//!
//! Results come back on a separate channel that the UI event loop drains
//! between input polls; all state mutation stays on the UI thread.

use crate::error::FetchError;
use crate::model::Adventure;
use std::sync::mpsc::{Receiver, SyncSender, sync_channel};
use std::thread;

/// Outcome of one fetch attempt.
pub type FetchResult = Result<Vec<Adventure>, FetchError>;

/// Handle to the fetch worker, owned by the UI thread.
pub struct FetchHandle {
    request_tx: SyncSender<()>,
    result_rx: Receiver<FetchResult>,
}

impl FetchHandle {
    /// Spawns the worker thread around a fetch function. The worker exits
    /// when the handle is dropped and the request channel disconnects.
    pub fn spawn<F>(fetch: F) -> Self
    where
        F: Fn() -> FetchResult + Send + 'static,
    {
        // Depth-1 request queue: one in flight, at most one pending.
        let (request_tx, request_rx) = sync_channel::<()>(1);
        let (result_tx, result_rx) = sync_channel::<FetchResult>(8);

        thread::spawn(move || {
            while request_rx.recv().is_ok() {
                if result_tx.send(fetch()).is_err() {
                    break;
                }
            }
        });

        Self {
            request_tx,
            result_rx,
        }
    }

    /// Queues a fetch. Returns `false` when the request was coalesced into
    /// the already-pending one.
    pub fn request(&self) -> bool {
        self.request_tx.try_send(()).is_ok()
    }

    /// Takes the next completed result, if any, without blocking.
    pub fn try_result(&self) -> Option<FetchResult> {
        self.result_rx.try_recv().ok()
    }
}
