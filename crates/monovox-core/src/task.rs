//! Non-blocking handle for work moved off the caller's event loop.
//!
//! Decoding a long payload or serializing a large export can take long
//! enough to delay position ticks. Those jobs run on a named worker thread
//! and report back through a single-slot channel that the caller polls.

use crate::{Error, Result};
use crossbeam_channel::{Receiver, TryRecvError};
use std::thread::JoinHandle;

/// Handle to a background job producing `T`.
///
/// # Example
/// ```ignore
/// let mut job = TaskHandle::spawn("decode", move || decode(&payload, 24_000))?;
/// loop {
///     session.pump();
///     if let Some(result) = job.try_take() {
///         let buffer = result??;
///         break;
///     }
/// }
/// ```
pub struct TaskHandle<T> {
    result_rx: Receiver<T>,
    thread: Option<JoinHandle<()>>,
    taken: bool,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Run `job` on a new worker thread.
    pub fn spawn<F>(name: &str, job: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (result_tx, result_rx) = crossbeam_channel::bounded(1);
        let thread = std::thread::Builder::new()
            .name(format!("monovox-{name}"))
            .spawn(move || {
                // Receiver may be gone if the caller dropped the handle
                let _ = result_tx.send(job());
            })
            .map_err(|e| Error::Spawn(e.to_string()))?;

        Ok(Self {
            result_rx,
            thread: Some(thread),
            taken: false,
        })
    }
}

impl<T> TaskHandle<T> {
    /// Take the result if the job has finished (non-blocking).
    ///
    /// Returns `None` while running and after the result was taken.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        if self.taken {
            return None;
        }
        match self.result_rx.try_recv() {
            Ok(value) => {
                self.finish();
                Some(Ok(value))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finish();
                Some(Err(Error::TaskPanicked))
            }
        }
    }

    /// Block until the job finishes.
    pub fn wait(mut self) -> Result<T> {
        if self.taken {
            return Err(Error::TaskPanicked);
        }
        let result = self.result_rx.recv().map_err(|_| Error::TaskPanicked);
        self.finish();
        result
    }

    /// Check whether a result (or panic) is ready without consuming it.
    pub fn is_done(&self) -> bool {
        self.taken
            || !self.result_rx.is_empty()
            || self.thread.as_ref().map(|t| t.is_finished()).unwrap_or(true)
    }

    fn finish(&mut self) {
        self.taken = true;
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
