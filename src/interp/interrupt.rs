//! Cancellation controller
//!
//! One Ctrl-C listener serves the whole session. If a cancellable wait is
//! outstanding (a `delay` or the local wait on a device operation) the signal
//! releases that wait and the session continues; otherwise it requests a
//! graceful shutdown of the session loop.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::debug;

#[derive(Default)]
pub struct Interrupt {
    cancel: Notify,
    shutdown: Notify,
    armed: AtomicUsize,
    terminated: AtomicBool,
}

impl Interrupt {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Spawn the Ctrl-C listener. Stops listening once shutdown has been
    /// requested so a second signal falls through to the default handler.
    pub fn install(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let interrupt = self.clone();
        tokio::spawn(async move {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    break;
                }
                if !interrupt.interrupted() {
                    break;
                }
            }
        })
    }

    /// Route one interrupt. Returns false once the session should shut down.
    pub fn interrupted(&self) -> bool {
        if self.armed.load(Ordering::SeqCst) > 0 {
            debug!("interrupt released a pending wait");
            self.cancel.notify_one();
            true
        } else {
            debug!("interrupt requested session shutdown");
            self.terminated.store(true, Ordering::SeqCst);
            self.shutdown.notify_one();
            false
        }
    }

    /// Run a future as a cancellable wait.
    ///
    /// Returns `None` if an interrupt released the wait first. The underlying
    /// operation is not aborted remotely, only the local wait unblocks.
    /// The session is serial, so at most one wait is armed at a time.
    pub async fn cancellable<F: Future>(&self, fut: F) -> Option<F::Output> {
        self.armed.fetch_add(1, Ordering::SeqCst);
        let out = tokio::select! {
            out = fut => Some(out),
            _ = self.cancel.notified() => None,
        };
        self.armed.fetch_sub(1, Ordering::SeqCst);
        out
    }

    /// Resolves once graceful shutdown has been requested
    pub async fn shutdown_requested(&self) {
        if self.is_terminated() {
            return;
        }
        self.shutdown.notified().await;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }
}
