//! One-shot lifecycle signals shared between connection tasks.
//!
//! Both signals are broadcast-style: firing never blocks, firing twice is a
//! no-op, and any number of observers can wait on them without consuming them.

use std::{future::Future, time::Duration};

use tokio_util::{
    sync::{CancellationToken, WaitForCancellationFuture},
    task::TaskTracker,
};

/// Process-wide shutdown signal plus the set of live connection tasks.
///
/// Cloning yields another handle to the same signal.
#[derive(Debug, Clone, Default)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
    connections: TaskTracker,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the shutdown signal. Idempotent.
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once shutdown has been triggered.
    pub fn triggered(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// A token that is cancelled on shutdown but can also be cancelled on its
    /// own, without affecting the server.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Run a connection task and keep track of it until it finishes.
    pub fn track<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.connections.spawn(task);
    }

    /// Number of connection tasks still running.
    pub fn active_connections(&self) -> usize {
        self.connections.len()
    }

    /// Wait for every tracked connection to finish, at most `grace`.
    ///
    /// Returns `true` if all connections finished inside the window.
    /// Connections still open afterwards are left alone.
    pub async fn wait_for_connections(&self, grace: Duration) -> bool {
        self.connections.close();
        tokio::time::timeout(grace, self.connections.wait())
            .await
            .is_ok()
    }
}

/// Per-session "client disconnected" signal.
///
/// Raised by whichever loop notices the peer is gone first; later
/// notifications from racing paths are ignored.
#[derive(Debug, Clone, Default)]
pub struct DisconnectSignal {
    token: CancellationToken,
}

impl DisconnectSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self) {
        self.token.cancel();
    }

    pub fn is_notified(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn notified(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
