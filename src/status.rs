//! Worker liveness status.
//!
//! Each worker owns a [`StatusCell`] and marks itself stopped exactly once
//! on exit; the supervisor watches the paired [`StatusProbe`]. The
//! `Running -> Stopped` transition is one-way.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerStatus {
    #[default]
    Running,
    Stopped,
}

/// Creates a linked cell/probe pair, initially `Running`.
pub fn status_pair() -> (StatusCell, StatusProbe) {
    let (tx, rx) = watch::channel(WorkerStatus::Running);
    (StatusCell { tx }, StatusProbe { rx })
}

/// Worker-side handle for reporting the stop transition.
#[derive(Debug)]
pub struct StatusCell {
    tx: watch::Sender<WorkerStatus>,
}

impl StatusCell {
    pub fn set_stopped(&self) {
        let _ = self.tx.send(WorkerStatus::Stopped);
    }
}

/// Supervisor-side view of a worker's liveness.
#[derive(Debug, Clone)]
pub struct StatusProbe {
    rx: watch::Receiver<WorkerStatus>,
}

impl StatusProbe {
    pub fn get(&self) -> WorkerStatus {
        *self.rx.borrow()
    }

    pub fn is_stopped(&self) -> bool {
        self.get() == WorkerStatus::Stopped
    }

    /// Resolves once the worker has stopped.
    ///
    /// A dropped cell counts as stopped: the worker task is gone either way.
    pub async fn stopped(&mut self) {
        while *self.rx.borrow_and_update() != WorkerStatus::Stopped {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}
