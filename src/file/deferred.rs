//! Deferred file placement and removal.
//!
//! Request handlers enqueue work here and return without waiting. A single
//! worker task drains the queue in order. Failures never reach the original
//! caller: they are logged, and a failed save marks the record `failed`.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::metadata::{FileRepository, FileStatus};
use crate::{Database, DepotError, Result};

/// A unit of deferred work.
#[derive(Debug)]
pub enum DeferredTask {
    /// Move a staged upload to its final path.
    Save {
        /// File the bytes belong to.
        file_id: String,
        /// Staged bytes; removed on drop if never persisted.
        staged: TempPath,
        /// Final location.
        dest: PathBuf,
    },
    /// Remove a placed file.
    Delete {
        /// File the bytes belonged to.
        file_id: String,
        /// Location to remove.
        path: PathBuf,
    },
}

#[derive(Debug)]
enum Message {
    Run(DeferredTask),
    Flush(oneshot::Sender<()>),
}

/// Handle for submitting deferred tasks to the worker.
///
/// The worker stops once every handle has been dropped and the queue is
/// drained.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tx: mpsc::UnboundedSender<Message>,
}

impl TaskQueue {
    /// Spawn the worker on the current runtime.
    pub fn start(db: Database) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(db, rx));
        (Self { tx }, handle)
    }

    /// Queue a task without waiting for it.
    pub fn enqueue(&self, task: DeferredTask) -> Result<()> {
        self.tx
            .send(Message::Run(task))
            .map_err(|_| DepotError::TaskQueueClosed)
    }

    /// Wait until every task queued before this call has finished.
    pub async fn flush(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(Message::Flush(ack))
            .map_err(|_| DepotError::TaskQueueClosed)?;
        done.await.map_err(|_| DepotError::TaskQueueClosed)
    }
}

async fn run_worker(db: Database, mut rx: mpsc::UnboundedReceiver<Message>) {
    info!("Deferred task worker started");

    while let Some(message) = rx.recv().await {
        match message {
            Message::Run(DeferredTask::Save {
                file_id,
                staged,
                dest,
            }) => save(&db, &file_id, staged, dest).await,
            Message::Run(DeferredTask::Delete { file_id, path }) => {
                delete(&file_id, &path).await
            }
            Message::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    info!("Deferred task worker stopped");
}

async fn save(db: &Database, file_id: &str, staged: TempPath, dest: PathBuf) {
    let target = dest.display().to_string();
    let dest_path = dest.clone();

    // Rename is blocking; a failed persist drops the TempPath and removes the staged bytes.
    let outcome = tokio::task::spawn_blocking(move || staged.persist(&dest).map_err(|e| e.error))
        .await
        .unwrap_or_else(|e| Err(io::Error::other(e)));

    let (status, placed) = match outcome {
        Ok(()) => {
            debug!(file_id, path = %target, "Stored file");
            (FileStatus::Stored, Some(dest_path))
        }
        Err(e) => {
            error!(file_id, path = %target, error = %e, "Failed to store file");
            (FileStatus::Failed, None)
        }
    };

    match FileRepository::new(db.pool()).set_status(file_id, status).await {
        Ok(true) => {}
        Ok(false) => {
            // Deleted while the save was queued; no record will ever point here.
            debug!(file_id, "File record removed before it was stored");
            if let Some(path) = placed {
                delete(file_id, &path).await;
            }
        }
        Err(e) => warn!(file_id, error = %e, "Failed to record file status"),
    }
}

async fn delete(file_id: &str, path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => debug!(file_id, path = %path.display(), "Removed file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(file_id, path = %path.display(), "File already absent")
        }
        Err(e) => warn!(file_id, path = %path.display(), error = %e, "Failed to remove file"),
    }
}
