use crate::error::Error;
use crate::scanner::{DirectoryScanner, ScanOutcome};
use crate::ScanListener;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_millis(1000);
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(5);

struct ScannerHandle {
    id: u64,
    cancel: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl ScannerHandle {
    fn request_cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    fn is_finished(&self) -> bool {
        self.join.as_ref().map(|j| j.is_finished()).unwrap_or(true)
    }

    fn reap(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

struct ScanMessage {
    id: u64,
    outcome: ScanOutcome,
}

/// Owns at most one live directory scan. A new request first retires every
/// tracked scanner (cancel, bounded wait, abandon stragglers), so entries
/// from a superseded scan can never land after a newer scan's. Results are
/// delivered to the listener from `pump`, never from worker threads.
pub struct ScanCoordinator {
    listener: Arc<dyn ScanListener>,
    tx: Sender<ScanMessage>,
    rx: Receiver<ScanMessage>,
    active: Option<ScannerHandle>,
    /// Cancelled scanners that have not yet acknowledged. Joined from
    /// `pump` once they finish; an abandoned scanner sits here inert.
    retired: Vec<ScannerHandle>,
    stop_timeout: Duration,
    next_id: u64,
}

impl ScanCoordinator {
    pub fn new(listener: Arc<dyn ScanListener>) -> Self {
        let (tx, rx) = channel();
        Self {
            listener,
            tx,
            rx,
            active: None,
            retired: Vec::new(),
            stop_timeout: DEFAULT_STOP_TIMEOUT,
            next_id: 0,
        }
    }

    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Cancel any in-flight scan, wait for it to retire, then start a new
    /// scanner for `path`. Re-requesting the same path restarts the scan;
    /// the directory's contents may have changed.
    pub fn request_scan(&mut self, path: PathBuf, show_hidden: bool) -> Result<(), Error> {
        self.retire_all();

        // Anything already queued belongs to a superseded scan.
        while self.rx.try_recv().is_ok() {}

        let id = self.next_id;
        self.next_id += 1;

        let cancel = Arc::new(AtomicBool::new(false));
        let scanner = DirectoryScanner::new(path, show_hidden, cancel.clone());
        let tx = self.tx.clone();
        let join = thread::Builder::new()
            .name(format!("glide-scan-{}", id))
            .spawn(move || {
                let outcome = scanner.run();
                let _ = tx.send(ScanMessage { id, outcome });
            })?;

        self.active = Some(ScannerHandle {
            id,
            cancel,
            join: Some(join),
        });
        Ok(())
    }

    /// Drain scanner completions and deliver them to the listener. Call
    /// from the owning (UI) context.
    pub fn pump(&mut self) {
        self.reap_retired();

        while let Ok(message) = self.rx.try_recv() {
            let is_current = self
                .active
                .as_ref()
                .map(|handle| handle.id == message.id)
                .unwrap_or(false);
            if !is_current {
                debug!("Dropping outcome from superseded scanner {}", message.id);
                continue;
            }

            if let Some(mut handle) = self.active.take() {
                handle.reap();
            }

            match message.outcome {
                ScanOutcome::Completed(entries) => {
                    self.listener.on_entries_ready(entries);
                }
                ScanOutcome::Failed { path, message } => {
                    warn!("Scan of {} failed: {}", path.display(), message);
                    self.listener.on_scan_error(&path, &message);
                    // Clear whatever listing the failed directory replaced.
                    self.listener.on_entries_ready(Vec::new());
                }
                ScanOutcome::Cancelled => {}
            }
        }
    }

    pub fn has_active_scan(&self) -> bool {
        self.active.is_some()
    }

    /// Cancel and wait for every tracked scanner. Idempotent.
    pub fn shutdown(&mut self) {
        self.retire_all();
        while self.rx.try_recv().is_ok() {}
        self.reap_retired();
    }

    /// Move the active scanner (if any) into the retired set, then give
    /// every retired scanner up to `stop_timeout` to acknowledge. Those
    /// that do are joined; those that do not are abandoned with their
    /// cancel flag set, which keeps them inert.
    fn retire_all(&mut self) {
        if let Some(handle) = self.active.take() {
            self.retired.push(handle);
        }
        for handle in &self.retired {
            handle.request_cancel();
        }

        let mut still_running = Vec::new();
        for mut handle in self.retired.drain(..) {
            if wait_for_finish(&handle, self.stop_timeout) {
                handle.reap();
            } else {
                warn!(
                    "Scanner {} did not stop within {:?}; abandoning",
                    handle.id, self.stop_timeout
                );
                still_running.push(handle);
            }
        }
        self.retired = still_running;
    }

    fn reap_retired(&mut self) {
        for handle in &mut self.retired {
            if handle.is_finished() {
                handle.reap();
            }
        }
        self.retired.retain(|handle| handle.join.is_some());
    }
}

impl Drop for ScanCoordinator {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn wait_for_finish(handle: &ScannerHandle, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(STOP_POLL_INTERVAL);
    }
    true
}
