//! Clipboard monitor that polls for changes
//!
//! The pasteboard offers no push notification, only a monotonically
//! increasing change counter, so the monitor samples the counter on a fixed
//! 1-second cadence. The steady-state path is a single integer comparison;
//! payloads are only read when the counter moved.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::pasteboard::{Pasteboard, PasteboardType};
use crate::shared::types::ClipboardContent;

use super::history::ClipboardHistory;

/// Fixed polling cadence
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls the pasteboard change counter and records new content
pub struct ClipboardMonitor {
    pasteboard: Arc<dyn Pasteboard>,
    history: ClipboardHistory,
    last_change_count: Arc<Mutex<i64>>,
    enabled: Arc<AtomicBool>,
}

impl ClipboardMonitor {
    /// Create a new monitor.
    ///
    /// The pasteboard's current change count becomes the baseline, so
    /// whatever was on the clipboard before the monitor existed is never
    /// treated as new content.
    pub fn new(pasteboard: Arc<dyn Pasteboard>, history: ClipboardHistory) -> Self {
        let baseline = pasteboard.change_count();
        Self {
            pasteboard,
            history,
            last_change_count: Arc::new(Mutex::new(baseline)),
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Run one poll step.
    ///
    /// Cheap no-op when the change counter is unchanged. On a change the
    /// baseline advances first, then content types are inspected in fixed
    /// priority order (text before image) and exactly one content is
    /// extracted from the first matching type. A type that is advertised but
    /// yields no payload is skipped silently; the advanced baseline means
    /// the change is not revisited on the next tick.
    pub fn check(&self) {
        if !self.enabled.load(Ordering::SeqCst) {
            return;
        }

        let current = self.pasteboard.change_count();
        {
            let mut last = self
                .last_change_count
                .lock()
                .unwrap_or_else(|p| p.into_inner());
            if current == *last {
                return;
            }
            *last = current;
        }

        debug!(change_count = current, "Detected pasteboard change");

        let types = self.pasteboard.types();
        if types.contains(&PasteboardType::Text) {
            match self.pasteboard.read_text() {
                Some(text) => self.history.record(ClipboardContent::Text(text)),
                None => debug!("Text type advertised but payload unavailable, skipping"),
            }
        } else if types.contains(&PasteboardType::Image) {
            match self.pasteboard.read_image_data() {
                Some(data) => self.history.record(ClipboardContent::Image(data)),
                None => debug!("Image type advertised but payload unavailable, skipping"),
            }
        } else {
            debug!("Pasteboard change carries no supported content type");
        }
    }

    /// Start polling on the fixed cadence.
    ///
    /// Returns a handle that stops the task when dropped or explicitly
    /// stopped; checks are synchronous so there is never in-flight work to
    /// cancel.
    pub fn start(&self) -> MonitorHandle {
        let monitor = self.clone_arc();
        let task = tokio::spawn(async move {
            info!(interval_secs = POLL_INTERVAL.as_secs(), "Clipboard monitor started");
            let mut interval = tokio::time::interval(POLL_INTERVAL);
            loop {
                interval.tick().await;
                monitor.check();
            }
        });
        MonitorHandle { task }
    }

    /// Resume capturing
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
        info!("Clipboard monitor enabled");
    }

    /// Pause capturing without stopping the poll loop
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        info!("Clipboard monitor disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Toggle capturing on/off, returning the new state
    pub fn toggle(&self) -> bool {
        let enabled = !self.enabled.fetch_xor(true, Ordering::SeqCst);
        info!(enabled, "Clipboard monitor toggled");
        enabled
    }

    /// Get a clone of the shared handles for use from the poll task
    pub fn clone_arc(&self) -> Self {
        Self {
            pasteboard: Arc::clone(&self.pasteboard),
            history: self.history.clone_arc(),
            last_change_count: Arc::clone(&self.last_change_count),
            enabled: Arc::clone(&self.enabled),
        }
    }
}

/// Handle to a running monitor task. Stopping (or dropping) it simply stops
/// scheduling further checks.
pub struct MonitorHandle {
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn stop(&self) {
        self.task.abort();
        info!("Clipboard monitor stopped");
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
