//! Clipboard module
//!
//! Provides clipboard history tracking and monitoring functionality.
//!
//! This module contains the core components:
//! - `history`: the persisted, deduplicated history of captured items
//! - `monitor`: the poller that watches the pasteboard change counter
//! - `storage`: the key-value settings store the history persists into

pub mod history;
pub mod monitor;
pub mod storage;

pub use history::{ClipboardHistory, HISTORY_KEY};
pub use monitor::{ClipboardMonitor, MonitorHandle};
pub use storage::{open_default_store, InMemorySettings, RedbSettings, SettingsStore};
