//! pastestack: a macOS clipboard-history core
//!
//! Polls the system pasteboard's change counter once a second, captures new
//! text and image snippets into an ordered, consecutive-deduplicated
//! history, and persists that history as a JSON blob in a key-value settings
//! store. A presentation layer consumes the history through the
//! [`ClipboardHistory`] read accessors and mutation operations; the poller
//! never talks to any UI.

pub mod clipboard;
pub mod pasteboard;
pub mod shared;

pub use clipboard::{ClipboardHistory, ClipboardMonitor, MonitorHandle};
pub use pasteboard::{InMemoryPasteboard, Pasteboard, PasteboardType};
pub use shared::{ClipboardContent, ClipboardError, ClipboardItem, ClipboardResult};
