//! Clipboard history store
//!
//! Owns the ordered, newest-first list of captured items and mediates every
//! mutation. Memory is the source of truth for the current session; the
//! persisted blob is a derived snapshot rewritten after each mutation, so a
//! failed write never loses the in-memory state.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::pasteboard::Pasteboard;
use crate::shared::types::{ClipboardContent, ClipboardItem};

use super::storage::SettingsStore;

/// Settings key the serialized history lives under
pub const HISTORY_KEY: &str = "clipboard_history";

type Subscriber = Box<dyn Fn(&[ClipboardItem]) + Send>;

/// Clipboard history manager with key-value settings persistence
pub struct ClipboardHistory {
    items: Arc<Mutex<Vec<ClipboardItem>>>,
    store: Arc<dyn SettingsStore>,
    pasteboard: Arc<dyn Pasteboard>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl ClipboardHistory {
    /// Create an empty history backed by the given settings store and
    /// pasteboard. Call [`load`](Self::load) once at startup to pull in the
    /// persisted snapshot.
    pub fn new(store: Arc<dyn SettingsStore>, pasteboard: Arc<dyn Pasteboard>) -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            store,
            pasteboard,
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Load the persisted history, replacing the in-memory list.
    ///
    /// A missing key is the first-run case and yields an empty history. A
    /// corrupt blob also yields an empty history with a logged diagnostic;
    /// the store never refuses to start over bad persisted state.
    pub fn load(&self) {
        let loaded = match self.store.read_value(HISTORY_KEY) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<ClipboardItem>>(&blob) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, "Persisted clipboard history is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No persisted clipboard history, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted clipboard history, starting empty");
                Vec::new()
            }
        };

        let snapshot = {
            let mut items = self.items.lock().unwrap_or_else(|p| p.into_inner());
            *items = loaded;
            items.clone()
        };
        self.notify(&snapshot);
    }

    /// Record newly captured content at the front of the history.
    ///
    /// Consecutive-duplicate suppression: content structurally equal to the
    /// current most-recent item is dropped. The same content reappearing
    /// after other captures is recorded again; only the head is compared.
    pub fn record(&self, content: ClipboardContent) {
        let snapshot = {
            let mut items = self.items.lock().unwrap_or_else(|p| p.into_inner());

            if let Some(head) = items.first() {
                if head.content == content {
                    debug!("Skipping consecutive duplicate capture");
                    return;
                }
            }

            let item = ClipboardItem::new(content);
            debug!(id = %item.id, preview = %item.preview(), "Recorded clipboard item");
            items.insert(0, item);
            self.persist(&items);
            items.clone()
        };
        self.notify(&snapshot);
    }

    /// Delete the item with the given id, if present. Idempotent.
    pub fn delete(&self, id: &str) {
        let snapshot = {
            let mut items = self.items.lock().unwrap_or_else(|p| p.into_inner());
            let before = items.len();
            items.retain(|item| item.id != id);
            if items.len() == before {
                return;
            }
            self.persist(&items);
            items.clone()
        };
        self.notify(&snapshot);
    }

    /// Remove all items
    pub fn clear(&self) {
        let snapshot = {
            let mut items = self.items.lock().unwrap_or_else(|p| p.into_inner());
            items.clear();
            self.persist(&items);
            items.clone()
        };
        self.notify(&snapshot);
    }

    /// Write an item's content back to the system pasteboard.
    ///
    /// Image bytes that no longer decode indicate corrupted persisted state,
    /// not an actionable user error, so the write is skipped with a warning
    /// rather than surfaced.
    pub fn copy_to_clipboard(&self, item: &ClipboardItem) {
        self.pasteboard.clear();
        let result = match &item.content {
            ClipboardContent::Text(text) => self.pasteboard.write_text(text),
            ClipboardContent::Image(data) => self.pasteboard.write_image_data(data),
        };
        if let Err(e) = result {
            warn!(id = %item.id, error = %e, "Skipped pasteboard write");
        }
    }

    /// Snapshot of the current history, newest first
    pub fn items(&self) -> Vec<ClipboardItem> {
        let items = self.items.lock().unwrap_or_else(|p| p.into_inner());
        items.clone()
    }

    /// Look up a specific item by id
    pub fn get_item_by_id(&self, id: &str) -> Option<ClipboardItem> {
        let items = self.items.lock().unwrap_or_else(|p| p.into_inner());
        items.iter().find(|item| item.id == id).cloned()
    }

    /// Number of items in the history
    pub fn count(&self) -> usize {
        let items = self.items.lock().unwrap_or_else(|p| p.into_inner());
        items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Register a callback invoked with a fresh snapshot after every
    /// mutation. This is the read-side mechanism for a presentation layer;
    /// the store knows nothing about any UI framework.
    pub fn subscribe(&self, callback: impl Fn(&[ClipboardItem]) + Send + 'static) {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(|p| p.into_inner());
        subscribers.push(Box::new(callback));
    }

    /// Get a clone of the shared handles for use from the monitor task
    pub fn clone_arc(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            store: Arc::clone(&self.store),
            pasteboard: Arc::clone(&self.pasteboard),
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Serialize the full list and overwrite the settings key. Failures are
    /// logged and swallowed; the in-memory list stays authoritative.
    fn persist(&self, items: &[ClipboardItem]) {
        let blob = match serde_json::to_string(items) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to serialize clipboard history");
                return;
            }
        };
        if let Err(e) = self.store.write_value(HISTORY_KEY, &blob) {
            warn!(error = %e, "Failed to persist clipboard history");
        }
    }

    fn notify(&self, snapshot: &[ClipboardItem]) {
        let subscribers = self.subscribers.lock().unwrap_or_else(|p| p.into_inner());
        for subscriber in subscribers.iter() {
            subscriber(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::clipboard::storage::InMemorySettings;
    use crate::pasteboard::InMemoryPasteboard;

    fn text(s: &str) -> ClipboardContent {
        ClipboardContent::Text(s.to_string())
    }

    fn new_history() -> ClipboardHistory {
        ClipboardHistory::new(
            Arc::new(InMemorySettings::new()),
            Arc::new(InMemoryPasteboard::new()),
        )
    }

    #[test]
    fn test_record_inserts_newest_first() {
        let history = new_history();

        history.record(text("first"));
        history.record(text("second"));

        let items = history.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].content, text("second"));
        assert_eq!(items[1].content, text("first"));
    }

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let history = new_history();

        history.record(text("same"));
        history.record(text("same"));

        assert_eq!(history.count(), 1);
    }

    #[test]
    fn test_duplicate_after_other_content_is_recorded_again() {
        let history = new_history();

        history.record(text("a"));
        history.record(text("b"));
        history.record(text("a"));

        // Dedup only compares against the head, so "a" appears twice
        assert_eq!(history.count(), 3);
        assert_eq!(history.items()[0].content, text("a"));
    }

    #[test]
    fn test_delete_removes_one_and_preserves_order() {
        let history = new_history();

        history.record(text("a"));
        history.record(text("b"));
        history.record(text("c"));

        let middle_id = history.items()[1].id.clone();
        history.delete(&middle_id);

        let items = history.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].content, text("c"));
        assert_eq!(items[1].content, text("a"));
    }

    #[test]
    fn test_delete_absent_id_is_a_noop() {
        let history = new_history();
        history.record(text("only"));

        history.delete("no-such-id");

        assert_eq!(history.count(), 1);
    }

    #[test]
    fn test_clear_empties_history() {
        let history = new_history();
        history.record(text("a"));
        history.record(text("b"));

        history.clear();

        assert!(history.is_empty());
    }

    #[test]
    fn test_persist_load_roundtrip() {
        let store: Arc<dyn SettingsStore> = Arc::new(InMemorySettings::new());
        let pasteboard: Arc<dyn Pasteboard> = Arc::new(InMemoryPasteboard::new());

        let history = ClipboardHistory::new(Arc::clone(&store), Arc::clone(&pasteboard));
        history.record(text("hello"));
        history.record(ClipboardContent::Image(vec![9, 8, 7]));
        let before = history.items();

        // Fresh handle over the same settings store simulates a restart
        let reloaded = ClipboardHistory::new(store, pasteboard);
        reloaded.load();

        assert_eq!(reloaded.items(), before);
    }

    #[test]
    fn test_load_missing_key_yields_empty_history() {
        let history = new_history();
        history.load();
        assert!(history.is_empty());
    }

    #[test]
    fn test_load_corrupt_blob_yields_empty_history() {
        let store: Arc<dyn SettingsStore> = Arc::new(InMemorySettings::new());
        store
            .write_value(HISTORY_KEY, "{ not valid json ]")
            .unwrap();

        let history = ClipboardHistory::new(store, Arc::new(InMemoryPasteboard::new()));
        history.load();

        assert!(history.is_empty());
    }

    #[test]
    fn test_record_delete_clear_sequence() {
        let history = new_history();

        history.record(text("hello"));
        history.record(text("hello"));
        assert_eq!(history.count(), 1);

        history.record(text("world"));
        let items = history.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].content, text("world"));
        assert_eq!(items[1].content, text("hello"));

        let world_id = items[0].id.clone();
        history.delete(&world_id);
        let items = history.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, text("hello"));

        history.clear();
        assert_eq!(history.count(), 0);
    }

    #[test]
    fn test_copy_to_clipboard_writes_text() {
        let pasteboard = Arc::new(InMemoryPasteboard::new());
        let history = ClipboardHistory::new(
            Arc::new(InMemorySettings::new()),
            Arc::clone(&pasteboard) as Arc<dyn Pasteboard>,
        );

        let item = ClipboardItem::new(text("copy me"));
        let before = pasteboard.change_count();
        history.copy_to_clipboard(&item);

        assert_eq!(pasteboard.read_text().as_deref(), Some("copy me"));
        assert!(pasteboard.change_count() > before);
    }

    #[test]
    fn test_copy_to_clipboard_skips_undecodable_image() {
        let pasteboard = Arc::new(InMemoryPasteboard::new());
        let history = ClipboardHistory::new(
            Arc::new(InMemorySettings::new()),
            Arc::clone(&pasteboard) as Arc<dyn Pasteboard>,
        );

        // Empty bytes stand in for a payload the decoder rejects
        let item = ClipboardItem::new(ClipboardContent::Image(Vec::new()));
        history.copy_to_clipboard(&item);

        assert!(pasteboard.read_image_data().is_none());
    }

    #[test]
    fn test_subscribers_see_every_mutation() {
        let history = new_history();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(0usize));

        let calls_clone = Arc::clone(&calls);
        let seen_clone = Arc::clone(&seen);
        history.subscribe(move |items| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            *seen_clone.lock().unwrap() = items.len();
        });

        history.record(text("a"));
        history.record(text("b"));
        history.clear();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_persisted_blob_shape() {
        let store: Arc<dyn SettingsStore> = Arc::new(InMemorySettings::new());
        let history =
            ClipboardHistory::new(Arc::clone(&store), Arc::new(InMemoryPasteboard::new()));

        history.record(text("hello"));

        let blob = store.read_value(HISTORY_KEY).unwrap().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let entry = &parsed[0];
        assert!(entry["id"].is_string());
        assert_eq!(entry["content"]["type"], "text");
        assert_eq!(entry["content"]["value"], "hello");
        assert!(entry["timestamp"].is_string());
    }
}
