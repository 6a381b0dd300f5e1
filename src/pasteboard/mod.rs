//! Pasteboard abstraction
//!
//! The system pasteboard is global mutable process state, so it is modeled
//! as an injected capability with two implementations: an NSPasteboard
//! adapter for macOS and an in-memory fake so the monitor and copy-back
//! logic are testable without a display session.

use std::sync::Mutex;

use crate::shared::errors::{ClipboardError, ClipboardResult};

#[cfg(target_os = "macos")]
pub mod macos;

/// Platform content type tags the core cares about, in capture priority
/// order: plain text first, then bitmap image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteboardType {
    Text,
    Image,
}

/// Read/write access to a system pasteboard
///
/// `change_count` is the pasteboard's opaque monotonically increasing
/// counter; it increments on every content change and lets the poller detect
/// changes without reading payloads. Reads return `None` both when the type
/// is absent and when a payload advertised via `types()` cannot actually be
/// produced (a transient condition the poller skips silently).
pub trait Pasteboard: Send + Sync {
    fn change_count(&self) -> i64;

    /// Content types currently advertised by the pasteboard
    fn types(&self) -> Vec<PasteboardType>;

    fn read_text(&self) -> Option<String>;

    /// Raw encoded image bytes (TIFF container on macOS)
    fn read_image_data(&self) -> Option<Vec<u8>>;

    fn clear(&self);

    fn write_text(&self, text: &str) -> ClipboardResult<()>;

    /// Decode the stored bytes and write the resulting image object.
    /// Fails if the bytes do not decode to an image.
    fn write_image_data(&self, data: &[u8]) -> ClipboardResult<()>;
}

/// The system's general pasteboard
#[cfg(target_os = "macos")]
pub fn general() -> ClipboardResult<std::sync::Arc<dyn Pasteboard>> {
    Ok(std::sync::Arc::new(macos::MacosPasteboard::general()?))
}

#[cfg(not(target_os = "macos"))]
pub fn general() -> ClipboardResult<std::sync::Arc<dyn Pasteboard>> {
    Err(ClipboardError::Pasteboard(
        "no system pasteboard adapter for this platform (macOS only)".to_string(),
    ))
}

#[derive(Debug, Default)]
struct InMemoryState {
    change_count: i64,
    text: Option<String>,
    image: Option<Vec<u8>>,
    /// When set, `types()` reports these tags regardless of which payloads
    /// are actually present. Lets tests model "type advertised but payload
    /// unavailable".
    advertised: Option<Vec<PasteboardType>>,
}

/// In-memory pasteboard fake
///
/// Behaves like the real thing for the operations the core uses: every
/// content change bumps the change count, writes clear the previous
/// contents, and `write_image_data` rejects bytes that do not "decode"
/// (empty input stands in for undecodable data).
#[derive(Debug, Default)]
pub struct InMemoryPasteboard {
    state: Mutex<InMemoryState>,
}

impl InMemoryPasteboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an external copy of text (bumps the change count)
    pub fn set_text(&self, text: impl Into<String>) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.change_count += 1;
        state.text = Some(text.into());
        state.image = None;
        state.advertised = None;
    }

    /// Simulate an external copy of image data (bumps the change count)
    pub fn set_image(&self, data: Vec<u8>) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.change_count += 1;
        state.text = None;
        state.image = Some(data);
        state.advertised = None;
    }

    /// Simulate an external copy of both text and an image in one change
    pub fn set_text_and_image(&self, text: impl Into<String>, data: Vec<u8>) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.change_count += 1;
        state.text = Some(text.into());
        state.image = Some(data);
        state.advertised = None;
    }

    /// Simulate a change that advertises types without readable payloads
    pub fn set_advertised_without_payload(&self, types: Vec<PasteboardType>) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.change_count += 1;
        state.text = None;
        state.image = None;
        state.advertised = Some(types);
    }

    /// Simulate a change carrying neither text nor image (e.g. a file copy)
    pub fn set_unsupported_content(&self) {
        self.set_advertised_without_payload(Vec::new());
    }
}

impl Pasteboard for InMemoryPasteboard {
    fn change_count(&self) -> i64 {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.change_count
    }

    fn types(&self) -> Vec<PasteboardType> {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(advertised) = &state.advertised {
            return advertised.clone();
        }
        let mut types = Vec::new();
        if state.text.is_some() {
            types.push(PasteboardType::Text);
        }
        if state.image.is_some() {
            types.push(PasteboardType::Image);
        }
        types
    }

    fn read_text(&self) -> Option<String> {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.text.clone()
    }

    fn read_image_data(&self) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.image.clone()
    }

    fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.change_count += 1;
        state.text = None;
        state.image = None;
        state.advertised = None;
    }

    fn write_text(&self, text: &str) -> ClipboardResult<()> {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.change_count += 1;
        state.text = Some(text.to_string());
        state.image = None;
        state.advertised = None;
        Ok(())
    }

    fn write_image_data(&self, data: &[u8]) -> ClipboardResult<()> {
        if data.is_empty() {
            return Err(ClipboardError::Pasteboard(
                "image data did not decode".to_string(),
            ));
        }
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        state.change_count += 1;
        state.text = None;
        state.image = Some(data.to_vec());
        state.advertised = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_bumps_change_count() {
        let pasteboard = InMemoryPasteboard::new();
        let before = pasteboard.change_count();
        pasteboard.set_text("hello");
        assert_eq!(pasteboard.change_count(), before + 1);
        assert_eq!(pasteboard.read_text().as_deref(), Some("hello"));
    }

    #[test]
    fn test_types_reflect_present_payloads() {
        let pasteboard = InMemoryPasteboard::new();
        assert!(pasteboard.types().is_empty());

        pasteboard.set_text("hello");
        assert_eq!(pasteboard.types(), vec![PasteboardType::Text]);

        pasteboard.set_image(vec![1, 2, 3]);
        assert_eq!(pasteboard.types(), vec![PasteboardType::Image]);
        assert!(pasteboard.read_text().is_none());
    }

    #[test]
    fn test_advertised_override_hides_payloads() {
        let pasteboard = InMemoryPasteboard::new();
        pasteboard.set_advertised_without_payload(vec![PasteboardType::Text]);
        assert_eq!(pasteboard.types(), vec![PasteboardType::Text]);
        assert!(pasteboard.read_text().is_none());
    }

    #[test]
    fn test_write_image_rejects_undecodable_bytes() {
        let pasteboard = InMemoryPasteboard::new();
        let before = pasteboard.change_count();
        assert!(pasteboard.write_image_data(&[]).is_err());
        assert_eq!(pasteboard.change_count(), before);
    }

    #[test]
    fn test_clear_empties_contents() {
        let pasteboard = InMemoryPasteboard::new();
        pasteboard.set_text("hello");
        pasteboard.clear();
        assert!(pasteboard.read_text().is_none());
        assert!(pasteboard.types().is_empty());
    }
}
