use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Captured pasteboard content
///
/// Exactly two variants: plain text and a raw platform-native bitmap
/// container (TIFF on macOS), opaque to the store. Equality and hashing are
/// structural, which is what consecutive-duplicate suppression compares.
///
/// Serializes as `{ "type": "text" | "image", "value": ... }` with image
/// bytes base64-encoded, matching the persisted history blob shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ClipboardContent {
    Text(String),
    Image(
        #[serde(with = "base64_bytes")]
        #[ts(type = "string")]
        Vec<u8>,
    ),
}

/// A single clipboard history item
///
/// `id` is process-unique and never reused; `content` and `timestamp` are
/// immutable after creation. Items are created exactly once when new
/// pasteboard content is detected and destroyed only by deletion or a full
/// history clear.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ClipboardItem {
    pub id: String,
    pub content: ClipboardContent,
    #[ts(type = "string")]
    pub timestamp: DateTime<Utc>,
}

impl ClipboardItem {
    /// Create a new item with a fresh id and the current capture time
    pub fn new(content: ClipboardContent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content,
            timestamp: Utc::now(),
        }
    }

    /// Truncated display string for list views
    pub fn preview(&self) -> String {
        match &self.content {
            ClipboardContent::Text(text) => {
                if text.chars().count() > 100 {
                    format!("{}...", text.chars().take(100).collect::<String>())
                } else {
                    text.clone()
                }
            }
            ClipboardContent::Image(data) => format!("[Image, {} bytes]", data.len()),
        }
    }
}

/// Serde helper: raw bytes as a base64 string in JSON
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
