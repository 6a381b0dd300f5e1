pub mod errors;
pub mod types;

// Re-export the common surface for convenience
pub use errors::{ClipboardError, ClipboardResult};
pub use types::{ClipboardContent, ClipboardItem};
