//! Domain types for the Second Brain client.
//!
//! - Content: saved items, their tags and owners
//! - Preview: ephemeral link metadata

pub mod content;
pub mod preview;

// Re-export commonly used types
pub use content::{ContentId, ContentItem, ContentKind, Owner, OwnerRef, Tag};
pub use preview::LinkPreview;
