//! second-brain - terminal client for the Second Brain bookmarking service
//!
//! Users sign in, save links, images, videos and text notes, tag them,
//! browse them as paginated cards and share the collection through a
//! public link.
//!
//! # Architecture
//!
//! Rendering is derived from component-local state:
//! - Each item is classified by content type and payload
//! - Generic links get at most one preview fetch per (type, payload) pair
//! - Stale preview completions are discarded, never committed
//!
//! # Modules
//!
//! - `api`: REST client for the backend (`BrainApi`, `PreviewSource`)
//! - `card`: Content classification, preview resolution, card rendering
//! - `grid`: Pagination over the card list
//! - `forms`: New-content validation and tag selection
//! - `session`: Persisted token and theme preference
//! - `dashboard`: Session-aware flows with 401 teardown
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! brain signin alice --password secret
//! brain add --title "Rust" --type link --link https://www.rust-lang.org --tag lang
//! brain list --type link --page 2
//! brain share on
//! ```

pub mod api;
pub mod card;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod forms;
pub mod grid;
pub mod notice;
pub mod session;

// Re-export main types at crate root for convenience
pub use api::{ApiClient, ApiError, BrainApi, PreviewSource};
pub use card::{render::render_card, CardBody, CardView, ContentCard};
pub use dashboard::{Dashboard, DashboardError, Filter};
pub use domain::{ContentId, ContentItem, ContentKind, LinkPreview, Tag};
pub use forms::{ContentDraft, TagOutcome, ValidationError};
pub use grid::{GridView, Paginator};
pub use notice::Notice;
pub use session::{FileTokenStore, Session, Theme, ThemeStore};
