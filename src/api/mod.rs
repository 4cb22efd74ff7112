//! REST client for the Second Brain backend.
//!
//! The [`BrainApi`] trait is the seam between the application and the
//! backend; [`ApiClient`] implements it over HTTP. Link previews sit behind
//! their own [`PreviewSource`] trait so content cards only depend on the
//! one call they make.

pub mod client;
pub mod error;
pub mod types;

use async_trait::async_trait;

use crate::domain::{ContentId, ContentItem, LinkPreview, Tag};

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    Ack, CreatedContent, Credentials, NewContent, ShareLink, SharedBrain, SignedIn,
    SHARED_EMPTY_MESSAGE,
};

/// Backend operations used by the dashboard
#[async_trait]
pub trait BrainApi: Send + Sync {
    /// Bearer token attached to authenticated calls
    fn set_token(&mut self, token: Option<String>);

    async fn sign_up(&self, credentials: &Credentials) -> Result<Ack, ApiError>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignedIn, ApiError>;

    async fn list_content(&self) -> Result<Vec<ContentItem>, ApiError>;

    async fn create_content(&self, content: &NewContent) -> Result<CreatedContent, ApiError>;

    async fn delete_content(&self, id: &ContentId) -> Result<Ack, ApiError>;

    async fn create_tag(&self, title: &str) -> Result<Tag, ApiError>;

    /// Look a tag up by title; `Ok(None)` when the backend has no such tag
    async fn find_tag(&self, title: &str) -> Result<Option<Tag>, ApiError>;

    async fn delete_tag(&self, tag_id: &str) -> Result<Ack, ApiError>;

    /// Create (`true`) or delete (`false`) the public share link
    async fn set_sharing(&self, share: bool) -> Result<ShareLink, ApiError>;

    /// Public, unauthenticated
    async fn shared_brain(&self, hash: &str) -> Result<SharedBrain, ApiError>;
}

/// Source of link preview metadata
#[async_trait]
pub trait PreviewSource: Send + Sync {
    async fn link_preview(&self, url: &str) -> Result<LinkPreview, ApiError>;
}
