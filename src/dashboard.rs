//! Signed-in application flows.
//!
//! The [`Dashboard`] owns the session context and the API client. Every
//! authenticated call goes through one guard: a 401 tears the session down
//! (token cleared from memory, storage and the client).

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::api::{
    Ack, ApiError, BrainApi, CreatedContent, Credentials, PreviewSource, ShareLink, SharedBrain,
    SignedIn,
};
use crate::card::{ContentCard, PreviewRequest};
use crate::domain::{ContentId, ContentItem, ContentKind, Tag};
use crate::forms::{ContentDraft, TagOutcome, ValidationError};
use crate::grid::EMPTY_MESSAGE;
use crate::session::Session;

/// Failure of a dashboard operation
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("You need to sign in first.")]
    NotSignedIn,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to update session: {0:#}")]
    Session(#[source] anyhow::Error),
}

impl DashboardError {
    /// Message suitable for a user-facing notice
    pub fn user_message(&self) -> String {
        match self {
            DashboardError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Content type filter of the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Only(ContentKind),
}

impl Filter {
    pub fn matches(&self, item: &ContentItem) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(kind) => item.kind == *kind,
        }
    }

    /// Apply to a collection, keeping order
    pub fn apply(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        items.iter().filter(|i| self.matches(i)).cloned().collect()
    }

    /// Empty-state message for this filter
    pub fn empty_message(&self) -> String {
        match self {
            Filter::All => EMPTY_MESSAGE.to_string(),
            Filter::Only(kind) => format!(
                "No {} content found. Try a different filter or add new content.",
                kind
            ),
        }
    }
}

impl From<Option<ContentKind>> for Filter {
    fn from(kind: Option<ContentKind>) -> Self {
        kind.map(Filter::Only).unwrap_or_default()
    }
}

/// Session-aware application state
pub struct Dashboard<A> {
    api: A,
    session: Session,
}

impl<A: BrainApi> Dashboard<A> {
    /// Wire a client to a restored session
    pub fn new(mut api: A, session: Session) -> Self {
        api.set_token(session.token().map(str::to_string));
        Self { api, session }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Register an account; does not sign in
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<Ack, DashboardError> {
        Ok(self.api.sign_up(credentials).await?)
    }

    /// Sign in and persist the issued token
    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<SignedIn, DashboardError> {
        let signed_in = self.api.sign_in(credentials).await?;

        self.session
            .login(signed_in.access_token.clone())
            .map_err(DashboardError::Session)?;
        self.api.set_token(Some(signed_in.access_token.clone()));

        Ok(signed_in)
    }

    pub fn sign_out(&mut self) -> Result<(), DashboardError> {
        self.api.set_token(None);
        self.session.logout().map_err(DashboardError::Session)
    }

    fn require_session(&self) -> Result<(), DashboardError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(DashboardError::NotSignedIn)
        }
    }

    /// Tear the session down on 401, pass everything else through
    fn guard<T>(&mut self, result: Result<T, ApiError>) -> Result<T, DashboardError> {
        if let Err(e) = &result {
            if e.is_unauthorized() {
                self.expire_session();
            }
        }
        Ok(result?)
    }

    fn expire_session(&mut self) {
        if !self.session.is_authenticated() {
            return;
        }
        warn!("Session expired or invalid; signing out");
        self.api.set_token(None);
        if let Err(e) = self.session.logout() {
            error!("Failed to clear stored session: {:#}", e);
        }
    }

    /// All content of the signed-in user
    pub async fn load(&mut self) -> Result<Vec<ContentItem>, DashboardError> {
        self.require_session()?;
        let result = self.api.list_content().await;
        self.guard(result)
    }

    /// Content narrowed by a filter
    pub async fn load_filtered(&mut self, filter: Filter) -> Result<Vec<ContentItem>, DashboardError> {
        Ok(filter.apply(&self.load().await?))
    }

    /// Validate and submit a draft
    pub async fn add(&mut self, draft: &ContentDraft) -> Result<CreatedContent, DashboardError> {
        self.require_session()?;
        let body = draft.validate()?;
        let result = self.api.create_content(&body).await;
        self.guard(result)
    }

    /// Resolve a tag title into the draft
    pub async fn add_tag(
        &mut self,
        draft: &mut ContentDraft,
        title: &str,
    ) -> Result<TagOutcome, DashboardError> {
        self.require_session()?;
        let result = draft.add_tag(&self.api, title).await;
        self.guard(result)
    }

    /// Delete an item; callers confirm first and refetch afterwards
    pub async fn delete(&mut self, id: &ContentId) -> Result<Ack, DashboardError> {
        self.require_session()?;
        let result = self.api.delete_content(id).await;
        self.guard(result)
    }

    pub async fn find_tag(&mut self, title: &str) -> Result<Option<Tag>, DashboardError> {
        self.require_session()?;
        let result = self.api.find_tag(title).await;
        self.guard(result)
    }

    /// Create a tag, or get the existing one with that title
    pub async fn create_tag(&mut self, title: &str) -> Result<Tag, DashboardError> {
        self.require_session()?;
        let result = self.api.create_tag(title).await;
        self.guard(result)
    }

    pub async fn delete_tag(&mut self, tag_id: &str) -> Result<Ack, DashboardError> {
        self.require_session()?;
        let result = self.api.delete_tag(tag_id).await;
        self.guard(result)
    }

    /// Create (`true`) or delete (`false`) the public share link
    pub async fn share(&mut self, enable: bool) -> Result<ShareLink, DashboardError> {
        self.require_session()?;
        let result = self.api.set_sharing(enable).await;
        self.guard(result)
    }

    /// Someone's public collection; no session needed
    pub async fn shared(&self, hash: &str) -> Result<SharedBrain, DashboardError> {
        Ok(self.api.shared_brain(hash).await?)
    }
}

impl<A: BrainApi + PreviewSource> Dashboard<A> {
    /// Mount cards and resolve their link previews one after another
    ///
    /// Previews need a session; without one, generic links render bare.
    pub async fn cards(&mut self, items: &[ContentItem]) -> Vec<ContentCard> {
        let mut cards = Vec::with_capacity(items.len());

        for item in items {
            let (mut card, request) = ContentCard::mount(item.clone());
            if let Some(request) = request {
                self.resolve_preview(&mut card, request).await;
            }
            cards.push(card);
        }

        cards
    }

    async fn resolve_preview(&mut self, card: &mut ContentCard, request: PreviewRequest) {
        if !self.session.is_authenticated() {
            debug!("No session; skipping link preview for {}", request.url());
            card.skip_preview(&request);
            return;
        }

        let outcome = request.fetch(&self.api).await;
        if matches!(&outcome, Err(e) if e.is_unauthorized()) {
            self.expire_session();
        }
        card.commit_preview(&request, outcome);
    }
}

/// Mount cards without fetching any preview
pub fn cards_without_previews(items: &[ContentItem]) -> Vec<ContentCard> {
    items
        .iter()
        .map(|item| {
            let (mut card, request) = ContentCard::mount(item.clone());
            if let Some(request) = request {
                card.skip_preview(&request);
            }
            card
        })
        .collect()
}
