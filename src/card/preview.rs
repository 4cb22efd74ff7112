//! Link preview resolution with stale-result detection.
//!
//! The resolver never awaits anything itself. [`PreviewResolver::observe`]
//! hands out at most one [`PreviewRequest`] per (type, payload) change; the
//! caller runs the fetch and feeds the outcome back through
//! [`PreviewResolver::commit`]. A request whose key is no longer current is
//! discarded without touching state. The transport is never aborted.

use tracing::{debug, warn};

use crate::api::{ApiError, PreviewSource};
use crate::domain::{ContentKind, LinkPreview};

use super::classifier::classify;

/// Result of one preview fetch
pub type PreviewOutcome = Result<LinkPreview, ApiError>;

/// Props a preview was requested for
#[derive(Debug, Clone, PartialEq, Eq)]
struct PreviewKey {
    kind: ContentKind,
    payload: Option<String>,
}

/// A preview fetch that has been issued and not yet committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    generation: u64,
    url: String,
}

impl PreviewRequest {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the fetch; does not borrow the resolver
    pub async fn fetch<S>(&self, source: &S) -> PreviewOutcome
    where
        S: PreviewSource + ?Sized,
    {
        source.link_preview(&self.url).await
    }
}

/// What the card currently knows about the preview
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    /// No preview applies (or none requested yet)
    #[default]
    Idle,
    Loading,
    Ready(LinkPreview),
    /// Fetch failed; render the bare link
    Unavailable,
}

/// Whether a completion changed state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    Stale,
}

/// Per-card preview state machine
#[derive(Debug, Default)]
pub struct PreviewResolver {
    key: Option<PreviewKey>,
    generation: u64,
    /// Generation of the request still awaiting its result
    pending: Option<u64>,
    state: PreviewState,
}

impl PreviewResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// React to the displayed item's (type, payload)
    ///
    /// Returns the one fetch to issue, or `None` when the pair is unchanged
    /// or no preview applies. Any previous preview is cleared immediately.
    pub fn observe(&mut self, kind: ContentKind, payload: Option<&str>) -> Option<PreviewRequest> {
        let key = PreviewKey {
            kind,
            payload: payload.map(str::to_string),
        };
        if self.key.as_ref() == Some(&key) {
            return None;
        }

        self.key = Some(key);
        self.generation += 1;
        self.pending = None;
        self.state = PreviewState::Idle;

        let url = classify(kind, payload).preview_url()?.to_string();

        self.pending = Some(self.generation);
        self.state = PreviewState::Loading;
        debug!("Requesting link preview for {} (generation {})", url, self.generation);

        Some(PreviewRequest {
            generation: self.generation,
            url,
        })
    }

    /// Whether a request still matches the current props
    pub fn is_current(&self, request: &PreviewRequest) -> bool {
        self.pending == Some(request.generation)
            && self
                .key
                .as_ref()
                .and_then(|k| k.payload.as_deref())
                == Some(request.url.as_str())
    }

    /// Apply a fetch result if its request is still current
    pub fn commit(&mut self, request: &PreviewRequest, outcome: PreviewOutcome) -> Commit {
        if !self.is_current(request) {
            debug!(
                "Discarding stale link preview for {} (generation {}, current {})",
                request.url, request.generation, self.generation
            );
            return Commit::Stale;
        }

        self.pending = None;
        self.state = match outcome {
            Ok(preview) => PreviewState::Ready(preview),
            Err(e) => {
                warn!("Error fetching link preview for {}: {}", request.url, e);
                PreviewState::Unavailable
            }
        };

        Commit::Applied
    }

    /// Give up on a request without fetching; links render bare
    pub fn skip(&mut self, request: &PreviewRequest) -> Commit {
        if !self.is_current(request) {
            return Commit::Stale;
        }
        self.pending = None;
        self.state = PreviewState::Unavailable;
        Commit::Applied
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn preview(&self) -> Option<&LinkPreview> {
        match &self.state {
            PreviewState::Ready(preview) => Some(preview),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PreviewState::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview(title: &str) -> LinkPreview {
        LinkPreview {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn failure() -> ApiError {
        ApiError::Status {
            status: 502,
            message: "Bad Gateway".to_string(),
        }
    }

    #[test]
    fn test_generic_link_issues_one_request() {
        let mut resolver = PreviewResolver::new();

        let request = resolver
            .observe(ContentKind::Link, Some("https://example.com"))
            .unwrap();
        assert_eq!(request.url(), "https://example.com");
        assert!(resolver.is_loading());

        // Same props again: nothing new
        assert!(resolver
            .observe(ContentKind::Link, Some("https://example.com"))
            .is_none());

        assert_eq!(resolver.commit(&request, Ok(preview("Example"))), Commit::Applied);
        assert_eq!(resolver.preview().unwrap().title(), Some("Example"));
    }

    #[test]
    fn test_suppressed_for_embeds_and_other_types() {
        let mut resolver = PreviewResolver::new();
        assert!(resolver
            .observe(ContentKind::Link, Some("https://youtu.be/dQw4w9WgXcQ"))
            .is_none());
        assert!(resolver.observe(ContentKind::Text, Some("hello")).is_none());
        assert!(resolver
            .observe(ContentKind::Image, Some("https://example.com/a.png"))
            .is_none());
        assert!(resolver.observe(ContentKind::Link, None).is_none());
        assert_eq!(resolver.state(), &PreviewState::Idle);
    }

    #[test]
    fn test_new_url_clears_previous_preview_immediately() {
        let mut resolver = PreviewResolver::new();
        let first = resolver
            .observe(ContentKind::Link, Some("https://a.example"))
            .unwrap();
        resolver.commit(&first, Ok(preview("A")));
        assert!(resolver.preview().is_some());

        resolver.observe(ContentKind::Link, Some("https://b.example"));
        assert!(resolver.preview().is_none());
        assert!(resolver.is_loading());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut resolver = PreviewResolver::new();

        let a = resolver
            .observe(ContentKind::Link, Some("https://a.example"))
            .unwrap();
        let b = resolver
            .observe(ContentKind::Link, Some("https://b.example"))
            .unwrap();

        assert_eq!(resolver.commit(&b, Ok(preview("B"))), Commit::Applied);
        assert_eq!(resolver.commit(&a, Ok(preview("A"))), Commit::Stale);
        assert_eq!(resolver.preview().unwrap().title(), Some("B"));
    }

    #[test]
    fn test_returning_to_an_old_url_does_not_revive_old_requests() {
        let mut resolver = PreviewResolver::new();

        let first_a = resolver
            .observe(ContentKind::Link, Some("https://a.example"))
            .unwrap();
        resolver.observe(ContentKind::Link, Some("https://b.example"));
        let second_a = resolver
            .observe(ContentKind::Link, Some("https://a.example"))
            .unwrap();

        assert_eq!(resolver.commit(&first_a, Ok(preview("old"))), Commit::Stale);
        assert!(resolver.is_loading());
        assert_eq!(resolver.commit(&second_a, Ok(preview("new"))), Commit::Applied);
        assert_eq!(resolver.preview().unwrap().title(), Some("new"));
    }

    #[test]
    fn test_a_result_is_committed_only_once() {
        let mut resolver = PreviewResolver::new();
        let request = resolver
            .observe(ContentKind::Link, Some("https://a.example"))
            .unwrap();

        assert_eq!(resolver.commit(&request, Err(failure())), Commit::Applied);
        assert_eq!(resolver.commit(&request, Ok(preview("late"))), Commit::Stale);
        assert_eq!(resolver.state(), &PreviewState::Unavailable);
    }

    #[test]
    fn test_type_change_invalidates_pending_request() {
        let mut resolver = PreviewResolver::new();
        let request = resolver
            .observe(ContentKind::Link, Some("https://a.example"))
            .unwrap();

        assert!(resolver
            .observe(ContentKind::Text, Some("https://a.example"))
            .is_none());
        assert_eq!(resolver.commit(&request, Ok(preview("A"))), Commit::Stale);
        assert_eq!(resolver.state(), &PreviewState::Idle);
    }

    #[test]
    fn test_skip_settles_without_a_result() {
        let mut resolver = PreviewResolver::new();
        let request = resolver
            .observe(ContentKind::Link, Some("https://a.example"))
            .unwrap();

        assert_eq!(resolver.skip(&request), Commit::Applied);
        assert_eq!(resolver.state(), &PreviewState::Unavailable);
        assert_eq!(resolver.commit(&request, Ok(preview("late"))), Commit::Stale);
    }
}
