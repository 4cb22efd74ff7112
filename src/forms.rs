//! New-content form: validation and tag selection.
//!
//! Validation runs before any request is made. Tags are resolved by
//! title: an existing tag is reused, a missing one is created.

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::api::{ApiError, BrainApi, NewContent};
use crate::domain::{ContentKind, Tag};
use crate::notice::Notice;

/// Input problems caught before submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required.")]
    MissingTitle,

    #[error("Link is required for selected content type.")]
    MissingLink,

    #[error("Please enter a valid URL for the link/image/video.")]
    InvalidUrl,
}

/// Result of adding a tag to a draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOutcome {
    /// Blank input, nothing to do
    Ignored,
    /// Already selected (case-insensitive)
    Duplicate(String),
    /// Reused a tag the backend already had
    Existing(Tag),
    /// Created a new tag
    Created(Tag),
}

impl TagOutcome {
    /// User-facing notice, if the outcome warrants one
    pub fn notice(&self) -> Option<Notice> {
        match self {
            TagOutcome::Ignored => None,
            TagOutcome::Duplicate(title) => {
                Some(Notice::error(format!("Tag \"{}\" is already added.", title)))
            }
            TagOutcome::Existing(tag) => {
                Some(Notice::success(format!("Using existing tag: \"{}\"", tag.title)))
            }
            TagOutcome::Created(tag) => {
                Some(Notice::success(format!("New tag \"{}\" created.", tag.title)))
            }
        }
    }
}

/// Content being composed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDraft {
    pub title: String,
    pub kind: ContentKind,
    /// URL, or the body for text content
    pub link: String,
    selected_tags: Vec<Tag>,
}

impl Default for ContentDraft {
    fn default() -> Self {
        Self::new(ContentKind::Link)
    }
}

impl ContentDraft {
    pub fn new(kind: ContentKind) -> Self {
        Self {
            title: String::new(),
            kind,
            link: String::new(),
            selected_tags: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn tags(&self) -> &[Tag] {
        &self.selected_tags
    }

    /// Check the draft and build the request body
    pub fn validate(&self) -> Result<NewContent, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let link = self.link.trim();
        if link.is_empty() && self.kind != ContentKind::Text {
            return Err(ValidationError::MissingLink);
        }
        if self.kind.expects_url() && Url::parse(link).is_err() {
            return Err(ValidationError::InvalidUrl);
        }

        Ok(NewContent {
            title: title.to_string(),
            kind: self.kind,
            link: link.to_string(),
            tags: self.selected_tags.iter().map(|t| t.id.clone()).collect(),
        })
    }

    /// Resolve a tag by title and select it
    ///
    /// Lookup errors other than not-found abort without changing the draft.
    pub async fn add_tag<A>(&mut self, api: &A, input: &str) -> Result<TagOutcome, ApiError>
    where
        A: BrainApi + ?Sized,
    {
        let title = input.trim();
        if title.is_empty() {
            return Ok(TagOutcome::Ignored);
        }

        let lowered = title.to_lowercase();
        if self
            .selected_tags
            .iter()
            .any(|t| t.title.to_lowercase() == lowered)
        {
            return Ok(TagOutcome::Duplicate(title.to_string()));
        }

        let outcome = match api.find_tag(title).await? {
            Some(tag) => TagOutcome::Existing(tag),
            None => {
                debug!("Creating tag '{}'", title);
                TagOutcome::Created(api.create_tag(title).await?)
            }
        };

        if let TagOutcome::Existing(tag) | TagOutcome::Created(tag) = &outcome {
            self.selected_tags.push(tag.clone());
        }

        Ok(outcome)
    }

    /// Deselect a tag by id
    pub fn remove_tag(&mut self, tag_id: &str) -> bool {
        let before = self.selected_tags.len();
        self.selected_tags.retain(|t| t.id != tag_id);
        self.selected_tags.len() != before
    }

    /// Back to an empty link draft
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
