//! Content cards.
//!
//! A [`ContentCard`] owns one content item plus its component-local state:
//! link-preview resolution and media-load failures. [`ContentCard::view`]
//! folds that state into a [`CardView`] following the fallback chain for
//! each content type; [`render`] turns views into terminal text.

pub mod classifier;
pub mod clipboard;
pub mod preview;
pub mod render;

use tracing::error;
use url::Url;

use crate::api::PreviewSource;
use crate::domain::{ContentId, ContentItem, ContentKind};
use crate::notice::Notice;

pub use classifier::{classify, video_embed, EmbedSource, Presentation, VideoEmbed};
pub use clipboard::{Clipboard, SystemClipboard};
pub use preview::{Commit, PreviewOutcome, PreviewRequest, PreviewResolver, PreviewState};

pub const PREVIEW_IMAGE_PLACEHOLDER: &str =
    "https://placehold.co/400x160/cccccc/333333?text=Preview+Image+Error";
pub const IMAGE_PLACEHOLDER: &str =
    "https://placehold.co/400x200/cccccc/333333?text=Image+Load+Error";
pub const VIDEO_MIME: &str = "video/mp4";
pub const VIDEO_FALLBACK: &str = "Your browser does not support the video tag.";
pub const DEFAULT_PLAYER_TITLE: &str = "YouTube video";

/// Roughly two lines of card text
const DESCRIPTION_LIMIT: usize = 160;

/// Media element that can fail to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    /// Preview thumbnail of a generic link
    Thumbnail,
    /// Image content
    Image,
    /// Video content
    Video,
}

/// Preview card contents for a generic link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCard {
    /// Click target: canonical URL, else the saved link
    pub href: String,
    pub thumbnail: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// Hostname of the saved link
    pub hostname: Option<String>,
}

/// Body of a card, one variant per render mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBody {
    /// 16:9 embedded player with the original URL underneath
    EmbeddedVideo {
        embed_url: String,
        player_title: String,
        original_url: String,
        best_effort: bool,
    },
    Preview(PreviewCard),
    LoadingPreview,
    BareLink(String),
    NoLink,
    Image {
        src: String,
        alt: String,
    },
    NoImage,
    Video {
        src: String,
        mime: &'static str,
        fallback: &'static str,
        failed: bool,
    },
    NoVideo,
    /// Payload verbatim; never markup
    Text(String),
}

/// Everything needed to draw a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: ContentId,
    pub kind: ContentKind,
    pub title: String,
    pub body: CardBody,
    pub tags: Vec<String>,
    /// Copy-link affordance is offered
    pub can_copy: bool,
}

/// A content item with its card-local state
#[derive(Debug)]
pub struct ContentCard {
    item: ContentItem,
    preview: PreviewResolver,
    thumbnail_failed: bool,
    media_failed: bool,
}

impl ContentCard {
    /// Create a card; returns the preview fetch to issue, if any
    pub fn mount(item: ContentItem) -> (Self, Option<PreviewRequest>) {
        let mut card = Self {
            item,
            preview: PreviewResolver::new(),
            thumbnail_failed: false,
            media_failed: false,
        };
        let request = card.observe();
        (card, request)
    }

    /// Swap in new props; returns the preview fetch to issue, if any
    pub fn update(&mut self, item: ContentItem) -> Option<PreviewRequest> {
        if item.kind != self.item.kind || item.payload != self.item.payload {
            self.thumbnail_failed = false;
            self.media_failed = false;
        }
        self.item = item;
        self.observe()
    }

    fn observe(&mut self) -> Option<PreviewRequest> {
        self.preview
            .observe(self.item.kind, self.item.payload.as_deref())
    }

    pub fn item(&self) -> &ContentItem {
        &self.item
    }

    pub fn preview_state(&self) -> &PreviewState {
        self.preview.state()
    }

    /// Apply a preview fetch result; stale results are dropped
    pub fn commit_preview(&mut self, request: &PreviewRequest, outcome: PreviewOutcome) -> Commit {
        self.preview.commit(request, outcome)
    }

    /// Settle a preview request without fetching it
    pub fn skip_preview(&mut self, request: &PreviewRequest) -> Commit {
        self.preview.skip(request)
    }

    /// Fetch and commit in one go (sequential callers)
    pub async fn load_preview<S>(&mut self, source: &S, request: PreviewRequest) -> Commit
    where
        S: PreviewSource + ?Sized,
    {
        let outcome = request.fetch(source).await;
        self.commit_preview(&request, outcome)
    }

    /// A media element failed to load; swap in its placeholder
    pub fn media_error(&mut self, slot: MediaSlot) {
        match slot {
            MediaSlot::Thumbnail => self.thumbnail_failed = true,
            MediaSlot::Image | MediaSlot::Video => self.media_failed = true,
        }
    }

    /// Copy the payload to the clipboard; `None` when there is nothing to copy
    pub fn copy_link(&self, clipboard: &dyn Clipboard) -> Option<Notice> {
        let link = self.item.payload()?;

        Some(match clipboard.write_text(link) {
            Ok(()) => Notice::success("Link copied to clipboard!"),
            Err(e) => {
                error!("Failed to copy link: {:#}", e);
                Notice::error("Failed to copy link.")
            }
        })
    }

    /// Hand the item id to the parent's delete handler
    pub fn request_delete<F, R>(&self, on_delete: F) -> R
    where
        F: FnOnce(&ContentId) -> R,
    {
        on_delete(&self.item.id)
    }

    /// Resolve the current render mode
    pub fn view(&self) -> CardView {
        CardView {
            id: self.item.id.clone(),
            kind: self.item.kind,
            title: self.item.display_title().to_string(),
            body: self.body(),
            tags: self.item.tags.iter().map(|t| t.title.clone()).collect(),
            can_copy: self.item.payload().is_some(),
        }
    }

    fn body(&self) -> CardBody {
        match classify(self.item.kind, self.item.payload.as_deref()) {
            Presentation::EmbeddedVideo { embed, url } => CardBody::EmbeddedVideo {
                player_title: self
                    .preview
                    .preview()
                    .and_then(|p| p.title())
                    .or_else(|| Some(self.item.title.as_str()).filter(|t| !t.is_empty()))
                    .unwrap_or(DEFAULT_PLAYER_TITLE)
                    .to_string(),
                best_effort: !embed.is_reliable(),
                embed_url: embed.embed_url,
                original_url: url.to_string(),
            },
            Presentation::GenericLink(link) => self.link_body(link),
            Presentation::Image(Some(src)) => CardBody::Image {
                src: if self.media_failed {
                    IMAGE_PLACEHOLDER.to_string()
                } else {
                    src.to_string()
                },
                alt: Some(self.item.title.as_str())
                    .filter(|t| !t.is_empty())
                    .unwrap_or("Content Image")
                    .to_string(),
            },
            Presentation::Image(None) => CardBody::NoImage,
            Presentation::VideoFile(Some(src)) => CardBody::Video {
                src: src.to_string(),
                mime: VIDEO_MIME,
                fallback: VIDEO_FALLBACK,
                failed: self.media_failed,
            },
            Presentation::VideoFile(None) => CardBody::NoVideo,
            Presentation::Text(body) => CardBody::Text(body.to_string()),
        }
    }

    /// Fallback chain for non-video links
    fn link_body(&self, link: Option<&str>) -> CardBody {
        if let Some(preview) = self.preview.preview() {
            let fallback = link.unwrap_or_default();
            return CardBody::Preview(PreviewCard {
                href: preview.url().unwrap_or(fallback).to_string(),
                thumbnail: preview.image().map(|src| {
                    if self.thumbnail_failed {
                        PREVIEW_IMAGE_PLACEHOLDER.to_string()
                    } else {
                        src.to_string()
                    }
                }),
                title: preview.title().unwrap_or(fallback).to_string(),
                description: preview
                    .description()
                    .map(|d| truncate(d, DESCRIPTION_LIMIT)),
                hostname: link.and_then(hostname),
            });
        }

        if self.preview.is_loading() {
            return CardBody::LoadingPreview;
        }

        match link {
            Some(link) => CardBody::BareLink(link.to_string()),
            None => CardBody::NoLink,
        }
    }
}

/// Hostname of a URL, if it parses
pub fn hostname(link: &str) -> Option<String> {
    Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Cut text to `max` characters, marking the cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
