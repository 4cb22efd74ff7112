//! Decides how a content item is presented.
//!
//! Links are checked against two video-host patterns:
//! - canonical YouTube URLs (watch, embed, `v/`, youtu.be short links),
//!   which always yield an 11-character id;
//! - googleusercontent.com YouTube proxy URLs, whose id is taken as-is and
//!   may not be a valid video id. Those embeds are best-effort.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::domain::ContentKind;

const EMBED_PREFIX: &str = "https://www.youtube.com/embed/";

static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:m\.)?(?:youtube\.com|youtu\.be)/(?:watch\?v=|embed/|v/|)([A-Za-z0-9_-]{11})(?:\S+)?",
    )
    .expect("hardcoded youtube regex is invalid - fix source code")
});

static YOUTUBE_PROXY_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"http://googleusercontent\.com/youtube\.com/([A-Za-z0-9_-]+)(?:/.*)?$")
        .expect("hardcoded youtube proxy regex is invalid - fix source code")
});

/// Which pattern produced an embed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedSource {
    /// youtube.com / youtu.be; id is exactly 11 characters
    Canonical,
    /// googleusercontent.com proxy; id length unchecked
    Proxy,
}

/// Embeddable video derived from a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEmbed {
    pub video_id: String,
    pub embed_url: String,
    pub source: EmbedSource,
}

impl VideoEmbed {
    fn new(video_id: &str, source: EmbedSource) -> Self {
        Self {
            video_id: video_id.to_string(),
            embed_url: format!("{}{}", EMBED_PREFIX, video_id),
            source,
        }
    }

    /// False when the id came from the proxy pattern and may not embed
    pub fn is_reliable(&self) -> bool {
        self.source == EmbedSource::Canonical
    }
}

/// Presentation mode of a content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation<'a> {
    /// Link to a known video host, shown as an embedded player
    EmbeddedVideo { embed: VideoEmbed, url: &'a str },

    /// Any other link; resolved through a link preview when present
    GenericLink(Option<&'a str>),

    Image(Option<&'a str>),

    VideoFile(Option<&'a str>),

    /// Literal text body
    Text(&'a str),
}

impl Presentation<'_> {
    /// URL a link preview should be fetched for, if any
    pub fn preview_url(&self) -> Option<&str> {
        match self {
            Presentation::GenericLink(url) => *url,
            _ => None,
        }
    }
}

/// Match a URL against the video-host patterns
pub fn video_embed(url: &str) -> Option<VideoEmbed> {
    if let Some(id) = YOUTUBE_URL.captures(url).and_then(|c| c.get(1)) {
        return Some(VideoEmbed::new(id.as_str(), EmbedSource::Canonical));
    }

    YOUTUBE_PROXY_URL
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|id| VideoEmbed::new(id.as_str(), EmbedSource::Proxy))
}

/// Classify a content item by its declared type and payload
///
/// Empty payloads are treated as absent.
pub fn classify(kind: ContentKind, payload: Option<&str>) -> Presentation<'_> {
    let payload = payload.filter(|p| !p.is_empty());

    match kind {
        ContentKind::Link => {
            let Some(url) = payload else {
                return Presentation::GenericLink(None);
            };

            match video_embed(url) {
                Some(embed) => {
                    if !embed.is_reliable() {
                        warn!(
                            "Embedding a googleusercontent.com YouTube link; id '{}' may not be a valid 11-character video id",
                            embed.video_id
                        );
                    }
                    Presentation::EmbeddedVideo { embed, url }
                }
                None => Presentation::GenericLink(Some(url)),
            }
        }
        ContentKind::Image => Presentation::Image(payload),
        ContentKind::Video => Presentation::VideoFile(payload),
        ContentKind::Text => Presentation::Text(payload.unwrap_or_default()),
    }
}
