//! Link preview metadata returned by the preview proxy.

use serde::{Deserialize, Serialize};

/// Metadata about a linked page. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPreview {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Thumbnail URL
    #[serde(default)]
    pub image: Option<String>,

    /// Canonical URL of the previewed page
    #[serde(default)]
    pub url: Option<String>,

    /// e.g. "website", "article", "video"
    #[serde(default, rename = "type")]
    pub page_type: Option<String>,
}

impl LinkPreview {
    pub fn title(&self) -> Option<&str> {
        non_empty(self.title.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        non_empty(self.description.as_deref())
    }

    pub fn image(&self) -> Option<&str> {
        non_empty(self.image.as_deref())
    }

    pub fn url(&self) -> Option<&str> {
        non_empty(self.url.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
