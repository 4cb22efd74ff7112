//! Saved content items as the backend returns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque content identifier assigned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared type of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Web link (may be a video host link)
    Link,

    /// Image URL
    Image,

    /// Video file URL
    Video,

    /// Plain text snippet stored in the payload
    Text,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [
        ContentKind::Link,
        ContentKind::Image,
        ContentKind::Video,
        ContentKind::Text,
    ];

    /// Whether the payload of this kind must be a URL
    pub fn expects_url(self) -> bool {
        !matches!(self, ContentKind::Text)
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Link => write!(f, "link"),
            ContentKind::Image => write!(f, "image"),
            ContentKind::Video => write!(f, "video"),
            ContentKind::Text => write!(f, "text"),
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "link" | "url" => Ok(ContentKind::Link),
            "image" | "img" => Ok(ContentKind::Image),
            "video" => Ok(ContentKind::Video),
            "text" | "note" => Ok(ContentKind::Text),
            _ => anyhow::bail!("Unknown content type: {}", s),
        }
    }
}

/// Tag attached to a content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,
}

impl Tag {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// Owner of a content item (populated by the backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(default)]
    pub username: String,
}

/// `userId` as sent by the backend: populated document or bare id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    Populated(Owner),
    Id(String),
}

impl OwnerRef {
    pub fn id(&self) -> &str {
        match self {
            OwnerRef::Populated(owner) => &owner.id,
            OwnerRef::Id(id) => id,
        }
    }

    /// Only known when the backend populated the owner
    pub fn username(&self) -> Option<&str> {
        match self {
            OwnerRef::Populated(owner) => Some(owner.username.as_str()).filter(|u| !u.is_empty()),
            OwnerRef::Id(_) => None,
        }
    }
}

/// A single saved bookmark or snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(rename = "_id")]
    pub id: ContentId,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "typeofContent")]
    pub kind: ContentKind,

    /// URL for link/image/video, raw body for text
    #[serde(rename = "link", default)]
    pub payload: Option<String>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    #[serde(rename = "userId", default)]
    pub owner: Option<OwnerRef>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Create a content item (mostly useful for tests and fixtures)
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        kind: ContentKind,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            id: ContentId::new(id),
            title: title.into(),
            kind,
            payload: Some(payload.into()),
            tags: Vec::new(),
            owner: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Attach a tag
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Payload, treating an empty string as absent
    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref().filter(|p| !p.is_empty())
    }

    /// Header title: the item title, the URL for untitled links, else "Untitled"
    pub fn display_title(&self) -> &str {
        if !self.title.is_empty() {
            return &self.title;
        }
        match (self.kind, self.payload()) {
            (ContentKind::Link, Some(link)) => link,
            _ => "Untitled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_from_str() {
        assert_eq!("link".parse::<ContentKind>().unwrap(), ContentKind::Link);
        assert_eq!("IMAGE".parse::<ContentKind>().unwrap(), ContentKind::Image);
        assert_eq!("note".parse::<ContentKind>().unwrap(), ContentKind::Text);
        assert!("audio".parse::<ContentKind>().is_err());
    }

    #[test]
    fn test_content_item_wire_format() {
        let json = r#"{
            "_id": "c1",
            "title": "Rust book",
            "typeofContent": "link",
            "link": "https://doc.rust-lang.org/book/",
            "tags": [{"_id": "t1", "title": "rust"}],
            "userId": {"_id": "u1", "username": "ada"},
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-01T10:00:00Z",
            "__v": 0
        }"#;

        let item: ContentItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id.as_str(), "c1");
        assert_eq!(item.kind, ContentKind::Link);
        assert_eq!(item.payload(), Some("https://doc.rust-lang.org/book/"));
        assert_eq!(item.tags, vec![Tag::new("t1", "rust")]);
        assert_eq!(item.owner.unwrap().username(), Some("ada"));
        assert!(item.created_at.is_some());
    }

    #[test]
    fn test_unpopulated_owner_is_accepted() {
        let json = r#"{"_id": "c1", "title": "x", "typeofContent": "link", "userId": "u1"}"#;

        let item: ContentItem = serde_json::from_str(json).unwrap();
        let owner = item.owner.unwrap();
        assert_eq!(owner, OwnerRef::Id("u1".to_string()));
        assert_eq!(owner.id(), "u1");
        assert_eq!(owner.username(), None);
    }

    #[test]
    fn test_unknown_content_type_is_rejected() {
        let json = r#"{"_id": "c1", "title": "x", "typeofContent": "audio"}"#;
        assert!(serde_json::from_str::<ContentItem>(json).is_err());
    }

    #[test]
    fn test_display_title_fallbacks() {
        let titled = ContentItem::new("1", "Title", ContentKind::Link, "https://a.b");
        assert_eq!(titled.display_title(), "Title");

        let link = ContentItem::new("2", "", ContentKind::Link, "https://a.b");
        assert_eq!(link.display_title(), "https://a.b");

        let text = ContentItem::new("3", "", ContentKind::Text, "hello");
        assert_eq!(text.display_title(), "Untitled");
    }
}
