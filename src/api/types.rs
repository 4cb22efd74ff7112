//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::domain::{ContentItem, ContentKind, Tag};

use super::ApiError;

/// Username/password pair for sign-up and sign-in
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body of `POST /content`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContent {
    pub title: String,

    #[serde(rename = "typeofContent")]
    pub kind: ContentKind,

    pub link: String,

    /// Tag ids
    pub tags: Vec<String>,
}

/// Plain acknowledgement carrying the backend message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub message: String,
}

/// Successful sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub access_token: String,
    pub message: String,
}

/// Result of creating a content item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedContent {
    pub content_id: Option<String>,
    pub message: String,
}

/// Result of toggling the share link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    /// Present when sharing was enabled
    pub hash: Option<String>,
    pub message: String,
}

/// Shown when a shared collection has nothing in it
pub const SHARED_EMPTY_MESSAGE: &str = "This Second Brain currently has no shared content.";

/// Public read-only view of someone's collection
#[derive(Debug, Clone, PartialEq)]
pub struct SharedBrain {
    pub username: Option<String>,
    pub content: Vec<ContentItem>,
}

impl SharedBrain {
    /// Heading for the shared view
    pub fn heading(&self) -> String {
        let owner = self
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or("Shared User");
        format!("{}'s Second Brain", owner)
    }

    /// Empty-state message for the shared grid
    pub fn empty_message(&self) -> &'static str {
        SHARED_EMPTY_MESSAGE
    }
}

// ============================================================================
// Wire envelopes
// ============================================================================

fn succeeded() -> bool {
    true
}

/// Common `{success, message}` envelope fields
pub(crate) trait Envelope {
    fn success(&self) -> bool;
    fn message(&self) -> Option<&str>;

    /// Turn `success: false` into a rejection
    fn accept(self, fallback: &str) -> Result<Self, ApiError>
    where
        Self: Sized,
    {
        if self.success() {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                message: self.message().unwrap_or(fallback).to_string(),
            })
        }
    }
}

macro_rules! envelope {
    ($ty:ty) => {
        impl Envelope for $ty {
            fn success(&self) -> bool {
                self.success
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }
        }
    };
}

#[derive(Debug, Deserialize)]
pub(crate) struct AckBody {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInBody {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentListBody {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatedContentBody {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub content_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagBody {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tag: Option<Tag>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShareBody {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SharedBrainBody {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub content: Option<Vec<ContentItem>>,
}

/// Shape of error bodies on non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

envelope!(AckBody);
envelope!(ContentListBody);
envelope!(CreatedContentBody);
envelope!(TagBody);
envelope!(ShareBody);
envelope!(SharedBrainBody);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_content_wire_names() {
        let body = NewContent {
            title: "Notes".to_string(),
            kind: ContentKind::Text,
            link: "line one\nline two".to_string(),
            tags: vec!["t1".to_string()],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["typeofContent"], "text");
        assert_eq!(json["link"], "line one\nline two");
        assert_eq!(json["tags"][0], "t1");
    }

    #[test]
    fn test_envelope_rejects_unsuccessful_body() {
        let body: TagBody =
            serde_json::from_str(r#"{"success": false, "message": "Tag not found"}"#).unwrap();
        let err = body.accept("Tag lookup failed").unwrap_err();
        assert!(matches!(err, ApiError::Rejected { ref message } if message == "Tag not found"));
    }

    #[test]
    fn test_envelope_success_defaults_to_true() {
        let body: AckBody = serde_json::from_str(r#"{"message": "Deleted"}"#).unwrap();
        assert!(body.accept("x").is_ok());
    }

    #[test]
    fn test_shared_brain_heading() {
        let named = SharedBrain {
            username: Some("ada".to_string()),
            content: Vec::new(),
        };
        assert_eq!(named.heading(), "ada's Second Brain");

        let anonymous = SharedBrain {
            username: None,
            content: Vec::new(),
        };
        assert_eq!(anonymous.heading(), "Shared User's Second Brain");
        assert_eq!(
            anonymous.empty_message(),
            "This Second Brain currently has no shared content."
        );
    }
}
