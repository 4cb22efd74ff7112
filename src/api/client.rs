//! HTTP implementation of the backend API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::config::ResolvedConfig;
use crate::domain::{ContentId, ContentItem, LinkPreview, Tag};

use super::types::{
    AckBody, ContentListBody, CreatedContentBody, Envelope, ErrorBody, ShareBody, SharedBrainBody,
    SignInBody, TagBody,
};
use super::{
    Ack, ApiError, BrainApi, CreatedContent, Credentials, NewContent, PreviewSource, ShareLink,
    SharedBrain, SignedIn,
};

/// Message the backend uses when a tag lookup misses
const TAG_NOT_FOUND: &str = "Tag not found";

/// Whether a request carries the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Public,
    Bearer,
}

/// Second Brain REST client
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL, e.g. http://localhost:3000/api/v1
    base_url: String,
    /// Session token, if signed in
    token: Option<String>,
    /// HTTP client
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client with default HTTP settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.api_url.clone(),
            token: None,
            client,
        })
    }

    /// Attach a token (builder style)
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL below the base URL
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// Endpoint with one extra, percent-encoded path segment
    fn endpoint_with_segment(&self, path: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .push(segment);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, auth: Auth) -> RequestBuilder {
        debug!("{} {}", method, url.path());
        let builder = self.client.request(method, url);
        match (auth, &self.token) {
            (Auth::Bearer, Some(token)) => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// Send a request and decode the JSON body, mapping HTTP failures
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("Unauthorized: token expired or invalid");
                Err(ApiError::Unauthorized { message })
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound { message }),
            _ => Err(ApiError::Status {
                status: status.as_u16(),
                message,
            }),
        }
    }
}

/// Pull a human-readable message out of an error body
fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}

/// Tag lookup miss: a 404, or any rejection whose message mentions it
fn is_missing_tag(err: &ApiError) -> bool {
    match err {
        ApiError::NotFound { .. } => true,
        ApiError::Status { message, .. } | ApiError::Rejected { message } => message
            .to_lowercase()
            .contains(&TAG_NOT_FOUND.to_lowercase()),
        _ => false,
    }
}

#[async_trait]
impl BrainApi for ApiClient {
    fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Ack, ApiError> {
        let url = self.endpoint("signup")?;
        let body: AckBody = self
            .send(self.request(Method::POST, url, Auth::Public).json(credentials))
            .await?;
        let body = body.accept("Sign up failed. Please try again.")?;

        Ok(Ack {
            message: body
                .message
                .unwrap_or_else(|| "Account created successfully! Please sign in.".to_string()),
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignedIn, ApiError> {
        let url = self.endpoint("signin")?;
        let body: SignInBody = self
            .send(self.request(Method::POST, url, Auth::Public).json(credentials))
            .await?;

        match body.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(SignedIn {
                access_token,
                message: body.message.unwrap_or_else(|| "Login successful.".to_string()),
            }),
            None => Err(ApiError::Rejected {
                message: body
                    .message
                    .unwrap_or_else(|| "Sign in failed. Please try again.".to_string()),
            }),
        }
    }

    async fn list_content(&self) -> Result<Vec<ContentItem>, ApiError> {
        let url = self.endpoint("content")?;
        let body: ContentListBody = self.send(self.request(Method::GET, url, Auth::Bearer)).await?;
        Ok(body.accept("Failed to fetch content.")?.content)
    }

    async fn create_content(&self, content: &NewContent) -> Result<CreatedContent, ApiError> {
        let url = self.endpoint("content")?;
        let body: CreatedContentBody = self
            .send(self.request(Method::POST, url, Auth::Bearer).json(content))
            .await?;
        let body = body.accept("Failed to add content.")?;

        Ok(CreatedContent {
            content_id: body.content_id,
            message: body.message.unwrap_or_else(|| "Content added.".to_string()),
        })
    }

    async fn delete_content(&self, id: &ContentId) -> Result<Ack, ApiError> {
        let url = self.endpoint("content")?;
        let body: AckBody = self
            .send(
                self.request(Method::DELETE, url, Auth::Bearer)
                    .json(&json!({ "contentId": id.as_str() })),
            )
            .await?;
        let body = body.accept("Failed to delete content.")?;

        Ok(Ack {
            message: body.message.unwrap_or_else(|| "Content deleted.".to_string()),
        })
    }

    async fn create_tag(&self, title: &str) -> Result<Tag, ApiError> {
        let url = self.endpoint("tag")?;
        let body: TagBody = self
            .send(
                self.request(Method::POST, url, Auth::Bearer)
                    .json(&json!({ "title": title })),
            )
            .await?;
        let fallback = format!("Failed to create tag: {}", title);
        let body = body.accept(&fallback)?;

        body.tag.ok_or(ApiError::Rejected { message: fallback })
    }

    async fn find_tag(&self, title: &str) -> Result<Option<Tag>, ApiError> {
        let url = self.endpoint_with_segment("tag", title)?;
        let result: Result<TagBody, ApiError> = self
            .send(self.request(Method::GET, url, Auth::Bearer))
            .await
            .and_then(|body: TagBody| body.accept(TAG_NOT_FOUND));

        match result {
            Ok(body) => Ok(body.tag),
            Err(err) if is_missing_tag(&err) => {
                debug!("Tag '{}' does not exist yet", title);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn delete_tag(&self, tag_id: &str) -> Result<Ack, ApiError> {
        let url = self.endpoint("tag")?;
        let body: AckBody = self
            .send(
                self.request(Method::DELETE, url, Auth::Bearer)
                    .json(&json!({ "tagId": tag_id })),
            )
            .await?;
        let body = body.accept("Failed to delete tag.")?;

        Ok(Ack {
            message: body.message.unwrap_or_else(|| "Tag deleted.".to_string()),
        })
    }

    async fn set_sharing(&self, share: bool) -> Result<ShareLink, ApiError> {
        let url = self.endpoint("brain/share")?;
        let body: ShareBody = self
            .send(
                self.request(Method::POST, url, Auth::Bearer)
                    .json(&json!({ "share": share })),
            )
            .await?;
        let fallback = if share {
            "Failed to generate share link."
        } else {
            "Failed to delete share link."
        };
        let body = body.accept(fallback)?;

        Ok(ShareLink {
            hash: body.hash.filter(|h| !h.is_empty()),
            message: body.message.unwrap_or_default(),
        })
    }

    async fn shared_brain(&self, hash: &str) -> Result<SharedBrain, ApiError> {
        let url = self.endpoint_with_segment("brain", hash)?;
        let body: SharedBrainBody = self.send(self.request(Method::GET, url, Auth::Public)).await?;
        let body = body.accept("Failed to load shared content.")?;

        Ok(SharedBrain {
            username: body.username,
            content: body.content.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl PreviewSource for ApiClient {
    async fn link_preview(&self, url: &str) -> Result<LinkPreview, ApiError> {
        let mut endpoint = self.endpoint("preview-link")?;
        endpoint.query_pairs_mut().append_pair("url", url);
        self.send(self.request(Method::GET, endpoint, Auth::Bearer))
            .await
    }
}
