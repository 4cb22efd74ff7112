//! Dashboard Integration Tests
//!
//! Session persistence, card resolution and 401 teardown against a mock
//! backend.

use second_brain::api::{ApiClient, Credentials};
use second_brain::card::{CardBody, ContentCard};
use second_brain::dashboard::{Dashboard, DashboardError};
use second_brain::domain::ContentKind;
use second_brain::forms::{ContentDraft, TagOutcome};
use second_brain::session::{FileTokenStore, Session, TokenStore};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_in(dir: &TempDir) -> Session {
    Session::initialize(FileTokenStore::new(dir.path().join("session")))
}

fn signed_in(server: &MockServer, dir: &TempDir, token: &str) -> Dashboard<ApiClient> {
    let store = FileTokenStore::new(dir.path().join("session"));
    store.save(token).unwrap();
    Dashboard::new(ApiClient::new(server.uri()), Session::initialize(store))
}

fn mixed_content() -> serde_json::Value {
    json!({
        "success": true,
        "content": [
            {
                "_id": "c1",
                "title": "Rust",
                "typeofContent": "link",
                "link": "https://www.rust-lang.org",
                "tags": [{ "_id": "t1", "title": "lang" }]
            },
            {
                "_id": "c2",
                "title": "Talk",
                "typeofContent": "link",
                "link": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
            },
            {
                "_id": "c3",
                "title": "Note",
                "typeofContent": "text",
                "link": "  first line\n  second <b>line</b>  "
            }
        ]
    })
}

fn bodies(cards: &[ContentCard]) -> Vec<CardBody> {
    cards.iter().map(|c| c.view().body).collect()
}

#[tokio::test]
async fn test_sign_in_then_render_mixed_content() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/signin"))
        .and(body_json(json!({ "username": "alice", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "tok-1",
            "message": "Login successful."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/content"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mixed_content()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/preview-link"))
        .and(query_param("url", "https://www.rust-lang.org"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Rust Programming Language",
            "description": "A language empowering everyone",
            "image": "https://www.rust-lang.org/static/images/rust-social.jpg",
            "url": "https://www.rust-lang.org/",
            "type": "website"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(ApiClient::new(server.uri()), session_in(&dir));
    assert!(!dashboard.is_authenticated());

    let signed_in = dashboard
        .sign_in(&Credentials::new("alice", "pw"))
        .await
        .unwrap();
    assert_eq!(signed_in.message, "Login successful.");

    // Token survives a restart
    let stored = FileTokenStore::new(dir.path().join("session")).load().unwrap();
    assert_eq!(stored.as_deref(), Some("tok-1"));
    assert!(session_in(&dir).is_authenticated());

    let items = dashboard.load().await.unwrap();
    let cards = dashboard.cards(&items).await;
    let bodies = bodies(&cards);
    assert_eq!(bodies.len(), 3);

    match &bodies[0] {
        CardBody::Preview(preview) => {
            assert_eq!(preview.title, "Rust Programming Language");
            assert_eq!(preview.href, "https://www.rust-lang.org/");
            assert_eq!(preview.hostname.as_deref(), Some("www.rust-lang.org"));
        }
        other => panic!("expected a preview card, got {:?}", other),
    }

    match &bodies[1] {
        CardBody::EmbeddedVideo {
            embed_url,
            player_title,
            best_effort,
            ..
        } => {
            assert_eq!(embed_url, "https://www.youtube.com/embed/dQw4w9WgXcQ");
            assert_eq!(player_title, "Talk");
            assert!(!best_effort);
        }
        other => panic!("expected an embedded video, got {:?}", other),
    }

    assert_eq!(
        bodies[2],
        CardBody::Text("  first line\n  second <b>line</b>  ".to_string())
    );
}

#[tokio::test]
async fn test_unauthorized_tears_down_session() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/content"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid token" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut dashboard = signed_in(&server, &dir, "stale");
    assert!(dashboard.is_authenticated());

    let err = dashboard.load().await.unwrap_err();
    assert!(matches!(&err, DashboardError::Api(e) if e.is_unauthorized()));
    assert!(!dashboard.is_authenticated());

    let stored = FileTokenStore::new(dir.path().join("session")).load().unwrap();
    assert_eq!(stored, None);

    // Further calls stop before the network
    assert!(matches!(
        dashboard.load().await,
        Err(DashboardError::NotSignedIn)
    ));
}

#[tokio::test]
async fn test_preview_failure_falls_back_to_bare_link() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/preview-link"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut dashboard = signed_in(&server, &dir, "tok");
    let items = vec![second_brain::domain::ContentItem::new(
        "c1",
        "Blog",
        ContentKind::Link,
        "https://blog.example.com/post",
    )];

    let cards = dashboard.cards(&items).await;
    assert_eq!(
        cards[0].view().body,
        CardBody::BareLink("https://blog.example.com/post".to_string())
    );
    assert!(dashboard.is_authenticated());
}

#[tokio::test]
async fn test_malformed_preview_body_falls_back_to_bare_link() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/preview-link"))
        .and(query_param("url", "https://html.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/preview-link"))
        .and(query_param("url", "https://array.example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .expect(1)
        .mount(&server)
        .await;

    let mut dashboard = signed_in(&server, &dir, "tok");
    let items = vec![
        second_brain::domain::ContentItem::new(
            "c1",
            "Html",
            ContentKind::Link,
            "https://html.example.com",
        ),
        second_brain::domain::ContentItem::new(
            "c2",
            "Array",
            ContentKind::Link,
            "https://array.example.com",
        ),
    ];

    let cards = dashboard.cards(&items).await;
    assert_eq!(
        bodies(&cards),
        vec![
            CardBody::BareLink("https://html.example.com".to_string()),
            CardBody::BareLink("https://array.example.com".to_string()),
        ]
    );
    assert!(dashboard.is_authenticated());
}

#[tokio::test]
async fn test_shared_view_without_session_skips_previews() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/brain/h4sh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{
                "_id": "c1",
                "title": "Rust",
                "typeofContent": "link",
                "link": "https://www.rust-lang.org"
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/preview-link"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let mut dashboard = Dashboard::new(ApiClient::new(server.uri()), session_in(&dir));
    let shared = dashboard.shared("h4sh").await.unwrap();
    assert_eq!(shared.heading(), "Shared User's Second Brain");

    let cards = dashboard.cards(&shared.content).await;
    assert_eq!(
        cards[0].view().body,
        CardBody::BareLink("https://www.rust-lang.org".to_string())
    );
}

#[tokio::test]
async fn test_missing_tag_is_created() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/tag/rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Tag not found"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tag/zig"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Database unavailable"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tag"))
        .and(body_json(json!({ "title": "rust" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "tag": { "_id": "t9", "title": "rust" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut dashboard = signed_in(&server, &dir, "tok");
    let mut draft = ContentDraft::new(ContentKind::Link)
        .with_title("Rust")
        .with_link("https://www.rust-lang.org");

    let outcome = dashboard.add_tag(&mut draft, "  rust ").await.unwrap();
    assert!(matches!(&outcome, TagOutcome::Created(tag) if tag.id == "t9"));

    // Case-insensitive duplicate never reaches the backend
    let outcome = dashboard.add_tag(&mut draft, "RUST").await.unwrap();
    assert_eq!(outcome, TagOutcome::Duplicate("RUST".to_string()));

    // Any other lookup failure aborts without touching the draft
    assert!(dashboard.add_tag(&mut draft, "zig").await.is_err());
    assert_eq!(draft.tags().len(), 1);

    let body = draft.validate().unwrap();
    assert_eq!(body.tags, vec!["t9".to_string()]);
}

#[tokio::test]
async fn test_validation_happens_before_any_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let mut dashboard = signed_in(&server, &dir, "tok");
    let draft = ContentDraft::new(ContentKind::Image)
        .with_title("Pic")
        .with_link("not-a-url");

    assert!(matches!(
        dashboard.add(&draft).await,
        Err(DashboardError::Validation(_))
    ));
}
