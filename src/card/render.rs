//! Plain-text rendering of cards for the terminal.

use std::fmt::Write;

use super::{CardBody, CardView};

const RULE_WIDTH: usize = 72;

/// Render a single card
pub fn render_card(view: &CardView) -> String {
    let mut out = String::new();

    let header = format!("── [{}] {} ", view.kind, view.title);
    let pad = RULE_WIDTH.saturating_sub(header.chars().count());
    let _ = writeln!(out, "{}{}", header, "─".repeat(pad));

    render_body(&mut out, &view.body);

    if !view.tags.is_empty() {
        let tags: Vec<String> = view.tags.iter().map(|t| format!("#{}", t)).collect();
        let _ = writeln!(out, "{}", tags.join(" "));
    }
    let _ = writeln!(out, "id: {}", view.id);

    out
}

fn render_body(out: &mut String, body: &CardBody) {
    match body {
        CardBody::EmbeddedVideo {
            embed_url,
            player_title,
            original_url,
            best_effort,
        } => {
            let _ = writeln!(out, "▶ {} (16:9 player)", player_title);
            let _ = writeln!(out, "  embed: {}", embed_url);
            if *best_effort {
                let _ = writeln!(out, "  (proxy link; the video may not embed)");
            }
            let _ = writeln!(out, "{}", original_url);
        }
        CardBody::Preview(preview) => {
            if let Some(thumbnail) = &preview.thumbnail {
                let _ = writeln!(out, "[thumbnail] {}", thumbnail);
            }
            let _ = writeln!(out, "{}", preview.title);
            if let Some(description) = &preview.description {
                let _ = writeln!(out, "{}", description);
            }
            if let Some(hostname) = &preview.hostname {
                let _ = writeln!(out, "{}", hostname);
            }
            let _ = writeln!(out, "-> {}", preview.href);
        }
        CardBody::LoadingPreview => {
            let _ = writeln!(out, "Loading link preview...");
        }
        CardBody::BareLink(link) => {
            let _ = writeln!(out, "{}", link);
        }
        CardBody::NoLink => {
            let _ = writeln!(out, "No link provided.");
        }
        CardBody::Image { src, alt } => {
            let _ = writeln!(out, "[image: {}] {}", alt, src);
        }
        CardBody::NoImage => {
            let _ = writeln!(out, "No image URL.");
        }
        CardBody::Video {
            src,
            mime,
            fallback,
            failed,
        } => {
            if *failed {
                let _ = writeln!(out, "{}", fallback);
            } else {
                let _ = writeln!(out, "[video {}] {}", mime, src);
            }
        }
        CardBody::NoVideo => {
            let _ = writeln!(out, "No video URL.");
        }
        CardBody::Text(text) => {
            out.push_str(text);
            if !text.ends_with('\n') {
                out.push('\n');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::PreviewCard;
    use crate::domain::{ContentId, ContentKind};

    fn view(kind: ContentKind, body: CardBody) -> CardView {
        CardView {
            id: ContentId::new("c1"),
            kind,
            title: "Title".to_string(),
            body,
            tags: vec!["rust".to_string(), "notes".to_string()],
            can_copy: true,
        }
    }

    #[test]
    fn test_text_body_is_written_verbatim() {
        let text = "line one\n    indented <em>two</em>\n\nfour";
        let rendered = render_card(&view(ContentKind::Text, CardBody::Text(text.to_string())));

        assert!(rendered.contains(text));
        assert!(rendered.contains("#rust #notes"));
        assert!(rendered.ends_with("id: c1\n"));
    }

    #[test]
    fn test_preview_card_lines() {
        let rendered = render_card(&view(
            ContentKind::Link,
            CardBody::Preview(PreviewCard {
                href: "https://example.com".to_string(),
                thumbnail: None,
                title: "Example".to_string(),
                description: Some("An example".to_string()),
                hostname: Some("example.com".to_string()),
            }),
        ));

        assert!(rendered.starts_with("── [link] Title "));
        assert!(rendered.contains("Example\nAn example\nexample.com\n-> https://example.com\n"));
    }

    #[test]
    fn test_placeholders() {
        assert!(render_card(&view(ContentKind::Link, CardBody::NoLink)).contains("No link provided."));
        assert!(render_card(&view(ContentKind::Image, CardBody::NoImage)).contains("No image URL."));
        assert!(render_card(&view(ContentKind::Video, CardBody::NoVideo)).contains("No video URL."));
        assert!(render_card(&view(ContentKind::Link, CardBody::LoadingPreview))
            .contains("Loading link preview..."));
    }
}
