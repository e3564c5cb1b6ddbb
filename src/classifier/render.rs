use serde::Serialize;

use super::url::{normalize_url, rendering_rules};

/// Piece of a rendered chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Span {
    Text { text: String },
    Link { href: String },
}

impl Span {
    fn text(text: &str) -> Self {
        Span::Text {
            text: text.to_string(),
        }
    }
}

/// Split message text into plain text and normalized links.
///
/// Every URL occurrence becomes a [`Span::Link`] whose `href` has gone
/// through [`normalize_url`]. Text with no URL comes back as a single text
/// span.
pub fn render_message_text(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for (start, end) in rendering_rules().find_iter(text) {
        if start > last {
            spans.push(Span::text(&text[last..start]));
        }
        let raw = &text[start..end];
        match normalize_url(raw) {
            Some(href) => spans.push(Span::Link { href }),
            None => spans.push(Span::text(raw)),
        }
        last = end;
    }

    if last < text.len() {
        spans.push(Span::text(&text[last..]));
    }
    if spans.is_empty() {
        spans.push(Span::text(text));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(href: &str) -> Span {
        Span::Link {
            href: href.to_string(),
        }
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(
            render_message_text("Hello there!"),
            vec![Span::text("Hello there!")]
        );
        assert_eq!(render_message_text(""), vec![Span::text("")]);
    }

    #[test]
    fn links_are_split_out_and_normalized() {
        let spans = render_message_text(concat!(
            "Watch googleapis.com/marketing-project-1/marketing-video2.mp4",
            " or https://example.com/a now"
        ));
        assert_eq!(
            spans,
            vec![
                Span::text("Watch "),
                link("https://storage.googleapis.com/marketing-project-1/marketing-video2.mp4"),
                Span::text(" or "),
                link("https://example.com/a"),
                Span::text(" now"),
            ]
        );
    }

    #[test]
    fn link_may_include_parenthesis() {
        assert_eq!(
            render_message_text("(see example.com/x)"),
            vec![Span::text("(see "), link("https://example.com/x)")]
        );
    }

    #[test]
    fn message_that_is_only_a_link() {
        assert_eq!(
            render_message_text("https://example.com/only"),
            vec![link("https://example.com/only")]
        );
    }

    #[test]
    fn uppercase_scheme_stays_as_text() {
        assert_eq!(
            render_message_text("HTTPS://example.com/x"),
            vec![Span::text("HTTPS://"), link("https://example.com/x")]
        );
    }

    #[test]
    fn long_message_without_links_is_one_span() {
        let text = "a".repeat(200_000);
        let started = std::time::Instant::now();
        assert_eq!(render_message_text(&text), vec![Span::text(&text)]);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(link("https://a.com/b")).unwrap();
        assert_eq!(json["type"], "link");
        assert_eq!(json["href"], "https://a.com/b");
    }
}
