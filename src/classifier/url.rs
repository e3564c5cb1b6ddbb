//! URL detection in free text and repair of the partial storage links the
//! agent sometimes produces.

use regex::Regex;
use std::sync::OnceLock;

const STORAGE_HOST: &str = "storage.googleapis.com/";
const GOOGLEAPIS_HOST: &str = "googleapis.com/";

/// One normalization step: `rewrite` runs when `applies` holds.
struct NormalizeStep {
    applies: fn(&str) -> bool,
    rewrite: fn(&str) -> String,
}

/// Applied in order, every matching step runs.
const NORMALIZE_STEPS: [NormalizeStep; 2] = [
    NormalizeStep {
        applies: lacks_scheme,
        rewrite: prepend_https,
    },
    NormalizeStep {
        applies: is_bare_googleapis,
        rewrite: to_storage_host,
    },
];

fn lacks_scheme(url: &str) -> bool {
    !(starts_with_ignore_case(url, "http://") || starts_with_ignore_case(url, "https://"))
}

fn prepend_https(url: &str) -> String {
    format!("https://{}", url.trim_start_matches('/'))
}

fn is_bare_googleapis(url: &str) -> bool {
    url.contains(GOOGLEAPIS_HOST) && !url.contains(STORAGE_HOST)
}

fn to_storage_host(url: &str) -> String {
    let path = url
        .split_once(GOOGLEAPIS_HOST)
        .map(|(_, path)| path)
        .unwrap_or_default();
    format!("https://{}{}", STORAGE_HOST, path.trim_start_matches('/'))
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Normalize a URL-like string.
///
/// A missing scheme becomes `https://`, and `googleapis.com/<path>` links
/// without the `storage.` subdomain are pointed at
/// `storage.googleapis.com/<path>`. Normalizing a normalized URL returns it
/// unchanged. Empty input yields `None`.
pub fn normalize_url(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let mut url = raw.to_string();
    for step in &NORMALIZE_STEPS {
        if (step.applies)(&url) {
            url = (step.rewrite)(&url);
        }
    }
    Some(url)
}

/// Return the first URL in `text`, normalized.
///
/// Both `http(s)://…` URLs (any case) and bare `domain.tld/path` fragments
/// are recognised; a candidate ends at whitespace or a closing parenthesis.
pub fn extract_first_url(text: &str) -> Option<String> {
    extraction_rules()
        .find_iter(text)
        .next()
        .and_then(|(start, end)| normalize_url(&text[start..end]))
}

/// URL patterns in priority order.
///
/// The leftmost match in the text wins; when two rules match at the same
/// position the earlier rule wins.
#[derive(Debug)]
pub(crate) struct UrlRules {
    rules: Vec<Regex>,
}

impl UrlRules {
    fn new(patterns: &[&str]) -> Self {
        let rules = patterns
            .iter()
            .map(|pattern| Regex::new(pattern).expect("URL pattern compiles"))
            .collect();
        Self { rules }
    }

    /// Byte ranges of successive non-overlapping URL candidates.
    pub(crate) fn find_iter<'r, 't>(&'r self, text: &'t str) -> UrlMatches<'r, 't> {
        UrlMatches {
            rules: self,
            text,
            pos: 0,
            pending: vec![None; self.rules.len()],
        }
    }
}

/// Candidates used to pick the highlighted media of a reply.
pub(crate) fn extraction_rules() -> &'static UrlRules {
    static RULES: OnceLock<UrlRules> = OnceLock::new();
    RULES.get_or_init(|| {
        UrlRules::new(&[
            // full URL first
            r"(?i)https?://[^\s)]+",
            r"(?:[A-Za-z0-9_]+\.)+[A-Za-z0-9_]+/[^\s)]+",
        ])
    })
}

/// Candidates turned into links when a message is rendered. The scheme is
/// matched case-sensitively, so `HTTPS://host/x` renders as text followed by
/// a link to `host/x`.
pub(crate) fn rendering_rules() -> &'static UrlRules {
    static RULES: OnceLock<UrlRules> = OnceLock::new();
    RULES.get_or_init(|| {
        UrlRules::new(&[
            r"https?://\S+",
            r"(?:[A-Za-z0-9_]+\.)+[A-Za-z0-9_]+/\S+",
        ])
    })
}

pub(crate) struct UrlMatches<'r, 't> {
    rules: &'r UrlRules,
    text: &'t str,
    pos: usize,
    /// Next known match per rule: `None` not searched yet, `Some(None)` exhausted.
    pending: Vec<Option<Option<(usize, usize)>>>,
}

impl Iterator for UrlMatches<'_, '_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos > self.text.len() {
            return None;
        }
        for (slot, rule) in self.pending.iter_mut().zip(&self.rules.rules) {
            let stale = match slot {
                None => true,
                Some(Some((start, _))) => *start < self.pos,
                Some(None) => false,
            };
            if stale {
                *slot = Some(rule.find_at(self.text, self.pos).map(|m| (m.start(), m.end())));
            }
        }

        let (start, end) = self
            .pending
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| (*slot).flatten().map(|range| (index, range)))
            .min_by_key(|&(index, (start, _))| (start, index))
            .map(|(_, range)| range)?;
        self.pos = end;
        Some((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_scheme_to_bare_fragment() {
        assert_eq!(
            extract_first_url("see example.com/path for details").as_deref(),
            Some("https://example.com/path")
        );
    }

    #[test]
    fn rewrites_googleapis_to_storage_host() {
        let once = normalize_url("googleapis.com/bucket/file.mp4").unwrap();
        assert_eq!(once, "https://storage.googleapis.com/bucket/file.mp4");
        assert_eq!(normalize_url(&once).unwrap(), once);

        assert_eq!(
            normalize_url("https://googleapis.com//marketing-project-1/video.mp4").as_deref(),
            Some("https://storage.googleapis.com/marketing-project-1/video.mp4")
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "https://storage.googleapis.com/b/f.png",
            "//example.com/x",
            "www.googleapis.com/b/c",
            "HTTP://Example.com/A",
            "http://googleapis.com/x",
            "/",
        ] {
            let once = normalize_url(raw).unwrap();
            assert_eq!(normalize_url(&once).unwrap(), once, "input {raw}");
        }
    }

    #[test]
    fn correct_urls_pass_through() {
        let url = "https://storage.googleapis.com/marketing-project-1/marketing-video2.mp4";
        assert_eq!(normalize_url(url).as_deref(), Some(url));
        assert_eq!(normalize_url("http://example.com/a").as_deref(), Some("http://example.com/a"));
    }

    #[test]
    fn empty_input_normalizes_to_none() {
        assert_eq!(normalize_url(""), None);
    }

    #[test]
    fn extraction_stops_at_closing_paren() {
        assert_eq!(
            extract_first_url("the video (https://example.com/v.mp4) is here").as_deref(),
            Some("https://example.com/v.mp4")
        );
    }

    #[test]
    fn first_url_wins() {
        assert_eq!(
            extract_first_url("a.com/one then https://b.com/two").as_deref(),
            Some("https://a.com/one")
        );
    }

    #[test]
    fn text_without_urls_yields_none() {
        assert_eq!(extract_first_url("no links here. really/none"), None);
        assert_eq!(extract_first_url("https:// spaced"), None);
        assert_eq!(extract_first_url("example.com without path"), None);
        assert_eq!(extract_first_url(""), None);
    }

    #[test]
    fn scheme_match_is_case_insensitive() {
        assert_eq!(
            extract_first_url("Open HTTPS://example.com/x now").as_deref(),
            Some("HTTPS://example.com/x")
        );
    }

    #[test]
    fn fragment_match_can_start_mid_text() {
        let rules = rendering_rules();
        assert_eq!(rules.find_iter("xx sub.site.org/a b").next(), Some((3, 17)));
        assert_eq!(rules.find_iter("a..b/x").next(), None);
    }

    #[test]
    fn leftmost_match_wins_across_rules() {
        let rules = extraction_rules();
        // The fragment rule would first match at 7; the full URL starts at 0.
        assert_eq!(rules.find_iter("http://a.b/c?d e").next(), Some((0, 14)));
        assert_eq!(
            extract_first_url("http.example.com/x then https://b.com/y").as_deref(),
            Some("https://http.example.com/x")
        );
    }

    #[test]
    fn successive_matches_do_not_overlap() {
        let text = "one a.com/1 two https://b.com/2 three c.org/3";
        let ranges: Vec<&str> = rendering_rules()
            .find_iter(text)
            .map(|(start, end)| &text[start..end])
            .collect();
        assert_eq!(ranges, vec!["a.com/1", "https://b.com/2", "c.org/3"]);
    }

    #[test]
    fn long_runs_without_urls_scan_quickly() {
        let text = "a".repeat(200_000);
        let started = std::time::Instant::now();
        assert_eq!(extract_first_url(&text), None);
        assert_eq!(rendering_rules().find_iter(&text).next(), None);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }
}
