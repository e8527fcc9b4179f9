use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)*").expect("valid number regex"));

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| {
            let cleaned = inner_text(node);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .flatten()
}

pub fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

pub fn absolute_url(base: &str, href: Option<String>) -> Option<String> {
    let href = href?;
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href);
    }
    let base_url = reqwest::Url::parse(base).ok()?;
    base_url.join(&href).ok().map(|u| u.to_string())
}

/// Normalize a machine-readable timestamp attribute: strip a trailing
/// `[Zone]` suffix, map `Z` to `+00:00`, and validate with chrono.
/// Returns None when the result is not a parseable RFC 3339 timestamp.
pub fn normalize_iso(raw: &str) -> Option<String> {
    let trimmed = raw.split('[').next().unwrap_or(raw).trim();
    if trimmed.is_empty() {
        return None;
    }
    let candidate = trimmed.replace('Z', "+00:00");
    DateTime::parse_from_rfc3339(&candidate)
        .ok()
        .map(|dt| dt.to_rfc3339())
}

/// Pull the first numeric-looking token out of free text, e.g. "46" from
/// "46 attendees" or "4.7" from "4.7 (12 reviews)".
pub fn first_number(text: &str) -> Option<String> {
    NUMBER_RE
        .find(text)
        .map(|m| m.as_str().replace(',', ""))
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Rust \n  Meetup\t Night "), "Rust Meetup Night");
    }

    #[test]
    fn normalize_iso_strips_zone_suffix() {
        let normalized =
            normalize_iso("2025-03-01T18:00:00Z[America/Los_Angeles]").expect("parseable");
        assert_eq!(normalized, "2025-03-01T18:00:00+00:00");
    }

    #[test]
    fn normalize_iso_keeps_explicit_offset() {
        let normalized = normalize_iso("2025-03-01T18:00:00-07:00").expect("parseable");
        assert_eq!(normalized, "2025-03-01T18:00:00-07:00");
    }

    #[test]
    fn normalize_iso_rejects_garbage() {
        assert_eq!(normalize_iso("next Tuesday"), None);
        assert_eq!(normalize_iso(""), None);
    }

    #[test]
    fn first_number_extracts_counts_and_ratings() {
        assert_eq!(first_number("46 attendees").as_deref(), Some("46"));
        assert_eq!(first_number("4.7 (12)").as_deref(), Some("4.7"));
        assert_eq!(first_number("1,204 members").as_deref(), Some("1204"));
        assert_eq!(first_number("no count"), None);
    }

    #[test]
    fn absolute_url_resolves_relative_href() {
        let resolved = absolute_url(
            "https://www.meetup.com/find/?source=EVENTS",
            Some("/rust-group/events/123/".to_string()),
        );
        assert_eq!(
            resolved.as_deref(),
            Some("https://www.meetup.com/rust-group/events/123/")
        );
    }

    #[test]
    fn first_text_skips_empty_nodes() {
        let html = Html::parse_fragment("<div><h3>  </h3></div>");
        let root = html.root_element();
        let selector = Selector::parse("h3").expect("selector");
        assert_eq!(first_text(&root, &selector), None);
    }
}
