use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::base;
use crate::models::EventRecord;

static CARD_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-event-id]").expect("event card selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h3").expect("title selector"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a[href*="/events/"]"#).expect("event link selector"));
static TIME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time").expect("time selector"));
static LOCATION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[data-testid="location"]"#).expect("location selector"));
static GROUP_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.flex-shrink.min-w-0.truncate").expect("group name selector")
});
static RATING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[class*="text-ds-neutral500"] span"#).expect("rating selector")
});
static ATTENDEES_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"[class*="text-primary"][class*="text-xs"] span"#)
        .expect("attendees selector")
});
static IMAGE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"img[src*="meetupstatic.com"]"#).expect("image selector")
});

type FieldLookup = fn(&ElementRef<'_>, &str) -> Option<String>;

/// Best-effort fields in output order. Each strategy returns None on a
/// failed lookup and the value uniformly defaults to an empty string; a
/// single missing field never aborts extraction of the rest of the card.
const FIELD_STRATEGIES: &[(&str, FieldLookup)] = &[
    ("title", lookup_title),
    ("date_iso", lookup_date_iso),
    ("date_display", lookup_date_display),
    ("location", lookup_location),
    ("group_name", lookup_group_name),
    ("rating", lookup_rating),
    ("attendees", lookup_attendees),
    ("image_url", lookup_image_url),
];

/// Map every event card in the rendered document to a record. Cards without
/// a recoverable identity or event link are dropped with a warning.
pub fn extract_records(html: &str, base_url: &str) -> Vec<EventRecord> {
    let document = Html::parse_document(html);
    document
        .select(&CARD_SELECTOR)
        .filter_map(|card| extract_record(&card, base_url))
        .collect()
}

pub(crate) fn extract_record(card: &ElementRef<'_>, base_url: &str) -> Option<EventRecord> {
    // No identifier means no dedup key; the card cannot be accepted.
    let event_id = match card
        .value()
        .attr("data-event-id")
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        Some(id) => id.to_string(),
        None => {
            warn!("dropping card without an event identifier");
            return None;
        }
    };

    let url = match base::absolute_url(base_url, base::first_attr(card, &LINK_SELECTOR, "href")) {
        Some(url) => url,
        None => {
            warn!(%event_id, "dropping card without a resolvable event link");
            return None;
        }
    };

    let mut record = EventRecord {
        event_id,
        url,
        ..Default::default()
    };

    for (name, lookup) in FIELD_STRATEGIES {
        match lookup(card, base_url) {
            Some(value) => set_field(&mut record, name, value),
            None => debug!(event_id = %record.event_id, field = name, "field missing"),
        }
    }

    Some(record)
}

fn set_field(record: &mut EventRecord, name: &str, value: String) {
    match name {
        "title" => record.title = value,
        "date_iso" => record.date_iso = value,
        "date_display" => record.date_display = value,
        "location" => record.location = value,
        "group_name" => record.group_name = value,
        "rating" => record.rating = value,
        "attendees" => record.attendees = value,
        "image_url" => record.image_url = value,
        _ => unreachable!("unknown field {name}"),
    }
}

fn lookup_title(card: &ElementRef<'_>, _base: &str) -> Option<String> {
    base::first_text(card, &TITLE_SELECTOR)
}

fn lookup_date_iso(card: &ElementRef<'_>, _base: &str) -> Option<String> {
    let raw = base::first_attr(card, &TIME_SELECTOR, "datetime")?;
    match base::normalize_iso(&raw) {
        Some(normalized) => Some(normalized),
        None => {
            debug!(%raw, "could not normalize datetime attribute");
            Some(base::clean_text(&raw)).filter(|s| !s.is_empty())
        }
    }
}

fn lookup_date_display(card: &ElementRef<'_>, _base: &str) -> Option<String> {
    base::first_text(card, &TIME_SELECTOR)
}

fn lookup_location(card: &ElementRef<'_>, _base: &str) -> Option<String> {
    base::first_text(card, &LOCATION_SELECTOR)
}

fn lookup_group_name(card: &ElementRef<'_>, _base: &str) -> Option<String> {
    base::first_text(card, &GROUP_SELECTOR).map(|text| {
        let stripped = text.strip_prefix("by ").unwrap_or(&text);
        stripped.trim().to_string()
    })
}

fn lookup_rating(card: &ElementRef<'_>, _base: &str) -> Option<String> {
    base::first_text(card, &RATING_SELECTOR).and_then(|text| base::first_number(&text))
}

fn lookup_attendees(card: &ElementRef<'_>, _base: &str) -> Option<String> {
    base::first_text(card, &ATTENDEES_SELECTOR).and_then(|text| base::first_number(&text))
}

fn lookup_image_url(card: &ElementRef<'_>, _base: &str) -> Option<String> {
    base::first_attr(card, &IMAGE_SELECTOR, "src")
        .filter(|src| src.starts_with("http://") || src.starts_with("https://"))
}
