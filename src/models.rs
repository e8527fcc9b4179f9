use serde::{Deserialize, Serialize};

/// One observed event listing. Field order matches the output JSON.
///
/// `event_id` and `url` are required; every other field is best-effort and
/// an empty string means the source did not expose it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct EventRecord {
    pub event_id: String,
    pub title: String,
    pub url: String,
    pub date_iso: String,
    pub date_display: String,
    pub location: String,
    pub group_name: String,
    pub rating: String,
    pub attendees: String,
    pub image_url: String,
}

impl EventRecord {
    /// Fill empty fields from a later observation of the same event.
    /// Non-empty fields are never overwritten.
    pub fn merge_missing(&mut self, other: &EventRecord) {
        let pairs: [(&mut String, &String); 8] = [
            (&mut self.title, &other.title),
            (&mut self.date_iso, &other.date_iso),
            (&mut self.date_display, &other.date_display),
            (&mut self.location, &other.location),
            (&mut self.group_name, &other.group_name),
            (&mut self.rating, &other.rating),
            (&mut self.attendees, &other.attendees),
            (&mut self.image_url, &other.image_url),
        ];
        for (mine, theirs) in pairs {
            if mine.is_empty() && !theirs.is_empty() {
                *mine = theirs.clone();
            }
        }
    }
}
