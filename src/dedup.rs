use std::collections::HashMap;

use crate::models::EventRecord;

/// Insertion-ordered accumulator keyed by `event_id`. Repeated scroll passes
/// re-render overlapping content; the first observation wins its position and
/// later observations only fill in fields the first one lacked.
#[derive(Default)]
pub struct Deduplicator {
    index: HashMap<String, usize>,
    records: Vec<EventRecord>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the record's id was not seen before.
    pub fn observe(&mut self, record: EventRecord) -> bool {
        match self.index.get(&record.event_id) {
            Some(&pos) => {
                self.records[pos].merge_missing(&record);
                false
            }
            None => {
                self.index.insert(record.event_id.clone(), self.records.len());
                self.records.push(record);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Accepted records in first-seen order. Idempotent: repeated calls
    /// without intervening `observe` calls return the same sequence.
    pub fn finalize(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }
}
