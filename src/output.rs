use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, ScrapeError};
use crate::models::EventRecord;

/// Write the full record list as a pretty-printed JSON array under `dir`,
/// creating the directory when needed. Written once at the end of the run;
/// an empty list still produces a valid `[]` file.
pub fn save_events(records: &[EventRecord], dir: &Path, filename: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|err| ScrapeError::OutputWrite {
        path: dir.display().to_string(),
        message: err.to_string(),
    })?;

    let path = dir.join(filename);
    let contents = serde_json::to_string_pretty(records).map_err(|err| {
        ScrapeError::OutputWrite {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    })?;
    fs::write(&path, contents).map_err(|err| ScrapeError::OutputWrite {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;

    info!(count = records.len(), path = %path.display(), "saved events");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_dir(name: &str) -> PathBuf {
        env::temp_dir().join(format!("meetup-scrape-test-{name}-{}", std::process::id()))
    }

    #[test]
    fn writes_a_json_array_and_creates_the_directory() {
        let dir = scratch_dir("write");
        let records = vec![
            EventRecord {
                event_id: "1".into(),
                url: "https://www.meetup.com/g/events/1/".into(),
                ..Default::default()
            },
            EventRecord {
                event_id: "2".into(),
                url: "https://www.meetup.com/g/events/2/".into(),
                ..Default::default()
            },
        ];

        let path = save_events(&records, &dir, "events.json").expect("write succeeds");
        let contents = fs::read_to_string(&path).expect("read back");
        let parsed: Vec<EventRecord> = serde_json::from_str(&contents).expect("valid json");
        assert_eq!(parsed, records);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn empty_run_still_writes_an_empty_array() {
        let dir = scratch_dir("empty");
        let path = save_events(&[], &dir, "events.json").expect("write succeeds");
        let contents = fs::read_to_string(&path).expect("read back");
        assert_eq!(contents.trim(), "[]");

        fs::remove_dir_all(&dir).ok();
    }
}
