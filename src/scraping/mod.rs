pub mod base;
pub mod search_results;

use tracing::{info, warn};

use crate::config::Settings;
use crate::dedup::Deduplicator;
use crate::error::Result;
use crate::pacer::Pacer;
use crate::session::RenderSession;

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Maximum number of scroll iterations. Zero means capture only the
    /// content visible without scrolling.
    pub max_pages: u32,
    /// Ignore `max_pages` and scroll until convergence.
    pub exhaustive: bool,
    /// Consecutive no-growth iterations required before concluding that no
    /// more content will load.
    pub settle_rounds: u32,
    /// Seconds (min, max) to pause after the initial navigation.
    pub initial_delay: (f64, f64),
    /// Seconds (min, max) to pause after each scroll.
    pub scroll_delay: (f64, f64),
}

impl ScrapeOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_pages: 3,
            exhaustive: false,
            settle_rounds: 1,
            initial_delay: settings.initial_delay,
            scroll_delay: settings.scroll_delay,
        }
    }
}

/// Drive the scroll-convergence loop: navigate, then repeatedly scroll to
/// the bottom, pause, and extract, accumulating records into `dedup` until
/// the iteration budget runs out or content stops growing.
///
/// Only the initial navigation is fatal. A failed scroll or content read
/// terminates the loop early and keeps whatever has been captured so far.
pub fn scrape_events(
    session: &mut dyn RenderSession,
    url: &str,
    options: &ScrapeOptions,
    pacer: &dyn Pacer,
    dedup: &mut Deduplicator,
) -> Result<()> {
    info!(url, "navigating to results page");
    session.navigate(url)?;
    pacer.pause(options.initial_delay.0, options.initial_delay.1);

    // Capture the unscrolled content first so max_pages = 0 still yields
    // the items visible on load.
    match session.content() {
        Ok(html) => {
            let added = observe_pass(dedup, &html, url);
            info!(new = added, total = dedup.len(), "initial pass complete");
        }
        Err(err) => {
            warn!(%err, "initial content read failed, keeping partial results");
            return Ok(());
        }
    }

    let mut quiet_rounds = 0u32;
    let mut page = 0u32;

    loop {
        if !options.exhaustive && page >= options.max_pages {
            info!(max_pages = options.max_pages, "iteration budget reached");
            break;
        }

        if options.exhaustive {
            info!(page = page + 1, "scrolling");
        } else {
            info!(
                page = page + 1,
                max_pages = options.max_pages,
                "scrolling"
            );
        }

        if let Err(err) = session.scroll_to_bottom() {
            warn!(%err, "scroll failed, keeping partial results");
            break;
        }
        pacer.pause(options.scroll_delay.0, options.scroll_delay.1);

        let html = match session.content() {
            Ok(html) => html,
            Err(err) => {
                warn!(%err, "content read failed, keeping partial results");
                break;
            }
        };

        let added = observe_pass(dedup, &html, url);
        info!(new = added, total = dedup.len(), "pass complete");

        if added == 0 {
            quiet_rounds += 1;
            if quiet_rounds >= options.settle_rounds {
                info!("no new events after scrolling, converged");
                break;
            }
        } else {
            quiet_rounds = 0;
        }

        page += 1;
    }

    Ok(())
}

fn observe_pass(dedup: &mut Deduplicator, html: &str, base_url: &str) -> usize {
    let mut added = 0;
    for record in search_results::extract_records(html, base_url) {
        if dedup.observe(record) {
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScrapeError;
    use crate::pacer::NoDelay;

    const BASE_URL: &str = "https://www.meetup.com/find/?source=EVENTS";

    fn card(id: &str) -> String {
        format!(
            r#"<div data-event-id="{id}">
                <a href="/g/events/{id}/"><h3>Event {id}</h3></a>
            </div>"#
        )
    }

    fn page(ids: &[&str]) -> String {
        ids.iter().map(|id| card(id)).collect()
    }

    /// Scripted session: each content() call returns the next rendered
    /// state, repeating the last one once the script runs out.
    struct FakeSession {
        passes: Vec<String>,
        reads: usize,
        scrolls: usize,
        fail_scroll_at: Option<usize>,
    }

    impl FakeSession {
        fn new(passes: Vec<String>) -> Self {
            Self {
                passes,
                reads: 0,
                scrolls: 0,
                fail_scroll_at: None,
            }
        }
    }

    impl RenderSession for FakeSession {
        fn navigate(&mut self, _url: &str) -> Result<()> {
            Ok(())
        }

        fn scroll_to_bottom(&mut self) -> Result<()> {
            self.scrolls += 1;
            if Some(self.scrolls) == self.fail_scroll_at {
                return Err(ScrapeError::Scroll("session unresponsive".into()));
            }
            Ok(())
        }

        fn content(&mut self) -> Result<String> {
            let idx = self.reads.min(self.passes.len() - 1);
            self.reads += 1;
            Ok(self.passes[idx].clone())
        }
    }

    fn run(session: &mut FakeSession, options: &ScrapeOptions) -> Vec<String> {
        let mut dedup = Deduplicator::new();
        scrape_events(session, BASE_URL, options, &NoDelay, &mut dedup)
            .expect("navigation succeeds");
        dedup
            .into_records()
            .into_iter()
            .map(|r| r.event_id)
            .collect()
    }

    fn options(max_pages: u32) -> ScrapeOptions {
        ScrapeOptions {
            max_pages,
            exhaustive: false,
            settle_rounds: 1,
            initial_delay: (0.0, 0.0),
            scroll_delay: (0.0, 0.0),
        }
    }

    #[test]
    fn max_pages_zero_captures_only_unscrolled_content() {
        let mut session = FakeSession::new(vec![page(&["a", "b"]), page(&["a", "b", "c"])]);
        let ids = run(&mut session, &options(0));
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(session.scrolls, 0);
    }

    #[test]
    fn converges_when_scrolling_adds_nothing_new() {
        // Initial pass [A, B]; first scroll reveals C; second scroll adds
        // nothing, so with settle_rounds = 1 the loop stops well inside
        // the max_pages = 3 budget.
        let mut session = FakeSession::new(vec![
            page(&["a", "b"]),
            page(&["a", "b", "c"]),
            page(&["a", "b", "c"]),
        ]);
        let ids = run(&mut session, &options(3));
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(session.scrolls, 2);
    }

    #[test]
    fn stops_at_first_quiet_round_before_budget() {
        // Content never grows past the initial pass; max_pages = 2 but the
        // loop stops after a single no-growth scroll.
        let mut session = FakeSession::new(vec![page(&["a", "b"])]);
        let ids = run(&mut session, &options(2));
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(session.scrolls, 1);
    }

    #[test]
    fn settle_rounds_tolerates_slow_loads() {
        // One quiet scroll, then new content: settle_rounds = 2 keeps the
        // loop alive long enough to pick up the late arrival.
        let mut session = FakeSession::new(vec![
            page(&["a"]),
            page(&["a"]),
            page(&["a", "b"]),
            page(&["a", "b"]),
        ]);
        let mut opts = options(5);
        opts.settle_rounds = 2;
        let ids = run(&mut session, &opts);
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn scroll_failure_keeps_partial_results() {
        let mut session = FakeSession::new(vec![page(&["a", "b"]), page(&["a", "b", "c"])]);
        session.fail_scroll_at = Some(2);
        let ids = run(&mut session, &options(5));
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn exhaustive_ignores_the_page_budget() {
        let mut session = FakeSession::new(vec![
            page(&["a"]),
            page(&["a", "b"]),
            page(&["a", "b", "c"]),
            page(&["a", "b", "c"]),
        ]);
        let mut opts = options(1);
        opts.exhaustive = true;
        let ids = run(&mut session, &opts);
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn repeated_cards_across_passes_are_not_duplicated() {
        let mut session = FakeSession::new(vec![
            page(&["a", "b"]),
            page(&["b", "a", "c"]),
            page(&["c", "b", "a"]),
        ]);
        let ids = run(&mut session, &options(5));
        assert_eq!(ids, vec!["a", "b", "c"]);
    }
}
