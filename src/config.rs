/// Run-wide scraping settings. Delay bounds are in seconds and are jittered
/// by the pacer; the defaults mirror the politeness pauses the target site
/// tolerates without tripping anti-automation defenses.
#[derive(Debug, Clone)]
pub struct Settings {
    pub user_agent: String,
    pub page_load_timeout_secs: u64,
    /// Pause after the initial navigation, before the first extraction pass.
    pub initial_delay: (f64, f64),
    /// Pause after each scroll, while lazy-loaded content settles.
    pub scroll_delay: (f64, f64),
    pub window_size: (u32, u32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_agent: "MeetupScrape/0.1 (+https://github.com/mike/meetup-scrape)".to_string(),
            page_load_timeout_secs: 30,
            initial_delay: (2.0, 4.0),
            scroll_delay: (1.0, 3.0),
            window_size: (1920, 1080),
        }
    }
}
