use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::browser::default_executable;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::{Result, ScrapeError};

const SCROLL_TO_BOTTOM_JS: &str = "window.scrollTo(0, document.body.scrollHeight);";

// Best-effort masking; sites fingerprint this property to spot automation.
const MASK_WEBDRIVER_JS: &str =
    "Object.defineProperty(navigator, 'webdriver', { get: () => undefined });";

/// A controllable rendering session: load a URL, scroll it, read back the
/// rendered document. The driver owns exactly one of these for the run and
/// drops it on every exit path.
pub trait RenderSession {
    fn navigate(&mut self, url: &str) -> Result<()>;
    fn scroll_to_bottom(&mut self) -> Result<()>;
    fn content(&mut self) -> Result<String>;
}

/// Headless Chrome session. The browser binary is resolved through the
/// `CHROME` environment variable or well-known install locations; absence
/// fails fast with a diagnostic naming the variable.
pub struct ChromeSession {
    // Kept alive for the tab's lifetime; dropping it closes the browser.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    pub fn launch(settings: &Settings) -> Result<Self> {
        let executable = default_executable().map_err(|err| {
            ScrapeError::Startup(format!(
                "no browser binary found (set CHROME to a Chrome/Chromium path): {err}"
            ))
        })?;
        debug!(path = %executable.display(), "launching browser");

        let options = LaunchOptions::default_builder()
            .path(Some(executable))
            .headless(true)
            .sandbox(false)
            .window_size(Some(settings.window_size))
            .args(vec![
                OsStr::new("--disable-gpu"),
                OsStr::new("--disable-notifications"),
                OsStr::new("--disable-popup-blocking"),
                OsStr::new("--disable-extensions"),
                OsStr::new("--disable-blink-features=AutomationControlled"),
            ])
            .idle_browser_timeout(Duration::from_secs(settings.page_load_timeout_secs * 4))
            .build()
            .map_err(|err| ScrapeError::Startup(err.to_string()))?;

        let browser =
            Browser::new(options).map_err(|err| ScrapeError::Startup(err.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|err| ScrapeError::Startup(err.to_string()))?;
        tab.set_default_timeout(Duration::from_secs(settings.page_load_timeout_secs));
        tab.set_user_agent(&settings.user_agent, None, None)
            .map_err(|err| ScrapeError::Startup(err.to_string()))?;

        info!("rendering session ready");
        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl RenderSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|err| ScrapeError::Navigation {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        if let Err(err) = self.tab.evaluate(MASK_WEBDRIVER_JS, false) {
            debug!(%err, "webdriver mask script failed");
        }
        Ok(())
    }

    fn scroll_to_bottom(&mut self) -> Result<()> {
        self.tab
            .evaluate(SCROLL_TO_BOTTOM_JS, false)
            .map(|_| ())
            .map_err(|err| ScrapeError::Scroll(err.to_string()))
    }

    fn content(&mut self) -> Result<String> {
        self.tab
            .get_content()
            .map_err(|err| ScrapeError::Scroll(err.to_string()))
    }
}
