use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use tracing::{info, warn};

static CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(20))
        .build()
        .expect("http client")
});

#[derive(Debug, Clone, PartialEq)]
pub struct RobotsVerdict {
    pub allowed: bool,
    /// Crawl-delay in seconds, when the matching group declares one.
    pub crawl_delay: Option<f64>,
}

impl RobotsVerdict {
    fn allow_all() -> Self {
        Self {
            allowed: true,
            crawl_delay: None,
        }
    }

    fn disallow() -> Self {
        Self {
            allowed: false,
            crawl_delay: None,
        }
    }
}

/// Check the target origin's robots.txt before navigating. A missing file
/// allows everything; a fetch failure is treated as disallowed so a flaky
/// origin is never scraped blind.
pub fn check(url: &str, user_agent: &str) -> RobotsVerdict {
    let parsed = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(%err, "could not parse url for robots.txt check");
            return RobotsVerdict::disallow();
        }
    };
    let robots_url = match parsed.join("/robots.txt") {
        Ok(joined) => joined,
        Err(err) => {
            warn!(%err, "could not build robots.txt url");
            return RobotsVerdict::disallow();
        }
    };

    let response = match CLIENT
        .get(robots_url.clone())
        .header("User-Agent", user_agent)
        .send()
    {
        Ok(response) => response,
        Err(err) => {
            warn!(%err, url = %robots_url, "robots.txt fetch failed");
            return RobotsVerdict::disallow();
        }
    };

    if response.status().as_u16() == 404 {
        info!(url = %robots_url, "no robots.txt, proceeding");
        return RobotsVerdict::allow_all();
    }
    if !response.status().is_success() {
        warn!(status = %response.status(), url = %robots_url, "robots.txt unavailable");
        return RobotsVerdict::disallow();
    }

    let body = match response.text() {
        Ok(body) => body,
        Err(err) => {
            warn!(%err, "could not read robots.txt body");
            return RobotsVerdict::disallow();
        }
    };

    evaluate(&body, user_agent, parsed.path())
}

/// Minimal robots.txt evaluation: find the groups applying to this agent
/// (exact token prefix match, falling back to `*`) and test the path
/// against their Disallow prefixes. Allow lines and wildcards beyond the
/// `*` agent are not interpreted.
fn evaluate(body: &str, user_agent: &str, path: &str) -> RobotsVerdict {
    let agent_token = user_agent
        .split('/')
        .next()
        .unwrap_or(user_agent)
        .to_lowercase();

    let mut specific_rules: Vec<String> = Vec::new();
    let mut wildcard_rules: Vec<String> = Vec::new();
    let mut specific_delay: Option<f64> = None;
    let mut wildcard_delay: Option<f64> = None;
    let mut specific_seen = false;

    // Group state: which agents the current record applies to.
    let mut in_specific = false;
    let mut in_wildcard = false;
    let mut last_was_agent = false;

    for line in body.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                // A new record starts when an agent line follows rules.
                if !last_was_agent {
                    in_specific = false;
                    in_wildcard = false;
                }
                let agent = value.to_lowercase();
                if agent == "*" {
                    in_wildcard = true;
                } else if agent_token.starts_with(&agent) || agent.starts_with(&agent_token) {
                    in_specific = true;
                    specific_seen = true;
                }
                last_was_agent = true;
            }
            "disallow" => {
                last_was_agent = false;
                if value.is_empty() {
                    continue;
                }
                if in_specific {
                    specific_rules.push(value.to_string());
                }
                if in_wildcard {
                    wildcard_rules.push(value.to_string());
                }
            }
            "crawl-delay" => {
                last_was_agent = false;
                let delay = value.parse::<f64>().ok();
                if in_specific {
                    specific_delay = specific_delay.or(delay);
                }
                if in_wildcard {
                    wildcard_delay = wildcard_delay.or(delay);
                }
            }
            _ => {
                last_was_agent = false;
            }
        }
    }

    let (rules, delay) = if specific_seen {
        (specific_rules, specific_delay)
    } else {
        (wildcard_rules, wildcard_delay)
    };

    let allowed = !rules.iter().any(|prefix| path.starts_with(prefix.as_str()));
    RobotsVerdict {
        allowed,
        crawl_delay: delay,
    }
}
