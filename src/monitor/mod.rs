use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{NotifierError, Result};
use crate::parser::{ListingParser, Project};
use crate::storage::SeenLinkStore;
use crate::telegram::{format, Notifier};

// Mostaql rejects default client identifiers, so present a browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// A page this large that yields zero rows usually means the listing
// layout changed, not that nothing is posted.
const LAYOUT_WARN_MIN_BYTES: usize = 10 * 1024;

/// Fetch capability for the listing page, split out so cycle logic can be
/// tested without the network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_listing(&self) -> Result<String>;
}

/// Plain HTTP GET against the configured listing URL.
pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| {
                NotifierError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url: config.listing_url.clone(),
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_listing(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(NotifierError::NetworkError(format!(
                "HTTP error fetching {}: {}",
                self.url,
                response.status()
            ))
            .into());
        }

        Ok(response.text().await?)
    }
}

/// Orchestrates the fetch → extract → diff → notify → persist cycle.
///
/// Strictly sequential: one request at a time, and the only suspension
/// points are the interval wait, the inter-message pause, and the network
/// calls themselves. Seen-set appends are synchronous, so an interrupt
/// between items always leaves a complete, consistent file.
pub struct PollController {
    fetcher: Box<dyn Fetcher>,
    notifier: Box<dyn Notifier>,
    parser: ListingParser,
    store: SeenLinkStore,
    check_interval: Duration,
    send_pause: Duration,
}

impl PollController {
    pub fn new(
        config: &Config,
        fetcher: Box<dyn Fetcher>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        Ok(Self {
            fetcher,
            notifier,
            parser: ListingParser::new()?,
            store: SeenLinkStore::new(config.seen_links_file.clone()),
            check_interval: config.check_interval,
            send_pause: config.send_pause,
        })
    }

    /// Run forever: one startup cycle, then check cycles on the interval.
    /// The caller races this future against an interrupt signal; every
    /// suspension point doubles as a cancellation point.
    pub async fn run(&self) -> Result<()> {
        self.run_startup_cycle().await;
        info!("Startup complete. Entering main monitoring loop...");

        loop {
            info!(
                "Waiting {} seconds before the next check",
                self.check_interval.as_secs()
            );
            sleep(self.check_interval).await;
            if let Err(e) = self.run_check_cycle().await {
                error!("Check cycle failed: {}", e);
            }
        }
    }

    /// Announce the latest listed project (assumed first on the page),
    /// then always send the online confirmation, even when the scrape or
    /// the announcement itself fails.
    pub async fn run_startup_cycle(&self) {
        info!("Performing startup sequence...");

        if let Some(projects) = self.scrape().await {
            if let Some(latest) = projects.first() {
                info!("Sending latest project on startup: {}", latest.title);
                let message = format::latest_project_message(latest);
                match self.notifier.send_message(&message).await {
                    Ok(()) => {
                        if let Err(e) = self.store.append(&latest.link) {
                            error!("Failed to record startup link: {}", e);
                        }
                    }
                    Err(e) => error!("Failed to send startup project message: {}", e),
                }
            }
        }

        match self.notifier.send_message(format::STARTUP_CONFIRMATION).await {
            Ok(()) => info!("Startup confirmation message sent"),
            Err(e) => error!("Failed to send startup confirmation message: {}", e),
        }
    }

    /// One steady-state cycle. A fetch failure skips the cycle without
    /// touching the store; only storage errors propagate.
    pub async fn run_check_cycle(&self) -> Result<()> {
        info!("Checking for new projects...");

        let Some(projects) = self.scrape().await else {
            return Ok(());
        };

        let seen = self.store.load()?;

        // Oldest first, so an interruption mid-batch leaves the already
        // recorded prefix and only the newest items get re-sent.
        for project in projects.iter().rev() {
            if seen.contains(&project.link) {
                continue;
            }

            info!("New project found: {}", project.title);
            let message = format::new_project_message(project);
            match self.notifier.send_message(&message).await {
                Ok(()) => {
                    // Record immediately so a later failure cannot lose
                    // credit for this send.
                    self.store.append(&project.link)?;
                    sleep(self.send_pause).await;
                }
                Err(e) => {
                    // Left unseen on purpose; it will be retried as new
                    // on the next cycle.
                    error!("Failed to send message for '{}': {}", project.title, e);
                }
            }
        }

        Ok(())
    }

    // Fetch and extract. None means the fetch failed and the cycle must
    // be skipped; an empty vec means the page really listed nothing we
    // could extract.
    async fn scrape(&self) -> Option<Vec<Project>> {
        info!("Scraping Mostaql for projects...");

        let html = match self.fetcher.fetch_listing().await {
            Ok(html) => html,
            Err(e) => {
                error!("An error occurred during scraping: {}", e);
                return None;
            }
        };

        let projects = self.parser.parse_listing(&html);
        if projects.is_empty() && html.len() > LAYOUT_WARN_MIN_BYTES {
            warn!(
                "No project rows matched a {}-byte page; the listing layout may have changed",
                html.len()
            );
        }

        info!("Found {} projects on the page", projects.len());
        Some(projects)
    }
}
