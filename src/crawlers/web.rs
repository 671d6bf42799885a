use crate::config::WebSourceConfig;
use crate::crawlers::crawler::{Batch, BatchSource, GeoContext};
use crate::error::{BatchError, SessionError};
use crate::utils::search_url;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Search-results pages of the web storefront, driven through WebDriver.
///
/// Page mode: cursor `n` is result page `n` for the open search term.
pub struct WebListingSource {
    client: Client,
    base_url: Url,
    item_selector: String,
    wait: Duration,
    search_term: Option<String>,
}

impl WebListingSource {
    /// Start a browser session for the configured storefront
    pub async fn connect(config: &WebSourceConfig) -> Result<Self, SessionError> {
        let base_url = Url::parse(&config.base_url)?;
        let client = connect(
            &config.webdriver_url,
            browser_capabilities(config),
            &WEBDRIVER_FALLBACKS,
        )
        .await?;

        // Navigation must finish inside the controller's batch timeout
        let page_load = Duration::from_secs(config.page_load_secs);
        client
            .update_timeouts(TimeoutConfiguration::new(None, Some(page_load), None))
            .await?;

        Ok(Self {
            client,
            base_url,
            item_selector: config.item_selector.as_str().to_string(),
            wait: Duration::from_secs(config.wait_secs),
            search_term: None,
        })
    }

    async fn wait_for(&self, id: &str) -> Result<Element, CmdError> {
        self.client
            .wait()
            .at_most(self.wait)
            .for_element(Locator::Id(id))
            .await
    }

    /// End the browser session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

impl BatchSource for WebListingSource {
    async fn open(&mut self, search_term: &str) -> Result<(), SessionError> {
        self.search_term = Some(search_term.to_string());
        Ok(())
    }

    async fn fetch(&mut self, cursor: u32) -> Result<Batch, BatchError> {
        let term = self
            .search_term
            .as_deref()
            .ok_or_else(|| BatchError::Unavailable {
                cursor,
                reason: "no search term opened".to_string(),
            })?;
        let url = search_url(&self.base_url, term, cursor);

        ::log::debug!("SCRAPE: {}", url);
        self.client.goto(url.as_str()).await?;

        if let Err(e) = self
            .client
            .wait()
            .at_most(self.wait)
            .for_element(Locator::Css(&self.item_selector))
            .await
        {
            return Err(BatchError::Unavailable {
                cursor,
                reason: format!("no results at {}: {}", url, e),
            });
        }

        let source = self.client.source().await?;
        Ok(Batch::Html {
            url: url.to_string(),
            source,
        })
    }
}

impl GeoContext for WebListingSource {
    /// Enters a pincode through the storefront's delivery-location popover
    async fn set_geo_context(&mut self, value: &str) -> Result<(), SessionError> {
        self.client.goto(self.base_url.as_str()).await?;

        self.wait_for("nav-global-location-popover-link").await?.click().await?;
        self.wait_for("GLUXZipUpdateInput").await?.send_keys(value).await?;
        self.wait_for("GLUXZipUpdate").await?.click().await?;
        self.wait_for("GLUXConfirmClose").await?.click().await?;

        ::log::info!("Delivery location set to {}", value);
        Ok(())
    }
}

/// Chrome options matching a regular desktop browser
fn browser_capabilities(config: &WebSourceConfig) -> Capabilities {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-gpu".to_string(),
        "--no-sandbox".to_string(),
        format!("user-agent={}", config.user_agent),
    ];
    if config.headless {
        args.insert(0, "--headless".to_string());
    }

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
    caps
}

/// Common local WebDriver endpoints tried when the configured one refuses
pub const WEBDRIVER_FALLBACKS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // Selenium / geckodriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Connects to the WebDriver instance, then to each fallback in turn
pub async fn connect(
    webdriver_url: &str,
    capabilities: Capabilities,
    fallback_urls: &[&str],
) -> Result<Client, SessionError> {
    match ClientBuilder::native()
        .capabilities(capabilities.clone())
        .connect(webdriver_url)
        .await
    {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native()
            .capabilities(capabilities.clone())
            .connect(url)
            .await
        {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(SessionError::Connect {
        url: webdriver_url.to_string(),
    })
}
