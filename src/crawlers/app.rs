use crate::config::AppSourceConfig;
use crate::crawlers::crawler::{Batch, BatchSource, GeoContext};
use crate::crawlers::web::connect;
use crate::error::{BatchError, SessionError};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, Locator};
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;

const KEYCODE_ENTER: u32 = 66;

/// Search results of the shopping app on an Android device, driven through Appium.
///
/// Scroll mode: cursor 1 reads the first screen, every later cursor swipes up once
/// before reading.
pub struct AppScreenSource {
    client: Client,
    config: AppSourceConfig,
}

impl AppScreenSource {
    /// Start an Appium session, bring the app to the foreground and check it is there
    pub async fn launch(config: &AppSourceConfig) -> Result<Self, SessionError> {
        ::log::info!("Initializing Appium session at {}", config.appium_url);
        let client = connect(&config.appium_url, device_capabilities(config), &[]).await?;
        let source = Self {
            client,
            config: config.clone(),
        };

        source
            .client
            .execute(
                "mobile: startActivity",
                vec![json!({
                    "appPackage": source.config.app_package,
                    "appActivity": source.config.app_activity,
                    "intentAction": "android.intent.action.MAIN",
                    "intentCategory": "android.intent.category.LAUNCHER",
                    "flags": ["0x10200000"],
                })],
            )
            .await?;
        sleep(Duration::from_secs(source.config.launch_wait_secs)).await;

        let activity = source
            .client
            .execute("mobile: getCurrentActivity", Vec::new())
            .await?;
        let activity = activity.as_str().unwrap_or_default().to_string();
        ::log::info!("Current activity: {}", activity);

        if !activity
            .to_lowercase()
            .contains(&source.config.activity_keyword.to_lowercase())
        {
            source.close().await;
            return Err(SessionError::WrongActivity(activity));
        }
        Ok(source)
    }

    /// End the Appium session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close Appium session: {}", e);
        }
    }

    async fn wait_for_xpath(&self, xpath: &str) -> Result<Element, CmdError> {
        self.client
            .wait()
            .at_most(Duration::from_secs(self.config.wait_secs))
            .for_element(Locator::XPath(xpath))
            .await
    }

    /// First search box that shows up, in configured order
    async fn search_box(&self) -> Result<Element, SessionError> {
        let mut last_error = None;
        for xpath in &self.config.search_box_xpaths {
            match self.wait_for_xpath(xpath).await {
                Ok(element) => return Ok(element),
                Err(e) => {
                    ::log::warn!("Search box not found via {}, trying next", xpath);
                    last_error = Some(e);
                }
            }
        }
        Err(match last_error {
            Some(e) => SessionError::Command(e),
            None => SessionError::NotFound("search box".to_string()),
        })
    }

    async fn swipe_up(&self) -> Result<(), CmdError> {
        let swipe = &self.config.swipe;
        self.client
            .execute(
                "mobile: swipeGesture",
                vec![json!({
                    "left": swipe.left,
                    "top": swipe.top,
                    "width": swipe.width,
                    "height": swipe.height,
                    "direction": "up",
                    "percent": swipe.percent,
                })],
            )
            .await?;
        sleep(Duration::from_secs(self.config.settle_secs)).await;
        Ok(())
    }
}

impl BatchSource for AppScreenSource {
    async fn open(&mut self, search_term: &str) -> Result<(), SessionError> {
        self.wait_for_xpath(&self.config.search_button_xpath)
            .await?
            .click()
            .await?;
        sleep(Duration::from_secs(2)).await;

        let search_box = self.search_box().await?;
        search_box.send_keys(search_term).await?;
        self.client
            .execute("mobile: pressKey", vec![json!({ "keycode": KEYCODE_ENTER })])
            .await?;
        sleep(Duration::from_secs(self.config.settle_secs)).await;

        ::log::info!("Searching for: {}", search_term);
        Ok(())
    }

    async fn fetch(&mut self, cursor: u32) -> Result<Batch, BatchError> {
        if cursor > 1 {
            self.swipe_up().await?;
        }

        let views = self
            .client
            .find_all(Locator::XPath(&self.config.product_xpath))
            .await?;

        let mut blobs = Vec::with_capacity(views.len());
        for (idx, view) in views.iter().enumerate() {
            match view.attr("text").await {
                Ok(Some(text)) => blobs.push(text),
                Ok(None) => ::log::debug!("Product view {} has no text", idx + 1),
                Err(e) => ::log::warn!("Error reading product view {}: {}", idx + 1, e),
            }
        }

        ::log::info!("Scroll {}: {} price-tagged views", cursor, blobs.len());
        Ok(Batch::TextBlocks(blobs))
    }
}

impl GeoContext for AppScreenSource {
    async fn set_geo_context(&mut self, value: &str) -> Result<(), SessionError> {
        ::log::warn!(
            "Delivery location {} not applied: the app session keeps its own location",
            value
        );
        Ok(())
    }
}

/// UiAutomator2 capabilities for the configured device and app
fn device_capabilities(config: &AppSourceConfig) -> Capabilities {
    let entries = [
        ("platformName", json!("Android")),
        ("appium:platformVersion", json!(config.platform_version)),
        ("appium:deviceName", json!(config.device_name)),
        ("appium:appPackage", json!(config.app_package)),
        ("appium:appActivity", json!(config.app_activity)),
        ("appium:noReset", json!(true)),
        ("appium:newCommandTimeout", json!(600)),
        ("appium:automationName", json!("UiAutomator2")),
    ];

    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}
