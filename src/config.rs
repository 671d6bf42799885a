use crate::crawlers::controller::ControllerConfig;
use crate::error::ConfigError;
use crate::fields::{FieldStrategies, StrategyOverrides};
use crate::harvest::HarvestPlan;
use crate::parsers::CssSelector;
use crate::pipeline::{DEFAULT_ITEM_SELECTOR, ListingPipeline};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration of a harvest
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Search terms collected in every geographic context
    #[serde(default)]
    pub search_terms: Vec<String>,

    /// Category stamped on records; the search term when absent
    #[serde(default)]
    pub category: Option<String>,

    /// Directory that receives the exported files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name prefix of the exported files
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Per-field strategy chains replacing the built-in ones
    #[serde(default)]
    pub strategies: StrategyOverrides,

    /// Where listings come from
    pub source: SourceConfig,
}

/// Enum containing all listing source configurations
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SourceConfig {
    /// Storefront search pages in a browser
    Web(WebSourceConfig),

    /// Shopping app screens on an Android device
    App(AppSourceConfig),
}

/// Configuration for the browser-driven storefront source
#[derive(Debug, Clone, Deserialize)]
pub struct WebSourceConfig {
    /// Storefront root, search pages live under `/s`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Result pages visited per search term
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Bounded wait for page content, in seconds
    #[serde(default = "default_web_wait_secs")]
    pub wait_secs: u64,

    /// Page-load bound for navigation, in seconds
    #[serde(default = "default_page_load_secs")]
    pub page_load_secs: u64,

    /// Delivery pincodes, each fully harvested before the next
    #[serde(default, alias = "geo_contexts", deserialize_with = "strings_or_numbers")]
    pub pincodes: Vec<String>,

    /// Container of one search result
    #[serde(default = "default_item_selector")]
    pub item_selector: CssSelector,
}

/// Configuration for the Appium-driven app source
#[derive(Debug, Clone, Deserialize)]
pub struct AppSourceConfig {
    #[serde(default = "default_appium_url")]
    pub appium_url: String,

    #[serde(default)]
    pub device_name: String,

    #[serde(default = "default_platform_version")]
    pub platform_version: String,

    #[serde(default = "default_app_package")]
    pub app_package: String,

    #[serde(default = "default_app_activity")]
    pub app_activity: String,

    /// Text the foreground activity must contain after launch
    #[serde(default = "default_activity_keyword")]
    pub activity_keyword: String,

    /// Screens read per search term
    #[serde(default = "default_max_scrolls")]
    pub max_scrolls: u32,

    /// Bounded wait for elements and screens, in seconds
    #[serde(default = "default_app_wait_secs")]
    pub wait_secs: u64,

    #[serde(default = "default_launch_wait_secs")]
    pub launch_wait_secs: u64,

    /// Pause after typing or swiping, in seconds
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,

    #[serde(default = "default_search_button_xpath")]
    pub search_button_xpath: String,

    /// Search box locators, tried in order
    #[serde(default = "default_search_box_xpaths")]
    pub search_box_xpaths: Vec<String>,

    /// Views carrying one product's text
    #[serde(default = "default_product_xpath")]
    pub product_xpath: String,

    #[serde(default)]
    pub swipe: SwipeArea,
}

/// Screen region swept by one upward swipe
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwipeArea {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub percent: f64,
}

impl Default for SwipeArea {
    fn default() -> Self {
        Self {
            left: 100,
            top: 600,
            width: 800,
            height: 1000,
            percent: 0.75,
        }
    }
}

impl HarvestConfig {
    /// Configuration with built-in defaults for `source`
    pub fn new(source: SourceConfig) -> Self {
        Self {
            search_terms: Vec::new(),
            category: None,
            output_dir: default_output_dir(),
            output_prefix: default_output_prefix(),
            strategies: StrategyOverrides::default(),
            source,
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Let `WEBDRIVER_URL` override the configured driver endpoint
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if webdriver_url.is_empty() {
                return;
            }
            match &mut self.source {
                SourceConfig::Web(web) => web.webdriver_url = webdriver_url,
                SourceConfig::App(app) => app.appium_url = webdriver_url,
            }
        }
    }

    /// Reject configurations that cannot produce a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_terms.iter().all(|term| term.trim().is_empty()) {
            return Err(ConfigError::Invalid("no search terms given".to_string()));
        }
        if self.max_steps() == 0 {
            return Err(ConfigError::Invalid(
                "max pages / max scrolls must be positive".to_string(),
            ));
        }
        if let SourceConfig::App(app) = &self.source {
            if app.search_box_xpaths.is_empty() {
                return Err(ConfigError::Invalid(
                    "at least one search box locator is required".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn max_steps(&self) -> u32 {
        match &self.source {
            SourceConfig::Web(web) => web.max_pages,
            SourceConfig::App(app) => app.max_scrolls,
        }
    }

    /// Override the page or scroll bound
    pub fn set_max_steps(&mut self, value: u32) {
        match &mut self.source {
            SourceConfig::Web(web) => web.max_pages = value,
            SourceConfig::App(app) => app.max_scrolls = value,
        }
    }

    pub fn controller(&self) -> ControllerConfig {
        match &self.source {
            SourceConfig::Web(web) => {
                ControllerConfig::pages(web.max_pages).with_batch_timeout(web.batch_timeout())
            }
            SourceConfig::App(app) => {
                ControllerConfig::scrolls(app.max_scrolls).with_batch_timeout(app.batch_timeout())
            }
        }
    }

    /// Extraction pipeline with the source's built-in strategies plus overrides
    pub fn pipeline(&self) -> ListingPipeline {
        let overrides = self.strategies.clone();
        match &self.source {
            SourceConfig::Web(web) => ListingPipeline::new(
                web.item_selector.clone(),
                FieldStrategies::web_listing().with_overrides(overrides),
            ),
            SourceConfig::App(_) => ListingPipeline::new(
                default_item_selector(),
                FieldStrategies::app_screen().with_overrides(overrides),
            ),
        }
    }

    /// Geographic contexts to harvest, in order
    pub fn geo_contexts(&self) -> Vec<String> {
        match &self.source {
            SourceConfig::Web(web) => web.pincodes.clone(),
            SourceConfig::App(_) => Vec::new(),
        }
    }

    pub fn plan(&self, captured_at: NaiveDate) -> HarvestPlan {
        HarvestPlan {
            search_terms: self
                .search_terms
                .iter()
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty())
                .collect(),
            geo_contexts: self.geo_contexts(),
            category: self.category.clone(),
            controller: self.controller(),
            captured_at,
        }
    }
}

impl WebSourceConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            base_url: default_base_url(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            user_agent: default_user_agent(),
            max_pages: default_max_pages(),
            wait_secs: default_web_wait_secs(),
            page_load_secs: default_page_load_secs(),
            pincodes: Vec::new(),
            item_selector: default_item_selector(),
        }
    }

    /// Whole fetch budget: navigation, then the wait for results
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_secs + self.wait_secs)
    }
}

impl Default for WebSourceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppSourceConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            appium_url: default_appium_url(),
            device_name: String::new(),
            platform_version: default_platform_version(),
            app_package: default_app_package(),
            app_activity: default_app_activity(),
            activity_keyword: default_activity_keyword(),
            max_scrolls: default_max_scrolls(),
            wait_secs: default_app_wait_secs(),
            launch_wait_secs: default_launch_wait_secs(),
            settle_secs: default_settle_secs(),
            search_button_xpath: default_search_button_xpath(),
            search_box_xpaths: default_search_box_xpaths(),
            product_xpath: default_product_xpath(),
            swipe: SwipeArea::default(),
        }
    }

    /// Whole fetch budget: the swipe pause, then reading the screen
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.settle_secs + self.wait_secs)
    }
}

impl Default for AppSourceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Pincodes are often written as bare numbers
fn strings_or_numbers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(u64),
    }

    let values = Vec::<TextOrNumber>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|value| match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        })
        .collect())
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_prefix() -> String {
    "amazon_scrape".to_string()
}

fn default_base_url() -> String {
    "https://www.amazon.in/".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36".to_string()
}

fn default_max_pages() -> u32 {
    2
}

fn default_web_wait_secs() -> u64 {
    10
}

fn default_page_load_secs() -> u64 {
    30
}

fn default_item_selector() -> CssSelector {
    CssSelector::parse(DEFAULT_ITEM_SELECTOR).expect("built-in selectors should be valid")
}

fn default_appium_url() -> String {
    "http://localhost:4723".to_string()
}

fn default_platform_version() -> String {
    "12".to_string()
}

fn default_app_package() -> String {
    "in.amazon.mShop.android.shopping".to_string()
}

fn default_app_activity() -> String {
    "com.amazon.mShop.home.HomeActivity".to_string()
}

fn default_activity_keyword() -> String {
    "amazon".to_string()
}

fn default_max_scrolls() -> u32 {
    3
}

fn default_app_wait_secs() -> u64 {
    20
}

fn default_launch_wait_secs() -> u64 {
    5
}

fn default_settle_secs() -> u64 {
    3
}

fn default_search_button_xpath() -> String {
    "//*[@content-desc='Search']".to_string()
}

fn default_search_box_xpaths() -> Vec<String> {
    vec![
        "//*[@resource-id='in.amazon.mShop.android.shopping:id/rs_search_src_text']".to_string(),
        "//android.widget.EditText[@text='Search']".to_string(),
    ]
}

fn default_product_xpath() -> String {
    "//android.view.View[@text and contains(@text, '₹')]".to_string()
}
