//! Per-field extraction strategies.
//!
//! Every field owns an ordered chain of [`Strategy`] values. [`first_success`] walks a
//! chain and keeps the first strategy that locates an element and yields non-empty
//! text; a failing strategy only means "try the next one".

use crate::parsers::{ListingNode, Locator, Needle};
use crate::results::Extraction;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use url::Url;

/// What to read from the located element
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "from", rename_all = "snake_case")]
pub enum Read {
    #[default]
    Text,
    Attr {
        name: String,
    },
}

/// Post-processing applied to the raw text
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalize {
    #[default]
    Trim,
    Price,
    /// First number in the text, group separators removed
    Amount,
    /// First number before the marker, or anywhere when the marker is absent
    AmountBefore(Needle),
    /// First number after the marker; nothing when the marker is absent
    AmountAfter(Needle),
    FirstToken,
    Url,
}

/// One way of obtaining a field from a listing node
#[derive(Debug, Clone, Deserialize)]
pub struct Strategy {
    pub locator: Locator,

    #[serde(default)]
    pub read: Read,

    #[serde(default)]
    pub normalize: Normalize,
}

impl Strategy {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            read: Read::Text,
            normalize: Normalize::Trim,
        }
    }

    pub fn attr(mut self, name: &str) -> Self {
        self.read = Read::Attr {
            name: name.to_string(),
        };
        self
    }

    pub fn normalize(mut self, normalize: Normalize) -> Self {
        self.normalize = normalize;
        self
    }

    /// Run this strategy against a node; `None` on any failure
    pub fn apply(&self, node: &dyn ListingNode, base_url: Option<&Url>) -> Option<String> {
        let raw = match &self.read {
            Read::Text => node.read_text(&self.locator)?,
            Read::Attr { name } => node.read_attr(&self.locator, name)?,
        };

        let value = match &self.normalize {
            Normalize::Trim => raw.trim().to_string(),
            Normalize::Price => normalize_price(&raw),
            Normalize::Amount => first_amount(&raw)?,
            Normalize::AmountBefore(marker) => match marker.split_around(&raw) {
                Some((before, _)) => first_amount(before)?,
                None => first_amount(&raw)?,
            },
            Normalize::AmountAfter(marker) => first_amount(marker.split_around(&raw)?.1)?,
            Normalize::FirstToken => raw.split_whitespace().next()?.to_string(),
            Normalize::Url => resolve_link(&raw, base_url),
        };

        if value.is_empty() { None } else { Some(value) }
    }
}

/// Tries `strategies` in order and returns the first value produced
pub fn first_success<S, T, F>(strategies: &[S], mut attempt: F) -> Extraction<T>
where
    F: FnMut(&S) -> Option<T>,
{
    strategies.iter().find_map(|strategy| attempt(strategy)).into()
}

/// Runs one field's strategy chain against a node
pub fn extract(
    node: &dyn ListingNode,
    strategies: &[Strategy],
    base_url: Option<&Url>,
) -> Extraction<String> {
    first_success(strategies, |strategy| {
        let value = strategy.apply(node, base_url);
        if value.is_none() {
            ::log::trace!("Strategy {:?} produced nothing", strategy.locator);
        }
        value
    })
}

const CURRENCY_MARKS: [&str; 6] = ["Rs.", "₹", "$", "€", "£", "¥"];

/// Strips currency marks, group separators and whitespace from a displayed price
pub fn normalize_price(raw: &str) -> String {
    let mut price = raw.to_string();
    for mark in CURRENCY_MARKS {
        price = price.replace(mark, "");
    }
    price
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect::<String>()
        .trim_end_matches('.')
        .to_string()
}

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("amount pattern should be valid"));

/// Pulls the first number out of a labelled price line such as `M.R.P: ₹1,500`
pub fn first_amount(raw: &str) -> Option<String> {
    AMOUNT.find(raw).map(|m| m.as_str().replace(',', ""))
}

fn resolve_link(raw: &str, base_url: Option<&Url>) -> String {
    let raw = raw.trim();
    match base_url.map(|base| base.join(raw)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => raw.to_string(),
    }
}

/// Label in front of the app's struck-through price
const MRP_MARKER: &str = "M.R.P";

/// Ordered strategy chains for every extracted field
#[derive(Debug, Clone)]
pub struct FieldStrategies {
    pub title: Vec<Strategy>,
    pub link: Vec<Strategy>,
    pub selling_price: Vec<Strategy>,
    pub reference_price: Vec<Strategy>,
    pub deal_tag: Vec<Strategy>,
    pub recent_purchase_volume: Vec<Strategy>,
    pub rating: Vec<Strategy>,
    pub review_count: Vec<Strategy>,
    pub sponsored: Vec<Strategy>,
}

impl FieldStrategies {
    /// Search-result cards of the web storefront
    pub fn web_listing() -> Self {
        Self {
            title: vec![
                Strategy::new(Locator::css("h2 span")),
                Strategy::new(Locator::css("h2")).attr("aria-label"),
            ],
            link: vec![
                Strategy::new(Locator::css("a.a-link-normal.s-no-outline"))
                    .attr("href")
                    .normalize(Normalize::Url),
                Strategy::new(Locator::css("h2 a"))
                    .attr("href")
                    .normalize(Normalize::Url),
            ],
            selling_price: vec![
                Strategy::new(Locator::css("span.a-price-whole")).normalize(Normalize::Price),
                Strategy::new(Locator::css("span.a-offscreen")).normalize(Normalize::Price),
            ],
            reference_price: vec![
                Strategy::new(Locator::css(
                    "span.a-price.a-text-price[data-a-strike='true'] span.a-offscreen",
                ))
                .normalize(Normalize::Price),
            ],
            deal_tag: vec![Strategy::new(Locator::css_containing("span", "deal"))],
            recent_purchase_volume: vec![Strategy::new(Locator::css_containing(
                "span",
                "bought in past month",
            ))],
            rating: vec![
                Strategy::new(Locator::css("span.a-icon-alt")).normalize(Normalize::FirstToken),
            ],
            review_count: vec![Strategy::new(Locator::css("a[aria-label*='ratings'] > span"))],
            sponsored: vec![Strategy::new(Locator::css_containing("span", "sponsored"))],
        }
    }

    /// Price-bearing views of the mobile app, read as text blobs
    pub fn app_screen() -> Self {
        Self {
            title: vec![Strategy::new(Locator::FirstLine)],
            link: Vec::new(),
            selling_price: vec![
                Strategy::new(Locator::line_containing_but_not("₹", MRP_MARKER))
                    .normalize(Normalize::Amount),
                Strategy::new(Locator::line_containing("₹"))
                    .normalize(Normalize::AmountBefore(Needle::new(MRP_MARKER))),
            ],
            reference_price: vec![
                Strategy::new(Locator::line_containing(MRP_MARKER))
                    .normalize(Normalize::AmountAfter(Needle::new(MRP_MARKER))),
            ],
            deal_tag: vec![Strategy::new(Locator::line_containing("deal"))],
            recent_purchase_volume: vec![Strategy::new(Locator::line_containing(
                "bought in past month",
            ))],
            rating: vec![
                Strategy::new(Locator::line_containing("out of 5 stars"))
                    .normalize(Normalize::FirstToken),
            ],
            review_count: Vec::new(),
            sponsored: vec![Strategy::new(Locator::line_containing("sponsored"))],
        }
    }

    /// Replace whole chains for the fields named in `overrides`
    pub fn with_overrides(mut self, overrides: StrategyOverrides) -> Self {
        let StrategyOverrides {
            title,
            link,
            selling_price,
            reference_price,
            deal_tag,
            recent_purchase_volume,
            rating,
            review_count,
            sponsored,
        } = overrides;

        replace(&mut self.title, title);
        replace(&mut self.link, link);
        replace(&mut self.selling_price, selling_price);
        replace(&mut self.reference_price, reference_price);
        replace(&mut self.deal_tag, deal_tag);
        replace(&mut self.recent_purchase_volume, recent_purchase_volume);
        replace(&mut self.rating, rating);
        replace(&mut self.review_count, review_count);
        replace(&mut self.sponsored, sponsored);
        self
    }
}

fn replace(chain: &mut Vec<Strategy>, with: Option<Vec<Strategy>>) {
    if let Some(with) = with {
        *chain = with;
    }
}

/// Per-field replacements loaded from configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StrategyOverrides {
    pub title: Option<Vec<Strategy>>,
    pub link: Option<Vec<Strategy>>,
    pub selling_price: Option<Vec<Strategy>>,
    pub reference_price: Option<Vec<Strategy>>,
    pub deal_tag: Option<Vec<Strategy>>,
    pub recent_purchase_volume: Option<Vec<Strategy>>,
    pub rating: Option<Vec<Strategy>>,
    pub review_count: Option<Vec<Strategy>>,
    pub sponsored: Option<Vec<Strategy>>,
}

/// Raw extraction results for one node, before derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: Extraction<String>,
    pub link: Extraction<String>,
    pub selling_price: Extraction<String>,
    pub reference_price: Extraction<String>,
    pub deal_tag: Extraction<String>,
    pub recent_purchase_volume: Extraction<String>,
    pub rating: Extraction<String>,
    pub review_count: Extraction<String>,
    pub sponsored: Extraction<String>,
}

/// Runs every field's chain independently against one node
pub fn extract_fields(
    node: &dyn ListingNode,
    strategies: &FieldStrategies,
    base_url: Option<&Url>,
) -> ExtractedFields {
    ExtractedFields {
        title: extract(node, &strategies.title, base_url),
        link: extract(node, &strategies.link, base_url),
        selling_price: extract(node, &strategies.selling_price, base_url),
        reference_price: extract(node, &strategies.reference_price, base_url),
        deal_tag: extract(node, &strategies.deal_tag, base_url),
        recent_purchase_volume: extract(node, &strategies.recent_purchase_volume, base_url),
        rating: extract(node, &strategies.rating, base_url),
        review_count: extract(node, &strategies.review_count, base_url),
        sponsored: extract(node, &strategies.sponsored, base_url),
    }
}
