use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder values written when a field could not be extracted
pub mod sentinel {
    pub const TITLE: &str = "No Title";
    pub const GRAMMAGE: &str = "No Grammage";
    pub const PRICE: &str = "No Price";
    pub const DEAL: &str = "No Deal";
    pub const PURCHASE_VOLUME: &str = "No data";
    pub const RATING: &str = "No Rating";
    pub const REVIEWS: &str = "No Reviews";
    pub const LINK: &str = "No Link";
}

/// Outcome of extracting a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<T> {
    Found(T),
    Missing,
}

impl<T> Extraction<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(_))
    }
}

impl Extraction<String> {
    /// Renders the value, or the field's sentinel when missing
    pub fn or_sentinel(self, sentinel: &str) -> String {
        match self {
            Extraction::Found(value) => value,
            Extraction::Missing => sentinel.to_string(),
        }
    }
}

impl<T> From<Option<T>> for Extraction<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Extraction::Found(value),
            None => Extraction::Missing,
        }
    }
}

/// Values supplied by orchestration for one collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub search_term: String,
    pub geo_context: String,
    pub category: String,
    pub captured_at: NaiveDate,
}

impl RunContext {
    /// Create a context whose category is the search term itself
    pub fn new(search_term: &str, geo_context: &str, captured_at: NaiveDate) -> Self {
        Self {
            search_term: search_term.to_string(),
            geo_context: geo_context.to_string(),
            category: search_term.to_string(),
            captured_at,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }
}

/// One product entry of the output dataset.
///
/// Every field always holds either a value or its sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "Grammage")]
    pub grammage: String,

    #[serde(rename = "Selling Price")]
    pub selling_price: String,

    #[serde(rename = "MRP")]
    pub reference_price: String,

    #[serde(rename = "Discount %")]
    pub discount_percent: f64,

    #[serde(rename = "Deal Tags")]
    pub deal_tag: String,

    #[serde(rename = "Quantity Bought")]
    pub recent_purchase_volume: String,

    #[serde(rename = "Rating")]
    pub rating: String,

    #[serde(rename = "Reviews")]
    pub review_count: String,

    #[serde(rename = "Link")]
    pub link: String,

    #[serde(rename = "Ad/Not Ad", with = "ad_flag")]
    pub is_sponsored: bool,

    #[serde(rename = "Date", with = "day_month_year")]
    pub captured_at: NaiveDate,

    #[serde(rename = "Search Term")]
    pub search_term: String,

    #[serde(rename = "Pincode")]
    pub geo_context: String,

    #[serde(rename = "Category")]
    pub category: String,
}

impl ProductRecord {
    /// Key used to recognise repeated listings within a run
    pub fn identity_key(&self) -> &str {
        self.title.trim()
    }
}

pub(crate) mod ad_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    const AD: &str = "Ad";
    const NOT_AD: &str = "Not Ad";

    pub fn label(value: bool) -> &'static str {
        if value { AD } else { NOT_AD }
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(label(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw == AD)
    }
}

pub(crate) mod day_month_year {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub const FORMAT: &str = "%d-%m-%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(D::Error::custom)
    }
}
