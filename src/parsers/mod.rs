pub mod html;
pub mod text;

#[cfg(test)]
pub(crate) mod tests;

use crate::error::ConfigError;
use scraper::Selector;
use serde::Deserialize;
use std::fmt;

/// One rendered product entry.
///
/// Implementations answer `None` whenever a locator finds nothing, finds only empty
/// text, or does not apply to this kind of node.
pub trait ListingNode {
    /// Visible text of the first descendant matched by `locator`
    fn read_text(&self, locator: &Locator) -> Option<String>;

    /// Attribute `name` of the first descendant matched by `locator`
    fn read_attr(&self, locator: &Locator, name: &str) -> Option<String>;
}

/// A compiled CSS selector that keeps its source text for diagnostics
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct CssSelector {
    source: String,
    selector: Selector,
}

impl CssSelector {
    pub fn parse(source: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(source).map_err(|e| ConfigError::Selector {
            selector: source.to_string(),
            reason: format!("{e:?}"),
        })?;
        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl TryFrom<String> for CssSelector {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Debug for CssSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CssSelector({:?})", self.source)
    }
}

/// Case-folded substring used for text matching
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct Needle(String);

impl Needle {
    pub fn new(value: &str) -> Self {
        Self(value.to_lowercase())
    }

    /// Case-insensitive containment check
    pub fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.0)
    }

    /// Text before and after the first occurrence, ASCII case-insensitive
    pub fn split_around<'h>(&self, haystack: &'h str) -> Option<(&'h str, &'h str)> {
        let start = haystack.to_ascii_lowercase().find(&self.0)?;
        let end = start + self.0.len();
        Some((haystack.get(..start)?, haystack.get(end..)?))
    }
}

impl From<String> for Needle {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// How a strategy finds its element inside a listing node
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Locator {
    /// First descendant matching a CSS selector
    Css { selector: CssSelector },
    /// First CSS match whose own text contains the needle
    CssContaining {
        selector: CssSelector,
        needle: Needle,
    },
    /// First line of a text block
    FirstLine,
    /// First line of a text block containing the needle and not `excluding`
    LineContaining {
        needle: Needle,
        #[serde(default)]
        excluding: Option<Needle>,
    },
}

impl Locator {
    /// Build a CSS locator from a built-in selector
    pub fn css(selector: &str) -> Self {
        Locator::Css {
            selector: builtin_selector(selector),
        }
    }

    pub fn css_containing(selector: &str, needle: &str) -> Self {
        Locator::CssContaining {
            selector: builtin_selector(selector),
            needle: Needle::new(needle),
        }
    }

    pub fn line_containing(needle: &str) -> Self {
        Locator::LineContaining {
            needle: Needle::new(needle),
            excluding: None,
        }
    }

    pub fn line_containing_but_not(needle: &str, excluding: &str) -> Self {
        Locator::LineContaining {
            needle: Needle::new(needle),
            excluding: Some(Needle::new(excluding)),
        }
    }
}

fn builtin_selector(source: &str) -> CssSelector {
    CssSelector::parse(source).expect("built-in selectors should be valid")
}
