use crate::parsers::text::normalize_whitespace_in_segment;
use crate::parsers::{CssSelector, ListingNode, Locator};
use scraper::{ElementRef, Html};

/// A web search-result card inside a parsed document
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlNode<'a> {
    pub fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    fn locate(&self, locator: &Locator) -> Option<ElementRef<'a>> {
        match locator {
            Locator::Css { selector } => self.element.select(selector.selector()).next(),
            Locator::CssContaining { selector, needle } => self
                .element
                .select(selector.selector())
                .find(|el| needle.found_in(&own_text(el))),
            Locator::FirstLine | Locator::LineContaining { .. } => {
                ::log::trace!("Line locator does not apply to HTML nodes");
                None
            }
        }
    }
}

impl ListingNode for HtmlNode<'_> {
    fn read_text(&self, locator: &Locator) -> Option<String> {
        let element = self.locate(locator)?;
        let text = visible_text(&element);
        if text.is_empty() { None } else { Some(text) }
    }

    fn read_attr(&self, locator: &Locator, name: &str) -> Option<String> {
        let element = self.locate(locator)?;
        element
            .value()
            .attr(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// Selects the listing cards of a document in document order
pub fn listing_nodes<'a>(doc: &'a Html, items: &CssSelector) -> Vec<HtmlNode<'a>> {
    let nodes = doc
        .select(items.selector())
        .map(HtmlNode::new)
        .collect::<Vec<_>>();

    ::log::debug!(
        "HTML parser found {} listing nodes for `{}`",
        nodes.len(),
        items.as_str()
    );
    nodes
}

/// All descendant text, whitespace collapsed
fn visible_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace_in_segment(&element.text().collect::<String>())
}

/// Only the element's direct text children
fn own_text(element: &ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .fold(String::new(), |mut acc, text| {
            acc.push_str(text);
            acc
        })
}
