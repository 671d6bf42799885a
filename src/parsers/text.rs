use crate::parsers::{ListingNode, Locator};

/// A listing entry read from a mobile screen as one text blob.
///
/// The blob is split into lines, each line trimmed, blank lines dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlockNode {
    lines: Vec<String>,
}

impl TextBlockNode {
    pub fn new(blob: &str) -> Self {
        Self {
            lines: split_into_lines(blob),
        }
    }
}

impl ListingNode for TextBlockNode {
    fn read_text(&self, locator: &Locator) -> Option<String> {
        match locator {
            Locator::FirstLine => self.lines.first().cloned(),
            Locator::LineContaining { needle, excluding } => self
                .lines
                .iter()
                .find(|line| {
                    needle.found_in(line)
                        && !excluding.as_ref().is_some_and(|skip| skip.found_in(line))
                })
                .cloned(),
            Locator::Css { .. } | Locator::CssContaining { .. } => {
                ::log::trace!("CSS locator does not apply to text blocks");
                None
            }
        }
    }

    fn read_attr(&self, _locator: &Locator, name: &str) -> Option<String> {
        ::log::trace!("Text blocks carry no attributes (asked for `{}`)", name);
        None
    }
}

/// Splits a blob into trimmed, non-empty, whitespace-normalized lines
pub fn split_into_lines(blob: &str) -> Vec<String> {
    blob.lines()
        .map(normalize_whitespace_in_segment)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Normalizes whitespace within a single line or paragraph
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}
