use crate::error::{BatchError, SessionError};
use std::future::Future;

/// Raw listing content for one cursor position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batch {
    /// A rendered search-results page
    Html { url: String, source: String },
    /// Text blobs read from the views of a mobile screen
    TextBlocks(Vec<String>),
}

/// Something that can hand out listing batches, one cursor step at a time
pub trait BatchSource {
    /// Bring up the listing for a search term
    fn open(&mut self, search_term: &str) -> impl Future<Output = Result<(), SessionError>>;

    /// Retrieve the batch for `cursor` (1-based page number or scroll step)
    fn fetch(&mut self, cursor: u32) -> impl Future<Output = Result<Batch, BatchError>>;
}

/// A session whose delivery location can be switched
pub trait GeoContext {
    fn set_geo_context(&mut self, value: &str) -> impl Future<Output = Result<(), SessionError>>;
}
