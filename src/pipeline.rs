use crate::assembler::assemble;
use crate::crawlers::crawler::Batch;
use crate::derived::DerivedFields;
use crate::fields::{FieldStrategies, extract_fields};
use crate::filter::TitleFilter;
use crate::parsers::html::listing_nodes;
use crate::parsers::text::TextBlockNode;
use crate::parsers::{CssSelector, ListingNode};
use crate::results::{ProductRecord, RunContext};
use scraper::Html;
use url::Url;

/// Default container of one web search result
pub const DEFAULT_ITEM_SELECTOR: &str = "div[data-component-type='s-search-result']";

/// Records produced from one batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Listing nodes seen in the batch, duplicates included
    pub nodes: usize,
    /// Records that passed the title filter, in document order
    pub records: Vec<ProductRecord>,
}

/// Turns listing nodes into records: extract, derive, assemble
#[derive(Debug, Clone)]
pub struct ListingPipeline {
    item_selector: CssSelector,
    strategies: FieldStrategies,
}

impl ListingPipeline {
    pub fn new(item_selector: CssSelector, strategies: FieldStrategies) -> Self {
        Self {
            item_selector,
            strategies,
        }
    }

    /// Pipeline for web search-result pages with the built-in strategies
    pub fn web_listing() -> Self {
        Self::new(
            CssSelector::parse(DEFAULT_ITEM_SELECTOR).expect("built-in selectors should be valid"),
            FieldStrategies::web_listing(),
        )
    }

    /// Pipeline for mobile screen text blobs with the built-in strategies
    pub fn app_screen() -> Self {
        Self::new(
            CssSelector::parse(DEFAULT_ITEM_SELECTOR).expect("built-in selectors should be valid"),
            FieldStrategies::app_screen(),
        )
    }

    pub fn strategies(&self) -> &FieldStrategies {
        &self.strategies
    }

    /// Builds one record from one node
    pub fn record_for(
        &self,
        node: &dyn ListingNode,
        base_url: Option<&Url>,
        context: &RunContext,
    ) -> ProductRecord {
        let fields = extract_fields(node, &self.strategies, base_url);
        let derived = DerivedFields::compute(
            &fields.title,
            &fields.selling_price,
            &fields.reference_price,
        );
        assemble(fields, derived, context)
    }

    /// Runs every node of `batch` through the pipeline in document order
    pub fn process_batch(
        &self,
        batch: &Batch,
        context: &RunContext,
        filter: &mut TitleFilter,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        match batch {
            Batch::Html { url, source } => {
                let base_url = Url::parse(url).ok();
                let doc = Html::parse_document(source);
                for node in listing_nodes(&doc, &self.item_selector) {
                    outcome.nodes += 1;
                    let record = self.record_for(&node, base_url.as_ref(), context);
                    keep_if_new(record, filter, &mut outcome);
                }
            }
            Batch::TextBlocks(blobs) => {
                for blob in blobs {
                    outcome.nodes += 1;
                    let node = TextBlockNode::new(blob);
                    keep_if_new(self.record_for(&node, None, context), filter, &mut outcome);
                }
            }
        }

        ::log::debug!(
            "Batch yielded {} new records from {} nodes",
            outcome.records.len(),
            outcome.nodes
        );
        outcome
    }
}

fn keep_if_new(record: ProductRecord, filter: &mut TitleFilter, outcome: &mut BatchOutcome) {
    if filter.accept(&record) {
        outcome.records.push(record);
    }
}
