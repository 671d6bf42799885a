use crate::crawlers::crawler::{Batch, BatchSource};
use crate::error::BatchError;
use crate::filter::TitleFilter;
use crate::pipeline::ListingPipeline;
use crate::results::{ProductRecord, RunContext};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

/// How the cursor advances through a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorMode {
    /// Numbered result pages; an empty page is skipped
    Page,
    /// Successive scroll positions; an empty screen ends the listing
    Scroll,
}

/// Bounds for one collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub mode: CursorMode,
    pub max_steps: u32,
    pub batch_timeout: Duration,
}

impl ControllerConfig {
    pub fn pages(max_pages: u32) -> Self {
        Self {
            mode: CursorMode::Page,
            max_steps: max_pages,
            batch_timeout: Duration::from_secs(40),
        }
    }

    pub fn scrolls(max_scrolls: u32) -> Self {
        Self {
            mode: CursorMode::Scroll,
            max_steps: max_scrolls,
            batch_timeout: Duration::from_secs(23),
        }
    }

    pub fn with_batch_timeout(mut self, batch_timeout: Duration) -> Self {
        self.batch_timeout = batch_timeout;
        self
    }
}

/// Where the controller is in its fetch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Fetching { cursor: u32 },
    HasNodes { cursor: u32, nodes: usize },
    Empty { cursor: u32 },
    Terminal,
}

/// Everything one collection run produced
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub records: Vec<ProductRecord>,
    /// Fetch attempts made
    pub steps: u32,
    /// Steps whose batch could not be retrieved in time
    pub failed_steps: u32,
    /// Listing nodes seen, duplicates included
    pub nodes: usize,
}

/// Drives a [`BatchSource`] cursor by cursor and feeds every node to the pipeline.
///
/// Owns the title filter for its run; a new controller starts with no seen titles.
pub struct ListingController<'p> {
    pipeline: &'p ListingPipeline,
    config: ControllerConfig,
    state: ControllerState,
    filter: TitleFilter,
    collection: Collection,
}

impl<'p> ListingController<'p> {
    pub fn new(pipeline: &'p ListingPipeline, config: ControllerConfig) -> Self {
        Self {
            pipeline,
            config,
            state: ControllerState::Idle,
            filter: TitleFilter::new(),
            collection: Collection::default(),
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Performs one state transition and returns the new state
    pub async fn step<S: BatchSource>(
        &mut self,
        source: &mut S,
        context: &RunContext,
    ) -> ControllerState {
        self.state = match self.state {
            ControllerState::Idle => self.advance_from(0),
            ControllerState::Fetching { cursor } => {
                self.collection.steps += 1;
                match self.fetch(source, cursor).await {
                    Some(batch) => {
                        let outcome =
                            self.pipeline.process_batch(&batch, context, &mut self.filter);
                        self.collection.nodes += outcome.nodes;
                        self.collection.records.extend(outcome.records);
                        if outcome.nodes == 0 {
                            ControllerState::Empty { cursor }
                        } else {
                            ControllerState::HasNodes {
                                cursor,
                                nodes: outcome.nodes,
                            }
                        }
                    }
                    None => {
                        self.collection.failed_steps += 1;
                        ControllerState::Empty { cursor }
                    }
                }
            }
            ControllerState::HasNodes { cursor, .. } => self.advance_from(cursor),
            ControllerState::Empty { cursor } => match self.config.mode {
                CursorMode::Page => self.advance_from(cursor),
                CursorMode::Scroll => {
                    ::log::info!("Empty batch at scroll {}, end of listing", cursor);
                    ControllerState::Terminal
                }
            },
            ControllerState::Terminal => ControllerState::Terminal,
        };
        self.state
    }

    /// Runs to completion and returns the collected records
    pub async fn collect<S: BatchSource>(
        mut self,
        source: &mut S,
        context: &RunContext,
    ) -> Collection {
        while self.step(source, context).await != ControllerState::Terminal {}

        ::log::info!(
            "Collected {} records for '{}' in {} over {} steps ({} failed)",
            self.collection.records.len(),
            context.search_term,
            context.geo_context,
            self.collection.steps,
            self.collection.failed_steps
        );
        self.collection
    }

    fn advance_from(&self, cursor: u32) -> ControllerState {
        let next = cursor + 1;
        if next > self.config.max_steps {
            ControllerState::Terminal
        } else {
            ControllerState::Fetching { cursor: next }
        }
    }

    /// Bounded fetch; any failure becomes `None`
    async fn fetch<S: BatchSource>(&self, source: &mut S, cursor: u32) -> Option<Batch> {
        ::log::info!("Fetching {:?} {}", self.config.mode, cursor);

        let error = match timeout(self.config.batch_timeout, source.fetch(cursor)).await {
            Ok(Ok(batch)) => return Some(batch),
            Ok(Err(e)) => e,
            Err(_) => BatchError::TimedOut {
                cursor,
                after: self.config.batch_timeout,
            },
        };

        ::log::warn!("{}", error);
        None
    }
}
