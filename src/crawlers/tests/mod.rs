
use crate::crawlers::crawler::{Batch, BatchSource, GeoContext};
use crate::error::{BatchError, SessionError};
use crate::parsers::tests::fixtures::{SEARCH_URL, search_page};
use std::time::Duration;

/// What a scripted source answers for one cursor
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Page(Vec<&'static str>),
    Blobs(Vec<&'static str>),
    /// A page that only arrives after the delay
    Slow(Duration, Vec<&'static str>),
    Fail,
    Hang,
}

/// In-memory listing source that replays a script, cursor by cursor
#[derive(Debug, Default)]
pub(crate) struct ScriptedSource {
    steps: Vec<Step>,
    repeat: Option<Step>,
    pub fetched: Vec<u32>,
    pub opened: Vec<String>,
    pub geo_contexts: Vec<String>,
    pub refuse_terms: Vec<String>,
    pub refuse_geo: bool,
}

impl ScriptedSource {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps,
            ..Self::default()
        }
    }

    /// Answers every cursor with the same step
    pub fn repeating(step: Step) -> Self {
        Self {
            repeat: Some(step),
            ..Self::default()
        }
    }

    fn step_for(&self, cursor: u32) -> Step {
        if let Some(step) = &self.repeat {
            return step.clone();
        }
        self.steps
            .get(cursor as usize - 1)
            .cloned()
            .unwrap_or(Step::Page(Vec::new()))
    }
}

impl BatchSource for ScriptedSource {
    async fn open(&mut self, search_term: &str) -> Result<(), SessionError> {
        if self.refuse_terms.iter().any(|term| term == search_term) {
            return Err(SessionError::NotFound("search box".to_string()));
        }
        self.opened.push(search_term.to_string());
        Ok(())
    }

    async fn fetch(&mut self, cursor: u32) -> Result<Batch, BatchError> {
        self.fetched.push(cursor);
        match self.step_for(cursor) {
            Step::Page(cards) => Ok(Batch::Html {
                url: SEARCH_URL.to_string(),
                source: search_page(&cards),
            }),
            Step::Blobs(blobs) => Ok(Batch::TextBlocks(
                blobs.into_iter().map(str::to_string).collect(),
            )),
            Step::Slow(delay, cards) => {
                tokio::time::sleep(delay).await;
                Ok(Batch::Html {
                    url: SEARCH_URL.to_string(),
                    source: search_page(&cards),
                })
            }
            Step::Fail => Err(BatchError::Unavailable {
                cursor,
                reason: "results never appeared".to_string(),
            }),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Batch::TextBlocks(Vec::new()))
            }
        }
    }
}

impl GeoContext for ScriptedSource {
    async fn set_geo_context(&mut self, value: &str) -> Result<(), SessionError> {
        self.geo_contexts.push(value.to_string());
        if self.refuse_geo {
            return Err(SessionError::NotFound("pincode input".to_string()));
        }
        Ok(())
    }
}
