use crate::crawlers::controller::{ControllerConfig, ListingController};
use crate::crawlers::crawler::{BatchSource, GeoContext};
use crate::pipeline::ListingPipeline;
use crate::results::{ProductRecord, RunContext};
use chrono::NaiveDate;

/// Geographic context stamped when none is configured
pub const GEO_NOT_SET: &str = "Not Set";

/// The cross product to collect: every term in every geographic context
#[derive(Debug, Clone)]
pub struct HarvestPlan {
    pub search_terms: Vec<String>,
    pub geo_contexts: Vec<String>,
    pub category: Option<String>,
    pub controller: ControllerConfig,
    pub captured_at: NaiveDate,
}

/// Counts for one (context, term) collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub geo_context: String,
    pub search_term: String,
    pub steps: u32,
    pub failed_steps: u32,
    pub nodes: usize,
    pub records: usize,
}

/// Output of a whole harvest
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    pub records: Vec<ProductRecord>,
    pub runs: Vec<RunSummary>,
}

/// Collects every search term in every geographic context, one after another.
///
/// A context that cannot be set, or a term whose listing cannot be opened, is logged
/// and skipped; nothing here aborts the harvest.
pub async fn harvest<S>(
    source: &mut S,
    pipeline: &ListingPipeline,
    plan: &HarvestPlan,
) -> HarvestReport
where
    S: BatchSource + GeoContext,
{
    let mut report = HarvestReport::default();

    if plan.geo_contexts.is_empty() {
        collect_terms(source, pipeline, plan, GEO_NOT_SET, &mut report).await;
    } else {
        for geo_context in &plan.geo_contexts {
            if let Err(e) = source.set_geo_context(geo_context).await {
                ::log::warn!("Failed to set delivery location {}: {}", geo_context, e);
            }
            collect_terms(source, pipeline, plan, geo_context, &mut report).await;
        }
    }

    ::log::info!(
        "Harvest complete: {} records from {} runs",
        report.records.len(),
        report.runs.len()
    );
    report
}

async fn collect_terms<S: BatchSource>(
    source: &mut S,
    pipeline: &ListingPipeline,
    plan: &HarvestPlan,
    geo_context: &str,
    report: &mut HarvestReport,
) {
    for term in &plan.search_terms {
        let mut context = RunContext::new(term, geo_context, plan.captured_at);
        if let Some(category) = &plan.category {
            context = context.with_category(category);
        }

        ::log::info!("Collecting '{}' in {}", term, geo_context);
        if let Err(e) = source.open(term).await {
            ::log::warn!("Could not open listing for '{}': {}", term, e);
            report.runs.push(RunSummary {
                geo_context: geo_context.to_string(),
                search_term: term.clone(),
                steps: 0,
                failed_steps: 0,
                nodes: 0,
                records: 0,
            });
            continue;
        }

        let collection = ListingController::new(pipeline, plan.controller)
            .collect(source, &context)
            .await;

        report.runs.push(RunSummary {
            geo_context: geo_context.to_string(),
            search_term: term.clone(),
            steps: collection.steps,
            failed_steps: collection.failed_steps,
            nodes: collection.nodes,
            records: collection.records.len(),
        });
        report.records.extend(collection.records);
    }
}
