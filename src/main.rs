use chrono::Local;
use clap::Parser;
use shelf_harvest::config::SourceConfig;
use shelf_harvest::crawlers::app::AppScreenSource;
use shelf_harvest::crawlers::web::WebListingSource;
use shelf_harvest::{export, harvest};
use std::error::Error;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    // One date for the whole run
    let captured_at = Local::now().date_naive();
    let pipeline = config.pipeline();
    let plan = config.plan(captured_at);

    ::log::info!(
        "Harvesting {} terms in {} contexts",
        plan.search_terms.len(),
        plan.geo_contexts.len().max(1)
    );
    let start_time = std::time::Instant::now();

    let report = match &config.source {
        SourceConfig::Web(web) => {
            println!("Note: web harvesting requires a WebDriver server (e.g., ChromeDriver).");
            println!(
                "Set WEBDRIVER_URL environment variable if not using {}",
                web.webdriver_url
            );
            let mut source = WebListingSource::connect(web).await?;
            let report = harvest(&mut source, &pipeline, &plan).await;
            source.close().await;
            report
        }
        SourceConfig::App(app) => {
            let mut source = AppScreenSource::launch(app).await?;
            let report = harvest(&mut source, &pipeline, &plan).await;
            source.close().await;
            report
        }
    };

    for run in &report.runs {
        ::log::debug!(
            "{} / {}: {} records from {} nodes over {} steps",
            run.geo_context,
            run.search_term,
            run.records,
            run.nodes,
            run.steps
        );
    }

    let paths = export::export_all(
        &config.output_dir,
        &config.output_prefix,
        captured_at,
        &report.records,
    )?;

    ::log::info!(
        "Harvest finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    println!(
        "\nSaved {} records as {}",
        report.records.len(),
        paths
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}
