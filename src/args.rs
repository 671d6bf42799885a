use clap::{Parser, ValueEnum};
use shelf_harvest::config::{AppSourceConfig, HarvestConfig, SourceConfig, WebSourceConfig};
use shelf_harvest::error::ConfigError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shelf-harvest")]
#[command(about = "Collects product listings for search terms across delivery pincodes")]
#[command(version)]
pub struct Args {
    /// Path to a harvest configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listing source when no configuration file is given
    #[arg(short, long, value_enum, default_value_t = SourceArg::Web)]
    pub source: SourceArg,

    /// Search term to collect (repeatable)
    #[arg(short, long = "term")]
    pub terms: Vec<String>,

    /// Delivery pincode to collect in (repeatable, web only)
    #[arg(short, long = "pincode")]
    pub pincodes: Vec<String>,

    /// Override max pages (web) or max scrolls (app)
    #[arg(short, long)]
    pub max_steps: Option<u32>,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    Web,
    App,
}

impl Args {
    /// Configuration file (or defaults) with command-line overrides applied
    pub fn resolve_config(&self) -> Result<HarvestConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::new(match self.source {
                SourceArg::Web => SourceConfig::Web(WebSourceConfig::new()),
                SourceArg::App => SourceConfig::App(AppSourceConfig::new()),
            }),
        };

        if !self.terms.is_empty() {
            config.search_terms = self.terms.clone();
        }
        if !self.pincodes.is_empty() {
            match &mut config.source {
                SourceConfig::Web(web) => web.pincodes = self.pincodes.clone(),
                SourceConfig::App(_) => {
                    ::log::warn!("Pincodes are ignored for the app source");
                }
            }
        }
        if let Some(max_steps) = self.max_steps {
            config.set_max_steps(max_steps);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }

        config.apply_env();
        config.validate()?;
        Ok(config)
    }
}
