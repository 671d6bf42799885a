// Re-export modules
pub mod assembler;
pub mod config;
pub mod crawlers;
pub mod derived;
pub mod error;
pub mod export;
pub mod fields;
pub mod filter;
pub mod harvest;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{HarvestConfig, SourceConfig};
pub use harvest::{HarvestPlan, HarvestReport, harvest};
pub use pipeline::ListingPipeline;
pub use results::{Extraction, ProductRecord, RunContext};
