use std::time::Duration;

/// Errors raised while loading or compiling a harvest configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A listing batch could not be produced for a cursor position.
///
/// The controller never propagates this; it turns it into an empty step.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("no listing content for cursor {cursor}: {reason}")]
    Unavailable { cursor: u32, reason: String },

    #[error("listing for cursor {cursor} not ready after {after:?}")]
    TimedOut { cursor: u32, after: Duration },

    #[error("driver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),
}

/// Errors around the driver session itself
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not connect to any WebDriver server (configured {url})")]
    Connect { url: String },

    #[error("driver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("invalid storefront URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("unexpected foreground activity: {0}")]
    WrongActivity(String),
}

/// Errors while writing the collected dataset
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
