use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config file {0} does not exist. Run 'invoicer init' to create it.")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    #[error("Invalid value for '{key}' in config file {path}: {reason}")]
    InvalidConfigValue {
        path: PathBuf,
        key: String,
        reason: String,
    },

    #[error("Invalid invoice type '{name}' (config file {path}); options are {}", .options.join(", "))]
    InvalidSection {
        name: String,
        path: PathBuf,
        options: Vec<String>,
    },

    #[error("Missing required config key '{0}'")]
    MissingKey(String),

    #[error("Invoice numbers starting at {start} for {count} dates exceed {}", u64::MAX)]
    InvoiceNumberOverflow { start: u64, count: usize },

    #[error("Invalid value '{value}' for config key '{key}': {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid invoice dates (expected YYYYMMDD):\n{}", format_date_errors(.0))]
    InvalidDates(Vec<DateError>),

    #[error("Output directory {0} does not exist")]
    OutputDirNotFound(PathBuf),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

/// A single date argument that failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct DateError {
    pub input: String,
    pub reason: String,
}

fn format_date_errors(errors: &[DateError]) -> String {
    errors
        .iter()
        .map(|e| format!("   '{}': {}", e.input, e.reason))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
