use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YNAB API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No budgets found")]
    NoBudgets,
}

pub type Result<T> = std::result::Result<T, SplitError>;
