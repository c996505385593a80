use thiserror::Error;

use crate::catalog::Node;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Catalog returned no processing nodes")]
    EmptyCatalog,

    #[error("No usable processing nodes ({} considered)", .considered.len())]
    NoUsableNodes { considered: Vec<Node> },

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Failures recovered by silently re-fetching the catalog, as opposed
    /// to the catalog errors that are surfaced with a retry action.
    pub fn is_silent_retry(&self) -> bool {
        matches!(self, Error::Http(_) | Error::MalformedResponse(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
