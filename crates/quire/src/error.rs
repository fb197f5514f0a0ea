//! CLI error types.

use quire_config::ConfigError;
use quire_meta::FrontMatterError;
use quire_site::CorpusError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Corpus(#[from] CorpusError),

    #[error("{0}")]
    FrontMatter(#[from] FrontMatterError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// `check --strict` found errors.
    #[error("check failed with {0} error(s)")]
    CheckFailed(usize),
}
