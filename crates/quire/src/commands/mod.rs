//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod meta;
pub(crate) mod nav;
pub(crate) mod routes;

use std::path::PathBuf;

use clap::Args;
use quire_config::{CliSettings, Config};
use quire_site::{Corpus, CorpusConfig};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use meta::MetaArgs;
pub(crate) use nav::NavArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long, global = true, env = "QUIRE_SOURCE_DIR")]
    source_dir: Option<PathBuf>,

    /// Enable verbose output (build summary and timing logs).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load configuration, applying CLI overrides.
    fn load_config(&self, check_anchors: Option<bool>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            check_anchors,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            config = ?config.config_path,
            source_dir = %config.docs_resolved.source_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration and build the corpus.
    pub(crate) fn load_corpus(&self, check_anchors: Option<bool>) -> Result<Corpus, CliError> {
        let config = self.load_config(check_anchors)?;
        Ok(Corpus::load(&corpus_config(&config))?)
    }
}

/// Map loaded configuration onto corpus build options.
fn corpus_config(config: &Config) -> CorpusConfig {
    CorpusConfig {
        source_dir: config.docs_resolved.source_dir.clone(),
        extensions: config.docs_resolved.extensions.clone(),
        exclude: config.docs_resolved.exclude.clone(),
        category_files: category_files(&config.metadata.category_file),
        check_anchors: config.links.check_anchors,
        check_assets: config.links.check_assets,
    }
}

/// The configured sidecar name plus its JSON variant.
fn category_files(name: &str) -> Vec<String> {
    let mut names = vec![name.to_owned()];
    if let Some((stem, ext)) = name.rsplit_once('.')
        && ext != "json"
    {
        names.push(format!("{stem}.json"));
    }
    names
}
