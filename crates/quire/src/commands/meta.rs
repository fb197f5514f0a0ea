//! `quire meta` command implementation.

use std::path::PathBuf;

use clap::Args;
use quire_meta::FrontMatter;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the meta command.
#[derive(Args)]
pub(crate) struct MetaArgs {
    /// Markdown file to read.
    file: PathBuf,
}

impl MetaArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let text = std::fs::read_to_string(&self.file)?;
        let (meta, _) = FrontMatter::parse(&text)?;
        output.print(&serde_json::to_string_pretty(&meta)?);
        Ok(())
    }
}
