//! `quire check` command implementation.

use clap::{Args, ValueEnum};
use quire_site::{Corpus, Diagnostics, Severity};
use serde::Serialize;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Report format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum Format {
    Text,
    Json,
}

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Exit with a non-zero status when errors are found.
    #[arg(long)]
    strict: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Verify link fragments against headings (overrides config).
    #[arg(long)]
    anchors: bool,
}

/// Machine-readable check report.
#[derive(Serialize)]
struct Report<'a> {
    documents: usize,
    links: usize,
    errors: usize,
    warnings: usize,
    diagnostics: &'a Diagnostics,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or loading fails, or if `--strict`
    /// is set and the corpus has errors.
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let corpus = global.load_corpus(self.anchors.then_some(true))?;
        let diagnostics = corpus.diagnostics();

        match self.format {
            Format::Text => print_text(&output, &corpus),
            Format::Json => {
                let report = Report {
                    documents: corpus.registry().len(),
                    links: corpus.link_count(),
                    errors: diagnostics.error_count(),
                    warnings: diagnostics.warning_count(),
                    diagnostics,
                };
                output.print(&serde_json::to_string_pretty(&report)?);
            }
        }

        if self.strict && diagnostics.has_errors() {
            return Err(CliError::CheckFailed(diagnostics.error_count()));
        }
        Ok(())
    }
}

fn print_text(output: &Output, corpus: &Corpus) {
    let diagnostics = corpus.diagnostics();
    for diagnostic in diagnostics {
        match diagnostic.severity {
            Severity::Error => output.error(&diagnostic.to_string()),
            Severity::Warning => output.warning(&diagnostic.to_string()),
        }
    }

    let summary = format!(
        "Checked {} documents and {} links: {} error(s), {} warning(s)",
        corpus.registry().len(),
        corpus.link_count(),
        diagnostics.error_count(),
        diagnostics.warning_count()
    );
    if diagnostics.has_errors() {
        output.error(&summary);
    } else if diagnostics.is_empty() {
        output.success(&summary);
    } else {
        output.warning(&summary);
    }
}
