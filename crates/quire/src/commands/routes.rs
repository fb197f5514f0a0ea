//! `quire routes` command implementation.

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Print `path -> route` for every document in corpus-path order.
pub(crate) fn execute(global: &GlobalArgs) -> Result<(), CliError> {
    let output = Output::new();
    let corpus = global.load_corpus(None)?;
    for document in corpus.registry().documents() {
        output.print(&format!("{} -> {}", document.path, document.route));
    }
    Ok(())
}
