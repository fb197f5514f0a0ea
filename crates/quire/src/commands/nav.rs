//! `quire nav` command implementation.

use clap::Args;
use quire_site::NavItem;

use super::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Only show the tree below this directory (e.g., `python`).
    #[arg(long)]
    section: Option<String>,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,
}

impl NavArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let corpus = global.load_corpus(None)?;
        let navigation = corpus.navigation(self.section.as_deref().unwrap_or(""));

        if self.json {
            output.print(&serde_json::to_string_pretty(&navigation)?);
        } else if navigation.is_empty() {
            output.info("No documents found");
        } else {
            print_tree(&output, &navigation, 0);
        }
        Ok(())
    }
}

fn print_tree(output: &Output, items: &[NavItem], depth: usize) {
    let indent = "  ".repeat(depth);
    for item in items {
        match item {
            NavItem::Doc(entry) => {
                output.print_with_note(&format!("{indent}{}", entry.label), &entry.route);
            }
            NavItem::Category(category) => {
                output.print_highlight(&format!("{indent}{}/", category.label));
                print_tree(output, &category.items, depth + 1);
            }
        }
    }
}
