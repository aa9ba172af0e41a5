use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Send one request and print the answer
    Ask {
        text: String,

        /// Task label, e.g. "Summarize" or generate-user-story (see `tasks`)
        #[arg(short, long)]
        task: Option<String>,

        /// Save the answer as plain text
        #[arg(long)]
        export_text: Option<PathBuf>,

        /// Save the answer as a Word document
        #[arg(long)]
        export_docx: Option<PathBuf>,
    },

    /// Start an interactive chat session
    Chat {
        #[arg(short, long)]
        task: Option<String>,
    },

    /// List the available task labels
    Tasks,
}
