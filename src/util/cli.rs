use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List phrases in the lexicon, optionally filtered by pinyin.
    List {
        /// Only show entries whose pinyin equals this value (case-insensitive).
        #[arg(long, value_name = "PINYIN")]
        filter: Option<String>,

        /// Print entries as JSON instead of text lines.
        #[arg(long)]
        json: bool,

        /// Path to the .lex file. Defaults to the current user's lexicon.
        #[arg(long, value_name = "PATH")]
        lex: Option<PathBuf>,
    },

    /// Export all phrases to a text file, one `pinyin slot text` per line.
    Export {
        /// Output text file path.
        output: PathBuf,

        /// Path to the .lex file. Defaults to the current user's lexicon.
        #[arg(long, value_name = "PATH")]
        lex: Option<PathBuf>,
    },

    /// Import phrases from a text file; same-pinyin entries replace existing ones.
    Import {
        /// Input text file, `pinyin slot text` per line, `#` for comments.
        input: PathBuf,

        /// Path to the .lex file. Defaults to the current user's lexicon.
        #[arg(long, value_name = "PATH")]
        lex: Option<PathBuf>,

        /// Skip the backup copy normally written before the rewrite.
        #[arg(long)]
        no_backup: bool,

        /// Validate the input and report, without writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Report every rejected line on stdout.
        #[arg(long)]
        verbose: bool,
    },

    /// Show structural information about a lexicon file.
    Inspect {
        /// Path to the .lex file. Defaults to the current user's lexicon.
        #[arg(long, value_name = "PATH")]
        lex: Option<PathBuf>,

        /// Also decode and print the first few entries.
        #[arg(long)]
        verbose: bool,
    },
}
