use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Word-frequency highlighting for English pages
#[derive(Parser)]
#[command(name = "insight")]
#[command(version)]
pub(crate) struct Cli {
    /// JSON config file; defaults plus environment overrides when absent
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Load the word lists into storage
    Install {
        /// JSON array of words, most frequent first
        #[arg(long)]
        rank: PathBuf,

        /// JSON array of `[lemma, [variants]]`
        #[arg(long)]
        lemma: PathBuf,
    },

    /// Highlight a plain-text page and print the resulting markup
    Highlight {
        /// Blank-line separated paragraphs, `# ` and `## ` for headings
        page: PathBuf,

        /// Host the page is served from
        #[arg(long, default_value = "localhost")]
        host: String,

        /// JSON array of `[word, translation]`
        #[arg(long)]
        translations: Option<PathBuf>,

        /// Hover the first highlight of this word and print the popup
        #[arg(long)]
        hover: Option<String>,
    },

    /// Never highlight a lemma again
    Ignore { lemma: String },

    /// Highlight a previously ignored lemma again
    Unignore { lemma: String },

    /// Set the percentile threshold (0-100)
    Percent {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },

    /// Set the global mode: enable, disable or forbidden
    Mode { mode: String },

    /// Set a site override: follow, include or exclude
    SiteMode { host: String, mode: String },

    /// Print the stored settings
    Show,
}
