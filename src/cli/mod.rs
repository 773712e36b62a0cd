mod cache;
mod generate;
mod groups;
mod init;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::Result;

pub use generate::{build_report, Report};

#[derive(Parser)]
#[command(name = "pytest-plugin-list")]
#[command(about = "Generate a grouped Markdown list of pytest plugins published on PyPI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch plugin metadata from PyPI and write the report
    Generate {
        /// Settings file (defaults to ./plugin-list.toml, then the global one)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the report here instead of the configured output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Create a plugin-list.toml with the default settings
    Init {
        /// Create global settings (~/.config/pytest-plugin-list/plugin-list.toml)
        #[arg(long)]
        global: bool,
    },

    /// Show or edit the keyword groups
    Groups {
        #[command(subcommand)]
        command: GroupsCommand,
    },

    /// Inspect or clear the HTTP response cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
pub enum GroupsCommand {
    /// List groups in match order
    List {
        /// Settings file to read
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Add a group to the settings file
    Add {
        /// Group label, used as the section heading
        label: String,

        /// Keywords matched against package names
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Insert before this group instead of at the end
        #[arg(long)]
        before: Option<String>,
    },

    /// Remove a group from the settings file
    Remove {
        /// Group label to remove
        label: String,
    },
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Print the cache directory
    Path,

    /// Delete every cached response
    Clear,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Generate {
                config,
                output,
                quiet,
            } => generate::run(config, output, quiet),
            Commands::Init { global } => init::run(global),
            Commands::Groups { command } => match command {
                GroupsCommand::List { config } => groups::list(config),
                GroupsCommand::Add {
                    label,
                    keywords,
                    before,
                } => groups::add(label, keywords, before),
                GroupsCommand::Remove { label } => groups::remove(label),
            },
            Commands::Cache { command } => match command {
                CacheCommand::Path => cache::path(),
                CacheCommand::Clear => cache::clear(),
            },
        }
    }
}
