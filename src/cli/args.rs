//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::application::services::Metric;
use crate::config::CatalogView;

/// Course catalogs of language academies: browse, intersect and merge
#[derive(Parser, Debug)]
#[command(name = "coursecat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug logging, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Data directory for catalogs given by name (default: from config)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one catalog
    Show {
        /// Catalog file or name
        #[arg(value_hint = ValueHint::FilePath)]
        catalog: String,
        #[arg(short, long, value_enum)]
        view: Option<CatalogView>,
    },

    /// Courses offered by both academies
    Common {
        /// First academy's catalog
        #[arg(value_hint = ValueHint::FilePath)]
        a: String,
        /// Second academy's catalog
        #[arg(value_hint = ValueHint::FilePath)]
        b: String,
        #[arg(short, long, value_enum)]
        view: Option<CatalogView>,
    },

    /// Every course of both academies
    Added {
        /// First academy's catalog
        #[arg(value_hint = ValueHint::FilePath)]
        a: String,
        /// Second academy's catalog
        #[arg(value_hint = ValueHint::FilePath)]
        b: String,
        /// Name appended to renamed courses of the first academy
        #[arg(long)]
        name_a: Option<String>,
        /// Name appended to renamed courses of the second academy
        #[arg(long)]
        name_b: Option<String>,
        #[arg(short, long, value_enum)]
        view: Option<CatalogView>,
    },

    /// Catalog statistics
    Stats {
        /// One or more catalogs
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        catalogs: Vec<String>,
        #[arg(short, long, value_enum, default_value_t = Metric::Language)]
        metric: Metric,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print config template
    Template,

    /// Show config paths
    Path,
}
