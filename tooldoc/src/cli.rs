use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for tooldoc
#[derive(Parser, Debug)]
#[command(author, version, about = "tooldoc: tool catalog documentation")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified
  /// multiple times). Multiple files are merged in order, with later
  /// files overriding earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,
}

/// All supported subcommands for the tooldoc CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new tooldoc configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "tooldoc.toml")]
    output: PathBuf,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Generate Markdown reference pages from a command catalog.
  Generate {
    /// Path to the command catalog JSON file.
    #[arg(short = 'C', long)]
    catalog: Option<PathBuf>,

    /// Output directory for generated pages.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to a custom page template, overriding the built-in one.
    #[arg(short, long)]
    template: Option<PathBuf>,
  },

  /// Validate Markdown pages against the catalog and template contract.
  Validate {
    /// Path to the directory containing markdown files.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Path to the command catalog JSON file.
    #[arg(short = 'C', long)]
    catalog: Option<PathBuf>,

    /// Path the JSON validation report is written to.
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Number of threads to use for parallel processing.
    #[arg(short = 'p', long = "jobs")]
    jobs: Option<usize>,
  },

  /// Extract example prompts per command into a JSON prompt bank.
  Prompts {
    /// Path to the directory containing markdown files.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Path to the command catalog JSON file.
    #[arg(short = 'C', long)]
    catalog: Option<PathBuf>,

    /// Output file for the prompt bank.
    #[arg(short, long, default_value = "prompts.json")]
    output: PathBuf,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
