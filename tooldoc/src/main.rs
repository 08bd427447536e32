use std::{fs, process::ExitCode};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info, warn};
use tooldoc_config::Config;

mod cli;
mod discover;
mod generate;
mod prompts;
mod report;
mod validate;

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init { output, force } => {
      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !*force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      // Create parent directories if needed
      if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
          fs::create_dir_all(parent).wrap_err_with(|| {
            format!("Failed to create directory: {}", parent.display())
          })?;
          info!("Created directory: {}", parent.display());
        }
      }

      Config::generate_default_config(output).wrap_err_with(|| {
        format!(
          "Failed to generate configuration file: {}",
          output.display()
        )
      })?;

      info!(
        "Configuration file created successfully. Edit it to customize \
         generation and validation."
      );
      Ok(ExitCode::SUCCESS)
    },

    Commands::Generate {
      catalog,
      output_dir,
      template,
    } => {
      let config = Config::load(&cli.config_files)?;
      generate::generate_pages(
        &config,
        catalog.as_deref(),
        output_dir.as_deref(),
        template.as_deref(),
      )?;
      Ok(ExitCode::SUCCESS)
    },

    Commands::Validate {
      input_dir,
      catalog,
      report,
      jobs,
    } => {
      let config = Config::load(&cli.config_files)?;
      let summary = validate::validate_corpus(
        &config,
        input_dir.as_deref(),
        catalog.as_deref(),
        report.as_deref(),
        *jobs,
      )?;

      // The engine never decides process exit; that is this layer's call.
      if summary.error_count > 0 {
        warn!(
          "validation failed: {} error(s), {} warning(s) across {} \
           document(s)",
          summary.error_count, summary.warning_count, summary.document_count
        );
        Ok(ExitCode::FAILURE)
      } else {
        info!(
          "validation passed: {} warning(s) across {} document(s)",
          summary.warning_count, summary.document_count
        );
        Ok(ExitCode::SUCCESS)
      }
    },

    Commands::Prompts {
      input_dir,
      catalog,
      output,
    } => {
      let config = Config::load(&cli.config_files)?;
      prompts::extract_prompt_bank(
        &config,
        input_dir.as_deref(),
        catalog.as_deref(),
        output,
      )?;
      Ok(ExitCode::SUCCESS)
    },
  }
}
