//! Pipeline command handlers
//!
//! Fetching, hashing, checking, applying and deleting pipeline configs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use gantry_client::ServerClient;
use gantry_core::{
    ApplyOutcome, InMemoryResolver, Observation, Reconciler, Verdict, compute_hashes,
};

use crate::config::Config;
use crate::sources::{load_resolver, load_spec};
use crate::state::{load_status, save_status};

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// Print a pipeline config as the server holds it
    Get {
        /// Pipeline name
        name: String,
    },
    /// Print the drift hashes of a desired pipeline
    Hashes {
        /// Desired pipeline file (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Secrets and config maps file; environment variables when omitted
        #[arg(long)]
        sources: Option<PathBuf>,
    },
    /// Compare a desired pipeline with the server without changing anything
    Check {
        /// Desired pipeline file (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// State file holding the recorded status
        #[arg(long, default_value = "gantry-state.json")]
        state: PathBuf,

        /// Secrets and config maps file; environment variables when omitted
        #[arg(long)]
        sources: Option<PathBuf>,
    },
    /// Create or update the pipeline so the server matches the file
    Apply {
        /// Desired pipeline file (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// State file holding the recorded status
        #[arg(long, default_value = "gantry-state.json")]
        state: PathBuf,

        /// Secrets and config maps file; environment variables when omitted
        #[arg(long)]
        sources: Option<PathBuf>,
    },
    /// Delete the pipeline from the server
    Delete {
        /// Desired pipeline file (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// State file holding the recorded status
        #[arg(long, default_value = "gantry-state.json")]
        state: PathBuf,
    },
}

/// Handle pipeline commands
///
/// Routes pipeline subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The pipeline command to execute
/// * `config` - The CLI configuration
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    match command {
        PipelineCommands::Get { name } => get_pipeline(&client(config)?, &name).await,
        PipelineCommands::Hashes { file, sources } => print_hashes(&file, sources.as_deref()).await,
        PipelineCommands::Check {
            file,
            state,
            sources,
        } => check_pipeline(config, &file, &state, sources.as_deref()).await,
        PipelineCommands::Apply {
            file,
            state,
            sources,
        } => apply_pipeline(config, &file, &state, sources.as_deref()).await,
        PipelineCommands::Delete { file, state } => delete_pipeline(config, &file, &state).await,
    }
}

fn client(config: &Config) -> Result<ServerClient> {
    let client_config = config.client_config();
    client_config.validate()?;
    ServerClient::from_config(&client_config).context("Failed to build HTTP client")
}

fn reconciler(config: &Config, sources: Option<&Path>) -> Result<Reconciler> {
    Ok(Reconciler::new(Arc::new(client(config)?), load_resolver(sources)?))
}

/// Get and display a pipeline config
async fn get_pipeline(client: &ServerClient, name: &str) -> Result<()> {
    let Some(found) = client.get_pipeline_config(name).await? else {
        println!("{}", format!("Pipeline '{}' not found.", name).yellow());
        return Ok(());
    };

    eprintln!("{} {}", "ETag:".bold(), found.etag.dimmed());
    println!("{}", serde_json::to_string_pretty(&found.value)?);
    Ok(())
}

/// Print the drift hashes for a desired pipeline
async fn print_hashes(file: &Path, sources: Option<&Path>) -> Result<()> {
    let spec = load_spec(file)?;
    let resolver = load_resolver(sources)?;

    let hashes = compute_hashes(&spec, resolver.as_ref())
        .await
        .context("Failed to resolve environment variables")?;

    println!("{}", serde_json::to_string_pretty(&hashes)?);
    Ok(())
}

/// Run one observe pass and report the verdict
async fn check_pipeline(
    config: &Config,
    file: &Path,
    state: &Path,
    sources: Option<&Path>,
) -> Result<()> {
    let spec = load_spec(file)?;
    let mut status = load_status(state)?;
    let reconciler = reconciler(config, sources)?;

    match reconciler.observe(&spec, &mut status).await? {
        Observation::NotFound => {
            println!(
                "{}",
                format!("Pipeline '{}' does not exist; apply would create it.", spec.name).yellow()
            );
        }
        Observation::Exists { verdict } => print_verdict(&spec.name, &verdict),
    }
    Ok(())
}

/// Observe, then create or update, and persist the status
async fn apply_pipeline(
    config: &Config,
    file: &Path,
    state: &Path,
    sources: Option<&Path>,
) -> Result<()> {
    let spec = load_spec(file)?;
    let mut status = load_status(state)?;
    let reconciler = reconciler(config, sources)?;

    let result = reconciler.apply(&spec, &mut status).await;
    if let Err(err) = &result
        && err.is_conflict()
    {
        println!(
            "{}",
            "Pipeline changed on the server during apply; run apply again.".yellow()
        );
    }
    let outcome = result.with_context(|| format!("Failed to apply pipeline '{}'", spec.name))?;

    save_status(state, &status)?;

    let message = match outcome {
        ApplyOutcome::Created => format!("✓ Pipeline {} created successfully!", spec.name),
        ApplyOutcome::Updated => format!("✓ Pipeline {} updated successfully!", spec.name),
        ApplyOutcome::UpToDate => format!("✓ Pipeline {} is up to date", spec.name),
    };
    println!("{}", message.green().bold());
    if let Some(etag) = &status.etag {
        println!("  ETag:   {}", etag.cyan());
    }
    println!(
        "  Hashes: {}",
        status.environment_variable_hashes.len().to_string().dimmed()
    );
    Ok(())
}

/// Delete the pipeline and clear the state file
async fn delete_pipeline(config: &Config, file: &Path, state: &Path) -> Result<()> {
    let spec = load_spec(file)?;
    let mut status = load_status(state)?;
    let server = Arc::new(client(config)?);

    if status.etag.is_none() {
        let name = status.name_for(&spec).to_string();
        match server.get_pipeline_config(&name).await? {
            Some(found) => status.etag = Some(found.etag),
            None => {
                println!("{}", format!("Pipeline '{}' not found.", spec.name).yellow());
                save_status(state, &Default::default())?;
                return Ok(());
            }
        }
    }

    // Delete never resolves values.
    let reconciler = Reconciler::new(server, Arc::new(InMemoryResolver::new()));
    reconciler
        .delete(&spec, &mut status)
        .await
        .with_context(|| format!("Failed to delete pipeline '{}'", spec.name))?;
    save_status(state, &status)?;

    println!(
        "{}",
        format!("✓ Pipeline {} deleted successfully!", spec.name)
            .green()
            .bold()
    );
    Ok(())
}

fn yes_no(value: bool) -> ColoredString {
    if value { "yes".green() } else { "no".red() }
}

fn print_verdict(name: &str, verdict: &Verdict) {
    println!("{}", format!("Pipeline {}:", name).bold());
    println!("  Hashes match:       {}", yes_no(verdict.hashes_match));
    println!("  Structurally equal: {}", yes_no(verdict.structurally_equal));
    println!("  Up to date:         {}", yes_no(verdict.up_to_date()));
}
