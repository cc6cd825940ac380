//! Gantry CLI
//!
//! Command-line interface for reconciling declarative pipeline definitions
//! against a CI server.

mod commands;
mod config;
mod sources;
mod state;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Declarative CI pipeline config reconciler", long_about = None)]
struct Cli {
    /// CI server URL
    #[arg(long, env = "GANTRY_SERVER_URL", default_value = "http://localhost:8153")]
    server_url: String,

    /// Username for basic auth
    #[arg(long, env = "GANTRY_USERNAME")]
    username: Option<String>,

    /// Password for basic auth
    #[arg(long, env = "GANTRY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Bearer token; takes precedence over username and password
    #[arg(long, env = "GANTRY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, env = "GANTRY_INSECURE")]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "GANTRY_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry=info,gantry_core=info,gantry_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
        username: cli.username,
        password: cli.password,
        token: cli.token,
        insecure: cli.insecure,
        timeout: Duration::from_secs(cli.timeout),
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::try_parse_from([
            "gantry",
            "--server-url",
            "https://ci.example.com",
            "--token",
            "abc",
            "pipeline",
            "apply",
            "-f",
            "app.yaml",
            "--state",
            "app.state.json",
        ])
        .unwrap();

        assert_eq!(cli.server_url, "https://ci.example.com");
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(matches!(cli.command, Commands::Pipeline { .. }));
    }
}
