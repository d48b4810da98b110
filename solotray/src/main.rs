use std::path::PathBuf;

use clap::Parser;
use solotray::{
    write_exit_marker, Config, InstanceCoordinator, LeaderRuntime, LogPresenter, ModeRequest, Role,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "solotray")]
#[command(about = "Single-instance tray utility with a relayed test mode")]
struct Cli {
    /// Run in test mode
    #[arg(long, conflicts_with = "notest")]
    test: bool,

    /// Disable test mode
    #[arg(long)]
    notest: bool,

    /// Path to a TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "solotray=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref()).await?;
    let mode = ModeRequest::from_flags(cli.test, cli.notest);

    let id = Uuid::new_v4();
    let mut coordinator = InstanceCoordinator::new(id, &config);

    let listener = match coordinator.determine_role(mode).await? {
        Role::Leader(listener) => listener,
        Role::Follower => return Ok(()),
    };

    let runtime = LeaderRuntime::start(id, listener, mode, &config, LogPresenter)?;

    // Stands in for the tray's quit item.
    tokio::signal::ctrl_c().await?;
    tracing::info!(id = id.to_string(), "Quit requested");

    let mode = runtime.shutdown().await?;
    tracing::info!(id = id.to_string(), mode = %mode, "Shut down");

    if config.write_exit_marker {
        write_exit_marker(&config.exit_marker_dir).await?;
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_to_normal_mode() {
        let cli = Cli::parse_from(["solotray"]);
        assert_eq!(
            ModeRequest::from_flags(cli.test, cli.notest),
            ModeRequest::Normal
        );
    }

    #[test]
    fn test_cli_selects_test_mode() {
        let cli = Cli::parse_from(["solotray", "--test"]);
        assert_eq!(
            ModeRequest::from_flags(cli.test, cli.notest),
            ModeRequest::Test
        );
    }

    #[test]
    fn test_cli_rejects_both_switches() {
        assert!(Cli::try_parse_from(["solotray", "--test", "--notest"]).is_err());
    }
}
