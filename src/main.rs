//! Timekeeper CLI - stopwatch, countdown and Pomodoro timer
//!
//! - Stopwatch with laps
//! - Countdown with an alarm
//! - 25 minutes of focus, 5 minutes of break, repeat

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use timekeeper::cli::{self, Cli, Commands, Display};

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never corrupt the live timer line.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let config = cli.app_config();
    if cli.print_config {
        let json =
            serde_json::to_string_pretty(&config).context("failed to serialize configuration")?;
        Display::show_config(&json);
        return Ok(());
    }

    match cli.command {
        Some(Commands::Stopwatch(args)) => {
            cli::run_stopwatch(&config, args.start).await?;
        }
        Some(Commands::Countdown(args)) => {
            cli::run_countdown(&config, args.start).await?;
        }
        Some(Commands::Pomodoro(args)) => {
            cli::run_pomodoro(&config, args.start).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
