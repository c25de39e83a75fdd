//! sumchat CLI entry point.
//!
//! Binary name: `sumchat`
//!
//! Parses CLI arguments, sets up logging, then dispatches to the chat loop
//! or prints shell completions.

mod cli;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_filter(cli.verbose, cli.quiet)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { model } => {
            cli::chat::loop_runner::run_chat_loop(cli.config.as_deref(), model).await?;
        }
        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            generate(shell, &mut cmd, "sumchat", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Tracing filter for the given verbosity flags.
fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "warn",
        1 => "info,sumchat=debug",
        _ => "trace",
    }
}
