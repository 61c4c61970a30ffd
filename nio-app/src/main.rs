use anyhow::Result;
use clap::{Parser, Subcommand};
use nio_app::config::{Config, DEFAULT_CONFIG_PATH};
use nio_app::repl::{status_report, Repl};
use nio_app::{render, wiring};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "nio",
    version,
    about = "Routes requests to chat, image, speech, search and desktop automation"
)]
struct Cli {
    /// YAML configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify free text and send it to one capability.
    Route {
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Run automation command lines concurrently. Reads stdin when no
    /// lines are given.
    Batch { lines: Vec<String> },
    /// Show which capabilities have a usable strategy.
    Status,
    /// Interactive loop (default).
    Repl,
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line.trim().to_string());
        }
    }
    Ok(lines)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let router = Arc::new(wiring::build_router(&config)?);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Route { text } => {
            let envelope = router.route(&text.join(" ")).await;
            println!("{}", render(&envelope));
        }
        Commands::Batch { lines } => {
            let lines = if lines.is_empty() { read_stdin_lines()? } else { lines };
            let outcome = router.dispatch_batch(&lines).await;
            println!("{}", render(&outcome));
        }
        Commands::Status => println!("{}", render(&status_report(&router))),
        Commands::Repl => Repl::new(router).run().await?,
    }

    Ok(())
}
