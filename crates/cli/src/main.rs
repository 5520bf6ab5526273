use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ipinfo_core::{logging, IpInfoTool, LogNotifier, Notifier, ToolConfig};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ipinfo")]
#[command(about = "Report the private and public addresses of this machine", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "ipinfo.toml", env = "IPINFO_CONFIG")]
    config: PathBuf,

    /// Do not emit status events
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer a query with the machine's addresses
    Query {
        #[arg(default_value = "Get IP")]
        text: String,
    },
    /// Append the machine's addresses to a conversation read from FILE or stdin
    Pipe { file: Option<PathBuf> },
    /// Print the resolved addresses only
    Resolve,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = ToolConfig::load(&args.config)?;

    logging::init(&config.logging);
    tracing::debug!(config = %args.config.display(), "Configuration loaded");

    let tool = IpInfoTool::from_config(&config)?;

    let success = match args.command {
        Command::Query { text } => {
            let notifier = LogNotifier;
            let notifier: Option<&dyn Notifier> = if args.quiet || !config.notify.enabled {
                None
            } else {
                Some(&notifier)
            };

            let outcome = tool.process_request(&text, notifier).await;
            print_json(&outcome)?;
            outcome.is_success()
        }
        Command::Pipe { file } => {
            let body = read_body(file.as_ref())?;
            let outcome = tool.pipe(&body).await;
            print_json(&outcome)?;
            outcome.is_success()
        }
        Command::Resolve => {
            print_json(&tool.resolver().resolve().await)?;
            true
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn read_body(file: Option<&PathBuf>) -> Result<serde_json::Value> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read conversation from stdin")?;
            raw
        }
    };

    serde_json::from_str(&raw).context("Conversation is not valid JSON")
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
