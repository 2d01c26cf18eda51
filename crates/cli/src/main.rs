use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use capabilities::{
    Capabilities, CannedCapabilities, CapabilityEndpoints, HttpCapabilities,
};
use clap::{Parser, Subcommand};
use events::ProgressBus;
use orchestrator::{AnalysisError, TicketAnalyzer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ticket-insight")]
#[command(about = "Analyze support tickets against the insight microservices", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use built-in canned responses instead of the live services
    #[arg(long, global = true)]
    canned: bool,

    /// Per-request timeout in seconds for the live services
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis pipeline over one ticket
    Analyze {
        /// Ticket text; omit it to read from --file
        text: Option<String>,

        /// Read the ticket text from a file instead
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Suppress per-step progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the aggregate overview report
    Overview,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let analyzer = build_analyzer(cli.canned, cli.timeout)?;

    match cli.command {
        Commands::Analyze { text, file, quiet } => {
            let text = ticket_text(text, file).await?;
            analyze(&analyzer, &text, quiet).await
        }
        Commands::Overview => {
            let overview = analyzer.overview().await;
            println!("{}", serde_json::to_string_pretty(&overview)?);
            Ok(())
        }
    }
}

fn build_analyzer(canned: bool, timeout: Option<u64>) -> Result<TicketAnalyzer> {
    let capabilities: Arc<dyn Capabilities> = if canned {
        Arc::new(CannedCapabilities::new())
    } else {
        let mut endpoints = CapabilityEndpoints::from_env();
        if let Some(secs) = timeout {
            endpoints = endpoints.with_timeout(Duration::from_secs(secs));
        }
        Arc::new(HttpCapabilities::new(endpoints).context("failed to build HTTP client")?)
    };

    Ok(TicketAnalyzer::new(capabilities, ProgressBus::new()))
}

async fn ticket_text(text: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display())),
        (None, None) => anyhow::bail!("provide the ticket text or --file"),
    }
}

async fn analyze(analyzer: &TicketAnalyzer, text: &str, quiet: bool) -> Result<()> {
    // Subscribe before submitting; the bus only delivers events published
    // after the subscription exists.
    let mut rx = analyzer.bus().subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(envelope) = rx.recv().await {
            let event = envelope.event;
            if !quiet {
                eprintln!("[{:>3}%] {}", event.percentage, event.message);
            }
            if event.is_terminal() {
                break;
            }
        }
    });

    match analyzer.analyze(text).await {
        Ok(result) => {
            printer.await.ok();
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(error @ AnalysisError::EmptyTicket) => {
            // No events were published, so the printer is still waiting.
            printer.abort();
            Err(error.into())
        }
        Err(error) => {
            printer.await.ok();
            Err(error.into())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticket_insight=info,orchestrator=warn,capabilities=warn".into()),
        )
        .init();
}
