// Transcript Insights CLI
// Reads a transcript from an argument, a file or stdin and prints the analysis as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use transcript_insights_core::{AnalysisEngine, EngineConfig, ProcessOptions};

/// Analyze a voice transcript locally.
#[derive(Parser, Debug)]
#[command(name = "transcript-insights", version, about = "On-device transcript analysis")]
struct Cli {
    /// Transcript text. Read from --file or stdin when omitted.
    text: Option<String>,

    /// Read the transcript from a file
    #[arg(long, short, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Only print the quick sentiment
    #[arg(long)]
    quick: bool,

    /// Print engine statistics and exit
    #[arg(long)]
    stats: bool,

    #[arg(long)]
    skip_sentiment: bool,

    #[arg(long)]
    skip_action_items: bool,

    #[arg(long)]
    skip_topics: bool,

    #[arg(long)]
    skip_insights: bool,

    /// Mark the result as persisted by the caller
    #[arg(long)]
    store_results: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_input(cli: &Cli) -> Result<String> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript from {}", path.display()));
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read transcript from stdin")?;
    Ok(buffer)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = EngineConfig::from_env().context("Invalid engine configuration")?;
    info!(?config, "Starting transcript analysis");
    let engine = AnalysisEngine::with_config(config);

    if cli.stats {
        println!("{}", to_json(&engine.stats(), cli.pretty)?);
        return Ok(());
    }

    let text = read_input(&cli)?;
    let output = if cli.quick {
        to_json(&engine.quick_sentiment(&text), cli.pretty)?
    } else {
        let options = ProcessOptions {
            skip_sentiment: cli.skip_sentiment,
            skip_action_items: cli.skip_action_items,
            skip_topics: cli.skip_topics,
            skip_insights: cli.skip_insights,
            store_results: cli.store_results,
            usage_stats: None,
        };
        let result = engine.process_text(&text, &options);
        if cli.pretty {
            result.to_json_pretty()?
        } else {
            result.to_json()?
        }
    };
    println!("{}", output);
    Ok(())
}
