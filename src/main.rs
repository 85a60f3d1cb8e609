use std::path::PathBuf;

use clap::Parser;
use topic_placement::config::{BrokerList, PlacementConfig};
use topic_placement::render::OutputFormat;
use topic_placement::validator::ExitStatus;
use topic_placement::RunOptions;

/// Validates that topic replicas only live on an allowed set of brokers.
#[derive(Parser, Debug)]
#[command(name = "topic-placement", version)]
struct Cli {
    /// Location of an optional TOML config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Kafka bootstrap servers (default: localhost:9092).
    #[arg(long)]
    bootstrap_servers: Option<String>,

    /// Topic prefix to validate (default: poc_).
    #[arg(long)]
    prefix: Option<String>,

    /// Comma-separated list of allowed broker ids (default: 1,2,3).
    #[arg(long)]
    allowed_brokers: Option<String>,

    /// Validate a JSON snapshot instead of a live cluster.
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Write the fetched snapshot as JSON before validating.
    #[arg(long, value_name = "FILE")]
    dump_snapshot: Option<PathBuf>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Only output pass/fail result.
    #[arg(long)]
    quiet: bool,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut PlacementConfig) {
        if let Some(servers) = &self.bootstrap_servers {
            config.bootstrap_servers = servers.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.topic_prefix = prefix.clone();
        }
        if let Some(brokers) = &self.allowed_brokers {
            config.allowed_brokers = BrokerList::Csv(brokers.clone());
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        config.quiet |= self.quiet;
    }
}

async fn run(cli: Cli) -> topic_placement::error::Result<ExitStatus> {
    let mut config = PlacementConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    let options = RunOptions {
        snapshot: cli.snapshot,
        dump_snapshot: cli.dump_snapshot,
    };
    let provider = topic_placement::provider(&config, &options);
    let mut stdout = std::io::stdout().lock();
    topic_placement::run(&config, provider.as_ref(), &options, &mut stdout).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    topic_placement::logger::init(level)?;

    let status = match run(cli).await {
        Ok(status) => status,
        Err(err) => {
            tracing::error!(%err, "validation aborted");
            eprintln!("Error: {}", err);
            err.exit_status()
        }
    };
    std::process::exit(status.code())
}
