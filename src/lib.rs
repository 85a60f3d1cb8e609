pub mod config;
pub mod error;
pub mod kafka;
pub mod logger;
pub mod metadata;
pub mod render;
pub mod topology;
pub mod validator;

use std::io::Write;
use std::path::PathBuf;

use crate::config::PlacementConfig;
use crate::error::Result;
use crate::metadata::{KafkaMetadataProvider, MetadataProvider, SnapshotFileProvider};
use crate::render::OutputFormat;
use crate::topology::ClusterTopology;
use crate::validator::{validate, ExitStatus, ValidationReport};

#[macro_use]
extern crate serde_derive;

/// Where the snapshot comes from for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Read a captured JSON snapshot instead of asking the cluster.
    pub snapshot: Option<PathBuf>,
    /// Save the fetched snapshot before validating it.
    pub dump_snapshot: Option<PathBuf>,
}

pub fn provider(config: &PlacementConfig, options: &RunOptions) -> Box<dyn MetadataProvider> {
    match &options.snapshot {
        Some(path) => Box::new(SnapshotFileProvider::new(path)),
        None => Box::new(
            KafkaMetadataProvider::new(&config.bootstrap_servers, config.client_id.clone())
                .with_connect_timeout(config.connect_timeout())
                .with_request_timeout(config.request_timeout()),
        ),
    }
}

/// Fetches a snapshot, validates it and writes the outcome to `out`.
///
/// Failing to obtain a usable snapshot is returned as an error; a placement
/// violation is not an error and shows up in the returned status.
pub async fn run<W: Write>(
    config: &PlacementConfig,
    provider: &dyn MetadataProvider,
    options: &RunOptions,
    out: &mut W,
) -> Result<ExitStatus> {
    let policy = config.policy()?;
    let snapshot = provider.fetch().await?;
    if let Some(path) = &options.dump_snapshot {
        metadata::write_snapshot(path, &snapshot).await?;
        tracing::info!(path = %path.display(), "wrote snapshot");
    }

    let topology = ClusterTopology::from_snapshot(snapshot)?;
    let report = validate(&topology, &policy);
    write_outcome(out, config, &topology, &policy, &report)?;
    Ok(report.exit_status())
}

fn write_outcome<W: Write>(
    out: &mut W,
    config: &PlacementConfig,
    topology: &ClusterTopology,
    policy: &validator::Policy,
    report: &ValidationReport,
) -> Result<()> {
    if config.quiet {
        render::write_quiet(out, report)?;
        return Ok(());
    }

    match config.format {
        OutputFormat::Json => render::write_json(out, topology, policy, report)?,
        OutputFormat::Table => {
            render::write_brokers(out, topology.brokers())?;
            if report.is_vacuous() {
                render::write_no_topics(out, policy)?;
            } else {
                render::write_report(out, report, policy)?;
            }
        }
    }
    Ok(())
}
