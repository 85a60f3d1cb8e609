use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use crate::error::{PlacementError, Result};
use crate::render::OutputFormat;
use crate::topology::BrokerId;
use crate::validator::{Policy, DEFAULT_ALLOWED_BROKERS, DEFAULT_TOPIC_PREFIX};

const ENV_PREFIX: &str = "TOPIC_PLACEMENT";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlacementConfig {
    /// Comma separated `host:port` list, tried in order.
    pub bootstrap_servers: String,
    pub topic_prefix: String,
    pub allowed_brokers: BrokerList,
    pub client_id: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub quiet: bool,
    pub format: OutputFormat,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: "localhost:9092".to_string(),
            topic_prefix: DEFAULT_TOPIC_PREFIX.to_string(),
            allowed_brokers: BrokerList::List(DEFAULT_ALLOWED_BROKERS.to_vec()),
            client_id: "topic-placement".to_string(),
            connect_timeout_ms: 5000,
            request_timeout_ms: 10000,
            quiet: false,
            format: OutputFormat::Table,
        }
    }
}

/// Broker ids either as a list (config files) or as a comma separated
/// string (environment variables and the command line).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BrokerList {
    List(Vec<i32>),
    Csv(String),
}

impl BrokerList {
    pub fn ids(&self) -> Result<BTreeSet<BrokerId>> {
        match self {
            BrokerList::List(ids) => Ok(ids.iter().copied().map(BrokerId).collect()),
            BrokerList::Csv(s) => parse_broker_ids(s),
        }
    }
}

/// Parses `"1, 2,3"` into broker ids. Blank entries are skipped.
pub fn parse_broker_ids(s: &str) -> Result<BTreeSet<BrokerId>> {
    s.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i32>()
                .map(BrokerId)
                .map_err(|_| PlacementError::config(format!("invalid broker id '{}'", id)))
        })
        .collect()
}

impl PlacementConfig {
    /// Defaults, then the optional file, then `TOPIC_PLACEMENT_*` variables.
    pub fn load(config_path: Option<&Path>) -> Result<PlacementConfig> {
        let mut settings = config::Config::builder();
        if let Some(path) = config_path {
            settings = settings.add_source(config::File::from(path));
        }
        let config = settings
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: PlacementConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration, ensuring all values make sense.
    pub fn validate(&self) -> Result<()> {
        if self.bootstrap_servers.split(',').all(|s| s.trim().is_empty()) {
            return Err(PlacementError::config("bootstrap servers cannot be empty"));
        }
        if self.connect_timeout_ms == 0 {
            return Err(PlacementError::config("connect timeout cannot be 0"));
        }
        if self.request_timeout_ms == 0 {
            return Err(PlacementError::config("request timeout cannot be 0"));
        }
        self.allowed_brokers.ids()?;
        Ok(())
    }

    pub fn policy(&self) -> Result<Policy> {
        Ok(Policy {
            topic_prefix: self.topic_prefix.clone(),
            allowed_brokers: self.allowed_brokers.ids()?,
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
