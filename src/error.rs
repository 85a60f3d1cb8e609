use crate::kafka::error::ErrorKind;
use crate::topology::TopologyError;
use crate::validator::ExitStatus;

pub type Result<T> = std::result::Result<T, PlacementError>;

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("invalid configuration: {error_msg}")]
    Config { error_msg: String },

    #[error("kafka protocol error talking to {addr}: {source}")]
    Kafka {
        addr: String,
        #[source]
        source: ErrorKind,
    },

    #[error("could not fetch cluster metadata: {error_msg}")]
    Metadata { error_msg: String },

    #[error("malformed snapshot {path}: {error_msg}")]
    Snapshot { path: String, error_msg: String },

    #[error("malformed cluster metadata: {0}")]
    Topology(#[from] TopologyError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacementError {
    pub fn metadata(error_msg: impl Into<String>) -> Self {
        PlacementError::Metadata {
            error_msg: error_msg.into(),
        }
    }

    pub fn config(error_msg: impl Into<String>) -> Self {
        PlacementError::Config {
            error_msg: error_msg.into(),
        }
    }

    /// Every error means no usable snapshot was validated, so none of them
    /// can be confused with a placement violation.
    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::MetadataUnavailable
    }
}

impl From<config::ConfigError> for PlacementError {
    fn from(err: config::ConfigError) -> Self {
        PlacementError::Config {
            error_msg: err.to_string(),
        }
    }
}

impl From<tokio::time::error::Elapsed> for PlacementError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        PlacementError::metadata("timed out waiting for the cluster")
    }
}
