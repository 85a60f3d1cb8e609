//! Raw cluster metadata as handed over by a metadata provider.
//!
//! Every field a record needs is optional here so that a missing value is
//! reported by [`ClusterTopology::from_snapshot`](super::ClusterTopology::from_snapshot)
//! with the record it belongs to, instead of surfacing as an opaque parse error.
//! The snapshot itself must name both `brokers` and `topics`; an absent or
//! misspelled list fails to parse rather than reading as an empty cluster.

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MetadataSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<i32>,
    pub brokers: Vec<BrokerRecord>,
    pub topics: Vec<TopicRecord>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrokerRecord {
    pub id: Option<i32>,
    pub host: Option<String>,
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rack: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TopicRecord {
    pub name: Option<String>,
    pub partitions: Option<Vec<PartitionRecord>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PartitionRecord {
    pub id: Option<i32>,
    pub leader: Option<i32>,
    pub replicas: Option<Vec<i32>>,
    pub isr: Option<Vec<i32>>,
}

impl BrokerRecord {
    pub fn new(id: i32, host: impl Into<String>, port: i32) -> Self {
        Self {
            id: Some(id),
            host: Some(host.into()),
            port: Some(port),
            rack: None,
        }
    }
}

impl TopicRecord {
    pub fn new(name: impl Into<String>, partitions: Vec<PartitionRecord>) -> Self {
        Self {
            name: Some(name.into()),
            partitions: Some(partitions),
        }
    }
}

impl PartitionRecord {
    pub fn new(id: i32, leader: i32, replicas: Vec<i32>, isr: Vec<i32>) -> Self {
        Self {
            id: Some(id),
            leader: Some(leader),
            replicas: Some(replicas),
            isr: Some(isr),
        }
    }
}
