use std::collections::{BTreeMap, HashSet};

use derive_more::Display;

mod broker;
mod partition;
pub mod snapshot;
mod topic;

pub use broker::{Broker, BrokerId};
pub use partition::{Partition, PartitionId};
pub use snapshot::{BrokerRecord, MetadataSnapshot, PartitionRecord, TopicRecord};
pub use topic::Topic;

/// The snapshot could not be turned into a topology. These describe the shape
/// of the input only; placement problems are never reported this way.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("{record} {context} is missing required field `{field}`")]
    MissingField {
        record: Record,
        field: &'static str,
        context: String,
    },
    #[error("broker {0} is listed more than once")]
    DuplicateBroker(BrokerId),
    #[error("topic {0} is listed more than once")]
    DuplicateTopic(String),
    #[error("topic {topic} lists partition {partition} more than once")]
    DuplicatePartition {
        topic: String,
        partition: PartitionId,
    },
    #[error("broker {broker} has invalid port {port}")]
    InvalidPort { broker: BrokerId, port: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Record {
    #[display(fmt = "broker")]
    Broker,
    #[display(fmt = "topic")]
    Topic,
    #[display(fmt = "partition")]
    Partition,
}

fn required<T>(
    value: Option<T>,
    record: Record,
    field: &'static str,
    context: impl FnOnce() -> String,
) -> Result<T, TopologyError> {
    value.ok_or_else(|| TopologyError::MissingField {
        record,
        field,
        context: context(),
    })
}

/// Read-only view of the cluster at the moment the snapshot was taken.
///
/// Brokers are keyed by id and iterate in ascending order. Topics keep the
/// order in which the snapshot supplied them, which is the order the
/// validator reports them in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterTopology {
    cluster_id: Option<String>,
    controller_id: Option<BrokerId>,
    brokers: BTreeMap<BrokerId, Broker>,
    topics: Vec<Topic>,
}

impl ClusterTopology {
    #[tracing::instrument(skip(snapshot), fields(brokers = snapshot.brokers.len(), topics = snapshot.topics.len()))]
    pub fn from_snapshot(snapshot: MetadataSnapshot) -> Result<Self, TopologyError> {
        let mut brokers = BTreeMap::new();
        for (idx, record) in snapshot.brokers.into_iter().enumerate() {
            let broker = Self::broker_from_record(idx, record)?;
            if brokers.contains_key(&broker.id) {
                return Err(TopologyError::DuplicateBroker(broker.id));
            }
            brokers.insert(broker.id, broker);
        }

        let mut names = HashSet::new();
        let mut topics = Vec::with_capacity(snapshot.topics.len());
        for (idx, record) in snapshot.topics.into_iter().enumerate() {
            let topic = Self::topic_from_record(idx, record)?;
            if !names.insert(topic.name.clone()) {
                return Err(TopologyError::DuplicateTopic(topic.name));
            }
            topics.push(topic);
        }

        tracing::debug!(brokers = brokers.len(), topics = topics.len(), "built topology");
        Ok(Self {
            cluster_id: snapshot.cluster_id,
            controller_id: snapshot.controller_id.map(BrokerId),
            brokers,
            topics,
        })
    }

    fn broker_from_record(idx: usize, record: BrokerRecord) -> Result<Broker, TopologyError> {
        let at = || format!("#{}", idx);
        let id = BrokerId(required(record.id, Record::Broker, "id", at)?);
        let at = || id.to_string();
        let host = required(record.host, Record::Broker, "host", at)?;
        let port = required(record.port, Record::Broker, "port", at)?;
        let port = match u16::try_from(port) {
            Ok(p) if p > 0 => p,
            _ => return Err(TopologyError::InvalidPort { broker: id, port }),
        };

        Ok(Broker {
            id,
            host,
            port,
            rack: record.rack,
        })
    }

    fn topic_from_record(idx: usize, record: TopicRecord) -> Result<Topic, TopologyError> {
        let name = required(record.name, Record::Topic, "name", || format!("#{}", idx))?;
        let partitions = required(record.partitions, Record::Topic, "partitions", || {
            name.clone()
        })?;

        let mut topic = Topic::new(name);
        for (idx, record) in partitions.into_iter().enumerate() {
            let partition = Self::partition_from_record(&topic.name, idx, record)?;
            if topic.partitions.contains_key(&partition.id) {
                return Err(TopologyError::DuplicatePartition {
                    topic: topic.name,
                    partition: partition.id,
                });
            }
            topic.partitions.insert(partition.id, partition);
        }
        Ok(topic)
    }

    fn partition_from_record(
        topic: &str,
        idx: usize,
        record: PartitionRecord,
    ) -> Result<Partition, TopologyError> {
        let id = required(record.id, Record::Partition, "id", || {
            format!("{}/#{}", topic, idx)
        })?;
        let at = || format!("{}/{}", topic, id);
        let leader = required(record.leader, Record::Partition, "leader", at)?;
        let replicas = required(record.replicas, Record::Partition, "replicas", at)?;
        let isr = required(record.isr, Record::Partition, "isr", at)?;

        Ok(Partition::new(
            PartitionId(id),
            BrokerId(leader),
            replicas.into_iter().map(BrokerId),
            isr.into_iter().map(BrokerId),
        ))
    }

    pub fn cluster_id(&self) -> Option<&str> {
        self.cluster_id.as_deref()
    }

    pub fn controller_id(&self) -> Option<BrokerId> {
        self.controller_id
    }

    /// Brokers in ascending id order.
    pub fn brokers(&self) -> impl Iterator<Item = &Broker> {
        self.brokers.values()
    }

    pub fn broker(&self, id: BrokerId) -> Option<&Broker> {
        self.brokers.get(&id)
    }

    pub fn broker_count(&self) -> usize {
        self.brokers.len()
    }

    /// Topics in the order the snapshot supplied them.
    pub fn topics(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}
