use std::collections::BTreeSet;

use crate::topology::{BrokerId, ClusterTopology, Partition, Topic};

mod report;

pub use report::{PartitionReport, TopicReport, ValidationReport, Violation};

/// Names starting with this are cluster bookkeeping topics (consumer offsets,
/// transaction state) and are never subject to placement policy.
pub const INTERNAL_TOPIC_PREFIX: &str = "__";

pub const DEFAULT_TOPIC_PREFIX: &str = "poc_";
pub const DEFAULT_ALLOWED_BROKERS: [i32; 3] = [1, 2, 3];

/// Process exit code for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Passed = 0,
    Failed = 1,
    MetadataUnavailable = 2,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    pub topic_prefix: String,
    pub allowed_brokers: BTreeSet<BrokerId>,
}

impl Default for Policy {
    fn default() -> Self {
        Self::new(
            DEFAULT_TOPIC_PREFIX,
            DEFAULT_ALLOWED_BROKERS.iter().copied().map(BrokerId),
        )
    }
}

impl Policy {
    pub fn new(
        topic_prefix: impl Into<String>,
        allowed_brokers: impl IntoIterator<Item = BrokerId>,
    ) -> Self {
        Self {
            topic_prefix: topic_prefix.into(),
            allowed_brokers: allowed_brokers.into_iter().collect(),
        }
    }

    /// Internal topics are excluded even when they match the prefix.
    pub fn is_candidate(&self, topic: &str) -> bool {
        !topic.starts_with(INTERNAL_TOPIC_PREFIX) && topic.starts_with(&self.topic_prefix)
    }

    pub fn allows(&self, broker: BrokerId) -> bool {
        self.allowed_brokers.contains(&broker)
    }
}

/// Checks every candidate topic's replica placement against `policy`.
///
/// Topics are visited in topology order and partitions in ascending id
/// order, so the same snapshot and policy always produce the same report.
/// An empty allowed set is not special: every non-empty replica set violates.
#[tracing::instrument(skip_all, fields(prefix = %policy.topic_prefix))]
pub fn validate(topology: &ClusterTopology, policy: &Policy) -> ValidationReport {
    let mut report = ValidationReport::default();

    for topic in topology.topics().filter(|t| policy.is_candidate(&t.name)) {
        report.topics_checked += 1;
        let details = check_topic(topic, policy, &mut report);
        report.topic_details.push(details);
    }

    report.passed = report.violations.is_empty();
    tracing::info!(
        topics = report.topics_checked,
        partitions = report.partitions_checked,
        violations = report.violations.len(),
        "validated topic placement"
    );
    report
}

fn check_topic(topic: &Topic, policy: &Policy, report: &mut ValidationReport) -> TopicReport {
    let mut details = TopicReport {
        name: topic.name.clone(),
        partitions: Vec::with_capacity(topic.partition_count()),
        has_violations: false,
    };

    for partition in topic.partitions() {
        report.partitions_checked += 1;
        let invalid: Vec<BrokerId> = partition.replicas_outside(&policy.allowed_brokers).collect();

        if !invalid.is_empty() {
            tracing::debug!(topic = %topic.name, partition = %partition.id, ?invalid, "placement violation");
            report.violations.push(Violation {
                topic: topic.name.clone(),
                partition: partition.id,
                invalid_brokers: invalid.clone(),
                all_replicas: partition.replicas.iter().copied().collect(),
            });
            details.has_violations = true;
        }

        details.partitions.push(partition_report(partition, invalid));
    }

    details.partitions.sort_by_key(|p| p.id);
    details
}

fn partition_report(partition: &Partition, violating_brokers: Vec<BrokerId>) -> PartitionReport {
    PartitionReport {
        id: partition.id,
        leader: partition.leader,
        replicas: partition.replicas.iter().copied().collect(),
        isr: partition.isr.iter().copied().collect(),
        violating_brokers,
    }
}
