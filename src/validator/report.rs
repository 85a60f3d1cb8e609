use crate::topology::{BrokerId, PartitionId};
use crate::validator::ExitStatus;

/// A partition with at least one replica on a broker outside the allowed set.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Violation {
    pub topic: String,
    pub partition: PartitionId,
    pub invalid_brokers: Vec<BrokerId>,
    pub all_replicas: Vec<BrokerId>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PartitionReport {
    pub id: PartitionId,
    pub leader: BrokerId,
    pub replicas: Vec<BrokerId>,
    pub isr: Vec<BrokerId>,
    pub violating_brokers: Vec<BrokerId>,
}

impl PartitionReport {
    pub fn is_compliant(&self) -> bool {
        self.violating_brokers.is_empty()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TopicReport {
    pub name: String,
    pub partitions: Vec<PartitionReport>,
    pub has_violations: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub topics_checked: usize,
    pub partitions_checked: usize,
    pub violations: Vec<Violation>,
    pub topic_details: Vec<TopicReport>,
    pub passed: bool,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            topics_checked: 0,
            partitions_checked: 0,
            violations: Vec::new(),
            topic_details: Vec::new(),
            passed: true,
        }
    }
}

impl ValidationReport {
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Nothing matched the policy, so nothing was checked.
    pub fn is_vacuous(&self) -> bool {
        self.topics_checked == 0
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.passed {
            ExitStatus::Passed
        } else {
            ExitStatus::Failed
        }
    }
}
