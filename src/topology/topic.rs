use std::collections::BTreeMap;

use crate::topology::{Partition, PartitionId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub partitions: BTreeMap<PartitionId, Partition>,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partitions: BTreeMap::new(),
        }
    }

    /// Partitions in ascending id order, whatever order they were reported in.
    pub fn partitions(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.values()
    }

    pub fn partition(&self, id: PartitionId) -> Option<&Partition> {
        self.partitions.get(&id)
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }
}
