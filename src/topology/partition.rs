use std::collections::BTreeSet;

use derive_more::Display;

use crate::topology::BrokerId;

#[derive(
    Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display,
)]
#[serde(transparent)]
pub struct PartitionId(pub i32);

/// One partition as observed in the snapshot. Replica and ISR sets are kept
/// exactly as reported: the leader is not required to be a replica and the
/// ISR is not required to be a subset of the replicas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    pub id: PartitionId,
    pub leader: BrokerId,
    pub replicas: BTreeSet<BrokerId>,
    pub isr: BTreeSet<BrokerId>,
}

impl Partition {
    pub fn new(
        id: PartitionId,
        leader: BrokerId,
        replicas: impl IntoIterator<Item = BrokerId>,
        isr: impl IntoIterator<Item = BrokerId>,
    ) -> Self {
        Self {
            id,
            leader,
            replicas: replicas.into_iter().collect(),
            isr: isr.into_iter().collect(),
        }
    }

    pub fn has_leader(&self) -> bool {
        !self.leader.is_none()
    }

    /// Replicas that are not members of `allowed`, ascending.
    pub fn replicas_outside<'a>(
        &'a self,
        allowed: &'a BTreeSet<BrokerId>,
    ) -> impl Iterator<Item = BrokerId> + 'a {
        self.replicas.difference(allowed).copied()
    }
}
