use derive_more::Display;

#[derive(
    Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Display,
)]
#[serde(transparent)]
pub struct BrokerId(pub i32);

impl BrokerId {
    /// Reported as the leader of a partition that currently has none.
    pub const NONE: BrokerId = BrokerId(-1);

    pub fn is_none(&self) -> bool {
        self.0 < 0
    }
}

impl From<i32> for BrokerId {
    fn from(id: i32) -> Self {
        BrokerId(id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Broker {
    pub id: BrokerId,
    pub host: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rack: Option<String>,
}

impl Broker {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
