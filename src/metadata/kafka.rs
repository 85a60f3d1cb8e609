use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use kafka_protocol::messages::{
    ApiKey, ApiVersionsRequest, MetadataRequest, MetadataResponse, RequestKind, ResponseKind,
};
use kafka_protocol::protocol::{Message, StrBytes};

use crate::error::{PlacementError, Result};
use crate::kafka::util::ToStrBytes;
use crate::kafka::KafkaClient;
use crate::metadata::MetadataProvider;
use crate::topology::{BrokerRecord, MetadataSnapshot, PartitionRecord, TopicRecord};

const API_VERSIONS_VERSION: i16 = 3;

/// Lowest Metadata version where a null topic list means "every topic".
const MIN_METADATA_VERSION: i16 = 1;

/// Fetches metadata from a live cluster through the first reachable
/// bootstrap broker.
#[derive(Debug, Clone)]
pub struct KafkaMetadataProvider {
    bootstrap_servers: Vec<String>,
    client_id: String,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl KafkaMetadataProvider {
    pub fn new(bootstrap_servers: &str, client_id: impl Into<String>) -> Self {
        Self {
            bootstrap_servers: bootstrap_servers
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            client_id: client_id.into(),
            connect_timeout: Duration::from_millis(5000),
            request_timeout: Duration::from_millis(10000),
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    async fn connect(&self) -> Result<KafkaClient> {
        let client_id = Some(self.client_id.to_str_bytes());
        let mut last_error = None;

        for server in &self.bootstrap_servers {
            match self.connect_one(server, client_id.clone()).await {
                Ok(client) => return Ok(client),
                Err(err) => {
                    tracing::warn!(%server, %err, "bootstrap server unavailable");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| PlacementError::metadata("no bootstrap servers configured")))
    }

    async fn connect_one(&self, server: &str, client_id: Option<StrBytes>) -> Result<KafkaClient> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host(server)
            .await
            .map_err(|e| PlacementError::metadata(format!("cannot resolve {}: {}", server, e)))?
            .collect();

        let mut last_error = PlacementError::metadata(format!("{} resolved to no addresses", server));
        for addr in addrs {
            match tokio::time::timeout(self.connect_timeout, KafkaClient::connect(addr, client_id.clone())).await {
                Ok(Ok(client)) => {
                    tracing::debug!(%addr, "connected");
                    return Ok(client);
                }
                Ok(Err(source)) => {
                    last_error = PlacementError::Kafka {
                        addr: addr.to_string(),
                        source,
                    }
                }
                Err(_) => {
                    last_error = PlacementError::metadata(format!(
                        "timed out connecting to {} after {:?}",
                        addr, self.connect_timeout
                    ))
                }
            }
        }
        Err(last_error)
    }

    async fn request(client: &mut KafkaClient, api_key: ApiKey, version: i16, req: RequestKind) -> Result<ResponseKind> {
        let addr = client.addr();
        client
            .send(api_key, version, req)
            .await
            .map_err(|source| PlacementError::Kafka {
                addr: addr.to_string(),
                source,
            })
    }

    /// Highest Metadata version both this client and the broker speak.
    async fn negotiate_metadata_version(client: &mut KafkaClient) -> Result<i16> {
        let mut req = ApiVersionsRequest::default();
        req.client_software_name = StrBytes::from_str("topic-placement");
        req.client_software_version = StrBytes::from_str(env!("CARGO_PKG_VERSION"));

        let res = match Self::request(
            client,
            ApiKey::ApiVersionsKey,
            API_VERSIONS_VERSION,
            RequestKind::ApiVersionsRequest(req),
        )
        .await?
        {
            ResponseKind::ApiVersionsResponse(res) => res,
            other => {
                return Err(PlacementError::metadata(format!(
                    "unexpected response to api versions request: {:?}",
                    other
                )))
            }
        };

        if res.error_code != 0 {
            return Err(PlacementError::metadata(format!(
                "broker rejected api versions request with error code {}",
                res.error_code
            )));
        }

        let theirs = res
            .api_keys
            .get(&(ApiKey::MetadataKey as i16))
            .ok_or_else(|| PlacementError::metadata("broker does not support the metadata api"))?;
        pick_version(
            MetadataRequest::VERSIONS.min,
            MetadataRequest::VERSIONS.max,
            theirs.min_version,
            theirs.max_version,
        )
        .ok_or_else(|| {
            PlacementError::metadata(format!(
                "no common metadata version: broker supports {}..={}",
                theirs.min_version, theirs.max_version
            ))
        })
    }

    async fn fetch_metadata(&self) -> Result<MetadataSnapshot> {
        let mut client = self.connect().await?;
        let version = Self::negotiate_metadata_version(&mut client).await?;
        tracing::debug!(version, "negotiated metadata version");

        let req = metadata_request(version);
        match Self::request(&mut client, ApiKey::MetadataKey, version, RequestKind::MetadataRequest(req)).await? {
            ResponseKind::MetadataResponse(res) => snapshot_from_response(res),
            other => Err(PlacementError::metadata(format!(
                "unexpected response to metadata request: {:?}",
                other
            ))),
        }
    }
}

#[async_trait]
impl MetadataProvider for KafkaMetadataProvider {
    #[tracing::instrument]
    async fn fetch(&self) -> Result<MetadataSnapshot> {
        tokio::time::timeout(self.request_timeout, self.fetch_metadata()).await?
    }
}

/// Request for every topic. Versions before 4 have no auto creation flag on
/// the wire and the encoder only accepts its default there.
fn metadata_request(version: i16) -> MetadataRequest {
    let mut req = MetadataRequest::default();
    req.topics = None;
    req.allow_auto_topic_creation = version < 4;
    req
}

fn pick_version(our_min: i16, our_max: i16, their_min: i16, their_max: i16) -> Option<i16> {
    let low = our_min.max(their_min).max(MIN_METADATA_VERSION);
    let high = our_max.min(their_max);
    (low <= high).then_some(high)
}

/// Converts a Metadata response into a snapshot, keeping the broker's topic
/// order. A topic level error means its partition list cannot be trusted, so
/// it fails the whole fetch rather than being validated as empty.
pub fn snapshot_from_response(res: MetadataResponse) -> Result<MetadataSnapshot> {
    let brokers = res
        .brokers
        .into_iter()
        .map(|(id, broker)| BrokerRecord {
            id: Some(id.0),
            host: Some(broker.host.to_string()),
            port: Some(broker.port),
            rack: broker.rack.map(|r| r.to_string()),
        })
        .collect();

    let mut topics = Vec::with_capacity(res.topics.len());
    for (name, topic) in res.topics.into_iter() {
        let name = name.0.to_string();
        if topic.error_code != 0 {
            return Err(PlacementError::metadata(format!(
                "topic {} returned error code {}",
                name, topic.error_code
            )));
        }

        let partitions = topic
            .partitions
            .into_iter()
            .map(|p| PartitionRecord {
                id: Some(p.partition_index),
                leader: Some(p.leader_id.0),
                replicas: Some(p.replica_nodes.into_iter().map(|b| b.0).collect()),
                isr: Some(p.isr_nodes.into_iter().map(|b| b.0).collect()),
            })
            .collect();

        topics.push(TopicRecord {
            name: Some(name),
            partitions: Some(partitions),
        });
    }

    Ok(MetadataSnapshot {
        cluster_id: res.cluster_id.map(|c| c.to_string()),
        controller_id: Some(res.controller_id.0).filter(|id| *id >= 0),
        brokers,
        topics,
    })
}
