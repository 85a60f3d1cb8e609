use std::net::SocketAddr;

use futures::SinkExt;
use kafka_protocol::messages::{ApiKey, RequestHeader, RequestKind, ResponseKind};
use kafka_protocol::protocol::StrBytes;
use tokio::net::TcpStream;
use tokio_stream::StreamExt;
use tokio_util::codec::Framed;

use crate::kafka::codec::KafkaClientCodec;
use crate::kafka::error::ErrorKind;

pub mod codec;
pub mod error;
pub mod util;

/// A single connection to one broker. Requests are sent one at a time and
/// each call waits for its own response.
#[derive(Debug)]
pub struct KafkaClient {
    addr: SocketAddr,
    client_id: Option<StrBytes>,
    stream: Framed<TcpStream, KafkaClientCodec>,
}

impl KafkaClient {
    pub async fn connect(addr: SocketAddr, client_id: Option<StrBytes>) -> Result<Self, ErrorKind> {
        let stream = TcpStream::connect(&addr).await?;
        stream.set_nodelay(true)?;
        Ok(KafkaClient {
            addr,
            client_id,
            stream: Framed::new(stream, KafkaClientCodec::new()),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    #[tracing::instrument(skip(self, req), fields(addr = %self.addr))]
    pub async fn send(
        &mut self,
        api_key: ApiKey,
        api_version: i16,
        req: RequestKind,
    ) -> Result<ResponseKind, ErrorKind> {
        let mut header = RequestHeader::default();
        header.request_api_key = api_key as i16;
        header.request_api_version = api_version;
        header.client_id = self.client_id.clone();

        tracing::trace!(?header, "send client request");
        self.stream.send((header, req)).await?;

        match self.stream.try_next().await? {
            Some((header, res)) => {
                tracing::trace!(correlation_id = header.correlation_id, "receive client response");
                Ok(res)
            }
            None => Err(ErrorKind::ConnectionClosed),
        }
    }
}
