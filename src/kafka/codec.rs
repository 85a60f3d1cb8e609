use std::collections::HashMap;
use std::convert::TryFrom;

use bytes::BytesMut;
use kafka_protocol::messages::*;
use kafka_protocol::protocol::{Decodable, Encodable, HeaderVersion};
use tokio_util::codec;

use crate::kafka::error::ErrorKind;

/// Client side framing for the kafka protocol.
///
/// Responses carry nothing but a correlation id, so the codec remembers the
/// header of every request it wrote and uses it to pick the header and body
/// version when the matching response comes back.
pub struct KafkaClientCodec {
    correlation_id: i32,
    requests: HashMap<i32, RequestHeader>,
    length_codec: codec::LengthDelimitedCodec,
}

impl KafkaClientCodec {
    pub fn new() -> Self {
        Self {
            correlation_id: 0,
            requests: HashMap::new(),
            length_codec: codec::LengthDelimitedCodec::builder()
                .max_frame_length(i32::MAX as usize)
                .length_field_length(4)
                .new_codec(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.requests.len()
    }

    fn read_correlation_id(src: &BytesMut) -> Result<i32, ErrorKind> {
        if src.len() < 4 {
            return Err(ErrorKind::DecodeError);
        }
        Ok(i32::from_be_bytes([src[0], src[1], src[2], src[3]]))
    }
}

impl std::fmt::Debug for KafkaClientCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KafkaClientCodec {{ in_flight: {} }}", self.in_flight())
    }
}

impl Default for KafkaClientCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl codec::Decoder for KafkaClientCodec {
    type Item = (ResponseHeader, ResponseKind);
    type Error = ErrorKind;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(mut bytes) = self.length_codec.decode(src)? {
            let correlation_id = Self::read_correlation_id(&bytes)?;
            let request_header = self
                .requests
                .remove(&correlation_id)
                .ok_or(ErrorKind::UnknownCorrelationId(correlation_id))?;
            let api_key = ApiKey::try_from(request_header.request_api_key)?;
            let version = request_header.request_api_version;
            let (header, response) = decode_response(&mut bytes, api_key, version)?;
            Ok(Some((header, response)))
        } else {
            Ok(None)
        }
    }
}

impl codec::Encoder<(RequestHeader, RequestKind)> for KafkaClientCodec {
    type Error = ErrorKind;

    fn encode(
        &mut self,
        item: (RequestHeader, RequestKind),
        dst: &mut BytesMut,
    ) -> Result<(), Self::Error> {
        let (mut header, request) = item;
        header.correlation_id = self.correlation_id;
        self.correlation_id = self.correlation_id.wrapping_add(1);

        let mut bytes = BytesMut::new();
        encode_request(&mut bytes, &header, request)?;
        self.requests.insert(header.correlation_id, header);
        self.length_codec.encode(bytes.freeze(), dst)?;
        Ok(())
    }
}

fn encode_request(
    bytes: &mut BytesMut,
    header: &RequestHeader,
    request: RequestKind,
) -> Result<(), ErrorKind> {
    let version = header.request_api_version;
    match request {
        RequestKind::ApiVersionsRequest(req) => {
            header.encode(bytes, ApiVersionsRequest::header_version(version))?;
            req.encode(bytes, version)?;
        }
        RequestKind::MetadataRequest(req) => {
            header.encode(bytes, MetadataRequest::header_version(version))?;
            req.encode(bytes, version)?;
        }
        _ => return Err(ErrorKind::UnsupportedOperation),
    };

    Ok(())
}

fn decode_response(
    bytes: &mut BytesMut,
    api_key: ApiKey,
    version: i16,
) -> Result<(ResponseHeader, ResponseKind), ErrorKind> {
    match api_key {
        ApiKey::ApiVersionsKey => {
            let header = ResponseHeader::decode(bytes, ApiVersionsResponse::header_version(version))?;
            let res = ApiVersionsResponse::decode(bytes, version)?;
            Ok((header, ResponseKind::ApiVersionsResponse(res)))
        }
        ApiKey::MetadataKey => {
            let header = ResponseHeader::decode(bytes, MetadataResponse::header_version(version))?;
            let res = MetadataResponse::decode(bytes, version)?;
            Ok((header, ResponseKind::MetadataResponse(res)))
        }
        _ => Err(ErrorKind::UnsupportedOperation),
    }
}
