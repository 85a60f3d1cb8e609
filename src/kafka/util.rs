use bytes::Bytes;
use kafka_protocol::protocol::StrBytes;

pub trait ToStrBytes {
    fn to_str_bytes(&self) -> StrBytes;
}

impl ToStrBytes for str {
    fn to_str_bytes(&self) -> StrBytes {
        // SAFETY: `str` is always valid utf-8
        unsafe { StrBytes::from_utf8_unchecked(Bytes::copy_from_slice(self.as_bytes())) }
    }
}

impl ToStrBytes for String {
    fn to_str_bytes(&self) -> StrBytes {
        self.as_str().to_str_bytes()
    }
}
