use kafka_protocol::protocol::{DecodeError, EncodeError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ErrorKind {
    DecodeError,
    EncodeError,
    UnsupportedOperation,
    UnknownCorrelationId(i32),
    ConnectionClosed,
    IoError(std::io::Error),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::DecodeError => {
                write!(f, "error decoding message")
            }
            ErrorKind::EncodeError => {
                write!(f, "error encoding message")
            }
            ErrorKind::UnsupportedOperation => {
                write!(f, "unsupported api")
            }
            ErrorKind::UnknownCorrelationId(id) => {
                write!(f, "response for unknown correlation id {}", id)
            }
            ErrorKind::ConnectionClosed => {
                write!(f, "connection closed before a response arrived")
            }
            ErrorKind::IoError(err) => {
                write!(f, "io error: {}", err)
            }
        }
    }
}

impl Error for ErrorKind {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ErrorKind::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ErrorKind {
    fn from(err: std::io::Error) -> Self {
        ErrorKind::IoError(err)
    }
}

impl From<DecodeError> for ErrorKind {
    fn from(_err: DecodeError) -> Self {
        ErrorKind::DecodeError
    }
}

impl From<EncodeError> for ErrorKind {
    fn from(_err: EncodeError) -> Self {
        ErrorKind::EncodeError
    }
}

impl From<()> for ErrorKind {
    fn from(_: ()) -> Self {
        ErrorKind::UnsupportedOperation
    }
}
