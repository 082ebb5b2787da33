mod decoder;
mod encoder;

pub use decoder::StreamingDecoder;
pub use encoder::StreamingEncoder;

use crate::encoders::algorithms::errors::DecodeError;
use std::io;

/// The failure that poisoned a stream, replayed on every later call.
#[derive(Debug, Clone)]
enum Fault {
    Corrupt(DecodeError),
    // io::Error is not Clone; keep what is needed to rebuild it
    Io(io::ErrorKind, String),
}

impl Fault {
    fn from_io(err: &io::Error) -> Self {
        Fault::Io(err.kind(), err.to_string())
    }

    fn to_io_error(&self) -> io::Error {
        match self {
            Fault::Corrupt(err) => io::Error::new(io::ErrorKind::InvalidData, *err),
            Fault::Io(kind, message) => io::Error::new(*kind, message.clone()),
        }
    }
}

/// Lifecycle of a stream wrapper. Every operation checks this first.
#[derive(Debug, Clone)]
enum StreamState {
    Open,
    Poisoned(Fault),
    Closed,
}
