//! Transport abstraction: any line-oriented message sink.
//!
//! Concrete implementations:
//! - [`LineTransport`] over any `std::io::Write` (stdout, a socket, a file)
//! - [`NullTransport`] when only the loop's counters matter
//!
//! The I/O loop is generic over `Transport`, so adding a new transport
//! requires zero changes to the dispatch logic.

use std::io::Write;

use super::codec::encode_line;

/// Outbound message channel. Each call carries one complete JSON envelope.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Deliver one serialized envelope.
    fn send(&mut self, json: &str) -> Result<(), Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Newline-delimited JSON over a byte writer, flushed per message.
pub struct LineTransport<W: Write> {
    writer: W,
}

impl<W: Write> LineTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for LineTransport<W> {
    type Error = std::io::Error;

    fn send(&mut self, json: &str) -> Result<(), std::io::Error> {
        self.writer.write_all(encode_line(json).as_bytes())?;
        self.writer.flush()
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        self.writer.flush()
    }
}

/// A null transport that discards all writes.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn send(&mut self, _json: &str) -> Result<(), ()> {
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}
