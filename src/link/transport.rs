//! Transport abstraction — any byte-oriented channel to the shield.
//!
//! Concrete implementations:
//! - hardware UART (Mega/Due `Serial3`)
//! - bit-banged soft serial (Uno, Leonardo)
//! - a scripted in-memory channel (host tests)
//!
//! The engine is generic over `Transport`, so adding a new channel
//! requires zero changes to the protocol logic. The channel is
//! half-duplex and unaddressed: one peer, one exchange at a time.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns the number of bytes actually read.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Count of bytes currently readable without blocking.
    fn available(&self) -> usize;
}

/// A null transport that discards all writes and never reads.
/// Useful as a default when the shield is not connected.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> usize {
        0
    }
}
