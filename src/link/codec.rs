//! Sentinel-delimited frame codec.
//!
//! Wire format (ASCII text, no length prefix):
//!
//! ```text
//! rsrc=0%maxlen=40%uri=event/door%attr=state<
//! └─ key=value fields joined by '%' ──────┘└─ sentinel
//! ```
//!
//! A reply's end is recognised after exactly **two** sentinel occurrences
//! have been consumed from the stream — the body terminator plus the ack
//! marker the shield appends. The reader accumulates incoming bytes and
//! yields the payload with the sentinels excluded. This handles partial
//! reads gracefully: a single `Transport::read` may deliver part of a
//! frame, or a frame boundary mid-chunk.

use crate::error::{Error, Result};
use crate::link::transport::Transport;
use crate::ports::Clock;

/// Frame/ack terminator. Field values must not contain it (unescaped).
pub const FRAME_SENTINEL: u8 = b'<';

/// Field separator inside a frame.
pub const FIELD_SEP: char = '%';

/// Sentinel occurrences that end one inbound frame (body + ack marker).
const SENTINELS_PER_FRAME: u8 = 2;

/// Bound on the encoded length of any outbound resource frame.
pub const MAX_FRAME_LEN: usize = 64;

/// Bound on an accumulated inbound payload.
pub const MAX_PAYLOAD_LEN: usize = 128;

/// Owned frame payload, inbound or outbound.
pub type FrameBuf = heapless::String<MAX_PAYLOAD_LEN>;

/// Streaming frame reader.
///
/// Chunk-size independent: feeding one byte at a time or the whole frame
/// at once yields the same payload.
pub struct FrameReader {
    buf: heapless::Vec<u8, MAX_PAYLOAD_LEN>,
    sentinels_seen: u8,
    /// A payload was yielded on the previous `feed`; the buffer is
    /// cleared lazily on the next call so the returned borrow stays valid.
    yielded: bool,
}

impl FrameReader {
    pub const fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            sentinels_seen: 0,
            yielded: false,
        }
    }

    /// Feed bytes into the reader.
    ///
    /// Returns `Ok(Some(payload))` once the second sentinel has been
    /// consumed; the payload borrow is valid until the next call. Bytes
    /// after the terminating sentinel in the same chunk are dropped — the
    /// link is half-duplex, nothing pipelines behind a frame. An overlong
    /// or non-UTF-8 payload resets the reader and fails with
    /// [`Error::MalformedFrame`].
    pub fn feed(&mut self, data: &[u8]) -> Result<Option<&str>> {
        if self.yielded {
            self.buf.clear();
            self.yielded = false;
        }

        let mut complete = false;
        for &byte in data {
            if byte == FRAME_SENTINEL {
                self.sentinels_seen += 1;
                if self.sentinels_seen == SENTINELS_PER_FRAME {
                    complete = true;
                    break;
                }
            } else if self.buf.push(byte).is_err() {
                self.reset();
                return Err(Error::MalformedFrame);
            }
        }
        if !complete {
            return Ok(None);
        }

        self.sentinels_seen = 0;
        if core::str::from_utf8(&self.buf).is_err() {
            self.buf.clear();
            return Err(Error::MalformedFrame);
        }
        self.yielded = true;
        Ok(Some(core::str::from_utf8(&self.buf).expect("validated above")))
    }

    /// Clear accumulated state (e.g. after a malformed frame).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.sentinels_seen = 0;
        self.yielded = false;
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one complete frame from the channel, bounded by `timeout_ms`.
///
/// Polls `available()` and accumulates until the two-sentinel terminator;
/// if the deadline passes first, fails with [`Error::NoResponse`] instead
/// of busy-waiting forever.
pub fn read_frame<T: Transport>(
    transport: &mut T,
    clock: &impl Clock,
    timeout_ms: u32,
) -> Result<FrameBuf> {
    let deadline = clock.now_ms().saturating_add(u64::from(timeout_ms));
    let mut reader = FrameReader::new();
    let mut chunk = [0u8; 16];

    loop {
        if clock.now_ms() >= deadline {
            return Err(Error::NoResponse);
        }
        if transport.available() == 0 {
            continue;
        }
        let n = transport.read(&mut chunk).map_err(|_| Error::Channel)?;
        if let Some(payload) = reader.feed(&chunk[..n])? {
            let mut out = FrameBuf::new();
            out.push_str(payload).map_err(|_| Error::MalformedFrame)?;
            return Ok(out);
        }
    }
}

/// Write `payload` followed by exactly one sentinel, then flush.
///
/// Callers must not embed the sentinel character inside field values.
pub fn write_frame<T: Transport>(transport: &mut T, payload: &str) -> Result<()> {
    write_all(transport, payload.as_bytes())?;
    write_all(transport, &[FRAME_SENTINEL])?;
    transport.flush().map_err(|_| Error::Channel)
}

fn write_all<T: Transport>(transport: &mut T, mut data: &[u8]) -> Result<()> {
    while !data.is_empty() {
        let n = transport.write(data).map_err(|_| Error::Channel)?;
        if n == 0 {
            return Err(Error::Channel);
        }
        data = &data[n..];
    }
    Ok(())
}
