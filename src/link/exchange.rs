//! One blocking request/response exchange with the shield.
//!
//! The channel is half-duplex and frames carry no correlation identifier,
//! so correlation is program order: exactly one exchange may be open at a
//! time. That invariant is structural here — [`Exchange::perform`] is a
//! synchronous `&mut self` call that runs the full round trip before
//! returning.
//!
//! Confirmation policy: a reply confirms iff it contains the full literal
//! success token `chariot/2.01 CREATED`. The shield reuses the creation
//! token to acknowledge value updates, so create and trigger exchanges
//! share one check.

use core::fmt::Write as _;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::link::codec::{self, FrameBuf};
use crate::link::transport::Transport;
use crate::ports::{Clock, SignalPort};
use crate::registry::Handle;

/// Literal token the shield embeds in every confirming reply.
pub const SUCCESS_TOKEN: &str = "chariot/2.01 CREATED";

/// Does this reply confirm the exchange?
pub fn reply_confirms(reply: &str) -> bool {
    reply.contains(SUCCESS_TOKEN)
}

/// Encode a resource-creation frame:
/// `rsrc=<handle>%maxlen=<n>%uri=<uri>%attr=<attrib>`.
pub fn build_create(handle: Handle, max_len: u8, uri: &str, attribute: &str) -> Result<FrameBuf> {
    let mut frame = FrameBuf::new();
    write!(frame, "rsrc={handle}%maxlen={max_len}%uri={uri}%attr={attribute}")
        .map_err(|_| Error::InvalidArgument)?;
    Ok(frame)
}

/// Encode a resource-update frame: `rsrc=<handle>%value=<val>`.
pub fn build_trigger(handle: Handle, value: &str) -> Result<FrameBuf> {
    let mut frame = FrameBuf::new();
    write!(frame, "rsrc={handle}%value={value}").map_err(|_| Error::FrameTooLong)?;
    Ok(frame)
}

/// Exchange lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// Nothing in flight.
    Idle,
    /// A frame was written; awaiting the correlated reply.
    Sent,
    /// The last reply carried the success token.
    Confirmed,
    /// The last reply arrived without the success token, or was garbled.
    Rejected,
    /// The response deadline expired with no complete reply.
    NoResponse,
}

/// The single in-flight exchange slot for one channel.
pub struct Exchange {
    state: ExchangeState,
}

impl Exchange {
    pub const fn new() -> Self {
        Self {
            state: ExchangeState::Idle,
        }
    }

    /// Outcome of the most recent exchange.
    pub const fn state(&self) -> ExchangeState {
        self.state
    }

    /// Run one full round trip: write `frame`, optionally pulse the
    /// signal line, then block (bounded by `timeout_ms`) for the reply.
    ///
    /// The pulse happens strictly after the frame bytes are written and
    /// flushed, so the peer never observes it before the data. Returns
    /// the confirming reply, [`Error::RemoteRejected`] when the success
    /// token is absent, or [`Error::NoResponse`] on deadline expiry.
    /// No retries — retry policy belongs to the caller.
    pub fn perform<T: Transport>(
        &mut self,
        transport: &mut T,
        signal: Option<&mut dyn SignalPort>,
        clock: &impl Clock,
        timeout_ms: u32,
        frame: &str,
    ) -> Result<FrameBuf> {
        codec::write_frame(transport, frame)?;
        self.state = ExchangeState::Sent;

        if let Some(line) = signal {
            line.pulse();
        }

        match codec::read_frame(transport, clock, timeout_ms) {
            Ok(reply) => {
                if reply_confirms(&reply) {
                    self.state = ExchangeState::Confirmed;
                    debug!("exchange confirmed: {}", reply.as_str());
                    Ok(reply)
                } else {
                    self.state = ExchangeState::Rejected;
                    warn!("exchange rejected by peer: {}", reply.as_str());
                    Err(Error::RemoteRejected)
                }
            }
            Err(Error::NoResponse) => {
                self.state = ExchangeState::NoResponse;
                warn!("exchange timed out awaiting peer reply");
                Err(Error::NoResponse)
            }
            Err(e) => {
                self.state = ExchangeState::Rejected;
                Err(e)
            }
        }
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}
