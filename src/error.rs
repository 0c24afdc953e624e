//! Unified error types for the endpoint engine.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform. All variants are `Copy` so they
//! can be cheaply returned through the dispatcher without allocation.
//!
//! Locally detectable failures (bad arguments, full registry, oversize
//! trigger payload, out-of-range handle) are rejected before any byte
//! reaches the channel. Failures are plain return values — the dispatcher
//! keeps serving frames after any one of them.

use core::fmt;

/// Every fallible operation in the engine funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied argument failed validation (empty URI or
    /// attribute, frame-length bound out of range).
    InvalidArgument,
    /// The resource registry already holds its board-dependent maximum.
    CapacityExceeded,
    /// The handle does not name a live resource.
    InvalidHandle,
    /// The encoded trigger frame exceeds the resource's frame-length bound.
    FrameTooLong,
    /// The peer answered an exchange without the success token.
    RemoteRejected,
    /// The peer did not answer within the configured timeout.
    NoResponse,
    /// An inbound frame could not be decoded (overlong or invalid text).
    MalformedFrame,
    /// The byte channel itself failed mid-read or mid-write.
    Channel,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::CapacityExceeded => write!(f, "resource registry full"),
            Self::InvalidHandle => write!(f, "invalid resource handle"),
            Self::FrameTooLong => write!(f, "frame exceeds resource bound"),
            Self::RemoteRejected => write!(f, "peer rejected exchange"),
            Self::NoResponse => write!(f, "no response from peer"),
            Self::MalformedFrame => write!(f, "malformed inbound frame"),
            Self::Channel => write!(f, "channel I/O failure"),
        }
    }
}

impl core::error::Error for Error {}

/// Engine-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
