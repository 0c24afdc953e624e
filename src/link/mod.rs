//! The shield-facing link stack.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Link Stack                          │
//! │                                                         │
//! │  ┌───────────┐   ┌──────────┐   ┌───────────────────┐  │
//! │  │ Transport │──▶│  Codec   │──▶│     Exchange      │  │
//! │  │ (trait)   │   │ (framing)│   │ (request/response)│  │
//! │  └───────────┘   └──────────┘   └───────────────────┘  │
//! │        ▲                                  │             │
//! │        └───────────── one frame ◀─────────┘             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The transport is any half-duplex byte channel; the codec turns it into
//! sentinel-delimited text frames; the exchange layer runs one bounded
//! request/response round trip at a time.

pub mod codec;
pub mod exchange;
pub mod transport;
