//! Endpoint configuration.
//!
//! All board-dependent parameters live in one explicit value that the
//! application constructs at startup and hands to the engine by ownership.
//! Values can be overridden by the application before [`Endpoint::new`]
//! (e.g. from build-time provisioning or a host-side JSON blob).
//!
//! [`Endpoint::new`]: crate::endpoint::Endpoint::new

use serde::{Deserialize, Serialize};

use crate::pins;

/// Host board variant, selecting the shield's resource capacity and the
/// default serial pin assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardProfile {
    Uno,
    Leonardo,
    MegaDue,
}

impl BoardProfile {
    /// Event resources the shield will store for this host.
    pub const fn max_resources(self) -> usize {
        match self {
            Self::Uno => 4,
            Self::Leonardo => 6,
            Self::MegaDue => 8, // the limit of the shield itself
        }
    }

    /// Soft-serial (rx, tx) pins, `None` where a hardware UART is used.
    pub const fn serial_pins(self) -> Option<(u8, u8)> {
        match self {
            Self::Uno => Some((pins::UNO_RX_PIN, pins::UNO_TX_PIN)),
            Self::Leonardo => Some((pins::LEONARDO_RX_PIN, pins::LEONARDO_TX_PIN)),
            Self::MegaDue => None,
        }
    }
}

/// Core engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Host board variant.
    pub board: BoardProfile,

    // --- Pins ---
    /// Digital output pulsed to announce an outbound frame.
    pub signal_pin: u8,
    /// Digital input that reads HIGH once the shield is online.
    pub state_pin: u8,

    // --- Timing ---
    /// Budget for one request/response exchange (milliseconds).
    pub response_timeout_ms: u32,
    /// Budget for the startup handshake in [`begin`] (milliseconds).
    ///
    /// [`begin`]: crate::endpoint::Endpoint::begin
    pub online_timeout_ms: u32,

    // --- Dispatch ---
    /// Reject pin commands whose pin segment is not a clean integer.
    /// Clearing this reproduces the legacy parse-as-pin-0 behaviour.
    pub strict_pin_parsing: bool,
}

impl EndpointConfig {
    /// Configuration for a given board with stock pin assignments.
    pub fn for_board(board: BoardProfile) -> Self {
        Self {
            board,
            signal_pin: pins::RSRC_EVENT_PIN,
            state_pin: pins::PEER_STATE_PIN,
            response_timeout_ms: 1_000,
            online_timeout_ms: 10_000,
            strict_pin_parsing: true,
        }
    }

    /// Resource capacity for the configured board.
    pub const fn max_resources(&self) -> usize {
        self.board.max_resources()
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::for_board(BoardProfile::Uno)
    }
}
