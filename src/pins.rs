//! Default pin assignments for the Chariot shield headers.
//!
//! Single source of truth — adapters and [`EndpointConfig`] defaults
//! reference this module rather than hard-coding pin numbers.
//!
//! [`EndpointConfig`]: crate::config::EndpointConfig

// ---------------------------------------------------------------------------
// Out-of-band signalling
// ---------------------------------------------------------------------------

/// Digital output pulsed low-then-high to tell the shield a frame is
/// ready on the data channel. Active LOW — adapters drive it HIGH at init.
pub const RSRC_EVENT_PIN: u8 = 9;

/// Digital input driven HIGH by the shield once it is online.
pub const PEER_STATE_PIN: u8 = 8;

// ---------------------------------------------------------------------------
// Soft-serial channel (boards without a spare hardware UART)
// ---------------------------------------------------------------------------

/// Uno soft-serial receive pin.
pub const UNO_RX_PIN: u8 = 11;
/// Uno soft-serial transmit pin.
pub const UNO_TX_PIN: u8 = 12;

/// Leonardo soft-serial receive pin.
pub const LEONARDO_RX_PIN: u8 = 11;
/// Leonardo soft-serial transmit pin.
pub const LEONARDO_TX_PIN: u8 = 4;

// Mega/Due hosts use hardware Serial3; no soft-serial pins to assign.
