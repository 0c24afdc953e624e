//! Port traits — the boundary between the protocol engine and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Endpoint (engine)
//! ```
//!
//! Adapters (GPIO registers, timers, test mocks) implement these traits.
//! The [`Endpoint`](crate::endpoint::Endpoint) consumes them at call
//! sites, so the engine never touches hardware directly. The byte channel
//! itself has its own port, [`Transport`](crate::link::transport::Transport).

use serde::{Deserialize, Serialize};

// ───────────────────────────────────────────────────────────────
// Pin mux port (driven adapter: engine → GPIO)
// ───────────────────────────────────────────────────────────────

/// Pin direction requested by an inbound `mode` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinMode {
    Input,
    Output,
    InputPullup,
}

impl PinMode {
    /// Keyword echoed in the command response (`configured as OUTPUT`).
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Output => "OUTPUT",
            Self::InputPullup => "INPUT_PULLUP",
        }
    }
}

/// Numbered-pin GPIO mux. Inbound commands address pins by integer, so
/// the port is keyed the same way rather than by per-pin objects.
pub trait PinPort {
    /// Drive a digital pin high or low.
    fn digital_write(&mut self, pin: u8, high: bool);

    /// Sample a digital pin.
    fn digital_read(&mut self, pin: u8) -> bool;

    /// Write an 8-bit PWM duty to an analog-capable pin.
    fn analog_write(&mut self, pin: u8, value: u8);

    /// Sample an analog pin (10-bit ADC range, 0–1023).
    fn analog_read(&mut self, pin: u8) -> u16;

    /// Configure a pin's direction.
    fn set_mode(&mut self, pin: u8, mode: PinMode);
}

// ───────────────────────────────────────────────────────────────
// Signal line port (driven adapter: engine → frame-ready line)
// ───────────────────────────────────────────────────────────────

/// The out-of-band frame-ready line.
///
/// The engine calls [`pulse`](Self::pulse) only after an outbound frame's
/// bytes are fully written, so the peer never observes the pulse before
/// the data it announces.
pub trait SignalPort {
    /// Pulse the line low-then-high once.
    ///
    /// The pulse must complete without preemption — implementations on
    /// interrupt-capable targets suppress interrupts for its duration.
    fn pulse(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Monotonic time port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock, used to bound every blocking wait.
///
/// Host adapters wrap `std::time::Instant`; firmware adapters wrap the
/// platform's high-resolution timer.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch (monotonic, never wraps
    /// within a session).
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
