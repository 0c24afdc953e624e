//! The endpoint engine — protocol core behind the port boundary.
//!
//! [`Endpoint`] owns the resource registry, the exchange slot, and the
//! configuration. It exposes a hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the engine fully
//! testable with mock adapters.
//!
//! ```text
//!   Transport ──▶ ┌──────────────────────────┐ ──▶ Transport
//!                 │         Endpoint          │
//!     PinPort ◀── │  Registry · Exchange ·    │ ──▶ SignalPort
//!                 │  Dispatcher               │
//!                 └──────────────────────────┘
//! ```
//!
//! The intended control loop is cooperative and run-to-completion:
//!
//! ```ignore
//! loop {
//!     if ep.available(&transport) > 0 {
//!         let _ = ep.process(&mut transport, &mut pins, &mut signal, &clock);
//!     }
//!     // application work, local console passthrough, ...
//! }
//! ```

use core::fmt::Write as _;

use log::{debug, info, warn};

use crate::command::{self, Command, CommandError};
use crate::config::EndpointConfig;
use crate::error::{Error, Result};
use crate::link::codec::{self, FrameBuf};
use crate::link::exchange::{self, Exchange, ExchangeState};
use crate::link::transport::Transport;
use crate::ports::{Clock, PinPort, SignalPort};
use crate::registry::{Handle, PutHandler, ResourceRegistry};

/// Status request written during the startup handshake when the channel
/// is silent.
const STATUS_REQUEST: &str = "sys/status";

/// What one [`Endpoint::process`] call did with the inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A pin command was executed and answered.
    PinCommand,
    /// A pin command failed validation; an error frame was emitted and
    /// no pin was touched.
    PinRejected,
    /// PUT parameters reached a registered handler. `notified` is set
    /// when the handler's new value was published back to the peer.
    PutHandled { notified: bool },
    /// PUT parameters arrived for an unregistered URI, an empty value,
    /// or a resource without a handler.
    PutIgnored,
    /// The frame matched no known prefix and was logged and dropped.
    Discarded,
}

/// The protocol engine for one shield link.
pub struct Endpoint {
    config: EndpointConfig,
    registry: ResourceRegistry,
    exchange: Exchange,
    online: bool,
}

impl Endpoint {
    /// Build an engine from an explicit configuration value.
    pub fn new(config: EndpointConfig) -> Self {
        let registry = ResourceRegistry::new(config.max_resources());
        Self {
            config,
            registry,
            exchange: Exchange::new(),
            online: false,
        }
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Outcome of the most recent exchange (observability only).
    pub fn exchange_state(&self) -> ExchangeState {
        self.exchange.state()
    }

    /// The startup handshake completed.
    pub fn is_online(&self) -> bool {
        self.online
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Startup handshake.
    ///
    /// Waits (bounded by `online_timeout_ms`) for the peer-state pin to
    /// read high, solicits a readiness frame if the channel is silent,
    /// and consumes that frame. The engine is online once this returns
    /// `Ok`.
    pub fn begin<T: Transport>(
        &mut self,
        transport: &mut T,
        pins: &mut impl PinPort,
        signal: &mut impl SignalPort,
        clock: &impl Clock,
    ) -> Result<()> {
        info!("waiting for the shield to come online");
        let deadline = clock
            .now_ms()
            .saturating_add(u64::from(self.config.online_timeout_ms));
        while !pins.digital_read(self.config.state_pin) {
            if clock.now_ms() >= deadline {
                warn!("shield state pin never went high");
                return Err(Error::NoResponse);
            }
        }

        // Solicit the readiness frame when the shield has not already
        // queued one.
        if transport.available() == 0 {
            codec::write_frame(transport, STATUS_REQUEST)?;
            signal.pulse();
        }
        let readiness = codec::read_frame(transport, clock, self.config.online_timeout_ms)?;
        info!("shield online: {}", readiness.as_str());

        self.online = true;
        Ok(())
    }

    /// Bytes currently readable on the channel.
    pub fn available<T: Transport>(&self, transport: &T) -> usize {
        transport.available()
    }

    // ── Outbound resource operations ──────────────────────────

    /// Two-phase resource creation.
    ///
    /// Reserves the next handle locally, publishes the create frame, and
    /// awaits confirmation. Locally detectable failures (bad arguments,
    /// full registry) never touch the channel. A rejected or unanswered
    /// create rolls the reservation back, releasing the handle.
    pub fn create_resource<T: Transport>(
        &mut self,
        uri: &str,
        max_len: u8,
        attribute: &str,
        transport: &mut T,
        signal: &mut impl SignalPort,
        clock: &impl Clock,
    ) -> Result<Handle> {
        let handle = self.registry.create_local(uri, max_len, attribute)?;
        let frame = match exchange::build_create(handle, max_len, uri, attribute) {
            Ok(frame) => frame,
            Err(e) => {
                self.registry.rollback(handle);
                return Err(e);
            }
        };

        match self.exchange.perform(
            transport,
            Some(signal),
            clock,
            self.config.response_timeout_ms,
            &frame,
        ) {
            Ok(_) => {
                info!("resource {} created: {}", handle, uri);
                Ok(handle)
            }
            Err(e) => {
                self.registry.rollback(handle);
                warn!("create of {} failed: {}", uri, e);
                Err(e)
            }
        }
    }

    /// Publish a new value for a live resource.
    ///
    /// Fails with [`Error::FrameTooLong`] — without touching the channel
    /// — when the encoded frame (payload plus sentinel) exceeds the
    /// resource's bound. The signal line is pulsed only if `signal_peer`,
    /// and only after the frame bytes are fully written. A failed trigger
    /// leaves the registry unchanged; the resource persists.
    pub fn trigger_resource_event<T: Transport>(
        &mut self,
        handle: Handle,
        value: &str,
        signal_peer: bool,
        transport: &mut T,
        signal: &mut impl SignalPort,
        clock: &impl Clock,
    ) -> Result<()> {
        let bound = self
            .registry
            .get(handle)
            .ok_or(Error::InvalidHandle)?
            .max_frame_len();
        let frame = exchange::build_trigger(handle, value)?;
        if frame.len() + 1 > usize::from(bound) {
            return Err(Error::FrameTooLong);
        }

        let line: Option<&mut dyn SignalPort> = if signal_peer { Some(signal) } else { None };
        self.exchange
            .perform(transport, line, clock, self.config.response_timeout_ms, &frame)
            .map(|_| ())
    }

    /// Attach a PUT handler to a live resource.
    pub fn set_put_handler(
        &mut self,
        handle: Handle,
        handler: impl PutHandler + 'static,
    ) -> Result<()> {
        self.registry.set_handler(handle, Box::new(handler))
    }

    /// Resolve a registered URI to its handle (first match, insertion
    /// order).
    pub fn handle_from_uri(&self, uri: &str) -> Option<Handle> {
        self.registry.lookup_by_uri(uri)
    }

    // ── Inbound dispatch ──────────────────────────────────────

    /// Read one inbound frame and dispatch it.
    ///
    /// Every failure is a plain return value; the engine stays
    /// consistent and the caller's loop keeps serving subsequent frames.
    pub fn process<T: Transport>(
        &mut self,
        transport: &mut T,
        pins: &mut impl PinPort,
        signal: &mut impl SignalPort,
        clock: &impl Clock,
    ) -> Result<Dispatched> {
        let frame = codec::read_frame(transport, clock, self.config.response_timeout_ms)?;

        match command::parse(&frame, self.config.strict_pin_parsing) {
            Ok(Command::Digital { pin, value }) => self.digital_command(pin, value, transport, pins),
            Ok(Command::Analog { pin, value }) => self.analog_command(pin, value, transport, pins),
            Ok(Command::Mode { pin, mode }) => {
                pins.set_mode(pin, mode);
                let mut resp = FrameBuf::new();
                write!(resp, "Pin D{pin} configured as {}", mode.keyword())
                    .map_err(|_| Error::MalformedFrame)?;
                codec::write_frame(transport, &resp)?;
                Ok(Dispatched::PinCommand)
            }
            Ok(Command::Put { uri, value }) => {
                self.put_command(uri, value, transport, signal, clock)
            }
            Err(CommandError::UnknownPrefix) => {
                warn!("discarding frame with unknown prefix: {}", frame.as_str());
                Ok(Dispatched::Discarded)
            }
            Err(CommandError::MissingPutParameters) => {
                warn!("PUT parameters did not arrive");
                Ok(Dispatched::Discarded)
            }
            Err(CommandError::MalformedPin(_)) | Err(CommandError::MissingMode) => {
                codec::write_frame(transport, "Arduino remote error: malformed URI")?;
                Ok(Dispatched::PinRejected)
            }
            Err(CommandError::InvalidDigitalValue(token))
            | Err(CommandError::InvalidAnalogValue(token)) => {
                let mut resp = FrameBuf::new();
                write!(resp, "Arduino remote error: invalid value {token}")
                    .map_err(|_| Error::MalformedFrame)?;
                codec::write_frame(transport, &resp)?;
                Ok(Dispatched::PinRejected)
            }
            Err(CommandError::InvalidMode(token)) => {
                let mut resp = FrameBuf::new();
                write!(resp, "Arduino remote error: invalid mode {token}")
                    .map_err(|_| Error::MalformedFrame)?;
                codec::write_frame(transport, &resp)?;
                Ok(Dispatched::PinRejected)
            }
        }
    }

    fn digital_command<T: Transport>(
        &mut self,
        pin: u8,
        value: Option<u8>,
        transport: &mut T,
        pins: &mut impl PinPort,
    ) -> Result<Dispatched> {
        let value = match value {
            Some(v) => {
                pins.digital_write(pin, v == 1);
                v
            }
            None => u8::from(pins.digital_read(pin)),
        };
        let mut resp = FrameBuf::new();
        write!(resp, "Pin D{pin} set to {value}").map_err(|_| Error::MalformedFrame)?;
        codec::write_frame(transport, &resp)?;
        Ok(Dispatched::PinCommand)
    }

    fn analog_command<T: Transport>(
        &mut self,
        pin: u8,
        value: Option<u8>,
        transport: &mut T,
        pins: &mut impl PinPort,
    ) -> Result<Dispatched> {
        // A present value always means write (PWM); absence means read.
        let value: u16 = match value {
            Some(v) => {
                pins.analog_write(pin, v);
                u16::from(v)
            }
            None => pins.analog_read(pin),
        };
        let mut resp = FrameBuf::new();
        write!(resp, "Pin A{pin} set to {value}").map_err(|_| Error::MalformedFrame)?;
        codec::write_frame(transport, &resp)?;
        Ok(Dispatched::PinCommand)
    }

    fn put_command<T: Transport>(
        &mut self,
        uri: &str,
        value: &str,
        transport: &mut T,
        signal: &mut impl SignalPort,
        clock: &impl Clock,
    ) -> Result<Dispatched> {
        let Some(handle) = self.registry.lookup_by_uri(uri) else {
            debug!("PUT for unregistered uri: {}", uri);
            return Ok(Dispatched::PutIgnored);
        };
        if value.is_empty() {
            return Ok(Dispatched::PutIgnored);
        }

        let outcome = match self.registry.get_mut(handle).and_then(|r| r.handler_mut()) {
            Some(handler) => handler.on_put(value),
            None => return Ok(Dispatched::PutIgnored),
        };

        // The notify round trip starts only after the handler has
        // returned: inbound PUT → local mutation → outbound notify.
        match outcome {
            Some(new_value) if !new_value.is_empty() => {
                self.trigger_resource_event(handle, &new_value, true, transport, signal, clock)?;
                Ok(Dispatched::PutHandled { notified: true })
            }
            _ => Ok(Dispatched::PutHandled { notified: false }),
        }
    }

    // ── Local console passthrough ─────────────────────────────

    /// Forward a locally entered shield command (`sys/status`,
    /// `sys/health`, `sys/motes`) and return the peer's reply verbatim.
    pub fn forward_local_command<T: Transport>(
        &mut self,
        line: &str,
        transport: &mut T,
        clock: &impl Clock,
    ) -> Result<FrameBuf> {
        codec::write_frame(transport, line.trim())?;
        codec::read_frame(transport, clock, self.config.response_timeout_ms)
    }
}
