//! Endpoint protocol engine for the Chariot IoT gateway shield.
//!
//! The shield ("peer") shares one half-duplex serial channel with the
//! host microcontroller and speaks a minimal text protocol that emulates
//! CoAP resource creation, update, and notification. This crate is the
//! host-side engine: sentinel-delimited framing, a fixed-capacity
//! resource registry with two-phase create, the one-exchange-at-a-time
//! request/response discipline, and the dispatcher that routes inbound
//! path commands to pin actions or user PUT handlers.
//!
//! Hardware enters through port traits ([`ports`], [`link::transport`]);
//! the engine itself never touches a register, so everything here runs
//! and tests on the host.

#![deny(unused_must_use)]

pub mod command;
pub mod config;
pub mod endpoint;
pub mod link;
pub mod pins;
pub mod ports;
pub mod registry;
pub mod sensors;

mod error;

pub use endpoint::{Dispatched, Endpoint};
pub use error::{Error, Result};
