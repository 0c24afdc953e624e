//! On-endpoint sensors.
//!
//! The shield carries a TMP275 temperature sensor on the endpoint's I2C
//! bus; applications typically read it once after
//! [`begin`](crate::endpoint::Endpoint::begin) to report the system
//! temperature at startup.

pub mod tmp275;
