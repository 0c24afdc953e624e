//! Integration test driver for `tests/integration/` submodules.
//!
//! Each `mod` below exercises a protocol path against mock adapters.
//! All tests run on the host with no real hardware required.

mod endpoint_tests;
