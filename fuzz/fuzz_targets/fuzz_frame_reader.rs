//! Fuzz target: `FrameReader::feed`
//!
//! Drives arbitrary byte sequences into the streaming frame reader and
//! asserts that it never panics, never yields a payload containing the
//! sentinel, and accepts a clean frame after a reset.
//!
//! cargo fuzz run fuzz_frame_reader

#![no_main]

use chariot_ep::link::codec::{FrameReader, MAX_PAYLOAD_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = FrameReader::new();

    // Feed the raw bytes in one go (may contain sentinels, garbage, …).
    if let Ok(Some(payload)) = reader.feed(data) {
        assert!(payload.len() <= MAX_PAYLOAD_LEN, "payload exceeds bound");
        assert!(!payload.contains('<'), "sentinel leaked into payload");
    }

    // After a reset the reader must accept a clean frame again.
    reader.reset();
    assert_eq!(reader.feed(b"ok<<").ok().flatten(), Some("ok"));
});
