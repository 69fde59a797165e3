//! Fuzz target for the protocol identifier line
//!
//! # Invariants
//!
//! - Accepted lines contain "secio" and no newline
//! - Line and body together are exactly the input minus one newline

#![no_main]

use libfuzzer_sys::fuzz_target;
use secio_proto::split_protocol_line;

fuzz_target!(|data: &[u8]| {
    if let Ok((line, body)) = split_protocol_line(data) {
        assert!(line.windows(5).any(|w| w == b"secio"));
        assert!(!line.contains(&b'\n'));
        assert_eq!(line.len() + 1 + body.len(), data.len());
    }
});
