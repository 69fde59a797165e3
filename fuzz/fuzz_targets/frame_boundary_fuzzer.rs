//! Fuzz target for length-prefix boundary conditions
//!
//! Prevent allocation DoS via hostile length prefixes.
//!
//! # Strategy
//!
//! - Prefix: zero, small, at-max, just-over-max, `u32::MAX`, random
//! - Body: shorter than, equal to, or longer than the prefix claims
//!
//! # Invariants
//!
//! - A prefix over the limit MUST return `ProtocolError::FrameTooLarge`
//! - A short body MUST return `ProtocolError::FrameTruncated`
//! - A decoded frame consumes exactly 4 + payload bytes

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use secio_proto::{LENGTH_PREFIX_SIZE, ProtocolError, decode_frame};

const MAX: usize = 4096;

#[derive(Debug, Clone, Arbitrary)]
enum Prefix {
    Zero,
    AtMax,
    JustOverMax,
    Max,
    Random(u32),
}

#[derive(Debug, Arbitrary)]
struct Input {
    prefix: Prefix,
    body: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let claimed = match input.prefix {
        Prefix::Zero => 0,
        Prefix::AtMax => MAX as u32,
        Prefix::JustOverMax => MAX as u32 + 1,
        Prefix::Max => u32::MAX,
        Prefix::Random(n) => n,
    };

    let mut wire = claimed.to_be_bytes().to_vec();
    wire.extend_from_slice(&input.body);

    match decode_frame(&wire, MAX) {
        Ok((payload, consumed)) => {
            assert_eq!(payload.len(), claimed as usize);
            assert_eq!(consumed, LENGTH_PREFIX_SIZE + payload.len());
        },
        Err(ProtocolError::FrameTooLarge { size, max }) => {
            assert!(size > max);
        },
        Err(ProtocolError::FrameTruncated { expected, actual }) => {
            assert!(actual < expected);
            assert_eq!(expected, claimed as usize);
        },
        Err(e) => panic!("unexpected error: {e}"),
    }
});
