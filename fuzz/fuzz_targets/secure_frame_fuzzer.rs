//! Fuzz target for secure frame opening
//!
//! A receiver keyed from a fixed secret is fed attacker-controlled frames.
//!
//! # Invariants
//!
//! - Opening never panics, whatever the suite or frame length
//! - A frame the attacker did not seal with the real keys is rejected
//! - Rejected frames leave the receiver able to open the next genuine frame

#![no_main]

use std::cmp::Ordering;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use secio_crypto::{CipherKind, CipherState, HashKind, stretch_keys};

#[derive(Debug, Arbitrary)]
struct Input {
    cipher: u8,
    hash: bool,
    forged: Vec<u8>,
    genuine: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let cipher = match input.cipher % 3 {
        0 => CipherKind::Aes128,
        1 => CipherKind::Aes256,
        _ => CipherKind::Blowfish,
    };
    let hash = if input.hash { HashKind::Sha512 } else { HashKind::Sha256 };

    let keys = stretch_keys(cipher, hash, &[0x3C; 32], Ordering::Greater);
    let Ok(mut sender) = CipherState::new(cipher, hash, &keys.outbound) else { return };
    let Ok(mut receiver) = CipherState::new(cipher, hash, &keys.outbound) else { return };

    let Ok(real) = sender.seal(&input.genuine) else { return };
    if input.forged == real {
        return;
    }

    assert!(receiver.open(&input.forged).is_err());
    assert_eq!(receiver.open(&real).ok(), Some(input.genuine));
});
