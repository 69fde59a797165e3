//! Property tests for the key schedule and frame protection.

use std::cmp::Ordering;

use proptest::prelude::*;
use secio_crypto::{Algorithm, CipherKind, CipherState, CryptoError, HashKind, stretch_keys};

fn suite() -> impl Strategy<Value = (CipherKind, HashKind)> {
    (prop::sample::select(CipherKind::ALL), prop::sample::select(HashKind::ALL))
}

fn directional_pair(
    cipher: CipherKind,
    hash: HashKind,
    secret: &[u8],
) -> ((CipherState, CipherState), (CipherState, CipherState)) {
    let a = stretch_keys(cipher, hash, secret, Ordering::Greater);
    let b = stretch_keys(cipher, hash, secret, Ordering::Less);

    let build = |keys: &secio_crypto::KeyBundle| {
        let Ok(state) = CipherState::new(cipher, hash, keys) else { panic!("cipher state") };
        state
    };

    ((build(&a.outbound), build(&a.inbound)), (build(&b.outbound), build(&b.inbound)))
}

proptest! {
    #[test]
    fn messages_flow_both_ways(
        (cipher, hash) in suite(),
        secret in prop::collection::vec(any::<u8>(), 32..67),
        messages in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..300), 1..8),
    ) {
        let ((mut a_out, mut a_in), (mut b_out, mut b_in)) = directional_pair(cipher, hash, &secret);

        for msg in &messages {
            let frame = a_out.seal(msg).map_err(|e| TestCaseError::fail(e.to_string()))?;
            let opened = b_in.open(&frame).ok();
            prop_assert_eq!(opened.as_ref(), Some(msg));

            let reply = b_out.seal(msg).map_err(|e| TestCaseError::fail(e.to_string()))?;
            let opened = a_in.open(&reply).ok();
            prop_assert_eq!(opened.as_ref(), Some(msg));
        }
    }

    #[test]
    fn any_bit_flip_is_detected(
        (cipher, hash) in suite(),
        msg in prop::collection::vec(any::<u8>(), 1..200),
        flip in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let ((mut a_out, _), (_, mut b_in)) = directional_pair(cipher, hash, &[0x11; 32]);
        let mut frame = a_out.seal(&msg).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let i = flip.index(frame.len());
        frame[i] ^= 1 << bit;
        prop_assert_eq!(b_in.open(&frame), Err(CryptoError::MacMismatch));
    }

    #[test]
    fn same_direction_keys_do_not_decrypt(
        (cipher, hash) in suite(),
        msg in prop::collection::vec(any::<u8>(), 1..100),
    ) {
        let ((mut a_out, _), (mut b_out, _)) = directional_pair(cipher, hash, &[0x22; 32]);
        let frame = a_out.seal(&msg).map_err(|e| TestCaseError::fail(e.to_string()))?;

        // a's outbound keys are b's inbound keys, never b's outbound keys
        prop_assert!(b_out.open(&frame).is_err());
    }
}
