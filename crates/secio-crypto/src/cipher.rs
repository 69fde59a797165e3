//! Per-direction frame encryption.
//!
//! A frame on the wire is `ciphertext || HMAC(mac_key, ciphertext)`. The
//! cipher runs in CTR mode and its keystream continues across frames, so
//! frames must be opened in the order they were sealed.

use aes::{Aes128, Aes256};
use blowfish::Blowfish;
use ctr::{
    Ctr64BE, Ctr128BE, CtrCore,
    cipher::{InnerIvInit, KeyInit, StreamCipher as _, StreamCipherCoreWrapper},
    flavors,
};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::{
    catalog::{CipherKind, HashKind},
    error::CryptoError,
    stretch::{KeyBundle, hmac},
};

enum Keystream {
    Aes128(Box<Ctr128BE<Aes128>>),
    Aes256(Box<Ctr128BE<Aes256>>),
    Blowfish(Box<Ctr64BE<Blowfish>>),
}

impl Keystream {
    fn new(kind: CipherKind, key: &[u8], iv: &[u8]) -> Result<Self, CryptoError> {
        let bad_key = || CryptoError::InvalidKeyLength { expected: kind.key_size(), actual: key.len() };
        let bad_iv = || CryptoError::InvalidKeyLength { expected: kind.iv_size(), actual: iv.len() };

        if key.len() != kind.key_size() {
            return Err(bad_key());
        }

        let stream = match kind {
            CipherKind::Aes128 => {
                let inner = <Aes128 as KeyInit>::new_from_slice(key).map_err(|_| bad_key())?;
                let core = CtrCore::<_, flavors::Ctr128BE>::inner_iv_slice_init(inner, iv).map_err(|_| bad_iv())?;
                Self::Aes128(Box::new(StreamCipherCoreWrapper::from_core(core)))
            },
            CipherKind::Aes256 => {
                let inner = <Aes256 as KeyInit>::new_from_slice(key).map_err(|_| bad_key())?;
                let core = CtrCore::<_, flavors::Ctr128BE>::inner_iv_slice_init(inner, iv).map_err(|_| bad_iv())?;
                Self::Aes256(Box::new(StreamCipherCoreWrapper::from_core(core)))
            },
            CipherKind::Blowfish => {
                let inner = <Blowfish as KeyInit>::new_from_slice(key).map_err(|_| bad_key())?;
                let core = CtrCore::<_, flavors::Ctr64BE>::inner_iv_slice_init(inner, iv).map_err(|_| bad_iv())?;
                Self::Blowfish(Box::new(StreamCipherCoreWrapper::from_core(core)))
            },
        };
        Ok(stream)
    }

    fn apply(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let result = match self {
            Self::Aes128(stream) => stream.try_apply_keystream(buf),
            Self::Aes256(stream) => stream.try_apply_keystream(buf),
            Self::Blowfish(stream) => stream.try_apply_keystream(buf),
        };
        result.map_err(|_| CryptoError::KeyOperation("keystream exhausted".to_string()))
    }
}

/// Cipher and MAC state for one direction of a session.
pub struct CipherState {
    kind: CipherKind,
    hash: HashKind,
    keystream: Keystream,
    mac_key: Zeroizing<Vec<u8>>,
}

impl CipherState {
    /// Build the state for one direction from its key bundle.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength` if the bundle does not fit the cipher
    pub fn new(kind: CipherKind, hash: HashKind, keys: &KeyBundle) -> Result<Self, CryptoError> {
        let keystream = Keystream::new(kind, &keys.cipher_key, &keys.iv)?;
        Ok(Self { kind, hash, keystream, mac_key: Zeroizing::new(keys.mac_key.clone()) })
    }

    /// MAC tag length appended to every frame.
    pub fn tag_size(&self) -> usize {
        self.hash.output_size()
    }

    /// Encrypt `plaintext` and append its MAC.
    pub fn seal(&mut self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut frame = Vec::with_capacity(plaintext.len() + self.tag_size());
        frame.extend_from_slice(plaintext);
        self.keystream.apply(&mut frame)?;

        let tag = hmac(self.hash, &self.mac_key, &[&frame]);
        frame.extend_from_slice(&tag);
        Ok(frame)
    }

    /// Verify and decrypt a sealed frame.
    ///
    /// The MAC is checked in constant time before any decryption, so a
    /// rejected frame leaves the keystream untouched.
    ///
    /// # Errors
    ///
    /// - `FrameTooShort` if the frame cannot hold a tag
    /// - `MacMismatch` if the tag does not verify
    pub fn open(&mut self, frame: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let tag_size = self.tag_size();
        if frame.len() < tag_size {
            return Err(CryptoError::FrameTooShort { actual: frame.len(), tag_size });
        }

        let (ciphertext, tag) = frame.split_at(frame.len() - tag_size);
        let expected = hmac(self.hash, &self.mac_key, &[ciphertext]);
        if !bool::from(expected.ct_eq(tag)) {
            return Err(CryptoError::MacMismatch);
        }

        let mut plaintext = ciphertext.to_vec();
        self.keystream.apply(&mut plaintext)?;
        Ok(plaintext)
    }
}

impl std::fmt::Debug for CipherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherState").field("cipher", &self.kind).field("hash", &self.hash).finish_non_exhaustive()
    }
}
