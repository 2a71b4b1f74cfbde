//! The AEAD façade (§4.5): a thin wrapper that accepts a nonce and a single
//! associated-data string and presents them to SIV as the two-element
//! vector `[associated_data, nonce]` (§8 property 4, "nonce as AD").
//!
//! Grounded on `original_source/python/miscreant/aead.py`, with the
//! dispatch-on-algorithm-name shape additionally grounded on the vendored
//! `miscreant` crate's `SivAead`/`CmacSivAead`/`PmacSivAead` type aliases
//! found in the retrieval pack.

use alloc::vec::Vec;

#[cfg(feature = "getrandom")]
use rand_core::{OsRng, RngCore};

use crate::error::Error;
use crate::siv::{Aes128PmacSiv, Aes128Siv, Aes256PmacSiv, Aes256Siv};

/// Default size, in bytes, of a generated nonce (§6).
pub const DEFAULT_NONCE_SIZE: usize = 16;

/// A selected AEAD algorithm and its keyed SIV instance.
///
/// Constructed via [`Aead::new`] with an algorithm name: `"AES-SIV"`
/// (alias `"AES-CMAC-SIV"`) selects CMAC; `"AES-PMAC-SIV"` selects PMAC.
/// Any other name is rejected at construction with [`Error::Argument`].
pub enum Aead {
    Cmac128(Aes128Siv),
    Cmac256(Aes256Siv),
    Pmac128(Aes128PmacSiv),
    Pmac256(Aes256PmacSiv),
}

impl Aead {
    /// Generate a new random AES-SIV key of the given size (32 or 64 bytes).
    #[cfg(feature = "getrandom")]
    pub fn generate_key(size: usize) -> Result<Vec<u8>, Error> {
        if size != 32 && size != 64 {
            return Err(Error::Argument("key size must be 32 or 64 bytes"));
        }
        let mut key = alloc::vec![0u8; size];
        OsRng.fill_bytes(&mut key);
        Ok(key)
    }

    /// Generate a random nonce of the given size (16 bytes by convention,
    /// see [`DEFAULT_NONCE_SIZE`]).
    #[cfg(feature = "getrandom")]
    pub fn generate_nonce(size: usize) -> Result<Vec<u8>, Error> {
        let mut nonce = alloc::vec![0u8; size];
        OsRng.fill_bytes(&mut nonce);
        Ok(nonce)
    }

    /// Construct a new AEAD instance for the named algorithm and key.
    pub fn new(algorithm: &str, key: &[u8]) -> Result<Self, Error> {
        match algorithm {
            "AES-SIV" | "AES-CMAC-SIV" => match key.len() {
                32 => Ok(Aead::Cmac128(Aes128Siv::new(key)?)),
                64 => Ok(Aead::Cmac256(Aes256Siv::new(key)?)),
                _ => Err(Error::Argument("AES-SIV key must be 32 or 64 bytes")),
            },
            "AES-PMAC-SIV" => match key.len() {
                32 => Ok(Aead::Pmac128(Aes128PmacSiv::new(key)?)),
                64 => Ok(Aead::Pmac256(Aes256PmacSiv::new(key)?)),
                _ => Err(Error::Argument("AES-PMAC-SIV key must be 32 or 64 bytes")),
            },
            _ => Err(Error::Argument("unsupported algorithm name")),
        }
    }

    /// Encrypt `plaintext`, authenticating it together with `nonce` and
    /// `associated_data`.
    pub fn seal(
        &mut self,
        plaintext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let ad_vector: [&[u8]; 2] = [associated_data, nonce];
        match self {
            Aead::Cmac128(siv) => siv.seal(plaintext, &ad_vector),
            Aead::Cmac256(siv) => siv.seal(plaintext, &ad_vector),
            Aead::Pmac128(siv) => siv.seal(plaintext, &ad_vector),
            Aead::Pmac256(siv) => siv.seal(plaintext, &ad_vector),
        }
    }

    /// Verify and decrypt `ciphertext`, authenticating it together with
    /// `nonce` and `associated_data`.
    pub fn open(
        &mut self,
        ciphertext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let ad_vector: [&[u8]; 2] = [associated_data, nonce];
        match self {
            Aead::Cmac128(siv) => siv.open(ciphertext, &ad_vector),
            Aead::Cmac256(siv) => siv.open(ciphertext, &ad_vector),
            Aead::Pmac128(siv) => siv.open(ciphertext, &ad_vector),
            Aead::Pmac256(siv) => siv.open(ciphertext, &ad_vector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn rejects_unknown_algorithm() {
        let key = [0u8; 32];
        assert_eq!(
            Aead::new("AES-256-GCM", &key).unwrap_err(),
            Error::Argument("unsupported algorithm name")
        );
    }

    #[test]
    fn rejects_wrong_key_size() {
        let key = [0u8; 20];
        assert!(matches!(Aead::new("AES-SIV", &key), Err(Error::Argument(_))));
    }

    #[test]
    fn is_observationally_equivalent_to_siv_with_ad_nonce_vector() {
        let key = hex!("fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
        let nonce = b"0123456789abcdef";
        let ad = b"additional data";
        let pt = b"plaintext";

        let mut aead = Aead::new("AES-SIV", &key).unwrap();
        let via_facade = aead.seal(pt, nonce, ad).unwrap();

        let mut siv = Aes128Siv::new(&key).unwrap();
        let via_siv = siv.seal(pt, &[ad, nonce]).unwrap();

        assert_eq!(via_facade, via_siv);
    }

    #[test]
    fn round_trip_and_tamper() {
        let key = [0x55u8; 32];
        let nonce = b"0123456789abcdef";
        let ad = b"header";
        let pt = b"a message to protect";

        let mut aead = Aead::new("AES-PMAC-SIV", &key).unwrap();
        let mut ciphertext = aead.seal(pt, nonce, ad).unwrap();
        assert_eq!(aead.open(&ciphertext, nonce, ad).unwrap(), pt);

        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x80;
        assert_eq!(aead.open(&ciphertext, nonce, ad), Err(Error::Integrity));
    }

    #[cfg(feature = "getrandom")]
    #[test]
    fn generated_key_and_nonce_round_trip() {
        let key = Aead::generate_key(32).unwrap();
        let nonce = Aead::generate_nonce(DEFAULT_NONCE_SIZE).unwrap();
        assert_eq!(key.len(), 32);
        assert_eq!(nonce.len(), DEFAULT_NONCE_SIZE);

        let mut aead = Aead::new("AES-SIV", &key).unwrap();
        let ciphertext = aead.seal(b"data", &nonce, b"").unwrap();
        assert_eq!(aead.open(&ciphertext, &nonce, b"").unwrap(), b"data");
    }
}
