//! SIV seal/open (§4.4): S2V combined with AES-CTR, generic over which MAC
//! flavor authenticates it.
//!
//! Grounded on `original_source/python/miscreant/aes/siv.py`.

use alloc::vec::Vec;

use cipher::generic_array::typenum::Unsigned;
use cipher::generic_array::GenericArray;
use cipher::{BlockCipher, BlockEncrypt, BlockSizeUser, KeyInit, KeyIvInit, KeySizeUser, StreamCipher};
use ctr::Ctr128BE;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::block::Block;
use crate::error::Error;
use crate::mac::cmac::CmacMac;
use crate::mac::pmac::PmacMac;
use crate::mac::Mac;
use crate::s2v::s2v;

type U16 = cipher::generic_array::typenum::U16;

/// The AES-SIV misuse-resistant AEAD, parameterized by a block cipher `C`
/// (used both to key the MAC and, via AES-CTR, to key the stream cipher)
/// and a MAC flavor `M` (one of [`CmacMac`] or [`PmacMac`]).
///
/// Construction splits the supplied key exactly in half: the first half
/// keys the MAC, the second half keys AES-CTR (§3's "Key" data model).
/// `enc_key` is kept in a `Zeroizing` buffer so it is wiped on drop, per
/// §5's "releasing an instance must zero secret material".
pub struct Siv<C, M>
where
    C: KeyInit + Clone,
{
    mac: M,
    enc_key: Zeroizing<Vec<u8>>,
    block_cipher: core::marker::PhantomData<C>,
}

/// AES-128-CMAC-SIV (32-byte key).
pub type Aes128Siv = Siv<aes::Aes128, CmacMac<aes::Aes128>>;
/// AES-256-CMAC-SIV (64-byte key).
pub type Aes256Siv = Siv<aes::Aes256, CmacMac<aes::Aes256>>;
/// AES-128-PMAC-SIV (32-byte key).
pub type Aes128PmacSiv = Siv<aes::Aes128, PmacMac<aes::Aes128>>;
/// AES-256-PMAC-SIV (64-byte key).
pub type Aes256PmacSiv = Siv<aes::Aes256, PmacMac<aes::Aes256>>;

impl<C, M> Siv<C, M>
where
    C: BlockCipher + BlockEncrypt + BlockSizeUser<BlockSize = U16> + KeyInit + Clone,
    Ctr128BE<C>: KeyIvInit<IvSize = U16> + StreamCipher,
    M: Mac,
{
    /// Construct a new SIV instance. `key` must be exactly 32 or 64 bytes;
    /// any other length is an [`Error::Argument`].
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        if key.len() != 32 && key.len() != 64 {
            return Err(Error::Argument("SIV key must be 32 or 64 bytes"));
        }

        let half = key.len() / 2;
        let (mac_key, enc_key) = key.split_at(half);

        if enc_key.len() != C::KeySize::to_usize() {
            return Err(Error::Argument(
                "key half length does not match the chosen block cipher's key size",
            ));
        }

        Ok(Siv {
            mac: M::new_from_slice(mac_key)?,
            enc_key: Zeroizing::new(enc_key.to_vec()),
            block_cipher: core::marker::PhantomData,
        })
    }

    /// Encrypt `plaintext`, authenticating it together with `associated_data`.
    /// Returns `V || C` (§6's wire format): the 16-byte synthetic IV
    /// followed by the CTR-mode ciphertext.
    pub fn seal(&mut self, plaintext: &[u8], associated_data: &[&[u8]]) -> Result<Vec<u8>, Error> {
        let v = s2v(&mut self.mac, associated_data, plaintext)?;
        let ciphertext = self.transform(&v, plaintext);

        let mut out = Vec::with_capacity(16 + ciphertext.len());
        out.extend_from_slice(v.as_bytes());
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Verify and decrypt `ciphertext` (in `V || C` form), authenticating it
    /// together with `associated_data`. Fails with [`Error::Integrity`] if
    /// the recomputed tag does not match `V`.
    pub fn open(&mut self, ciphertext: &[u8], associated_data: &[&[u8]]) -> Result<Vec<u8>, Error> {
        if ciphertext.len() < 16 {
            return Err(Error::Argument("ciphertext shorter than the SIV tag"));
        }

        let (v_bytes, c) = ciphertext.split_at(16);
        let v = Block::from(*GenericArray::from_slice(v_bytes));

        let plaintext = self.transform(&v, c);
        let t = s2v(&mut self.mac, associated_data, &plaintext)?;

        // Constant-time comparison: §5 requires this not reveal the
        // position of the first mismatched byte.
        if t.as_bytes().ct_eq(v.as_bytes()).unwrap_u8() != 1 {
            return Err(Error::Integrity);
        }

        Ok(plaintext)
    }

    /// Raw, unauthenticated AES-CTR transform shared by `seal` and `open`.
    /// `v` must *not* have had its counter bits zeroed by the caller — that
    /// happens here, once, right before keying CTR (§4.4's "must not be
    /// applied when recomputing the tag for comparison").
    fn transform(&self, v: &Block, data: &[u8]) -> Vec<u8> {
        if data.is_empty() {
            return Vec::new();
        }

        let mut iv = GenericArray::<u8, U16>::clone_from_slice(v.as_bytes());
        iv[8] &= 0x7f;
        iv[12] &= 0x7f;

        let key = GenericArray::<u8, C::KeySize>::from_slice(&self.enc_key);
        let mut cipher = Ctr128BE::<C>::new(key, &iv);
        let mut buffer = data.to_vec();
        cipher.apply_keystream(&mut buffer);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn empty_ad_empty_plaintext_round_trips_to_a_bare_tag() {
        let key = hex!("fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
        let mut siv = Aes128Siv::new(&key).unwrap();
        let ciphertext = siv.seal(b"", &[]).unwrap();
        // No plaintext means S2V degenerates to a single 16-byte synthetic
        // IV with no trailing CTR-mode bytes.
        assert_eq!(ciphertext.len(), 16);
        assert_eq!(siv.open(&ciphertext, &[]).unwrap(), b"");
    }

    #[test]
    fn single_ad_matches_rfc5297_section_a1() {
        let key = hex!("fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff");
        let ad = hex!("101112131415161718191a1b1c1d1e1f2021222324252627");
        let pt = hex!("112233445566778899aabbccddee");

        let mut siv = Aes128Siv::new(&key).unwrap();
        let ciphertext = siv.seal(&pt, &[&ad]).unwrap();

        let expected = {
            let mut v = hex!("85632d07c6e8f37f950acd320a2ecc93").to_vec();
            v.extend_from_slice(&hex!("40c02b9690c4dc04daef7f6afe5c"));
            v
        };
        assert_eq!(ciphertext, expected);
    }

    #[test]
    fn round_trip() {
        let key = [0x11u8; 32];
        let mut siv = Aes128Siv::new(&key).unwrap();
        let ad: &[u8] = b"associated";
        let pt: &[u8] = b"the quick brown fox jumps over the lazy dog";

        let ciphertext = siv.seal(pt, &[ad]).unwrap();
        let plaintext = siv.open(&ciphertext, &[ad]).unwrap();
        assert_eq!(plaintext, pt);
    }

    #[test]
    fn tamper_detection() {
        let key = [0x22u8; 32];
        let mut siv = Aes128Siv::new(&key).unwrap();
        let ad: &[u8] = b"associated";
        let pt: &[u8] = b"secret message";

        let mut ciphertext = siv.seal(pt, &[ad]).unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;

        assert_eq!(siv.open(&ciphertext, &[ad]), Err(Error::Integrity));
    }

    #[test]
    fn pmac_round_trip() {
        let key = [0x33u8; 32];
        let mut siv = Aes128PmacSiv::new(&key).unwrap();
        let ad: &[u8] = b"pmac-associated";
        let pt: &[u8] = b"parallelizable message authentication";

        let ciphertext = siv.seal(pt, &[ad]).unwrap();
        let plaintext = siv.open(&ciphertext, &[ad]).unwrap();
        assert_eq!(plaintext, pt);
    }
}
