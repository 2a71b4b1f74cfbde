//! S2V: the "string-to-vector" pseudo-random function of RFC 5297 §2.4,
//! generic over any [`Mac`] implementation.
//!
//! Grounded on `original_source/python/miscreant/aes/siv.py`'s `__s2v` and
//! `util.py`'s `dbl`/`xor`/`xorend`/`pad` helpers.

use crate::block::Block;
use crate::error::Error;
use crate::mac::Mac;

/// `S2V(mac, [A_1..A_n], P) -> 16-byte synthetic IV`.
///
/// The empty-AD/empty-plaintext edge case from RFC 5297 (where S2V with a
/// zero-length vector list degenerates to `CMAC(1)`) never arises here: the
/// plaintext is always passed as the final vector, even when it is itself
/// zero-length (§4.3).
pub fn s2v<M: Mac>(mac: &mut M, associated_data: &[&[u8]], plaintext: &[u8]) -> Result<Block, Error> {
    mac.reset();
    mac.update(&[0u8; 16])?;
    let mut d = mac.finalize()?;

    for ad in associated_data {
        mac.reset();
        mac.update(ad)?;
        let mac_of_ad = mac.finalize()?;

        d.dbl();
        d.xor_in_place(&mac_of_ad);
    }

    mac.reset();
    if plaintext.len() >= 16 {
        xorend_update(&mut *mac, plaintext, &d)?;
    } else {
        d.dbl();
        let padded = pad(plaintext);
        d.xor_slice_in_place(&padded);
        mac.update(d.as_bytes())?;
        return mac.finalize();
    }

    mac.finalize()
}

/// Feed `plaintext` into `mac`, but with its last 16 bytes XORed against
/// `tweak` — the "xorend" step for plaintexts at least one block long.
/// Streamed through the MAC a chunk at a time so no second copy of
/// `plaintext` is allocated.
fn xorend_update<M: Mac>(mac: &mut M, plaintext: &[u8], tweak: &Block) -> Result<(), Error> {
    let split = plaintext.len() - 16;
    mac.update(&plaintext[..split])?;

    let mut last = [0u8; 16];
    last.copy_from_slice(&plaintext[split..]);
    for (b, t) in last.iter_mut().zip(tweak.as_bytes().iter()) {
        *b ^= t;
    }
    mac.update(&last)
}

/// Pad `value` (shorter than 16 bytes) by appending `0x80` then zero-filling
/// to 16 bytes.
fn pad(value: &[u8]) -> [u8; 16] {
    debug_assert!(value.len() < 16);
    let mut out = [0u8; 16];
    out[..value.len()].copy_from_slice(value);
    out[value.len()] = 0x80;
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac::cmac::CmacMac;
    use aes::Aes128;
    use hex_literal::hex;

    #[test]
    fn pad_appends_marker_and_zero_fills() {
        assert_eq!(pad(b""), {
            let mut e = [0u8; 16];
            e[0] = 0x80;
            e
        });
        assert_eq!(pad(&[1, 2, 3]), {
            let mut e = [0u8; 16];
            e[0] = 1;
            e[1] = 2;
            e[2] = 3;
            e[3] = 0x80;
            e
        });
    }

    #[test]
    fn s2v_is_deterministic() {
        let key = hex!("fffefdfcfbfaf9f8f7f6f5f4f3f2f1f0");
        let mut mac1 = CmacMac::<Aes128>::new_from_slice(&key).unwrap();
        let mut mac2 = CmacMac::<Aes128>::new_from_slice(&key).unwrap();
        let ad: &[u8] = b"header";
        let pt: &[u8] = b"hello world, this is a message";

        let v1 = s2v(&mut mac1, &[ad], pt).unwrap();
        let v2 = s2v(&mut mac2, &[ad], pt).unwrap();
        assert_eq!(v1.as_bytes(), v2.as_bytes());
    }
}
