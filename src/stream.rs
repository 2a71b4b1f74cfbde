//! STREAM (Hoang/Reyhanitabar/Rogaway/Vizár): online, segmented encryption
//! built on top of [`crate::aead::Aead`] by feeding it a per-segment nonce
//! derived from a fixed prefix, a monotonically increasing counter, and a
//! one-byte "is this the last segment" flag.
//!
//! Grounded on `original_source/python/miscreant/stream.py`'s `NonceEncoder`
//! and `StreamEncryptor`/`StreamDecryptor`.

use alloc::vec::Vec;

#[cfg(feature = "getrandom")]
use rand_core::{OsRng, RngCore};

use crate::aead::Aead;
use crate::error::Error;

/// Length, in bytes, of the caller-supplied nonce prefix.
pub const NONCE_PREFIX_SIZE: usize = 8;
/// Length, in bytes, of the per-segment nonce fed to the underlying AEAD:
/// an 8-byte prefix, a 4-byte big-endian counter, and a 1-byte last-block
/// flag.
const SEGMENT_NONCE_SIZE: usize = 13;
/// The counter is a `u32`; once it would advance past this value the stream
/// refuses to produce another segment (§4.6's "exhausted keystream" case).
const COUNTER_MAX: u64 = 1u64 << 32;

/// Produces the 13-byte per-segment nonces STREAM feeds to the underlying
/// AEAD, advancing a counter on every segment and refusing to run past
/// `COUNTER_MAX` segments.
struct NonceEncoder {
    prefix: [u8; NONCE_PREFIX_SIZE],
    counter: u64,
    finished: bool,
}

impl NonceEncoder {
    fn new(prefix: [u8; NONCE_PREFIX_SIZE]) -> Self {
        NonceEncoder {
            prefix,
            counter: 0,
            finished: false,
        }
    }

    /// Produce the next per-segment nonce and advance the counter. `last`
    /// marks this as the terminal segment, after which further calls fail
    /// with [`Error::State`].
    ///
    /// Matches `stream.py`'s `NonceEncoder.next` exactly, including its
    /// boundary behavior: the nonce is built from the counter's value
    /// *before* incrementing, but the overflow check happens *after*
    /// incrementing and discards that already-built nonce if it trips —
    /// so the segment at counter `2^32 - 1` is never actually returned,
    /// capping a stream at `2^32 - 1` usable segments rather than `2^32`.
    fn next(&mut self, last: bool) -> Result<[u8; SEGMENT_NONCE_SIZE], Error> {
        if self.finished {
            return Err(Error::State("stream already produced its last segment"));
        }

        self.finished = last;

        let mut nonce = [0u8; SEGMENT_NONCE_SIZE];
        nonce[..NONCE_PREFIX_SIZE].copy_from_slice(&self.prefix);
        nonce[NONCE_PREFIX_SIZE..NONCE_PREFIX_SIZE + 4]
            .copy_from_slice(&(self.counter as u32).to_be_bytes());
        nonce[NONCE_PREFIX_SIZE + 4] = last as u8;

        self.counter += 1;
        if self.counter >= COUNTER_MAX {
            return Err(Error::Overflow("stream segment counter exhausted"));
        }

        Ok(nonce)
    }
}

/// Encrypts a sequence of segments under a single nonce prefix, each one
/// authenticated together with its own associated data and its position in
/// the stream (via the encoded nonce).
///
/// Call [`Encryptor::seal`] once per segment, marking the final call with
/// `last = true`. Calling it again afterwards is an [`Error::State`].
pub struct Encryptor {
    aead: Aead,
    nonces: NonceEncoder,
}

impl Encryptor {
    /// Construct a new encryptor for the named algorithm and key, keyed
    /// additionally with an 8-byte nonce prefix unique to this stream.
    pub fn new(algorithm: &str, key: &[u8], nonce_prefix: [u8; NONCE_PREFIX_SIZE]) -> Result<Self, Error> {
        Ok(Encryptor {
            aead: Aead::new(algorithm, key)?,
            nonces: NonceEncoder::new(nonce_prefix),
        })
    }

    /// Generate a fresh random nonce prefix and construct an encryptor.
    #[cfg(feature = "getrandom")]
    pub fn new_with_random_prefix(algorithm: &str, key: &[u8]) -> Result<Self, Error> {
        let mut prefix = [0u8; NONCE_PREFIX_SIZE];
        OsRng.fill_bytes(&mut prefix);
        Self::new(algorithm, key, prefix)
    }

    /// Encrypt one segment of plaintext. `last` must be `true` for (and
    /// only for) the final segment of the stream.
    pub fn seal(
        &mut self,
        plaintext: &[u8],
        associated_data: &[u8],
        last: bool,
    ) -> Result<Vec<u8>, Error> {
        let nonce = self.nonces.next(last)?;
        self.aead.seal(plaintext, &nonce, associated_data)
    }
}

/// Decrypts a sequence of segments produced by [`Encryptor`], enforcing
/// that segments are consumed in order and that the stream's last-segment
/// flag is honored: a non-final `open` call on a ciphertext the encryptor
/// marked final (or vice versa) fails to authenticate, since the flag is
/// folded into the per-segment nonce bound into the tag.
pub struct Decryptor {
    aead: Aead,
    nonces: NonceEncoder,
}

impl Decryptor {
    /// Construct a new decryptor for the named algorithm and key, with the
    /// same 8-byte nonce prefix the encryptor used.
    pub fn new(algorithm: &str, key: &[u8], nonce_prefix: [u8; NONCE_PREFIX_SIZE]) -> Result<Self, Error> {
        Ok(Decryptor {
            aead: Aead::new(algorithm, key)?,
            nonces: NonceEncoder::new(nonce_prefix),
        })
    }

    /// Verify and decrypt one segment. `last` must match what the
    /// encryptor passed for this same segment, or authentication fails.
    pub fn open(
        &mut self,
        ciphertext: &[u8],
        associated_data: &[u8],
        last: bool,
    ) -> Result<Vec<u8>, Error> {
        let nonce = self.nonces.next(last)?;
        self.aead.open(ciphertext, &nonce, associated_data)
    }
}
