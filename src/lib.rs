//! [AES-SIV][1] ([RFC 5297][2]): a deterministic, nonce-misuse-resistant
//! [Authenticated Encryption with Associated Data (AEAD)][3] construction,
//! together with AES-PMAC-SIV (the same construction with PMAC in place of
//! CMAC) and [STREAM][4], a segmented online-encryption scheme built on top
//! of either.
//!
//! [1]: https://en.wikipedia.org/wiki/AES-SIV
//! [2]: https://tools.ietf.org/html/rfc5297
//! [3]: https://en.wikipedia.org/wiki/Authenticated_encryption
//! [4]: https://eprint.iacr.org/2015/189.pdf
//!
//! # Layers
//!
//! - [`block`]: GF(2^128) block algebra (`dbl`, XOR, constant-time select).
//! - [`mac`]: the [`mac::Mac`] trait, plus [`mac::cmac::CmacMac`] (a thin
//!   wrapper over the `cmac` crate) and [`mac::pmac::PmacMac`] (PMAC built
//!   from scratch on top of an AES-ECB primitive).
//! - [`s2v`]: S2V, RFC 5297's "string-to-vector" pseudo-random function.
//! - [`siv`]: [`siv::Siv`], combining S2V with AES-CTR into the full
//!   seal/open construction, generic over the MAC flavor.
//! - [`aead`]: [`aead::Aead`], a façade selecting among the four concrete
//!   SIV instantiations by algorithm name and folding a nonce into SIV's
//!   associated-data vector.
//! - [`stream`]: [`stream::Encryptor`]/[`stream::Decryptor`], the STREAM
//!   construction layered on top of [`aead::Aead`].
//!
//! This crate never logs: every layer here handles secret key material or
//! data derived from it, and a crypto primitive that logs risks leaking
//! through a side channel what it exists to protect.

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod aead;
pub mod block;
pub mod error;
pub mod mac;
pub mod s2v;
pub mod siv;
pub mod stream;

pub use crate::aead::Aead;
pub use crate::error::Error;
pub use crate::mac::{cmac::CmacMac, pmac::PmacMac, Mac};
pub use crate::siv::{Aes128PmacSiv, Aes128Siv, Aes256PmacSiv, Aes256Siv, Siv};
pub use crate::stream::{Decryptor, Encryptor};
