//! Error types surfaced by this crate.

use core::fmt;

/// The error kinds this crate can return.
///
/// Every variant carries a short, human-readable reason intended for logs
/// or debug output. None of them carry secret-derived data: in particular
/// [`Error::Integrity`] never reveals which byte of a ciphertext or
/// associated-data vector first failed to match (see §7 of the design: tag
/// comparison is the only integrity signal, and it is all-or-nothing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A length, type, or algorithm-name argument was invalid.
    Argument(&'static str),
    /// Ciphertext (or STREAM segment) failed to authenticate.
    Integrity,
    /// The instance was used in a state that forbids the operation, e.g. a
    /// MAC was updated after `finalize` without an intervening `reset`, or a
    /// STREAM instance was used after its last segment.
    State(&'static str),
    /// A counter would have overflowed its fixed-width representation.
    Overflow(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Argument(reason) => write!(f, "invalid argument: {}", reason),
            Error::Integrity => write!(f, "ciphertext failed to verify as authentic"),
            Error::State(reason) => write!(f, "invalid state: {}", reason),
            Error::Overflow(reason) => write!(f, "overflow: {}", reason),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
