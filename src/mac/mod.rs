//! The capability contract shared by both MAC flavors S2V drives: CMAC
//! (via the `cmac` crate) and PMAC (hand-rolled in [`pmac`]).

pub mod cmac;
pub mod pmac;

use crate::block::Block;
use crate::error::Error;

/// `{reset, update, finalize}` — the minimal capability S2V needs from a
/// MAC. A tagged choice stored inside [`crate::siv::Siv`] (via the two
/// implementations below) is preferred here over a trait-object/inheritance
/// hierarchy, per §9's "Polymorphism over MAC" design note.
///
/// After [`Mac::finalize`] the instance is considered consumed: further
/// `update` or `finalize` calls must fail with [`Error::State`] until
/// [`Mac::reset`] is called.
pub trait Mac {
    /// Construct a new MAC instance from a raw key.
    fn new_from_slice(key: &[u8]) -> Result<Self, Error>
    where
        Self: Sized;

    /// Return this instance to its initial (just-constructed) state.
    fn reset(&mut self);

    /// Absorb more input. Accepts any length, including zero.
    fn update(&mut self, data: &[u8]) -> Result<(), Error>;

    /// Finalize and return the 16-byte tag, latching the instance.
    fn finalize(&mut self) -> Result<Block, Error>;
}
