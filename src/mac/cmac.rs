//! Thin adapter around the external [`cmac`] crate, giving it the
//! [`Mac`](super::Mac) shape S2V expects, plus the "finalize latches the
//! instance" state guard §4.2/§6 require (the `cmac` crate's own
//! `finalize_reset` already clears its internal accumulator, but callers of
//! *this* crate still need explicit `reset()` before reuse).

use cipher::generic_array::typenum::U16;
use cmac::Cmac;
use digest::{KeyInit, Mac as DigestMac, OutputSizeUser};

use crate::block::Block;
use crate::error::Error;
use crate::mac::Mac;

/// CMAC (NIST SP 800-38B) over a block cipher `C`, adapted to this crate's
/// [`Mac`] contract.
pub struct CmacMac<C>
where
    Cmac<C>: DigestMac + KeyInit + OutputSizeUser<OutputSize = U16>,
{
    inner: Cmac<C>,
    finished: bool,
}

impl<C> Mac for CmacMac<C>
where
    Cmac<C>: DigestMac + KeyInit + OutputSizeUser<OutputSize = U16>,
{
    fn new_from_slice(key: &[u8]) -> Result<Self, Error> {
        let inner =
            Cmac::<C>::new_from_slice(key).map_err(|_| Error::Argument("invalid CMAC key length"))?;
        Ok(CmacMac {
            inner,
            finished: false,
        })
    }

    fn reset(&mut self) {
        DigestMac::reset(&mut self.inner);
        self.finished = false;
    }

    fn update(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.finished {
            return Err(Error::State("CMAC updated after finalize without reset"));
        }
        DigestMac::update(&mut self.inner, data);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Block, Error> {
        if self.finished {
            return Err(Error::State("CMAC finalized twice without reset"));
        }
        let tag = self.inner.finalize_reset().into_bytes();
        self.finished = true;
        Ok(Block::from(tag))
    }
}
