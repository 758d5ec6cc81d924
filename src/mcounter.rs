//! # Monotonic counters
//!
//! 16 hardware down-counters. A counter is initialised to a value and can
//! only ever be decremented; hitting zero makes further updates fail, which
//! gives firmware a tamper-resistant usage budget.
//!
//! ## Available Methods
//!
//! - [`mcounter_init`](crate::Tropic01::mcounter_init) - Initialise a counter
//! - [`mcounter_update`](crate::Tropic01::mcounter_update) - Decrement a counter by one
//! - [`mcounter_get`](crate::Tropic01::mcounter_get) - Read a counter

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

pub use super::cmd::cmd_mcounter::*;
use super::l3::wire_size;
use super::{IntPin, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Initialise a monotonic counter to `value`
    pub async fn mcounter_init(
        &mut self,
        mcounter_index: u16,
        value: u32,
    ) -> Result<(), Tropic01Error> {
        if mcounter_index > MCOUNTER_INDEX_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&mcounter_init_cmd(mcounter_index, value));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Decrement a monotonic counter by one
    ///
    /// Fails on the chip once the counter reached zero.
    pub async fn mcounter_update(&mut self, mcounter_index: u16) -> Result<(), Tropic01Error> {
        if mcounter_index > MCOUNTER_INDEX_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&mcounter_update_cmd(mcounter_index));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Read the current value of a monotonic counter
    pub async fn mcounter_get(&mut self, mcounter_index: u16) -> Result<u32, Tropic01Error> {
        if mcounter_index > MCOUNTER_INDEX_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&mcounter_get_cmd(mcounter_index));
        self.l3_cmd(wire_size(1 + 3 + 4)).await?;
        self.l3_result()?;

        let data = self.l3.data();
        if data.len() != 7 {
            return Err(Tropic01Error::ResSize);
        }
        Ok(u32::from_le_bytes([data[3], data[4], data[5], data[6]]))
    }
}
