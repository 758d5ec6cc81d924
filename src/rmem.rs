//! # User-data slots
//!
//! 512 general-purpose slots of up to 444 bytes in the rewritable memory.
//! A slot must be erased before it can be written again.
//!
//! ## Available Methods
//!
//! - [`r_mem_data_write`](crate::Tropic01::r_mem_data_write) - Write a slot
//! - [`r_mem_data_read`](crate::Tropic01::r_mem_data_read) - Read a slot
//! - [`r_mem_data_erase`](crate::Tropic01::r_mem_data_erase) - Erase a slot

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

pub use super::cmd::cmd_rmem::*;
use super::l3::wire_size;
use super::{IntPin, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Write user data into a slot
    ///
    /// The slot must be empty; writing an occupied slot fails on the chip.
    pub async fn r_mem_data_write(
        &mut self,
        udata_slot: u16,
        data: &[u8],
    ) -> Result<(), Tropic01Error> {
        if udata_slot > R_MEM_DATA_SLOT_MAX || data.is_empty() || data.len() > R_MEM_DATA_SIZE_MAX
        {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&r_mem_data_write_cmd(udata_slot));
        self.l3.push(data);
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Read a user-data slot into `data`, returns the stored length
    pub async fn r_mem_data_read(
        &mut self,
        udata_slot: u16,
        data: &mut [u8],
    ) -> Result<usize, Tropic01Error> {
        if udata_slot > R_MEM_DATA_SLOT_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&r_mem_data_read_cmd(udata_slot));
        self.l3_cmd(wire_size(1 + 3 + R_MEM_DATA_SIZE_MAX)).await?;
        self.l3_result()?;

        let body = self.l3.data();
        if body.len() < 3 {
            return Err(Tropic01Error::ResSize);
        }
        let len = body.len() - 3;
        if data.len() < len {
            return Err(Tropic01Error::InvalidParam);
        }
        data[..len].copy_from_slice(&body[3..]);
        Ok(len)
    }

    /// Erase a user-data slot
    pub async fn r_mem_data_erase(&mut self, udata_slot: u16) -> Result<(), Tropic01Error> {
        if udata_slot > R_MEM_DATA_SLOT_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&r_mem_data_erase_cmd(udata_slot));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }
}
