//! # Chip configuration objects
//!
//! Two parallel configuration planes gate chip behaviour and per-slot command
//! access: the **R-config** lives in rewritable memory and can be erased as a
//! whole, the **I-config** is irreversible, each bit can only ever be cleared.
//! The effective configuration is the AND of both planes.
//!
//! ## Available Methods
//!
//! - [`r_config_write`](crate::Tropic01::r_config_write) / [`r_config_read`](crate::Tropic01::r_config_read) / [`r_config_erase`](crate::Tropic01::r_config_erase) - Rewritable plane
//! - [`i_config_write`](crate::Tropic01::i_config_write) / [`i_config_read`](crate::Tropic01::i_config_read) - Irreversible plane
//! - [`read_whole_r_config`](crate::Tropic01::read_whole_r_config) / [`write_whole_r_config`](crate::Tropic01::write_whole_r_config) - Bulk R-config transfer
//! - [`read_whole_i_config`](crate::Tropic01::read_whole_i_config) / [`write_whole_i_config`](crate::Tropic01::write_whole_i_config) - Bulk I-config transfer

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

pub use super::cmd::cmd_config::*;
use super::l3::wire_size;
use super::{IntPin, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Write one R-config object
    pub async fn r_config_write(
        &mut self,
        addr: ConfigObjAddr,
        value: u32,
    ) -> Result<(), Tropic01Error> {
        self.require_session()?;
        self.l3.set_cmd(&r_config_write_cmd(addr, value));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Read one R-config object
    pub async fn r_config_read(&mut self, addr: ConfigObjAddr) -> Result<u32, Tropic01Error> {
        self.require_session()?;
        self.l3.set_cmd(&r_config_read_cmd(addr));
        self.l3_cmd(wire_size(CONFIG_READ_RES_SIZE)).await?;
        self.l3_result()?;
        self.config_read_value()
    }

    /// Erase the whole R-config back to all ones
    pub async fn r_config_erase(&mut self) -> Result<(), Tropic01Error> {
        self.require_session()?;
        self.l3.set_cmd(&r_config_erase_cmd());
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Clear one bit of an I-config object
    ///
    /// Irreversible: the bit can never be set again.
    pub async fn i_config_write(
        &mut self,
        addr: ConfigObjAddr,
        bit_index: u8,
    ) -> Result<(), Tropic01Error> {
        if bit_index > 31 {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&i_config_write_cmd(addr, bit_index));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Read one I-config object
    pub async fn i_config_read(&mut self, addr: ConfigObjAddr) -> Result<u32, Tropic01Error> {
        self.require_session()?;
        self.l3.set_cmd(&i_config_read_cmd(addr));
        self.l3_cmd(wire_size(CONFIG_READ_RES_SIZE)).await?;
        self.l3_result()?;
        self.config_read_value()
    }

    fn config_read_value(&self) -> Result<u32, Tropic01Error> {
        let data = self.l3.data();
        if data.len() != CONFIG_READ_RES_SIZE - 1 {
            return Err(Tropic01Error::ResSize);
        }
        Ok(u32::from_le_bytes([data[3], data[4], data[5], data[6]]))
    }

    /// Read every R-config object into `config`
    pub async fn read_whole_r_config(&mut self, config: &mut Config) -> Result<(), Tropic01Error> {
        for (idx, addr) in CONFIG_OBJ_TABLE.iter().enumerate() {
            config.obj[idx] = self.r_config_read(*addr).await?;
        }
        Ok(())
    }

    /// Write every R-config object from `config`
    pub async fn write_whole_r_config(&mut self, config: &Config) -> Result<(), Tropic01Error> {
        for (idx, addr) in CONFIG_OBJ_TABLE.iter().enumerate() {
            self.r_config_write(*addr, config.obj[idx]).await?;
        }
        Ok(())
    }

    /// Read every I-config object into `config`
    pub async fn read_whole_i_config(&mut self, config: &mut Config) -> Result<(), Tropic01Error> {
        for (idx, addr) in CONFIG_OBJ_TABLE.iter().enumerate() {
            config.obj[idx] = self.i_config_read(*addr).await?;
        }
        Ok(())
    }

    /// Write the I-config as a whole, clearing every bit that is zero in
    /// `config`
    pub async fn write_whole_i_config(&mut self, config: &Config) -> Result<(), Tropic01Error> {
        for (idx, addr) in CONFIG_OBJ_TABLE.iter().enumerate() {
            let obj = config.obj[idx];
            for bit in 0..32u8 {
                if obj & (1 << bit) == 0 {
                    self.i_config_write(*addr, bit).await?;
                }
            }
        }
        Ok(())
    }
}
