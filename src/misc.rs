//! # Ping, random numbers and Mac-and-Destroy
//!
//! ## Available Methods
//!
//! - [`ping`](crate::Tropic01::ping) - Echo a message through the secure channel
//! - [`random_value_get`](crate::Tropic01::random_value_get) - Draw bytes from the chip TRNG
//! - [`mac_and_destroy`](crate::Tropic01::mac_and_destroy) - Run one Mac-and-Destroy step

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

pub use super::cmd::cmd_misc::*;
use super::l3::wire_size;
use super::{IntPin, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Echo `msg_out` through the secure channel into `msg_in`
    ///
    /// The round trip exercises the whole stack, session included; both
    /// buffers must have the same length.
    pub async fn ping(&mut self, msg_out: &[u8], msg_in: &mut [u8]) -> Result<(), Tropic01Error> {
        if msg_out.len() != msg_in.len() || msg_out.len() > PING_LEN_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&ping_cmd());
        self.l3.push(msg_out);
        self.l3_cmd(wire_size(1 + msg_out.len())).await?;
        self.l3_result()?;

        let data = self.l3.data();
        if data.len() != msg_in.len() {
            return Err(Tropic01Error::ResSize);
        }
        msg_in.copy_from_slice(data);
        Ok(())
    }

    /// Fill `out` with bytes from the chip TRNG
    pub async fn random_value_get(&mut self, out: &mut [u8]) -> Result<(), Tropic01Error> {
        if out.len() > RANDOM_VALUE_GET_LEN_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&random_value_get_cmd(out.len() as u8));
        self.l3_cmd(wire_size(1 + 3 + out.len())).await?;
        self.l3_result()?;

        let data = self.l3.data();
        if data.len() != 3 + out.len() {
            return Err(Tropic01Error::ResSize);
        }
        out.copy_from_slice(&data[3..]);
        Ok(())
    }

    /// Run one Mac-and-Destroy step in `slot`
    ///
    /// Sends 32 bytes, gets the slot MAC over them back; the chip destroys
    /// the slot secret in the same step. The PIN-verification scheme built on
    /// top of this primitive lives entirely on the host.
    pub async fn mac_and_destroy(
        &mut self,
        slot: u8,
        data_out: &[u8; MAC_AND_DESTROY_DATA_SIZE],
    ) -> Result<[u8; MAC_AND_DESTROY_DATA_SIZE], Tropic01Error> {
        if slot > MAC_AND_DESTROY_SLOT_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&mac_and_destroy_cmd(slot, data_out));
        self.l3_cmd(wire_size(1 + 3 + MAC_AND_DESTROY_DATA_SIZE)).await?;
        self.l3_result()?;

        let data = self.l3.data();
        if data.len() != 3 + MAC_AND_DESTROY_DATA_SIZE {
            return Err(Tropic01Error::ResSize);
        }
        let mut data_in = [0u8; MAC_AND_DESTROY_DATA_SIZE];
        data_in.copy_from_slice(&data[3..]);
        Ok(data_in)
    }
}
