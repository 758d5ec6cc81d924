//! # Pairing-key slot management
//!
//! The four pairing slots hold host X25519 public keys authorised to open
//! secure sessions. Slot writes are one-shot: a written slot must be
//! invalidated before it can be retired, and an invalidated slot is gone for
//! good. All three commands run over the secure channel.
//!
//! ## Available Methods
//!
//! - [`pairing_key_write`](crate::Tropic01::pairing_key_write) - Register a host public key in a slot
//! - [`pairing_key_read`](crate::Tropic01::pairing_key_read) - Read back the key of a slot
//! - [`pairing_key_invalidate`](crate::Tropic01::pairing_key_invalidate) - Retire a slot permanently

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

pub use super::cmd::cmd_pairing::*;
use super::l3::wire_size;
use super::session::PairingKeySlot;
use super::{IntPin, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Register a host X25519 public key in a pairing slot
    pub async fn pairing_key_write(
        &mut self,
        slot: PairingKeySlot,
        pairing_pub: &[u8; 32],
    ) -> Result<(), Tropic01Error> {
        self.require_session()?;
        self.l3.set_cmd(&pairing_key_write_cmd(slot, pairing_pub));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Read back the public key registered in a pairing slot
    pub async fn pairing_key_read(
        &mut self,
        slot: PairingKeySlot,
    ) -> Result<[u8; 32], Tropic01Error> {
        self.require_session()?;
        self.l3.set_cmd(&pairing_key_read_cmd(slot));
        self.l3_cmd(wire_size(PAIRING_KEY_READ_RES_SIZE)).await?;
        self.l3_result()?;

        let data = self.l3.data();
        if data.len() != PAIRING_KEY_READ_RES_SIZE - 1 {
            return Err(Tropic01Error::ResSize);
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&data[3..35]);
        Ok(key)
    }

    /// Retire a pairing slot permanently
    ///
    /// An invalidated slot can never be written again and no longer opens
    /// sessions.
    pub async fn pairing_key_invalidate(
        &mut self,
        slot: PairingKeySlot,
    ) -> Result<(), Tropic01Error> {
        self.require_session()?;
        self.l3.set_cmd(&pairing_key_invalidate_cmd(slot));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }
}
