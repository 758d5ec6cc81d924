//! # ECC key slots and signing
//!
//! 32 key slots, each holding a P-256 or Ed25519 key that is either generated
//! on the chip or stored by the host. Signing never exposes the private key;
//! ECDSA takes the SHA-256 digest of the message (computed host-side), EdDSA
//! signs the raw message.
//!
//! ## Available Methods
//!
//! - [`ecc_key_generate`](crate::Tropic01::ecc_key_generate) - Generate a key pair in a slot
//! - [`ecc_key_store`](crate::Tropic01::ecc_key_store) - Store a host private key in a slot
//! - [`ecc_key_read`](crate::Tropic01::ecc_key_read) - Read the public key of a slot
//! - [`ecc_key_erase`](crate::Tropic01::ecc_key_erase) - Erase a slot
//! - [`ecc_ecdsa_sign`](crate::Tropic01::ecc_ecdsa_sign) - ECDSA over SHA-256 of a message
//! - [`ecc_eddsa_sign`](crate::Tropic01::ecc_eddsa_sign) - EdDSA over a raw message

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;
use sha2::{Digest, Sha256};

pub use super::cmd::cmd_ecc::*;
use super::l3::wire_size;
use super::{IntPin, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Generate a fresh key pair in an ECC slot
    ///
    /// The slot must be empty; the private key never leaves the chip.
    pub async fn ecc_key_generate(
        &mut self,
        slot: u8,
        curve: EccCurve,
    ) -> Result<(), Tropic01Error> {
        if slot > ECC_SLOT_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&ecc_key_generate_cmd(slot, curve));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Store a host-supplied private key into an empty ECC slot
    pub async fn ecc_key_store(
        &mut self,
        slot: u8,
        curve: EccCurve,
        key: &[u8; 32],
    ) -> Result<(), Tropic01Error> {
        if slot > ECC_SLOT_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&ecc_key_store_cmd(slot, curve, key));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// Read the public key of an ECC slot
    ///
    /// Writes the key into `key` and returns the curve, the key origin and
    /// the written length (32 bytes for Ed25519, 64 for P-256).
    pub async fn ecc_key_read(
        &mut self,
        slot: u8,
        key: &mut [u8],
    ) -> Result<(EccCurve, EccKeyOrigin, usize), Tropic01Error> {
        if slot > ECC_SLOT_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&ecc_key_read_cmd(slot));
        self.l3_cmd(wire_size(1 + 3 + 64)).await?;
        self.l3_result()?;

        let data = self.l3.data();
        if data.len() < 3 {
            return Err(Tropic01Error::ResSize);
        }
        let curve = match data[0] {
            0x01 => EccCurve::P256,
            0x02 => EccCurve::Ed25519,
            _ => return Err(Tropic01Error::ResultUnknown),
        };
        let origin = EccKeyOrigin::from(data[1]);
        let len = curve.pubkey_len();
        if data.len() != 3 + len {
            return Err(Tropic01Error::ResSize);
        }
        if key.len() < len {
            return Err(Tropic01Error::InvalidParam);
        }
        key[..len].copy_from_slice(&data[3..3 + len]);
        Ok((curve, origin, len))
    }

    /// Erase an ECC slot
    pub async fn ecc_key_erase(&mut self, slot: u8) -> Result<(), Tropic01Error> {
        if slot > ECC_SLOT_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&ecc_key_erase_cmd(slot));
        self.l3_cmd(wire_size(1)).await?;
        self.l3_result()?;
        if !self.l3.data().is_empty() {
            return Err(Tropic01Error::ResSize);
        }
        Ok(())
    }

    /// ECDSA-sign a message with the P-256 key of a slot
    ///
    /// The message is hashed with SHA-256 on the host, the chip signs the
    /// digest.
    pub async fn ecc_ecdsa_sign(
        &mut self,
        slot: u8,
        msg: &[u8],
        signature: &mut [u8; 64],
    ) -> Result<(), Tropic01Error> {
        if slot > ECC_SLOT_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        let digest: [u8; 32] = Sha256::digest(msg).into();
        self.l3.set_cmd(&ecdsa_sign_cmd(slot, &digest));
        self.sign_exchange(signature).await
    }

    /// EdDSA-sign a raw message with the Ed25519 key of a slot
    pub async fn ecc_eddsa_sign(
        &mut self,
        slot: u8,
        msg: &[u8],
        signature: &mut [u8; 64],
    ) -> Result<(), Tropic01Error> {
        if slot > ECC_SLOT_MAX || msg.len() > EDDSA_SIGN_MSG_LEN_MAX {
            return Err(Tropic01Error::InvalidParam);
        }
        self.require_session()?;
        self.l3.set_cmd(&eddsa_sign_cmd(slot));
        self.l3.push(msg);
        self.sign_exchange(signature).await
    }

    async fn sign_exchange(&mut self, signature: &mut [u8; 64]) -> Result<(), Tropic01Error> {
        self.l3_cmd(wire_size(1 + 3 + 64)).await?;
        self.l3_result()?;
        let data = self.l3.data();
        if data.len() != 3 + 64 {
            return Err(Tropic01Error::ResSize);
        }
        signature.copy_from_slice(&data[3..]);
        Ok(())
    }
}
