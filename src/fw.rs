//! # Mutable firmware update
//!
//! Firmware updates run in maintenance mode (see
//! [`reboot`](crate::Tropic01::reboot) with
//! [`StartupId::MaintenanceReboot`](crate::system::StartupId)). The flow
//! depends on the silicon revision selected at handle construction:
//!
//! - **ABAB**: the host erases a bank, then streams the raw image in 128-byte
//!   chunks addressed by offset.
//! - **ACAB**: the chip manages its banks itself; the host sends the signed
//!   update request followed by the self-describing data records of the
//!   update file.
//!
//! Calling a flow of the other revision reports
//! [`Tropic01Error::InvalidParam`] without touching the bus.
//!
//! ## Available Methods
//!
//! - [`mutable_fw_erase`](crate::Tropic01::mutable_fw_erase) - Erase a firmware bank (ABAB)
//! - [`mutable_fw_update`](crate::Tropic01::mutable_fw_update) - Stream an image into an erased bank (ABAB)
//! - [`mutable_fw_update_request`](crate::Tropic01::mutable_fw_update_request) - Send the signed update request (ACAB)
//! - [`mutable_fw_update_data`](crate::Tropic01::mutable_fw_update_data) - Push the update data records (ACAB)
//! - [`do_mutable_fw_update`](crate::Tropic01::do_mutable_fw_update) - One-call update for the handle's revision

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

pub use super::cmd::cmd_fw::*;
use super::{IntPin, SiliconRev, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    async fn fw_exchange(&mut self) -> Result<(), Tropic01Error> {
        self.l2_send().await?;
        self.l2_receive().await?;
        if self.l2.rsp_len() != 0 {
            return Err(Tropic01Error::RespLen);
        }
        Ok(())
    }

    /// Erase a firmware bank (ABAB silicon only)
    pub async fn mutable_fw_erase(&mut self, bank_id: FwBank) -> Result<(), Tropic01Error> {
        if self.rev != SiliconRev::Abab {
            return Err(Tropic01Error::InvalidParam);
        }
        self.l2
            .set_request(MUTABLE_FW_ERASE_REQ_ID, &fw_erase_req(bank_id));
        self.fw_exchange().await
    }

    /// Stream a firmware image into an erased bank (ABAB silicon only)
    pub async fn mutable_fw_update(
        &mut self,
        fw_data: &[u8],
        bank_id: FwBank,
    ) -> Result<(), Tropic01Error> {
        if self.rev != SiliconRev::Abab {
            return Err(Tropic01Error::InvalidParam);
        }
        if fw_data.is_empty() || fw_data.len() > MUTABLE_FW_UPDATE_SIZE_MAX {
            return Err(Tropic01Error::InvalidParam);
        }

        let mut offset = 0;
        while offset < fw_data.len() {
            let n = (fw_data.len() - offset).min(FW_UPDATE_CHUNK_LEN);
            let (payload, len) =
                fw_update_chunk(bank_id, offset as u16, &fw_data[offset..offset + n]);
            self.l2.set_request(MUTABLE_FW_UPDATE_REQ_ID, &payload[..len]);
            self.fw_exchange().await?;
            offset += n;
        }
        Ok(())
    }

    /// Send the signed update request of an update file (ACAB silicon only)
    ///
    /// `update_request` is the head of the update file: a length byte
    /// followed by signature, first-chunk hash, firmware type and version.
    pub async fn mutable_fw_update_request(
        &mut self,
        update_request: &[u8],
    ) -> Result<(), Tropic01Error> {
        if self.rev != SiliconRev::Acab {
            return Err(Tropic01Error::InvalidParam);
        }
        if update_request.len() < 1 + FW_UPDATE_REQ_LEN
            || update_request[0] as usize != FW_UPDATE_REQ_LEN
        {
            return Err(Tropic01Error::InvalidParam);
        }
        self.l2.set_request(
            MUTABLE_FW_UPDATE_REQ_ID,
            &update_request[1..1 + FW_UPDATE_REQ_LEN],
        );
        self.fw_exchange().await
    }

    /// Push the data records of an update file (ACAB silicon only)
    ///
    /// Records follow the update request in the file, each a length byte and
    /// that many payload bytes; every record travels as one request.
    pub async fn mutable_fw_update_data(
        &mut self,
        update_data: &[u8],
    ) -> Result<(), Tropic01Error> {
        if self.rev != SiliconRev::Acab {
            return Err(Tropic01Error::InvalidParam);
        }
        if update_data.len() <= 1 + FW_UPDATE_REQ_LEN
            || update_data.len() > MUTABLE_FW_UPDATE_SIZE_MAX
        {
            return Err(Tropic01Error::InvalidParam);
        }

        let mut index = 1 + FW_UPDATE_REQ_LEN;
        while index < update_data.len() {
            let rec_len = update_data[index] as usize;
            if index + 1 + rec_len > update_data.len() {
                return Err(Tropic01Error::InvalidParam);
            }
            self.l2.set_request(
                MUTABLE_FW_UPDATE_DATA_REQ_ID,
                &update_data[index + 1..index + 1 + rec_len],
            );
            self.fw_exchange().await?;
            index += 1 + rec_len;
        }
        Ok(())
    }

    /// Run a complete firmware update for the handle's silicon revision
    ///
    /// `bank_id` selects the target bank on ABAB and is ignored on ACAB,
    /// where the chip assigns banks on its own.
    pub async fn do_mutable_fw_update(
        &mut self,
        update_data: &[u8],
        bank_id: FwBank,
    ) -> Result<(), Tropic01Error> {
        match self.rev {
            SiliconRev::Abab => {
                self.mutable_fw_erase(bank_id).await?;
                self.mutable_fw_update(update_data, bank_id).await
            }
            SiliconRev::Acab => {
                self.mutable_fw_update_request(update_data).await?;
                self.mutable_fw_update_data(update_data).await
            }
        }
    }
}
