//! # Chip information readout
//!
//! The get-info request serves read-only objects in 128-byte blocks: the
//! X.509 certificate store, the chip-ID provisioning record, the firmware
//! versions and the firmware bank headers. None of them require a session.
//!
//! ## Available Methods
//!
//! - [`get_info_cert_store`](crate::Tropic01::get_info_cert_store) - Read the certificate store into caller buffers
//! - [`get_info_chip_id`](crate::Tropic01::get_info_chip_id) - Read the 128-byte chip-ID record
//! - [`get_info_riscv_fw_ver`](crate::Tropic01::get_info_riscv_fw_ver) - Read the application firmware version
//! - [`get_info_spect_fw_ver`](crate::Tropic01::get_info_spect_fw_ver) - Read the SPECT coprocessor firmware version
//! - [`get_info_fw_bank`](crate::Tropic01::get_info_fw_bank) - Read the header of a firmware bank

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

pub use super::cmd::cmd_info::*;
use super::cmd::cmd_fw::FwBank;
use super::{IntPin, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Read the certificate store into the caller-owned buffers
    ///
    /// The first block carries the store header: version, certificate count
    /// and one big-endian length per certificate. Certificates follow back to
    /// back; the loop stops as soon as the last one is complete, so only the
    /// needed part of the store is transferred.
    pub async fn get_info_cert_store(
        &mut self,
        store: &mut CertStore<'_>,
    ) -> Result<(), Tropic01Error> {
        let mut kind = 0;
        let mut written = 0;

        for block in 0..(CERT_STORE_SIZE_TOTAL / GET_INFO_BLOCK_LEN) {
            self.l2.set_request(
                GET_INFO_REQ_ID,
                &get_info_req(InfoObjectId::X509Cert, block as u8),
            );
            self.l2_send().await?;
            self.l2_receive().await?;
            if self.l2.rsp_len() != GET_INFO_BLOCK_LEN {
                return Err(Tropic01Error::RespLen);
            }

            let mut head = 0;
            if block == 0 {
                let body = self.l2.body();
                if body[0] != CERT_STORE_VERSION || body[1] as usize != NUM_CERTIFICATES {
                    return Err(Tropic01Error::CertStore);
                }
                head = 2;
                for idx in 0..NUM_CERTIFICATES {
                    let len = u16::from_be_bytes([body[head], body[head + 1]]) as usize;
                    head += 2;
                    if len > store.capacity(idx) {
                        return Err(Tropic01Error::InvalidParam);
                    }
                    store.set_len(idx, len);
                }
            }

            // Copy across certificate boundaries until the block is drained
            while head < GET_INFO_BLOCK_LEN && kind < NUM_CERTIFICATES {
                let n = (store.len(kind) - written).min(GET_INFO_BLOCK_LEN - head);
                store
                    .chunk_mut(kind, written, n)
                    .copy_from_slice(&self.l2.body()[head..head + n]);
                written += n;
                head += n;
                if written == store.len(kind) {
                    kind += 1;
                    written = 0;
                }
            }
            if kind == NUM_CERTIFICATES {
                return Ok(());
            }
        }

        Err(Tropic01Error::CertStore)
    }

    /// Read the chip-ID provisioning record
    pub async fn get_info_chip_id(&mut self) -> Result<ChipIdRsp, Tropic01Error> {
        self.l2
            .set_request(GET_INFO_REQ_ID, &get_info_req(InfoObjectId::ChipId, 0));
        self.l2_send().await?;
        self.l2_receive().await?;
        if self.l2.rsp_len() != CHIP_ID_SIZE {
            return Err(Tropic01Error::RespLen);
        }
        let mut rsp = ChipIdRsp::new();
        rsp.as_mut().copy_from_slice(self.l2.body());
        Ok(rsp)
    }

    /// Read the RISC-V application firmware version
    pub async fn get_info_riscv_fw_ver(
        &mut self,
    ) -> Result<[u8; RISCV_FW_VERSION_SIZE], Tropic01Error> {
        self.l2.set_request(
            GET_INFO_REQ_ID,
            &get_info_req(InfoObjectId::RiscvFwVersion, 0),
        );
        self.l2_send().await?;
        self.l2_receive().await?;
        if self.l2.rsp_len() != RISCV_FW_VERSION_SIZE {
            return Err(Tropic01Error::RespLen);
        }
        let mut ver = [0u8; RISCV_FW_VERSION_SIZE];
        ver.copy_from_slice(self.l2.body());
        Ok(ver)
    }

    /// Read the SPECT coprocessor firmware version
    pub async fn get_info_spect_fw_ver(
        &mut self,
    ) -> Result<[u8; SPECT_FW_VERSION_SIZE], Tropic01Error> {
        self.l2.set_request(
            GET_INFO_REQ_ID,
            &get_info_req(InfoObjectId::SpectFwVersion, 0),
        );
        self.l2_send().await?;
        self.l2_receive().await?;
        if self.l2.rsp_len() != SPECT_FW_VERSION_SIZE {
            return Err(Tropic01Error::RespLen);
        }
        let mut ver = [0u8; SPECT_FW_VERSION_SIZE];
        ver.copy_from_slice(self.l2.body());
        Ok(ver)
    }

    /// Read the firmware header of a bank
    ///
    /// The header size depends on the bootloader generation; an empty bank
    /// returns no header. Returns the number of bytes written into `header`.
    pub async fn get_info_fw_bank(
        &mut self,
        bank_id: FwBank,
        header: &mut [u8],
    ) -> Result<usize, Tropic01Error> {
        self.l2.set_request(
            GET_INFO_REQ_ID,
            &get_info_req(InfoObjectId::FwBank, bank_id as u8),
        );
        self.l2_send().await?;
        self.l2_receive().await?;

        let len = self.l2.rsp_len();
        if len != 0 && len != FW_HEADER_SIZE_BOOT_V1 && len != FW_HEADER_SIZE_BOOT_V2 {
            return Err(Tropic01Error::RespLen);
        }
        if header.len() < len {
            return Err(Tropic01Error::InvalidParam);
        }
        header[..len].copy_from_slice(self.l2.body());
        Ok(len)
    }
}
