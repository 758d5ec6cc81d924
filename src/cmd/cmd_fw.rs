// Firmware-update requests API

/// Update request id, shared by both silicon revisions
pub const MUTABLE_FW_UPDATE_REQ_ID: u8 = 0xB1;
/// Bank erase request id (ABAB only)
pub const MUTABLE_FW_ERASE_REQ_ID: u8 = 0xB2;
/// Update data record request id (ACAB only)
pub const MUTABLE_FW_UPDATE_DATA_REQ_ID: u8 = 0xB4;

/// Data bytes carried by one ABAB update request
pub const FW_UPDATE_CHUNK_LEN: usize = 128;

/// Fixed part of the ACAB update request: signature, first-chunk hash,
/// firmware type, header version and firmware version
pub const FW_UPDATE_REQ_LEN: usize = 104;

/// Upper bound of one firmware image
pub const MUTABLE_FW_UPDATE_SIZE_MAX: usize = 30720;

/// Firmware banks of the chip
///
/// The RISC-V application firmware and the SPECT coprocessor firmware each
/// have two banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FwBank {
    Fw1 = 0x01,
    Fw2 = 0x02,
    Spect1 = 0x11,
    Spect2 = 0x12,
}

/// Build one ABAB update request payload: bank, offset and data chunk
///
/// Returns the payload buffer and the used length.
pub fn fw_update_chunk(
    bank: FwBank,
    offset: u16,
    data: &[u8],
) -> ([u8; 3 + FW_UPDATE_CHUNK_LEN], usize) {
    debug_assert!(data.len() <= FW_UPDATE_CHUNK_LEN);
    let mut payload = [0u8; 3 + FW_UPDATE_CHUNK_LEN];
    payload[0] = bank as u8;
    payload[1..3].copy_from_slice(&offset.to_le_bytes());
    payload[3..3 + data.len()].copy_from_slice(data);
    (payload, 3 + data.len())
}

/// Build the bank erase payload
pub fn fw_erase_req(bank: FwBank) -> [u8; 1] {
    [bank as u8]
}
