// Pairing-key commands API

use super::cmd_session::PairingKeySlot;

pub const PAIRING_KEY_WRITE_CMD_ID: u8 = 0x10;
pub const PAIRING_KEY_READ_CMD_ID: u8 = 0x11;
pub const PAIRING_KEY_INVALIDATE_CMD_ID: u8 = 0x12;

/// Response body of a pairing-key read: result, padding and the public key
pub const PAIRING_KEY_READ_RES_SIZE: usize = 36;

/// Write a host X25519 public key into a pairing slot
pub fn pairing_key_write_cmd(slot: PairingKeySlot, pairing_pub: &[u8; 32]) -> [u8; 36] {
    let mut cmd = [0u8; 36];
    cmd[0] = PAIRING_KEY_WRITE_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot.index() as u16).to_le_bytes());
    cmd[4..36].copy_from_slice(pairing_pub);
    cmd
}

/// Read back the public key of a pairing slot
pub fn pairing_key_read_cmd(slot: PairingKeySlot) -> [u8; 4] {
    let mut cmd = [0u8; 4];
    cmd[0] = PAIRING_KEY_READ_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot.index() as u16).to_le_bytes());
    cmd
}

/// Invalidate a pairing slot for good
pub fn pairing_key_invalidate_cmd(slot: PairingKeySlot) -> [u8; 4] {
    let mut cmd = [0u8; 4];
    cmd[0] = PAIRING_KEY_INVALIDATE_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot.index() as u16).to_le_bytes());
    cmd
}
