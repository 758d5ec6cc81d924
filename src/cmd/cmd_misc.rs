// Ping, random and Mac-and-Destroy commands API

pub const PING_CMD_ID: u8 = 0x01;
pub const RANDOM_VALUE_GET_CMD_ID: u8 = 0x50;
pub const MAC_AND_DESTROY_CMD_ID: u8 = 0x90;

/// Longest ping message
pub const PING_LEN_MAX: usize = 4096;
/// Most random bytes one request can return
pub const RANDOM_VALUE_GET_LEN_MAX: usize = 255;
/// Highest Mac-and-Destroy slot index
pub const MAC_AND_DESTROY_SLOT_MAX: u8 = 127;
/// Mac-and-Destroy input and output block size
pub const MAC_AND_DESTROY_DATA_SIZE: usize = 32;

/// Echo command, the message follows
pub fn ping_cmd() -> [u8; 1] {
    [PING_CMD_ID]
}

/// Draw bytes from the chip TRNG
pub fn random_value_get_cmd(n_bytes: u8) -> [u8; 2] {
    [RANDOM_VALUE_GET_CMD_ID, n_bytes]
}

/// Run one Mac-and-Destroy step in a slot
pub fn mac_and_destroy_cmd(slot: u8, data_out: &[u8; 32]) -> [u8; 36] {
    let mut cmd = [0u8; 36];
    cmd[0] = MAC_AND_DESTROY_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot as u16).to_le_bytes());
    cmd[4..36].copy_from_slice(data_out);
    cmd
}
