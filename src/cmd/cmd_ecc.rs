// ECC key and signing commands API

pub const ECC_KEY_GENERATE_CMD_ID: u8 = 0x60;
pub const ECC_KEY_STORE_CMD_ID: u8 = 0x61;
pub const ECC_KEY_READ_CMD_ID: u8 = 0x62;
pub const ECC_KEY_ERASE_CMD_ID: u8 = 0x63;
pub const ECDSA_SIGN_CMD_ID: u8 = 0x70;
pub const EDDSA_SIGN_CMD_ID: u8 = 0x71;

/// Highest ECC key slot index
pub const ECC_SLOT_MAX: u8 = 31;

/// Longest message accepted by the EdDSA sign command
pub const EDDSA_SIGN_MSG_LEN_MAX: usize = 4096;

/// Curves supported by the ECC slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EccCurve {
    P256 = 0x01,
    Ed25519 = 0x02,
}

impl EccCurve {
    /// Public key length of the curve as stored in a slot
    pub fn pubkey_len(&self) -> usize {
        match self {
            EccCurve::P256 => 64,
            EccCurve::Ed25519 => 32,
        }
    }
}

/// How the key of a slot came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EccKeyOrigin {
    /// Generated on the chip, the private key never existed outside
    Generated = 0x01,
    /// Stored by the host
    Stored = 0x02,
    Unknown = 0x00,
}

impl From<u8> for EccKeyOrigin {
    fn from(value: u8) -> Self {
        match value {
            0x01 => EccKeyOrigin::Generated,
            0x02 => EccKeyOrigin::Stored,
            _ => EccKeyOrigin::Unknown,
        }
    }
}

/// Generate a fresh key pair in a slot
pub fn ecc_key_generate_cmd(slot: u8, curve: EccCurve) -> [u8; 5] {
    let mut cmd = [0u8; 5];
    cmd[0] = ECC_KEY_GENERATE_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot as u16).to_le_bytes());
    cmd[4] = curve as u8;
    cmd
}

/// Store a host-supplied private key into a slot
pub fn ecc_key_store_cmd(slot: u8, curve: EccCurve, key: &[u8; 32]) -> [u8; 49] {
    let mut cmd = [0u8; 49];
    cmd[0] = ECC_KEY_STORE_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot as u16).to_le_bytes());
    cmd[4] = curve as u8;
    cmd[17..49].copy_from_slice(key);
    cmd
}

/// Read the public key of a slot
pub fn ecc_key_read_cmd(slot: u8) -> [u8; 4] {
    let mut cmd = [0u8; 4];
    cmd[0] = ECC_KEY_READ_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot as u16).to_le_bytes());
    cmd
}

/// Erase a slot
pub fn ecc_key_erase_cmd(slot: u8) -> [u8; 4] {
    let mut cmd = [0u8; 4];
    cmd[0] = ECC_KEY_ERASE_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot as u16).to_le_bytes());
    cmd
}

/// ECDSA-sign a message digest with the key of a slot
pub fn ecdsa_sign_cmd(slot: u8, msg_hash: &[u8; 32]) -> [u8; 36] {
    let mut cmd = [0u8; 36];
    cmd[0] = ECDSA_SIGN_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot as u16).to_le_bytes());
    cmd[4..36].copy_from_slice(msg_hash);
    cmd
}

/// EdDSA-sign a raw message with the key of a slot, the message follows
pub fn eddsa_sign_cmd(slot: u8) -> [u8; 4] {
    let mut cmd = [0u8; 4];
    cmd[0] = EDDSA_SIGN_CMD_ID;
    cmd[2..4].copy_from_slice(&(slot as u16).to_le_bytes());
    cmd
}
