// Secure-session requests API

/// Handshake request id
pub const HANDSHAKE_REQ_ID: u8 = 0x02;
/// Encrypted command request id
pub const ENCRYPTED_CMD_REQ_ID: u8 = 0x04;
/// Session abort request id
pub const ENCRYPTED_SESSION_ABT_REQ_ID: u8 = 0x08;

/// Handshake response payload: chip ephemeral key and key-confirmation tag
pub const HANDSHAKE_RSP_LEN: usize = 48;

/// Pairing-key slot addressed by a handshake
///
/// Each slot holds one registered host X25519 public key; the matching host
/// private key authorises session establishment against that slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PairingKeySlot {
    Slot0 = 0,
    Slot1 = 1,
    Slot2 = 2,
    Slot3 = 3,
}

impl PairingKeySlot {
    /// Slot index as sent on the wire
    pub fn index(&self) -> u8 {
        *self as u8
    }
}

/// Build the handshake request payload: host ephemeral key and slot index
pub fn handshake_req(ehpub: &[u8; 32], pkey_slot: PairingKeySlot) -> [u8; 33] {
    let mut req = [0u8; 33];
    req[..32].copy_from_slice(ehpub);
    req[32] = pkey_slot.index();
    req
}
