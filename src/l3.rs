//! # Layer 3: the encrypted command envelope
//!
//! Plaintext packet: `size(2, LE) ‖ body(size)`, where the body starts with a
//! command id on the way out and a result byte on the way back. Wrapping
//! encrypts the body in place with AES-256-GCM and appends the detached tag:
//! `size(2) ‖ ciphertext(size) ‖ tag(16)`.
//!
//! The IV is the per-direction 32-bit nonce, little-endian in the low four
//! bytes of the 96-bit field. Both counters start at zero on session start
//! and advance in lockstep with the chip, one step per completed exchange.
//! Any transport or authentication failure mid-exchange desynchronises the
//! two sides for good, so the driver kills the session on the spot.

use aes_gcm::{AeadInPlace, Aes256Gcm, Nonce, Tag};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use super::status::L3Result;
use super::{IntPin, Tropic01, Tropic01Error};

/// Longest command data field (a full-size ping message)
pub(crate) const L3_CMD_DATA_SIZE_MAX: usize = 4096;

const L3_SIZE_SIZE: usize = 2;
const L3_TAG_SIZE: usize = 16;

/// Packet buffer size: size prefix, command id, data, tag
pub(crate) const L3_PACKET_MAX_SIZE: usize = L3_SIZE_SIZE + 1 + L3_CMD_DATA_SIZE_MAX + L3_TAG_SIZE;

/// Wire size of a wrapped packet carrying `body` plaintext bytes
pub(crate) const fn wire_size(body: usize) -> usize {
    L3_SIZE_SIZE + body + L3_TAG_SIZE
}

/// Packet buffer for one command/response exchange
///
/// Accessors expose the size prefix, body and tag regions; no raw offset
/// arithmetic leaves this type.
pub(crate) struct L3Packet {
    buff: [u8; L3_PACKET_MAX_SIZE],
    size: usize,
}

impl L3Packet {
    pub(crate) fn new() -> Self {
        Self {
            buff: [0; L3_PACKET_MAX_SIZE],
            size: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        L3_PACKET_MAX_SIZE
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buff
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buff
    }

    /// Start a command packet from the fixed part of its body
    pub(crate) fn set_cmd(&mut self, body: &[u8]) {
        debug_assert!(body.len() <= 1 + L3_CMD_DATA_SIZE_MAX);
        self.buff[2..2 + body.len()].copy_from_slice(body);
        self.size = body.len();
    }

    /// Append variable command data
    pub(crate) fn push(&mut self, data: &[u8]) {
        debug_assert!(self.size + data.len() <= 1 + L3_CMD_DATA_SIZE_MAX);
        self.buff[2 + self.size..2 + self.size + data.len()].copy_from_slice(data);
        self.size += data.len();
    }

    /// Length of the wrapped packet on the wire
    pub(crate) fn wire_len(&self) -> usize {
        wire_size(self.size)
    }

    /// Result byte of a decrypted response
    pub(crate) fn result(&self) -> u8 {
        self.buff[2]
    }

    /// Response data following the result byte
    pub(crate) fn data(&self) -> &[u8] {
        &self.buff[3..2 + self.size]
    }
}

/// Keys and counters of one secure session
///
/// Dropping the value wipes the expanded keys (`aes` is built with its
/// zeroize support) and the counters with it.
pub(crate) struct SecureSession {
    enc: Aes256Gcm,
    dec: Aes256Gcm,
    pub(crate) nonce_cmd: u32,
    pub(crate) nonce_res: u32,
}

impl SecureSession {
    pub(crate) fn new(enc: Aes256Gcm, dec: Aes256Gcm) -> Self {
        Self {
            enc,
            dec,
            nonce_cmd: 0,
            nonce_res: 0,
        }
    }

    fn iv(nonce: u32) -> [u8; 12] {
        let mut iv = [0u8; 12];
        iv[..4].copy_from_slice(&nonce.to_le_bytes());
        iv
    }

    /// Wrap the plaintext packet in place with the command key
    ///
    /// Refuses to run when the nonce would wrap; the caller has not sent
    /// anything at that point, so the session stays usable for teardown.
    pub(crate) fn encrypt_cmd(&mut self, packet: &mut L3Packet) -> Result<(), Tropic01Error> {
        if self.nonce_cmd == u32::MAX {
            return Err(Tropic01Error::NonceOverflow);
        }
        let size = packet.size;
        packet.buff[..2].copy_from_slice(&(size as u16).to_le_bytes());
        let iv = Self::iv(self.nonce_cmd);
        let tag = self
            .enc
            .encrypt_in_place_detached(Nonce::from_slice(&iv), &[], &mut packet.buff[2..2 + size])
            .map_err(|_| Tropic01Error::Crypto)?;
        packet.buff[2 + size..2 + size + L3_TAG_SIZE].copy_from_slice(tag.as_slice());
        Ok(())
    }

    /// Open a wrapped response in place with the response key
    pub(crate) fn decrypt_res(
        &mut self,
        packet: &mut L3Packet,
        wire_len: usize,
    ) -> Result<(), Tropic01Error> {
        if wire_len < wire_size(1) {
            return Err(Tropic01Error::ResSize);
        }
        let size = u16::from_le_bytes([packet.buff[0], packet.buff[1]]) as usize;
        if wire_size(size) != wire_len {
            return Err(Tropic01Error::ResSize);
        }
        let iv = Self::iv(self.nonce_res);
        let (body, tag) = packet.buff[2..wire_len].split_at_mut(size);
        self.dec
            .decrypt_in_place_detached(Nonce::from_slice(&iv), &[], body, Tag::from_slice(tag))
            .map_err(|_| Tropic01Error::TagMismatch)?;
        packet.size = size;
        Ok(())
    }

    /// Account one completed command/response exchange
    pub(crate) fn advance(&mut self) {
        self.nonce_cmd += 1;
        self.nonce_res += 1;
    }
}

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Fail unless a secure session is open, before any bus traffic
    pub(crate) fn require_session(&self) -> Result<(), Tropic01Error> {
        if self.session.is_some() {
            Ok(())
        } else {
            Err(Tropic01Error::HostNoSession)
        }
    }

    /// Drop the session state, wiping keys and counters
    pub(crate) fn l3_invalidate(&mut self) {
        self.session = None;
    }

    /// Run one encrypted command round trip
    ///
    /// The command must already sit in the layer-3 buffer; `res_max` caps the
    /// response at the largest packet the command may produce. Transport and
    /// envelope failures invalidate the session. The nonce guard does not:
    /// nothing was transmitted.
    pub(crate) async fn l3_cmd(&mut self, res_max: usize) -> Result<(), Tropic01Error> {
        match self.l3_exchange(res_max).await {
            Ok(()) => Ok(()),
            Err(e @ (Tropic01Error::HostNoSession | Tropic01Error::NonceOverflow)) => Err(e),
            Err(e) => {
                self.l3_invalidate();
                Err(e)
            }
        }
    }

    async fn l3_exchange(&mut self, res_max: usize) -> Result<(), Tropic01Error> {
        let session = self.session.as_mut().ok_or(Tropic01Error::HostNoSession)?;
        session.encrypt_cmd(&mut self.l3)?;
        self.l2_send_encrypted_cmd().await?;
        let wire_len = self.l2_recv_encrypted_res(res_max).await?;
        let session = self.session.as_mut().ok_or(Tropic01Error::HostNoSession)?;
        session.decrypt_res(&mut self.l3, wire_len)?;
        session.advance();
        Ok(())
    }

    /// Map the result byte of the decrypted response
    pub(crate) fn l3_result(&self) -> Result<(), Tropic01Error> {
        L3Result::from(self.l3.result()).check()
    }
}

#[cfg(test)]
mod tests {
    use aes_gcm::KeyInit;

    use super::*;

    fn cipher(key: &[u8; 32]) -> Aes256Gcm {
        Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(key))
    }

    fn pair(k_cmd: &[u8; 32], k_res: &[u8; 32]) -> (SecureSession, SecureSession) {
        let host = SecureSession::new(cipher(k_cmd), cipher(k_res));
        // The chip holds the same keys with the directions swapped
        let chip = SecureSession::new(cipher(k_res), cipher(k_cmd));
        (host, chip)
    }

    #[test]
    fn envelope_round_trip() {
        let (mut host, mut chip) = pair(&[0x11; 32], &[0x22; 32]);
        let mut packet = L3Packet::new();

        for len in [0usize, 1, 16, 251, 252, 444, L3_CMD_DATA_SIZE_MAX] {
            let mut body = [0u8; 1 + L3_CMD_DATA_SIZE_MAX];
            body[0] = 0x01;
            for (i, byte) in body[1..1 + len].iter_mut().enumerate() {
                *byte = i as u8;
            }
            packet.set_cmd(&body[..1 + len]);
            host.encrypt_cmd(&mut packet).unwrap();
            let wire_len = packet.wire_len();
            assert_eq!(wire_len, wire_size(1 + len));

            chip.decrypt_res(&mut packet, wire_len).unwrap();
            assert_eq!(packet.result(), 0x01);
            assert_eq!(packet.data(), &body[1..1 + len]);

            host.advance();
            chip.advance();
        }
        assert_eq!(host.nonce_cmd, 7);
        assert_eq!(host.nonce_res, 7);
        assert_eq!(chip.nonce_cmd, chip.nonce_res);
    }

    #[test]
    fn tag_flip_is_rejected() {
        let (mut host, mut chip) = pair(&[0xA5; 32], &[0x5A; 32]);
        let mut packet = L3Packet::new();
        packet.set_cmd(&[0x01, 0xDE, 0xAD]);
        host.encrypt_cmd(&mut packet).unwrap();
        let wire_len = packet.wire_len();
        packet.bytes_mut()[3] ^= 0x01;
        assert_eq!(
            chip.decrypt_res(&mut packet, wire_len),
            Err(Tropic01Error::TagMismatch)
        );
    }

    #[test]
    fn nonce_mismatch_is_rejected() {
        let (mut host, mut chip) = pair(&[1; 32], &[2; 32]);
        let mut packet = L3Packet::new();
        packet.set_cmd(&[0x01]);
        host.encrypt_cmd(&mut packet).unwrap();
        let wire_len = packet.wire_len();
        chip.nonce_res = 1;
        assert_eq!(
            chip.decrypt_res(&mut packet, wire_len),
            Err(Tropic01Error::TagMismatch)
        );
    }

    #[test]
    fn nonce_overflow_is_refused_before_any_work() {
        let (mut host, _) = pair(&[3; 32], &[4; 32]);
        host.nonce_cmd = u32::MAX;
        let mut packet = L3Packet::new();
        packet.set_cmd(&[0x01]);
        assert_eq!(
            host.encrypt_cmd(&mut packet),
            Err(Tropic01Error::NonceOverflow)
        );
        assert_eq!(host.nonce_res, 0);
    }

    #[test]
    fn iv_is_little_endian_in_the_low_bytes() {
        assert_eq!(
            SecureSession::iv(0x0102_0304),
            [0x04, 0x03, 0x02, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn truncated_packet_is_rejected() {
        let (_, mut chip) = pair(&[5; 32], &[6; 32]);
        let mut packet = L3Packet::new();
        assert_eq!(
            chip.decrypt_res(&mut packet, wire_size(0)),
            Err(Tropic01Error::ResSize)
        );
    }
}
