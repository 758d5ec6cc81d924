//! # Layer 2: CRC-protected request/response frames
//!
//! Frame layout on the wire, both directions:
//! `id(1) ‖ len(1) ‖ body(len) ‖ crc16(2)` with the CRC computed over
//! everything before it and transmitted most-significant byte first.
//! Requests carry a request id, responses a status byte in the same slot.
//!
//! Encrypted layer-3 packets are opaque payloads here: long packets are cut
//! into chunks acknowledged with `REQ_CONT`, long responses arrive as a train
//! of frames flagged `RES_CONT` until the final `REQ_OK`.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use super::cmd::cmd_session::ENCRYPTED_CMD_REQ_ID;
use super::l1::TIMEOUT_DEFAULT;
use super::status::L2Status;
use super::{IntPin, Tropic01, Tropic01Error};

/// Largest frame: id, length byte, 255 bytes of body and the CRC
pub(crate) const L2_MAX_FRAME_SIZE: usize = 259;

/// Chunk size used when fragmenting encrypted layer-3 packets
pub(crate) const L2_CHUNK_MAX_DATA_SIZE: usize = 252;

/// CRC-16/CCITT, polynomial 0x1021, initial value 0x0000
pub(crate) fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0x0000;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Frame buffer shared by requests and responses
///
/// The buffer holds exactly one frame at a time; accessors expose the header
/// fields and the body slice instead of raw offsets.
pub(crate) struct L2Frame {
    buff: [u8; L2_MAX_FRAME_SIZE],
    /// Set around a startup request to relax the READY polling
    pub(crate) startup_req_sent: bool,
}

impl L2Frame {
    pub(crate) fn new() -> Self {
        Self {
            buff: [0; L2_MAX_FRAME_SIZE],
            startup_req_sent: false,
        }
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.buff
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buff
    }

    /// Encode a request frame and return its length on the wire
    pub(crate) fn set_request(&mut self, req_id: u8, payload: &[u8]) -> usize {
        debug_assert!(payload.len() <= 255);
        self.buff[0] = req_id;
        self.buff[1] = payload.len() as u8;
        self.buff[2..2 + payload.len()].copy_from_slice(payload);
        let crc = crc16(&self.buff[..2 + payload.len()]);
        self.buff[2 + payload.len()..4 + payload.len()].copy_from_slice(&crc.to_be_bytes());
        4 + payload.len()
    }

    /// Length of the frame currently held in the buffer
    pub(crate) fn frame_len(&self) -> usize {
        4 + self.buff[1] as usize
    }

    /// First byte: request id or response status
    pub(crate) fn status(&self) -> u8 {
        self.buff[0]
    }

    /// Body length of the received frame
    pub(crate) fn rsp_len(&self) -> usize {
        self.buff[1] as usize
    }

    /// Body of the received frame
    pub(crate) fn body(&self) -> &[u8] {
        &self.buff[2..2 + self.rsp_len()]
    }

    /// Verify the CRC of the received frame
    pub(crate) fn check_crc(&self) -> bool {
        let n = 2 + self.rsp_len();
        let wire = u16::from_be_bytes([self.buff[n], self.buff[n + 1]]);
        crc16(&self.buff[..n]) == wire
    }
}

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Transmit the request frame held in the layer-2 buffer
    pub(crate) async fn l2_send(&mut self) -> Result<(), Tropic01Error> {
        let len = self.l2.frame_len();
        self.l1_write(len).await
    }

    /// Receive one frame, verify its CRC and map error statuses
    pub(crate) async fn l2_receive(&mut self) -> Result<L2Status, Tropic01Error> {
        self.l1_read(TIMEOUT_DEFAULT).await?;
        if !self.l2.check_crc() {
            return Err(Tropic01Error::RespCrc);
        }
        let status = L2Status::from(self.l2.status());
        status.check()?;
        Ok(status)
    }

    /// Send the wrapped layer-3 packet, fragmenting as needed
    ///
    /// Every chunk except the last must be acknowledged with `REQ_CONT`; the
    /// response to the final chunk is left for [`Self::l2_recv_encrypted_res`].
    pub(crate) async fn l2_send_encrypted_cmd(&mut self) -> Result<(), Tropic01Error> {
        let total = self.l3.wire_len();
        let mut offset = 0;
        while offset < total {
            let chunk = (total - offset).min(L2_CHUNK_MAX_DATA_SIZE);
            self.l2
                .set_request(ENCRYPTED_CMD_REQ_ID, &self.l3.bytes()[offset..offset + chunk]);
            self.l2_send().await?;
            offset += chunk;
            if offset < total {
                let status = self.l2_receive().await?;
                if status != L2Status::ReqCont {
                    return Err(Tropic01Error::GenErr);
                }
            }
        }
        Ok(())
    }

    /// Collect the response frame train into the layer-3 buffer
    ///
    /// Returns the wrapped packet length. `max_len` caps the transfer at the
    /// largest packet the running command may produce.
    pub(crate) async fn l2_recv_encrypted_res(
        &mut self,
        max_len: usize,
    ) -> Result<usize, Tropic01Error> {
        let cap = max_len.min(self.l3.capacity());
        let mut received = 0;
        loop {
            let status = self.l2_receive().await?;
            let len = self.l2.rsp_len();
            if received + len > cap {
                return Err(Tropic01Error::ResSize);
            }
            self.l3.bytes_mut()[received..received + len].copy_from_slice(self.l2.body());
            received += len;
            if status != L2Status::ResCont {
                return Ok(received);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc16_check_value() {
        // CRC-16/CCITT with zero init over the classic reference string
        assert_eq!(crc16(b"123456789"), 0x31C3);
        assert_eq!(crc16(&[]), 0x0000);
    }

    #[test]
    fn request_frame_round_trip() {
        let mut frame = L2Frame::new();
        for len in 0..=255usize {
            let mut payload = [0u8; 255];
            for (i, byte) in payload[..len].iter_mut().enumerate() {
                *byte = (i as u8) ^ (len as u8).wrapping_mul(31);
            }
            let n = frame.set_request(0x04, &payload[..len]);
            assert_eq!(n, len + 4);
            // A request frame has the response image: id, len, body, CRC
            assert!(frame.check_crc());
            assert_eq!(frame.body(), &payload[..len]);
        }
    }

    #[test]
    fn corrupted_frame_fails_crc() {
        let mut frame = L2Frame::new();
        frame.set_request(0x01, &[0x01, 0x00]);
        assert!(frame.check_crc());
        frame.bytes_mut()[2] ^= 0x40;
        assert!(!frame.check_crc());
    }
}
