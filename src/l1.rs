//! # Layer 1: bus framing and chip-status polling
//!
//! A request is a single chip-select window transmitting the layer-2 frame;
//! the frame's request id doubles as the opcode byte of the transmission.
//!
//! A response starts with the `GET_RESPONSE` opcode (0xAA). The chip answers
//! with its status byte in the same transfer: when the READY bit is clear the
//! driver deselects, sleeps and retries within a bounded budget, when the
//! ALARM bit is set it fails fast, otherwise it keeps the chip selected and
//! clocks out the response header, body and CRC.

use embassy_time::{Duration, Timer};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

use super::status::ChipStatus;
use super::{IntPin, Tropic01, Tropic01Error};

/// Opcode polling the chip status and the pending response frame
pub(crate) const GET_RESPONSE: u8 = 0xAA;

/// Retry budget while waiting for the READY bit
pub(crate) const READ_MAX_TRIES: u32 = 10;

/// Pause between two READY polls
pub(crate) const READ_RETRY_DELAY: Duration = Duration::from_millis(25);

/// Settle time after a startup request, the chip restarts its firmware
pub(crate) const REBOOT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Default READY-line timeout
pub(crate) const TIMEOUT_DEFAULT: Duration = Duration::from_millis(70);

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Transmit the first `len` bytes of the layer-2 buffer as one request
    pub(crate) async fn l1_write(&mut self, len: usize) -> Result<(), Tropic01Error> {
        self.csn.set_low().map_err(|_| Tropic01Error::Pin)?;
        let res = self.spi.write(&self.l2.bytes()[..len]).await;
        self.csn.set_high().map_err(|_| Tropic01Error::Pin)?;
        res.map_err(|_| Tropic01Error::Spi)
    }

    /// Poll the chip status once, without touching a pending response
    pub(crate) async fn l1_get_status(&mut self) -> Result<ChipStatus, Tropic01Error> {
        let mut poll = [GET_RESPONSE];
        self.csn.set_low().map_err(|_| Tropic01Error::Pin)?;
        let res = self.spi.transfer_in_place(&mut poll).await;
        self.csn.set_high().map_err(|_| Tropic01Error::Pin)?;
        res.map_err(|_| Tropic01Error::Spi)?;
        Ok(ChipStatus::from(poll[0]))
    }

    /// Wait for the chip to become ready and read the pending response frame
    /// into the layer-2 buffer
    pub(crate) async fn l1_read(&mut self, timeout: Duration) -> Result<(), Tropic01Error> {
        self.int.wait_ready(timeout).await?;

        // A startup request restarts the chip firmware, poll more patiently.
        let retry_delay = if self.l2.startup_req_sent {
            REBOOT_SETTLE_DELAY
        } else {
            READ_RETRY_DELAY
        };

        let mut tries = READ_MAX_TRIES;
        loop {
            self.csn.set_low().map_err(|_| Tropic01Error::Pin)?;
            match self.l1_read_attempt().await {
                Ok(true) => {
                    self.csn.set_high().map_err(|_| Tropic01Error::Pin)?;
                    return Ok(());
                }
                Ok(false) => {
                    self.csn.set_high().map_err(|_| Tropic01Error::Pin)?;
                }
                Err(e) => {
                    let _ = self.csn.set_high();
                    return Err(e);
                }
            }
            tries -= 1;
            if tries == 0 {
                return Err(Tropic01Error::ChipBusy);
            }
            Timer::after(retry_delay).await;
        }
    }

    /// One GET_RESPONSE attempt with the chip selected
    ///
    /// Returns Ok(false) when the chip is not ready yet.
    async fn l1_read_attempt(&mut self) -> Result<bool, Tropic01Error> {
        let mut poll = [GET_RESPONSE];
        self.spi
            .transfer_in_place(&mut poll)
            .await
            .map_err(|_| Tropic01Error::Spi)?;

        let status = ChipStatus::from(poll[0]);
        if status.alarm() {
            return Err(Tropic01Error::AlarmMode);
        }
        if !status.ready() {
            return Ok(false);
        }

        // Frame header: layer-2 status byte and body length
        let buff = self.l2.bytes_mut();
        buff[..2].fill(0);
        self.spi
            .transfer_in_place(&mut buff[..2])
            .await
            .map_err(|_| Tropic01Error::Spi)?;

        // Body plus the two CRC bytes
        let len = buff[1] as usize;
        buff[2..4 + len].fill(0);
        self.spi
            .transfer_in_place(&mut buff[2..4 + len])
            .await
            .map_err(|_| Tropic01Error::Spi)?;

        Ok(true)
    }
}
