//! # Chip management: mode, reboot, sleep and log readout
//!
//! These commands work on layer 2 alone and never touch the secure session
//! nonces. A reboot does invalidate the host session state, the chip forgets
//! its half across the restart anyway.
//!
//! ## Available Methods
//!
//! - [`get_mode`](crate::Tropic01::get_mode) - Probe whether the chip runs application, maintenance or alarm mode
//! - [`reboot`](crate::Tropic01::reboot) - Restart into the selected firmware and verify the outcome
//! - [`sleep`](crate::Tropic01::sleep) - Put the chip to sleep
//! - [`get_log`](crate::Tropic01::get_log) - Drain the RISC-V firmware log message

use embassy_time::Timer;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;

pub use super::cmd::cmd_system::*;
use super::l1::{READ_MAX_TRIES, READ_RETRY_DELAY, REBOOT_SETTLE_DELAY};
use super::status::Mode;
use super::{IntPin, Tropic01, Tropic01Error};

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Probe the current chip mode
    ///
    /// Polls the chip status within the usual retry budget; a chip that never
    /// raises READY reports [`Tropic01Error::ChipBusy`].
    pub async fn get_mode(&mut self) -> Result<Mode, Tropic01Error> {
        let mut tries = READ_MAX_TRIES;
        loop {
            let status = self.l1_get_status().await?;
            if status.alarm() {
                return Ok(Mode::Alarm);
            }
            if status.ready() {
                return Ok(status.mode());
            }
            tries -= 1;
            if tries == 0 {
                return Err(Tropic01Error::ChipBusy);
            }
            Timer::after(READ_RETRY_DELAY).await;
        }
    }

    /// Restart the chip into the selected firmware
    ///
    /// Waits out the restart, then re-probes the chip mode: coming back in a
    /// different mode than requested reports [`Tropic01Error::RebootFailed`].
    /// The host session state is dropped unconditionally.
    pub async fn reboot(&mut self, startup_id: StartupId) -> Result<(), Tropic01Error> {
        self.session = None;

        self.l2.set_request(STARTUP_REQ_ID, &startup_req(startup_id));
        self.l2.startup_req_sent = true;
        let res = self.startup_exchange().await;
        self.l2.startup_req_sent = false;
        res?;

        Timer::after(REBOOT_SETTLE_DELAY).await;

        match (startup_id, self.get_mode().await?) {
            (_, Mode::Alarm) => Err(Tropic01Error::AlarmMode),
            (StartupId::Reboot, Mode::Application) => Ok(()),
            (StartupId::MaintenanceReboot, Mode::Maintenance) => Ok(()),
            _ => Err(Tropic01Error::RebootFailed),
        }
    }

    async fn startup_exchange(&mut self) -> Result<(), Tropic01Error> {
        self.l2_send().await?;
        self.l2_receive().await?;
        if self.l2.rsp_len() != 0 {
            return Err(Tropic01Error::RespLen);
        }
        Ok(())
    }

    /// Put the chip to sleep, it wakes on the next chip-select edge
    pub async fn sleep(&mut self, kind: SleepKind) -> Result<(), Tropic01Error> {
        self.l2.set_request(SLEEP_REQ_ID, &sleep_req(kind));
        self.l2_send().await?;
        self.l2_receive().await?;
        if self.l2.rsp_len() != 0 {
            return Err(Tropic01Error::RespLen);
        }
        Ok(())
    }

    /// Drain the firmware log message into `msg`, returns the message length
    ///
    /// Only useful on chips running a debug build of the application
    /// firmware; production firmware answers with an empty message.
    pub async fn get_log(&mut self, msg: &mut [u8]) -> Result<usize, Tropic01Error> {
        self.l2.set_request(GET_LOG_REQ_ID, &[]);
        self.l2_send().await?;
        self.l2_receive().await?;

        let len = self.l2.rsp_len();
        if msg.len() < len {
            return Err(Tropic01Error::InvalidParam);
        }
        msg[..len].copy_from_slice(self.l2.body());
        Ok(len)
    }
}
