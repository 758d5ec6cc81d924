//! # Chip status and protocol status codes
//!
//! Three status spaces exist in the protocol:
//! - The **chip status** byte clocked out on every `Get_Response` poll. It
//!   carries the READY, ALARM and STARTUP bits; the remaining bits are
//!   reserved and ignored.
//! - The **layer-2 status** byte leading every response frame (ok, request or
//!   response continuation, or one of the error codes).
//! - The **layer-3 result** byte leading every decrypted command response.
//!
//! [`L2Status::check`] and [`L3Result::check`] map the error codes onto
//! [`Tropic01Error`] so the protocol layers can propagate them with `?`.

use super::Tropic01Error;

/// Chip status: bit 0 READY, bit 1 ALARM, bit 2 STARTUP
#[derive(Default, Clone, Copy)]
pub struct ChipStatus(u8);

const CHIP_STATUS_READY_BIT: u8 = 0x01;
const CHIP_STATUS_ALARM_BIT: u8 = 0x02;
const CHIP_STATUS_STARTUP_BIT: u8 = 0x04;

impl ChipStatus {
    /// True when the chip accepts a request or has a response ready
    pub fn ready(&self) -> bool {
        (self.0 & CHIP_STATUS_READY_BIT) != 0
    }

    /// True when the chip entered alarm mode
    pub fn alarm(&self) -> bool {
        (self.0 & CHIP_STATUS_ALARM_BIT) != 0
    }

    /// True when the chip runs the maintenance (startup) firmware
    pub fn startup(&self) -> bool {
        (self.0 & CHIP_STATUS_STARTUP_BIT) != 0
    }

    /// Mode derived from the status bits, READY assumed
    pub fn mode(&self) -> Mode {
        if self.alarm() {
            Mode::Alarm
        } else if self.startup() {
            Mode::Maintenance
        } else {
            Mode::Application
        }
    }
}

impl From<u8> for ChipStatus {
    fn from(value: u8) -> Self {
        ChipStatus(value)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChipStatus {
    fn format(&self, fmt: defmt::Formatter) {
        if self.alarm() {
            defmt::write!(fmt, "Alarm");
            return;
        }
        if !self.ready() {
            defmt::write!(fmt, "Busy");
            return;
        }
        if self.startup() {
            defmt::write!(fmt, "Ready (maintenance)");
        } else {
            defmt::write!(fmt, "Ready");
        }
    }
}

/// Firmware the chip is currently executing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Application firmware, full command set available
    Application,
    /// Maintenance firmware, only firmware update and info commands
    Maintenance,
    /// Alarm mode, chip refuses all requests
    Alarm,
}

/// Status byte of a layer-2 response frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum L2Status {
    /// Request executed
    ReqOk = 0x01,
    /// Chip expects more request chunks
    ReqCont = 0x02,
    /// More response frames follow
    ResCont = 0x03,
    /// Handshake refused
    HskErr = 0x79,
    /// Encrypted request without an open session
    NoSession = 0x7A,
    /// Authentication tag of an encrypted command did not verify
    TagErr = 0x7B,
    /// Request CRC did not match
    CrcErr = 0x7C,
    /// Unknown request id
    UnknownReq = 0x7E,
    /// Generic failure
    GenErr = 0x7F,
    /// No response ready
    NoResp = 0xFF,
    Unknown = 0x00,
}

impl From<u8> for L2Status {
    fn from(value: u8) -> Self {
        match value {
            0x01 => L2Status::ReqOk,
            0x02 => L2Status::ReqCont,
            0x03 => L2Status::ResCont,
            0x79 => L2Status::HskErr,
            0x7A => L2Status::NoSession,
            0x7B => L2Status::TagErr,
            0x7C => L2Status::CrcErr,
            0x7E => L2Status::UnknownReq,
            0x7F => L2Status::GenErr,
            0xFF => L2Status::NoResp,
            _ => L2Status::Unknown,
        }
    }
}

impl L2Status {
    /// Map error statuses to the driver error, continuations pass
    pub fn check(&self) -> Result<(), Tropic01Error> {
        match self {
            L2Status::ReqOk | L2Status::ReqCont | L2Status::ResCont => Ok(()),
            L2Status::HskErr => Err(Tropic01Error::Handshake),
            L2Status::NoSession => Err(Tropic01Error::NoSession),
            L2Status::TagErr => Err(Tropic01Error::TagMismatch),
            L2Status::CrcErr => Err(Tropic01Error::ReqCrc),
            L2Status::UnknownReq => Err(Tropic01Error::UnknownReq),
            L2Status::GenErr => Err(Tropic01Error::GenErr),
            L2Status::NoResp => Err(Tropic01Error::NoResp),
            L2Status::Unknown => Err(Tropic01Error::UnknownStatus),
        }
    }
}

/// Result byte of a decrypted layer-3 response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum L3Result {
    Ok = 0xC3,
    Fail = 0x3C,
    Unauthorized = 0x01,
    InvalidCmd = 0x02,
    HardwareFail = 0x03,
    SlotEmpty = 0x12,
    SlotInvalid = 0x13,
    Unknown = 0x00,
}

impl From<u8> for L3Result {
    fn from(value: u8) -> Self {
        match value {
            0xC3 => L3Result::Ok,
            0x3C => L3Result::Fail,
            0x01 => L3Result::Unauthorized,
            0x02 => L3Result::InvalidCmd,
            0x03 => L3Result::HardwareFail,
            0x12 => L3Result::SlotEmpty,
            0x13 => L3Result::SlotInvalid,
            _ => L3Result::Unknown,
        }
    }
}

impl L3Result {
    /// Map failure results to the driver error
    ///
    /// These are application-level verdicts: the envelope authenticated, so
    /// the session stays valid.
    pub fn check(&self) -> Result<(), Tropic01Error> {
        match self {
            L3Result::Ok => Ok(()),
            L3Result::Fail => Err(Tropic01Error::CmdFail),
            L3Result::Unauthorized => Err(Tropic01Error::Unauthorized),
            L3Result::InvalidCmd => Err(Tropic01Error::InvalidCmd),
            L3Result::HardwareFail => Err(Tropic01Error::HardwareFail),
            L3Result::SlotEmpty => Err(Tropic01Error::SlotEmpty),
            L3Result::SlotInvalid => Err(Tropic01Error::SlotInvalid),
            L3Result::Unknown => Err(Tropic01Error::ResultUnknown),
        }
    }
}
