//! # TROPIC01 secure element driver
//!
//! This crate provides a driver for the Tropic Square TROPIC01 secure element,
//! a companion chip offering hardware-backed key storage, ECC signing, monotonic
//! counters, user-data slots and a true random number generator behind an
//! authenticated and encrypted SPI command interface.
//!
//! The chip speaks a three-layer protocol and the driver mirrors it:
//! - **Layer 1**: chip-status polling and raw frame transfers over the bus.
//! - **Layer 2**: CRC-16 protected request/response frames. A few commands
//!   (chip info, reboot, sleep, log readout, firmware update) live entirely
//!   on this layer and work without a session.
//! - **Layer 3**: AES-256-GCM encrypted commands inside a secure session
//!   established with an X25519 handshake against one of the four pairing-key
//!   slots. All key material and counters live in the driver handle and are
//!   wiped on session teardown.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tropic01::{NoIntPin, PairingKeySlot, SiliconRev, Tropic01};
//!
//! // SPI bus and chip-select pin come from the HAL of your platform.
//! let mut tr01 = Tropic01::new(spi, csn, NoIntPin, SiliconRev::Acab);
//!
//! // Establish a secure session against pairing-key slot 0.
//! // `stpub` is the chip public key extracted from its certificate store,
//! // `sh0_priv`/`sh0_pub` the host pairing keypair for that slot.
//! tr01.session_start(&mut rng, &stpub, PairingKeySlot::Slot0, &sh0_priv, &sh0_pub).await?;
//!
//! // Encrypted commands are available now.
//! let mut rnd = [0u8; 32];
//! tr01.random_value_get(&mut rnd).await?;
//!
//! tr01.session_abort().await?;
//! ```
//!
//! ## Port requirements
//!
//! The driver is generic over an [`SpiBus`], an [`OutputPin`] driving the chip
//! select and an [`IntPin`] for the optional READY line. Boards without the
//! READY line wired pass [`NoIntPin`] and the driver falls back to polling the
//! chip status; boards with it wrap the GPIO in [`ReadyPin`].

#![no_std]

pub mod cmd;
pub mod config;
pub mod ecc;
pub mod fw;
pub mod info;
mod l1;
mod l2;
mod l3;
pub mod mcounter;
pub mod misc;
pub mod pairing;
pub mod rmem;
pub mod session;
pub mod status;
pub mod system;

use embassy_time::{Duration, with_timeout};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::spi::SpiBus;

use crate::l2::L2Frame;
use crate::l3::{L3Packet, SecureSession};

pub use crate::session::PairingKeySlot;
pub use crate::status::Mode;

/// Error conditions reported by the driver
///
/// The first group covers local failures (arguments, bus, crypto provider),
/// the middle group statuses reported by the chip on layer 2, the last group
/// results reported inside an encrypted layer-3 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tropic01Error {
    /// Argument out of range (slot index, buffer length, ...)
    InvalidParam,
    /// SPI transfer failed
    Spi,
    /// Chip-select or READY pin failed
    Pin,
    /// READY line did not assert within the timeout
    IntTimeout,
    /// Retry budget exhausted while waiting for the chip to become ready
    ChipBusy,
    /// Chip signals alarm mode
    AlarmMode,
    /// Crypto provider failed
    Crypto,
    /// The command nonce would wrap, the session must be restarted
    NonceOverflow,
    /// A layer-3 command was attempted without an open session
    HostNoSession,
    /// Chip did not come back in the requested mode after reboot
    RebootFailed,
    /// Certificate store header is invalid or a certificate does not fit
    CertStore,
    /// CRC check failed on a received frame
    RespCrc,
    /// Response length does not match the expected size
    RespLen,
    /// Unknown layer-2 status byte
    UnknownStatus,
    /// Chip reported a CRC error in our request
    ReqCrc,
    /// Chip refused the handshake, or the key-confirmation tag was wrong
    Handshake,
    /// Chip has no open session for an encrypted request
    NoSession,
    /// Authentication tag verification failed
    TagMismatch,
    /// Chip does not know the request id
    UnknownReq,
    /// Generic layer-2 failure
    GenErr,
    /// Chip has no response ready
    NoResp,
    /// Encrypted response does not fit the expected packet size
    ResSize,
    /// Command failed on the chip
    CmdFail,
    /// Command not authorized by the chip configuration
    Unauthorized,
    /// Chip does not know the command id
    InvalidCmd,
    /// Hardware fault reported by the chip
    HardwareFail,
    /// Target slot is empty
    SlotEmpty,
    /// Target slot was invalidated
    SlotInvalid,
    /// Unknown layer-3 result byte
    ResultUnknown,
}

impl Tropic01Error {
    /// Human readable tag for diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Tropic01Error::InvalidParam => "INVALID_PARAM",
            Tropic01Error::Spi => "SPI_ERROR",
            Tropic01Error::Pin => "PIN_ERROR",
            Tropic01Error::IntTimeout => "INT_TIMEOUT",
            Tropic01Error::ChipBusy => "CHIP_BUSY",
            Tropic01Error::AlarmMode => "CHIP_ALARM_MODE",
            Tropic01Error::Crypto => "CRYPTO_ERROR",
            Tropic01Error::NonceOverflow => "NONCE_OVERFLOW",
            Tropic01Error::HostNoSession => "HOST_NO_SESSION",
            Tropic01Error::RebootFailed => "REBOOT_UNSUCCESSFUL",
            Tropic01Error::CertStore => "CERT_STORE_INVALID",
            Tropic01Error::RespCrc => "L2_IN_CRC_ERROR",
            Tropic01Error::RespLen => "L2_RSP_LEN_ERROR",
            Tropic01Error::UnknownStatus => "L2_STATUS_UNKNOWN",
            Tropic01Error::ReqCrc => "L2_CRC_ERROR",
            Tropic01Error::Handshake => "L2_HSK_ERROR",
            Tropic01Error::NoSession => "L2_NO_SESSION",
            Tropic01Error::TagMismatch => "L3_TAG_ERROR",
            Tropic01Error::UnknownReq => "L2_UNKNOWN_REQ",
            Tropic01Error::GenErr => "L2_GEN_ERROR",
            Tropic01Error::NoResp => "L2_NO_RESP",
            Tropic01Error::ResSize => "L3_RES_SIZE_ERROR",
            Tropic01Error::CmdFail => "L3_FAIL",
            Tropic01Error::Unauthorized => "L3_UNAUTHORIZED",
            Tropic01Error::InvalidCmd => "L3_INVALID_CMD",
            Tropic01Error::HardwareFail => "L3_HARDWARE_FAIL",
            Tropic01Error::SlotEmpty => "L3_SLOT_EMPTY",
            Tropic01Error::SlotInvalid => "L3_SLOT_INVALID",
            Tropic01Error::ResultUnknown => "L3_RESULT_UNKNOWN",
        }
    }
}

/// Silicon revision of the TROPIC01
///
/// The two revisions differ in the mutable firmware update flow: ABAB expects
/// the host to erase a bank and push raw 128-byte chunks, ACAB manages its
/// banks itself and takes an update request followed by self-describing data
/// records. All other commands are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SiliconRev {
    Abab,
    Acab,
}

/// Optional READY interrupt line
///
/// The chip can signal response readiness on a GPIO. Implementations block
/// until the line asserts or the timeout elapses; the driver still verifies
/// the chip status afterwards, so a pin is an optimisation, never a
/// correctness requirement.
#[allow(async_fn_in_trait)]
pub trait IntPin {
    async fn wait_ready(&mut self, timeout: Duration) -> Result<(), Tropic01Error>;
}

/// Placeholder for boards where the READY line is not wired
///
/// The driver then relies on chip-status polling alone.
pub struct NoIntPin;

impl IntPin for NoIntPin {
    async fn wait_ready(&mut self, _timeout: Duration) -> Result<(), Tropic01Error> {
        Ok(())
    }
}

/// Adapter driving the READY line through an async input pin
pub struct ReadyPin<P>(pub P);

impl<P: Wait> IntPin for ReadyPin<P> {
    async fn wait_ready(&mut self, timeout: Duration) -> Result<(), Tropic01Error> {
        match with_timeout(timeout, self.0.wait_for_high()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(Tropic01Error::Pin),
            Err(_) => Err(Tropic01Error::IntTimeout),
        }
    }
}

/// Driver handle for one TROPIC01 chip
///
/// Owns the layer-2 frame buffer, the layer-3 packet buffer and the secure
/// session state. The handle is single-owner: wrap it in a mutex if several
/// tasks must share the chip.
pub struct Tropic01<O, SPI, I> {
    pub(crate) spi: SPI,
    pub(crate) csn: O,
    pub(crate) int: I,
    pub(crate) rev: SiliconRev,
    pub(crate) l2: L2Frame,
    pub(crate) l3: L3Packet,
    pub(crate) session: Option<SecureSession>,
}

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Create a driver handle from the SPI bus, the chip-select pin, the
    /// optional READY line and the silicon revision of the mounted chip
    pub fn new(spi: SPI, csn: O, int: I, rev: SiliconRev) -> Self {
        Self {
            spi,
            csn,
            int,
            rev,
            l2: L2Frame::new(),
            l3: L3Packet::new(),
            session: None,
        }
    }

    /// Silicon revision the handle was created for
    pub fn silicon_rev(&self) -> SiliconRev {
        self.rev
    }

    /// True while a secure session is established
    pub fn session_active(&self) -> bool {
        self.session.is_some()
    }

    /// Tear the driver down and give the bus and pins back
    ///
    /// Session keys are wiped. The chip itself keeps its session until it is
    /// aborted, rebooted or power cycled.
    pub fn release(mut self) -> (SPI, O, I) {
        self.session = None;
        (self.spi, self.csn, self.int)
    }
}
