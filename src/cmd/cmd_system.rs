// System requests API

/// Sleep request id
pub const SLEEP_REQ_ID: u8 = 0x05;
/// Log readout request id
pub const GET_LOG_REQ_ID: u8 = 0xA2;
/// Startup (reboot) request id
pub const STARTUP_REQ_ID: u8 = 0xB3;

/// Longest log message one request can return
pub const GET_LOG_MSG_LEN_MAX: usize = 255;

/// Sleep mode selector of the sleep request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepKind {
    Sleep = 0x05,
}

/// Firmware selector of the startup request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupId {
    /// Restart into the application firmware
    Reboot = 0x01,
    /// Restart into the maintenance firmware for firmware updates
    MaintenanceReboot = 0x03,
}

/// Build the sleep request payload
pub fn sleep_req(kind: SleepKind) -> [u8; 1] {
    [kind as u8]
}

/// Build the startup request payload
pub fn startup_req(startup_id: StartupId) -> [u8; 1] {
    [startup_id as u8]
}
