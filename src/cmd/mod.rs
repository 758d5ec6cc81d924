//! Wire encoders and field definitions for every chip command
//!
//! Request ids, command ids, fixed field layouts and per-command length caps
//! are all encoded here; the protocol layers treat the resulting byte arrays
//! as opaque payloads.

pub mod cmd_config;
pub mod cmd_ecc;
pub mod cmd_fw;
pub mod cmd_info;
pub mod cmd_mcounter;
pub mod cmd_misc;
pub mod cmd_pairing;
pub mod cmd_rmem;
pub mod cmd_session;
pub mod cmd_system;
