//! Board-agnostic control logic for the JIG client.
//!
//! This crate turns validated inbound records into device actions and
//! outbound acknowledgments. Hardware access stays behind the
//! [`DeviceAccess`] trait so the dispatch logic tests on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod devices;
pub mod dispatch;

pub use devices::{DeviceAccess, DeviceError};
pub use dispatch::{send_ready, DispatchStats, Dispatcher};
