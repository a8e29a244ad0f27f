//! On-board device control.
//!
//! Implements the dispatcher's device boundary for this station. The
//! physical pin driving and port exercising sit behind station tooling
//! invoked out of band; the handlers here record the requested action
//! and report success, matching the reference fixture behavior.

use log::info;

use jig_core::{DeviceAccess, DeviceError};

/// Device access for the local board
pub struct OnboardDevices;

impl OnboardDevices {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceAccess for OnboardDevices {
    fn gpio_set(&mut self, pin: &str, gpio_no: u32, level: u8) -> Result<(), DeviceError> {
        info!("GPIO set: pin={pin} gpio={gpio_no} level={level}");
        Ok(())
    }

    fn usb_run(&mut self, args: &str) -> Result<(), DeviceError> {
        info!("USB step: {args}");
        Ok(())
    }

    fn uart_run(&mut self, args: &str) -> Result<(), DeviceError> {
        info!("UART step: {args}");
        Ok(())
    }
}
