//! Device-control trait boundary.
//!
//! The dispatcher delegates every side-effecting action through this
//! trait; the binary supplies the implementation that touches real
//! pins and ports.

/// Why a device action did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceError {
    /// Action attempted and failed (maps to an `Error` response)
    Failed,
    /// Device cannot take the action right now (maps to a `Busy` response)
    Busy,
}

/// Per-class action primitives invoked by the command handlers
pub trait DeviceAccess {
    /// Drive a digital pin to `level` and verify it
    fn gpio_set(&mut self, pin: &str, gpio_no: u32, level: u8) -> Result<(), DeviceError>;

    /// Run a USB test step described by the raw argument list
    fn usb_run(&mut self, args: &str) -> Result<(), DeviceError>;

    /// Run a UART test step described by the raw argument list
    fn uart_run(&mut self, args: &str) -> Result<(), DeviceError>;
}
