//! Display backend trait
//!
//! Defines the interface the screen buffer renders through. The
//! physical target (ANSI terminal, framebuffer, remote panel) lives
//! behind this boundary.

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// Communication error with the rendering target
    Communication,
    /// Row or column outside the panel dimensions
    InvalidCoordinates,
}

/// Hardware-agnostic rendering interface
pub trait DisplayBackend {
    /// Clear the whole panel
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at a character position
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Highlight or un-highlight a row (blink indicator, alerts)
    fn set_accent(&mut self, row: u8, on: bool) -> Result<(), DisplayError>;

    /// Push buffered output to the target
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Panel size as (columns, rows) in characters
    fn dimensions(&self) -> (u8, u8);
}
