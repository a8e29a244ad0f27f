//! Character screen buffer for the status panel.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows on the panel
pub const SCREEN_ROWS: usize = 4;

/// Number of character columns on the panel
pub const SCREEN_COLS: usize = 24;

/// Text-mode screen buffer.
///
/// Panel logic writes lines and accent flags here; `render` pushes the
/// buffer through a [`DisplayBackend`] only when something changed.
#[derive(Clone)]
pub struct Screen {
    lines: [String<SCREEN_COLS>; SCREEN_ROWS],
    accents: [bool; SCREEN_ROWS],
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create an empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            accents: [false; SCREEN_ROWS],
            dirty: true,
        }
    }

    /// Set the content of a row, truncating to the panel width
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let text = if text.len() > SCREEN_COLS {
            &text[..SCREEN_COLS]
        } else {
            text
        };
        if line.as_str() != text {
            line.clear();
            let _ = line.push_str(text);
            self.dirty = true;
        }
    }

    /// Content of a row
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|l| l.as_str())
    }

    /// Toggle the accent flag of a row
    pub fn set_accent(&mut self, row: usize, on: bool) {
        if let Some(accent) = self.accents.get_mut(row) {
            if *accent != on {
                *accent = on;
                self.dirty = true;
            }
        }
    }

    /// Clear all rows and accents
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.accents = [false; SCREEN_ROWS];
        self.dirty = true;
    }

    /// Redraw through the backend when the buffer changed since the
    /// last render; a clean buffer is a no-op.
    pub fn render<B: DisplayBackend>(&mut self, backend: &mut B) -> Result<(), DisplayError> {
        if !self.dirty {
            return Ok(());
        }
        for row in 0..SCREEN_ROWS {
            backend.set_accent(row as u8, self.accents[row])?;
            backend.draw_text(row as u8, 0, self.lines[row].as_str())?;
        }
        backend.flush()?;
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingBackend {
        draws: usize,
        flushes: usize,
    }

    impl DisplayBackend for CountingBackend {
        fn clear(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn draw_text(&mut self, _row: u8, _col: u8, _text: &str) -> Result<(), DisplayError> {
            self.draws += 1;
            Ok(())
        }

        fn set_accent(&mut self, _row: u8, _on: bool) -> Result<(), DisplayError> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            self.flushes += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (SCREEN_COLS as u8, SCREEN_ROWS as u8)
        }
    }

    #[test]
    fn test_set_line_truncates() {
        let mut screen = Screen::new();
        screen.set_line(0, "0123456789012345678901234567");
        assert_eq!(screen.line(0).unwrap().len(), SCREEN_COLS);
    }

    #[test]
    fn test_render_only_when_dirty() {
        let mut screen = Screen::new();
        let mut backend = CountingBackend::default();

        screen.render(&mut backend).unwrap();
        assert_eq!(backend.flushes, 1);

        // Unchanged buffer: nothing redrawn
        screen.render(&mut backend).unwrap();
        assert_eq!(backend.flushes, 1);

        // Same content again does not mark the buffer dirty
        screen.set_line(1, "");
        screen.render(&mut backend).unwrap();
        assert_eq!(backend.flushes, 1);

        screen.set_line(1, "ODROID-N2L");
        screen.render(&mut backend).unwrap();
        assert_eq!(backend.flushes, 2);
    }

    #[test]
    fn test_out_of_range_row_ignored() {
        let mut screen = Screen::new();
        screen.set_line(SCREEN_ROWS, "nope");
        screen.set_accent(SCREEN_ROWS, true);
        assert_eq!(screen.line(SCREEN_ROWS), None);
    }
}
