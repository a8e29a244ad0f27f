//! Status panel: periodic screen refresh and the terminal backend.
//!
//! Mirrors what the fixture operator sees: model name, client version,
//! wall clock and a blinking link row with dispatch counters. Redrawn
//! every 500 ms from the control loop; rendering never blocks it.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::warn;

use jig_core::DispatchStats;
use jig_display::{DisplayBackend, DisplayError, Screen, SCREEN_COLS, SCREEN_ROWS};

/// Panel refresh period
pub const PANEL_INTERVAL: Duration = Duration::from_millis(500);

/// Panel state and refresh logic
pub struct StatusPanel {
    screen: Screen,
    model: String,
    version_line: String,
    last_tick: Option<Instant>,
    blink: bool,
}

impl StatusPanel {
    pub fn new(model: &str) -> Self {
        Self {
            screen: Screen::new(),
            model: model.into(),
            version_line: format!("jig-client v{}", env!("CARGO_PKG_VERSION")),
            last_tick: None,
            blink: false,
        }
    }

    /// Refresh the panel if the interval elapsed; cheap otherwise
    pub fn tick<B: DisplayBackend>(&mut self, stats: &DispatchStats, backend: &mut B) {
        let now = Instant::now();
        if let Some(last) = self.last_tick {
            if now.duration_since(last) < PANEL_INTERVAL {
                return;
            }
        }
        self.last_tick = Some(now);
        self.blink = !self.blink;

        let (h, m, s) = clock_of_day();
        self.screen.set_line(0, &self.model);
        self.screen.set_accent(0, self.blink);
        self.screen.set_line(1, &self.version_line);
        self.screen.set_line(2, &format!("{h:02}:{m:02}:{s:02}"));
        self.screen.set_line(
            3,
            &format!(
                "CMD {} RSP {} {}",
                stats.frames,
                stats.responses,
                if self.blink { "ON" } else { "OFF" }
            ),
        );
        self.screen.set_accent(3, self.blink);

        if let Err(e) = self.screen.render(backend) {
            warn!("panel render failed: {e:?}");
        }
    }
}

/// Current UTC time of day
fn clock_of_day() -> (u8, u8, u8) {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    split_clock(secs % 86_400)
}

const fn split_clock(secs_of_day: u64) -> (u8, u8, u8) {
    (
        (secs_of_day / 3600) as u8,
        ((secs_of_day / 60) % 60) as u8,
        (secs_of_day % 60) as u8,
    )
}

/// ANSI terminal rendering target
pub struct TermBackend {
    out: Stdout,
    accents: [bool; SCREEN_ROWS],
}

impl TermBackend {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            accents: [false; SCREEN_ROWS],
        }
    }
}

impl DisplayBackend for TermBackend {
    fn clear(&mut self) -> Result<(), DisplayError> {
        write!(self.out, "\x1b[2J\x1b[H").map_err(|_| DisplayError::Communication)
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if row as usize >= SCREEN_ROWS || col as usize >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        let accent = if self.accents[row as usize] {
            "\x1b[7m"
        } else {
            ""
        };
        write!(
            self.out,
            "\x1b[{};{}H\x1b[2K{}{}\x1b[0m",
            row + 1,
            col + 1,
            accent,
            text
        )
        .map_err(|_| DisplayError::Communication)
    }

    fn set_accent(&mut self, row: u8, on: bool) -> Result<(), DisplayError> {
        if row as usize >= SCREEN_ROWS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.accents[row as usize] = on;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.out.flush().map_err(|_| DisplayError::Communication)
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_clock() {
        assert_eq!(split_clock(0), (0, 0, 0));
        assert_eq!(split_clock(3_661), (1, 1, 1));
        assert_eq!(split_clock(86_399), (23, 59, 59));
    }
}
