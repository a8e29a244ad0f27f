//! Sliding-window byte ring backing the framing engine.

/// Fixed-capacity ring holding the last `N` bytes received.
///
/// The ring is a plain arena plus a rolling cursor: each pushed byte
/// overwrites the oldest one and advances the window start, so the
/// window `[0, N)` always reads the most recent `N` bytes in arrival
/// order. Validation is purely positional against this window.
#[derive(Debug, Clone)]
pub struct FrameRing<const N: usize> {
    buf: [u8; N],
    start: usize,
}

impl<const N: usize> FrameRing<N> {
    /// Create a ring pre-filled with zeroes
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            start: 0,
        }
    }

    /// Append one byte, overwriting the oldest and sliding the window
    pub fn push(&mut self, byte: u8) {
        self.buf[self.start] = byte;
        self.start = (self.start + 1) % N;
    }

    /// Byte at `offset` from the window start
    ///
    /// Offset 0 is the oldest byte in the window, `N - 1` the newest.
    pub fn at(&self, offset: usize) -> u8 {
        self.buf[(self.start + offset) % N]
    }

    /// Window size in bytes
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for FrameRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
