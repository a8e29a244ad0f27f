//! Byte-at-a-time framing engine.
//!
//! The engine owns one [`FrameRing`] and a set of parsing channels.
//! Every fed byte slides the ring window by one and re-evaluates each
//! accepting channel's codec against the fresh window, so alignment
//! recovers from noise and truncation by itself: a record is recognized
//! the instant its final byte arrives, wherever it sits in the stream.

use heapless::Vec;

use crate::record::{RECORD_HEAD, RECORD_TAIL};
use crate::ring::FrameRing;

/// Maximum parsing channels per engine
pub const MAX_CHANNELS: usize = 4;

/// Frame recognition strategy for one channel.
///
/// `validate` must be a pure predicate over the current window and is
/// expected to check only the sentinel positions; inspecting payload
/// content here would defeat self-resynchronization. `extract` copies
/// the body of a validated window (everything between the sentinels)
/// into `out` and returns the number of bytes written.
pub trait FrameCodec<const N: usize> {
    /// Does the current window hold a structurally valid frame?
    fn validate(&self, ring: &FrameRing<N>) -> bool;

    /// Copy the body of a validated frame into `out`
    fn extract(&self, ring: &FrameRing<N>, out: &mut [u8]) -> usize;
}

/// Positional sentinel codec: HEAD at window offset 0, TAIL at the end.
///
/// Channels with different sentinel pairs can share one ring, which is
/// how heterogeneous record types coexist on a single link.
#[derive(Debug, Clone, Copy)]
pub struct SentinelCodec {
    pub head: u8,
    pub tail: u8,
}

impl Default for SentinelCodec {
    fn default() -> Self {
        Self {
            head: RECORD_HEAD,
            tail: RECORD_TAIL,
        }
    }
}

impl<const N: usize> FrameCodec<N> for SentinelCodec {
    fn validate(&self, ring: &FrameRing<N>) -> bool {
        ring.at(0) == self.head && ring.at(N - 1) == self.tail
    }

    fn extract(&self, ring: &FrameRing<N>, out: &mut [u8]) -> usize {
        // Body between the sentinels: tag byte followed by the payload
        let len = (N - 2).min(out.len());
        for (i, slot) in out[..len].iter_mut().enumerate() {
            *slot = ring.at(1 + i);
        }
        len
    }
}

/// Lifecycle of one parsing channel.
///
/// A channel is either accepting bytes or holding one unconsumed frame,
/// never both and never neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Window evaluated on every fed byte
    Accepting,
    /// A validated frame waits in the holding buffer
    FrameReady,
}

/// Errors raised while configuring the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// All channel slots are in use
    ChannelLimit,
}

#[derive(Debug, Clone)]
struct Channel<C, const N: usize> {
    codec: C,
    state: ChannelState,
    hold: [u8; N],
    len: usize,
    // Window advanced past the held frame since it was captured
    window_moved: bool,
}

/// Framing engine driving one ring for all registered channels
#[derive(Debug, Clone)]
pub struct ProtocolEngine<C: FrameCodec<N>, const N: usize> {
    ring: FrameRing<N>,
    channels: Vec<Channel<C, N>, MAX_CHANNELS>,
}

impl<C: FrameCodec<N>, const N: usize> ProtocolEngine<C, N> {
    /// Create an engine with no channels registered
    pub fn new() -> Self {
        Self {
            ring: FrameRing::new(),
            channels: Vec::new(),
        }
    }

    /// Register a parsing channel, returning its index
    pub fn register(&mut self, codec: C) -> Result<usize, EngineError> {
        let index = self.channels.len();
        self.channels
            .push(Channel {
                codec,
                state: ChannelState::Accepting,
                hold: [0; N],
                len: 0,
                window_moved: false,
            })
            .map_err(|_| EngineError::ChannelLimit)?;
        Ok(index)
    }

    /// Number of registered channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// State of a channel, `None` for an unknown index
    pub fn state(&self, channel: usize) -> Option<ChannelState> {
        self.channels.get(channel).map(|ch| ch.state)
    }

    /// Feed one inbound byte.
    ///
    /// The ring always advances, even when no frame completes; a byte
    /// that never becomes part of a valid frame simply ages out. A
    /// channel already holding an unconsumed frame keeps it untouched
    /// and only notes that the window moved underneath it.
    pub fn feed(&mut self, byte: u8) {
        self.ring.push(byte);

        for ch in self.channels.iter_mut() {
            match ch.state {
                ChannelState::FrameReady => ch.window_moved = true,
                ChannelState::Accepting => {
                    if ch.codec.validate(&self.ring) {
                        ch.len = ch.codec.extract(&self.ring, &mut ch.hold);
                        ch.state = ChannelState::FrameReady;
                        ch.window_moved = false;
                    }
                }
            }
        }
    }

    /// Take the held frame body of a ready channel.
    ///
    /// Copies the body into `out` (truncating to its length) and
    /// returns the copied length, or `None` when the channel holds no
    /// frame. Before flipping back to accepting, the current window is
    /// rechecked: a frame whose final byte arrived while the previous
    /// one was still held completed unvalidated, and is captured here
    /// so consecutive records are delivered in arrival order.
    pub fn consume(&mut self, channel: usize, out: &mut [u8]) -> Option<usize> {
        let ch = self.channels.get_mut(channel)?;
        if ch.state != ChannelState::FrameReady {
            return None;
        }

        let len = ch.len.min(out.len());
        out[..len].copy_from_slice(&ch.hold[..len]);

        if ch.window_moved && ch.codec.validate(&self.ring) {
            ch.len = ch.codec.extract(&self.ring, &mut ch.hold);
            ch.window_moved = false;
        } else {
            ch.state = ChannelState::Accepting;
        }
        Some(len)
    }
}

impl<C: FrameCodec<N>, const N: usize> Default for ProtocolEngine<C, N> {
    fn default() -> Self {
        Self::new()
    }
}
