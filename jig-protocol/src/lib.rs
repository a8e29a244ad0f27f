//! JIG serial link protocol
//!
//! This crate defines the framed record protocol between the JIG test
//! controller (server side) and the station client, plus the byte-stream
//! reassembly machinery that recovers records from a raw serial link.
//!
//! # Wire format
//!
//! Every exchange is one fixed-size record:
//! ```text
//! ┌──────┬─────┬──────────────┬──────┐
//! │ HEAD │ CMD │ DATA         │ TAIL │
//! │ '@'  │ 1B  │ 32B, 0-pad   │ '#'  │
//! └──────┴─────┴──────────────┴──────┘
//! ```
//!
//! `DATA` carries comma-separated ASCII text:
//! `{command_id},{command_class}[,{arg}]*`.
//!
//! The link offers no byte-count framing, so the receive side slides a
//! record-sized window over the most recent bytes and accepts a record
//! whenever both sentinels line up. Noise and truncated records age out
//! of the window without any explicit recovery step.

#![no_std]
#![deny(unsafe_code)]

pub mod engine;
pub mod payload;
pub mod queue;
pub mod record;
pub mod ring;

pub use engine::{ChannelState, EngineError, FrameCodec, ProtocolEngine, SentinelCodec, MAX_CHANNELS};
pub use payload::{parse_request, payload_text, CommandClass, Request};
pub use queue::{enqueue_record, ByteConsumer, ByteProducer, ByteQueue, QUEUE_DEPTH};
pub use record::{
    ControllerCmd, RecordError, ResponseKind, WireRecord, DATA_SIZE, RECORD_HEAD, RECORD_SIZE,
    RECORD_TAIL,
};
pub use ring::FrameRing;

/// Framing engine preconfigured for the JIG record size
pub type JigEngine = ProtocolEngine<SentinelCodec, RECORD_SIZE>;
