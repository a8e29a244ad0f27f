//! Status panel abstraction for the JIG client.
//!
//! The framing/dispatch core never touches the panel; it shares the
//! same process loop and reads dispatch counters. This crate provides:
//! - `DisplayBackend` trait for the rendering target (terminal,
//!   framebuffer, ...)
//! - `Screen` character buffer the panel logic draws into

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
