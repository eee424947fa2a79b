// SPDX-License-Identifier: MIT

//! Binary telemetry wire format.
//!
//! A frame is 49 bytes: a 2-byte header, a 46-byte little-endian payload,
//! and a 1-byte XOR checksum over the payload. Frames are emitted at a
//! nominal 100 Hz with no flow control or acknowledgment; the header pattern
//! is the only resynchronization marker.
//!
//! - [`frame`] - frame construction and serialization (transmit side).
//! - [`parser`] - header-scanning stream decoder (receive side).

pub mod frame;
pub mod parser;

pub use frame::TelemetryFrame;
pub use parser::{FrameParser, TelemetryRecord};
