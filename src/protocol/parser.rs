// SPDX-License-Identifier: MIT

//! Receiver-side telemetry stream parser.
//!
//! Byte-at-a-time decoder for the frame layout in [`frame`](crate::protocol::frame).
//! Feed it the raw serial stream; it scans for the two-byte header, collects
//! the payload, and yields a decoded record when the checksum matches. Any
//! mismatch silently resynchronizes on the next header, so framing recovers
//! after byte loss.

use crate::drivers::mpu9250::Vector3;
use crate::hw::encoder::Wheel;
use crate::protocol::frame::{checksum_xor, FLAG_SENSOR_FAULT, HEADER, PAYLOAD_LEN};

/// One decoded telemetry frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryRecord {
    pub time_ms: u32,
    pub ticks: [i32; Wheel::COUNT],
    pub accel: Vector3,
    pub gyro: Vector3,
    pub flags: u16,
}

impl TelemetryRecord {
    /// The sender's sensor burst read failed for this cycle.
    #[inline]
    pub fn sensor_fault(&self) -> bool {
        self.flags & FLAG_SENSOR_FAULT != 0
    }
}

enum State {
    WaitHeader0,
    WaitHeader1,
    Payload { len: usize },
    Checksum,
}

pub struct FrameParser {
    state: State,
    payload: [u8; PAYLOAD_LEN],
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: State::WaitHeader0,
            payload: [0; PAYLOAD_LEN],
        }
    }

    /// Process a single incoming byte. Returns `Some(record)` when a
    /// checksum-valid frame completes.
    pub fn push(&mut self, byte: u8) -> Option<TelemetryRecord> {
        match self.state {
            State::WaitHeader0 => {
                if byte == HEADER[0] {
                    self.state = State::WaitHeader1;
                }
            }
            State::WaitHeader1 => {
                self.state = if byte == HEADER[1] {
                    State::Payload { len: 0 }
                } else if byte == HEADER[0] {
                    // 0xAA 0xAA 0x55 still syncs on the second 0xAA.
                    State::WaitHeader1
                } else {
                    State::WaitHeader0
                };
            }
            State::Payload { len } => {
                self.payload[len] = byte;
                self.state = if len + 1 == PAYLOAD_LEN {
                    State::Checksum
                } else {
                    State::Payload { len: len + 1 }
                };
            }
            State::Checksum => {
                self.state = State::WaitHeader0;
                if byte == checksum_xor(&self.payload) {
                    return Some(decode(&self.payload));
                }
                // Corrupt frame: drop it and rescan for the header.
            }
        }
        None
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(payload: &[u8; PAYLOAD_LEN]) -> TelemetryRecord {
    fn u32_at(b: &[u8], off: usize) -> u32 {
        u32::from_le_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]])
    }
    fn i32_at(b: &[u8], off: usize) -> i32 {
        u32_at(b, off) as i32
    }
    fn f32_at(b: &[u8], off: usize) -> f32 {
        f32::from_bits(u32_at(b, off))
    }

    TelemetryRecord {
        time_ms: u32_at(payload, 0),
        ticks: [
            i32_at(payload, 4),
            i32_at(payload, 8),
            i32_at(payload, 12),
            i32_at(payload, 16),
        ],
        accel: Vector3 {
            x: f32_at(payload, 20),
            y: f32_at(payload, 24),
            z: f32_at(payload, 28),
        },
        gyro: Vector3 {
            x: f32_at(payload, 32),
            y: f32_at(payload, 36),
            z: f32_at(payload, 40),
        },
        flags: u16::from_le_bytes([payload[44], payload[45]]),
    }
}
