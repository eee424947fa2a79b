// SPDX-License-Identifier: MIT

//! Telemetry frame layout and checksum.
//!
//! Payload field order (all little-endian, no padding):
//!
//! | Offset | Field | Type |
//! | ------ | ----- | ---- |
//! | 2      | time_ms | u32 |
//! | 6      | ticks FL, FR, BL, BR | 4 × i32 |
//! | 22     | accel x, y, z | 3 × f32, m/s² |
//! | 34     | gyro x, y, z | 3 × f32, rad/s |
//! | 46     | flags | u16 |
//!
//! Bytes 0-1 are the header, byte 48 the XOR checksum of bytes 2..48.

use crate::drivers::mpu9250::SensorSample;
use crate::hw::encoder::Wheel;

/// Frame sync marker.
pub const HEADER: [u8; 2] = [0xAA, 0x55];

/// Payload length in bytes (everything between header and checksum).
pub const PAYLOAD_LEN: usize = 46;

/// Total frame length in bytes.
pub const FRAME_LEN: usize = 2 + PAYLOAD_LEN + 1;

/// flags bit 0: the cycle's sensor burst read failed and the accel/gyro
/// fields are zero-filled.
pub const FLAG_SENSOR_FAULT: u16 = 0x0001;

/// Byte-wise XOR over `bytes`.
pub fn checksum_xor(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, &b| acc ^ b)
}

/// One serialized 49-byte telemetry frame, ready to transmit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryFrame {
    bytes: [u8; FRAME_LEN],
}

impl TelemetryFrame {
    /// Serialize a frame from one acquisition cycle's data.
    ///
    /// Pure function of its inputs: identical inputs produce byte-identical
    /// frames on any host, because every field is written little-endian
    /// explicitly rather than through native layout.
    pub fn build(time_ms: u32, ticks: [i32; Wheel::COUNT], sample: &SensorSample) -> Self {
        fn put(buf: &mut [u8; FRAME_LEN], off: &mut usize, field: &[u8]) {
            buf[*off..*off + field.len()].copy_from_slice(field);
            *off += field.len();
        }

        let mut bytes = [0u8; FRAME_LEN];
        bytes[0] = HEADER[0];
        bytes[1] = HEADER[1];

        let mut off = 2;
        put(&mut bytes, &mut off, &time_ms.to_le_bytes());
        for t in ticks {
            put(&mut bytes, &mut off, &t.to_le_bytes());
        }
        for v in [
            sample.accel.x,
            sample.accel.y,
            sample.accel.z,
            sample.gyro.x,
            sample.gyro.y,
            sample.gyro.z,
        ] {
            put(&mut bytes, &mut off, &v.to_le_bytes());
        }
        let flags: u16 = if sample.valid { 0 } else { FLAG_SENSOR_FAULT };
        put(&mut bytes, &mut off, &flags.to_le_bytes());
        debug_assert_eq!(off, 2 + PAYLOAD_LEN);

        bytes[FRAME_LEN - 1] = checksum_xor(&bytes[2..2 + PAYLOAD_LEN]);
        Self { bytes }
    }

    /// The full frame, header and checksum included.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }

    /// The 46 payload bytes.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.bytes[2..2 + PAYLOAD_LEN]
    }

    #[inline]
    pub fn checksum(&self) -> u8 {
        self.bytes[FRAME_LEN - 1]
    }
}
