// SPDX-License-Identifier: MIT

//! Serial transmit link for the telemetry stream.
//!
//! Thin blocking wrapper over an [`embedded_hal_nb::serial::Write`]
//! transmitter: each byte spins on transmit-ready, bounded only by the
//! configured baud rate. There is no buffering or flow control on this path;
//! if the link is slower than the frame rate the acquisition loop simply
//! skips cycles.

use embedded_hal_nb::serial::Write;
use nb::block;

pub struct SerialLink<TX> {
    tx: TX,
}

impl<TX: Write<u8>> SerialLink<TX> {
    pub fn new(tx: TX) -> Self {
        Self { tx }
    }

    /// Send one byte, blocking on transmit-ready.
    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    /// Send a buffer byte-by-byte.
    pub fn write_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    /// Block until the hardware TX path is drained.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }

    /// Release the underlying transmitter.
    pub fn free(self) -> TX {
        self.tx
    }
}
