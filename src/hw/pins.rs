// SPDX-License-Identifier: MIT

//! Encoder input capabilities supplied by the board-support layer.
//!
//! The acquisition loop needs exactly two things from the encoder wiring:
//! the live 2-bit phase of each wheel (to seed the decoders before
//! interrupts start) and a switch to turn edge-interrupt delivery on. Both
//! sit behind [`EncoderInputs`] so the loop can run against simulated inputs
//! on the host.

use embedded_hal::digital::InputPin;

use crate::hw::encoder::Wheel;

/// Board-side view of the four encoders.
pub trait EncoderInputs {
    /// Read the wheel's current 2-bit phase from its channel pins.
    fn phase(&mut self, wheel: Wheel) -> u8;

    /// Unmask edge-interrupt delivery for all encoder pins.
    ///
    /// Called exactly once, after calibration and after the initial phases
    /// have been captured.
    fn enable_interrupts(&mut self);
}

/// A quadrature channel pair read as a 2-bit phase (A is bit 1, B is bit 0).
///
/// Convenience for board code: the same `read` serves the edge handlers and
/// the [`EncoderInputs::phase`] implementation.
pub struct PhasePair<A, B> {
    a: A,
    b: B,
}

impl<A: InputPin, B: InputPin> PhasePair<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    /// Sample both channels. A pin read error is treated as a low level.
    pub fn read(&mut self) -> u8 {
        let a = self.a.is_high().unwrap_or(false);
        let b = self.b.is_high().unwrap_or(false);
        (u8::from(a) << 1) | u8::from(b)
    }

    /// Release the pins.
    pub fn free(self) -> (A, B) {
        (self.a, self.b)
    }
}
