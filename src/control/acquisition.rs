// SPDX-License-Identifier: MIT

//! Acquisition loop: calibrate once, then sample/frame/transmit at 100 Hz.
//!
//! The loop owns the sensor bus and the serial link; the encoder bank is
//! shared with the edge-interrupt handlers and only ever read here, through
//! its bounded-critical-section snapshot. Scheduling busy-polls the
//! millisecond clock: a cycle runs only once ≥10 ms have elapsed since the
//! previous frame, and if a cycle overruns (for example a slow serial link)
//! the loop simply slides to the next boundary — frames are dropped, never
//! queued.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use embedded_hal_nb::serial::Write;

use crate::drivers::mpu9250::Mpu9250;
use crate::hw::clock::Clock;
use crate::hw::encoder::{EncoderBank, Wheel};
use crate::hw::pins::EncoderInputs;
use crate::hw::uart::SerialLink;
use crate::protocol::frame::TelemetryFrame;

/// Frame period: 100 Hz output rate.
pub const FRAME_PERIOD_MS: u32 = 10;

/// Gyro-Z samples averaged during startup calibration (~0.8 s at the 2 ms
/// calibration gap).
pub const CALIBRATION_SAMPLES: u16 = 400;

/// Acquisition lifecycle. There is no shutdown state; the device runs until
/// reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Uninitialized,
    Calibrating,
    Running,
}

pub struct Acquisition<'a, I2C, D, TX, C, P> {
    imu: Mpu9250<I2C, D>,
    link: SerialLink<TX>,
    clock: C,
    inputs: P,
    encoders: &'a EncoderBank,
    state: State,
    last_frame_ms: u32,
}

impl<'a, I2C, D, TX, C, P> Acquisition<'a, I2C, D, TX, C, P>
where
    I2C: I2c,
    D: DelayNs,
    TX: Write<u8>,
    C: Clock,
    P: EncoderInputs,
{
    pub fn new(
        imu: Mpu9250<I2C, D>,
        link: SerialLink<TX>,
        clock: C,
        inputs: P,
        encoders: &'a EncoderBank,
    ) -> Self {
        Self {
            imu,
            link,
            clock,
            inputs,
            encoders,
            state: State::Uninitialized,
            last_frame_ms: 0,
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Bring up the sensor, calibrate, and arm the encoders.
    ///
    /// On a sensor bring-up error the state stays `Uninitialized` and the
    /// error is returned; the caller is expected to halt (uncalibrated data
    /// is worse than silence). Encoder interrupts are enabled only at the
    /// very end, after each wheel's live phase has been captured, so the
    /// first decoded edge cannot produce a spurious delta.
    pub fn initialize(&mut self) -> Result<(), I2C::Error> {
        self.imu.initialize()?;
        self.state = State::Calibrating;

        let _bias = self.imu.calibrate_gyro_bias(CALIBRATION_SAMPLES);
        #[cfg(feature = "defmt")]
        defmt::info!("gyro-Z bias calibrated: {} rad/s", _bias);

        for wheel in Wheel::ALL {
            let phase = self.inputs.phase(wheel);
            self.encoders.capture_phase(wheel, phase);
        }
        self.inputs.enable_interrupts();

        self.last_frame_ms = self.clock.now_ms();
        self.state = State::Running;
        Ok(())
    }

    /// Run one scheduling check; emit at most one frame.
    ///
    /// Returns whether a frame was transmitted. Cycles where less than
    /// [`FRAME_PERIOD_MS`] has elapsed do no work.
    pub fn poll(&mut self) -> bool {
        if self.state != State::Running {
            return false;
        }
        let now = self.clock.now_ms();
        if now.wrapping_sub(self.last_frame_ms) < FRAME_PERIOD_MS {
            return false;
        }
        self.last_frame_ms = now;

        let ticks = self.encoders.snapshot();
        let sample = self.imu.read_sample();
        let frame = TelemetryFrame::build(now, ticks, &sample);
        self.link.write_all(frame.as_bytes());
        true
    }

    /// Initialize, then poll forever.
    ///
    /// Fail-stop: if sensor bring-up fails no frame is ever sent and the
    /// loop spins until reset.
    pub fn run(&mut self) -> ! {
        if self.initialize().is_err() {
            #[cfg(feature = "defmt")]
            defmt::error!("inertial sensor bring-up failed, halting");
            loop {
                core::hint::spin_loop();
            }
        }
        loop {
            self.poll();
        }
    }
}
