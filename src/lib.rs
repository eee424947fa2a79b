// SPDX-License-Identifier: MIT

//! # Rovertel Firmware Core
//!
//! Acquisition-and-framing pipeline for a four-wheel rover telemetry node:
//! four interrupt-decoded quadrature encoders plus an MPU-9250 inertial
//! sensor, combined into a fixed-rate binary stream for an external
//! vehicle-state estimator.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | Encoder decode state, millisecond tick clock, serial link, phase-pin capability traits |
//! | [`drivers`] | Device-level driver for the MPU-9250 inertial sensor |
//! | [`protocol`] | Binary telemetry frame layout, checksum, and receiver-side parser |
//! | [`control`] | Startup calibration and the 100 Hz acquisition loop |
//!
//! ## Board integration
//!
//! The crate never touches registers. Board support supplies
//! [`embedded_hal`] I2C/delay/pin implementations, an
//! [`embedded_hal_nb::serial::Write`] transmitter, edge-interrupt delivery
//! for the encoder pins, and a 1 ms tick interrupt. The interrupt handlers
//! forward into [`hw::EncoderBank::on_edge`] and [`hw::TickClock::tick`];
//! everything else runs from `main` through [`control::Acquisition::run`].
//!
//! ## Getting Started
//!
//! Build docs:
//!
//! ```bash
//! cargo doc --no-deps --open
//! ```
//!
//! Run the host-side test suite:
//!
//! ```bash
//! cargo test
//! ```

#![cfg_attr(not(test), no_std)]

pub mod control;
pub mod drivers;
pub mod hw;
pub mod protocol;
