// SPDX-License-Identifier: MIT

//! # Acquisition Control
//!
//! Top-level orchestration: one-time sensor bring-up and gyro calibration,
//! then the fixed-period sample-frame-transmit loop.
//!
//! ## Modules
//!
//! - [`acquisition`] - startup state machine and the 100 Hz loop body.

pub mod acquisition;

pub use acquisition::{Acquisition, State};
