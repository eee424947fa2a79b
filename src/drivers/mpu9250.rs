// SPDX-License-Identifier: MIT

//! MPU-9250 6-axis inertial sensor driver.
//!
//! Register-protocol driver over any [`embedded_hal::i2c::I2c`] bus:
//! configuration writes at startup, a one-time gyro-Z bias calibration, and
//! a 14-byte burst read per sample. Sample values are converted to m/s² and
//! rad/s using the fixed ±4 g / ±2000 dps full-scale factors configured in
//! [`Mpu9250::initialize`].
//!
//! The driver never retries a failed sample read; a bus fault is reported as
//! an invalid sample and the caller decides what to do with the gap.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// 7-bit bus address with AD0 strapped low.
pub const MPU9250_ADDR: u8 = 0x68;

// Register addresses
pub mod reg {
    pub const SMPLRT_DIV: u8 = 0x19;
    pub const CONFIG: u8 = 0x1A;
    pub const GYRO_CONFIG: u8 = 0x1B;
    pub const ACCEL_CONFIG: u8 = 0x1C;
    pub const ACCEL_CONFIG_2: u8 = 0x1D;
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const PWR_MGMT_1: u8 = 0x6B;
}

/// ±4 g full scale: 8192 LSB/g, reported in m/s².
pub const ACCEL_SCALE: f32 = 9.80665 / 8192.0;

/// ±2000 dps full scale: 16.4 LSB/(°/s), reported in rad/s. (π/180)/16.4.
pub const GYRO_SCALE: f32 = 0.001064225;

/// Delay between gyro bias calibration samples.
pub const CALIBRATION_SAMPLE_GAP_MS: u32 = 2;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
}

/// One converted sensor reading.
///
/// `valid` is false when the burst read failed; the axis values are zeroed
/// in that case and must not be interpreted.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSample {
    pub accel: Vector3,
    pub gyro: Vector3,
    pub valid: bool,
}

impl SensorSample {
    pub const INVALID: SensorSample = SensorSample {
        accel: Vector3::ZERO,
        gyro: Vector3::ZERO,
        valid: false,
    };
}

pub struct Mpu9250<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
    gyro_bias_z: f32,
}

impl<I2C: I2c, D: DelayNs> Mpu9250<I2C, D> {
    /// Driver at the default address. Call [`initialize`](Self::initialize)
    /// before sampling.
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_address(i2c, delay, MPU9250_ADDR)
    }

    /// Driver at an explicit address (0x69 with AD0 strapped high).
    pub fn with_address(i2c: I2C, delay: D, addr: u8) -> Self {
        Self {
            i2c,
            delay,
            addr,
            gyro_bias_z: 0.0,
        }
    }

    /// Wake the device and configure rate, filters, and full-scale ranges.
    ///
    /// A bus error aborts the sequence and is fatal to the caller; there is
    /// no chip-ID handshake, so a silently absent device is not detected
    /// beyond the bus-level NACK.
    pub fn initialize(&mut self) -> Result<(), I2C::Error> {
        self.write_reg(reg::PWR_MGMT_1, 0x01)?; // PLL clock source, wake
        self.delay.delay_ms(10);
        self.write_reg(reg::SMPLRT_DIV, 9)?; // 1 kHz / (1 + 9) = 100 Hz
        self.write_reg(reg::CONFIG, 0x03)?; // gyro DLPF ~44 Hz
        self.write_reg(reg::GYRO_CONFIG, 0x18)?; // ±2000 dps
        self.write_reg(reg::ACCEL_CONFIG, 0x08)?; // ±4 g
        self.write_reg(reg::ACCEL_CONFIG_2, 0x03)?; // accel DLPF
        self.delay.delay_ms(10);
        Ok(())
    }

    /// Average `sample_count` stationary gyro-Z readings into the bias that
    /// every later sample subtracts.
    ///
    /// The vehicle must be stationary for the whole window; that is an
    /// operational precondition, not something the driver can check. Failed
    /// reads contribute nothing to the sum but still count in the divisor.
    pub fn calibrate_gyro_bias(&mut self, sample_count: u16) -> f32 {
        let mut sum = 0.0f32;
        for _ in 0..sample_count {
            let sample = self.read_sample();
            if sample.valid {
                // Undo the active correction so recalibration stays absolute.
                sum += sample.gyro.z + self.gyro_bias_z;
            }
            self.delay.delay_ms(CALIBRATION_SAMPLE_GAP_MS);
        }
        self.gyro_bias_z = sum / f32::from(sample_count);
        self.gyro_bias_z
    }

    /// Currently applied gyro-Z bias, rad/s.
    #[inline]
    pub fn gyro_bias_z(&self) -> f32 {
        self.gyro_bias_z
    }

    /// Burst-read and convert one sample.
    ///
    /// One 14-byte read starting at ACCEL_XOUT_H: accel X/Y/Z, temperature
    /// (skipped), gyro X/Y/Z, each a big-endian register pair. A bus fault
    /// yields [`SensorSample::INVALID`]; the read is not retried.
    pub fn read_sample(&mut self) -> SensorSample {
        let buf: [u8; 14] = match self.read_burst(reg::ACCEL_XOUT_H) {
            Ok(buf) => buf,
            Err(_) => return SensorSample::INVALID,
        };

        let accel = Vector3 {
            x: f32::from(i16::from_be_bytes([buf[0], buf[1]])) * ACCEL_SCALE,
            y: f32::from(i16::from_be_bytes([buf[2], buf[3]])) * ACCEL_SCALE,
            z: f32::from(i16::from_be_bytes([buf[4], buf[5]])) * ACCEL_SCALE,
        };
        // buf[6..8] is the temperature register pair, unused here.
        let gyro = Vector3 {
            x: f32::from(i16::from_be_bytes([buf[8], buf[9]])) * GYRO_SCALE,
            y: f32::from(i16::from_be_bytes([buf[10], buf[11]])) * GYRO_SCALE,
            z: f32::from(i16::from_be_bytes([buf[12], buf[13]])) * GYRO_SCALE - self.gyro_bias_z,
        };

        SensorSample {
            accel,
            gyro,
            valid: true,
        }
    }

    /// Release the bus and delay provider.
    pub fn free(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.addr, &[reg, value])
    }

    fn read_burst<const N: usize>(&mut self, reg: u8) -> Result<[u8; N], I2C::Error> {
        let mut buf = [0u8; N];
        self.i2c.write_read(self.addr, &[reg], &mut buf)?;
        Ok(buf)
    }
}
