//! Register map definitions for the ADNS-3000 and ADNS-9500 sensors.

use modular_bitfield::prelude::*;

use crate::params::{MotionReporting, Resolution};

/// A 7-bit register address.
///
/// The bus protocol reserves the high bit of the address byte to mark a
/// write; construction masks it off so callers can never smuggle it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reg(u8);

impl Reg {
    /// Wraps a raw register address, keeping only the low 7 bits.
    pub const fn new(addr: u8) -> Self {
        Self(addr & 0x7F)
    }

    /// Returns the raw address byte.
    pub const fn addr(self) -> u8 {
        self.0
    }
}

/// Register addresses of the ADNS-3000 (names match the datasheet).
pub mod adns3000 {
    /// Product ID.
    pub const REG_PROD_ID: u8 = 0x00;
    /// Revision ID.
    pub const REG_REV_ID: u8 = 0x01;
    /// Motion status.
    pub const REG_MOTION_ST: u8 = 0x02;
    /// Lower byte of delta X.
    pub const REG_DELTA_X: u8 = 0x03;
    /// Lower byte of delta Y.
    pub const REG_DELTA_Y: u8 = 0x04;
    /// Surface quality.
    pub const REG_SQUAL: u8 = 0x05;
    /// Shutter open time, upper byte.
    pub const REG_SHUT_HI: u8 = 0x06;
    /// Shutter open time, lower byte.
    pub const REG_SHUT_LO: u8 = 0x07;
    /// Maximum pixel value.
    pub const REG_PIX_MAX: u8 = 0x08;
    /// Average pixel value.
    pub const REG_PIX_ACCUM: u8 = 0x09;
    /// Minimum pixel value.
    pub const REG_PIX_MIN: u8 = 0x0A;
    /// Pixel grabber.
    pub const REG_PIX_GRAB: u8 = 0x0B;
    /// Upper 4 bits of delta X and delta Y.
    pub const REG_DELTA_XY_HIGH: u8 = 0x0C;
    /// Mouse control.
    pub const REG_MOUSE_CTRL: u8 = 0x0D;
    /// Run to rest1 time.
    pub const REG_RUN_DOWNSHIFT: u8 = 0x0E;
    /// Rest1 period.
    pub const REG_REST1_PERIOD: u8 = 0x0F;
    /// Rest1 to rest2 time.
    pub const REG_REST1_DOWNSHIFT: u8 = 0x10;
    /// Rest2 period.
    pub const REG_REST2_PERIOD: u8 = 0x11;
    /// Rest2 to rest3 time.
    pub const REG_REST2_DOWNSHIFT: u8 = 0x12;
    /// Rest3 period.
    pub const REG_REST3_PERIOD: u8 = 0x13;
    /// Performance.
    pub const REG_PERFORMANCE: u8 = 0x22;
    /// Reset.
    pub const REG_RESET: u8 = 0x3A;
    /// Inverted revision ID.
    pub const REG_NOT_REV_ID: u8 = 0x3F;
    /// LED control.
    pub const REG_LED_CTRL: u8 = 0x40;
    /// Motion control.
    pub const REG_MOTION_CTRL: u8 = 0x41;
    /// Burst read starting register.
    pub const REG_BURST_READ_FIRST: u8 = 0x42;
    /// Rest mode configuration.
    pub const REG_REST_MODE_CONFIG: u8 = 0x45;
    /// Burst read.
    pub const REG_MOTION_BURST: u8 = 0x63;
}

/// Register addresses of the ADNS-9500 (names match the datasheet).
pub mod adns9500 {
    /// Product ID, reads 0x33.
    pub const REG_PRODUCT_ID: u8 = 0x00;
    /// Revision ID.
    pub const REG_REVISION_ID: u8 = 0x01;
    /// Motion status.
    pub const REG_MOTION: u8 = 0x02;
    /// Delta X, lower byte.
    pub const REG_DELTA_X_L: u8 = 0x03;
    /// Delta X, upper byte.
    pub const REG_DELTA_X_H: u8 = 0x04;
    /// Delta Y, lower byte.
    pub const REG_DELTA_Y_L: u8 = 0x05;
    /// Delta Y, upper byte.
    pub const REG_DELTA_Y_H: u8 = 0x06;
    /// Surface quality.
    pub const REG_SQUAL: u8 = 0x07;
    /// Pixel sum.
    pub const REG_PIXEL_SUM: u8 = 0x08;
    /// Maximum pixel value.
    pub const REG_MAXIMUM_PIXEL: u8 = 0x09;
    /// Minimum pixel value.
    pub const REG_MINIMUM_PIXEL: u8 = 0x0A;
    /// Shutter open time, lower byte.
    pub const REG_SHUTTER_LOWER: u8 = 0x0B;
    /// Shutter open time, upper byte.
    pub const REG_SHUTTER_UPPER: u8 = 0x0C;
    /// Frame period, lower byte.
    pub const REG_FRAME_PERIOD_LOWER: u8 = 0x0D;
    /// Frame period, upper byte.
    pub const REG_FRAME_PERIOD_UPPER: u8 = 0x0E;
    /// Configuration I.
    pub const REG_CONFIGURATION_I: u8 = 0x0F;
    /// Configuration II.
    pub const REG_CONFIGURATION_II: u8 = 0x10;
    /// Frame capture trigger.
    pub const REG_FRAME_CAPTURE: u8 = 0x12;
    /// SROM enable.
    pub const REG_SROM_ENABLE: u8 = 0x13;
    /// Run downshift.
    pub const REG_RUN_DOWNSHIFT: u8 = 0x14;
    /// Rest1 rate.
    pub const REG_REST1_RATE: u8 = 0x15;
    /// Rest1 downshift.
    pub const REG_REST1_DOWNSHIFT: u8 = 0x16;
    /// Rest2 rate.
    pub const REG_REST2_RATE: u8 = 0x17;
    /// Rest2 downshift.
    pub const REG_REST2_DOWNSHIFT: u8 = 0x18;
    /// Rest3 rate.
    pub const REG_REST3_RATE: u8 = 0x19;
    /// Frame period max bound, lower byte.
    pub const REG_FRAME_PERIOD_MAX_BOUND_LOWER: u8 = 0x1A;
    /// Frame period max bound, upper byte.
    pub const REG_FRAME_PERIOD_MAX_BOUND_UPPER: u8 = 0x1B;
    /// Frame period min bound, lower byte.
    pub const REG_FRAME_PERIOD_MIN_BOUND_LOWER: u8 = 0x1C;
    /// Frame period min bound, upper byte.
    pub const REG_FRAME_PERIOD_MIN_BOUND_UPPER: u8 = 0x1D;
    /// Shutter max bound, lower byte.
    pub const REG_SHUTTER_MAX_BOUND_LOWER: u8 = 0x1E;
    /// Shutter max bound, upper byte.
    pub const REG_SHUTTER_MAX_BOUND_UPPER: u8 = 0x1F;
    /// Laser control.
    pub const REG_LASER_CTRL0: u8 = 0x20;
    /// Observation.
    pub const REG_OBSERVATION: u8 = 0x24;
    /// Data out, lower byte.
    pub const REG_DATA_OUT_LOWER: u8 = 0x25;
    /// Data out, upper byte.
    pub const REG_DATA_OUT_UPPER: u8 = 0x26;
    /// SROM ID.
    pub const REG_SROM_ID: u8 = 0x2A;
    /// Lift detection threshold.
    pub const REG_LIFT_DETECTION_THR: u8 = 0x2E;
    /// Configuration V.
    pub const REG_CONFIGURATION_V: u8 = 0x2F;
    /// Configuration IV.
    pub const REG_CONFIGURATION_IV: u8 = 0x39;
    /// Power-up reset.
    pub const REG_POWER_UP_RESET: u8 = 0x3A;
    /// Shutdown.
    pub const REG_SHUTDOWN: u8 = 0x3B;
    /// Inverse product ID, reads 0xCC.
    pub const REG_INVERSE_PRODUCT_ID: u8 = 0x3F;
    /// Motion burst.
    pub const REG_MOTION_BURST: u8 = 0x50;
    /// SROM load burst.
    pub const REG_SROM_LOAD_BURST: u8 = 0x62;
    /// Pixel burst.
    pub const REG_PIXEL_BURST: u8 = 0x64;
}

/// Sentinel written to the reset register to force a power-up reset.
pub const RESET_SENTINEL: u8 = 0x5A;

/// Expected ADNS-9500 product identification byte.
pub const ADNS9500_PRODUCT_ID: u8 = 0x33;

/// Bitfield representation of the motion status register.
///
/// Bit 7 flags that motion occurred since the last read; bit 0 flags that
/// the first captured pixel is available during frame capture.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionStatus {
    // First captured pixel available (bit 0).
    pub pixel_first: bool,
    #[skip]
    __: B6,
    // Motion occurred since the last report (bit 7).
    pub motion: bool,
}

impl From<u8> for MotionStatus {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<MotionStatus> for u8 {
    fn from(value: MotionStatus) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the ADNS-3000 `MOUSE_CTRL` register.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseControl {
    #[skip]
    __: B2,
    // Tracking resolution selection (bits 4:2).
    pub resolution: Resolution,
    // Resolution settings take effect only while this bit is set (bit 5).
    pub resolution_enable: bool,
    #[skip]
    __: B1,
    // Motion reporting width selection (bit 7).
    pub motion_reporting: MotionReporting,
}

impl From<u8> for MouseControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<MouseControl> for u8 {
    fn from(value: MouseControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the ADNS-9500 `LASER_CTRL0` register.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaserControl {
    // Forces the laser off regardless of operating mode (bit 0).
    pub force_disable: bool,
    #[skip]
    __: B7,
}

impl From<u8> for LaserControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<LaserControl> for u8 {
    fn from(value: LaserControl) -> Self {
        value.into_bytes()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reg_masks_write_bit() {
        assert_eq!(Reg::new(0xE3).addr(), 0x63);
        assert_eq!(Reg::new(0x3A).addr(), 0x3A);
    }

    /// Validates the control byte against the documented 2000 dpi, 12-bit
    /// power-on configuration.
    #[test]
    fn mouse_control_layout_matches_datasheet() {
        let control = MouseControl::new()
            .with_resolution(Resolution::Dpi2000)
            .with_resolution_enable(true)
            .with_motion_reporting(MotionReporting::Bits12);
        assert_eq!(u8::from(control), 0xB8);

        let decoded = MouseControl::from(0xB8);
        assert_eq!(decoded.resolution(), Resolution::Dpi2000);
        assert!(decoded.resolution_enable());
        assert_eq!(decoded.motion_reporting(), MotionReporting::Bits12);
    }

    #[test]
    fn motion_status_flags() {
        let status = MotionStatus::from(0x80);
        assert!(status.motion());
        assert!(!status.pixel_first());

        let status = MotionStatus::from(0x01);
        assert!(!status.motion());
        assert!(status.pixel_first());
    }

    #[test]
    fn laser_control_roundtrip() {
        let laser = LaserControl::from(0x01);
        assert!(laser.force_disable());
        assert_eq!(u8::from(laser.with_force_disable(false)), 0x00);
    }
}
