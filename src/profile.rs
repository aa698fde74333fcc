//! Per-chip constants: timing, register maps, burst layout, and frame
//! capture parameters.
//!
//! A [`ChipProfile`] is plain data built once when the driver is created and
//! immutable afterwards. All variant-specific behavior in the protocol code
//! is driven by these values; there is no per-chip dispatch anywhere else.

use crate::params::MotionReporting;
use crate::registers::{adns3000, adns9500, Reg};

/// Number of pixels in one ADNS-3000 frame (22 x 22).
pub const ADNS3000_FRAME_PIXELS: usize = 484;

/// Number of pixels in one ADNS-9500 frame (30 x 30).
pub const ADNS9500_FRAME_PIXELS: usize = 900;

/// Bus timing constants the chip mandates around register access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusTiming {
    /// Minimum wait between sending an address and reading valid data, in
    /// microseconds.
    pub t_settle_us: u32,
    /// Minimum wait after deselecting before the chip may be selected again,
    /// in nanoseconds.
    pub t_exit_ns: u32,
}

/// Delta register layout, which doubles as the motion bit-width mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeltaRegisters {
    /// One signed byte per axis.
    LowOnly {
        /// Delta X low byte.
        x_low: Reg,
        /// Delta Y low byte.
        y_low: Reg,
    },
    /// Signed 12-bit axes whose top nibbles share one high byte.
    SharedHigh {
        /// Delta X low byte.
        x_low: Reg,
        /// Delta Y low byte.
        y_low: Reg,
        /// Shared high byte, X in bits 7:4 and Y in bits 3:0.
        xy_high: Reg,
    },
    /// Signed 16-bit axes with independent high and low bytes.
    Split {
        /// Delta X low byte.
        x_low: Reg,
        /// Delta X high byte.
        x_high: Reg,
        /// Delta Y low byte.
        y_low: Reg,
        /// Delta Y high byte.
        y_high: Reg,
    },
}

/// Non-delta registers the protocols need, by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterMap {
    /// Product identification.
    pub product_id: Reg,
    /// Motion status.
    pub motion_status: Reg,
    /// Surface quality.
    pub surface_quality: Reg,
    /// Shutter open time, upper byte.
    pub shutter_high: Reg,
    /// Shutter open time, lower byte.
    pub shutter_low: Reg,
    /// Burst read start.
    pub motion_burst: Reg,
    /// Power-up reset.
    pub reset: Reg,
    /// Mouse control (resolution and reporting width), where present.
    pub mouse_control: Option<Reg>,
    /// Laser control, where present.
    pub laser_control: Option<Reg>,
}

/// One field slot in a burst stream, in chip-declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BurstField {
    /// Motion status byte.
    Motion,
    /// Observation byte.
    Observation,
    /// Delta X low byte.
    XLow,
    /// Delta X high byte.
    XHigh,
    /// Delta Y low byte.
    YLow,
    /// Delta Y high byte.
    YHigh,
    /// Shared delta high byte (X bits 7:4, Y bits 3:0).
    XyHigh,
    /// Surface quality.
    SurfaceQuality,
    /// Shutter upper byte.
    ShutterHigh,
    /// Shutter lower byte.
    ShutterLow,
    /// Maximum pixel value.
    PixelMax,
    /// Minimum pixel value.
    PixelMin,
    /// Pixel sum.
    PixelSum,
    /// Average pixel value.
    PixelAccum,
    /// Frame period upper byte.
    FramePeriodHigh,
    /// Frame period lower byte.
    FramePeriodLow,
}

/// ADNS-3000 burst order in 8-bit reporting mode.
pub const ADNS3000_BURST_8BIT: &[BurstField] = &[
    BurstField::XLow,
    BurstField::YLow,
    BurstField::SurfaceQuality,
    BurstField::ShutterHigh,
    BurstField::ShutterLow,
    BurstField::PixelMax,
    BurstField::PixelAccum,
];

/// ADNS-3000 burst order in 12-bit reporting mode.
pub const ADNS3000_BURST_12BIT: &[BurstField] = &[
    BurstField::XLow,
    BurstField::YLow,
    BurstField::XyHigh,
    BurstField::SurfaceQuality,
    BurstField::ShutterHigh,
    BurstField::ShutterLow,
    BurstField::PixelMax,
    BurstField::PixelAccum,
];

/// ADNS-9500 burst order (fixed 14 bytes).
pub const ADNS9500_BURST: &[BurstField] = &[
    BurstField::Motion,
    BurstField::Observation,
    BurstField::XLow,
    BurstField::XHigh,
    BurstField::YLow,
    BurstField::YHigh,
    BurstField::SurfaceQuality,
    BurstField::PixelSum,
    BurstField::PixelMax,
    BurstField::PixelMin,
    BurstField::ShutterHigh,
    BurstField::ShutterLow,
    BurstField::FramePeriodHigh,
    BurstField::FramePeriodLow,
];

/// How pixel bytes are fetched during frame capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelAccess {
    /// The pixel register address is re-sent before every attempt.
    Readdressed,
    /// The address is sent once and pixel bytes stream continuously.
    Streamed,
}

/// Frame capture parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameCapture {
    /// Register armed to trigger a capture.
    pub arm_register: Reg,
    /// Bytes written to the arm register, in order.
    pub arm_sequence: &'static [u8],
    /// Register pixel bytes are read from.
    pub pixel_register: Reg,
    /// Addressing mode of the pixel read loop.
    pub access: PixelAccess,
    /// Pixels per frame.
    pub frame_len: usize,
}

/// Immutable constants for one physical chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipProfile {
    /// Settle and guard timing.
    pub timing: BusTiming,
    /// One exposure period, in microseconds.
    pub frame_period_us: u32,
    /// Delta register layout and motion bit width.
    pub delta: DeltaRegisters,
    /// Non-delta register roles.
    pub registers: RegisterMap,
    /// Burst stream field order.
    pub burst_fields: &'static [BurstField],
    /// Whether a burst must wait one frame period after addressing before
    /// the first byte is streamed.
    pub burst_frame_wait: bool,
    /// Frame capture parameters.
    pub frame: FrameCapture,
    /// Expected product identification byte, where documented.
    pub product_id: Option<u8>,
}

impl ChipProfile {
    /// Constants for the ADNS-3000 with the given motion reporting width.
    pub const fn adns3000(reporting: MotionReporting) -> Self {
        let delta = match reporting {
            MotionReporting::Bits8 => DeltaRegisters::LowOnly {
                x_low: Reg::new(adns3000::REG_DELTA_X),
                y_low: Reg::new(adns3000::REG_DELTA_Y),
            },
            MotionReporting::Bits12 => DeltaRegisters::SharedHigh {
                x_low: Reg::new(adns3000::REG_DELTA_X),
                y_low: Reg::new(adns3000::REG_DELTA_Y),
                xy_high: Reg::new(adns3000::REG_DELTA_XY_HIGH),
            },
        };
        let burst_fields = match reporting {
            MotionReporting::Bits8 => ADNS3000_BURST_8BIT,
            MotionReporting::Bits12 => ADNS3000_BURST_12BIT,
        };

        Self {
            timing: BusTiming {
                t_settle_us: 10,
                t_exit_ns: 250,
            },
            frame_period_us: 1_000,
            delta,
            registers: RegisterMap {
                product_id: Reg::new(adns3000::REG_PROD_ID),
                motion_status: Reg::new(adns3000::REG_MOTION_ST),
                surface_quality: Reg::new(adns3000::REG_SQUAL),
                shutter_high: Reg::new(adns3000::REG_SHUT_HI),
                shutter_low: Reg::new(adns3000::REG_SHUT_LO),
                motion_burst: Reg::new(adns3000::REG_MOTION_BURST),
                reset: Reg::new(adns3000::REG_RESET),
                mouse_control: Some(Reg::new(adns3000::REG_MOUSE_CTRL)),
                laser_control: None,
            },
            burst_fields,
            burst_frame_wait: false,
            frame: FrameCapture {
                arm_register: Reg::new(adns3000::REG_PIX_GRAB),
                // Any write resets the pixel pointer to the frame origin.
                arm_sequence: &[0x01],
                pixel_register: Reg::new(adns3000::REG_PIX_GRAB),
                access: PixelAccess::Readdressed,
                frame_len: ADNS3000_FRAME_PIXELS,
            },
            product_id: None,
        }
    }

    /// Constants for the ADNS-9500, which reports fixed 16-bit motion.
    pub const fn adns9500() -> Self {
        Self {
            timing: BusTiming {
                t_settle_us: 100,
                t_exit_ns: 500,
            },
            // One frame at the nominal 11750 frames per second.
            frame_period_us: 85,
            delta: DeltaRegisters::Split {
                x_low: Reg::new(adns9500::REG_DELTA_X_L),
                x_high: Reg::new(adns9500::REG_DELTA_X_H),
                y_low: Reg::new(adns9500::REG_DELTA_Y_L),
                y_high: Reg::new(adns9500::REG_DELTA_Y_H),
            },
            registers: RegisterMap {
                product_id: Reg::new(adns9500::REG_PRODUCT_ID),
                motion_status: Reg::new(adns9500::REG_MOTION),
                surface_quality: Reg::new(adns9500::REG_SQUAL),
                shutter_high: Reg::new(adns9500::REG_SHUTTER_UPPER),
                shutter_low: Reg::new(adns9500::REG_SHUTTER_LOWER),
                motion_burst: Reg::new(adns9500::REG_MOTION_BURST),
                reset: Reg::new(adns9500::REG_POWER_UP_RESET),
                mouse_control: None,
                laser_control: Some(Reg::new(adns9500::REG_LASER_CTRL0)),
            },
            burst_fields: ADNS9500_BURST,
            burst_frame_wait: true,
            frame: FrameCapture {
                arm_register: Reg::new(adns9500::REG_FRAME_CAPTURE),
                arm_sequence: &[0x93, 0xC5],
                pixel_register: Reg::new(adns9500::REG_PIXEL_BURST),
                access: PixelAccess::Streamed,
                frame_len: ADNS9500_FRAME_PIXELS,
            },
            product_id: Some(crate::registers::ADNS9500_PRODUCT_ID),
        }
    }
}
