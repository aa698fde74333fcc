//! Strongly typed parameter enumerations for the ADNS driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the register bitfields. Prefer these
//! types over raw integers to keep configuration values valid and explicit.

use modular_bitfield::prelude::Specifier;

/// Tracking resolution selections for the ADNS-3000 mouse-control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum Resolution {
    /// 1000 counts per inch.
    Dpi1000 = 0b000,
    /// 250 counts per inch.
    Dpi250 = 0b001,
    /// 500 counts per inch.
    Dpi500 = 0b010,
    /// 1250 counts per inch.
    Dpi1250 = 0b011,
    /// 1500 counts per inch.
    Dpi1500 = 0b100,
    /// 1750 counts per inch.
    Dpi1750 = 0b101,
    /// 2000 counts per inch.
    Dpi2000 = 0b110,
}

impl Resolution {
    /// Returns the resolution in counts per inch.
    pub const fn dpi(self) -> u16 {
        match self {
            Self::Dpi250 => 250,
            Self::Dpi500 => 500,
            Self::Dpi1000 => 1_000,
            Self::Dpi1250 => 1_250,
            Self::Dpi1500 => 1_500,
            Self::Dpi1750 => 1_750,
            Self::Dpi2000 => 2_000,
        }
    }
}

/// Motion reporting width selection (`MOUSE_CTRL` bit 7 on the ADNS-3000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum MotionReporting {
    /// One signed byte per axis.
    Bits8 = 0,
    /// Two signed 12-bit values sharing a high byte.
    Bits12 = 1,
}
