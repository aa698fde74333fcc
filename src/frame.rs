//! Full-frame pixel capture.
//!
//! Capture is an exclusive chip mode: the sequence resets the chip, enables
//! imaging, arms the capture trigger, waits two frame periods, then drains
//! the pixel array. Each pixel byte carries a validity marker in bit 7; a
//! pixel is accepted only once that bit is set, and the marker is stripped
//! before the value is stored. The chip stays capture-biased afterwards, so
//! callers must run [`end_capture`] explicitly before resuming motion
//! tracking.

use embedded_hal::delay::DelayNs;

use crate::error::{Error, Result};
use crate::interface::AdnsBus;
use crate::profile::{ChipProfile, PixelAccess};
use crate::regio::RegisterDriver;
use crate::registers::{LaserControl, Reg, RESET_SENTINEL};

// Bit 7 marks fresh pixel data; the low seven bits are the intensity.
const PIXEL_VALID: u8 = 0x80;
const PIXEL_MAGNITUDE: u8 = 0x7F;

/// One captured pixel frame, borrowed from the caller's buffer.
///
/// The length always equals the profile's pixel count and every stored byte
/// has the validity bit stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelFrame<'a> {
    pixels: &'a [u8],
}

impl<'a> PixelFrame<'a> {
    /// Returns the pixel intensities in capture order.
    pub const fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    /// Number of pixels in the frame.
    pub const fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the frame holds no pixels.
    pub const fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Captures one full pixel frame into `buffer`.
///
/// `buffer` must be exactly the profile's frame length. Each pixel retries
/// up to `retry_limit` times before the capture aborts with
/// [`Error::CaptureTimeout`]; chip select is released on that path too.
pub(crate) fn capture<'a, BUS, D>(
    regs: &mut RegisterDriver<BUS, D>,
    profile: &ChipProfile,
    retry_limit: u16,
    buffer: &'a mut [u8],
) -> Result<PixelFrame<'a>, BUS::Error>
where
    BUS: AdnsBus,
    D: DelayNs,
{
    if buffer.len() != profile.frame.frame_len {
        return Err(Error::FrameBufferSize);
    }

    regs.write_register(profile.registers.reset, RESET_SENTINEL)?;
    if let Some(laser) = profile.registers.laser_control {
        write_laser_force_disabled(regs, laser, false)?;
    }
    for &byte in profile.frame.arm_sequence {
        regs.write_register(profile.frame.arm_register, byte)?;
    }
    regs.wait_us(2 * profile.frame_period_us);

    match profile.frame.access {
        PixelAccess::Readdressed => {
            let pixel = profile.frame.pixel_register;
            regs.transaction(|rd| {
                fill_pixels(rd, &mut buffer[..], retry_limit, |rd| {
                    rd.burst_read_register(pixel, false)
                })
            })?;
        }
        PixelAccess::Streamed => {
            regs.burst_begin(profile.frame.pixel_register)?;
            let filled = fill_pixels(regs, buffer, retry_limit, |rd| rd.burst_read_byte(false));
            let ended = regs.burst_end();
            filled?;
            ended?;
        }
    }

    Ok(PixelFrame { pixels: buffer })
}

/// Restores the chip from capture mode: reset, then force the laser back
/// off where the chip has laser control.
pub(crate) fn end_capture<BUS, D>(
    regs: &mut RegisterDriver<BUS, D>,
    profile: &ChipProfile,
) -> Result<(), BUS::Error>
where
    BUS: AdnsBus,
    D: DelayNs,
{
    regs.write_register(profile.registers.reset, RESET_SENTINEL)?;
    if let Some(laser) = profile.registers.laser_control {
        write_laser_force_disabled(regs, laser, true)?;
    }
    Ok(())
}

/// Read-modify-write of the laser force-disable bit.
pub(crate) fn write_laser_force_disabled<BUS, D>(
    regs: &mut RegisterDriver<BUS, D>,
    reg: Reg,
    force_disabled: bool,
) -> core::result::Result<(), BUS::Error>
where
    BUS: AdnsBus,
    D: DelayNs,
{
    let current = regs.read_register(reg)?;
    let updated = u8::from(LaserControl::from(current).with_force_disable(force_disabled));
    if updated != current {
        regs.write_register(reg, updated)?;
    }
    Ok(())
}

/// Accepts one valid byte per pixel slot, retrying invalid reads up to the
/// per-pixel budget.
fn fill_pixels<BUS, D, F>(
    regs: &mut RegisterDriver<BUS, D>,
    buffer: &mut [u8],
    retry_limit: u16,
    mut read: F,
) -> Result<(), BUS::Error>
where
    BUS: AdnsBus,
    D: DelayNs,
    F: FnMut(&mut RegisterDriver<BUS, D>) -> core::result::Result<u8, BUS::Error>,
{
    for slot in buffer.iter_mut() {
        let mut accepted = None;
        for _ in 0..retry_limit {
            let byte = read(regs)?;
            if byte & PIXEL_VALID != 0 {
                accepted = Some(byte & PIXEL_MAGNITUDE);
                break;
            }
        }
        match accepted {
            Some(pixel) => *slot = pixel,
            None => return Err(Error::CaptureTimeout),
        }
    }
    Ok(())
}
