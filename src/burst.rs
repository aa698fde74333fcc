//! Burst sampling: one continuous select window streaming the chip's fixed
//! telemetry field list without re-sending addresses.
//!
//! A burst walks idle, selected, streaming, and back to idle. Entering the
//! selected state addresses the burst register; the ADNS-9500 additionally
//! requires one full frame period before the first byte is valid. Streaming
//! reads exactly the field list the profile declares, in its declared order.
//! Returning to idle closes the window and honors the deselect guard time,
//! so a subsequent burst can select again immediately.

use embedded_hal::delay::DelayNs;

use crate::decode::{decode_12bit_pair, decode_16bit, decode_8bit, fuse_u16};
use crate::interface::AdnsBus;
use crate::profile::{BurstField, ChipProfile, DeltaRegisters};
use crate::regio::RegisterDriver;
use crate::registers::MotionStatus;

/// One decoded motion report.
///
/// `dx`/`dy` are bounded by the profile's bit-width mode. Optional fields are
/// populated only when the chip's burst stream carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionSample {
    /// Relative motion along X.
    pub dx: i16,
    /// Relative motion along Y.
    pub dy: i16,
    /// Surface quality.
    pub surface_quality: u8,
    /// Shutter open time.
    pub shutter: u16,
    /// Motion-detected flag from the streamed status byte.
    pub motion_flag: Option<bool>,
    /// Raw observation byte.
    pub observation: Option<u8>,
    /// Maximum pixel value.
    pub pixel_max: Option<u8>,
    /// Minimum pixel value.
    pub pixel_min: Option<u8>,
    /// Pixel sum.
    pub pixel_sum: Option<u8>,
    /// Average pixel value.
    pub pixel_accum: Option<u8>,
    /// Frame period.
    pub frame_period: Option<u16>,
}

/// Raw field bytes captured during streaming, local to one invocation.
#[derive(Default)]
struct RawBurst {
    motion: Option<u8>,
    observation: Option<u8>,
    x_low: Option<u8>,
    x_high: Option<u8>,
    y_low: Option<u8>,
    y_high: Option<u8>,
    xy_high: Option<u8>,
    squal: Option<u8>,
    shutter_high: Option<u8>,
    shutter_low: Option<u8>,
    pixel_max: Option<u8>,
    pixel_min: Option<u8>,
    pixel_sum: Option<u8>,
    pixel_accum: Option<u8>,
    frame_period_high: Option<u8>,
    frame_period_low: Option<u8>,
}

/// Runs one complete burst and decodes the stream into a [`MotionSample`].
pub(crate) fn read_burst<BUS, D>(
    regs: &mut RegisterDriver<BUS, D>,
    profile: &ChipProfile,
) -> core::result::Result<MotionSample, BUS::Error>
where
    BUS: AdnsBus,
    D: DelayNs,
{
    regs.burst_begin(profile.registers.motion_burst)?;
    if profile.burst_frame_wait {
        regs.wait_us(profile.frame_period_us);
    }

    let streamed = stream_fields(regs, profile.burst_fields);
    let ended = regs.burst_end();
    let raw = streamed?;
    ended?;

    Ok(assemble(&raw, profile))
}

/// Reads every declared field, in order, with no further address bytes.
fn stream_fields<BUS, D>(
    regs: &mut RegisterDriver<BUS, D>,
    fields: &[BurstField],
) -> core::result::Result<RawBurst, BUS::Error>
where
    BUS: AdnsBus,
    D: DelayNs,
{
    let mut raw = RawBurst::default();
    for field in fields {
        let byte = regs.burst_read_byte(false)?;
        let slot = match field {
            BurstField::Motion => &mut raw.motion,
            BurstField::Observation => &mut raw.observation,
            BurstField::XLow => &mut raw.x_low,
            BurstField::XHigh => &mut raw.x_high,
            BurstField::YLow => &mut raw.y_low,
            BurstField::YHigh => &mut raw.y_high,
            BurstField::XyHigh => &mut raw.xy_high,
            BurstField::SurfaceQuality => &mut raw.squal,
            BurstField::ShutterHigh => &mut raw.shutter_high,
            BurstField::ShutterLow => &mut raw.shutter_low,
            BurstField::PixelMax => &mut raw.pixel_max,
            BurstField::PixelMin => &mut raw.pixel_min,
            BurstField::PixelSum => &mut raw.pixel_sum,
            BurstField::PixelAccum => &mut raw.pixel_accum,
            BurstField::FramePeriodHigh => &mut raw.frame_period_high,
            BurstField::FramePeriodLow => &mut raw.frame_period_low,
        };
        *slot = Some(byte);
    }
    Ok(raw)
}

/// Decodes the raw bytes into a sample using the profile's delta layout.
fn assemble(raw: &RawBurst, profile: &ChipProfile) -> MotionSample {
    let (dx, dy) = match profile.delta {
        DeltaRegisters::LowOnly { .. } => (
            decode_8bit(raw.x_low.unwrap_or(0)),
            decode_8bit(raw.y_low.unwrap_or(0)),
        ),
        DeltaRegisters::SharedHigh { .. } => decode_12bit_pair(
            raw.x_low.unwrap_or(0),
            raw.y_low.unwrap_or(0),
            raw.xy_high.unwrap_or(0),
        ),
        DeltaRegisters::Split { .. } => (
            decode_16bit(raw.x_low.unwrap_or(0), raw.x_high.unwrap_or(0)),
            decode_16bit(raw.y_low.unwrap_or(0), raw.y_high.unwrap_or(0)),
        ),
    };

    MotionSample {
        dx,
        dy,
        surface_quality: raw.squal.unwrap_or(0),
        shutter: fuse_u16(raw.shutter_high.unwrap_or(0), raw.shutter_low.unwrap_or(0)),
        motion_flag: raw.motion.map(|byte| MotionStatus::from(byte).motion()),
        observation: raw.observation,
        pixel_max: raw.pixel_max,
        pixel_min: raw.pixel_min,
        pixel_sum: raw.pixel_sum,
        pixel_accum: raw.pixel_accum,
        frame_period: match (raw.frame_period_high, raw.frame_period_low) {
            (Some(high), Some(low)) => Some(fuse_u16(high, low)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MotionReporting;
    use crate::testutil::{RecordingDelay, ScriptedBus};

    fn driver<'a>(
        replies: &'a [u8],
        profile: &ChipProfile,
    ) -> RegisterDriver<ScriptedBus<'a>, RecordingDelay> {
        RegisterDriver::new(ScriptedBus::new(replies), RecordingDelay::new(), profile.timing)
    }

    #[test]
    fn burst_8bit_decodes_low_bytes() {
        let profile = ChipProfile::adns3000(MotionReporting::Bits8);
        // Address-phase byte, then x, y, squal, shutter pair, pixel pair.
        let replies = [0xFF, 0x05, 0xFB, 0x42, 0x4E, 0x20, 0x7F, 0x33];
        let mut regs = driver(&replies, &profile);

        let sample = read_burst(&mut regs, &profile).unwrap();
        assert_eq!(sample.dx, 5);
        assert_eq!(sample.dy, -5);
        assert_eq!(sample.surface_quality, 0x42);
        assert_eq!(sample.shutter, 0x4E20);
        assert_eq!(sample.pixel_max, Some(0x7F));
        assert_eq!(sample.pixel_accum, Some(0x33));
        assert_eq!(sample.motion_flag, None);
        assert_eq!(sample.pixel_min, None);
        assert_eq!(sample.pixel_sum, None);
        assert_eq!(sample.frame_period, None);

        let (bus, _) = regs.release();
        assert_eq!(bus.selects, 1);
        assert_eq!(bus.deselects, 1);
        assert_eq!(bus.written(), &[0x63, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn burst_12bit_decodes_shared_high_byte() {
        let profile = ChipProfile::adns3000(MotionReporting::Bits12);
        let replies = [0xFF, 0x01, 0x02, 0x20, 0x42, 0x00, 0x80, 0x7F, 0x33];
        let mut regs = driver(&replies, &profile);

        let sample = read_burst(&mut regs, &profile).unwrap();
        assert_eq!(sample.dx, 513);
        assert_eq!(sample.dy, 2);
        assert_eq!(sample.shutter, 0x0080);

        let (bus, _) = regs.release();
        assert_eq!(bus.written_total, 1 + profile.burst_fields.len());
    }

    #[test]
    fn burst_16bit_streams_full_telemetry() {
        let profile = ChipProfile::adns9500();
        let replies = [
            0xFF, // address phase
            0x80, 0x12, // motion, observation
            0x34, 0x12, 0xFF, 0xFF, // x pair, y pair
            0x55, 0x10, 0x7F, 0x01, // squal, pixel sum/max/min
            0x4E, 0x20, // shutter
            0x5D, 0xC0, // frame period
        ];
        let mut regs = driver(&replies, &profile);

        let sample = read_burst(&mut regs, &profile).unwrap();
        assert_eq!(sample.dx, 0x1234);
        assert_eq!(sample.dy, -1);
        assert_eq!(sample.motion_flag, Some(true));
        assert_eq!(sample.observation, Some(0x12));
        assert_eq!(sample.surface_quality, 0x55);
        assert_eq!(sample.pixel_sum, Some(0x10));
        assert_eq!(sample.pixel_max, Some(0x7F));
        assert_eq!(sample.pixel_min, Some(0x01));
        assert_eq!(sample.shutter, 0x4E20);
        assert_eq!(sample.frame_period, Some(0x5DC0));
        assert_eq!(sample.pixel_accum, None);

        let (bus, delay) = regs.release();
        assert_eq!(bus.selects, 1);
        assert_eq!(bus.deselects, 1);
        assert_eq!(bus.written_total, 15);
        // Address settle, one frame period before streaming, deselect guard.
        assert_eq!(delay.total_ns, 100_000 + 85_000 + 500);
    }

    #[test]
    fn burst_never_terminates_early_on_field_values() {
        for profile in [
            ChipProfile::adns3000(MotionReporting::Bits8),
            ChipProfile::adns3000(MotionReporting::Bits12),
            ChipProfile::adns9500(),
        ] {
            let mut regs = driver(&[], &profile);
            read_burst(&mut regs, &profile).unwrap();

            let (bus, _) = regs.release();
            assert_eq!(bus.written_total, 1 + profile.burst_fields.len());
            assert_eq!(bus.selects, 1);
            assert_eq!(bus.deselects, 1);
        }
    }
}
