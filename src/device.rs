//! High-level ADNS device driver implementation.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::burst::{self, MotionSample};
use crate::config::Config;
use crate::decode::{decode_12bit_pair, decode_16bit, decode_8bit, fuse_u16};
use crate::error::{Error, Result};
use crate::frame::{self, PixelFrame};
use crate::interface::spi::SpiInterface;
use crate::interface::AdnsBus;
use crate::params::{MotionReporting, Resolution};
use crate::profile::{ChipProfile, DeltaRegisters};
use crate::regio::RegisterDriver;
use crate::registers::{MotionStatus, MouseControl};

/// High-level synchronous driver for one ADNS sensor.
///
/// The driver is single owner of the bus; callers running from multiple
/// contexts must serialize access externally. Every operation blocks for the
/// hardware-mandated delays of the selected chip.
pub struct Adns<BUS, D> {
    regs: RegisterDriver<BUS, D>,
    profile: ChipProfile,
    config: Config,
}

impl<BUS, D> Adns<BUS, D>
where
    BUS: AdnsBus,
    D: DelayNs,
{
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a driver from a bus, a delay source, and a chip profile.
    pub fn new(bus: BUS, delay: D, profile: ChipProfile, config: Config) -> Self {
        Self {
            regs: RegisterDriver::new(bus, delay, profile.timing),
            profile,
            config,
        }
    }

    /// Convenience constructor for an ADNS-3000 with the given motion
    /// reporting width.
    pub fn adns3000(bus: BUS, delay: D, reporting: MotionReporting, config: Config) -> Self {
        Self::new(bus, delay, ChipProfile::adns3000(reporting), config)
    }

    /// Convenience constructor for an ADNS-9500.
    pub fn adns9500(bus: BUS, delay: D, config: Config) -> Self {
        Self::new(bus, delay, ChipProfile::adns9500(), config)
    }

    /// Consumes the driver and returns the owned bus and delay source.
    pub fn release(self) -> (BUS, D) {
        self.regs.release()
    }

    /// Provides mutable access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut BUS {
        self.regs.bus_mut()
    }

    /// Returns the chip profile this driver was built with.
    pub fn profile(&self) -> &ChipProfile {
        &self.profile
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================================================================
    // == Initialization & Identification ===============================
    // ==================================================================
    /// Initializes the sensor using the current configuration.
    ///
    /// Chips with a mouse-control register get their tracking resolution and
    /// motion reporting width programmed; the reporting width always follows
    /// the profile's delta layout so decoding stays consistent with what the
    /// chip streams.
    pub fn init(&mut self) -> Result<(), BUS::Error> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        if let Some(mouse_control) = self.profile.registers.mouse_control
            && let Some(reporting) = self.reporting_width()
        {
            let control = MouseControl::new()
                .with_resolution(self.config.resolution)
                .with_resolution_enable(true)
                .with_motion_reporting(reporting);
            self.regs
                .write_register(mouse_control, u8::from(control))
                .map_err(Error::from)?;
        }

        Ok(())
    }

    /// Reads the product identification register, verifying it against the
    /// profile's documented value where one exists.
    pub fn check_product_id(&mut self) -> Result<u8, BUS::Error> {
        let id = self
            .regs
            .read_register(self.profile.registers.product_id)
            .map_err(Error::from)?;

        if let Some(expected) = self.profile.product_id
            && id != expected
        {
            return Err(Error::DeviceIdMismatch);
        }

        Ok(id)
    }

    /// Reprograms the tracking resolution, preserving the reporting width.
    ///
    /// Fails with [`Error::InvalidConfig`] on chips without a mouse-control
    /// register.
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<(), BUS::Error> {
        let (Some(mouse_control), Some(reporting)) =
            (self.profile.registers.mouse_control, self.reporting_width())
        else {
            return Err(Error::InvalidConfig);
        };

        let control = MouseControl::new()
            .with_resolution(resolution)
            .with_resolution_enable(true)
            .with_motion_reporting(reporting);
        self.regs
            .write_register(mouse_control, u8::from(control))
            .map_err(Error::from)?;

        self.config.resolution = resolution;
        Ok(())
    }

    // ==================================================================
    // == Motion Readout ================================================
    // ==================================================================
    /// Whether motion was detected since the last readout, meaning fresh
    /// delta values are latched and ready.
    pub fn has_moved(&mut self) -> Result<bool, BUS::Error> {
        let status = self
            .regs
            .read_register(self.profile.registers.motion_status)
            .map_err(Error::from)?;
        Ok(MotionStatus::from(status).motion())
    }

    /// Reads the motion deltas register by register inside one select
    /// window, decoding them according to the profile's bit-width mode.
    pub fn read_motion(&mut self) -> Result<(i16, i16), BUS::Error> {
        match self.profile.delta {
            DeltaRegisters::LowOnly { x_low, y_low } => self.regs.transaction(|rd| {
                let xl = rd.burst_read_register(x_low, false)?;
                let yl = rd.burst_read_register(y_low, true)?;
                Ok((decode_8bit(xl), decode_8bit(yl)))
            }),
            DeltaRegisters::SharedHigh {
                x_low,
                y_low,
                xy_high,
            } => self.regs.transaction(|rd| {
                let xl = rd.burst_read_register(x_low, false)?;
                let yl = rd.burst_read_register(y_low, true)?;
                let high = rd.burst_read_register(xy_high, false)?;
                Ok(decode_12bit_pair(xl, yl, high))
            }),
            DeltaRegisters::Split {
                x_low,
                x_high,
                y_low,
                y_high,
            } => self.regs.transaction(|rd| {
                let xl = rd.burst_read_register(x_low, false)?;
                let xh = rd.burst_read_register(x_high, true)?;
                let yl = rd.burst_read_register(y_low, true)?;
                let yh = rd.burst_read_register(y_high, true)?;
                Ok((decode_16bit(xl, xh), decode_16bit(yl, yh)))
            }),
        }
    }

    /// Reads the shutter open time as two single-register reads.
    pub fn read_shutter(&mut self) -> Result<u16, BUS::Error> {
        let high = self
            .regs
            .read_register(self.profile.registers.shutter_high)
            .map_err(Error::from)?;
        let low = self
            .regs
            .read_register(self.profile.registers.shutter_low)
            .map_err(Error::from)?;
        Ok(fuse_u16(high, low))
    }

    /// Streams one burst and returns the decoded sample.
    pub fn read_burst(&mut self) -> Result<MotionSample, BUS::Error> {
        burst::read_burst(&mut self.regs, &self.profile).map_err(Error::from)
    }

    // ==================================================================
    // == Frame Capture =================================================
    // ==================================================================
    /// Captures one full pixel frame into `buffer`, which must be exactly
    /// [`ChipProfile::frame`]'s length.
    ///
    /// The chip is left in capture mode; call
    /// [`Adns::end_frame_capture`] before resuming motion tracking.
    pub fn capture_frame<'a>(&mut self, buffer: &'a mut [u8]) -> Result<PixelFrame<'a>, BUS::Error> {
        frame::capture(
            &mut self.regs,
            &self.profile,
            self.config.pixel_retry_limit,
            buffer,
        )
    }

    /// Leaves capture mode and restores normal motion tracking.
    ///
    /// The capture sequence resets the chip, so configuration written by
    /// [`Adns::init`] (resolution, reporting width) must be applied again
    /// afterwards.
    pub fn end_frame_capture(&mut self) -> Result<(), BUS::Error> {
        frame::end_capture(&mut self.regs, &self.profile)
    }

    /// Pixels per captured frame for this chip.
    pub fn frame_length(&self) -> usize {
        self.profile.frame.frame_len
    }

    fn reporting_width(&self) -> Option<MotionReporting> {
        match self.profile.delta {
            DeltaRegisters::LowOnly { .. } => Some(MotionReporting::Bits8),
            DeltaRegisters::SharedHigh { .. } => Some(MotionReporting::Bits12),
            DeltaRegisters::Split { .. } => None,
        }
    }
}

impl<SPI, CS, D> Adns<SpiInterface<SPI, CS>, D>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    D: DelayNs,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for SPI transports.
    pub fn new_spi(spi: SPI, cs: CS, delay: D, profile: ChipProfile, config: Config) -> Self {
        Self::new(SpiInterface::new(spi, cs), delay, profile, config)
    }

    /// Releases the driver, returning the SPI bus, pin, and delay source.
    pub fn release_spi(self) -> (SPI, CS, D) {
        let (iface, delay) = self.release();
        let (spi, cs) = iface.release();
        (spi, cs, delay)
    }
}
