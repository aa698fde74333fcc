//! Register transaction layer: single read/write plus the decomposed
//! primitives burst windows are built from.
//!
//! A burst must be one continuous chip-select window; re-selecting between
//! reads would break the stream. The primitives here therefore come in two
//! flavors: whole transactions ([`RegisterDriver::read_register`],
//! [`RegisterDriver::write_register`]) that select and deselect internally,
//! and window pieces ([`RegisterDriver::burst_begin`] through
//! [`RegisterDriver::burst_end`]) whose pairing is the caller's obligation.
//! [`RegisterDriver::transaction`] scopes a window so that chip select is
//! released on every exit path.

use embedded_hal::delay::DelayNs;

use crate::interface::AdnsBus;
use crate::profile::BusTiming;
use crate::registers::Reg;

// High bit of the address byte marks a write sequence.
const WRITE_FLAG: u8 = 0x80;

/// Register access layer over a raw bus, owning the delay source and the
/// chip's settle/guard timing.
pub struct RegisterDriver<BUS, D> {
    bus: BUS,
    delay: D,
    timing: BusTiming,
}

impl<BUS, D> RegisterDriver<BUS, D>
where
    BUS: AdnsBus,
    D: DelayNs,
{
    /// Creates a new register driver with the given timing constants.
    pub fn new(bus: BUS, delay: D, timing: BusTiming) -> Self {
        Self { bus, delay, timing }
    }

    /// Consumes the driver and returns the owned bus and delay source.
    pub fn release(self) -> (BUS, D) {
        (self.bus, self.delay)
    }

    /// Provides mutable access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut BUS {
        &mut self.bus
    }

    /// Runs `f` inside one select window, deselecting on every exit path.
    ///
    /// If `f` fails, deselect is still attempted and `f`'s error wins.
    pub fn transaction<T, E, F>(&mut self, f: F) -> core::result::Result<T, E>
    where
        E: From<BUS::Error>,
        F: FnOnce(&mut Self) -> core::result::Result<T, E>,
    {
        self.bus.select()?;
        let result = f(self);
        let deselect = self.bus.deselect();
        let value = result?;
        deselect?;
        Ok(value)
    }

    /// Writes a single register.
    ///
    /// The chip offers no acknowledgment; the only observable effect is the
    /// register change itself.
    pub fn write_register(&mut self, reg: Reg, value: u8) -> core::result::Result<(), BUS::Error> {
        self.transaction(|rd| {
            rd.bus.transfer_byte(reg.addr() | WRITE_FLAG)?;
            rd.bus.transfer_byte(value)?;
            Ok(())
        })
    }

    /// Reads a single register, honoring the address-to-data settle time.
    pub fn read_register(&mut self, reg: Reg) -> core::result::Result<u8, BUS::Error> {
        self.transaction(|rd| rd.burst_read_register(reg, false))
    }

    /// Opens a burst window: selects the chip, sends the start address, and
    /// waits the settle time.
    ///
    /// Must be paired with [`RegisterDriver::burst_end`]. If the address
    /// transfer fails the chip is deselected before the error propagates.
    pub fn burst_begin(&mut self, reg: Reg) -> core::result::Result<(), BUS::Error> {
        self.bus.select()?;
        match self.bus.transfer_byte(reg.addr()) {
            Ok(_) => {
                self.delay.delay_us(self.timing.t_settle_us);
                Ok(())
            }
            Err(err) => {
                let _ = self.bus.deselect();
                Err(err)
            }
        }
    }

    /// Reads the next streamed byte inside an open burst window.
    pub fn burst_read_byte(&mut self, with_delay: bool) -> core::result::Result<u8, BUS::Error> {
        if with_delay {
            self.delay.delay_us(self.timing.t_settle_us);
        }
        self.bus.transfer_byte(0x00)
    }

    /// Re-addressed read inside an open window: sends `reg`, waits the
    /// settle time, then clocks out the data byte.
    ///
    /// `leading_delay` inserts an extra settle wait first, for chips that
    /// need recovery time between consecutive operations in one window.
    pub fn burst_read_register(
        &mut self,
        reg: Reg,
        leading_delay: bool,
    ) -> core::result::Result<u8, BUS::Error> {
        if leading_delay {
            self.delay.delay_us(self.timing.t_settle_us);
        }
        self.bus.transfer_byte(reg.addr())?;
        self.delay.delay_us(self.timing.t_settle_us);
        self.bus.transfer_byte(0x00)
    }

    /// Closes a burst window and blocks for the deselect guard time, after
    /// which the chip may legally be selected again.
    pub fn burst_end(&mut self) -> core::result::Result<(), BUS::Error> {
        self.bus.deselect()?;
        self.delay.delay_ns(self.timing.t_exit_ns);
        Ok(())
    }

    /// Blocks for the given number of microseconds.
    pub(crate) fn wait_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{RecordingDelay, ScriptedBus, ScriptedError};

    const TIMING: BusTiming = BusTiming {
        t_settle_us: 10,
        t_exit_ns: 250,
    };

    fn driver(replies: &[u8]) -> RegisterDriver<ScriptedBus<'_>, RecordingDelay> {
        RegisterDriver::new(ScriptedBus::new(replies), RecordingDelay::new(), TIMING)
    }

    #[test]
    fn read_register_selects_once_and_waits_settle_time() {
        let mut driver = driver(&[0xAA, 0x5A]);

        let value = driver.read_register(Reg::new(0x05)).unwrap();
        assert_eq!(value, 0x5A);

        let (bus, delay) = driver.release();
        assert_eq!(bus.selects, 1);
        assert_eq!(bus.deselects, 1);
        assert_eq!(bus.written(), &[0x05, 0x00]);
        assert_eq!(delay.total_ns, 10_000);
    }

    #[test]
    fn write_register_sets_write_flag() {
        let mut driver = driver(&[0x00, 0x00]);

        driver.write_register(Reg::new(0x0D), 0xB8).unwrap();

        let (bus, delay) = driver.release();
        assert_eq!(bus.selects, 1);
        assert_eq!(bus.deselects, 1);
        assert_eq!(bus.written(), &[0x8D, 0xB8]);
        assert_eq!(delay.total_ns, 0);
    }

    #[test]
    fn burst_window_streams_without_readdressing() {
        let mut driver = driver(&[0x00, 0x11, 0x22, 0x33]);

        driver.burst_begin(Reg::new(0x63)).unwrap();
        assert_eq!(driver.burst_read_byte(false).unwrap(), 0x11);
        assert_eq!(driver.burst_read_byte(true).unwrap(), 0x22);
        assert_eq!(driver.burst_read_byte(false).unwrap(), 0x33);
        driver.burst_end().unwrap();

        let (bus, delay) = driver.release();
        assert_eq!(bus.selects, 1);
        assert_eq!(bus.deselects, 1);
        assert_eq!(bus.written(), &[0x63, 0x00, 0x00, 0x00]);
        // Settle after the address, settle before the second read, and the
        // deselect guard.
        assert_eq!(delay.total_ns, 10_000 + 10_000 + 250);
    }

    #[test]
    fn transaction_deselects_when_the_body_fails() {
        let mut bus = ScriptedBus::new(&[0x00]);
        bus.fail_after = Some(1);
        let mut driver = RegisterDriver::new(bus, RecordingDelay::new(), TIMING);

        let result = driver.read_register(Reg::new(0x02));
        assert_eq!(result, Err(ScriptedError));

        let (bus, _) = driver.release();
        assert_eq!(bus.selects, 1);
        assert_eq!(bus.deselects, 1);
        assert!(!bus.selected);
    }

    #[test]
    fn burst_begin_deselects_when_addressing_fails() {
        let mut bus = ScriptedBus::new(&[]);
        bus.fail_after = Some(0);
        let mut driver = RegisterDriver::new(bus, RecordingDelay::new(), TIMING);

        assert_eq!(driver.burst_begin(Reg::new(0x50)), Err(ScriptedError));

        let (bus, _) = driver.release();
        assert_eq!(bus.selects, 1);
        assert_eq!(bus.deselects, 1);
        assert!(!bus.selected);
    }
}
