//! SPI interface implementation built on `embedded-hal` `SpiBus` plus an
//! externally supplied chip-select pin.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::AdnsBus;

/// Error raised by [`SpiInterface`], keeping bus and pin failures distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<SpiE, PinE> {
    /// Error from the underlying SPI bus.
    Spi(SpiE),
    /// Error from the chip-select pin.
    Pin(PinE),
}

/// SPI-based interface implementation for the ADNS driver.
pub struct SpiInterface<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiInterface<SPI, CS> {
    /// Creates a new interface from the provided SPI bus and chip-select pin.
    ///
    /// The pin is expected to start deasserted (high); the electrical setup
    /// of the bus (mode 3, MSB first, clock rate) is the caller's concern.
    pub const fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Provides mutable access to the wrapped SPI bus.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned bus and pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> AdnsBus for SpiInterface<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    type Error = BusError<SPI::Error, CS::Error>;

    fn select(&mut self) -> core::result::Result<(), Self::Error> {
        self.cs.set_low().map_err(BusError::Pin)
    }

    fn deselect(&mut self) -> core::result::Result<(), Self::Error> {
        // Deferred writes must hit the wire before the window closes.
        self.spi.flush().map_err(BusError::Spi)?;
        self.cs.set_high().map_err(BusError::Pin)
    }

    fn transfer_byte(&mut self, out: u8) -> core::result::Result<u8, Self::Error> {
        let mut read = [0u8; 1];
        self.spi
            .transfer(&mut read, &[out])
            .map_err(BusError::Spi)?;
        Ok(read[0])
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::AdnsBus;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use std::vec;

    #[test]
    fn select_transfer_deselect_sequence() {
        let spi_expectations = [
            SpiTransaction::transfer(vec![0x63], vec![0xA5]),
            SpiTransaction::transfer(vec![0x00], vec![0x42]),
            SpiTransaction::flush(),
        ];
        let pin_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let spi = SpiMock::new(&spi_expectations);
        let cs = PinMock::new(&pin_expectations);
        let mut interface = SpiInterface::new(spi, cs);

        interface.select().unwrap();
        assert_eq!(interface.transfer_byte(0x63).unwrap(), 0xA5);
        assert_eq!(interface.transfer_byte(0x00).unwrap(), 0x42);
        interface.deselect().unwrap();

        let (mut spi, mut cs) = interface.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn transfer_returns_exchanged_byte() {
        let spi_expectations = [SpiTransaction::transfer(vec![0x5A], vec![0xC3])];
        let spi = SpiMock::new(&spi_expectations);
        let cs = PinMock::new(&[]);
        let mut interface = SpiInterface::new(spi, cs);

        assert_eq!(interface.transfer_byte(0x5A).unwrap(), 0xC3);

        let (mut spi, mut cs) = interface.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn deselect_flushes_before_raising_pin() {
        let spi_expectations = [SpiTransaction::flush()];
        let pin_expectations = [PinTransaction::set(PinState::High)];
        let spi = SpiMock::new(&spi_expectations);
        let cs = PinMock::new(&pin_expectations);
        let mut interface = SpiInterface::new(spi, cs);

        interface.deselect().unwrap();

        let (mut spi, mut cs) = interface.release();
        spi.done();
        cs.done();
    }
}
