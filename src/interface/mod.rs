//! Bus interface abstraction for the ADNS driver.

pub mod spi;

/// Abstraction over the low-level bus access required by the driver.
///
/// The driver controls chip select explicitly because burst windows keep the
/// chip selected across many logical operations, interleaved with hardware
/// delays and data-dependent retries. Implementations enforce no timing of
/// their own; all delays are inserted by the caller.
pub trait AdnsBus {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Asserts chip select.
    fn select(&mut self) -> core::result::Result<(), Self::Error>;

    /// Deasserts chip select.
    fn deselect(&mut self) -> core::result::Result<(), Self::Error>;

    /// Exchanges one byte full duplex.
    ///
    /// The chip shifts a byte out on every exchange, including the address
    /// phase, where the returned byte carries no meaning and is discarded by
    /// callers.
    fn transfer_byte(&mut self, out: u8) -> core::result::Result<u8, Self::Error>;
}
