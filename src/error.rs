//! Error handling primitives for the ADNS driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// The product identification register did not match the expected value.
    DeviceIdMismatch,
    /// The caller-provided frame buffer does not match the chip's pixel count.
    FrameBufferSize,
    /// A pixel never reported valid data within the configured retry budget.
    CaptureTimeout,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
