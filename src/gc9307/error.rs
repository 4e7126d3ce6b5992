//! Driver error type
pub use display_interface::DisplayError;

/// Errors returned by the driver, generic over the SPI device error `E`.
///
/// Validation errors are raised before any line is toggled. Bus errors are
/// handed back exactly as the SPI device reported them.
#[derive(Debug, thiserror::Error)]
pub enum Error<E> {
    /// Rectangle is empty, negative or outside the rotated display area
    #[error("rectangle coordinates outside display area")]
    OutOfBounds,
    /// Pixel buffer length differs from width * height
    #[error("buffer length {actual} does not match rectangle size {expected}")]
    BufferSize {
        /// Pixels needed by the rectangle
        expected: usize,
        /// Pixels supplied
        actual: usize,
    },
    /// Image dimensions differ from the rectangle
    #[error("image dimensions {actual:?} do not match rectangle size {expected:?}")]
    ImageSize {
        /// Rectangle size (width, height)
        expected: (u32, u32),
        /// Image size (width, height)
        actual: (u32, u32),
    },
    /// SPI transfer failed
    #[error("bus transfer failed: {0:?}")]
    Bus(E),
    /// Data/command, chip-select or reset line could not be driven
    #[error("control line failed: {0:?}")]
    Pin(DisplayError),
    /// Backlight line could not be driven
    #[error("backlight line failed")]
    Backlight,
    /// The scanline counter did not reach the target before the deadline
    #[error("timed out waiting for scanline {0}")]
    SyncTimeout(u16),
}

impl<E> From<DisplayError> for Error<E> {
    fn from(e: DisplayError) -> Self {
        Error::Pin(e)
    }
}
