//! Driver for GC9307 TFT panels on a Linux SPI bus
//!
//! See [`gc9307`] for the driver itself. The crate root re-exports what a
//! typical caller needs.
#![deny(missing_docs)]
#![allow(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod gc9307;

pub use crate::gc9307::cmd::Cmd;
pub use crate::gc9307::color::{pack, unpack, ColorOrder, Rgba};
pub use crate::gc9307::config::{
    Config, FrameRate, Rotation, TransferMode, DEFAULT_VSYNC_SCANLINES, MAX_VSYNC_SCANLINES,
    MIN_VSYNC_SCANLINES,
};
pub use crate::gc9307::driver::Gc9307;
pub use crate::gc9307::error::{DisplayError, Error};
pub use crate::gc9307::flag::Flag;
pub use crate::gc9307::interface::NoPin;
pub use crate::gc9307::pins::Pins;
pub use crate::gc9307::probe::{
    DmaChannelProbe, FileMarker, InitMarker, NoAcceleration, NoMarker, ProbeError, TransferProbe,
    DEFAULT_MARKER_PATH,
};
pub use crate::gc9307::transfer::RgbaImage;
