//! GC9307 TFT Display Driver
//!
//! Used for the 1.47" 172x320 panel of the PCat handheld, wired to a Linux SPI
//! controller. Works with any [`embedded_hal`] 1.0 `SpiDevice` and output pins.
//!
//! ### Usage
//! There is no frame buffer. Every call addresses a window in the controller's
//! frame memory and streams pixels into it right away:
//!
//! 1. create the device with [`driver::Gc9307::new`] from an opened SPI device
//!    and the control lines
//! 1. bring the panel up once with [`driver::Gc9307::configure`]
//! 1. blit with `fill_rect`, `fill_rect_with_buffer` or `fill_rect_with_image`,
//!    or draw with [`embedded_graphics`] through the `DrawTarget` impl
//! 1. optionally call `sync` before a blit to start right after the blanking
//!    pause
//!

pub mod cmd;
pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod flag;
pub mod graphics;
pub mod interface;
pub mod pins;
pub mod probe;
pub mod sync;
pub mod transfer;

#[cfg(test)]
mod mock;
