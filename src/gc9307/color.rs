//! RGB565 packing for the GC9307 frame memory
//!
//! The controller takes 16 bits per pixel (5 bits red, 6 bits green, 5 bits
//! blue), high byte first. Channels are truncated, not rounded, so callers
//! wanting dithering have to do it before handing pixels over.

use embedded_graphics::pixelcolor::{Rgb565, Rgb888, RgbColor};

/// A pixel with four 8-bit channels. Alpha is carried but never encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Rgba {
    /// Opaque black
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    /// Opaque white
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    /// Build a pixel from its four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Build an opaque pixel
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }
}

impl From<Rgb888> for Rgba {
    fn from(c: Rgb888) -> Self {
        Rgba::rgb(c.r(), c.g(), c.b())
    }
}

impl From<Rgb565> for Rgba {
    fn from(c: Rgb565) -> Self {
        Rgb888::from(c).into()
    }
}

/// Channel order of the packed 16-bit value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorOrder {
    /// Red in the top five bits
    Rgb,
    /// Blue in the top five bits
    #[default]
    Bgr,
}

/// Pack a pixel into the controller's 5-6-5 layout
#[inline]
pub fn pack(c: Rgba, order: ColorOrder) -> u16 {
    let r = (u16::from(c.r) >> 3) & 0x1F;
    let g = (u16::from(c.g) >> 2) & 0x3F;
    let b = (u16::from(c.b) >> 3) & 0x1F;
    match order {
        ColorOrder::Rgb => (r << 11) | (g << 5) | b,
        ColorOrder::Bgr => (b << 11) | (g << 5) | r,
    }
}

/// Expand a packed value back to 8 bits per channel.
///
/// Each channel lands on the middle of its quantization step, so the result is
/// within 4 of the original red/blue and within 2 of the original green.
pub fn unpack(value: u16, order: ColorOrder) -> Rgba {
    let hi = ((value >> 11) & 0x1F) as u8;
    let g = ((value >> 5) & 0x3F) as u8;
    let lo = (value & 0x1F) as u8;
    let (r, b) = match order {
        ColorOrder::Rgb => (hi, lo),
        ColorOrder::Bgr => (lo, hi),
    };
    Rgba::rgb((r << 3) | 0x04, (g << 2) | 0x02, (b << 3) | 0x04)
}

/// Pack a pixel straight into a two byte slot of the transfer buffer
#[inline]
pub(crate) fn write_pixel(slot: &mut [u8], c: Rgba, order: ColorOrder) {
    let [hi, lo] = pack(c, order).to_be_bytes();
    slot[0] = hi;
    slot[1] = lo;
}
