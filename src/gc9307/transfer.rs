//! Batched pixel streaming
//!
//! Every blit validates the rectangle, arms the window and then streams
//! `w * h` pixels in batches. The batch size comes from the [`Strategy`] picked
//! once in `configure`; the same loop serves solid fills, pixel buffers and
//! images, only the per-pixel lookup differs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::gc9307::color::{write_pixel, Rgba};
use crate::gc9307::driver::Gc9307;
use crate::gc9307::error::Error;

/// Blit path, fixed for the lifetime of a configured device
#[derive(Debug)]
pub(crate) enum Strategy {
    /// One batch per longest display edge
    Chunked { batch: usize, scratch: Vec<u8> },
    /// Larger batches for DMA backed SPI controllers
    Bulk { batch: usize, scratch: Vec<u8> },
}

impl Strategy {
    /// Transfer limit of the DMA backed path, in bytes
    pub(crate) const BULK_MAX_TRANSFER: usize = 65536;
    const BULK_FACTOR: usize = 4;

    pub(crate) fn chunked(batch_length: usize) -> Self {
        Strategy::Chunked {
            batch: batch_length,
            scratch: vec![0; batch_length * 2],
        }
    }

    /// Bulk batches are clamped so one write never exceeds `max_transfer` bytes
    pub(crate) fn bulk(batch_length: usize, max_transfer: usize) -> Self {
        let mut batch = batch_length * Self::BULK_FACTOR;
        if max_transfer > 0 {
            batch = batch.min(max_transfer / 2);
        }
        Strategy::Bulk {
            batch,
            scratch: vec![0; batch * 2],
        }
    }

    pub(crate) fn batch(&self) -> usize {
        match self {
            Strategy::Chunked { batch, .. } | Strategy::Bulk { batch, .. } => *batch,
        }
    }

    fn parts(&mut self) -> (usize, &mut [u8]) {
        match self {
            Strategy::Chunked { batch, scratch } | Strategy::Bulk { batch, scratch } => {
                (*batch, scratch.as_mut_slice())
            }
        }
    }
}

/// Linear pixel lookup for the blit loop
pub(crate) trait PixelSource {
    fn pixel(&self, index: usize) -> Rgba;
}

struct Solid(Rgba);

impl PixelSource for Solid {
    #[inline]
    fn pixel(&self, _index: usize) -> Rgba {
        self.0
    }
}

impl PixelSource for [Rgba] {
    #[inline]
    fn pixel(&self, index: usize) -> Rgba {
        self[index]
    }
}

/// Borrowed RGBA8 image, four bytes per pixel, rows `stride` bytes apart
#[derive(Debug, Clone, Copy)]
pub struct RgbaImage<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
}

impl<'a> RgbaImage<'a> {
    /// Tightly packed image; `None` if `data` is too short
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Option<Self> {
        Self::with_stride(data, width, height, width as usize * 4)
    }

    /// Image with padded rows; `None` if `data` is too short or rows overlap
    pub fn with_stride(data: &'a [u8], width: u32, height: u32, stride: usize) -> Option<Self> {
        let row = width as usize * 4;
        if stride < row {
            return None;
        }
        let needed = match height {
            0 => 0,
            h => stride * (h as usize - 1) + row,
        };
        if data.len() < needed {
            return None;
        }
        Some(RgbaImage {
            data,
            width,
            height,
            stride,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at column `x`, row `y`
    pub fn pixel_at(&self, x: u32, y: u32) -> Rgba {
        let i = y as usize * self.stride + x as usize * 4;
        Rgba::new(self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3])
    }
}

impl PixelSource for RgbaImage<'_> {
    #[inline]
    fn pixel(&self, index: usize) -> Rgba {
        let width = self.width as usize;
        self.pixel_at((index % width) as u32, (index / width) as u32)
    }
}

/// Pixel count of an inclusive span, `None` if it does not fit an `i32`
fn line_span(from: i32, to: i32) -> Option<i32> {
    i32::try_from(i64::from(to) - i64::from(from) + 1).ok()
}

impl<SPI, DC, RST, CS, BL, DELAY> Gc9307<SPI, DC, RST, CS, BL, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    CS: OutputPin,
    BL: OutputPin,
    DELAY: DelayNs,
{
    /// Check a rectangle against the rotated display size
    fn check_rect(&self, x: i32, y: i32, w: i32, h: i32) -> Result<(u16, u16, u16, u16), Error<SPI::Error>> {
        let (width, height) = self.size();
        if x < 0 || y < 0 || w <= 0 || h <= 0 {
            return Err(Error::OutOfBounds);
        }
        if i64::from(x) + i64::from(w) > i64::from(width) || i64::from(y) + i64::from(h) > i64::from(height) {
            return Err(Error::OutOfBounds);
        }
        // all four fit in the display size, which is a u16
        Ok((x as u16, y as u16, w as u16, h as u16))
    }

    /// Stream `count` pixels into the armed window
    fn blit<S>(&mut self, count: usize, source: &S) -> Result<(), Error<SPI::Error>>
    where
        S: PixelSource + ?Sized,
    {
        let order = self.color_order;
        let (batch, scratch) = self.strategy.parts();

        let mut remaining = count;
        let mut offset = 0;
        while remaining > 0 {
            let n = remaining.min(batch);
            let bytes = &mut scratch[..n * 2];
            for (i, slot) in bytes.chunks_exact_mut(2).enumerate() {
                write_pixel(slot, source.pixel(offset + i), order);
            }
            self.interface.data(bytes)?;
            remaining -= n;
            offset += n;
        }
        Ok(())
    }

    /// Fill a rectangle with one color
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) -> Result<(), Error<SPI::Error>> {
        let (x, y, w, h) = self.check_rect(x, y, w, h)?;
        self.set_window(x, y, w, h)?;
        self.blit(usize::from(w) * usize::from(h), &Solid(color))
    }

    /// Fill a rectangle from a row-major pixel buffer of exactly `w * h` pixels
    pub fn fill_rect_with_buffer(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        buffer: &[Rgba],
    ) -> Result<(), Error<SPI::Error>> {
        let (x, y, w, h) = self.check_rect(x, y, w, h)?;
        let expected = usize::from(w) * usize::from(h);
        if buffer.len() != expected {
            return Err(Error::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        self.set_window(x, y, w, h)?;
        self.blit(expected, buffer)
    }

    /// Fill a rectangle from an image of exactly `w` by `h` pixels
    pub fn fill_rect_with_image(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        image: &RgbaImage<'_>,
    ) -> Result<(), Error<SPI::Error>> {
        let (x, y, w, h) = self.check_rect(x, y, w, h)?;
        if image.width() != u32::from(w) || image.height() != u32::from(h) {
            return Err(Error::ImageSize {
                expected: (u32::from(w), u32::from(h)),
                actual: (image.width(), image.height()),
            });
        }
        self.set_window(x, y, w, h)?;
        self.blit(usize::from(w) * usize::from(h), image)
    }

    /// Fill the whole screen with a color
    pub fn fill_screen(&mut self, color: Rgba) -> Result<(), Error<SPI::Error>> {
        let (w, h) = self.size();
        self.fill_rect(0, 0, i32::from(w), i32::from(h), color)
    }

    /// Set a single pixel, ignoring coordinates outside the screen
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) -> Result<(), Error<SPI::Error>> {
        let (w, h) = self.size();
        if x < 0 || y < 0 || x >= i32::from(w) || y >= i32::from(h) {
            return Ok(());
        }
        self.fill_rect(x, y, 1, 1, color)
    }

    /// Draw a vertical line between two rows, inclusive
    pub fn draw_fast_vline(&mut self, x: i32, y0: i32, y1: i32, color: Rgba) -> Result<(), Error<SPI::Error>> {
        let (top, bottom) = if y0 > y1 { (y1, y0) } else { (y0, y1) };
        let h = line_span(top, bottom).ok_or(Error::OutOfBounds)?;
        self.fill_rect(x, top, 1, h, color)
    }

    /// Draw a horizontal line between two columns, inclusive
    pub fn draw_fast_hline(&mut self, x0: i32, x1: i32, y: i32, color: Rgba) -> Result<(), Error<SPI::Error>> {
        let (left, right) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
        let w = line_span(left, right).ok_or(Error::OutOfBounds)?;
        self.fill_rect(left, y, w, 1, color)
    }
}
