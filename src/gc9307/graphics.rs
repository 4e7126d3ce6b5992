//! embedded-graphics drawing straight onto the panel
//!
//! There is no frame buffer: pixels and rectangles turn into windowed blits
//! immediately. Solid and contiguous fills stay a single window, arbitrary
//! pixel iterators cost one window per pixel.

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, OriginDimensions, Size};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::primitives::{PointsIter, Rectangle};
use embedded_graphics::Pixel;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::gc9307::color::Rgba;
use crate::gc9307::driver::Gc9307;
use crate::gc9307::error::Error;

impl<SPI, DC, RST, CS, BL, DELAY> OriginDimensions for Gc9307<SPI, DC, RST, CS, BL, DELAY> {
    fn size(&self) -> Size {
        let (w, h) = Gc9307::size(self);
        Size::new(u32::from(w), u32::from(h))
    }
}

impl<SPI, DC, RST, CS, BL, DELAY> DrawTarget for Gc9307<SPI, DC, RST, CS, BL, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    CS: OutputPin,
    BL: OutputPin,
    DELAY: DelayNs,
{
    type Color = Rgb888;
    type Error = Error<SPI::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.into())?;
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let inside = area.intersection(&self.bounding_box()) == *area;
        let count = area.size.width as usize * area.size.height as usize;
        if !inside || count == 0 {
            return self.draw_iter(
                area.points()
                    .zip(colors)
                    .map(|(point, color)| Pixel(point, color)),
            );
        }

        let buffer: Vec<Rgba> = colors.into_iter().take(count).map(Rgba::from).collect();
        if buffer.len() < count {
            // short iterator, draw what we got
            for (point, color) in area.points().zip(buffer) {
                self.set_pixel(point.x, point.y, color)?;
            }
            return Ok(());
        }
        self.fill_rect_with_buffer(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
            &buffer,
        )
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.size.width == 0 || area.size.height == 0 {
            return Ok(());
        }
        self.fill_rect(
            area.top_left.x,
            area.top_left.y,
            area.size.width as i32,
            area.size.height as i32,
            color.into(),
        )
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_screen(color.into())
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::PrimitiveStyle;

    use crate::gc9307::cmd::Cmd;
    use crate::gc9307::config::Config;
    use crate::gc9307::mock::Rig;

    use super::*;

    fn small() -> Config {
        Config {
            width: 6,
            height: 4,
            ..Config::default()
        }
    }

    #[test]
    fn test_bounding_box_follows_rotation() {
        let rig = Rig::new();
        let mut dev = rig.configured(&small());
        assert_eq!(dev.bounding_box().size, Size::new(6, 4));
        dev.set_rotation(crate::gc9307::config::Rotation::Deg90)
            .unwrap();
        assert_eq!(dev.bounding_box().size, Size::new(4, 6));
    }

    #[test]
    fn test_styled_rectangle_is_one_window() {
        let rig = Rig::new();
        let mut dev = rig.configured(&small());

        Rectangle::new(Point::new(1, 1), Size::new(2, 2))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::WHITE))
            .draw(&mut dev)
            .unwrap();

        assert_eq!(rig.commands(), vec![Cmd::CASET, Cmd::RASET, Cmd::RAMWR]);
        assert_eq!(rig.pixel_writes(), vec![vec![0xFF; 8]]);
    }

    #[test]
    fn test_fill_solid_is_clipped() {
        let rig = Rig::new();
        let mut dev = rig.configured(&small());

        dev.fill_solid(&Rectangle::new(Point::new(4, -2), Size::new(10, 4)), Rgb888::WHITE)
            .unwrap();
        let writes = rig.writes();
        // columns 4..5, rows 0..1
        assert_eq!(writes[1], vec![0, 4, 0, 5]);
        assert_eq!(writes[3], vec![0, 0, 0, 1]);

        rig.clear();
        dev.fill_solid(&Rectangle::new(Point::new(10, 10), Size::new(3, 3)), Rgb888::WHITE)
            .unwrap();
        assert!(rig.events().is_empty());
    }

    #[test]
    fn test_pixels_outside_are_dropped() {
        let rig = Rig::new();
        let mut dev = rig.configured(&small());

        dev.draw_iter([
            Pixel(Point::new(-1, 0), Rgb888::RED),
            Pixel(Point::new(2, 3), Rgb888::BLACK),
            Pixel(Point::new(6, 0), Rgb888::RED),
        ])
        .unwrap();

        assert_eq!(rig.commands(), vec![Cmd::CASET, Cmd::RASET, Cmd::RAMWR]);
        assert_eq!(rig.pixel_writes(), vec![vec![0, 0]]);
    }

    #[test]
    fn test_contiguous_fill_uses_buffer() {
        let rig = Rig::new();
        let mut dev = rig.configured(&small());

        let colors = [Rgb888::WHITE, Rgb888::BLACK, Rgb888::BLACK, Rgb888::WHITE];
        dev.fill_contiguous(&Rectangle::new(Point::new(0, 0), Size::new(2, 2)), colors)
            .unwrap();

        assert_eq!(rig.commands(), vec![Cmd::CASET, Cmd::RASET, Cmd::RAMWR]);
        assert_eq!(
            rig.pixel_writes().concat(),
            vec![0xFF, 0xFF, 0, 0, 0, 0, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_contiguous_fill_clipped_per_pixel() {
        let rig = Rig::new();
        let mut dev = rig.configured(&small());

        // only (5, 3) of the 2x2 area is on screen
        let colors = [Rgb888::WHITE, Rgb888::RED, Rgb888::RED, Rgb888::RED];
        dev.fill_contiguous(&Rectangle::new(Point::new(5, 3), Size::new(2, 2)), colors)
            .unwrap();
        assert_eq!(rig.pixel_writes(), vec![vec![0xFF, 0xFF]]);
        assert_eq!(rig.writes()[1], vec![0, 5, 0, 5]);
    }

    #[test]
    fn test_contiguous_fill_short_iterator() {
        let rig = Rig::new();
        let mut dev = rig.configured(&small());

        dev.fill_contiguous(&Rectangle::new(Point::new(0, 0), Size::new(2, 2)), [Rgb888::WHITE])
            .unwrap();
        // one single-pixel window for the one color given
        assert_eq!(rig.commands(), vec![Cmd::CASET, Cmd::RASET, Cmd::RAMWR]);
        assert_eq!(rig.writes()[1], vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_clear_fills_screen() {
        let rig = Rig::new();
        let mut dev = rig.configured(&small());

        dev.clear(Rgb888::BLACK).unwrap();
        assert_eq!(rig.pixel_writes().concat(), vec![0; 6 * 4 * 2]);
    }
}
