//! Throughput benchmark for the PCat display
//!
//! Brings the panel up, draws color bars and then pans a generated pattern
//! through the center half of the screen, logging frames per second.
//!
//! Environment:
//! - `PCAT_DISPLAY_BULK=0` skips the DMA probe and stays on chunked transfers
//! - `PCAT_BENCH_SECONDS` benchmark duration, 30 by default
//! - `PCAT_BENCH_VSYNC=1` waits for the blanking pause before every frame
//! - `RUST_LOG` log filter, `info` by default

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    bench::run()
}

#[cfg(not(target_os = "linux"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("the display benchmark needs spidev and the GPIO character device of Linux")
}

#[cfg(target_os = "linux")]
mod bench {
    use std::thread::sleep;
    use std::time::{Duration, Instant};

    use anyhow::Context;
    use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_graphics::text::Text;
    use linux_embedded_hal::{
        gpio_cdev::{Chip, LineRequestFlags},
        spidev::{SpiModeFlags, SpidevOptions},
        CdevPin, Delay, SpidevDevice,
    };

    use pcat_display::{
        Config, DmaChannelProbe, Error, FileMarker, Gc9307, NoAcceleration, NoPin, Pins, Rgba,
        Rotation, TransferMode, TransferProbe, MAX_VSYNC_SCANLINES,
    };

    type Display = Gc9307<SpidevDevice, CdevPin, CdevPin, NoPin, CdevPin, Delay>;

    const DEFAULT_SECONDS: u64 = 30;
    /// Roughly 60 frames per second
    const FRAME_BUDGET: Duration = Duration::from_millis(16);
    /// Upper bound for one vsync wait, a frame at 39 Hz is about 26 ms
    const SYNC_TIMEOUT: Duration = Duration::from_millis(50);
    /// Side of the generated pattern tile
    const TILE: usize = 64;
    /// The tile repeats this many times in each direction
    const GRID_SIZE: usize = 3;

    /// True unless the variable is set to something falsy
    fn env_flag(name: &str, default: bool) -> bool {
        match std::env::var(name) {
            Ok(v) => !matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "" | "0" | "false" | "no" | "off"
            ),
            Err(_) => default,
        }
    }

    fn env_u64(name: &str, default: u64) -> anyhow::Result<u64> {
        match std::env::var(name) {
            Ok(v) => v
                .trim()
                .parse()
                .with_context(|| format!("parsing {}={}", name, v)),
            Err(_) => Ok(default),
        }
    }

    fn output_line(chip: &mut Chip, offset: u32, default: u8, consumer: &str) -> anyhow::Result<CdevPin> {
        let line = chip
            .get_line(offset)
            .with_context(|| format!("getting {} line", consumer))?;
        let handle = line
            .request(LineRequestFlags::OUTPUT, default, consumer)
            .with_context(|| format!("requesting {} line", consumer))?;
        CdevPin::new(handle).with_context(|| format!("creating {} pin", consumer))
    }

    fn open_display(bulk: bool) -> anyhow::Result<Display> {
        let mut spi = SpidevDevice::open(Pins::SPI_DEVICE).context("opening SPI device")?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(Pins::SPI_HZ)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).context("configuring SPI")?;

        let mut chip = Chip::new(Pins::GPIO_CHIP).context("opening GPIO chip")?;
        let dc = output_line(&mut chip, Pins::DC, 0, "pcat-display-dc")?;
        let rst = output_line(&mut chip, Pins::RST, 1, "pcat-display-rst")?;
        // CS shares its line with the backlight, so it is never driven here
        let bl = output_line(&mut chip, Pins::BL, 0, "pcat-display-bl")?;

        let mut display = Gc9307::new(spi, dc, rst, None::<NoPin>, bl, Delay {});

        let config = Config {
            width: Pins::LCD_WIDTH,
            height: Pins::LCD_HEIGHT,
            rotation: Rotation::Deg180,
            row_offset: Pins::LCD_Y_OFFSET,
            column_offset: Pins::LCD_X_OFFSET,
            vsync_lines: MAX_VSYNC_SCANLINES,
            use_cs: false,
            transfer: if bulk {
                TransferMode::Bulk
            } else {
                TransferMode::Chunked
            },
            ..Config::default()
        };
        let probe: Box<dyn TransferProbe> = if bulk {
            Box::new(DmaChannelProbe::spi_controller(Pins::SPI_CONTROLLER))
        } else {
            Box::new(NoAcceleration)
        };
        display
            .configure(&config, &mut FileMarker::default(), probe.as_ref())
            .context("configuring display")?;
        Ok(display)
    }

    fn draw_color_bars(display: &mut Display) -> anyhow::Result<()> {
        let bars = [
            Rgb888::WHITE,
            Rgb888::YELLOW,
            Rgb888::CYAN,
            Rgb888::GREEN,
            Rgb888::MAGENTA,
            Rgb888::RED,
            Rgb888::BLUE,
        ];
        let size = display.bounding_box().size;
        let bar_width = size.width / bars.len() as u32;
        for (i, color) in bars.iter().enumerate() {
            let x = i as u32 * bar_width;
            let width = if i + 1 == bars.len() {
                size.width - x
            } else {
                bar_width
            };
            Rectangle::new(Point::new(x as i32, 0), Size::new(width, size.height))
                .into_styled(PrimitiveStyle::with_fill(*color))
                .draw(display)
                .context("drawing color bars")?;
        }

        let style = MonoTextStyle::new(&FONT_6X10, Rgb888::BLACK);
        Text::new("GC9307", Point::new(4, 12), style)
            .draw(display)
            .context("drawing title")?;
        Ok(())
    }

    /// Diagonal gradient with a checker overlay, so panning is easy to follow
    fn pattern_tile() -> Vec<Rgba> {
        let step = 256 / TILE;
        (0..TILE * TILE)
            .map(|i| {
                let (x, y) = (i % TILE, i / TILE);
                let checker = if (x / 8 + y / 8) % 2 == 0 { 0 } else { 64 };
                Rgba::rgb((x * step) as u8, (y * step) as u8, checker + ((x + y) * step / 4) as u8)
            })
            .collect()
    }

    struct Panner {
        x: usize,
        y: usize,
        dir_x: isize,
        dir_y: isize,
        max_x: usize,
        max_y: usize,
    }

    impl Panner {
        fn new(view_w: usize, view_h: usize) -> Self {
            let grid = TILE * GRID_SIZE;
            Panner {
                x: 0,
                y: 0,
                dir_x: 1,
                dir_y: 1,
                max_x: grid.saturating_sub(view_w),
                max_y: grid.saturating_sub(view_h),
            }
        }

        fn bounce(pos: usize, dir: isize, max: usize) -> (usize, isize) {
            let next = pos.saturating_add_signed(dir);
            if next == 0 {
                (0, 1)
            } else if next >= max {
                (max, -1)
            } else {
                (next, dir)
            }
        }

        fn advance(&mut self) {
            (self.x, self.dir_x) = Self::bounce(self.x, self.dir_x, self.max_x);
            (self.y, self.dir_y) = Self::bounce(self.y, self.dir_y, self.max_y);
        }
    }

    pub fn run() -> anyhow::Result<()> {
        let bulk = env_flag("PCAT_DISPLAY_BULK", true);
        let seconds = env_u64("PCAT_BENCH_SECONDS", DEFAULT_SECONDS)?;
        let vsync = env_flag("PCAT_BENCH_VSYNC", false);
        log::info!(
            "Starting GC9307 benchmark (bulk: {}, vsync: {}, duration: {}s)",
            bulk,
            vsync,
            seconds
        );

        let mut display = open_display(bulk)?;
        log::info!(
            "Display ready, {} pixels per write ({})",
            display.pixels_per_write(),
            if display.uses_bulk_transfers() { "bulk" } else { "chunked" }
        );

        draw_color_bars(&mut display)?;
        sleep(Duration::from_secs(1));

        let (width, height) = display.size();
        let view_w = usize::from(width) / 2;
        let view_h = usize::from(height) / 2;
        let start_x = (usize::from(width) - view_w) / 2;
        let start_y = (usize::from(height) - view_h) / 2;

        let tile = pattern_tile();
        let mut panner = Panner::new(view_w, view_h);
        let mut frame = vec![Rgba::BLACK; view_w * view_h];
        log::info!(
            "Panning {}x{} view at ({}, {}), max pan {}x{}",
            view_w,
            view_h,
            start_x,
            start_y,
            panner.max_x,
            panner.max_y
        );

        let started = Instant::now();
        let end = started + Duration::from_secs(seconds);
        let mut frames: u64 = 0;
        while Instant::now() < end {
            let frame_start = Instant::now();
            panner.advance();

            for (dy, row) in frame.chunks_exact_mut(view_w).enumerate() {
                let sy = (dy + panner.y) % TILE;
                for (dx, pixel) in row.iter_mut().enumerate() {
                    let sx = (dx + panner.x) % TILE;
                    *pixel = tile[sy * TILE + sx];
                }
            }

            if vsync {
                match display.sync_until(Instant::now() + SYNC_TIMEOUT) {
                    Ok(()) | Err(Error::SyncTimeout(_)) => {}
                    Err(e) => log::warn!("Scanline read failed: {}", e),
                }
            }
            if let Err(e) = display.fill_rect_with_buffer(
                start_x as i32,
                start_y as i32,
                view_w as i32,
                view_h as i32,
                &frame,
            ) {
                log::error!("Render error: {}", e);
                continue;
            }
            frames += 1;

            let elapsed = started.elapsed();
            if elapsed >= Duration::from_secs(1) && frames % 60 == 0 {
                log::info!(
                    "FPS: {:.2} (frame {}, pan {},{})",
                    frames as f64 / elapsed.as_secs_f64(),
                    frames,
                    panner.x,
                    panner.y
                );
            }

            if let Some(rest) = FRAME_BUDGET.checked_sub(frame_start.elapsed()) {
                sleep(rest);
            }
        }

        let total = started.elapsed();
        log::info!(
            "Benchmark completed: {} frames in {:.2}s, average {:.2} FPS",
            frames,
            total.as_secs_f64(),
            frames as f64 / total.as_secs_f64()
        );
        Ok(())
    }
}
