//! GC9307 Display Driver Implementation
//!
//! This module contains the device state and the high-level operations of the
//! GC9307 TFT controller: configuration, rotation, window addressing, scrolling
//! and the panel controls. Pixel streaming lives in `transfer`, scanline
//! waiting in `sync`.
//!
//! ## Lifecycle
//!
//! 1. [`Gc9307::new`] takes the already opened SPI device and output lines.
//! 1. [`Gc9307::configure`] runs the power-up sequence once. The hardware reset
//!    and wake part is skipped when the [`InitMarker`] says an earlier process
//!    already did it.
//! 1. Any number of `fill_rect*`, `sync*` and control calls follow.
//!
//! ## Offsets
//!
//! The visible glass is usually a window inside the controller's 240x320
//! frame memory. Row/column offsets are configured for the native orientation
//! and re-derived on every [`Gc9307::set_rotation`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::gc9307::color::{ColorOrder, Rgba};
use crate::gc9307::config::{Config, FrameRate, Rotation, TransferMode, DEFAULT_SIZE};
use crate::gc9307::error::Error;
use crate::gc9307::interface::DisplayInterface;
use crate::gc9307::probe::{InitMarker, TransferProbe};
use crate::gc9307::transfer::Strategy;
use crate::gc9307::{cmd::Cmd, flag::Flag};

/// Settle time after each power-up command
const SETTLE_MS: u32 = 10;

/// GC9307 TFT Display Driver
///
/// ## Type Parameters
///
/// - `SPI` - SPI device for communication
/// - `DC` - Data/Command output pin
/// - `RST` - Reset output pin
/// - `CS` - Chip-select output pin, only driven when `Config::use_cs` is set
/// - `BL` - Backlight enable output pin
/// - `DELAY` - Delay provider for timing
pub struct Gc9307<SPI, DC, RST, CS, BL, DELAY> {
    /// The display interface
    pub(crate) interface: DisplayInterface<SPI, DC, RST, CS, BL, DELAY>,
    pub(crate) width: u16,
    pub(crate) height: u16,
    row_offset_cfg: u16,
    column_offset_cfg: u16,
    pub(crate) row_offset: u16,
    pub(crate) column_offset: u16,
    pub(crate) rotation: Rotation,
    frame_rate: FrameRate,
    /// Pixels per chunk on the chunked path
    batch_length: usize,
    pub(crate) color_order: ColorOrder,
    madctl_bgr: bool,
    pub(crate) strategy: Strategy,
    /// Largest single transfer in bytes, 0 for no limit
    max_transfer_size: usize,
    vsync_lines: u16,
    highest_scan_line: u16,
    lowest_scan_line: u16,
}

impl<SPI, DC, RST, CS, BL, DELAY> Gc9307<SPI, DC, RST, CS, BL, DELAY> {
    /// Wrap an SPI device and lines that are already set up.
    ///
    /// Nothing is sent until [`Gc9307::configure`].
    pub fn new(spi: SPI, dc: DC, rst: RST, cs: Option<CS>, bl: BL, delay: DELAY) -> Self {
        Gc9307 {
            interface: DisplayInterface::new(spi, dc, rst, cs, bl, delay),
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            row_offset_cfg: 0,
            column_offset_cfg: 0,
            row_offset: 0,
            column_offset: 0,
            rotation: Rotation::Deg0,
            frame_rate: FrameRate::Hz60,
            batch_length: 0,
            color_order: ColorOrder::Bgr,
            madctl_bgr: false,
            strategy: Strategy::chunked(0),
            max_transfer_size: 0,
            vsync_lines: 0,
            highest_scan_line: 0,
            lowest_scan_line: 0,
        }
    }

    /// Current (width, height), swapped for the 90 and 270 degree rotations
    pub fn size(&self) -> (u16, u16) {
        if self.rotation.is_swapped() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Active rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Frame rate hint from the configuration
    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    /// Configured blanking lines after range checking
    pub fn vsync_lines(&self) -> u16 {
        self.vsync_lines
    }

    /// Last scanline id of a frame before the blanking pause
    pub fn highest_scan_line(&self) -> u16 {
        self.highest_scan_line
    }

    /// First scanline id after the blanking pause
    pub fn lowest_scan_line(&self) -> u16 {
        self.lowest_scan_line
    }

    /// True when the bulk blit path was granted
    pub fn uses_bulk_transfers(&self) -> bool {
        matches!(self.strategy, Strategy::Bulk { .. })
    }

    /// Pixels sent per bus write on the active path
    pub fn pixels_per_write(&self) -> usize {
        self.strategy.batch()
    }

    /// Largest single transfer in bytes, 0 when unbounded
    pub fn max_transfer_size(&self) -> usize {
        self.max_transfer_size
    }

    /// Set the MADCTL BGR bit, applied by the next [`Gc9307::set_rotation`]
    pub fn set_bgr(&mut self, bgr: bool) {
        self.madctl_bgr = bgr;
    }

    /// Give the bus and lines back
    pub fn release(self) -> (SPI, DC, RST, Option<CS>, BL, DELAY) {
        self.interface.release()
    }
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
    /// Apply the configuration and bring the panel up.
    ///
    /// The probe is only consulted when the bulk path is requested; a failing
    /// probe downgrades to the chunked path for the lifetime of the device.
    /// Marker write failures are logged and otherwise ignored. Offsets that
    /// push the window past the 16-bit address range are rejected with
    /// [`Error::OutOfBounds`] before anything is sent.
    pub fn configure(
        &mut self,
        config: &Config,
        marker: &mut dyn InitMarker,
        probe: &dyn TransferProbe,
    ) -> Result<(), Error<SPI::Error>> {
        let width = if config.width != 0 { config.width } else { DEFAULT_SIZE };
        let height = if config.height != 0 { config.height } else { DEFAULT_SIZE };
        // Window ends are 16-bit addresses in every rotation
        let edge = u32::from(width.max(height));
        let offset = u32::from(config.row_offset.max(config.column_offset));
        if edge + offset > u32::from(u16::MAX) + 1 {
            return Err(Error::OutOfBounds);
        }

        let initialized = marker.is_set();
        self.width = width;
        self.height = height;
        self.interface.set_use_cs(config.use_cs);
        self.rotation = config.rotation;
        self.row_offset_cfg = config.row_offset;
        self.column_offset_cfg = config.column_offset;
        self.frame_rate = config.frame_rate;
        self.color_order = config.color_order;

        self.vsync_lines = config.effective_vsync_lines();
        // Scanline ids advance once every two display lines
        let porch = self.vsync_lines.div_ceil(4);
        self.highest_scan_line = porch + 160;
        self.lowest_scan_line = porch + 1;

        let mut bulk = config.transfer == TransferMode::Bulk;
        if bulk {
            if let Err(e) = probe.probe() {
                log::warn!("DMA not available, falling back to chunked transfers: {}", e);
                bulk = false;
            }
        }

        let longest = usize::from(self.width.max(self.height));
        self.batch_length = longest + (longest & 1);
        if bulk {
            self.max_transfer_size = Strategy::BULK_MAX_TRANSFER;
            self.strategy = Strategy::bulk(self.batch_length, self.max_transfer_size);
            log::info!(
                "Using bulk transfers, {} pixels per write",
                self.strategy.batch()
            );
        } else {
            self.max_transfer_size = 0;
            self.strategy = Strategy::chunked(self.batch_length);
            log::info!(
                "Using chunked transfers, {} pixels per write",
                self.batch_length
            );
        }

        if initialized {
            log::info!("Panel already initialised, skipping reset and wake");
        } else {
            log::info!("Resetting and waking panel");
            self.interface.reset()?;
            self.interface.wake(SETTLE_MS)?;
        }

        self.set_rotation(self.rotation)?;
        self.fill_screen(Rgba::BLACK)?;

        self.interface.cmd(Cmd::INVOFF)?;
        self.interface.delay.delay_ms(SETTLE_MS);
        self.interface.cmd(Cmd::NORON)?;
        self.interface.delay.delay_ms(SETTLE_MS);
        self.interface.cmd(Cmd::DISPON)?;
        self.interface.delay.delay_ms(SETTLE_MS);
        self.interface.backlight(true)?;

        if let Err(e) = marker.set() {
            log::warn!("Could not record panel initialisation: {}", e);
        }
        Ok(())
    }

    /// Change the rotation of the device (clock-wise)
    pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Error<SPI::Error>> {
        let (row, column) = rotation.offsets(self.row_offset_cfg, self.column_offset_cfg);
        self.row_offset = row;
        self.column_offset = column;
        self.rotation = rotation;

        let mut madctl = rotation.madctl();
        if self.madctl_bgr {
            madctl |= Flag::MADCTL_BGR;
        }
        self.interface.cmd_with_data(Cmd::MADCTL, &[madctl])
    }

    /// Arm the controller to receive pixels for a rectangle.
    ///
    /// Coordinates are logical; the current offsets are added here.
    pub(crate) fn set_window(&mut self, x: u16, y: u16, w: u16, h: u16) -> Result<(), Error<SPI::Error>> {
        let x = x + self.column_offset;
        let y = y + self.row_offset;
        let [xs_hi, xs_lo] = x.to_be_bytes();
        let [xe_hi, xe_lo] = (x + w - 1).to_be_bytes();
        let [ys_hi, ys_lo] = y.to_be_bytes();
        let [ye_hi, ye_lo] = (y + h - 1).to_be_bytes();

        self.interface.cmd_with_data(Cmd::CASET, &[xs_hi, xs_lo, xe_hi, xe_lo])?;
        self.interface.cmd_with_data(Cmd::RASET, &[ys_hi, ys_lo, ye_hi, ye_lo])?;
        self.interface.cmd(Cmd::RAMWR)
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, enable: bool) -> Result<(), Error<SPI::Error>> {
        self.interface.backlight(enable)
    }

    /// Invert the colors of the screen
    pub fn invert_colors(&mut self, invert: bool) -> Result<(), Error<SPI::Error>> {
        self.interface
            .cmd(if invert { Cmd::INVON } else { Cmd::INVOFF })
    }

    /// Define a scrolling band between fixed top and bottom areas
    pub fn set_scroll_area(&mut self, top_fixed: u16, bottom_fixed: u16) -> Result<(), Error<SPI::Error>> {
        let scrolling = self
            .height
            .saturating_sub(top_fixed)
            .saturating_sub(bottom_fixed);
        let [t_hi, t_lo] = top_fixed.to_be_bytes();
        let [s_hi, s_lo] = scrolling.to_be_bytes();
        let [b_hi, b_lo] = bottom_fixed.to_be_bytes();
        self.interface
            .cmd_with_data(Cmd::VSCRDEF, &[t_hi, t_lo, s_hi, s_lo, b_hi, b_lo])
    }

    /// Set the first frame memory line shown at the top of the scrolling band
    pub fn set_scroll(&mut self, line: u16) -> Result<(), Error<SPI::Error>> {
        self.interface.cmd_with_data(Cmd::VSCRSADD, &line.to_be_bytes())
    }

    /// Leave scrolling and return to normal display mode
    pub fn stop_scroll(&mut self) -> Result<(), Error<SPI::Error>> {
        self.interface.cmd(Cmd::NORON)
    }

    /// Send a raw command, for registers the driver does not wrap
    pub fn command(&mut self, command: u8) -> Result<(), Error<SPI::Error>> {
        self.interface.cmd(command)
    }

    /// Send raw data bytes following a [`Gc9307::command`]
    pub fn write_data(&mut self, data: &[u8]) -> Result<(), Error<SPI::Error>> {
        self.interface.data(data)
    }

    /// Read `buf.len()` bytes from a register
    pub fn read_register(&mut self, command: u8, buf: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        self.interface.read_register(command, buf)
    }
}
