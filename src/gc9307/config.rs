//! Panel configuration handed to [`crate::Gc9307::configure`]
use crate::gc9307::{color::ColorOrder, flag::Flag};

/// Largest vsync line count the porch registers accept
pub const MAX_VSYNC_SCANLINES: u16 = 254;
/// Smallest vsync line count the porch registers accept
pub const MIN_VSYNC_SCANLINES: u16 = 2;
/// Vsync line count used when the configured one is out of range
pub const DEFAULT_VSYNC_SCANLINES: u16 = 16;
/// Edge length used when width or height is left at zero
pub const DEFAULT_SIZE: u16 = 240;

/// Clockwise rotation of the panel in 90 degree steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Native orientation
    #[default]
    Deg0,
    /// Rotated 90 degrees, width and height swapped
    Deg90,
    /// Rotated 180 degrees
    Deg180,
    /// Rotated 270 degrees, width and height swapped
    Deg270,
}

impl Rotation {
    /// Rotation from a step count, wrapping at four
    pub fn from_steps(steps: u8) -> Self {
        match steps % 4 {
            0 => Rotation::Deg0,
            1 => Rotation::Deg90,
            2 => Rotation::Deg180,
            _ => Rotation::Deg270,
        }
    }

    /// True when rows and columns are exchanged
    pub fn is_swapped(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// MADCTL scan direction bits for this rotation, without the BGR bit
    pub(crate) fn madctl(self) -> u8 {
        match self {
            Rotation::Deg0 => Flag::MADCTL_MX | Flag::MADCTL_MY,
            Rotation::Deg90 => Flag::MADCTL_MY | Flag::MADCTL_MV,
            Rotation::Deg180 => Flag::MADCTL_MX,
            Rotation::Deg270 => Flag::MADCTL_MX | Flag::MADCTL_MV,
        }
    }

    /// Effective (row, column) window offsets for the configured pair.
    ///
    /// The offsets trade roles when rows and columns are exchanged; the
    /// flipped orientations keep only what the panel glass still needs.
    pub(crate) fn offsets(self, row: u16, column: u16) -> (u16, u16) {
        match self {
            Rotation::Deg0 => (row, column),
            Rotation::Deg90 => (column, row),
            Rotation::Deg180 => (0, column),
            Rotation::Deg270 => (0, 0),
        }
    }
}

/// Frame rate codes for FRCTRL2 in normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(missing_docs)]
pub enum FrameRate {
    Hz111 = 0x01,
    Hz105 = 0x02,
    Hz99 = 0x03,
    Hz94 = 0x04,
    Hz90 = 0x05,
    Hz86 = 0x06,
    Hz82 = 0x07,
    Hz78 = 0x08,
    Hz75 = 0x09,
    Hz72 = 0x0A,
    Hz69 = 0x0B,
    Hz67 = 0x0C,
    Hz64 = 0x0D,
    Hz62 = 0x0E,
    #[default]
    Hz60 = 0x0F,
    Hz58 = 0x10,
    Hz57 = 0x11,
    Hz55 = 0x12,
    Hz53 = 0x13,
    Hz52 = 0x14,
    Hz50 = 0x15,
    Hz49 = 0x16,
    Hz48 = 0x17,
    Hz46 = 0x18,
    Hz45 = 0x19,
    Hz44 = 0x1A,
    Hz43 = 0x1B,
    Hz42 = 0x1C,
    Hz41 = 0x1D,
    Hz40 = 0x1E,
    Hz39 = 0x1F,
}

/// Which blit path the caller would like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    /// Batches the size of the longest display edge
    #[default]
    Chunked,
    /// Four times larger batches, only granted if the platform probe passes
    Bulk,
}

/// Configuration for the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Panel width in pixels (0 picks [`DEFAULT_SIZE`])
    pub width: u16,
    /// Panel height in pixels (0 picks [`DEFAULT_SIZE`])
    pub height: u16,
    /// Initial rotation
    pub rotation: Rotation,
    /// Row offset of the visible area inside the controller's frame memory
    pub row_offset: u16,
    /// Column offset of the visible area inside the controller's frame memory
    pub column_offset: u16,
    /// Frame rate hint, kept for reference
    pub frame_rate: FrameRate,
    /// Blanking lines, clamped to [2, 254] or replaced by 16
    pub vsync_lines: u16,
    /// Drive chip-select manually around every transfer
    pub use_cs: bool,
    /// Preferred blit path
    pub transfer: TransferMode,
    /// Channel order used when packing pixels
    pub color_order: ColorOrder,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            rotation: Rotation::Deg0,
            row_offset: 0,
            column_offset: 0,
            frame_rate: FrameRate::Hz60,
            vsync_lines: DEFAULT_VSYNC_SCANLINES,
            use_cs: false,
            transfer: TransferMode::Chunked,
            color_order: ColorOrder::Bgr,
        }
    }
}

impl Config {
    /// Vsync line count after range checking
    pub(crate) fn effective_vsync_lines(&self) -> u16 {
        if (MIN_VSYNC_SCANLINES..=MAX_VSYNC_SCANLINES).contains(&self.vsync_lines) {
            self.vsync_lines
        } else {
            DEFAULT_VSYNC_SCANLINES
        }
    }
}
