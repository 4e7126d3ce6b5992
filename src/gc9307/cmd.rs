//! GC9307 command opcodes
/// Command opcodes understood by the GC9307 controller
pub struct Cmd;
#[allow(missing_docs)]
impl Cmd {
    // System
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const PTLON: u8 = 0x12;
    pub const NORON: u8 = 0x13;

    // Display
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;

    // Addressing
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;

    // Scrolling
    pub const VSCRDEF: u8 = 0x33;
    pub const VSCRSADD: u8 = 0x37;

    // Tearing / scanline
    pub const TEOFF: u8 = 0x34;
    pub const TEON: u8 = 0x35;
    pub const GSCAN: u8 = 0x45;

    // Timing
    pub const PORCTRL: u8 = 0xB2;
    pub const FRCTRL2: u8 = 0xC6;
}

/*
Power-up order used by the panel vendor:
0x01 - Software Reset
0x11 - Sleep Out
0x3A - Interface Pixel Format (0x55 = 16 bit)
0x36 - Memory Data Access Control
0x20 - Display Inversion Off
0x13 - Normal Display Mode On
0x29 - Display On
*/
