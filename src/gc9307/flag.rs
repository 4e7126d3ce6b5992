//! Command parameter bits
/// Parameter bits and constant payloads used with the GC9307 commands.
///
/// MADCTL bits select the scan direction of the frame memory, the rest are
/// fixed parameter bytes from the controller datasheet.
pub struct Flag;
#[allow(missing_docs)]
impl Flag {
    // Memory Data Access Control (0x36) bits
    pub const MADCTL_MY: u8 = 0x80; // Row address order
    pub const MADCTL_MX: u8 = 0x40; // Column address order
    pub const MADCTL_MV: u8 = 0x20; // Row/column exchange
    pub const MADCTL_ML: u8 = 0x10; // Vertical refresh order
    pub const MADCTL_BGR: u8 = 0x08; // BGR panel order
    pub const MADCTL_MH: u8 = 0x04; // Horizontal refresh order

    // Interface Pixel Format (0x3A)
    pub const COLMOD_16BIT: u8 = 0x55;

    // Dummy byte clocked out while reading a register
    pub const READ_DUMMY: u8 = 0xFF;
}
