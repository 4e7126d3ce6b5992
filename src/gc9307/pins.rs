//! Wiring of the GC9307 panel on the PCat board
//!
//! Line numbers are offsets on `/dev/gpiochip0`.

/// Pin and device constants for the on-board display
pub struct Pins;

impl Pins {
    // Control lines
    /// Reset line (active low)
    pub const RST: u32 = 122;
    /// Data/Command control line (High for data, Low for command)
    pub const DC: u32 = 121;
    /// Chip select line, toggled only with `Config::use_cs`
    pub const CS: u32 = 13;
    /// Backlight enable line, shares its pin with chip select
    pub const BL: u32 = 13;

    // Devices
    /// GPIO character device holding the control lines
    pub const GPIO_CHIP: &'static str = "/dev/gpiochip0";
    /// SPI device node of the panel
    pub const SPI_DEVICE: &'static str = "/dev/spidev1.0";
    /// Sysfs directory of the SPI controller, probed for DMA channels
    pub const SPI_CONTROLLER: &'static str = "/sys/devices/platform/soc/2ad00000.spi";
    /// SPI clock
    pub const SPI_HZ: u32 = 80_000_000;

    // Panel geometry
    /// Visible width in the native orientation
    pub const LCD_WIDTH: u16 = 172;
    /// Visible height in the native orientation
    pub const LCD_HEIGHT: u16 = 320;
    /// Column offset of the glass inside the frame memory
    pub const LCD_X_OFFSET: u16 = 34;
    /// Row offset of the glass inside the frame memory
    pub const LCD_Y_OFFSET: u16 = 0;
}
