//! Display interface using SPI
use crate::gc9307::{cmd::Cmd, error::Error, flag::Flag};
use display_interface::DisplayError;
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

const RESET_HIGH_MS: u32 = 10;
const RESET_LOW_MS: u32 = 50;

/// Placeholder for a line that is not wired, e.g. a chip-select tied low
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl embedded_hal::digital::ErrorType for NoPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Command/data framing over an SPI device and the panel's control lines
pub struct DisplayInterface<SPI, DC, RST, CS, BL, DELAY> {
    /// SPI device
    spi: SPI,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Reseting
    rst: RST,
    /// Chip select, only driven when `use_cs` is set
    cs: Option<CS>,
    /// Backlight enable
    bl: BL,
    /// Delay provider for reset timing, settle times and scanline polling
    pub(crate) delay: DELAY,
    /// Some boards tie CS permanently active, toggling it there breaks bus timing
    use_cs: bool,
}

impl<SPI, DC, RST, CS, BL, DELAY> DisplayInterface<SPI, DC, RST, CS, BL, DELAY> {
    /// Wrap the bus and lines; chip-select stays untouched until enabled
    pub fn new(spi: SPI, dc: DC, rst: RST, cs: Option<CS>, bl: BL, delay: DELAY) -> Self {
        DisplayInterface {
            spi,
            dc,
            rst,
            cs,
            bl,
            delay,
            use_cs: false,
        }
    }

    /// Drive chip-select around each transfer (needs a CS pin)
    pub(crate) fn set_use_cs(&mut self, use_cs: bool) {
        if use_cs && self.cs.is_none() {
            log::warn!("Manual chip-select requested but no CS pin was given");
        }
        self.use_cs = use_cs;
    }

    /// Give the bus and lines back
    pub fn release(self) -> (SPI, DC, RST, Option<CS>, BL, DELAY) {
        (self.spi, self.dc, self.rst, self.cs, self.bl, self.delay)
    }
}

impl<SPI, DC, RST, CS, BL, DELAY> DisplayInterface<SPI, DC, RST, CS, BL, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    CS: OutputPin,
    BL: OutputPin,
    DELAY: DelayNs,
{
    fn select(&mut self) -> Result<(), DisplayError> {
        match self.cs.as_mut() {
            Some(cs) if self.use_cs => cs.set_low().map_err(|_| DisplayError::CSError),
            _ => Ok(()),
        }
    }

    fn deselect(&mut self) -> Result<(), DisplayError> {
        match self.cs.as_mut() {
            Some(cs) if self.use_cs => cs.set_high().map_err(|_| DisplayError::CSError),
            _ => Ok(()),
        }
    }

    /// Basic function for sending commands
    pub(crate) fn cmd(&mut self, command: u8) -> Result<(), Error<SPI::Error>> {
        // low for commands
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.select()?;

        if let Err(e) = self.spi.write(&[command]) {
            log::error!("SPI write error for command 0x{:02X}: {:?}", command, e);
            return Err(Error::Bus(e));
        }
        self.deselect()?;
        Ok(())
    }

    /// Basic function for sending an array of u8-values of data over spi
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), Error<SPI::Error>> {
        // high for data
        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        self.select()?;
        self.spi.write(data).map_err(Error::Bus)?;
        self.deselect()?;
        Ok(())
    }

    /// Basic function for sending a command and the data belonging to it.
    pub(crate) fn cmd_with_data(&mut self, command: u8, data: &[u8]) -> Result<(), Error<SPI::Error>> {
        self.cmd(command)?;
        self.data(data)
    }

    /// Read `buf.len()` bytes of a register, one dummy byte per transaction
    pub(crate) fn read_register(&mut self, command: u8, buf: &mut [u8]) -> Result<(), Error<SPI::Error>> {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.select()?;
        self.spi.write(&[command]).map_err(Error::Bus)?;

        self.dc.set_high().map_err(|_| DisplayError::DCError)?;
        for byte in buf.iter_mut() {
            let mut rx = [0u8; 1];
            self.spi
                .transfer(&mut rx, &[Flag::READ_DUMMY])
                .map_err(Error::Bus)?;
            *byte = rx[0];
        }
        self.deselect()?;
        Ok(())
    }

    /// Hardware reset: high, low, high with the panel's settle times
    pub(crate) fn reset(&mut self) -> Result<(), Error<SPI::Error>> {
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_HIGH_MS);
        self.rst.set_low().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_LOW_MS);
        self.rst.set_high().map_err(|_| DisplayError::RSError)?;
        self.delay.delay_ms(RESET_HIGH_MS);
        Ok(())
    }

    /// Switch the backlight line
    pub(crate) fn backlight(&mut self, on: bool) -> Result<(), Error<SPI::Error>> {
        let res = if on { self.bl.set_high() } else { self.bl.set_low() };
        res.map_err(|_| Error::Backlight)
    }

    /// Wake the controller and select 16-bit pixels
    pub(crate) fn wake(&mut self, settle_ms: u32) -> Result<(), Error<SPI::Error>> {
        self.cmd(Cmd::SWRESET)?;
        self.delay.delay_ms(settle_ms);
        self.cmd(Cmd::SLPOUT)?;
        self.delay.delay_ms(settle_ms);
        self.cmd_with_data(Cmd::COLMOD, &[Flag::COLMOD_16BIT])?;
        self.delay.delay_ms(settle_ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gc9307::mock::{Event, Line, Rig};

    #[test]
    fn test_command_holds_dc_low() {
        let rig = Rig::new();
        let mut iface = rig.interface();
        iface.cmd(Cmd::DISPON).unwrap();

        assert_eq!(
            rig.events(),
            vec![Event::Pin(Line::Dc, false), Event::Write(vec![Cmd::DISPON])]
        );
    }

    #[test]
    fn test_data_holds_dc_high() {
        let rig = Rig::new();
        let mut iface = rig.interface();
        iface.data(&[1, 2, 3]).unwrap();

        assert_eq!(
            rig.events(),
            vec![Event::Pin(Line::Dc, true), Event::Write(vec![1, 2, 3])]
        );
    }

    #[test]
    fn test_chip_select_only_when_enabled() {
        let rig = Rig::new();
        let mut iface = rig.interface();
        iface.set_use_cs(true);
        iface.cmd(Cmd::NORON).unwrap();

        assert_eq!(
            rig.events(),
            vec![
                Event::Pin(Line::Dc, false),
                Event::Pin(Line::Cs, false),
                Event::Write(vec![Cmd::NORON]),
                Event::Pin(Line::Cs, true),
            ]
        );

        rig.clear();
        iface.set_use_cs(false);
        iface.cmd(Cmd::NORON).unwrap();
        assert!(!rig.events().contains(&Event::Pin(Line::Cs, false)));
    }

    #[test]
    fn test_read_register_clocks_dummy_bytes() {
        let rig = Rig::new();
        rig.push_reads(&[0x12, 0x34]);
        let mut iface = rig.interface();

        let mut buf = [0u8; 2];
        iface.read_register(Cmd::GSCAN, &mut buf).unwrap();

        assert_eq!(buf, [0x12, 0x34]);
        assert_eq!(
            rig.events(),
            vec![
                Event::Pin(Line::Dc, false),
                Event::Write(vec![Cmd::GSCAN]),
                Event::Pin(Line::Dc, true),
                Event::Transfer(vec![Flag::READ_DUMMY]),
                Event::Transfer(vec![Flag::READ_DUMMY]),
            ]
        );
    }

    #[test]
    fn test_read_register_holds_cs_across_transfers() {
        let rig = Rig::new();
        rig.push_reads(&[0x12, 0x34]);
        let mut iface = rig.interface();
        iface.set_use_cs(true);

        let mut buf = [0u8; 2];
        iface.read_register(Cmd::GSCAN, &mut buf).unwrap();

        assert_eq!(buf, [0x12, 0x34]);
        assert_eq!(
            rig.events(),
            vec![
                Event::Pin(Line::Dc, false),
                Event::Pin(Line::Cs, false),
                Event::Write(vec![Cmd::GSCAN]),
                Event::Pin(Line::Dc, true),
                Event::Transfer(vec![Flag::READ_DUMMY]),
                Event::Transfer(vec![Flag::READ_DUMMY]),
                Event::Pin(Line::Cs, true),
            ]
        );
    }

    #[test]
    fn test_bus_error_is_surfaced() {
        let rig = Rig::new();
        rig.fail_after(0);
        let mut iface = rig.interface();

        let err = iface.data(&[0xAA]).unwrap_err();
        assert!(matches!(err, Error::Bus(_)));
        // no retry
        assert_eq!(rig.writes().len(), 0);
    }

    #[test]
    fn test_reset_sequence() {
        let rig = Rig::new();
        let mut iface = rig.interface();
        iface.reset().unwrap();

        assert_eq!(
            rig.events(),
            vec![
                Event::Pin(Line::Rst, true),
                Event::DelayMs(10),
                Event::Pin(Line::Rst, false),
                Event::DelayMs(50),
                Event::Pin(Line::Rst, true),
                Event::DelayMs(10),
            ]
        );
    }
}
