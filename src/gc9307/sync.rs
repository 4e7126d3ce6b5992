//! Scanline synchronisation
//!
//! The controller reports the line it is currently refreshing through GSCAN.
//! During the blanking pause the counter reads 0, so waiting for "the next
//! frame" means waiting for the counter to fall to 0 and come back.
//!
//! The plain variants poll forever; a panel whose counter never moves will
//! hang them. The `_until` variants give up at a deadline.

use std::time::Instant;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::gc9307::cmd::Cmd;
use crate::gc9307::driver::Gc9307;
use crate::gc9307::error::Error;

/// Pause between polls while the target is still far away
const POLL_DELAY_MS: u32 = 1;
/// Lines above the target that still count as close enough for busy polling
const TARGET_SLACK: u16 = 4;

impl<SPI, DC, RST, CS, BL, DELAY> Gc9307<SPI, DC, RST, CS, BL, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    CS: OutputPin,
    BL: OutputPin,
    DELAY: DelayNs,
{
    /// Read the scanline counter
    pub fn scan_line(&mut self) -> Result<u16, Error<SPI::Error>> {
        let mut buf = [0u8; 2];
        self.interface.read_register(Cmd::GSCAN, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Block until the blanking pause has just ended
    pub fn sync(&mut self) -> Result<(), Error<SPI::Error>> {
        self.wait_for_line(0, None)
    }

    /// Block until the counter reaches `line`; 0 behaves like [`Gc9307::sync`]
    pub fn sync_to_scan_line(&mut self, line: u16) -> Result<(), Error<SPI::Error>> {
        self.wait_for_line(line, None)
    }

    /// [`Gc9307::sync`] giving up with [`Error::SyncTimeout`] at `deadline`
    pub fn sync_until(&mut self, deadline: Instant) -> Result<(), Error<SPI::Error>> {
        self.wait_for_line(0, Some(deadline))
    }

    /// [`Gc9307::sync_to_scan_line`] giving up with [`Error::SyncTimeout`] at `deadline`
    pub fn sync_to_scan_line_until(&mut self, line: u16, deadline: Instant) -> Result<(), Error<SPI::Error>> {
        self.wait_for_line(line, Some(deadline))
    }

    fn wait_for_line(&mut self, target: u16, deadline: Option<Instant>) -> Result<(), Error<SPI::Error>> {
        let check = |deadline: Option<Instant>| -> Result<(), Error<SPI::Error>> {
            match deadline {
                Some(d) if Instant::now() >= d => Err(Error::SyncTimeout(target)),
                _ => Ok(()),
            }
        };

        let mut line = self.scan_line()?;
        if line == 0 {
            // a single 0 may be a glitch
            line = self.scan_line()?;
        }

        if target == 0 {
            while line > 0 {
                check(deadline)?;
                self.interface.delay.delay_ms(POLL_DELAY_MS);
                line = self.scan_line()?;
            }
            while line == 0 {
                check(deadline)?;
                line = self.scan_line()?;
            }
        } else {
            let ceiling = target.saturating_add(TARGET_SLACK);
            while line > ceiling {
                check(deadline)?;
                self.interface.delay.delay_ms(POLL_DELAY_MS);
                line = self.scan_line()?;
            }
            while line < target {
                check(deadline)?;
                line = self.scan_line()?;
            }
        }
        log::debug!("Synced to scanline {} (target {})", line, target);
        Ok(())
    }
}
