//! Platform hooks consulted while configuring the panel
//!
//! [`TransferProbe`] decides whether the bulk blit path may be used and
//! [`InitMarker`] remembers across process restarts that the controller has
//! already been reset and woken.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default location of the "panel already initialised" marker
pub const DEFAULT_MARKER_PATH: &str = "/tmp/pcat_display_initialized";

/// Capability probe failure, reported in the fallback notice
#[derive(Debug, thiserror::Error)]
#[error("{channel} channel not found at {}", .path.display())]
pub struct ProbeError {
    /// Channel that is missing
    pub channel: &'static str,
    /// Where it was looked for
    pub path: PathBuf,
}

/// Check run once at configuration time before the bulk path is granted
pub trait TransferProbe {
    /// `Ok` when accelerated transfers are available
    fn probe(&self) -> Result<(), ProbeError>;
}

impl<F> TransferProbe for F
where
    F: Fn() -> Result<(), ProbeError>,
{
    fn probe(&self) -> Result<(), ProbeError> {
        self()
    }
}

/// Looks for the receive and transmit DMA channel nodes of an SPI controller
#[derive(Debug, Clone)]
pub struct DmaChannelProbe {
    rx: PathBuf,
    tx: PathBuf,
}

impl DmaChannelProbe {
    /// Probe two explicit paths
    pub fn new(rx: impl Into<PathBuf>, tx: impl Into<PathBuf>) -> Self {
        DmaChannelProbe {
            rx: rx.into(),
            tx: tx.into(),
        }
    }

    /// Probe `dma:rx` and `dma:tx` below an SPI controller's sysfs directory
    pub fn spi_controller(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("dma:rx"), dir.join("dma:tx"))
    }
}

impl TransferProbe for DmaChannelProbe {
    fn probe(&self) -> Result<(), ProbeError> {
        for (channel, path) in [("DMA RX", &self.rx), ("DMA TX", &self.tx)] {
            if !path.exists() {
                return Err(ProbeError {
                    channel,
                    path: path.clone(),
                });
            }
        }
        log::info!(
            "DMA channels found: RX={}, TX={}",
            self.rx.display(),
            self.tx.display()
        );
        Ok(())
    }
}

/// Probe that never grants the bulk path
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAcceleration;

impl TransferProbe for NoAcceleration {
    fn probe(&self) -> Result<(), ProbeError> {
        Err(ProbeError {
            channel: "accelerated transfer",
            path: PathBuf::new(),
        })
    }
}

/// Persisted flag saying the hardware reset/wake already ran.
///
/// The driver only ever sets it; clearing after a power cycle is up to the
/// owner of the hardware.
pub trait InitMarker {
    /// True when a previous process already initialised the controller
    fn is_set(&self) -> bool;
    /// Record that initialisation ran
    fn set(&mut self) -> io::Result<()>;
}

/// Marker backed by the existence of a file
#[derive(Debug, Clone)]
pub struct FileMarker {
    path: PathBuf,
}

impl FileMarker {
    /// Marker at a custom path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileMarker { path: path.into() }
    }

    /// Location of the marker file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileMarker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_PATH)
    }
}

impl InitMarker for FileMarker {
    fn is_set(&self) -> bool {
        self.path.exists()
    }

    fn set(&mut self) -> io::Result<()> {
        fs::File::create(&self.path).map(|_| ())
    }
}

/// Marker that is never set, every configure is a cold start
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarker;

impl InitMarker for NoMarker {
    fn is_set(&self) -> bool {
        false
    }

    fn set(&mut self) -> io::Result<()> {
        Ok(())
    }
}
