//! Recording bus, line and delay doubles shared by the unit tests
use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::io;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind, Operation, SpiDevice};

use crate::gc9307::cmd::Cmd;
use crate::gc9307::config::Config;
use crate::gc9307::driver::Gc9307;
use crate::gc9307::interface::DisplayInterface;
use crate::gc9307::probe::{InitMarker, NoAcceleration, ProbeError, TransferProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Dc,
    Rst,
    Cs,
    Bl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pin(Line, bool),
    Write(Vec<u8>),
    Transfer(Vec<u8>),
    DelayMs(u32),
    DelayNs(u32),
}

#[derive(Default)]
struct State {
    events: Vec<Event>,
    reads: VecDeque<u8>,
    /// Successful writes left before every write fails
    writes_left: Option<usize>,
}

type Shared = Rc<RefCell<State>>;

pub struct MockSpi(Shared);

impl spi::ErrorType for MockSpi {
    type Error = ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), ErrorKind> {
        let mut state = self.0.borrow_mut();
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let left = state.writes_left;
                    match left {
                        Some(0) => return Err(ErrorKind::Other),
                        Some(n) => state.writes_left = Some(n - 1),
                        None => {}
                    }
                    state.events.push(Event::Write(bytes.to_vec()));
                }
                Operation::Transfer(read, write) => {
                    state.events.push(Event::Transfer(write.to_vec()));
                    for byte in read.iter_mut() {
                        *byte = state.reads.pop_front().unwrap_or(0);
                    }
                }
                Operation::TransferInPlace(buf) => {
                    state.events.push(Event::Transfer(buf.to_vec()));
                    for byte in buf.iter_mut() {
                        *byte = state.reads.pop_front().unwrap_or(0);
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = state.reads.pop_front().unwrap_or(0);
                    }
                }
                Operation::DelayNs(ns) => state.events.push(Event::DelayNs(*ns)),
            }
        }
        Ok(())
    }
}

pub struct MockPin {
    line: Line,
    state: Shared,
}

impl digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.state.borrow_mut().events.push(Event::Pin(self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.state.borrow_mut().events.push(Event::Pin(self.line, true));
        Ok(())
    }
}

pub struct MockDelay(Shared);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().events.push(Event::DelayMs(ms));
    }
}

pub type MockInterface = DisplayInterface<MockSpi, MockPin, MockPin, MockPin, MockPin, MockDelay>;
pub type MockDevice = Gc9307<MockSpi, MockPin, MockPin, MockPin, MockPin, MockDelay>;

/// In-memory marker counting how often it was set
#[derive(Debug, Default)]
pub struct WarmMarker {
    set: bool,
    pub sets: usize,
}

impl WarmMarker {
    pub fn new(set: bool) -> Self {
        WarmMarker { set, sets: 0 }
    }
}

impl InitMarker for WarmMarker {
    fn is_set(&self) -> bool {
        self.set
    }

    fn set(&mut self) -> io::Result<()> {
        self.set = true;
        self.sets += 1;
        Ok(())
    }
}

/// One shared event log behind every double handed out
#[derive(Default)]
pub struct Rig {
    state: Shared,
}

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    fn pin(&self, line: Line) -> MockPin {
        MockPin {
            line,
            state: Rc::clone(&self.state),
        }
    }

    pub fn interface(&self) -> MockInterface {
        DisplayInterface::new(
            MockSpi(Rc::clone(&self.state)),
            self.pin(Line::Dc),
            self.pin(Line::Rst),
            Some(self.pin(Line::Cs)),
            self.pin(Line::Bl),
            MockDelay(Rc::clone(&self.state)),
        )
    }

    pub fn device(&self) -> MockDevice {
        Gc9307::new(
            MockSpi(Rc::clone(&self.state)),
            self.pin(Line::Dc),
            self.pin(Line::Rst),
            Some(self.pin(Line::Cs)),
            self.pin(Line::Bl),
            MockDelay(Rc::clone(&self.state)),
        )
    }

    /// Warm-configured device with an empty log
    pub fn configured(&self, config: &Config) -> MockDevice {
        self.configured_with(config, &NoAcceleration)
    }

    /// Warm-configured device whose transfer probe passes
    pub fn configured_bulk(&self, config: &Config) -> MockDevice {
        self.configured_with(config, &|| -> Result<(), ProbeError> { Ok(()) })
    }

    pub fn configured_with(&self, config: &Config, probe: &dyn TransferProbe) -> MockDevice {
        let mut dev = self.device();
        dev.configure(config, &mut WarmMarker::new(true), probe)
            .unwrap();
        self.clear();
        dev
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Bytes returned by the following read transfers
    pub fn push_reads(&self, bytes: &[u8]) {
        self.state.borrow_mut().reads.extend(bytes.iter().copied());
    }

    /// Scanline readings, two big-endian bytes each
    pub fn push_scanlines(&self, lines: &[u16]) {
        for line in lines {
            self.push_reads(&line.to_be_bytes());
        }
    }

    /// Let `n` more writes through, then fail every write
    pub fn fail_after(&self, n: usize) {
        self.state.borrow_mut().writes_left = Some(n);
    }

    /// Payloads of every successful write
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    fn framed(&self) -> Vec<(bool, Vec<u8>)> {
        let mut dc = true;
        let mut out = Vec::new();
        for event in self.state.borrow().events.iter() {
            match event {
                Event::Pin(Line::Dc, level) => dc = *level,
                Event::Write(bytes) => out.push((dc, bytes.clone())),
                _ => {}
            }
        }
        out
    }

    /// Bytes written while D/C was low
    pub fn commands(&self) -> Vec<u8> {
        self.framed()
            .into_iter()
            .filter(|(dc, _)| !dc)
            .flat_map(|(_, bytes)| bytes)
            .collect()
    }

    /// Data writes following the last RAMWR
    pub fn pixel_writes(&self) -> Vec<Vec<u8>> {
        let mut pixels = Vec::new();
        let mut streaming = false;
        for (dc, bytes) in self.framed() {
            if dc {
                if streaming {
                    pixels.push(bytes);
                }
            } else {
                streaming = bytes == [Cmd::RAMWR];
                if streaming {
                    pixels.clear();
                }
            }
        }
        pixels
    }
}
