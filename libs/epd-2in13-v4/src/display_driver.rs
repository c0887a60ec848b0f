//! SSD1680 controller protocol for the 2.13" V4 panel.
//!
//! Register writes are grouped into static sequences so the full and partial
//! refresh paths read as data rather than as long chains of calls.

use crate::common::{BUFFER_SIZE, RefreshMode};
use crate::error::{EpdResult, Error};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;
use linux_embedded_hal::{CdevPin, Delay, SpidevBus};
use log::{debug, trace};
use std::time::Instant;

const RESET_SETTLE_MS: u32 = 20;
const RESET_PULSE_MS: u32 = 2;
const PARTIAL_RESET_PULSE_MS: u32 = 1;
const BUSY_POLL_MS: u32 = 10;
const BUSY_TIMEOUT_MS: u32 = 10_000;
const DEEP_SLEEP_SETTLE_MS: u32 = 100;

mod reg {
    pub const DRIVER_OUTPUT: u8 = 0x01;
    pub const DEEP_SLEEP: u8 = 0x10;
    pub const DATA_ENTRY: u8 = 0x11;
    pub const SW_RESET: u8 = 0x12;
    pub const TEMPERATURE: u8 = 0x18;
    pub const ACTIVATE: u8 = 0x20;
    pub const UPDATE_CTRL_1: u8 = 0x21;
    pub const UPDATE_CTRL_2: u8 = 0x22;
    pub const RAM_BW: u8 = 0x24;
    pub const RAM_RED: u8 = 0x26;
    pub const BORDER: u8 = 0x3C;
    pub const RAM_X_RANGE: u8 = 0x44;
    pub const RAM_Y_RANGE: u8 = 0x45;
    pub const RAM_X_COUNTER: u8 = 0x4E;
    pub const RAM_Y_COUNTER: u8 = 0x4F;

    /// Registers the controller only accepts once the previous operation
    /// has released BUSY.
    pub fn needs_idle(register: u8) -> bool {
        matches!(
            register,
            SW_RESET | TEMPERATURE | ACTIVATE | UPDATE_CTRL_1 | UPDATE_CTRL_2 | RAM_BW | RAM_RED
                | DEEP_SLEEP
        )
    }
}

type Step = (u8, &'static [u8]);

/// Scan direction, lost on every hardware reset.
const SCAN_SETUP: &[Step] = &[(reg::DRIVER_OUTPUT, &[0xF9, 0x00, 0x00]), (reg::DATA_ENTRY, &[0x03])];

const RAM_WINDOW: &[Step] = &[
    (reg::RAM_X_RANGE, &[0x00, 0x0F]),
    (reg::RAM_Y_RANGE, &[0x00, 0x00, 0xF9, 0x00]),
    (reg::RAM_X_COUNTER, &[0x00]),
    (reg::RAM_Y_COUNTER, &[0x00, 0x00]),
];

const FULL_SETUP: &[Step] = &[
    (reg::BORDER, &[0x05]),
    (reg::UPDATE_CTRL_1, &[0x00, 0x80]),
    (reg::TEMPERATURE, &[0x80]),
];

const PARTIAL_SETUP: &[Step] = &[(reg::BORDER, &[0x80])];

const FULL_WAVEFORM: u8 = 0xF7;
const PARTIAL_WAVEFORM: u8 = 0xFF;

/// Pixels pushed to the panel while a refresh may still be running.
///
/// A partial refresh can be queued while the panel is busy as long as it
/// does not change a pixel the running refresh is still driving.
pub(crate) struct InFlight {
    touched: Box<[u8]>,
    last_frame: Box<[u8]>,
}

impl InFlight {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            touched: vec![0x00; len].into_boxed_slice(),
            last_frame: vec![0xFF; len].into_boxed_slice(),
        }
    }

    /// The panel went idle: nothing is being driven any more.
    pub(crate) fn settle(&mut self) {
        self.touched.fill(0x00);
    }

    pub(crate) fn conflicts_with(&self, frame: &[u8]) -> bool {
        self.touched
            .iter()
            .zip(self.last_frame.iter())
            .zip(frame.iter())
            .any(|((touched, last), next)| touched & (last ^ next) != 0)
    }

    pub(crate) fn record(&mut self, frame: &[u8]) {
        for ((touched, last), next) in self
            .touched
            .iter_mut()
            .zip(self.last_frame.iter_mut())
            .zip(frame.iter())
        {
            *touched |= *last ^ next;
            *last = *next;
        }
    }
}

pub struct Epd2in13v4 {
    spi: SpidevBus,
    busy: CdevPin,
    dc: CdevPin,
    rst: CdevPin,
    delay: Delay,
    last_mode: Option<RefreshMode>,
    in_flight: InFlight,
}

impl Epd2in13v4 {
    pub fn new(
        spi: SpidevBus,
        busy: CdevPin,
        dc: CdevPin,
        rst: CdevPin,
        delay: Delay,
    ) -> EpdResult<Self> {
        let mut driver = Self {
            spi,
            busy,
            dc,
            rst,
            delay,
            last_mode: None,
            in_flight: InFlight::new(BUFFER_SIZE),
        };
        driver.reset(RESET_PULSE_MS)?;
        driver.command(reg::SW_RESET, &[])?;
        Ok(driver)
    }

    fn reset(&mut self, pulse_ms: u32) -> EpdResult<()> {
        trace!("EPD: reset pulse {pulse_ms}ms");
        self.rst.set_high()?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.rst.set_low()?;
        self.delay.delay_ms(pulse_ms);
        self.rst.set_high()?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    fn command(&mut self, register: u8, data: &[u8]) -> EpdResult<()> {
        if reg::needs_idle(register) {
            self.wait_idle()?;
        }
        trace!("EPD: reg 0x{register:02X} + {} bytes", data.len());
        self.dc.set_low()?;
        self.spi.write(&[register])?;
        if !data.is_empty() {
            self.dc.set_high()?;
            self.spi.write(data)?;
        }
        Ok(())
    }

    fn run(&mut self, steps: &[Step]) -> EpdResult<()> {
        steps
            .iter()
            .try_for_each(|&(register, data)| self.command(register, data))
    }

    fn wait_idle(&mut self) -> EpdResult<()> {
        let start = Instant::now();
        while self.busy.is_high()? {
            if start.elapsed().as_millis() > u128::from(BUSY_TIMEOUT_MS) {
                debug!("EPD: still busy after {BUSY_TIMEOUT_MS}ms");
                return Err(Error::Timeout(BUSY_TIMEOUT_MS));
            }
            self.delay.delay_ms(BUSY_POLL_MS);
        }
        trace!("EPD: idle after {}ms", start.elapsed().as_millis());
        Ok(())
    }

    pub fn sleep(&mut self) -> EpdResult<()> {
        self.command(reg::DEEP_SLEEP, &[0x01])?;
        self.delay.delay_ms(DEEP_SLEEP_SETTLE_MS);
        Ok(())
    }

    pub fn display(&mut self, frame: &[u8], mode: RefreshMode) -> EpdResult<()> {
        debug!("EPD: {mode:?} refresh of {} bytes", frame.len());

        let busy = self.busy.is_high()?;
        if !busy {
            self.in_flight.settle();
        }

        let result = match mode {
            RefreshMode::Full => self.full_refresh(frame),
            RefreshMode::Partial => {
                if busy && self.in_flight.conflicts_with(frame) {
                    debug!("EPD: frame overlaps running refresh, waiting");
                    self.wait_idle()?;
                }
                self.partial_refresh(frame)
            }
        };

        if result.is_ok() {
            self.in_flight.record(frame);
        }
        self.last_mode = Some(mode);
        result
    }

    fn full_refresh(&mut self, frame: &[u8]) -> EpdResult<()> {
        self.run(RAM_WINDOW)?;
        self.run(SCAN_SETUP)?;
        self.run(FULL_SETUP)?;
        self.command(reg::RAM_BW, frame)?;
        self.command(reg::RAM_RED, frame)?;
        self.command(reg::UPDATE_CTRL_2, &[FULL_WAVEFORM])?;
        self.command(reg::ACTIVATE, &[])
    }

    fn partial_refresh(&mut self, frame: &[u8]) -> EpdResult<()> {
        // The first partial after a full refresh must not start until the
        // full waveform has finished.
        if self.last_mode != Some(RefreshMode::Partial) {
            self.wait_idle()?;
        }
        self.rst.set_low()?;
        self.delay.delay_ms(PARTIAL_RESET_PULSE_MS);
        self.rst.set_high()?;
        self.run(RAM_WINDOW)?;
        self.run(PARTIAL_SETUP)?;
        self.run(SCAN_SETUP)?;
        self.command(reg::RAM_BW, frame)?;
        self.command(reg::UPDATE_CTRL_2, &[PARTIAL_WAVEFORM])?;
        self.command(reg::ACTIVATE, &[])
    }
}
