use crate::error::{EpdResult, Error};
use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use linux_embedded_hal::{CdevPin, I2cdev};
use log::info;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

const GT1151_ADDR: u8 = 0x14;
const PRODUCT_ID_REG: u16 = 0x8140;
const STATUS_REG: u16 = 0x814E;
const COMMAND_REG: u16 = 0x8040;
const SLEEP_COMMAND: u8 = 0x05;
const REPORT_LEN: usize = 9;
const RESET_LOW_MS: u64 = 10;
const RESET_HIGH_MS: u64 = 50;

/// Raw controller coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub x: i32,
    pub y: i32,
}

/// Contact transitions derived from successive controller reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Down(Contact),
    Up(Contact),
}

/// Turns the controller's "N fingers at (x, y)" reports into down/up
/// transitions. Reports that keep a finger down only move the remembered
/// position, so `Up` is delivered where the finger left the glass.
#[derive(Debug, Default)]
pub struct ContactTracker {
    held: Option<Contact>,
}

impl ContactTracker {
    pub fn report(&mut self, contact: Option<Contact>) -> Option<Transition> {
        match (self.held, contact) {
            (None, Some(c)) => {
                self.held = Some(c);
                Some(Transition::Down(c))
            }
            (Some(_), Some(c)) => {
                self.held = Some(c);
                None
            }
            (Some(last), None) => {
                self.held = None;
                Some(Transition::Up(last))
            }
            (None, None) => None,
        }
    }
}

pub struct TouchDriver {
    i2c: Arc<Mutex<I2cdev>>,
}

fn i2c_error(context: &str, e: impl std::fmt::Display) -> Error {
    Error::Touch(format!("{context}: {e}"))
}

impl TouchDriver {
    pub fn new(i2c: I2cdev, mut rst_pin: CdevPin) -> EpdResult<Self> {
        info!("Initializing touchscreen...");
        rst_pin.set_low()?;
        thread::sleep(Duration::from_millis(RESET_LOW_MS));
        rst_pin.set_high()?;
        thread::sleep(Duration::from_millis(RESET_HIGH_MS));

        let driver = Self {
            i2c: Arc::new(Mutex::new(i2c)),
        };
        let product = driver.product_id()?;
        info!("Touch controller product ID: {product}");
        Ok(driver)
    }

    pub fn shared_bus(&self) -> Arc<Mutex<I2cdev>> {
        Arc::clone(&self.i2c)
    }

    fn product_id(&self) -> EpdResult<String> {
        let mut id = [0u8; 4];
        self.i2c
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_read(GT1151_ADDR, &PRODUCT_ID_REG.to_be_bytes(), &mut id)
            .map_err(|e| i2c_error("product ID read failed", e))?;
        Ok(String::from_utf8_lossy(&id).into_owned())
    }

    pub fn sleep(&mut self) -> EpdResult<()> {
        let [hi, lo] = COMMAND_REG.to_be_bytes();
        self.i2c
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(GT1151_ADDR, &[hi, lo, SLEEP_COMMAND])
            .map_err(|e| i2c_error("sleep command failed", e))
    }
}

/// Read the first contact from the controller and acknowledge the report.
pub fn read_contact(i2c: &Mutex<I2cdev>) -> EpdResult<Option<Contact>> {
    let mut bus = i2c.lock().unwrap_or_else(PoisonError::into_inner);
    let [hi, lo] = STATUS_REG.to_be_bytes();
    let mut report = [0u8; REPORT_LEN];

    bus.write_read(GT1151_ADDR, &[hi, lo], &mut report)
        .map_err(|e| i2c_error("status read failed", e))?;
    bus.write(GT1151_ADDR, &[hi, lo, 0])
        .map_err(|e| i2c_error("status clear failed", e))?;

    if report[0] & 0x0F == 0 {
        return Ok(None);
    }
    Ok(Some(Contact {
        x: i32::from(u16::from_le_bytes([report[2], report[3]])),
        y: i32::from(u16::from_le_bytes([report[4], report[5]])),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Contact = Contact { x: 10, y: 20 };
    const B: Contact = Contact { x: 12, y: 80 };

    #[test]
    fn first_contact_is_down() {
        let mut tracker = ContactTracker::default();
        assert_eq!(tracker.report(Some(A)), Some(Transition::Down(A)));
    }

    #[test]
    fn held_finger_reports_nothing() {
        let mut tracker = ContactTracker::default();
        tracker.report(Some(A));
        assert_eq!(tracker.report(Some(A)), None);
        assert_eq!(tracker.report(Some(B)), None);
    }

    #[test]
    fn lift_reports_last_position() {
        let mut tracker = ContactTracker::default();
        tracker.report(Some(A));
        tracker.report(Some(B));
        assert_eq!(tracker.report(None), Some(Transition::Up(B)));
        assert_eq!(tracker.report(None), None);
    }
}
