use crate::common::{HEIGHT, Rotation, TouchPhase, TouchSample, WIDTH};
use crate::error::EpdResult;
use crate::touch_driver::{self, Contact, ContactTracker, TouchDriver, Transition};
use crossbeam_channel::Receiver;
use embedded_graphics::geometry::Point;
use linux_embedded_hal::gpio_cdev::{EventRequestFlags, Line, LineRequestFlags};

/// Map raw controller coordinates into display coordinates.
fn to_display(rotation: Rotation, contact: Contact) -> Point {
    match rotation {
        Rotation::Deg0 => Point::new(
            WIDTH.cast_signed() - 1 - contact.x,
            HEIGHT.cast_signed() - 1 - contact.y,
        ),
        Rotation::Deg90 => Point::new(HEIGHT.cast_signed() - 1 - contact.y, contact.x),
    }
}

pub struct Touch {
    driver: TouchDriver,
    _int_line: Line,
}

impl Touch {
    /// Start the interrupt reader thread. Samples arrive on the returned
    /// channel until the receiver is dropped.
    pub fn new(
        driver: TouchDriver,
        int_line: Line,
        rotation: Rotation,
    ) -> EpdResult<(Self, Receiver<TouchSample>)> {
        let (sample_tx, sample_rx) = crossbeam_channel::unbounded();
        let events = int_line.events(
            LineRequestFlags::INPUT,
            EventRequestFlags::FALLING_EDGE,
            "touchscreen-int",
        )?;
        let bus = driver.shared_bus();

        std::thread::spawn(move || {
            let mut tracker = ContactTracker::default();
            for _ in events.flatten() {
                let contact = match touch_driver::read_contact(&bus) {
                    Ok(contact) => contact,
                    Err(e) => {
                        log::error!("Error reading touch data: {e}");
                        continue;
                    }
                };
                let sample = match tracker.report(contact) {
                    Some(Transition::Down(c)) => TouchSample {
                        point: to_display(rotation, c),
                        phase: TouchPhase::Down,
                    },
                    Some(Transition::Up(c)) => TouchSample {
                        point: to_display(rotation, c),
                        phase: TouchPhase::Up,
                    },
                    None => continue,
                };
                if sample_tx.send(sample).is_err() {
                    log::debug!("Touch receiver dropped, stopping reader");
                    break;
                }
            }
        });

        Ok((
            Self {
                driver,
                _int_line: int_line,
            },
            sample_rx,
        ))
    }

    pub(crate) fn sleep(&mut self) -> EpdResult<()> {
        self.driver.sleep()
    }
}
