use crate::component::{Component, ComponentState};
use crate::fonts;
use crate::status::{StatusReading, StatusSource};
use crate::text;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget, primitives::Rectangle};
use std::rc::Rc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const PAD: i16 = 3;

/// Black status strip at the top of every screen: device label, clock and
/// battery level. Dirty only when a reading changes.
pub struct Toolbar {
    state: ComponentState,
    label: String,
    source: Rc<dyn StatusSource>,
    reading: StatusReading,
    last_poll: Option<Instant>,
}

impl Toolbar {
    pub fn new(label: &str, source: Rc<dyn StatusSource>) -> Self {
        let reading = source.read();
        Self {
            state: ComponentState::default(),
            label: label.to_string(),
            source,
            reading,
            last_poll: None,
        }
    }

    pub fn reading(&self) -> &StatusReading {
        &self.reading
    }

    /// Re-read the status source at most every few seconds.
    pub fn poll(&mut self, now: Instant) {
        if self
            .last_poll
            .is_some_and(|last| now.saturating_duration_since(last) < POLL_INTERVAL)
        {
            return;
        }
        self.last_poll = Some(now);
        let reading = self.source.read();
        if reading != self.reading {
            log::trace!("Toolbar reading changed: {reading:?}");
            self.reading = reading;
            self.mark_dirty();
        }
    }
}

impl Component for Toolbar {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }

    fn render<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let bounds = self.bounds();
        display.fill_solid(&Rectangle::from(bounds), BinaryColor::Off)?;
        text::left::<fonts::FONT_SMALL, D>(display, &self.label, bounds, PAD, BinaryColor::On)?;
        text::centered::<fonts::FONT_SMALL, D>(display, &self.reading.clock, bounds, BinaryColor::On)?;
        if let Some(pct) = self.reading.battery {
            text::right::<fonts::FONT_SMALL, D>(display, &format!("{pct}%"), bounds, PAD, BinaryColor::On)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Rect;
    use crate::surface::MemoryDisplay;
    use std::cell::Cell;

    struct Ticking {
        minute: Cell<u8>,
    }

    impl StatusSource for Ticking {
        fn read(&self) -> StatusReading {
            StatusReading {
                clock: format!("12:{:02}", self.minute.get()),
                battery: Some(80),
            }
        }
    }

    #[test]
    fn unchanged_reading_stays_clean() {
        let mut display = MemoryDisplay::panel();
        let source = Rc::new(Ticking { minute: Cell::new(0) });
        let mut bar = Toolbar::new("INKDECK", source);
        bar.set_bounds(Rect::new(0, 0, 250, 14));
        bar.draw(&mut display).unwrap();

        bar.poll(Instant::now());
        assert!(!bar.is_dirty());
    }

    #[test]
    fn changed_reading_marks_dirty_after_interval() {
        let mut display = MemoryDisplay::panel();
        let source = Rc::new(Ticking { minute: Cell::new(0) });
        let mut bar = Toolbar::new("INKDECK", source.clone());
        bar.draw(&mut display).unwrap();

        let t = Instant::now();
        bar.poll(t);
        source.minute.set(1);
        bar.poll(t + Duration::from_secs(1));
        assert!(!bar.is_dirty());
        bar.poll(t + POLL_INTERVAL);
        assert!(bar.is_dirty());
        assert_eq!(bar.reading().clock, "12:01");
    }
}
