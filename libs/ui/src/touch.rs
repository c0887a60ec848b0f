use embedded_graphics::prelude::Point;
use std::time::Instant;

/// One touch sample as seen by screens.
///
/// `pressed` is set while the finger is on the glass, `released` on the
/// sample where it lifts (carrying the last position). Controls give visual
/// feedback on press and commit their action only on release inside their
/// bounds, so dragging off a control cancels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    pub x: i16,
    pub y: i16,
    pub pressed: bool,
    pub released: bool,
    pub at: Instant,
}

fn clamp_coord(v: i32) -> i16 {
    i16::try_from(v).unwrap_or(if v < 0 { i16::MIN } else { i16::MAX })
}

impl Touch {
    pub fn press(x: i16, y: i16, at: Instant) -> Self {
        Self {
            x,
            y,
            pressed: true,
            released: false,
            at,
        }
    }

    pub fn release(x: i16, y: i16, at: Instant) -> Self {
        Self {
            x,
            y,
            pressed: false,
            released: true,
            at,
        }
    }

    pub fn from_sample(sample: epd_2in13_v4::TouchSample, at: Instant) -> Self {
        let (x, y) = (clamp_coord(sample.point.x), clamp_coord(sample.point.y));
        match sample.phase {
            epd_2in13_v4::TouchPhase::Down => Self::press(x, y, at),
            epd_2in13_v4::TouchPhase::Up => Self::release(x, y, at),
        }
    }

    pub fn point(&self) -> Point {
        Point::new(i32::from(self.x), i32::from(self.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epd_2in13_v4::{TouchPhase, TouchSample};

    #[test]
    fn samples_map_to_press_and_release() {
        let now = Instant::now();
        let down = Touch::from_sample(
            TouchSample {
                point: Point::new(12, 40),
                phase: TouchPhase::Down,
            },
            now,
        );
        assert!(down.pressed && !down.released);
        assert_eq!((down.x, down.y), (12, 40));

        let up = Touch::from_sample(
            TouchSample {
                point: Point::new(100_000, -100_000),
                phase: TouchPhase::Up,
            },
            now,
        );
        assert!(up.released && !up.pressed);
        assert_eq!((up.x, up.y), (i16::MAX, i16::MIN));
    }
}
