use crate::common::{BUFFER_SIZE, HEIGHT, RefreshMode, Rotation, WIDTH};
use crate::display_driver::Epd2in13v4;
use crate::error::EpdResult;
use embedded_graphics::{
    geometry::Dimensions,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Pixel, Point, PointsIter, Size},
    primitives::Rectangle,
};
use log::debug;

/// Partial refreshes allowed before one is upgraded to a full refresh.
/// The SSD1680 ghosts visibly after roughly ten consecutive partials.
pub const DEFAULT_MAX_PARTIAL_REFRESHES: u8 = 10;

const ROW_BYTES: u32 = WIDTH.div_ceil(8);

fn fill_byte(color: BinaryColor) -> u8 {
    if color.is_on() { 0xFF } else { 0x00 }
}

/// Byte index and bit mask of `point` in the panel's native buffer, or
/// `None` when it falls outside the glass.
pub(crate) fn buffer_position(rotation: Rotation, point: Point) -> Option<(usize, u8)> {
    let (x, y) = match rotation {
        Rotation::Deg0 => (point.x, point.y),
        Rotation::Deg90 => (WIDTH.cast_signed() - 1 - point.y, point.x),
    };
    let x = u32::try_from(x).ok().filter(|x| *x < WIDTH)?;
    let y = u32::try_from(y).ok().filter(|y| *y < HEIGHT)?;
    let index = usize::try_from(y * ROW_BYTES + x / 8).ok()?;
    Some((index, 0x80 >> (x % 8)))
}

/// Frame buffer plus refresh policy for the panel.
pub struct Display {
    driver: Epd2in13v4,
    buffer: Box<[u8]>,
    rotation: Rotation,
    partials_since_full: u8,
    max_partial_refreshes: u8,
}

impl Display {
    #[must_use]
    pub fn new(driver: Epd2in13v4, rotation: Rotation) -> Self {
        Self {
            driver,
            buffer: vec![fill_byte(BinaryColor::On); BUFFER_SIZE].into_boxed_slice(),
            rotation,
            partials_since_full: 0,
            max_partial_refreshes: DEFAULT_MAX_PARTIAL_REFRESHES,
        }
    }

    pub fn set_max_partial_refreshes(&mut self, max: u8) {
        self.max_partial_refreshes = max.max(1);
    }

    /// Push the buffer to the glass. A partial request becomes a full
    /// refresh when the ghosting budget is spent.
    pub fn refresh(&mut self, requested: RefreshMode) -> EpdResult<()> {
        let mode = match requested {
            RefreshMode::Partial if self.partials_since_full >= self.max_partial_refreshes => {
                debug!("EPD: {} partial refreshes, forcing full", self.partials_since_full);
                RefreshMode::Full
            }
            other => other,
        };

        self.driver.display(&self.buffer, mode)?;
        self.partials_since_full = match mode {
            RefreshMode::Full => 0,
            RefreshMode::Partial => self.partials_since_full.saturating_add(1),
        };
        Ok(())
    }

    pub(crate) fn sleep(&mut self) -> EpdResult<()> {
        self.driver.sleep()
    }
}

impl DrawTarget for Display {
    type Color = BinaryColor;
    type Error = crate::error::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            if let Some((index, mask)) = buffer_position(self.rotation, point) {
                if color.is_on() {
                    self.buffer[index] |= mask;
                } else {
                    self.buffer[index] &= !mask;
                }
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.is_zero_sized() {
            return Ok(());
        }
        self.draw_iter(area.points().map(|p| Pixel(p, color)))
    }

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        self.buffer.fill(fill_byte(color));
        Ok(())
    }
}

impl OriginDimensions for Display {
    fn size(&self) -> Size {
        match self.rotation {
            Rotation::Deg0 => Size::new(WIDTH, HEIGHT),
            Rotation::Deg90 => Size::new(HEIGHT, WIDTH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_origin_maps_to_last_column() {
        let (index, mask) = buffer_position(Rotation::Deg90, Point::zero()).unwrap();
        // x = WIDTH - 1 = 121 -> byte 15, bit 1
        assert_eq!(index, 15);
        assert_eq!(mask, 0x80 >> 1);
    }

    #[test]
    fn portrait_points_map_row_major() {
        assert_eq!(buffer_position(Rotation::Deg0, Point::new(9, 2)), Some((2 * 16 + 1, 0x40)));
    }

    #[test]
    fn off_glass_points_are_rejected() {
        assert_eq!(buffer_position(Rotation::Deg0, Point::new(-1, 0)), None);
        assert_eq!(buffer_position(Rotation::Deg0, Point::new(122, 0)), None);
        assert_eq!(buffer_position(Rotation::Deg90, Point::new(0, 122)), None);
    }
}
