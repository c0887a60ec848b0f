use embedded_graphics::{
    prelude::{Point, Size},
    primitives::Rectangle,
};

/// Axis-aligned rectangle in display coordinates.
///
/// Containment is half-open: the right and bottom edges are outside, and a
/// rectangle with zero (or negative) width or height contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i16,
    pub y: i16,
    pub w: i16,
    pub h: i16,
}

fn saturate(v: i32) -> i16 {
    i16::try_from(v).unwrap_or(if v < 0 { i16::MIN } else { i16::MAX })
}

impl Rect {
    pub const fn new(x: i16, y: i16, w: i16, h: i16) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: i16, py: i16) -> bool {
        let (px, py) = (i32::from(px), i32::from(py));
        let (x, y) = (i32::from(self.x), i32::from(self.y));
        x <= px && px < x + i32::from(self.w) && y <= py && py < y + i32::from(self.h)
    }

    pub fn contains_point(&self, point: Point) -> bool {
        match (i16::try_from(point.x), i16::try_from(point.y)) {
            (Ok(px), Ok(py)) => self.contains(px, py),
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn right(&self) -> i16 {
        saturate(i32::from(self.x) + i32::from(self.w))
    }

    pub fn bottom(&self) -> i16 {
        saturate(i32::from(self.y) + i32::from(self.h))
    }

    pub fn center(&self) -> Point {
        Point::new(
            i32::from(self.x) + i32::from(self.w) / 2,
            i32::from(self.y) + i32::from(self.h) / 2,
        )
    }

    /// Shrink by `by` on every side.
    #[must_use]
    pub fn inset(&self, by: i16) -> Self {
        Self::new(
            self.x.saturating_add(by),
            self.y.saturating_add(by),
            self.w.saturating_sub(by.saturating_mul(2)).max(0),
            self.h.saturating_sub(by.saturating_mul(2)).max(0),
        )
    }

    /// Split off the top `height` rows; returns (top, rest).
    pub fn split_top(&self, height: i16) -> (Self, Self) {
        let height = height.clamp(0, self.h.max(0));
        (
            Self::new(self.x, self.y, self.w, height),
            Self::new(self.x, self.y + height, self.w, self.h - height),
        )
    }

    /// Split off the bottom `height` rows; returns (rest, bottom).
    pub fn split_bottom(&self, height: i16) -> (Self, Self) {
        let height = height.clamp(0, self.h.max(0));
        (
            Self::new(self.x, self.y, self.w, self.h - height),
            Self::new(self.x, self.y + self.h - height, self.w, height),
        )
    }

    pub fn from_rectangle(rect: &Rectangle) -> Self {
        Self::new(
            saturate(rect.top_left.x),
            saturate(rect.top_left.y),
            saturate(i32::try_from(rect.size.width).unwrap_or(i32::MAX)),
            saturate(i32::try_from(rect.size.height).unwrap_or(i32::MAX)),
        )
    }
}

impl From<Rect> for Rectangle {
    fn from(rect: Rect) -> Self {
        Rectangle::new(
            Point::new(i32::from(rect.x), i32::from(rect.y)),
            Size::new(
                u32::try_from(rect.w).unwrap_or(0),
                u32::try_from(rect.h).unwrap_or(0),
            ),
        )
    }
}
