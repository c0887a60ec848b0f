//! Screen geometry shared by all screens.

use crate::component::Component;
use crate::rect::Rect;
use crate::widgets::Button;
use embedded_graphics::{prelude::Point, primitives::Rectangle};
use embedded_layout::{
    layout::linear::{FixedMargin, LinearLayout},
    prelude::*,
};

pub const TOOLBAR_HEIGHT: i16 = 14;
pub const HEADER_HEIGHT: i16 = 20;
pub const MARGIN: i16 = 3;

impl View for Button {
    fn bounds(&self) -> Rectangle {
        Component::bounds(self).into()
    }

    fn translate_impl(&mut self, by: Point) {
        let mut bounds = Component::bounds(self);
        bounds.x = bounds.x.saturating_add(i16::try_from(by.x).unwrap_or(0));
        bounds.y = bounds.y.saturating_add(i16::try_from(by.y).unwrap_or(0));
        self.set_bounds(bounds);
    }
}

/// Place `buttons` left to right starting at `origin`, each `size`
/// wide/high as given, separated by `spacing` pixels.
pub fn button_row(buttons: &mut [Button], origin: Point, widths: &[i16], height: i16, spacing: i16) {
    for (button, width) in buttons.iter_mut().zip(widths.iter().copied().chain(std::iter::repeat(0))) {
        button.set_bounds(Rect::new(0, 0, width, height));
    }
    let mut row = LinearLayout::horizontal(Views::new(buttons))
        .with_spacing(FixedMargin(i32::from(spacing)))
        .with_alignment(vertical::Top)
        .arrange();
    let first = row.bounds().top_left;
    row.translate_mut(origin - first);
}

/// Equal-width button row filling `area`.
pub fn fill_row(buttons: &mut [Button], area: Rect, spacing: i16) {
    let Ok(count) = i16::try_from(buttons.len()) else {
        return;
    };
    if count == 0 {
        return;
    }
    let width = (area.w - spacing * (count - 1)) / count;
    let widths = vec![width; buttons.len()];
    button_row(buttons, Point::new(i32::from(area.x), i32::from(area.y)), &widths, area.h, spacing);
}

/// Split `area` into `count` equal columns separated by `gap`. The last
/// column absorbs the rounding remainder.
pub fn columns(area: Rect, count: usize, gap: i16) -> Vec<Rect> {
    let Ok(n) = i16::try_from(count) else {
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }
    let width = (area.w - gap * (n - 1)) / n;
    (0..n)
        .map(|i| {
            let x = area.x + i * (width + gap);
            let w = if i == n - 1 { area.right() - x } else { width };
            Rect::new(x, area.y, w, area.h)
        })
        .collect()
}

/// Split `area` into `count` equal rows separated by `gap`.
pub fn rows(area: Rect, count: usize, gap: i16) -> Vec<Rect> {
    let Ok(n) = i16::try_from(count) else {
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }
    let height = (area.h - gap * (n - 1)) / n;
    (0..n)
        .map(|i| {
            let y = area.y + i * (height + gap);
            let h = if i == n - 1 { area.bottom() - y } else { height };
            Rect::new(area.x, y, area.w, h)
        })
        .collect()
}

/// A `w` by `h` rectangle centred in `area`.
pub fn centered(area: Rect, w: i16, h: i16) -> Rect {
    let w = w.min(area.w);
    let h = h.min(area.h);
    Rect::new(area.x + (area.w - w) / 2, area.y + (area.h - h) / 2, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_cover_area() {
        let cols = columns(Rect::new(0, 34, 250, 88), 3, 2);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0], Rect::new(0, 34, 82, 88));
        assert_eq!(cols[1].x, 84);
        assert_eq!(cols[2].right(), 250);
    }

    #[test]
    fn rows_cover_area() {
        let r = rows(Rect::new(0, 34, 250, 88), 2, 0);
        assert_eq!(r[0], Rect::new(0, 34, 250, 44));
        assert_eq!(r[1], Rect::new(0, 78, 250, 44));
    }

    #[test]
    fn empty_split_is_empty() {
        assert!(columns(Rect::new(0, 0, 10, 10), 0, 1).is_empty());
        assert!(rows(Rect::new(0, 0, 10, 10), 0, 1).is_empty());
    }

    #[test]
    fn centered_clamps_to_area() {
        assert_eq!(centered(Rect::new(0, 0, 100, 50), 40, 20), Rect::new(30, 15, 40, 20));
        assert_eq!(centered(Rect::new(0, 0, 10, 10), 40, 20), Rect::new(0, 0, 10, 10));
    }

    #[test]
    fn button_row_places_left_to_right() {
        let mut buttons = vec![Button::new("2"), Button::new("3"), Button::new("4")];
        button_row(&mut buttons, Point::new(50, 40), &[20, 20, 30], 18, 4);
        assert_eq!(Component::bounds(&buttons[0]), Rect::new(50, 40, 20, 18));
        assert_eq!(Component::bounds(&buttons[1]), Rect::new(74, 40, 20, 18));
        assert_eq!(Component::bounds(&buttons[2]), Rect::new(98, 40, 30, 18));
    }

    #[test]
    fn fill_row_splits_evenly() {
        let mut buttons = vec![Button::new("OFF"), Button::new("ON")];
        fill_row(&mut buttons, Rect::new(100, 10, 102, 16), 2);
        assert_eq!(Component::bounds(&buttons[0]), Rect::new(100, 10, 50, 16));
        assert_eq!(Component::bounds(&buttons[1]), Rect::new(152, 10, 50, 16));
    }
}
