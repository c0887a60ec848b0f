use crate::rect::Rect;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};

/// Bounds and dirty flag shared by every component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentState {
    bounds: Rect,
    dirty: bool,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

impl ComponentState {
    /// New components start dirty so their first draw renders.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            dirty: true,
        }
    }
}

/// A redrawable element of a screen.
///
/// `draw` renders only while the dirty flag is set and clears it afterwards;
/// a forced full-screen repaint marks every component dirty first.
pub trait Component {
    fn state(&self) -> &ComponentState;

    fn state_mut(&mut self) -> &mut ComponentState;

    /// Paint the component unconditionally.
    fn render<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>;

    fn bounds(&self) -> Rect {
        self.state().bounds
    }

    /// Move or resize. Always marks the component dirty.
    fn set_bounds(&mut self, bounds: Rect) {
        let state = self.state_mut();
        state.bounds = bounds;
        state.dirty = true;
    }

    fn is_dirty(&self) -> bool {
        self.state().dirty
    }

    fn mark_dirty(&mut self) {
        self.state_mut().dirty = true;
    }

    /// Render if dirty. Returns whether anything was rendered.
    fn draw<D>(&mut self, display: &mut D) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.render(display)?;
        self.state_mut().dirty = false;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemoryDisplay;
    use embedded_graphics::{
        prelude::Primitive,
        primitives::{PrimitiveStyle, Rectangle},
        Drawable,
    };

    struct Swatch {
        state: ComponentState,
        renders: usize,
    }

    impl Component for Swatch {
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
            self.renders += 1;
            Rectangle::from(self.bounds())
                .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
                .draw(display)
        }
    }

    fn swatch() -> Swatch {
        Swatch {
            state: ComponentState::default(),
            renders: 0,
        }
    }

    #[test]
    fn starts_dirty() {
        let mut display = MemoryDisplay::new(40, 40);
        let mut s = swatch();
        assert!(s.is_dirty());
        assert!(s.draw(&mut display).unwrap());
        assert!(!s.is_dirty());
    }

    #[test]
    fn set_bounds_then_draw_renders_once() {
        let mut display = MemoryDisplay::new(40, 40);
        let mut s = swatch();
        s.draw(&mut display).unwrap();

        s.set_bounds(Rect::new(2, 2, 5, 5));
        assert!(s.draw(&mut display).unwrap());
        assert_eq!(display.pixels_drawn(), 25);

        display.reset_counters();
        assert!(!s.draw(&mut display).unwrap());
        assert_eq!(display.pixels_drawn(), 0);
        assert_eq!(s.renders, 2);
    }

    #[test]
    fn mark_dirty_forces_render() {
        let mut display = MemoryDisplay::new(10, 10);
        let mut s = swatch();
        s.draw(&mut display).unwrap();
        s.mark_dirty();
        assert!(s.draw(&mut display).unwrap());
    }
}
