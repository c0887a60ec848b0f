//! Toolbar and header shared by every screen, plus the per-frame drawing
//! context that decides between a full and a partial refresh.

use crate::component::Component;
use crate::layout::{HEADER_HEIGHT, TOOLBAR_HEIGHT};
use crate::rect::Rect;
use crate::screen::Redraw;
use crate::touch::Touch;
use crate::widgets::{HeaderBar, HeaderEvent, Toolbar};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::*};
use std::time::Instant;

/// The fixed top of a screen. Owns the screen's full-redraw flag, which
/// starts set so the first draw after construction paints everything.
pub struct Chrome {
    toolbar: Toolbar,
    header: Option<HeaderBar>,
    full_redraw: bool,
    body: Rect,
    content: Rect,
}

impl Chrome {
    pub fn new(toolbar: Toolbar) -> Self {
        Self {
            toolbar,
            header: None,
            full_redraw: true,
            body: Rect::default(),
            content: Rect::default(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: HeaderBar) -> Self {
        self.header = Some(header);
        self
    }

    pub fn header_mut(&mut self) -> Option<&mut HeaderBar> {
        self.header.as_mut()
    }

    pub fn toolbar_mut(&mut self) -> &mut Toolbar {
        &mut self.toolbar
    }

    pub fn needs_full_redraw(&self) -> bool {
        self.full_redraw
    }

    pub fn request_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    /// Area below the toolbar and header as of the last full redraw.
    pub fn content(&self) -> Rect {
        self.content
    }

    /// Area below the toolbar, header included. Overlays such as the
    /// keyboard cover it.
    pub fn body(&self) -> Rect {
        self.body
    }

    pub fn update(&mut self, now: Instant) {
        self.toolbar.poll(now);
    }

    /// Route a touch to the header. `Ignored` when there is no header or
    /// the touch is below it.
    pub fn handle_touch(&mut self, touch: &Touch) -> HeaderEvent {
        self.header
            .as_mut()
            .map_or(HeaderEvent::Ignored, |header| header.handle_touch(touch))
    }

    /// Start a frame. On a pending full redraw the surface is cleared and
    /// the chrome re-laid out before anything is painted.
    pub fn begin<'d, D>(&mut self, display: &'d mut D) -> Result<Frame<'d, D>, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let full = self.full_redraw;
        if full {
            self.full_redraw = false;
            display.clear(BinaryColor::On)?;
            let area = Rect::from_rectangle(&display.bounding_box());
            let (toolbar, rest) = area.split_top(TOOLBAR_HEIGHT);
            self.toolbar.set_bounds(toolbar);
            self.body = rest;
            self.content = match self.header.as_mut() {
                Some(header) => {
                    let (bar, content) = rest.split_top(HEADER_HEIGHT);
                    header.layout(bar);
                    content
                }
                None => rest,
            };
        }

        let mut frame = Frame {
            display,
            full,
            drawn: full,
            body: self.body,
            content: self.content,
        };
        frame.draw(&mut self.toolbar)?;
        if let Some(header) = self.header.as_mut() {
            frame.draw(header)?;
        }
        Ok(frame)
    }
}

/// Drawing context for one call to a screen's `draw`.
pub struct Frame<'d, D> {
    display: &'d mut D,
    full: bool,
    drawn: bool,
    body: Rect,
    content: Rect,
}

impl<'d, D> Frame<'d, D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    /// Whether this frame repaints the whole surface. Screens re-lay out
    /// their components on full frames.
    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn content(&self) -> Rect {
        self.content
    }

    pub fn body(&self) -> Rect {
        self.body
    }

    /// Raw access for painting that is not a component.
    pub fn display(&mut self) -> &mut D {
        self.drawn = true;
        self.display
    }

    /// Paint `component` if it is dirty. On a full frame every component
    /// is painted regardless.
    pub fn draw<C: Component>(&mut self, component: &mut C) -> Result<bool, D::Error> {
        if self.full {
            component.mark_dirty();
        }
        let drawn = component.draw(self.display)?;
        self.drawn |= drawn;
        Ok(drawn)
    }

    pub fn finish(self) -> Redraw {
        match (self.full, self.drawn) {
            (true, _) => Redraw::Full,
            (false, true) => Redraw::Partial,
            (false, false) => Redraw::None,
        }
    }
}
