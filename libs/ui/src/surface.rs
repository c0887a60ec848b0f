use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Pixel, Size},
};
use epd_2in13_v4::RefreshMode;
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Slow refresh that flashes the panel.
    Full,
    /// Fast update of changed pixels.
    Partial,
}

/// A drawing target that can be flushed to a physical panel.
pub trait Surface: DrawTarget<Color = BinaryColor> {
    fn flush(&mut self, refresh: Refresh) -> Result<(), Self::Error>;
}

impl Surface for epd_2in13_v4::display::Display {
    fn flush(&mut self, refresh: Refresh) -> Result<(), Self::Error> {
        self.refresh(match refresh {
            Refresh::Full => RefreshMode::Full,
            Refresh::Partial => RefreshMode::Partial,
        })
    }
}

/// In-memory surface that records what was drawn and flushed.
#[derive(Debug, Clone)]
pub struct MemoryDisplay {
    size: Size,
    pixels: Vec<BinaryColor>,
    pixels_drawn: usize,
    clears: usize,
    flushes: Vec<Refresh>,
}

impl MemoryDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        let len = usize::try_from(width * height).unwrap_or(0);
        Self {
            size: Size::new(width, height),
            pixels: vec![BinaryColor::On; len],
            pixels_drawn: 0,
            clears: 0,
            flushes: Vec::new(),
        }
    }

    /// Same geometry as the landscape panel.
    pub fn panel() -> Self {
        Self::new(epd_2in13_v4::common::HEIGHT, epd_2in13_v4::common::WIDTH)
    }

    pub fn pixels_drawn(&self) -> usize {
        self.pixels_drawn
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn flushes(&self) -> &[Refresh] {
        &self.flushes
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(usize::try_from(y * self.size.width + x).ok()?)
            .copied()
    }

    pub fn reset_counters(&mut self) {
        self.pixels_drawn = 0;
        self.clears = 0;
        self.flushes.clear();
    }
}

impl DrawTarget for MemoryDisplay {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x >= self.size.width || y >= self.size.height {
                continue;
            }
            if let Ok(index) = usize::try_from(y * self.size.width + x) {
                self.pixels[index] = color;
                self.pixels_drawn += 1;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: BinaryColor) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        self.clears += 1;
        Ok(())
    }
}

impl OriginDimensions for MemoryDisplay {
    fn size(&self) -> Size {
        self.size
    }
}

impl Surface for MemoryDisplay {
    fn flush(&mut self, refresh: Refresh) -> Result<(), Self::Error> {
        self.flushes.push(refresh);
        Ok(())
    }
}
