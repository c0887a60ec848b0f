use embedded_graphics::geometry::Point;

pub const WIDTH: u32 = 122;
pub const HEIGHT: u32 = 250;
pub const BUFFER_SIZE: usize = (WIDTH as usize).div_ceil(8) * HEIGHT as usize;

#[derive(Clone, Copy, Debug)]
pub enum Rotation {
    Deg0,
    Deg90,
}

/// How a frame is pushed to the glass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshMode {
    /// Slow refresh that flashes the panel and clears ghosting.
    Full,
    /// Fast refresh of changed pixels only.
    Partial,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Down,
    Up,
}

/// One contact transition in display coordinates. `Up` carries the last
/// position seen while the finger was down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchSample {
    pub point: Point,
    pub phase: TouchPhase,
}
