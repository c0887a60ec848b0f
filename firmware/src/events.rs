use epd_2in13_v4::TouchSample;

/// Everything the main loop wakes up for besides the frame tick.
#[derive(Clone, Copy, Debug)]
pub enum AppEvent {
    Touch(TouchSample),
    /// Ctrl-C or SIGTERM
    Shutdown,
}
