//! On-screen QWERTY keyboard overlay.
//!
//! Created when text entry starts and dropped when it completes, so the
//! owning screen holds it as an `Option<Keyboard>`.

use super::button::{Button, ButtonEvent};
use crate::component::{Component, ComponentState};
use crate::fonts;
use crate::layout;
use crate::rect::Rect;
use crate::text;
use crate::touch::Touch;
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use std::time::Duration;

const ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL'", "^ZXCVBNM.^"];
const FIELD_HEIGHT: i16 = 16;
const KEY_GAP: i16 = 1;
const FIELD_CHARS: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Char(char),
    Backspace,
    Shift,
    Space,
    Done,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyboardEvent {
    /// Touch was outside the keyboard.
    Ignored,
    /// Touch handled, editing continues.
    Consumed,
    /// Editing finished with the edited text.
    Done(String),
    /// Editing abandoned; carries the text it started with.
    Cancelled(String),
}

pub struct Keyboard {
    state: ComponentState,
    prompt: String,
    original: String,
    buffer: String,
    max_len: usize,
    shifted: bool,
    keys: Vec<Key>,
    buttons: Vec<Button>,
}

impl Keyboard {
    /// Start editing `initial`, accepting at most `max_len` characters.
    /// The keyboard starts shifted so the first letter is upper case.
    pub fn new(prompt: &str, initial: &str, max_len: usize) -> Self {
        let mut keys = Vec::new();
        let mut buttons = Vec::new();
        for (row, chars) in ROWS.iter().enumerate() {
            for c in chars.chars() {
                keys.push(if c == '^' { Key::Shift } else { Key::Char(c) });
                buttons.push(Button::new(&c.to_string()).with_debounce(Duration::ZERO));
            }
            if row == 0 {
                keys.push(Key::Backspace);
                buttons.push(Button::new("<").with_debounce(Duration::ZERO));
            }
        }
        for (key, label) in [(Key::Space, "SPACE"), (Key::Done, "DONE"), (Key::Cancel, "CANCEL")] {
            keys.push(key);
            buttons.push(Button::new(label));
        }

        let mut keyboard = Self {
            state: ComponentState::default(),
            prompt: prompt.to_string(),
            original: initial.to_string(),
            buffer: text::truncate(initial, max_len),
            max_len,
            shifted: true,
            keys,
            buttons,
        };
        keyboard.relabel();
        keyboard
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_shifted(&self) -> bool {
        self.shifted
    }

    /// Bounds of the key currently showing `label`.
    pub fn key_bounds(&self, label: &str) -> Option<Rect> {
        self.buttons
            .iter()
            .find(|button| button.label() == label)
            .map(Component::bounds)
    }

    /// Lay out the entry field and the four key rows inside `bounds`.
    pub fn layout(&mut self, bounds: Rect) {
        self.set_bounds(bounds);
        let (_, keys_area) = bounds.split_top(FIELD_HEIGHT);
        let mut rest = self.buttons.as_mut_slice();
        for (row, area) in layout::rows(keys_area, 4, KEY_GAP).into_iter().enumerate() {
            let count = match row {
                0 => ROWS[0].len() + 1,
                1 | 2 => ROWS[row].len(),
                _ => 3,
            };
            let (current, tail) = rest.split_at_mut(count.min(rest.len()));
            rest = tail;
            if row == 3 {
                let space = area.w / 2;
                let side = (area.w - space - 2 * KEY_GAP) / 2;
                layout::button_row(
                    current,
                    Point::new(i32::from(area.x), i32::from(area.y)),
                    &[space, side, side],
                    area.h,
                    KEY_GAP,
                );
            } else {
                layout::fill_row(current, area, KEY_GAP);
            }
        }
    }

    fn relabel(&mut self) {
        let shifted = self.shifted;
        for (key, button) in self.keys.iter().zip(&mut self.buttons) {
            match *key {
                Key::Char(c) if c.is_ascii_alphabetic() => {
                    let label = if shifted {
                        c.to_ascii_uppercase()
                    } else {
                        c.to_ascii_lowercase()
                    };
                    button.set_label(&label.to_string());
                }
                Key::Shift => button.set_selected(shifted),
                _ => {}
            }
        }
    }

    fn push(&mut self, c: char) {
        if self.buffer.chars().count() < self.max_len {
            self.buffer.push(c);
        }
    }

    fn activate(&mut self, key: Key) -> KeyboardEvent {
        match key {
            Key::Char(c) => {
                let c = if self.shifted {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                };
                self.push(c);
                if self.shifted {
                    self.shifted = false;
                    self.relabel();
                }
            }
            Key::Backspace => {
                self.buffer.pop();
            }
            Key::Shift => {
                self.shifted = !self.shifted;
                self.relabel();
            }
            Key::Space => self.push(' '),
            Key::Done => return KeyboardEvent::Done(self.buffer.clone()),
            Key::Cancel => return KeyboardEvent::Cancelled(self.original.clone()),
        }
        KeyboardEvent::Consumed
    }

    pub fn handle_touch(&mut self, touch: &Touch) -> KeyboardEvent {
        let mut fired = None;
        let mut handled = false;
        for (key, button) in self.keys.iter().zip(&mut self.buttons) {
            match button.handle_touch(touch) {
                ButtonEvent::Ignored => {}
                ButtonEvent::Clicked => {
                    handled = true;
                    fired = Some(*key);
                }
                ButtonEvent::Pressed | ButtonEvent::Cancelled => handled = true,
            }
        }
        if handled {
            self.mark_dirty();
        }
        if let Some(key) = fired {
            return self.activate(key);
        }
        if handled || self.bounds().contains(touch.x, touch.y) {
            KeyboardEvent::Consumed
        } else {
            KeyboardEvent::Ignored
        }
    }
}

impl Component for Keyboard {
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
        display.fill_solid(&Rectangle::from(bounds), BinaryColor::On)?;

        let (field, _) = bounds.split_top(FIELD_HEIGHT);
        let shown = format!("{}: {}_", self.prompt, text::tail(&self.buffer, FIELD_CHARS));
        text::left::<fonts::FONT_SMALL, D>(display, &shown, field, 3, BinaryColor::Off)?;
        let underline = i32::from(field.bottom()) - 1;
        Line::new(
            Point::new(i32::from(field.x), underline),
            Point::new(i32::from(field.right()) - 1, underline),
        )
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
        .draw(display)?;

        for button in &mut self.buttons {
            button.mark_dirty();
            button.draw(display)?;
        }
        Ok(())
    }
}
