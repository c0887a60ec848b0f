use crate::models::Player;
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use inkdeck_ui::{
    Component, ComponentState, Debounce, Rect, Touch, fonts, layout, text,
    widgets::{Button, ButtonEvent},
};

const DELTAS: [i16; 4] = [-5, -1, 1, 5];
const NAME_HEIGHT: i16 = 12;
const BUTTON_HEIGHT: i16 = 16;
const PAD: i16 = 2;

/// Outcome of a touch on a player card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardEvent {
    Ignored,
    Consumed,
    /// A life control fired.
    Adjust(i16),
    /// The name was tapped.
    EditName,
}

/// One player's name, life total and life controls.
pub struct PlayerCard {
    state: ComponentState,
    name: String,
    life: i16,
    compact: bool,
    controls: [Button; 4],
    name_pressed: bool,
    name_debounce: Debounce,
}

impl PlayerCard {
    pub fn new(player: &Player, compact: bool) -> Self {
        Self {
            state: ComponentState::default(),
            name: player.name().to_string(),
            life: player.life,
            compact,
            controls: DELTAS.map(|delta| {
                Button::new(&format!("{delta:+}")).with_debounce(Debounce::LIFE_CONTROL)
            }),
            name_pressed: false,
            name_debounce: Debounce::new(Debounce::BUTTON),
        }
    }

    /// Pick up changes from the model. Dirty only if something shown changed.
    pub fn sync(&mut self, player: &Player) {
        if player.life != self.life || player.name() != self.name {
            self.life = player.life;
            self.name = player.name().to_string();
            self.mark_dirty();
        }
    }

    /// Place the card and its controls.
    pub fn layout(&mut self, bounds: Rect) {
        self.set_bounds(bounds);
        let (_, row) = bounds.inset(PAD).split_bottom(BUTTON_HEIGHT.min(bounds.h / 3));
        layout::fill_row(&mut self.controls, row, PAD);
    }

    fn name_area(&self) -> Rect {
        self.bounds().split_top(NAME_HEIGHT).0
    }

    fn life_area(&self) -> Rect {
        let (_, rest) = self.bounds().split_top(NAME_HEIGHT);
        let controls = self.controls[0].bounds();
        Rect::new(rest.x, rest.y, rest.w, controls.y - rest.y)
    }

    pub fn handle_touch(&mut self, touch: &Touch) -> CardEvent {
        let mut result = CardEvent::Ignored;
        let mut changed = false;
        for (button, delta) in self.controls.iter_mut().zip(DELTAS) {
            match button.handle_touch(touch) {
                ButtonEvent::Ignored => {}
                ButtonEvent::Clicked => {
                    changed = true;
                    result = CardEvent::Adjust(delta);
                }
                ButtonEvent::Pressed | ButtonEvent::Cancelled => {
                    changed = true;
                    if result == CardEvent::Ignored {
                        result = CardEvent::Consumed;
                    }
                }
            }
        }
        if changed {
            self.mark_dirty();
        }

        let on_name = self.name_area().contains(touch.x, touch.y);
        if touch.pressed {
            self.name_pressed = on_name;
        } else if touch.released && std::mem::take(&mut self.name_pressed) && on_name {
            if self.name_debounce.fire(touch.at) {
                return CardEvent::EditName;
            }
            return CardEvent::Consumed;
        }

        if result == CardEvent::Ignored && self.bounds().contains(touch.x, touch.y) {
            return CardEvent::Consumed;
        }
        result
    }
}

#[cfg(test)]
impl PlayerCard {
    pub fn life(&self) -> i16 {
        self.life
    }

    pub fn control_bounds(&self) -> [Rect; 4] {
        self.controls.each_ref().map(Component::bounds)
    }

    pub fn name_bounds(&self) -> Rect {
        self.name_area()
    }
}

impl Component for PlayerCard {
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
        let rect = Rectangle::from(bounds);
        rect.into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(display)?;
        rect.into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
            .draw(display)?;

        let name_area = self.name_area();
        text::centered::<fonts::FONT_SMALL, D>(display, &self.name, name_area, BinaryColor::Off)?;
        let underline = i32::from(name_area.bottom());
        Line::new(
            Point::new(i32::from(bounds.x), underline),
            Point::new(i32::from(bounds.right()) - 1, underline),
        )
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
        .draw(display)?;

        let life = self.life.to_string();
        let life_area = self.life_area();
        if self.compact {
            text::centered::<fonts::FONT_LIFE_SMALL, D>(display, &life, life_area, BinaryColor::Off)?;
        } else {
            text::centered::<fonts::FONT_LIFE_LARGE, D>(display, &life, life_area, BinaryColor::Off)?;
        }

        for button in &mut self.controls {
            button.mark_dirty();
            button.draw(display)?;
        }
        Ok(())
    }
}

/// Card placement for `count` players inside `area`: one row for two or
/// three, 2x2 for four, three over two for five, 3x2 for six.
pub fn card_rects(count: usize, area: Rect) -> Vec<Rect> {
    const GAP: i16 = 4;
    let area = area.inset(PAD);
    let row_counts: &[usize] = match count {
        0 => &[],
        1 => &[1],
        2 => &[2],
        3 => &[3],
        4 => &[2, 2],
        5 => &[3, 2],
        _ => &[3, 3],
    };
    layout::rows(area, row_counts.len(), GAP)
        .into_iter()
        .zip(row_counts)
        .flat_map(|(row, &n)| layout::columns(row, n, GAP))
        .collect()
}
