use inkdeck_ui::text;

pub const MAX_NAME_LEN: usize = 15;
pub const MIN_LIFE: i16 = -999;
pub const MAX_LIFE: i16 = 9999;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    pub life: i16,
}

impl Player {
    pub fn new(name: &str, life: i16) -> Self {
        Self {
            name: text::truncate(name, MAX_NAME_LEN),
            life: life.clamp(MIN_LIFE, MAX_LIFE),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Longer names are cut to fifteen characters.
    pub fn set_name(&mut self, name: &str) {
        self.name = text::truncate(name, MAX_NAME_LEN);
    }

    /// Add `delta`, clamping to the displayable range.
    pub fn adjust_life(&mut self, delta: i16) {
        let life = (i32::from(self.life) + i32::from(delta)).clamp(i32::from(MIN_LIFE), i32::from(MAX_LIFE));
        self.life = i16::try_from(life).unwrap_or(if delta < 0 { MIN_LIFE } else { MAX_LIFE });
    }

    /// Back to `starting_life`, clamped like any other life total.
    pub fn reset(&mut self, starting_life: i16) {
        self.life = starting_life.clamp(MIN_LIFE, MAX_LIFE);
    }
}
