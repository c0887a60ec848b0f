//! Magic: The Gathering life counter

mod card;
mod game_settings;
mod life;

use super::AppContext;
use crate::models::GameState;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use game_settings::GameSettingsScreen;
use inkdeck_launcher::{App, AppMetadata, LaunchContext};
use inkdeck_storage::SharedPreferences;
use inkdeck_ui::Screen;
use life::LifeScreen;
use std::cell::RefCell;
use std::rc::Rc;

/// Id of the game settings screen, persisted in the navigation stack.
pub const SETTINGS_SCREEN_ID: &str = "settings";

static METADATA: AppMetadata = AppMetadata {
    id: "mtg",
    name: "MTG Life",
    // Open Iconic heart
    icon: Some('\u{00b8}'),
    show_in_launcher: true,
};

/// Owns the game shared by the life and settings screens.
pub struct MtgApp {
    game: Rc<RefCell<GameState>>,
    prefs: SharedPreferences,
    life: LifeScreen,
    settings: GameSettingsScreen,
}

impl MtgApp {
    pub fn new(ctx: &AppContext) -> Self {
        let game = Rc::new(RefCell::new(GameState::default()));
        Self {
            life: LifeScreen::new(ctx, Rc::clone(&game)),
            settings: GameSettingsScreen::new(ctx, Rc::clone(&game)),
            prefs: ctx.prefs.clone(),
            game,
        }
    }
}

impl<D: DrawTarget<Color = BinaryColor>> App<D> for MtgApp {
    fn metadata(&self) -> &'static AppMetadata {
        &METADATA
    }

    fn on_launch(&mut self, _context: &LaunchContext<'_>) {
        if !self.game.borrow_mut().load(&self.prefs) {
            log::warn!("No usable saved game, starting fresh");
        }
    }

    fn on_suspend(&mut self) {
        self.game.borrow().save(&self.prefs);
    }

    fn main_screen(&mut self) -> &mut dyn Screen<D> {
        &mut self.life
    }

    fn screen(&mut self, id: &str) -> Option<&mut dyn Screen<D>> {
        (id == SETTINGS_SCREEN_ID).then_some(&mut self.settings as &mut dyn Screen<D>)
    }
}
