use super::card::{CardEvent, PlayerCard, card_rects};
use super::SETTINGS_SCREEN_ID;
use crate::apps::AppContext;
use crate::models::{GameState, player::MAX_NAME_LEN};
use crate::sound::Sound;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use inkdeck_launcher::Navigator;
use inkdeck_storage::SharedPreferences;
use inkdeck_ui::{
    Chrome, Redraw, Screen, Touch,
    widgets::{HeaderBar, HeaderEvent, Keyboard, KeyboardEvent},
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);

/// From this many players on, cards use the smaller life font.
const COMPACT_FROM: usize = 4;

/// Player cards, plus the rename keyboard while it is open.
pub struct LifeScreen {
    chrome: Chrome,
    game: Rc<RefCell<GameState>>,
    prefs: SharedPreferences,
    navigator: Navigator,
    sound: Rc<Sound>,
    cards: Vec<PlayerCard>,
    /// Player being renamed
    editing: Option<(usize, Keyboard)>,
    unsaved: bool,
    last_save: Option<Instant>,
}

impl LifeScreen {
    pub fn new(ctx: &AppContext, game: Rc<RefCell<GameState>>) -> Self {
        Self {
            chrome: Chrome::new(ctx.toolbar())
                .with_header(HeaderBar::new("LIFE COUNTER").with_left("< HOME").with_right("SETTINGS")),
            game,
            prefs: ctx.prefs.clone(),
            navigator: ctx.navigator.clone(),
            sound: Rc::clone(&ctx.sound),
            cards: Vec::new(),
            editing: None,
            unsaved: false,
            last_save: None,
        }
    }

    fn create_cards(&mut self) {
        let game = self.game.borrow();
        let compact = game.player_count() >= COMPACT_FROM;
        self.cards = game
            .active_players()
            .iter()
            .map(|player| PlayerCard::new(player, compact))
            .collect();
    }

    fn save(&mut self) {
        self.game.borrow().save(&self.prefs);
        self.unsaved = false;
    }

    fn open_keyboard(&mut self, index: usize) {
        let name = self.game.borrow().players[index].name().to_string();
        log::debug!("Renaming player {}", index + 1);
        self.editing = Some((index, Keyboard::new("Name", &name, MAX_NAME_LEN)));
        self.chrome.request_full_redraw();
    }

    fn handle_keyboard(&mut self, touch: &Touch) {
        let Some((index, keyboard)) = self.editing.as_mut() else {
            return;
        };
        let index = *index;
        match keyboard.handle_touch(touch) {
            KeyboardEvent::Ignored | KeyboardEvent::Consumed => {}
            KeyboardEvent::Done(name) => {
                self.editing = None;
                let mut game = self.game.borrow_mut();
                game.players[index].set_name(&name);
                if let Some(card) = self.cards.get_mut(index) {
                    card.sync(&game.players[index]);
                }
                drop(game);
                self.save();
                self.chrome.request_full_redraw();
            }
            KeyboardEvent::Cancelled(_) => {
                self.editing = None;
                self.chrome.request_full_redraw();
            }
        }
    }

    fn handle_cards(&mut self, touch: &Touch) -> bool {
        let mut consumed = false;
        for index in 0..self.cards.len() {
            match self.cards[index].handle_touch(touch) {
                CardEvent::Ignored => {}
                CardEvent::Consumed => consumed = true,
                CardEvent::Adjust(delta) => {
                    consumed = true;
                    let mut game = self.game.borrow_mut();
                    game.players[index].adjust_life(delta);
                    self.cards[index].sync(&game.players[index]);
                    self.unsaved = true;
                    self.sound.click();
                }
                CardEvent::EditName => {
                    self.sound.click();
                    self.open_keyboard(index);
                    return true;
                }
            }
        }
        consumed
    }
}

impl<D: DrawTarget<Color = BinaryColor>> Screen<D> for LifeScreen {
    fn on_enter(&mut self) {
        self.game.borrow_mut().load(&self.prefs);
        self.create_cards();
        self.unsaved = false;
        self.last_save = None;
        self.chrome.request_full_redraw();
    }

    fn on_exit(&mut self) {
        self.save();
        self.cards.clear();
        self.editing = None;
    }

    fn update(&mut self, now: Instant) {
        self.chrome.update(now);
        let last = *self.last_save.get_or_insert(now);
        if self.unsaved && now.saturating_duration_since(last) >= AUTOSAVE_INTERVAL {
            log::debug!("Autosaving game");
            self.save();
            self.last_save = Some(now);
        }
    }

    fn draw(&mut self, display: &mut D) -> Result<Redraw, D::Error> {
        let mut frame = self.chrome.begin(display)?;
        if frame.is_full() {
            let rects = card_rects(self.cards.len(), frame.content());
            for (card, rect) in self.cards.iter_mut().zip(rects) {
                card.layout(rect);
            }
            if let Some((_, keyboard)) = self.editing.as_mut() {
                keyboard.layout(frame.body());
            }
        }
        match self.editing.as_mut() {
            Some((_, keyboard)) => {
                frame.draw(keyboard)?;
            }
            None => {
                for card in &mut self.cards {
                    frame.draw(card)?;
                }
            }
        }
        Ok(frame.finish())
    }

    fn handle_touch(&mut self, touch: &Touch) -> bool {
        if self.editing.is_some() {
            self.handle_keyboard(touch);
            return true;
        }
        match self.chrome.handle_touch(touch) {
            HeaderEvent::Left => {
                self.sound.click();
                self.navigator.home();
                return true;
            }
            HeaderEvent::Right => {
                self.sound.click();
                self.navigator.push(SETTINGS_SCREEN_ID);
                return true;
            }
            HeaderEvent::Consumed => return true,
            HeaderEvent::Ignored => {}
        }
        self.handle_cards(touch)
    }

    fn needs_full_redraw(&self) -> bool {
        self.chrome.needs_full_redraw()
    }

    fn request_full_redraw(&mut self) {
        self.chrome.request_full_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::testing::{self, commands, tap};
    use inkdeck_launcher::NavCommand;
    use inkdeck_storage::{MemoryPreferences, shared};
    use inkdeck_ui::{Component, MemoryDisplay, Rect};

    struct Fixture {
        screen: LifeScreen,
        game: Rc<RefCell<GameState>>,
        prefs: SharedPreferences,
        display: MemoryDisplay,
        receiver: crossbeam_channel::Receiver<NavCommand>,
    }

    fn center(rect: Rect) -> (i16, i16) {
        let c = rect.center();
        (i16::try_from(c.x).unwrap(), i16::try_from(c.y).unwrap())
    }

    impl Fixture {
        fn new() -> Self {
            let (ctx, receiver) = testing::context();
            let game = Rc::new(RefCell::new(GameState::default()));
            let mut screen = LifeScreen::new(&ctx, Rc::clone(&game));
            let mut display = MemoryDisplay::panel();
            let view: &mut dyn Screen<MemoryDisplay> = &mut screen;
            view.on_enter();
            view.draw(&mut display).unwrap();
            Self {
                screen,
                game,
                prefs: ctx.prefs,
                display,
                receiver,
            }
        }

        fn view(&mut self) -> &mut dyn Screen<MemoryDisplay> {
            &mut self.screen
        }

        fn draw(&mut self) -> Redraw {
            self.display.reset_counters();
            let Self { screen, display, .. } = self;
            Screen::<MemoryDisplay>::draw(screen, display).unwrap()
        }

        fn tap_control(&mut self, card: usize, control: usize, at: Instant) -> bool {
            let (x, y) = center(self.screen.cards[card].control_bounds()[control]);
            tap(self.view(), x, y, at)
        }

        fn tap_key(&mut self, label: &str, at: Instant) {
            let bounds = self.screen.editing.as_ref().and_then(|(_, kb)| kb.key_bounds(label));
            let (x, y) = center(bounds.unwrap());
            tap(self.view(), x, y, at);
        }

        fn stored_life(&self, player: usize) -> i16 {
            let mut prefs = self.prefs.borrow_mut();
            prefs.begin("mtg", true);
            let life = prefs.get_i16(&format!("p{player}life"), i16::MIN);
            prefs.end();
            life
        }
    }

    #[test]
    fn enter_builds_one_card_per_player() {
        let fixture = Fixture::new();
        assert_eq!(fixture.screen.cards.len(), 2);
        assert!(fixture.screen.cards.iter().all(|c| !c.bounds().is_empty()));
    }

    #[test]
    fn life_control_repaints_only_the_card() {
        let mut fixture = Fixture::new();
        assert!(fixture.tap_control(0, 3, Instant::now()));
        assert_eq!(fixture.game.borrow().players[0].life, 25);
        assert_eq!(fixture.screen.cards[0].life(), 25);

        assert_eq!(fixture.draw(), Redraw::Partial);
        let card = fixture.screen.cards[0].bounds();
        let area = usize::try_from(i32::from(card.w) * i32::from(card.h)).unwrap();
        assert!(fixture.display.pixels_drawn() < area * 3);
        assert_eq!(fixture.draw(), Redraw::None);
    }

    #[test]
    fn changes_autosave_after_five_seconds() {
        let mut fixture = Fixture::new();
        let start = Instant::now();
        fixture.view().update(start);
        fixture.tap_control(1, 0, start);
        assert_ne!(fixture.stored_life(2), 15);

        fixture.view().update(start + Duration::from_secs(2));
        assert_ne!(fixture.stored_life(2), 15);
        fixture.view().update(start + Duration::from_secs(5));
        assert_eq!(fixture.stored_life(2), 15);
    }

    #[test]
    fn exit_saves_and_drops_cards() {
        let mut fixture = Fixture::new();
        fixture.tap_control(0, 1, Instant::now());
        fixture.view().on_exit();
        assert!(fixture.screen.cards.is_empty());
        assert_eq!(fixture.stored_life(1), 19);
    }

    #[test]
    fn header_buttons_navigate() {
        let mut fixture = Fixture::new();
        let now = Instant::now();
        tap(fixture.view(), 12, 24, now);
        tap(fixture.view(), 230, 24, now);
        assert_eq!(
            commands(&fixture.receiver),
            [NavCommand::Home, NavCommand::Push("settings")]
        );
    }

    #[test]
    fn rename_through_the_keyboard() {
        let mut fixture = Fixture::new();
        let now = Instant::now();
        let (x, y) = center(fixture.screen.cards[0].name_bounds());
        tap(fixture.view(), x, y, now);
        assert!(fixture.screen.editing.is_some());
        assert_eq!(fixture.draw(), Redraw::Full);

        // "Player 1" is eight characters
        for _ in 0..8 {
            fixture.tap_key("<", now);
        }
        fixture.tap_key("K", now);
        fixture.tap_key("i", now);
        fixture.tap_key("m", now);
        fixture.tap_key("DONE", now);

        assert!(fixture.screen.editing.is_none());
        assert_eq!(fixture.game.borrow().players[0].name(), "Kim");
        assert_eq!(fixture.draw(), Redraw::Full);

        let mut reloaded = GameState::default();
        assert!(reloaded.load(&fixture.prefs));
        assert_eq!(reloaded.players[0].name(), "Kim");
    }

    #[test]
    fn cancel_keeps_the_old_name() {
        let mut fixture = Fixture::new();
        let now = Instant::now();
        fixture.screen.open_keyboard(1);
        fixture.draw();
        fixture.tap_key("<", now);
        fixture.tap_key("CANCEL", now);
        assert!(fixture.screen.editing.is_none());
        assert_eq!(fixture.game.borrow().players[1].name(), "Player 2");
    }

    #[test]
    fn keyboard_swallows_touches_outside_it() {
        let mut fixture = Fixture::new();
        fixture.screen.open_keyboard(1);
        fixture.draw();
        assert!(tap(fixture.view(), 5, 5, Instant::now()));
        assert!(commands(&fixture.receiver).is_empty());
        assert!(fixture.screen.editing.is_some());
    }

    #[test]
    fn stored_game_is_loaded_on_enter() {
        let prefs = shared(MemoryPreferences::new());
        let mut stored = GameState::default();
        stored.set_player_count(5);
        stored.save(&prefs);

        let (mut ctx, _receiver) = testing::context();
        ctx.prefs = prefs;
        let game = Rc::new(RefCell::new(GameState::default()));
        let mut screen = LifeScreen::new(&ctx, Rc::clone(&game));
        Screen::<MemoryDisplay>::on_enter(&mut screen);
        assert_eq!(screen.cards.len(), 5);
    }
}
