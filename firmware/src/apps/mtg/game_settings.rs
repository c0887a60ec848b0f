use super::SETTINGS_SCREEN_ID;
use crate::apps::AppContext;
use crate::models::GameState;
use crate::models::game::{MIN_PLAYERS, STARTING_LIFE_OPTIONS};
use crate::sound::Sound;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use inkdeck_launcher::Navigator;
use inkdeck_storage::SharedPreferences;
use inkdeck_ui::{
    Chrome, Rect, Redraw, Screen, Touch, fonts,
    layout::{self, MARGIN},
    text,
    widgets::{Button, ButtonEvent, ConfirmDialog, DialogEvent, HeaderBar, HeaderEvent},
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

const LABEL_WIDTH: i16 = 44;
const ROW_GAP: i16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    ResetLife,
    NewGame,
}

impl Pending {
    fn question(self) -> &'static str {
        match self {
            Self::ResetLife => "Reset all life totals?",
            Self::NewGame => "Start a new game? Names and player count are reset.",
        }
    }
}

/// Player count, starting life and the two reset actions.
pub struct GameSettingsScreen {
    chrome: Chrome,
    game: Rc<RefCell<GameState>>,
    prefs: SharedPreferences,
    navigator: Navigator,
    sound: Rc<Sound>,
    /// 2 through 6 players
    players: [Button; 5],
    lives: [Button; 4],
    /// Reset Life, New Game
    actions: [Button; 2],
    labels: [Rect; 2],
    confirm: Option<(Pending, ConfirmDialog)>,
}

impl GameSettingsScreen {
    pub fn new(ctx: &AppContext, game: Rc<RefCell<GameState>>) -> Self {
        Self {
            chrome: Chrome::new(ctx.toolbar())
                .with_header(HeaderBar::new("GAME SETTINGS").with_left("< BACK")),
            game,
            prefs: ctx.prefs.clone(),
            navigator: ctx.navigator.clone(),
            sound: Rc::clone(&ctx.sound),
            players: std::array::from_fn(|i| Button::new(&(usize::from(MIN_PLAYERS) + i).to_string())),
            lives: STARTING_LIFE_OPTIONS.map(|life| Button::new(&life.to_string())),
            actions: [Button::new("Reset Life"), Button::new("New Game")],
            labels: [Rect::default(); 2],
            confirm: None,
        }
    }

    fn sync_selection(&mut self) {
        let game = self.game.borrow();
        let count = game.player_count();
        for (i, button) in self.players.iter_mut().enumerate() {
            button.set_selected(usize::from(MIN_PLAYERS) + i == count);
        }
        for (button, life) in self.lives.iter_mut().zip(STARTING_LIFE_OPTIONS) {
            button.set_selected(life == game.starting_life);
        }
    }

    fn layout(&mut self, content: Rect) {
        let rows = layout::rows(content.inset(MARGIN), 3, ROW_GAP);
        for (i, row) in rows.iter().take(2).enumerate() {
            let (label, options) = split_left(*row, LABEL_WIDTH);
            self.labels[i] = label;
            if i == 0 {
                layout::fill_row(&mut self.players, options, 2);
            } else {
                layout::fill_row(&mut self.lives, options, 2);
            }
        }
        if let Some(row) = rows.get(2) {
            layout::fill_row(&mut self.actions, *row, 6);
        }
    }

    fn apply(&mut self, pending: Pending) {
        {
            let mut game = self.game.borrow_mut();
            match pending {
                Pending::ResetLife => game.reset_life_totals(),
                Pending::NewGame => game.reset(),
            }
            log::info!("Game settings: {pending:?}");
        }
        self.save();
    }

    fn save(&mut self) {
        self.game.borrow().save(&self.prefs);
        self.sync_selection();
    }

    fn handle_dialog(&mut self, touch: &Touch) {
        let Some((pending, dialog)) = self.confirm.as_mut() else {
            return;
        };
        let pending = *pending;
        match dialog.handle_touch(touch) {
            DialogEvent::Consumed => {}
            DialogEvent::Confirmed => {
                self.sound.click();
                self.confirm = None;
                self.apply(pending);
                self.chrome.request_full_redraw();
            }
            DialogEvent::Cancelled => {
                self.sound.click();
                self.confirm = None;
                self.chrome.request_full_redraw();
            }
        }
    }

    fn handle_options(&mut self, touch: &Touch) -> bool {
        let mut consumed = false;
        let mut clicked_players = None;
        for (i, button) in self.players.iter_mut().enumerate() {
            let event = button.handle_touch(touch);
            consumed |= event.consumed();
            if event == ButtonEvent::Clicked {
                clicked_players = Some(i);
            }
        }
        let mut clicked_life = None;
        for (button, life) in self.lives.iter_mut().zip(STARTING_LIFE_OPTIONS) {
            let event = button.handle_touch(touch);
            consumed |= event.consumed();
            if event == ButtonEvent::Clicked {
                clicked_life = Some(life);
            }
        }
        let mut clicked_action = None;
        for (button, pending) in self.actions.iter_mut().zip([Pending::ResetLife, Pending::NewGame]) {
            let event = button.handle_touch(touch);
            consumed |= event.consumed();
            if event == ButtonEvent::Clicked {
                clicked_action = Some(pending);
            }
        }

        if let Some(i) = clicked_players.and_then(|i| u8::try_from(i).ok()) {
            self.sound.click();
            self.game.borrow_mut().set_player_count(MIN_PLAYERS + i);
            self.save();
        }
        if let Some(life) = clicked_life {
            self.sound.click();
            self.game.borrow_mut().starting_life = life;
            self.save();
        }
        if let Some(pending) = clicked_action {
            self.sound.click();
            self.confirm = Some((pending, ConfirmDialog::new(pending.question())));
            self.chrome.request_full_redraw();
        }
        consumed
    }
}

fn split_left(area: Rect, width: i16) -> (Rect, Rect) {
    let width = width.clamp(0, area.w.max(0));
    (
        Rect::new(area.x, area.y, width, area.h),
        Rect::new(area.x + width, area.y, area.w - width, area.h),
    )
}

impl<D: DrawTarget<Color = BinaryColor>> Screen<D> for GameSettingsScreen {
    fn screen_id(&self) -> &'static str {
        SETTINGS_SCREEN_ID
    }

    fn on_enter(&mut self) {
        self.sync_selection();
        self.chrome.request_full_redraw();
    }

    fn on_exit(&mut self) {
        self.confirm = None;
    }

    fn update(&mut self, now: Instant) {
        self.chrome.update(now);
    }

    fn draw(&mut self, display: &mut D) -> Result<Redraw, D::Error> {
        let mut frame = self.chrome.begin(display)?;
        if frame.is_full() {
            self.layout(frame.content());
            for (label, caption) in self.labels.iter().zip(["Players", "Life"]) {
                text::left::<fonts::FONT_SMALL, D>(frame.display(), caption, *label, 0, BinaryColor::Off)?;
            }
            if let Some((_, dialog)) = self.confirm.as_mut() {
                dialog.layout(frame.content());
            }
        }
        if let Some((_, dialog)) = self.confirm.as_mut() {
            if frame.is_full() {
                for button in self.players.iter_mut().chain(&mut self.lives).chain(&mut self.actions) {
                    frame.draw(button)?;
                }
            }
            frame.draw(dialog)?;
        } else {
            for button in self.players.iter_mut().chain(&mut self.lives).chain(&mut self.actions) {
                frame.draw(button)?;
            }
        }
        Ok(frame.finish())
    }

    fn handle_touch(&mut self, touch: &Touch) -> bool {
        if self.confirm.is_some() {
            self.handle_dialog(touch);
            return true;
        }
        match self.chrome.handle_touch(touch) {
            HeaderEvent::Left => {
                self.sound.click();
                self.navigator.pop();
                return true;
            }
            HeaderEvent::Consumed | HeaderEvent::Right => return true,
            HeaderEvent::Ignored => {}
        }
        self.handle_options(touch)
    }

    fn needs_full_redraw(&self) -> bool {
        self.chrome.needs_full_redraw()
    }

    fn request_full_redraw(&mut self) {
        self.chrome.request_full_redraw();
    }
}
