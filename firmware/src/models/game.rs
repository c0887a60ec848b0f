use super::player::Player;
use inkdeck_storage::{SharedPreferences, scoped, schema::{self, mtg}};

pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: usize = 6;
pub const DEFAULT_PLAYER_COUNT: u8 = 2;
pub const DEFAULT_STARTING_LIFE: i16 = 20;
pub const STARTING_LIFE_OPTIONS: [i16; 4] = [20, 25, 30, 40];

fn default_name(index: usize) -> String {
    format!("Player {}", index + 1)
}

fn clamp_player_count(count: u8) -> u8 {
    count.clamp(MIN_PLAYERS, u8::try_from(MAX_PLAYERS).unwrap_or(u8::MAX))
}

/// The life counter's game: all six player slots are kept so names and
/// totals survive shrinking and regrowing the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    player_count: u8,
    pub starting_life: i16,
    pub players: [Player; MAX_PLAYERS],
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYER_COUNT,
            starting_life: DEFAULT_STARTING_LIFE,
            players: std::array::from_fn(|i| Player::new(&default_name(i), DEFAULT_STARTING_LIFE)),
        }
    }
}

impl GameState {
    pub fn player_count(&self) -> usize {
        usize::from(self.player_count)
    }

    /// Clamped to two through six.
    pub fn set_player_count(&mut self, count: u8) {
        self.player_count = clamp_player_count(count);
    }

    pub fn active_players(&self) -> &[Player] {
        &self.players[..self.player_count()]
    }

    /// Back to defaults: two players, default names, 20 life.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Every seated player back to the starting life.
    pub fn reset_life_totals(&mut self) {
        let count = self.player_count();
        let starting_life = self.starting_life;
        for player in &mut self.players[..count] {
            player.reset(starting_life);
        }
    }

    /// Load from the `mtg` namespace. On failure the state is reset to
    /// defaults and `false` returned.
    pub fn load(&mut self, prefs: &SharedPreferences) -> bool {
        let loaded = scoped(prefs, mtg::NAMESPACE, true, |store| {
            if !schema::is_supported(store) {
                return None;
            }
            let mut state = Self::default();
            state.set_player_count(store.get_u8(mtg::PLAYER_COUNT, DEFAULT_PLAYER_COUNT));
            state.starting_life = store.get_i16(mtg::STARTING_LIFE, DEFAULT_STARTING_LIFE);
            for (i, player) in state.players.iter_mut().enumerate() {
                let name = store.get_string(&mtg::player_name_key(i + 1), &default_name(i));
                *player = Player::new(&name, store.get_i16(&mtg::player_life_key(i + 1), state.starting_life));
            }
            Some(state)
        })
        .flatten();

        match loaded {
            Some(state) => {
                *self = state;
                true
            }
            None => {
                self.reset();
                false
            }
        }
    }

    pub fn save(&self, prefs: &SharedPreferences) -> bool {
        let saved = scoped(prefs, mtg::NAMESPACE, false, |store| {
            let mut ok = schema::stamp(store)
                && store.put_u8(mtg::PLAYER_COUNT, self.player_count)
                && store.put_i16(mtg::STARTING_LIFE, self.starting_life);
            for (i, player) in self.players.iter().enumerate() {
                ok &= store.put_string(&mtg::player_name_key(i + 1), player.name());
                ok &= store.put_i16(&mtg::player_life_key(i + 1), player.life);
            }
            ok
        })
        .unwrap_or(false);
        if !saved {
            log::warn!("Failed to save game state");
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdeck_storage::{MemoryPreferences, shared};

    #[test]
    fn defaults() {
        let game = GameState::default();
        assert_eq!(game.player_count(), 2);
        assert_eq!(game.starting_life, 20);
        assert_eq!(game.players[5].name(), "Player 6");
        assert_eq!(game.active_players().len(), 2);
    }

    #[test]
    fn player_count_is_clamped() {
        let mut game = GameState::default();
        game.set_player_count(9);
        assert_eq!(game.player_count(), 6);
        game.set_player_count(1);
        assert_eq!(game.player_count(), 2);
    }

    #[test]
    fn reset_life_totals_only_touches_seated_players() {
        let mut game = GameState::default();
        game.starting_life = 40;
        game.players[0].life = 3;
        game.players[4].life = 7;
        game.reset_life_totals();
        assert_eq!(game.players[0].life, 40);
        assert_eq!(game.players[4].life, 7);
    }

    #[test]
    fn new_game_restores_defaults() {
        let mut game = GameState::default();
        game.set_player_count(5);
        game.players[0].set_name("Ana");
        game.reset();
        assert_eq!(game, GameState::default());
    }

    #[test]
    fn save_then_load() {
        let prefs = shared(MemoryPreferences::new());
        let mut game = GameState::default();
        game.set_player_count(4);
        game.starting_life = 40;
        game.players[2].set_name("Kim");
        game.players[2].life = -12;
        assert!(game.save(&prefs));

        let mut loaded = GameState::default();
        assert!(loaded.load(&prefs));
        assert_eq!(loaded, game);
    }

    #[test]
    fn stored_player_count_is_clamped() {
        let prefs = shared(MemoryPreferences::new());
        {
            let mut store = prefs.borrow_mut();
            store.begin(mtg::NAMESPACE, false);
            store.put_u8(mtg::PLAYER_COUNT, 12);
            store.end();
        }
        let mut game = GameState::default();
        assert!(game.load(&prefs));
        assert_eq!(game.player_count(), 6);
    }

    #[test]
    fn stored_starting_life_is_clamped_on_reset() {
        let prefs = shared(MemoryPreferences::new());
        {
            let mut store = prefs.borrow_mut();
            store.begin(mtg::NAMESPACE, false);
            store.put_i16(mtg::STARTING_LIFE, 20000);
            store.end();
        }
        let mut game = GameState::default();
        assert!(game.load(&prefs));
        game.reset_life_totals();
        assert!(game.active_players().iter().all(|p| p.life == 9999));
    }

    #[test]
    fn unavailable_store_falls_back_to_defaults() {
        let mut memory = MemoryPreferences::new();
        memory.set_available(false);
        let prefs = shared(memory);
        let mut game = GameState::default();
        game.set_player_count(3);
        assert!(!game.load(&prefs));
        assert_eq!(game, GameState::default());
        assert!(!game.save(&prefs));
    }

    #[test]
    fn newer_layout_falls_back_to_defaults() {
        let prefs = shared(MemoryPreferences::new());
        {
            let mut store = prefs.borrow_mut();
            store.begin(mtg::NAMESPACE, false);
            store.put_u8(schema::VERSION_KEY, schema::SCHEMA_VERSION + 1);
            store.put_u8(mtg::PLAYER_COUNT, 5);
            store.end();
        }
        let mut game = GameState::default();
        assert!(!game.load(&prefs));
        assert_eq!(game.player_count(), 2);
    }
}
