use crate::app::{App, LaunchContext};
use crate::navigator::NavCommand;
use crate::registry::AppRegistry;
use crossbeam_channel::Receiver;
use inkdeck_storage::{SharedPreferences, scoped, schema};
use inkdeck_ui::{MAIN_SCREEN_ID, Redraw, Screen, Surface, Touch};
use std::time::Instant;

/// Deepest allowed screen stack, main screen included.
pub const MAX_DEPTH: usize = 4;

/// Upper bound on queued navigation requests applied in one go, so a
/// screen that requests navigation from `on_enter` cannot spin forever.
const MAX_COMMANDS_PER_DRAIN: usize = 8;

/// The screen at `position` in an app's stack.
fn screen_at<'a, D: Surface>(
    app: &'a mut dyn App<D>,
    position: usize,
    id: &str,
) -> Option<&'a mut dyn Screen<D>> {
    if position == 0 {
        Some(app.main_screen())
    } else {
        app.screen(id)
    }
}

/// Which app is current and which of its screens are stacked.
///
/// Stack entry 0 is always the current app's main screen. Every mutation
/// persists the position so `restore_state` can resume it after a reboot.
/// Invalid requests (unknown ids, full stack) are logged and ignored.
pub struct Navigation<D: Surface> {
    registry: AppRegistry<D>,
    prefs: SharedPreferences,
    commands: Receiver<NavCommand>,
    current: Option<usize>,
    stack: heapless::Vec<&'static str, MAX_DEPTH>,
}

impl<D: Surface> Navigation<D> {
    pub fn new(registry: AppRegistry<D>, prefs: SharedPreferences, commands: Receiver<NavCommand>) -> Self {
        if registry.home_app().is_none() {
            log::error!("No home app registered, going home will do nothing");
        }
        Self {
            registry,
            prefs,
            commands,
            current: None,
            stack: heapless::Vec::new(),
        }
    }

    pub fn registry(&self) -> &AppRegistry<D> {
        &self.registry
    }

    pub fn current_app_id(&self) -> Option<&'static str> {
        let index = self.current?;
        self.registry.get(index).map(|app| app.metadata().id)
    }

    /// Id of the top screen, `"main"` for an app's main screen.
    pub fn current_screen_id(&self) -> Option<&'static str> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Stacked screen ids, bottom first.
    pub fn stack(&self) -> &[&'static str] {
        &self.stack
    }

    fn current_screen(&mut self) -> Option<&mut dyn Screen<D>> {
        let position = self.stack.len().checked_sub(1)?;
        let id = self.stack[position];
        let app = self.registry.get_mut(self.current?)?;
        screen_at(app, position, id)
    }

    pub fn launch_app(&mut self, app_id: &str) {
        match self.registry.position(app_id) {
            Some(index) => self.launch_index(index),
            None => log::warn!("Unknown app '{app_id}'"),
        }
    }

    fn launch_index(&mut self, index: usize) {
        if self.current == Some(index) {
            log::debug!("App '{}' already current", self.current_app_id().unwrap_or("?"));
            return;
        }

        if let Some(previous) = self.current
            && let Some(app) = self.registry.get_mut(previous)
        {
            log::info!("Suspending '{}'", app.metadata().id);
            app.on_suspend();
        }
        self.clear_stack();

        let launchable = self.registry.launchable_metadata();
        self.current = Some(index);
        let Some(app) = self.registry.get_mut(index) else {
            return;
        };
        log::info!("Launching '{}'", app.metadata().id);
        app.on_launch(&LaunchContext {
            launchable: &launchable,
        });
        let main = app.main_screen();
        main.on_enter();
        main.request_full_redraw();
        // Cannot fail, the stack was just emptied.
        let _ = self.stack.push(MAIN_SCREEN_ID);

        self.save_state();
    }

    /// Exit every stacked screen, top first.
    fn clear_stack(&mut self) {
        let current = self.current;
        while let Some(id) = self.stack.pop() {
            let position = self.stack.len();
            if let Some(app) = current.and_then(|index| self.registry.get_mut(index))
                && let Some(screen) = screen_at(app, position, id)
            {
                screen.on_exit();
            }
        }
    }

    /// Launch the home app unless it is already current.
    pub fn go_home(&mut self) {
        match self.registry.home_index() {
            Some(home) if self.current != Some(home) => self.launch_index(home),
            Some(_) => {}
            None => log::warn!("No home app to go to"),
        }
    }

    pub fn exit_app(&mut self) {
        self.go_home();
    }

    /// Push a secondary screen of the current app.
    pub fn push_screen(&mut self, screen_id: &str) {
        if self.stack.is_full() {
            log::warn!("Navigation stack full, not pushing '{screen_id}'");
            return;
        }
        let Some(app) = self.current.and_then(|index| self.registry.get_mut(index)) else {
            return;
        };
        let Some(screen) = app.screen(screen_id) else {
            log::warn!("App '{}' has no screen '{screen_id}'", app.metadata().id);
            return;
        };
        let id = screen.screen_id();

        if let Some(top) = self.current_screen() {
            top.on_exit();
        }
        if self.stack.push(id).is_err() {
            return;
        }
        log::info!("Pushed '{id}', depth {}", self.stack.len());
        if let Some(screen) = self.current_screen() {
            screen.on_enter();
            screen.request_full_redraw();
        }
        self.save_state();
    }

    /// Back one screen. At the main screen this goes home instead.
    pub fn pop_screen(&mut self) {
        if self.stack.len() <= 1 {
            self.go_home();
            return;
        }
        if let Some(top) = self.current_screen() {
            top.on_exit();
        }
        self.stack.pop();
        log::info!("Popped to '{}', depth {}", self.current_screen_id().unwrap_or("?"), self.stack.len());
        if let Some(screen) = self.current_screen() {
            screen.on_enter();
            screen.request_full_redraw();
        }
        self.save_state();
    }

    /// Apply navigation requests posted through `Navigator`.
    pub fn apply_pending(&mut self) {
        for _ in 0..MAX_COMMANDS_PER_DRAIN {
            let Ok(command) = self.commands.try_recv() else {
                return;
            };
            log::debug!("Applying {command:?}");
            match command {
                NavCommand::Launch(id) => self.launch_app(id),
                NavCommand::Push(id) => self.push_screen(id),
                NavCommand::Pop => self.pop_screen(),
                NavCommand::Home => self.go_home(),
            }
        }
        if !self.commands.is_empty() {
            log::warn!("Navigation requests left queued: {}", self.commands.len());
        }
    }

    pub fn update(&mut self, now: Instant) {
        if let Some(screen) = self.current_screen() {
            screen.update(now);
        }
        self.apply_pending();
    }

    /// Returns whether the top screen consumed the touch.
    pub fn handle_touch(&mut self, touch: &Touch) -> bool {
        let consumed = self
            .current_screen()
            .is_some_and(|screen| screen.handle_touch(touch));
        self.apply_pending();
        consumed
    }

    /// Draw the top screen and flush the panel if anything was painted.
    pub fn draw(&mut self, display: &mut D) -> Result<Redraw, D::Error> {
        let Some(screen) = self.current_screen() else {
            return Ok(Redraw::None);
        };
        let redraw = screen.draw(display)?;
        if let Some(refresh) = redraw.refresh() {
            log::debug!("Flushing with {refresh:?}");
            display.flush(refresh)?;
        }
        Ok(redraw)
    }

    /// Persist the current app and top screen. Returns `false` if the
    /// store could not be written.
    pub fn save_state(&mut self) -> bool {
        let (Some(app_id), Some(screen_id)) = (self.current_app_id(), self.current_screen_id()) else {
            return false;
        };
        scoped(&self.prefs, schema::nav::NAMESPACE, false, |prefs| {
            schema::stamp(prefs)
                && prefs.put_string(schema::nav::APP_ID, app_id)
                && prefs.put_string(schema::nav::SCREEN_ID, screen_id)
        })
        .unwrap_or(false)
    }

    /// Resume the persisted position. Unknown apps fall back to home and
    /// unknown screens to the app's main screen.
    pub fn restore_state(&mut self) {
        let (app_id, screen_id) = scoped(&self.prefs, schema::nav::NAMESPACE, true, |prefs| {
            if !schema::is_supported(prefs) {
                return None;
            }
            Some((
                prefs.get_string(schema::nav::APP_ID, "home"),
                prefs.get_string(schema::nav::SCREEN_ID, MAIN_SCREEN_ID),
            ))
        })
        .flatten()
        .unwrap_or_else(|| ("home".to_string(), MAIN_SCREEN_ID.to_string()));
        log::info!("Restoring app '{app_id}' screen '{screen_id}'");

        let Some(index) = self.registry.position(&app_id).or(self.registry.home_index()) else {
            log::error!("Nothing to restore, no home app registered");
            return;
        };
        self.launch_index(index);
        if screen_id != MAIN_SCREEN_ID {
            self.push_screen(&screen_id);
        }
    }

    /// Flush the current app's state without leaving it.
    pub fn suspend_current(&mut self) {
        if let Some(app) = self.current.and_then(|index| self.registry.get_mut(index)) {
            app.on_suspend();
        }
    }

    /// Called before the device powers down.
    pub fn prepare_for_sleep(&mut self) -> bool {
        let saved = self.save_state();
        self.suspend_current();
        saved
    }
}
