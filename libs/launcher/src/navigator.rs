use crossbeam_channel::{Receiver, Sender};

/// A navigation request posted by a screen or app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Launch(&'static str),
    Push(&'static str),
    Pop,
    Home,
}

/// Cloneable handle for requesting navigation from inside a screen.
#[derive(Debug, Clone)]
pub struct Navigator {
    sender: Sender<NavCommand>,
}

impl Navigator {
    pub fn launch(&self, app_id: &'static str) {
        self.send(NavCommand::Launch(app_id));
    }

    pub fn push(&self, screen_id: &'static str) {
        self.send(NavCommand::Push(screen_id));
    }

    pub fn pop(&self) {
        self.send(NavCommand::Pop);
    }

    pub fn home(&self) {
        self.send(NavCommand::Home);
    }

    fn send(&self, command: NavCommand) {
        if self.sender.send(command).is_err() {
            log::warn!("Navigation is gone, dropped {command:?}");
        }
    }
}

/// Create a navigator and the receiving end handed to `Navigation::new`.
pub fn channel() -> (Navigator, Receiver<NavCommand>) {
    let (sender, receiver) = crossbeam_channel::unbounded();
    (Navigator { sender }, receiver)
}
