use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode};

use dynimg::domain::{AppError, Message, PreviewConfig};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &PreviewConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    /// Without input a `Tick` is emitted so the slideshow keeps moving.
    pub fn handle_event(&self) -> Result<Option<Message>, AppError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(Some(Message::Tick));
        }
        match event::read()? {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => Ok(self.handle_key(key)),
            Event::Resize(width, height) => Ok(Some(Message::Resize(width as usize, height as usize))),
            _ => Ok(None),
        }
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::MoveDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::MoveUp),
            KeyCode::PageDown => Some(Message::MovePageDown),
            KeyCode::PageUp => Some(Message::MovePageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::MoveBeginning),
            KeyCode::Char('G') | KeyCode::End => Some(Message::MoveEnd),
            KeyCode::Char('y') => Some(Message::CopyUrl),
            KeyCode::Char('o') => Some(Message::CopyLink),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Esc => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    #[test]
    fn keys_map_to_messages() {
        let controller = Controller::new(&PreviewConfig::default());
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(controller.handle_key(key(KeyCode::Char('q'))), Some(Message::Quit));
        assert_eq!(controller.handle_key(key(KeyCode::Down)), Some(Message::MoveDown));
        assert_eq!(controller.handle_key(key(KeyCode::Char('y'))), Some(Message::CopyUrl));
        assert_eq!(controller.handle_key(key(KeyCode::Char('x'))), None);
    }
}
