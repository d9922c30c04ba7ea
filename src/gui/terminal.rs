//! The participant's terminal: drawing scenes and reading key presses.

use std::{
    io::{stdout, Stdout},
    time::Duration,
};

use crate::{
    config::ResponseKey,
    error::BartError,
    gui::scene::{draw_scene, SceneStyle},
    stimulus::{ResponseSource, Scene, StimulusSurface},
};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::{debug, warn};
use ratatui::{backend::CrosstermBackend, Terminal};

/// The participant's screen and keyboard: a full-screen terminal in raw
/// mode. The terminal is put back the way it was when this is dropped.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    style: SceneStyle,
    showing: Option<Scene>,
}

impl TerminalSurface {
    pub fn new(style: SceneStyle) -> Result<Self, BartError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        Ok(Self {
            terminal,
            style,
            showing: None,
        })
    }

    fn redraw(&mut self) -> Result<(), BartError> {
        if let Some(scene) = &self.showing {
            let style = &self.style;
            self.terminal.draw(|frame| draw_scene(frame, scene, style))?;
        }
        Ok(())
    }

    /// Throw away whatever was typed before the wait began, such as presses
    /// made during a pause. Resizes and Ctrl-C are still honored.
    fn drain_pending(&mut self) -> Result<(), BartError> {
        let mut dropped = 0;
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if is_interrupt(&key) {
                        warn!("Interrupted by Ctrl-C");
                        return Err(BartError::Aborted);
                    }
                    dropped += 1;
                }
                Event::Resize(..) => self.redraw()?,
                _ => {}
            }
        }
        if dropped > 0 {
            debug!("Discarded {} early key presses", dropped);
        }
        Ok(())
    }

    /// Block until a key goes down. Resizes redraw the current scene on the
    /// way. Ctrl-C ends the session, since raw mode keeps it from reaching
    /// the process as a signal.
    fn next_key(&mut self) -> Result<KeyEvent, BartError> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if is_interrupt(&key) {
                        warn!("Interrupted by Ctrl-C");
                        return Err(BartError::Aborted);
                    }
                    return Ok(key);
                }
                Event::Resize(..) => self.redraw()?,
                _ => {}
            }
        }
    }
}

impl StimulusSurface for TerminalSurface {
    fn present(&mut self, scene: &Scene) -> Result<(), BartError> {
        self.showing = Some(scene.clone());
        self.redraw()
    }
}

impl ResponseSource for TerminalSurface {
    fn wait_for_key(&mut self, accepted: &[ResponseKey]) -> Result<ResponseKey, BartError> {
        self.drain_pending()?;
        loop {
            let key = self.next_key()?;
            match response_key(key.code) {
                Some(pressed) if accepted.iter().any(|a| a.matches(&pressed)) => {
                    return Ok(pressed)
                }
                _ => debug!("Ignoring {:?}", key.code),
            }
        }
    }

    fn wait_for_any_key(&mut self) -> Result<(), BartError> {
        self.drain_pending()?;
        self.next_key().map(|_| ())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// The [ResponseKey] a terminal key corresponds to, if any.
pub fn response_key(code: KeyCode) -> Option<ResponseKey> {
    match code {
        KeyCode::Char(' ') => Some(ResponseKey::Space),
        KeyCode::Enter => Some(ResponseKey::Enter),
        KeyCode::Char(c) => Some(ResponseKey::Char(c)),
        _ => None,
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_responses() {
        assert_eq!(response_key(KeyCode::Char(' ')), Some(ResponseKey::Space));
        assert_eq!(response_key(KeyCode::Enter), Some(ResponseKey::Enter));
        assert_eq!(response_key(KeyCode::Char('f')), Some(ResponseKey::Char('f')));
        assert_eq!(response_key(KeyCode::Esc), None);
    }

    #[test]
    fn ctrl_c_interrupts() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(is_interrupt(&ctrl_c));
        assert!(!is_interrupt(&plain_c));
    }
}
