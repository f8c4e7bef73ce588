//! Event loop binding terminal input to a `Session`.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use log::{debug, info};
use outline_core::{Command, CommandOutcome, DocumentRepository, Session};

use crate::keymap::{self, EditKey};
use crate::render;
use crate::terminal::TerminalGuard;
use crate::text_input::TextInput;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct App<'s, R: DocumentRepository> {
    session: &'s mut Session<R>,
    input: TextInput,
    status: Option<String>,
    scroll: usize,
}

impl<'s, R: DocumentRepository> App<'s, R> {
    pub fn new(session: &'s mut Session<R>) -> Self {
        let status = session.take_notice();
        Self {
            session,
            input: TextInput::new(),
            status,
            scroll: 0,
        }
    }

    /// Handles one key press. Returns false once the session asks to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let command = if self.session.is_editing() {
            match keymap::edit_key(key) {
                EditKey::Confirm => Command::ConfirmEdit(self.input.value()),
                EditKey::Cancel => Command::CancelEdit,
                EditKey::Input => {
                    self.input.handle_key(key);
                    return true;
                }
            }
        } else {
            match keymap::command_for(key) {
                Some(command) => command,
                None => return true,
            }
        };

        self.status = None;
        match self.session.apply(command) {
            CommandOutcome::Continue => {}
            CommandOutcome::Edit { text } => {
                self.input.set_value(&text);
                self.input.focus();
            }
            CommandOutcome::Quit => return false,
        }
        if !self.session.is_editing() {
            self.input.blur();
        }
        if let Some(notice) = self.session.take_notice() {
            self.status = Some(notice);
        }
        true
    }
}

pub fn run<R: DocumentRepository>(session: &mut Session<R>) -> io::Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut app = App::new(session);
    info!(
        "event=ui_start module=cli status=ok path={}",
        app.session.path().display()
    );

    loop {
        guard.terminal().draw(|frame| {
            render::draw(
                frame,
                &*app.session,
                &app.input,
                app.status.as_deref(),
                &mut app.scroll,
            )
        })?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !app.handle_key(key) {
                    break;
                }
            }
            Event::Resize(width, height) => {
                debug!("event=terminal_resize module=cli width={width} height={height}");
            }
            _ => {}
        }
    }

    info!("event=ui_stop module=cli status=ok");
    Ok(())
}
