#![forbid(unsafe_code)]

//! Terminal lifecycle and the interactive event loop.
//!
//! [`TerminalSession`] owns raw mode and the alternate screen; cleanup
//! runs in [`Drop`] so the terminal is restored on panic and on every
//! error path. Because Crossterm's `read()` blocks, a dedicated thread
//! polls for input and forwards decoded keys over a channel; the async
//! loop multiplexes that channel with the app's redraw notifications.
//!
//! # Lifecycle
//!
//! 1. Enter raw mode, then the alternate screen, then hide the cursor.
//! 2. On drop, undo in reverse order and flush.
//!
//! Only one session may exist at a time.

use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tokio::sync::{Notify, mpsc};

use crate::app::{App, KeyInput};

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const BOARD_HELP: &str = "Up/Down select  Enter edit  f favorite  n new  1-4 filter  q quit";
const FORM_HELP: &str = "Tab field  Up/Down change  1-9 toggle offer  Enter save  Del delete  Esc cancel";

/// Raw-mode guard. Tracks what was enabled so a failure partway
/// through setup still restores everything that did take effect.
#[derive(Debug)]
pub struct TerminalSession {
    alternate_screen_enabled: bool,
    cursor_hidden: bool,
}

impl TerminalSession {
    /// Enter raw mode, switch to the alternate screen, hide the cursor.
    pub fn new() -> io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;

        let mut session = Self {
            alternate_screen_enabled: false,
            cursor_hidden: false,
        };

        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        session.alternate_screen_enabled = true;
        crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        session.cursor_hidden = true;

        Ok(session)
    }

    fn cleanup(&mut self) {
        let mut stdout = io::stdout();

        if self.cursor_hidden {
            let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
            self.cursor_hidden = false;
        }

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }

        // Raw mode exits last so the escape sequences above still apply.
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// What the input thread forwards to the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermEvent {
    Key(KeyInput),
    /// Ctrl-C. Quits regardless of editing state.
    Interrupt,
    Resize,
}

fn decode(event: &crossterm::event::Event) -> Option<TermEvent> {
    use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Some(TermEvent::Interrupt);
            }
            let key = match key.code {
                KeyCode::Up => KeyInput::Up,
                KeyCode::Down => KeyInput::Down,
                KeyCode::Enter => KeyInput::Enter,
                KeyCode::Esc => KeyInput::Escape,
                KeyCode::Backspace => KeyInput::Backspace,
                KeyCode::Tab => KeyInput::Tab,
                KeyCode::BackTab => KeyInput::BackTab,
                KeyCode::Delete => KeyInput::Delete,
                KeyCode::Char(c) => KeyInput::Char(c),
                _ => return None,
            };
            Some(TermEvent::Key(key))
        }
        Event::Resize(_, _) => Some(TermEvent::Resize),
        _ => None,
    }
}

fn spawn_input_thread(
    tx: mpsc::UnboundedSender<TermEvent>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            match crossterm::event::poll(POLL_INTERVAL) {
                Ok(true) => {
                    let Ok(event) = crossterm::event::read() else {
                        break;
                    };
                    if let Some(event) = decode(&event) {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    })
}

fn present(app: &App) -> io::Result<()> {
    let mut stdout = io::stdout();
    crossterm::queue!(
        stdout,
        crossterm::cursor::MoveTo(0, 0),
        crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
    )?;
    for line in app.draw_lines() {
        crossterm::queue!(
            stdout,
            crossterm::style::Print(line),
            crossterm::style::Print("\r\n"),
        )?;
    }
    let help = if app.is_editing() { FORM_HELP } else { BOARD_HELP };
    crossterm::queue!(
        stdout,
        crossterm::style::Print("\r\n"),
        crossterm::style::Print(help),
    )?;
    stdout.flush()
}

/// Drive the app until the user quits.
///
/// Redraws after every key, on every model notification, and on
/// resize. `q` quits only outside an editor; Ctrl-C always quits.
pub async fn run(app: Rc<App>) -> io::Result<()> {
    let session = TerminalSession::new()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let running = Arc::new(AtomicBool::new(true));
    let reader = spawn_input_thread(tx, Arc::clone(&running));

    let redraw = Rc::new(Notify::new());
    app.set_on_change({
        let redraw = Rc::clone(&redraw);
        move || redraw.notify_one()
    });

    present(&app)?;
    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    TermEvent::Interrupt => break,
                    TermEvent::Key(KeyInput::Char('q')) if !app.is_editing() => break,
                    TermEvent::Key(key) => {
                        app.handle_key(key);
                        present(&app)?;
                    }
                    TermEvent::Resize => present(&app)?,
                }
            }
            _ = redraw.notified() => present(&app)?,
        }
    }

    running.store(false, Ordering::Relaxed);
    let _ = reader.join();
    drop(session);
    Ok(())
}
