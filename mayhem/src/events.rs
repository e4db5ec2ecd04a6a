//! Event handling for the Money Mayhem TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use mayhem_core::Phase;

use crate::app::{App, Prompt};

/// Result of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(app, key),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    // Global shortcuts (always work)
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    // Ignore keys while questions are being generated
    if app.loading || app.pending.is_some() {
        return EventResult::Continue;
    }

    if app.has_overlay() {
        return handle_overlay_key(app, key);
    }

    if app.prompt().is_some() {
        return handle_prompt_key(app, key);
    }

    match app.phase() {
        Phase::NotStarted => handle_landing_key(app, key),
        Phase::AwaitingAnswer => handle_playing_key(app, key),
        Phase::GameOver => handle_game_over_key(app, key),
    }
}

/// Any of Esc, Enter, Space or q closes an overlay
fn handle_overlay_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc
        | KeyCode::Enter
        | KeyCode::Char(' ')
        | KeyCode::Char('q')
        | KeyCode::Char('?') => {
            app.close_overlay();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle keys while the input box is open
fn handle_prompt_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Enter => app.submit_prompt(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => app.type_char(c),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys on the landing menu
fn handle_landing_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.menu_down(),
        KeyCode::Char('k') | KeyCode::Up => app.menu_up(),
        KeyCode::Enter => app.choose_menu(),
        KeyCode::Char('w') => app.start_would_you_rather(),
        KeyCode::Char('c') | KeyCode::Char('t') => app.open_prompt(Prompt::Topic),
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys while a question is on screen
fn handle_playing_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            app.answer(index);
        }
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => app.answer_selected(),
        KeyCode::Char('s') => app.skip(),
        KeyCode::Char('l') => app.open_loan_prompt(),
        KeyCode::Char('r') => app.open_repay_prompt(),
        KeyCode::Char('m') => app.return_to_menu(),
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}

/// Handle keys on the game over screen
fn handle_game_over_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('q') => return EventResult::Quit,
        KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char('m') => app.return_to_menu(),
        KeyCode::Char('?') | KeyCode::F(1) => app.toggle_help(),
        _ => return EventResult::Continue,
    }
    EventResult::NeedsRedraw
}
