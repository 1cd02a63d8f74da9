//! Keybinding definitions for the TUI.
//!
//! Keys are interpreted against the view they will act on, so the same key
//! means different things per input mode: while filtering or composing,
//! printable characters are text and never commands.

use crate::events::Event;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use prompt_pool_core::{ComposeEdit, DisplayOption, FilterEdit, InputMode, Movement, ViewState};

pub fn interpret(event: KeyEvent, view: &ViewState) -> Option<Event> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if is_interrupt(&event) {
        return Some(Event::Quit);
    }
    match view.mode() {
        InputMode::Browsing => browsing(event, view),
        InputMode::Filtering => filtering(event),
        InputMode::Composing(draft) => match event.code {
            KeyCode::Enter => draft.to_new_record().map(Event::InsertRequested),
            KeyCode::Esc => Some(Event::Compose(ComposeEdit::Cancel)),
            KeyCode::Tab | KeyCode::BackTab => Some(Event::Compose(ComposeEdit::SwitchField)),
            KeyCode::Backspace => Some(Event::Compose(ComposeEdit::Backspace)),
            KeyCode::Char(c) if is_text(&event) => Some(Event::Compose(ComposeEdit::Insert(c))),
            _ => None,
        },
    }
}

fn is_interrupt(event: &KeyEvent) -> bool {
    event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c')
}

fn is_text(event: &KeyEvent) -> bool {
    !event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

fn movement(code: KeyCode) -> Option<Movement> {
    match code {
        KeyCode::Up => Some(Movement::Up),
        KeyCode::Down => Some(Movement::Down),
        KeyCode::Left | KeyCode::PageUp => Some(Movement::PageUp),
        KeyCode::Right | KeyCode::PageDown => Some(Movement::PageDown),
        KeyCode::Home => Some(Movement::First),
        KeyCode::End => Some(Movement::Last),
        _ => None,
    }
}

fn browsing(event: KeyEvent, view: &ViewState) -> Option<Event> {
    if let Some(movement) = movement(event.code) {
        return Some(Event::Navigate(movement));
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    let event = match event.code {
        KeyCode::Char('q') => Event::Quit,
        KeyCode::Char('a') => Event::Compose(ComposeEdit::Open),
        KeyCode::Char('x') => Event::DeleteRequested,
        KeyCode::Char('s') => Event::ToggleOption(DisplayOption::Spinner),
        KeyCode::Char('T') => Event::ToggleOption(DisplayOption::TitleBar),
        KeyCode::Char('S') => Event::ToggleOption(DisplayOption::StatusBar),
        KeyCode::Char('P') => Event::ToggleOption(DisplayOption::Pagination),
        KeyCode::Char('H') => Event::ToggleOption(DisplayOption::Help),
        KeyCode::Char('/') if view.filtering_enabled() => Event::Filter(FilterEdit::Start),
        KeyCode::Char('k') => Event::Navigate(Movement::Up),
        KeyCode::Char('j') => Event::Navigate(Movement::Down),
        KeyCode::Char('h') => Event::Navigate(Movement::PageUp),
        KeyCode::Char('l') => Event::Navigate(Movement::PageDown),
        KeyCode::Char('g') => Event::Navigate(Movement::First),
        KeyCode::Char('G') => Event::Navigate(Movement::Last),
        KeyCode::Esc if view.filter().is_some() => Event::Filter(FilterEdit::Clear),
        _ => return None,
    };
    Some(event)
}

fn filtering(event: KeyEvent) -> Option<Event> {
    if let Some(movement) = movement(event.code) {
        return Some(Event::Navigate(movement));
    }
    match event.code {
        KeyCode::Enter => Some(Event::Filter(FilterEdit::Accept)),
        KeyCode::Esc => Some(Event::Filter(FilterEdit::Cancel)),
        KeyCode::Backspace => Some(Event::Filter(FilterEdit::Backspace)),
        KeyCode::Char(c) if is_text(&event) => Some(Event::Filter(FilterEdit::Insert(c))),
        _ => None,
    }
}
