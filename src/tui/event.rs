use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode, Tab};

/// Result of handling a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Submit,
    Refresh,
    AddForm,
    Complete(i64),
    Delete(i64),
    Export,
    Continue,
}

/// Handle a key press. Returns an action indicating what the event loop should do.
pub fn handle_key(app: &mut App, key: KeyEvent) -> KeyAction {
    if app.form.is_some() {
        return handle_form(app, key);
    }

    match &app.mode {
        Mode::Help => {
            if matches!(
                key.code,
                KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')
            ) {
                app.mode = Mode::Normal;
            }
            KeyAction::Continue
        }
        Mode::ConfirmDelete { id, .. } => {
            let id = *id;
            app.mode = Mode::Normal;
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Enter) {
                KeyAction::Delete(id)
            } else {
                KeyAction::Continue
            }
        }
        Mode::Normal => handle_normal(app, key),
    }
}

fn handle_normal(app: &mut App, key: KeyEvent) -> KeyAction {
    app.error = None;
    app.message = None;
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
            KeyAction::Continue
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
            KeyAction::Continue
        }
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
            app.next_tab();
            KeyAction::Continue
        }
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
            app.prev_tab();
            KeyAction::Continue
        }
        KeyCode::Char(c @ '1'..='6') => {
            app.select_tab(c as usize - '1' as usize);
            KeyAction::Continue
        }
        KeyCode::Char(']') if app.current_tab() == Tab::Matrix => {
            app.cycle_quadrant(true);
            KeyAction::Continue
        }
        KeyCode::Char('[') if app.current_tab() == Tab::Matrix => {
            app.cycle_quadrant(false);
            KeyAction::Continue
        }
        KeyCode::Char('s') if app.current_tab() == Tab::Completed => {
            app.toggle_sort();
            KeyAction::Continue
        }
        KeyCode::Enter => {
            app.toggle_details();
            KeyAction::Continue
        }
        KeyCode::Char('a') => KeyAction::AddForm,
        KeyCode::Char('e') => {
            app.open_edit_form();
            KeyAction::Continue
        }
        KeyCode::Char('c') => match app.selected().map(|t| (t.id, t.status.is_complete())) {
            Some((_, true)) => {
                app.error = Some("task is already complete".into());
                KeyAction::Continue
            }
            Some((id, false)) => KeyAction::Complete(id),
            None => KeyAction::Continue,
        },
        KeyCode::Char('d') => {
            if let Some((id, title)) = app.selected().map(|t| (t.id, t.title.clone())) {
                app.mode = Mode::ConfirmDelete { id, title };
            }
            KeyAction::Continue
        }
        KeyCode::Char('x') => KeyAction::Export,
        KeyCode::Char('r') => KeyAction::Refresh,
        KeyCode::Char('?') => {
            app.mode = Mode::Help;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

fn handle_form(app: &mut App, key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Esc {
        app.cancel_form();
        return KeyAction::Continue;
    }
    let Some(form) = app.form.as_mut() else {
        return KeyAction::Continue;
    };
    match key.code {
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Tab | KeyCode::Down => {
            form.next_field();
            KeyAction::Continue
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.prev_field();
            KeyAction::Continue
        }
        KeyCode::Left if form.focused.is_choice() => {
            form.cycle_choice(false);
            KeyAction::Continue
        }
        KeyCode::Right if form.focused.is_choice() => {
            form.cycle_choice(true);
            KeyAction::Continue
        }
        KeyCode::Char(' ') if form.focused.is_choice() => {
            form.cycle_choice(true);
            KeyAction::Continue
        }
        KeyCode::Backspace => {
            if let Some(buf) = form.focused_buf_mut() {
                buf.pop();
            }
            form.error = None;
            KeyAction::Continue
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(buf) = form.focused_buf_mut() {
                buf.clear();
            }
            form.error = None;
            KeyAction::Continue
        }
        KeyCode::Char(c) => {
            if let Some(buf) = form.focused_buf_mut() {
                buf.push(c);
                form.error = None;
            }
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}
