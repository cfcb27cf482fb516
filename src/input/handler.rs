use crate::app::{AppState, Intent};
use crate::domain::{Filter, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::AddingTask | UiMode::EditingTask => handle_input_form_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up();
            Ok(false)
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down();
            Ok(false)
        }

        // Toggle completion
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.toggle_selected()?;
            Ok(false)
        }

        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.start_add_task();
            Ok(false)
        }

        KeyCode::Char('e') | KeyCode::Char('E') => {
            app.start_edit_task();
            Ok(false)
        }

        // Delete asks for confirmation first
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            app.request_delete_selected();
            Ok(false)
        }

        KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Tab => {
            app.cycle_filter()?;
            Ok(false)
        }

        // Jump straight to a filter
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            if let Some(filter) = Filter::all().get(index) {
                app.dispatch(Intent::SetFilter(*filter))?;
            }
            Ok(false)
        }

        KeyCode::Char('q') | KeyCode::Char('Q') => Ok(true),

        _ => Ok(false),
    }
}

/// Handle keys in input form mode (adding/editing a task)
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => {
            app.submit_input_form()?;
            Ok(false)
        }
        KeyCode::Esc => {
            app.cancel_input_form();
            Ok(false)
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.input_form_toggle_field();
            Ok(false)
        }
        KeyCode::Backspace => {
            app.input_form_backspace();
            Ok(false)
        }
        KeyCode::Char(c) => {
            app.input_form_add_char(c);
            Ok(false)
        }
        _ => Ok(false),
    }
}

/// Handle keys while the delete confirmation is open
fn handle_confirm_delete_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.resolve_delete(true)?;
            Ok(false)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.resolve_delete(false)?;
            Ok(false)
        }
        _ => Ok(false),
    }
}
