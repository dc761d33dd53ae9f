//! Input handling for the TUI.
//!
//! Processes keyboard events and updates application state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::InterviewFocus;
use crate::core::Screen;
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.session.screen() {
        Screen::Welcome => handle_welcome(key, app),
        Screen::LoadingGaps | Screen::Finalizing => {
            // Processing: input is ignored so a call can't be doubled up
        }
        Screen::Interview => {
            if app.attach_input.is_some() {
                handle_attach_overlay(key, app);
            } else {
                handle_interview(key, app);
            }
        }
        Screen::Completed => handle_completed(key, app),
    }
}

/// Handle input on the welcome form.
fn handle_welcome(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => app.form.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.form.prev_field(),
        KeyCode::Enter => app.submit_identity(),
        KeyCode::Backspace => {
            app.form.active_value_mut().pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.active_value_mut().push(c);
        }
        KeyCode::Esc => app.quit(),
        _ => {}
    }
}

/// Handle input on the interview screen.
fn handle_interview(key: KeyEvent, app: &mut App) {
    // Shortcuts that work regardless of pane focus
    match key.code {
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.exit_session();
            return;
        }
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.save_answer();
            app.set_status("Answer saved.");
            return;
        }
        KeyCode::Char('o') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.attach_input = Some(String::new());
            return;
        }
        KeyCode::PageUp => {
            app.prev_topic();
            return;
        }
        KeyCode::PageDown => {
            app.next_topic();
            return;
        }
        KeyCode::Tab => {
            app.focus = match app.focus {
                InterviewFocus::Answer => InterviewFocus::Topics,
                InterviewFocus::Topics => InterviewFocus::Answer,
            };
            return;
        }
        _ => {}
    }

    match app.focus {
        InterviewFocus::Answer => match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.answer_input.push(c);
            }
            KeyCode::Enter => app.answer_input.push('\n'),
            KeyCode::Backspace => {
                app.answer_input.pop();
            }
            _ => {}
        },
        InterviewFocus::Topics => match key.code {
            KeyCode::Up => {
                app.topic_cursor = app.topic_cursor.saturating_sub(1);
            }
            KeyCode::Down => {
                let last = app.session.gaps().len().saturating_sub(1);
                app.topic_cursor = (app.topic_cursor + 1).min(last);
            }
            KeyCode::Enter => {
                app.jump_to(app.topic_cursor);
                app.focus = InterviewFocus::Answer;
            }
            _ => {}
        },
    }
}

/// Handle input in the attach-clip overlay.
fn handle_attach_overlay(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => {
            app.attach_input = None;
        }
        KeyCode::Enter => {
            if let Some(path) = app.attach_input.take() {
                if !path.trim().is_empty() {
                    app.attach_clip(&path);
                }
            }
        }
        KeyCode::Backspace => {
            if let Some(path) = app.attach_input.as_mut() {
                path.pop();
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(path) = app.attach_input.as_mut() {
                path.push(c);
            }
        }
        _ => {}
    }
}

/// Handle input on the completed screen.
fn handle_completed(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up => app.doc_scroll = app.doc_scroll.saturating_sub(1),
        KeyCode::Down => app.doc_scroll = app.doc_scroll.saturating_add(1),
        KeyCode::PageUp => app.doc_scroll = app.doc_scroll.saturating_sub(10),
        KeyCode::PageDown => app.doc_scroll = app.doc_scroll.saturating_add(10),
        KeyCode::Char('e') => app.export_document(),
        KeyCode::Char('r') => app.exit_session(),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_welcome_typing_edits_focused_field() {
        let mut app = App::new(Config::default());
        for c in "Alex".chars() {
            handle_events(key(KeyCode::Char(c)), &mut app);
        }
        handle_events(key(KeyCode::Tab), &mut app);
        for c in "SRE".chars() {
            handle_events(key(KeyCode::Char(c)), &mut app);
        }
        handle_events(key(KeyCode::Backspace), &mut app);

        assert_eq!(app.form.values[0], "Alex");
        assert_eq!(app.form.values[1], "SR");
        assert_eq!(app.form.values[2], "");
    }

    #[test]
    fn test_ctrl_c_quits_from_any_screen() {
        let mut app = App::new(Config::default());
        handle_events(ctrl('c'), &mut app);
        assert!(app.should_quit);
    }

    #[test]
    fn test_welcome_enter_with_empty_form_stays_put() {
        let mut app = App::new(Config::default());
        handle_events(key(KeyCode::Enter), &mut app);
        assert_eq!(app.session.screen(), Screen::Welcome);
        assert!(app.status_message.is_some());
    }
}
