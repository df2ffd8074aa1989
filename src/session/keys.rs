//! Key map: turns key presses into intents for the current phase
//!
//! Text entry phases forward unmapped keys to the input buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::events::Intent;
use super::state::{EntryKind, Phase, Session};

/// Translate `key` for the session's phase.
///
/// Returns `None` when the key was consumed by the text buffer or has no
/// meaning in this phase.
pub fn handle_key(session: &mut Session, key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Intent::Cancel);
    }

    match session.phase {
        Phase::Success | Phase::Failure => Some(Intent::Acknowledge),
        Phase::ConfiguringCredential => match key.code {
            KeyCode::Enter => Some(Intent::SubmitCredential(session.input_text())),
            KeyCode::Esc => Some(Intent::Cancel),
            _ => forward(session, key),
        },
        Phase::SelectingFiles => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Intent::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Intent::CursorDown),
            KeyCode::Char(' ') => Some(Intent::ToggleFile(session.file_cursor)),
            KeyCode::Char('a') => Some(Intent::ToggleAll),
            KeyCode::Enter => Some(Intent::ConfirmSelection),
            KeyCode::Char('q') => Some(Intent::Cancel),
            _ => None,
        },
        Phase::ResolvingPreStagedFiles => match key.code {
            KeyCode::Char('c') => Some(Intent::ContinueWithStaged),
            KeyCode::Char('u') => Some(Intent::StartFresh),
            KeyCode::Char('q') => Some(Intent::Cancel),
            _ => None,
        },
        Phase::SelectingMode => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Intent::CursorUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Intent::CursorDown),
            KeyCode::Enter => session.mode_at_cursor().map(Intent::ChooseMode),
            KeyCode::Char('q') => Some(Intent::Cancel),
            _ => None,
        },
        Phase::EnteringContext(EntryKind::Context) => match key.code {
            KeyCode::Enter => Some(Intent::SubmitContext(session.input_text())),
            KeyCode::Esc => Some(Intent::CancelEntry),
            _ => forward(session, key),
        },
        Phase::EnteringContext(EntryKind::EditMessage) => {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char('s' | 'd') if ctrl => Some(Intent::SaveEdit(session.input_text())),
                KeyCode::Esc => Some(Intent::CancelEntry),
                _ => forward(session, key),
            }
        }
        Phase::Reviewing => match key.code {
            KeyCode::Enter => Some(Intent::Commit),
            KeyCode::Char('e') => Some(Intent::Edit),
            KeyCode::Char('r') => Some(Intent::Regenerate),
            KeyCode::Char('q') => Some(Intent::Cancel),
            _ => None,
        },
        Phase::Generating | Phase::Committing => None,
    }
}

/// Send a key to the text buffer
fn forward(session: &mut Session, key: KeyEvent) -> Option<Intent> {
    if session.input.input(key) {
        session.mark_dirty();
    }
    None
}
