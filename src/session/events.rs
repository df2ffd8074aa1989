//! Events and side effects for the session
//!
//! Everything that can happen to a session arrives as a `SessionEvent`,
//! whether it comes from the keyboard, the tick timer or a finished
//! background task. The reducer answers with `SideEffect`s for the
//! executor to run.

use crossterm::event::KeyEvent;

use crate::config::Config;
use crate::generation::{GenerationMode, GenerationPlan};
use crate::git::ChangedFile;

// ═══════════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════════

/// Input to the reducer.
///
/// Task completions carry stringified errors so events stay `Clone` and
/// tests can build them by hand.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Raw key press, translated through the key map
    Key(KeyEvent),
    /// A user intent that already went through the key map
    Intent(Intent),
    Resize { width: u16, height: u16 },
    /// Spinner clock
    Tick,

    // Task completions
    ChangesListed(Result<Vec<ChangedFile>, String>),
    StagedProbed(Result<Vec<String>, String>),
    Staged(Result<(), String>),
    Unstaged(Result<(), String>),
    ConfigSaved(Result<(), String>),
    MessageGenerated(Result<String, String>),
    Committed(Result<(), String>),
}

/// What the user asked for, independent of which key they pressed
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SubmitCredential(String),
    CursorUp,
    CursorDown,
    ToggleFile(usize),
    ToggleAll,
    ConfirmSelection,
    ContinueWithStaged,
    StartFresh,
    ChooseMode(GenerationMode),
    SubmitContext(String),
    /// Leave a text entry phase without submitting
    CancelEntry,
    Commit,
    Edit,
    Regenerate,
    SaveEdit(String),
    /// Global cancel: clean up and quit
    Cancel,
    /// Dismiss a terminal screen
    Acknowledge,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Side Effects
// ═══════════════════════════════════════════════════════════════════════════════

/// Work requested by the reducer.
///
/// Each effect except `Cleanup` and `Quit` produces exactly one completion
/// event.
#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    /// List changed files → `ChangesListed`
    ListChanges,
    /// List already staged files → `StagedProbed`
    ProbeStaged,
    /// → `Staged`
    Stage(Vec<String>),
    /// → `Unstaged`
    Unstage(Vec<String>),
    /// Persist configuration → `ConfigSaved`
    SaveConfig(Config),
    /// → `MessageGenerated`
    Generate(GenerationPlan),
    /// → `Committed`
    Commit(String),
    /// Unstage on the way out without waiting for the result
    Cleanup(Vec<String>),
    Quit,
}
