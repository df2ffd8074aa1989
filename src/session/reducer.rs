//! Pure reducer for the commit session
//!
//! All state transitions happen here:
//! - Takes current session + event
//! - Mutates the session and returns side effects
//! - No I/O, no async
//!
//! The app loop hands the returned effects to the executor.

use super::events::{Intent, SessionEvent, SideEffect};
use super::keys;
use super::state::{EntryKind, Mutation, Phase, Session};
use crate::generation::{GenerationMode, GenerationPlan};
use crate::{log_debug, log_warn};

// ═══════════════════════════════════════════════════════════════════════════════
// Reducer Function
// ═══════════════════════════════════════════════════════════════════════════════

/// Reducer: (session, event) → effects
pub fn reduce(session: &mut Session, event: SessionEvent) -> Vec<SideEffect> {
    match event {
        SessionEvent::Key(key) => match keys::handle_key(session, key) {
            Some(intent) => reduce_intent(session, intent),
            None => Vec::new(),
        },
        SessionEvent::Intent(intent) => reduce_intent(session, intent),

        SessionEvent::Resize { width, height } => {
            session.viewport = (width, height);
            session.mark_dirty();
            Vec::new()
        }
        SessionEvent::Tick => {
            if session.phase.is_busy() {
                session.spinner_frame = session.spinner_frame.wrapping_add(1);
                session.mark_dirty();
            }
            Vec::new()
        }

        // ─────────────────────────────────────────────────────────────────────────
        // Task completions
        // ─────────────────────────────────────────────────────────────────────────
        SessionEvent::ChangesListed(result) => {
            session.mark_dirty();
            match result {
                Ok(files) => {
                    if matches!(
                        session.phase,
                        Phase::SelectingFiles | Phase::ResolvingPreStagedFiles
                    ) {
                        session.set_candidates(files);
                    }
                    Vec::new()
                }
                Err(e) => fail(session, e),
            }
        }

        SessionEvent::StagedProbed(result) => {
            match result {
                Ok(staged) => {
                    if session.settle_staged_probe(staged) {
                        log_debug!(
                            "Found {} files staged before this run",
                            session.already_staged_paths.len()
                        );
                        session.mark_dirty();
                    }
                }
                Err(e) => {
                    // Without the probe the run behaves as if nothing was staged
                    log_warn!("Staged file probe failed: {}", e);
                    session.settle_staged_probe(Vec::new());
                }
            }
            Vec::new()
        }

        SessionEvent::Staged(result) => {
            session.mutation_in_flight = None;
            if session.quit_pending {
                // Cancelled mid-stage: release what was just staged, then leave
                if let Err(e) = result {
                    log_warn!("Staging failed during cancel: {}", e);
                }
                let mut effects = session.cleanup_effects();
                effects.push(SideEffect::Quit);
                return effects;
            }
            match result {
                Ok(()) => {
                    if session.generation_deferred && session.phase == Phase::Generating {
                        session.generation_deferred = false;
                        return session
                            .last_plan
                            .clone()
                            .map(SideEffect::Generate)
                            .into_iter()
                            .collect();
                    }
                    Vec::new()
                }
                Err(e) => fail(session, e),
            }
        }

        SessionEvent::Unstaged(result) => {
            session.mutation_in_flight = None;
            match result {
                Ok(()) if session.phase == Phase::SelectingFiles => vec![SideEffect::ListChanges],
                Ok(()) => Vec::new(),
                Err(e) => fail(session, e),
            }
        }

        SessionEvent::ConfigSaved(result) => match result {
            Ok(()) => Vec::new(),
            Err(e) => fail(session, format!("Failed to save config: {e}")),
        },

        SessionEvent::MessageGenerated(result) => {
            if session.phase != Phase::Generating {
                return Vec::new();
            }
            session.mark_dirty();
            match result {
                Ok(message) => {
                    session.generated_message = message;
                    session.phase = Phase::Reviewing;
                    Vec::new()
                }
                Err(e) => fail(session, e),
            }
        }

        SessionEvent::Committed(result) => {
            if session.phase != Phase::Committing {
                return Vec::new();
            }
            session.mark_dirty();
            match result {
                Ok(()) => {
                    let count = session.selected_paths.len();
                    session.phase = Phase::Success;
                    session.success_note = Some(format!(
                        "✓ Changes committed successfully! ({count} {})",
                        if count == 1 { "file" } else { "files" }
                    ));
                    Vec::new()
                }
                Err(e) => fail(session, e),
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Intents
// ═══════════════════════════════════════════════════════════════════════════════

fn reduce_intent(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    session.mark_dirty();

    if session.phase.is_terminal() {
        return match intent {
            Intent::Acknowledge | Intent::Cancel => vec![SideEffect::Quit],
            _ => Vec::new(),
        };
    }

    if session.quit_pending {
        return Vec::new();
    }

    if intent == Intent::Cancel {
        // An unstage racing the running `git add` could leave files staged
        if session.mutation_in_flight == Some(Mutation::Stage) {
            log_debug!("Cancel requested while staging; quitting once staging finishes");
            session.quit_pending = true;
            return Vec::new();
        }
        let mut effects = session.cleanup_effects();
        effects.push(SideEffect::Quit);
        return effects;
    }

    match session.phase {
        Phase::ConfiguringCredential => reduce_credential(session, intent),
        Phase::SelectingFiles => reduce_file_selection(session, intent),
        Phase::ResolvingPreStagedFiles => reduce_pre_staged(session, intent),
        Phase::SelectingMode => reduce_mode_selection(session, intent),
        Phase::EnteringContext(EntryKind::Context) => reduce_context_entry(session, intent),
        Phase::EnteringContext(EntryKind::EditMessage) => reduce_message_edit(session, intent),
        Phase::Reviewing => reduce_review(session, intent),
        Phase::Generating | Phase::Committing | Phase::Success | Phase::Failure => Vec::new(),
    }
}

fn reduce_credential(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    let Intent::SubmitCredential(key) = intent else {
        return Vec::new();
    };

    let key = key.trim();
    if key.is_empty() {
        return fail(session, "API key required: the key cannot be empty".to_string());
    }

    session.config.api_key = key.to_string();
    session.phase = Phase::SelectingFiles;
    vec![
        SideEffect::SaveConfig(session.config.clone()),
        SideEffect::ListChanges,
        SideEffect::ProbeStaged,
    ]
}

fn reduce_file_selection(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    match intent {
        Intent::CursorUp => session.move_cursor_up(),
        Intent::CursorDown => session.move_cursor_down(),
        Intent::ToggleFile(index) => session.toggle_file(index),
        Intent::ToggleAll => session.toggle_all(),
        Intent::ConfirmSelection => {
            // Listing or staged probe not here yet, or a start-fresh reload
            // is still running
            if session.mutation_in_flight.is_some()
                || !session.files_loaded
                || !session.staged_probe_settled()
            {
                return Vec::new();
            }
            let paths = session.selected_in_order();
            if paths.is_empty() {
                return fail(session, "No files selected".to_string());
            }
            session.phase = Phase::SelectingMode;
            session.reset_mode_cursor();
            session.mutation_in_flight = Some(Mutation::Stage);
            return vec![SideEffect::Stage(paths)];
        }
        _ => {}
    }
    Vec::new()
}

fn reduce_pre_staged(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    match intent {
        Intent::ContinueWithStaged => {
            if !session.files_loaded {
                return Vec::new();
            }
            session.selected_paths = session
                .already_staged_paths
                .iter()
                .filter(|p| session.candidate_files.iter().any(|f| &f.path == *p))
                .cloned()
                .collect();
            if session.selected_paths.is_empty() {
                return fail(session, "No files selected".to_string());
            }
            session.phase = Phase::SelectingMode;
            session.reset_mode_cursor();
            Vec::new()
        }
        Intent::StartFresh => {
            let paths = std::mem::take(&mut session.already_staged_paths);
            session.selected_paths.clear();
            session.file_cursor = 0;
            session.files_loaded = false;
            session.phase = Phase::SelectingFiles;
            session.mutation_in_flight = Some(Mutation::Unstage);
            vec![SideEffect::Unstage(paths)]
        }
        _ => Vec::new(),
    }
}

fn reduce_mode_selection(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    match intent {
        Intent::CursorUp => session.move_cursor_up(),
        Intent::CursorDown => session.move_cursor_down(),
        Intent::ChooseMode(mode) => {
            session.mode = Some(mode);
            if mode == GenerationMode::CustomPrompt {
                session.phase = Phase::EnteringContext(EntryKind::Context);
                session.seed_context_input();
                return Vec::new();
            }
            let plan = GenerationPlan::new(mode, &session.config, "");
            return start_generation(session, plan);
        }
        _ => {}
    }
    Vec::new()
}

fn reduce_context_entry(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    match intent {
        Intent::SubmitContext(text) => {
            session.custom_context = text.trim().to_string();
            let plan = GenerationPlan::new(
                GenerationMode::CustomPrompt,
                &session.config,
                &session.custom_context,
            );
            start_generation(session, plan)
        }
        Intent::CancelEntry => {
            session.phase = Phase::SelectingMode;
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn reduce_review(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    match intent {
        Intent::Commit => {
            let message = session.generated_message.clone();
            start_commit(session, message)
        }
        Intent::Edit => {
            session.phase = Phase::EnteringContext(EntryKind::EditMessage);
            session.seed_message_editor();
            Vec::new()
        }
        Intent::Regenerate => match session.last_plan.clone() {
            Some(plan) => start_generation(session, plan),
            None => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn reduce_message_edit(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    match intent {
        Intent::SaveEdit(text) => {
            if !text.trim().is_empty() {
                session.generated_message = text;
            }
            let message = session.generated_message.clone();
            start_commit(session, message)
        }
        Intent::CancelEntry => {
            session.phase = Phase::Reviewing;
            Vec::new()
        }
        _ => Vec::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Transitions
// ═══════════════════════════════════════════════════════════════════════════════

/// Enter Generating; the request waits for a running stage to finish
fn start_generation(session: &mut Session, plan: GenerationPlan) -> Vec<SideEffect> {
    session.phase = Phase::Generating;
    session.mode = Some(plan.mode);
    session.spinner_frame = 0;
    session.last_plan = Some(plan.clone());

    if session.mutation_in_flight == Some(Mutation::Stage) {
        session.generation_deferred = true;
        return Vec::new();
    }
    vec![SideEffect::Generate(plan)]
}

fn start_commit(session: &mut Session, message: String) -> Vec<SideEffect> {
    session.phase = Phase::Committing;
    session.spinner_frame = 0;
    vec![SideEffect::Commit(message)]
}

/// Enter Failure and release whatever this run staged
fn fail(session: &mut Session, message: String) -> Vec<SideEffect> {
    if session.phase.is_terminal() {
        return Vec::new();
    }
    log_debug!("Session failed in {:?}: {}", session.phase, message);
    session.phase = Phase::Failure;
    session.last_error = Some(message);
    session.success_note = None;
    session.generation_deferred = false;
    session.mark_dirty();
    session.cleanup_effects()
}
