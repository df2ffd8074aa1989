//! Tests for the session reducer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{Config, DefaultMode};
use crate::generation::GenerationMode;
use crate::git::{ChangeKind, ChangedFile};
use crate::session::events::{Intent, SessionEvent, SideEffect};
use crate::session::reducer::reduce;
use crate::session::state::{EntryKind, Mutation, Phase, Session};

fn test_config() -> Config {
    Config {
        api_key: "sk-test-key-1234".to_string(),
        ..Config::default()
    }
}

fn file(path: &str) -> ChangedFile {
    ChangedFile {
        path: path.to_string(),
        change_kind: ChangeKind::Modified,
        is_staged: false,
        is_tracked: true,
    }
}

fn intent(session: &mut Session, intent: Intent) -> Vec<SideEffect> {
    reduce(session, SessionEvent::Intent(intent))
}

/// A session in file selection with `paths` listed and no pre-staged files
fn listed_session(paths: &[&str]) -> Session {
    let mut session = Session::new(test_config());
    let files = paths.iter().map(|p| file(p)).collect();
    reduce(&mut session, SessionEvent::ChangesListed(Ok(files)));
    reduce(&mut session, SessionEvent::StagedProbed(Ok(Vec::new())));
    session
}

/// Select `paths`, confirm and let staging finish
fn staged_session(paths: &[&str]) -> Session {
    let mut session = listed_session(paths);
    for i in 0..paths.len() {
        intent(&mut session, Intent::ToggleFile(i));
    }
    intent(&mut session, Intent::ConfirmSelection);
    reduce(&mut session, SessionEvent::Staged(Ok(())));
    session
}

fn reviewing_session() -> Session {
    let mut session = staged_session(&["a.txt", "b.txt"]);
    intent(&mut session, Intent::ChooseMode(GenerationMode::AllInOne));
    reduce(
        &mut session,
        SessionEvent::MessageGenerated(Ok("feat: add files".to_string())),
    );
    session
}

fn cleanup_paths(effects: &[SideEffect]) -> Option<Vec<String>> {
    effects.iter().find_map(|e| match e {
        SideEffect::Cleanup(paths) => Some(paths.clone()),
        _ => None,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Startup
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_start_with_key_lists_and_probes() {
    let session = Session::new(test_config());
    assert_eq!(session.phase, Phase::SelectingFiles);
    assert_eq!(
        session.start(),
        vec![SideEffect::ListChanges, SideEffect::ProbeStaged]
    );
}

#[test]
fn test_start_without_key_asks_for_one() {
    let session = Session::new(Config::default());
    assert_eq!(session.phase, Phase::ConfiguringCredential);
    assert!(session.start().is_empty());
}

#[test]
fn test_submit_credential_saves_and_loads() {
    let mut session = Session::new(Config::default());
    let effects = intent(
        &mut session,
        Intent::SubmitCredential("  sk-new-key-9876  ".to_string()),
    );

    assert_eq!(session.phase, Phase::SelectingFiles);
    assert_eq!(session.config.api_key, "sk-new-key-9876");
    assert!(matches!(&effects[0], SideEffect::SaveConfig(c) if c.api_key == "sk-new-key-9876"));
    assert!(effects.contains(&SideEffect::ListChanges));
    assert!(effects.contains(&SideEffect::ProbeStaged));
}

#[test]
fn test_empty_credential_fails() {
    let mut session = Session::new(Config::default());
    let effects = intent(&mut session, Intent::SubmitCredential("   ".to_string()));

    assert_eq!(session.phase, Phase::Failure);
    assert!(session.last_error.is_some());
    assert!(effects.is_empty());
}

#[test]
fn test_config_save_failure_is_reported() {
    let mut session = Session::new(Config::default());
    intent(&mut session, Intent::SubmitCredential("sk-abc-12345".to_string()));
    reduce(
        &mut session,
        SessionEvent::ConfigSaved(Err("permission denied".to_string())),
    );

    assert_eq!(session.phase, Phase::Failure);
    assert_eq!(
        session.last_error.as_deref(),
        Some("Failed to save config: permission denied")
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// File selection
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_toggle_all_after_partial_selection_selects_everything() {
    let paths = ["a.txt", "b.txt", "c.txt"];
    // Every non-empty proper subset
    for subset in [vec![0], vec![1], vec![2], vec![0, 1], vec![0, 2], vec![1, 2]] {
        let mut session = listed_session(&paths);
        for &i in &subset {
            intent(&mut session, Intent::ToggleFile(i));
        }
        intent(&mut session, Intent::ToggleAll);
        assert_eq!(session.selected_paths.len(), 3, "subset {subset:?}");
    }
}

#[test]
fn test_toggle_all_with_everything_selected_clears() {
    let mut session = listed_session(&["a.txt", "b.txt", "c.txt"]);
    for i in 0..3 {
        intent(&mut session, Intent::ToggleFile(i));
    }
    intent(&mut session, Intent::ToggleAll);
    assert!(session.selected_paths.is_empty());
}

#[test]
fn test_toggle_file_twice_deselects() {
    let mut session = listed_session(&["a.txt"]);
    intent(&mut session, Intent::ToggleFile(0));
    assert!(session.is_selected("a.txt"));
    intent(&mut session, Intent::ToggleFile(0));
    assert!(!session.is_selected("a.txt"));
}

#[test]
fn test_toggle_out_of_range_is_ignored() {
    let mut session = listed_session(&["a.txt"]);
    intent(&mut session, Intent::ToggleFile(5));
    assert!(session.selected_paths.is_empty());
}

#[test]
fn test_confirm_empty_selection_fails_without_staging() {
    let mut session = listed_session(&["a.txt", "b.txt"]);
    let effects = intent(&mut session, Intent::ConfirmSelection);

    assert_eq!(session.phase, Phase::Failure);
    assert!(!effects.iter().any(|e| matches!(e, SideEffect::Stage(_))));
}

#[test]
fn test_confirm_stages_in_listing_order() {
    let mut session = listed_session(&["a.txt", "b.txt", "c.txt"]);
    intent(&mut session, Intent::ToggleFile(2));
    intent(&mut session, Intent::ToggleFile(0));
    let effects = intent(&mut session, Intent::ConfirmSelection);

    assert_eq!(session.phase, Phase::SelectingMode);
    assert_eq!(
        effects,
        vec![SideEffect::Stage(vec![
            "a.txt".to_string(),
            "c.txt".to_string()
        ])]
    );
    assert_eq!(session.mutation_in_flight, Some(Mutation::Stage));
}

#[test]
fn test_confirm_before_listing_is_ignored() {
    let mut session = Session::new(test_config());
    let effects = intent(&mut session, Intent::ConfirmSelection);
    assert_eq!(session.phase, Phase::SelectingFiles);
    assert!(effects.is_empty());
}

#[test]
fn test_confirm_waits_for_prestaged_check() {
    let mut session = Session::new(test_config());
    let mut staged = file("a.txt");
    staged.is_staged = true;
    reduce(
        &mut session,
        SessionEvent::ChangesListed(Ok(vec![staged, file("b.txt")])),
    );
    intent(&mut session, Intent::ToggleAll);

    // Listing is in but the staged-file check is not: nothing is staged yet
    let effects = intent(&mut session, Intent::ConfirmSelection);
    assert!(effects.is_empty());
    assert_eq!(session.phase, Phase::SelectingFiles);
    assert_eq!(session.mutation_in_flight, None);

    reduce(
        &mut session,
        SessionEvent::StagedProbed(Ok(vec!["a.txt".to_string()])),
    );
    assert_eq!(session.phase, Phase::ResolvingPreStagedFiles);
    assert_eq!(session.already_staged_paths, vec!["a.txt".to_string()]);

    intent(&mut session, Intent::ContinueWithStaged);
    let effects = intent(&mut session, Intent::Cancel);
    // a.txt was staged before the run and stays staged
    assert_eq!(cleanup_paths(&effects), None);
    assert_eq!(effects, vec![SideEffect::Quit]);
}

#[test]
fn test_confirm_after_late_empty_staged_check_stages() {
    let mut session = Session::new(test_config());
    reduce(
        &mut session,
        SessionEvent::ChangesListed(Ok(vec![file("a.txt"), file("b.txt")])),
    );
    intent(&mut session, Intent::ToggleFile(1));
    assert!(intent(&mut session, Intent::ConfirmSelection).is_empty());

    reduce(&mut session, SessionEvent::StagedProbed(Ok(Vec::new())));
    let effects = intent(&mut session, Intent::ConfirmSelection);

    assert_eq!(session.phase, Phase::SelectingMode);
    assert_eq!(effects, vec![SideEffect::Stage(vec!["b.txt".to_string()])]);
}

#[test]
fn test_stage_failure_fails_and_cleans_up() {
    let mut session = listed_session(&["a.txt"]);
    intent(&mut session, Intent::ToggleFile(0));
    intent(&mut session, Intent::ConfirmSelection);
    let effects = reduce(
        &mut session,
        SessionEvent::Staged(Err("Failed to stage files: boom".to_string())),
    );

    assert_eq!(session.phase, Phase::Failure);
    assert_eq!(
        session.last_error.as_deref(),
        Some("Failed to stage files: boom")
    );
    assert_eq!(cleanup_paths(&effects), Some(vec!["a.txt".to_string()]));
}

#[test]
fn test_listing_failure_fails() {
    let mut session = Session::new(test_config());
    reduce(
        &mut session,
        SessionEvent::ChangesListed(Err("Failed to get git status: not a repo".to_string())),
    );
    assert_eq!(session.phase, Phase::Failure);
}

#[test]
fn test_auto_stage_all_preselects_first_listing() {
    let config = Config {
        auto_stage_all: true,
        ..test_config()
    };
    let mut session = Session::new(config);
    reduce(
        &mut session,
        SessionEvent::ChangesListed(Ok(vec![file("a.txt"), file("b.txt")])),
    );
    assert!(session.all_selected());
    assert_eq!(session.selected_paths.len(), 2);
}

#[test]
fn test_cursor_stays_in_bounds() {
    let mut session = listed_session(&["a.txt", "b.txt"]);
    intent(&mut session, Intent::CursorUp);
    assert_eq!(session.file_cursor, 0);
    for _ in 0..5 {
        intent(&mut session, Intent::CursorDown);
    }
    assert_eq!(session.file_cursor, 1);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Pre-staged files
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_probe_with_staged_files_asks_user() {
    let mut session = Session::new(test_config());
    reduce(
        &mut session,
        SessionEvent::StagedProbed(Ok(vec!["x.txt".to_string()])),
    );
    assert_eq!(session.phase, Phase::ResolvingPreStagedFiles);
    assert_eq!(session.already_staged_paths, vec!["x.txt".to_string()]);
}

#[test]
fn test_probe_is_captured_once() {
    let mut session = listed_session(&["a.txt"]);
    reduce(
        &mut session,
        SessionEvent::StagedProbed(Ok(vec!["a.txt".to_string()])),
    );
    assert_eq!(session.phase, Phase::SelectingFiles);
    assert!(session.already_staged_paths.is_empty());
}

#[test]
fn test_probe_error_is_ignored() {
    let mut session = Session::new(test_config());
    reduce(
        &mut session,
        SessionEvent::StagedProbed(Err("boom".to_string())),
    );
    assert_eq!(session.phase, Phase::SelectingFiles);
    assert!(session.staged_probe_settled());
}

#[test]
fn test_continue_waits_for_listing() {
    let mut session = Session::new(test_config());
    reduce(
        &mut session,
        SessionEvent::StagedProbed(Ok(vec!["x.txt".to_string()])),
    );
    intent(&mut session, Intent::ContinueWithStaged);
    assert_eq!(session.phase, Phase::ResolvingPreStagedFiles);

    let mut staged = file("x.txt");
    staged.is_staged = true;
    reduce(
        &mut session,
        SessionEvent::ChangesListed(Ok(vec![staged, file("y.txt")])),
    );
    let effects = intent(&mut session, Intent::ContinueWithStaged);

    assert_eq!(session.phase, Phase::SelectingMode);
    assert!(session.is_selected("x.txt"));
    assert!(!session.is_selected("y.txt"));
    // Already staged: nothing to stage again
    assert!(effects.is_empty());
}

#[test]
fn test_start_fresh_unstages_then_reloads() {
    let mut session = Session::new(test_config());
    reduce(
        &mut session,
        SessionEvent::StagedProbed(Ok(vec!["x.txt".to_string(), "y.txt".to_string()])),
    );
    let effects = intent(&mut session, Intent::StartFresh);

    assert_eq!(session.phase, Phase::SelectingFiles);
    assert!(session.already_staged_paths.is_empty());
    assert_eq!(
        effects,
        vec![SideEffect::Unstage(vec![
            "x.txt".to_string(),
            "y.txt".to_string()
        ])]
    );

    let effects = reduce(&mut session, SessionEvent::Unstaged(Ok(())));
    assert_eq!(effects, vec![SideEffect::ListChanges]);

    // A late probe never re-captures the unstaged files
    reduce(
        &mut session,
        SessionEvent::StagedProbed(Ok(vec!["x.txt".to_string()])),
    );
    assert_eq!(session.phase, Phase::SelectingFiles);
    assert!(session.already_staged_paths.is_empty());
}

#[test]
fn test_cancel_after_continue_leaves_prestaged_files_alone() {
    let mut session = Session::new(test_config());
    reduce(
        &mut session,
        SessionEvent::StagedProbed(Ok(vec!["x.txt".to_string()])),
    );
    reduce(
        &mut session,
        SessionEvent::ChangesListed(Ok(vec![file("x.txt")])),
    );
    intent(&mut session, Intent::ContinueWithStaged);
    let effects = intent(&mut session, Intent::Cancel);

    assert_eq!(cleanup_paths(&effects), None);
    assert_eq!(effects.last(), Some(&SideEffect::Quit));
}

// ═══════════════════════════════════════════════════════════════════════════════
// Mode selection & generation
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_generation_waits_for_staging() {
    let mut session = listed_session(&["a.txt"]);
    intent(&mut session, Intent::ToggleFile(0));
    intent(&mut session, Intent::ConfirmSelection);

    let effects = intent(&mut session, Intent::ChooseMode(GenerationMode::AllInOne));
    assert_eq!(session.phase, Phase::Generating);
    assert!(effects.is_empty());

    let effects = reduce(&mut session, SessionEvent::Staged(Ok(())));
    assert!(matches!(
        effects.as_slice(),
        [SideEffect::Generate(plan)] if plan.mode == GenerationMode::AllInOne
    ));
}

#[test]
fn test_choose_mode_after_staging_generates_immediately() {
    let mut session = staged_session(&["a.txt"]);
    let effects = intent(&mut session, Intent::ChooseMode(GenerationMode::ByFile));

    assert_eq!(session.phase, Phase::Generating);
    assert_eq!(session.mode, Some(GenerationMode::ByFile));
    assert!(matches!(effects.as_slice(), [SideEffect::Generate(_)]));
}

#[test]
fn test_default_mode_places_cursor() {
    let config = Config {
        default_mode: DefaultMode::ByFile,
        ..test_config()
    };
    let mut session = Session::new(config);
    reduce(
        &mut session,
        SessionEvent::ChangesListed(Ok(vec![file("a.txt")])),
    );
    intent(&mut session, Intent::ToggleFile(0));
    intent(&mut session, Intent::ConfirmSelection);

    assert_eq!(session.mode_at_cursor(), Some(GenerationMode::ByFile));
}

#[test]
fn test_custom_prompt_collects_context() {
    let mut session = staged_session(&["a.txt"]);
    let effects = intent(
        &mut session,
        Intent::ChooseMode(GenerationMode::CustomPrompt),
    );
    assert_eq!(session.phase, Phase::EnteringContext(EntryKind::Context));
    assert!(effects.is_empty());

    let effects = intent(
        &mut session,
        Intent::SubmitContext("fixes the login bug".to_string()),
    );
    assert_eq!(session.phase, Phase::Generating);
    assert!(matches!(
        effects.as_slice(),
        [SideEffect::Generate(plan)]
            if plan.mode == GenerationMode::CustomPrompt && plan.context == "fixes the login bug"
    ));
}

#[test]
fn test_escape_from_context_returns_to_modes() {
    let mut session = staged_session(&["a.txt"]);
    intent(
        &mut session,
        Intent::ChooseMode(GenerationMode::CustomPrompt),
    );
    intent(&mut session, Intent::CancelEntry);
    assert_eq!(session.phase, Phase::SelectingMode);
}

#[test]
fn test_generation_failure_fails_and_cleans_up() {
    let mut session = staged_session(&["a.txt", "b.txt"]);
    intent(&mut session, Intent::ChooseMode(GenerationMode::AllInOne));
    let effects = reduce(
        &mut session,
        SessionEvent::MessageGenerated(Err("completion service returned 500: oops".to_string())),
    );

    assert_eq!(session.phase, Phase::Failure);
    assert_eq!(
        cleanup_paths(&effects),
        Some(vec!["a.txt".to_string(), "b.txt".to_string()])
    );
}

#[test]
fn test_spinner_only_ticks_while_busy() {
    let mut session = listed_session(&["a.txt"]);
    reduce(&mut session, SessionEvent::Tick);
    assert_eq!(session.spinner_frame, 0);

    let mut session = staged_session(&["a.txt"]);
    intent(&mut session, Intent::ChooseMode(GenerationMode::AllInOne));
    reduce(&mut session, SessionEvent::Tick);
    reduce(&mut session, SessionEvent::Tick);
    assert_eq!(session.spinner_frame, 2);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Review, edit & commit
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_generated_message_is_kept_verbatim() {
    let session = reviewing_session();
    assert_eq!(session.phase, Phase::Reviewing);
    assert_eq!(session.generated_message, "feat: add files");
}

#[test]
fn test_commit_from_review() {
    let mut session = reviewing_session();
    let effects = intent(&mut session, Intent::Commit);

    assert_eq!(session.phase, Phase::Committing);
    assert_eq!(
        effects,
        vec![SideEffect::Commit("feat: add files".to_string())]
    );

    reduce(&mut session, SessionEvent::Committed(Ok(())));
    assert_eq!(session.phase, Phase::Success);
    assert_eq!(
        session.success_note.as_deref(),
        Some("✓ Changes committed successfully! (2 files)")
    );
}

#[test]
fn test_regenerate_replays_the_same_plan() {
    let mut session = reviewing_session();
    let first = session.last_plan.clone();
    let effects = intent(&mut session, Intent::Regenerate);

    assert_eq!(session.phase, Phase::Generating);
    assert!(matches!(effects.as_slice(), [SideEffect::Generate(plan)] if Some(plan) == first.as_ref()));
}

#[test]
fn test_edit_then_save_commits_edited_text() {
    let mut session = reviewing_session();
    intent(&mut session, Intent::Edit);
    assert_eq!(
        session.phase,
        Phase::EnteringContext(EntryKind::EditMessage)
    );
    assert_eq!(session.input_text(), "feat: add files");

    let effects = intent(
        &mut session,
        Intent::SaveEdit("feat: add a and b\n\nbody".to_string()),
    );
    assert_eq!(
        effects,
        vec![SideEffect::Commit("feat: add a and b\n\nbody".to_string())]
    );
}

#[test]
fn test_saving_an_empty_edit_commits_generated_message() {
    let mut session = reviewing_session();
    intent(&mut session, Intent::Edit);
    let effects = intent(&mut session, Intent::SaveEdit("  \n ".to_string()));
    assert_eq!(
        effects,
        vec![SideEffect::Commit("feat: add files".to_string())]
    );
}

#[test]
fn test_escape_from_edit_keeps_message() {
    let mut session = reviewing_session();
    intent(&mut session, Intent::Edit);
    intent(&mut session, Intent::CancelEntry);
    assert_eq!(session.phase, Phase::Reviewing);
    assert_eq!(session.generated_message, "feat: add files");
}

#[test]
fn test_commit_failure_cleans_up() {
    let mut session = reviewing_session();
    intent(&mut session, Intent::Commit);
    let effects = reduce(
        &mut session,
        SessionEvent::Committed(Err("Failed to commit: hook rejected".to_string())),
    );
    assert_eq!(session.phase, Phase::Failure);
    assert!(cleanup_paths(&effects).is_some());
}

// ═══════════════════════════════════════════════════════════════════════════════
// Cancel & cleanup
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_cancel_unstages_exactly_selected_files() {
    let mut session = staged_session(&["a.txt", "b.txt"]);
    let effects = intent(&mut session, Intent::Cancel);

    assert_eq!(
        cleanup_paths(&effects),
        Some(vec!["a.txt".to_string(), "b.txt".to_string()])
    );
    assert_eq!(effects.last(), Some(&SideEffect::Quit));
}

#[test]
fn test_cancel_while_staging_waits_for_stage() {
    let mut session = listed_session(&["a.txt", "b.txt"]);
    intent(&mut session, Intent::ToggleAll);
    intent(&mut session, Intent::ConfirmSelection);
    assert_eq!(session.mutation_in_flight, Some(Mutation::Stage));

    let effects = intent(&mut session, Intent::Cancel);
    assert!(effects.is_empty());
    assert!(session.quit_pending);

    // Nothing else is accepted while waiting
    assert!(intent(&mut session, Intent::ChooseMode(GenerationMode::AllInOne)).is_empty());
    assert!(intent(&mut session, Intent::Cancel).is_empty());

    let effects = reduce(&mut session, SessionEvent::Staged(Ok(())));
    assert_eq!(
        effects,
        vec![
            SideEffect::Cleanup(vec!["a.txt".to_string(), "b.txt".to_string()]),
            SideEffect::Quit,
        ]
    );
    assert_eq!(session.mutation_in_flight, None);
}

#[test]
fn test_cancel_while_staging_skips_deferred_generation() {
    let mut session = listed_session(&["a.txt"]);
    intent(&mut session, Intent::ToggleFile(0));
    intent(&mut session, Intent::ConfirmSelection);
    intent(&mut session, Intent::ChooseMode(GenerationMode::ByFile));
    assert!(session.generation_deferred);

    intent(&mut session, Intent::Cancel);
    let effects = reduce(
        &mut session,
        SessionEvent::Staged(Err("Failed to stage files: index.lock".to_string())),
    );

    assert!(!effects.iter().any(|e| matches!(e, SideEffect::Generate(_))));
    assert_eq!(cleanup_paths(&effects), Some(vec!["a.txt".to_string()]));
    assert_eq!(effects.last(), Some(&SideEffect::Quit));
}

#[test]
fn test_cancel_with_nothing_selected_just_quits() {
    let mut session = listed_session(&["a.txt"]);
    let effects = intent(&mut session, Intent::Cancel);
    assert_eq!(effects, vec![SideEffect::Quit]);
}

#[test]
fn test_cleanup_happens_once() {
    let mut session = staged_session(&["a.txt"]);
    intent(&mut session, Intent::ChooseMode(GenerationMode::AllInOne));
    let effects = reduce(
        &mut session,
        SessionEvent::MessageGenerated(Err("boom".to_string())),
    );
    assert!(cleanup_paths(&effects).is_some());

    let effects = intent(&mut session, Intent::Cancel);
    assert_eq!(effects, vec![SideEffect::Quit]);
}

#[test]
fn test_no_cleanup_after_success() {
    let mut session = reviewing_session();
    intent(&mut session, Intent::Commit);
    reduce(&mut session, SessionEvent::Committed(Ok(())));

    let effects = intent(&mut session, Intent::Cancel);
    assert_eq!(effects, vec![SideEffect::Quit]);
}

#[test]
fn test_ctrl_c_during_generation_cancels() {
    let mut session = staged_session(&["a.txt"]);
    intent(&mut session, Intent::ChooseMode(GenerationMode::AllInOne));

    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    let effects = reduce(&mut session, SessionEvent::Key(ctrl_c));

    assert_eq!(cleanup_paths(&effects), Some(vec!["a.txt".to_string()]));
    assert_eq!(effects.last(), Some(&SideEffect::Quit));
}

#[test]
fn test_any_key_dismisses_failure() {
    let mut session = listed_session(&["a.txt"]);
    intent(&mut session, Intent::ConfirmSelection);
    assert_eq!(session.phase, Phase::Failure);

    let effects = reduce(
        &mut session,
        SessionEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
    );
    assert_eq!(effects, vec![SideEffect::Quit]);
}

#[test]
fn test_late_completion_after_failure_is_ignored() {
    let mut session = staged_session(&["a.txt"]);
    intent(&mut session, Intent::ChooseMode(GenerationMode::AllInOne));
    reduce(
        &mut session,
        SessionEvent::MessageGenerated(Err("boom".to_string())),
    );
    reduce(
        &mut session,
        SessionEvent::MessageGenerated(Ok("feat: late".to_string())),
    );
    assert_eq!(session.phase, Phase::Failure);
    assert!(session.generated_message.is_empty());
}
