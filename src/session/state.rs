//! Session state.
//!
//! One `Session` exists per run; only the reducer mutates it.

use std::collections::HashSet;

use ratatui::style::{Modifier, Style};
use strum::IntoEnumIterator;
use tui_textarea::TextArea;

use super::events::SideEffect;
use super::theme;
use crate::config::Config;
use crate::generation::{GenerationMode, GenerationPlan};
use crate::git::ChangedFile;

// ═══════════════════════════════════════════════════════════════════════════════
// Phases
// ═══════════════════════════════════════════════════════════════════════════════

/// What the text entry phase is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Free-text context for custom-prompt generation
    Context,
    /// Editing the generated commit message
    EditMessage,
}

/// Discrete state of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ConfiguringCredential,
    SelectingFiles,
    ResolvingPreStagedFiles,
    SelectingMode,
    EnteringContext(EntryKind),
    Generating,
    Reviewing,
    Committing,
    Success,
    Failure,
}

impl Phase {
    /// Success and Failure only wait for acknowledgment
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Success | Phase::Failure)
    }

    /// Phases that show a spinner
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Generating | Phase::Committing)
    }
}

/// A VCS mutation the session is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Stage,
    Unstage,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════════════

/// Live state of one interactive run
pub struct Session {
    pub phase: Phase,
    pub config: Config,
    /// Changed files in VCS listing order
    pub candidate_files: Vec<ChangedFile>,
    /// Always a subset of the candidate paths
    pub selected_paths: HashSet<String>,
    /// Files the user had staged before this run; captured once
    pub already_staged_paths: Vec<String>,
    pub mode: Option<GenerationMode>,
    pub generated_message: String,
    pub custom_context: String,
    pub last_error: Option<String>,
    pub success_note: Option<String>,
    /// Inputs of the last generation, replayed on regenerate
    pub last_plan: Option<GenerationPlan>,
    /// Text buffer for credential, context and message editing
    pub input: TextArea<'static>,
    pub file_cursor: usize,
    pub mode_cursor: usize,
    /// A listing has arrived at least once
    pub files_loaded: bool,
    pub mutation_in_flight: Option<Mutation>,
    /// Generation requested while staging was still running
    pub generation_deferred: bool,
    /// Cancel arrived while staging; quit once the stage completes
    pub quit_pending: bool,
    pub spinner_frame: usize,
    pub viewport: (u16, u16),
    staged_probe_settled: bool,
    auto_select_pending: bool,
    cleanup_issued: bool,
    dirty: bool,
}

impl Session {
    /// Create a session; the initial phase depends on whether a key exists
    pub fn new(config: Config) -> Self {
        let phase = if config.has_api_key() {
            Phase::SelectingFiles
        } else {
            Phase::ConfiguringCredential
        };
        let auto_select_pending = config.auto_stage_all;

        let mut session = Self {
            phase,
            config,
            candidate_files: Vec::new(),
            selected_paths: HashSet::new(),
            already_staged_paths: Vec::new(),
            mode: None,
            generated_message: String::new(),
            custom_context: String::new(),
            last_error: None,
            success_note: None,
            last_plan: None,
            input: TextArea::default(),
            file_cursor: 0,
            mode_cursor: 0,
            files_loaded: false,
            mutation_in_flight: None,
            generation_deferred: false,
            quit_pending: false,
            spinner_frame: 0,
            viewport: (80, 24),
            staged_probe_settled: false,
            auto_select_pending,
            cleanup_issued: false,
            dirty: true,
        };
        if session.phase == Phase::ConfiguringCredential {
            session.seed_credential_input();
        }
        session
    }

    /// Effects to run when the session starts
    pub fn start(&self) -> Vec<SideEffect> {
        match self.phase {
            Phase::SelectingFiles => vec![SideEffect::ListChanges, SideEffect::ProbeStaged],
            _ => Vec::new(),
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check and clear the redraw flag
    pub fn check_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listing & selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the listing, keeping only selections that still exist
    pub fn set_candidates(&mut self, files: Vec<ChangedFile>) {
        self.candidate_files = files;
        let known: HashSet<&str> = self.candidate_files.iter().map(|f| f.path.as_str()).collect();
        self.selected_paths.retain(|p| known.contains(p.as_str()));
        self.file_cursor = self
            .file_cursor
            .min(self.candidate_files.len().saturating_sub(1));
        self.files_loaded = true;

        if self.auto_select_pending && self.phase == Phase::SelectingFiles {
            self.auto_select_pending = false;
            self.select_all();
        }
    }

    pub fn is_selected(&self, path: &str) -> bool {
        self.selected_paths.contains(path)
    }

    /// Flip one file's selection by listing index
    pub fn toggle_file(&mut self, index: usize) {
        if let Some(file) = self.candidate_files.get(index) {
            if !self.selected_paths.remove(&file.path) {
                self.selected_paths.insert(file.path.clone());
            }
        }
    }

    pub fn all_selected(&self) -> bool {
        self.candidate_files
            .iter()
            .all(|f| self.selected_paths.contains(&f.path))
    }

    fn select_all(&mut self) {
        self.selected_paths = self
            .candidate_files
            .iter()
            .map(|f| f.path.clone())
            .collect();
    }

    /// Everything selected → nothing selected; otherwise select everything
    pub fn toggle_all(&mut self) {
        if self.all_selected() {
            self.selected_paths.clear();
        } else {
            self.select_all();
        }
    }

    /// Selected paths in listing order
    pub fn selected_in_order(&self) -> Vec<String> {
        self.candidate_files
            .iter()
            .filter(|f| self.selected_paths.contains(&f.path))
            .map(|f| f.path.clone())
            .collect()
    }

    /// Capture pre-staged files the first time the probe reports
    pub fn settle_staged_probe(&mut self, staged: Vec<String>) -> bool {
        if self.staged_probe_settled {
            return false;
        }
        self.staged_probe_settled = true;

        // Once the user has moved on, this run may have staged files itself
        if staged.is_empty() || self.phase != Phase::SelectingFiles {
            return false;
        }

        self.already_staged_paths = staged;
        self.selected_paths.clear();
        self.auto_select_pending = self.config.auto_stage_all;
        self.phase = Phase::ResolvingPreStagedFiles;
        true
    }

    pub fn staged_probe_settled(&self) -> bool {
        self.staged_probe_settled
    }

    pub fn move_cursor_up(&mut self) {
        match self.phase {
            Phase::SelectingFiles => self.file_cursor = self.file_cursor.saturating_sub(1),
            Phase::SelectingMode => self.mode_cursor = self.mode_cursor.saturating_sub(1),
            _ => {}
        }
    }

    pub fn move_cursor_down(&mut self) {
        match self.phase {
            Phase::SelectingFiles => {
                if self.file_cursor + 1 < self.candidate_files.len() {
                    self.file_cursor += 1;
                }
            }
            Phase::SelectingMode => {
                if self.mode_cursor + 1 < GenerationMode::iter().count() {
                    self.mode_cursor += 1;
                }
            }
            _ => {}
        }
    }

    /// Mode under the cursor in the mode list
    pub fn mode_at_cursor(&self) -> Option<GenerationMode> {
        GenerationMode::iter().nth(self.mode_cursor)
    }

    /// Place the mode cursor on the configured default, if any
    pub fn reset_mode_cursor(&mut self) {
        self.mode_cursor = GenerationMode::from_default(self.config.default_mode)
            .and_then(|mode| GenerationMode::iter().position(|m| m == mode))
            .unwrap_or(0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cleanup
    // ─────────────────────────────────────────────────────────────────────────

    /// Unstage effect for files this run staged, issued at most once.
    ///
    /// Nothing is returned after a successful commit or when nothing is
    /// selected. Files that were staged before the run are left alone.
    pub fn cleanup_effects(&mut self) -> Vec<SideEffect> {
        if self.cleanup_issued
            || self.phase == Phase::Success
            || self.selected_paths.is_empty()
        {
            return Vec::new();
        }
        self.cleanup_issued = true;

        let mut paths: Vec<String> = self
            .selected_in_order()
            .into_iter()
            .filter(|p| !self.already_staged_paths.contains(p))
            .collect();
        // Selections are always candidates, but keep anything unlisted too
        for path in &self.selected_paths {
            if !paths.contains(path)
                && !self.already_staged_paths.contains(path)
                && !self.candidate_files.iter().any(|f| &f.path == path)
            {
                paths.push(path.clone());
            }
        }

        if paths.is_empty() {
            Vec::new()
        } else {
            vec![SideEffect::Cleanup(paths)]
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text input
    // ─────────────────────────────────────────────────────────────────────────

    /// Current text buffer contents
    pub fn input_text(&self) -> String {
        self.input.lines().join("\n")
    }

    fn fresh_input(lines: Vec<String>) -> TextArea<'static> {
        let mut textarea = TextArea::new(lines);
        textarea.set_cursor_line_style(Style::default());
        textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
        textarea
    }

    pub fn seed_credential_input(&mut self) {
        let mut textarea = Self::fresh_input(Vec::new());
        textarea.set_mask_char('•');
        textarea.set_placeholder_text("Enter your OpenAI API key...");
        textarea.set_placeholder_style(Style::default().fg(theme::TEXT_DIM));
        self.input = textarea;
    }

    pub fn seed_context_input(&mut self) {
        let lines = if self.custom_context.is_empty() {
            Vec::new()
        } else {
            vec![self.custom_context.clone()]
        };
        let mut textarea = Self::fresh_input(lines);
        textarea.set_placeholder_text("Enter additional context for commit message generation...");
        textarea.set_placeholder_style(Style::default().fg(theme::TEXT_DIM));
        textarea.move_cursor(tui_textarea::CursorMove::End);
        self.input = textarea;
    }

    pub fn seed_message_editor(&mut self) {
        let lines = self.generated_message.lines().map(String::from).collect();
        let mut textarea = Self::fresh_input(lines);
        textarea.set_cursor_line_style(Style::default().bg(theme::BG_HIGHLIGHT));
        self.input = textarea;
    }
}
