//! Terminal palette for the session screens

use ratatui::style::{Color, Modifier, Style};

use crate::git::ChangeKind;

// ═══════════════════════════════════════════════════════════════════════════════
// Core Palette
// ═══════════════════════════════════════════════════════════════════════════════

/// Electric Purple - titles, markers, the active choice
pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255);

/// Neon Cyan - paths, focus
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234);

/// Electric Yellow - warnings, modifications
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140);

pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123);

pub const ERROR_RED: Color = Color::Rgb(255, 99, 99);

/// Highlighted row background
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54);

pub const TEXT_PRIMARY: Color = Color::Rgb(248, 248, 242);

/// Secondary text and hints
pub const TEXT_DIM: Color = Color::Rgb(98, 114, 164);

/// Borders
pub const TEXT_MUTED: Color = Color::Rgb(68, 71, 90);

// ═══════════════════════════════════════════════════════════════════════════════
// Semantic Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn title() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn file_path() -> Style {
    Style::default().fg(NEON_CYAN)
}

/// Row under the cursor
pub fn selected() -> Style {
    Style::default().bg(BG_HIGHLIGHT).fg(NEON_CYAN)
}

pub fn focused_border() -> Style {
    Style::default().fg(NEON_CYAN)
}

pub fn unfocused_border() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn success() -> Style {
    Style::default().fg(SUCCESS_GREEN).add_modifier(Modifier::BOLD)
}

pub fn error() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

pub fn warning() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

pub fn dimmed() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

/// Key hint in the footer
pub fn key_hint() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Git Status Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn change_kind(kind: ChangeKind) -> Style {
    match kind {
        ChangeKind::Added => Style::default().fg(SUCCESS_GREEN),
        ChangeKind::Modified => Style::default().fg(ELECTRIC_YELLOW),
        ChangeKind::Deleted => Style::default().fg(ERROR_RED),
        ChangeKind::Renamed => Style::default().fg(NEON_CYAN),
        ChangeKind::Untracked => Style::default().fg(TEXT_DIM),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Spinner Characters
// ═══════════════════════════════════════════════════════════════════════════════

/// Braille spinner frames
pub const SPINNER_BRAILLE: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn spinner_frame(tick: usize) -> char {
    SPINNER_BRAILLE[tick % SPINNER_BRAILLE.len()]
}
