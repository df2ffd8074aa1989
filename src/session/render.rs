//! Session rendering
//!
//! Draws a read-only view of the session for the current phase.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use strum::IntoEnumIterator;

use super::state::{EntryKind, Mutation, Phase, Session};
use super::theme;
use crate::generation::GenerationMode;

/// Render the whole screen
pub fn render(frame: &mut Frame, session: &Session) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, session);

    match session.phase {
        Phase::ConfiguringCredential => render_credential(frame, body, session),
        Phase::SelectingFiles => render_file_list(frame, body, session),
        Phase::ResolvingPreStagedFiles => render_pre_staged(frame, body, session),
        Phase::SelectingMode => render_mode_list(frame, body, session),
        Phase::EnteringContext(kind) => render_text_entry(frame, body, session, kind),
        Phase::Generating => {
            let label = session.mode.map_or("", |m| m.label());
            render_busy(frame, body, session, &format!("Generating commit message ({label})..."));
        }
        Phase::Reviewing => render_review(frame, body, session),
        Phase::Committing => render_busy(frame, body, session, "Committing changes..."),
        Phase::Success | Phase::Failure => render_outcome(frame, body, session),
    }

    render_footer(frame, footer, session);
}

fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let subtitle = match session.phase {
        Phase::ConfiguringCredential => "Set up your API key",
        Phase::SelectingFiles => "Select files to stage",
        Phase::ResolvingPreStagedFiles => "Staged files found",
        Phase::SelectingMode => "Choose how to generate the message",
        Phase::EnteringContext(EntryKind::Context) => "Add context",
        Phase::EnteringContext(EntryKind::EditMessage) => "Edit commit message",
        Phase::Generating => "Generating",
        Phase::Reviewing => "Review commit message",
        Phase::Committing => "Committing",
        Phase::Success => "Done",
        Phase::Failure => "Error",
    };
    let line = Line::from(vec![
        Span::styled("add-n-commit", theme::title()),
        Span::styled(" · ", theme::dimmed()),
        Span::styled(subtitle, theme::text()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect, session: &Session) {
    let hints: &[(&str, &str)] = match session.phase {
        Phase::ConfiguringCredential => &[("enter", "save"), ("esc", "quit")],
        Phase::SelectingFiles => &[
            ("↑/↓", "move"),
            ("space", "toggle"),
            ("a", "all"),
            ("enter", "confirm"),
            ("q", "quit"),
        ],
        Phase::ResolvingPreStagedFiles => &[
            ("c", "continue with these"),
            ("u", "unstage and start fresh"),
            ("q", "quit"),
        ],
        Phase::SelectingMode => &[("↑/↓", "move"), ("enter", "choose"), ("q", "quit")],
        Phase::EnteringContext(EntryKind::Context) => &[("enter", "generate"), ("esc", "back")],
        Phase::EnteringContext(EntryKind::EditMessage) => {
            &[("ctrl+s", "save and commit"), ("esc", "cancel")]
        }
        Phase::Reviewing => &[
            ("enter", "commit"),
            ("e", "edit"),
            ("r", "regenerate"),
            ("q", "quit"),
        ],
        Phase::Generating | Phase::Committing => &[("ctrl+c", "cancel")],
        Phase::Success | Phase::Failure => &[("any key", "exit")],
    };

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", theme::dimmed()));
        }
        spans.push(Span::styled(*key, theme::key_hint()));
        spans.push(Span::styled(format!(" {action}"), theme::dimmed()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::focused_border()
        } else {
            theme::unfocused_border()
        })
}

/// Shorten `path` from the left so it fits in `max` columns
fn fit_path(path: &str, max: usize) -> String {
    if path.width() <= max || max < 2 {
        return path.to_string();
    }
    let mut kept: Vec<char> = Vec::new();
    let mut width = 1;
    for c in path.chars().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > max {
            break;
        }
        width += w;
        kept.push(c);
    }
    kept.reverse();
    format!("…{}", kept.into_iter().collect::<String>())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Phases
// ═══════════════════════════════════════════════════════════════════════════════

fn render_credential(frame: &mut Frame, area: Rect, session: &Session) {
    let [intro, input, _] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let text = vec![
        Line::from(Span::styled("No API key configured.", theme::warning())),
        Line::from(Span::styled(
            "Enter your OpenAI API key; it is saved to your configuration file.",
            theme::dimmed(),
        )),
    ];
    frame.render_widget(Paragraph::new(text), intro);

    let block = panel("API key", true);
    let inner = block.inner(input);
    frame.render_widget(block, input);
    frame.render_widget(&session.input, inner);
}

fn render_file_list(frame: &mut Frame, area: Rect, session: &Session) {
    let title = format!(
        "Changes [{}/{} selected]",
        session.selected_paths.len(),
        session.candidate_files.len()
    );
    let block = panel(&title, true);

    if !session.files_loaded {
        let waiting = if session.mutation_in_flight == Some(Mutation::Unstage) {
            "Unstaging files..."
        } else {
            "Loading changes..."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(waiting, theme::dimmed())).block(block),
            area,
        );
        return;
    }

    if session.candidate_files.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled("No changes found.", theme::warning())),
                Line::from(Span::styled(
                    "Your working tree is clean; there is nothing to commit.",
                    theme::dimmed(),
                )),
            ])
            .block(block),
            area,
        );
        return;
    }

    let path_width = usize::from(area.width.saturating_sub(16));
    let items: Vec<ListItem> = session
        .candidate_files
        .iter()
        .map(|file| {
            let checkbox = if session.is_selected(&file.path) { "[x] " } else { "[ ] " };
            let mut spans = vec![
                Span::styled(checkbox, theme::key_hint()),
                Span::styled(
                    format!("{} ", file.change_kind.marker()),
                    theme::change_kind(file.change_kind),
                ),
                Span::styled(fit_path(&file.path, path_width), theme::file_path()),
            ];
            if file.is_staged {
                spans.push(Span::styled(" (staged)", theme::dimmed()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::selected())
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(Some(session.file_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_pre_staged(frame: &mut Frame, area: Rect, session: &Session) {
    let count = session.already_staged_paths.len();
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "You already have {count} staged {}:",
                if count == 1 { "file" } else { "files" }
            ),
            theme::warning(),
        )),
        Line::from(""),
    ];
    lines.extend(
        session
            .already_staged_paths
            .iter()
            .map(|path| Line::from(Span::styled(format!("  {path}"), theme::file_path()))),
    );
    lines.push(Line::from(""));
    if !session.files_loaded {
        lines.push(Line::from(Span::styled("Loading changes...", theme::dimmed())));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Already staged", true))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_mode_list(frame: &mut Frame, area: Rect, session: &Session) {
    let items: Vec<ListItem> = GenerationMode::iter()
        .map(|mode| {
            ListItem::new(vec![
                Line::from(Span::styled(mode.label(), theme::text())),
                Line::from(Span::styled(format!("  {}", mode.description()), theme::dimmed())),
            ])
        })
        .collect();

    let title = format!("Generation mode ({} files)", session.selected_paths.len());
    let list = List::new(items)
        .block(panel(&title, true))
        .highlight_style(theme::selected())
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(Some(session.mode_cursor));

    if session.mutation_in_flight == Some(Mutation::Stage) {
        let [list_area, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        frame.render_stateful_widget(list, list_area, &mut state);
        let note = if session.quit_pending {
            "Cancelling once staging finishes..."
        } else {
            "Staging files..."
        };
        frame.render_widget(Paragraph::new(Span::styled(note, theme::dimmed())), status);
    } else {
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn render_text_entry(frame: &mut Frame, area: Rect, session: &Session, kind: EntryKind) {
    let (title, height) = match kind {
        EntryKind::Context => ("Context", Constraint::Length(3)),
        EntryKind::EditMessage => ("Commit message", Constraint::Min(3)),
    };
    let [input, _] = Layout::vertical([height, Constraint::Min(0)]).areas(area);

    let block = panel(title, true);
    let inner = block.inner(input);
    frame.render_widget(block, input);
    frame.render_widget(&session.input, inner);
}

fn render_busy(frame: &mut Frame, area: Rect, session: &Session, label: &str) {
    let line = Line::from(vec![
        Span::styled(
            format!("{} ", theme::spinner_frame(session.spinner_frame)),
            theme::title(),
        ),
        Span::styled(label.to_string(), theme::text()),
    ]);
    frame.render_widget(Paragraph::new(vec![Line::from(""), line]), area);
}

fn render_review(frame: &mut Frame, area: Rect, session: &Session) {
    let lines: Vec<Line> = session
        .generated_message
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), theme::text())))
        .collect();
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Generated commit message", true))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_outcome(frame: &mut Frame, area: Rect, session: &Session) {
    let line = match (&session.success_note, &session.last_error) {
        (Some(note), _) if session.phase == Phase::Success => {
            Line::from(Span::styled(note.clone(), theme::success()))
        }
        (_, Some(error)) => Line::from(Span::styled(format!("✗ {error}"), theme::error())),
        _ => Line::from(""),
    };
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), line]).wrap(Wrap { trim: false }),
        area,
    );
}
