//! Configuration editor
//!
//! Six single-line fields edited in a small full-screen form. Saving
//! validates the form and writes the configuration file.

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use tui_textarea::TextArea;

use crate::config::{Config, DefaultMode};
use crate::log_debug;

const ACCENT: Color = Color::Rgb(225, 53, 255);
const FOCUS: Color = Color::Rgb(128, 255, 234);
const DIM: Color = Color::Rgb(98, 114, 164);
const ERROR: Color = Color::Rgb(255, 99, 99);

/// Editable configuration fields, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Field {
    ApiKey,
    Model,
    DefaultMode,
    Temperature,
    SystemPromptAll,
    SystemPromptFile,
}

impl Field {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ApiKey => "OpenAI API Key",
            Self::Model => "Model",
            Self::DefaultMode => "Default Mode",
            Self::Temperature => "Temperature",
            Self::SystemPromptAll => "System Prompt (All)",
            Self::SystemPromptFile => "System Prompt (File)",
        }
    }

    const fn placeholder(self) -> &'static str {
        match self {
            Self::ApiKey => "sk-...",
            Self::Model => "o4-mini",
            Self::DefaultMode => "interactive/all/by-file",
            Self::Temperature => "1.0",
            Self::SystemPromptAll => "System prompt for all-in-one mode...",
            Self::SystemPromptFile => "System prompt for file-by-file mode...",
        }
    }

    fn initial_value(self, config: &Config) -> String {
        match self {
            Self::ApiKey => config.api_key.clone(),
            Self::Model => config.model.clone(),
            Self::DefaultMode => config.default_mode.name().to_string(),
            Self::Temperature => format!("{:.1}", config.temperature),
            Self::SystemPromptAll => config.system_prompt_all.clone(),
            Self::SystemPromptFile => config.system_prompt_file.clone(),
        }
    }
}

/// What the caller should do after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    Continue,
    Save(Config),
    Cancel,
}

/// Form state for the configuration editor
pub struct ConfigEditor {
    base: Config,
    inputs: Vec<TextArea<'static>>,
    focus: usize,
    pub error: Option<String>,
}

impl ConfigEditor {
    pub fn new(config: &Config) -> Self {
        let inputs = Field::iter()
            .map(|field| {
                let mut textarea = TextArea::new(vec![field.initial_value(config)]);
                textarea.set_placeholder_text(field.placeholder());
                textarea.set_placeholder_style(Style::default().fg(DIM));
                textarea.set_cursor_line_style(Style::default());
                if field == Field::ApiKey {
                    textarea.set_mask_char('•');
                }
                textarea.move_cursor(tui_textarea::CursorMove::End);
                textarea
            })
            .collect();

        let mut editor = Self {
            base: config.clone(),
            inputs,
            focus: 0,
            error: None,
        };
        editor.update_focus();
        editor
    }

    pub fn focused(&self) -> Field {
        Field::iter().nth(self.focus).unwrap_or(Field::ApiKey)
    }

    fn value(&self, field: Field) -> String {
        Field::iter()
            .position(|f| f == field)
            .and_then(|i| self.inputs.get(i))
            .map(|t| t.lines().join(""))
            .unwrap_or_default()
    }

    /// Replace a field's text
    pub fn set_value(&mut self, field: Field, value: &str) {
        if let Some(textarea) = Field::iter()
            .position(|f| f == field)
            .and_then(|i| self.inputs.get_mut(i))
        {
            textarea.select_all();
            textarea.cut();
            textarea.insert_str(value);
        }
    }

    fn update_focus(&mut self) {
        for (i, textarea) in self.inputs.iter_mut().enumerate() {
            let style = if i == self.focus {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            textarea.set_cursor_style(style);
        }
    }

    fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.inputs.len();
        self.update_focus();
    }

    fn previous_field(&mut self) {
        self.focus = (self.focus + self.inputs.len() - 1) % self.inputs.len();
        self.update_focus();
    }

    /// Validate the form and build the configuration it describes
    pub fn build_config(&self) -> Result<Config, String> {
        let temperature = self
            .value(Field::Temperature)
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("invalid temperature value: {e}"))?;
        let default_mode = DefaultMode::from_str(&self.value(Field::DefaultMode))
            .map_err(|e| e.to_string())?;

        Ok(Config {
            api_key: self.value(Field::ApiKey).trim().to_string(),
            model: self.value(Field::Model).trim().to_string(),
            default_mode,
            temperature,
            system_prompt_all: self.value(Field::SystemPromptAll),
            system_prompt_file: self.value(Field::SystemPromptFile),
            ..self.base.clone()
        })
    }

    fn try_save(&mut self) -> EditorAction {
        match self.build_config() {
            Ok(config) => EditorAction::Save(config),
            Err(e) => {
                self.error = Some(e);
                EditorAction::Continue
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => EditorAction::Cancel,
            KeyCode::Char('c') if ctrl => EditorAction::Cancel,
            KeyCode::Char('s') if ctrl => self.try_save(),
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                EditorAction::Continue
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.previous_field();
                EditorAction::Continue
            }
            KeyCode::Enter => {
                if self.focus + 1 == self.inputs.len() {
                    self.try_save()
                } else {
                    self.next_field();
                    EditorAction::Continue
                }
            }
            _ => {
                if let Some(textarea) = self.inputs.get_mut(self.focus) {
                    textarea.input(key);
                }
                EditorAction::Continue
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(self.inputs.iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        let areas = Layout::vertical(constraints).split(frame.area());

        let title = Line::from(Span::styled(
            "Configure add-n-commit",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(title), areas[0]);

        for (i, (field, textarea)) in Field::iter().zip(&self.inputs).enumerate() {
            let Some(&area) = areas.get(i + 1) else {
                break;
            };
            let border = if i == self.focus { FOCUS } else { DIM };
            let block = Block::default()
                .title(format!(" {} ", field.label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border));
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(textarea, inner);
        }

        let footer_index = self.inputs.len() + 1;
        if let (Some(error), Some(&area)) = (&self.error, areas.get(footer_index)) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("Error: {error}"),
                    Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
                )),
                area,
            );
        }
        if let Some(&area) = areas.get(footer_index + 1) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Tab/↓: next field • Shift+Tab/↑: previous field • Ctrl+S: save • Esc: cancel",
                    Style::default().fg(DIM),
                )),
                area,
            );
        }
    }
}

/// Run the editor; returns `true` when the configuration was saved
pub fn run_config_editor(config: &Config, path: Option<PathBuf>) -> Result<bool> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut editor = ConfigEditor::new(config);
    let result = editor_loop(&mut terminal, &mut editor, path.as_deref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn editor_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    editor: &mut ConfigEditor,
    path: Option<&Path>,
) -> Result<bool> {
    loop {
        terminal.draw(|frame| editor.render(frame))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match editor.handle_key(key) {
            EditorAction::Continue => {}
            EditorAction::Cancel => return Ok(false),
            EditorAction::Save(updated) => {
                let saved = match path {
                    Some(path) => updated.save_to(path),
                    None => updated.save(),
                };
                match saved {
                    Ok(()) => return Ok(true),
                    Err(e) => {
                        log_debug!("Saving configuration failed: {}", e);
                        editor.error = Some(e.to_string());
                    }
                }
            }
        }
    }
}
