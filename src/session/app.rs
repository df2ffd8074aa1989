//! Event loop for the commit session
//!
//! Terminal events, task completions and the spinner tick all feed one
//! channel; each event goes through the reducer and the resulting effects
//! go to the executor.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use super::events::SessionEvent;
use super::executor::{EffectExecutor, Flow};
use super::reducer::reduce;
use super::render::render;
use super::state::{Phase, Session};
use crate::config::Config;
use crate::git::Vcs;
use crate::llm::MessageGenerator;
use crate::{log_debug, log_info};

type SessionTerminal = Terminal<CrosstermBackend<Stdout>>;

const TICK_RATE: Duration = Duration::from_millis(100);

/// How the session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Committed(String),
    Failed(String),
    /// User left before committing
    Cancelled,
}

impl SessionOutcome {
    fn from_session(session: &Session) -> Self {
        match session.phase {
            Phase::Success => Self::Committed(session.success_note.clone().unwrap_or_default()),
            Phase::Failure => Self::Failed(session.last_error.clone().unwrap_or_default()),
            _ => Self::Cancelled,
        }
    }
}

/// Forward terminal events into the session channel from a dedicated thread
fn spawn_event_reader(tx: mpsc::UnboundedSender<SessionEvent>) {
    std::thread::spawn(move || {
        loop {
            match crossterm::event::poll(Duration::from_millis(250)) {
                Ok(true) => {
                    let event = match crossterm::event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            SessionEvent::Key(key)
                        }
                        Ok(Event::Resize(width, height)) => SessionEvent::Resize { width, height },
                        Ok(_) => continue,
                        Err(_) => break,
                    };
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(false) => {}
                Err(_) => break,
            }
        }
    });
}

/// Run the interactive session until the user quits
pub async fn run_session(
    config: Config,
    vcs: Arc<dyn Vcs>,
    generator: Arc<dyn MessageGenerator>,
) -> Result<SessionOutcome> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = main_loop(&mut terminal, config, vcs, generator).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn main_loop(
    terminal: &mut SessionTerminal,
    config: Config,
    vcs: Arc<dyn Vcs>,
    generator: Arc<dyn MessageGenerator>,
) -> Result<SessionOutcome> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    spawn_event_reader(tx.clone());
    let executor = EffectExecutor::new(vcs, generator, tx);

    let mut session = Session::new(config);
    let size = terminal.size()?;
    session.viewport = (size.width, size.height);
    log_info!("Session started in {:?}", session.phase);

    for effect in session.start() {
        executor.execute(effect);
    }

    let mut tick = tokio::time::interval(TICK_RATE);
    loop {
        if session.check_dirty() {
            terminal.draw(|frame| render(frame, &session))?;
        }

        let event = tokio::select! {
            biased;
            event = rx.recv() => event,
            _ = tick.tick() => Some(SessionEvent::Tick),
        };
        let Some(event) = event else {
            break;
        };

        if dispatch(&mut session, &executor, event) == Flow::Quit {
            break;
        }
        // Drain queued events so fast typing is not throttled to one per frame
        let mut quit = false;
        while let Ok(event) = rx.try_recv() {
            if dispatch(&mut session, &executor, event) == Flow::Quit {
                quit = true;
                break;
            }
        }
        if quit {
            break;
        }
    }

    log_info!("Session ended in {:?}", session.phase);
    Ok(SessionOutcome::from_session(&session))
}

fn dispatch(session: &mut Session, executor: &EffectExecutor, event: SessionEvent) -> Flow {
    if !matches!(event, SessionEvent::Tick | SessionEvent::Key(_)) {
        log_debug!("Event: {:?}", event);
    }
    let mut flow = Flow::Continue;
    for effect in reduce(session, event) {
        if executor.execute(effect) == Flow::Quit {
            flow = Flow::Quit;
        }
    }
    flow
}
