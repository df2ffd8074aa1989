//! Effect executor
//!
//! Runs the side effects the reducer asks for. Every task reports back
//! with exactly one event on the session channel; blocking VCS calls go
//! through `spawn_blocking` so the event loop never stalls.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::events::{SessionEvent, SideEffect};
use crate::config::Config;
use crate::generation;
use crate::git::Vcs;
use crate::llm::MessageGenerator;
use crate::{trace_debug, trace_warn};

/// Whether the loop keeps going after an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Executes side effects against the real (or fake) collaborators
pub struct EffectExecutor {
    vcs: Arc<dyn Vcs>,
    generator: Arc<dyn MessageGenerator>,
    /// Where to persist configuration; `None` uses the default location
    config_path: Option<PathBuf>,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EffectExecutor {
    pub fn new(
        vcs: Arc<dyn Vcs>,
        generator: Arc<dyn MessageGenerator>,
        tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            vcs,
            generator,
            config_path: None,
            tx,
        }
    }

    /// Persist configuration to `path` instead of the default location
    #[must_use]
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn execute(&self, effect: SideEffect) -> Flow {
        trace_debug!(target: "anc::session", effect = ?effect, "executing effect");

        match effect {
            SideEffect::ListChanges => {
                self.spawn_vcs(|vcs| vcs.list_changes(), SessionEvent::ChangesListed);
            }
            SideEffect::ProbeStaged => {
                self.spawn_vcs(|vcs| vcs.list_staged(), SessionEvent::StagedProbed);
            }
            SideEffect::Stage(paths) => {
                self.spawn_vcs(move |vcs| vcs.stage(&paths), SessionEvent::Staged);
            }
            SideEffect::Unstage(paths) => {
                self.spawn_vcs(move |vcs| vcs.unstage(&paths), SessionEvent::Unstaged);
            }
            SideEffect::Commit(message) => {
                self.spawn_vcs(move |vcs| vcs.commit(&message), SessionEvent::Committed);
            }
            SideEffect::SaveConfig(config) => self.spawn_save(config),
            SideEffect::Generate(plan) => {
                let vcs = Arc::clone(&self.vcs);
                let generator = Arc::clone(&self.generator);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = generation::generate(&plan, &vcs, generator.as_ref())
                        .await
                        .map_err(|e| e.to_string());
                    let _ = tx.send(SessionEvent::MessageGenerated(result));
                });
            }
            SideEffect::Cleanup(paths) => {
                // The process may exit right after this; nobody waits for it
                self.vcs.unstage_detached(&paths);
            }
            SideEffect::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn spawn_vcs<T, F>(&self, op: F, complete: fn(Result<T, String>) -> SessionEvent)
    where
        F: FnOnce(&dyn Vcs) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let vcs = Arc::clone(&self.vcs);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match tokio::task::spawn_blocking(move || op(vcs.as_ref())).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => {
                    trace_warn!(target: "anc::session", error = %e, "VCS task did not complete");
                    Err(format!("VCS task failed: {e}"))
                }
            };
            let _ = tx.send(complete(result));
        });
    }

    fn spawn_save(&self, config: Config) {
        let path = self.config_path.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let saved = tokio::task::spawn_blocking(move || match path {
                Some(path) => config.save_to(&path),
                None => config.save(),
            })
            .await;
            let result = match saved {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(SessionEvent::ConfigSaved(result));
        });
    }
}
