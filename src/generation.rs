//! Generation mode policy.
//!
//! Turns the user's chosen mode into concrete requests against the
//! message generator and assembles the final commit message.

use std::fmt;
use std::sync::Arc;

use strum_macros::EnumIter;

use crate::config::{Config, DefaultMode};
use crate::git::Vcs;
use crate::llm::{GenerationError, MessageGenerator, ModelSettings};
use crate::log_debug;

/// Strategy used to produce a commit message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum GenerationMode {
    /// One request for the whole staged diff
    AllInOne,
    /// One request per staged file, one output line each
    ByFile,
    /// Whole staged diff plus free-text context from the user
    CustomPrompt,
}

impl GenerationMode {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AllInOne => "All-in-one summary",
            Self::ByFile => "File-by-file summary",
            Self::CustomPrompt => "Custom prompt",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::AllInOne => "One message describing every staged change",
            Self::ByFile => "One line per staged file",
            Self::CustomPrompt => "Add your own context before generating",
        }
    }

    /// Mode matching a persisted default, if the default names one
    pub const fn from_default(default: DefaultMode) -> Option<Self> {
        match default {
            DefaultMode::Interactive => None,
            DefaultMode::All => Some(Self::AllInOne),
            DefaultMode::ByFile => Some(Self::ByFile),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Everything the session knows when it asks for a message.
///
/// Stored on the session so that regeneration replays the same inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub mode: GenerationMode,
    pub settings: ModelSettings,
    pub system_prompt_all: String,
    pub system_prompt_file: String,
    /// User context, only meaningful for `CustomPrompt`
    pub context: String,
}

impl GenerationPlan {
    pub fn new(mode: GenerationMode, config: &Config, context: &str) -> Self {
        Self {
            mode,
            settings: ModelSettings::from_config(config),
            system_prompt_all: config.system_prompt_all.clone(),
            system_prompt_file: config.system_prompt_file.clone(),
            context: context.to_string(),
        }
    }
}

/// What a request is generated from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestInput {
    /// Combined staged diff
    Diff(String),
    /// Staged paths, in listing order, each diffed on its own
    PerFile(Vec<String>),
}

/// A single generation attempt, built fresh from a plan and the index
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub system_prompt: String,
    pub input: RequestInput,
    pub context: Option<String>,
}

/// User message for whole-diff modes.
///
/// Non-empty context is prepended; otherwise the diff goes through untouched.
pub fn user_message(diff: &str, context: Option<&str>) -> String {
    match context {
        Some(context) if !context.is_empty() => {
            format!("Context: {context}\n\nDiff:\n{diff}")
        }
        _ => diff.to_string(),
    }
}

/// Join per-file results as `path: message` lines
pub fn join_per_file(results: &[(String, String)]) -> String {
    results
        .iter()
        .map(|(path, message)| format!("{path}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

async fn vcs_call<T, F>(vcs: &Arc<dyn Vcs>, f: F) -> Result<T, GenerationError>
where
    F: FnOnce(&dyn Vcs) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let vcs = Arc::clone(vcs);
    tokio::task::spawn_blocking(move || f(vcs.as_ref()))
        .await
        .map_err(|e| GenerationError::Diff(e.to_string()))?
        .map_err(|e| GenerationError::Diff(e.to_string()))
}

/// Read the index and build the request for `plan`
pub async fn build_request(
    plan: &GenerationPlan,
    vcs: &Arc<dyn Vcs>,
) -> Result<GenerationRequest, GenerationError> {
    let request = match plan.mode {
        GenerationMode::AllInOne => GenerationRequest {
            mode: plan.mode,
            system_prompt: plan.system_prompt_all.clone(),
            input: RequestInput::Diff(vcs_call(vcs, |v| v.diff()).await?),
            context: None,
        },
        GenerationMode::CustomPrompt => GenerationRequest {
            mode: plan.mode,
            system_prompt: plan.system_prompt_all.clone(),
            input: RequestInput::Diff(vcs_call(vcs, |v| v.diff()).await?),
            context: Some(plan.context.clone()),
        },
        GenerationMode::ByFile => GenerationRequest {
            mode: plan.mode,
            system_prompt: plan.system_prompt_file.clone(),
            input: RequestInput::PerFile(vcs_call(vcs, |v| v.list_staged()).await?),
            context: None,
        },
    };
    Ok(request)
}

/// Run one full generation attempt for `plan`.
///
/// In by-file mode a file whose diff or completion fails is skipped; the
/// attempt only fails when nothing at all could be generated.
pub async fn generate(
    plan: &GenerationPlan,
    vcs: &Arc<dyn Vcs>,
    generator: &dyn MessageGenerator,
) -> Result<String, GenerationError> {
    let request = build_request(plan, vcs).await?;
    log_debug!("Generating with mode {:?}", request.mode);

    match request.input {
        RequestInput::Diff(diff) => {
            if diff.trim().is_empty() {
                return Err(GenerationError::EmptyInput);
            }
            let user_text = user_message(&diff, request.context.as_deref());
            generator
                .complete(&plan.settings, &request.system_prompt, &user_text)
                .await
        }
        RequestInput::PerFile(paths) => {
            if paths.is_empty() {
                return Err(GenerationError::NoStagedFiles);
            }

            let mut results = Vec::with_capacity(paths.len());
            for path in paths {
                let file = path.clone();
                let diff = match vcs_call(vcs, move |v| v.diff_for(&file)).await {
                    Ok(diff) if !diff.trim().is_empty() => diff,
                    Ok(_) => {
                        log_debug!("Skipping {}: empty diff", path);
                        continue;
                    }
                    Err(e) => {
                        log_debug!("Skipping {}: {}", path, e);
                        continue;
                    }
                };

                match generator
                    .complete(&plan.settings, &request.system_prompt, &diff)
                    .await
                {
                    Ok(message) => results.push((path, message.trim().to_string())),
                    Err(e) => log_debug!("Skipping {}: {}", path, e),
                }
            }

            if results.is_empty() {
                return Err(GenerationError::NothingGenerated);
            }
            Ok(join_per_file(&results))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_prepended_only_when_present() {
        assert_eq!(user_message("D", Some("X")), "Context: X\n\nDiff:\nD");
        assert_eq!(user_message("D", Some("")), "D");
        assert_eq!(user_message("D", None), "D");
    }

    #[test]
    fn per_file_lines_keep_order() {
        let joined = join_per_file(&[
            ("a.rs".to_string(), "add a".to_string()),
            ("c.rs".to_string(), "fix c".to_string()),
        ]);
        assert_eq!(joined, "a.rs: add a\nc.rs: fix c");
    }

    #[test]
    fn default_mode_maps_to_generation_mode() {
        assert_eq!(GenerationMode::from_default(DefaultMode::Interactive), None);
        assert_eq!(
            GenerationMode::from_default(DefaultMode::All),
            Some(GenerationMode::AllInOne)
        );
        assert_eq!(
            GenerationMode::from_default(DefaultMode::ByFile),
            Some(GenerationMode::ByFile)
        );
    }
}
