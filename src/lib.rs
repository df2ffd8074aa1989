//! add-n-commit - interactive AI commit assistant
//!
//! Stages the files you pick, asks a chat-completion model for a commit
//! message in one of three modes, lets you review or edit it, and commits.

// Allow certain clippy warnings that are stylistic
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine

pub mod cli;
pub mod config;
pub mod config_editor;
pub mod generation;
pub mod git;
pub mod llm;
pub mod logger;
pub mod session;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use config::{Config, DefaultMode};
pub use generation::{GenerationMode, GenerationPlan};
pub use git::{GitCli, Vcs};
pub use llm::{GenerationError, MessageGenerator, OpenAiClient};
