//! Interactive commit session
//!
//! A single reducer-driven screen flow:
//! - **Select** changed files to stage (or keep what is already staged)
//! - **Generate** a commit message in one of three modes
//! - **Review**, edit or regenerate, then commit

mod app;
mod events;
mod executor;
mod keys;
mod reducer;
mod render;
mod state;
mod theme;

// Re-exports
pub use app::{SessionOutcome, run_session};
pub use events::{Intent, SessionEvent, SideEffect};
pub use executor::{EffectExecutor, Flow};
pub use reducer::reduce;
pub use state::{EntryKind, Mutation, Phase, Session};

#[cfg(test)]
mod tests;
