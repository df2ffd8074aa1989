use crate::config::Config;
use crate::config_editor::run_config_editor;
use crate::git::GitCli;
use crate::llm::OpenAiClient;
use crate::session::{SessionOutcome, run_session};
use crate::ui;
use crate::{log_debug, logger};

use anyhow::{Context, Result, bail};
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, crate_version};
use std::path::Path;
use std::sync::Arc;

/// Command-line flags; with none given the interactive session starts
#[derive(Parser, Debug)]
#[command(
    name = "anc",
    version = crate_version!(),
    about = "anc: AI-powered git commit message generator",
    long_about = "Select files to stage, generate a commit message with AI, review it and commit.\n\
                  Run without options to enter interactive mode.",
    disable_version_flag = true,
    after_help = AFTER_HELP,
    styles = get_styles(),
)]
pub struct Cli {
    /// Set the OpenAI API key
    #[arg(long = "set-key", value_name = "KEY", help = "Set the OpenAI API key")]
    pub set_key: Option<String>,

    /// Show the current OpenAI API key (masked)
    #[arg(long = "show-key", help = "Show the current OpenAI API key (masked)")]
    pub show_key: bool,

    /// Delete the stored OpenAI API key
    #[arg(long = "delete-key", help = "Delete the stored OpenAI API key")]
    pub delete_key: bool,

    /// Open the interactive configuration editor
    #[arg(long = "config", help = "Open interactive configuration editor")]
    pub config: bool,

    /// Display the version
    #[arg(short = 'v', long = "version", help = "Show version information")]
    pub version: bool,

    /// Log debug messages to a file
    #[arg(short = 'l', long = "log", help = "Log debug messages to a file")]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(long = "log-file", help = "Specify a custom log file path")]
    pub log_file: Option<String>,
}

const AFTER_HELP: &str = "\
Configuration is stored in your config directory under anc/config.toml.
The OPENAI_API_KEY environment variable overrides the stored key.

Examples:
    anc                     Enter interactive mode
    anc --set-key sk-...    Set your OpenAI API key
    anc --show-key          View your current API key (masked)
    anc --config            Open the configuration editor";

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

// ═══════════════════════════════════════════════════════════════════════════════
// Key management
// ═══════════════════════════════════════════════════════════════════════════════

/// Validate and persist a new API key
pub fn set_key(key: &str, path: &Path) -> Result<()> {
    let key = key.trim();
    if !key.starts_with("sk-") {
        bail!("invalid API key format: OpenAI API keys should start with 'sk-'");
    }

    let mut config = Config::load_from(path);
    config.api_key = key.to_string();
    config
        .save_to(path)
        .context("failed to save configuration")?;

    ui::print_success("✓ OpenAI API key saved successfully");
    ui::print_dim(&format!("Configuration stored in {}", path.display()));
    Ok(())
}

/// Masked form of the configured key, if there is one
pub fn show_key(path: &Path) -> Option<String> {
    let config = Config::load_from(path);
    config
        .has_api_key()
        .then(|| ui::mask_api_key(&config.api_key))
}

/// Remove the stored key; returns `false` when there was none
pub fn delete_key(path: &Path) -> Result<bool> {
    let mut config = Config::load_from(path);
    if !config.has_api_key() {
        return Ok(false);
    }
    config.api_key.clear();
    config
        .save_to(path)
        .context("failed to save configuration")?;
    Ok(true)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Entry point
// ═══════════════════════════════════════════════════════════════════════════════

/// Main function to parse arguments and handle the command
pub async fn main() -> Result<()> {
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    if cli.log {
        logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(logger::DEFAULT_LOG_FILE);
        logger::set_log_file(log_file)?;
    } else {
        logger::disable_logging();
    }
    log_debug!("Parsed arguments: {:?}", cli);

    let config_path = Config::get_config_path()?;

    if let Some(key) = cli.set_key.as_deref() {
        return set_key(key, &config_path);
    }

    if cli.show_key {
        match show_key(&config_path) {
            Some(masked) => ui::print_info(&format!("Current OpenAI API key: {masked}")),
            None => {
                ui::print_warning("No OpenAI API key configured");
                ui::print_dim("Use 'anc --set-key <key>' to set one");
            }
        }
        return Ok(());
    }

    if cli.delete_key {
        if delete_key(&config_path)? {
            ui::print_success("✓ OpenAI API key deleted successfully");
        } else {
            ui::print_info("No OpenAI API key to delete");
        }
        return Ok(());
    }

    let config = Config::load_from(&config_path);

    if cli.config {
        if run_config_editor(&config, Some(config_path))? {
            ui::print_success("✓ Configuration saved successfully!");
        }
        return Ok(());
    }

    run_interactive(config).await
}

/// Start the interactive session in the current repository
async fn run_interactive(config: Config) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let vcs = GitCli::discover(&cwd)?;
    let generator = OpenAiClient::new().context("Failed to create the HTTP client")?;

    match run_session(config, Arc::new(vcs), Arc::new(generator)).await? {
        SessionOutcome::Committed(note) => ui::print_success(&note),
        SessionOutcome::Failed(error) => ui::print_error(&format!("Error: {error}")),
        SessionOutcome::Cancelled => log_debug!("Session cancelled"),
    }
    Ok(())
}
