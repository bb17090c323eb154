//! Pagewise CLI - Walk a wizard from the terminal
//!
//! Usage:
//!   pagewise init                 Create a template wizard.toml
//!   pagewise check                Validate wizard.toml and print its page tree
//!   pagewise sequence             Show the currently active steps
//!   pagewise set <key> <value>..  Answer a page
//!   pagewise review               Show the review summary
//!   pagewise run                  Answer the wizard interactively
//!   pagewise reset                Forget saved answers

mod prompt;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input};
use pagewise_core::config::{generate_template, WizardConfig, DEFAULT_FILE_NAME};
use pagewise_core::{PageList, WizardModel};
use session::Session;
use std::fs;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "pagewise")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pagewise - step-by-step wizards from a TOML file")]
struct Cli {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    silent: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to wizard.toml (default: ./wizard.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Saved-state file (default: ~/.local/share/pagewise/state/<name>.json)
    #[arg(long, global = true, value_name = "FILE")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a template wizard.toml in current directory
    Init {
        /// Wizard name
        #[arg(short, long)]
        name: Option<String>,

        /// Accept defaults without prompts
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate the wizard definition and print every page
    Check,

    /// Show the currently active steps
    Sequence {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a page (one word per choice for multiple-choice pages)
    Set {
        /// Page key
        key: String,

        /// Answer
        #[arg(required = true, num_args = 1..)]
        values: Vec<String>,
    },

    /// Clear the answer of a page
    Clear {
        /// Page key
        key: String,
    },

    /// Show the review summary of the current answers
    Review {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer the wizard interactively
    Run,

    /// Forget all saved answers
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

// Console helper for output control
pub(crate) struct Console {
    silent: bool,
    verbose: bool,
}

impl Console {
    fn new(silent: bool, verbose: bool) -> Self {
        Self { silent, verbose }
    }

    pub(crate) fn log(&self, msg: impl std::fmt::Display) {
        if !self.silent {
            println!("{}", msg);
        }
    }

    pub(crate) fn verbose(&self, msg: impl std::fmt::Display) {
        if self.verbose && !self.silent {
            println!("  {}", msg);
        }
    }

    pub(crate) fn success(&self, msg: impl std::fmt::Display) {
        if !self.silent {
            println!("✅ {}", msg);
        }
    }

    pub(crate) fn warn(&self, msg: impl std::fmt::Display) {
        if !self.silent {
            eprintln!("⚠️  {}", msg);
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let console = Console::new(cli.silent, cli.verbose);

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.silent {
        Level::ERROR
    } else {
        Level::WARN
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();

    let config = cli.config;
    let state = cli.state;

    match cli.command {
        Commands::Init { name, yes } => cmd_init(name, yes, &console),
        Commands::Check => cmd_check(config, &console),
        Commands::Sequence { json } => {
            let session = Session::open(config.as_deref(), state)?;
            cmd_sequence(&session.model, json, &console)
        }
        Commands::Set { key, values } => cmd_set(config, state, &key, &values, &console),
        Commands::Clear { key } => {
            let mut session = Session::open(config.as_deref(), state)?;
            session.model.clear_value(&key)?;
            session.save()?;
            console.success(format!("Cleared '{}'", key));
            Ok(())
        }
        Commands::Review { json } => {
            let session = Session::open(config.as_deref(), state)?;
            cmd_review(&session.model, json, &console)
        }
        Commands::Run => {
            let mut session = Session::open(config.as_deref(), state)?;
            prompt::run(&mut session, &console)
        }
        Commands::Reset { yes } => cmd_reset(config, state, yes, &console),
    }
}

/// Write a template wizard.toml
fn cmd_init(name: Option<String>, accept_defaults: bool, console: &Console) -> Result<()> {
    let config_path = std::env::current_dir()?.join(DEFAULT_FILE_NAME);
    if config_path.exists() {
        anyhow::bail!("{} already exists in this directory", DEFAULT_FILE_NAME);
    }

    let name: String = match name {
        Some(name) => name,
        None if accept_defaults => "My Wizard".to_string(),
        None => Input::new()
            .with_prompt("name")
            .default("My Wizard".to_string())
            .interact_text()?,
    };

    let template = generate_template(&name);

    // Sanity-check the template before handing it out
    WizardConfig::from_str(&template)?.validate()?;

    fs::write(&config_path, &template)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    console.success(format!("Created {}", DEFAULT_FILE_NAME));
    console.log("\nNext steps:");
    console.log("  1. Edit the [[pages]] to describe your wizard");
    console.log("  2. Run: pagewise check");
    console.log("  3. Run: pagewise run");

    Ok(())
}

/// Validate the definition and print the full page tree
fn cmd_check(config_path: Option<PathBuf>, console: &Console) -> Result<()> {
    let config = match config_path {
        Some(ref path) => WizardConfig::from_file(path)?,
        None => WizardConfig::from_current_dir()?,
    };
    config.validate()?;

    let model = WizardModel::new(&config, config.string_table())
        .context("Invalid wizard definition")?;

    console.log(format!("🧭 Wizard: {}", config.wizard.name));
    console.verbose(format!(
        "{} pages, {} strings",
        model.root().all_pages().len(),
        config.string_table().len()
    ));
    console.log("");
    for line in tree_lines(model.root(), 0) {
        console.log(line);
    }
    console.log("");
    console.success("Wizard definition is valid");

    Ok(())
}

fn cmd_sequence(model: &WizardModel, json: bool, console: &Console) -> Result<()> {
    let sequence = model.current_page_sequence();

    if json {
        let pages: Vec<_> = sequence
            .iter()
            .map(|page| {
                serde_json::json!({
                    "key": page.key(),
                    "title": page.title(),
                    "screen": page.screen(),
                    "required": page.is_required(),
                    "completed": page.is_completed(),
                    "parent": page.parent_key(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    for (index, page) in sequence.iter().enumerate() {
        let mark = if page.is_completed() {
            "✓"
        } else if page.is_required() {
            "•"
        } else {
            "○"
        };
        console.log(format!("{:>3}. {} {} ({})", index + 1, mark, page.title(), page.key()));
    }

    match model.first_blocking_page() {
        Some(page) => console.log(format!("\nNext required step: {}", page.title())),
        None => console.success("All required steps are answered"),
    }

    Ok(())
}

fn cmd_set(
    config: Option<PathBuf>,
    state: Option<PathBuf>,
    key: &str,
    values: &[String],
    console: &Console,
) -> Result<()> {
    let mut session = Session::open(config.as_deref(), state)?;

    let before = session.model.current_page_sequence().len();
    session.answer(key, values)?;
    let after = session.model.current_page_sequence().len();
    session.save()?;

    console.success(format!("Answered '{}'", key));
    if before != after {
        console.log(format!("   Steps changed: {} -> {}", before, after));
    }

    Ok(())
}

fn cmd_review(model: &WizardModel, json: bool, console: &Console) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&model.review_items())?);
        return Ok(());
    }

    prompt::print_review(model, console);
    if !model.is_complete() {
        console.warn("Some required steps are still unanswered");
    }

    Ok(())
}

fn cmd_reset(
    config: Option<PathBuf>,
    state: Option<PathBuf>,
    yes: bool,
    console: &Console,
) -> Result<()> {
    // The state file is not parsed: reset must also discard unreadable state
    let session = Session::open_definition(config.as_deref(), state)?;

    if !yes && !console.silent {
        let confirm = Confirm::new()
            .with_prompt(format!("Forget all answers of '{}'?", session.config.wizard.name))
            .default(false)
            .interact()?;

        if !confirm {
            console.log("Cancelled.");
            return Ok(());
        }
    }

    if session.reset()? {
        console.success("Saved answers removed");
    } else {
        console.log("Nothing saved yet.");
    }

    Ok(())
}

/// Indented outline of every page, including inactive branches
fn tree_lines(list: &PageList, depth: usize) -> Vec<String> {
    let indent = "  ".repeat(depth);
    let mut lines = Vec::new();

    for page in list {
        let optional = if page.is_required() { "" } else { " (optional)" };
        lines.push(format!(
            "{}- {} [{}] {}{}",
            indent,
            page.key(),
            page.kind().name(),
            page.title(),
            optional
        ));

        for branch in page.branches().unwrap_or_default() {
            lines.push(format!("{}    when \"{}\":", indent, branch.choice()));
            lines.extend(tree_lines(branch.pages(), depth + 3));
        }
    }

    lines
}
