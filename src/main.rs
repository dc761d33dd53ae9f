//! Handoff - AI-guided offboarding interviews in your terminal.
//!
//! The default command opens the interview wizard; the subcommands expose
//! the AI gateway operations for scripting.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use handoff::ai::{clip_mime_type, Gateway};
use handoff::core::Config;
use handoff::{tui, App, UserContext};

/// AI-guided offboarding interviews in your terminal
#[derive(Parser)]
#[command(name = "handoff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interview wizard (default)
    Run,

    /// Generate interview topics without entering the wizard
    Topics {
        /// Departing employee's name
        #[arg(long)]
        name: String,

        /// Their role
        #[arg(long)]
        role: String,

        /// Their department
        #[arg(long)]
        department: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Transcribe a recorded clip and print the transcript
    Transcribe {
        /// Path to the clip (.mp4, .webm, .mov)
        file: PathBuf,
    },

    /// Show the resolved configuration
    Config {
        /// Print the config file location instead of the contents
        #[arg(long)]
        path: bool,

        /// Write the resolved configuration to the global config file
        #[arg(long)]
        init: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    // Pick up GEMINI_API_KEY and friends from a local .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };
    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match cli.command {
        None | Some(Commands::Run) => cmd_run()?,
        Some(Commands::Topics {
            name,
            role,
            department,
            format,
        }) => cmd_topics(&name, &role, &department, &format)?,
        Some(Commands::Transcribe { file }) => cmd_transcribe(&file)?,
        Some(Commands::Config { path, init }) => cmd_config(path, init)?,
        Some(Commands::Completions { shell }) => cmd_completions(shell),
    }

    Ok(())
}

/// Open the interview wizard.
fn cmd_run() -> Result<()> {
    let config = Config::load()?;
    let app = App::new(config);
    tui::run_tui(app)
}

/// Generate and print interview topics.
fn cmd_topics(name: &str, role: &str, department: &str, format: &str) -> Result<()> {
    let user = UserContext::new(name, role, department);
    if let Some(field) = user.missing_field() {
        anyhow::bail!("{field} must not be empty");
    }

    let config = Config::load()?;
    let gateway = Gateway::from_env(&config.ai)?;
    tracing::debug!(provider = gateway.provider_name(), "generating topics");
    let rt = tokio::runtime::Runtime::new()?;
    let topics = rt.block_on(gateway.generate_topics(&user))?;

    if topics.is_empty() {
        anyhow::bail!("the service proposed no topics; try again");
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&topics)?),
        _ => {
            for (i, topic) in topics.iter().enumerate() {
                println!("{}. {}", i + 1, topic.title);
                println!("   {}", topic.summary);
                println!("   Q: {}", topic.primary_question);
                println!("   Follow-up: {}", topic.follow_up_question);
                println!();
            }
        }
    }

    Ok(())
}

/// Transcribe a recorded clip.
fn cmd_transcribe(file: &PathBuf) -> Result<()> {
    let media = std::fs::read(file)
        .map_err(|err| anyhow::anyhow!("could not read {}: {err}", file.display()))?;

    let config = Config::load()?;
    let gateway = Gateway::from_env(&config.ai)?;
    let rt = tokio::runtime::Runtime::new()?;
    let transcript = rt.block_on(gateway.transcribe(&media, clip_mime_type(file)));

    println!("{transcript}");
    Ok(())
}

/// Show the resolved configuration, or its location.
fn cmd_config(path_only: bool, init: bool) -> Result<()> {
    if path_only {
        match Config::config_dir() {
            Some(dir) => println!("{}", dir.join("config.toml").display()),
            None => anyhow::bail!("could not determine config directory"),
        }
        return Ok(());
    }

    let config = Config::load()?;
    if init {
        config.save()?;
        if let Some(dir) = Config::config_dir() {
            println!("Wrote {}", dir.join("config.toml").display());
        }
        return Ok(());
    }

    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    generate(shell, &mut Cli::command(), "handoff", &mut io::stdout());
}
