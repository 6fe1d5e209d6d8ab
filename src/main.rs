use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use precis::cli::{self, RequestOverrides};

#[derive(Debug, Parser)]
#[command(name = "precis")]
#[command(about = "Client for a document summarization service")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Summarize one or more local document files (.txt, .pdf, .docx)
    Files {
        /// Paths of the files to upload
        paths: Vec<PathBuf>,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Summarize raw text — pass it as an argument or pipe it on stdin
    Text {
        /// The text to summarize (reads stdin when omitted)
        text: Option<String>,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Check system health: server reachability, config, request log
    Health,
    /// Show recent summarization requests
    History {
        /// Maximum number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Args)]
struct RequestArgs {
    /// Requested summary length in tokens (default from config: 150)
    #[arg(long)]
    summary_length: Option<u32>,
    /// Summarization server base URL
    #[arg(long)]
    server: Option<String>,
    /// Output format: table (default), html, json
    #[arg(long)]
    format: Option<String>,
    /// Write the rendered report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl RequestArgs {
    fn into_overrides(self) -> RequestOverrides {
        RequestOverrides {
            summary_length: self.summary_length,
            server: self.server,
            format: self.format,
            output: self.output,
        }
    }
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective (merged) configuration
    Show,
    /// Write the default config to ~/.precis/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a single config value (dotted key, e.g. summary.length)
    Set { key: String, value: String },
    /// Reset the global config file to defaults
    Reset,
}

fn main() -> ExitCode {
    let app = App::parse();

    match run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Notifier failures were already printed to stderr.
            if err.downcast_ref::<cli::ReportedFailure>().is_none() {
                eprintln!("{} {err:#}", "✗".red().bold());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(app: App) -> Result<()> {
    match app.command {
        Commands::Files { paths, request } => cli::run_files(&paths, &request.into_overrides()),
        Commands::Text { text, request } => cli::run_text(text, &request.into_overrides()),
        Commands::Health => cli::run_health(),
        Commands::History { limit, format } => cli::run_history(limit, &format),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
