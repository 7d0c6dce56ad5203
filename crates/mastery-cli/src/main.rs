//! mastery CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "mastery", version, about = "IGCSE mastery scoring engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess progress records and print mastery reports
    Assess {
        /// Path to a .toml progress file or directory
        #[arg(long)]
        progress: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: table, json, markdown
        #[arg(long, default_value = "table")]
        format: String,

        /// Directory to save JSON and HTML reports into
        #[arg(long)]
        output: Option<PathBuf>,

        /// Only assess these subtopics (comma-separated)
        #[arg(long)]
        subtopic: Option<String>,
    },

    /// Validate progress TOML files
    Validate {
        /// Path to a progress file or directory
        #[arg(long)]
        progress: PathBuf,
    },

    /// Merge a completed quiz into a progress file
    Record {
        /// Progress file to update
        #[arg(long)]
        progress: PathBuf,

        /// Subtopic the quiz covered
        #[arg(long)]
        subtopic: String,

        /// Quiz outcome TOML file
        #[arg(long)]
        quiz: PathBuf,

        /// Write the updated record back to the progress file
        #[arg(long)]
        write: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the mastery level ladder
    Levels {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example progress file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mastery_core=info,mastery=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assess {
            progress,
            config,
            format,
            output,
            subtopic,
        } => commands::assess::execute(progress, config, format, output, subtopic),
        Commands::Validate { progress } => commands::validate::execute(progress),
        Commands::Record {
            progress,
            subtopic,
            quiz,
            write,
            config,
        } => commands::record::execute(progress, subtopic, quiz, write, config),
        Commands::Levels { config } => commands::levels::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
