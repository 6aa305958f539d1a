//! quizclock CLI — take, score and compare timed quizzes from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "quizclock", version, about = "Timed quizzes from question bank files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a timed quiz in the terminal
    Take {
        /// Path to a .toml or .json question bank
        #[arg(long)]
        bank: PathBuf,

        /// Time limit in seconds (overrides the bank and config)
        #[arg(long)]
        duration: Option<u32>,

        /// Directory for the saved attempt
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a JSON answers file against a bank
    Score {
        /// Path to a .toml or .json question bank
        #[arg(long)]
        bank: PathBuf,

        /// JSON object of question id to answer
        #[arg(long)]
        answers: PathBuf,

        /// Seconds to record as time taken
        #[arg(long, default_value = "0")]
        time_taken: u32,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question bank files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Compare two saved attempts
    Compare {
        /// Baseline attempt JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current attempt JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if the score went down
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example bank
    Init,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "quizclock=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            duration,
            output,
            config,
        } => commands::take::execute(bank, duration, output, config).await,
        Commands::Score {
            bank,
            answers,
            time_taken,
            format,
            output,
            config,
        } => commands::score::execute(bank, answers, time_taken, format, output, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
