//! wordcoach CLI — score, grade, and track children's English practice.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use wordcoach_core::model::ExerciseKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "wordcoach",
    version,
    about = "Speaking and writing practice scorer for young English learners"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a spoken transcript against a target word
    Score {
        /// What the learner said (speech-to-text output)
        #[arg(long)]
        transcript: String,

        /// The word the learner was asked to say
        #[arg(long)]
        target: String,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a written answer with a language model
    Grade {
        /// Exercise kind: qa, sentence, complete
        #[arg(long)]
        kind: ExerciseKind,

        /// The learner's written answer
        #[arg(long)]
        answer: String,

        /// Question text (qa)
        #[arg(long)]
        question: Option<String>,

        /// Word the sentence must use (sentence), or the expected word (complete)
        #[arg(long)]
        target_word: Option<String>,

        /// Sentence with a blank (complete)
        #[arg(long)]
        partial: Option<String>,

        /// Grading model (e.g. "gemini/gemini-2.0-flash")
        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a practice session from a lesson and an attempts file
    Practice {
        /// Path to the lesson .toml file
        #[arg(long)]
        lesson: PathBuf,

        /// Path to the attempts .toml file
        #[arg(long)]
        attempts: PathBuf,

        /// Grading model for writing exercises (e.g. "gemini/gemini-2.0-flash")
        #[arg(long)]
        model: Option<String>,

        /// Max concurrent grading requests
        #[arg(long)]
        parallelism: Option<usize>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two practice reports
    Compare {
        /// Earlier practice report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Later practice report JSON
        #[arg(long)]
        current: PathBuf,

        /// Score points an exercise must move to count as a change
        #[arg(long, default_value = "0")]
        threshold: f64,

        /// Exit code 1 if any exercise slipped
        #[arg(long)]
        fail_on_slip: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate lesson TOML files
    Validate {
        /// Path to a lesson file or directory
        #[arg(long)]
        lesson: PathBuf,
    },

    /// List available grading models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and an example lesson
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "wordcoach=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            transcript,
            target,
            json,
            config,
        } => commands::score::execute(transcript, target, json, config),
        Commands::Grade {
            kind,
            answer,
            question,
            target_word,
            partial,
            model,
            config,
        } => {
            commands::grade::execute(
                kind,
                answer,
                commands::grade::PromptArgs {
                    question,
                    target_word,
                    partial,
                },
                model,
                config,
            )
            .await
        }
        Commands::Practice {
            lesson,
            attempts,
            model,
            parallelism,
            output,
            config,
        } => commands::practice::execute(lesson, attempts, model, parallelism, output, config).await,
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_slip,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_slip, format),
        Commands::Validate { lesson } => commands::validate::execute(lesson),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
