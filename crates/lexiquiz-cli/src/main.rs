//! lexiquiz CLI: practice English grammar, vocabulary and writing in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use lexiquiz_core::model::{
    Difficulty, PracticeMode, QuestionCount, VocabDirection, WritingLength,
};

mod commands;

#[derive(Parser)]
#[command(
    name = "lexiquiz",
    version,
    about = "English practice with AI-generated quizzes and feedback"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a grammar or vocabulary quiz
    Quiz {
        /// Practice mode: grammar or vocabulary
        #[arg(long, default_value = "grammar")]
        mode: PracticeMode,

        /// Grammar topic (grammar mode only)
        #[arg(long)]
        topic: Option<String>,

        /// Translation direction: pl-en (default) or en-pl (vocabulary mode only)
        #[arg(long)]
        direction: Option<VocabDirection>,

        /// beginner, intermediate or advanced
        #[arg(long, default_value = "intermediate")]
        difficulty: Difficulty,

        /// Number of questions: 5, 10 or 15
        #[arg(long, default_value = "5")]
        count: QuestionCount,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a short text on a generated topic and get it graded
    Write {
        /// beginner, intermediate or advanced
        #[arg(long, default_value = "intermediate")]
        difficulty: Difficulty,

        /// Target length: short, medium or long
        #[arg(long, default_value = "medium")]
        length: WritingLength,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Explain a grammar topic
    Explain {
        /// Topic name, e.g. "Present Perfect"
        topic: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Chat with the English tutor
    Tutor {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let filter = match "lexiquiz=info".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz {
            mode,
            topic,
            direction,
            difficulty,
            count,
            config,
        } => {
            commands::quiz::execute(
                commands::quiz::QuizOptions {
                    mode,
                    topic,
                    direction,
                    difficulty,
                    count,
                },
                config,
            )
            .await
        }
        Commands::Write {
            difficulty,
            length,
            config,
        } => commands::write::execute(difficulty, length, config).await,
        Commands::Explain { topic, config } => commands::explain::execute(topic, config).await,
        Commands::Tutor { config } => commands::tutor::execute(config).await,
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
