use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use study_core::model::{Depth, Difficulty};

/// Top-level CLI parser for the `study-mate` binary.
#[derive(Debug, Parser)]
#[command(
    name = "study-mate",
    version,
    about = "Study assistant: quizzes, plans, summaries and chat"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose mode (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate multiple-choice questions from a text file
    Quiz(QuizArgs),
    /// Build a dated study plan from a text file
    Plan(PlanArgs),
    /// Summarize a transcript or document
    Summarize(SummarizeArgs),
    /// Explain a topic
    Explain(ExplainArgs),
    /// Chat with the study companion on stdin
    Chat(ChatArgs),
}

#[derive(Debug, Args)]
pub struct QuizArgs {
    /// UTF-8 text file; pages are separated by form feeds
    pub file: PathBuf,
    /// Number of questions (1-10)
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,
    #[arg(short, long, value_enum, default_value_t = DifficultyArg::Medium)]
    pub difficulty: DifficultyArg,
    /// Answer the questions interactively and get a score
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(Debug, Args)]
pub struct PlanArgs {
    pub file: PathBuf,
    /// First study day (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,
    /// Last study day (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,
    #[arg(long, value_enum, default_value_t = ViewArg::Daily)]
    pub view: ViewArg,
    /// Study days per week for the weekly view (1-7)
    #[arg(long, default_value_t = 3)]
    pub per_week: u8,
    /// Minutes per session (5-1440)
    #[arg(long, default_value_t = 60)]
    pub minutes: u32,
    #[arg(long, value_enum, default_value_t = DepthArg::Standard)]
    pub depth: DepthArg,
    /// Write the plan as CSV (defaults to study_plan_YYYYMMDD_HHMM.csv)
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Also write the plan as a JSON document
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    pub file: PathBuf,
    /// Summary length in sentences (1-10)
    #[arg(short, long, default_value_t = 3)]
    pub sentences: usize,
    /// Print the source split into sentences before the summary
    #[arg(long)]
    pub show_text: bool,
}

#[derive(Debug, Args)]
pub struct ExplainArgs {
    pub topic: String,
    #[arg(long, value_enum, default_value_t = DepthArg::Standard)]
    pub depth: DepthArg,
    #[arg(long)]
    pub no_outline: bool,
    #[arg(long)]
    pub no_examples: bool,
    /// Suggest references or search queries
    #[arg(long)]
    pub references: bool,
    #[arg(long)]
    pub no_next_steps: bool,
    /// Follow up with a summary of at most 150 characters
    #[arg(long)]
    pub quick_summary: bool,
    /// Follow up with a checklist of at most five steps
    #[arg(long)]
    pub checklist: bool,
}

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Start in a conversation mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DepthArg {
    Brief,
    Standard,
    Detailed,
}

impl From<DepthArg> for Depth {
    fn from(value: DepthArg) -> Self {
        match value {
            DepthArg::Brief => Depth::Brief,
            DepthArg::Standard => Depth::Standard,
            DepthArg::Detailed => Depth::Detailed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Research,
    Debate,
}
