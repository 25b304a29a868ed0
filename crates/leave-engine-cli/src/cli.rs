use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Annual-leave planner for school closures.
#[derive(Parser)]
#[command(
    name = "leave-plan",
    version,
    about = "Plan parents' annual leave around school closures"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Build a leave plan from a household JSON file.
    Plan(PlanArgs),
    /// Check a household JSON file and report entries the planner would drop.
    Validate(ValidateArgs),
}

/// Output encodings for `plan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
    Ics,
}

/// Arguments for the `plan` subcommand.
#[derive(clap::Args)]
pub struct PlanArgs {
    /// Household input file (JSON), or `-` for stdin.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output encoding.
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Drop Saturday and Sunday closures regardless of the input file.
    #[arg(long)]
    pub skip_weekends: bool,

    /// Enable the seasonal joint-leave pass regardless of the input file.
    #[arg(long)]
    pub prioritize_seasons: bool,

    /// Replace the input file's joint-leave budget.
    #[arg(long)]
    pub joint_days: Option<i32>,

    /// Extra override, `DATE=DIRECTIVE` or `START..END=DIRECTIVE` (repeatable).
    /// Directives: A, B, both, C:<caregiver>, clear.
    #[arg(long = "override", value_name = "SPEC")]
    pub overrides: Vec<String>,

    /// RFC 3339 timestamp stamped on iCalendar events (defaults to now).
    #[arg(long)]
    pub generated_at: Option<String>,
}

/// Arguments for the `validate` subcommand.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Household input file (JSON), or `-` for stdin.
    #[arg(short, long)]
    pub input: PathBuf,
}
