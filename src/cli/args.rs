//! Command-line argument definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::attach::AttachCommands;
use crate::cli::commands::case::CaseCommands;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::dashboard::DashboardArgs;
use crate::cli::commands::dept::DeptArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::note::NoteCommands;
use crate::cli::commands::workflow::WorkflowCommands;

#[derive(Parser, Debug)]
#[command(name = "dlt")]
#[command(author, version, about = "Dental Lab Tracker - production case workflows from the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long = "format", short = 'f', global = true, default_value = "auto")]
    pub output: OutputFormat,

    /// Suppress informational messages
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pick per command: tsv for lists, a readable view for single items
    #[default]
    Auto,
    Yaml,
    Json,
    Tsv,
    Csv,
    /// Bare case IDs, one per line (for piping)
    Id,
    /// Markdown table or report
    Md,
    /// Boxed table
    Table,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a lab workspace in the current directory
    Init(InitArgs),

    /// Create, inspect and move cases through their workflow
    #[command(subcommand)]
    Case(CaseCommands),

    /// Case notes (audit trail)
    #[command(subcommand)]
    Note(NoteCommands),

    /// Attachment references on a case
    #[command(subcommand)]
    Attach(AttachCommands),

    /// Queue of cases currently at a department
    Dept(DeptArgs),

    /// Lab-wide counts and case rows
    Dashboard(DashboardArgs),

    /// Workflow templates
    #[command(subcommand)]
    Workflow(WorkflowCommands),

    /// Show the operator identity used for notes and permissions
    Whoami,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
