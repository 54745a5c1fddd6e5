//! `dlt note` command - Case notes

use clap::Subcommand;
use console::style;
use miette::{bail, Result};

use crate::cli::helpers::{parse_case_id, success, Session};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::audit;
use crate::core::vocabulary::NoteType;

#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Add a note to a case
    Add(AddArgs),

    /// List a case's notes, oldest first
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Case ID
    pub id: String,

    /// Note text
    pub text: String,

    /// Note type (update, issue, feedback, pause, resume)
    #[arg(long = "type", short = 't', default_value = "update")]
    pub note_type: NoteType,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Case ID
    pub id: String,

    /// Only notes of this type
    #[arg(long = "type", short = 't')]
    pub note_type: Option<NoteType>,

    /// Show only the most recent N notes
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

const NOTE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 30),
    ColumnDef::new("time", "TIME", 16),
    ColumnDef::new("author", "AUTHOR", 14),
    ColumnDef::new("type", "TYPE", 8),
    ColumnDef::new("note", "NOTE", 60),
];

pub fn run(cmd: NoteCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        NoteCommands::Add(args) => run_add(args, global),
        NoteCommands::List(args) => run_list(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    if args.text.trim().is_empty() {
        bail!("Note text cannot be empty");
    }
    let id = parse_case_id(&args.id)?;
    let mut session = Session::open()?;
    let author = session.config.author();

    let note = audit::add_note(&mut session.store, &id, &author, args.text.trim(), args.note_type)?;
    session.save()?;

    match global.output {
        OutputFormat::Id => println!("{}", note.id),
        OutputFormat::Json | OutputFormat::Yaml => {
            print_structured(&note, global.output)?;
        }
        _ => success(
            global.quiet,
            format!(
                "Added {} note to {} ({})",
                note.note_type,
                style(&id).cyan(),
                style(&note.id).dim()
            ),
        ),
    }
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_case_id(&args.id)?;
    let session = Session::open()?;
    let mut notes = audit::notes(&session.store, &id, args.note_type)?;

    if let Some(limit) = args.limit {
        let skip = notes.len().saturating_sub(limit);
        notes = notes.split_off(skip);
    }

    let format = effective_format(global.output, true);
    if print_structured(&notes, format)? {
        return Ok(());
    }
    if notes.is_empty() {
        if !global.quiet {
            println!("No notes on {}.", id);
        }
        return Ok(());
    }

    let rows: Vec<TableRow> = notes
        .iter()
        .map(|n| {
            TableRow::new(n.id.to_string())
                .cell("id", &n.id)
                .cell("time", n.timestamp.format("%Y-%m-%d %H:%M"))
                .cell("author", &n.author)
                .cell("type", n.note_type)
                .cell("note", &n.note)
        })
        .collect();
    TableFormatter::new(NOTE_COLUMNS, "notes").output(&rows, format, &[]);
    Ok(())
}
