//! `dlt attach` command - Attachment references

use std::path::Path;

use clap::Subcommand;
use console::style;
use miette::{bail, Result};

use crate::cli::helpers::{confirm, parse_case_id, success, Session};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::attachments;
use crate::core::vocabulary::AttachmentKind;
use crate::entities::case::Attachment;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

#[derive(Subcommand, Debug)]
pub enum AttachCommands {
    /// Record an attachment reference on a case
    Add(AddArgs),

    /// Remove an attachment reference
    Remove(RemoveArgs),

    /// List a case's attachments
    List(ListArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Case ID
    pub id: String,

    /// Location of the file (URL or path)
    pub url: String,

    /// Display name (defaults to the last path segment)
    #[arg(long)]
    pub name: Option<String>,

    /// Attachment kind (image, file); guessed from the extension when omitted
    #[arg(long)]
    pub kind: Option<AttachmentKind>,
}

#[derive(clap::Args, Debug)]
pub struct RemoveArgs {
    /// Case ID
    pub id: String,

    /// Attachment ID (ATT-...)
    pub attachment: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Case ID
    pub id: String,
}

const ATTACHMENT_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 30),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("kind", "KIND", 6),
    ColumnDef::new("by", "BY", 12),
    ColumnDef::new("url", "URL", 48),
];

pub fn run(cmd: AttachCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        AttachCommands::Add(args) => run_add(args, global),
        AttachCommands::Remove(args) => run_remove(args, global),
        AttachCommands::List(args) => run_list(args, global),
    }
}

/// Guess the attachment kind from a URL or path
pub fn guess_kind(url: &str) -> AttachmentKind {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext {
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => AttachmentKind::Image,
        _ => AttachmentKind::File,
    }
}

fn default_name(url: &str) -> String {
    url.trim_end_matches('/')
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(url)
        .to_string()
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    if args.url.trim().is_empty() {
        bail!("Attachment URL cannot be empty");
    }
    let id = parse_case_id(&args.id)?;
    let mut session = Session::open()?;
    let author = session.config.author();

    let name = args.name.unwrap_or_else(|| default_name(&args.url));
    let kind = args.kind.unwrap_or_else(|| guess_kind(&args.url));
    let attachment = Attachment::new(&name, &args.url, kind, &author);
    let attachment = attachments::add_attachment(&mut session.store, &id, attachment)?;
    session.save()?;

    match global.output {
        OutputFormat::Id => println!("{}", attachment.id),
        OutputFormat::Json | OutputFormat::Yaml => {
            print_structured(&attachment, global.output)?;
        }
        _ => success(
            global.quiet,
            format!(
                "Attached {} to {} ({})",
                attachment.name,
                style(&id).cyan(),
                style(&attachment.id).dim()
            ),
        ),
    }
    Ok(())
}

fn run_remove(args: RemoveArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_case_id(&args.id)?;
    let mut session = Session::open()?;

    if !confirm(
        &format!("Remove attachment {} from {}?", args.attachment, id),
        args.yes,
    )? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = attachments::remove_attachment(&mut session.store, &id, &args.attachment)?;
    session.save()?;

    success(
        global.quiet,
        format!("Removed {} from {}", removed.name, style(&id).cyan()),
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_case_id(&args.id)?;
    let session = Session::open()?;
    let case = session.store.require(&id)?;

    let format = effective_format(global.output, true);
    if print_structured(&case.attachments, format)? {
        return Ok(());
    }
    if case.attachments.is_empty() {
        if !global.quiet {
            println!("No attachments on {}.", id);
        }
        return Ok(());
    }

    let rows: Vec<TableRow> = case
        .attachments
        .iter()
        .map(|a| {
            TableRow::new(a.id.to_string())
                .cell("id", &a.id)
                .cell("name", &a.name)
                .cell("kind", a.kind)
                .cell("by", &a.uploaded_by)
                .cell("url", &a.url)
        })
        .collect();
    TableFormatter::new(ATTACHMENT_COLUMNS, "attachments").output(&rows, format, &[]);
    Ok(())
}
