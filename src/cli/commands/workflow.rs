//! `dlt workflow` command - Inspect generated workflows

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::case::{input_from_args, NewArgs};
use crate::cli::output::print_structured;
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::classification::Classification;
use crate::core::routing;
use crate::core::vocabulary::Department;

#[derive(Subcommand, Debug)]
pub enum WorkflowCommands {
    /// Show the stages a classification would produce, without creating a case
    Preview(Box<NewArgs>),

    /// List departments in pipeline order
    Departments,
}

const STAGE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("n", "#", 3),
    ColumnDef::new("stage", "STAGE", 28),
    ColumnDef::new("department", "DEPARTMENT", 16),
];

pub fn run(cmd: WorkflowCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        WorkflowCommands::Preview(args) => run_preview(*args, global),
        WorkflowCommands::Departments => run_departments(global),
    }
}

fn run_preview(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let input = input_from_args(args);
    let classification = Classification::resolve(
        input.category,
        &input.options,
        input.is_custom_product,
        &input.custom_steps,
    )?;
    let templates = routing::generate(&classification)?;

    if print_structured(&templates, global.output)? {
        return Ok(());
    }

    if global.output == OutputFormat::Auto && !global.quiet {
        println!(
            "{} ({} stages)",
            style(classification.label()).bold(),
            templates.len()
        );
    }

    let rows: Vec<TableRow> = templates
        .iter()
        .enumerate()
        .map(|(i, t)| {
            TableRow::new(t.name.clone())
                .cell("n", i + 1)
                .cell("stage", &t.name)
                .cell("department", t.department.label())
        })
        .collect();
    let format = match global.output {
        OutputFormat::Auto => OutputFormat::Tsv,
        other => other,
    };
    TableFormatter::new(STAGE_COLUMNS, "stages").output(&rows, format, &[]);
    Ok(())
}

fn run_departments(global: &GlobalOpts) -> Result<()> {
    if print_structured(Department::all(), global.output)? {
        return Ok(());
    }
    for dept in Department::all() {
        println!("{:<14} {}", dept.to_string(), style(dept.label()).dim());
    }
    Ok(())
}
