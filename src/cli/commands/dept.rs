//! `dlt dept` command - Department work queues

use console::style;
use miette::Result;

use crate::cli::commands::case::{case_to_row, CASE_COLUMNS};
use crate::cli::helpers::Session;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::vocabulary::Department;
use crate::entities::case::Case;

#[derive(clap::Args, Debug)]
pub struct DeptArgs {
    /// Department (reception, planning, model, cad, cam, ceramics, removable,
    /// orthodontics, finishing, qc, logistics, custom)
    pub department: Department,

    /// Include paused cases and cases out for try-in
    #[arg(long)]
    pub all: bool,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

pub fn run(args: DeptArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;

    let mut queue: Vec<&Case> = session
        .store
        .at_department(args.department)
        .into_iter()
        .filter(|c| args.all || (!c.is_paused && c.final_status.is_none()))
        .collect();

    // Most urgent first, then earliest due
    queue.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.due_date.cmp(&b.due_date)));

    if args.count {
        println!("{}", queue.len());
        return Ok(());
    }

    let format = effective_format(global.output, true);
    if print_structured(&queue, format)? {
        return Ok(());
    }

    if queue.is_empty() {
        if !global.quiet {
            println!(
                "{} queue is empty.",
                style(args.department.label()).bold()
            );
        }
        return Ok(());
    }

    let rows: Vec<TableRow> = queue.iter().map(|c| case_to_row(c)).collect();
    TableFormatter::new(CASE_COLUMNS, "cases").output(
        &rows,
        format,
        &["id", "priority", "doctor", "product", "stage", "due", "state"],
    );
    Ok(())
}
