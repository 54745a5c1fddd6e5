//! `dlt dashboard` command - Lab-wide summary

use std::path::PathBuf;

use chrono::Local;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::Session;
use crate::cli::output::print_structured;
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::dashboard::{rows_or_sample, DashboardSummary, FeedRow, FileFeed};

#[derive(clap::Args, Debug)]
pub struct DashboardArgs {
    /// Read case rows from a JSON feed instead of the local store
    #[arg(long)]
    pub feed: Option<PathBuf>,

    /// Limit number of rows
    #[arg(long, short = 'n', default_value = "20")]
    pub limit: usize,
}

const ROW_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 14),
    ColumnDef::new("doctor", "DOCTOR", 18),
    ColumnDef::new("type", "TYPE", 28),
    ColumnDef::new("status", "STATUS", 19),
    ColumnDef::new("progress", "PROGRESS", 8),
];

#[derive(Serialize)]
struct DashboardView<'a> {
    summary: &'a DashboardSummary,
    rows: &'a [FeedRow],
}

pub fn run(args: DashboardArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let today = Local::now().date_naive();
    let summary = DashboardSummary::from_store(&session.store, today);

    let mut rows: Vec<FeedRow> = match &args.feed {
        Some(path) => rows_or_sample(&FileFeed::new(path)),
        None => session.store.list().map(FeedRow::from).collect(),
    };
    rows.truncate(args.limit);

    if print_structured(
        &DashboardView {
            summary: &summary,
            rows: &rows,
        },
        global.output,
    )? {
        return Ok(());
    }

    if global.output == OutputFormat::Auto {
        print_summary(&summary);
        println!();
    }

    let table_rows: Vec<TableRow> = rows
        .iter()
        .map(|r| {
            TableRow::new(r.id.clone())
                .cell("id", &r.id)
                .cell("doctor", &r.doctor)
                .cell("type", &r.case_type)
                .cell("status", &r.status)
                .cell("progress", format!("{}%", r.progress))
        })
        .collect();
    let format = match global.output {
        OutputFormat::Auto => OutputFormat::Tsv,
        other => other,
    };
    TableFormatter::new(ROW_COLUMNS, "cases").output(&table_rows, format, &[]);
    Ok(())
}

fn print_summary(summary: &DashboardSummary) {
    println!("{}", style("Dental Lab Dashboard").bold().underlined());
    println!(
        "  {} total · {} active · {} paused · {} at try-in · {} delivered",
        style(summary.total).cyan(),
        style(summary.active).green(),
        style(summary.paused).yellow(),
        style(summary.in_try_in).magenta(),
        style(summary.delivered).blue()
    );
    println!(
        "  {} rush · {} emergency · {} overdue · {} due today",
        style(summary.rush).yellow(),
        style(summary.emergency).red(),
        style(summary.overdue).red().bold(),
        summary.due_today
    );
    if !summary.by_department.is_empty() {
        println!();
        println!("{}", style("By department").bold());
        for (dept, n) in &summary.by_department {
            println!("  {:<16} {}", dept.label(), n);
        }
    }
}
