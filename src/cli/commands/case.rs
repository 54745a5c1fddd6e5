//! `dlt case` command - Case intake and workflow transitions

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{Subcommand, ValueEnum};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use miette::{bail, miette, IntoDiagnostic, Result};

use crate::cli::filters::{PriorityFilter, StateFilter};
use crate::cli::helpers::{case_ids_from_args_or_stdin, confirm, parse_case_id, success, Session};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::classification::ClassificationOptions;
use crate::core::lifecycle::LifecycleController;
use crate::core::vocabulary::{
    Category, Department, FinalStatus, FixedMaterial, FixedSupport, ImplantType, NightGuardSize,
    OrthodonticsType, PauseReason, Priority, RemovableSubType, StageStatus,
};
use crate::entities::case::{Case, CaseInput, CaseState};
use crate::schema::registry::{SchemaKind, SchemaRegistry};
use crate::schema::template::TemplateGenerator;
use crate::schema::validator::Validator;

/// Progress below which finalizing asks for confirmation
const FINALIZE_WARN_PERCENT: u8 = 90;

#[derive(Subcommand, Debug)]
pub enum CaseCommands {
    /// Create a new case and generate its workflow
    New(NewArgs),

    /// List cases with filtering
    List(ListArgs),

    /// Show a case's details and workflow
    Show(ShowArgs),

    /// Render a Markdown report for a case
    Report(ReportArgs),

    /// Complete the current stage and move to the next
    Advance(AdvanceArgs),

    /// Skip a stage (admin only)
    Skip(SkipArgs),

    /// Pause a case for a clinical visit
    Pause(PauseArgs),

    /// Resume a paused case
    Resume(ResumeArgs),

    /// Record the final status (try-in or delivery)
    Finalize(FinalizeArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct NewArgs {
    /// Read the intake from a YAML file (validated against the intake schema)
    #[arg(long, conflicts_with_all = ["category", "doctor", "patient", "due", "interactive"])]
    pub from: Option<PathBuf>,

    /// Case category (fixed, removable, orthodontics)
    #[arg(long, short = 'c')]
    pub category: Option<Category>,

    /// Fixed restoration material
    #[arg(long)]
    pub material: Option<FixedMaterial>,

    /// Fixed support (tooth_supported, implant)
    #[arg(long)]
    pub support: Option<FixedSupport>,

    /// Implant connection type
    #[arg(long)]
    pub implant_type: Option<ImplantType>,

    /// Removable sub-type
    #[arg(long)]
    pub sub_type: Option<RemovableSubType>,

    /// Night guard thickness
    #[arg(long)]
    pub night_guard_size: Option<NightGuardSize>,

    /// Number of teeth for an add-tooth case
    #[arg(long)]
    pub tooth_count: Option<u8>,

    /// Orthodontic appliance
    #[arg(long)]
    pub appliance: Option<OrthodonticsType>,

    /// Custom product step (repeatable); replaces the generated workflow
    #[arg(long = "step")]
    pub steps: Vec<String>,

    /// Priority
    #[arg(long, short = 'p', default_value = "normal")]
    pub priority: Priority,

    /// Referring doctor
    #[arg(long, short = 'd')]
    pub doctor: Option<String>,

    /// Patient name
    #[arg(long)]
    pub patient: Option<String>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<NaiveDate>,

    /// Tooth numbers (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub teeth: Vec<String>,

    /// Shade (e.g. A2)
    #[arg(long)]
    pub shade: Option<String>,

    /// Special instructions
    #[arg(long)]
    pub instructions: Option<String>,

    /// Prompt for missing fields
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Doctor,
    Patient,
    Product,
    Stage,
    Department,
    Priority,
    Due,
    Progress,
    State,
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListColumn::Id => write!(f, "id"),
            ListColumn::Doctor => write!(f, "doctor"),
            ListColumn::Patient => write!(f, "patient"),
            ListColumn::Product => write!(f, "product"),
            ListColumn::Stage => write!(f, "stage"),
            ListColumn::Department => write!(f, "department"),
            ListColumn::Priority => write!(f, "priority"),
            ListColumn::Due => write!(f, "due"),
            ListColumn::Progress => write!(f, "progress"),
            ListColumn::State => write!(f, "state"),
        }
    }
}

/// Column definitions for case list output
pub const CASE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 12),
    ColumnDef::new("doctor", "DOCTOR", 18),
    ColumnDef::new("patient", "PATIENT", 18),
    ColumnDef::new("product", "PRODUCT", 28),
    ColumnDef::new("stage", "STAGE", 22),
    ColumnDef::new("department", "DEPARTMENT", 14),
    ColumnDef::new("priority", "PRIORITY", 9),
    ColumnDef::new("due", "DUE", 10),
    ColumnDef::new("progress", "PROGRESS", 8),
    ColumnDef::new("state", "STATE", 19),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by lifecycle state
    #[arg(long, short = 's', default_value = "open")]
    pub state: StateFilter,

    /// Filter by priority
    #[arg(long, short = 'p', default_value = "all")]
    pub priority: PriorityFilter,

    /// Only cases currently at this department
    #[arg(long)]
    pub department: Option<Department>,

    /// Filter by category
    #[arg(long, short = 'c')]
    pub category: Option<Category>,

    /// Search doctor, patient and ID (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Only cases past their due date
    #[arg(long)]
    pub overdue: bool,

    /// Columns to display
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Id,
        ListColumn::Doctor,
        ListColumn::Product,
        ListColumn::Stage,
        ListColumn::Due,
        ListColumn::Progress,
        ListColumn::State,
    ])]
    pub columns: Vec<ListColumn>,

    /// Sort by field
    #[arg(long, default_value = "id")]
    pub sort: ListColumn,

    /// Reverse sort order
    #[arg(long, short = 'r')]
    pub reverse: bool,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Case ID (e.g. DL-2026-0001)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Case ID
    pub id: String,

    /// Write the report to a file instead of stdout
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct AdvanceArgs {
    /// Case IDs (reads from stdin when omitted and piped)
    pub ids: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct SkipArgs {
    /// Case ID
    pub id: String,

    /// Stage number as shown by `dlt case show` (1-based)
    #[arg(long)]
    pub stage: usize,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct PauseArgs {
    /// Case ID
    pub id: String,

    /// Why the case is leaving the lab
    #[arg(long)]
    pub reason: PauseReason,
}

#[derive(clap::Args, Debug)]
pub struct ResumeArgs {
    /// Case ID
    pub id: String,

    /// Outcome of the clinical visit
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct FinalizeArgs {
    /// Case ID
    pub id: String,

    /// Final status (try_in, delivery)
    #[arg(long)]
    pub status: FinalStatus,

    /// Do not ask for confirmation on incomplete cases
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Run a case subcommand
pub fn run(cmd: CaseCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CaseCommands::New(args) => run_new(args, global),
        CaseCommands::List(args) => run_list(args, global),
        CaseCommands::Show(args) => run_show(args, global),
        CaseCommands::Report(args) => run_report(args, global),
        CaseCommands::Advance(args) => run_advance(args, global),
        CaseCommands::Skip(args) => run_skip(args, global),
        CaseCommands::Pause(args) => run_pause(args, global),
        CaseCommands::Resume(args) => run_resume(args, global),
        CaseCommands::Finalize(args) => run_finalize(args, global),
    }
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open()?;

    let input = match args.from.clone() {
        Some(path) => input_from_file(&path)?,
        None if args.interactive => prompt_input(args)?,
        None => input_from_args(args),
    };

    let case = session.store.create(input)?;
    session.save()?;

    match global.output {
        OutputFormat::Id => println!("{}", case.id),
        OutputFormat::Json | OutputFormat::Yaml => {
            print_structured(&case, global.output)?;
        }
        _ => {
            success(
                global.quiet,
                format!(
                    "Created case {} ({}, {} stages)",
                    style(&case.id).cyan(),
                    case.classification.label(),
                    case.workflow.len()
                ),
            );
            if !global.quiet {
                print_workflow(&case);
            }
        }
    }
    Ok(())
}

/// Build a case input from command-line flags
pub fn input_from_args(args: NewArgs) -> CaseInput {
    CaseInput {
        category: args.category,
        options: ClassificationOptions {
            fixed_material: args.material,
            fixed_support: args.support,
            implant_type: args.implant_type,
            removable_sub_type: args.sub_type,
            night_guard_size: args.night_guard_size,
            tooth_count: args.tooth_count,
            orthodontics_type: args.appliance,
        },
        is_custom_product: !args.steps.is_empty(),
        custom_steps: args.steps,
        priority: args.priority,
        doctor_name: args.doctor.unwrap_or_default(),
        patient_name: args.patient.unwrap_or_default(),
        due_date: args.due,
        tooth_numbers: args.teeth,
        shade: args.shade,
        special_instructions: args.instructions,
    }
}

/// Load and validate an intake YAML file
fn input_from_file(path: &Path) -> Result<CaseInput> {
    let content = fs::read_to_string(path).into_diagnostic()?;
    let registry = SchemaRegistry::new();
    let validator = Validator::new(&registry);
    let mut value =
        validator.validate_yaml(&content, &path.display().to_string(), SchemaKind::CaseIntake)?;

    // Tooth numbers may be written as bare integers
    if let Some(serde_json::Value::Array(teeth)) = value.get_mut("tooth_numbers") {
        for tooth in teeth.iter_mut() {
            if let serde_json::Value::Number(n) = tooth {
                *tooth = serde_json::Value::String(n.to_string());
            }
        }
    }

    serde_json::from_value(value).map_err(|e| miette!("Invalid intake {}: {}", path.display(), e))
}

fn prompt_input(args: NewArgs) -> Result<CaseInput> {
    let theme = ColorfulTheme::default();
    let mut input = input_from_args(args);

    if input.category.is_none() {
        let labels: Vec<&str> = Category::all().iter().map(|c| c.label()).collect();
        let idx = Select::with_theme(&theme)
            .with_prompt("Category")
            .items(&labels)
            .default(0)
            .interact()
            .into_diagnostic()?;
        input.category = Some(Category::all()[idx]);
    }

    match input.category {
        Some(Category::Fixed) if input.options.fixed_material.is_none() => {
            let labels: Vec<&str> = FixedMaterial::all().iter().map(|m| m.label()).collect();
            let idx = Select::with_theme(&theme)
                .with_prompt("Material")
                .items(&labels)
                .default(0)
                .interact()
                .into_diagnostic()?;
            input.options.fixed_material = Some(FixedMaterial::all()[idx]);
        }
        Some(Category::Removable) if input.options.removable_sub_type.is_none() => {
            let labels: Vec<&str> = RemovableSubType::all().iter().map(|m| m.label()).collect();
            let idx = Select::with_theme(&theme)
                .with_prompt("Sub-type")
                .items(&labels)
                .default(0)
                .interact()
                .into_diagnostic()?;
            input.options.removable_sub_type = Some(RemovableSubType::all()[idx]);
        }
        Some(Category::Orthodontics) if input.options.orthodontics_type.is_none() => {
            let labels: Vec<&str> = OrthodonticsType::all().iter().map(|m| m.label()).collect();
            let idx = Select::with_theme(&theme)
                .with_prompt("Appliance")
                .items(&labels)
                .default(0)
                .interact()
                .into_diagnostic()?;
            input.options.orthodontics_type = Some(OrthodonticsType::all()[idx]);
        }
        _ => {}
    }

    if input.doctor_name.trim().is_empty() {
        input.doctor_name = Input::with_theme(&theme)
            .with_prompt("Doctor")
            .interact_text()
            .into_diagnostic()?;
    }
    if input.patient_name.trim().is_empty() {
        input.patient_name = Input::with_theme(&theme)
            .with_prompt("Patient")
            .interact_text()
            .into_diagnostic()?;
    }
    if input.due_date.is_none() {
        let raw: String = Input::with_theme(&theme)
            .with_prompt("Due date (YYYY-MM-DD)")
            .validate_with(|s: &String| -> std::result::Result<(), String> {
                s.trim()
                    .parse::<NaiveDate>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .into_diagnostic()?;
        input.due_date = raw.trim().parse().ok();
    }

    Ok(input)
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let today = Local::now().date_naive();
    let search = args.search.as_ref().map(|s| s.to_lowercase());

    let mut cases: Vec<&Case> = session
        .store
        .list()
        .filter(|c| args.state.matches(c))
        .filter(|c| args.priority.matches(&c.priority))
        .filter(|c| args.category.map_or(true, |cat| c.category == cat))
        .filter(|c| {
            args.department
                .map_or(true, |d| c.current_department() == Some(d))
        })
        .filter(|c| !args.overdue || (c.days_until_due(today) < 0 && !c.is_complete()))
        .filter(|c| {
            search.as_ref().map_or(true, |q| {
                c.doctor_name.to_lowercase().contains(q)
                    || c.patient_name.to_lowercase().contains(q)
                    || c.id.to_string().to_lowercase().contains(q)
            })
        })
        .collect();

    match args.sort {
        ListColumn::Id => cases.sort_by(|a, b| a.id.cmp(&b.id)),
        ListColumn::Doctor => cases.sort_by(|a, b| a.doctor_name.cmp(&b.doctor_name)),
        ListColumn::Patient => cases.sort_by(|a, b| a.patient_name.cmp(&b.patient_name)),
        ListColumn::Product => {
            cases.sort_by_key(|c| c.classification.label());
        }
        ListColumn::Stage => cases.sort_by_key(|c| c.current_stage_index),
        ListColumn::Department => {
            cases.sort_by_key(|c| c.current_department().map(|d| d.to_string()))
        }
        // Most urgent first
        ListColumn::Priority => cases.sort_by(|a, b| b.priority.cmp(&a.priority)),
        ListColumn::Due => cases.sort_by_key(|c| c.due_date),
        ListColumn::Progress => cases.sort_by_key(|c| c.progress_percent()),
        ListColumn::State => cases.sort_by_key(|c| c.state().to_string()),
    }

    if args.reverse {
        cases.reverse();
    }

    if let Some(limit) = args.limit {
        cases.truncate(limit);
    }

    if args.count {
        println!("{}", cases.len());
        return Ok(());
    }

    let format = effective_format(global.output, true);
    if print_structured(&cases, format)? {
        return Ok(());
    }

    if cases.is_empty() {
        if !global.quiet && format != OutputFormat::Id {
            println!("No cases found.");
        }
        return Ok(());
    }

    let visible: Vec<String> = args.columns.iter().map(|c| c.to_string()).collect();
    let visible: Vec<&str> = visible.iter().map(|s| s.as_str()).collect();
    let rows: Vec<TableRow> = cases.iter().map(|c| case_to_row(c)).collect();
    TableFormatter::new(CASE_COLUMNS, "cases").output(&rows, format, &visible);
    Ok(())
}

/// Convert a case to a list row
pub fn case_to_row(case: &Case) -> TableRow {
    let stage = case
        .current_stage()
        .map(|s| s.stage.clone())
        .unwrap_or_else(|| "Finished".to_string());
    TableRow::new(case.id.to_string())
        .cell("id", &case.id)
        .cell("doctor", &case.doctor_name)
        .cell("patient", &case.patient_name)
        .cell("product", case.classification.label())
        .cell("stage", stage)
        .cell(
            "department",
            case.current_department()
                .map(|d| d.label())
                .unwrap_or("-"),
        )
        .cell("priority", case.priority)
        .cell("due", case.due_date)
        .cell("progress", format!("{}%", case.progress_percent()))
        .cell("state", case.state())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let id = parse_case_id(&args.id)?;
    let case = session.store.require(&id)?;

    match global.output {
        OutputFormat::Json | OutputFormat::Yaml => {
            print_structured(case, global.output)?;
        }
        OutputFormat::Id => println!("{}", case.id),
        OutputFormat::Md => {
            let generator = TemplateGenerator::new().into_diagnostic()?;
            print!("{}", generator.case_report(case).into_diagnostic()?);
        }
        _ => print_case(case),
    }
    Ok(())
}

fn print_case(case: &Case) {
    let today = Local::now().date_naive();
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}   {}",
        style("Case").bold(),
        style(&case.id).cyan(),
        state_badge(case.state())
    );
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Doctor").bold(), case.doctor_name);
    println!("{}: {}", style("Patient").bold(), case.patient_name);
    println!(
        "{}: {} · {}",
        style("Product").bold(),
        case.category.label(),
        case.classification.label()
    );
    println!("{}: {}", style("Priority").bold(), priority_badge(case));
    let days = case.days_until_due(today);
    let due_note = match days {
        d if d < 0 => style(format!("{} days overdue", -d)).red().to_string(),
        0 => style("due today").yellow().to_string(),
        d => format!("in {} days", d),
    };
    println!("{}: {} ({})", style("Due").bold(), case.due_date, due_note);
    if !case.tooth_numbers.is_empty() {
        println!("{}: {}", style("Teeth").bold(), case.tooth_numbers.join(", "));
    }
    if let Some(shade) = &case.shade {
        println!("{}: {}", style("Shade").bold(), shade);
    }
    if let Some(instructions) = &case.special_instructions {
        println!("{}: {}", style("Instructions").bold(), instructions);
    }
    println!(
        "{}: {}% ({}/{} stages)",
        style("Progress").bold(),
        case.progress_percent(),
        case.completed_count(),
        case.workflow.len()
    );
    if let Some(pause) = case.open_pause() {
        println!(
            "{}: {} since {}",
            style("Paused").yellow().bold(),
            pause.reason.label(),
            pause.paused_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    print_workflow(case);

    if !case.notes.is_empty() {
        println!();
        println!("{} ({})", style("Notes").bold(), case.notes.len());
        for note in case.notes.iter().rev().take(5) {
            println!(
                "  {} {} [{}] {}",
                style(note.timestamp.format("%Y-%m-%d %H:%M")).dim(),
                style(&note.author).cyan(),
                note.note_type,
                note.note
            );
        }
    }

    if !case.attachments.is_empty() {
        println!();
        println!("{} ({})", style("Attachments").bold(), case.attachments.len());
        for att in &case.attachments {
            println!("  {} {} ({})", style(&att.id).dim(), att.name, att.kind);
        }
    }
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Revision").dim(), case.revision);
}

/// Print the numbered stage list with status markers
pub fn print_workflow(case: &Case) {
    for (i, stage) in case.workflow.iter().enumerate() {
        let marker = match stage.status {
            StageStatus::Completed => style("✓").green(),
            StageStatus::InProgress => style("▶").yellow(),
            StageStatus::Skipped => style("↷").dim(),
            StageStatus::Pending => style("·").dim(),
        };
        let name = if i == case.current_stage_index {
            style(stage.stage.clone()).bold()
        } else {
            style(stage.stage.clone())
        };
        println!(
            "  {} {:>2}. {:<26} {}",
            marker,
            i + 1,
            name,
            style(stage.department.label()).dim()
        );
    }
}

fn state_badge(state: CaseState) -> String {
    match state {
        CaseState::Active => style("ACTIVE").green().to_string(),
        CaseState::Paused => style("PAUSED").yellow().to_string(),
        CaseState::Finalized(FinalStatus::TryIn) => style("TRY-IN").magenta().to_string(),
        CaseState::Finalized(FinalStatus::Delivery) => style("DELIVERED").blue().to_string(),
    }
}

fn priority_badge(case: &Case) -> String {
    match case.priority {
        Priority::Normal => case.priority.label().to_string(),
        Priority::Rush => style(case.priority.label()).yellow().to_string(),
        Priority::Emergency => style(case.priority.label()).red().bold().to_string(),
    }
}

fn run_report(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open()?;
    let id = parse_case_id(&args.id)?;
    let case = session.store.require(&id)?;

    let generator = TemplateGenerator::new().into_diagnostic()?;
    let report = generator.case_report(case).into_diagnostic()?;

    match args.out {
        Some(path) => {
            fs::write(&path, report).into_diagnostic()?;
            success(
                global.quiet,
                format!("Wrote report for {} to {}", id, path.display()),
            );
        }
        None => print!("{}", report),
    }
    Ok(())
}

fn run_advance(args: AdvanceArgs, global: &GlobalOpts) -> Result<()> {
    let ids = case_ids_from_args_or_stdin(&args.ids)?;
    let mut session = Session::open()?;
    let operator = session.config.operator();
    let lifecycle = session.config.lifecycle();

    let mut advanced = Vec::new();
    {
        let mut ctl = LifecycleController::new(&mut session.store, lifecycle, operator);
        for id in &ids {
            advanced.push(ctl.advance_stage(id)?);
        }
    }
    session.save()?;

    for case in &advanced {
        report_transition(global, case, "Advanced");
    }
    Ok(())
}

fn run_skip(args: SkipArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_case_id(&args.id)?;
    if args.stage == 0 {
        bail!("Stage numbers start at 1");
    }
    let index = args.stage - 1;

    let mut session = Session::open()?;
    let stage_name = {
        let case = session.store.require(&id)?;
        case.workflow
            .get(index)
            .map(|s| s.stage.clone())
            .unwrap_or_default()
    };
    if !stage_name.is_empty()
        && !confirm(
            &format!("Skip stage {} ({}) on {}?", args.stage, stage_name, id),
            args.yes,
        )?
    {
        println!("Cancelled.");
        return Ok(());
    }

    let operator = session.config.operator();
    let lifecycle = session.config.lifecycle();
    let case = LifecycleController::new(&mut session.store, lifecycle, operator)
        .skip_stage(&id, index)?;
    session.save()?;

    report_transition(global, &case, "Skipped a stage on");
    Ok(())
}

fn run_pause(args: PauseArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_case_id(&args.id)?;
    let mut session = Session::open()?;
    let operator = session.config.operator();
    let lifecycle = session.config.lifecycle();
    let case = LifecycleController::new(&mut session.store, lifecycle, operator)
        .pause_case(&id, args.reason)?;
    session.save()?;

    report_transition(global, &case, "Paused");
    Ok(())
}

fn run_resume(args: ResumeArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_case_id(&args.id)?;
    let mut session = Session::open()?;
    let operator = session.config.operator();
    let lifecycle = session.config.lifecycle();
    let case = LifecycleController::new(&mut session.store, lifecycle, operator)
        .resume_case(&id, args.notes.as_deref())?;
    session.save()?;

    report_transition(global, &case, "Resumed");
    Ok(())
}

fn run_finalize(args: FinalizeArgs, global: &GlobalOpts) -> Result<()> {
    let id = parse_case_id(&args.id)?;
    let mut session = Session::open()?;

    let progress = session.store.require(&id)?.progress_percent();
    if progress < FINALIZE_WARN_PERCENT {
        eprintln!(
            "{} {} is only {}% complete",
            style("!").yellow(),
            id,
            progress
        );
        if !confirm(&format!("Set {} to {}?", id, args.status.label()), args.yes)? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let operator = session.config.operator();
    let lifecycle = session.config.lifecycle();
    let case = LifecycleController::new(&mut session.store, lifecycle, operator)
        .set_final_status(&id, args.status)?;
    session.save()?;

    report_transition(global, &case, "Finalized");
    Ok(())
}

/// Shared success output for transition commands
fn report_transition(global: &GlobalOpts, case: &Case, verb: &str) {
    match global.output {
        OutputFormat::Id => println!("{}", case.id),
        OutputFormat::Json | OutputFormat::Yaml => {
            if let Err(e) = print_structured(case, global.output) {
                tracing::warn!(error = %e, "failed to print case");
            }
        }
        _ => {
            let position = match case.current_stage() {
                Some(stage) => format!("now at {} ({})", stage.stage, stage.department.label()),
                None => "workflow finished".to_string(),
            };
            success(
                global.quiet,
                format!(
                    "{} {} · {} · {}% · {}",
                    verb,
                    style(&case.id).cyan(),
                    position,
                    case.progress_percent(),
                    case.state()
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_from_args_marks_custom_products() {
        let args = NewArgs {
            category: Some(Category::Fixed),
            steps: vec!["Scan".to_string()],
            doctor: Some("Dr. Lee".to_string()),
            ..Default::default()
        };
        let input = input_from_args(args);
        assert!(input.is_custom_product);
        assert_eq!(input.custom_steps, vec!["Scan".to_string()]);
        assert_eq!(input.doctor_name, "Dr. Lee");
        assert!(input.due_date.is_none());
    }

    #[test]
    fn test_list_column_names_match_column_defs() {
        for col in ListColumn::value_variants() {
            let key = col.to_string();
            assert!(CASE_COLUMNS.iter().any(|c| c.key == key), "missing {}", key);
        }
    }
}
