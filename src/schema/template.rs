//! Report generation with embedded Tera templates

use rust_embed::Embed;
use serde::Serialize;
use tera::Tera;
use thiserror::Error;

use crate::entities::case::Case;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const CASE_REPORT: &str = "case_report.md.tera";
const TIMESTAMP: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template rendering error: {0}")]
    RenderError(String),
}

#[derive(Serialize)]
struct StageRow {
    name: String,
    department: String,
    status: String,
    completed_at: String,
    current: bool,
}

#[derive(Serialize)]
struct PauseRow {
    reason: String,
    paused_at: String,
    resumed_at: String,
    return_notes: String,
}

#[derive(Serialize)]
struct NoteRow {
    timestamp: String,
    author: String,
    note_type: String,
    note: String,
}

#[derive(Serialize)]
struct AttachmentRow {
    name: String,
    url: String,
    kind: String,
    uploaded_by: String,
}

/// Report generator using Tera
pub struct TemplateGenerator {
    tera: Tera,
}

impl TemplateGenerator {
    /// Create a new template generator with embedded templates
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| TemplateError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the Markdown report for a case
    pub fn case_report(&self, case: &Case) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|n| n == CASE_REPORT) {
            return Err(TemplateError::NotFound(CASE_REPORT.to_string()));
        }

        let context = report_context(case);
        self.tera
            .render(CASE_REPORT, &context)
            .map_err(|e| TemplateError::RenderError(e.to_string()))
    }
}

fn report_context(case: &Case) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("id", &case.id.to_string());
    context.insert("doctor_name", &case.doctor_name);
    context.insert("patient_name", &case.patient_name);
    context.insert("category", case.category.label());
    context.insert("product", &case.classification.label());
    context.insert("priority", case.priority.label());
    context.insert(
        "date_received",
        &case.date_received.format(TIMESTAMP).to_string(),
    );
    context.insert("due_date", &case.due_date.to_string());
    context.insert("state", &case.state().to_string());
    context.insert("progress", &case.progress_percent());
    context.insert("completed", &case.completed_count());
    context.insert("total", &case.workflow.len());
    context.insert("tooth_numbers", &case.tooth_numbers);
    context.insert("shade", &case.shade);
    context.insert("special_instructions", &case.special_instructions);

    let stages: Vec<StageRow> = case
        .workflow
        .iter()
        .enumerate()
        .map(|(i, s)| StageRow {
            name: s.stage.clone(),
            department: s.department.label().to_string(),
            status: s.status.to_string(),
            completed_at: s
                .completed_at
                .map(|t| t.format(TIMESTAMP).to_string())
                .unwrap_or_default(),
            current: i == case.current_stage_index,
        })
        .collect();
    context.insert("stages", &stages);

    let pauses: Vec<PauseRow> = case
        .pause_history
        .iter()
        .map(|p| PauseRow {
            reason: p.reason.label().to_string(),
            paused_at: p.paused_at.format(TIMESTAMP).to_string(),
            resumed_at: p
                .resumed_at
                .map(|t| t.format(TIMESTAMP).to_string())
                .unwrap_or_else(|| "open".to_string()),
            return_notes: p.return_notes.clone().unwrap_or_default(),
        })
        .collect();
    context.insert("pauses", &pauses);

    let notes: Vec<NoteRow> = case
        .notes
        .iter()
        .map(|n| NoteRow {
            timestamp: n.timestamp.format(TIMESTAMP).to_string(),
            author: n.author.clone(),
            note_type: n.note_type.to_string(),
            note: n.note.clone(),
        })
        .collect();
    context.insert("notes", &notes);

    let attachments: Vec<AttachmentRow> = case
        .attachments
        .iter()
        .map(|a| AttachmentRow {
            name: a.name.clone(),
            url: a.url.clone(),
            kind: a.kind.to_string(),
            uploaded_by: a.uploaded_by.clone(),
        })
        .collect();
    context.insert("attachments", &attachments);

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lifecycle::{LifecycleConfig, LifecycleController, Operator};
    use crate::core::store::CaseStore;
    use crate::core::vocabulary::{Category, FixedMaterial, PauseReason, Role};
    use crate::entities::case::CaseInput;
    use chrono::NaiveDate;

    #[test]
    fn test_case_report_renders_workflow_and_pauses() {
        let mut store = CaseStore::default();
        let mut input = CaseInput {
            category: Some(Category::Fixed),
            doctor_name: "Dr. Ortiz".to_string(),
            patient_name: "J. Doe".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 5, 1),
            shade: Some("A2".to_string()),
            ..Default::default()
        };
        input.options.fixed_material = Some(FixedMaterial::Pfm);
        let id = store.create(input).unwrap().id;

        {
            let mut ctl = LifecycleController::new(
                &mut store,
                LifecycleConfig::default(),
                Operator::new("Sam", Role::Tech),
            );
            ctl.advance_stage(&id).unwrap();
            ctl.pause_case(&id, PauseReason::BiteRegistration).unwrap();
        }

        let generator = TemplateGenerator::new().unwrap();
        let report = generator.case_report(store.require(&id).unwrap()).unwrap();

        assert!(report.contains("# Case DL-"));
        assert!(report.contains("Dr. Ortiz"));
        assert!(report.contains("| Shade | A2 |"));
        assert!(report.contains("Ceramic Build-Up"));
        assert!(report.contains("## Pause History"));
        assert!(report.contains("Bite registration"));
        assert!(report.contains("## Notes"));
        assert!(!report.contains("## Attachments"));
    }
}
