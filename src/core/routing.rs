//! Workflow template generation
//!
//! Turns a [`Classification`] into the ordered list of production stages a case
//! will move through. Generation is a pure function: the same classification
//! always yields the same stage names, departments and length.

use serde::Serialize;

use crate::core::classification::{Classification, CustomSpec, FixedSpec, RemovableSpec};
use crate::core::error::CaseError;
use crate::core::vocabulary::{CeramicRoute, Department, FixedSupport, RemovableSubType};
use crate::entities::case::Stage;

/// One step of a workflow template, before it is bound to a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTemplate {
    pub name: String,
    pub department: Department,
}

impl StageTemplate {
    fn new(name: &str, department: Department) -> Self {
        Self {
            name: name.to_string(),
            department,
        }
    }
}

// Stage names shared across templates
const RECEPTION: &str = "Case Reception";
const PLANNING: &str = "Case Planning";
const MODEL_SCAN: &str = "Model / Scan";
const IMPLANT_VERIFICATION: &str = "Implant Verification";
const CAD_DESIGN: &str = "CAD Design";
const CAM_PRODUCTION: &str = "CAM Production";
const BUILD_UP: &str = "Ceramic Build-Up";
const FIRING: &str = "Firing";
const FINISHING: &str = "Finishing";
const QUALITY_CONTROL: &str = "Quality Control";
const LOGISTICS: &str = "Logistics";

/// Generate the stage template for a classification
pub fn generate(classification: &Classification) -> Result<Vec<StageTemplate>, CaseError> {
    let stages = match classification {
        Classification::Fixed(spec) => fixed_template(spec),
        Classification::Removable(spec) => removable_template(spec),
        Classification::Orthodontics(_) => orthodontics_template(),
        Classification::Custom(spec) => custom_template(spec),
    };

    if stages.is_empty() {
        return Err(CaseError::InvalidClassification(
            "workflow template is empty".to_string(),
        ));
    }

    Ok(stages)
}

/// Bind a template to a new case: first stage in progress, the rest pending
pub fn instantiate(templates: &[StageTemplate]) -> Vec<Stage> {
    templates
        .iter()
        .enumerate()
        .map(|(idx, template)| {
            let mut stage = Stage::new(idx, &template.name, template.department);
            if idx == 0 {
                stage.status = crate::core::vocabulary::StageStatus::InProgress;
            }
            stage
        })
        .collect()
}

fn fixed_template(spec: &FixedSpec) -> Vec<StageTemplate> {
    let mut stages = vec![
        StageTemplate::new(RECEPTION, Department::Reception),
        StageTemplate::new(PLANNING, Department::Planning),
        StageTemplate::new(MODEL_SCAN, Department::Model),
    ];

    if spec.support == FixedSupport::Implant {
        stages.push(StageTemplate::new(IMPLANT_VERIFICATION, Department::Planning));
    }

    stages.push(StageTemplate::new(CAD_DESIGN, Department::Cad));
    stages.push(StageTemplate::new(CAM_PRODUCTION, Department::Cam));

    match spec.material.ceramic_route() {
        CeramicRoute::BuildUpAndFiring => {
            stages.push(StageTemplate::new(BUILD_UP, Department::Ceramics));
            stages.push(StageTemplate::new(FIRING, Department::Ceramics));
        }
        CeramicRoute::FiringOnly => {
            stages.push(StageTemplate::new(FIRING, Department::Ceramics));
        }
        CeramicRoute::None => {}
    }

    stages.extend(closing_stages());
    stages
}

fn removable_template(spec: &RemovableSpec) -> Vec<StageTemplate> {
    let mut stages = vec![StageTemplate::new(RECEPTION, Department::Reception)];

    match spec.sub_type {
        RemovableSubType::FullDenture => {
            stages.push(StageTemplate::new(PLANNING, Department::Planning));
            stages.push(StageTemplate::new(MODEL_SCAN, Department::Model));
            stages.push(StageTemplate::new("Special Tray", Department::Removable));
            stages.push(StageTemplate::new("Wax Rim", Department::Removable));
            stages.push(StageTemplate::new("Teeth Setup", Department::Removable));
            stages.push(StageTemplate::new("Processing", Department::Removable));
        }
        RemovableSubType::PartialDenture => {
            stages.push(StageTemplate::new(PLANNING, Department::Planning));
            stages.push(StageTemplate::new(MODEL_SCAN, Department::Model));
            stages.push(StageTemplate::new(CAD_DESIGN, Department::Cad));
            stages.push(StageTemplate::new(CAM_PRODUCTION, Department::Cam));
            stages.push(StageTemplate::new("Teeth Setup", Department::Removable));
            stages.push(StageTemplate::new("Processing", Department::Removable));
        }
        RemovableSubType::NightGuard => {
            stages.push(StageTemplate::new(MODEL_SCAN, Department::Model));
            stages.push(StageTemplate::new(
                "Night Guard Fabrication",
                Department::Removable,
            ));
        }
        RemovableSubType::AddTooth => {
            stages.push(StageTemplate::new(MODEL_SCAN, Department::Model));
            stages.push(StageTemplate::new("Tooth Addition", Department::Removable));
        }
    }

    stages.extend(closing_stages());
    stages
}

fn orthodontics_template() -> Vec<StageTemplate> {
    let mut stages = vec![
        StageTemplate::new(RECEPTION, Department::Reception),
        StageTemplate::new(PLANNING, Department::Planning),
        StageTemplate::new(MODEL_SCAN, Department::Model),
        StageTemplate::new("Appliance Fabrication", Department::Orthodontics),
    ];
    stages.extend(closing_stages());
    stages
}

fn custom_template(spec: &CustomSpec) -> Vec<StageTemplate> {
    spec.steps
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| StageTemplate::new(s, Department::Custom))
        .collect()
}

fn closing_stages() -> [StageTemplate; 3] {
    [
        StageTemplate::new(FINISHING, Department::Finishing),
        StageTemplate::new(QUALITY_CONTROL, Department::Qc),
        StageTemplate::new(LOGISTICS, Department::Logistics),
    ]
}
