//! Case classification - the tagged union that selects a workflow template

use serde::{Deserialize, Serialize};

use crate::core::error::CaseError;
use crate::core::vocabulary::{
    Category, FixedMaterial, FixedSupport, ImplantType, NightGuardSize, OrthodonticsType,
    RemovableSubType,
};

/// Fixed restoration details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedSpec {
    pub material: FixedMaterial,

    #[serde(default)]
    pub support: FixedSupport,

    /// Only meaningful when `support` is implant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implant_type: Option<ImplantType>,
}

/// Removable appliance details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovableSpec {
    pub sub_type: RemovableSubType,

    /// Night guards only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night_guard_size: Option<NightGuardSize>,

    /// Add-tooth cases only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooth_count: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrthodonticsSpec {
    pub appliance: OrthodonticsType,
}

/// A custom product replaces the template with user-named steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSpec {
    pub category: Category,
    pub steps: Vec<String>,
}

/// Everything that determines the shape of a case's workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    Fixed(FixedSpec),
    Removable(RemovableSpec),
    Orthodontics(OrthodonticsSpec),
    Custom(CustomSpec),
}

/// Raw category-specific options as collected from an intake form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_material: Option<FixedMaterial>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_support: Option<FixedSupport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implant_type: Option<ImplantType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removable_sub_type: Option<RemovableSubType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub night_guard_size: Option<NightGuardSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooth_count: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orthodontics_type: Option<OrthodonticsType>,
}

impl Classification {
    /// Build a classification from intake fields
    ///
    /// For custom products the category-specific options are ignored and the
    /// step list is trimmed, dropping blank entries. Attributes that do not
    /// apply to the chosen category (or sub-type) are discarded.
    pub fn resolve(
        category: Option<Category>,
        options: &ClassificationOptions,
        is_custom_product: bool,
        custom_steps: &[String],
    ) -> Result<Self, CaseError> {
        let category = category
            .ok_or_else(|| CaseError::InvalidClassification("category is required".to_string()))?;

        if is_custom_product {
            let steps: Vec<String> = custom_steps
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if steps.is_empty() {
                return Err(CaseError::InvalidClassification(
                    "custom product needs at least one named step".to_string(),
                ));
            }
            return Ok(Classification::Custom(CustomSpec { category, steps }));
        }

        match category {
            Category::Fixed => {
                let material = options.fixed_material.ok_or_else(|| {
                    CaseError::InvalidClassification(
                        "fixed cases require a material".to_string(),
                    )
                })?;
                let support = options.fixed_support.unwrap_or_default();
                let implant_type = match support {
                    FixedSupport::Implant => options.implant_type,
                    FixedSupport::ToothSupported => None,
                };
                Ok(Classification::Fixed(FixedSpec {
                    material,
                    support,
                    implant_type,
                }))
            }
            Category::Removable => {
                let sub_type = options.removable_sub_type.ok_or_else(|| {
                    CaseError::InvalidClassification(
                        "removable cases require a sub-type".to_string(),
                    )
                })?;
                let night_guard_size = match sub_type {
                    RemovableSubType::NightGuard => {
                        Some(options.night_guard_size.unwrap_or_default())
                    }
                    _ => None,
                };
                let tooth_count = match sub_type {
                    RemovableSubType::AddTooth => match options.tooth_count.unwrap_or(1) {
                        0 => {
                            return Err(CaseError::InvalidClassification(
                                "add-tooth cases need at least one tooth".to_string(),
                            ))
                        }
                        n => Some(n),
                    },
                    _ => None,
                };
                Ok(Classification::Removable(RemovableSpec {
                    sub_type,
                    night_guard_size,
                    tooth_count,
                }))
            }
            Category::Orthodontics => {
                let appliance = options.orthodontics_type.ok_or_else(|| {
                    CaseError::InvalidClassification(
                        "orthodontic cases require an appliance type".to_string(),
                    )
                })?;
                Ok(Classification::Orthodontics(OrthodonticsSpec { appliance }))
            }
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Classification::Fixed(_) => Category::Fixed,
            Classification::Removable(_) => Category::Removable,
            Classification::Orthodontics(_) => Category::Orthodontics,
            Classification::Custom(spec) => spec.category,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Classification::Custom(_))
    }

    /// Short human-readable description, e.g. "Zirconia (layered) · Implant (Screw-retained)"
    pub fn label(&self) -> String {
        match self {
            Classification::Fixed(spec) => match (spec.support, spec.implant_type) {
                (FixedSupport::Implant, Some(kind)) => format!(
                    "{} · {} ({})",
                    spec.material.label(),
                    spec.support.label(),
                    kind.label()
                ),
                (support, _) => format!("{} · {}", spec.material.label(), support.label()),
            },
            Classification::Removable(spec) => match (spec.night_guard_size, spec.tooth_count) {
                (Some(size), _) => format!("{} · {}", spec.sub_type.label(), size.label()),
                (_, Some(1)) => format!("{} · 1 tooth", spec.sub_type.label()),
                (_, Some(n)) => format!("{} · {} teeth", spec.sub_type.label(), n),
                _ => spec.sub_type.label().to_string(),
            },
            Classification::Orthodontics(spec) => spec.appliance.label().to_string(),
            Classification::Custom(spec) => {
                format!("Custom product ({} steps)", spec.steps.len())
            }
        }
    }
}
