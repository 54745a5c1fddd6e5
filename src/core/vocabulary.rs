//! Classification vocabulary - closed enumerations used across the lab
//!
//! Every enum serializes to a stable snake_case form, parses case-insensitively
//! (accepting `-` or `_` as separators) and exposes a display `label()`.

use serde::{Deserialize, Serialize};

/// Normalize user input so `Zirconia-Layered` and `zirconia_layered` match
fn normalize(s: &str) -> String {
    s.trim().to_lowercase().replace(['-', ' '], "_")
}

/// Case category - exactly one per case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fixed,
    Removable,
    Orthodontics,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[Category::Fixed, Category::Removable, Category::Orthodontics]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Fixed => "Fixed Prosthodontics",
            Category::Removable => "Removable Prosthodontics",
            Category::Orthodontics => "Orthodontics",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Fixed => write!(f, "fixed"),
            Category::Removable => write!(f, "removable"),
            Category::Orthodontics => write!(f, "orthodontics"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fixed" => Ok(Category::Fixed),
            "removable" => Ok(Category::Removable),
            "orthodontics" | "ortho" => Ok(Category::Orthodontics),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// How a fixed restoration is finished after milling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CeramicRoute {
    /// Layered porcelain: build-up followed by firing
    BuildUpAndFiring,
    /// Monolithic ceramics that are sintered/glazed but not layered
    FiringOnly,
    /// Polymers finished straight off the mill
    None,
}

/// Material for fixed restorations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedMaterial {
    /// Monolithic (full-contour) zirconia
    Zirconia,
    /// Zirconia framework with layered porcelain
    ZirconiaLayered,
    /// Lithium disilicate
    Emax,
    /// Porcelain fused to metal
    Pfm,
    /// Milled PMMA temporaries
    Pmma,
    Composite,
}

impl FixedMaterial {
    pub fn all() -> &'static [FixedMaterial] {
        &[
            FixedMaterial::Zirconia,
            FixedMaterial::ZirconiaLayered,
            FixedMaterial::Emax,
            FixedMaterial::Pfm,
            FixedMaterial::Pmma,
            FixedMaterial::Composite,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FixedMaterial::Zirconia => "Zirconia (monolithic)",
            FixedMaterial::ZirconiaLayered => "Zirconia (layered)",
            FixedMaterial::Emax => "E.max",
            FixedMaterial::Pfm => "PFM",
            FixedMaterial::Pmma => "PMMA (temporary)",
            FixedMaterial::Composite => "Composite",
        }
    }

    /// Which ceramic stages this material needs between CAM and finishing
    pub fn ceramic_route(&self) -> CeramicRoute {
        match self {
            FixedMaterial::ZirconiaLayered | FixedMaterial::Pfm => CeramicRoute::BuildUpAndFiring,
            FixedMaterial::Zirconia | FixedMaterial::Emax => CeramicRoute::FiringOnly,
            FixedMaterial::Pmma | FixedMaterial::Composite => CeramicRoute::None,
        }
    }

    pub fn requires_build_up(&self) -> bool {
        self.ceramic_route() == CeramicRoute::BuildUpAndFiring
    }
}

impl std::fmt::Display for FixedMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixedMaterial::Zirconia => write!(f, "zirconia"),
            FixedMaterial::ZirconiaLayered => write!(f, "zirconia_layered"),
            FixedMaterial::Emax => write!(f, "emax"),
            FixedMaterial::Pfm => write!(f, "pfm"),
            FixedMaterial::Pmma => write!(f, "pmma"),
            FixedMaterial::Composite => write!(f, "composite"),
        }
    }
}

impl std::str::FromStr for FixedMaterial {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "zirconia" => Ok(FixedMaterial::Zirconia),
            "zirconia_layered" => Ok(FixedMaterial::ZirconiaLayered),
            "emax" | "e.max" => Ok(FixedMaterial::Emax),
            "pfm" => Ok(FixedMaterial::Pfm),
            "pmma" => Ok(FixedMaterial::Pmma),
            "composite" => Ok(FixedMaterial::Composite),
            _ => Err(format!("Unknown fixed material: {}", s)),
        }
    }
}

/// What a fixed restoration sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FixedSupport {
    #[default]
    ToothSupported,
    Implant,
}

impl FixedSupport {
    pub fn label(&self) -> &'static str {
        match self {
            FixedSupport::ToothSupported => "Tooth-supported",
            FixedSupport::Implant => "Implant",
        }
    }
}

impl std::fmt::Display for FixedSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixedSupport::ToothSupported => write!(f, "tooth_supported"),
            FixedSupport::Implant => write!(f, "implant"),
        }
    }
}

impl std::str::FromStr for FixedSupport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "tooth_supported" | "tooth" => Ok(FixedSupport::ToothSupported),
            "implant" => Ok(FixedSupport::Implant),
            _ => Err(format!("Unknown fixed support: {}", s)),
        }
    }
}

/// Implant restoration type (display only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplantType {
    ScrewRetained,
    CementRetained,
    CustomAbutment,
}

impl ImplantType {
    pub fn label(&self) -> &'static str {
        match self {
            ImplantType::ScrewRetained => "Screw-retained",
            ImplantType::CementRetained => "Cement-retained",
            ImplantType::CustomAbutment => "Custom abutment",
        }
    }
}

impl std::fmt::Display for ImplantType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImplantType::ScrewRetained => write!(f, "screw_retained"),
            ImplantType::CementRetained => write!(f, "cement_retained"),
            ImplantType::CustomAbutment => write!(f, "custom_abutment"),
        }
    }
}

impl std::str::FromStr for ImplantType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "screw_retained" | "screw" => Ok(ImplantType::ScrewRetained),
            "cement_retained" | "cement" => Ok(ImplantType::CementRetained),
            "custom_abutment" | "abutment" => Ok(ImplantType::CustomAbutment),
            _ => Err(format!("Unknown implant type: {}", s)),
        }
    }
}

/// Removable appliance sub-type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovableSubType {
    FullDenture,
    PartialDenture,
    NightGuard,
    AddTooth,
}

impl RemovableSubType {
    pub fn all() -> &'static [RemovableSubType] {
        &[
            RemovableSubType::FullDenture,
            RemovableSubType::PartialDenture,
            RemovableSubType::NightGuard,
            RemovableSubType::AddTooth,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            RemovableSubType::FullDenture => "Full denture",
            RemovableSubType::PartialDenture => "Partial denture",
            RemovableSubType::NightGuard => "Night guard",
            RemovableSubType::AddTooth => "Add tooth",
        }
    }
}

impl std::fmt::Display for RemovableSubType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemovableSubType::FullDenture => write!(f, "full_denture"),
            RemovableSubType::PartialDenture => write!(f, "partial_denture"),
            RemovableSubType::NightGuard => write!(f, "night_guard"),
            RemovableSubType::AddTooth => write!(f, "add_tooth"),
        }
    }
}

impl std::str::FromStr for RemovableSubType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "full_denture" | "full" => Ok(RemovableSubType::FullDenture),
            "partial_denture" | "partial" => Ok(RemovableSubType::PartialDenture),
            "night_guard" | "nightguard" => Ok(RemovableSubType::NightGuard),
            "add_tooth" => Ok(RemovableSubType::AddTooth),
            _ => Err(format!("Unknown removable sub-type: {}", s)),
        }
    }
}

/// Night guard thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NightGuardSize {
    Thin,
    #[default]
    Standard,
    Thick,
}

impl NightGuardSize {
    pub fn label(&self) -> &'static str {
        match self {
            NightGuardSize::Thin => "Thin (1 mm)",
            NightGuardSize::Standard => "Standard (2 mm)",
            NightGuardSize::Thick => "Thick (3 mm)",
        }
    }
}

impl std::fmt::Display for NightGuardSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NightGuardSize::Thin => write!(f, "thin"),
            NightGuardSize::Standard => write!(f, "standard"),
            NightGuardSize::Thick => write!(f, "thick"),
        }
    }
}

impl std::str::FromStr for NightGuardSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "thin" | "1mm" => Ok(NightGuardSize::Thin),
            "standard" | "2mm" => Ok(NightGuardSize::Standard),
            "thick" | "3mm" => Ok(NightGuardSize::Thick),
            _ => Err(format!("Unknown night guard size: {}", s)),
        }
    }
}

/// Orthodontic appliance (display only; does not change the workflow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrthodonticsType {
    HawleyRetainer,
    EssixRetainer,
    Expander,
    SpaceMaintainer,
}

impl OrthodonticsType {
    pub fn all() -> &'static [OrthodonticsType] {
        &[
            OrthodonticsType::HawleyRetainer,
            OrthodonticsType::EssixRetainer,
            OrthodonticsType::Expander,
            OrthodonticsType::SpaceMaintainer,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrthodonticsType::HawleyRetainer => "Hawley retainer",
            OrthodonticsType::EssixRetainer => "Essix retainer",
            OrthodonticsType::Expander => "Expander",
            OrthodonticsType::SpaceMaintainer => "Space maintainer",
        }
    }
}

impl std::fmt::Display for OrthodonticsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrthodonticsType::HawleyRetainer => write!(f, "hawley_retainer"),
            OrthodonticsType::EssixRetainer => write!(f, "essix_retainer"),
            OrthodonticsType::Expander => write!(f, "expander"),
            OrthodonticsType::SpaceMaintainer => write!(f, "space_maintainer"),
        }
    }
}

impl std::str::FromStr for OrthodonticsType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "hawley_retainer" | "hawley" => Ok(OrthodonticsType::HawleyRetainer),
            "essix_retainer" | "essix" => Ok(OrthodonticsType::EssixRetainer),
            "expander" => Ok(OrthodonticsType::Expander),
            "space_maintainer" => Ok(OrthodonticsType::SpaceMaintainer),
            _ => Err(format!("Unknown orthodontic appliance: {}", s)),
        }
    }
}

/// Case priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Priority {
    #[default]
    Normal,
    Rush,
    Emergency,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Normal => "Normal",
            Priority::Rush => "Rush",
            Priority::Emergency => "Emergency",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Normal => write!(f, "normal"),
            Priority::Rush => write!(f, "rush"),
            Priority::Emergency => write!(f, "emergency"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "normal" => Ok(Priority::Normal),
            "rush" => Ok(Priority::Rush),
            "emergency" => Ok(Priority::Emergency),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Why a case left the lab for a clinical visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    TryIn,
    SpecialTray,
    BiteRegistration,
}

impl PauseReason {
    pub fn label(&self) -> &'static str {
        match self {
            PauseReason::TryIn => "Try-in",
            PauseReason::SpecialTray => "Special tray",
            PauseReason::BiteRegistration => "Bite registration",
        }
    }
}

impl std::fmt::Display for PauseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PauseReason::TryIn => write!(f, "try_in"),
            PauseReason::SpecialTray => write!(f, "special_tray"),
            PauseReason::BiteRegistration => write!(f, "bite_registration"),
        }
    }
}

impl std::str::FromStr for PauseReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "try_in" | "tryin" => Ok(PauseReason::TryIn),
            "special_tray" | "tray" => Ok(PauseReason::SpecialTray),
            "bite_registration" | "bite" => Ok(PauseReason::BiteRegistration),
            _ => Err(format!("Unknown pause reason: {}", s)),
        }
    }
}

/// Terminal disposition of a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    /// Sent out for a clinical fitting; awaiting feedback
    TryIn,
    /// Handed off to the clinic
    Delivery,
}

impl FinalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            FinalStatus::TryIn => "Try-in",
            FinalStatus::Delivery => "Delivery",
        }
    }
}

impl std::fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinalStatus::TryIn => write!(f, "try_in"),
            FinalStatus::Delivery => write!(f, "delivery"),
        }
    }
}

impl std::str::FromStr for FinalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "try_in" | "tryin" => Ok(FinalStatus::TryIn),
            "delivery" => Ok(FinalStatus::Delivery),
            _ => Err(format!("Unknown final status: {}", s)),
        }
    }
}

/// Department that owns a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Reception,
    Planning,
    Model,
    Cad,
    Cam,
    Ceramics,
    Removable,
    Orthodontics,
    Finishing,
    Qc,
    Logistics,
    /// Steps of a custom product
    Custom,
}

impl Department {
    pub fn all() -> &'static [Department] {
        &[
            Department::Reception,
            Department::Planning,
            Department::Model,
            Department::Cad,
            Department::Cam,
            Department::Ceramics,
            Department::Removable,
            Department::Orthodontics,
            Department::Finishing,
            Department::Qc,
            Department::Logistics,
            Department::Custom,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Department::Reception => "Reception",
            Department::Planning => "Case Planning",
            Department::Model => "Model Room",
            Department::Cad => "CAD",
            Department::Cam => "CAM",
            Department::Ceramics => "Ceramics",
            Department::Removable => "Removables",
            Department::Orthodontics => "Orthodontics",
            Department::Finishing => "Finishing",
            Department::Qc => "Quality Control",
            Department::Logistics => "Logistics",
            Department::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Department::Reception => write!(f, "reception"),
            Department::Planning => write!(f, "planning"),
            Department::Model => write!(f, "model"),
            Department::Cad => write!(f, "cad"),
            Department::Cam => write!(f, "cam"),
            Department::Ceramics => write!(f, "ceramics"),
            Department::Removable => write!(f, "removable"),
            Department::Orthodontics => write!(f, "orthodontics"),
            Department::Finishing => write!(f, "finishing"),
            Department::Qc => write!(f, "qc"),
            Department::Logistics => write!(f, "logistics"),
            Department::Custom => write!(f, "custom"),
        }
    }
}

impl std::str::FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "reception" => Ok(Department::Reception),
            "planning" | "case_planning" => Ok(Department::Planning),
            "model" | "scan" => Ok(Department::Model),
            "cad" => Ok(Department::Cad),
            "cam" => Ok(Department::Cam),
            "ceramics" => Ok(Department::Ceramics),
            "removable" | "removables" => Ok(Department::Removable),
            "orthodontics" | "ortho" => Ok(Department::Orthodontics),
            "finishing" => Ok(Department::Finishing),
            "qc" | "quality_control" => Ok(Department::Qc),
            "logistics" => Ok(Department::Logistics),
            "custom" => Ok(Department::Custom),
            _ => Err(format!("Unknown department: {}", s)),
        }
    }
}

/// Status of a single workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum StageStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Skipped,
}

impl StageStatus {
    /// Completed and skipped stages both count towards progress
    pub fn is_terminal(&self) -> bool {
        matches!(self, StageStatus::Completed | StageStatus::Skipped)
    }
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageStatus::Pending => write!(f, "pending"),
            StageStatus::InProgress => write!(f, "in_progress"),
            StageStatus::Completed => write!(f, "completed"),
            StageStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Kind of note in a case's audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum NoteType {
    #[default]
    Update,
    Issue,
    Feedback,
    Pause,
    Resume,
}

impl std::fmt::Display for NoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteType::Update => write!(f, "update"),
            NoteType::Issue => write!(f, "issue"),
            NoteType::Feedback => write!(f, "feedback"),
            NoteType::Pause => write!(f, "pause"),
            NoteType::Resume => write!(f, "resume"),
        }
    }
}

impl std::str::FromStr for NoteType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "update" => Ok(NoteType::Update),
            "issue" => Ok(NoteType::Issue),
            "feedback" => Ok(NoteType::Feedback),
            "pause" => Ok(NoteType::Pause),
            "resume" => Ok(NoteType::Resume),
            _ => Err(format!("Unknown note type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum AttachmentKind {
    Image,
    #[default]
    File,
}

impl std::fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttachmentKind::Image => write!(f, "image"),
            AttachmentKind::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for AttachmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "image" => Ok(AttachmentKind::Image),
            "file" => Ok(AttachmentKind::File),
            _ => Err(format!("Unknown attachment kind: {}", s)),
        }
    }
}

/// Staff role supplied by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum Role {
    Admin,
    #[default]
    Tech,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Tech => write!(f, "tech"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "admin" => Ok(Role::Admin),
            "tech" | "technician" => Ok(Role::Tech),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_dashes_and_case() {
        assert_eq!(
            "Zirconia-Layered".parse::<FixedMaterial>().unwrap(),
            FixedMaterial::ZirconiaLayered
        );
        assert_eq!(
            "night-guard".parse::<RemovableSubType>().unwrap(),
            RemovableSubType::NightGuard
        );
        assert_eq!("TRY_IN".parse::<PauseReason>().unwrap(), PauseReason::TryIn);
        assert!("veneer".parse::<Category>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for dept in Department::all() {
            let yaml = serde_yml::to_string(dept).unwrap();
            assert_eq!(yaml.trim(), dept.to_string());
        }
        for material in FixedMaterial::all() {
            let yaml = serde_yml::to_string(material).unwrap();
            assert_eq!(yaml.trim(), material.to_string());
        }
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for dept in Department::all() {
            assert_eq!(dept.to_string().parse::<Department>().unwrap(), *dept);
        }
        for sub in RemovableSubType::all() {
            assert_eq!(sub.to_string().parse::<RemovableSubType>().unwrap(), *sub);
        }
        for appliance in OrthodonticsType::all() {
            assert_eq!(
                appliance.to_string().parse::<OrthodonticsType>().unwrap(),
                *appliance
            );
        }
    }

    #[test]
    fn test_ceramic_route() {
        assert!(FixedMaterial::ZirconiaLayered.requires_build_up());
        assert!(FixedMaterial::Pfm.requires_build_up());
        assert!(!FixedMaterial::Zirconia.requires_build_up());
        assert_eq!(FixedMaterial::Emax.ceramic_route(), CeramicRoute::FiringOnly);
        assert_eq!(FixedMaterial::Pmma.ceramic_route(), CeramicRoute::None);
    }

    #[test]
    fn test_stage_status_terminal() {
        assert!(StageStatus::Completed.is_terminal());
        assert!(StageStatus::Skipped.is_terminal());
        assert!(!StageStatus::Pending.is_terminal());
        assert!(!StageStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Emergency > Priority::Rush);
        assert!(Priority::Rush > Priority::Normal);
        assert_eq!(Priority::default(), Priority::Normal);
    }
}
