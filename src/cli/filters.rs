//! Filter enums for case list commands

use clap::ValueEnum;

use crate::core::vocabulary::{FinalStatus, Priority};
use crate::entities::case::{Case, CaseState};

/// Lifecycle filter for list commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StateFilter {
    /// Moving through the workflow
    Active,
    /// On hold for a clinical visit
    Paused,
    /// Out for try-in
    TryIn,
    /// Delivered to the clinic
    Delivered,
    /// Everything not yet delivered - default
    #[default]
    Open,
    /// All cases
    All,
}

impl StateFilter {
    pub fn matches(&self, case: &Case) -> bool {
        let state = case.state();
        match self {
            StateFilter::Active => state == CaseState::Active,
            StateFilter::Paused => state == CaseState::Paused,
            StateFilter::TryIn => state == CaseState::Finalized(FinalStatus::TryIn),
            StateFilter::Delivered => state == CaseState::Finalized(FinalStatus::Delivery),
            StateFilter::Open => state != CaseState::Finalized(FinalStatus::Delivery),
            StateFilter::All => true,
        }
    }
}

impl std::fmt::Display for StateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateFilter::Active => write!(f, "active"),
            StateFilter::Paused => write!(f, "paused"),
            StateFilter::TryIn => write!(f, "try-in"),
            StateFilter::Delivered => write!(f, "delivered"),
            StateFilter::Open => write!(f, "open"),
            StateFilter::All => write!(f, "all"),
        }
    }
}

/// Priority filter for list commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    Normal,
    Rush,
    Emergency,
    /// Rush and emergency
    Urgent,
    /// All priorities - default
    #[default]
    All,
}

impl PriorityFilter {
    pub fn matches(&self, priority: &Priority) -> bool {
        match self {
            PriorityFilter::Normal => *priority == Priority::Normal,
            PriorityFilter::Rush => *priority == Priority::Rush,
            PriorityFilter::Emergency => *priority == Priority::Emergency,
            PriorityFilter::Urgent => *priority != Priority::Normal,
            PriorityFilter::All => true,
        }
    }
}

impl std::fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityFilter::Normal => write!(f, "normal"),
            PriorityFilter::Rush => write!(f, "rush"),
            PriorityFilter::Emergency => write!(f, "emergency"),
            PriorityFilter::Urgent => write!(f, "urgent"),
            PriorityFilter::All => write!(f, "all"),
        }
    }
}
