use crate::flow::SolverError;
use crate::model::{Role, TimeSlot};
use thiserror::Error;

/// Options de planification
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleOptions {
    /// Refuse les participants sans aucune disponibilité au lieu de les
    /// laisser simplement sans affectation.
    pub reject_empty_availability: bool,
}

/// Affectation exprimée en indices dans les listes d'entrée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placement {
    pub slot: TimeSlot,
    pub student: usize,
    pub teacher: usize,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid capacity for teacher #{teacher}: must be at least 1")]
    InvalidCapacity { teacher: usize },
    #[error("{role} #{index} has no availability")]
    EmptyAvailability { role: Role, index: usize },
    #[error("max-flow solver failure: {0}")]
    SolverFailure(#[from] SolverError),
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
