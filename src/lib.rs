#![forbid(unsafe_code)]
//! Tutorat : planification du tutorat individuel élève/professeur (sans BD).
//!
//! - Créneaux hebdomadaires discrets (7 jours × 14 périodes).
//! - Affectation maximale par réduction à un flot maximum.
//! - Solveur de flot injectable (Dinic par défaut).
//! - Import/export fichiers (CSV/JSON) et grille de présentation en dehors du cœur.

pub mod flow;
pub mod grid;
#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod scheduler;
pub mod verify;

pub use flow::{Dinic, EdmondsKarp, FlowArc, FlowSolution, MaxFlowSolver, SolverError};
pub use grid::{DisplayName, GridRenderer, Pairing, ScheduleGrid, TextGrid};
pub use model::{
    Assignment, ParseError, Period, Registration, Registry, Role, Student, Teacher, TimeSlot,
    Weekday,
};
pub use scheduler::{
    schedule, unmatched_students, Placement, SchedError, ScheduleOptions, Scheduler, SlotCatalog,
};
pub use verify::{detect_violations, Violation, ViolationKind};
