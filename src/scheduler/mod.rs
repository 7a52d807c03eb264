mod catalog;
mod extract;
mod graph;
mod types;

pub use catalog::SlotCatalog;
pub use graph::{FlowGraph, NodeId, NodeKind};
pub use types::{Placement, SchedError, ScheduleOptions};

use crate::flow::{Dinic, MaxFlowSolver, SolverError};
use crate::model::{Assignment, Role, Student, Teacher};

/// Scheduler : affectation maximale élèves ↔ professeurs par flot maximum.
///
/// Sans état entre deux appels ; le solveur de flot est injectable.
#[derive(Debug, Default, Clone)]
pub struct Scheduler<S = Dinic> {
    solver: S,
    options: ScheduleOptions,
}

impl Scheduler<Dinic> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: MaxFlowSolver> Scheduler<S> {
    pub fn with_solver(solver: S) -> Self {
        Self {
            solver,
            options: ScheduleOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ScheduleOptions) -> Self {
        self.options = options;
        self
    }

    /// Affectations en indices, triées par créneau.
    pub fn place<P, Q>(
        &self,
        students: &[Student<P>],
        teachers: &[Teacher<Q>],
    ) -> Result<Vec<Placement>, SchedError> {
        if students.is_empty() || teachers.is_empty() {
            return Ok(Vec::new());
        }
        self.validate(students, teachers)?;

        let catalog = SlotCatalog::from_participants(students, teachers);
        let graph = FlowGraph::build(students, teachers, &catalog)?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            students = students.len(),
            teachers = teachers.len(),
            slots = catalog.len(),
            nodes = graph.node_count(),
            arcs = graph.arcs().len(),
            "flow network built"
        );

        let solution = self.solver.solve(
            graph.node_count(),
            graph.arcs(),
            graph.source().index(),
            graph.sink().index(),
        )?;
        if solution.flows.len() != graph.arcs().len() {
            return Err(SchedError::SolverFailure(SolverError::Failed(format!(
                "expected {} arc flows, got {}",
                graph.arcs().len(),
                solution.flows.len()
            ))));
        }

        let placements = extract::extract_placements(&graph, &catalog, &solution)?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            flow = solution.value,
            placements = placements.len(),
            "schedule extracted"
        );

        Ok(placements)
    }

    /// Affectations avec les charges utiles des participants.
    pub fn schedule<P: Clone, Q: Clone>(
        &self,
        students: &[Student<P>],
        teachers: &[Teacher<Q>],
    ) -> Result<Vec<Assignment<P, Q>>, SchedError> {
        let placements = self.place(students, teachers)?;
        Ok(placements
            .into_iter()
            .map(|p| Assignment {
                slot: p.slot,
                student: students[p.student].payload.clone(),
                teacher: teachers[p.teacher].payload.clone(),
            })
            .collect())
    }

    fn validate<P, Q>(
        &self,
        students: &[Student<P>],
        teachers: &[Teacher<Q>],
    ) -> Result<(), SchedError> {
        if let Some(teacher) = teachers.iter().position(|t| t.capacity == 0) {
            return Err(SchedError::InvalidCapacity { teacher });
        }
        if self.options.reject_empty_availability {
            if let Some(index) = students.iter().position(|s| s.availability.is_empty()) {
                return Err(SchedError::EmptyAvailability {
                    role: Role::Student,
                    index,
                });
            }
            if let Some(index) = teachers.iter().position(|t| t.availability.is_empty()) {
                return Err(SchedError::EmptyAvailability {
                    role: Role::Teacher,
                    index,
                });
            }
        }
        Ok(())
    }
}

/// Planifie avec le solveur par défaut.
pub fn schedule<P: Clone, Q: Clone>(
    students: &[Student<P>],
    teachers: &[Teacher<Q>],
) -> Result<Vec<Assignment<P, Q>>, SchedError> {
    Scheduler::new().schedule(students, teachers)
}

/// Indices des élèves restés sans créneau.
pub fn unmatched_students(student_count: usize, placements: &[Placement]) -> Vec<usize> {
    let mut matched = vec![false; student_count];
    for p in placements {
        if let Some(flag) = matched.get_mut(p.student) {
            *flag = true;
        }
    }
    matched
        .iter()
        .enumerate()
        .filter(|(_, m)| !**m)
        .map(|(i, _)| i)
        .collect()
}
