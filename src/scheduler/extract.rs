use super::{
    catalog::SlotCatalog,
    graph::{FlowGraph, NodeKind},
    Placement,
    SchedError,
};
use crate::flow::FlowSolution;
use std::collections::HashSet;

/// Reconstruit les triplets (créneau, élève, professeur) à partir des arcs porteurs de flot.
///
/// Toute incohérence (créneau traversé sans élève ni professeur, élève ou
/// créneau utilisé deux fois) signale un défaut du solveur ou du réseau.
pub(super) fn extract_placements(
    graph: &FlowGraph,
    catalog: &SlotCatalog,
    solution: &FlowSolution,
) -> Result<Vec<Placement>, SchedError> {
    let mut student_of: Vec<Option<usize>> = vec![None; catalog.len()];
    let mut teacher_of: Vec<Option<usize>> = vec![None; catalog.len()];

    for (arc_id, arc) in graph.arcs().iter().enumerate() {
        if solution.flow(arc_id) == 0 {
            continue;
        }
        match (graph.kind(arc.tail), graph.kind(arc.head)) {
            (Some(NodeKind::StudentOut(i)), Some(NodeKind::SlotIn(s))) => {
                claim(&mut student_of, s, i, "student")?;
            }
            (Some(NodeKind::SlotOut(s)), Some(NodeKind::TeacherIn(j))) => {
                claim(&mut teacher_of, s, j, "teacher")?;
            }
            _ => {}
        }
    }

    let mut student_taken = HashSet::new();
    let mut placements = Vec::new();
    for (s, slot) in catalog.slots().iter().enumerate() {
        let bottleneck = graph.slot_arc(s).ok_or_else(|| {
            SchedError::InternalInvariantViolation(format!("no bottleneck arc for slot {slot}"))
        })?;
        let used = solution.flow(bottleneck) > 0;

        match (used, student_of[s], teacher_of[s]) {
            (false, None, None) => {}
            (true, Some(student), Some(teacher)) => {
                if !student_taken.insert(student) {
                    return Err(SchedError::InternalInvariantViolation(format!(
                        "student #{student} carries flow into several slots"
                    )));
                }
                placements.push(Placement {
                    slot: *slot,
                    student,
                    teacher,
                });
            }
            (used, student, teacher) => {
                return Err(SchedError::InternalInvariantViolation(format!(
                    "inconsistent flow at slot {slot}: used={used}, student={student:?}, teacher={teacher:?}"
                )));
            }
        }
    }

    Ok(placements)
}

fn claim(
    owners: &mut [Option<usize>],
    slot: usize,
    who: usize,
    role: &str,
) -> Result<(), SchedError> {
    let cell = owners.get_mut(slot).ok_or_else(|| {
        SchedError::InternalInvariantViolation(format!("slot #{slot} out of catalog range"))
    })?;
    if let Some(previous) = cell {
        return Err(SchedError::InternalInvariantViolation(format!(
            "slot #{slot} receives flow from {role} #{previous} and #{who}"
        )));
    }
    *cell = Some(who);
    Ok(())
}
