//! Contrôle a posteriori d'une liste d'affectations.

use crate::model::{Student, Teacher, TimeSlot};
use crate::scheduler::Placement;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    UnknownStudent,
    UnknownTeacher,
    OutsideStudentAvailability,
    OutsideTeacherAvailability,
    StudentReused,
    SlotReused,
    TeacherOverCapacity,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::UnknownStudent => "unknown_student",
            ViolationKind::UnknownTeacher => "unknown_teacher",
            ViolationKind::OutsideStudentAvailability => "student_unavailable",
            ViolationKind::OutsideTeacherAvailability => "teacher_unavailable",
            ViolationKind::StudentReused => "student_reused",
            ViolationKind::SlotReused => "slot_reused",
            ViolationKind::TeacherOverCapacity => "teacher_over_capacity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub slot: TimeSlot,
    pub student: usize,
    pub teacher: usize,
}

/// Liste toutes les violations : disponibilités, unicité élève/créneau, capacité.
pub fn detect_violations<P, Q>(
    students: &[Student<P>],
    teachers: &[Teacher<Q>],
    placements: &[Placement],
) -> Vec<Violation> {
    let mut out = Vec::new();
    let mut by_student: HashMap<usize, usize> = HashMap::new();
    let mut by_slot: HashMap<TimeSlot, usize> = HashMap::new();
    let mut load: HashMap<usize, u32> = HashMap::new();

    for p in placements {
        let mut flag = |kind| {
            out.push(Violation {
                kind,
                slot: p.slot,
                student: p.student,
                teacher: p.teacher,
            })
        };

        match students.get(p.student) {
            None => flag(ViolationKind::UnknownStudent),
            Some(s) if !s.availability.contains(&p.slot) => {
                flag(ViolationKind::OutsideStudentAvailability)
            }
            Some(_) => {}
        }
        match teachers.get(p.teacher) {
            None => flag(ViolationKind::UnknownTeacher),
            Some(t) => {
                if !t.availability.contains(&p.slot) {
                    flag(ViolationKind::OutsideTeacherAvailability);
                }
                let used = load.entry(p.teacher).or_insert(0);
                *used += 1;
                if *used > t.capacity {
                    flag(ViolationKind::TeacherOverCapacity);
                }
            }
        }

        // un identifiant inconnu ne désigne personne : pas de comptage
        if p.student < students.len() {
            let seen = by_student.entry(p.student).or_insert(0);
            *seen += 1;
            if *seen > 1 {
                flag(ViolationKind::StudentReused);
            }
        }
        let taken = by_slot.entry(p.slot).or_insert(0);
        *taken += 1;
        if *taken > 1 {
            flag(ViolationKind::SlotReused);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(code: &str) -> TimeSlot {
        code.parse().unwrap()
    }

    fn at(code: &str, student: usize, teacher: usize) -> Placement {
        Placement {
            slot: slot(code),
            student,
            teacher,
        }
    }

    fn kinds(v: &[Violation]) -> Vec<ViolationKind> {
        v.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn clean_schedule_has_no_violation() {
        let students = vec![
            Student::new("a", [slot("M1")]),
            Student::new("b", [slot("M2")]),
        ];
        let teacher = Teacher::new("t", [slot("M1"), slot("M2")]);
        let teachers = vec![teacher.with_capacity(2)];
        let placements = [at("M1", 0, 0), at("M2", 1, 0)];
        let found = detect_violations(&students, &teachers, &placements);
        assert!(found.is_empty());
    }

    #[test]
    fn every_rule_is_reported() {
        let students = vec![
            Student::new("a", [slot("M1"), slot("M2")]),
            Student::new("b", [slot("M1")]),
        ];
        let teachers = vec![Teacher::new("t", [slot("M1")])];
        let placements = [
            at("M1", 0, 0),
            at("M1", 1, 0),
            at("M2", 0, 0),
            at("T1", 9, 4),
        ];
        let found = kinds(&detect_violations(&students, &teachers, &placements));
        assert_eq!(
            found,
            vec![
                ViolationKind::TeacherOverCapacity,
                ViolationKind::SlotReused,
                ViolationKind::OutsideTeacherAvailability,
                ViolationKind::TeacherOverCapacity,
                ViolationKind::StudentReused,
                ViolationKind::UnknownStudent,
                ViolationKind::UnknownTeacher,
            ]
        );
    }

    #[test]
    fn unknown_students_are_not_counted_as_reused() {
        let students = vec![Student::new("a", [slot("M1")])];
        let teacher = Teacher::new("t", [slot("M1"), slot("M2")]);
        let teachers = vec![teacher.with_capacity(2)];
        let placements = [at("M1", usize::MAX, 0), at("M2", usize::MAX, 0)];
        let found = kinds(&detect_violations(&students, &teachers, &placements));
        assert_eq!(found, vec![ViolationKind::UnknownStudent; 2]);
    }
}
