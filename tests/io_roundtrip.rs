#![cfg(feature = "serde")]
#![forbid(unsafe_code)]
use std::fs;
use tempfile::tempdir;
use tutorat::{
    io::{self, ScheduleReport},
    Assignment,
    Role,
    ScheduleGrid,
    Scheduler,
};

const REGISTRATIONS: &str = "\
student_id,name,role,availability,capacity
T01,Alice,teacher,M1;M2;T3,2
T02,Carol,teacher,FA,
S01,Bob,student,M1,
S02,Dan,student,M1 M2,
S03,Eve,student,FA;UD,
S04,Zoe,student,,
";

#[test]
fn registrations_csv_are_imported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registrations.csv");
    fs::write(&path, REGISTRATIONS).unwrap();

    let registry = io::load_registry(&path).unwrap();
    assert_eq!(registry.registrations.len(), 6);
    let alice = registry.find_by_student_id("T01").unwrap();
    assert_eq!(alice.role, Role::Teacher);
    assert_eq!(alice.capacity, Some(2));
    assert_eq!(alice.availability.len(), 3);
    assert_eq!(registry.find_by_student_id("T02").unwrap().capacity, None);
    let zoe = registry.find_by_student_id("S04").unwrap();
    assert!(zoe.availability.is_empty());

    let teachers = registry.teachers();
    assert_eq!(teachers[1].capacity, 1);
}

#[test]
fn schedule_export_and_reimport() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registrations.csv");
    fs::write(&path, REGISTRATIONS).unwrap();
    let registry = io::load_registry(&path).unwrap();
    let students = registry.students();
    let teachers = registry.teachers();

    let assignments = Scheduler::new().schedule(&students, &teachers).unwrap();
    // Bob et Dan chez Alice (M1/M2), Eve chez Carol (FA), Zoe sans créneau
    assert_eq!(assignments.len(), 3);

    let out = dir.path().join("schedule.csv");
    io::export_assignments_csv(&out, &assignments).unwrap();
    let rows = io::import_assignments_csv(&out).unwrap();
    let expected: Vec<Assignment<String, String>> = assignments
        .iter()
        .map(|a| Assignment {
            slot: a.slot,
            student: a.student.student_id.clone(),
            teacher: a.teacher.student_id.clone(),
        })
        .collect();
    assert_eq!(rows, expected);

    let report = ScheduleReport {
        generated_at: chrono::Utc::now(),
        assigned: assignments.len(),
        unmatched_students: vec!["S04".into()],
        schedule: ScheduleGrid::from_assignments(&assignments),
    };
    let json_path = dir.path().join("report.json");
    io::export_report_json(&json_path, &report).unwrap();
    let value: serde_json::Value =
        serde_json::from_slice(&fs::read(&json_path).unwrap()).unwrap();
    assert_eq!(value["assigned"], 3);
    assert_eq!(value["unmatched_students"][0], "S04");
    assert_eq!(value["schedule"]["F"]["A"]["teacher"], "Carol");
    assert_eq!(value["schedule"]["F"]["A"]["student"], "Eve");
}

#[test]
fn registrations_json_are_imported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("registrations.json");
    fs::write(
        &path,
        r#"[
            {"student_id": "T01", "name": "Alice", "role": "teacher", "availability": ["M1"], "capacity": 2},
            {"student_id": "S01", "name": "Bob", "role": "student", "availability": ["M1", "RA"]}
        ]"#,
    )
    .unwrap();

    let registry = io::load_registry(&path).unwrap();
    assert_eq!(registry.students().len(), 1);
    assert_eq!(registry.teachers()[0].capacity, 2);
    assert_eq!(registry.students()[0].availability.len(), 2);
}

#[test]
fn bad_rows_are_rejected_with_context() {
    let dir = tempdir().unwrap();

    let bad_slot = dir.path().join("bad_slot.csv");
    fs::write(
        &bad_slot,
        "student_id,name,role,availability\nS01,Bob,student,M1;X4\n",
    )
    .unwrap();
    let err = io::load_registry(&bad_slot).unwrap_err();
    assert!(format!("{err:#}").contains("S01"));

    let bad_role = dir.path().join("bad_role.csv");
    fs::write(
        &bad_role,
        "student_id,name,role,availability\nS01,Bob,janitor,M1\n",
    )
    .unwrap();
    assert!(io::load_registry(&bad_role).is_err());

    let duplicate = dir.path().join("duplicate.csv");
    fs::write(
        &duplicate,
        "student_id,name,role,availability\nS01,Bob,student,M1\nS01,Bob,teacher,M2\n",
    )
    .unwrap();
    let err = io::load_registry(&duplicate).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}
