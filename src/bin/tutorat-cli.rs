#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::HashMap;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};
use tutorat::{
    detect_violations,
    flow::{Dinic, EdmondsKarp, MaxFlowSolver},
    grid::{GridRenderer, ScheduleGrid, TextGrid},
    io::{self, ScheduleReport},
    scheduler::{unmatched_students, Placement, ScheduleOptions, Scheduler, SlotCatalog},
    verify::ViolationKind,
    Assignment,
};

/// CLI de planification du tutorat individuel (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier d'inscriptions (CSV ou JSON)
    #[arg(long, global = true, default_value = "registrations.csv")]
    registrations: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SolverKind {
    Dinic,
    EdmondsKarp,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer le planning
    Schedule {
        #[arg(long, value_enum, default_value_t = SolverKind::Dinic)]
        solver: SolverKind,
        /// Refuser les inscriptions sans disponibilité
        #[arg(long)]
        reject_empty: bool,
        #[arg(long)]
        out_csv: Option<String>,
        /// Rapport JSON (grille complète + élèves non placés)
        #[arg(long)]
        out_json: Option<String>,
        /// Afficher la grille texte
        #[arg(long)]
        grid: bool,
        /// Avec --grid : afficher aussi les périodes vides
        #[arg(long)]
        all_rows: bool,
    },

    /// Vérifier un planning exporté
    Check {
        /// Export CSV produit par `schedule --out-csv`
        #[arg(long)]
        assignments: String,
        /// Export CSV des violations (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Lister les créneaux référencés par les inscriptions
    Slots,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let registry = io::load_registry(&cli.registrations)
        .with_context(|| format!("loading registrations from {}", cli.registrations))?;
    let students = registry.students();
    let teachers = registry.teachers();

    let code = match cli.cmd {
        Commands::Schedule {
            solver,
            reject_empty,
            out_csv,
            out_json,
            grid,
            all_rows,
        } => {
            let solver: Box<dyn MaxFlowSolver> = match solver {
                SolverKind::Dinic => Box::new(Dinic),
                SolverKind::EdmondsKarp => Box::new(EdmondsKarp),
            };
            let scheduler = Scheduler::with_solver(solver).with_options(ScheduleOptions {
                reject_empty_availability: reject_empty,
            });
            let placements = scheduler.place(&students, &teachers)?;
            let assignments: Vec<_> = placements
                .iter()
                .map(|p| Assignment {
                    slot: p.slot,
                    student: students[p.student].payload,
                    teacher: teachers[p.teacher].payload,
                })
                .collect();

            for a in &assignments {
                println!("{} | {} → {}", a.slot, a.teacher.name, a.student.name);
            }
            let unmatched: Vec<String> = unmatched_students(students.len(), &placements)
                .into_iter()
                .map(|i| students[i].payload.student_id.clone())
                .collect();
            println!(
                "{} assignment(s), {} unmatched student(s)",
                assignments.len(),
                unmatched.len()
            );

            let table = ScheduleGrid::from_assignments(&assignments);
            if grid {
                let renderer = TextGrid {
                    skip_empty_rows: !all_rows,
                };
                print!("{}", renderer.render(&table));
            }
            if let Some(path) = out_csv {
                io::export_assignments_csv(path, &assignments)?;
            }
            if let Some(path) = out_json {
                let report = ScheduleReport {
                    generated_at: Utc::now(),
                    assigned: assignments.len(),
                    unmatched_students: unmatched,
                    schedule: table,
                };
                io::export_report_json(path, &report)?;
            }
            0
        }
        Commands::Check {
            assignments,
            report,
        } => {
            let rows = io::import_assignments_csv(&assignments)?;
            let student_idx: HashMap<&str, usize> = students
                .iter()
                .enumerate()
                .map(|(i, s)| (s.payload.student_id.as_str(), i))
                .collect();
            let teacher_idx: HashMap<&str, usize> = teachers
                .iter()
                .enumerate()
                .map(|(i, t)| (t.payload.student_id.as_str(), i))
                .collect();
            // lignes d'identifiants inconnus : signalées telles quelles, hors contrôle
            let mut findings: Vec<[String; 4]> = Vec::new();
            let mut placements = Vec::with_capacity(rows.len());
            for row in &rows {
                let student = student_idx.get(row.student.as_str()).copied();
                let teacher = teacher_idx.get(row.teacher.as_str()).copied();
                let finding = |kind: ViolationKind| {
                    [
                        row.slot.to_string(),
                        row.student.clone(),
                        row.teacher.clone(),
                        kind.as_str().to_string(),
                    ]
                };
                if student.is_none() {
                    findings.push(finding(ViolationKind::UnknownStudent));
                }
                if teacher.is_none() {
                    findings.push(finding(ViolationKind::UnknownTeacher));
                }
                if let (Some(student), Some(teacher)) = (student, teacher) {
                    placements.push(Placement {
                        slot: row.slot,
                        student,
                        teacher,
                    });
                }
            }
            for v in detect_violations(&students, &teachers, &placements) {
                let student = students
                    .get(v.student)
                    .map_or("<unknown>", |s| s.payload.student_id.as_str());
                let teacher = teachers
                    .get(v.teacher)
                    .map_or("<unknown>", |t| t.payload.student_id.as_str());
                findings.push([
                    v.slot.to_string(),
                    student.to_string(),
                    teacher.to_string(),
                    v.kind.as_str().to_string(),
                ]);
            }

            if findings.is_empty() {
                println!("OK: {} assignment(s), no violations", rows.len());
                0
            } else {
                eprintln!("Found {} violation(s)", findings.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["slot", "student_id", "teacher_id", "kind"])?;
                    for record in &findings {
                        w.write_record(record)?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Slots => {
            let catalog = SlotCatalog::from_participants(&students, &teachers);
            for (i, slot) in catalog.slots().iter().enumerate() {
                println!("{i}\t{slot}");
            }
            0
        }
    };

    std::process::exit(code);
}
