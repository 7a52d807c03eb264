use crate::grid::ScheduleGrid;
use crate::model::{Assignment, Registration, Registry, Role, TimeSlot};
use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Import des inscriptions depuis CSV: header `student_id,name,role,availability[,capacity]`
///
/// `availability` est une liste de codes séparés par `;` ou des espaces (`M1;M2;RA`).
pub fn import_registrations_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Registration>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let student_id = rec.get(0).context("missing student_id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        if student_id.is_empty() {
            bail!("invalid registration row (empty student_id)");
        }
        let role: Role = rec
            .get(2)
            .context("missing role")?
            .parse()
            .with_context(|| format!("invalid role for {student_id}"))?;
        let availability = parse_availability(rec.get(3).unwrap_or(""))
            .with_context(|| format!("invalid availability for {student_id}"))?;

        let mut registration = Registration::new(student_id, name, role, availability);
        if let Some(raw) = rec.get(4) {
            let raw = raw.trim();
            if !raw.is_empty() {
                registration.capacity = Some(
                    raw.parse::<u32>()
                        .with_context(|| format!("invalid capacity for {student_id}"))?,
                );
            }
        }
        out.push(registration);
    }
    ensure_unique_ids(&out)?;
    Ok(out)
}

pub fn parse_availability(raw: &str) -> anyhow::Result<BTreeSet<TimeSlot>> {
    raw.split(|c: char| c == ';' || c.is_whitespace())
        .filter(|code| !code.is_empty())
        .map(|code| code.parse::<TimeSlot>().map_err(anyhow::Error::from))
        .collect()
}

/// Import JSON : tableau de fiches.
pub fn import_registrations_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Registration>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let registrations: Vec<Registration> =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    ensure_unique_ids(&registrations)?;
    Ok(registrations)
}

/// Charge un registre, format choisi d'après l'extension (`.json`, sinon CSV).
pub fn load_registry<P: AsRef<Path>>(path: P) -> anyhow::Result<Registry> {
    let path = path.as_ref();
    let registrations = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => import_registrations_json(path)?,
        _ => import_registrations_csv(path)?,
    };
    Ok(Registry::new(registrations))
}

fn ensure_unique_ids(registrations: &[Registration]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for r in registrations {
        if !seen.insert(r.student_id.as_str()) {
            bail!("duplicate registration for {}", r.student_id);
        }
    }
    Ok(())
}

/// Export CSV: header `weekday,period,teacher_id,teacher_name,student_id,student_name`
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    assignments: &[Assignment<&Registration, &Registration>],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());
    w.write_record([
        "weekday",
        "period",
        "teacher_id",
        "teacher_name",
        "student_id",
        "student_name",
    ])?;
    for a in assignments {
        let weekday = a.slot.weekday.code().to_string();
        w.write_record([
            weekday.as_str(),
            a.slot.period.code(),
            a.teacher.student_id.as_str(),
            a.teacher.name.as_str(),
            a.student.student_id.as_str(),
            a.student.name.as_str(),
        ])?;
    }
    w.flush()?;
    let bytes = w
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing csv: {}", e.error()))?;
    write_atomic(path.as_ref(), &bytes)
}

/// Relit un export CSV ; les participants sont désignés par leur `student_id`.
pub fn import_assignments_csv<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<Vec<Assignment<String, String>>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let weekday = rec.get(0).context("missing weekday")?.trim();
        let period = rec.get(1).context("missing period")?.trim();
        let slot: TimeSlot = format!("{weekday}{period}")
            .parse()
            .with_context(|| format!("invalid slot {weekday}{period}"))?;
        let teacher = rec.get(2).context("missing teacher_id")?.trim().to_string();
        let student = rec.get(4).context("missing student_id")?.trim().to_string();
        out.push(Assignment {
            slot,
            student,
            teacher,
        });
    }
    Ok(out)
}

/// Rapport JSON d'une exécution.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub generated_at: DateTime<Utc>,
    pub assigned: usize,
    pub unmatched_students: Vec<String>,
    pub schedule: ScheduleGrid,
}

/// Export JSON du rapport (jolie mise en forme)
pub fn export_report_json<P: AsRef<Path>>(path: P, report: &ScheduleReport) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(report)?;
    write_atomic(path.as_ref(), &json)
}

/// Écrit via un fichier temporaire du même dossier puis renomme.
fn write_atomic(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}
