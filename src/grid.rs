use crate::model::{Assignment, Period, Registration, TimeSlot, Weekday};
#[cfg(feature = "serde")]
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Nom affiché quand une fiche n'a pas de nom.
pub const NO_NAME: &str = "<no name>";

/// Donne un nom lisible à une charge utile.
pub trait DisplayName {
    fn display_name(&self) -> &str;
}

impl DisplayName for Registration {
    fn display_name(&self) -> &str {
        &self.name
    }
}

impl DisplayName for String {
    fn display_name(&self) -> &str {
        self
    }
}

impl DisplayName for str {
    fn display_name(&self) -> &str {
        self
    }
}

impl<T: DisplayName + ?Sized> DisplayName for &T {
    fn display_name(&self) -> &str {
        (**self).display_name()
    }
}

/// Couple professeur / élève occupant un créneau.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pairing {
    pub teacher: String,
    pub student: String,
}

/// Grille dense 7 jours × 14 périodes ; une case vide = créneau non attribué.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleGrid {
    cells: Vec<Vec<Option<Pairing>>>,
}

impl Default for ScheduleGrid {
    fn default() -> Self {
        Self {
            cells: vec![vec![None; Period::ALL.len()]; Weekday::ALL.len()],
        }
    }
}

impl ScheduleGrid {
    pub fn from_assignments<S: DisplayName, T: DisplayName>(
        assignments: &[Assignment<S, T>],
    ) -> Self {
        let mut grid = Self::default();
        for a in assignments {
            grid.set(
                a.slot,
                Pairing {
                    teacher: label(a.teacher.display_name()),
                    student: label(a.student.display_name()),
                },
            );
        }
        grid
    }

    pub fn get(&self, slot: TimeSlot) -> Option<&Pairing> {
        self.cells[slot.weekday.index()][slot.period.index()].as_ref()
    }

    pub fn set(&mut self, slot: TimeSlot, pairing: Pairing) {
        self.cells[slot.weekday.index()][slot.period.index()] = Some(pairing);
    }

    pub fn assigned_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Parcourt les 98 cases, jour par jour.
    pub fn iter(&self) -> impl Iterator<Item = (TimeSlot, Option<&Pairing>)> + '_ {
        TimeSlot::all().map(move |slot| (slot, self.get(slot)))
    }
}

fn label(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        NO_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// `{"M": {"1": null, ..., "D": {"teacher": .., "student": ..}}, ...}`
#[cfg(feature = "serde")]
impl Serialize for ScheduleGrid {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        struct Day<'a>(&'a [Option<Pairing>]);

        impl Serialize for Day<'_> {
            fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (period, cell) in Period::ALL.iter().zip(self.0) {
                    map.serialize_entry(period.code(), cell)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (day, row) in Weekday::ALL.iter().zip(&self.cells) {
            map.serialize_entry(&day.code().to_string(), &Day(row))?;
        }
        map.end()
    }
}

/// Rendu d'une grille (texte, HTML, etc.).
pub trait GridRenderer {
    fn render(&self, grid: &ScheduleGrid) -> String;
}

/// Tableau texte : une ligne par période, une colonne par jour.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextGrid {
    /// N'affiche que les périodes ayant au moins une affectation.
    pub skip_empty_rows: bool,
}

impl GridRenderer for TextGrid {
    fn render(&self, grid: &ScheduleGrid) -> String {
        let text = |cell: Option<&Pairing>| match cell {
            Some(p) => format!("{}/{}", p.teacher, p.student),
            None => ".".to_string(),
        };
        let width = grid
            .iter()
            .map(|(_, cell)| text(cell).chars().count())
            .max()
            .unwrap_or(1);

        let mut lines = Vec::with_capacity(Period::ALL.len() + 1);
        let mut header = String::from("  ");
        for day in Weekday::ALL {
            header.push_str(&format!(" | {:<width$}", day.code()));
        }
        lines.push(header.trim_end().to_string());

        for period in Period::ALL {
            let row: Vec<Option<&Pairing>> = Weekday::ALL
                .iter()
                .map(|&day| grid.get(TimeSlot::new(day, period)))
                .collect();
            if self.skip_empty_rows && row.iter().all(Option::is_none) {
                continue;
            }
            let mut line = format!("{:>2}", period.code());
            for cell in row {
                line.push_str(&format!(" | {:<width$}", text(cell)));
            }
            lines.push(line.trim_end().to_string());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
