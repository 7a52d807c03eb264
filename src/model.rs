use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Jour de la semaine, codé `M T W R F S U` dans les fiches d'inscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn code(self) -> char {
        match self {
            Weekday::Monday => 'M',
            Weekday::Tuesday => 'T',
            Weekday::Wednesday => 'W',
            Weekday::Thursday => 'R',
            Weekday::Friday => 'F',
            Weekday::Saturday => 'S',
            Weekday::Sunday => 'U',
        }
    }

    pub fn from_code(c: char) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.code() == c.to_ascii_uppercase())
    }

    /// Rang 0..7 (lundi = 0)
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Période de cours : `1`..`10` en journée, `A`..`D` le soir.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    P7,
    P8,
    P9,
    P10,
    A,
    B,
    C,
    D,
}

impl Period {
    pub const ALL: [Period; 14] = [
        Period::P1,
        Period::P2,
        Period::P3,
        Period::P4,
        Period::P5,
        Period::P6,
        Period::P7,
        Period::P8,
        Period::P9,
        Period::P10,
        Period::A,
        Period::B,
        Period::C,
        Period::D,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Period::P1 => "1",
            Period::P2 => "2",
            Period::P3 => "3",
            Period::P4 => "4",
            Period::P5 => "5",
            Period::P6 => "6",
            Period::P7 => "7",
            Period::P8 => "8",
            Period::P9 => "9",
            Period::P10 => "10",
            Period::A => "A",
            Period::B => "B",
            Period::C => "C",
            Period::D => "D",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.code().eq_ignore_ascii_case(s))
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty slot code")]
    Empty,
    #[error("unknown weekday in slot code: {0}")]
    UnknownWeekday(String),
    #[error("unknown period in slot code: {0}")]
    UnknownPeriod(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Créneau hebdomadaire discret (jour, période).
///
/// Forme texte : code du jour suivi du code de période, par ex. `M1`, `R10`, `FA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(into = "String", try_from = "String")
)]
pub struct TimeSlot {
    pub weekday: Weekday,
    pub period: Period,
}

impl TimeSlot {
    pub fn new(weekday: Weekday, period: Period) -> Self {
        Self { weekday, period }
    }

    /// Les 98 créneaux de la semaine, jour par jour.
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        Weekday::ALL
            .into_iter()
            .flat_map(|d| Period::ALL.into_iter().map(move |p| TimeSlot::new(d, p)))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.weekday.code(), self.period.code())
    }
}

impl FromStr for TimeSlot {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let day = chars.next().ok_or(ParseError::Empty)?;
        let weekday =
            Weekday::from_code(day).ok_or_else(|| ParseError::UnknownWeekday(s.to_string()))?;
        let period = Period::from_code(chars.as_str())
            .ok_or_else(|| ParseError::UnknownPeriod(s.to_string()))?;
        Ok(Self { weekday, period })
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Élève : charge utile opaque + disponibilités.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student<P> {
    pub payload: P,
    pub availability: BTreeSet<TimeSlot>,
}

impl<P> Student<P> {
    pub fn new<I: IntoIterator<Item = TimeSlot>>(payload: P, availability: I) -> Self {
        Self {
            payload,
            availability: availability.into_iter().collect(),
        }
    }
}

/// Professeur : charge utile opaque, disponibilités et nombre maximal d'élèves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher<P> {
    pub payload: P,
    pub availability: BTreeSet<TimeSlot>,
    pub capacity: u32,
}

impl<P> Teacher<P> {
    /// Capacité par défaut : 1 élève.
    pub fn new<I: IntoIterator<Item = TimeSlot>>(payload: P, availability: I) -> Self {
        Self {
            payload,
            availability: availability.into_iter().collect(),
            capacity: 1,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Triplet (créneau, élève, professeur) retenu dans le planning.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment<S, T> {
    pub slot: TimeSlot,
    pub student: S,
    pub teacher: T,
}

/// Rôle déclaré à l'inscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teacher" | "t" | "prof" => Ok(Role::Teacher),
            "student" | "s" | "eleve" | "élève" => Ok(Role::Student),
            other => Err(ParseError::UnknownRole(other.to_string())),
        }
    }
}

/// Fiche d'inscription telle que fournie par le registre.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Registration {
    pub student_id: String,
    pub name: String,
    pub role: Role,
    #[cfg_attr(feature = "serde", serde(default))]
    pub availability: BTreeSet<TimeSlot>,
    /// Ignoré pour les élèves ; `None` vaut 1 pour un professeur.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub capacity: Option<u32>,
}

impl Registration {
    pub fn new<I, N, A>(student_id: I, name: N, role: Role, availability: A) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        A: IntoIterator<Item = TimeSlot>,
    {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            role,
            availability: availability.into_iter().collect(),
            capacity: None,
        }
    }
}

/// Ensemble des inscriptions d'une session de planification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Registry {
    pub registrations: Vec<Registration>,
}

impl Registry {
    pub fn new(registrations: Vec<Registration>) -> Self {
        Self { registrations }
    }

    pub fn find_by_student_id<'a>(&'a self, student_id: &str) -> Option<&'a Registration> {
        self.registrations
            .iter()
            .find(|r| r.student_id == student_id)
    }

    /// Élèves, la fiche servant de charge utile.
    pub fn students(&self) -> Vec<Student<&Registration>> {
        self.registrations
            .iter()
            .filter(|r| r.role == Role::Student)
            .map(|r| Student::new(r, r.availability.iter().copied()))
            .collect()
    }

    /// Professeurs, capacité explicite ou 1.
    pub fn teachers(&self) -> Vec<Teacher<&Registration>> {
        self.registrations
            .iter()
            .filter(|r| r.role == Role::Teacher)
            .map(|r| {
                Teacher::new(r, r.availability.iter().copied())
                    .with_capacity(r.capacity.unwrap_or(1))
            })
            .collect()
    }
}
