use crate::model::{Student, Teacher, TimeSlot};
use std::collections::{BTreeSet, HashMap};

/// Créneaux distincts d'une exécution, chacun avec un indice stable à partir de 0.
#[derive(Debug, Clone, Default)]
pub struct SlotCatalog {
    slots: Vec<TimeSlot>,
    index: HashMap<TimeSlot, usize>,
}

impl SlotCatalog {
    /// Union des disponibilités de tous les participants.
    pub fn from_participants<P, Q>(students: &[Student<P>], teachers: &[Teacher<Q>]) -> Self {
        let slots = students
            .iter()
            .flat_map(|s| s.availability.iter())
            .chain(teachers.iter().flat_map(|t| t.availability.iter()))
            .copied();
        Self::from_slots(slots)
    }

    pub fn from_slots<I: IntoIterator<Item = TimeSlot>>(slots: I) -> Self {
        let slots: Vec<TimeSlot> = slots
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index = slots.iter().enumerate().map(|(i, s)| (*s, i)).collect();
        Self { slots, index }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn index_of(&self, slot: &TimeSlot) -> Option<usize> {
        self.index.get(slot).copied()
    }

    pub fn slot(&self, index: usize) -> Option<TimeSlot> {
        self.slots.get(index).copied()
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }
}
