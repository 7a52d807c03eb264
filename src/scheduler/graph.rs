use super::{catalog::SlotCatalog, SchedError};
use crate::flow::FlowArc;
use crate::model::{Student, Teacher, TimeSlot};
use std::collections::HashMap;

/// Nature d'un nœud du réseau de flot.
///
/// Chaque élève, créneau et professeur est dédoublé en entrée/sortie : l'arc
/// interne porte la capacité de l'entité, indépendamment des arcs de disponibilité.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Source,
    StudentIn(usize),
    StudentOut(usize),
    SlotIn(usize),
    SlotOut(usize),
    TeacherIn(usize),
    TeacherOut(usize),
    Sink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Réseau source → élèves → créneaux → professeurs → puits.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    nodes: Vec<NodeKind>,
    index: HashMap<NodeKind, NodeId>,
    arcs: Vec<FlowArc>,
    slot_arcs: Vec<usize>,
}

impl FlowGraph {
    pub fn build<P, Q>(
        students: &[Student<P>],
        teachers: &[Teacher<Q>],
        catalog: &SlotCatalog,
    ) -> Result<Self, SchedError> {
        let mut graph = FlowGraph::default();

        graph.add_node(NodeKind::Source);
        for i in 0..students.len() {
            graph.add_node(NodeKind::StudentIn(i));
            graph.add_node(NodeKind::StudentOut(i));
        }
        for s in 0..catalog.len() {
            graph.add_node(NodeKind::SlotIn(s));
            graph.add_node(NodeKind::SlotOut(s));
        }
        for j in 0..teachers.len() {
            graph.add_node(NodeKind::TeacherIn(j));
            graph.add_node(NodeKind::TeacherOut(j));
        }
        graph.add_node(NodeKind::Sink);

        for (i, student) in students.iter().enumerate() {
            graph.add_arc(NodeKind::Source, NodeKind::StudentIn(i), 1)?;
            graph.add_arc(NodeKind::StudentIn(i), NodeKind::StudentOut(i), 1)?;
            for slot in &student.availability {
                let s = slot_index(catalog, slot)?;
                graph.add_arc(NodeKind::StudentOut(i), NodeKind::SlotIn(s), 1)?;
            }
        }

        for s in 0..catalog.len() {
            let arc = graph.add_arc(NodeKind::SlotIn(s), NodeKind::SlotOut(s), 1)?;
            graph.slot_arcs.push(arc);
        }

        for (j, teacher) in teachers.iter().enumerate() {
            for slot in &teacher.availability {
                let s = slot_index(catalog, slot)?;
                graph.add_arc(NodeKind::SlotOut(s), NodeKind::TeacherIn(j), 1)?;
            }
            graph.add_arc(
                NodeKind::TeacherIn(j),
                NodeKind::TeacherOut(j),
                teacher.capacity,
            )?;
            graph.add_arc(NodeKind::TeacherOut(j), NodeKind::Sink, teacher.capacity)?;
        }

        Ok(graph)
    }

    fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(kind);
        self.index.insert(kind, id);
        id
    }

    fn add_arc(
        &mut self,
        tail: NodeKind,
        head: NodeKind,
        capacity: u32,
    ) -> Result<usize, SchedError> {
        let tail = self.require(tail)?;
        let head = self.require(head)?;
        self.arcs.push(FlowArc {
            tail: tail.index(),
            head: head.index(),
            capacity,
        });
        Ok(self.arcs.len() - 1)
    }

    fn require(&self, kind: NodeKind) -> Result<NodeId, SchedError> {
        self.node(kind).ok_or_else(|| {
            SchedError::InternalInvariantViolation(format!("node {kind:?} was never created"))
        })
    }

    pub fn node(&self, kind: NodeKind) -> Option<NodeId> {
        self.index.get(&kind).copied()
    }

    /// Nature du nœud d'indice `index` (tel qu'il apparaît dans un [`FlowArc`]).
    pub fn kind(&self, index: usize) -> Option<NodeKind> {
        self.nodes.get(index).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arcs(&self) -> &[FlowArc] {
        &self.arcs
    }

    pub fn source(&self) -> NodeId {
        NodeId(0)
    }

    pub fn sink(&self) -> NodeId {
        NodeId(self.nodes.len().saturating_sub(1))
    }

    /// Arc goulot `slot_in[s] → slot_out[s]`.
    pub fn slot_arc(&self, slot: usize) -> Option<usize> {
        self.slot_arcs.get(slot).copied()
    }
}

fn slot_index(catalog: &SlotCatalog, slot: &TimeSlot) -> Result<usize, SchedError> {
    catalog.index_of(slot).ok_or_else(|| {
        SchedError::InternalInvariantViolation(format!("slot {slot} missing from catalog"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(code: &str) -> TimeSlot {
        code.parse().unwrap()
    }

    fn capacity_between(graph: &FlowGraph, tail: NodeKind, head: NodeKind) -> Option<u32> {
        let tail = graph.node(tail)?.index();
        let head = graph.node(head)?.index();
        graph
            .arcs()
            .iter()
            .find(|a| a.tail == tail && a.head == head)
            .map(|a| a.capacity)
    }

    #[test]
    fn layered_network_shape() {
        let students = vec![
            Student::new("s1", [slot("M1"), slot("M2")]),
            Student::new("s2", [slot("M2")]),
        ];
        let teacher = Teacher::new("t1", [slot("M2"), slot("M3")]);
        let teachers = vec![teacher.with_capacity(2)];
        let catalog = SlotCatalog::from_participants(&students, &teachers);
        let graph = FlowGraph::build(&students, &teachers, &catalog).unwrap();

        // source + 2×2 élèves + 3×2 créneaux + 1×2 professeur + puits
        assert_eq!(graph.node_count(), 1 + 4 + 6 + 2 + 1);
        // élèves : 2 + 2 + disponibilités (2 + 1) ; créneaux : 3 ; professeur : 2 + 2
        assert_eq!(graph.arcs().len(), 7 + 3 + 4);
        assert_eq!(graph.kind(graph.source().index()), Some(NodeKind::Source));
        assert_eq!(graph.kind(graph.sink().index()), Some(NodeKind::Sink));

        let m2 = catalog.index_of(&slot("M2")).unwrap();
        let m3 = catalog.index_of(&slot("M3")).unwrap();
        assert_eq!(
            capacity_between(&graph, NodeKind::StudentOut(1), NodeKind::SlotIn(m2)),
            Some(1)
        );
        assert_eq!(
            capacity_between(&graph, NodeKind::SlotOut(m3), NodeKind::TeacherIn(0)),
            Some(1)
        );
        assert_eq!(
            capacity_between(&graph, NodeKind::TeacherIn(0), NodeKind::TeacherOut(0)),
            Some(2)
        );
        assert_eq!(
            capacity_between(&graph, NodeKind::TeacherOut(0), NodeKind::Sink),
            Some(2)
        );
        assert_eq!(
            capacity_between(&graph, NodeKind::StudentOut(1), NodeKind::SlotIn(m3)),
            None
        );

        let bottleneck = graph.slot_arc(m2).unwrap();
        let arc = graph.arcs()[bottleneck];
        assert_eq!(graph.kind(arc.tail), Some(NodeKind::SlotIn(m2)));
        assert_eq!(graph.kind(arc.head), Some(NodeKind::SlotOut(m2)));
        assert_eq!(arc.capacity, 1);
    }

    #[test]
    fn slot_outside_catalog_is_an_internal_error() {
        let students = vec![Student::new("s1", [slot("M1")])];
        let teachers = vec![Teacher::new("t1", [slot("M1")])];
        let catalog = SlotCatalog::from_slots([slot("T1")]);
        let err = FlowGraph::build(&students, &teachers, &catalog).unwrap_err();
        assert!(matches!(err, SchedError::InternalInvariantViolation(_)));
    }
}
