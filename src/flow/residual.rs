use super::{FlowArc, FlowSolution};

/// Graphe résiduel : l'arc `i` donne l'arête directe `2i` et l'arête retour `2i + 1`.
pub(super) struct Residual {
    pub(super) adjacency: Vec<Vec<usize>>,
    pub(super) head: Vec<usize>,
    pub(super) remaining: Vec<u64>,
}

impl Residual {
    pub(super) fn build(node_count: usize, arcs: &[FlowArc]) -> Self {
        let mut adjacency = vec![Vec::new(); node_count];
        let mut head = Vec::with_capacity(arcs.len() * 2);
        let mut remaining = Vec::with_capacity(arcs.len() * 2);
        for (i, arc) in arcs.iter().enumerate() {
            adjacency[arc.tail].push(2 * i);
            head.push(arc.head);
            remaining.push(u64::from(arc.capacity));

            adjacency[arc.head].push(2 * i + 1);
            head.push(arc.tail);
            remaining.push(0);
        }
        Self {
            adjacency,
            head,
            remaining,
        }
    }

    pub(super) fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub(super) fn push(&mut self, edge: usize, amount: u64) {
        self.remaining[edge] -= amount;
        self.remaining[edge ^ 1] += amount;
    }

    /// Le flot d'un arc est la capacité accumulée sur son arête retour.
    pub(super) fn into_solution(self, value: u64) -> FlowSolution {
        let flows = self
            .remaining
            .chunks_exact(2)
            .map(|pair| u32::try_from(pair[1]).unwrap_or(u32::MAX))
            .collect();
        FlowSolution { value, flows }
    }
}
