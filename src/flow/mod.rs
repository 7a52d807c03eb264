//! Flot maximum source → puits sur un graphe orienté à capacités entières.
//!
//! Le planificateur ne dépend que du trait [`MaxFlowSolver`] ; deux
//! implémentations sont fournies : [`Dinic`] (par défaut) et
//! [`EdmondsKarp`] (référence, plus lente, utile pour les vérifications croisées).

mod dinic;
mod edmonds_karp;
mod residual;

pub use dinic::Dinic;
pub use edmonds_karp::EdmondsKarp;

use thiserror::Error;

/// Arc `tail → head` de capacité `capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowArc {
    pub tail: usize,
    pub head: usize,
    pub capacity: u32,
}

/// Résultat d'un calcul : valeur totale et flot porté par chaque arc
/// (même ordre que la liste d'arcs fournie).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowSolution {
    pub value: u64,
    pub flows: Vec<u32>,
}

impl FlowSolution {
    pub fn flow(&self, arc: usize) -> u32 {
        self.flows.get(arc).copied().unwrap_or(0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("source and sink must differ (node {0})")]
    SourceIsSink(usize),
    #[error("node {node} out of range (graph has {node_count} nodes)")]
    NodeOutOfRange { node: usize, node_count: usize },
    #[error("solver failed: {0}")]
    Failed(String),
}

/// Capacité de flot maximum, injectable dans le planificateur.
pub trait MaxFlowSolver {
    /// Calcule un flot maximum de `source` vers `sink`.
    fn solve(
        &self,
        node_count: usize,
        arcs: &[FlowArc],
        source: usize,
        sink: usize,
    ) -> Result<FlowSolution, SolverError>;
}

impl<S: MaxFlowSolver + ?Sized> MaxFlowSolver for &S {
    fn solve(
        &self,
        node_count: usize,
        arcs: &[FlowArc],
        source: usize,
        sink: usize,
    ) -> Result<FlowSolution, SolverError> {
        (**self).solve(node_count, arcs, source, sink)
    }
}

impl<S: MaxFlowSolver + ?Sized> MaxFlowSolver for Box<S> {
    fn solve(
        &self,
        node_count: usize,
        arcs: &[FlowArc],
        source: usize,
        sink: usize,
    ) -> Result<FlowSolution, SolverError> {
        (**self).solve(node_count, arcs, source, sink)
    }
}

pub(crate) fn validate_network(
    node_count: usize,
    arcs: &[FlowArc],
    source: usize,
    sink: usize,
) -> Result<(), SolverError> {
    let check = |node: usize| {
        if node < node_count {
            Ok(())
        } else {
            Err(SolverError::NodeOutOfRange { node, node_count })
        }
    };
    check(source)?;
    check(sink)?;
    if source == sink {
        return Err(SolverError::SourceIsSink(source));
    }
    for arc in arcs {
        check(arc.tail)?;
        check(arc.head)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(tail: usize, head: usize, capacity: u32) -> FlowArc {
        FlowArc {
            tail,
            head,
            capacity,
        }
    }

    // Exemple classique (CLRS 26.1) : flot maximum 23.
    fn clrs() -> Vec<FlowArc> {
        vec![
            arc(0, 1, 16),
            arc(0, 2, 13),
            arc(1, 3, 12),
            arc(2, 1, 4),
            arc(2, 4, 14),
            arc(3, 2, 9),
            arc(3, 5, 20),
            arc(4, 3, 7),
            arc(4, 5, 4),
        ]
    }

    fn assert_feasible(arcs: &[FlowArc], sol: &FlowSolution, n: usize, s: usize, t: usize) {
        assert_eq!(sol.flows.len(), arcs.len());
        let mut balance = vec![0i64; n];
        for (a, &f) in arcs.iter().zip(&sol.flows) {
            assert!(f <= a.capacity);
            balance[a.tail] -= i64::from(f);
            balance[a.head] += i64::from(f);
        }
        for (v, b) in balance.iter().enumerate() {
            if v == s {
                assert_eq!(*b, -(sol.value as i64));
            } else if v == t {
                assert_eq!(*b, sol.value as i64);
            } else {
                assert_eq!(*b, 0, "conservation broken at node {v}");
            }
        }
    }

    #[test]
    fn solvers_agree_on_textbook_network() {
        let arcs = clrs();
        for solver in [&Dinic as &dyn MaxFlowSolver, &EdmondsKarp] {
            let sol = solver.solve(6, &arcs, 0, 5).unwrap();
            assert_eq!(sol.value, 23);
            assert_feasible(&arcs, &sol, 6, 0, 5);
        }
    }

    #[test]
    fn disconnected_sink_gives_zero_flow() {
        let arcs = vec![arc(0, 1, 5), arc(2, 3, 5)];
        let sol = Dinic.solve(4, &arcs, 0, 3).unwrap();
        assert_eq!(sol.value, 0);
        assert_eq!(sol.flows, vec![0, 0]);
    }

    #[test]
    fn parallel_arcs_and_zero_capacity() {
        let arcs = vec![arc(0, 1, 2), arc(0, 1, 3), arc(1, 2, 0), arc(1, 2, 4)];
        let sol = EdmondsKarp.solve(3, &arcs, 0, 2).unwrap();
        assert_eq!(sol.value, 4);
        assert_eq!(sol.flow(2), 0);
        assert_feasible(&arcs, &sol, 3, 0, 2);
    }

    #[test]
    fn long_chain_is_solved_without_recursion() {
        let n = 50_000;
        let arcs: Vec<FlowArc> = (0..n - 1).map(|v| arc(v, v + 1, 1)).collect();
        for solver in [&Dinic as &dyn MaxFlowSolver, &EdmondsKarp] {
            let sol = solver.solve(n, &arcs, 0, n - 1).unwrap();
            assert_eq!(sol.value, 1);
            assert!(sol.flows.iter().all(|&f| f == 1));
        }
    }

    #[test]
    fn blocking_flow_resumes_after_saturated_edge() {
        // deux chemins partagent 0→1 ; 1→2 sature avant 1→3
        let arcs = vec![
            arc(0, 1, 3),
            arc(1, 2, 1),
            arc(1, 3, 5),
            arc(2, 4, 5),
            arc(3, 4, 5),
        ];
        let sol = Dinic.solve(5, &arcs, 0, 4).unwrap();
        assert_eq!(sol.value, 3);
        assert_eq!(sol.flows, vec![3, 1, 2, 1, 2]);
        assert_feasible(&arcs, &sol, 5, 0, 4);
    }

    #[test]
    fn invalid_networks_are_reported() {
        let err = Dinic.solve(2, &[], 1, 1).unwrap_err();
        assert_eq!(err, SolverError::SourceIsSink(1));
        assert_eq!(
            Dinic.solve(2, &[arc(0, 7, 1)], 0, 1),
            Err(SolverError::NodeOutOfRange {
                node: 7,
                node_count: 2
            })
        );
        assert!(EdmondsKarp.solve(0, &[], 0, 1).is_err());
    }
}
