use super::residual::Residual;
use super::{validate_network, FlowArc, FlowSolution, MaxFlowSolver, SolverError};
use std::collections::VecDeque;

/// Chemins augmentants les plus courts (BFS), O(VE²).
#[derive(Debug, Default, Clone, Copy)]
pub struct EdmondsKarp;

impl MaxFlowSolver for EdmondsKarp {
    fn solve(
        &self,
        node_count: usize,
        arcs: &[FlowArc],
        source: usize,
        sink: usize,
    ) -> Result<FlowSolution, SolverError> {
        validate_network(node_count, arcs, source, sink)?;

        let mut graph = Residual::build(node_count, arcs);
        let mut value = 0u64;

        while let Some(path) = shortest_path(&graph, source, sink) {
            let bottleneck = path
                .iter()
                .map(|&edge| graph.remaining[edge])
                .min()
                .unwrap_or(0);
            if bottleneck == 0 {
                break;
            }
            for &edge in &path {
                graph.push(edge, bottleneck);
            }
            value += bottleneck;
        }

        Ok(graph.into_solution(value))
    }
}

/// Arêtes du plus court chemin résiduel, de la source vers le puits.
fn shortest_path(graph: &Residual, source: usize, sink: usize) -> Option<Vec<usize>> {
    let mut via: Vec<Option<usize>> = vec![None; graph.node_count()];
    let mut seen = vec![false; graph.node_count()];
    seen[source] = true;
    let mut queue = VecDeque::from([source]);

    while let Some(v) = queue.pop_front() {
        if v == sink {
            break;
        }
        for &edge in &graph.adjacency[v] {
            let w = graph.head[edge];
            if graph.remaining[edge] > 0 && !seen[w] {
                seen[w] = true;
                via[w] = Some(edge);
                queue.push_back(w);
            }
        }
    }

    if !seen[sink] {
        return None;
    }

    let mut path = Vec::new();
    let mut v = sink;
    while let Some(edge) = via[v] {
        path.push(edge);
        // l'arête retour (edge ^ 1) pointe vers l'origine de `edge`
        v = graph.head[edge ^ 1];
    }
    path.reverse();
    Some(path)
}
