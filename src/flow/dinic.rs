use super::residual::Residual;
use super::{validate_network, FlowArc, FlowSolution, MaxFlowSolver, SolverError};
use std::collections::VecDeque;

/// Algorithme de Dinic (graphe de niveaux + flots bloquants), O(V²E).
#[derive(Debug, Default, Clone, Copy)]
pub struct Dinic;

impl MaxFlowSolver for Dinic {
    fn solve(
        &self,
        node_count: usize,
        arcs: &[FlowArc],
        source: usize,
        sink: usize,
    ) -> Result<FlowSolution, SolverError> {
        validate_network(node_count, arcs, source, sink)?;

        let mut graph = Residual::build(node_count, arcs);
        let mut level = vec![usize::MAX; node_count];
        let mut cursor = vec![0usize; node_count];
        let mut value = 0u64;

        while build_levels(&graph, source, sink, &mut level) {
            cursor.fill(0);
            value += blocking_flow(&mut graph, source, sink, &level, &mut cursor);
        }

        Ok(graph.into_solution(value))
    }
}

fn build_levels(graph: &Residual, source: usize, sink: usize, level: &mut [usize]) -> bool {
    level.fill(usize::MAX);
    level[source] = 0;
    let mut queue = VecDeque::with_capacity(graph.node_count());
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        for &edge in &graph.adjacency[v] {
            let w = graph.head[edge];
            if graph.remaining[edge] > 0 && level[w] == usize::MAX {
                level[w] = level[v] + 1;
                queue.push_back(w);
            }
        }
    }

    level[sink] != usize::MAX
}

/// Flot bloquant sur le graphe de niveaux, en profondeur avec une pile
/// explicite d'arêtes ; `cursor` retient le premier arc encore utilisable.
fn blocking_flow(
    graph: &mut Residual,
    source: usize,
    sink: usize,
    level: &[usize],
    cursor: &mut [usize],
) -> u64 {
    let mut total = 0u64;
    let mut path: Vec<usize> = Vec::new();
    let mut v = source;

    loop {
        if v == sink {
            let pushed = path
                .iter()
                .map(|&edge| graph.remaining[edge])
                .min()
                .unwrap_or(0);
            for &edge in &path {
                graph.push(edge, pushed);
            }
            total += pushed;
            // on repart de l'origine de la première arête saturée
            let cut = path
                .iter()
                .position(|&edge| graph.remaining[edge] == 0)
                .unwrap_or(0);
            path.truncate(cut);
            v = path.last().map_or(source, |&edge| graph.head[edge]);
            continue;
        }

        match admissible_edge(graph, v, level, cursor) {
            Some(edge) => {
                path.push(edge);
                v = graph.head[edge];
            }
            None => match path.pop() {
                // impasse : l'arête qui y mène est abandonnée
                Some(edge) => {
                    v = graph.head[edge ^ 1];
                    cursor[v] += 1;
                }
                None => return total,
            },
        }
    }
}

fn admissible_edge(
    graph: &Residual,
    v: usize,
    level: &[usize],
    cursor: &mut [usize],
) -> Option<usize> {
    while cursor[v] < graph.adjacency[v].len() {
        let edge = graph.adjacency[v][cursor[v]];
        let w = graph.head[edge];
        if graph.remaining[edge] > 0 && level[w] == level[v] + 1 {
            return Some(edge);
        }
        cursor[v] += 1;
    }
    None
}
