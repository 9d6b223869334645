use petgraph::graph::{NodeIndex, UnGraph};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::InteractionGraph;

pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Number of neighbours of each node, indexed by `NodeIndex::index()`.
pub fn degree_centrality<N, E>(graph: &UnGraph<N, E>) -> Vec<usize> {
    graph
        .node_indices()
        .map(|ix| graph.neighbors(ix).count())
        .collect()
}

/// Eigenvector centrality by power iteration on `A + I`.
///
/// Starts from the uniform vector, L2-normalises after each step and stops
/// once the summed absolute change drops below `node_count * tolerance`.
pub fn eigenvector_centrality<N: Sync, E: Sync>(
    graph: &UnGraph<N, E>,
    max_iter: usize,
    tolerance: f64,
) -> Result<Vec<f64>> {
    let n = graph.node_count();
    if n == 0 {
        return Err(Error::EmptyGraph);
    }

    let mut x = vec![1.0 / n as f64; n];
    for iteration in 0..max_iter {
        let mut next: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|v| {
                let neighbours: f64 = graph.neighbors(NodeIndex::new(v)).map(|u| x[u.index()]).sum();
                x[v] + neighbours
            })
            .collect();

        let norm = next.iter().map(|s| s * s).sum::<f64>().sqrt();
        if norm > 0.0 {
            next.iter_mut().for_each(|s| *s /= norm);
        }

        let change: f64 = x.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if change < n as f64 * tolerance {
            debug!(iterations = iteration + 1, "eigenvector centrality converged");
            return Ok(x);
        }
    }

    Err(Error::ConvergenceFailed {
        iterations: max_iter,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedNode {
    pub name: String,
    pub degree: usize,
    pub eigenvector: f64,
}

/// The `n` best-connected users, by degree, with their eigenvector centrality.
///
/// Equal degrees are ordered by name.
pub fn top_connected(
    graph: &InteractionGraph,
    n: usize,
    max_iter: usize,
    tolerance: f64,
) -> Result<Vec<RankedNode>> {
    let inner = graph.inner();
    let degrees = degree_centrality(inner);
    let eigenvector = eigenvector_centrality(inner, max_iter, tolerance)?;

    let mut ranked: Vec<RankedNode> = inner
        .node_indices()
        .map(|ix| RankedNode {
            name: inner[ix].clone(),
            degree: degrees[ix.index()],
            eigenvector: eigenvector[ix.index()],
        })
        .collect();
    ranked.sort_by(|a, b| b.degree.cmp(&a.degree).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(n);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(leaves: u32) -> UnGraph<(), ()> {
        UnGraph::from_edges((1..=leaves).map(|leaf| (0, leaf)))
    }

    #[test]
    fn degree_counts_neighbours() {
        assert_eq!(degree_centrality(&star(4)), vec![4, 1, 1, 1, 1]);
    }

    #[test]
    fn star_centre_dominates() {
        let ec = eigenvector_centrality(&star(5), 1000, DEFAULT_TOLERANCE).unwrap();
        for leaf in &ec[1..] {
            assert!(ec[0] > *leaf);
            assert!((leaf - ec[1]).abs() < 1e-9);
        }
        let norm: f64 = ec.iter().map(|s| s * s).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clique_is_uniform() {
        let g: UnGraph<(), ()> = UnGraph::from_edges([(0, 1), (0, 2), (1, 2), (0, 3), (1, 3), (2, 3)]);
        let ec = eigenvector_centrality(&g, 100, DEFAULT_TOLERANCE).unwrap();
        for s in ec {
            assert!((s - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_graph_is_rejected() {
        let g: UnGraph<(), ()> = UnGraph::default();
        assert!(matches!(eigenvector_centrality(&g, 10, DEFAULT_TOLERANCE), Err(Error::EmptyGraph)));
    }

    #[test]
    fn exhausted_iterations_are_reported() {
        let result = eigenvector_centrality(&star(3), 0, DEFAULT_TOLERANCE);
        assert!(matches!(result, Err(Error::ConvergenceFailed { iterations: 0 })));
    }

    #[test]
    fn top_connected_orders_by_degree_then_name() {
        let g = InteractionGraph::from_edges([
            ("hub", "a"),
            ("hub", "b"),
            ("hub", "c"),
            ("a", "b"),
            ("c", "d"),
        ]);
        let top = top_connected(&g, 3, 1000, DEFAULT_TOLERANCE).unwrap();
        let names: Vec<&str> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["hub", "a", "b"]);
        assert_eq!(top[0].degree, 3);
        assert!(top[0].eigenvector > top[1].eigenvector);
    }
}
