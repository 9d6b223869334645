//! Unweighted breadth-first distances over an undirected graph.

use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::VecDeque;

const UNVISITED: usize = usize::MAX;

/// Hop count from `source` to `target`, or `None` when no path exists.
///
/// A node that is not in `graph` reaches nothing.
pub fn shortest_path_length<N, E>(
    graph: &UnGraph<N, E>,
    source: NodeIndex,
    target: NodeIndex,
) -> Option<usize> {
    let n = graph.node_count();
    if source.index() >= n || target.index() >= n {
        return None;
    }
    if source == target {
        return Some(0);
    }

    let mut distance = vec![UNVISITED; graph.node_count()];
    let mut queue = VecDeque::new();
    distance[source.index()] = 0;
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = distance[v.index()] + 1;
        for w in graph.neighbors(v) {
            if distance[w.index()] != UNVISITED {
                continue;
            }
            if w == target {
                return Some(next);
            }
            distance[w.index()] = next;
            queue.push_back(w);
        }
    }

    None
}

/// Distance from `source` to every node; unreachable nodes are `None`.
///
/// A `source` outside `graph` leaves every entry `None`.
pub fn single_source_distances<N, E>(graph: &UnGraph<N, E>, source: NodeIndex) -> Vec<Option<usize>> {
    let mut distance = vec![UNVISITED; graph.node_count()];
    if source.index() >= distance.len() {
        return vec![None; distance.len()];
    }
    let mut queue = VecDeque::new();
    distance[source.index()] = 0;
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = distance[v.index()] + 1;
        for w in graph.neighbors(v) {
            if distance[w.index()] == UNVISITED {
                distance[w.index()] = next;
                queue.push_back(w);
            }
        }
    }

    distance
        .into_iter()
        .map(|d| (d != UNVISITED).then_some(d))
        .collect()
}

/// Largest distance from `source` to any node it can reach.
pub fn eccentricity<N, E>(graph: &UnGraph<N, E>, source: NodeIndex) -> usize {
    single_source_distances(graph, source)
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(len: usize) -> UnGraph<(), ()> {
        UnGraph::from_edges((0..len as u32).map(|i| (i, i + 1)))
    }

    #[test]
    fn distance_along_path() {
        let g = path(4);
        assert_eq!(shortest_path_length(&g, NodeIndex::new(0), NodeIndex::new(4)), Some(4));
        assert_eq!(shortest_path_length(&g, NodeIndex::new(3), NodeIndex::new(1)), Some(2));
        assert_eq!(shortest_path_length(&g, NodeIndex::new(2), NodeIndex::new(2)), Some(0));
    }

    #[test]
    fn unreachable_pair_has_no_distance() {
        let mut g: UnGraph<(), ()> = UnGraph::from_edges([(0, 1)]);
        let island = g.add_node(());
        assert_eq!(shortest_path_length(&g, NodeIndex::new(0), island), None);
        assert_eq!(single_source_distances(&g, NodeIndex::new(0)), vec![Some(0), Some(1), None]);
    }

    #[test]
    fn eccentricity_of_path_endpoints_and_centre() {
        let g = path(4);
        assert_eq!(eccentricity(&g, NodeIndex::new(0)), 4);
        assert_eq!(eccentricity(&g, NodeIndex::new(2)), 2);
    }

    #[test]
    fn foreign_node_reaches_nothing() {
        let g = path(2);
        let stranger = NodeIndex::new(17);
        assert_eq!(shortest_path_length(&g, stranger, NodeIndex::new(0)), None);
        assert_eq!(shortest_path_length(&g, NodeIndex::new(0), stranger), None);
        assert_eq!(single_source_distances(&g, stranger), vec![None, None, None]);
        assert_eq!(eccentricity(&g, stranger), 0);
    }

    #[test]
    fn isolated_node_has_zero_eccentricity() {
        let mut g: UnGraph<(), ()> = UnGraph::default();
        let only = g.add_node(());
        assert_eq!(eccentricity(&g, only), 0);
    }
}
