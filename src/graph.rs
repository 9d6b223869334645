use csv::{ReaderBuilder, StringRecord, Trim};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Simple undirected interaction graph keyed by user identifier.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    graph: UnGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl InteractionGraph {
    /// Reads an edge list with `Source` and `Target` columns.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new().trim(Trim::All).from_path(path)?;
        let headers = reader.headers()?.clone();
        let source = column(&headers, "Source", path)?;
        let target = column(&headers, "Target", path)?;

        let mut built = Self::default();
        for record in reader.records() {
            let record = record?;
            built.add_edge(&record[source], &record[target]);
        }

        info!(
            file = %path.display(),
            nodes = built.node_count(),
            edges = built.edge_count(),
            "loaded interaction graph"
        );
        Ok(built)
    }

    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut built = Self::default();
        for (a, b) in edges {
            built.add_edge(a.as_ref(), b.as_ref());
        }
        built
    }

    /// Adds a user with no interactions yet. Returns the existing index if present.
    pub fn add_node(&mut self, name: &str) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .node_indices
            .entry(name.to_string())
            .or_insert_with(|| graph.add_node(name.to_string()))
    }

    fn add_edge(&mut self, a: &str, b: &str) {
        let node1 = self.add_node(a);
        let node2 = self.add_node(b);

        if node1 == node2 {
            debug!(node = a, "skipping self-loop");
            return;
        }
        if self.graph.find_edge(node1, node2).is_none() {
            self.graph.add_edge(node1, node2, ());
        }
    }

    /// Restricts the graph to its largest connected component.
    ///
    /// Ties between equally sized components go to the one holding the
    /// lowest node index, so repeated loads of the same file agree.
    pub fn largest_component(&self) -> Self {
        let Some(largest) = self.components().into_iter().reduce(|best, c| {
            if c.len() > best.len() { c } else { best }
        }) else {
            return self.clone();
        };

        let keep: HashSet<NodeIndex> = largest.into_iter().collect();
        let graph = self.graph.filter_map(
            |ix, name| keep.contains(&ix).then(|| name.clone()),
            |_, _| Some(()),
        );
        let node_indices = graph
            .node_indices()
            .map(|ix| (graph[ix].clone(), ix))
            .collect();

        let restricted = InteractionGraph {
            graph,
            node_indices,
        };
        info!(
            nodes = restricted.node_count(),
            edges = restricted.edge_count(),
            dropped = self.node_count() - restricted.node_count(),
            "restricted to largest connected component"
        );
        restricted
    }

    /// Connected components in order of their lowest node index.
    ///
    /// Breadth-first, so deep sparse graphs do not grow the call stack.
    fn components(&self) -> Vec<Vec<NodeIndex>> {
        let mut visited = vec![false; self.graph.node_count()];
        let mut components = Vec::new();
        let mut queue = VecDeque::new();

        for start in self.graph.node_indices() {
            if visited[start.index()] {
                continue;
            }
            visited[start.index()] = true;
            queue.push_back(start);

            let mut component = Vec::new();
            while let Some(v) = queue.pop_front() {
                component.push(v);
                for w in self.graph.neighbors(v) {
                    if !visited[w.index()] {
                        visited[w.index()] = true;
                        queue.push_back(w);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn name(&self, node: NodeIndex) -> Option<&str> {
        self.graph.node_weight(node).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_indices.get(name).copied()
    }

    pub fn inner(&self) -> &UnGraph<String, ()> {
        &self.graph
    }
}

/// Looks up a named header, reporting the file when it is absent.
pub(crate) fn column(headers: &StringRecord, name: &'static str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn {
            file: path.display().to_string(),
            column: name,
        })
}
