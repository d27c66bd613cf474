//! Build-time construction of a [`Graph`]
//!
//! Edges go in through the builder only; `build()` hands out the finished,
//! read-only graph.

use std::fmt::Debug;
use std::hash::Hash;

use super::Graph;

/// Accumulates edges, in order, for a graph under construction
///
/// # Example
///
/// ```
/// use pipelines_workflow::dag::GraphBuilder;
///
/// let graph = GraphBuilder::new()
///     .edge("download", "convert")
///     .edge("convert", "index")
///     .build();
///
/// assert_eq!(graph.level_of(&"index"), 3);
/// ```
#[derive(Debug)]
pub struct GraphBuilder<T> {
    graph: Graph<T>,
}

impl<T> Default for GraphBuilder<T> {
    fn default() -> Self {
        Self {
            graph: Graph::default(),
        }
    }
}

impl<T> GraphBuilder<T>
where
    T: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `from -> to`: `to` may only start once `from` has completed.
    ///
    /// Order matters: see [`Graph`] for how levels follow from it. Edges are
    /// not checked for cycles.
    pub fn edge(mut self, from: T, to: T) -> Self {
        self.graph.insert_edge(from, to);
        self
    }

    /// Adds `from -> to` for every target, in order
    pub fn fan_out(mut self, from: T, targets: impl IntoIterator<Item = T>) -> Self {
        for to in targets {
            self.graph.insert_edge(from.clone(), to);
        }
        self
    }

    pub fn build(self) -> Graph<T> {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_matches_repeated_edges() {
        let by_edges = GraphBuilder::new()
            .edge(1, 2)
            .edge(2, 3)
            .edge(2, 4)
            .build();
        let by_fan_out = GraphBuilder::new().edge(1, 2).fan_out(2, [3, 4]).build();

        assert_eq!(by_edges.edges_from(&2), by_fan_out.edges_from(&2));
        for node in by_edges.nodes() {
            assert_eq!(by_edges.level_of(node), by_fan_out.level_of(node));
        }
    }

    #[test]
    fn test_empty_builder() {
        let graph: Graph<u32> = GraphBuilder::new().build();
        assert!(graph.is_empty());
    }
}
