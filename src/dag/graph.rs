//! Graph - directed step graph with per-node levels
//!
//! Adjacency is kept per source node as an ordered edge list; the order is
//! the order edges were added, and the level rule depends on it. Every node
//! also carries a level (its stage in the pipeline, roots at 1).
//!
//! A `Graph` is immutable once built. The only way to add edges is through
//! [`GraphBuilder`](super::GraphBuilder), so a graph shared between threads
//! is never observed half-built.
//!
//! Querying a node the graph does not contain (`level_of`, `edges_from`, or
//! a traversal starting there) panics: it means the caller asked about a step
//! of a different pipeline variant. Use [`Graph::contains`] to guard input
//! that comes from outside.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Stack-allocated edge list: workflow steps fan out to at most 4 successors
type EdgeVec<T> = SmallVec<[T; 4]>;

/// Directed graph over node values `T`
#[derive(Debug, Clone)]
pub struct Graph<T> {
    /// node -> ordered successor list
    edges: FxHashMap<T, EdgeVec<T>>,
    /// node -> level (1 for roots)
    levels: FxHashMap<T, u32>,
    /// Registration order for deterministic iteration
    insertion_order: Vec<T>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self {
            edges: FxHashMap::default(),
            levels: FxHashMap::default(),
            insertion_order: Vec::new(),
        }
    }
}

impl<T> Graph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the edge `from -> to` and assigns levels.
    ///
    /// - a new source gets level 1 (or its stored level + 1) and `to` sits one
    ///   level below it
    /// - a source that already has successors keeps the fan-out on one
    ///   level: `to` takes the level of the last successor added
    /// - a registered source with no successors yet puts `to` at its level + 1
    ///
    /// When several sources feed the same node, the last call decides its
    /// level.
    pub(super) fn insert_edge(&mut self, from: T, to: T) {
        let to_level = match self.edges.get_mut(&from) {
            Some(targets) => {
                let level = match targets.last() {
                    Some(last) => self.levels[last],
                    None => self.levels.get(&from).map_or(1, |l| l + 1),
                };
                targets.push(to.clone());
                level
            }
            None => {
                let from_level = self.levels.get(&from).map_or(1, |l| l + 1);
                let mut targets = EdgeVec::new();
                targets.push(to.clone());
                self.edges.insert(from.clone(), targets);
                self.insertion_order.push(from.clone());
                self.levels.insert(from, from_level);
                from_level + 1
            }
        };
        self.levels.insert(to.clone(), to_level);

        if !self.edges.contains_key(&to) {
            self.edges.insert(to.clone(), EdgeVec::new());
            self.insertion_order.push(to.clone());
        }

        // Settle on the level stored for `to` as an edge target; 1 if nothing points at it.
        let settled = if self.edges.values().any(|targets| targets.contains(&to)) {
            self.levels[&to]
        } else {
            1
        };
        trace!(?to, level = settled, "edge added");
        self.levels.insert(to, settled);
    }

    /// Number of registered nodes
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: &T) -> bool {
        self.edges.contains_key(node)
    }

    /// All nodes, in the order they were first registered
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.insertion_order.iter()
    }

    /// Successors of `node`, in insertion order
    ///
    /// # Panics
    ///
    /// If `node` was never registered.
    pub fn edges_from(&self, node: &T) -> &[T] {
        match self.edges.get(node) {
            Some(targets) => targets.as_slice(),
            None => panic!("{node:?} is not a node of this graph"),
        }
    }

    /// Level of `node` (1 for roots)
    ///
    /// # Panics
    ///
    /// If `node` was never registered.
    pub fn level_of(&self, node: &T) -> u32 {
        match self.levels.get(node) {
            Some(level) => *level,
            None => panic!("{node:?} is not a node of this graph"),
        }
    }

    /// Nodes with no incoming edge, in insertion order
    pub fn roots(&self) -> Vec<T> {
        let targets: FxHashSet<&T> = self.edges.values().flatten().collect();
        self.insertion_order
            .iter()
            .filter(|node| !targets.contains(node))
            .cloned()
            .collect()
    }

    /// Every node reachable from `start` (including `start` itself), BFS
    fn reachable_from(&self, start: &T) -> FxHashSet<T> {
        let mut visited: FxHashSet<T> =
            FxHashSet::with_capacity_and_hasher(self.len(), Default::default());
        let mut queue: VecDeque<&T> = VecDeque::new();

        visited.insert(start.clone());
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for next in self.edges_from(current) {
                if visited.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }

    /// Downstream closure of `start`: every node that must run if these do
    ///
    /// The result includes the start nodes themselves.
    pub fn all_implied_by<'a, I>(&self, start: I) -> FxHashSet<T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut result = FxHashSet::default();
        for node in start {
            result.extend(self.reachable_from(node));
        }
        debug!(implied = result.len(), "computed downstream closure");
        result
    }

    /// Minimal subset of `start` whose closure covers the closure of `start`
    ///
    /// A node is dropped when another member of `start` reaches it. Order of
    /// first appearance in `start` is kept; duplicates collapse.
    pub fn minimal_roots_for<'a, I>(&self, start: I) -> Vec<T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let requested = dedup(start);
        let closures: Vec<FxHashSet<T>> = requested
            .iter()
            .map(|node| self.reachable_from(node))
            .collect();

        let roots: Vec<T> = requested
            .iter()
            .enumerate()
            .filter(|(i, node)| {
                !closures
                    .iter()
                    .enumerate()
                    .any(|(j, closure)| j != *i && closure.contains(*node))
            })
            .map(|(_, node)| node.clone())
            .collect();

        debug!(
            requested = requested.len(),
            roots = roots.len(),
            "reduced to minimal roots"
        );
        roots
    }

    /// Orders `nodes` by level, then by registration order
    ///
    /// # Panics
    ///
    /// If any node was never registered.
    pub fn sort_by_level<'a, I>(&self, nodes: I) -> Vec<T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let position: FxHashMap<&T, usize> = self
            .insertion_order
            .iter()
            .enumerate()
            .map(|(i, node)| (node, i))
            .collect();

        let mut sorted = dedup(nodes);
        sorted.sort_by_key(|node| (self.level_of(node), position[node]));
        sorted
    }
}

/// Collapses duplicates, keeping first occurrence order
fn dedup<'a, T, I>(nodes: I) -> Vec<T>
where
    T: Clone + Eq + Hash + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut seen: FxHashSet<&T> = FxHashSet::default();
    nodes
        .into_iter()
        .filter(|node| seen.insert(*node))
        .cloned()
        .collect()
}
