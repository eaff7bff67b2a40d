//! The adjacency structure of the unblocked cells of a board.
//!
//! Blocked cells are removed from the grid graph, so a block either leaves the remaining cells connected or splits them.
//! Articulation points ("cut vertices") are the cells whose removal would split them.

use std::collections::{HashMap, HashSet};

use petgraph::algo::connected_components;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;

use crate::board::Board;
use crate::location::Location;
use crate::shape::SquareStep;

/// A snapshot of the graph of unblocked cells and its articulation points.
///
/// This is derived from a [`Board`] and does not follow it; rebuild it with [`Structure::of`] after a block is placed.
/// Placing numbers never changes it.
pub struct Structure {
    pub(crate) graph: UnGraphMap<Location, ()>,
    articulation: HashSet<Location>,
}

impl Structure {
    /// Build the graph of unblocked cells with 4-directional adjacency and find its articulation points.
    pub fn of(board: &Board) -> Self {
        let size = board.size().get();
        let mut graph = UnGraphMap::with_capacity(
            size * size,
            // "horizontal" and "vertical" edges of a complete grid
            2 * size * (size - 1),
        );

        for (location, cell) in board.cells() {
            if cell.blocked {
                continue;
            }

            graph.add_node(location);
            // add edges down and to the right, if possible
            for direction in [SquareStep::Down, SquareStep::Right] {
                if let Some((other, neighbor)) = board.neighbor(location, direction) {
                    if !neighbor.blocked {
                        graph.add_edge(location, other, ());
                    }
                }
            }
        }

        let articulation = articulation_points(&graph, graph.nodes());
        Self { graph, articulation }
    }

    /// The number of unblocked cells.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The number of connected components, 0 for a board with nothing unblocked.
    pub fn components(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Flood fill from an arbitrary unblocked cell and check that it reaches every other one.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.graph.nodes().next() else { return true };

        let mut reached = 0;
        let mut bfs = Bfs::new(&self.graph, start);
        while bfs.next(&self.graph).is_some() {
            reached += 1;
        }

        reached == self.graph.node_count()
    }

    /// Every unblocked cell whose removal would split its region.
    pub fn articulation_points(&self) -> &HashSet<Location> {
        &self.articulation
    }

    pub fn articulation_count(&self) -> usize {
        self.articulation.len()
    }

    pub fn is_cut_vertex(&self, location: Location) -> bool {
        self.articulation.contains(&location)
    }

    /// The number of unblocked neighbors of `location`; 0 if `location` is itself blocked.
    pub fn degree(&self, location: Location) -> usize {
        if self.graph.contains_node(location) {
            self.graph.neighbors(location).count()
        } else {
            0
        }
    }

    /// Whether removing `location` leaves at most one connected component.
    ///
    /// On a connected graph this is exactly "not a cut vertex".
    /// Should the graph already be split, fall back to removing the node from a scratch copy and counting.
    pub fn can_remove(&self, location: Location) -> bool {
        if !self.graph.contains_node(location) {
            return false;
        }

        if self.is_connected() {
            return !self.is_cut_vertex(location);
        }

        let mut scratch = self.graph.clone();
        scratch.remove_node(location);
        connected_components(&scratch) <= 1
    }
}

/// Depth-first search state for Tarjan's low-link algorithm.
struct LowLink<'a> {
    graph: &'a UnGraphMap<Location, ()>,
    // discovery order of each visited node
    index: HashMap<Location, usize>,
    // lowest discovery index reachable through the subtree and one back edge
    low: HashMap<Location, usize>,
    found: HashSet<Location>,
}

impl LowLink<'_> {
    fn visit(&mut self, at: Location, parent: Option<Location>) {
        let id = self.index.len();
        self.index.insert(at, id);
        self.low.insert(at, id);

        let graph = self.graph;
        let mut children = 0;
        for to in graph.neighbors(at) {
            match self.index.get(&to).copied() {
                None => {
                    children += 1;
                    self.visit(to, Some(at));

                    let low_to = self.low[&to];
                    if low_to < self.low[&at] {
                        self.low.insert(at, low_to);
                    }
                    // the child's subtree cannot climb above `at` without it
                    if parent.is_some() && low_to >= id {
                        self.found.insert(at);
                    }
                }
                Some(to_id) if Some(to) != parent => {
                    if to_id < self.low[&at] {
                        self.low.insert(at, to_id);
                    }
                }
                _ => {}
            }
        }

        if parent.is_none() && children > 1 {
            self.found.insert(at);
        }
    }
}

/// Find every articulation point of `graph`, starting a new search tree from each node of `starts` not yet visited.
///
/// The result is a set and does not depend on the order of `starts`.
pub(crate) fn articulation_points(graph: &UnGraphMap<Location, ()>, starts: impl Iterator<Item=Location>) -> HashSet<Location> {
    let mut search = LowLink {
        graph,
        index: HashMap::with_capacity(graph.node_count()),
        low: HashMap::with_capacity(graph.node_count()),
        found: HashSet::new(),
    };

    for start in starts {
        if !search.index.contains_key(&start) {
            search.visit(start, None);
        }
    }

    search.found
}
