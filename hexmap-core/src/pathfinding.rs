//! A* path search over cells
//!
//! The search only knows about cells: the graph is whatever the caller's
//! neighbor function says it is, so the same finder works for a `Grid` or any
//! other collection of cells.
//!
//! ## Layout
//! - `PathFinder::search()` - the A* loop
//! - `OpenEntry` - heap ordering (f, then tie-break, then insertion order)
//! - `PathNode` - arena node with a parent index for reconstruction

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::coord::Coordinate;

// ============================================================================
// COST MODEL
// ============================================================================

/// Source of per-cell movement costs for a search
///
/// Costs must be non-negative; infinity (or anything non-finite) marks the
/// cell impassable.
pub trait CostModel {
    fn movement_cost(&self, cell: &Cell) -> f64;
}

/// Reads the cost stored on the cell itself
#[derive(Clone, Copy, Debug, Default)]
pub struct CellCost;

impl CostModel for CellCost {
    fn movement_cost(&self, cell: &Cell) -> f64 {
        cell.movement_cost()
    }
}

impl<F: Fn(&Cell) -> f64> CostModel for F {
    fn movement_cost(&self, cell: &Cell) -> f64 {
        self(cell)
    }
}

fn is_passable(cost: f64) -> bool {
    cost.is_finite() && cost >= 0.0
}

// ============================================================================
// TYPES
// ============================================================================

/// How to order open nodes with equal f = g + h
///
/// Different choices can return different paths of the same cost.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Prefer the node closer to the goal (lower h)
    #[default]
    LowerHeuristic,
    /// Prefer the node cheaper to reach (lower g)
    LowerCost,
}

/// A found path and what it costs to walk it
#[derive(Clone, Debug)]
pub struct Route<'a> {
    /// Cells from start to end, both inclusive
    pub cells: Vec<&'a Cell>,
    /// Sum of movement costs of every cell after the start
    pub cost: f64,
}

impl Route<'_> {
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.cells.iter().map(|cell| cell.coordinate()).collect()
    }
}

/// Search node stored in the arena
#[derive(Debug)]
struct PathNode<'a> {
    cell: &'a Cell,
    /// Cost from start
    g: f64,
    /// Heuristic cost to end
    h: f64,
    parent: Option<usize>,
    closed: bool,
}

/// Heap entry; several may exist per node, only the one matching the node's
/// current g is live
#[derive(Debug)]
struct OpenEntry {
    f: f64,
    tie: f64,
    g: f64,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (lowest f first)
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.tie.total_cmp(&self.tie))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

// ============================================================================
// PATH FINDER
// ============================================================================

/// A* path finder with pluggable cost model
#[derive(Clone, Debug)]
pub struct PathFinder<C = CellCost> {
    cost: C,
    tie_break: TieBreak,
}

impl PathFinder {
    pub fn new() -> Self {
        Self::with_cost_model(CellCost)
    }
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: CostModel> PathFinder<C> {
    pub fn with_cost_model(cost: C) -> Self {
        Self {
            cost,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Hex distance; admissible while every step costs at least 1
    fn heuristic(&self, from: &Cell, goal: &Cell) -> f64 {
        from.coordinate().distance(goal.coordinate()) as f64
    }

    /// Find the cheapest path from `start` to `end`, returning only the cells
    pub fn find_path<'a, F, I>(
        &self,
        start: &'a Cell,
        end: &'a Cell,
        neighbors: F,
        max_cost: f64,
    ) -> Option<Vec<&'a Cell>>
    where
        F: FnMut(&'a Cell) -> I,
        I: IntoIterator<Item = &'a Cell>,
    {
        self.search(start, end, neighbors, max_cost)
            .map(|route| route.cells)
    }

    /// Find the cheapest path from `start` to `end` costing at most `max_cost`
    ///
    /// Entering a cell costs that cell's movement cost; the start is free.
    /// Returns `None` when either endpoint is impassable or no path fits
    /// under the ceiling. Neighbors whose accumulated cost would exceed
    /// `max_cost` are never queued.
    pub fn search<'a, F, I>(
        &self,
        start: &'a Cell,
        end: &'a Cell,
        mut neighbors: F,
        max_cost: f64,
    ) -> Option<Route<'a>>
    where
        F: FnMut(&'a Cell) -> I,
        I: IntoIterator<Item = &'a Cell>,
    {
        if !is_passable(self.cost.movement_cost(start))
            || !is_passable(self.cost.movement_cost(end))
        {
            tracing::debug!(
                "No path: endpoint {} or {} is impassable",
                start.coordinate(),
                end.coordinate()
            );
            return None;
        }
        // NaN or negative ceiling admits nothing, not even the empty walk
        if max_cost.is_nan() || max_cost < 0.0 {
            return None;
        }

        let mut nodes: Vec<PathNode<'a>> = Vec::new();
        let mut index: FxHashMap<Coordinate, usize> = FxHashMap::default();
        let mut open = BinaryHeap::new();
        let mut seq = 0u64;
        let mut expanded = 0usize;

        let h = self.heuristic(start, end);
        nodes.push(PathNode { cell: start, g: 0.0, h, parent: None, closed: false });
        index.insert(start.coordinate(), 0);
        open.push(self.entry(&nodes[0], 0, &mut seq));

        while let Some(entry) = open.pop() {
            let node = &nodes[entry.node];
            if node.closed || entry.g > node.g {
                tracing::trace!("Skipping stale entry for {}", node.cell.coordinate());
                continue;
            }

            let current = entry.node;
            let cell = node.cell;
            let g = node.g;

            if cell.coordinate() == end.coordinate() {
                let route = Self::reconstruct(&nodes, current);
                tracing::debug!(
                    "Path found: {} -> {}, {} cells, cost {:.2}, {} nodes expanded",
                    start.coordinate(),
                    end.coordinate(),
                    route.cells.len(),
                    route.cost,
                    expanded
                );
                return Some(route);
            }

            nodes[current].closed = true;
            expanded += 1;

            for neighbor in neighbors(cell) {
                let key = neighbor.coordinate();
                let known = index.get(&key).copied();
                if known.is_some_and(|i| nodes[i].closed) {
                    continue;
                }

                let step = self.cost.movement_cost(neighbor);
                if !is_passable(step) {
                    continue;
                }

                let tentative = g + step;
                if tentative > max_cost {
                    continue;
                }

                match known {
                    None => {
                        let i = nodes.len();
                        nodes.push(PathNode {
                            cell: neighbor,
                            g: tentative,
                            h: self.heuristic(neighbor, end),
                            parent: Some(current),
                            closed: false,
                        });
                        index.insert(key, i);
                        open.push(self.entry(&nodes[i], i, &mut seq));
                    }
                    Some(i) if tentative < nodes[i].g => {
                        // Relax; the old heap entry goes stale and is skipped on pop
                        nodes[i].g = tentative;
                        nodes[i].parent = Some(current);
                        open.push(self.entry(&nodes[i], i, &mut seq));
                    }
                    Some(_) => {}
                }
            }
        }

        tracing::debug!(
            "No path: {} -> {} within cost {}, {} nodes expanded",
            start.coordinate(),
            end.coordinate(),
            max_cost,
            expanded
        );
        None
    }

    fn entry(&self, node: &PathNode<'_>, index: usize, seq: &mut u64) -> OpenEntry {
        let tie = match self.tie_break {
            TieBreak::LowerHeuristic => node.h,
            TieBreak::LowerCost => node.g,
        };
        *seq += 1;
        OpenEntry {
            f: node.g + node.h,
            tie,
            g: node.g,
            seq: *seq,
            node: index,
        }
    }

    /// Follow parent indices back to the start
    fn reconstruct<'a>(nodes: &[PathNode<'a>], end: usize) -> Route<'a> {
        let cost = nodes[end].g;
        let mut cells = Vec::new();
        let mut current = Some(end);
        while let Some(i) = current {
            cells.push(nodes[i].cell);
            current = nodes[i].parent;
        }
        cells.reverse();
        Route { cells, cost }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// A straight corridor of cells along the x axis: (0,0,0), (1,-1,0), ...
    fn corridor(len: i32) -> Vec<Cell> {
        (0..len)
            .map(|i| Cell::new(Coordinate::new(i, -i, 0).unwrap()))
            .collect()
    }

    fn corridor_neighbors<'a>(cells: &'a [Cell]) -> impl FnMut(&'a Cell) -> Vec<&'a Cell> {
        move |cell: &'a Cell| {
            let i = cell.coordinate().x();
            [i - 1, i + 1]
                .into_iter()
                .filter(|&j| j >= 0 && (j as usize) < cells.len())
                .map(|j| &cells[j as usize])
                .collect()
        }
    }

    fn entry(g: f64, h: f64, seq: u64) -> OpenEntry {
        OpenEntry { f: g + h, tie: h, g, seq, node: 0 }
    }

    #[test]
    fn test_entry_ordering() {
        let mut heap = BinaryHeap::new();
        heap.push(entry(2.0, 2.0, 1)); // f = 4
        heap.push(entry(1.0, 2.0, 2)); // f = 3
        heap.push(entry(2.0, 1.0, 3)); // f = 3, closer to goal
        heap.push(entry(2.0, 1.0, 4)); // same keys, queued later

        let order: Vec<u64> = std::iter::from_fn(|| heap.pop()).map(|e| e.seq).collect();
        assert_eq!(order, vec![3, 4, 2, 1]);
    }

    #[test]
    fn test_tie_break_setting() {
        assert_eq!(PathFinder::new().tie_break(), TieBreak::LowerHeuristic);
        let finder = PathFinder::new().with_tie_break(TieBreak::LowerCost);
        assert_eq!(finder.tie_break(), TieBreak::LowerCost);
    }

    #[test]
    fn test_corridor_path() {
        let cells = corridor(5);
        let finder = PathFinder::new();
        let route = finder
            .search(&cells[0], &cells[4], corridor_neighbors(&cells), f64::INFINITY)
            .unwrap();
        assert_eq!(route.cells.len(), 5);
        assert_eq!(route.cost, 4.0);
        assert_eq!(route.cells[0], &cells[0]);
        assert_eq!(route.cells[4], &cells[4]);
    }

    #[test]
    fn test_start_equals_end() {
        let cells = corridor(3);
        let path = PathFinder::new()
            .find_path(&cells[1], &cells[1], corridor_neighbors(&cells), f64::INFINITY)
            .unwrap();
        assert_eq!(path, vec![&cells[1]]);
    }

    #[test]
    fn test_impassable_endpoint() {
        let mut cells = corridor(3);
        cells[2].set_impassable();
        let finder = PathFinder::new();
        assert!(finder
            .find_path(&cells[0], &cells[2], corridor_neighbors(&cells), f64::INFINITY)
            .is_none());
        assert!(finder
            .find_path(&cells[2], &cells[0], corridor_neighbors(&cells), f64::INFINITY)
            .is_none());
    }

    #[test]
    fn test_blocked_corridor() {
        let mut cells = corridor(4);
        cells[2].set_impassable();
        assert!(PathFinder::new()
            .find_path(&cells[0], &cells[3], corridor_neighbors(&cells), f64::INFINITY)
            .is_none());
    }

    #[test]
    fn test_max_cost() {
        let cells = corridor(4);
        let finder = PathFinder::new();
        assert!(finder
            .find_path(&cells[0], &cells[3], corridor_neighbors(&cells), 2.5)
            .is_none());
        assert!(finder
            .find_path(&cells[0], &cells[3], corridor_neighbors(&cells), 3.0)
            .is_some());
        assert!(finder
            .find_path(&cells[0], &cells[0], corridor_neighbors(&cells), -1.0)
            .is_none());
    }

    #[test]
    fn test_custom_cost_model() {
        let cells = corridor(3);
        let blocked = cells[1].coordinate();
        let finder = PathFinder::with_cost_model(move |cell: &Cell| {
            if cell.coordinate() == blocked {
                f64::INFINITY
            } else {
                cell.movement_cost()
            }
        });
        assert!(finder
            .find_path(&cells[0], &cells[2], corridor_neighbors(&cells), f64::INFINITY)
            .is_none());

        let doubled = PathFinder::with_cost_model(|cell: &Cell| cell.movement_cost() * 2.0);
        let route = doubled
            .search(&cells[0], &cells[2], corridor_neighbors(&cells), f64::INFINITY)
            .unwrap();
        assert_eq!(route.cost, 4.0);
    }

    #[test]
    fn test_relaxes_queued_node() {
        // S -> P1 -> X -> G and S -> P2 -> X -> G. P1 is expanded first (tie on f,
        // lower h) and queues X at g = 3; P2 later reaches X at g = 2.
        let coord = |x, y, z| Coordinate::new(x, y, z).unwrap();
        let s = Cell::new(coord(2, -2, 0));
        let mut p1 = Cell::new(coord(1, -1, 0));
        let p2 = Cell::new(coord(2, -1, -1));
        let x = Cell::new(coord(1, 0, -1));
        let g = Cell::new(Coordinate::ORIGIN);
        p1.set_movement_cost(2.0).unwrap();

        let neighbors = |cell: &Cell| {
            let c = cell.coordinate();
            if c == s.coordinate() {
                vec![&p1, &p2]
            } else if c == p1.coordinate() || c == p2.coordinate() {
                vec![&x]
            } else if c == x.coordinate() {
                vec![&g]
            } else {
                vec![]
            }
        };
        let route = PathFinder::new()
            .search(&s, &g, neighbors, f64::INFINITY)
            .unwrap();
        assert_eq!(
            route.coordinates(),
            vec![s.coordinate(), p2.coordinate(), x.coordinate(), g.coordinate()]
        );
        assert_eq!(route.cost, 3.0);
    }
}
