//! Bounded hexagonal grid and its geometric queries

use rustc_hash::FxHashMap;

use crate::cell::Cell;
use crate::coord::Coordinate;
use crate::pathfinding::{PathFinder, Route, TieBreak};

/// Every cell within `radius` of the origin
///
/// The cell set is exactly the filled hexagon: no holes, nothing outside.
/// Cells are stored in generation order and indexed by coordinate.
#[derive(Clone, Debug)]
pub struct Grid {
    radius: u32,
    cells: Vec<Cell>,
    index: FxHashMap<Coordinate, usize>,
    pathfinder: PathFinder,
}

impl Grid {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Build a grid of the given radius, every cell at default cost
    pub fn generate(radius: u32) -> Self {
        let mut cells = Vec::with_capacity(Self::cell_count(radius));
        let mut index = FxHashMap::default();

        for coordinate in Coordinate::ORIGIN.range(radius) {
            index.insert(coordinate, cells.len());
            cells.push(Cell::new(coordinate));
        }

        tracing::debug!("Generated grid: radius {}, {} cells", radius, cells.len());

        Self {
            radius,
            cells,
            index,
            pathfinder: PathFinder::new(),
        }
    }

    /// Use a different tie-break for equal-priority search nodes
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.pathfinder = self.pathfinder.with_tie_break(tie_break);
        self
    }

    /// Closed-form size of a hexagon of radius R: 3R² + 3R + 1
    pub fn cell_count(radius: u32) -> usize {
        let r = radius as usize;
        3 * r * r + 3 * r + 1
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate cells in generation order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.index.contains_key(&coordinate)
    }

    pub fn cell(&self, coordinate: Coordinate) -> Option<&Cell> {
        self.index.get(&coordinate).map(|&i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, coordinate: Coordinate) -> Option<&mut Cell> {
        self.index.get(&coordinate).map(|&i| &mut self.cells[i])
    }

    /// Look up a cell by raw components
    ///
    /// Components that do not sum to zero are reported as a miss, not an error.
    pub fn get_cell(&self, x: i32, y: i32, z: i32) -> Option<&Cell> {
        let coordinate = Coordinate::new(x, y, z).ok()?;
        self.cell(coordinate)
    }

    pub fn get_cell_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut Cell> {
        let coordinate = Coordinate::new(x, y, z).ok()?;
        self.cell_mut(coordinate)
    }

    // ========================================================================
    // GEOMETRY
    // ========================================================================

    /// Adjacent cells present in the grid, in direction order
    pub fn neighbors(&self, cell: &Cell) -> Vec<&Cell> {
        cell.coordinate()
            .neighbors()
            .filter_map(|coordinate| self.cell(coordinate))
            .collect()
    }

    /// Hex distance between two cells
    pub fn distance(a: &Cell, b: &Cell) -> u32 {
        a.coordinate().distance(b.coordinate())
    }

    /// Cells on the straight line from `start` to `end`, both included
    ///
    /// Interpolated points that fall outside the grid are dropped, so lines
    /// running along the edge may come back shorter than distance + 1.
    pub fn line(&self, start: &Cell, end: &Cell) -> Vec<&Cell> {
        let from = start.coordinate();
        let to = end.coordinate();
        let n = from.distance(to);

        (0..=n)
            .filter_map(|i| {
                let t = if n == 0 { 0.0 } else { i as f64 / n as f64 };
                let (x, y, z) = from.lerp(to, t);
                self.cell(Coordinate::round(x, y, z))
            })
            .collect()
    }

    /// Cells within `max_distance` of `center`, center included
    ///
    /// Once the ball is wider than the grid itself, the grid is scanned
    /// instead and the result comes back in generation order.
    pub fn cells_in_range(&self, center: &Cell, max_distance: u32) -> Vec<&Cell> {
        let origin = center.coordinate();
        let distance = max_distance.min(self.reach(origin));
        if distance > self.radius {
            return self.cells_within(origin, |d| d <= distance);
        }
        origin
            .range(distance)
            .filter_map(|coordinate| self.cell(coordinate))
            .collect()
    }

    /// Cells exactly `distance` away from `center`
    pub fn ring(&self, center: &Cell, distance: u32) -> Vec<&Cell> {
        let origin = center.coordinate();
        if distance > self.reach(origin) {
            return Vec::new();
        }
        if u64::from(distance) * 6 > self.len() as u64 {
            return self.cells_within(origin, |d| d == distance);
        }
        origin
            .ring(distance)
            .filter_map(|coordinate| self.cell(coordinate))
            .collect()
    }

    /// No grid cell lies farther than this from `origin`
    fn reach(&self, origin: Coordinate) -> u32 {
        origin.length().saturating_add(self.radius)
    }

    fn cells_within(&self, origin: Coordinate, keep: impl Fn(u32) -> bool) -> Vec<&Cell> {
        self.cells
            .iter()
            .filter(|cell| keep(origin.distance(cell.coordinate())))
            .collect()
    }

    // ========================================================================
    // PATH FINDING
    // ========================================================================

    /// Cheapest path between two cells with no cost ceiling
    pub fn find_path<'a>(&'a self, start: &'a Cell, end: &'a Cell) -> Option<Vec<&'a Cell>> {
        self.find_path_with_limit(start, end, f64::INFINITY)
    }

    /// Cheapest path between two cells costing at most `max_cost`
    pub fn find_path_with_limit<'a>(
        &'a self,
        start: &'a Cell,
        end: &'a Cell,
        max_cost: f64,
    ) -> Option<Vec<&'a Cell>> {
        self.find_route(start, end, max_cost).map(|route| route.cells)
    }

    /// Like `find_path_with_limit`, also reporting the total cost
    pub fn find_route<'a>(
        &'a self,
        start: &'a Cell,
        end: &'a Cell,
        max_cost: f64,
    ) -> Option<Route<'a>> {
        self.pathfinder
            .search(start, end, |cell| self.neighbors(cell), max_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::DIRECTIONS;

    fn grid() -> Grid {
        Grid::generate(2)
    }

    #[test]
    fn test_grid_initialization() {
        for radius in 0..6 {
            let grid = Grid::generate(radius);
            assert_eq!(grid.len(), Grid::cell_count(radius));
            assert!(grid.cells().all(|c| c.coordinate().length() <= radius));
        }
        assert_eq!(grid().len(), 19);
        assert_eq!(Grid::generate(0).len(), 1);
    }

    #[test]
    fn test_get_cell() {
        let grid = grid();
        let cell = grid.get_cell(0, 0, 0).unwrap();
        assert_eq!(cell.coordinate(), Coordinate::ORIGIN);

        assert!(grid.get_cell(5, -2, -3).is_none());
        assert!(grid.get_cell(2, -2, 0).is_some());
        assert!(grid.get_cell(3, -3, 0).is_none());
        // Invalid sum is a miss, not a panic
        assert!(grid.get_cell(1, 1, 1).is_none());
    }

    #[test]
    fn test_get_cell_mut() {
        let mut grid = grid();
        grid.get_cell_mut(1, -1, 0).unwrap().set_impassable();
        assert!(!grid.get_cell(1, -1, 0).unwrap().is_passable());
        assert!(grid.get_cell_mut(1, 1, 1).is_none());
    }

    #[test]
    fn test_neighbors() {
        let grid = grid();
        let center = grid.get_cell(0, 0, 0).unwrap();
        let neighbors = grid.neighbors(center);
        assert_eq!(neighbors.len(), 6);
        let expected: Vec<_> = DIRECTIONS.to_vec();
        let actual: Vec<_> = neighbors.iter().map(|c| c.coordinate()).collect();
        assert_eq!(actual, expected);

        // Corner cell only has three neighbors inside the grid
        let corner = grid.get_cell(2, -2, 0).unwrap();
        let neighbors = grid.neighbors(corner);
        assert_eq!(neighbors.len(), 3);
        assert!(neighbors.iter().all(|n| Grid::distance(corner, n) == 1));
    }

    #[test]
    fn test_distance_calculation() {
        let grid = grid();
        let a = grid.get_cell(0, 0, 0).unwrap();
        let b = grid.get_cell(2, -1, -1).unwrap();
        assert_eq!(Grid::distance(a, b), 2);
        assert_eq!(Grid::distance(b, a), 2);
        assert_eq!(Grid::distance(a, a), 0);
    }

    #[test]
    fn test_line() {
        let grid = grid();
        let start = grid.get_cell(0, 0, 0).unwrap();
        let end = grid.get_cell(2, -1, -1).unwrap();
        let line = grid.line(start, end);
        assert_eq!(line.len(), 3);
        assert_eq!(line[0], start);
        assert_eq!(line[2], end);
        for pair in line.windows(2) {
            assert_eq!(Grid::distance(pair[0], pair[1]), 1);
        }

        assert_eq!(grid.line(start, start), vec![start]);
    }

    #[test]
    fn test_line_stays_in_grid() {
        let grid = grid();
        let start = grid.get_cell(-2, 0, 2).unwrap();
        let end = grid.get_cell(2, -2, 0).unwrap();
        let line = grid.line(start, end);
        assert_eq!(line.first(), Some(&start));
        assert_eq!(line.last(), Some(&end));
        assert!(line.iter().all(|c| c.coordinate().length() <= grid.radius()));
    }

    #[test]
    fn test_cells_in_range() {
        let grid = grid();
        let center = grid.get_cell(0, 0, 0).unwrap();
        assert_eq!(grid.cells_in_range(center, 0), vec![center]);
        assert_eq!(grid.cells_in_range(center, 1).len(), 7);

        let cells = grid.cells_in_range(center, 2);
        assert_eq!(cells.len(), 19);
        assert!(cells.iter().all(|c| Grid::distance(center, c) <= 2));

        // Clipped at the edge
        let corner = grid.get_cell(2, -2, 0).unwrap();
        assert_eq!(grid.cells_in_range(corner, 1).len(), 4);
    }

    #[test]
    fn test_ring() {
        let grid = grid();
        let center = grid.get_cell(0, 0, 0).unwrap();
        assert_eq!(grid.ring(center, 2).len(), 12);
        assert_eq!(grid.ring(center, 3).len(), 0);

        let off_center = grid.get_cell(1, -1, 0).unwrap();
        assert_eq!(grid.ring(off_center, 2).len(), 7);
        assert_eq!(grid.ring(off_center, 3).len(), 5);
        assert_eq!(grid.ring(off_center, 4).len(), 0);
        assert_eq!(grid.ring(off_center, u32::MAX).len(), 0);
    }

    #[test]
    fn test_cells_in_range_wider_than_grid() {
        let grid = grid();
        let center = grid.get_cell(1, -1, 0).unwrap();
        for max_distance in [3, 5, 100_000, i32::MAX as u32, u32::MAX] {
            let cells = grid.cells_in_range(center, max_distance);
            assert_eq!(cells.len(), grid.len(), "max_distance = {}", max_distance);
            assert!(cells.contains(&center));
        }
    }

    #[test]
    fn test_generation_matches_range() {
        let grid = Grid::generate(3);
        let generated: Vec<_> = grid.cells().map(|c| c.coordinate()).collect();
        let expected: Vec<_> = Coordinate::ORIGIN.range(3).collect();
        assert_eq!(generated, expected);
    }

    #[test]
    fn test_find_path() {
        let mut grid = grid();
        {
            let start = grid.get_cell(0, 0, 0).unwrap();
            let end = grid.get_cell(2, -1, -1).unwrap();
            let path = grid.find_path(start, end).unwrap();
            assert!(path.len() >= 3);
            assert_eq!(path[0], start);
            assert_eq!(path[path.len() - 1], end);
        }

        grid.get_cell_mut(1, -1, 0).unwrap().set_movement_cost(10.0).unwrap();

        let start = grid.get_cell(0, 0, 0).unwrap();
        let end = grid.get_cell(2, -1, -1).unwrap();
        let mid = grid.get_cell(1, -1, 0).unwrap();
        let path = grid.find_path(start, end).unwrap();
        assert!(!path.contains(&mid));
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_find_route_cost() {
        let grid = grid();
        let start = grid.get_cell(-2, 2, 0).unwrap();
        let end = grid.get_cell(2, -2, 0).unwrap();
        let route = grid.find_route(start, end, f64::INFINITY).unwrap();
        assert_eq!(route.cost, 4.0);
        assert!(grid.find_route(start, end, 3.9).is_none());
    }
}
