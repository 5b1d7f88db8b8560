use error_chain::bail;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::cells::{Facet, Position};
use crate::errors::{ErrorKind, Result};
use crate::grid::Grid;
use crate::units::{Height, Width};
use crate::visited::VisitedCells;

/// An adjacent cell together with the wall, on the current cell's side, that separates them.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Neighbour {
    pub position: Position,
    pub shared_wall: Facet,
}

pub type NeighbourSmallVec = SmallVec<[Neighbour; 4]>;

// Fixed so that a seeded run always sees candidates in the same order.
const DISCOVERY_ORDER: [Facet; 4] = [Facet::West, Facet::South, Facet::North, Facet::East];

/// The in-grid neighbours of `pos` that the current run has not reached yet.
///
/// Recomputed on every call as the visited set keeps growing while carving.
pub fn unvisited_neighbours(pos: Position,
                            grid: &Grid,
                            visited: &VisitedCells)
                            -> Result<NeighbourSmallVec> {
    let mut found = NeighbourSmallVec::new();
    for &facet in &DISCOVERY_ORDER {
        if let Some(position) = grid.neighbour_at_direction(pos, facet) {
            if !visited.is_visited(position)? {
                found.push(Neighbour { position, shared_wall: facet });
            }
        }
    }
    Ok(found)
}

/// Apply the recursive backtracker maze generation algorithm to a grid with all walls present.
///
/// A depth first random walk: from the cell on top of the stack carve into a random
/// unvisited neighbour, or when there are none pop the cell and backtrack. The explicit
/// stack is the path from the start cell to the current frontier, so no recursion depth
/// limit applies on large grids.
/// Every carve joins exactly one new cell to the tree, which gives a perfect maze with
/// `size - 1` passages.
///
/// `start` defaults to a uniformly random cell. Returns the visited set, which covers the
/// whole grid once carving is done.
pub fn recursive_backtracker<R: Rng>(grid: &mut Grid,
                                     rng: &mut R,
                                     start: Option<Position>)
                                     -> Result<VisitedCells> {
    let start = match start {
        Some(pos) if grid.is_valid_position(pos) => pos,
        Some(pos) => bail!(ErrorKind::OutOfBounds(pos.x, pos.y)),
        None => random_cell(grid, rng),
    };
    debug!(width = grid.width().0, height = grid.height().0, %start, "carving maze");

    let mut visited = VisitedCells::new(grid);
    visited.mark_visited(start)?;
    let mut stack = vec![start];
    let (mut carved, mut backtracks) = (0usize, 0usize);

    while let Some(current) = stack.pop() {

        let neighbours = unvisited_neighbours(current, grid, &visited)?;
        if neighbours.is_empty() {
            trace!(%current, "dead end, backtracking");
            backtracks += 1;
            continue;
        }

        // More neighbours may be left to explore later.
        stack.push(current);

        let Neighbour { position: next, shared_wall } = neighbours[rng.gen_range(0..neighbours.len())];
        grid.set_wall(current, shared_wall, false)?;
        grid.set_wall(next, shared_wall.opposite(), false)?;
        visited.mark_visited(next)?;
        carved += 1;

        stack.push(next);
    }

    debug!(passages = carved, backtracks, "maze carved");
    Ok(visited)
}

fn random_cell<R: Rng>(grid: &Grid, rng: &mut R) -> Position {
    let x = rng.gen_range(0..grid.width().0);
    let y = rng.gen_range(0..grid.height().0);
    Position::new(x as u32, y as u32)
}

/// Settings for a single maze generation run.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct GeneratorOptions {
    width: Width,
    height: Height,
    seed: Option<u64>,
    start: Option<Position>,
}

impl Default for GeneratorOptions {
    fn default() -> GeneratorOptions {
        GeneratorOptions {
            width: Width(20),
            height: Height(20),
            seed: None,
            start: None,
        }
    }
}

impl GeneratorOptions {
    pub fn width(&self) -> Width {
        self.width
    }
    pub fn height(&self) -> Height {
        self.height
    }
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
    pub fn start(&self) -> Option<Position> {
        self.start
    }

    /// Creates and carves a new grid.
    ///
    /// The dimensions are checked before anything is allocated. Without a seed the
    /// random number generator is seeded from the OS.
    pub fn generate(&self) -> Result<Grid> {
        let mut grid = Grid::create(self.width, self.height)?;

        let mut rng = match self.seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        };
        debug!(seeded = self.seed.is_some(), "generating maze");

        recursive_backtracker(&mut grid, &mut rng, self.start)?;
        Ok(grid)
    }
}

#[derive(Debug, Default)]
pub struct GeneratorOptionsBuilder {
    options: GeneratorOptions,
}

impl GeneratorOptionsBuilder {
    pub fn new() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::default()
    }
    pub fn width(mut self, width: Width) -> GeneratorOptionsBuilder {
        self.options.width = width;
        self
    }
    pub fn height(mut self, height: Height) -> GeneratorOptionsBuilder {
        self.options.height = height;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> GeneratorOptionsBuilder {
        self.options.seed = seed;
        self
    }
    pub fn start(mut self, start: Option<Position>) -> GeneratorOptionsBuilder {
        self.options.start = start;
        self
    }
    pub fn build(self) -> GeneratorOptions {
        self.options
    }
}

/// Generate a perfect maze of `width * height` cells.
///
/// The same seed and dimensions always give the same maze.
pub fn generate(width: Width, height: Height, seed: Option<u64>) -> Result<Grid> {
    GeneratorOptionsBuilder::new()
        .width(width)
        .height(height)
        .seed(seed)
        .build()
        .generate()
}

/// Generate a perfect maze drawing every random choice from a caller owned generator.
pub fn generate_with_rng<R: Rng>(width: Width, height: Height, rng: &mut R) -> Result<Grid> {
    let mut grid = Grid::create(width, height)?;
    recursive_backtracker(&mut grid, rng, None)?;
    Ok(grid)
}


#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::Walls;
    use crate::errors::ErrorKind;

    fn blank_grid(w: usize, h: usize) -> Grid {
        Grid::create(Width(w), Height(h)).expect("valid grid dimensions")
    }

    fn seeded_rng(seed: u64) -> XorShiftRng {
        XorShiftRng::seed_from_u64(seed)
    }

    #[test]
    fn neighbours_in_discovery_order() {
        let g = blank_grid(3, 3);
        let visited = VisitedCells::new(&g);
        let gc = |x, y| Position::new(x, y);

        let found = unvisited_neighbours(gc(1, 1), &g, &visited).unwrap();
        assert_eq!(&*found,
                   &[Neighbour { position: gc(0, 1), shared_wall: Facet::West },
                     Neighbour { position: gc(1, 0), shared_wall: Facet::South },
                     Neighbour { position: gc(1, 2), shared_wall: Facet::North },
                     Neighbour { position: gc(2, 1), shared_wall: Facet::East }]);
    }

    #[test]
    fn neighbours_stay_inside_the_grid() {
        let g = blank_grid(3, 3);
        let visited = VisitedCells::new(&g);
        let gc = |x, y| Position::new(x, y);
        let check_expected_neighbours = |coord, expected: &[(Position, Facet)]| {
            let found = unvisited_neighbours(coord, &g, &visited)
                .unwrap()
                .iter()
                .map(|n| (n.position, n.shared_wall))
                .collect::<Vec<_>>();
            assert_eq!(found, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[(gc(0, 1), Facet::North), (gc(1, 0), Facet::East)]);
        check_expected_neighbours(gc(2, 2), &[(gc(1, 2), Facet::West), (gc(2, 1), Facet::South)]);
        // side
        check_expected_neighbours(gc(1, 0),
                                  &[(gc(0, 0), Facet::West),
                                    (gc(1, 1), Facet::North),
                                    (gc(2, 0), Facet::East)]);
    }

    #[test]
    fn visited_neighbours_are_skipped() {
        let g = blank_grid(3, 3);
        let mut visited = VisitedCells::new(&g);
        let gc = |x, y| Position::new(x, y);
        visited.mark_visited(gc(0, 1)).unwrap();
        visited.mark_visited(gc(1, 2)).unwrap();

        let found = unvisited_neighbours(gc(1, 1), &g, &visited).unwrap();
        assert_eq!(found.iter().map(|n| n.shared_wall).collect::<Vec<_>>(),
                   vec![Facet::South, Facet::East]);

        visited.mark_visited(gc(1, 0)).unwrap();
        visited.mark_visited(gc(2, 1)).unwrap();
        assert!(unvisited_neighbours(gc(1, 1), &g, &visited).unwrap().is_empty());
    }

    #[test]
    fn single_cell_grid_keeps_all_walls() {
        let g = generate(Width(1), Height(1), None).unwrap();
        assert_eq!(g.size(), 1);
        assert_eq!(g[Position::new(0, 0)], Walls::ALL);
        assert_eq!(g.passages_count(), 0);
    }

    #[test]
    fn two_cells_share_one_passage() {
        for seed in 0..10 {
            let g = generate(Width(2), Height(1), Some(seed)).unwrap();
            let (west_cell, east_cell) = (g[Position::new(0, 0)], g[Position::new(1, 0)]);

            assert!(west_cell.is_open(Facet::East));
            assert!(east_cell.is_open(Facet::West));
            assert!(west_cell.north() && west_cell.south() && west_cell.west());
            assert!(east_cell.north() && east_cell.south() && east_cell.east());
            assert_eq!(g.passages_count(), 1);
        }
    }

    #[test]
    fn corridor_is_fully_open() {
        let g = generate(Width(1), Height(6), Some(3)).unwrap();
        for y in 0..5 {
            assert!(g.is_passage_open(Position::new(0, y), Facet::North));
            assert!(g.is_passage_open(Position::new(0, y + 1), Facet::South));
        }
        assert_eq!(g.passages_count(), 5);
    }

    #[test]
    fn every_cell_visited() {
        for &(w, h) in &[(1, 1), (1, 7), (7, 1), (5, 5), (16, 9)] {
            let mut g = blank_grid(w, h);
            let visited = recursive_backtracker(&mut g, &mut seeded_rng(11), None).unwrap();
            assert!(visited.all_visited());
            for pos in g.iter() {
                assert!(visited.is_visited(pos).unwrap());
            }
            assert_eq!(g.passages_count(), w * h - 1);
        }
    }

    #[test]
    fn fixed_start_position() {
        let mut g = blank_grid(4, 4);
        let visited = recursive_backtracker(&mut g, &mut seeded_rng(5), Some(Position::new(3, 0)))
            .unwrap();
        assert!(visited.all_visited());
        assert_eq!(g.passages_count(), 15);
    }

    #[test]
    fn start_outside_the_grid_fails() {
        let mut g = blank_grid(4, 4);
        match recursive_backtracker(&mut g, &mut seeded_rng(5), Some(Position::new(4, 0))) {
            Err(e) => match *e.kind() {
                ErrorKind::OutOfBounds(4, 0) => (),
                ref other => panic!("unexpected error kind {:?}", other),
            },
            Ok(_) => panic!("carving started outside of the grid"),
        }
        assert_eq!(g, blank_grid(4, 4));
    }

    #[test]
    fn same_seed_same_maze() {
        let a = generate(Width(12), Height(8), Some(42)).unwrap();
        let b = generate(Width(12), Height(8), Some(42)).unwrap();
        assert_eq!(a, b);

        let c = generate_with_rng(Width(12), Height(8), &mut seeded_rng(42)).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(Width(16), Height(16), Some(1)).unwrap();
        let b = generate(Width(16), Height(16), Some(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unseeded_generation_is_still_perfect() {
        let g = generate(Width(10), Height(10), None).unwrap();
        assert_eq!(g.passages_count(), 99);
    }

    #[test]
    fn invalid_dimensions_fail_fast() {
        for &(w, h) in &[(0, 1), (1, 0), (0, 0)] {
            match generate(Width(w), Height(h), Some(1)) {
                Err(e) => match *e.kind() {
                    ErrorKind::InvalidDimension(..) => (),
                    ref other => panic!("unexpected error kind {:?}", other),
                },
                Ok(g) => panic!("generated {:?}", g),
            }
        }
        assert!(generate_with_rng(Width(0), Height(3), &mut seeded_rng(1)).is_err());
    }

    #[test]
    fn options_builder() {
        let defaults = GeneratorOptionsBuilder::new().build();
        assert_eq!(defaults, GeneratorOptions::default());
        assert_eq!((defaults.width(), defaults.height()), (Width(20), Height(20)));
        assert_eq!(defaults.seed(), None);
        assert_eq!(defaults.start(), None);

        let options = GeneratorOptionsBuilder::new()
            .width(Width(6))
            .height(Height(3))
            .seed(Some(9))
            .start(Some(Position::new(5, 2)))
            .build();
        assert_eq!(options.width(), Width(6));
        assert_eq!(options.start(), Some(Position::new(5, 2)));

        let g = options.generate().unwrap();
        assert_eq!(g.size(), 18);
        assert_eq!(g.passages_count(), 17);
        assert_eq!(g, options.generate().unwrap());
    }
}
