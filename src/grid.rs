use std::fmt;
use std::ops::Index;

use error_chain::bail;
use itertools::Itertools;

use crate::cells::{Facet, Position, Walls};
use crate::errors::{ErrorKind, Result};
use crate::units::{Height, Width};


/// A fixed size `width * height` rectangle of cells, each holding its own wall state.
///
/// Cells are stored row-major. The dimensions never change after `create`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    walls: Vec<Walls>,
    width: Width,
    height: Height,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, passages: {}",
               self.width, self.height, self.passages_count())
    }
}

impl Grid {
    /// Creates a grid with every wall of every cell present.
    ///
    /// Fails with `InvalidDimension` if either dimension is zero, does not fit a `u32`
    /// coordinate, or the cells cannot be counted or allocated.
    pub fn create(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);

        if w == 0 || h == 0 || u32::try_from(w).is_err() || u32::try_from(h).is_err() {
            bail!(ErrorKind::InvalidDimension(w, h));
        }
        let cells_count = match w.checked_mul(h) {
            Some(count) => count,
            None => bail!(ErrorKind::InvalidDimension(w, h)),
        };

        let mut walls = Vec::new();
        if walls.try_reserve_exact(cells_count).is_err() {
            bail!(ErrorKind::InvalidDimension(w, h));
        }
        walls.resize(cells_count, Walls::ALL);

        Ok(Grid {
            walls,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.walls.len()
    }

    /// Is the position within the grid's dimensions
    #[inline]
    pub fn is_valid_position(&self, pos: Position) -> bool {
        (pos.x as usize) < self.width.0 && (pos.y as usize) < self.height.0
    }

    /// Convert a position to a one dimensional index in the range 0...grid.size().
    /// Returns None if the position is outside the grid.
    #[inline]
    pub fn position_to_index(&self, pos: Position) -> Option<usize> {
        if self.is_valid_position(pos) {
            Some(pos.y as usize * self.width.0 + pos.x as usize)
        } else {
            None
        }
    }

    /// Inverse of `position_to_index`. `index` must be below `size()`.
    #[inline]
    pub fn index_to_position(&self, index: usize) -> Position {
        debug_assert!(index < self.size());
        Position::new((index % self.width.0) as u32, (index / self.width.0) as u32)
    }

    pub fn get(&self, pos: Position) -> Result<Walls> {
        match self.position_to_index(pos) {
            Some(index) => Ok(self.walls[index]),
            None => bail!(ErrorKind::OutOfBounds(pos.x, pos.y)),
        }
    }

    /// Sets or clears one wall of one cell.
    ///
    /// The neighbour's copy of the same boundary is left alone, so opening a passage
    /// takes two calls: one per side.
    pub fn set_wall(&mut self, pos: Position, facet: Facet, present: bool) -> Result<()> {
        match self.position_to_index(pos) {
            Some(index) => {
                self.walls[index].set(facet, present);
                Ok(())
            }
            None => bail!(ErrorKind::OutOfBounds(pos.x, pos.y)),
        }
    }

    /// The cell across `facet` from `pos`, if there is one inside the grid.
    pub fn neighbour_at_direction(&self, pos: Position, facet: Facet) -> Option<Position> {
        if !self.is_valid_position(pos) {
            return None;
        }
        facet.offset(pos).filter(|&neighbour| self.is_valid_position(neighbour))
    }

    /// Can you walk from `pos` through `facet` into a neighbouring cell?
    pub fn is_passage_open(&self, pos: Position, facet: Facet) -> bool {
        match (self.position_to_index(pos), self.neighbour_at_direction(pos, facet)) {
            (Some(index), Some(_)) => self.walls[index].is_open(facet),
            _ => false,
        }
    }

    /// Every position in the grid, row by row from `y == 0`.
    pub fn iter(&self) -> impl Iterator<Item = Position> {
        let (w, h) = (self.width.0 as u32, self.height.0 as u32);
        (0..h).cartesian_product(0..w).map(|(y, x)| Position::new(x, y))
    }

    /// Each open passage once, as `(from, to)` where `to` is east or north of `from`.
    pub fn passages(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.iter().flat_map(move |pos| {
            [Facet::East, Facet::North]
                .into_iter()
                .filter(move |&facet| self.is_passage_open(pos, facet))
                .filter_map(move |facet| facet.offset(pos).map(|to| (pos, to)))
        })
    }

    pub fn passages_count(&self) -> usize {
        self.passages().count()
    }
}

impl Index<Position> for Grid {
    type Output = Walls;

    /// Panics if the position is outside the grid.
    fn index(&self, pos: Position) -> &Walls {
        match self.position_to_index(pos) {
            Some(index) => &self.walls[index],
            None => panic!("position {} is outside of the {}x{} grid", pos, self.width.0, self.height.0),
        }
    }
}
