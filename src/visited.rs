use bit_set::BitSet;
use error_chain::bail;

use crate::cells::Position;
use crate::errors::{ErrorKind, Result};
use crate::grid::Grid;

/// Transient record of which cells a generation run has reached.
///
/// Only meaningful while carving; the finished `Grid` does not carry it.
#[derive(Debug, Clone)]
pub struct VisitedCells {
    visited: BitSet,
    width: usize,
    height: usize,
}

impl VisitedCells {
    pub fn new(grid: &Grid) -> VisitedCells {
        VisitedCells {
            visited: BitSet::with_capacity(grid.size()),
            width: grid.width().0,
            height: grid.height().0,
        }
    }

    #[inline]
    fn bit_index(&self, pos: Position) -> Result<usize> {
        if (pos.x as usize) < self.width && (pos.y as usize) < self.height {
            Ok(pos.y as usize * self.width + pos.x as usize)
        } else {
            bail!(ErrorKind::OutOfBounds(pos.x, pos.y))
        }
    }

    /// Marks the position as visited. Returns true if it was not visited before.
    ///
    /// Fails with `OutOfBounds` for a position outside the grid.
    pub fn mark_visited(&mut self, pos: Position) -> Result<bool> {
        let index = self.bit_index(pos)?;
        Ok(self.visited.insert(index))
    }

    /// Fails with `OutOfBounds` for a position outside the grid.
    pub fn is_visited(&self, pos: Position) -> Result<bool> {
        let index = self.bit_index(pos)?;
        Ok(self.visited.contains(index))
    }

    pub fn count(&self) -> usize {
        self.visited.len()
    }

    pub fn all_visited(&self) -> bool {
        self.count() == self.width * self.height
    }
}
