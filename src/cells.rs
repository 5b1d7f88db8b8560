use std::fmt;

/// A cell location on the grid. `x` grows eastwards, `y` grows northwards.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Position {
        Position { x, y }
    }
}

impl From<(u32, u32)> for Position {
    fn from(x_y_pair: (u32, u32)) -> Position {
        Position::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four walls around a cell.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum Facet {
    North,
    South,
    East,
    West,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::North, Facet::South, Facet::East, Facet::West];

    /// The wall the adjacent cell on this side uses for the same boundary.
    pub fn opposite(self) -> Facet {
        match self {
            Facet::North => Facet::South,
            Facet::South => Facet::North,
            Facet::East => Facet::West,
            Facet::West => Facet::East,
        }
    }

    /// Creates a new `Position` offset 1 cell away across this wall.
    /// Returns None if the position is not representable; grid bounds are not checked here.
    pub fn offset(self, from: Position) -> Option<Position> {
        let (x, y) = (from.x, from.y);
        match self {
            Facet::North => y.checked_add(1).map(|y| Position::new(x, y)),
            Facet::South => y.checked_sub(1).map(|y| Position::new(x, y)),
            Facet::East => x.checked_add(1).map(|x| Position::new(x, y)),
            Facet::West => x.checked_sub(1).map(|x| Position::new(x, y)),
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Facet::West => 0b0001,
            Facet::East => 0b0010,
            Facet::North => 0b0100,
            Facet::South => 0b1000,
        }
    }
}

/// Wall state of a single cell: which of the four facets still have a wall.
///
/// Neighbouring cells each keep their own copy of a shared boundary, so
/// opening a passage means clearing a facet on both sides.
#[derive(Eq, PartialEq, Copy, Clone, Hash)]
pub struct Walls(u8);

impl Walls {
    pub const NONE: Walls = Walls(0);
    pub const ALL: Walls = Walls(0b1111);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, facet: Facet) -> bool {
        self.0 & facet.bit() != 0
    }

    #[inline]
    pub fn is_open(self, facet: Facet) -> bool {
        !self.contains(facet)
    }

    #[inline]
    pub fn insert(&mut self, facet: Facet) {
        self.0 |= facet.bit();
    }

    #[inline]
    pub fn remove(&mut self, facet: Facet) {
        self.0 &= !facet.bit();
    }

    pub fn set(&mut self, facet: Facet, present: bool) {
        if present {
            self.insert(facet);
        } else {
            self.remove(facet);
        }
    }

    pub fn north(self) -> bool {
        self.contains(Facet::North)
    }
    pub fn south(self) -> bool {
        self.contains(Facet::South)
    }
    pub fn east(self) -> bool {
        self.contains(Facet::East)
    }
    pub fn west(self) -> bool {
        self.contains(Facet::West)
    }

    /// Facets with the wall removed, in `Facet::ALL` order.
    pub fn open_facets(self) -> impl Iterator<Item = Facet> {
        Facet::ALL.into_iter().filter(move |&facet| self.is_open(facet))
    }
}

impl fmt::Debug for Walls {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Walls")
         .field("north", &self.north())
         .field("south", &self.south())
         .field("east", &self.east())
         .field("west", &self.west())
         .finish()
    }
}
