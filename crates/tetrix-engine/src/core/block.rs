use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Display colour of a block.
///
/// The engine never interprets colours; they are carried so the presentation
/// layer can tell shapes apart after they land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum BlockColor {
    Blue = 0,
    Orange = 1,
    Purple = 2,
    Red = 3,
    Teal = 4,
    Yellow = 5,
}

impl BlockColor {
    pub const LEN: usize = 6;

    pub const ALL: [Self; Self::LEN] = [
        Self::Blue,
        Self::Orange,
        Self::Purple,
        Self::Red,
        Self::Teal,
        Self::Yellow,
    ];
}

impl Distribution<BlockColor> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockColor {
        BlockColor::ALL[rng.random_range(0..BlockColor::LEN)]
    }
}

/// A single occupied cell.
///
/// While its shape is falling the block belongs to that shape; once the shape
/// lands the block is copied into the [`Grid`](super::grid::Grid) and the shape
/// is dropped. The position always matches the grid cell holding the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Block {
    column: usize,
    row: usize,
    color: BlockColor,
}

impl Block {
    /// Creates a block at `(column, row)`.
    #[must_use]
    pub const fn new(column: usize, row: usize, color: BlockColor) -> Self {
        Self { column, row, color }
    }

    /// Column of the cell holding the block.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Row of the cell holding the block.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Display colour.
    #[must_use]
    pub const fn color(&self) -> BlockColor {
        self.color
    }

    /// Returns the same block relocated to another cell.
    #[must_use]
    pub const fn moved_to(self, column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            color: self.color,
        }
    }
}
