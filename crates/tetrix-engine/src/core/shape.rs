use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

use super::block::{Block, BlockColor};

/// Number of blocks in every tetromino.
pub const BLOCKS_PER_SHAPE: usize = 4;

/// Offsets `(column, row)` of the four blocks relative to the shape anchor.
type ShapeCells = [(i8, i8); BLOCKS_PER_SHAPE];

/// Rotation table indexed by `[kind][orientation]`.
///
/// Each kind only lists its distinct orientations, so the orientation count
/// doubles as the rotation modulus (O has one, I/S/Z two, T/J/L four).
/// Rows grow downward; rotation is clockwise and pivots on the anchor.
const ROTATIONS: [&[ShapeCells]; ShapeKind::LEN] = [
    // I
    &[
        [(0, 0), (0, 1), (0, 2), (0, 3)],
        [(-1, 0), (0, 0), (1, 0), (2, 0)],
    ],
    // O
    &[[(0, 0), (1, 0), (0, 1), (1, 1)]],
    // T
    &[
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(2, 1), (1, 0), (1, 1), (1, 2)],
        [(1, 2), (0, 1), (1, 1), (2, 1)],
        [(0, 1), (1, 0), (1, 1), (1, 2)],
    ],
    // S
    &[
        [(0, 0), (0, 1), (1, 1), (1, 2)],
        [(2, 0), (1, 0), (1, 1), (0, 1)],
    ],
    // Z
    &[
        [(1, 0), (1, 1), (0, 1), (0, 2)],
        [(-1, 0), (0, 0), (0, 1), (1, 1)],
    ],
    // J
    &[
        [(1, 0), (1, 1), (1, 2), (0, 2)],
        [(2, 1), (1, 1), (0, 1), (0, 0)],
        [(0, 2), (0, 1), (0, 0), (1, 0)],
        [(0, 0), (1, 0), (2, 0), (2, 1)],
    ],
    // L
    &[
        [(0, 0), (0, 1), (0, 2), (1, 2)],
        [(1, 1), (0, 1), (-1, 1), (-1, 2)],
        [(0, 2), (0, 1), (0, 0), (-1, 0)],
        [(-1, 1), (0, 1), (1, 1), (1, 0)],
    ],
];

/// The seven tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum ShapeKind {
    I = 0,
    O = 1,
    T = 2,
    S = 3,
    Z = 4,
    J = 5,
    L = 6,
}

impl Distribution<ShapeKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeKind {
        ShapeKind::ALL[rng.random_range(0..ShapeKind::LEN)]
    }
}

impl ShapeKind {
    /// Number of shape kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    fn rotations(self) -> &'static [ShapeCells] {
        ROTATIONS[self as usize]
    }

    /// Number of distinct orientations of this kind.
    #[must_use]
    pub fn orientation_count(self) -> usize {
        self.rotations().len()
    }

    /// Returns the single character representation of this shape kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrix_engine::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::I.as_char(), 'I');
    /// assert_eq!(ShapeKind::from_char('T'), Some(ShapeKind::T));
    /// assert_eq!(ShapeKind::from_char('X'), None);
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            ShapeKind::I => 'I',
            ShapeKind::O => 'O',
            ShapeKind::T => 'T',
            ShapeKind::S => 'S',
            ShapeKind::Z => 'Z',
            ShapeKind::J => 'J',
            ShapeKind::L => 'L',
        }
    }

    /// Parses the character produced by [`Self::as_char`].
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(ShapeKind::I),
            'O' => Some(ShapeKind::O),
            'T' => Some(ShapeKind::T),
            'S' => Some(ShapeKind::S),
            'Z' => Some(ShapeKind::Z),
            'J' => Some(ShapeKind::J),
            'L' => Some(ShapeKind::L),
            _ => None,
        }
    }
}

/// Orientation index of a shape.
///
/// `0` is the spawn orientation; each rotation advances the index modulo the
/// orientation count of the shape kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Orientation(u8);

impl Orientation {
    /// Position in the kind's rotation cycle, starting at 0.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[expect(clippy::cast_possible_truncation)]
    fn rotated_right(self, kind: ShapeKind) -> Self {
        let count = kind.rotations().len() as u8;
        Orientation((self.0 + 1) % count)
    }
}

/// A tetromino at a position and orientation.
///
/// The anchor `(column, row)` is signed because candidate positions produced by
/// [`Shape::translated`] or [`Shape::rotated`] may lie outside the grid; the
/// board engine rejects those before committing them. Block positions are always
/// derived from the rotation table, so they stay consistent with the kind and
/// orientation.
///
/// # Example
///
/// ```
/// use tetrix_engine::{BlockColor, Shape, ShapeKind};
///
/// let shape = Shape::new(ShapeKind::I, BlockColor::Teal, 4, 0);
/// assert_eq!(shape.lowest_block_row(), 3);
///
/// let rotated = shape.rotated();
/// assert_eq!(rotated.lowest_block_row(), 0);
/// assert_eq!(rotated.occupied_columns().as_slice(), &[3, 4, 5, 6]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Shape {
    kind: ShapeKind,
    orientation: Orientation,
    column: i32,
    row: i32,
    color: BlockColor,
}

impl Shape {
    /// Creates a shape in orientation 0 anchored at `(column, row)`.
    #[must_use]
    pub fn new(kind: ShapeKind, color: BlockColor, column: i32, row: i32) -> Self {
        Self {
            kind,
            orientation: Orientation::default(),
            column,
            row,
            color,
        }
    }

    /// Tetromino kind.
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Current orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Colour given to every block of the shape.
    #[must_use]
    pub fn color(&self) -> BlockColor {
        self.color
    }

    /// Anchor position `(column, row)`.
    #[must_use]
    pub fn anchor(&self) -> (i32, i32) {
        (self.column, self.row)
    }

    /// Signed `(column, row)` of each block, in table order.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind.rotations()[self.orientation.index()]
            .iter()
            .map(|&(dc, dr)| (self.column + i32::from(dc), self.row + i32::from(dr)))
    }

    /// Blocks of the shape at their current positions.
    ///
    /// # Panics
    ///
    /// Panics if any block lies above or left of the grid origin. Only shapes
    /// validated against the grid may be turned into blocks.
    #[must_use]
    pub fn blocks(&self) -> ArrayVec<Block, BLOCKS_PER_SHAPE> {
        self.cells()
            .map(|(column, row)| {
                let column = usize::try_from(column).expect("block column must be non-negative");
                let row = usize::try_from(row).expect("block row must be non-negative");
                Block::new(column, row, self.color)
            })
            .collect()
    }

    /// Advances the orientation by one step clockwise.
    pub fn rotate(&mut self) {
        self.orientation = self.orientation.rotated_right(self.kind);
    }

    /// Shifts every block by the same delta.
    pub fn translate(&mut self, delta_column: i32, delta_row: i32) {
        self.column += delta_column;
        self.row += delta_row;
    }

    /// Returns a copy rotated clockwise.
    #[must_use]
    pub fn rotated(mut self) -> Self {
        self.rotate();
        self
    }

    /// Returns a copy moved by the given offsets.
    #[must_use]
    pub fn translated(mut self, delta_column: i32, delta_row: i32) -> Self {
        self.translate(delta_column, delta_row);
        self
    }

    /// Row index of the lowest block (largest row).
    #[must_use]
    pub fn lowest_block_row(&self) -> i32 {
        self.cells().map(|(_, row)| row).max().unwrap_or(self.row)
    }

    /// Distinct columns covered by the shape, ascending.
    #[must_use]
    pub fn occupied_columns(&self) -> ArrayVec<i32, BLOCKS_PER_SHAPE> {
        let mut columns: ArrayVec<i32, BLOCKS_PER_SHAPE> =
            self.cells().map(|(column, _)| column).collect();
        columns.sort_unstable();
        let mut distinct = ArrayVec::new();
        for column in columns {
            if distinct.last() != Some(&column) {
                distinct.push(column);
            }
        }
        distinct
    }
}
