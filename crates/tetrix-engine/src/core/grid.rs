use std::fmt;

use super::block::Block;

/// Fixed-size two-dimensional cell store.
///
/// Cells are addressed by `(column, row)` with `(0, 0)` at the top-left corner;
/// columns grow rightward and rows grow downward. Storage is a single contiguous
/// buffer indexed by `row * columns + column`.
///
/// The grid is pure storage: it knows nothing about shapes or line clears.
/// Accessing a cell outside `[0, columns) × [0, rows)` is a bug in the caller
/// and panics.
///
/// # Example
///
/// ```
/// use tetrix_engine::Grid;
///
/// let mut grid = Grid::new(10, 20);
/// grid.set(3, 19, 'x');
/// assert_eq!(grid.get(3, 19), Some(&'x'));
/// assert_eq!(grid.get(4, 19), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    columns: usize,
    rows: usize,
    cells: Vec<Option<T>>,
}

impl<T> Grid<T> {
    /// Creates an empty grid.
    ///
    /// # Panics
    ///
    /// Panics if `columns` or `rows` is zero.
    #[must_use]
    pub fn new(columns: usize, rows: usize) -> Self {
        assert!(columns > 0, "grid must have at least one column");
        assert!(rows > 0, "grid must have at least one row");
        let mut cells = Vec::with_capacity(columns * rows);
        cells.resize_with(columns * rows, || None);
        Self {
            columns,
            rows,
            cells,
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    fn index(&self, column: usize, row: usize) -> usize {
        assert!(
            column < self.columns && row < self.rows,
            "cell ({column}, {row}) outside {}x{} grid",
            self.columns,
            self.rows,
        );
        row * self.columns + column
    }

    /// Returns `true` if the signed coordinate lies inside the grid.
    ///
    /// Shapes compute candidate positions that may fall off the edges, so the
    /// bounds test takes signed values.
    #[must_use]
    pub fn contains(&self, column: i32, row: i32) -> bool {
        usize::try_from(column).is_ok_and(|c| c < self.columns)
            && usize::try_from(row).is_ok_and(|r| r < self.rows)
    }

    /// Returns `true` if the signed coordinate is inside the grid and empty.
    #[must_use]
    pub fn is_vacant(&self, column: i32, row: i32) -> bool {
        match (usize::try_from(column), usize::try_from(row)) {
            (Ok(column), Ok(row)) if column < self.columns && row < self.rows => {
                !self.is_occupied(column, row)
            }
            _ => false,
        }
    }

    /// Returns the occupant of the cell, if any.
    #[must_use]
    pub fn get(&self, column: usize, row: usize) -> Option<&T> {
        self.cells[self.index(column, row)].as_ref()
    }

    /// Stores `value` in the cell, returning the previous occupant.
    pub fn set(&mut self, column: usize, row: usize, value: T) -> Option<T> {
        let index = self.index(column, row);
        self.cells[index].replace(value)
    }

    /// Empties the cell, returning its occupant.
    pub fn take(&mut self, column: usize, row: usize) -> Option<T> {
        let index = self.index(column, row);
        self.cells[index].take()
    }

    /// Returns `true` if the cell holds a value.
    #[must_use]
    pub fn is_occupied(&self, column: usize, row: usize) -> bool {
        self.get(column, row).is_some()
    }

    /// Returns `true` when every column in `row` holds a value.
    #[must_use]
    pub fn is_row_filled(&self, row: usize) -> bool {
        let start = self.index(0, row);
        self.cells[start..][..self.columns]
            .iter()
            .all(Option::is_some)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Iterates over occupied cells in row-major order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        self.cells.iter().enumerate().filter_map(|(index, cell)| {
            cell.as_ref()
                .map(|value| (index % self.columns, index / self.columns, value))
        })
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill_with(|| None);
    }
}

impl fmt::Display for Grid<Block> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let ch = if self.is_occupied(column, row) {
                    '#'
                } else {
                    '.'
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlockColor;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::<u8>::new(10, 20);
        assert_eq!(grid.columns(), 10);
        assert_eq!(grid.rows(), 20);
        assert_eq!(grid.occupied_count(), 0);
        for row in 0..20 {
            for column in 0..10 {
                assert_eq!(grid.get(column, row), None);
            }
        }
    }

    #[test]
    #[should_panic(expected = "at least one column")]
    fn test_zero_columns_panics() {
        let _ = Grid::<u8>::new(0, 20);
    }

    #[test]
    fn test_set_and_get_leaves_other_cells_alone() {
        let mut grid = Grid::new(4, 3);
        assert_eq!(grid.set(2, 1, 7), None);
        assert_eq!(grid.get(2, 1), Some(&7));
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.set(2, 1, 9), Some(7));
        assert_eq!(grid.take(2, 1), Some(9));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_row_major_layout() {
        let mut grid = Grid::new(3, 2);
        grid.set(0, 1, 'a');
        grid.set(2, 0, 'b');
        let cells: Vec<_> = grid.iter_occupied().collect();
        assert_eq!(cells, vec![(2, 0, &'b'), (0, 1, &'a')]);
    }

    #[test]
    #[should_panic(expected = "outside 10x20 grid")]
    fn test_out_of_range_get_panics() {
        let grid = Grid::<u8>::new(10, 20);
        let _ = grid.get(10, 0);
    }

    #[test]
    fn test_contains_signed() {
        let grid = Grid::<u8>::new(10, 20);
        assert!(grid.contains(0, 0));
        assert!(grid.contains(9, 19));
        assert!(!grid.contains(-1, 0));
        assert!(!grid.contains(0, -1));
        assert!(!grid.contains(10, 0));
        assert!(!grid.contains(0, 20));
    }

    #[test]
    fn test_is_vacant() {
        let mut grid = Grid::new(3, 2);
        grid.set(1, 1, ());
        assert!(grid.is_vacant(0, 1));
        assert!(!grid.is_vacant(1, 1));
        assert!(!grid.is_vacant(-1, 0));
        assert!(!grid.is_vacant(3, 0));
        assert!(!grid.is_vacant(0, 2));
    }

    #[test]
    fn test_is_row_filled() {
        let mut grid = Grid::new(3, 2);
        grid.set(0, 1, ());
        grid.set(1, 1, ());
        assert!(!grid.is_row_filled(1));
        grid.set(2, 1, ());
        assert!(grid.is_row_filled(1));
        assert!(!grid.is_row_filled(0));
    }

    #[test]
    fn test_clear() {
        let mut grid = Grid::new(3, 2);
        grid.set(0, 0, 1);
        grid.set(2, 1, 2);
        grid.clear();
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_display_ascii() {
        let mut grid = Grid::new(3, 2);
        grid.set(1, 0, Block::new(1, 0, BlockColor::Red));
        assert_eq!(grid.to_string(), ".#.\n...\n");
    }
}
