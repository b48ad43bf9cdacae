use serde::{Deserialize, Serialize};

use crate::{Block, Grid};

/// A block moved down by a line clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct FallenBlock {
    pub from_column: usize,
    pub from_row: usize,
    /// The block at its new position.
    pub block: Block,
}

/// Outcome of one `remove_completed_lines` call.
///
/// Transient: computed once per landing so the presentation layer can animate
/// the collapse, then discarded.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LineClearResult {
    /// Removed row indices, ascending.
    pub removed_rows: Vec<usize>,
    /// Blocks that moved down, bottom-up then left-to-right by original position.
    pub fallen_blocks: Vec<FallenBlock>,
}

impl LineClearResult {
    /// Returns `true` if no row was removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removed_rows.is_empty()
    }

    /// Number of rows removed.
    #[must_use]
    pub fn lines_removed(&self) -> usize {
        self.removed_rows.len()
    }
}

/// Removes every filled row and lets the rows above settle.
///
/// Each surviving block drops by the number of removed rows below it. Rows are
/// processed bottom-up so every destination cell is already vacated when a
/// block moves into it.
pub(crate) fn collapse_completed_rows(grid: &mut Grid<Block>) -> LineClearResult {
    let removed_rows: Vec<usize> = (0..grid.rows())
        .filter(|&row| grid.is_row_filled(row))
        .collect();
    if removed_rows.is_empty() {
        return LineClearResult::default();
    }

    for &row in &removed_rows {
        for column in 0..grid.columns() {
            grid.take(column, row);
        }
    }

    let mut fallen_blocks = Vec::new();
    let mut shift = 0;
    for row in (0..grid.rows()).rev() {
        if removed_rows.binary_search(&row).is_ok() {
            shift += 1;
            continue;
        }
        if shift == 0 {
            continue;
        }
        for column in 0..grid.columns() {
            let Some(block) = grid.take(column, row) else {
                continue;
            };
            let block = block.moved_to(column, row + shift);
            grid.set(column, row + shift, block);
            fallen_blocks.push(FallenBlock {
                from_column: column,
                from_row: row,
                block,
            });
        }
    }

    LineClearResult {
        removed_rows,
        fallen_blocks,
    }
}
