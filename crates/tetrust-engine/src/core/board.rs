use crate::{BoardFromCellsError, core::piece::Piece};

/// Single row of the board, one cell id per column.
type Row = [u8; Board::WIDTH];

const EMPTY_ROW: Row = [0; Board::WIDTH];

/// Fixed 10×20 playfield.
///
/// Each cell holds `0` when empty or the lock id (1..=7) of the piece kind
/// that filled it. Row 0 is the top of the board.
///
/// Anything outside the grid reads as solid, so collision tests need no
/// separate bounds check.
///
/// Only [`Board::lock_piece`] and [`Board::clear_lines`] mutate a board during
/// play. Agents evaluate "what-if" placements on a [`Clone`] of the
/// observation board, never on the engine's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [Row; Board::HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;
    pub const CELL_COUNT: usize = Self::WIDTH * Self::HEIGHT;

    pub const EMPTY: Self = Self {
        rows: [EMPTY_ROW; Self::HEIGHT],
    };

    fn index(x: i32, y: i32) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok().filter(|x| *x < Self::WIDTH)?;
        let y = usize::try_from(y).ok().filter(|y| *y < Self::HEIGHT)?;
        Some((x, y))
    }

    /// Returns the cell value at `(x, y)`; out-of-bounds cells read as `1`.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        match Self::index(x, y) {
            Some((x, y)) => self.rows[y][x],
            None => 1,
        }
    }

    #[must_use]
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y) != 0
    }

    /// Checks if any cell of the piece is out of bounds or already occupied.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().iter().any(|&(x, y)| self.is_occupied(x, y))
    }

    /// Writes the piece's lock id into each of its cells.
    ///
    /// Cells outside the grid are ignored.
    pub fn lock_piece(&mut self, piece: &Piece) {
        let id = piece.kind().lock_id();
        for (x, y) in piece.cells() {
            if let Some((x, y)) = Self::index(x, y) {
                self.rows[y][x] = id;
            }
        }
    }

    #[must_use]
    pub fn is_line_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|cell| *cell != 0)
    }

    /// Clears filled lines and returns the number of lines cleared.
    ///
    /// Rows above a cleared line shift down and empty rows enter at the top.
    pub fn clear_lines(&mut self) -> usize {
        let mut count = 0;

        for y in (0..Self::HEIGHT).rev() {
            if self.is_line_full(y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }

        self.rows[..count].fill(EMPTY_ROW);
        count
    }

    /// Returns `HEIGHT - y` of the topmost filled cell, or 0 for an empty column.
    #[must_use]
    pub fn column_height(&self, x: usize) -> usize {
        self.rows
            .iter()
            .position(|row| row[x] != 0)
            .map_or(0, |top| Self::HEIGHT - top)
    }

    #[must_use]
    pub fn column_heights(&self) -> [usize; Self::WIDTH] {
        std::array::from_fn(|x| self.column_height(x))
    }

    /// Counts empty cells below the first filled cell of the column.
    #[must_use]
    pub fn holes_in_column(&self, x: usize) -> usize {
        self.rows
            .iter()
            .skip_while(|row| row[x] == 0)
            .filter(|row| row[x] == 0)
            .count()
    }

    #[must_use]
    pub fn holes_per_column(&self) -> [usize; Self::WIDTH] {
        std::array::from_fn(|x| self.holes_in_column(x))
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8; Self::WIDTH]> + '_ {
        self.rows.iter()
    }

    /// Returns the cells in row-major order (`cells[y * WIDTH + x]`).
    #[must_use]
    pub fn cells(&self) -> Vec<u8> {
        self.rows.iter().flatten().copied().collect()
    }

    /// Builds a board from a row-major list of [`Board::CELL_COUNT`] cell values.
    pub fn from_cells(cells: &[u8]) -> Result<Self, BoardFromCellsError> {
        if cells.len() != Self::CELL_COUNT {
            return Err(BoardFromCellsError::CellCount(cells.len()));
        }
        if let Some(value) = cells.iter().copied().find(|value| *value > 7) {
            return Err(BoardFromCellsError::CellValue(value));
        }
        let mut board = Self::EMPTY;
        for (row, chunk) in board.rows.iter_mut().zip(cells.chunks_exact(Self::WIDTH)) {
            row.copy_from_slice(chunk);
        }
        Ok(board)
    }

    /// Creates a `Board` from ASCII art, mainly for tests and fixtures.
    ///
    /// `.` is an empty cell, `#` a filled cell (id 1) and a piece letter
    /// (`I`, `O`, `T`, `S`, `Z`, `J`, `L`) a cell filled by that kind. Rows are
    /// written top to bottom; when fewer than 20 rows are given they fill the
    /// bottom of the board.
    ///
    /// # Panics
    ///
    /// Panics if a row is not exactly 10 cells wide or there are more than 20 rows.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art.lines().filter(|line| !line.trim().is_empty()).collect();
        assert!(
            lines.len() <= Self::HEIGHT,
            "at most {} rows allowed, got {}",
            Self::HEIGHT,
            lines.len()
        );

        let mut board = Self::EMPTY;
        let top = Self::HEIGHT - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<u8> = line
                .trim()
                .chars()
                .map(|ch| match ch {
                    '.' => 0,
                    '#' => 1,
                    other => crate::PieceKind::from_char(other)
                        .map(crate::PieceKind::lock_id)
                        .unwrap_or_else(|| panic!("invalid cell character {other:?}")),
                })
                .collect();
            assert_eq!(
                cells.len(),
                Self::WIDTH,
                "Each row must have exactly {} cells, got {} at row {}",
                Self::WIDTH,
                cells.len(),
                i
            );
            board.rows[top + i].copy_from_slice(&cells);
        }
        board
    }
}
