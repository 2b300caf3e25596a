//! Immutable maze grid.

use crate::{GridError, PlayerState, Position};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Classification of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Open floor.
    Empty,
    /// Impassable; moving into it loses the run.
    Wall,
    /// Target cell; reaching it wins the run.
    Goal,
}

impl Cell {
    /// Text symbol used by [`Grid::from_str`] and [`Grid::render`].
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Goal => 'G',
        }
    }

    /// Parses a text symbol.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            'G' | 'g' => Some(Cell::Goal),
            _ => None,
        }
    }
}

/// Rectangular grid of cells, fixed at construction.
///
/// Cells are stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

/// Unvalidated wire form of [`Grid`].
#[derive(Deserialize)]
struct RawGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height, raw.cells)
    }
}

/// The shipped level: start in the top-left, goal in the bottom-right.
const REFERENCE_MAZE: &str = "\
..#.....
.##.###.
......#.
#####...
....###.
.##.....
.#..##.#
...##..G";

impl Grid {
    /// Creates a grid from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyDimensions`] if either dimension is zero and
    /// [`GridError::CellCountMismatch`] if `cells` does not hold exactly
    /// `width * height` entries.
    #[instrument(skip(cells), fields(cells = cells.len()))]
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        let expected = width * height;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        debug!(width, height, "Grid constructed");
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid from rows of equal length.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::RaggedRows`] when a row's length differs from the
    /// first row, plus any error from [`Grid::new`].
    #[instrument(skip(rows), fields(rows = rows.len()))]
    pub fn from_rows(rows: &[&[Cell]]) -> Result<Self, GridError> {
        let width = rows.first().map_or(0, |r| r.len());
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, cells_in_row) in rows.iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(GridError::RaggedRows {
                    row,
                    expected: width,
                    actual: cells_in_row.len(),
                });
            }
            cells.extend_from_slice(cells_in_row);
        }
        Self::new(width, rows.len(), cells)
    }

    /// The shipped 8×8 level, built once per process.
    pub fn reference() -> &'static Grid {
        static REFERENCE: OnceLock<Grid> = OnceLock::new();
        REFERENCE.get_or_init(|| {
            REFERENCE_MAZE
                .parse()
                .unwrap_or_else(|e| panic!("reference maze is malformed: {e}"))
        })
    }

    /// Grid width (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if the position lies inside the grid.
    pub fn contains(&self, position: Position) -> bool {
        usize::try_from(position.x).is_ok_and(|x| x < self.width)
            && usize::try_from(position.y).is_ok_and(|y| y < self.height)
    }

    /// Returns the cell at the given position.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] if the position is outside the grid.
    #[instrument(skip(self))]
    pub fn cell_at(&self, position: Position) -> Result<Cell, GridError> {
        if !self.contains(position) {
            return Err(GridError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            });
        }
        // Both coordinates are non-negative once `contains` holds.
        let index = position.y as usize * self.width + position.x as usize;
        Ok(self.cells[index])
    }

    /// Positions of every goal cell, row by row.
    pub fn goals(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == Cell::Goal)
            .map(|(i, _)| Position::new((i % self.width) as i32, (i / self.width) as i32))
            .collect()
    }

    /// Renders the grid as text with the token drawn at its position.
    pub fn render(&self, player: &PlayerState) -> String {
        let mut result = String::with_capacity((self.width + 1) * self.height);
        for (i, cell) in self.cells.iter().enumerate() {
            let here = Position::new((i % self.width) as i32, (i / self.width) as i32);
            if here == player.position {
                result.push(player.heading.glyph());
            } else {
                result.push(cell.symbol());
            }
            if (i + 1) % self.width == 0 && i + 1 < self.cells.len() {
                result.push('\n');
            }
        }
        result
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parses one line per row: `.` empty, `#` wall, `G` goal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut rows = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let cells = line
                .chars()
                .enumerate()
                .map(|(column, symbol)| {
                    Cell::from_symbol(symbol).ok_or(GridError::InvalidCell {
                        symbol,
                        row,
                        column,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }

        let borrowed: Vec<&[Cell]> = rows.iter().map(Vec::as_slice).collect();
        Self::from_rows(&borrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Heading;

    #[test]
    fn test_reference_dimensions() {
        let grid = Grid::reference();
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 8);
        assert_eq!(grid.goals(), vec![Position::new(7, 7)]);
    }

    #[test]
    fn test_reference_cells() {
        let grid = Grid::reference();
        assert_eq!(grid.cell_at(Position::new(0, 0)), Ok(Cell::Empty));
        assert_eq!(grid.cell_at(Position::new(2, 0)), Ok(Cell::Wall));
        assert_eq!(grid.cell_at(Position::new(0, 3)), Ok(Cell::Wall));
        assert_eq!(grid.cell_at(Position::new(7, 7)), Ok(Cell::Goal));
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let grid = Grid::reference();
        for position in [
            Position::new(-1, 0),
            Position::new(0, -1),
            Position::new(8, 0),
            Position::new(0, 8),
        ] {
            assert!(matches!(
                grid.cell_at(position),
                Err(GridError::OutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert_eq!(
            Grid::new(0, 3, Vec::new()),
            Err(GridError::EmptyDimensions {
                width: 0,
                height: 3
            })
        );
    }

    #[test]
    fn test_new_rejects_wrong_cell_count() {
        assert_eq!(
            Grid::new(2, 2, vec![Cell::Empty; 3]),
            Err(GridError::CellCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        let result = Grid::from_rows(&[&[Cell::Empty, Cell::Goal], &[Cell::Wall]]);
        assert!(matches!(result, Err(GridError::RaggedRows { row: 1, .. })));
    }

    #[test]
    fn test_parse_rejects_unknown_symbol() {
        let result = "..\n.x".parse::<Grid>();
        assert!(matches!(
            result,
            Err(GridError::InvalidCell {
                symbol: 'x',
                row: 1,
                column: 1
            })
        ));
    }

    #[test]
    fn test_render_draws_token() {
        let grid: Grid = "..\n#G".parse().expect("valid grid");
        let player = PlayerState::new(Position::new(1, 0), Heading::Down);
        assert_eq!(grid.render(&player), ".v\n#G");
    }

    #[test]
    fn test_deserialize_validates_cell_count() {
        let result = serde_json::from_str::<Grid>(r#"{"width":8,"height":8,"cells":["Empty"]}"#);
        let err = result.expect_err("short cell list must be rejected");
        assert!(err.to_string().contains("cells"), "unexpected error: {err}");
    }

    #[test]
    fn test_deserialize_rejects_empty_dimensions() {
        let result = serde_json::from_str::<Grid>(r#"{"width":0,"height":2,"cells":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_keeps_valid_grid() {
        let grid = Grid::reference();
        let json = serde_json::to_string(grid).expect("serialize");
        let back: Grid = serde_json::from_str(&json).expect("valid grid");
        assert_eq!(&back, grid);
    }
}
