//! Win detection.
//!
//! A winning triple is three pieces along one of the 8 board lines (one per
//! cell), or three pieces stacked on a single cell (a "node"), whose sizes in
//! line order are all equal, strictly ascending or strictly descending.
//!
//! The detector does not look at piece ownership. Callers pass the pieces of
//! the set they want checked.

use serde::Serialize;
use tracing::{instrument, trace};

use crate::{Location, Piece, Size, BOARD_SIDE};

const CELL_COUNT: usize = (BOARD_SIDE * BOARD_SIDE) as usize;

/// A group of cells that can hold a winning triple.
///
/// Names follow the `[row, col]` reading of [`Location`]: `Row(r)` holds the
/// first coordinate fixed. A front end that reads locations as `[x, y]`
/// will see `Row` and `Column` swapped, e.g. [0,0], [1,0], [2,0] is
/// `Column(0)` here.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Line {
    /// Fixed row, read left to right.
    Row(u8),
    /// Fixed column, read top to bottom.
    Column(u8),
    /// [0,0] → [1,1] → [2,2].
    Diagonal,
    /// [2,0] → [1,1] → [0,2].
    AntiDiagonal,
    /// The stack on a single cell, read in piece index order.
    Node(Location),
}

const fn at(row: u8, col: u8) -> Location {
    Location { row, col }
}

/// The 8 three-cell lines: 3 rows, 3 columns, 2 diagonals.
const WIN_LINES: [(Line, [Location; 3]); 8] = [
    (Line::Row(0), [at(0, 0), at(0, 1), at(0, 2)]),
    (Line::Row(1), [at(1, 0), at(1, 1), at(1, 2)]),
    (Line::Row(2), [at(2, 0), at(2, 1), at(2, 2)]),
    (Line::Column(0), [at(0, 0), at(1, 0), at(2, 0)]),
    (Line::Column(1), [at(0, 1), at(1, 1), at(2, 1)]),
    (Line::Column(2), [at(0, 2), at(1, 2), at(2, 2)]),
    (Line::Diagonal, [at(0, 0), at(1, 1), at(2, 2)]),
    (Line::AntiDiagonal, [at(2, 0), at(1, 1), at(0, 2)]),
];

impl Line {
    /// Cells covered by this line, in reading order.
    pub fn cells(self) -> Vec<Location> {
        match self {
            Line::Node(loc) => vec![loc],
            line => WIN_LINES
                .iter()
                .find(|(l, _)| *l == line)
                .map(|(_, cells)| cells.to_vec())
                .unwrap_or_default(),
        }
    }

    /// The 8 three-cell lines, rows first, then columns, then diagonals.
    pub fn all_lines() -> impl Iterator<Item = Line> {
        WIN_LINES.into_iter().map(|(line, _)| line)
    }
}

/// A triple that wins, with its sizes in line order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct WinningTriple {
    pub line: Line,
    pub sizes: [Size; 3],
}

/// Check whether three sizes, read in line order, form a winning pattern.
#[inline]
pub fn is_winning_sizes([a, b, c]: [Size; 3]) -> bool {
    let uniform = a == b && b == c;
    let ascending = a < b && b < c;
    let descending = a > b && b > c;
    uniform || ascending || descending
}

/// Check whether the placed pieces among `pieces` contain a winning triple.
pub fn detect_win<'a, I>(pieces: I) -> bool
where
    I: IntoIterator<Item = &'a Piece>,
{
    winning_triple(pieces).is_some()
}

/// Find the first winning triple among the placed pieces.
///
/// Search order is rows, columns, main diagonal, anti-diagonal, then the
/// nodes in row-major order. Unplaced pieces are ignored.
#[instrument(level = "trace", skip_all)]
pub fn winning_triple<'a, I>(pieces: I) -> Option<WinningTriple>
where
    I: IntoIterator<Item = &'a Piece>,
{
    let cells = stacks_by_cell(pieces);

    for (line, [a, b, c]) in WIN_LINES {
        for &x in &cells[a.index()] {
            for &y in &cells[b.index()] {
                for &z in &cells[c.index()] {
                    let sizes = [x, y, z];
                    if is_winning_sizes(sizes) {
                        trace!(?line, ?sizes, "winning line");
                        return Some(WinningTriple { line, sizes });
                    }
                }
            }
        }
    }

    for loc in Location::all() {
        // A node only counts when it holds exactly three pieces
        if let [x, y, z] = cells[loc.index()][..] {
            let sizes = [x, y, z];
            if is_winning_sizes(sizes) {
                trace!(node = %loc, ?sizes, "winning node");
                return Some(WinningTriple {
                    line: Line::Node(loc),
                    sizes,
                });
            }
        }
    }

    None
}

/// Group placed pieces by cell, keeping the order the pieces were given in.
fn stacks_by_cell<'a, I>(pieces: I) -> [Vec<Size>; CELL_COUNT]
where
    I: IntoIterator<Item = &'a Piece>,
{
    let mut cells: [Vec<Size>; CELL_COUNT] = Default::default();
    for piece in pieces {
        if let Some(loc) = piece.location() {
            cells[loc.index()].push(piece.size());
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetId;
    use Size::*;

    fn piece(size: Size, row: u8, col: u8) -> Piece {
        Piece::new(SetId(0), size).placed_at(Location::new(row, col).unwrap())
    }

    #[test]
    fn test_winning_sizes() {
        assert!(is_winning_sizes([Small, Small, Small]));
        assert!(is_winning_sizes([Large, Large, Large]));
        assert!(is_winning_sizes([Small, Medium, Large]));
        assert!(is_winning_sizes([Large, Medium, Small]));

        assert!(!is_winning_sizes([Small, Large, Medium]));
        assert!(!is_winning_sizes([Medium, Small, Large]));
        assert!(!is_winning_sizes([Small, Small, Medium]));
        assert!(!is_winning_sizes([Large, Small, Large]));
    }

    #[test]
    fn test_empty_has_no_win() {
        let none: [Piece; 0] = [];
        assert!(!detect_win(&none));
        let unplaced = [Piece::new(SetId(0), Small); 3];
        assert!(!detect_win(&unplaced));
    }

    #[test]
    fn test_row_same_size() {
        let pieces = [piece(Medium, 1, 0), piece(Medium, 1, 1), piece(Medium, 1, 2)];
        let triple = winning_triple(&pieces).unwrap();
        assert_eq!(triple.line, Line::Row(1));
        assert_eq!(triple.sizes, [Medium; 3]);
    }

    #[test]
    fn test_column_ascending() {
        let pieces = [piece(Small, 0, 2), piece(Medium, 1, 2), piece(Large, 2, 2)];
        assert_eq!(winning_triple(&pieces).unwrap().line, Line::Column(2));
    }

    #[test]
    fn test_column_descending() {
        let pieces = [piece(Large, 0, 0), piece(Medium, 1, 0), piece(Small, 2, 0)];
        let triple = winning_triple(&pieces).unwrap();
        assert_eq!(triple.line, Line::Column(0));
        assert_eq!(triple.sizes, [Large, Medium, Small]);
    }

    #[test]
    fn test_diagonals() {
        let main = [piece(Small, 0, 0), piece(Medium, 1, 1), piece(Large, 2, 2)];
        assert_eq!(winning_triple(&main).unwrap().line, Line::Diagonal);

        let anti = [piece(Small, 2, 0), piece(Medium, 1, 1), piece(Large, 0, 2)];
        assert_eq!(winning_triple(&anti).unwrap().line, Line::AntiDiagonal);

        // Anti-diagonal read the other way is descending
        let anti_desc = [piece(Large, 2, 0), piece(Medium, 1, 1), piece(Small, 0, 2)];
        assert_eq!(winning_triple(&anti_desc).unwrap().line, Line::AntiDiagonal);
    }

    #[test]
    fn test_unordered_line_does_not_win() {
        let pieces = [piece(Small, 0, 0), piece(Large, 0, 1), piece(Medium, 0, 2)];
        assert!(!detect_win(&pieces));
    }

    #[test]
    fn test_two_in_a_line_does_not_win() {
        let pieces = [piece(Small, 0, 0), piece(Small, 0, 1)];
        assert!(!detect_win(&pieces));
    }

    #[test]
    fn test_node_ascending_wins() {
        let pieces = [piece(Small, 1, 1), piece(Medium, 1, 1), piece(Large, 1, 1)];
        let triple = winning_triple(&pieces).unwrap();
        assert_eq!(triple.line, Line::Node(Location::new(1, 1).unwrap()));
        assert_eq!(triple.sizes, [Small, Medium, Large]);
    }

    #[test]
    fn test_node_descending_wins() {
        let pieces = [piece(Large, 0, 2), piece(Medium, 0, 2), piece(Small, 0, 2)];
        let triple = winning_triple(&pieces).unwrap();
        assert_eq!(triple.line, Line::Node(Location::new(0, 2).unwrap()));
        assert_eq!(triple.sizes, [Large, Medium, Small]);
    }

    #[test]
    fn test_node_unordered_does_not_win() {
        // A full stack still reads in the order given: small, large, medium
        let pieces = [piece(Small, 1, 1), piece(Large, 1, 1), piece(Medium, 1, 1)];
        assert!(!detect_win(&pieces));

        let pieces = [piece(Large, 2, 0), piece(Small, 2, 0), piece(Medium, 2, 0)];
        assert!(!detect_win(&pieces));
    }

    #[test]
    fn test_node_needs_three() {
        let pieces = [piece(Small, 2, 2), piece(Large, 2, 2)];
        assert!(!detect_win(&pieces));
    }

    #[test]
    fn test_node_with_extra_pieces_does_not_qualify() {
        // Only reachable with a mixed input, but four on a node never counts
        let pieces = [
            piece(Small, 0, 0),
            piece(Small, 0, 0),
            piece(Medium, 0, 0),
            piece(Large, 0, 0),
        ];
        assert!(!detect_win(&pieces));
    }

    #[test]
    fn test_stacked_cells_multiply_candidates() {
        // [0,0] holds small+large, [0,1] medium, [0,2] small+large:
        // small-medium-large is one of the four combinations on row 0
        let pieces = [
            piece(Large, 0, 0),
            piece(Small, 0, 0),
            piece(Medium, 0, 1),
            piece(Small, 0, 2),
            piece(Large, 0, 2),
        ];
        assert_eq!(winning_triple(&pieces).unwrap().line, Line::Row(0));
    }

    #[test]
    fn test_first_coordinate_varying_is_a_column() {
        let pieces = [piece(Small, 0, 0), piece(Medium, 1, 0), piece(Large, 2, 0)];
        assert_eq!(winning_triple(&pieces).unwrap().line, Line::Column(0));
        assert_eq!(
            Line::Column(0).cells(),
            vec![
                Location::new(0, 0).unwrap(),
                Location::new(1, 0).unwrap(),
                Location::new(2, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn test_line_cells() {
        assert_eq!(Line::all_lines().count(), 8);
        assert_eq!(
            Line::AntiDiagonal.cells(),
            vec![
                Location::new(2, 0).unwrap(),
                Location::new(1, 1).unwrap(),
                Location::new(0, 2).unwrap(),
            ]
        );
        let center = Location::new(1, 1).unwrap();
        assert_eq!(Line::Node(center).cells(), vec![center]);
    }
}
