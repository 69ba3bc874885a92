//! Move rejections.
//!
//! A rejected move leaves the game state exactly as it was and does not
//! notify the observer.

use derive_more::{Display, Error};

use crate::{Location, SetId, Size};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// No piece has this index (valid indices are 0..36).
    #[display("no piece with index {index}")]
    UnknownPiece { index: usize },

    /// Coordinates fall outside the 3x3 board.
    #[display("location [{row}, {col}] is off the board")]
    OffBoard { row: u8, col: u8 },

    /// The game has already been won.
    #[display("game is over, {winner} won")]
    GameOver { winner: SetId },

    /// The piece belongs to a set other than the one to move.
    #[display("piece {index} belongs to {owner} but it is {active}'s turn")]
    NotYourTurn {
        index: usize,
        owner: SetId,
        active: SetId,
    },

    /// The piece is already on the board.
    #[display("piece {index} already placed at {location}")]
    AlreadyPlaced { index: usize, location: Location },

    /// A piece of the same size already sits on the target cell.
    #[display("a {size} piece already occupies {location}")]
    Occupied { location: Location, size: Size },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let loc = Location::new(0, 2).unwrap();
        assert_eq!(
            MoveError::Occupied {
                location: loc,
                size: Size::Medium
            }
            .to_string(),
            "a Medium piece already occupies [0, 2]"
        );
        assert_eq!(
            MoveError::NotYourTurn {
                index: 9,
                owner: SetId(1),
                active: SetId(0)
            }
            .to_string(),
            "piece 9 belongs to set 1 but it is set 0's turn"
        );
        assert_eq!(
            MoveError::GameOver { winner: SetId(3) }.to_string(),
            "game is over, set 3 won"
        );
    }

    #[test]
    fn test_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&MoveError::UnknownPiece { index: 40 });
    }
}
