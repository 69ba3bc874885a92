//! Rules engine for a four-set stacking game on a 3x3 board.
//!
//! # Composition
//!
//! ```text
//! 4 sets × 3 sizes × 3 copies = 36 pieces
//!
//! Piece indices (set-major, then [small, medium, large] three times):
//!   set 0: 0..9    set 1: 9..18    set 2: 18..27    set 3: 27..36
//! ```
//!
//! # Board
//!
//! ```text
//! Locations are [row, col] pairs, row-major cell index = row * 3 + col:
//!   [0,0]=0  [0,1]=1  [0,2]=2
//!   [1,0]=3  [1,1]=4  [1,2]=5
//!   [2,0]=6  [2,1]=7  [2,2]=8
//! ```
//!
//! A cell holds at most one piece of each size, so up to three pieces may
//! stack on it. A set wins by lining up three of its pieces along a row,
//! column or diagonal, or by stacking three on one cell, when their sizes
//! are all equal or run strictly small→medium→large in either direction.

use serde::{Serialize, Serializer};

pub mod error;
pub mod manager;
pub mod win;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::MoveError;
pub use manager::{GameStateManager, IndexedPiece, MoveOutcome, Observer, Rules};
pub use win::{detect_win, is_winning_sizes, winning_triple, Line, WinningTriple};

/// Number of sets (players).
pub const SET_COUNT: usize = 4;
/// Copies of each size owned by a set.
pub const COPIES_PER_SIZE: usize = 3;
/// Pieces owned by each set.
pub const PIECES_PER_SET: usize = COPIES_PER_SIZE * 3;
/// Total pieces in a game.
pub const PIECE_COUNT: usize = SET_COUNT * PIECES_PER_SET;
/// Width and height of the board.
pub const BOARD_SIDE: u8 = 3;

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Size {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl Size {
    /// All sizes, smallest first.
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    /// Convert from index (0, 1, 2) to Size.
    #[inline]
    pub fn from_index(idx: usize) -> Option<Size> {
        Self::ALL.get(idx).copied()
    }

    /// Get all sizes as an iterator.
    pub fn all() -> impl Iterator<Item = Size> {
        Self::ALL.into_iter()
    }
}

/// Set (player) identifier, 0-3.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, derive_more::Display)]
#[serde(transparent)]
#[display("set {_0}")]
pub struct SetId(pub u8);

impl SetId {
    /// The set that moves first.
    pub const FIRST: SetId = SetId(0);

    /// The set whose turn follows this one (0→1→2→3→0).
    #[inline]
    pub fn next(self) -> SetId {
        SetId((self.0 + 1) % SET_COUNT as u8)
    }

    /// Check if this is one of the four sets.
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < SET_COUNT
    }

    /// Iterate over all four sets.
    pub fn all() -> impl Iterator<Item = SetId> {
        (0..SET_COUNT as u8).map(SetId)
    }
}

/// A cell on the 3x3 board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, derive_more::Display)]
#[serde(into = "[u8; 2]")]
#[display("[{row}, {col}]")]
pub struct Location {
    row: u8,
    col: u8,
}

impl Location {
    /// Create a location from row and column, `None` if either is off the board.
    #[inline]
    pub fn new(row: u8, col: u8) -> Option<Location> {
        (row < BOARD_SIDE && col < BOARD_SIDE).then_some(Location { row, col })
    }

    /// Create a location from a row-major cell index (0-8).
    #[inline]
    pub fn from_index(idx: usize) -> Option<Location> {
        let side = BOARD_SIDE as usize;
        (idx < side * side).then(|| Location {
            row: (idx / side) as u8,
            col: (idx % side) as u8,
        })
    }

    /// Get the row (0-2).
    #[inline]
    pub fn row(self) -> u8 {
        self.row
    }

    /// Get the column (0-2).
    #[inline]
    pub fn col(self) -> u8 {
        self.col
    }

    /// Row-major cell index (0-8).
    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIDE as usize + self.col as usize
    }

    /// Iterate over all 9 cells in row-major order.
    pub fn all() -> impl Iterator<Item = Location> {
        (0..BOARD_SIDE).flat_map(|row| (0..BOARD_SIDE).map(move |col| Location { row, col }))
    }
}

impl TryFrom<[u8; 2]> for Location {
    type Error = MoveError;

    fn try_from([row, col]: [u8; 2]) -> Result<Self, Self::Error> {
        Location::new(row, col).ok_or(MoveError::OffBoard { row, col })
    }
}

impl From<Location> for [u8; 2] {
    fn from(loc: Location) -> Self {
        [loc.row, loc.col]
    }
}

/// A placeable piece ("stack item").
///
/// `set` and `size` are fixed at creation. `location` starts empty and is
/// assigned at most once, by [`GameStateManager::update_piece_location`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Piece {
    set: SetId,
    size: Size,
    location: Option<Location>,
}

impl Piece {
    /// Create an unplaced piece.
    #[inline]
    pub fn new(set: SetId, size: Size) -> Piece {
        Piece {
            set,
            size,
            location: None,
        }
    }

    /// This piece placed at `location`. Handy for feeding the win detector
    /// positions that did not come from a game.
    #[inline]
    pub fn placed_at(mut self, location: Location) -> Piece {
        self.location = Some(location);
        self
    }

    #[inline]
    pub fn set(&self) -> SetId {
        self.set
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.location.is_some()
    }

    pub(crate) fn place(&mut self, location: Location) {
        debug_assert!(self.location.is_none(), "piece placed twice");
        self.location = Some(location);
    }
}

/// Game phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Playing,
    Ended,
}

/// The published game state.
///
/// Only the manager mutates it. Observers read it after every notification.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct GameState {
    phase: Phase,
    #[serde(serialize_with = "serialize_pieces")]
    pieces: [Piece; PIECE_COUNT],
    active_set: SetId,
    winner: Option<SetId>,
}

fn serialize_pieces<S: Serializer>(pieces: &[Piece; PIECE_COUNT], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(pieces.iter())
}

impl GameState {
    /// Fresh game: set 0 to move, all 36 pieces unplaced.
    pub fn new() -> GameState {
        GameState {
            phase: Phase::Playing,
            pieces: default_pieces(),
            active_set: SetId::FIRST,
            winner: None,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// All 36 pieces in index order.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Piece at `index`, if it exists.
    #[inline]
    pub fn piece(&self, index: usize) -> Option<&Piece> {
        self.pieces.get(index)
    }

    /// Whose turn it is. Frozen once the game has ended.
    #[inline]
    pub fn active_set(&self) -> SetId {
        self.active_set
    }

    /// The winner, present exactly when the phase is [`Phase::Ended`].
    #[inline]
    pub fn winner(&self) -> Option<SetId> {
        self.winner
    }

    /// Check if a piece of `size` already sits on `location`.
    pub fn is_occupied(&self, location: Location, size: Size) -> bool {
        self.pieces
            .iter()
            .any(|p| p.size == size && p.location == Some(location))
    }

    /// Pieces owned by `set`, in index order.
    pub fn pieces_for_set(&self, set: SetId) -> impl Iterator<Item = (usize, &Piece)> + '_ {
        self.pieces.iter().enumerate().filter(move |(_, p)| p.set == set)
    }

    /// Pieces of `set` not yet on the board, counted per size
    /// as [small, medium, large].
    pub fn reserves(&self, set: SetId) -> [u8; 3] {
        let mut counts = [0u8; 3];
        for (_, piece) in self.pieces_for_set(set) {
            if !piece.is_placed() {
                counts[piece.size as usize] += 1;
            }
        }
        counts
    }

    /// Put piece `index` on `location`. Caller has checked the index.
    pub(crate) fn place(&mut self, index: usize, location: Location) {
        self.pieces[index].place(location);
    }

    pub(crate) fn advance_turn(&mut self) {
        debug_assert_eq!(self.phase, Phase::Playing);
        self.active_set = self.active_set.next();
    }

    pub(crate) fn finish(&mut self, winner: SetId) {
        self.phase = Phase::Ended;
        self.winner = Some(winner);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the 36 starting pieces. Each one is its own value, so placing one
/// copy never touches its siblings.
fn default_pieces() -> [Piece; PIECE_COUNT] {
    std::array::from_fn(|i| {
        let set = SetId((i / PIECES_PER_SET) as u8);
        let size = Size::ALL[i % Size::ALL.len()];
        Piece::new(set, size)
    })
}
