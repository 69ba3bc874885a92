//! Game state manager: validates moves, applies them, advances turns and
//! notifies an observer.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::win::{detect_win, winning_triple, WinningTriple};
use crate::{GameState, Location, MoveError, Phase, Piece, SetId};

/// Change notification, called once after every accepted move.
///
/// It runs while the manager is mutably borrowed, so it cannot call back
/// into the manager. Read [`GameStateManager::game_state`] once the move
/// call has returned.
pub type Observer = Box<dyn FnMut()>;

/// Which optional legality checks are applied.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Only pieces of the active set may be placed.
    pub enforce_turn_order: bool,
    /// Reject every move once a set has won.
    pub lock_when_ended: bool,
}

impl Rules {
    /// Neither check: any unplaced piece may be placed at any time, also
    /// after the game has ended.
    pub fn permissive() -> Rules {
        Rules {
            enforce_turn_order: false,
            lock_when_ended: false,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            enforce_turn_order: true,
            lock_when_ended: true,
        }
    }
}

/// Result of an accepted move.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// No win. The turn passed to `next`.
    Continue { next: SetId },
    /// The mover completed a winning triple.
    Won { winner: SetId },
}

/// A piece together with its position in the full 36-piece sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct IndexedPiece {
    pub index: usize,
    pub piece: Piece,
}

/// Owns one game session.
pub struct GameStateManager {
    state: GameState,
    rules: Rules,
    observer: Option<Observer>,
}

impl GameStateManager {
    /// New session with default rules and no observer.
    pub fn new() -> GameStateManager {
        GameStateManager {
            state: GameState::new(),
            rules: Rules::default(),
            observer: None,
        }
    }

    /// New session that calls `observer` after every accepted move.
    pub fn with_observer(observer: impl FnMut() + 'static) -> GameStateManager {
        GameStateManager {
            observer: Some(Box::new(observer)),
            ..GameStateManager::new()
        }
    }

    /// Replace the rules. Meant to be chained right after construction.
    pub fn with_rules(mut self, rules: Rules) -> GameStateManager {
        self.rules = rules;
        self
    }

    /// The current state, for observers to inspect.
    #[inline]
    pub fn game_state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn rules(&self) -> Rules {
        self.rules
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    #[inline]
    pub fn active_set(&self) -> SetId {
        self.state.active_set()
    }

    #[inline]
    pub fn winner(&self) -> Option<SetId> {
        self.state.winner()
    }

    /// Place piece `index` on `location` (`[row, col]`).
    ///
    /// On success the mover's pieces are checked for a win. A win ends the
    /// game with the mover as winner, otherwise the turn passes on. Either
    /// way the observer is called exactly once.
    ///
    /// # Errors
    ///
    /// Checked in this order, the first failure wins:
    /// - [`MoveError::UnknownPiece`] if `index` is not in 0..36
    /// - [`MoveError::OffBoard`] if a coordinate is above 2
    /// - [`MoveError::GameOver`] if the game has ended and
    ///   [`Rules::lock_when_ended`] is set
    /// - [`MoveError::NotYourTurn`] if the piece is not the active set's and
    ///   [`Rules::enforce_turn_order`] is set
    /// - [`MoveError::AlreadyPlaced`] if the piece is already on the board
    /// - [`MoveError::Occupied`] if a piece of the same size is on `location`
    ///
    /// A rejected move changes nothing and does not call the observer.
    #[instrument(skip(self), fields(active = %self.state.active_set()))]
    pub fn update_piece_location(
        &mut self,
        index: usize,
        location: [u8; 2],
    ) -> Result<MoveOutcome, MoveError> {
        let location = self
            .check_move(index, location)
            .inspect_err(|err| warn!(%err, "move rejected"))?;

        let mover = self.state.active_set();
        self.state.place(index, location);
        debug!(index, %location, "piece placed");

        // Only the mover can have completed a triple
        let outcome = if detect_win(self.state.pieces_for_set(mover).map(|(_, p)| p)) {
            self.state.finish(mover);
            info!(winner = %mover, "game won");
            MoveOutcome::Won { winner: mover }
        } else {
            self.state.advance_turn();
            MoveOutcome::Continue {
                next: self.state.active_set(),
            }
        };

        self.notify();
        Ok(outcome)
    }

    /// Every piece of `set` with its index, in index order.
    pub fn get_pieces_for_set(&self, set: SetId) -> Vec<IndexedPiece> {
        self.state
            .pieces_for_set(set)
            .map(|(index, piece)| IndexedPiece {
                index,
                piece: *piece,
            })
            .collect()
    }

    /// The triple that won the game, if it has ended.
    pub fn winning_triple(&self) -> Option<WinningTriple> {
        let winner = self.state.winner()?;
        winning_triple(self.state.pieces_for_set(winner).map(|(_, p)| p))
    }

    /// Throw the session away and start over. Rules and observer are kept.
    pub fn reset(&mut self) {
        self.state = GameState::new();
        debug!("game reset");
        self.notify();
    }

    fn check_move(&self, index: usize, location: [u8; 2]) -> Result<Location, MoveError> {
        let piece = self
            .state
            .piece(index)
            .ok_or(MoveError::UnknownPiece { index })?;
        let location = Location::try_from(location)?;

        if self.rules.lock_when_ended {
            if let Some(winner) = self.state.winner() {
                return Err(MoveError::GameOver { winner });
            }
        }

        let active = self.state.active_set();
        if self.rules.enforce_turn_order && piece.set() != active {
            return Err(MoveError::NotYourTurn {
                index,
                owner: piece.set(),
                active,
            });
        }

        if let Some(existing) = piece.location() {
            return Err(MoveError::AlreadyPlaced {
                index,
                location: existing,
            });
        }

        if self.state.is_occupied(location, piece.size()) {
            return Err(MoveError::Occupied {
                location,
                size: piece.size(),
            });
        }

        Ok(location)
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer();
        }
    }
}

impl Default for GameStateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GameStateManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameStateManager")
            .field("state", &self.state)
            .field("rules", &self.rules)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
