//! WASM bindings for stacks-core
//!
//! Lets a browser front end drive a game session. State crosses the
//! boundary as plain JS objects built with serde-wasm-bindgen.

use js_sys::Function;
use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::{GameStateManager, Location, Rules, SetId};

/// JS handle to one game session.
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameStateManager,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a session.
    ///
    /// `on_update` is called with no arguments after every accepted move.
    /// `rules` is an optional `{ enforce_turn_order, lock_when_ended }`
    /// object, missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(on_update: Option<Function>, rules: JsValue) -> Result<WasmGame, JsValue> {
        let rules: Rules = if rules.is_undefined() || rules.is_null() {
            Rules::default()
        } else {
            serde_wasm_bindgen::from_value(rules)?
        };

        let inner = match on_update {
            Some(callback) => GameStateManager::with_observer(move || {
                // A throwing callback must not poison the session
                if let Err(err) = callback.call0(&JsValue::NULL) {
                    warn!(?err, "update callback threw");
                }
            }),
            None => GameStateManager::new(),
        };

        Ok(WasmGame {
            inner: inner.with_rules(rules),
        })
    }

    /// Full game state: `{ phase, pieces, active_set, winner }`.
    #[wasm_bindgen(js_name = gameState)]
    pub fn game_state(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(self.inner.game_state())?)
    }

    /// Place a piece. Returns true if the move was accepted.
    #[wasm_bindgen(js_name = updatePieceLocation)]
    pub fn update_piece_location(&mut self, index: usize, row: u8, col: u8) -> bool {
        self.inner.update_piece_location(index, [row, col]).is_ok()
    }

    /// Like `updatePieceLocation`, but throws the rejection reason and
    /// returns the outcome (`{ kind: "continue", next }` or
    /// `{ kind: "won", winner }`) on success.
    #[wasm_bindgen(js_name = tryUpdatePieceLocation)]
    pub fn try_update_piece_location(&mut self, index: usize, row: u8, col: u8) -> Result<JsValue, JsValue> {
        let outcome = self
            .inner
            .update_piece_location(index, [row, col])
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(serde_wasm_bindgen::to_value(&outcome)?)
    }

    /// Pieces of a set as `[{ index, piece }, ...]`.
    #[wasm_bindgen(js_name = piecesForSet)]
    pub fn pieces_for_set(&self, set: u8) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.inner.get_pieces_for_set(SetId(set)))?)
    }

    /// Active set (0-3)
    #[wasm_bindgen(js_name = activeSet)]
    pub fn active_set(&self) -> u8 {
        self.inner.active_set().0
    }

    /// Winner (0-3), or undefined while playing
    pub fn winner(&self) -> Option<u8> {
        self.inner.winner().map(|set| set.0)
    }

    /// Cells of the winning triple as [row, col, row, col, ...].
    /// Empty array if no one has won.
    #[wasm_bindgen(js_name = winningCells)]
    pub fn winning_cells(&self) -> Vec<u8> {
        self.inner
            .winning_triple()
            .map(|triple| {
                triple
                    .line
                    .cells()
                    .into_iter()
                    .flat_map(|loc: Location| [loc.row(), loc.col()])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Start a new session, keeping callback and rules.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
