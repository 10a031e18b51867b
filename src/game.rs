//! Game state machine on top of the engine.
//!
//! A [`GameState`] is an immutable snapshot of board, score and the two
//! terminal flags. Each accepted move produces a new snapshot:
//!
//! 1. an `over` game ignores input;
//! 2. a move that leaves the board unchanged is rejected (no spawn, no re-evaluation);
//! 3. otherwise one tile is spawned, the score is recomputed from the board,
//!    `won` latches on the first 2048 and `over` is set once the board is
//!    full with no neighbouring pair left to merge.
//!
//! ```
//! use game_2048::engine::Move;
//! use game_2048::game::GameState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut state = GameState::new(&mut rng);
//! assert_eq!(state.board.count_empty(), 14);
//! for dir in [Move::Left, Move::Up, Move::Right, Move::Down] {
//!     state = state.apply_move(dir, &mut rng);
//! }
//! assert_eq!(state.score, state.board.score());
//! ```

use log::{debug, info, trace};
use rand::Rng;
use serde::Serialize;

use crate::engine::{self, Board, Move, Position, Tile, WIN_TILE};

/// Snapshot handed to the presentation layer after every call.
///
/// Only serialized: `score`, `won` and `over` are derived from the board, so
/// states are built through `new`, `from_board` or `apply_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GameState {
    pub board: Board,
    /// Sum of the tiles on `board`.
    pub score: u64,
    /// Latched the first time a 2048 tile appears.
    pub won: bool,
    /// Board full with no possible merge; further moves are ignored.
    pub over: bool,
}

/// Which banner a front end should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Playing,
    Won,
    Over,
    WonAndOver,
}

/// What happened during a single `apply_move_outcome` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    /// False when the game was over or the move did not change the board.
    pub accepted: bool,
    /// Cell and tile added after the move, if any.
    pub spawned: Option<(Position, Tile)>,
}

impl MoveOutcome {
    pub const REJECTED: MoveOutcome = MoveOutcome { accepted: false, spawned: None };
}

impl GameState {
    /// Start a game: two random tiles on an empty board.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let board = Board::EMPTY.with_random_tile(rng).with_random_tile(rng);
        debug!("new game: {:?}", board);
        GameState { board, score: board.score(), won: false, over: false }
    }

    /// Wrap an existing board, deriving score and both flags from it.
    pub fn from_board(board: Board) -> Self {
        GameState {
            board,
            score: board.score(),
            won: board.contains_value(WIN_TILE),
            over: board.is_game_over(),
        }
    }

    pub fn status(&self) -> GameStatus {
        match (self.won, self.over) {
            (false, false) => GameStatus::Playing,
            (true, false) => GameStatus::Won,
            (false, true) => GameStatus::Over,
            (true, true) => GameStatus::WonAndOver,
        }
    }

    /// Apply one directional input and return the resulting state.
    ///
    /// Rejected input (game over, or a move that changes nothing) returns
    /// `self` unchanged.
    #[inline]
    pub fn apply_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> Self {
        self.apply_move_outcome(direction, rng).0
    }

    /// Like [`GameState::apply_move`], also reporting whether the move was
    /// accepted and where the new tile landed.
    pub fn apply_move_outcome<R: Rng + ?Sized>(
        self,
        direction: Move,
        rng: &mut R,
    ) -> (Self, MoveOutcome) {
        if self.over {
            trace!("ignoring {direction}: game is over");
            return (self, MoveOutcome::REJECTED);
        }

        let moved = self.board.shift(direction);
        if moved == self.board {
            trace!("rejecting {direction}: board unchanged");
            return (self, MoveOutcome::REJECTED);
        }

        let spawned = engine::random_spawn(moved, rng);
        let board = match spawned {
            Some((pos, tile)) => moved.with_tile(pos, tile),
            None => moved,
        };

        let next = GameState {
            board,
            score: board.score(),
            won: self.won || board.contains_value(WIN_TILE),
            over: board.is_game_over(),
        };
        debug!("{direction}: spawned {:?}, score {}", spawned, next.score);
        if next.won && !self.won {
            info!("reached {WIN_TILE} with score {}", next.score);
        }
        if next.over {
            info!("no moves left, final score {}", next.score);
        }
        (next, MoveOutcome { accepted: true, spawned })
    }
}

/// Start a game using the provided RNG.
pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> GameState {
    GameState::new(rng)
}

/// Apply a move using the provided RNG.
pub fn apply_move<R: Rng + ?Sized>(state: GameState, direction: Move, rng: &mut R) -> GameState {
    state.apply_move(direction, rng)
}

/// Convenience: `new_game` with thread-local RNG.
pub fn new_game_thread() -> GameState {
    let mut rng = rand::thread_rng();
    GameState::new(&mut rng)
}

/// Convenience: `apply_move` with thread-local RNG.
pub fn apply_move_thread(state: GameState, direction: Move) -> GameState {
    let mut rng = rand::thread_rng();
    state.apply_move(direction, &mut rng)
}
