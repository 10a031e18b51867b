//! Engine module: the 4x4 board, the slide/merge transform and random
//! tile spawning. Public API stays small and ergonomic.
//!
//! - `Board` is the 4x4 state with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `shift`).
//! - Every direction goes through one line primitive, `slide_and_merge_line`.

mod ops;
pub mod state;

pub use state::{
    Board, BoardError, Grid, Line, Move, ParseMoveError, Position, Tile, TilesIter, MAX_EXPONENT,
    SIZE, WIN_TILE,
};

pub use ops::{
    count_empty, empty_positions, get_highest_tile_val, get_score, has_adjacent_merge,
    is_game_over, random_spawn, reverse_rows, shift, slide_and_merge_line, transpose,
};
