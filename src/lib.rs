//! game-2048: rules engine for the 2048 sliding-tile puzzle
//!
//! This crate provides:
//! - A `Board` value type with ergonomic methods (`shift`, `with_random_tile`, `score`, ...)
//! - One line primitive (`engine::slide_and_merge_line`) that every direction reuses
//!   through `engine::transpose` and `engine::reverse_rows`
//! - A `GameState` machine (`game` module) that spawns tiles, scores boards and
//!   tracks the `won` / `over` flags
//!
//! Quick start:
//! ```
//! use game_2048::engine::{Board, Move};
//! use game_2048::game::GameState;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let s0 = GameState::new(&mut rng);
//! let s1 = s0.apply_move(Move::Left, &mut rng);
//! assert_eq!(s1.score, s1.board.score());
//!
//! // Pure moves need no RNG at all
//! let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]).unwrap();
//! assert_eq!(b.shift(Move::Left).rows()[0], [4, 0, 0, 0]);
//! ```
//!
//! Note: there are also free functions mirroring the methods (e.g.,
//! `engine::shift`, `game::apply_move_thread`) that use thread-local RNG where relevant.
//! Prefer the methods when you need determinism.
//!
pub mod engine;
pub mod game;
