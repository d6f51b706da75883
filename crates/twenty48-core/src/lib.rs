//! twenty48-core: rules engine for the sliding-tile merge puzzle (2048).
//!
//! Quick start:
//! ```
//! use twenty48_core::engine::{Move, Rules};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic game with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let rules = Rules::default();
//! let s0 = rules.new_game(4, &mut rng).unwrap();
//! let s1 = rules.play(&s0, Move::Left, &mut rng).state;
//! assert!(s1.score() >= s0.score());
//! ```
//!
//! Note: `engine::new_game` and `engine::make_move` use thread-local RNG.
//! Prefer the `Rules` methods when you need determinism.
pub mod engine;
