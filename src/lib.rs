//! holdem-trainer: heads-up No-Limit Hold'em trainer core
//!
//! Goals:
//! - Hand engine as a reducer: `(state, action) -> Result<state, error>`
//! - Real showdown evaluation with kicker tie-breaks
//! - AI moves from a remote oracle over HTTP, failing open to a passive move
//! - No panics for invalid input; use `Result` for recoverable errors
//!
//! ## Quick start: play a hand
//! ```
//! use holdem_trainer::deck::Deck;
//! use holdem_trainer::game::{Actor, HandSetup, HandState, Stage};
//!
//! let mut setup = HandSetup::heads_up(1000);
//! setup.dealer = Actor::Ai;
//! let state = HandState::start(&setup, Deck::shuffled_seeded(7)).unwrap();
//!
//! let state = state.place_bet(Actor::Player, 50).unwrap();
//! assert_eq!((state.player_stack(), state.pot()), (950, 50));
//!
//! let state = state.call_bet(Actor::Ai).unwrap();
//! assert_eq!(state.stage(), Stage::Flop);
//! assert_eq!(state.board().len(), 3);
//! assert_eq!(state.pot(), 100);
//! ```
//!
//! ## Oracle server
//! ```sh
//! cargo run --release --bin train-strategy -- --iterations 50000 --out strategy.json
//! cargo run --bin oracle-server -- --bind 127.0.0.1:5000 --strategy strategy.json
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod logging;
pub mod oracle;
pub mod session;
pub mod showdown;
pub mod solver;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
