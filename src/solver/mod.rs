//! Chance-sampled CFR over a reduced heads-up pot-limit game.
//!
//! The reduced game has one-chip blinds, four betting rounds, and at most one
//! pot-sized raise per round: with nothing to call a seat checks or raises,
//! facing a raise it folds or calls. Seat 0 opens every round.
//!
//! Training deals one random deck per iteration and walks every betting line
//! under it. The averaged strategy is stored per info set in a
//! [`StrategyTable`] keyed by `hole|board|history|pot|to_call`, the same key a
//! live [`Snapshot`](crate::oracle::Snapshot) produces, so the oracle server
//! can look up trained decisions and fall back to its heuristic elsewhere.
//!
//! ```
//! use holdem_trainer::solver::Trainer;
//!
//! let mut trainer = Trainer::new(7);
//! trainer.train(20).unwrap();
//! let table = trainer.strategy();
//! assert!(!table.is_empty());
//! ```

pub mod game;
pub mod profile;
pub mod trainer;

use crate::cards::Card;
use crate::hand::HandError;

pub use game::{Edge, TrainingGame, BLIND};
pub use profile::{InfoNode, Policy, StrategyTable};
pub use trainer::Trainer;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SolverError {
    #[error("could not deal a training hand: {0}")]
    Deal(#[from] HandError),
    #[error("strategy file: {0}")]
    Io(String),
    #[error("strategy json: {0}")]
    Json(String),
}

/// Info-set key: sorted hole cards, sorted board, betting history, pot and
/// amount to call, joined by `|`.
///
/// ```
/// use holdem_trainer::cards::parse_cards;
/// use holdem_trainer::solver::info_key;
///
/// let hole = parse_cards("Kh As").unwrap();
/// let board = parse_cards("Td 2c 7s").unwrap();
/// assert_eq!(info_key(&hole, &board, "cc|r", 4, 2), "AsKh|2c7sTd|cc|r|4|2");
/// ```
pub fn info_key(hole: &[Card], board: &[Card], history: &str, pot: u64, to_call: u64) -> String {
    format!("{}|{}|{}|{}|{}", cards_key(hole), cards_key(board), history, pot, to_call)
}

fn cards_key(cards: &[Card]) -> String {
    let mut names: Vec<String> = cards.iter().map(Card::to_string).collect();
    names.sort_unstable();
    names.concat()
}
