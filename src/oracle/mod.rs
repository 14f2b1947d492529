//! Remote Move Oracle: the wire contract for `POST /ai-move`, the
//! [`MoveOracle`] seam, and the rules that turn whatever the oracle said into
//! an action the reducer will accept.

pub mod http;
pub mod policy;
pub mod server;
pub mod snapshot;
pub mod strategy;

use crate::game::{Action, Actor, HandState};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use http::HttpOracle;
pub use policy::HeuristicPolicy;
pub use snapshot::{Snapshot, SnapshotError};
pub use strategy::StrategyPolicy;

/// Numeric move codes used by the original solver backend.
pub const MOVE_FOLD: u8 = 0;
pub const MOVE_CHECK_CALL: u8 = 1;
pub const MOVE_BET: u8 = 2;

/// Hand snapshot sent to the oracle. Seats are 0 (Player) and 1 (AI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRequest {
    /// Remaining deck as card codes, next card last.
    pub deck: Vec<u8>,
    pub board: Vec<u8>,
    /// Hole cards indexed by seat.
    pub hole_cards: Vec<Vec<u8>>,
    /// Seat to move.
    pub player: u8,
    pub dealer: u8,
    /// 0 preflop .. 3 river, 4 showdown.
    pub stage: u8,
    pub pot: u64,
    pub to_call: u64,
    pub checked: bool,
    pub history: String,
    #[serde(default)]
    pub terminal: bool,
    #[serde(default)]
    pub winner: Option<u8>,
    /// Stacks indexed by seat; optional so older clients stay compatible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacks: Option<[u64; 2]>,
}

impl OracleRequest {
    /// Snapshot `state` from `actor`'s seat.
    pub fn from_state(state: &HandState, actor: Actor) -> Self {
        Self {
            deck: state.deck().codes(),
            board: state.board().codes(),
            hole_cards: Actor::BOTH.iter().map(|a| state.hole(*a).codes().to_vec()).collect(),
            player: actor.seat(),
            dealer: state.dealer().seat(),
            stage: state.stage().index(),
            pot: state.pot(),
            to_call: state.to_call(actor),
            checked: state.checked(),
            history: state.history_code().to_string(),
            terminal: state.is_terminal(),
            winner: state.winner().map(Actor::seat),
            stacks: Some([state.player_stack(), state.ai_stack()]),
        }
    }
}

/// `move` is a name or a numeric code depending on the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoveCode {
    Code(u8),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleResponse {
    #[serde(rename = "move")]
    pub mv: MoveCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u64>,
}

impl OracleResponse {
    pub fn parse_move(&self) -> Result<OracleMove, OracleError> {
        match &self.mv {
            MoveCode::Code(MOVE_FOLD) => Ok(OracleMove::Fold),
            MoveCode::Code(MOVE_CHECK_CALL) => Ok(OracleMove::Call),
            MoveCode::Code(MOVE_BET) => Ok(OracleMove::Bet(self.amount)),
            MoveCode::Code(other) => Err(OracleError::UnknownMove(other.to_string())),
            MoveCode::Name(name) => match name.trim().to_ascii_lowercase().as_str() {
                "fold" => Ok(OracleMove::Fold),
                "check" => Ok(OracleMove::Check),
                "call" => Ok(OracleMove::Call),
                "bet" | "raise" => Ok(OracleMove::Bet(self.amount)),
                _ => Err(OracleError::UnknownMove(name.clone())),
            },
        }
    }
}

impl From<OracleMove> for OracleResponse {
    fn from(mv: OracleMove) -> Self {
        let (name, amount) = match mv {
            OracleMove::Fold => ("fold", None),
            OracleMove::Check => ("check", None),
            OracleMove::Call => ("call", None),
            OracleMove::Bet(amount) => ("bet", amount),
        };
        Self { mv: MoveCode::Name(name.to_string()), amount }
    }
}

/// A decoded oracle decision, before it is fitted to the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleMove {
    Fold,
    Check,
    Call,
    /// `None` means "use the default size".
    Bet(Option<u64>),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OracleError {
    #[error("oracle request timed out")]
    Timeout,
    #[error("oracle transport error: {0}")]
    Transport(String),
    #[error("oracle returned status {0}")]
    Status(u16),
    #[error("malformed oracle response: {0}")]
    Malformed(String),
    #[error("unknown oracle move {0:?}")]
    UnknownMove(String),
    #[error("snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Anything that can pick the AI's move for a snapshot.
#[async_trait]
pub trait MoveOracle: Send + Sync {
    async fn decide(&self, request: &OracleRequest) -> Result<OracleMove, OracleError>;
}

/// The move taken when the oracle cannot be used: check, or call a bet.
pub fn passive_action(state: &HandState, actor: Actor) -> Action {
    if state.to_call(actor) > 0 {
        Action::Call { actor }
    } else {
        Action::Check { actor }
    }
}

/// Fit an oracle decision to the hand so the reducer accepts it.
///
/// A bet while facing a bet becomes a call, as does a check. Bets are capped
/// at the actor's stack; a missing amount uses the outstanding bet size or
/// `default_bet` when nothing is outstanding.
///
/// ```
/// use holdem_trainer::deck::Deck;
/// use holdem_trainer::game::{Action, Actor, HandSetup, HandState};
/// use holdem_trainer::oracle::{fit_move, OracleMove};
///
/// let state = HandState::start(&HandSetup::heads_up(100), Deck::shuffled_seeded(1)).unwrap();
/// let action = fit_move(&state, Actor::Ai, Ok(OracleMove::Bet(Some(500))), 10);
/// assert_eq!(action, Action::Bet { actor: Actor::Ai, amount: 100 });
/// ```
pub fn fit_move(
    state: &HandState,
    actor: Actor,
    decision: Result<OracleMove, OracleError>,
    default_bet: u64,
) -> Action {
    let facing = state.to_call(actor) > 0;
    match decision {
        Err(_) => passive_action(state, actor),
        Ok(OracleMove::Fold) => Action::Fold { actor },
        Ok(OracleMove::Call) => Action::Call { actor },
        Ok(OracleMove::Check) | Ok(OracleMove::Bet(_)) if facing => Action::Call { actor },
        Ok(OracleMove::Check) => Action::Check { actor },
        Ok(OracleMove::Bet(amount)) => {
            let fallback = if state.bet_outstanding() { state.bet_size() } else { default_bet };
            let amount = amount.unwrap_or(fallback).min(state.stack(actor));
            if amount == 0 {
                Action::Check { actor }
            } else {
                Action::Bet { actor, amount }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Deck;
    use crate::game::HandSetup;

    fn response(json: &str) -> OracleResponse {
        serde_json::from_str(json).unwrap()
    }

    fn ai_to_act() -> HandState {
        HandState::start(&HandSetup::heads_up(1000), Deck::shuffled_seeded(11)).unwrap()
    }

    #[test]
    fn parses_names_and_codes() {
        assert_eq!(response(r#"{"move": 0}"#).parse_move(), Ok(OracleMove::Fold));
        assert_eq!(response(r#"{"move": 1}"#).parse_move(), Ok(OracleMove::Call));
        assert_eq!(response(r#"{"move": 2}"#).parse_move(), Ok(OracleMove::Bet(None)));
        assert_eq!(response(r#"{"move": "Check"}"#).parse_move(), Ok(OracleMove::Check));
        assert_eq!(
            response(r#"{"move": "raise", "amount": 40}"#).parse_move(),
            Ok(OracleMove::Bet(Some(40)))
        );
        assert!(matches!(
            response(r#"{"move": 7}"#).parse_move(),
            Err(OracleError::UnknownMove(_))
        ));
        assert!(matches!(
            response(r#"{"move": "shove"}"#).parse_move(),
            Err(OracleError::UnknownMove(_))
        ));
    }

    #[test]
    fn response_serializes_with_move_key() {
        let json = serde_json::to_value(OracleResponse::from(OracleMove::Bet(Some(25)))).unwrap();
        assert_eq!(json, serde_json::json!({"move": "bet", "amount": 25}));
        let json = serde_json::to_value(OracleResponse::from(OracleMove::Check)).unwrap();
        assert_eq!(json, serde_json::json!({"move": "check"}));
    }

    #[test]
    fn request_mirrors_state() {
        let state = ai_to_act().place_bet(Actor::Ai, 30).unwrap();
        let req = OracleRequest::from_state(&state, Actor::Player);
        assert_eq!(req.player, 0);
        assert_eq!(req.dealer, 0);
        assert_eq!(req.to_call, 30);
        assert_eq!(req.pot, 30);
        assert_eq!(req.history, "r");
        assert_eq!(req.deck.len(), 48);
        assert_eq!(req.hole_cards.len(), 2);
        assert_eq!(req.stacks, Some([1000, 970]));
        assert!(!req.terminal);
    }

    #[test]
    fn failures_and_misfits_become_passive() {
        let state = ai_to_act();
        let ai = Actor::Ai;
        assert_eq!(fit_move(&state, ai, Err(OracleError::Timeout), 10), Action::Check { actor: ai });
        assert_eq!(
            fit_move(&state, ai, Ok(OracleMove::Bet(None)), 10),
            Action::Bet { actor: ai, amount: 10 }
        );
        assert_eq!(fit_move(&state, ai, Ok(OracleMove::Bet(Some(0))), 10), Action::Check { actor: ai });

        let facing = state.check(ai).unwrap().place_bet(Actor::Player, 60).unwrap();
        assert_eq!(fit_move(&facing, ai, Err(OracleError::Status(500)), 10), Action::Call { actor: ai });
        assert_eq!(fit_move(&facing, ai, Ok(OracleMove::Check), 10), Action::Call { actor: ai });
        assert_eq!(fit_move(&facing, ai, Ok(OracleMove::Bet(Some(200))), 10), Action::Call { actor: ai });
        assert_eq!(fit_move(&facing, ai, Ok(OracleMove::Fold), 10), Action::Fold { actor: ai });
    }
}
