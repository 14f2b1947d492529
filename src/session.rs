//! Play-screen driver: one table, one oracle, one writer.
//!
//! The AI's turn is split in two so a front end can keep rendering while the
//! oracle thinks. [`Session::begin_ai_turn`] stamps a [`Ticket`] and marks the
//! session as awaiting; [`Session::complete_ai_turn`] applies the answer only
//! if its ticket is still the one being waited on. Starting a new hand or a
//! newer request makes older tickets stale.

use crate::config::TrainerConfig;
use crate::engine::{HandEngine, Table};
use crate::game::{Action, ActionError, Actor, HandState, StartError};
use crate::oracle::{fit_move, passive_action, MoveOracle, OracleError, OracleMove, OracleRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifies one oracle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub hand_id: u64,
    pub request_id: u64,
}

/// What happened to an oracle answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied(Action),
    /// The ticket was superseded; state untouched.
    Stale,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("waiting for the AI to move")]
    Awaiting,
    #[error("it is not the AI's turn")]
    NotAiTurn,
    #[error("the player cannot act for the AI")]
    WrongSeat,
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error(transparent)]
    Start(#[from] StartError),
}

pub struct Session {
    table: Table,
    oracle: Arc<dyn MoveOracle>,
    request_seq: u64,
    pending: Option<Ticket>,
}

impl Session {
    pub fn new(config: TrainerConfig, oracle: Arc<dyn MoveOracle>) -> Self {
        Self::with_table(Table::new(config), oracle)
    }

    pub fn with_table(table: Table, oracle: Arc<dyn MoveOracle>) -> Self {
        Self { table, oracle, request_seq: 0, pending: None }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn state(&self) -> Option<&HandState> {
        self.table.state()
    }

    pub fn is_awaiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    /// Deal the next hand. Any in-flight oracle answer becomes stale.
    pub fn new_hand(&mut self) -> Result<&HandState, SessionError> {
        if let Some(ticket) = self.pending.take() {
            debug!(?ticket, "dropping pending oracle request for new hand");
        }
        Ok(self.table.start_hand()?)
    }

    /// Apply a Player action; refused while the oracle is in flight.
    pub fn player_action(&mut self, action: Action) -> Result<&HandState, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Awaiting);
        }
        if action.actor() == Some(Actor::Ai) {
            return Err(SessionError::WrongSeat);
        }
        Ok(self.table.apply(action)?)
    }

    pub fn ai_to_act(&self) -> bool {
        self.state().is_some_and(|s| !s.is_terminal() && s.turn() == Some(Actor::Ai))
    }

    /// Start an AI turn: returns the ticket and the snapshot to send.
    pub fn begin_ai_turn(&mut self) -> Result<(Ticket, OracleRequest), SessionError> {
        let state = self.table.state().ok_or(ActionError::NoHand)?;
        if !self.ai_to_act() {
            return Err(SessionError::NotAiTurn);
        }
        self.request_seq += 1;
        let ticket = Ticket { hand_id: state.hand_id(), request_id: self.request_seq };
        let request = OracleRequest::from_state(state, Actor::Ai);
        self.pending = Some(ticket);
        debug!(?ticket, stage = ?state.stage(), "oracle request issued");
        Ok((ticket, request))
    }

    /// Deliver an oracle answer. Failures fall back to the passive move.
    pub fn complete_ai_turn(
        &mut self,
        ticket: Ticket,
        decision: Result<OracleMove, OracleError>,
    ) -> Result<Delivery, SessionError> {
        if self.pending != Some(ticket) {
            warn!(?ticket, pending = ?self.pending, "discarding stale oracle response");
            return Ok(Delivery::Stale);
        }
        self.pending = None;
        let state = self.table.state().ok_or(ActionError::NoHand)?;
        if let Err(err) = &decision {
            warn!(%err, "oracle failed, taking passive move");
        }
        let action = fit_move(state, Actor::Ai, decision, self.table.config().default_bet);
        let fallback = passive_action(state, Actor::Ai);
        let applied = match self.table.apply(action) {
            Ok(_) => action,
            Err(err) => {
                warn!(?action, %err, "oracle move rejected, taking passive move");
                self.table.apply(fallback)?;
                fallback
            }
        };
        info!(?applied, "AI moved");
        Ok(Delivery::Applied(applied))
    }

    /// Ask the oracle for every consecutive AI move until the Player is up
    /// or the hand ends. Returns the actions applied.
    pub async fn drive_ai(&mut self) -> Result<Vec<Action>, SessionError> {
        let mut applied = Vec::new();
        while self.ai_to_act() {
            let (ticket, request) = self.begin_ai_turn()?;
            let decision = self.oracle.decide(&request).await;
            if let Delivery::Applied(action) = self.complete_ai_turn(ticket, decision)? {
                applied.push(action);
            }
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Stage;
    use async_trait::async_trait;

    struct Fixed(Result<OracleMove, OracleError>);

    #[async_trait]
    impl MoveOracle for Fixed {
        async fn decide(&self, _request: &OracleRequest) -> Result<OracleMove, OracleError> {
            self.0.clone()
        }
    }

    fn session(decision: Result<OracleMove, OracleError>) -> Session {
        let table = Table::with_seed(TrainerConfig::default(), 9);
        Session::with_table(table, Arc::new(Fixed(decision)))
    }

    #[test]
    fn player_input_is_gated_while_awaiting() {
        let mut s = session(Ok(OracleMove::Check));
        s.new_hand().unwrap();
        s.player_action(Action::Check { actor: Actor::Player }).unwrap();
        let (ticket, _) = s.begin_ai_turn().unwrap();
        assert!(s.is_awaiting());
        assert_eq!(
            s.player_action(Action::Fold { actor: Actor::Player }).unwrap_err(),
            SessionError::Awaiting
        );
        s.complete_ai_turn(ticket, Ok(OracleMove::Check)).unwrap();
        assert!(!s.is_awaiting());
        assert_eq!(s.state().unwrap().stage(), Stage::Flop);
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut s = session(Ok(OracleMove::Check));
        s.new_hand().unwrap();
        s.player_action(Action::Check { actor: Actor::Player }).unwrap();
        let (old, _) = s.begin_ai_turn().unwrap();
        s.new_hand().unwrap();
        let before = s.state().cloned();
        assert_eq!(s.complete_ai_turn(old, Ok(OracleMove::Fold)).unwrap(), Delivery::Stale);
        assert_eq!(s.state().cloned(), before);
    }

    #[test]
    fn player_cannot_move_for_ai() {
        let mut s = session(Ok(OracleMove::Check));
        s.new_hand().unwrap();
        assert_eq!(
            s.player_action(Action::Check { actor: Actor::Ai }).unwrap_err(),
            SessionError::WrongSeat
        );
        assert_eq!(s.begin_ai_turn().unwrap_err(), SessionError::NotAiTurn);
    }

    #[tokio::test]
    async fn failing_oracle_calls_a_bet() {
        let mut s = session(Err(OracleError::Status(503)));
        s.new_hand().unwrap();
        s.player_action(Action::Bet { actor: Actor::Player, amount: 50 }).unwrap();
        let applied = s.drive_ai().await.unwrap();
        assert_eq!(applied, vec![Action::Call { actor: Actor::Ai }]);
        let state = s.state().unwrap();
        assert_eq!(state.stage(), Stage::Flop);
        assert_eq!(state.pot(), 100);
    }

    #[tokio::test]
    async fn drive_ai_is_a_noop_on_player_turn() {
        let mut s = session(Ok(OracleMove::Bet(None)));
        s.new_hand().unwrap();
        assert!(s.drive_ai().await.unwrap().is_empty());
    }
}
