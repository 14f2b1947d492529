//! One heads-up hand as an immutable-transition state machine.
//!
//! [`HandState::apply`] is the reducer: it takes an [`Action`], runs it on a
//! copy of the state and returns the copy only if every step succeeded, so a
//! rejected action never leaves a partially applied hand behind.

use crate::deck::Deck;
use crate::evaluator::EvalError;
use crate::hand::{Board, HandError, HoleCards};
use crate::showdown::{resolve_showdown, split_pot, ShowdownResult};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two seats at the table. Player is seat 0, the AI is seat 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    Player,
    Ai,
}

impl Actor {
    pub const BOTH: [Actor; 2] = [Actor::Player, Actor::Ai];

    pub const fn opponent(self) -> Actor {
        match self {
            Actor::Player => Actor::Ai,
            Actor::Ai => Actor::Player,
        }
    }

    pub const fn seat(self) -> u8 {
        match self {
            Actor::Player => 0,
            Actor::Ai => 1,
        }
    }

    pub fn from_seat(seat: u8) -> Option<Actor> {
        match seat {
            0 => Some(Actor::Player),
            1 => Some(Actor::Ai),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Actor::Player => "Player",
            Actor::Ai => "AI",
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Betting rounds in the order they are played. Ordering follows play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Stage {
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Stage> {
        match index {
            0 => Some(Stage::Preflop),
            1 => Some(Stage::Flop),
            2 => Some(Stage::Turn),
            3 => Some(Stage::River),
            4 => Some(Stage::Showdown),
            _ => None,
        }
    }

    /// Community cards revealed when entering this stage.
    pub const fn cards_revealed(self) -> usize {
        match self {
            Stage::Flop => 3,
            Stage::Turn | Stage::River => 1,
            Stage::Preflop | Stage::Showdown => 0,
        }
    }

    pub const fn next(self) -> Option<Stage> {
        match self {
            Stage::Preflop => Some(Stage::Flop),
            Stage::Flop => Some(Stage::Turn),
            Stage::Turn => Some(Stage::River),
            Stage::River => Some(Stage::Showdown),
            Stage::Showdown => None,
        }
    }
}

/// Who opens each betting round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstToAct {
    /// The non-dealer opens every round.
    #[default]
    DealerOpponent,
    Dealer,
}

impl FirstToAct {
    pub const fn leader(self, dealer: Actor) -> Actor {
        match self {
            FirstToAct::DealerOpponent => dealer.opponent(),
            FirstToAct::Dealer => dealer,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandStatus {
    InProgress,
    Folded { winner: Actor },
    /// `winner == None` is a split pot.
    Showdown { winner: Option<Actor> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryVerb {
    Ante,
    Check,
    Bet,
    Call,
    Return,
    Fold,
    Win,
    Split,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::Ante => "antes",
            HistoryVerb::Check => "checks",
            HistoryVerb::Bet => "bets",
            HistoryVerb::Call => "calls",
            HistoryVerb::Return => "takes back",
            HistoryVerb::Fold => "folds",
            HistoryVerb::Win => "wins",
            HistoryVerb::Split => "splits",
        }
    }

    /// Oracle history letter: `f` fold, `c` check/call, `r` bet.
    fn code(self) -> Option<char> {
        match self {
            HistoryVerb::Fold => Some('f'),
            HistoryVerb::Check | HistoryVerb::Call => Some('c'),
            HistoryVerb::Bet => Some('r'),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub actor: Actor,
    pub verb: HistoryVerb,
    pub amount: Option<u64>,
    pub stage: Stage,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.actor, self.verb.label())?;
        if let Some(amount) = self.amount {
            write!(f, " {amount}")?;
        }
        Ok(())
    }
}

/// Inputs to the reducer. `Advance` is the explicit stage advance; every
/// other action names the actor taking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Bet { actor: Actor, amount: u64 },
    Call { actor: Actor },
    Check { actor: Actor },
    Fold { actor: Actor },
    Advance,
}

impl Action {
    pub fn actor(self) -> Option<Actor> {
        match self {
            Action::Bet { actor, .. }
            | Action::Call { actor }
            | Action::Check { actor }
            | Action::Fold { actor } => Some(actor),
            Action::Advance => None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("no hand has been dealt")]
    NoHand,
    #[error("the hand is over")]
    HandOver,
    #[error("it is not {0}'s turn")]
    OutOfTurn(Actor),
    #[error("bet amount must be positive")]
    ZeroAmount,
    #[error("amount too large: max {max}, got {got}")]
    AmountTooLarge { max: u64, got: u64 },
    #[error("a bet of {0} is already outstanding")]
    BetOutstanding(u64),
    #[error("cannot check while facing a bet of {0}")]
    FacingBet(u64),
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("showdown failed: {0}")]
    Showdown(#[from] EvalError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StartError {
    #[error("{0} has no chips to play")]
    NoChips(Actor),
    #[error("deck has {0} cards, not enough to deal a hand")]
    ShortDeck(usize),
    #[error("invalid deal: {0}")]
    Deal(#[from] HandError),
    #[error("run-out failed: {0}")]
    RunOut(#[from] ActionError),
}

/// Everything `start` needs that is carried in from outside the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandSetup {
    pub hand_id: u64,
    pub dealer: Actor,
    pub player_stack: u64,
    pub ai_stack: u64,
    pub ante: u64,
    pub first_to_act: FirstToAct,
}

impl HandSetup {
    /// Equal stacks, Player deals, no ante.
    pub fn heads_up(stack: u64) -> Self {
        Self {
            hand_id: 1,
            dealer: Actor::Player,
            player_stack: stack,
            ai_stack: stack,
            ante: 0,
            first_to_act: FirstToAct::default(),
        }
    }
}

/// Full state of one hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandState {
    hand_id: u64,
    dealer: Actor,
    first_to_act: FirstToAct,
    stage: Stage,
    turn: Option<Actor>,
    pot: u64,
    player_stack: u64,
    ai_stack: u64,
    bet_outstanding: bool,
    bet_size: u64,
    bettor: Option<Actor>,
    /// The round opener checked and the other side has not acted yet.
    checked: bool,
    history: Vec<HistoryEntry>,
    history_code: String,
    status: HandStatus,
    player_hole: HoleCards,
    ai_hole: HoleCards,
    board: Board,
    deck: Deck,
    showdown: Option<ShowdownResult>,
}

/// Free-function form of the reducer.
pub fn reduce(state: &HandState, action: Action) -> Result<HandState, ActionError> {
    state.apply(action)
}

impl HandState {
    /// Deal a hand from an already shuffled deck.
    pub fn start(setup: &HandSetup, mut deck: Deck) -> Result<Self, StartError> {
        for actor in Actor::BOTH {
            let stack = match actor {
                Actor::Player => setup.player_stack,
                Actor::Ai => setup.ai_stack,
            };
            if stack == 0 {
                return Err(StartError::NoChips(actor));
            }
        }
        if deck.len() < 9 {
            return Err(StartError::ShortDeck(deck.len()));
        }
        let player_hole = HoleCards::from_slice(&deck.draw_n(2))?;
        let ai_hole = HoleCards::from_slice(&deck.draw_n(2))?;

        let mut state = Self {
            hand_id: setup.hand_id,
            dealer: setup.dealer,
            first_to_act: setup.first_to_act,
            stage: Stage::Preflop,
            turn: Some(setup.first_to_act.leader(setup.dealer)),
            pot: 0,
            player_stack: setup.player_stack,
            ai_stack: setup.ai_stack,
            bet_outstanding: false,
            bet_size: 0,
            bettor: None,
            checked: false,
            history: Vec::new(),
            history_code: String::new(),
            status: HandStatus::InProgress,
            player_hole,
            ai_hole,
            board: Board::default(),
            deck,
            showdown: None,
        };
        if setup.ante > 0 {
            for actor in Actor::BOTH {
                let paid = state.take_chips(actor, setup.ante);
                state.record(actor, HistoryVerb::Ante, Some(paid));
            }
            if state.player_stack == 0 || state.ai_stack == 0 {
                // an ante put someone all-in; nothing left to bet
                state.run_out()?;
            }
        }
        Ok(state)
    }

    /// Shuffle a fresh deck with `rng` and deal.
    pub fn start_with_rng<R: Rng + ?Sized>(setup: &HandSetup, rng: &mut R) -> Result<Self, StartError> {
        let mut deck = Deck::standard();
        deck.shuffle_with(rng);
        Self::start(setup, deck)
    }

    /// Apply one action, returning the successor state or leaving `self`
    /// untouched on error.
    pub fn apply(&self, action: Action) -> Result<Self, ActionError> {
        let mut next = self.clone();
        next.step(action)?;
        Ok(next)
    }

    pub fn place_bet(&self, actor: Actor, amount: u64) -> Result<Self, ActionError> {
        self.apply(Action::Bet { actor, amount })
    }

    pub fn call_bet(&self, actor: Actor) -> Result<Self, ActionError> {
        self.apply(Action::Call { actor })
    }

    pub fn check(&self, actor: Actor) -> Result<Self, ActionError> {
        self.apply(Action::Check { actor })
    }

    pub fn fold(&self, actor: Actor) -> Result<Self, ActionError> {
        self.apply(Action::Fold { actor })
    }

    pub fn advance_stage(&self) -> Result<Self, ActionError> {
        self.apply(Action::Advance)
    }

    pub fn hand_id(&self) -> u64 {
        self.hand_id
    }

    pub fn dealer(&self) -> Actor {
        self.dealer
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn turn(&self) -> Option<Actor> {
        self.turn
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn player_stack(&self) -> u64 {
        self.player_stack
    }

    pub fn ai_stack(&self) -> u64 {
        self.ai_stack
    }

    pub fn stack(&self, actor: Actor) -> u64 {
        match actor {
            Actor::Player => self.player_stack,
            Actor::Ai => self.ai_stack,
        }
    }

    pub fn bet_outstanding(&self) -> bool {
        self.bet_outstanding
    }

    pub fn bet_size(&self) -> u64 {
        self.bet_size
    }

    /// Chips `actor` must put in to continue.
    pub fn to_call(&self, actor: Actor) -> u64 {
        if self.bet_outstanding && self.bettor != Some(actor) {
            self.bet_size
        } else {
            0
        }
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// History as action strings, oldest first.
    pub fn history_lines(&self) -> Vec<String> {
        self.history.iter().map(|e| e.to_string()).collect()
    }

    /// Compact history in the oracle's format, rounds separated by `|`.
    pub fn history_code(&self) -> &str {
        &self.history_code
    }

    pub fn status(&self) -> HandStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Actor> {
        match self.status {
            HandStatus::Folded { winner } => Some(winner),
            HandStatus::Showdown { winner } => winner,
            HandStatus::InProgress => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, HandStatus::InProgress)
    }

    pub fn hole(&self, actor: Actor) -> &HoleCards {
        match actor {
            Actor::Player => &self.player_hole,
            Actor::Ai => &self.ai_hole,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn showdown(&self) -> Option<&ShowdownResult> {
        self.showdown.as_ref()
    }

    pub fn first_to_act(&self) -> FirstToAct {
        self.first_to_act
    }

    /// Stacks plus pot; constant for the life of a hand.
    pub fn chips_in_play(&self) -> u64 {
        self.player_stack + self.ai_stack + self.pot
    }

    fn step(&mut self, action: Action) -> Result<(), ActionError> {
        let actor = match action.actor() {
            None => {
                if self.is_terminal() {
                    return Ok(());
                }
                if self.bet_outstanding {
                    return Err(ActionError::BetOutstanding(self.bet_size));
                }
                return self.advance();
            }
            Some(actor) => actor,
        };
        if self.is_terminal() {
            return Err(ActionError::HandOver);
        }
        if self.turn != Some(actor) {
            return Err(ActionError::OutOfTurn(actor));
        }
        match action {
            Action::Bet { amount, .. } => self.bet(actor, amount),
            Action::Call { .. } if self.bet_outstanding => self.call(actor),
            Action::Call { .. } | Action::Check { .. } => self.check_round(actor),
            Action::Fold { .. } => self.fold_hand(actor),
            Action::Advance => Ok(()),
        }
    }

    fn bet(&mut self, actor: Actor, amount: u64) -> Result<(), ActionError> {
        if amount == 0 {
            return Err(ActionError::ZeroAmount);
        }
        if self.bet_outstanding {
            return Err(ActionError::BetOutstanding(self.bet_size));
        }
        let max = self.stack(actor);
        if amount > max {
            return Err(ActionError::AmountTooLarge { max, got: amount });
        }
        self.take_chips(actor, amount);
        self.bet_outstanding = true;
        self.bet_size = amount;
        self.bettor = Some(actor);
        self.checked = false;
        self.record(actor, HistoryVerb::Bet, Some(amount));
        self.turn = Some(actor.opponent());
        Ok(())
    }

    fn call(&mut self, actor: Actor) -> Result<(), ActionError> {
        let owed = self.bet_size;
        let paid = self.take_chips(actor, owed);
        self.record(actor, HistoryVerb::Call, Some(paid));
        let uncalled = owed - paid;
        if uncalled > 0 {
            let bettor = actor.opponent();
            self.pot -= uncalled;
            *self.stack_mut(bettor) += uncalled;
            self.record(bettor, HistoryVerb::Return, Some(uncalled));
        }
        self.clear_bet();
        self.complete_round()
    }

    fn check_round(&mut self, actor: Actor) -> Result<(), ActionError> {
        if self.bet_outstanding {
            return Err(ActionError::FacingBet(self.bet_size));
        }
        self.record(actor, HistoryVerb::Check, None);
        if self.checked {
            return self.complete_round();
        }
        self.checked = true;
        self.turn = Some(actor.opponent());
        Ok(())
    }

    fn fold_hand(&mut self, actor: Actor) -> Result<(), ActionError> {
        let winner = actor.opponent();
        self.record(actor, HistoryVerb::Fold, None);
        self.clear_bet();
        self.turn = None;
        self.status = HandStatus::Folded { winner };
        let pot = std::mem::take(&mut self.pot);
        if pot > 0 {
            *self.stack_mut(winner) += pot;
            self.record(winner, HistoryVerb::Win, Some(pot));
        }
        Ok(())
    }

    fn complete_round(&mut self) -> Result<(), ActionError> {
        if self.player_stack == 0 || self.ai_stack == 0 {
            return self.run_out();
        }
        self.advance()
    }

    /// Deal every remaining street and go to showdown.
    fn run_out(&mut self) -> Result<(), ActionError> {
        while !self.is_terminal() {
            self.advance()?;
        }
        Ok(())
    }

    fn advance(&mut self) -> Result<(), ActionError> {
        let next = match self.stage.next() {
            Some(next) => next,
            None => return Ok(()),
        };
        if next == Stage::Showdown {
            self.stage = Stage::Showdown;
            return self.resolve();
        }
        let n = next.cards_revealed();
        if self.deck.len() < n {
            return Err(ActionError::DeckExhausted);
        }
        self.board.extend(self.deck.draw_n(n));
        self.stage = next;
        self.history_code.push('|');
        self.clear_bet();
        self.checked = false;
        self.turn = Some(self.first_to_act.leader(self.dealer));
        Ok(())
    }

    fn resolve(&mut self) -> Result<(), ActionError> {
        let result = resolve_showdown(&self.player_hole, &self.ai_hole, &self.board)?;
        let pot = std::mem::take(&mut self.pot);
        match result.winner {
            Some(winner) => {
                *self.stack_mut(winner) += pot;
                self.record(winner, HistoryVerb::Win, Some(pot));
            }
            None => {
                let (player_share, ai_share) = split_pot(pot, self.dealer);
                self.player_stack += player_share;
                self.ai_stack += ai_share;
                self.record(Actor::Player, HistoryVerb::Split, Some(player_share));
                self.record(Actor::Ai, HistoryVerb::Split, Some(ai_share));
            }
        }
        self.turn = None;
        self.clear_bet();
        self.status = HandStatus::Showdown { winner: result.winner };
        self.showdown = Some(result);
        Ok(())
    }

    fn clear_bet(&mut self) {
        self.bet_outstanding = false;
        self.bet_size = 0;
        self.bettor = None;
    }

    /// Move up to `amount` from `actor`'s stack into the pot; returns what moved.
    fn take_chips(&mut self, actor: Actor, amount: u64) -> u64 {
        let stack = self.stack_mut(actor);
        let paid = (*stack).min(amount);
        *stack -= paid;
        self.pot += paid;
        paid
    }

    fn stack_mut(&mut self, actor: Actor) -> &mut u64 {
        match actor {
            Actor::Player => &mut self.player_stack,
            Actor::Ai => &mut self.ai_stack,
        }
    }

    fn record(&mut self, actor: Actor, verb: HistoryVerb, amount: Option<u64>) {
        if let Some(c) = verb.code() {
            self.history_code.push(c);
        }
        self.history.push(HistoryEntry { actor, verb, amount, stage: self.stage });
    }
}
