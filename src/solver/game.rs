use super::info_key;
use crate::cards::Card;
use crate::deck::Deck;
use crate::evaluator::evaluate_best;
use crate::game::Stage;
use crate::hand::{HandError, HoleCards};
use crate::oracle::{MOVE_BET, MOVE_CHECK_CALL, MOVE_FOLD};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Chips each seat posts before the deal.
pub const BLIND: u64 = 1;

const RESPOND: [Edge; 2] = [Edge::Fold, Edge::Call];
const OPEN: [Edge; 2] = [Edge::Call, Edge::Raise];

/// A decision in the reduced game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Edge {
    Fold,
    /// Check with nothing to call, call otherwise.
    Call,
    /// Pot-sized raise.
    Raise,
}

impl Edge {
    /// Oracle move code.
    pub const fn code(self) -> u8 {
        match self {
            Edge::Fold => MOVE_FOLD,
            Edge::Call => MOVE_CHECK_CALL,
            Edge::Raise => MOVE_BET,
        }
    }

    pub const fn from_code(code: u8) -> Option<Edge> {
        match code {
            MOVE_FOLD => Some(Edge::Fold),
            MOVE_CHECK_CALL => Some(Edge::Call),
            MOVE_BET => Some(Edge::Raise),
            _ => None,
        }
    }

    /// History letter, matching the live hand's history code.
    pub const fn symbol(self) -> char {
        match self {
            Edge::Fold => 'f',
            Edge::Call => 'c',
            Edge::Raise => 'r',
        }
    }
}

/// One node of the reduced game. Transitions return a new node.
#[derive(Debug, Clone)]
pub struct TrainingGame {
    deck: Deck,
    holes: [HoleCards; 2],
    board: Vec<Card>,
    player: usize,
    stage: Stage,
    pot: u64,
    to_call: u64,
    checked: bool,
    committed: [u64; 2],
    history: String,
    folded: Option<usize>,
}

impl TrainingGame {
    /// Shuffle a fresh deck with `rng` and deal both seats.
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Result<Self, HandError> {
        let mut deck = Deck::standard();
        deck.shuffle_with(rng);
        Self::from_deck(deck)
    }

    /// Deal seat 0 then seat 1 from the top of `deck`; the rest is the board.
    pub fn from_deck(mut deck: Deck) -> Result<Self, HandError> {
        let first = HoleCards::from_slice(&deck.draw_n(2))?;
        let second = HoleCards::from_slice(&deck.draw_n(2))?;
        Ok(Self {
            deck,
            holes: [first, second],
            board: Vec::with_capacity(5),
            player: 0,
            stage: Stage::Preflop,
            pot: 2 * BLIND,
            to_call: 0,
            checked: false,
            committed: [BLIND; 2],
            history: String::new(),
            folded: None,
        })
    }

    pub fn player(&self) -> usize {
        self.player
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn to_call(&self) -> u64 {
        self.to_call
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn history(&self) -> &str {
        &self.history
    }

    pub fn committed(&self, seat: usize) -> u64 {
        self.committed[seat % 2]
    }

    pub fn is_terminal(&self) -> bool {
        self.folded.is_some() || self.stage == Stage::Showdown
    }

    pub fn choices(&self) -> &'static [Edge] {
        if self.to_call > 0 {
            &RESPOND
        } else {
            &OPEN
        }
    }

    /// Key of the info set the seat to act is in.
    pub fn info_key(&self) -> String {
        let hole = self.holes[self.player].as_array();
        info_key(&hole, &self.board, &self.history, self.pot, self.to_call)
    }

    pub fn apply(&self, edge: Edge) -> Self {
        let mut next = self.clone();
        next.play(edge);
        next
    }

    fn play(&mut self, edge: Edge) {
        let seat = self.player;
        self.history.push(edge.symbol());
        match edge {
            Edge::Fold => self.folded = Some(seat),
            Edge::Call if self.to_call > 0 => {
                self.pot += self.to_call;
                self.committed[seat] += self.to_call;
                self.to_call = 0;
                self.next_round();
            }
            Edge::Call if self.checked => self.next_round(),
            Edge::Call => {
                self.checked = true;
                self.player = 1 - seat;
            }
            Edge::Raise => {
                let bet = self.pot;
                self.pot += bet;
                self.committed[seat] += bet;
                self.to_call = bet;
                self.checked = false;
                self.player = 1 - seat;
            }
        }
    }

    fn next_round(&mut self) {
        let Some(next) = self.stage.next() else { return };
        self.stage = next;
        if next == Stage::Showdown {
            return;
        }
        self.board.extend(self.deck.draw_n(next.cards_revealed()));
        self.player = 0;
        self.to_call = 0;
        self.checked = false;
        self.history.push('|');
    }

    /// Seat 0's net chips at a terminal node. The winner takes what the
    /// loser committed; a split returns everything.
    pub fn payoff(&self) -> f64 {
        let won_by = |seat: usize| match seat {
            0 => self.committed[1] as f64,
            _ => -(self.committed[0] as f64),
        };
        match self.folded {
            Some(folder) => won_by(1 - folder),
            None => match self.showdown() {
                Ordering::Greater => won_by(0),
                Ordering::Less => won_by(1),
                Ordering::Equal => 0.0,
            },
        }
    }

    fn showdown(&self) -> Ordering {
        let seven = |seat: usize| {
            let mut cards = self.holes[seat].as_array().to_vec();
            cards.extend_from_slice(&self.board);
            evaluate_best(&cards)
        };
        match (seven(0), seven(1)) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn root() -> TrainingGame {
        TrainingGame::from_deck(Deck::shuffled_seeded(3)).unwrap()
    }

    #[test]
    fn blinds_open_the_pot() {
        let g = root();
        assert_eq!(g.pot(), 2);
        assert_eq!((g.committed(0), g.committed(1)), (1, 1));
        assert_eq!(g.choices(), &[Edge::Call, Edge::Raise]);
        assert!(g.info_key().ends_with("|||2|0"));
    }

    #[test]
    fn check_check_deals_the_flop() {
        let g = root().apply(Edge::Call);
        assert_eq!(g.player(), 1);
        assert_eq!(g.stage(), Stage::Preflop);
        let g = g.apply(Edge::Call);
        assert_eq!(g.stage(), Stage::Flop);
        assert_eq!(g.board().len(), 3);
        assert_eq!(g.player(), 0);
        assert_eq!(g.history(), "cc|");
    }

    #[test]
    fn raise_is_pot_sized_and_call_closes_the_round() {
        let g = root().apply(Edge::Raise);
        assert_eq!((g.pot(), g.to_call()), (4, 2));
        assert_eq!(g.choices(), &[Edge::Fold, Edge::Call]);
        let g = g.apply(Edge::Call);
        assert_eq!(g.stage(), Stage::Flop);
        assert_eq!((g.pot(), g.committed(0), g.committed(1)), (6, 3, 3));
        assert_eq!(g.history(), "rc|");
    }

    #[test]
    fn fold_pays_out_the_loser_commitment() {
        let g = root().apply(Edge::Raise).apply(Edge::Fold);
        assert!(g.is_terminal());
        assert_eq!(g.payoff(), 1.0);
        let g = root().apply(Edge::Call).apply(Edge::Raise).apply(Edge::Fold);
        assert_eq!(g.payoff(), -1.0);
    }

    #[test]
    fn check_down_reaches_showdown_without_a_trailing_separator() {
        let mut g = root();
        while !g.is_terminal() {
            g = g.apply(Edge::Call);
        }
        assert_eq!(g.stage(), Stage::Showdown);
        assert_eq!(g.board().len(), 5);
        assert_eq!(g.history(), "cc|cc|cc|cc");
        assert!([-1.0, 0.0, 1.0].contains(&g.payoff()));
    }

    #[test]
    fn showdown_after_a_called_raise_moves_at_most_the_commitment() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            let mut g = TrainingGame::deal(&mut rng).unwrap().apply(Edge::Raise).apply(Edge::Call);
            while !g.is_terminal() {
                g = g.apply(Edge::Call);
            }
            assert!([-3.0, 0.0, 3.0].contains(&g.payoff()));
        }
    }

    #[test]
    fn move_codes_round_trip() {
        for edge in [Edge::Fold, Edge::Call, Edge::Raise] {
            assert_eq!(Edge::from_code(edge.code()), Some(edge));
        }
        assert_eq!(Edge::from_code(9), None);
    }
}
