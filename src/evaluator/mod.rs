//! Showdown hand ranking.
//!
//! Every hand is reduced to its best five cards and packed into a
//! [`HandValue`] that orders first by [`Category`], then by tiebreak ranks
//! (pair rank before kickers, high card before low card, and so on).

pub(crate) mod analysis;
pub(crate) mod combinations;
pub(crate) mod detector;

use crate::cards::{Card, Rank};
use crate::hand::{validate_table, Board, HandError, HoleCards};
use core::cmp::Ordering;
use std::fmt;

/// Compact, comparable hand strength. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Detailed evaluation result. `value` drives ordering; two evaluations with
/// equal values are a split.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Evaluation {
    pub category: Category,
    pub best_five: [Card; 5],
    value: HandValue,
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

impl Evaluation {
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

impl HandValue {
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Pack a category and five rank tiebreakers into a comparable value.
    pub fn from_parts(category: Category, ranks_desc: &[Rank; 5]) -> Self {
        // [ category (8 bits) | r0 (6) | r1 (6) | r2 (6) | r3 (6) | r4 (6) | 10 zero bits ]
        const CAT_SHIFT: u32 = 48;
        const RANK_STRIDE: u32 = 6;
        let mut v: u64 = (category as u64) << CAT_SHIFT;
        for (i, r) in ranks_desc.iter().enumerate() {
            let offset = CAT_SHIFT - RANK_STRIDE * (i as u32 + 1);
            v |= (*r as u64) << offset;
        }
        HandValue(v)
    }

    /// First tiebreak rank: the straight's top card (Five for the wheel),
    /// the set or pair rank, or the high card.
    pub fn lead_rank(self) -> Option<Rank> {
        let value = ((self.0 >> 42) & 0x3f) as u8;
        Rank::from_index(value.checked_sub(2)?)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("need 5 to 7 cards to evaluate, got {0}")]
    CardCount(usize),
}

/// Evaluate exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    use analysis::HandAnalysis;
    use detector::DETECTORS;

    let analysis = HandAnalysis::new(cards);
    for detector in DETECTORS.iter() {
        if detector.detect(&analysis) {
            return detector.build_evaluation(&analysis);
        }
    }
    unreachable!("HighCard detector always matches")
}

/// Best five-card evaluation among 5, 6 or 7 cards.
///
/// ```
/// use holdem_trainer::cards::parse_cards;
/// use holdem_trainer::evaluator::{evaluate_best, Category};
///
/// let cards = parse_cards("As Ah Kd Kc 7s 2h").unwrap();
/// assert_eq!(evaluate_best(&cards).unwrap().category, Category::TwoPair);
/// ```
pub fn evaluate_best(cards: &[Card]) -> Result<Evaluation, EvalError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EvalError::CardCount(cards.len()));
    }
    let mut best: Option<Evaluation> = None;
    for idx in combinations::FiveOf::new(cards.len()) {
        let eval = evaluate_five(&idx.map(|i| cards[i]));
        if best.as_ref().map_or(true, |b| eval > *b) {
            best = Some(eval);
        }
    }
    best.ok_or(EvalError::CardCount(cards.len()))
}

/// Evaluate seven cards (two hole + full board).
pub fn evaluate_seven(cards: &[Card; 7]) -> Evaluation {
    let mut best = evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
    for idx in combinations::FiveOf::new(7).skip(1) {
        let eval = evaluate_five(&idx.map(|i| cards[i]));
        if eval > best {
            best = eval;
        }
    }
    best
}

/// Evaluate one side's hole cards with a board of 3 to 5 community cards.
///
/// ```
/// use holdem_trainer::evaluator::{evaluate_holdem, Category};
/// use holdem_trainer::hand::{Board, HoleCards};
///
/// let hole: HoleCards = "As Ah".parse().unwrap();
/// let board: Board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// assert_eq!(evaluate_holdem(&hole, &board).unwrap().category, Category::Pair);
/// ```
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<Evaluation, EvalError> {
    validate_table(&[*hole], board)?;
    let mut cards = Vec::with_capacity(2 + board.len());
    cards.extend_from_slice(&hole.as_array());
    cards.extend_from_slice(board.as_slice());
    evaluate_best(&cards)
}

/// Compare two hands on a shared board. `Greater` means `a` wins.
///
/// ```
/// use holdem_trainer::evaluator::compare_holdem;
/// use holdem_trainer::hand::{Board, HoleCards};
/// use std::cmp::Ordering;
///
/// let board: Board = "Qc Jd 9h 3s 2c".parse().unwrap();
/// let a: HoleCards = "As Ah".parse().unwrap();
/// let b: HoleCards = "Ks Kh".parse().unwrap();
/// assert_eq!(compare_holdem(&a, &b, &board).unwrap(), Ordering::Greater);
/// ```
pub fn compare_holdem(a: &HoleCards, b: &HoleCards, board: &Board) -> Result<Ordering, EvalError> {
    validate_table(&[*a, *b], board)?;
    let va = evaluate_holdem(a, board)?;
    let vb = evaluate_holdem(b, board)?;
    Ok(va.cmp(&vb))
}
