use crate::cards::{Card, Rank};
use crate::evaluator::{Category, Evaluation, HandValue};

/// Everything the category detectors need to know about a five-card hand,
/// computed once per hand.
#[derive(Debug, Clone)]
pub struct HandAnalysis {
    /// Cards by rank descending, then suit descending.
    pub sorted_cards: [Card; 5],
    /// Ranks in the same order as `sorted_cards`.
    pub ranks: [Rank; 5],
    /// `(rank, count)` sorted by count desc, then rank desc. AAAKQ groups as
    /// `[(A, 3), (K, 1), (Q, 1)]`.
    pub groups: Vec<(Rank, u8)>,
    pub is_flush: bool,
    /// High card of the straight; Five for the wheel.
    pub straight_top: Option<Rank>,
}

impl HandAnalysis {
    pub fn new(cards: &[Card; 5]) -> Self {
        let mut sorted_cards = *cards;
        sorted_cards.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));
        let ranks = sorted_cards.map(|c| c.rank());

        let mut counts = [0u8; 13];
        let mut mask: u16 = 0;
        for r in ranks {
            counts[r.index() as usize] += 1;
            mask |= 1 << r.index();
        }

        let mut groups: Vec<(Rank, u8)> = Rank::ALL
            .iter()
            .rev()
            .filter_map(|&r| {
                let n = counts[r.index() as usize];
                (n > 0).then_some((r, n))
            })
            .collect();
        groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));

        let is_flush = sorted_cards.iter().all(|c| c.suit() == sorted_cards[0].suit());
        let straight_top = straight_top(mask);

        Self { sorted_cards, ranks, groups, is_flush, straight_top }
    }

    /// Rank with exactly `count` copies, highest first.
    pub fn rank_with(&self, count: u8) -> Option<Rank> {
        self.groups.iter().find(|(_, n)| *n == count).map(|(r, _)| *r)
    }

    pub fn pairs(&self) -> Vec<Rank> {
        self.groups.iter().filter(|(_, n)| *n == 2).map(|(r, _)| *r).collect()
    }

    /// Unpaired ranks, highest first.
    pub fn kickers(&self) -> Vec<Rank> {
        self.groups.iter().filter(|(_, n)| *n == 1).map(|(r, _)| *r).collect()
    }

    pub fn build_evaluation(&self, category: Category, tiebreak: [Rank; 5]) -> Evaluation {
        let value = HandValue::from_parts(category, &tiebreak);
        Evaluation { category, best_five: self.sorted_cards, value }
    }
}

/// Highest straight inside a rank bitmask (bit `i` = rank index `i`).
fn straight_top(mask: u16) -> Option<Rank> {
    const WHEEL: u16 = 0b1_0000_0000_1111;
    for top in (4..13u8).rev() {
        let run = 0b1_1111u16 << (top - 4);
        if mask & run == run {
            return Rank::from_index(top);
        }
    }
    if mask & WHEEL == WHEEL {
        return Some(Rank::Five);
    }
    None
}
