use crate::cards::{Card, DECK_SIZE};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A standard 52-card deck. Cards are drawn from the top (end of the
/// sequence) in a fixed order once shuffled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// A fresh deck in card-code order.
    ///
    /// ```
    /// use holdem_trainer::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// assert_eq!(deck.codes()[0], 0);
    /// ```
    pub fn standard() -> Self {
        let cards = (0..DECK_SIZE).filter_map(|code| Card::from_code(code).ok()).collect();
        Self { cards }
    }

    /// A fresh deck shuffled with a ChaCha8 generator seeded from `seed`.
    pub fn shuffled_seeded(seed: u64) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_seeded(seed);
        deck
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Uniform Fisher–Yates shuffle with the provided RNG.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Remaining cards as wire codes, bottom first.
    pub fn codes(&self) -> Vec<u8> {
        self.cards.iter().map(|c| c.code()).collect()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_distinct_codes() {
        let d = Deck::standard();
        assert_eq!(d.len(), 52);
        let set: HashSet<u8> = d.codes().into_iter().collect();
        assert_eq!(set.len(), 52);
        assert!(set.iter().all(|&c| c < 52));
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let d1 = Deck::shuffled_seeded(42);
        let d2 = Deck::shuffled_seeded(42);
        assert_eq!(d1.cards, d2.cards);
        assert_ne!(d1, Deck::standard());
    }

    #[test]
    fn draw_reduces_length_and_returns_cards() {
        let mut d = Deck::shuffled_seeded(7);
        let top = *d.as_slice().last().unwrap();
        let c1 = d.draw().unwrap();
        assert_eq!(c1, top);
        let c2 = d.draw().unwrap();
        assert_ne!(c1, c2);
        assert!(!d.contains(c1));
        assert_eq!(d.len(), 50);
        let hand = d.draw_n(5);
        assert_eq!(hand.len(), 5);
        assert_eq!(d.len(), 45);
    }

    #[test]
    fn draw_n_stops_at_empty() {
        let mut d = Deck::standard();
        assert_eq!(d.draw_n(60).len(), 52);
        assert!(d.is_empty());
        assert!(d.draw().is_none());
    }
}
