use super::analysis::HandAnalysis;
use crate::cards::Rank;
use crate::evaluator::{Category, Evaluation};

/// Each hand category knows how to recognise itself and build its tiebreak.
pub trait CategoryDetector {
    fn detect(&self, analysis: &HandAnalysis) -> bool;
    fn build_evaluation(&self, analysis: &HandAnalysis) -> Evaluation;
}

const PAD: Rank = Rank::Two;

/// Ten-high through ace-high straight in one suit, ace-high only.
pub struct RoyalFlushDetector;

impl CategoryDetector for RoyalFlushDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.is_flush && a.straight_top == Some(Rank::Ace)
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        a.build_evaluation(Category::RoyalFlush, [Rank::Ace, PAD, PAD, PAD, PAD])
    }
}

pub struct StraightFlushDetector;

impl CategoryDetector for StraightFlushDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.is_flush && a.straight_top.is_some()
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        let top = a.straight_top.unwrap_or(Rank::Five);
        a.build_evaluation(Category::StraightFlush, [top, PAD, PAD, PAD, PAD])
    }
}

pub struct FourOfAKindDetector;

impl CategoryDetector for FourOfAKindDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.rank_with(4).is_some()
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        let quad = a.rank_with(4).unwrap_or(PAD);
        let kicker = a.kickers().first().copied().unwrap_or(PAD);
        a.build_evaluation(Category::FourOfAKind, [quad, kicker, PAD, PAD, PAD])
    }
}

pub struct FullHouseDetector;

impl CategoryDetector for FullHouseDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.rank_with(3).is_some() && a.rank_with(2).is_some()
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        let trips = a.rank_with(3).unwrap_or(PAD);
        let pair = a.rank_with(2).unwrap_or(PAD);
        a.build_evaluation(Category::FullHouse, [trips, pair, PAD, PAD, PAD])
    }
}

pub struct FlushDetector;

impl CategoryDetector for FlushDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.is_flush
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        a.build_evaluation(Category::Flush, a.ranks)
    }
}

pub struct StraightDetector;

impl CategoryDetector for StraightDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.straight_top.is_some()
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        let top = a.straight_top.unwrap_or(Rank::Five);
        a.build_evaluation(Category::Straight, [top, PAD, PAD, PAD, PAD])
    }
}

pub struct ThreeOfAKindDetector;

impl CategoryDetector for ThreeOfAKindDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.rank_with(3).is_some()
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        let trips = a.rank_with(3).unwrap_or(PAD);
        let k = kickers_padded(a);
        a.build_evaluation(Category::ThreeOfAKind, [trips, k[0], k[1], PAD, PAD])
    }
}

pub struct TwoPairDetector;

impl CategoryDetector for TwoPairDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.pairs().len() == 2
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        let pairs = a.pairs();
        let k = kickers_padded(a);
        a.build_evaluation(Category::TwoPair, [pairs[0], pairs[1], k[0], PAD, PAD])
    }
}

pub struct OnePairDetector;

impl CategoryDetector for OnePairDetector {
    fn detect(&self, a: &HandAnalysis) -> bool {
        a.pairs().len() == 1
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        let pair = a.pairs()[0];
        let k = kickers_padded(a);
        a.build_evaluation(Category::Pair, [pair, k[0], k[1], k[2], PAD])
    }
}

/// Fallback; always matches.
pub struct HighCardDetector;

impl CategoryDetector for HighCardDetector {
    fn detect(&self, _a: &HandAnalysis) -> bool {
        true
    }

    fn build_evaluation(&self, a: &HandAnalysis) -> Evaluation {
        a.build_evaluation(Category::HighCard, a.ranks)
    }
}

fn kickers_padded(a: &HandAnalysis) -> [Rank; 3] {
    let mut out = [PAD; 3];
    for (slot, r) in out.iter_mut().zip(a.kickers()) {
        *slot = r;
    }
    out
}

/// Detectors in priority order, strongest category first.
pub const DETECTORS: [&dyn CategoryDetector; 10] = [
    &RoyalFlushDetector,
    &StraightFlushDetector,
    &FourOfAKindDetector,
    &FullHouseDetector,
    &FlushDetector,
    &StraightDetector,
    &ThreeOfAKindDetector,
    &TwoPairDetector,
    &OnePairDetector,
    &HighCardDetector,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn analyze(s: &str) -> HandAnalysis {
        let c = parse_cards(s).unwrap();
        HandAnalysis::new(&[c[0], c[1], c[2], c[3], c[4]])
    }

    fn first_match(s: &str) -> Category {
        let a = analyze(s);
        DETECTORS
            .iter()
            .find(|d| d.detect(&a))
            .map(|d| d.build_evaluation(&a).category)
            .unwrap_or(Category::HighCard)
    }

    #[test]
    fn priority_order_picks_strongest_category() {
        assert_eq!(first_match("As Ks Qs Js Ts"), Category::RoyalFlush);
        assert_eq!(first_match("9h 8h 7h 6h 5h"), Category::StraightFlush);
        assert_eq!(first_match("Ah 2h 3h 4h 5h"), Category::StraightFlush);
        assert_eq!(first_match("As Ah Ad Ac Ks"), Category::FourOfAKind);
        assert_eq!(first_match("Ks Kh Kd Qc Qs"), Category::FullHouse);
        assert_eq!(first_match("Ad Jd 9d 5d 2d"), Category::Flush);
        assert_eq!(first_match("9s 8h 7d 6c 5s"), Category::Straight);
        assert_eq!(first_match("Js Jh Jd 9c 7s"), Category::ThreeOfAKind);
        assert_eq!(first_match("As Ah Kd Kc Qs"), Category::TwoPair);
        assert_eq!(first_match("Js Jh 9d 7c 3s"), Category::Pair);
        assert_eq!(first_match("As Kh Jd 9c 7s"), Category::HighCard);
    }

    #[test]
    fn straight_flush_also_satisfies_weaker_detectors() {
        let a = analyze("9h 8h 7h 6h 5h");
        assert!(!RoyalFlushDetector.detect(&a));
        assert!(StraightFlushDetector.detect(&a));
        assert!(FlushDetector.detect(&a));
        assert!(StraightDetector.detect(&a));
    }

    #[test]
    fn quads_tiebreak_uses_kicker() {
        let hi = FourOfAKindDetector.build_evaluation(&analyze("9s 9h 9d 9c Ks"));
        let lo = FourOfAKindDetector.build_evaluation(&analyze("9s 9h 9d 9c Qs"));
        assert!(hi > lo);
    }
}
