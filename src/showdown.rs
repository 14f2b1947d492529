//! Showdown resolution and pot settlement between the two seats.

use crate::evaluator::{evaluate_holdem, EvalError, Evaluation};
use crate::game::Actor;
use crate::hand::{validate_table, Board, HoleCards};
use std::cmp::Ordering;

/// Both sides' best hands and who won. `winner == None` is a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowdownResult {
    pub winner: Option<Actor>,
    pub player: Evaluation,
    pub ai: Evaluation,
}

impl ShowdownResult {
    pub fn evaluation(&self, actor: Actor) -> &Evaluation {
        match actor {
            Actor::Player => &self.player,
            Actor::Ai => &self.ai,
        }
    }
}

/// Evaluate both hands over 3 to 5 community cards and pick the winner.
///
/// ```
/// use holdem_trainer::game::Actor;
/// use holdem_trainer::hand::{Board, HoleCards};
/// use holdem_trainer::showdown::resolve_showdown;
///
/// let board: Board = "Kc 8d 5h 3s 2c".parse().unwrap();
/// let player: HoleCards = "Ah Ad".parse().unwrap();
/// let ai: HoleCards = "Qh Js".parse().unwrap();
/// assert_eq!(resolve_showdown(&player, &ai, &board).unwrap().winner, Some(Actor::Player));
/// ```
pub fn resolve_showdown(
    player_hole: &HoleCards,
    ai_hole: &HoleCards,
    community: &Board,
) -> Result<ShowdownResult, EvalError> {
    validate_table(&[*player_hole, *ai_hole], community)?;
    let player = evaluate_holdem(player_hole, community)?;
    let ai = evaluate_holdem(ai_hole, community)?;
    let winner = match player.cmp(&ai) {
        Ordering::Greater => Some(Actor::Player),
        Ordering::Less => Some(Actor::Ai),
        Ordering::Equal => None,
    };
    Ok(ShowdownResult { winner, player, ai })
}

/// Halve a pot as `(player_share, ai_share)`; the odd chip goes to the
/// dealer's opponent.
pub fn split_pot(pot: u64, dealer: Actor) -> (u64, u64) {
    let half = pot / 2;
    let odd = pot % 2;
    match dealer.opponent() {
        Actor::Player => (half + odd, half),
        Actor::Ai => (half, half + odd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::Category;

    #[test]
    fn board_plays_for_both_is_a_split() {
        let board: Board = "As Ks Qs Js Ts".parse().unwrap();
        let p: HoleCards = "2c 3d".parse().unwrap();
        let a: HoleCards = "4h 5c".parse().unwrap();
        let r = resolve_showdown(&p, &a, &board).unwrap();
        assert_eq!(r.winner, None);
        assert_eq!(r.player.category, Category::RoyalFlush);
    }

    #[test]
    fn kicker_breaks_pair_tie() {
        let board: Board = "Ah 9c 7d 4s 2h".parse().unwrap();
        let p: HoleCards = "Ad Kc".parse().unwrap();
        let a: HoleCards = "Ac Qd".parse().unwrap();
        let r = resolve_showdown(&p, &a, &board).unwrap();
        assert_eq!(r.winner, Some(Actor::Player));
        assert_eq!(r.evaluation(Actor::Ai).category, Category::Pair);
    }

    #[test]
    fn overlapping_cards_are_rejected() {
        let board: Board = "Ah 9c 7d".parse().unwrap();
        let p: HoleCards = "Ah Kc".parse().unwrap();
        let a: HoleCards = "Ac Qd".parse().unwrap();
        assert!(matches!(resolve_showdown(&p, &a, &board), Err(EvalError::InvalidHand(_))));
    }

    #[test]
    fn odd_chip_goes_to_non_dealer() {
        assert_eq!(split_pot(101, Actor::Player), (50, 51));
        assert_eq!(split_pot(101, Actor::Ai), (51, 50));
        assert_eq!(split_pot(100, Actor::Ai), (50, 50));
    }
}
