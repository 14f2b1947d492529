use super::{MoveOracle, OracleError, OracleMove, OracleRequest, Snapshot};
use crate::cards::Card;
use crate::evaluator::{evaluate_best, Category};
use crate::hand::{Board, HoleCards};
use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Mutex;

const TOP_CATEGORY: f64 = Category::RoyalFlush.ordinal() as f64;

/// Play-style knobs, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyProfile {
    pub tightness: f64,
    pub aggression: f64,
    pub bluff: f64,
    /// Chance of peeling a bet with a hand below the fold line.
    pub curiosity: f64,
}

impl Default for PolicyProfile {
    fn default() -> Self {
        Self { tightness: 0.5, aggression: 0.4, bluff: 0.06, curiosity: 0.2 }
    }
}

/// Strength-versus-pot-odds move picker. Value bets and bluffs are pot-sized.
#[derive(Debug)]
pub struct HeuristicPolicy {
    profile: PolicyProfile,
    rng: Mutex<StdRng>,
}

impl HeuristicPolicy {
    pub fn new(profile: PolicyProfile) -> Self {
        Self { profile, rng: Mutex::new(StdRng::from_os_rng()) }
    }

    pub fn with_seed(profile: PolicyProfile, seed: u64) -> Self {
        Self { profile, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    pub fn profile(&self) -> &PolicyProfile {
        &self.profile
    }

    pub fn choose(&self, snap: &Snapshot) -> OracleMove {
        let p = &self.profile;
        let strength = hand_strength(&snap.hole, &snap.board);
        let pot_odds = if snap.to_call == 0 {
            0.0
        } else {
            snap.to_call as f64 / (snap.pot as f64 + snap.to_call as f64)
        };
        let (noise, roll_a, roll_b) = {
            let mut rng = match self.rng.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            (rng.random_range(-1.0..=1.0) * 0.05, rng.random::<f64>(), rng.random::<f64>())
        };
        let adjusted = (strength + noise).clamp(0.0, 1.0);
        let fold_line = (0.35 + p.tightness * 0.3 - pot_odds * 0.25).clamp(0.1, 0.9);
        let bet_line = (0.68 - p.aggression * 0.25).clamp(0.15, 0.9);

        if snap.to_call > 0 {
            if adjusted < fold_line && roll_a >= p.curiosity * 0.3 {
                return OracleMove::Fold;
            }
            return OracleMove::Call;
        }
        let value = adjusted > bet_line && roll_a < p.aggression;
        let bluff = adjusted < fold_line && roll_b < p.bluff;
        if value || bluff {
            return OracleMove::Bet(pot_sized(snap));
        }
        OracleMove::Check
    }
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self::new(PolicyProfile::default())
    }
}

#[async_trait]
impl MoveOracle for HeuristicPolicy {
    async fn decide(&self, request: &OracleRequest) -> Result<OracleMove, OracleError> {
        let snap = Snapshot::try_from(request)?;
        Ok(self.choose(&snap))
    }
}

/// Pot-sized bet capped by the stack; `None` on an empty pot.
pub(crate) fn pot_sized(snap: &Snapshot) -> Option<u64> {
    if snap.pot == 0 {
        return None;
    }
    Some(snap.stack.map_or(snap.pot, |s| snap.pot.min(s)))
}

/// Rough equity estimate in `0.0..=1.0`.
pub fn hand_strength(hole: &HoleCards, board: &Board) -> f64 {
    if board.len() < 3 {
        return preflop_strength(hole);
    }
    let mut cards = Vec::with_capacity(2 + board.len());
    cards.extend_from_slice(&hole.as_array());
    cards.extend_from_slice(board.as_slice());
    let eval = match evaluate_best(&cards) {
        Ok(eval) => eval,
        Err(_) => return preflop_strength(hole),
    };
    let category = eval.category.ordinal() as f64 / TOP_CATEGORY;
    let high = eval.value().lead_rank().map_or(0.0, |r| r.value() as f64 / 14.0);
    let mut strength = category * 0.85 + high * 0.15;
    if board.len() < 5 {
        strength += draw_bonus(&cards);
    }
    let penalty = board_texture(board.as_slice()) * 0.12 * (1.0 - category);
    (strength - penalty).clamp(0.0, 1.0)
}

/// Heads-up starting-hand score.
pub fn preflop_strength(hole: &HoleCards) -> f64 {
    let a = hole.first().rank().value() as i32;
    let b = hole.second().rank().value() as i32;
    let (high, low) = (a.max(b) as f64, a.min(b) as f64);
    let gap = a.abs_diff(b);

    let mut score = (high / 14.0) * 0.5 + (low / 14.0) * 0.1;
    if gap == 0 {
        score += 0.3 + (high / 14.0) * 0.1;
    }
    if hole.first().suit() == hole.second().suit() {
        score += 0.05;
    }
    score += match gap {
        1 => 0.05,
        2 => 0.02,
        0 | 3 | 4 => 0.0,
        _ => -0.05,
    };
    // wider heads-up ranges
    (score + 0.08).clamp(0.0, 1.0)
}

fn suit_counts(cards: &[Card]) -> [u8; 4] {
    let mut suits = [0u8; 4];
    for c in cards {
        suits[c.suit().index() as usize] += 1;
    }
    suits
}

/// Distinct rank values with the ace also counted low.
fn straight_ranks(cards: &[Card]) -> Vec<i32> {
    let mut ranks: Vec<i32> = cards.iter().map(|c| c.rank().value() as i32).collect();
    ranks.sort_unstable();
    ranks.dedup();
    if ranks.contains(&14) {
        ranks.insert(0, 1);
    }
    ranks
}

fn draw_bonus(cards: &[Card]) -> f64 {
    let mut bonus = 0.0;
    if suit_counts(cards).contains(&4) {
        bonus += 0.07;
    }
    let ranks = straight_ranks(cards);
    if ranks.windows(4).any(|w| w[3] - w[0] == 3) {
        bonus += 0.06;
    } else if ranks.windows(4).any(|w| w[3] - w[0] == 4) {
        bonus += 0.03;
    }
    bonus
}

/// How coordinated the board is; wet boards discount weak made hands.
fn board_texture(board: &[Card]) -> f64 {
    if board.len() < 3 {
        return 0.0;
    }
    let mut texture: f64 = match suit_counts(board).iter().max().copied().unwrap_or(0) {
        4..=5 => 0.5,
        3 => 0.3,
        2 => 0.15,
        _ => 0.0,
    };
    let mut rank_counts = [0u8; 13];
    for c in board {
        rank_counts[c.rank().index() as usize] += 1;
    }
    match rank_counts.iter().max().copied().unwrap_or(0) {
        n if n >= 3 => texture += 0.25,
        2 => texture += 0.15,
        _ => {}
    }
    let ranks = straight_ranks(board);
    if ranks.windows(4).any(|w| w[3] - w[0] <= 4) {
        texture += 0.25;
    }
    if ranks.windows(3).any(|w| w[2] - w[0] <= 4) {
        texture += 0.15;
    }
    texture.clamp(0.0, 1.0)
}
