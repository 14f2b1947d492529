// Hand engine API boundary. The trait exposes the table operations so a
// front end (or the session driver) can play hands without touching the
// reducer directly. `Table` implements it on top of `HandState::apply`,
// committing a successor state only when the reducer accepts the action.

use crate::config::TrainerConfig;
use crate::game::{Action, ActionError, Actor, HandSetup, HandState, StartError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

pub trait HandEngine {
    // Hand lifecycle
    fn start_hand(&mut self) -> Result<&HandState, StartError>;

    // Actions
    fn place_bet(&mut self, actor: Actor, amount: u64) -> Result<&HandState, ActionError>;
    fn call_bet(&mut self, actor: Actor) -> Result<&HandState, ActionError>;
    fn check(&mut self, actor: Actor) -> Result<&HandState, ActionError>;
    fn fold(&mut self, actor: Actor) -> Result<&HandState, ActionError>;
    fn advance_stage(&mut self) -> Result<&HandState, ActionError>;

    // Queries
    fn state(&self) -> Option<&HandState>;
    fn stack(&self, actor: Actor) -> u64;
}

/// Heads-up table: the current hand plus what carries between hands.
#[derive(Debug, Clone)]
pub struct Table {
    config: TrainerConfig,
    rng: ChaCha8Rng,
    /// Stacks as they stood when the current hand was dealt.
    carried: [u64; 2],
    next_dealer: Actor,
    hands_dealt: u64,
    hand: Option<HandState>,
}

impl Table {
    pub fn new(config: TrainerConfig) -> Self {
        Self::from_rng(config, ChaCha8Rng::from_os_rng())
    }

    /// Deterministic shuffles for tests and replays.
    pub fn with_seed(config: TrainerConfig, seed: u64) -> Self {
        Self::from_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(config: TrainerConfig, rng: ChaCha8Rng) -> Self {
        let stack = config.starting_stack;
        Self {
            config,
            rng,
            carried: [stack, stack],
            // the AI deals first so the Player opens hand one
            next_dealer: Actor::Ai,
            hands_dealt: 0,
            hand: None,
        }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn hands_dealt(&self) -> u64 {
        self.hands_dealt
    }

    pub fn next_dealer(&self) -> Actor {
        self.next_dealer
    }

    /// Override the carried stacks before the next deal.
    pub fn set_stacks(&mut self, player: u64, ai: u64) {
        self.carried = [player, ai];
    }

    /// Run an action through the reducer and commit it on success.
    pub fn apply(&mut self, action: Action) -> Result<&HandState, ActionError> {
        let current = self.hand.as_ref().ok_or(ActionError::NoHand)?;
        let next = current.apply(action)?;
        debug!(
            hand_id = next.hand_id(),
            ?action,
            stage = ?next.stage(),
            pot = next.pot(),
            player_stack = next.player_stack(),
            ai_stack = next.ai_stack(),
            "action applied"
        );
        if next.is_terminal() && !current.is_terminal() {
            info!(hand_id = next.hand_id(), status = ?next.status(), "hand finished");
        }
        Ok(&*self.hand.insert(next))
    }

    fn next_setup(&mut self) -> HandSetup {
        if let Some(prev) = &self.hand {
            if prev.is_terminal() {
                self.carried = [prev.player_stack(), prev.ai_stack()];
            } else {
                warn!(hand_id = prev.hand_id(), "abandoning unfinished hand; stacks restored");
            }
        }
        if self.config.rebuy_busted {
            for stack in self.carried.iter_mut().filter(|s| **s == 0) {
                *stack = self.config.starting_stack;
            }
        }
        HandSetup {
            hand_id: self.hands_dealt + 1,
            dealer: self.next_dealer,
            player_stack: self.carried[0],
            ai_stack: self.carried[1],
            ante: self.config.ante,
            first_to_act: self.config.first_to_act,
        }
    }
}

impl HandEngine for Table {
    fn start_hand(&mut self) -> Result<&HandState, StartError> {
        let setup = self.next_setup();
        let hand = HandState::start_with_rng(&setup, &mut self.rng)?;
        self.hands_dealt = setup.hand_id;
        self.next_dealer = setup.dealer.opponent();
        info!(
            hand_id = setup.hand_id,
            dealer = %setup.dealer,
            player_stack = setup.player_stack,
            ai_stack = setup.ai_stack,
            "hand started"
        );
        Ok(&*self.hand.insert(hand))
    }

    fn place_bet(&mut self, actor: Actor, amount: u64) -> Result<&HandState, ActionError> {
        self.apply(Action::Bet { actor, amount })
    }

    fn call_bet(&mut self, actor: Actor) -> Result<&HandState, ActionError> {
        self.apply(Action::Call { actor })
    }

    fn check(&mut self, actor: Actor) -> Result<&HandState, ActionError> {
        self.apply(Action::Check { actor })
    }

    fn fold(&mut self, actor: Actor) -> Result<&HandState, ActionError> {
        self.apply(Action::Fold { actor })
    }

    fn advance_stage(&mut self) -> Result<&HandState, ActionError> {
        self.apply(Action::Advance)
    }

    fn state(&self) -> Option<&HandState> {
        self.hand.as_ref()
    }

    fn stack(&self, actor: Actor) -> u64 {
        match &self.hand {
            Some(h) => h.stack(actor),
            None => self.carried[actor.seat() as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Stage;

    fn table() -> Table {
        Table::with_seed(TrainerConfig::default(), 42)
    }

    #[test]
    fn actions_before_a_deal_are_rejected() {
        let mut t = table();
        assert_eq!(t.check(Actor::Player).unwrap_err(), ActionError::NoHand);
        assert_eq!(t.stack(Actor::Ai), 1000);
    }

    #[test]
    fn dealer_alternates_and_player_opens_first_hand() {
        let mut t = table();
        let h = t.start_hand().unwrap();
        assert_eq!(h.dealer(), Actor::Ai);
        assert_eq!(h.turn(), Some(Actor::Player));
        t.fold(Actor::Player).unwrap();
        let h = t.start_hand().unwrap();
        assert_eq!(h.dealer(), Actor::Player);
        assert_eq!(h.hand_id(), 2);
        assert_eq!(t.hands_dealt(), 2);
    }

    #[test]
    fn stacks_carry_between_hands() {
        let mut t = table();
        t.start_hand().unwrap();
        t.check(Actor::Player).unwrap();
        t.place_bet(Actor::Ai, 50).unwrap();
        t.call_bet(Actor::Player).unwrap();
        t.fold(Actor::Player).unwrap();
        let h = t.start_hand().unwrap();
        assert_eq!((h.player_stack(), h.ai_stack()), (950, 1050));
    }

    #[test]
    fn busted_side_is_rebought() {
        let mut t = table();
        t.set_stacks(1000, 0);
        let h = t.start_hand().unwrap();
        assert_eq!(h.ai_stack(), 1000);
    }

    #[test]
    fn busted_side_without_rebuy_cannot_start() {
        let cfg = TrainerConfig { rebuy_busted: false, ..TrainerConfig::default() };
        let mut t = Table::with_seed(cfg, 1);
        t.set_stacks(0, 1000);
        assert_eq!(t.start_hand().unwrap_err(), StartError::NoChips(Actor::Player));
        assert!(t.state().is_none());
    }

    #[test]
    fn abandoning_a_hand_restores_its_starting_stacks() {
        let mut t = table();
        t.start_hand().unwrap();
        t.place_bet(Actor::Player, 300).unwrap();
        let h = t.start_hand().unwrap();
        assert_eq!((h.player_stack(), h.ai_stack()), (1000, 1000));
        assert_eq!(h.stage(), Stage::Preflop);
    }

    #[test]
    fn rejected_action_keeps_committed_state() {
        let mut t = table();
        t.start_hand().unwrap();
        let before = t.state().cloned();
        assert!(t.place_bet(Actor::Ai, 10).is_err());
        assert_eq!(t.state().cloned(), before);
    }
}
