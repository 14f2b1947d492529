use holdem_trainer::deck::Deck;
use holdem_trainer::game::{Action, Actor, HandSetup, HandState};
use proptest::prelude::*;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
enum Step {
    Bet(u64),
    Call,
    Check,
    Fold,
    Advance,
}

fn any_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (1u64..400).prop_map(Step::Bet),
        4 => Just(Step::Call),
        4 => Just(Step::Check),
        1 => Just(Step::Fold),
        1 => Just(Step::Advance),
    ]
}

fn to_action(step: Step, actor: Actor) -> Action {
    match step {
        Step::Bet(amount) => Action::Bet { actor, amount },
        Step::Call => Action::Call { actor },
        Step::Check => Action::Check { actor },
        Step::Fold => Action::Fold { actor },
        Step::Advance => Action::Advance,
    }
}

fn every_card(state: &HandState) -> Vec<u8> {
    let mut codes = state.deck().codes();
    codes.extend(state.board().codes());
    for actor in Actor::BOTH {
        codes.extend(state.hole(actor).codes());
    }
    codes
}

fn setup(player: u64, ai: u64, ante: u64, dealer_ai: bool) -> HandSetup {
    HandSetup {
        hand_id: 1,
        dealer: if dealer_ai { Actor::Ai } else { Actor::Player },
        player_stack: player,
        ai_stack: ai,
        ante,
        first_to_act: Default::default(),
    }
}

proptest! {
    #[test]
    fn seeded_shuffle_is_a_permutation(seed in any::<u64>()) {
        let mut codes = Deck::shuffled_seeded(seed).codes();
        codes.sort_unstable();
        prop_assert_eq!(codes, (0u8..52).collect::<Vec<_>>());
    }

    #[test]
    fn random_play_conserves_chips_and_never_regresses(
        seed in any::<u64>(),
        player in 1u64..1500,
        ai in 1u64..1500,
        ante in 0u64..5,
        dealer_ai in any::<bool>(),
        steps in prop::collection::vec(any_step(), 0..40),
    ) {
        let total = player + ai;
        let mut state = HandState::start(&setup(player, ai, ante, dealer_ai), Deck::shuffled_seeded(seed)).unwrap();
        prop_assert_eq!(state.chips_in_play(), total);

        for step in steps {
            let actor = state.turn().unwrap_or(Actor::Player);
            let before = state.clone();
            match state.apply(to_action(step, actor)) {
                Ok(next) => {
                    prop_assert!(next.stage() >= before.stage());
                    prop_assert!(next.board().len() >= before.board().len());
                    state = next;
                }
                Err(_) => prop_assert_eq!(&state, &before),
            }
            prop_assert_eq!(state.chips_in_play(), total);

            let cards = every_card(&state);
            let unique: HashSet<u8> = cards.iter().copied().collect();
            prop_assert_eq!(cards.len(), 52);
            prop_assert_eq!(unique.len(), 52);

            if state.is_terminal() {
                prop_assert_eq!(state.pot(), 0);
                prop_assert_eq!(state.turn(), None);
            }
        }
    }

    #[test]
    fn fold_always_ends_the_hand(seed in any::<u64>(), checks in 0usize..6) {
        let mut state = HandState::start(&setup(500, 500, 0, true), Deck::shuffled_seeded(seed)).unwrap();
        for _ in 0..checks {
            let actor = state.turn().unwrap();
            state = state.check(actor).unwrap();
        }
        let folder = state.turn().unwrap();
        let done = state.fold(folder).unwrap();
        prop_assert_eq!(done.winner(), Some(folder.opponent()));
        prop_assert_eq!(done.turn(), None);
        prop_assert!(done.check(folder.opponent()).is_err());
        prop_assert!(done.place_bet(folder.opponent(), 1).is_err());
    }
}
