use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use holdem_trainer::cards::parse_cards;
use holdem_trainer::deck::Deck;
use holdem_trainer::evaluator::evaluate_best;
use holdem_trainer::game::{HandSetup, HandState};
use holdem_trainer::hand::{Board, HoleCards};
use holdem_trainer::showdown::resolve_showdown;

fn bench_evaluate_best(c: &mut Criterion) {
    let mut g = c.benchmark_group("evaluate_best");
    for (label, hand) in [
        ("flop", "As Ah Kd Qc 7s"),
        ("turn", "As Ah Kd Qc 7s 2h"),
        ("river", "As Ks Qs Js Ts 9s 2h"),
    ] {
        let cards = parse_cards(hand).unwrap();
        g.bench_with_input(BenchmarkId::new(label, hand), &cards, |b, input| {
            b.iter(|| evaluate_best(black_box(input)))
        });
    }
    g.finish();
}

fn bench_showdown(c: &mut Criterion) {
    let player: HoleCards = "Ah Kd".parse().unwrap();
    let ai: HoleCards = "Qs Qc".parse().unwrap();
    let board: Board = "Ac 9d 7h 4s 2c".parse().unwrap();
    c.bench_function("resolve_showdown", |b| {
        b.iter(|| resolve_showdown(black_box(&player), black_box(&ai), black_box(&board)))
    });
}

fn bench_check_down(c: &mut Criterion) {
    let setup = HandSetup::heads_up(1000);
    c.bench_function("check_down_hand", |b| {
        b.iter(|| {
            let mut state = HandState::start(&setup, Deck::shuffled_seeded(black_box(7))).unwrap();
            while let Some(actor) = state.turn() {
                state = state.check(actor).unwrap();
            }
            state
        })
    });
}

criterion_group!(benches, bench_evaluate_best, bench_showdown, bench_check_down);
criterion_main!(benches);
