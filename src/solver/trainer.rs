use super::{InfoNode, SolverError, StrategyTable, TrainingGame};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::debug;

const PROGRESS_EVERY: usize = 10_000;

/// Vanilla CFR over every betting line of one sampled deal per iteration.
#[derive(Debug, Clone)]
pub struct Trainer {
    nodes: HashMap<String, InfoNode>,
    rng: ChaCha8Rng,
    epochs: usize,
}

impl Trainer {
    pub fn new(seed: u64) -> Self {
        Self { nodes: HashMap::new(), rng: ChaCha8Rng::seed_from_u64(seed), epochs: 0 }
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Info sets visited so far.
    pub fn infosets(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, key: &str) -> Option<&InfoNode> {
        self.nodes.get(key)
    }

    /// Run `iterations` deals and return seat 0's mean value over them.
    pub fn train(&mut self, iterations: usize) -> Result<f64, SolverError> {
        let mut total = 0.0;
        for _ in 0..iterations {
            let root = TrainingGame::deal(&mut self.rng)?;
            total += self.cfr(&root, [1.0, 1.0]);
            self.epochs += 1;
            if self.epochs % PROGRESS_EVERY == 0 {
                debug!(epochs = self.epochs, infosets = self.nodes.len(), "training progress");
            }
        }
        Ok(if iterations == 0 { 0.0 } else { total / iterations as f64 })
    }

    /// Seat 0's expected value at `game` under the current strategies.
    fn cfr(&mut self, game: &TrainingGame, reach: [f64; 2]) -> f64 {
        if game.is_terminal() {
            return game.payoff();
        }
        let hero = game.player();
        let edges = game.choices();
        let key = game.info_key();
        let policy = {
            let node = self.nodes.entry(key.clone()).or_insert_with(|| InfoNode::new(edges));
            let policy = node.current();
            node.accumulate(&policy, reach[hero]);
            policy
        };

        let mut values = Vec::with_capacity(edges.len());
        let mut expected = 0.0;
        for (edge, p) in edges.iter().zip(&policy) {
            let mut next_reach = reach;
            next_reach[hero] *= p;
            let value = self.cfr(&game.apply(*edge), next_reach);
            expected += p * value;
            values.push(value);
        }

        // regrets are kept from the acting seat's side
        let sign = if hero == 0 { 1.0 } else { -1.0 };
        let opponent = reach[1 - hero];
        let deltas: Vec<f64> = values.iter().map(|v| sign * (v - expected) * opponent).collect();
        if let Some(node) = self.nodes.get_mut(&key) {
            node.add_regret(&deltas);
        }
        expected
    }

    /// Average strategy of every visited info set.
    pub fn strategy(&self) -> StrategyTable {
        let mut table = StrategyTable::default();
        for (key, node) in &self.nodes {
            table.insert(key.clone(), &node.average());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Edge;

    #[test]
    fn same_seed_trains_the_same_table() {
        let mut a = Trainer::new(21);
        let mut b = Trainer::new(21);
        let va = a.train(30).unwrap();
        let vb = b.train(30).unwrap();
        assert_eq!(va, vb);
        assert_eq!(a.strategy(), b.strategy());
        assert_eq!(a.epochs(), 30);
    }

    #[test]
    fn averaged_policies_are_distributions_over_legal_edges() {
        let mut trainer = Trainer::new(5);
        trainer.train(40).unwrap();
        let table = trainer.strategy();
        assert_eq!(table.len(), trainer.infosets());
        for (key, node) in &trainer.nodes {
            let avg = node.average();
            let sum: f64 = avg.iter().map(|(_, p)| p).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{key} sums to {sum}");
            let facing = !key.ends_with("|0");
            let legal: &[Edge] = if facing { &[Edge::Fold, Edge::Call] } else { &[Edge::Call, Edge::Raise] };
            assert_eq!(node.edges(), legal);
        }
    }

    #[test]
    fn game_value_stays_within_the_largest_pot() {
        let mut trainer = Trainer::new(8);
        let value = trainer.train(25).unwrap();
        // four called pot raises grow the pot to 2 * 3^4
        assert!(value.abs() <= 81.0);
        assert_eq!(Trainer::new(1).train(0).unwrap(), 0.0);
    }
}
