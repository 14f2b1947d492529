use super::policy::pot_sized;
use super::{HeuristicPolicy, MoveOracle, OracleError, OracleMove, OracleRequest, Snapshot};
use crate::solver::{Edge, StrategyTable};
use async_trait::async_trait;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Mutex;

/// Plays from a trained [`StrategyTable`] and defers to a heuristic for info
/// sets the table never saw.
#[derive(Debug)]
pub struct StrategyPolicy {
    table: StrategyTable,
    fallback: HeuristicPolicy,
    rng: Mutex<StdRng>,
}

impl StrategyPolicy {
    pub fn new(table: StrategyTable, fallback: HeuristicPolicy) -> Self {
        Self { table, fallback, rng: Mutex::new(StdRng::from_os_rng()) }
    }

    pub fn with_seed(table: StrategyTable, fallback: HeuristicPolicy, seed: u64) -> Self {
        Self { table, fallback, rng: Mutex::new(StdRng::seed_from_u64(seed)) }
    }

    /// No table: every decision comes from `fallback`.
    pub fn heuristic(fallback: HeuristicPolicy) -> Self {
        Self::new(StrategyTable::default(), fallback)
    }

    pub fn table(&self) -> &StrategyTable {
        &self.table
    }

    /// The trained move for this snapshot, if its info set is in the table.
    pub fn lookup(&self, snap: &Snapshot) -> Option<OracleMove> {
        let edge = {
            let mut rng = match self.rng.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            self.table.sample(&snap.info_key(), &mut *rng)?
        };
        let facing = snap.to_call > 0;
        Some(match edge {
            Edge::Fold if facing => OracleMove::Fold,
            Edge::Call if facing => OracleMove::Call,
            Edge::Fold | Edge::Call => OracleMove::Check,
            Edge::Raise => OracleMove::Bet(pot_sized(snap)),
        })
    }

    pub fn choose(&self, snap: &Snapshot) -> OracleMove {
        self.lookup(snap).unwrap_or_else(|| self.fallback.choose(snap))
    }
}

#[async_trait]
impl MoveOracle for StrategyPolicy {
    async fn decide(&self, request: &OracleRequest) -> Result<OracleMove, OracleError> {
        let snap = Snapshot::try_from(request)?;
        Ok(self.choose(&snap))
    }
}
