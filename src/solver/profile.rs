use super::{Edge, SolverError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Probability per edge, in the order the edges are offered.
pub type Policy = Vec<(Edge, f64)>;

/// Accumulated regret and strategy weight for one info set.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoNode {
    edges: Vec<Edge>,
    regret: Vec<f64>,
    weight: Vec<f64>,
}

impl InfoNode {
    pub fn new(edges: &[Edge]) -> Self {
        Self { edges: edges.to_vec(), regret: vec![0.0; edges.len()], weight: vec![0.0; edges.len()] }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Regret matching: positive regrets normalised, uniform when none is positive.
    pub fn current(&self) -> Vec<f64> {
        let positive: Vec<f64> = self.regret.iter().map(|r| r.max(0.0)).collect();
        normalise(positive, self.edges.len())
    }

    /// Add this iteration's strategy weighted by the actor's own reach.
    pub fn accumulate(&mut self, policy: &[f64], reach: f64) {
        for (w, p) in self.weight.iter_mut().zip(policy) {
            *w += reach * p;
        }
    }

    pub fn add_regret(&mut self, deltas: &[f64]) {
        for (r, d) in self.regret.iter_mut().zip(deltas) {
            *r += d;
        }
    }

    /// Average strategy over all iterations.
    pub fn average(&self) -> Policy {
        let probs = normalise(self.weight.clone(), self.edges.len());
        self.edges.iter().copied().zip(probs).collect()
    }
}

fn normalise(mut values: Vec<f64>, n: usize) -> Vec<f64> {
    let total: f64 = values.iter().sum();
    if total > 0.0 {
        values.iter_mut().for_each(|v| *v /= total);
        values
    } else {
        vec![1.0 / n.max(1) as f64; n]
    }
}

/// Average strategy per info-set key, stored as `{key: {move_code: probability}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyTable(BTreeMap<String, BTreeMap<u8, f64>>);

impl StrategyTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, key: String, policy: &[(Edge, f64)]) {
        let entry = policy.iter().map(|(edge, p)| (edge.code(), *p)).collect();
        self.0.insert(key, entry);
    }

    pub fn get(&self, key: &str) -> Option<&BTreeMap<u8, f64>> {
        self.0.get(key)
    }

    /// Draw an edge from the stored distribution. Unknown move codes and
    /// non-positive weights are ignored; `None` when nothing is left.
    pub fn sample<R: Rng + ?Sized>(&self, key: &str, rng: &mut R) -> Option<Edge> {
        let options: Vec<(Edge, f64)> = self
            .get(key)?
            .iter()
            .filter_map(|(code, p)| Edge::from_code(*code).map(|e| (e, *p)))
            .filter(|(_, p)| p.is_finite() && *p > 0.0)
            .collect();
        let total: f64 = options.iter().map(|(_, p)| p).sum();
        if options.is_empty() || total <= 0.0 {
            return None;
        }
        let mut roll = rng.random::<f64>() * total;
        for (edge, p) in &options {
            if roll < *p {
                return Some(*edge);
            }
            roll -= p;
        }
        options.last().map(|(edge, _)| *edge)
    }

    pub fn from_json(json: &str) -> Result<Self, SolverError> {
        serde_json::from_str(json).map_err(|e| SolverError::Json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, SolverError> {
        serde_json::to_string(self).map_err(|e| SolverError::Json(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SolverError> {
        let text = fs::read_to_string(path).map_err(|e| SolverError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), SolverError> {
        fs::write(path, self.to_json()?).map_err(|e| SolverError::Io(format!("{}: {e}", path.display())))
    }
}
