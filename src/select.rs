//! Top-N selection over `(team, score)` pairs.
//!
//! Three interchangeable algorithms, picked by [`Strategy::choose`] from the
//! requested count `n` and the population size `m`:
//!
//! | Strategy          | When                  | Cost              |
//! |-------------------|-----------------------|-------------------|
//! | [`linear_max`]    | `n == 1`              | O(m)              |
//! | [`sorted_top`]    | `2n >= m`             | O(m log m)        |
//! | [`heap_top`]      | otherwise             | O(m + n log m)    |
//!
//! All three return at most `n` ids in descending score order. Tie order is only
//! guaranteed by `linear_max`, which keeps the first maximum it sees.

use std::collections::BinaryHeap;

use crate::logging::debug;
use crate::types::TeamId;

/// Algorithm used to pick the top-N teams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Linear,
    Sort,
    Heap,
}

impl Strategy {
    /// Pick the cheapest strategy for `n` results out of `m` candidates.
    pub fn choose(n: usize, m: usize) -> Self {
        if n == 1 {
            Strategy::Linear
        } else if n.saturating_mul(2) >= m {
            Strategy::Sort
        } else {
            Strategy::Heap
        }
    }

    /// Run this strategy. A linear scan only finds one team, so `Linear` with any
    /// other `n` falls back to a full sort.
    pub fn select(self, scores: &[(TeamId, i64)], n: usize) -> Vec<TeamId> {
        match self {
            Strategy::Linear if n == 0 => Vec::new(),
            Strategy::Linear if n == 1 => linear_max(scores).into_iter().collect(),
            Strategy::Linear => sorted_top(scores, n),
            Strategy::Sort => sorted_top(scores, n),
            Strategy::Heap => heap_top(scores, n),
        }
    }
}

/// Select the `n` highest scoring ids, dispatching on input shape.
pub fn select_top(scores: &[(TeamId, i64)], n: usize) -> Vec<TeamId> {
    let strategy = Strategy::choose(n, scores.len());
    debug!(?strategy, n, m = scores.len(), "selecting top teams");
    strategy.select(scores, n)
}

/// Single pass for the maximum. Ties keep the earliest entry.
pub fn linear_max(scores: &[(TeamId, i64)]) -> Option<TeamId> {
    let mut best: Option<(TeamId, i64)> = None;
    let mut max_score = i64::MIN;
    for &(id, score) in scores {
        if best.is_none() || score > max_score {
            max_score = score;
            best = Some((id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Full descending sort, truncated to `n`.
pub fn sorted_top(scores: &[(TeamId, i64)], n: usize) -> Vec<TeamId> {
    let mut ranked = scores.to_vec();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(n).map(|(id, _)| id).collect()
}

/// Heapify every candidate, then pop the `n` largest.
pub fn heap_top(scores: &[(TeamId, i64)], n: usize) -> Vec<TeamId> {
    let mut heap: BinaryHeap<(i64, TeamId)> =
        scores.iter().map(|&(id, score)| (score, id)).collect();
    let mut top = Vec::with_capacity(n.min(heap.len()));
    while top.len() < n {
        match heap.pop() {
            Some((_, id)) => top.push(id),
            None => break,
        }
    }
    top
}
