use crate::metric::dist2;
use crate::topk::cmp_dist;
use crate::types::{Candidate, Group, Label, Point};
use crate::vote;

/// Exact neighbors by full sort: every candidate in group/point order,
/// stable-sorted by distance, first `k` kept. This is what a single-worker
/// scan must produce.
pub fn reference_neighbors<L: Label>(groups: &[Group<L>], query: Point, k: usize) -> Vec<Candidate<L>> {
    let mut all: Vec<Candidate<L>> = groups
        .iter()
        .flat_map(|g| g.points.iter().map(move |&p| Candidate { dist: dist2(query, p), label: g.label }))
        .filter(|c| !c.dist.is_nan())
        .collect();
    all.sort_by(cmp_dist);
    all.truncate(k.min(all.len()));
    all
}

/// Majority label of `reference_neighbors`.
pub fn reference_classify<L: Label>(groups: &[Group<L>], query: Point, k: usize) -> Option<L> {
    vote::majority(reference_neighbors(groups, query, k).into_iter().map(|c| c.label))
}

/// Fraction of positions where the two label lists agree.
pub fn agreement_rate<L: PartialEq>(truth: &[L], got: &[L]) -> f32 {
    let n = truth.len().min(got.len());
    if n == 0 { return 1.0; }
    let same = truth.iter().zip(got).filter(|(a, b)| a == b).count();
    (same as f32) / (n as f32)
}

/// Wilson score lower bound for a Bernoulli proportion.
pub fn wilson_lower_bound(successes: usize, trials: usize, z: f64) -> f64 {
    assert!(trials > 0);
    let n = trials as f64;
    let phat = (successes as f64) / n;
    let z2 = z * z;
    let center = phat + z2 / (2.0 * n);
    let margin = z * ((phat * (1.0 - phat) + z2 / (4.0 * n)) / n).sqrt();
    (center - margin) / (1.0 + z2 / n)
}
