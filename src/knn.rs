//! Exhaustive k-nearest-neighbor classifier over labeled 2-D groups.
//!
//! Groups are scanned in parallel, each worker filling a private top-k
//! selector. After every worker has joined, the survivors are reduced on
//! the calling thread into one global selector, whose labels are then put
//! to a majority vote.
//!
//! The kept set is independent of worker count except when candidates from
//! different workers tie exactly at the k-th distance; which of those is
//! kept then depends on how groups were scheduled. The vote tie-break is
//! always the smallest label.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace};

use crate::error::KnnError;
use crate::metric::dist2;
use crate::par;
use crate::topk::{HeapTopK, Selector, SortedTopK, Strategy};
use crate::types::{total_points, Candidate, Group, Label, Point};
use crate::vote;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnnParams {
    pub k: usize,
    /// Worker threads; 0 uses every available core.
    pub threads: usize,
    pub strategy: Strategy,
}

impl KnnParams {
    pub fn new(k: usize) -> Self { Self { k, threads: 0, strategy: Strategy::default() } }
    pub fn with_threads(mut self, threads: usize) -> Self { self.threads = threads; self }
    pub fn with_strategy(mut self, strategy: Strategy) -> Self { self.strategy = strategy; self }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Vote<L> { pub label: L, pub count: usize }

/// Full outcome of one classification.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification<L> {
    pub label: L,
    /// k as requested.
    pub k: usize,
    /// k after capping to the number of reference points.
    pub effective_k: usize,
    /// Kept neighbors, nearest first.
    pub neighbors: Vec<Candidate<L>>,
    /// Vote tally, ascending by label.
    pub votes: Vec<Vote<L>>,
}

#[derive(Clone, Debug)]
pub struct Classifier { params: KnnParams }

impl Classifier {
    pub fn new(params: KnnParams) -> Result<Self, KnnError> {
        if params.k == 0 { return Err(KnnError::InvalidK(params.k)); }
        Ok(Self { params })
    }

    pub fn params(&self) -> &KnnParams { &self.params }

    /// The `min(k, total points)` nearest reference points, nearest first.
    pub fn neighbors<L: Label>(&self, groups: &[Group<L>], query: Point) -> Result<Vec<Candidate<L>>, KnnError> {
        if !query.is_finite() {
            return Err(KnnError::NonFiniteQuery { x: query.x, y: query.y });
        }
        let total = total_points(groups);
        if total == 0 { return Err(KnnError::EmptyReference); }

        let k = self.params.k.min(total);
        if k < self.params.k {
            debug!(requested = self.params.k, available = total, "capping k to reference point count");
        }
        let threads = par::resolve_threads(self.params.threads);
        let _span = debug_span!("knn", k, groups = groups.len(), points = total, threads).entered();

        let kept = match self.params.strategy {
            Strategy::Heap => search::<L, HeapTopK<L>>(groups, query, k, threads),
            Strategy::Sorted => search::<L, SortedTopK<L>>(groups, query, k, threads),
        };
        if kept.is_empty() { return Err(KnnError::NoCandidates); }
        Ok(kept)
    }

    pub fn classify_report<L: Label>(&self, groups: &[Group<L>], query: Point) -> Result<Classification<L>, KnnError> {
        let neighbors = self.neighbors(groups, query)?;
        let counts = vote::tally(neighbors.iter().map(|c| c.label));
        let label = vote::winner(&counts).ok_or(KnnError::NoCandidates)?;
        debug!(?label, distinct = counts.len(), "vote resolved");
        Ok(Classification {
            label,
            k: self.params.k,
            effective_k: neighbors.len(),
            votes: counts.into_iter().map(|(label, count)| Vote { label, count }).collect(),
            neighbors,
        })
    }

    /// Majority label among the nearest reference points.
    pub fn classify<L: Label>(&self, groups: &[Group<L>], query: Point) -> Result<L, KnnError> {
        let neighbors = self.neighbors(groups, query)?;
        vote::majority(neighbors.iter().map(|c| c.label)).ok_or(KnnError::NoCandidates)
    }

    /// Classify many queries, parallel across queries; each scan is serial.
    pub fn classify_batch<L: Label>(&self, groups: &[Group<L>], queries: &[Point]) -> Vec<Result<L, KnnError>> {
        let inner = Classifier { params: self.params.with_threads(1) };
        par::parallel_map_indexed(queries, par::resolve_threads(self.params.threads), |q, _| {
            inner.classify(groups, *q)
        })
    }
}

/// Classify with default parameters (heap selector, all cores).
pub fn classify<L: Label>(groups: &[Group<L>], k: usize, query: Point) -> Result<L, KnnError> {
    Classifier::new(KnnParams::new(k))?.classify(groups, query)
}

fn search<L, S>(groups: &[Group<L>], query: Point, k: usize, threads: usize) -> Vec<Candidate<L>>
where
    L: Label,
    S: Selector<L> + Send,
{
    let locals = par::fold_dynamic(
        groups,
        threads,
        |_| S::with_capacity(k),
        |sel, group, _| {
            for &p in &group.points { sel.offer(dist2(query, p), group.label); }
        },
    );
    debug!(workers = locals.len(), "scan joined");

    // single-threaded reduction; nothing else holds a selector now
    let mut global = S::with_capacity(k);
    for (w, local) in locals.into_iter().enumerate() {
        let survivors = local.into_sorted();
        trace!(worker = w, survivors = survivors.len(), "merging");
        for c in survivors { global.offer(c.dist, c.label); }
    }
    global.into_sorted()
}
