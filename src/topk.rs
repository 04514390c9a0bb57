//! Bounded top-k selectors keeping the k smallest distances offered.
//!
//! Both selectors keep the earliest-offered candidate on an exact distance
//! tie: a later equal candidate is rejected, and when a smaller candidate
//! evicts the worst entry, the latest-offered of several tied-worst entries
//! goes first. For the same offer sequence they return identical output.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::Candidate;

/// Which selector backs a classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Max-heap: O(1) reject, O(log k) accept. Default.
    #[default]
    Heap,
    /// Ascending array with shifting insert: O(k) per offer.
    Sorted,
}

pub trait Selector<L: Copy> {
    /// Empty selector holding at most `k` candidates.
    fn with_capacity(k: usize) -> Self where Self: Sized;

    /// Offer a candidate; returns whether it was kept. NaN is never kept.
    fn offer(&mut self, dist: f32, label: L) -> bool;

    fn len(&self) -> usize;
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }
    fn is_full(&self) -> bool { self.len() >= self.capacity() }

    /// Largest kept distance, i.e. the current acceptance bound once full.
    fn worst(&self) -> Option<f32>;

    /// Kept candidates by ascending distance, ties in offer order.
    fn into_sorted(self) -> Vec<Candidate<L>>;
}

#[derive(Clone, Copy, Debug)]
struct Slot<L> { dist: f32, seq: u64, label: L }

/// `a` ranks after `b`: larger distance, or same distance offered later.
#[inline]
fn ranks_after<L>(a: &Slot<L>, b: &Slot<L>) -> bool {
    a.dist > b.dist || (a.dist == b.dist && a.seq > b.seq)
}

/// Max-heap on `(dist, seq)`; the root is the next entry to evict.
#[derive(Clone, Debug)]
pub struct HeapTopK<L> {
    k: usize,
    next_seq: u64,
    heap: Vec<Slot<L>>,
}

impl<L: Copy> HeapTopK<L> {
    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !ranks_after(&self.heap[i], &self.heap[parent]) { break; }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let (left, right) = (2 * i + 1, 2 * i + 2);
            let mut largest = i;
            if left < n && ranks_after(&self.heap[left], &self.heap[largest]) { largest = left; }
            if right < n && ranks_after(&self.heap[right], &self.heap[largest]) { largest = right; }
            if largest == i { break; }
            self.heap.swap(i, largest);
            i = largest;
        }
    }
}

impl<L: Copy> Selector<L> for HeapTopK<L> {
    fn with_capacity(k: usize) -> Self {
        Self { k, next_seq: 0, heap: Vec::with_capacity(k) }
    }

    fn offer(&mut self, dist: f32, label: L) -> bool {
        if self.k == 0 || dist.is_nan() { return false; }
        let slot = Slot { dist, seq: self.next_seq, label };
        self.next_seq += 1;

        if self.heap.len() < self.k {
            self.heap.push(slot);
            let last = self.heap.len() - 1;
            self.sift_up(last);
            return true;
        }
        // equal to the current worst is rejected: first offered wins
        if !(dist < self.heap[0].dist) { return false; }
        self.heap[0] = slot;
        self.sift_down(0);
        true
    }

    fn len(&self) -> usize { self.heap.len() }
    fn capacity(&self) -> usize { self.k }
    fn worst(&self) -> Option<f32> { self.heap.first().map(|s| s.dist) }

    fn into_sorted(mut self) -> Vec<Candidate<L>> {
        self.heap.sort_by(|a, b| a.dist.total_cmp(&b.dist).then(a.seq.cmp(&b.seq)));
        self.heap.into_iter().map(|s| Candidate { dist: s.dist, label: s.label }).collect()
    }
}

/// Ascending array; new entries go after any equal distances.
#[derive(Clone, Debug)]
pub struct SortedTopK<L> {
    k: usize,
    items: Vec<Candidate<L>>,
}

impl<L: Copy> Selector<L> for SortedTopK<L> {
    fn with_capacity(k: usize) -> Self {
        Self { k, items: Vec::with_capacity(k) }
    }

    fn offer(&mut self, dist: f32, label: L) -> bool {
        if self.k == 0 || dist.is_nan() { return false; }
        let pos = match self.items.iter().position(|c| c.dist > dist) {
            Some(p) => p,
            None if self.items.len() < self.k => self.items.len(),
            None => return false,
        };
        if self.items.len() == self.k { self.items.pop(); }
        self.items.insert(pos, Candidate { dist, label });
        true
    }

    fn len(&self) -> usize { self.items.len() }
    fn capacity(&self) -> usize { self.k }
    fn worst(&self) -> Option<f32> { self.items.last().map(|c| c.dist) }
    fn into_sorted(self) -> Vec<Candidate<L>> { self.items }
}

/// Order used when comparing finished candidate lists.
pub fn cmp_dist<L>(a: &Candidate<L>, b: &Candidate<L>) -> Ordering {
    a.dist.total_cmp(&b.dist)
}
