use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// 2-D reference or query point.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point { pub x: f32, pub y: f32 }

impl Point {
    pub const fn new(x: f32, y: f32) -> Self { Self { x, y } }
    #[inline]
    pub fn is_finite(&self) -> bool { self.x.is_finite() && self.y.is_finite() }
}

impl From<[f32; 2]> for Point {
    fn from(p: [f32; 2]) -> Self { Self { x: p[0], y: p[1] } }
}
impl From<Point> for [f32; 2] {
    fn from(p: Point) -> Self { [p.x, p.y] }
}
impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self { Self { x, y } }
}

/// Anything usable as a class label. Ordering decides vote ties.
pub trait Label: Copy + Ord + Hash + Debug + Send + Sync {}
impl<T: Copy + Ord + Hash + Debug + Send + Sync> Label for T {}

/// Labeled cluster of reference points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group<L> {
    pub label: L,
    pub points: Vec<Point>,
}

impl<L> Group<L> {
    pub fn new(label: L, points: Vec<Point>) -> Self { Self { label, points } }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
}

/// Total number of reference points across `groups`.
pub fn total_points<L>(groups: &[Group<L>]) -> usize {
    groups.iter().map(Group::len).sum()
}

/// One (squared distance, label) pair seen during a scan.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate<L> { pub dist: f32, pub label: L }
