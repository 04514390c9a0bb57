//! knn_classify — exhaustive parallel k-NN classification of 2-D points.
//!
//! Modules:
//! - `types`: Point, Group, Candidate, the Label bound.
//! - `metric`: squared Euclidean distance.
//! - `topk`: bounded heap / sorted-array top-k selectors.
//! - `par`: scoped fork-join with dynamic scheduling.
//! - `vote`: majority vote, smallest label wins ties.
//! - `knn`: Classifier (parallel scan, post-join merge, vote).
//! - `record`: text/JSON input records and label output.
//! - `eval`: brute-force reference + agreement metrics.
//! - `synth`: seeded synthetic reference sets.

pub mod error;
pub mod types;
pub mod metric;
pub mod topk;
pub mod par;
pub mod vote;
pub mod knn;
pub mod record;
pub mod eval;
pub mod synth;

pub use error::{KnnError, ParseError};
pub use types::{Candidate, Group, Label, Point};
pub use metric::dist2;
pub use topk::{HeapTopK, Selector, SortedTopK, Strategy};
pub use knn::{classify, Classification, Classifier, KnnParams, Vote};
pub use record::{InputFormat, Problem};
