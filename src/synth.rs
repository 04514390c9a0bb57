//! Seeded synthetic reference sets for tests and sweeps.

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::types::{Group, Point};

#[derive(Clone, Copy, Debug)]
pub struct BlobParams {
    pub groups: usize,
    /// Points per group are drawn uniformly from `min_points..=max_points`.
    pub min_points: usize,
    pub max_points: usize,
    /// Half-width of the square each blob is scattered over.
    pub spread: f32,
    pub seed: u64,
}

/// Label for the `i`-th synthetic group: `A`, `B`, ... continuing up the
/// Unicode range past `Z`.
pub fn group_label(i: usize) -> char {
    char::from_u32('A' as u32 + i as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Square blobs with centers in `[-15, 15)^2`. Group sizes vary so the
/// scan sees uneven work per group.
pub fn blobs(p: &BlobParams) -> Vec<Group<char>> {
    assert!(p.min_points <= p.max_points);
    let mut rng = StdRng::seed_from_u64(p.seed);
    (0..p.groups)
        .map(|i| {
            let cx = rng.gen::<f32>() * 30.0 - 15.0;
            let cy = rng.gen::<f32>() * 30.0 - 15.0;
            let n = rng.gen_range(p.min_points..=p.max_points);
            let points = (0..n)
                .map(|_| Point::new(
                    cx + (rng.gen::<f32>() - 0.5) * 2.0 * p.spread,
                    cy + (rng.gen::<f32>() - 0.5) * 2.0 * p.spread,
                ))
                .collect();
            Group::new(group_label(i), points)
        })
        .collect()
}

/// Uniform queries over the same square the blob centers come from.
pub fn queries(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| Point::new(rng.gen::<f32>() * 30.0 - 15.0, rng.gen::<f32>() * 30.0 - 15.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_and_sized() {
        let p = BlobParams { groups: 5, min_points: 3, max_points: 9, spread: 1.0, seed: 4 };
        let a = blobs(&p);
        assert_eq!(a, blobs(&p));
        assert_eq!(a.len(), 5);
        for (i, g) in a.iter().enumerate() {
            assert_eq!(g.label, group_label(i));
            assert!((3..=9).contains(&g.points.len()));
        }
        assert_eq!(queries(10, 1), queries(10, 1));
    }
}
