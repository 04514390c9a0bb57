use crate::types::Point;

/// Squared Euclidean distance. Ordering matches true distance, so the
/// square root is never taken.
#[inline]
pub fn dist2(a: Point, b: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}
