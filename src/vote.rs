use std::collections::BTreeMap;

use crate::types::Label;

/// Count of each distinct label, ascending by label.
pub fn tally<L: Label, It: IntoIterator<Item = L>>(labels: It) -> BTreeMap<L, usize> {
    let mut counts = BTreeMap::new();
    for l in labels { *counts.entry(l).or_insert(0usize) += 1; }
    counts
}

/// Winner of a tally: highest count, smallest label among equal counts.
pub fn winner<L: Label>(counts: &BTreeMap<L, usize>) -> Option<L> {
    let mut best: Option<(L, usize)> = None;
    // ascending iteration + strict `>` keeps the smallest tied label
    for (&label, &count) in counts {
        if best.map_or(true, |(_, c)| count > c) { best = Some((label, count)); }
    }
    best.map(|(l, _)| l)
}

/// Majority label among `labels`; `None` when empty.
pub fn majority<L: Label, It: IntoIterator<Item = L>>(labels: It) -> Option<L> {
    winner(&tally(labels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_majority() {
        assert_eq!(majority(['A', 'B', 'A']), Some('A'));
        assert_eq!(majority(['C', 'B', 'B', 'C', 'B']), Some('B'));
    }

    #[test]
    fn ties_go_to_smallest_label() {
        assert_eq!(majority(['B', 'A']), Some('A'));
        assert_eq!(majority(['z', 'y', 'z', 'y', 'x']), Some('y'));
        assert_eq!(majority([300u32, 7, 300, 7]), Some(7));
    }

    #[test]
    fn labels_outside_byte_range() {
        // no fixed code table: wide labels count like any other
        assert_eq!(majority(['λ', 'λ', 'a']), Some('λ'));
        assert_eq!(majority([1_000_000u64, 5, 1_000_000]), Some(1_000_000));
    }

    #[test]
    fn empty_has_no_winner() {
        assert_eq!(majority(Vec::<char>::new()), None);
    }

    #[test]
    fn tally_counts() {
        let t = tally(['b', 'a', 'b']);
        assert_eq!(t.into_iter().collect::<Vec<_>>(), vec![('a', 1), ('b', 2)]);
    }
}
