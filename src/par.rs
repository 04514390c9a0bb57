// src/par.rs
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Hardware parallelism, falling back to 1 when it cannot be queried.
pub fn available_threads() -> usize {
    thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

/// `0` means "use every core"; anything else is taken as is.
pub fn resolve_threads(requested: usize) -> usize {
    if requested == 0 { available_threads() } else { requested }
}

/// Fork-join fold over a slice with dynamic scheduling.
///
/// Up to `threads` scoped workers claim items one at a time from a shared
/// cursor, so uneven item costs do not strand work on one worker. Each
/// worker folds into a private accumulator made by `init(worker_index)`;
/// nothing is shared between workers until they have all joined. The
/// accumulators come back in worker-index order. Which items land in
/// which accumulator depends on scheduling.
///
/// With `threads <= 1` or a single item the fold runs on the calling thread.
pub fn fold_dynamic<I, A, Init, F>(items: &[I], threads: usize, init: Init, fold: F) -> Vec<A>
where
    I: Sync,
    A: Send,
    Init: Fn(usize) -> A + Sync,
    F: Fn(&mut A, &I, usize) + Sync,
{
    let n = items.len();
    let workers = threads.min(n).max(1);
    if workers == 1 {
        let mut acc = init(0);
        for (i, item) in items.iter().enumerate() { fold(&mut acc, item, i); }
        return vec![acc];
    }

    let next = AtomicUsize::new(0);

    // Scoped threads borrow `items`, `init` and `fold` without 'static
    thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|w| {
                let (next, init, fold) = (&next, &init, &fold);
                scope.spawn(move || {
                    let mut acc = init(w);
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        if i >= n { break; }
                        fold(&mut acc, &items[i], i);
                    }
                    acc
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

/// Parallel map over a slice, keeping output order deterministic.
pub fn parallel_map_indexed<I, T, F>(items: &[I], threads: usize, f: F) -> Vec<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I, usize) -> T + Sync,
{
    let parts = fold_dynamic(items, threads, |_| Vec::new(), |acc: &mut Vec<(usize, T)>, item, i| {
        acc.push((i, f(item, i)));
    });

    let mut tagged: Vec<(usize, T)> = parts.into_iter().flatten().collect();
    tagged.sort_unstable_by_key(|(i, _)| *i);
    tagged.into_iter().map(|(_, t)| t).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_visits_every_item_once() {
        let items: Vec<u64> = (0..1000).collect();
        for threads in [1, 2, 3, 8, 64] {
            let parts = fold_dynamic(&items, threads, |_| (0u64, 0usize), |acc, x, _| {
                acc.0 += *x;
                acc.1 += 1;
            });
            assert!(parts.len() <= threads.max(1));
            let sum: u64 = parts.iter().map(|p| p.0).sum();
            let count: usize = parts.iter().map(|p| p.1).sum();
            assert_eq!(sum, 999 * 1000 / 2);
            assert_eq!(count, 1000);
        }
    }

    #[test]
    fn fold_caps_workers_at_item_count() {
        let items = [1, 2, 3];
        let parts = fold_dynamic(&items, 16, |w| vec![w], |acc, _, _| acc.push(usize::MAX));
        assert_eq!(parts.len(), 3);
        // accumulators are returned in worker order
        for (w, p) in parts.iter().enumerate() { assert_eq!(p[0], w); }
    }

    #[test]
    fn fold_on_empty_input_yields_one_empty_accumulator() {
        let items: [u8; 0] = [];
        let parts = fold_dynamic(&items, 4, |_| 0usize, |acc, _, _| *acc += 1);
        assert_eq!(parts, vec![0]);
    }

    #[test]
    fn map_preserves_order() {
        let items: Vec<i32> = (0..257).collect();
        let out = parallel_map_indexed(&items, 5, |x, i| (*x as usize) * 2 + i);
        let expect: Vec<usize> = (0..257).map(|i| i * 3).collect();
        assert_eq!(out, expect);
    }

    #[test]
    fn zero_threads_resolves_to_hardware() {
        assert!(resolve_threads(0) >= 1);
        assert_eq!(resolve_threads(3), 3);
    }
}
