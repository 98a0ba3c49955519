//! Permutation crossover and mutation.
//!
//! Both operators work on the slot vector of a [`Permutation`] (item →
//! slot) and always return a valid permutation.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::seq::index;
use rand::Rng;

use crate::ordering::Permutation;

/// Order-preserving crossover.
///
/// Picks two distinct cut points `start < end` uniformly. Items
/// `start..end` keep parent 1's slots verbatim; the remaining items, left
/// to right, take parent 2's slots that are still free, in parent 2's
/// order.
///
/// # Panics
/// Panics if the parents differ in length or have fewer than 2 items.
pub fn order_crossover<R: Rng>(parent1: &Permutation, parent2: &Permutation, rng: &mut R) -> Permutation {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n >= 2, "crossover needs at least 2 items");

    let (start, end) = random_cuts(n, rng);
    order_crossover_between(parent1, parent2, start, end)
}

/// [`order_crossover`] with fixed cut points `start..end`.
pub fn order_crossover_between(
    parent1: &Permutation,
    parent2: &Permutation,
    start: usize,
    end: usize,
) -> Permutation {
    let n = parent1.len();
    assert!(start < end && end <= n, "cut points must satisfy start < end <= n");

    let p1 = parent1.slots();
    let p2 = parent2.slots();
    let mut child = vec![usize::MAX; n];
    let mut used = vec![false; n];

    // Step 1: keep parent 1's segment
    for i in start..end {
        child[i] = p1[i];
        used[p1[i]] = true;
    }

    // Step 2: fill the rest from parent 2's order
    let mut fill = p2.iter().copied().filter(|&slot| !used[slot]);
    for i in (0..start).chain(end..n) {
        // Exactly n - (end - start) slots are unused.
        if let Some(slot) = fill.next() {
            child[i] = slot;
        }
    }

    Permutation::from_slots_unchecked(child)
}

/// Swap mutation: two distinct items exchange slots.
///
/// Returns the swapped item pair.
pub fn swap_mutation<R: Rng>(perm: &mut Permutation, rng: &mut R) -> Option<(usize, usize)> {
    let n = perm.len();
    if n < 2 {
        return None;
    }
    let picked = index::sample(rng, n, 2);
    let (a, b) = (picked.index(0), picked.index(1));
    perm.swap_items(a, b);
    Some((a, b))
}

/// Applies [`swap_mutation`] with probability `rate`.
///
/// Returns the swapped pair when the mutation fired, `None` otherwise.
pub fn mutate<R: Rng>(perm: &mut Permutation, rate: f64, rng: &mut R) -> Option<(usize, usize)> {
    if rng.random_range(0.0..1.0) < rate {
        swap_mutation(perm, rng)
    } else {
        None
    }
}

/// Two distinct cut points `start < end` in `0..n`.
fn random_cuts<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let picked = index::sample(rng, n, 2);
    let (a, b) = (picked.index(0), picked.index(1));
    (a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn perm(slots: &[usize]) -> Permutation {
        Permutation::new(slots.to_vec()).unwrap()
    }

    #[test]
    fn test_crossover_fixed_cuts() {
        let p1 = perm(&[0, 1, 2, 3, 4, 5]);
        let p2 = perm(&[5, 4, 3, 2, 1, 0]);
        let child = order_crossover_between(&p1, &p2, 2, 4);
        // items 2,3 keep slots 2,3; items 0,1,4,5 take 5,4,1,0 from p2
        assert_eq!(child.slots(), &[5, 4, 2, 3, 1, 0]);
    }

    #[test]
    fn test_crossover_full_segment_copies_parent1() {
        let p1 = perm(&[2, 0, 1, 3]);
        let p2 = perm(&[3, 2, 1, 0]);
        let child = order_crossover_between(&p1, &p2, 0, 4);
        assert_eq!(child, p1);
    }

    #[test]
    fn test_crossover_identical_parents() {
        let mut rng = create_rng(42);
        let p = perm(&[3, 1, 0, 2, 4]);
        for _ in 0..20 {
            assert_eq!(order_crossover(&p, &p, &mut rng), p);
        }
    }

    #[test]
    fn test_crossover_two_items() {
        let mut rng = create_rng(42);
        let p1 = perm(&[0, 1]);
        let p2 = perm(&[1, 0]);
        for _ in 0..20 {
            // Only cut pair is (0, 1): item 0 keeps slot 0, item 1 gets slot 1.
            assert_eq!(order_crossover(&p1, &p2, &mut rng), p1);
        }
    }

    #[test]
    fn test_cuts_are_distinct_and_ordered() {
        let mut rng = create_rng(9);
        for _ in 0..1000 {
            let (start, end) = random_cuts(10, &mut rng);
            assert!(start < end);
            assert!(end < 10);
        }
    }

    #[test]
    fn test_swap_changes_exactly_two() {
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let original = Permutation::identity(10);
            let mut p = original.clone();
            let (a, b) = swap_mutation(&mut p, &mut rng).unwrap();
            assert_ne!(a, b);
            let changed: Vec<usize> = (0..10).filter(|&i| p.slot_of(i) != original.slot_of(i)).collect();
            assert_eq!(changed.len(), 2);
            assert_eq!(p.slot_of(a), original.slot_of(b));
            assert_eq!(p.slot_of(b), original.slot_of(a));
        }
    }

    #[test]
    fn test_mutate_rate_zero_is_noop() {
        let mut rng = create_rng(1);
        let original = Permutation::identity(6);
        for _ in 0..100 {
            let mut p = original.clone();
            assert!(mutate(&mut p, 0.0, &mut rng).is_none());
            assert_eq!(p, original);
        }
    }

    #[test]
    fn test_mutate_rate_one_always_fires() {
        let mut rng = create_rng(1);
        for _ in 0..100 {
            let mut p = Permutation::identity(6);
            assert!(mutate(&mut p, 1.0, &mut rng).is_some());
            assert_ne!(p, Permutation::identity(6));
        }
    }

    proptest! {
        #[test]
        fn prop_crossover_is_permutation(n in 2usize..30, seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let p1 = Permutation::random(n, &mut rng);
            let p2 = Permutation::random(n, &mut rng);
            let child = order_crossover(&p1, &p2, &mut rng);
            prop_assert!(Permutation::new(child.slots().to_vec()).is_ok());
        }

        #[test]
        fn prop_crossover_keeps_segment(n in 2usize..30, seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let p1 = Permutation::random(n, &mut rng);
            let p2 = Permutation::random(n, &mut rng);
            let (start, end) = random_cuts(n, &mut rng);
            let child = order_crossover_between(&p1, &p2, start, end);
            for i in start..end {
                prop_assert_eq!(child.slot_of(i), p1.slot_of(i));
            }
            // Outside the segment, slots appear in parent 2's relative order.
            let outside: Vec<usize> = (0..start).chain(end..n).map(|i| child.slot_of(i)).collect();
            let expected: Vec<usize> = p2
                .slots()
                .iter()
                .copied()
                .filter(|s| !(start..end).any(|i| p1.slot_of(i) == *s))
                .collect();
            prop_assert_eq!(outside, expected);
        }

        #[test]
        fn prop_mutation_touches_zero_or_two(n in 2usize..30, rate in 0.0f64..=1.0, seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let original = Permutation::random(n, &mut rng);
            let mut p = original.clone();
            let fired = mutate(&mut p, rate, &mut rng);
            let changed = (0..n).filter(|&i| p.slot_of(i) != original.slot_of(i)).count();
            prop_assert_eq!(changed, if fired.is_some() { 2 } else { 0 });
        }
    }
}
