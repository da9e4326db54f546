//! Fisher-Yates shuffle
//!
//! Each permutation is equally likely given a uniform RNG.

use rand::Rng;

/// Shuffle `items` in place
///
/// Walks `i` from the last index down to 1, swapping element `i` with a
/// uniformly chosen element in `0..=i`.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn preserves_all_elements() {
        let mut items: Vec<u32> = (0..20).collect();
        fisher_yates(&mut items, &mut rand::thread_rng());

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn empty_and_single_are_untouched() {
        let mut empty: Vec<u32> = vec![];
        fisher_yates(&mut empty, &mut rand::thread_rng());
        assert!(empty.is_empty());

        let mut single = vec![7];
        fisher_yates(&mut single, &mut rand::thread_rng());
        assert_eq!(single, vec![7]);
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let mut a: Vec<u32> = (0..10).collect();
        let mut b = a.clone();
        fisher_yates(&mut a, &mut StdRng::seed_from_u64(42));
        fisher_yates(&mut b, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn all_permutations_of_three_reachable() {
        // 6 permutations, 6000 draws: each should land well inside [700, 1300]
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();

        for _ in 0..6000 {
            let mut items = vec![1u8, 2, 3];
            fisher_yates(&mut items, &mut rng);
            *counts.entry(items).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for (perm, count) in counts {
            assert!(
                (700..=1300).contains(&count),
                "permutation {:?} drawn {} times",
                perm,
                count
            );
        }
    }
}
