//! Uniform random ordering of the pool without replacement.

use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a uniformly random permutation of `items` drawn from a fresh
/// thread-local source. O(n) time and space.
pub fn permute<T: Clone>(items: &[T]) -> Vec<T> {
    permute_with(items, &mut rand::rng())
}

/// Fisher-Yates over a copy of `items` using the supplied generator.
pub fn permute_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut order = items.to_vec();
    order.shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_trivial_pools() {
        let empty: Vec<u32> = Vec::new();
        assert!(permute(&empty).is_empty());
        assert_eq!(permute(&["only"]), vec!["only"]);
    }

    #[test]
    fn test_permutation_keeps_every_element_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool: Vec<u32> = (0..500).collect();

        for _ in 0..20 {
            let order = permute_with(&pool, &mut rng);
            assert_eq!(order.len(), pool.len());
            let unique: HashSet<_> = order.iter().collect();
            assert_eq!(unique.len(), pool.len());
        }
    }

    #[test]
    fn test_first_element_is_uniform() {
        const TRIALS: usize = 30_000;
        let pool = ['A', 'B', 'C', 'D', 'E'];
        let mut counts = [0usize; 5];

        for _ in 0..TRIALS {
            let first = permute(&pool)[0];
            counts[pool.iter().position(|&c| c == first).unwrap()] += 1;
        }

        let expected = TRIALS / pool.len();
        // roughly eight standard deviations either side
        let tolerance = expected / 10;
        for (letter, count) in pool.iter().zip(counts) {
            assert!(
                count.abs_diff(expected) < tolerance,
                "{} came first {} times, expected about {}",
                letter,
                count,
                expected
            );
        }
    }
}
