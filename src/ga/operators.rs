//! Permutation operators: order crossover, swap and inversion mutation.
//!
//! All operators map permutations to permutations of the same index set.

use rand::Rng;

/// Picks two cut points `a <= b` in `0..n`.
fn cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Builds one OX child: `donor[a..=b]` kept in place, remaining slots filled
/// with `filler` in its order, starting after `b` and wrapping around.
fn ox_child(donor: &[usize], filler: &[usize], a: usize, b: usize) -> Vec<usize> {
    let n = donor.len();
    let mut child = vec![usize::MAX; n];
    let mut taken = vec![false; n];
    for i in a..=b {
        child[i] = donor[i];
        taken[donor[i]] = true;
    }

    let mut pos = (b + 1) % n;
    for k in 0..n {
        let gene = filler[(b + 1 + k) % n];
        if taken[gene] {
            continue;
        }
        while child[pos] != usize::MAX {
            pos = (pos + 1) % n;
        }
        child[pos] = gene;
        taken[gene] = true;
    }
    child
}

/// Order crossover (OX) on permutations of `0..n`.
///
/// Each child inherits a contiguous segment from one parent and the relative
/// order of the remaining genes from the other.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use tour_ga::ga::operators::order_crossover;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let (c1, c2) = order_crossover(&[0, 1, 2, 3, 4], &[4, 3, 2, 1, 0], &mut rng);
/// let mut s1 = c1.clone();
/// s1.sort_unstable();
/// assert_eq!(s1, vec![0, 1, 2, 3, 4]);
/// assert_eq!(c2.len(), 5);
/// ```
pub fn order_crossover<R: Rng>(p1: &[usize], p2: &[usize], rng: &mut R) -> (Vec<usize>, Vec<usize>) {
    debug_assert_eq!(p1.len(), p2.len());
    let n = p1.len();
    if n < 2 {
        return (p1.to_vec(), p2.to_vec());
    }
    let (a, b) = cut_points(n, rng);
    (ox_child(p1, p2, a, b), ox_child(p2, p1, a, b))
}

/// Swaps two distinct random positions.
pub fn swap_mutation<R: Rng>(order: &mut [usize], rng: &mut R) {
    let n = order.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    order.swap(i, j);
}

/// Reverses a random segment of at least two genes.
pub fn invert_mutation<R: Rng>(order: &mut [usize], rng: &mut R) {
    let n = order.len();
    if n < 2 {
        return;
    }
    let (mut a, mut b) = cut_points(n, rng);
    if a == b {
        if b + 1 < n {
            b += 1;
        } else {
            a -= 1;
        }
    }
    order[a..=b].reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_ox_child_known_cut() {
        // Classic example: segment [3..=5] from p1, rest from p2 after b.
        let p1 = [0, 1, 2, 3, 4, 5, 6, 7];
        let p2 = [7, 6, 5, 4, 3, 2, 1, 0];
        let child = ox_child(&p1, &p2, 3, 5);
        assert_eq!(&child[3..=5], &[3, 4, 5]);
        // after position 5 the filler order is 1, 0, 7, 6, 2 (skipping 5, 4, 3)
        assert_eq!(child, vec![7, 6, 2, 3, 4, 5, 1, 0]);
    }

    #[test]
    fn test_ox_identical_parents() {
        let mut rng = StdRng::seed_from_u64(1);
        let p = [3, 1, 0, 2];
        let (c1, c2) = order_crossover(&p, &p, &mut rng);
        assert_eq!(c1, p);
        assert_eq!(c2, p);
    }

    #[test]
    fn test_operators_tiny_inputs() {
        let mut rng = StdRng::seed_from_u64(3);
        let (c1, c2) = order_crossover(&[0], &[0], &mut rng);
        assert_eq!((c1, c2), (vec![0], vec![0]));
        let mut one = [0];
        swap_mutation(&mut one, &mut rng);
        invert_mutation(&mut one, &mut rng);
        assert_eq!(one, [0]);
        let mut empty: [usize; 0] = [];
        swap_mutation(&mut empty, &mut rng);
        invert_mutation(&mut empty, &mut rng);
    }

    #[test]
    fn test_swap_always_changes_order() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let mut v = [0, 1];
            swap_mutation(&mut v, &mut rng);
            assert_eq!(v, [1, 0]);
        }
    }

    #[test]
    fn test_invert_always_changes_order() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let mut v = [0, 1, 2];
            invert_mutation(&mut v, &mut rng);
            assert_ne!(v, [0, 1, 2]);
        }
    }

    proptest! {
        #[test]
        fn prop_operators_preserve_permutation(n in 1usize..40, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut p1: Vec<usize> = (0..n).collect();
            let mut p2 = p1.clone();
            p1.shuffle(&mut rng);
            p2.shuffle(&mut rng);
            let identity: Vec<usize> = (0..n).collect();

            let (c1, c2) = order_crossover(&p1, &p2, &mut rng);
            prop_assert_eq!(sorted(c1), identity.clone());
            prop_assert_eq!(sorted(c2), identity.clone());

            swap_mutation(&mut p1, &mut rng);
            prop_assert_eq!(sorted(p1), identity.clone());
            invert_mutation(&mut p2, &mut rng);
            prop_assert_eq!(sorted(p2), identity);
        }
    }
}
