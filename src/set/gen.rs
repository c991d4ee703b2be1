/*!
Pure generators of hereditarily finite sets: bijections with the naturals, ordinals, tuples,
and rank-bounded enumerations.

These are constructors, not programs of the term language (component B) — see SPEC_FULL.md §4.A.
*/

use super::Set;
#[cfg(feature = "rand")]
use rand::Rng;

impl Set {
    /// The set corresponding to `n` under the bijection `generate(n).value() == n`: one element
    /// `generate(i)` for every bit `i` set in `n`.
    pub fn generate(n: u64) -> Set {
        let elements = (0..64)
            .filter(|i| n & (1 << i) != 0)
            .map(Set::generate)
            .collect::<Vec<_>>();
        Set::new(elements)
    }

    /// The von Neumann ordinal `n`: `{0, 1, ..., n-1}`
    pub fn generate_ordinal(n: usize) -> Set {
        let mut result = Set::empty();
        for _ in 0..n {
            let next = {
                let mut elements: Vec<Set> = result.elements().cloned().collect();
                elements.push(result.clone());
                Set::new(elements)
            };
            result = next;
        }
        result
    }

    /// `depth` nested singletons wrapped around the empty set; `generate_singleton(0)` is `{}`
    pub fn generate_singleton(depth: usize) -> Set {
        let mut result = Set::empty();
        for _ in 0..depth {
            result = Set::new(vec![result]);
        }
        result
    }

    /// The right-nested Kuratowski tuple of the given sets: `pair(x, y) = {{x}, {x, y}}`,
    /// collapsing to `{{x}}` when `x == y`; `n`-tuples recurse on the tail.
    pub fn generate_tuple(elements: &[Set]) -> Set {
        match elements {
            [] => panic!("generate_tuple requires at least one element"),
            [x] => x.clone(),
            [x, rest @ ..] => {
                if rest.len() == 1 && *x == rest[0] {
                    Set::new(vec![Set::new(vec![x.clone()])])
                } else {
                    let y = Set::generate_tuple(rest);
                    Set::new(vec![
                        Set::new(vec![x.clone()]),
                        Set::new(vec![x.clone(), y]),
                    ])
                }
            }
        }
    }

    /// The first `n` sets under `generate`, in order: `generate(0), ..., generate(n-1)`
    pub fn generate_all(n: u64) -> impl Iterator<Item = Set> {
        (0..n).map(Set::generate)
    }

    /// Every set of rank exactly `r`, in canonical order
    pub fn generate_rank(r: usize) -> impl Iterator<Item = Set> {
        let counts = rooted_identity_tree_counts(r);
        let start: u64 = counts[..counts.len() - 1].iter().sum();
        let end: u64 = counts.iter().sum();
        (start..end).map(Set::generate)
    }

    /// The single set whose elements are every set of rank `<= r`
    pub fn generate_complete(r: usize) -> Set {
        let n = number_of_trees_of_height_at_most(r);
        Set::new(Set::generate_all(n).collect::<Vec<_>>())
    }

    /// A uniformly sampled set of rank exactly `r`
    #[cfg(feature = "rand")]
    pub fn generate_random(r: usize) -> Set {
        let counts = rooted_identity_tree_counts(r);
        let start: u64 = counts[..counts.len() - 1].iter().sum();
        let end: u64 = counts.iter().sum();
        let value = rand::thread_rng().gen_range(start, end);
        Set::generate(value)
    }
}

/// `t_0, ..., t_n`: the number of rooted identity trees of each height `0..=n`, following the
/// recurrence `t_{i+1} = 2^T_i - T_i`, `T_i = sum(t_0..=t_i)` (sequence A038081).
fn rooted_identity_tree_counts(n: usize) -> Vec<u64> {
    let mut result = vec![1u64];
    let mut total = 1u64;
    for _ in 0..n {
        let next = (1u64 << total) - total;
        result.push(next);
        total += next;
    }
    result
}

/// The total number of sets of rank `<= n`
fn number_of_trees_of_height_at_most(n: usize) -> u64 {
    rooted_identity_tree_counts(n).iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_round_trips_through_value() {
        for n in 0..40u64 {
            assert_eq!(Set::generate(n).value(), n.into());
        }
    }

    #[test]
    fn generate_ordinal_matches_rank() {
        for n in 0..8 {
            let s = Set::generate_ordinal(n);
            assert_eq!(s.ordinal(), Some(n));
            assert_eq!(s.rank(), n);
        }
    }

    #[test]
    fn generate_singleton_nests() {
        assert_eq!(Set::generate_singleton(0), Set::empty());
        assert_eq!(
            Set::generate_singleton(2),
            Set::new(vec![Set::new(vec![Set::empty()])])
        );
    }

    #[test]
    fn generate_all_is_exact_and_distinct() {
        assert_eq!(Set::generate_all(0).count(), 0);
        let three: Vec<Set> = Set::generate_all(3).collect();
        assert_eq!(three.len(), 3);
        assert_eq!(three[0], Set::empty());
        assert_eq!(three[1], Set::generate_ordinal(1));
        assert_ne!(three[1], three[2]);
    }

    #[test]
    fn generate_rank_counts() {
        assert_eq!(Set::generate_rank(0).count(), 1);
        assert_eq!(Set::generate_rank(1).count(), 1);
        assert_eq!(Set::generate_rank(2).count(), 2);
        for s in Set::generate_rank(3) {
            assert_eq!(s.rank(), 3);
        }
    }

    #[test]
    #[cfg(feature = "rand")]
    fn generate_random_has_requested_rank() {
        for r in 0..4 {
            assert_eq!(Set::generate_random(r).rank(), r);
        }
    }
}
