/*!
Hereditarily finite pure sets, hash-consed so that structural equality reduces to pointer equality
*/

use crate::debug_from_display;
use crate::util::cache::Cache;
use elysees::Arc;
use lazy_static::lazy_static;
use num::{BigUint, ToPrimitive};
use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

pub mod gen;
pub mod parse;
pub mod print;

pub use parse::SetParseError;

lazy_static! {
    /// The process-wide set intern table
    static ref SET_CACHE: Cache<SetData> = Cache::new();
}

/// Remove every interned set. Any [`Set`] handles already held remain valid; this only affects
/// whether future constructions share storage with them.
pub fn clear_cache() {
    SET_CACHE.clear();
}

/// A hereditarily finite pure set: a finite, unordered, duplicate-free collection of sets
///
/// `Set` is a cheap-to-clone handle onto a process-wide interned representative: two sets built
/// from the same elements, however they were constructed, are always the same `Set` (same
/// backing pointer). Equality and hashing are therefore pointer operations.
#[derive(Clone)]
pub struct Set(Arc<SetData>);

pub(crate) struct SetData {
    elements: Box<[Set]>,
    memo: Memo,
}

#[derive(Default)]
struct Memo {
    cardinal: OnceCell<usize>,
    rank: OnceCell<usize>,
    size: OnceCell<usize>,
    ordinal: OnceCell<Option<usize>>,
    value: OnceCell<BigUint>,
    is_singleton: OnceCell<bool>,
    is_transitive: OnceCell<bool>,
    is_tuple: OnceCell<bool>,
}

impl PartialEq for SetData {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}
impl Eq for SetData {}

impl Hash for SetData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.elements.hash(state);
    }
}

// `Set` is always obtained through interning, so pointer identity and structural identity
// coincide (invariant: "interning enables O(1) structural equality", see SPEC_FULL.md §3/§9).
impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for Set {}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Arc::as_ptr(&self.0) as usize).hash(state);
    }
}

debug_from_display!(Set);

impl Set {
    /// The canonical key used to intern a set: elements deduplicated and ordered by address.
    /// Elements are always already-interned `Set`s, so pointer order is a legitimate
    /// deterministic order to sort and dedup by (it has no bearing on the *canonical* order of
    /// §3, which is computed separately from rank and structure).
    fn canonical_elements(mut elements: Vec<Set>) -> Box<[Set]> {
        elements.sort_by_key(|s| Arc::as_ptr(&s.0) as usize);
        elements.dedup();
        elements.into_boxed_slice()
    }

    /// Construct (or retrieve) the unique interned set with the given elements. Duplicate
    /// elements are collapsed; `Set::new(std::iter::empty())` is the empty set.
    pub fn new<I: IntoIterator<Item = Set>>(elements: I) -> Set {
        let elements = Self::canonical_elements(elements.into_iter().collect());
        let candidate = Arc::new(SetData {
            elements,
            memo: Memo::default(),
        });
        Set(SET_CACHE.intern(candidate))
    }

    /// The empty set
    pub fn empty() -> Set {
        Set::new(std::iter::empty())
    }

    /// This set's elements, in no particular guaranteed order
    pub fn elements(&self) -> impl Iterator<Item = &Set> {
        self.0.elements.iter()
    }

    /// The number of (distinct) elements
    pub fn cardinal(&self) -> usize {
        *self.0.memo.cardinal.get_or_init(|| self.0.elements.len())
    }

    /// `0` for the empty set, else `1 + max(rank of elements)`
    pub fn rank(&self) -> usize {
        *self.0.memo.rank.get_or_init(|| {
            self.0
                .elements
                .iter()
                .map(|e| e.rank())
                .max()
                .map_or(0, |r| r + 1)
        })
    }

    /// `1 + sum(size of elements)`: the number of set-constructor nodes in this set's tree form
    pub fn size(&self) -> usize {
        *self.0.memo.size.get_or_init(|| {
            1 + self
                .0
                .elements
                .iter()
                .map(|e| e.size())
                .sum::<usize>()
        })
    }

    /// `Some(n)` if this set is the von Neumann ordinal `n` (i.e. `{0, 1, ..., n-1}`), else `None`
    pub fn ordinal(&self) -> Option<usize> {
        *self.0.memo.ordinal.get_or_init(|| {
            let n = self.cardinal();
            let mut seen = vec![false; n];
            for element in self.elements() {
                match element.ordinal() {
                    Some(i) if i < n && !seen[i] => seen[i] = true,
                    _ => return None,
                }
            }
            if seen.iter().all(|&b| b) {
                Some(n)
            } else {
                None
            }
        })
    }

    /// The natural-number encoding `v(S) = sum(2^v(e) for e in S)`, as a `BigUint` since it grows
    /// double-exponentially with rank
    pub fn value(&self) -> BigUint {
        self.0
            .memo
            .value
            .get_or_init(|| {
                self.elements().fold(BigUint::from(0u32), |acc, e| {
                    let exponent = e
                        .value()
                        .to_u64()
                        .expect("set value exponent exceeds platform width");
                    acc + (BigUint::from(1u32) << exponent)
                })
            })
            .clone()
    }

    /// Whether this set has exactly one element
    pub fn is_singleton(&self) -> bool {
        *self.0.memo.is_singleton.get_or_init(|| self.cardinal() == 1)
    }

    /// Whether every element of this set is also a subset of it (the set is closed under
    /// membership of its elements' elements)
    pub fn is_transitive(&self) -> bool {
        *self
            .0
            .memo
            .is_transitive
            .get_or_init(|| self.elements().all(|e| self.is_upset(e)))
    }

    /// Whether this set is the Kuratowski encoding of an ordered pair (or, transitively, an
    /// n-tuple): see SPEC_FULL.md §4.A for the exact recognition predicate.
    pub fn is_tuple(&self) -> bool {
        *self.0.memo.is_tuple.get_or_init(|| {
            if self.is_singleton() {
                let x = self.elements().next().unwrap();
                x.is_singleton()
            } else if self.cardinal() != 2 {
                false
            } else {
                let mut pair: Vec<&Set> = self.elements().collect();
                pair.sort_by_key(|s| s.cardinal());
                let (a, b) = (pair[0], pair[1]);
                if a.cardinal() > 0 && b.cardinal() > 0 && a.cardinal() + b.cardinal() == 3 {
                    let mut flattened: Vec<&Set> =
                        a.elements().chain(b.elements()).collect();
                    let x = flattened.remove(0);
                    flattened.iter().any(|e| *e == x)
                } else {
                    false
                }
            }
        })
    }

    /// Whether `other` is a (direct) element of this set
    pub fn contains(&self, other: &Set) -> bool {
        self.elements().any(|e| e == other)
    }

    /// Whether every element of `self` is an element of `other`
    pub fn is_subset(&self, other: &Set) -> bool {
        self.elements().all(|e| other.contains(e))
    }

    /// Whether every element of `other` is an element of `self`
    pub fn is_upset(&self, other: &Set) -> bool {
        other.is_subset(self)
    }
}

impl PartialOrd for Set {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Set {
    /// The canonical order of §3: rank ascending; within equal rank, descending-sorted element
    /// lists compared lexicographically; within equal lists, by cardinal.
    fn cmp(&self, other: &Self) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        match self.rank().cmp(&other.rank()) {
            Ordering::Equal => {}
            ord => return ord,
        }
        let mut a: Vec<&Set> = self.elements().collect();
        let mut b: Vec<&Set> = other.elements().collect();
        a.sort_by(|x, y| y.cmp(x));
        b.sort_by(|x, y| y.cmp(x));
        for (x, y) in a.iter().zip(b.iter()) {
            match x.cmp(y) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        a.len().cmp(&b.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_unique() {
        assert_eq!(Set::empty(), Set::new(std::iter::empty()));
        assert!(Set::empty() == Set::new(vec![]));
    }

    #[test]
    fn interning_deduplicates_structurally_equal_sets() {
        let a = Set::new(vec![Set::empty()]);
        let b = Set::new(vec![Set::empty(), Set::empty()]);
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.0, &b.0));
    }

    #[test]
    fn multiset_equality_is_unordered() {
        let a = Set::new(vec![Set::empty(), Set::new(vec![Set::empty()])]);
        let b = Set::new(vec![Set::new(vec![Set::empty()]), Set::empty()]);
        assert_eq!(a, b);
    }

    #[test]
    fn rank_and_cardinal() {
        let zero = Set::empty();
        let one = Set::new(vec![zero.clone()]);
        let two = Set::new(vec![zero.clone(), one.clone()]);
        assert_eq!(zero.rank(), 0);
        assert_eq!(one.rank(), 1);
        assert_eq!(two.rank(), 2);
        assert_eq!(two.cardinal(), 2);
    }

    #[test]
    fn ordinal_recognition() {
        let zero = Set::empty();
        let one = Set::new(vec![zero.clone()]);
        let two = Set::new(vec![zero.clone(), one.clone()]);
        let three = Set::new(vec![zero, one, two.clone()]);
        assert_eq!(Set::empty().ordinal(), Some(0));
        assert_eq!(two.ordinal(), Some(2));
        assert_eq!(three.ordinal(), Some(3));
        let not_ordinal = Set::new(vec![Set::empty(), Set::new(vec![Set::new(vec![Set::empty()])])]);
        assert_eq!(not_ordinal.ordinal(), None);
    }

    #[test]
    fn clear_cache_does_not_invalidate_existing_handles() {
        let a = Set::new(vec![Set::empty()]);
        clear_cache();
        let b = Set::new(vec![Set::empty()]);
        assert_eq!(a, b);
    }
}
