/*!
A cache for hash-consing values

Both the set interner ([`crate::set`]) and the term interner ([`crate::term`]) are built on top
of this single generic structure: a process-wide table mapping a value to its unique
reference-counted representative.
*/

use ahash::RandomState;
use dashmap::DashMap;
use elysees::Arc;
use std::borrow::Borrow;
use std::hash::{BuildHasher, Hash};

/// A cache for values of type `T`, hash-consed behind an `Arc`
#[derive(Debug)]
pub struct Cache<T: ?Sized, S: BuildHasher + Clone = RandomState> {
    cache: DashMap<Arc<T>, (), S>,
}

impl<T: Hash + Eq> Cache<T> {
    /// Create a new, empty cache
    pub fn new() -> Cache<T> {
        Cache {
            cache: DashMap::new(),
        }
    }
}

impl<T: Hash + Eq> Default for Cache<T> {
    fn default() -> Cache<T> {
        Cache::new()
    }
}

impl<T: Eq + Hash, S: BuildHasher + Clone> Cache<T, S> {
    /**
    Intern a value, returning the unique `Arc` on record for it.

    # Example
    ```rust
    use zerkel::util::cache::Cache;
    use elysees::Arc;
    let int_cache = Cache::<u64>::new();

    let cached_32 = int_cache.intern(32);
    let arc_32 = Arc::new(32);
    // These are different allocations!
    assert!(!Arc::ptr_eq(&arc_32, &cached_32));

    // Interning again returns the same allocation
    let dedup_32 = int_cache.intern(32);
    assert!(Arc::ptr_eq(&dedup_32, &cached_32));
    ```
    */
    pub fn intern<Q>(&self, value: Q) -> Arc<T>
    where
        Arc<T>: Borrow<Q>,
        Q: Into<Arc<T>> + Hash + Eq,
    {
        if let Some(cached) = self.cache.get(&value) {
            return cached.key().clone();
        }
        self.cache.entry(value.into()).or_default().key().clone()
    }

    /// Look up a value without interning it, returning the representative if present
    pub fn get<Q>(&self, value: &Q) -> Option<Arc<T>>
    where
        Arc<T>: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.get(value).map(|entry| entry.key().clone())
    }

    /// Remove every cached value. Any `Arc`s already handed out remain valid.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Compute how many items are in a given cache.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if this value cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
