//! Bounded recency cache for query results.
//!
//! Entries live in an arena linked by index into a doubly linked recency
//! list; a hash index maps keys to arena slots. `get`, `put` and eviction are
//! O(1).

use std::{
    borrow::Borrow,
    hash::Hash,
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
};

use hashbrown::HashMap;

use crate::rank::Hit;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Single-threaded LRU map. Wrap it in [`ResultCache`] to share it.
#[derive(Debug)]
pub struct LruCache<K, V> {
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,

    /// Most recently used.
    head: Option<usize>,

    /// Least recently used.
    tail: Option<usize>,
    capacity: NonZeroUsize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity.get()),
            nodes: Vec::with_capacity(capacity.get()),
            head: None,
            tail: None,
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns the cached value and marks it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = *self.index.get(key)?;
        self.promote(slot);
        Some(&self.nodes[slot].value)
    }

    /// Inserts or overwrites `key`, evicting the least recently used entry
    /// when full. Returns the evicted key.
    pub fn put(&mut self, key: K, value: V) -> Option<K> {
        if let Some(&slot) = self.index.get(&key) {
            self.nodes[slot].value = value;
            self.promote(slot);
            return None;
        }

        if self.nodes.len() < self.capacity.get() {
            let slot = self.nodes.len();
            self.nodes.push(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.index.insert(key, slot);
            self.push_front(slot);
            return None;
        }

        // Full: reuse the tail slot.
        let slot = self.tail?;
        self.unlink(slot);

        let node = &mut self.nodes[slot];
        let evicted = std::mem::replace(&mut node.key, key.clone());
        node.value = value;

        self.index.remove(&evicted);
        self.index.insert(key, slot);
        self.push_front(slot);

        Some(evicted)
    }

    fn promote(&mut self, slot: usize) {
        if self.head != Some(slot) {
            self.unlink(slot);
            self.push_front(slot);
        }
    }

    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);

        match prev {
            Some(prev) => self.nodes[prev].next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.nodes[next].prev = prev,
            None => self.tail = prev,
        }

        self.nodes[slot].prev = None;
        self.nodes[slot].next = None;
    }

    fn push_front(&mut self, slot: usize) {
        self.nodes[slot].prev = None;
        self.nodes[slot].next = self.head;

        match self.head {
            Some(head) => self.nodes[head].prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }
}

/// Thread-safe result cache keyed by reconstructed query text.
///
/// Every operation takes the single lock for its whole duration. A poisoned
/// lock is recovered, since each operation leaves the list consistent before
/// it can panic.
#[derive(Debug)]
pub struct ResultCache {
    inner: Mutex<LruCache<String, Vec<Hit>>>,
}

impl ResultCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<Hit>> {
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(key).cloned()
    }

    pub fn put(&self, key: String, hits: Vec<Hit>) {
        let mut cache = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        cache.put(key, hits);
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::{num::NonZeroUsize, sync::Arc, thread};

    use crate::{
        cache::{LruCache, ResultCache},
        rank::Hit,
    };

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_lru_evicts_least_recently_used() {
        let mut cache = LruCache::new(capacity(2));

        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));

        // "b" is now the least recently used.
        assert_eq!(cache.put("c", 3), Some("b"));
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_lru_overwrite_promotes() {
        let mut cache = LruCache::new(capacity(2));

        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.put("a", 10), None);
        cache.put("c", 3);

        assert!(!cache.contains(&"b"));
        assert_eq!(cache.get(&"a"), Some(&10));
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut cache = LruCache::new(capacity(1));

        cache.put(1, "x");
        assert_eq!(cache.put(2, "y"), Some(1));
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&"y"));
    }

    #[test]
    fn test_lru_recent_keys_always_hit() {
        let size = 8;
        let mut cache = LruCache::new(capacity(size));

        for key in 0..100usize {
            cache.put(key, key * 2);

            let oldest_kept = (key + 1).saturating_sub(size);
            for recent in oldest_kept..=key {
                assert_eq!(cache.get(&recent), Some(&(recent * 2)));
            }
            if key >= size {
                assert_eq!(cache.get(&(key - size)), None);
            }
        }
    }

    #[test]
    fn test_result_cache_distinguishes_miss_from_empty() {
        let cache = ResultCache::new(capacity(4));

        assert_eq!(cache.get("zzzznotaword"), None);

        cache.put("zzzznotaword".into(), Vec::new());
        assert_eq!(cache.get("zzzznotaword"), Some(Vec::new()));

        cache.put("cat".into(), vec![Hit::new(1, 0.5)]);
        assert_eq!(cache.get("cat"), Some(vec![Hit::new(1, 0.5)]));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_result_cache_shared_between_threads() {
        let cache = Arc::new(ResultCache::new(capacity(16)));

        let handles = (0..4u32)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for n in 0..50u32 {
                        let key = format!("{worker}-{n}");
                        cache.put(key.clone(), vec![Hit::new(n, 1.0)]);
                        let _ = cache.get(&key);
                    }
                })
            })
            .collect::<Vec<_>>();

        handles.into_iter().for_each(|handle| handle.join().unwrap());
        assert_eq!(cache.len(), 16);
    }
}
