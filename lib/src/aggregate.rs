use std::{fmt::Debug, hash::Hash, marker::PhantomData};

use hashbrown::{hash_map::Iter, HashMap};
use num_traits::{Float, Unsigned};

/// Folds per-term `(key, value)` contributions into one value per key.
pub trait Aggregate<K: Unsigned, V: Float>: Debug {
    type Iter<'a>: Iterator<Item = (&'a K, &'a V)>
    where
        Self: 'a,
        K: 'a,
        V: 'a;

    fn insert(&mut self, key: K, value: V);
    fn iter(&self) -> Self::Iter<'_>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct Aggregator<A: Aggregate<K, V>, K: Unsigned, V: Float> {
    inner: A,
    _marker: PhantomData<(K, V)>,
}

impl<A: Aggregate<K, V>, K: Unsigned, V: Float> Aggregator<A, K, V> {
    pub fn new(strategy: A) -> Self {
        Self {
            inner: strategy,
            _marker: PhantomData,
        }
    }

    pub fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, pairs: I) {
        pairs
            .into_iter()
            .for_each(|(key, value)| self.inner.insert(key, value));
    }

    #[inline]
    pub fn iter(&self) -> <A as Aggregate<K, V>>::Iter<'_> {
        self.inner.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Sums contributions per key.
#[derive(Debug, Default)]
pub struct HashAggregator<K, V> {
    inner: HashMap<K, V>,
}

impl<K, V> HashAggregator<K, V> {
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }
}

impl<K, V> Aggregate<K, V> for HashAggregator<K, V>
where
    K: Unsigned + Copy + Hash + Eq + Debug,
    V: Float + Debug,
{
    type Iter<'a> = Iter<'a, K, V> where K: 'a, V: 'a;

    fn insert(&mut self, key: K, value: V) {
        self.inner
            .entry(key)
            .and_modify(|existing| *existing = *existing + value)
            .or_insert(value);
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.inner.iter()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}
