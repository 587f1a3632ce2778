extern crate num_traits;

use std::ops::{AddAssign, Deref};

use num_traits::Unsigned;

/// Monotonic occurrence counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Counter<T>(T)
where
    T: Copy + Unsigned + AddAssign;

impl<T> Counter<T>
where
    T: Copy + Unsigned + AddAssign,
{
    /// A counter that has seen exactly one occurrence.
    #[inline]
    pub fn one() -> Self {
        Self(T::one())
    }

    #[inline]
    pub fn get(&self) -> T {
        self.0
    }

    #[inline]
    pub fn increment(&mut self) {
        self.0 += T::one();
    }

    /// Returns the current value and restarts counting from one.
    #[inline]
    pub fn restart(&mut self) -> T {
        std::mem::replace(&mut self.0, T::one())
    }
}

impl<T> Deref for Counter<T>
where
    T: Copy + Unsigned + AddAssign,
{
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use crate::util::Counter;

    #[test]
    fn test_counter_restart() {
        let mut counter = Counter::<u32>::one();
        counter.increment();
        counter.increment();

        assert_eq!(counter.restart(), 3);
        assert_eq!(*counter, 1);
    }
}
