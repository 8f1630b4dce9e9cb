//! Two-phase accumulator for scan/transform runs.
//!
//! During the scan phase every file writes into an [`AccumulatorBuilder`],
//! which serializes writers behind a mutex. Freezing the builder consumes it
//! and yields a [`Snapshot`], a read-only shared view. Because freezing takes
//! the builder by value, no scan can write after the transform phase has
//! started.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

/// Scan-phase side: shared, internally synchronized, writable.
pub struct AccumulatorBuilder<T> {
    inner: Mutex<T>,
}

impl<T> AccumulatorBuilder<T> {
    pub fn new(value: T) -> Self {
        AccumulatorBuilder {
            inner: Mutex::new(value),
        }
    }

    /// Run `f` with exclusive access to the accumulated value.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    /// Read the accumulated value while still scanning.
    pub fn inspect<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.lock();
        f(&guard)
    }

    /// End the scan phase.
    pub fn freeze(self) -> Snapshot<T> {
        Snapshot(Arc::new(self.inner.into_inner()))
    }
}

impl<T: Default> Default for AccumulatorBuilder<T> {
    fn default() -> Self {
        AccumulatorBuilder::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for AccumulatorBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccumulatorBuilder")
            .field("inner", &*self.inner.lock())
            .finish()
    }
}

/// Transform-phase side: immutable and cheap to share across threads.
#[derive(Debug)]
pub struct Snapshot<T>(Arc<T>);

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Snapshot(Arc::clone(&self.0))
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::thread;

    #[test]
    fn concurrent_writers_then_frozen_reads() {
        let builder = Arc::new(AccumulatorBuilder::<BTreeSet<String>>::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let builder = Arc::clone(&builder);
                thread::spawn(move || {
                    builder.update(|set| set.insert(format!("Type{}", i)));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let builder = Arc::try_unwrap(builder).unwrap();
        assert_eq!(builder.inspect(|set| set.len()), 8);
        let snapshot = builder.freeze();
        let shared = snapshot.clone();
        assert!(shared.contains("Type3"));
        assert_eq!(snapshot.len(), 8);
    }
}
