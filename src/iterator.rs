//! Database Iterator
//!
//! Lazy, ascending iteration over committed key-value pairs.

use rocksdb::{DBIteratorWithThreadMode, DB};

use crate::error::Result;

/// Iterator over key-value pairs in ascending byte order
///
/// Yields `Ok((key, value))` per advance, or one `Err` if the scan hits an
/// engine error, after which the iterator is exhausted. Not restartable:
/// scanning again means asking the [`crate::Database`] for a new iterator.
///
/// The iterator borrows the database handle and releases its engine-side
/// resources on drop, so every exit path (including early `break` and `?`)
/// releases it. Reads see the committed state as of iterator creation,
/// per the engine's snapshot semantics; an open [`crate::Batch`] is never
/// observed.
pub struct DbIterator<'db> {
    inner: DBIteratorWithThreadMode<'db, DB>,
}

impl<'db> DbIterator<'db> {
    pub(crate) fn new(inner: DBIteratorWithThreadMode<'db, DB>) -> Self {
        Self { inner }
    }
}

impl Iterator for DbIterator<'_> {
    /// (key, value) in ascending key order
    type Item = Result<(Box<[u8]>, Box<[u8]>)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|item| item.map_err(Into::into))
    }
}
