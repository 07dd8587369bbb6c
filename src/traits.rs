//! Write-capability traits
//!
//! [`Putter`] is the narrow contract a batch replay target must satisfy:
//! just put and delete, nothing about reads, iteration, or lifecycle.
//! Modeling it as its own trait keeps [`crate::Batch::replay`] decoupled
//! from any concrete store type, so staged writes can be forwarded into a
//! second store, a write-ahead log, or another batch.

use crate::error::Result;

/// The point-write contract: upsert and idempotent delete.
///
/// Implementors must treat `put` as an overwrite (no read-modify-write) and
/// `delete` of an absent key as success.
pub trait Putter {
    /// Insert or overwrite a key-value pair
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Remove a key; absent keys are not an error
    fn delete(&mut self, key: &[u8]) -> Result<()>;
}
