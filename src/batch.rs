//! Batch Module
//!
//! In-memory staging of write/delete operations, applied atomically to the
//! owning [`Database`] on [`Batch::write`] or forwarded entry-by-entry into
//! any [`Putter`] via [`Batch::replay`].
//!
//! Staged operations are invisible to readers until committed. Within one
//! batch, later operations on the same key override earlier ones (the
//! entries are applied in staging order).

use rocksdb::WriteBatch;

use crate::db::Database;
use crate::error::{BasaltError, Result};
use crate::traits::Putter;

/// One staged operation, tagged and order-preserving
enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

/// An ordered set of staged writes awaiting commit or forwarding
///
/// Created via [`Database::new_batch`]. Single-owner: a batch is not meant
/// to be shared across threads without external synchronization.
pub struct Batch<'db> {
    /// Handle the batch commits to on `write`
    db: &'db Database,

    /// Staged operations in staging order
    ops: Vec<BatchOp>,

    /// Running payload-size approximation, not an exact byte count:
    /// value length per put, a flat 1 per delete. Callers tune their flush
    /// thresholds against exactly this formula, so it stays as-is.
    size: usize,
}

impl<'db> Batch<'db> {
    pub(crate) fn new(db: &'db Database) -> Self {
        Self {
            db,
            ops: Vec::new(),
            size: 0,
        }
    }

    /// Stage an upsert. Pure in-memory staging, cannot fail.
    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.size += value.len();
        self.ops.push(BatchOp::Put {
            key: key.to_vec(),
            value: value.to_vec(),
        });
        Ok(())
    }

    /// Stage a delete. Pure in-memory staging, cannot fail.
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.size += 1;
        self.ops.push(BatchOp::Delete { key: key.to_vec() });
        Ok(())
    }

    /// Running size approximation of the staged payload.
    ///
    /// Callers use this to decide when to flush a batch and bound memory.
    pub fn value_size(&self) -> usize {
        self.size
    }

    /// Number of staged operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True if nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Discard all staged operations; the batch is immediately reusable.
    pub fn reset(&mut self) {
        self.ops.clear();
        self.size = 0;
    }

    /// Apply all staged operations to the owning database, atomically.
    ///
    /// The entries are funneled into a single engine write-batch commit:
    /// either every staged operation becomes visible to subsequent readers
    /// or none does, even across a crash mid-commit (the engine's
    /// write-ahead log covers the commit). The batch keeps its entries
    /// after `write`; call [`Batch::reset`] to reuse it empty.
    pub fn write(&self) -> Result<()> {
        let mut wb = WriteBatch::default();
        for op in &self.ops {
            match op {
                BatchOp::Put { key, value } => wb.put(key, value),
                BatchOp::Delete { key } => wb.delete(key),
            }
        }
        self.db.write_batch(wb)
    }

    /// Forward all staged operations, in staging order, into `target`.
    ///
    /// Unlike [`Batch::write`] this is not atomic: the target's
    /// transactional properties are unknown, so replay stops at the first
    /// entry the target rejects and returns that failure wrapped in
    /// [`BasaltError::Replay`]. Entries before the failing one remain
    /// applied to the target; there is no rollback.
    pub fn replay(&self, target: &mut dyn Putter) -> Result<()> {
        let mut replayer = Replayer::new(target);
        for op in &self.ops {
            match op {
                BatchOp::Put { key, value } => replayer.put(key, value),
                BatchOp::Delete { key } => replayer.delete(key),
            }
        }
        replayer.finish()
    }
}

/// A batch is itself a valid replay target, so one batch's staged
/// operations can be copied into another.
impl Putter for Batch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        Batch::put(self, key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        Batch::delete(self, key)
    }
}

// =============================================================================
// Replayer Bridge
// =============================================================================

/// Short-circuiting dispatcher used by [`Batch::replay`]
///
/// Once an operation fails, every later dispatch is a no-op and the first
/// error is preserved for [`Replayer::finish`].
struct Replayer<'a> {
    writer: &'a mut dyn Putter,
    failure: Option<BasaltError>,
}

impl<'a> Replayer<'a> {
    fn new(writer: &'a mut dyn Putter) -> Self {
        Self {
            writer,
            failure: None,
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) {
        if self.failure.is_some() {
            return;
        }
        self.failure = self.writer.put(key, value).err();
    }

    fn delete(&mut self, key: &[u8]) {
        if self.failure.is_some() {
            return;
        }
        self.failure = self.writer.delete(key).err();
    }

    fn finish(self) -> Result<()> {
        match self.failure {
            Some(e) => Err(BasaltError::Replay(Box::new(e))),
            None => Ok(()),
        }
    }
}
