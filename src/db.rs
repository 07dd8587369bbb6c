//! Database Handle
//!
//! The handle that owns one opened RocksDB instance bound to a path.
//!
//! ## Responsibilities
//! - Open the engine with the fixed production options
//! - Run the corruption -> repair -> reopen sequence when open fails
//! - Expose point operations, iterators, and batch construction
//! - Provide the process-wide singleton entry point ([`init`])

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rocksdb::{Direction, ErrorKind, IteratorMode, DB};

use crate::batch::Batch;
use crate::config::Config;
use crate::error::{BasaltError, Result};
use crate::iterator::DbIterator;
use crate::traits::Putter;

// =============================================================================
// Process-wide Singleton
// =============================================================================

static INSTANCE: OnceLock<Database> = OnceLock::new();

/// Open the process-wide database, exactly once.
///
/// The first call opens (or creates) the store at `path` with the default
/// config and caches the handle; every later call returns the cached handle
/// and ignores its `path` argument. A failed open panics: the singleton
/// models a required process-wide resource, and starting without it is not
/// a state the process can run in. Callers wanting to handle open errors
/// themselves use [`Database::new`] instead.
pub fn init<P: AsRef<Path>>(path: P) -> &'static Database {
    let path = path.as_ref();
    INSTANCE.get_or_init(|| match Database::new(path) {
        Ok(db) => db,
        Err(e) => panic!("basalt: failed to open database at {}: {e}", path.display()),
    })
}

// =============================================================================
// Database Handle
// =============================================================================

/// A handle to one opened store
///
/// ## Concurrency Model
///
/// Point operations take `&self` and add no locking of their own; the
/// wrapped engine is safe for concurrent readers and writers and handles
/// its own isolation during compaction. [`Batch`] and [`DbIterator`] are
/// single-owner values and need external synchronization to share.
///
/// At most one live handle per path is the intended usage; embedding
/// processes enforce it through [`init`] (the engine's own file lock
/// rejects a second open of the same path as a backstop).
pub struct Database {
    /// Path the store was opened at, immutable for the handle's lifetime
    path: PathBuf,

    /// The wrapped engine instance, released when the handle is dropped
    db: DB,
}

impl Database {
    /// Open or create a store at `path` with the default config.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path, Config::default())
    }

    /// Open or create a store at `path`.
    ///
    /// If the engine reports on-disk corruption, a repair pass salvages the
    /// readable data (the unreadable tail is discarded) and the open is
    /// retried once. A repair or reopen failure is fatal for the open; any
    /// other open error is surfaced unchanged.
    pub fn open<P: AsRef<Path>>(path: P, config: Config) -> Result<Self> {
        let path = path.as_ref();
        let opts = config.engine_options();

        let db = match DB::open(&opts, path) {
            Ok(db) => db,
            Err(e) if e.kind() == ErrorKind::Corruption => {
                tracing::warn!("corruption detected at {}: {e}; repairing", path.display());
                Self::repair_and_reopen(&opts, path)?
            }
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("opened store at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            db,
        })
    }

    /// Best-effort salvage of a corrupted store, then one reopen attempt.
    fn repair_and_reopen(opts: &rocksdb::Options, path: &Path) -> Result<DB> {
        DB::repair(opts, path)
            .map_err(|e| BasaltError::Corrupted(format!("repair of {} failed: {e}", path.display())))?;

        let db = DB::open(opts, path).map_err(|e| {
            BasaltError::Corrupted(format!("reopen of {} after repair failed: {e}", path.display()))
        })?;

        tracing::info!("repaired store at {}", path.display());
        Ok(db)
    }

    // =========================================================================
    // Point Operations
    // =========================================================================

    /// Get the value stored for `key`.
    ///
    /// Fails with [`BasaltError::NotFound`] when the key is absent; there is
    /// no implicit default value.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        match self.db.get(key)? {
            Some(value) => Ok(value),
            None => Err(BasaltError::NotFound),
        }
    }

    /// Insert or overwrite a key-value pair.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.db.put(key, value)?;
        Ok(())
    }

    /// Remove a key. Deleting an absent key succeeds.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.db.delete(key)?;
        Ok(())
    }

    /// Check whether `key` exists without materializing its value.
    ///
    /// The engine's bloom filter and memtable are probed first; a definite
    /// negative answers without touching table files. Because the filter can
    /// produce false positives, a positive probe is confirmed with a pinned
    /// read before reporting `true`.
    pub fn has(&self, key: &[u8]) -> Result<bool> {
        if !self.db.key_may_exist(key) {
            return Ok(false);
        }
        Ok(self.db.get_pinned(key)?.is_some())
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Iterate the full key space in ascending byte order.
    pub fn iter(&self) -> DbIterator<'_> {
        DbIterator::new(self.db.iterator(IteratorMode::Start))
    }

    /// Iterate ascending from the first key `>= start`.
    ///
    /// If `start` itself is absent, iteration begins at its successor in
    /// key order.
    pub fn iter_from(&self, start: &[u8]) -> DbIterator<'_> {
        DbIterator::new(self.db.iterator(IteratorMode::From(start, Direction::Forward)))
    }

    // =========================================================================
    // Batching
    // =========================================================================

    /// Create an empty batch bound to this handle.
    pub fn new_batch(&self) -> Batch<'_> {
        Batch::new(self)
    }

    /// Commit a prepared engine write-batch atomically.
    pub(crate) fn write_batch(&self, batch: rocksdb::WriteBatch) -> Result<()> {
        self.db.write(batch)?;
        Ok(())
    }

    // =========================================================================
    // Lifecycle / Accessors
    // =========================================================================

    /// Path the store was opened at.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush pending writes and release the engine.
    ///
    /// Consumes the handle, so a closed handle cannot be used again.
    /// Dropping a `Database` without calling `close` also releases the
    /// engine, but any flush error on that path is lost with the value;
    /// callers that need to observe flush failures must go through `close`.
    pub fn close(self) -> Result<()> {
        self.db.flush()?;
        self.db.cancel_all_background_work(true);
        tracing::debug!("closed store at {}", self.path.display());
        Ok(())
    }
}

/// A database is itself a valid replay target: staged batch operations can
/// be forwarded straight into a second store.
impl Putter for Database {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        Database::put(self, key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        Database::delete(self, key)
    }
}
