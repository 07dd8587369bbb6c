//! Tests for Batch staging, atomic write, and replay
//!
//! These tests verify:
//! - Staging invisibility until write
//! - In-batch ordering (last write wins)
//! - The value_size accounting formula
//! - Reset semantics and batch reuse
//! - Replay ordering, short-circuit on failure, and replay targets

use std::io;

use basalt::{BasaltError, Config, Database, Putter, Result};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Install a test-writer subscriber so `RUST_LOG` filters apply to the
/// layer's tracing output during tests. Safe to call repeatedly.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn open_temp() -> (TempDir, Database) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().write_buffer_size(1024 * 1024).build();
    let db = Database::open(temp_dir.path(), config).unwrap();
    (temp_dir, db)
}

/// Replay target that records applied operations and can be told to reject
/// the n-th one.
#[derive(Default)]
struct RecordingPutter {
    /// (key, Some(value)) for puts, (key, None) for deletes
    ops: Vec<(Vec<u8>, Option<Vec<u8>>)>,
    /// Reject the operation that would land at this index
    fail_at: Option<usize>,
}

impl RecordingPutter {
    fn sink_error() -> BasaltError {
        BasaltError::Io(io::Error::new(io::ErrorKind::Other, "sink rejected write"))
    }
}

impl Putter for RecordingPutter {
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if self.fail_at == Some(self.ops.len()) {
            return Err(Self::sink_error());
        }
        self.ops.push((key.to_vec(), Some(value.to_vec())));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        if self.fail_at == Some(self.ops.len()) {
            return Err(Self::sink_error());
        }
        self.ops.push((key.to_vec(), None));
        Ok(())
    }
}

// =============================================================================
// Staging Tests
// =============================================================================

#[test]
fn test_staged_ops_invisible_until_write() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    batch.put(b"key", b"value").unwrap();

    assert!(db.get(b"key").unwrap_err().is_not_found());

    batch.write().unwrap();

    assert_eq!(db.get(b"key").unwrap(), b"value".to_vec());
}

#[test]
fn test_write_applies_all_staged_ops() {
    let (_temp, db) = open_temp();
    db.put(b"doomed", b"x").unwrap();

    let mut batch = db.new_batch();
    batch.put(b"a", b"1").unwrap();
    batch.put(b"b", b"2").unwrap();
    batch.delete(b"doomed").unwrap();
    batch.write().unwrap();

    assert_eq!(db.get(b"a").unwrap(), b"1".to_vec());
    assert_eq!(db.get(b"b").unwrap(), b"2".to_vec());
    assert!(db.get(b"doomed").unwrap_err().is_not_found());
}

#[test]
fn test_last_staged_put_wins() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    batch.put(b"key", b"a").unwrap();
    batch.put(b"key", b"b").unwrap();
    batch.write().unwrap();

    assert_eq!(db.get(b"key").unwrap(), b"b".to_vec());
}

#[test]
fn test_delete_after_put_in_same_batch_wins() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    batch.put(b"key", b"value").unwrap();
    batch.delete(b"key").unwrap();
    batch.write().unwrap();

    assert!(db.get(b"key").unwrap_err().is_not_found());
}

#[test]
fn test_write_does_not_consume_batch() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    batch.put(b"key", b"value").unwrap();
    batch.write().unwrap();

    // Entries stay staged after a write; only reset clears them
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.value_size(), 5);

    db.delete(b"key").unwrap();
    batch.write().unwrap();
    assert_eq!(db.get(b"key").unwrap(), b"value".to_vec());
}

// =============================================================================
// Size Accounting Tests
// =============================================================================

#[test]
fn test_value_size_formula() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    assert_eq!(batch.value_size(), 0);

    // Puts count value bytes only, keys are free
    batch.put(b"a-long-key", b"hello").unwrap();
    assert_eq!(batch.value_size(), 5);

    batch.put(b"k", b"worlds").unwrap();
    assert_eq!(batch.value_size(), 11);

    // Deletes count a flat 1 regardless of key length
    batch.delete(b"a-long-key").unwrap();
    assert_eq!(batch.value_size(), 12);
}

#[test]
fn test_reset_clears_staged_state() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    batch.put(b"key", b"value").unwrap();
    batch.delete(b"other").unwrap();
    batch.reset();

    assert_eq!(batch.value_size(), 0);
    assert!(batch.is_empty());

    // Writing a reset batch applies nothing
    batch.write().unwrap();
    assert!(db.get(b"key").unwrap_err().is_not_found());
}

#[test]
fn test_batch_reusable_after_reset() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    batch.put(b"first", b"1").unwrap();
    batch.write().unwrap();
    batch.reset();

    batch.put(b"second", b"2").unwrap();
    batch.write().unwrap();

    assert_eq!(db.get(b"first").unwrap(), b"1".to_vec());
    assert_eq!(db.get(b"second").unwrap(), b"2".to_vec());
}

// =============================================================================
// Replay Tests
// =============================================================================

#[test]
fn test_replay_preserves_staging_order() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    batch.put(b"a", b"1").unwrap();
    batch.delete(b"b").unwrap();
    batch.put(b"a", b"2").unwrap();

    let mut target = RecordingPutter::default();
    batch.replay(&mut target).unwrap();

    assert_eq!(
        target.ops,
        vec![
            (b"a".to_vec(), Some(b"1".to_vec())),
            (b"b".to_vec(), None),
            (b"a".to_vec(), Some(b"2".to_vec())),
        ]
    );
}

#[test]
fn test_replay_short_circuits_on_first_failure() {
    let (_temp, db) = open_temp();

    let mut batch = db.new_batch();
    batch.put(b"a", b"1").unwrap();
    batch.put(b"b", b"2").unwrap();
    batch.put(b"c", b"3").unwrap();

    let mut target = RecordingPutter {
        fail_at: Some(1),
        ..Default::default()
    };
    let err = batch.replay(&mut target).unwrap_err();

    // The sink's error comes back wrapped, with the source preserved
    match err {
        BasaltError::Replay(inner) => assert!(matches!(*inner, BasaltError::Io(_))),
        other => panic!("expected Replay error, got {other}"),
    }

    // Exactly the first op was applied; the failing one and everything
    // after it were skipped, with no rollback of the first
    assert_eq!(target.ops, vec![(b"a".to_vec(), Some(b"1".to_vec()))]);
}

#[test]
fn test_replay_into_second_store() {
    let (_temp_a, db_a) = open_temp();
    let (_temp_b, mut db_b) = open_temp();

    let mut batch = db_a.new_batch();
    batch.put(b"mirrored", b"value").unwrap();
    batch.write().unwrap();
    batch.replay(&mut db_b).unwrap();

    assert_eq!(db_a.get(b"mirrored").unwrap(), b"value".to_vec());
    assert_eq!(db_b.get(b"mirrored").unwrap(), b"value".to_vec());
}

#[test]
fn test_replay_into_another_batch() {
    let (_temp, db) = open_temp();

    let mut source = db.new_batch();
    source.put(b"key", b"value").unwrap();
    source.delete(b"gone").unwrap();

    let mut copy = db.new_batch();
    source.replay(&mut copy).unwrap();

    // The copy staged the same ops, including the same size accounting
    assert_eq!(copy.len(), 2);
    assert_eq!(copy.value_size(), source.value_size());

    copy.write().unwrap();
    assert_eq!(db.get(b"key").unwrap(), b"value".to_vec());
}

#[test]
fn test_replay_empty_batch_is_noop() {
    let (_temp, db) = open_temp();

    let batch = db.new_batch();
    let mut target = RecordingPutter::default();

    batch.replay(&mut target).unwrap();
    assert!(target.ops.is_empty());
}
