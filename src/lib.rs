//! # Basalt
//!
//! A durable, ordered byte-key/byte-value storage layer over RocksDB with:
//! - Point operations (get/put/delete/has) with overwrite and idempotent-delete semantics
//! - Lazy, ascending range iteration over the full key space or from a start key
//! - Atomic batched writes with last-write-wins ordering inside a batch
//! - Batch replay into any write-capable sink (mirroring, write-ahead forwarding)
//! - Automatic repair-on-open when the engine reports on-disk corruption
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Callers                     │
//! └──────┬─────────────────┬─────────────────────┘
//!        │ point ops       │ staged ops
//! ┌──────▼──────┐   ┌──────▼──────┐
//! │  Database   │◄──┤    Batch    │── replay ──► any Putter
//! │  (handle)   │   │  (staging)  │
//! └──────┬──────┘   └─────────────┘
//!        │ delegates
//! ┌──────▼──────────────────────────────────────┐
//! │        RocksDB (opaque LSM engine)          │
//! │   compaction, file format, bloom filters    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Basalt defines no on-disk format of its own; storage layout, compaction,
//! and crash durability of committed writes belong to the wrapped engine.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod db;
pub mod batch;
pub mod iterator;
pub mod traits;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BasaltError, Result};
pub use config::{Compression, Config};
pub use db::{init, Database};
pub use batch::Batch;
pub use iterator::DbIterator;
pub use traits::Putter;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Basalt
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
