//! Configuration for Basalt
//!
//! Open-time engine options with the fixed production defaults. All options
//! here apply only when the store is opened; there is no runtime tuning.

use rocksdb::{BlockBasedOptions, DBCompressionType, Options};

/// Block compression applied by the engine to table files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// No block compression
    None,

    /// Snappy block compression (fast, moderate ratio)
    Snappy,
}

/// Open-time configuration for a [`crate::Database`]
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Engine Options (fixed at open)
    // -------------------------------------------------------------------------
    /// Block compression for table files
    pub compression: Compression,

    /// Size of the in-memory write buffer before the engine flushes it
    /// to a table file (in bytes)
    pub write_buffer_size: usize,

    /// Maximum size of a single on-disk table file (in bytes)
    pub max_file_size: u64,

    /// Bits per key for the bloom filter used to short-circuit lookups of
    /// absent keys (10 bits/key is roughly a 1% false-positive rate)
    pub bloom_bits_per_key: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compression: Compression::Snappy,
            write_buffer_size: 64 * 1024 * 1024, // 64 MiB
            max_file_size: 2 * 1024 * 1024,      // 2 MiB
            bloom_bits_per_key: 10.0,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Translate this config into the engine's option set
    pub(crate) fn engine_options(&self) -> Options {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(match self.compression {
            Compression::None => DBCompressionType::None,
            Compression::Snappy => DBCompressionType::Snappy,
        });
        opts.set_write_buffer_size(self.write_buffer_size);
        opts.set_target_file_size_base(self.max_file_size);

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_bloom_filter(self.bloom_bits_per_key, false);
        opts.set_block_based_table_factory(&block_opts);

        opts
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the block compression algorithm
    pub fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    /// Set the write buffer size (in bytes)
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.config.write_buffer_size = size;
        self
    }

    /// Set the maximum table file size (in bytes)
    pub fn max_file_size(mut self, size: u64) -> Self {
        self.config.max_file_size = size;
        self
    }

    /// Set the bloom filter density (bits per key)
    pub fn bloom_bits_per_key(mut self, bits: f64) -> Self {
        self.config.bloom_bits_per_key = bits;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
