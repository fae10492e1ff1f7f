//! # RocksDB Trigger Store
//!
//! Persistent implementation of [`TriggerStore`].
//!
//! ## Key layout
//!
//! - `t\0<phrase>\0<seq:u64 BE>` -> `<category:u16 BE>`
//! - `f\0<word>\0<seq:u64 BE>` -> `<is_whole:u8><category:u16 BE>`
//!
//! Phrases never contain NUL, so `t\0<phrase>\0` is an exact-match prefix.
//! The trailing sequence number keeps duplicate keys apart and makes a
//! prefix scan return them in insertion order. RocksDB keeps keys sorted,
//! so the store is always indexed and `finalize_for_read` only flushes.
//!
//! A store created with `remove_on_drop` deletes its directory once the
//! last owner lets go, which is how replaced generations clean up after
//! the scans still holding them finish.

use std::path::{Path, PathBuf};

use rocksdb::{Direction, IteratorMode, Options, WriteBatch, WriteOptions, DB};
use shared_types::{CategoryId, FirstWordHit};
use tracing::{debug, warn};

use crate::domain::phrase::TriggerBatch;
use crate::error::StoreError;
use crate::ports::TriggerStore;

const TRIGGER_TABLE: u8 = b't';
const FIRST_WORD_TABLE: u8 = b'f';
const SEQ_LEN: usize = 8;

/// RocksDB tuning for the trigger store
#[derive(Debug, Clone)]
pub struct RocksDbStoreConfig {
    pub path: PathBuf,
    /// Block cache size in bytes (default: 32MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// fsync each batch (default: false; a lost generation is rebuilt from lists)
    pub sync_writes: bool,
    /// Delete the database directory when the store is dropped (default: false)
    pub remove_on_drop: bool,
}

impl RocksDbStoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 32 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: false,
            remove_on_drop: false,
        }
    }

    pub fn remove_on_drop(mut self, remove: bool) -> Self {
        self.remove_on_drop = remove;
        self
    }
}

/// Removes a store directory on drop.
struct DirCleanup(PathBuf);

impl Drop for DirCleanup {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.0) {
            Ok(()) => debug!(path = %self.0.display(), "Removed trigger store"),
            Err(e) => warn!(path = %self.0.display(), error = %e, "Failed to remove trigger store"),
        }
    }
}

pub struct RocksDbTriggerStore {
    db: DB,
    config: RocksDbStoreConfig,
    triggers: usize,
    first_words: usize,
    next_seq: u64,
    // Declared after `db`: fields drop in order, so the database is closed
    // before its directory goes.
    cleanup: Option<DirCleanup>,
}

impl RocksDbTriggerStore {
    fn options(config: &RocksDbStoreConfig) -> Options {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);
        opts
    }

    /// Create an empty store, wiping anything already at `config.path`.
    pub fn create(config: RocksDbStoreConfig) -> Result<Self, StoreError> {
        let opts = Self::options(&config);
        if config.path.exists() {
            DB::destroy(&opts, &config.path)?;
        }
        let db = DB::open(&opts, &config.path)?;
        Ok(Self {
            db,
            cleanup: config.remove_on_drop.then(|| DirCleanup(config.path.clone())),
            config,
            triggers: 0,
            first_words: 0,
            next_seq: 0,
        })
    }

    /// Reopen an existing store and recount its rows.
    pub fn open(config: RocksDbStoreConfig) -> Result<Self, StoreError> {
        let opts = Self::options(&config);
        let db = DB::open(&opts, &config.path)?;
        let mut store = Self {
            db,
            cleanup: config.remove_on_drop.then(|| DirCleanup(config.path.clone())),
            config,
            triggers: 0,
            first_words: 0,
            next_seq: 0,
        };

        let mut triggers = 0;
        let mut max_seq = None;
        store.scan(&[TRIGGER_TABLE, 0], &mut |key, _| {
            triggers += 1;
            let seq = decode_seq(key)?;
            max_seq = max_seq.max(Some(seq));
            Ok(())
        })?;
        let mut first_words = 0;
        store.scan(&[FIRST_WORD_TABLE, 0], &mut |_, _| {
            first_words += 1;
            Ok(())
        })?;

        store.triggers = triggers;
        store.first_words = first_words;
        store.next_seq = max_seq.map_or(0, |s| s + 1);
        debug!(
            path = %store.config.path.display(),
            triggers,
            first_words,
            "Reopened trigger store"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn scan(
        &self,
        prefix: &[u8],
        visit: &mut dyn FnMut(&[u8], &[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let iter = self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward));
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            visit(&key, &value)?;
        }
        Ok(())
    }
}

fn table_prefix(table: u8, text: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(text.len() + 3);
    key.push(table);
    key.push(0);
    key.extend_from_slice(text.as_bytes());
    key.push(0);
    key
}

fn row_key(table: u8, text: &str, seq: u64) -> Vec<u8> {
    let mut key = table_prefix(table, text);
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

fn decode_seq(key: &[u8]) -> Result<u64, StoreError> {
    let start = key
        .len()
        .checked_sub(SEQ_LEN)
        .ok_or_else(|| StoreError::Corruption("key shorter than sequence suffix".into()))?;
    let mut seq = [0u8; SEQ_LEN];
    seq.copy_from_slice(&key[start..]);
    Ok(u64::from_be_bytes(seq))
}

/// The text between the table tag and the sequence suffix.
fn decode_text(key: &[u8]) -> Result<&str, StoreError> {
    // tag, NUL, text, NUL, seq
    if key.len() < 2 + 1 + SEQ_LEN {
        return Err(StoreError::Corruption(format!("key too short: {} bytes", key.len())));
    }
    let text = &key[2..key.len() - SEQ_LEN - 1];
    std::str::from_utf8(text).map_err(|e| StoreError::Encoding(e.to_string()))
}

fn decode_category(bytes: &[u8]) -> Result<CategoryId, StoreError> {
    match bytes {
        [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
        _ => Err(StoreError::Corruption(format!(
            "category value has {} bytes",
            bytes.len()
        ))),
    }
}

impl TriggerStore for RocksDbTriggerStore {
    fn write_batch(&mut self, batch: TriggerBatch) -> Result<(), StoreError> {
        if batch.triggers.len() != batch.first_words.len() {
            return Err(StoreError::Corruption(format!(
                "batch has {} triggers but {} first-word rows",
                batch.triggers.len(),
                batch.first_words.len()
            )));
        }

        let mut write = WriteBatch::default();
        let mut seq = self.next_seq;
        for (trigger, entry) in batch.triggers.iter().zip(&batch.first_words) {
            write.put(
                row_key(TRIGGER_TABLE, &trigger.phrase, seq),
                trigger.category.to_be_bytes(),
            );

            let mut value = [0u8; 3];
            value[0] = entry.is_whole_trigger as u8;
            value[1..].copy_from_slice(&entry.category.to_be_bytes());
            write.put(row_key(FIRST_WORD_TABLE, &entry.first_word, seq), value);
            seq += 1;
        }

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        self.db.write_opt(write, &write_opts)?;

        self.triggers += batch.triggers.len();
        self.first_words += batch.first_words.len();
        self.next_seq = seq;
        Ok(())
    }

    fn finalize_for_read(&mut self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    fn lookup_all(&self, phrase: &str) -> Result<Vec<CategoryId>, StoreError> {
        // NUL would run into the sequence suffix of a stored key
        if phrase.contains('\0') {
            return Ok(Vec::new());
        }
        let mut categories = Vec::new();
        self.scan(&table_prefix(TRIGGER_TABLE, phrase), &mut |_, value| {
            categories.push(decode_category(value)?);
            Ok(())
        })?;
        Ok(categories)
    }

    fn lookup_first_word(&self, word: &str) -> Result<Vec<FirstWordHit>, StoreError> {
        if word.contains('\0') {
            return Ok(Vec::new());
        }
        let mut hits = Vec::new();
        self.scan(&table_prefix(FIRST_WORD_TABLE, word), &mut |_, value| {
            let (flag, category) = value
                .split_first()
                .ok_or_else(|| StoreError::Corruption("empty first-word value".into()))?;
            hits.push(FirstWordHit {
                is_whole_trigger: *flag != 0,
                category: decode_category(category)?,
            });
            Ok(())
        })?;
        Ok(hits)
    }

    fn trigger_count(&self) -> usize {
        self.triggers
    }

    fn first_word_count(&self) -> usize {
        self.first_words
    }

    fn for_each_phrase(&self, visit: &mut dyn FnMut(&str)) -> Result<(), StoreError> {
        self.scan(&[TRIGGER_TABLE, 0], &mut |key, _| {
            visit(decode_text(key)?);
            Ok(())
        })
    }

    fn for_each_first_word(&self, visit: &mut dyn FnMut(&str)) -> Result<(), StoreError> {
        self.scan(&[FIRST_WORD_TABLE, 0], &mut |key, _| {
            visit(decode_text(key)?);
            Ok(())
        })
    }
}
