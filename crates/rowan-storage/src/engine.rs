//! Storage engine coordinating the record heap and both indexes.
//!
//! ```text
//!   primary:   i64    ──► Rid ─────────┐
//!                                      ▼
//!                                 [RecordHeap]
//!                                      ▲
//!   secondary: String ──► [Rid, ...] ──┘
//! ```
//!
//! Every mutation updates the heap and both indexes before returning, so no
//! caller can observe the three structures out of step.

use crate::btree::OrderedIndex;
use crate::heap::RecordHeap;
use crate::record::Record;
use rowan_common::{EngineConfig, Result, Rid, RowanError, normalize};
use std::collections::HashSet;
use std::ops::ControlFlow;
use tracing::{debug, trace, warn};

/// A query result paired with the number of key comparisons the index
/// performed to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup<T> {
    pub value: T,
    pub comparisons: u64,
}

/// Point-in-time counters describing engine contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    /// Slots in the heap, live and deleted.
    pub heap_records: usize,
    pub live_records: usize,
    pub deleted_records: usize,
    pub primary_entries: usize,
    pub primary_height: usize,
    /// Distinct normalized secondary keys.
    pub secondary_entries: usize,
    pub secondary_height: usize,
}

/// In-memory record store with a unique primary key index and a non-unique,
/// case-insensitive secondary key index.
///
/// Single-writer: the engine is not `Sync`, and callers sharing it across
/// threads must serialize access themselves.
pub struct StorageEngine {
    heap: RecordHeap,
    /// primary key -> RID of the live record.
    primary: OrderedIndex<i64, Rid>,
    /// normalized secondary key -> RIDs of live records, in insertion order.
    secondary: OrderedIndex<String, Vec<Rid>>,
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine {
    /// Creates an empty engine with default configuration.
    pub fn new() -> Self {
        Self {
            heap: RecordHeap::new(),
            primary: OrderedIndex::new(),
            secondary: OrderedIndex::new(),
        }
    }

    /// Creates an empty engine after validating `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            heap: RecordHeap::with_config(config.heap),
            primary: OrderedIndex::with_config(config.primary_index)?,
            secondary: OrderedIndex::with_config(config.secondary_index)?,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Inserts `record` and returns its RID.
    ///
    /// Fails with [`RowanError::DuplicateKey`] without touching any structure
    /// if a live record already holds the same primary key. A deletion flag
    /// set on the incoming record is cleared.
    pub fn insert(&mut self, mut record: Record) -> Result<Rid> {
        let key = record.primary_key();
        if let Some(existing) = self.primary.find(&key) {
            debug!(key, existing = %existing, "rejected duplicate primary key");
            return Err(RowanError::DuplicateKey { key });
        }

        record.set_deleted(false);
        let secondary_key = record.normalized_secondary_key();
        let rid = self.heap.append(record);
        self.primary.insert(key, rid);

        match self.secondary.find_mut(&secondary_key) {
            Some(rids) => rids.push(rid),
            None => {
                self.secondary.insert(secondary_key, vec![rid]);
            }
        }

        debug!(key, %rid, "inserted record");
        Ok(rid)
    }

    /// Logically deletes the live record with primary key `key`.
    ///
    /// Returns `Ok(false)` and changes nothing if no live record has that key.
    /// The record stays in the heap under its RID with the deletion flag set.
    pub fn delete_by_primary_key(&mut self, key: i64) -> Result<bool> {
        let Some(&rid) = self.primary.find(&key) else {
            trace!(key, "delete of absent primary key");
            return Ok(false);
        };

        // Resolve first so a bad RID fails before any index is touched.
        let record = self.heap.get_mut(rid)?;
        record.set_deleted(true);
        let secondary_key = record.normalized_secondary_key();

        self.primary.erase(&key);

        let emptied = match self.secondary.find_mut(&secondary_key) {
            Some(rids) => {
                rids.retain(|r| *r != rid);
                rids.is_empty()
            }
            None => {
                warn!(key, %rid, %secondary_key, "live record missing from secondary index");
                false
            }
        };
        if emptied {
            self.secondary.erase(&secondary_key);
            trace!(%secondary_key, "removed empty secondary entry");
        }

        debug!(key, %rid, "deleted record");
        Ok(true)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Looks up the live record with primary key `key`.
    ///
    /// The comparison count is reported for hits and misses alike.
    pub fn find_by_primary_key(&self, key: i64) -> Result<Lookup<Option<&Record>>> {
        self.primary.reset_metrics();
        let rid = self.primary.find(&key).copied();
        let comparisons = self.primary.comparisons();

        let value = rid.map(|rid| self.heap.get(rid)).transpose()?;
        Ok(Lookup { value, comparisons })
    }

    /// Returns live records with primary key in `[lo, hi]`, ascending by key.
    /// An inverted range yields no records.
    pub fn range_by_primary_key(&self, lo: i64, hi: i64) -> Result<Lookup<Vec<&Record>>> {
        self.primary.reset_metrics();
        let mut rids = Vec::new();
        self.primary.range_apply(&lo, &hi, |_, rid| rids.push(*rid));
        let comparisons = self.primary.comparisons();

        Ok(Lookup {
            value: self.resolve(&rids)?,
            comparisons,
        })
    }

    /// Returns live records whose normalized secondary key equals
    /// `normalize(prefix)`, in insertion order.
    ///
    /// Despite the name this is an exact-key lookup: "smi" does not match
    /// "smith". Use [`scan_by_secondary_prefix`](Self::scan_by_secondary_prefix)
    /// for true prefix matching.
    pub fn find_by_secondary_prefix(&self, prefix: &str) -> Result<Lookup<Vec<&Record>>> {
        self.secondary.reset_metrics();
        let key = normalize(prefix);
        let rids = self.secondary.find(&key);
        let comparisons = self.secondary.comparisons();

        let value = match rids {
            Some(rids) => self.resolve(rids)?,
            None => Vec::new(),
        };
        Ok(Lookup { value, comparisons })
    }

    /// Returns live records whose normalized secondary key starts with
    /// `normalize(prefix)`, ordered by secondary key and then insertion order.
    /// An empty prefix matches every live record.
    pub fn scan_by_secondary_prefix(&self, prefix: &str) -> Result<Lookup<Vec<&Record>>> {
        self.secondary.reset_metrics();
        let prefix = normalize(prefix);
        let mut rids = Vec::new();
        self.secondary.scan_from(&prefix, |key, entry| {
            if !key.starts_with(prefix.as_str()) {
                return ControlFlow::Break(());
            }
            rids.extend_from_slice(entry);
            ControlFlow::Continue(())
        });
        let comparisons = self.secondary.comparisons();

        Ok(Lookup {
            value: self.resolve(&rids)?,
            comparisons,
        })
    }

    /// Resolves `rid` through the heap. Deleted records are returned too.
    pub fn get(&self, rid: Rid) -> Result<&Record> {
        self.heap.get(rid)
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Number of heap slots ever assigned.
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    pub fn stats(&self) -> EngineStats {
        let live_records = self.primary.len();
        EngineStats {
            heap_records: self.heap.len(),
            live_records,
            deleted_records: self.heap.len() - live_records,
            primary_entries: self.primary.len(),
            primary_height: self.primary.height(),
            secondary_entries: self.secondary.len(),
            secondary_height: self.secondary.height(),
        }
    }

    /// Verifies that the heap and both indexes agree:
    /// - the primary index maps exactly the live records' keys to their RIDs
    /// - every live RID appears once in the secondary entry for its
    ///   normalized key, and no deleted RID appears at all
    /// - no secondary entry is empty
    pub fn check_consistency(&self) -> Result<()> {
        let mut live = 0usize;
        for (rid, record) in self.heap.iter() {
            let mapped = self.primary.find(&record.primary_key()).copied();
            if record.is_deleted() {
                if mapped == Some(rid) {
                    return Err(corrupted(format!("deleted {rid} still in primary index")));
                }
            } else {
                live += 1;
                if mapped != Some(rid) {
                    return Err(corrupted(format!(
                        "live {rid} (key {}) not mapped by primary index",
                        record.primary_key()
                    )));
                }
            }
        }
        if self.primary.len() != live {
            return Err(corrupted(format!(
                "primary index holds {} entries for {live} live records",
                self.primary.len()
            )));
        }

        let mut seen = HashSet::with_capacity(live);
        for (key, rids) in self.secondary.iter() {
            if rids.is_empty() {
                return Err(corrupted(format!("empty secondary entry '{key}'")));
            }
            for &rid in rids {
                let record = self.heap.get(rid)?;
                if record.is_deleted() {
                    return Err(corrupted(format!("deleted {rid} under secondary key '{key}'")));
                }
                if record.normalized_secondary_key() != *key {
                    return Err(corrupted(format!("{rid} filed under wrong secondary key '{key}'")));
                }
                if !seen.insert(rid) {
                    return Err(corrupted(format!("{rid} appears twice in secondary index")));
                }
            }
        }
        if seen.len() != live {
            return Err(corrupted(format!(
                "secondary index covers {} of {live} live records",
                seen.len()
            )));
        }

        Ok(())
    }

    fn resolve(&self, rids: &[Rid]) -> Result<Vec<&Record>> {
        rids.iter().map(|rid| self.heap.get(*rid)).collect()
    }
}

fn corrupted(reason: String) -> RowanError {
    warn!(%reason, "consistency check failed");
    RowanError::Corrupted(reason)
}
