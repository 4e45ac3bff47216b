//! Append-only record heap.

use crate::record::Record;
use rowan_common::{HeapConfig, Result, Rid, RowanError};

/// Append-only sequence of records addressed by [`Rid`].
///
/// Slots are assigned sequentially and never removed or reordered. Growth may
/// reallocate the backing Vec, so callers hold RIDs across mutations and
/// re-resolve them, never references.
#[derive(Debug, Default)]
pub struct RecordHeap {
    records: Vec<Record>,
}

impl RecordHeap {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty heap with `config.initial_capacity` slots reserved.
    pub fn with_config(config: HeapConfig) -> Self {
        Self {
            records: Vec::with_capacity(config.initial_capacity),
        }
    }

    /// Stores `record` in the next slot and returns its RID.
    #[inline]
    pub fn append(&mut self, record: Record) -> Rid {
        let rid = Rid::from_slot(self.records.len());
        self.records.push(record);
        rid
    }

    /// Returns the record at `rid`, deleted or not.
    #[inline]
    pub fn get(&self, rid: Rid) -> Result<&Record> {
        let len = self.records.len();
        self.records
            .get(rid.as_slot())
            .ok_or(RowanError::RidOutOfBounds { rid: rid.0, len })
    }

    #[inline]
    pub fn get_mut(&mut self, rid: Rid) -> Result<&mut Record> {
        let len = self.records.len();
        self.records
            .get_mut(rid.as_slot())
            .ok_or(RowanError::RidOutOfBounds { rid: rid.0, len })
    }

    /// Number of slots ever assigned, live and deleted.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records not logically deleted.
    pub fn live_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_deleted()).count()
    }

    /// Iterates every slot in RID order.
    pub fn iter(&self) -> impl Iterator<Item = (Rid, &Record)> {
        self.records
            .iter()
            .enumerate()
            .map(|(slot, record)| (Rid::from_slot(slot), record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_new() {
        let heap = RecordHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn test_heap_with_config() {
        let heap = RecordHeap::with_config(HeapConfig {
            initial_capacity: 128,
        });
        assert!(heap.is_empty());
        assert!(heap.records.capacity() >= 128);
    }

    #[test]
    fn test_heap_append_sequential_rids() {
        let mut heap = RecordHeap::new();
        assert_eq!(heap.append(Record::new(10, "a")), Rid(0));
        assert_eq!(heap.append(Record::new(20, "b")), Rid(1));
        assert_eq!(heap.append(Record::new(30, "c")), Rid(2));
        assert_eq!(heap.len(), 3);
    }

    #[test]
    fn test_heap_get() {
        let mut heap = RecordHeap::new();
        let rid = heap.append(Record::new(10, "Smith"));
        let record = heap.get(rid).unwrap();
        assert_eq!(record.primary_key(), 10);
        assert_eq!(record.secondary_key(), "Smith");
    }

    #[test]
    fn test_heap_get_out_of_bounds() {
        let mut heap = RecordHeap::new();
        heap.append(Record::new(1, "a"));
        let err = heap.get(Rid(5)).unwrap_err();
        assert!(matches!(err, RowanError::RidOutOfBounds { rid: 5, len: 1 }));
        assert!(heap.get_mut(Rid(1)).is_err());
    }

    #[test]
    fn test_heap_get_mut_marks_deleted() {
        let mut heap = RecordHeap::new();
        let rid = heap.append(Record::new(1, "a"));
        heap.append(Record::new(2, "b"));

        heap.get_mut(rid).unwrap().set_deleted(true);
        assert!(heap.get(rid).unwrap().is_deleted());
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.live_count(), 1);
    }

    #[test]
    fn test_heap_rids_stable_across_growth() {
        let mut heap = RecordHeap::new();
        let rids: Vec<Rid> = (0..1000).map(|i| heap.append(Record::new(i, "x"))).collect();
        for (i, rid) in rids.iter().enumerate() {
            assert_eq!(heap.get(*rid).unwrap().primary_key(), i as i64);
        }
    }

    #[test]
    fn test_heap_iter() {
        let mut heap = RecordHeap::new();
        heap.append(Record::new(5, "a"));
        heap.append(Record::new(6, "b"));
        let collected: Vec<(Rid, i64)> = heap.iter().map(|(rid, r)| (rid, r.primary_key())).collect();
        assert_eq!(collected, vec![(Rid(0), 5), (Rid(1), 6)]);
    }
}
