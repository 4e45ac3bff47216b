//! Storage engine for RowanDB.
//!
//! This crate provides:
//! - Generic in-memory B+ tree ordered index with comparison instrumentation
//! - Append-only record heap addressed by stable RIDs
//! - Storage engine keeping the heap, a unique primary key index, and a
//!   case-insensitive secondary key index consistent

mod btree;
mod engine;
mod heap;
mod record;

pub use btree::{DeleteResult, Iter, NodeId, OrderedIndex};
pub use engine::{EngineStats, Lookup, StorageEngine};
pub use heap::RecordHeap;
pub use record::Record;
