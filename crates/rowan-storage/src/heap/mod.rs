//! Record heap storage.
//!
//! The heap is the single owner of record data. Indexes refer to records only
//! by RID and resolve them through [`RecordHeap::get`] on every access.

mod store;

pub use store::RecordHeap;
