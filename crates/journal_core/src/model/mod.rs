//! Journal domain model.
//!
//! # Responsibility
//! - Define the entry record, its id, and the write-side field set.
//!
//! # Invariants
//! - Every stored entry is identified by a storage-assigned `EntryId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod entry;
