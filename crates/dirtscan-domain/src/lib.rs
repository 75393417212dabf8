//! Domain logic: record resolution, equivalence rules, and classification.
//!
//! This crate is designed to be I/O-free and highly testable. It never
//! mutates a plugin, a load order, or the resolution snapshot.

pub mod classify;
pub mod equivalence;
pub mod masters;
pub mod resolve;
pub mod rules;

pub use classify::{classify_plugin, ClassifyError};
pub use equivalence::{
    link_equivalent, records_equivalent, MalformedPayload, GLOBAL_VALUE_TOLERANCE,
};
pub use masters::find_master_record;
pub use resolve::{LoadOrderSnapshot, RecordResolver, SnapshotError, Winning};
pub use rules::{CategoryRule, GameRules};
