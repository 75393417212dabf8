//! Shared test utilities for the dirtscan workspace.
//!
//! This crate provides:
//! - **arb**: Proptest strategies for generating bounded, valid inputs
//! - **builders**: Fluent builders for records, plugins, and load orders

pub mod arb;
pub mod builders;

pub use arb::{arb_category, arb_form_key, arb_leveled_entries, arb_member_keys};
pub use builders::{load_order, plugin, record, LoadOrderBuilder, PluginBuilder, RecordBuilder};
