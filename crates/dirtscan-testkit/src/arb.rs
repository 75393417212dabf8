//! Proptest strategies for generating bounded, valid test inputs.
//!
//! # Bounds
//!
//! To keep tests fast, the following bounds are enforced:
//! - Plugin names are drawn from a small fixed pool
//! - Max members per form list: 8
//! - Max entries per leveled list: 8
//! - Sequence numbers stay below 1000

use dirtscan_types::{FormKey, LeveledEntry, RecordCategory};
use proptest::prelude::*;

/// Maximum members in a generated form list.
pub const MAX_MEMBERS: usize = 8;

/// Maximum entries in a generated leveled list.
pub const MAX_ENTRIES: usize = 8;

const PLUGIN_POOL: &[&str] = &["Base.esm", "Expansion.esm", "Patch.esp"];

/// Strategy for generating FormKey values from a small plugin pool.
pub fn arb_form_key() -> impl Strategy<Value = FormKey> {
    (prop::sample::select(PLUGIN_POOL), 0u32..1000)
        .prop_map(|(plugin, index)| FormKey::new(plugin, index))
}

/// Strategy for generating any record category.
pub fn arb_category() -> impl Strategy<Value = RecordCategory> {
    prop::sample::select(&[
        RecordCategory::PlacedObject,
        RecordCategory::PlacedNpc,
        RecordCategory::Navmesh,
        RecordCategory::LeveledItem,
        RecordCategory::LeveledNpc,
        RecordCategory::LeveledSpell,
        RecordCategory::FormList,
        RecordCategory::GlobalVariable,
        RecordCategory::GameSetting,
        RecordCategory::ConstructibleObject,
        RecordCategory::Cell,
        RecordCategory::Worldspace,
        RecordCategory::Quest,
        RecordCategory::Other,
    ])
}

/// Strategy for form-list member keys.
pub fn arb_member_keys() -> impl Strategy<Value = Vec<FormKey>> {
    prop::collection::vec(arb_form_key(), 0..MAX_MEMBERS)
}

/// Strategy for leveled-list entries with a present count payload.
pub fn arb_leveled_entries() -> impl Strategy<Value = Vec<LeveledEntry>> {
    prop::collection::vec(
        (arb_form_key(), 1i32..100, 1i32..20).prop_map(|(reference, level, count)| LeveledEntry {
            reference,
            level,
            count: Some(count),
        }),
        0..MAX_ENTRIES,
    )
}
