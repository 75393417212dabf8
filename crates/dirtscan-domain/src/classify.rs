use dirtscan_types::{PluginCounts, PluginFile, RecordCategory};

use crate::equivalence::{records_equivalent, MalformedPayload};
use crate::masters::find_master_record;
use crate::resolve::RecordResolver;
use crate::rules::GameRules;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Malformed(#[from] MalformedPayload),
}

/// Classify every record of one plugin against the load-order snapshot.
///
/// Single sequential pass; each record contributes independently, so the
/// result does not depend on enumeration order. Inputs are never mutated.
pub fn classify_plugin(
    plugin: &PluginFile,
    resolver: &dyn RecordResolver,
    rules: &GameRules,
) -> Result<PluginCounts, ClassifyError> {
    let mut counts = PluginCounts::default();

    for record in &plugin.records {
        // Deleted checks apply even when the key resolves to nothing.
        // Navmesh first; the two buckets are mutually exclusive.
        if record.deleted {
            if record.category == RecordCategory::Navmesh {
                counts.deleted_navmeshes = counts.deleted_navmeshes.saturating_add(1);
            } else if record.category.is_placed() {
                counts.deleted_references = counts.deleted_references.saturating_add(1);
            }
        }

        let Some(winning) = resolver.winner(&record.key) else {
            continue;
        };

        // The winner's identity owner differing from P marks R as an
        // override rather than a record P introduced itself.
        if winning.record.key.plugin != plugin.name && rules.itm_candidate(record.category) {
            if let Some(master) = find_master_record(&plugin.masters, &record.key, resolver) {
                if records_equivalent(record, master, rules, resolver)? {
                    counts.identical_to_master = counts.identical_to_master.saturating_add(1);
                }
            }
        }

        // Independent of the ITM outcome for the same record.
        if record.storage_index() > winning.record.storage_index() {
            counts.higher_index = counts.higher_index.saturating_add(1);
        }
    }

    Ok(counts)
}
