use dirtscan_types::{FormKey, Record};

use crate::resolve::RecordResolver;

/// Locate the nearest ancestor record an override should be compared
/// against: probe the declared masters in reverse header order (last
/// declared first) and return the first plugin that defines the key.
///
/// Declared-but-inactive masters are not filtered out; the probe follows
/// the dependency list alone. `None` means the record is newly introduced
/// and takes no part in ITM accounting.
pub fn find_master_record<'a>(
    masters: &[String],
    key: &FormKey,
    resolver: &'a dyn RecordResolver,
) -> Option<&'a Record> {
    masters
        .iter()
        .rev()
        .find_map(|master| resolver.record_in(master, key))
}
