use std::collections::BTreeMap;

use dirtscan_types::{FormKey, PluginFile, Record};

/// The record currently winning load-order precedence for a key, together
/// with the plugin that contains it.
#[derive(Debug, Clone, Copy)]
pub struct Winning<'a> {
    pub plugin: &'a str,
    pub record: &'a Record,
}

/// Lookup contract of the resolution cache plus the direct master probe.
///
/// Implementations are read-only snapshots for the duration of an analysis
/// batch; the classifier never writes through this trait.
pub trait RecordResolver {
    /// The record that currently wins load-order precedence for `key`, or
    /// `None` when no plugin in the load order defines it.
    fn winner(&self, key: &FormKey) -> Option<Winning<'_>>;

    /// Direct lookup of `key` inside one specific plugin, bypassing
    /// load-order precedence. Used by master resolution.
    fn record_in(&self, plugin: &str, key: &FormKey) -> Option<&Record>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("plugin '{plugin}' defines identity {key} more than once")]
    DuplicateIdentity { plugin: String, key: FormKey },
}

/// An in-memory resolution index over an ordered load order slice.
///
/// Later plugins override earlier ones for the same identity key; every
/// enumerated record is a candidate winner for its own key, so a record
/// always resolves at least to itself.
#[derive(Debug)]
pub struct LoadOrderSnapshot<'a> {
    winners: BTreeMap<(&'a str, u32), Winning<'a>>,
    by_plugin: BTreeMap<&'a str, BTreeMap<(&'a str, u32), &'a Record>>,
}

impl<'a> LoadOrderSnapshot<'a> {
    pub fn build(plugins: &'a [PluginFile]) -> Result<Self, SnapshotError> {
        let mut winners = BTreeMap::new();
        let mut by_plugin: BTreeMap<&str, BTreeMap<(&str, u32), &Record>> = BTreeMap::new();

        for plugin in plugins {
            let local = by_plugin.entry(plugin.name.as_str()).or_default();
            for record in &plugin.records {
                let id = (record.key.plugin.as_str(), record.key.index);
                if local.insert(id, record).is_some() {
                    return Err(SnapshotError::DuplicateIdentity {
                        plugin: plugin.name.clone(),
                        key: record.key.clone(),
                    });
                }
                winners.insert(
                    id,
                    Winning {
                        plugin: plugin.name.as_str(),
                        record,
                    },
                );
            }
        }

        Ok(Self { winners, by_plugin })
    }
}

impl RecordResolver for LoadOrderSnapshot<'_> {
    fn winner(&self, key: &FormKey) -> Option<Winning<'_>> {
        self.winners
            .get(&(key.plugin.as_str(), key.index))
            .copied()
    }

    fn record_in(&self, plugin: &str, key: &FormKey) -> Option<&Record> {
        self.by_plugin
            .get(plugin)
            .and_then(|records| records.get(&(key.plugin.as_str(), key.index)))
            .copied()
    }
}
