//! Fluent builders for constructing load-order fixtures in tests.

use dirtscan_types::{
    FieldValue, FormKey, LoadOrderDoc, PluginFile, Record, RecordCategory, RecordData,
    LOAD_ORDER_SCHEMA_V1,
};

/// Start a record builder for the identity `(plugin, index)`.
pub fn record(plugin: impl Into<String>, index: u32) -> RecordBuilder {
    RecordBuilder {
        record: Record {
            key: FormKey::new(plugin, index),
            stored_index: None,
            label: None,
            deleted: false,
            compressed: false,
            category: RecordCategory::Other,
            data: RecordData::None,
        },
    }
}

/// Start a plugin builder with no masters and no records.
pub fn plugin(name: impl Into<String>) -> PluginBuilder {
    PluginBuilder {
        plugin: PluginFile {
            name: name.into(),
            masters: vec![],
            records: vec![],
        },
    }
}

/// Start a load-order document builder for `game`.
pub fn load_order(game: impl Into<String>) -> LoadOrderBuilder {
    LoadOrderBuilder {
        doc: LoadOrderDoc {
            schema: LOAD_ORDER_SCHEMA_V1.to_string(),
            game: game.into(),
            plugins: vec![],
        },
    }
}

#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    pub fn category(mut self, category: RecordCategory) -> Self {
        self.record.category = category;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.record.label = Some(label.into());
        self
    }

    pub fn deleted(mut self) -> Self {
        self.record.deleted = true;
        self
    }

    pub fn compressed(mut self) -> Self {
        self.record.compressed = true;
        self
    }

    pub fn stored_index(mut self, index: u32) -> Self {
        self.record.stored_index = Some(index);
        self
    }

    pub fn data(mut self, data: RecordData) -> Self {
        self.record.data = data;
        self
    }

    /// Add one field to a structural payload, converting the payload to
    /// `Fields` if it is not one already.
    pub fn field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        match &mut self.record.data {
            RecordData::Fields(fields) => {
                fields.insert(name.into(), value);
            }
            _ => {
                let mut fields = std::collections::BTreeMap::new();
                fields.insert(name.into(), value);
                self.record.data = RecordData::Fields(fields);
            }
        }
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

impl From<RecordBuilder> for Record {
    fn from(builder: RecordBuilder) -> Self {
        builder.build()
    }
}

#[derive(Debug, Clone)]
pub struct PluginBuilder {
    plugin: PluginFile,
}

impl PluginBuilder {
    pub fn master(mut self, name: impl Into<String>) -> Self {
        self.plugin.masters.push(name.into());
        self
    }

    pub fn record(mut self, record: impl Into<Record>) -> Self {
        self.plugin.records.push(record.into());
        self
    }

    pub fn build(self) -> PluginFile {
        self.plugin
    }
}

impl From<PluginBuilder> for PluginFile {
    fn from(builder: PluginBuilder) -> Self {
        builder.build()
    }
}

#[derive(Debug, Clone)]
pub struct LoadOrderBuilder {
    doc: LoadOrderDoc,
}

impl LoadOrderBuilder {
    pub fn plugin(mut self, plugin: impl Into<PluginFile>) -> Self {
        self.doc.plugins.push(plugin.into());
        self
    }

    pub fn build(self) -> LoadOrderDoc {
        self.doc
    }
}
