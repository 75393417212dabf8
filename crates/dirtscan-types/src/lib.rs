//! Data types (record model + receipts) for dirtscan.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.
//! All analysis semantics live in `dirtscan-domain`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Schema Identifiers ─────────────────────────────────────────
pub const LOAD_ORDER_SCHEMA_V1: &str = "dirtscan.loadorder.v1";
pub const REPORT_SCHEMA_V1: &str = "dirtscan.report.v1";

/// Identity of a record within a load-order snapshot: the plugin that
/// introduced it plus its local sequence number in that plugin's id space.
///
/// Overrides in later-loaded plugins carry the *same* key as the record
/// they redefine; the key is assigned once and never recomputed.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct FormKey {
    pub plugin: String,
    pub index: u32,
}

impl FormKey {
    pub fn new(plugin: impl Into<String>, index: u32) -> Self {
        Self {
            plugin: plugin.into(),
            index,
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:06X}", self.plugin, self.index)
    }
}

/// Supported game variants. Category rule tables and structural-ignore
/// sets are scoped per game, so an unrecognized game is a hard error
/// rather than a silent fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    SkyrimLe,
    SkyrimSe,
    Fallout4,
}

impl GameKind {
    pub const ALL: &'static [GameKind] =
        &[GameKind::SkyrimLe, GameKind::SkyrimSe, GameKind::Fallout4];

    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::SkyrimLe => "skyrim_le",
            GameKind::SkyrimSe => "skyrim_se",
            GameKind::Fallout4 => "fallout4",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported game '{name}' (expected one of: skyrim_le, skyrim_se, fallout4)")]
pub struct UnknownGame {
    pub name: String,
}

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skyrim_le" => Ok(GameKind::SkyrimLe),
            "skyrim_se" => Ok(GameKind::SkyrimSe),
            "fallout4" => Ok(GameKind::Fallout4),
            other => Err(UnknownGame {
                name: other.to_string(),
            }),
        }
    }
}

/// Runtime category of a record. Closed set: the engine dispatches on this
/// tag exhaustively, so adding a category is a compile-visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    PlacedObject,
    PlacedNpc,
    PlacedArrow,
    PlacedProjectile,
    PlacedHazard,
    Navmesh,
    LeveledItem,
    LeveledNpc,
    LeveledSpell,
    FormList,
    GlobalVariable,
    GameSetting,
    ConstructibleObject,
    Cell,
    Worldspace,
    Landscape,
    LandscapeTexture,
    Light,
    IdleAnimation,
    Package,
    Quest,
    DialogTopic,
    DialogResponses,
    Relationship,
    EncounterZone,
    Location,
    LocationReferenceType,
    ImageSpace,
    ImageSpaceAdapter,
    MaterialObject,
    MaterialSwap,
    Other,
}

impl RecordCategory {
    /// Placed-reference variants: object, actor, and projectile placements.
    pub fn is_placed(self) -> bool {
        matches!(
            self,
            RecordCategory::PlacedObject
                | RecordCategory::PlacedNpc
                | RecordCategory::PlacedArrow
                | RecordCategory::PlacedProjectile
                | RecordCategory::PlacedHazard
        )
    }
}

/// One entry of a leveled item/NPC/spell list.
///
/// `count` is absent for spell lists and for entries whose payload
/// sub-record is missing in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LeveledEntry {
    pub reference: FormKey,
    pub level: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
}

/// One component requirement of a constructible-object recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComponentEntry {
    pub reference: FormKey,
    pub count: u32,
}

/// A normalized field value for the generic structural comparison.
///
/// Equality is derived and total: null equals null, compound values
/// compare recursively, any single differing field breaks equivalence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Key(FormKey),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

/// Category-specific payload of a record.
///
/// Categories with a registered comparison rule use the matching typed
/// variant; everything else carries a flat `fields` map (or `none` when
/// the source exposes no comparable payload).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordData {
    Global {
        value: Option<f64>,
    },
    GameSetting {
        value: String,
    },
    FormList {
        members: Vec<FormKey>,
    },
    Leveled {
        flags: u32,
        chance_none: u8,
        entries: Vec<LeveledEntry>,
    },
    Constructible {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        workbench: Option<FormKey>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        created: Option<FormKey>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        created_count: Option<u32>,
        components: Vec<ComponentEntry>,
    },
    Fields(BTreeMap<String, FieldValue>),
    #[default]
    None,
}

/// A single record as enumerated from a plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    pub key: FormKey,

    /// Raw local storage index of this record inside its containing plugin.
    /// Normally equal to `key.index`; differs only in index-corrupted files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_index: Option<u32>,

    /// Human label (editor id), when the record carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub deleted: bool,

    #[serde(default)]
    pub compressed: bool,

    pub category: RecordCategory,

    #[serde(default)]
    pub data: RecordData,
}

impl Record {
    /// The index used for the HITME ordering check.
    pub fn storage_index(&self) -> u32 {
        self.stored_index.unwrap_or(self.key.index)
    }
}

/// A plugin in the load order: its records in storage order plus its
/// declared master list in header order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PluginFile {
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masters: Vec<String>,

    #[serde(default)]
    pub records: Vec<Record>,
}

/// The load-order snapshot document consumed by the analyzer. Produced by
/// an external plugin-decoding collaborator; dirtscan never reads plugin
/// binaries itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoadOrderDoc {
    pub schema: String,
    pub game: String,
    pub plugins: Vec<PluginFile>,
}

/// Per-plugin classification counters. Created fresh per analysis pass and
/// immutable once the pass returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct PluginCounts {
    pub identical_to_master: u32,
    pub deleted_references: u32,
    pub deleted_navmeshes: u32,
    pub higher_index: u32,
}

impl PluginCounts {
    pub fn is_clean(&self) -> bool {
        *self == PluginCounts::default()
    }

    pub fn absorb(&mut self, other: &PluginCounts) {
        self.identical_to_master = self
            .identical_to_master
            .saturating_add(other.identical_to_master);
        self.deleted_references = self
            .deleted_references
            .saturating_add(other.deleted_references);
        self.deleted_navmeshes = self
            .deleted_navmeshes
            .saturating_add(other.deleted_navmeshes);
        self.higher_index = self.higher_index.saturating_add(other.higher_index);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Counters for one successfully analyzed plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PluginReport {
    pub plugin: String,
    pub counts: PluginCounts,
}

/// A plugin whose analysis failed. Failures never zero out or abort the
/// rest of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PluginFailure {
    pub plugin: String,
    pub message: String,
}

/// The full result of one batch analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BatchReceipt {
    pub schema: String,
    pub tool: ToolMeta,
    pub game: GameKind,
    pub plugins: Vec<PluginReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PluginFailure>,
    pub totals: PluginCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_key_display_is_hex_padded() {
        let key = FormKey::new("Skyrim.esm", 0x1a);
        assert_eq!(key.to_string(), "Skyrim.esm:00001A");
    }

    #[test]
    fn game_kind_round_trips_through_str() {
        for &game in GameKind::ALL {
            assert_eq!(game.as_str().parse::<GameKind>(), Ok(game));
        }
        let err = "oblivion".parse::<GameKind>().unwrap_err();
        assert_eq!(err.name, "oblivion");
    }

    #[test]
    fn placed_variants_are_placed_and_navmesh_is_not() {
        assert!(RecordCategory::PlacedObject.is_placed());
        assert!(RecordCategory::PlacedHazard.is_placed());
        assert!(!RecordCategory::Navmesh.is_placed());
        assert!(!RecordCategory::Cell.is_placed());
    }

    #[test]
    fn storage_index_falls_back_to_key_index() {
        let mut rec = Record {
            key: FormKey::new("A.esp", 7),
            stored_index: None,
            label: None,
            deleted: false,
            compressed: false,
            category: RecordCategory::Other,
            data: RecordData::None,
        };
        assert_eq!(rec.storage_index(), 7);
        rec.stored_index = Some(9);
        assert_eq!(rec.storage_index(), 9);
    }

    #[test]
    fn counts_absorb_saturates() {
        let mut a = PluginCounts {
            identical_to_master: u32::MAX,
            ..PluginCounts::default()
        };
        let b = PluginCounts {
            identical_to_master: 1,
            higher_index: 2,
            ..PluginCounts::default()
        };
        a.absorb(&b);
        assert_eq!(a.identical_to_master, u32::MAX);
        assert_eq!(a.higher_index, 2);
        assert!(!a.is_clean());
        assert!(PluginCounts::default().is_clean());
    }

    #[test]
    fn load_order_doc_deserializes_with_defaults() {
        let json = r#"{
            "schema": "dirtscan.loadorder.v1",
            "game": "skyrim_se",
            "plugins": [{
                "name": "Patch.esp",
                "masters": ["Skyrim.esm"],
                "records": [{
                    "key": {"plugin": "Skyrim.esm", "index": 5},
                    "category": "form_list",
                    "data": {"form_list": {"members": [
                        {"plugin": "Skyrim.esm", "index": 10}
                    ]}}
                }]
            }]
        }"#;

        let doc: LoadOrderDoc = serde_json::from_str(json).expect("deserialize doc");
        assert_eq!(doc.schema, LOAD_ORDER_SCHEMA_V1);
        let rec = &doc.plugins[0].records[0];
        assert!(!rec.deleted);
        assert!(!rec.compressed);
        assert_eq!(rec.category, RecordCategory::FormList);
        match &rec.data {
            RecordData::FormList { members } => assert_eq!(members.len(), 1),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
