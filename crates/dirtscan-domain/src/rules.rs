use dirtscan_types::{GameKind, RecordCategory};

use RecordCategory::*;

/// Comparison rule registered for a category. Each rule operates on
/// same-category record pairs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRule {
    Global,
    GameSetting,
    FormList,
    LeveledItem,
    LeveledNpc,
    LeveledSpell,
    Constructible,
}

/// Categories whose low-level field layout is order-sensitive or carries
/// embedded sub-records, making flat structural comparison unreliable.
const IGNORED_BASE: &[RecordCategory] = &[
    PlacedObject,
    PlacedNpc,
    PlacedArrow,
    PlacedProjectile,
    PlacedHazard,
    Navmesh,
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
];

const IGNORED_FALLOUT4: &[RecordCategory] = &[
    PlacedObject,
    PlacedNpc,
    PlacedArrow,
    PlacedProjectile,
    PlacedHazard,
    Navmesh,
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
];

const RULES_BASE: &[(RecordCategory, CategoryRule)] = &[
    (GlobalVariable, CategoryRule::Global),
    (GameSetting, CategoryRule::GameSetting),
    (FormList, CategoryRule::FormList),
    (LeveledItem, CategoryRule::LeveledItem),
    (LeveledNpc, CategoryRule::LeveledNpc),
    (LeveledSpell, CategoryRule::LeveledSpell),
    (ConstructibleObject, CategoryRule::Constructible),
];

// Fallout 4 has no leveled spell lists; its recipes expose a created count.
const RULES_FALLOUT4: &[(RecordCategory, CategoryRule)] = &[
    (GlobalVariable, CategoryRule::Global),
    (GameSetting, CategoryRule::GameSetting),
    (FormList, CategoryRule::FormList),
    (LeveledItem, CategoryRule::LeveledItem),
    (LeveledNpc, CategoryRule::LeveledNpc),
    (ConstructibleObject, CategoryRule::Constructible),
];

/// Per-game comparison configuration: the structural-ignore set and the
/// category-rule table, kept as two explicit parallel lists. A category can
/// be ignored in one game variant and rule-handled in another, so neither
/// list is inferred from the other.
#[derive(Debug, Clone)]
pub struct GameRules {
    game: GameKind,
    ignored: &'static [RecordCategory],
    rules: &'static [(RecordCategory, CategoryRule)],
    compare_created_quantity: bool,
}

impl GameRules {
    pub fn for_game(game: GameKind) -> Self {
        match game {
            GameKind::SkyrimLe | GameKind::SkyrimSe => Self {
                game,
                ignored: IGNORED_BASE,
                rules: RULES_BASE,
                compare_created_quantity: false,
            },
            GameKind::Fallout4 => Self {
                game,
                ignored: IGNORED_FALLOUT4,
                rules: RULES_FALLOUT4,
                compare_created_quantity: true,
            },
        }
    }

    pub fn game(&self) -> GameKind {
        self.game
    }

    pub fn is_ignored(&self, category: RecordCategory) -> bool {
        self.ignored.contains(&category)
    }

    pub fn rule_for(&self, category: RecordCategory) -> Option<CategoryRule> {
        self.rules
            .iter()
            .find(|(cat, _)| *cat == category)
            .map(|(_, rule)| *rule)
    }

    /// Whether recipe equivalence compares the created quantity. Only set
    /// for games whose constructible records expose one.
    pub fn compare_created_quantity(&self) -> bool {
        self.compare_created_quantity
    }

    /// Whether a shadowed record of this category takes part in ITM
    /// accounting at all: either it has a registered rule, or it is safe to
    /// compare structurally.
    pub fn itm_candidate(&self, category: RecordCategory) -> bool {
        self.rule_for(category).is_some() || !self.is_ignored(category)
    }
}
