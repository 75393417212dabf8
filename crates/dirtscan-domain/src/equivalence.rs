use std::cmp::Ordering;

use dirtscan_types::{
    ComponentEntry, FormKey, LeveledEntry, Record, RecordCategory, RecordData,
};

use crate::resolve::RecordResolver;
use crate::rules::{CategoryRule, GameRules};

/// Absolute tolerance for global-variable numeric comparison. The boundary
/// is inclusive: a delta of exactly this value compares equivalent.
pub const GLOBAL_VALUE_TOLERANCE: f64 = 1e-6;

/// A record whose payload kind contradicts its rule-handled category.
/// Raised so a corrupt plugin fails loudly instead of producing a zeroed
/// result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {key} is tagged {category:?} but carries a different payload kind")]
pub struct MalformedPayload {
    pub key: FormKey,
    pub category: RecordCategory,
}

/// Decide whether an override record and its ancestor are behaviorally
/// identical.
///
/// Category, label, deleted, and compressed mismatches reject fast. For
/// categories in the structural-ignore set with no registered rule the
/// answer is always "not equivalent"; structural comparison is never used
/// as a fallback there.
pub fn records_equivalent(
    record: &Record,
    master: &Record,
    rules: &GameRules,
    resolver: &dyn RecordResolver,
) -> Result<bool, MalformedPayload> {
    if record.category != master.category
        || record.label != master.label
        || record.deleted != master.deleted
        || record.compressed != master.compressed
    {
        return Ok(false);
    }

    match rules.rule_for(record.category) {
        Some(rule) => apply_rule(rule, record, master, rules, resolver),
        None if rules.is_ignored(record.category) => Ok(false),
        None => Ok(structural_equal(&record.data, &master.data)),
    }
}

/// Two cross-record references are equivalent when their keys are
/// identical, or both resolve to winners sharing an identity key.
pub fn link_equivalent(a: &FormKey, b: &FormKey, resolver: &dyn RecordResolver) -> bool {
    if a == b {
        return true;
    }
    match (resolver.winner(a), resolver.winner(b)) {
        (Some(wa), Some(wb)) => wa.record.key == wb.record.key,
        _ => false,
    }
}

fn apply_rule(
    rule: CategoryRule,
    record: &Record,
    master: &Record,
    rules: &GameRules,
    resolver: &dyn RecordResolver,
) -> Result<bool, MalformedPayload> {
    match rule {
        CategoryRule::Global => {
            let a = global_value(record)?;
            let b = global_value(master)?;
            Ok(match (a, b) {
                (Some(a), Some(b)) => (a - b).abs() <= GLOBAL_VALUE_TOLERANCE,
                // No numeric reading on either side: not comparable.
                _ => false,
            })
        }
        CategoryRule::GameSetting => Ok(setting_value(record)? == setting_value(master)?),
        CategoryRule::FormList => {
            let a = form_list_members(record)?;
            let b = form_list_members(master)?;
            Ok(form_lists_equal(a, b, resolver))
        }
        CategoryRule::LeveledItem | CategoryRule::LeveledNpc => {
            leveled_equal(record, master, true, resolver)
        }
        CategoryRule::LeveledSpell => leveled_equal(record, master, false, resolver),
        CategoryRule::Constructible => constructible_equal(record, master, rules, resolver),
    }
}

fn form_lists_equal(a: &[FormKey], b: &[FormKey], resolver: &dyn RecordResolver) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a: Vec<&FormKey> = a.iter().collect();
    let mut b: Vec<&FormKey> = b.iter().collect();
    a.sort_by(|x, y| key_order(x, y));
    b.sort_by(|x, y| key_order(x, y));

    a.iter()
        .zip(&b)
        .all(|(x, y)| link_equivalent(x, y, resolver))
}

fn leveled_equal(
    record: &Record,
    master: &Record,
    with_count: bool,
    resolver: &dyn RecordResolver,
) -> Result<bool, MalformedPayload> {
    let (r_flags, r_chance, r_entries) = leveled_parts(record)?;
    let (m_flags, m_chance, m_entries) = leveled_parts(master)?;

    if r_flags != m_flags || r_chance != m_chance || r_entries.len() != m_entries.len() {
        return Ok(false);
    }

    let mut a: Vec<&LeveledEntry> = r_entries.iter().collect();
    let mut b: Vec<&LeveledEntry> = m_entries.iter().collect();
    a.sort_by(|x, y| entry_order(x, y));
    b.sort_by(|x, y| entry_order(x, y));

    for (x, y) in a.iter().zip(&b) {
        if x.level != y.level {
            return Ok(false);
        }
        if with_count {
            // A missing entry payload on either side breaks the pairing.
            match (x.count, y.count) {
                (Some(cx), Some(cy)) if cx == cy => {}
                _ => return Ok(false),
            }
        }
        if !link_equivalent(&x.reference, &y.reference, resolver) {
            return Ok(false);
        }
    }

    Ok(true)
}

fn constructible_equal(
    record: &Record,
    master: &Record,
    rules: &GameRules,
    resolver: &dyn RecordResolver,
) -> Result<bool, MalformedPayload> {
    let a = constructible_parts(record)?;
    let b = constructible_parts(master)?;

    if !opt_link_equivalent(a.workbench, b.workbench, resolver)
        || !opt_link_equivalent(a.created, b.created, resolver)
    {
        return Ok(false);
    }
    if rules.compare_created_quantity() && a.created_count != b.created_count {
        return Ok(false);
    }
    if a.components.len() != b.components.len() {
        return Ok(false);
    }

    let mut ac: Vec<&ComponentEntry> = a.components.iter().collect();
    let mut bc: Vec<&ComponentEntry> = b.components.iter().collect();
    ac.sort_by(|x, y| key_order(&x.reference, &y.reference));
    bc.sort_by(|x, y| key_order(&x.reference, &y.reference));

    Ok(ac.iter().zip(&bc).all(|(x, y)| {
        x.count == y.count && link_equivalent(&x.reference, &y.reference, resolver)
    }))
}

fn opt_link_equivalent(
    a: Option<&FormKey>,
    b: Option<&FormKey>,
    resolver: &dyn RecordResolver,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => link_equivalent(a, b, resolver),
        _ => false,
    }
}

/// Sort references by local sequence number; plugin name breaks ties so
/// the ordering is total.
fn key_order(a: &FormKey, b: &FormKey) -> Ordering {
    a.index
        .cmp(&b.index)
        .then_with(|| a.plugin.cmp(&b.plugin))
}

fn entry_order(a: &LeveledEntry, b: &LeveledEntry) -> Ordering {
    key_order(&a.reference, &b.reference).then(a.level.cmp(&b.level))
}

/// Total deep equality over the normalized field representation. Typed
/// payloads landing in a fallback category still compare by value.
fn structural_equal(a: &RecordData, b: &RecordData) -> bool {
    match (a, b) {
        (RecordData::Fields(x), RecordData::None) | (RecordData::None, RecordData::Fields(x)) => {
            x.is_empty()
        }
        _ => a == b,
    }
}

fn malformed(record: &Record) -> MalformedPayload {
    MalformedPayload {
        key: record.key.clone(),
        category: record.category,
    }
}

fn global_value(record: &Record) -> Result<Option<f64>, MalformedPayload> {
    match &record.data {
        RecordData::Global { value } => Ok(*value),
        _ => Err(malformed(record)),
    }
}

fn setting_value(record: &Record) -> Result<&str, MalformedPayload> {
    match &record.data {
        RecordData::GameSetting { value } => Ok(value),
        _ => Err(malformed(record)),
    }
}

fn form_list_members(record: &Record) -> Result<&[FormKey], MalformedPayload> {
    match &record.data {
        RecordData::FormList { members } => Ok(members),
        _ => Err(malformed(record)),
    }
}

fn leveled_parts(record: &Record) -> Result<(u32, u8, &[LeveledEntry]), MalformedPayload> {
    match &record.data {
        RecordData::Leveled {
            flags,
            chance_none,
            entries,
        } => Ok((*flags, *chance_none, entries)),
        _ => Err(malformed(record)),
    }
}

struct ConstructibleParts<'a> {
    workbench: Option<&'a FormKey>,
    created: Option<&'a FormKey>,
    created_count: Option<u32>,
    components: &'a [ComponentEntry],
}

fn constructible_parts(record: &Record) -> Result<ConstructibleParts<'_>, MalformedPayload> {
    match &record.data {
        RecordData::Constructible {
            workbench,
            created,
            created_count,
            components,
        } => Ok(ConstructibleParts {
            workbench: workbench.as_ref(),
            created: created.as_ref(),
            created_count: *created_count,
            components,
        }),
        _ => Err(malformed(record)),
    }
}
