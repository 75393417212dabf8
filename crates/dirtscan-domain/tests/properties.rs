//! Property-based tests for the classification engine.

use proptest::prelude::*;

use dirtscan_domain::{classify_plugin, records_equivalent, GameRules, LoadOrderSnapshot};
use dirtscan_testkit::{arb_form_key, arb_leveled_entries, arb_member_keys, plugin, record};
use dirtscan_types::{
    FormKey, GameKind, LeveledEntry, PluginFile, RecordCategory, RecordData,
};

fn se_rules() -> GameRules {
    GameRules::for_game(GameKind::SkyrimSe)
}

fn form_list(members: Vec<FormKey>) -> dirtscan_types::Record {
    record("Base.esm", 5)
        .category(RecordCategory::FormList)
        .data(RecordData::FormList { members })
        .build()
}

fn leveled(entries: Vec<LeveledEntry>) -> dirtscan_types::Record {
    record("Base.esm", 6)
        .category(RecordCategory::LeveledItem)
        .data(RecordData::Leveled {
            flags: 3,
            chance_none: 25,
            entries,
        })
        .build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Form lists compare as multisets: any permutation of the same
    /// members is equivalent to the original.
    #[test]
    fn form_list_equivalence_ignores_member_order(members in arb_member_keys()) {
        let plugins: Vec<PluginFile> = vec![];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let mut reversed = members.clone();
        reversed.reverse();

        prop_assert_eq!(
            records_equivalent(&form_list(members), &form_list(reversed), &se_rules(), &snapshot),
            Ok(true)
        );
    }

    /// Replacing any single member with a key the list does not contain
    /// breaks form-list equivalence.
    #[test]
    fn form_list_single_member_change_breaks_equivalence(
        members in arb_member_keys(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!members.is_empty());
        let plugins: Vec<PluginFile> = vec![];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let mut mutated = members.clone();
        let idx = pick.index(mutated.len());
        mutated[idx] = FormKey::new("Unique.esp", 5000);

        prop_assert_eq!(
            records_equivalent(&form_list(members), &form_list(mutated), &se_rules(), &snapshot),
            Ok(false)
        );
    }

    /// Leveled lists compare as multisets of (level, count, reference).
    #[test]
    fn leveled_equivalence_ignores_entry_order(entries in arb_leveled_entries()) {
        let plugins: Vec<PluginFile> = vec![];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let mut reversed = entries.clone();
        reversed.reverse();

        prop_assert_eq!(
            records_equivalent(&leveled(entries), &leveled(reversed), &se_rules(), &snapshot),
            Ok(true)
        );
    }

    /// Bumping any entry's count breaks leveled-item equivalence.
    #[test]
    fn leveled_count_change_breaks_equivalence(
        entries in arb_leveled_entries(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!entries.is_empty());
        let plugins: Vec<PluginFile> = vec![];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let mut mutated = entries.clone();
        let idx = pick.index(mutated.len());
        mutated[idx].count = mutated[idx].count.map(|c| c + 1);

        prop_assert_eq!(
            records_equivalent(&leveled(entries), &leveled(mutated), &se_rules(), &snapshot),
            Ok(false)
        );
    }

    /// Bumping any entry's level breaks leveled-item equivalence.
    #[test]
    fn leveled_level_change_breaks_equivalence(
        entries in arb_leveled_entries(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!entries.is_empty());
        let plugins: Vec<PluginFile> = vec![];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let mut mutated = entries.clone();
        let idx = pick.index(mutated.len());
        mutated[idx].level += 1;

        prop_assert_eq!(
            records_equivalent(&leveled(entries), &leveled(mutated), &se_rules(), &snapshot),
            Ok(false)
        );
    }

    /// Redirecting any entry to a reference the list does not contain
    /// breaks leveled-item equivalence.
    #[test]
    fn leveled_reference_change_breaks_equivalence(
        entries in arb_leveled_entries(),
        pick in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!entries.is_empty());
        let plugins: Vec<PluginFile> = vec![];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let mut mutated = entries.clone();
        let idx = pick.index(mutated.len());
        mutated[idx].reference = FormKey::new("Unique.esp", 5000);

        prop_assert_eq!(
            records_equivalent(&leveled(entries), &leveled(mutated), &se_rules(), &snapshot),
            Ok(false)
        );
    }

    /// Global-value equivalence follows the inclusive absolute tolerance,
    /// and is symmetric.
    #[test]
    fn global_equivalence_matches_tolerance_and_is_symmetric(
        a in -1.0e6f64..1.0e6,
        b in -1.0e6f64..1.0e6,
    ) {
        let plugins: Vec<PluginFile> = vec![];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let global = |value: f64| {
            record("Base.esm", 1)
                .category(RecordCategory::GlobalVariable)
                .data(RecordData::Global { value: Some(value) })
                .build()
        };

        let expected = (a - b).abs() <= dirtscan_domain::GLOBAL_VALUE_TOLERANCE;
        prop_assert_eq!(
            records_equivalent(&global(a), &global(b), &se_rules(), &snapshot),
            Ok(expected)
        );
        prop_assert_eq!(
            records_equivalent(&global(b), &global(a), &se_rules(), &snapshot),
            Ok(expected)
        );
    }

    /// A record with no resolvable ancestor never contributes to ITM,
    /// regardless of its content.
    #[test]
    fn no_ancestor_never_counts_as_itm(key in arb_form_key()) {
        let plugins = vec![
            plugin("Elsewhere.esp")
                .record(record(key.plugin.clone(), key.index))
                .build(),
            // Overrides the same key but declares no masters at all.
            plugin("P.esp")
                .record(record(key.plugin.clone(), key.index))
                .build(),
        ];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let counts = classify_plugin(&plugins[1], &snapshot, &se_rules()).expect("classify");
        prop_assert_eq!(counts.identical_to_master, 0);
    }

    /// higher_index increments iff the stored index strictly exceeds the
    /// winner's, independent of everything else about the record.
    #[test]
    fn higher_index_is_a_strict_comparison(
        ours in 0u32..16,
        winners in 0u32..16,
    ) {
        let plugins = vec![
            plugin("P.esp")
                .record(record("Base.esm", 3).stored_index(ours))
                .build(),
            plugin("C.esp")
                .record(record("Base.esm", 3).stored_index(winners))
                .build(),
        ];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let counts = classify_plugin(&plugins[0], &snapshot, &se_rules()).expect("classify");
        prop_assert_eq!(counts.higher_index, u32::from(ours > winners));
    }

    /// Classification has no cross-record state: reversing a plugin's
    /// record enumeration order leaves the counters unchanged.
    #[test]
    fn classification_is_enumeration_order_independent(
        keys in prop::collection::btree_set(0u32..64, 1..12),
    ) {
        let base = plugin("Base.esm");
        let base = keys
            .iter()
            .fold(base, |b, &k| b.record(record("Base.esm", k)))
            .build();

        let target = plugin("P.esp").master("Base.esm");
        let target = keys
            .iter()
            .fold(target, |b, &k| b.record(record("Base.esm", k)))
            .build();

        let mut target_reversed = target.clone();
        target_reversed.records.reverse();

        let plugins = vec![base, target];
        let snapshot = LoadOrderSnapshot::build(&plugins).expect("snapshot");

        let forward = classify_plugin(&plugins[1], &snapshot, &se_rules()).expect("classify");
        let backward = classify_plugin(&target_reversed, &snapshot, &se_rules()).expect("classify");
        prop_assert_eq!(forward, backward);
        // Every override here is a byte-identical no-op.
        prop_assert_eq!(forward.identical_to_master, keys.len() as u32);
    }
}
