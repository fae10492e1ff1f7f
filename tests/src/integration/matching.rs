//! # Matching Flows
//!
//! Rule-set on disk -> tf-02 loader -> tf-01 engine, checked against the
//! behaviour the request-inspection path relies on.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use shared_types::CategoryId;
    use tf_01_text_triggers::{
        EngineConfig, GenerationBuilder, InMemoryTriggerStore, MatchEngine, TriggerMatcher,
        TriggerStore,
    };
    use tf_02_rule_sets::{load_rule_set, ListManifest, RuleSetSource};

    use crate::fixtures::{rule_set_dir, rule_set_zip, sample_page};

    fn every(_: CategoryId) -> bool {
        true
    }

    fn engine_from(source: &std::path::Path) -> (MatchEngine<InMemoryTriggerStore>, tf_02_rule_sets::CategoryRegistry) {
        let config = EngineConfig::default();
        let mut source = RuleSetSource::open(source).unwrap();
        let loaded = load_rule_set(
            &mut source,
            &ListManifest::default(),
            InMemoryTriggerStore::new(),
            &config,
        )
        .unwrap();
        (MatchEngine::new(config, loaded.generation).unwrap(), loaded.registry)
    }

    fn single_category_engine(phrases: &[String], category: CategoryId) -> MatchEngine<InMemoryTriggerStore> {
        let config = EngineConfig::default();
        let mut builder = GenerationBuilder::new(InMemoryTriggerStore::new(), &config);
        builder.load_batch(category, phrases).unwrap();
        MatchEngine::new(config, builder.finish().unwrap()).unwrap()
    }

    // =========================================================================
    // CONCRETE SCENARIOS
    // =========================================================================

    #[test]
    fn test_badword_enable_disable() {
        let engine = single_category_engine(&["badword".to_string()], 1);
        engine.set_category_enabled(1, true).unwrap();

        let found = engine
            .contains_trigger("this is a badword test", &every, true, 5)
            .unwrap()
            .expect("badword should match while enabled");
        assert_eq!(found.category, 1);
        assert_eq!(found.matched_text, "badword");

        engine.set_category_enabled(1, false).unwrap();
        assert!(engine
            .contains_trigger("this is a badword test", &every, true, 5)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_split_phrase_needs_wide_enough_window() {
        let dir = rule_set_dir(&[("violence/triggers.txt", "kill the president\n")]);
        let (engine, registry) = engine_from(dir.path());
        let category = registry.get("violence/triggers").unwrap();

        let input = "kill <b>the</b> president";
        for len in [3, 4, 5] {
            let found = engine.contains_trigger(input, &every, true, len).unwrap();
            assert_eq!(found.map(|m| m.category), Some(category), "max_fragment_len {}", len);
        }
        assert!(engine.contains_trigger(input, &every, true, 2).unwrap().is_none());
        assert!(engine.contains_trigger(input, &every, false, 5).unwrap().is_none());
    }

    #[test]
    fn test_script_excluded_alt_included() {
        let dir = rule_set_dir(&[("t.txt", "kill the president\nfamily picnic\n")]);
        let (engine, _) = engine_from(dir.path());

        assert!(engine
            .contains_trigger("<script>kill the president</script><p>hello</p>", &every, true, 5)
            .unwrap()
            .is_none());

        let found = engine
            .contains_trigger("<img alt=\"kill the president\">", &every, true, 5)
            .unwrap()
            .expect("alt text is inspected");
        assert_eq!(found.matched_text, "kill the president");
    }

    #[test]
    fn test_realistic_page() {
        let dir = rule_set_dir(&[("t.txt", "kill the president\nfamily picnic\n")]);
        let (engine, _) = engine_from(dir.path());

        let found = engine
            .contains_trigger(&sample_page(200), &every, true, 5)
            .unwrap()
            .expect("picnic in alt text");
        assert_eq!(found.matched_text, "family picnic", "Script body never matches");
    }

    #[test]
    fn test_zip_and_directory_sources_agree() {
        let files = [
            ("adult/triggers.txt", "badword\nnaughty words here\n"),
            ("violence/triggers.txt", "kill the president\n"),
        ];
        let dir = rule_set_dir(&files);
        let (_zip_dir, zip_path) = rule_set_zip(&files);
        let (from_dir, dir_registry) = engine_from(dir.path());
        let (from_zip, zip_registry) = engine_from(&zip_path);

        assert_eq!(dir_registry.get("violence/triggers"), zip_registry.get("violence/triggers"));
        for input in ["a badword", "naughty <i>words</i> here", "kill the president", "nothing"] {
            assert_eq!(
                from_dir.contains_trigger(input, &every, true, 5).unwrap(),
                from_zip.contains_trigger(input, &every, true, 5).unwrap(),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_empty_rule_set_never_matches() {
        let dir = rule_set_dir(&[("README.md", "no lists here")]);
        let (engine, registry) = engine_from(dir.path());

        assert!(registry.is_empty());
        assert!(engine.contains_trigger(&sample_page(500), &every, true, 5).unwrap().is_none());
        assert!(engine.is_exact_trigger("anything", &every).unwrap().is_none());
    }

    #[test]
    fn test_applies_predicate_selects_category() {
        let dir = rule_set_dir(&[("a.txt", "shared phrase\n"), ("b.txt", "shared phrase\n")]);
        let (engine, registry) = engine_from(dir.path());
        let b = registry.get("b").unwrap();

        let only_b = move |id: CategoryId| id == b;
        let found = engine.contains_trigger("a shared phrase", &only_b, true, 5).unwrap();
        assert_eq!(found.map(|m| m.category), Some(b));
        assert_eq!(engine.is_exact_trigger("Shared Phrase", &only_b).unwrap(), Some(b));
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    fn phrase() -> impl Strategy<Value = String> {
        prop::collection::vec("[a-z]{1,8}", 1..4).prop_map(|words| words.join(" "))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_exact_match_follows_gate(
            phrases in prop::collection::vec(phrase(), 1..20),
            category in 1u16..200,
        ) {
            let engine = single_category_engine(&phrases, category);

            for p in &phrases {
                prop_assert_eq!(engine.is_exact_trigger(p, &every).unwrap(), Some(category));
            }
            engine.set_category_enabled(category, false).unwrap();
            for p in &phrases {
                prop_assert_eq!(engine.is_exact_trigger(p, &every).unwrap(), None);
            }
        }

        #[test]
        fn prop_exact_match_ignores_case(phrases in prop::collection::vec(phrase(), 1..20)) {
            let engine = single_category_engine(&phrases, 7);

            for p in &phrases {
                prop_assert_eq!(
                    engine.is_exact_trigger(p, &every).unwrap(),
                    engine.is_exact_trigger(&p.to_uppercase(), &every).unwrap()
                );
            }
        }

        #[test]
        fn prop_blooms_cover_store(phrases in prop::collection::vec(phrase(), 1..50)) {
            let engine = single_category_engine(&phrases, 3);
            let generation = engine.generation();

            let mut stored = Vec::new();
            generation.store().for_each_phrase(&mut |p| stored.push(p.to_string())).unwrap();
            for p in &stored {
                prop_assert!(generation.blooms().contains_phrase(p));
            }

            let mut firsts = Vec::new();
            generation.store().for_each_first_word(&mut |w| firsts.push(w.to_string())).unwrap();
            for w in &firsts {
                prop_assert!(generation.blooms().contains_first_word(w));
            }
        }

        #[test]
        fn prop_visible_phrase_always_found(
            phrases in prop::collection::vec(phrase(), 1..10),
            pick in any::<prop::sample::Index>(),
        ) {
            let engine = single_category_engine(&phrases, 9);
            let target = pick.get(&phrases);
            let page = format!("<p>{}</p>", target);

            prop_assert!(engine.contains_trigger(&page, &every, true, 5).unwrap().is_some());
        }
    }
}
