//! # Reload Flows
//!
//! Generation swaps through `FilterRuntime`: identical rule-sets give
//! identical answers, and queries keep working while a reload runs.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    use filter_runtime::{ContentClassifier, FilterRuntime, RuntimeConfig};
    use shared_types::CategoryId;
    use tf_01_text_triggers::{QueryErrorPolicy, TriggerMatcher};

    use crate::fixtures::{rule_set_dir, rule_set_zip, sample_page};

    const CORPUS: &[&str] = &[
        "this is a badword test",
        "kill <b>the</b> president",
        "<script>kill the president</script>",
        "<img alt=\"family picnic\">",
        "naughty <i>words</i> here",
        "NAUGHTY WORDS HERE",
        "harmless text about gardening",
        "",
    ];

    fn every(_: CategoryId) -> bool {
        true
    }

    fn files() -> Vec<(&'static str, &'static str)> {
        vec![
            ("adult/triggers.txt", "badword\nnaughty words here\n"),
            ("violence/triggers.txt", "kill the president\n"),
            ("misc/triggers.txt", "family picnic\n\n\u{0}bad line\n"),
        ]
    }

    fn answers(runtime: &FilterRuntime) -> Vec<Option<(CategoryId, String)>> {
        CORPUS
            .iter()
            .map(|input| {
                runtime
                    .engine()
                    .contains_trigger(input, &every, true, 5)
                    .unwrap()
                    .map(|m| (m.category, m.matched_text))
            })
            .collect()
    }

    fn runtime_for(source: &std::path::Path) -> FilterRuntime {
        let mut config = RuntimeConfig::default();
        config.rules.source = source.to_path_buf();
        FilterRuntime::load(config).unwrap()
    }

    #[test]
    fn test_reload_is_idempotent() {
        let dir = rule_set_dir(&files());
        let runtime = runtime_for(dir.path());

        let first = answers(&runtime);
        let first_summary = runtime.last_load();
        runtime.reload().unwrap();
        runtime.reload().unwrap();

        assert_eq!(answers(&runtime), first);
        assert_eq!(runtime.last_load(), first_summary);
        assert_eq!(first_summary.lines_skipped, 2, "Blank and NUL lines are skipped");
        assert!(first.iter().filter(|a| a.is_some()).count() >= 5);
    }

    #[test]
    fn test_zip_reload_matches_directory() {
        let dir = rule_set_dir(&files());
        let (_zip_dir, zip_path) = rule_set_zip(&files());

        let from_dir = runtime_for(dir.path());
        let from_zip = runtime_for(&zip_path);
        from_zip.reload().unwrap();

        assert_eq!(answers(&from_dir), answers(&from_zip));
    }

    #[test]
    fn test_queries_during_reload_always_see_a_full_generation() {
        let dir = rule_set_dir(&files());
        let runtime = Arc::new(runtime_for(dir.path()));
        let stop = AtomicBool::new(false);
        let scans = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    while !stop.load(Ordering::Relaxed) {
                        let found = runtime
                            .engine()
                            .contains_trigger("kill <b>the</b> president", &every, true, 5)
                            .unwrap();
                        assert!(found.is_some(), "No scan may see a half-loaded rule-set");
                        scans.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }

            for _ in 0..10 {
                runtime.reload().unwrap();
            }
            while scans.load(Ordering::Relaxed) == 0 {
                thread::yield_now();
            }
            stop.store(true, Ordering::Relaxed);
        });

        assert!(scans.load(Ordering::Relaxed) > 0);
        assert_eq!(runtime.metrics().generations_installed, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_classifier_across_async_reload() {
        let dir = rule_set_dir(&[("adult/triggers.txt", "badword\n")]);
        let mut config = RuntimeConfig::default();
        config.rules.source = dir.path().to_path_buf();
        config.engine.query_error_policy = QueryErrorPolicy::FailClosed;

        let runtime = FilterRuntime::load_async(config).await.unwrap();
        let classifier = ContentClassifier::new(Arc::clone(&runtime));
        assert!(classifier
            .classify(sample_page(50).as_bytes(), "text/html", &every)
            .unwrap()
            .is_none());

        fs::write(dir.path().join("adult/triggers.txt"), "weather report\n").unwrap();
        runtime.reload_async().await.unwrap();

        let verdict = classifier
            .classify(sample_page(50).as_bytes(), "text/html", &every)
            .unwrap()
            .expect("new list is live after reload");
        assert_eq!(verdict.category_name.as_deref(), Some("adult/triggers"));
        assert_eq!(verdict.trigger, "weather report");
    }
}
