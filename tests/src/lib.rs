#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use thicket::thicket_twig::{parse, TwigKind, TwigMetrics, TwigNodeExt};
    use thicket::{AnalysisConfig, LanguageMetricsProvider, MetricOptions, Node, NodeStreamExt, ResultOption};

    const LEDGER: &str = "import util.Money;
class Ledger {
    public field total;
    field entries;

    public method getTotal() { return total; }

    method add(amount) {
        if (amount > 0 && amount < 1000) {
            total = total + amount;
            entries = entries + 1;
        } else {
            reject(amount);
        }
    }

    method drain() {
        while (entries != 0) entries = entries - 1;
        return total == 0 ? empty() : total;
    }
}
";

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_metrics_share_one_memo() {
        let root = parse(LEDGER).unwrap();
        let provider = Arc::new(TwigMetrics::new());
        let class = root.children().first_of_kind("ClassDeclaration").unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let provider = provider.clone();
                let class = class.clone();
                tokio::spawn(async move { provider.metric_by_name(&class, "WMC").unwrap() })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 1.0 + 3.0 + 3.0);
        }
        // WMC and CYCLO, both with default options
        assert_eq!(provider.computer().pool().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_runs_are_independent() {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                tokio::task::spawn_blocking(move || {
                    let config = if i % 2 == 0 {
                        AnalysisConfig::default()
                    } else {
                        AnalysisConfig::default()
                            .with_options("CYCLO", MetricOptions::of([thicket::thicket_twig::IGNORE_BOOLEAN_PATHS]))
                    };
                    (i, thicket::analyze(LEDGER, &config).unwrap())
                })
            })
            .collect();

        for handle in handles {
            let (i, report) = handle.await.unwrap();
            let add = &report.classes[0].operations[1];
            assert_eq!(add.name, "add");
            let expected = if i % 2 == 0 { 3.0 } else { 2.0 };
            assert_eq!(add.metrics["CYCLO"], expected);
        }
    }

    #[test]
    fn operations_and_classes_see_the_same_tree() {
        let root = parse(LEDGER).unwrap();
        let provider = TwigMetrics::new();
        let class = root.child(1);
        assert!(class.is(TwigKind::ClassDeclaration));

        let operations = provider.computer().find_operations(&class);
        assert_eq!(operations.len(), 3);
        for operation in &operations {
            assert!(operation.parent().unwrap().is_same_node(&class));
            let enclosing = thicket::thicket_twig::nodes::enclosing_class(operation).unwrap();
            assert!(enclosing.is_same_node(&class));
        }

        let highest = provider.computer().compute_with_result_option(
            &provider.find_metric("NCSS", &operations[0]).unwrap(),
            &class,
            MetricOptions::empty(),
            ResultOption::Highest,
        );
        // add: declaration, if, two assignments, else, call
        assert_eq!(highest, 6.0);
    }

    #[test]
    fn memoized_values_survive_lookups_by_name() {
        let root = parse(LEDGER).unwrap();
        let provider = TwigMetrics::new();
        let drain = root.descendants().filter_kind("MethodDeclaration").last().unwrap();
        assert_eq!(drain.image(), Some("drain"));

        let first = provider.metric_by_name(&drain, "CYCLO").unwrap();
        let size = provider.computer().pool().len();
        for _ in 0..5 {
            assert_eq!(provider.metric_by_name(&drain, "CYCLO").unwrap(), first);
        }
        assert_eq!(provider.computer().pool().len(), size);
        assert_eq!(first, 3.0);
    }

    #[test]
    fn report_round_trips_through_json() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{ "aggregate": ["sum", "highest"] }"#).unwrap();
        let report = thicket::analyze(LEDGER, &config).unwrap();
        let ledger = &report.classes[0];

        assert_eq!(ledger.metrics["WMC"], ledger.aggregates["CYCLO.sum"]);
        assert_eq!(ledger.aggregates["CYCLO.highest"], 3.0);
        assert_eq!(ledger.metrics["NOPA"], 1.0);
        assert_eq!(ledger.metrics["NOAM"], 1.0);
        assert_eq!(ledger.metrics["LOC"], 20.0);

        let json = serde_json::to_string(&report).unwrap();
        let back: thicket::Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
