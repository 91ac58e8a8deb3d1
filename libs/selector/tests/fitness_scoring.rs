use std::sync::Arc;

use gantry_id::SelectorId;
use gantry_selector::{
    Context, DefaultContextBuilder, EvaluatorError, ExpressionEvaluator, FitnessScorer,
    InMemorySelectorStore, Match, MatchProvider, MustConstraint, SchedulerConfig, SystemSelector,
    NO_MATCH_SCORE,
};
use gantry_testing::{fixtures, init_tracing, FixedMatchProvider, ScriptedEvaluator};

fn scorer_with(
    provider: Arc<dyn MatchProvider>,
    evaluator: Arc<dyn ExpressionEvaluator>,
) -> FitnessScorer {
    FitnessScorer::new(
        provider,
        evaluator,
        Arc::new(DefaultContextBuilder::new()),
        Arc::new(SchedulerConfig::default()),
    )
}

fn fitness(rules: Vec<Match>, evaluator: Arc<ScriptedEvaluator>) -> f64 {
    init_tracing();
    let scorer = scorer_with(Arc::new(FixedMatchProvider::should(rules)), evaluator);
    scorer.calculate_fitness(
        &fixtures::task("web"),
        &fixtures::host("flex-1"),
        &fixtures::two_tier_cluster(),
    )
}

#[test]
fn no_rules_scores_floor() {
    let evaluator = Arc::new(ScriptedEvaluator::new());

    assert_eq!(fitness(Vec::new(), evaluator.clone()), NO_MATCH_SCORE);
    assert!(evaluator.calls().is_empty());
}

#[test]
fn unselected_rules_score_floor_without_evaluating_match() {
    let evaluator = Arc::new(ScriptedEvaluator::new().truthy("is-flex"));
    let rules = vec![Match::new("false", "is-flex"), Match::new("false", "is-flex")];

    assert_eq!(fitness(rules, evaluator.clone()), NO_MATCH_SCORE);
    assert_eq!(evaluator.call_count("false"), 2);
    assert_eq!(evaluator.call_count("is-flex"), 0);
}

#[test]
fn partial_match_scores_ratio() {
    let evaluator = Arc::new(
        ScriptedEvaluator::new()
            .truthy("web-task")
            .truthy("batch-task")
            .falsy("gpu-task")
            .truthy("on-flex")
            .falsy("on-critical"),
    );
    let rules = vec![
        Match::new("web-task", "on-flex"),
        Match::new("batch-task", "on-critical"),
        Match::new("gpu-task", "on-flex"),
    ];

    assert_eq!(fitness(rules, evaluator), 0.5);
}

#[test]
fn failing_select_does_not_affect_other_rules() {
    let evaluator = Arc::new(ScriptedEvaluator::new().failing("broken"));
    let rules = vec![Match::new("broken", "true"), Match::new("true", "true")];

    assert_eq!(fitness(rules, evaluator.clone()), 1.0);
    assert_eq!(evaluator.call_count("broken"), 1);
}

#[test]
fn failing_match_counts_rule_as_miss() {
    let evaluator = Arc::new(ScriptedEvaluator::new().failing("broken"));
    let rules = vec![Match::new("true", "broken"), Match::new("true", "true")];

    assert_eq!(fitness(rules, evaluator), 0.5);
}

#[test]
fn unknown_expressions_are_suppressed() {
    let evaluator = Arc::new(ScriptedEvaluator::new());
    let rules = vec![Match::new("task.cpu >", "true")];

    assert_eq!(fitness(rules, evaluator), NO_MATCH_SCORE);
}

#[test]
fn rules_see_the_default_context() {
    init_tracing();
    let evaluator = |expression: &str, ctx: &Context| -> Result<bool, EvaluatorError> {
        let (path, expected) = expression
            .split_once(" == ")
            .ok_or_else(|| EvaluatorError::Syntax {
                expression: expression.to_string(),
                message: "expected '<path> == <value>'".to_string(),
            })?;
        let actual = ctx
            .lookup(path)
            .ok_or_else(|| EvaluatorError::UnknownVariable(path.to_string()))?;
        Ok(actual.as_str() == Some(expected))
    };
    let rules = vec![
        Match::new("task.application == web", "instance_group.tier == flex"),
        Match::new("task.application == web", "config.region == local"),
        Match::new("task.application == web", "instance_group.tier == critical"),
        Match::new("task.application == batch", "instance_group.tier == critical"),
        Match::new("task.nope == x", "instance_group.tier == flex"),
    ];
    let scorer = scorer_with(Arc::new(FixedMatchProvider::should(rules)), Arc::new(evaluator));

    let on_flex = scorer.calculate_fitness(
        &fixtures::task("web"),
        &fixtures::host("flex-1"),
        &fixtures::two_tier_cluster(),
    );
    let on_critical = scorer.calculate_fitness(
        &fixtures::task("web"),
        &fixtures::host("critical-1"),
        &fixtures::two_tier_cluster(),
    );

    assert_eq!(on_flex, 2.0 / 3.0);
    assert_eq!(on_critical, 2.0 / 3.0);

    let on_unknown_group = scorer.calculate_fitness(
        &fixtures::task("web"),
        &fixtures::host("gone-1"),
        &fixtures::two_tier_cluster(),
    );
    assert_eq!(on_unknown_group, 1.0 / 3.0);
}

#[test]
fn store_updates_are_visible_on_the_next_call() {
    init_tracing();
    let store = Arc::new(InMemorySelectorStore::new());
    let evaluator = Arc::new(ScriptedEvaluator::new());
    let scorer = scorer_with(store.clone(), evaluator);
    let task = fixtures::task("web");
    let host = fixtures::host("flex-1");
    let cluster = fixtures::two_tier_cluster();

    assert_eq!(scorer.calculate_fitness(&task, &host, &cluster), NO_MATCH_SCORE);

    let id = SelectorId::new();
    store
        .create(
            SystemSelector::new(id, "prefer flex")
                .with_should(Match::new("true", "true"))
                .with_should(Match::new("true", "false")),
        )
        .unwrap();
    assert_eq!(scorer.calculate_fitness(&task, &host, &cluster), 0.5);

    store.set_enabled(id, false).unwrap();
    assert_eq!(scorer.calculate_fitness(&task, &host, &cluster), NO_MATCH_SCORE);
}

#[test]
fn scorer_is_shareable_across_threads() {
    init_tracing();
    let evaluator = Arc::new(ScriptedEvaluator::new());
    let rules = vec![
        Match::new("true", "true"),
        Match::new("true", "false"),
        Match::new("true", "true"),
        Match::new("true", "true"),
    ];
    let scorer = Arc::new(scorer_with(
        Arc::new(FixedMatchProvider::should(rules)),
        evaluator.clone(),
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let scorer = Arc::clone(&scorer);
            std::thread::spawn(move || {
                scorer.calculate_fitness(
                    &fixtures::task("web"),
                    &fixtures::host("flex-1"),
                    &fixtures::two_tier_cluster(),
                )
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 0.75);
    }
    assert_eq!(evaluator.calls().len(), 4 * 8);
}

#[test]
fn must_rules_from_the_store_gate_hosts() {
    init_tracing();
    let store = Arc::new(InMemorySelectorStore::new());
    store
        .create(
            SystemSelector::new(SelectorId::new(), "no gpu on flex")
                .with_must(Match::new("true", "no-gpu")),
        )
        .unwrap();
    let evaluator = Arc::new(ScriptedEvaluator::new().falsy("no-gpu"));
    let constraint = MustConstraint::new(
        store,
        evaluator,
        Arc::new(DefaultContextBuilder::new()),
        Arc::new(SchedulerConfig::default()),
    );

    let result = constraint.evaluate(
        &fixtures::task("web"),
        &fixtures::host("flex-1"),
        &fixtures::two_tier_cluster(),
    );

    assert!(!result.satisfied);
    assert_eq!(
        result.failure_reason.as_deref(),
        Some("host does not match 'no-gpu'")
    );
}
