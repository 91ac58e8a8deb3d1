//! Hard placement constraint over `must` rules.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::fitness::{evaluate_rule_expression, ExpressionKind};
use crate::{
    ClusterFacts, Context, ContextBuilder, ExpressionEvaluator, HostState, Match, MatchProvider,
    SchedulerConfig, TaskRequest,
};

/// Name the scheduler reports for this constraint.
pub const CONSTRAINT_EVALUATOR_NAME: &str = "System Selector Constraint Evaluator";

/// Outcome of a constraint check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintResult {
    pub satisfied: bool,
    pub failure_reason: Option<String>,
}

impl ConstraintResult {
    pub fn satisfied() -> Self {
        Self {
            satisfied: true,
            failure_reason: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            satisfied: false,
            failure_reason: Some(reason.into()),
        }
    }
}

/// Rejects hosts that fail any applicable `must` rule.
///
/// A rule whose `select` errors is skipped, same as for scoring. A rule whose
/// `match` errors rejects the host: a broken hard rule must not let a host
/// through.
#[derive(Clone)]
pub struct MustConstraint {
    provider: Arc<dyn MatchProvider>,
    evaluator: Arc<dyn ExpressionEvaluator>,
    context_builder: Arc<dyn ContextBuilder>,
    config: Arc<SchedulerConfig>,
}

impl MustConstraint {
    pub fn new(
        provider: Arc<dyn MatchProvider>,
        evaluator: Arc<dyn ExpressionEvaluator>,
        context_builder: Arc<dyn ContextBuilder>,
        config: Arc<SchedulerConfig>,
    ) -> Self {
        Self {
            provider,
            evaluator,
            context_builder,
            config,
        }
    }

    pub fn name(&self) -> &'static str {
        CONSTRAINT_EVALUATOR_NAME
    }

    #[instrument(skip_all, fields(task_id = %task.id(), host_id = %host.id()))]
    pub fn evaluate(
        &self,
        task: &TaskRequest,
        host: &HostState,
        cluster: &ClusterFacts,
    ) -> ConstraintResult {
        let rules = self.provider.must_rules();
        if rules.is_empty() {
            return ConstraintResult::satisfied();
        }

        let context = self.context_builder.build(task, host, cluster, &self.config);
        self.check(task, host, &rules, &context)
    }

    /// Check `rules` against a prepared context, stopping at the first failure.
    pub fn check(
        &self,
        task: &TaskRequest,
        host: &HostState,
        rules: &[Match],
        context: &Context,
    ) -> ConstraintResult {
        for rule in rules {
            let selected = evaluate_rule_expression(
                self.evaluator.as_ref(),
                ExpressionKind::Select,
                &rule.select,
                task,
                host,
                context,
            )
            .unwrap_or(false);
            if !selected {
                continue;
            }

            let reason = match evaluate_rule_expression(
                self.evaluator.as_ref(),
                ExpressionKind::Match,
                &rule.match_expr,
                task,
                host,
                context,
            ) {
                Ok(true) => continue,
                Ok(false) => format!("host does not match '{}'", rule.match_expr),
                Err(e) => format!("could not evaluate '{}': {e}", rule.match_expr),
            };

            debug!(reason = %reason, "Host rejected by system selector");
            return ConstraintResult::failed(reason);
        }

        ConstraintResult::satisfied()
    }
}

impl std::fmt::Debug for MustConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MustConstraint")
            .field("name", &self.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use gantry_id::{HostId, JobId, TaskId};
    use rstest::rstest;

    use super::*;
    use crate::{DefaultContextBuilder, EvaluatorError};

    struct MustRules(Vec<Match>);

    impl MatchProvider for MustRules {
        fn active_rules(&self) -> Vec<Match> {
            Vec::new()
        }

        fn must_rules(&self) -> Vec<Match> {
            self.0.clone()
        }
    }

    fn literal(expression: &str, _context: &Context) -> Result<bool, EvaluatorError> {
        match expression {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(EvaluatorError::Evaluation {
                expression: other.to_string(),
                message: "not a literal".to_string(),
            }),
        }
    }

    fn constraint(rules: Vec<Match>) -> MustConstraint {
        MustConstraint::new(
            Arc::new(MustRules(rules)),
            Arc::new(literal),
            Arc::new(DefaultContextBuilder),
            Arc::new(SchedulerConfig::default()),
        )
    }

    fn evaluate(rules: Vec<Match>) -> ConstraintResult {
        let task = TaskRequest {
            id: TaskId::new(),
            job_id: JobId::new(),
            application: "svc".to_string(),
            capacity_group: "default".to_string(),
            cpu: 1.0,
            memory_mb: 256,
            attributes: BTreeMap::new(),
        };
        let host = HostState {
            id: HostId::new(),
            instance_group: "critical-1".to_string(),
            available_cpu: 4.0,
            available_memory_mb: 8_192,
            attributes: BTreeMap::new(),
        };
        constraint(rules).evaluate(&task, &host, &ClusterFacts::default())
    }

    #[rstest]
    #[case::no_rules(vec![], true)]
    #[case::all_match(vec![Match::new("true", "true"), Match::new("true", "true")], true)]
    #[case::not_selected(vec![Match::new("false", "false")], true)]
    #[case::select_error_skipped(vec![Match::new("boom", "false")], true)]
    #[case::one_miss(vec![Match::new("true", "true"), Match::new("true", "false")], false)]
    #[case::match_error_rejects(vec![Match::new("true", "boom")], false)]
    fn test_must_rules(#[case] rules: Vec<Match>, #[case] satisfied: bool) {
        let result = evaluate(rules);
        assert_eq!(result.satisfied, satisfied);
        assert_eq!(result.failure_reason.is_none(), satisfied);
    }

    #[test]
    fn test_failure_reason_names_expression() {
        let result = evaluate(vec![Match::new("true", "false")]);
        assert_eq!(
            result.failure_reason.as_deref(),
            Some("host does not match 'false'")
        );

        let result = evaluate(vec![Match::new("true", "boom")]);
        assert!(result.failure_reason.unwrap().contains("'boom'"));
    }

    #[test]
    fn test_name() {
        assert_eq!(
            constraint(Vec::new()).name(),
            "System Selector Constraint Evaluator"
        );
    }
}
