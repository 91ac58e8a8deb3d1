//! System selector fitness calculator.
//!
//! Scores a host for a task as the fraction of applicable `should` rules the
//! host matches:
//!
//! ```text
//! score = positive / evaluations        (positive > 0)
//!       = NO_MATCH_SCORE                (otherwise)
//! ```
//!
//! where `evaluations` counts rules whose `select` held and `positive`
//! counts those whose `match` held too. The floor keeps every host
//! selectable when no preference applies.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    ClusterFacts, Context, ContextBuilder, EvaluatorError, ExpressionEvaluator, HostState, Match,
    MatchProvider, SchedulerConfig, Score, TaskRequest,
};

/// Score returned when no rule applies or none of the applicable rules match.
pub const NO_MATCH_SCORE: Score = 0.01;

/// Name the scheduler reports for this fitness calculator.
pub const FITNESS_CALCULATOR_NAME: &str = "System Selector Fitness Calculator";

/// Stateless fitness calculator over the active `should` rules.
///
/// Safe to share between scheduling threads; every call fetches a fresh rule
/// snapshot from the [`MatchProvider`].
#[derive(Clone)]
pub struct FitnessScorer {
    provider: Arc<dyn MatchProvider>,
    evaluator: Arc<dyn ExpressionEvaluator>,
    context_builder: Arc<dyn ContextBuilder>,
    config: Arc<SchedulerConfig>,
}

impl FitnessScorer {
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
        FITNESS_CALCULATOR_NAME
    }

    /// Fitness of `host` for `task` under the currently active rules.
    #[instrument(skip_all, fields(task_id = %task.id(), host_id = %host.id()))]
    pub fn calculate_fitness(
        &self,
        task: &TaskRequest,
        host: &HostState,
        cluster: &ClusterFacts,
    ) -> Score {
        let matches = self.provider.active_rules();
        if matches.is_empty() {
            return NO_MATCH_SCORE;
        }

        let context = self.context_builder.build(task, host, cluster, &self.config);
        self.score(task, host, &matches, &context)
    }

    /// Score `matches` against a prepared context.
    ///
    /// Evaluator failures count as `false` and never reach the caller.
    pub fn score(
        &self,
        task: &TaskRequest,
        host: &HostState,
        matches: &[Match],
        context: &Context,
    ) -> Score {
        let mut evaluations = 0u64;
        let mut positive = 0u64;

        for rule in matches {
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

            let matched = evaluate_rule_expression(
                self.evaluator.as_ref(),
                ExpressionKind::Match,
                &rule.match_expr,
                task,
                host,
                context,
            )
            .unwrap_or(false);

            evaluations += 1;
            if matched {
                positive += 1;
            }
        }

        if evaluations == 0 || positive == 0 {
            return NO_MATCH_SCORE;
        }
        positive as f64 / evaluations as f64
    }
}

impl std::fmt::Debug for FitnessScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FitnessScorer")
            .field("name", &self.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExpressionKind {
    Select,
    Match,
}

impl ExpressionKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Select => "select",
            Self::Match => "match",
        }
    }
}

/// Evaluate one rule expression, logging the outcome at debug.
pub(crate) fn evaluate_rule_expression(
    evaluator: &dyn ExpressionEvaluator,
    kind: ExpressionKind,
    expression: &str,
    task: &TaskRequest,
    host: &HostState,
    context: &Context,
) -> Result<bool, EvaluatorError> {
    match evaluator.evaluate(expression, context) {
        Ok(result) => {
            debug!(
                kind = kind.as_str(),
                expression,
                task_id = %task.id(),
                host_id = %host.id(),
                result,
                "Evaluated selector expression"
            );
            Ok(result)
        }
        Err(e) => {
            debug!(
                kind = kind.as_str(),
                expression,
                task_id = %task.id(),
                host_id = %host.id(),
                error = %e,
                "Selector expression failed to evaluate"
            );
            Err(e)
        }
    }
}
