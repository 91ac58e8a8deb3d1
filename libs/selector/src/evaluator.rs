//! Collaborator traits used by the scorer and the constraint.

use crate::{
    ClusterFacts, Context, EvaluatorError, HostState, Match, SchedulerConfig, TaskRequest,
};

/// Evaluates a boolean rule expression against a context.
///
/// Implementations should be deterministic for a given
/// `(expression, context)` pair. They may block; callers impose no timeout.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str, context: &Context) -> Result<bool, EvaluatorError>;
}

impl<F> ExpressionEvaluator for F
where
    F: Fn(&str, &Context) -> Result<bool, EvaluatorError> + Send + Sync,
{
    fn evaluate(&self, expression: &str, context: &Context) -> Result<bool, EvaluatorError> {
        self(expression, context)
    }
}

/// Supplies the currently active selection rules.
///
/// Called on every scoring pass, so implementations should return a cheap
/// snapshot.
pub trait MatchProvider: Send + Sync {
    /// Soft rules used for fitness scoring. May be empty.
    fn active_rules(&self) -> Vec<Match>;

    /// Hard rules used for constraint checks.
    fn must_rules(&self) -> Vec<Match> {
        Vec::new()
    }
}

/// Assembles the evaluation context for a (task, host) pair.
pub trait ContextBuilder: Send + Sync {
    fn build(
        &self,
        task: &TaskRequest,
        host: &HostState,
        cluster: &ClusterFacts,
        config: &SchedulerConfig,
    ) -> Context;
}
