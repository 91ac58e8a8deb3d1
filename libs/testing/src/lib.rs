//! Test fakes and fixtures shared by gantry crates.
//!
//! - [`ScriptedEvaluator`]: an `ExpressionEvaluator` with canned answers
//! - [`FixedMatchProvider`]: a `MatchProvider` over fixed rule lists
//! - [`fixtures`]: ready-made tasks, hosts and cluster facts

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Mutex;

use gantry_selector::{Context, EvaluatorError, ExpressionEvaluator, Match, MatchProvider};

/// What a [`ScriptedEvaluator`] answers for one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    True,
    False,
    Fail,
}

/// Evaluator returning scripted results and recording every call.
///
/// The literals `true` and `false` evaluate to themselves; any other
/// expression that was not scripted fails with `UnknownVariable`.
#[derive(Debug, Default)]
pub struct ScriptedEvaluator {
    outcomes: HashMap<String, Outcome>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn truthy(self, expression: &str) -> Self {
        self.script(expression, Outcome::True)
    }

    #[must_use]
    pub fn falsy(self, expression: &str) -> Self {
        self.script(expression, Outcome::False)
    }

    #[must_use]
    pub fn failing(self, expression: &str) -> Self {
        self.script(expression, Outcome::Fail)
    }

    #[must_use]
    pub fn script(mut self, expression: &str, outcome: Outcome) -> Self {
        self.outcomes.insert(expression.to_string(), outcome);
        self
    }

    /// Expressions evaluated so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self, expression: &str) -> usize {
        self.calls().iter().filter(|c| *c == expression).count()
    }
}

impl ExpressionEvaluator for ScriptedEvaluator {
    fn evaluate(&self, expression: &str, _context: &Context) -> Result<bool, EvaluatorError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(expression.to_string());
        }

        match self.outcomes.get(expression) {
            Some(Outcome::True) => Ok(true),
            Some(Outcome::False) => Ok(false),
            Some(Outcome::Fail) => Err(EvaluatorError::Evaluation {
                expression: expression.to_string(),
                message: "scripted failure".to_string(),
            }),
            None => match expression {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(EvaluatorError::UnknownVariable(other.to_string())),
            },
        }
    }
}

/// Provider serving the same rules on every call.
#[derive(Debug, Clone, Default)]
pub struct FixedMatchProvider {
    pub should: Vec<Match>,
    pub must: Vec<Match>,
}

impl FixedMatchProvider {
    pub fn should(rules: Vec<Match>) -> Self {
        Self {
            should: rules,
            must: Vec::new(),
        }
    }

    pub fn must(rules: Vec<Match>) -> Self {
        Self {
            should: Vec::new(),
            must: rules,
        }
    }
}

impl MatchProvider for FixedMatchProvider {
    fn active_rules(&self) -> Vec<Match> {
        self.should.clone()
    }

    fn must_rules(&self) -> Vec<Match> {
        self.must.clone()
    }
}

/// Install a test-friendly tracing subscriber once per process.
///
/// Honours `RUST_LOG`, defaulting to `debug` so the scorer's per-rule
/// records are formatted (and exercised) in tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}
