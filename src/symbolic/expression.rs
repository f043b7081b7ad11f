//! Compiled user expressions.
//!
//! `ExpressionCompiler` turns expression text into an `Expression`: source text, parsed tree and
//! a compiled evaluator that never panics. What the evaluator returns when it cannot produce a
//! number is an explicit `FailureValue` chosen by the caller:
//! - a plotted primary curve uses `FailureValue::Undefined` so the line visibly breaks,
//! - a deformation baseline uses `FailureValue::Zero` to keep the arithmetic finite.
use crate::errors::SculptError;
use crate::symbolic::parse_expr::parse_expression_func;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_lambdify::LambdifiedFn;
use log::{debug, warn};
use std::fmt;
use strum_macros::Display;

/// value returned by an `Expression` when it cannot produce a finite number
#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum FailureValue {
    /// NaN
    Undefined,
    Zero,
    Value(f64),
}

impl FailureValue {
    pub fn value(&self) -> f64 {
        match self {
            FailureValue::Undefined => f64::NAN,
            FailureValue::Zero => 0.0,
            FailureValue::Value(v) => *v,
        }
    }
}

/// Stateless compiler configuration: the ordered free variables and the failure policy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionCompiler {
    variables: Vec<String>,
    failure: FailureValue,
}

impl ExpressionCompiler {
    pub fn new(variables: &[&str], failure: FailureValue) -> Self {
        ExpressionCompiler {
            variables: variables.iter().map(|v| v.to_string()).collect(),
            failure,
        }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn failure(&self) -> FailureValue {
        self.failure
    }

    /// Compiles `text`. Never fails: a parse error gives an expression that evaluates to the
    /// failure value everywhere and keeps the error for the caller to surface.
    pub fn compile(&self, text: &str) -> Expression {
        let vars: Vec<&str> = self.variables.iter().map(String::as_str).collect();
        let compiled = parse_expression_func(text).and_then(|expr| {
            let evaluator = expr.lambdify_borrowed_thread_safe(&vars).map_err(|e| match e {
                SculptError::Parse { message, .. } => SculptError::parse(text, message),
                other => other,
            })?;
            Ok((expr, evaluator))
        });
        match compiled {
            Ok((expr, evaluator)) => {
                debug!("compiled '{}' over {:?}", text, self.variables);
                Expression {
                    source: text.to_string(),
                    expr: Some(expr),
                    evaluator: Some(evaluator),
                    variables: self.variables.clone(),
                    failure: self.failure,
                    error: None,
                }
            }
            Err(error) => {
                warn!("{}", error);
                Expression {
                    source: text.to_string(),
                    expr: None,
                    evaluator: None,
                    variables: self.variables.clone(),
                    failure: self.failure,
                    error: Some(error),
                }
            }
        }
    }
}

/// Immutable compiled expression. Replace it wholesale when the text changes.
pub struct Expression {
    source: String,
    expr: Option<Expr>,
    evaluator: Option<LambdifiedFn>,
    variables: Vec<String>,
    failure: FailureValue,
    error: Option<SculptError>,
}

impl Expression {
    /// Evaluates at `args` (ordered like the compiler's variables). Returns the failure value
    /// for this input only when the result is not finite.
    pub fn eval(&self, args: &[f64]) -> f64 {
        match &self.evaluator {
            Some(f) if args.len() >= self.variables.len() => {
                let value = f(args);
                if value.is_finite() {
                    value
                } else {
                    self.failure.value()
                }
            }
            _ => self.failure.value(),
        }
    }

    /// same as `eval` but `None` instead of the failure value
    pub fn try_eval(&self, args: &[f64]) -> Option<f64> {
        let f = self.evaluator.as_ref()?;
        if args.len() < self.variables.len() {
            return None;
        }
        Some(f(args)).filter(|v| v.is_finite())
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&SculptError> {
        self.error.as_ref()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// the right hand side actually compiled, without any `lhs =` prefix
    pub fn rhs(&self) -> &str {
        crate::symbolic::utils::strip_lhs(&self.source)
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn failure(&self) -> FailureValue {
        self.failure
    }

    /// Pretty-printed form for display/editing; falls back to the raw source if it did not parse.
    pub fn pretty(&self) -> String {
        match &self.expr {
            Some(expr) => expr.to_string(),
            None => self.source.trim().to_string(),
        }
    }

    /// the same text compiled again with another failure policy
    pub fn with_failure(&self, failure: FailureValue) -> Expression {
        let vars: Vec<&str> = self.variables.iter().map(String::as_str).collect();
        ExpressionCompiler::new(&vars, failure).compile(&self.source)
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expression")
            .field("source", &self.source)
            .field("variables", &self.variables)
            .field("failure", &self.failure)
            .field("error", &self.error)
            .finish()
    }
}

impl Clone for Expression {
    fn clone(&self) -> Self {
        self.with_failure(self.failure)
    }
}
