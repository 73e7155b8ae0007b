//! The rule abstraction.
//!
//! Every rule works incrementally against a frontier of newly obtained
//! regular forms; the goal-free `apply` and the whole-context `apply_toward`
//! are provided wrappers that run the incremental method over every regular
//! form in the context.

use super::deduction::{Deduction, TowardResult};
use crate::error::Result;
use crate::fol::{Formula, FormulaContext, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Namespace of every built-in rule
pub const LOGIC_NAMESPACE: &str = "logic";

/// A namespaced rule name, e.g. `logic::DoubleNegate`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace: String,
    pub local: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        QualifiedName {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    pub fn logic(local: impl Into<String>) -> Self {
        QualifiedName::new(LOGIC_NAMESPACE, local)
    }

    /// The reserved name for identity steps on context formulas
    pub fn premise() -> Self {
        QualifiedName::logic("Premise")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.namespace, self.local)
    }
}

/// The frontier: regular forms newly obtained in the previous search step,
/// iterated in the formula order
pub type Frontier = BTreeSet<Formula>;

/// Every regular form known to the context, as a frontier
pub fn frontier_of(context: &FormulaContext) -> Frontier {
    context.regular_forms().keys().cloned().collect()
}

/// A logical inference rule.
///
/// `formulas` and `terms` are optional user hints: when non-empty they bias
/// or restrict the rule's choices (which constant to generalize, which
/// implication to chase). Inapplicability is `Ok(NotReached(vec![]))`, never
/// an error; errors only signal matcher/builder contract violations.
pub trait Rule {
    fn name(&self) -> QualifiedName;

    fn description(&self) -> &str;

    /// Goal-directed application restricted to the frontier `obtained`.
    /// With `desired: None` the rule derives without a goal check.
    fn apply_incremental(
        &self,
        context: &FormulaContext,
        obtained: &Frontier,
        formulas: &[Formula],
        terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult>;

    /// Goal-directed application over the whole context
    fn apply_toward(
        &self,
        context: &FormulaContext,
        formulas: &[Formula],
        terms: &[Term],
        desired: &Formula,
    ) -> Result<TowardResult> {
        let obtained = frontier_of(context);
        self.apply_incremental(context, &obtained, formulas, terms, Some(desired))
    }

    /// Forward single-step: derive everything this rule can derive from the
    /// whole context, ignoring any goal
    fn apply(
        &self,
        context: &FormulaContext,
        formulas: &[Formula],
        terms: &[Term],
    ) -> Result<Vec<Deduction>> {
        let obtained = frontier_of(context);
        Ok(self
            .apply_incremental(context, &obtained, formulas, terms, None)?
            .into_deductions())
    }
}

/// Accumulates deductions and short-circuits as soon as one reaches the goal
/// (goal comparison is up to regular form)
pub(crate) struct TowardCollector {
    goal: Option<Formula>,
    reached: Option<Deduction>,
    items: Vec<Deduction>,
}

impl TowardCollector {
    pub fn new(desired: Option<&Formula>) -> Self {
        TowardCollector {
            goal: desired.map(|g| g.regular_form()),
            reached: None,
            items: Vec::new(),
        }
    }

    /// Add a deduction; returns `true` once the goal has been reached and
    /// the caller should stop producing
    pub fn push(&mut self, deduction: Deduction) -> bool {
        if let Some(goal) = &self.goal {
            if deduction.produced.regular_form() == *goal {
                self.reached = Some(deduction);
                return true;
            }
        }
        self.items.push(deduction);
        false
    }

    pub fn finish(self) -> TowardResult {
        match self.reached {
            Some(d) => TowardResult::Reached(d),
            None => TowardResult::NotReached(self.items),
        }
    }
}
