//! Universal generalization over free variables

use super::deduction::{Deduction, MetaValue, TowardResult};
use super::rule::{Frontier, QualifiedName, Rule, TowardCollector};
use crate::error::Result;
use crate::fol::{Formula, FormulaContext, Term, Variable};
use std::collections::BTreeSet;

/// Metadata key recording which variable was generalized
pub const META_VARIABLE: &str = "variable";

/// From a fact `φ(x)` with `x` free, derive `∀x. φ(x)`. Free variables in
/// facts are read as implicitly universal, which makes the introduction
/// sound. A non-empty `terms` hint is intersected with the fact's free
/// variables.
pub struct ForAnyVariableRule;

impl Rule for ForAnyVariableRule {
    fn name(&self) -> QualifiedName {
        QualifiedName::logic("ForAnyVariable")
    }

    fn description(&self) -> &str {
        "From φ(x) with x free, derive ∀x. φ(x)"
    }

    fn apply_incremental(
        &self,
        _context: &FormulaContext,
        obtained: &Frontier,
        _formulas: &[Formula],
        terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        let hinted: Option<BTreeSet<Variable>> = if terms.is_empty() {
            None
        } else {
            Some(
                terms
                    .iter()
                    .filter_map(|t| match t {
                        Term::Variable(v) => Some(v.clone()),
                        _ => None,
                    })
                    .collect(),
            )
        };

        let mut collector = TowardCollector::new(desired);
        for subject in obtained {
            for variable in subject.variables() {
                if let Some(hints) = &hinted {
                    if !hints.contains(&variable) {
                        continue;
                    }
                }
                let produced = Formula::forall(subject.clone(), variable.clone());
                let deduction =
                    Deduction::new(self.name(), produced, vec![subject.clone()]).with_meta(
                        META_VARIABLE,
                        MetaValue::Term(Term::Variable(variable)),
                    );
                if collector.push(deduction) {
                    return Ok(collector.finish());
                }
            }
        }
        Ok(collector.finish())
    }
}
