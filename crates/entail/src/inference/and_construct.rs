//! Goal-directed conjunction introduction

use super::deduction::{Deduction, TowardResult};
use super::rule::{Frontier, QualifiedName, Rule};
use crate::error::Result;
use crate::fol::{Formula, FormulaContext, Term};

/// Succeeds iff the goal is a conjunction and every conjunct is already
/// known, assembling the proof from those witnesses. Witnesses may come from
/// the persistent context or from the frontier; the rule produces no
/// intermediate deductions.
pub struct AndConstructRule;

impl Rule for AndConstructRule {
    fn name(&self) -> QualifiedName {
        QualifiedName::logic("AndConstruct")
    }

    fn description(&self) -> &str {
        "Close a conjunction goal from known witnesses for every conjunct"
    }

    fn apply_incremental(
        &self,
        context: &FormulaContext,
        obtained: &Frontier,
        _formulas: &[Formula],
        _terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        let Some(goal) = desired else {
            return Ok(TowardResult::none());
        };
        let Formula::And(children) = goal.flatten() else {
            return Ok(TowardResult::none());
        };

        let mut dependencies = Vec::with_capacity(children.len());
        for child in &children {
            let regular = child.regular_form();
            if let Some(witness) = context.representative(&regular) {
                dependencies.push(witness.clone());
            } else if obtained.contains(&regular) {
                dependencies.push(regular);
            } else {
                return Ok(TowardResult::none());
            }
        }

        Ok(TowardResult::Reached(Deduction::new(
            self.name(),
            goal.clone(),
            dependencies,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Formula {
        Formula::pred(name, vec![])
    }

    #[test]
    fn test_closes_goal_from_context_witnesses() {
        let context = FormulaContext::from_formulas(vec![atom("p"), atom("q")]);
        let goal = Formula::and(vec![atom("p"), atom("q")]);

        let result = AndConstructRule
            .apply_toward(&context, &[], &[], &goal)
            .unwrap();
        match result {
            TowardResult::Reached(d) => {
                assert_eq!(d.produced, goal);
                assert_eq!(d.dependencies, vec![atom("p"), atom("q")]);
            }
            TowardResult::NotReached(_) => panic!("expected goal to close"),
        }
    }

    #[test]
    fn test_witness_may_come_from_frontier() {
        let context = FormulaContext::from_formulas(vec![atom("p")]);
        let obtained: Frontier = [atom("q")].into_iter().collect();
        let goal = Formula::and(vec![atom("p"), atom("q")]);

        let result = AndConstructRule
            .apply_incremental(&context, &obtained, &[], &[], Some(&goal))
            .unwrap();
        assert!(result.is_reached());
    }

    #[test]
    fn test_missing_conjunct_is_not_reached() {
        let context = FormulaContext::from_formulas(vec![atom("p")]);
        let goal = Formula::and(vec![atom("p"), atom("q")]);
        let result = AndConstructRule
            .apply_toward(&context, &[], &[], &goal)
            .unwrap();
        assert_eq!(result, TowardResult::none());
    }

    #[test]
    fn test_non_conjunction_goal_is_ignored() {
        let context = FormulaContext::from_formulas(vec![atom("p")]);
        let result = AndConstructRule
            .apply_toward(&context, &[], &[], &atom("p"))
            .unwrap();
        assert_eq!(result, TowardResult::none());
    }
}
