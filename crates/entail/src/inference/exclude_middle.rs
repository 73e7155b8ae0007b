//! The law of the excluded middle, goal-directed

use super::deduction::{Deduction, TowardResult};
use super::rule::{Frontier, QualifiedName, Rule};
use crate::error::Result;
use crate::fol::{Formula, FormulaContext, Term};

/// Succeeds iff the goal has the shape `P ∨ ¬P`, with no dependencies.
/// Produces no intermediate deductions.
pub struct ExcludeMiddleRule;

impl Rule for ExcludeMiddleRule {
    fn name(&self) -> QualifiedName {
        QualifiedName::logic("ExcludeMiddle")
    }

    fn description(&self) -> &str {
        "Close a goal of the shape P ∨ ¬P"
    }

    fn apply_incremental(
        &self,
        _context: &FormulaContext,
        _obtained: &Frontier,
        _formulas: &[Formula],
        _terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        let Some(goal) = desired else {
            return Ok(TowardResult::none());
        };
        let Formula::Or(children) = goal.flatten() else {
            return Ok(TowardResult::none());
        };
        if children.len() != 2 {
            return Ok(TowardResult::none());
        }

        let complementary = |a: &Formula, b: &Formula| match b {
            Formula::Not(inner) => a.regular_form() == inner.regular_form(),
            _ => false,
        };
        if complementary(&children[0], &children[1]) || complementary(&children[1], &children[0]) {
            Ok(TowardResult::Reached(Deduction::new(
                self.name(),
                goal.clone(),
                vec![],
            )))
        } else {
            Ok(TowardResult::none())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Formula {
        Formula::pred(name, vec![])
    }

    #[test]
    fn test_closes_excluded_middle_goal() {
        let goal = Formula::or(vec![atom("p"), Formula::not(atom("p"))]);
        let result = ExcludeMiddleRule
            .apply_toward(&FormulaContext::new(), &[], &[], &goal)
            .unwrap();
        match result {
            TowardResult::Reached(d) => {
                assert_eq!(d.produced, goal);
                assert!(d.dependencies.is_empty());
            }
            TowardResult::NotReached(_) => panic!("expected goal to close"),
        }
    }

    #[test]
    fn test_order_of_disjuncts_is_irrelevant() {
        let goal = Formula::or(vec![Formula::not(atom("p")), atom("p")]);
        assert!(ExcludeMiddleRule
            .apply_toward(&FormulaContext::new(), &[], &[], &goal)
            .unwrap()
            .is_reached());
    }

    #[test]
    fn test_unrelated_disjunction_is_not_reached() {
        let goal = Formula::or(vec![atom("p"), Formula::not(atom("q"))]);
        let result = ExcludeMiddleRule
            .apply_toward(&FormulaContext::new(), &[], &[], &goal)
            .unwrap();
        assert_eq!(result, TowardResult::none());
    }
}
