//! Existential generalization over constants

use super::deduction::{Deduction, MetaValue, TowardResult};
use super::rule::{Frontier, QualifiedName, Rule, TowardCollector};
use crate::error::Result;
use crate::fol::{Constant, Formula, FormulaContext, Term};
use std::collections::BTreeSet;

/// Metadata key recording which constant was generalized
pub const META_CONSTANT: &str = "constant";

/// From a fact `φ(c)` containing the constant `c`, derive `∃x. φ(x)` with a
/// fresh bound variable replacing every occurrence of `c`. A non-empty
/// `terms` hint restricts generalization to the hinted constants.
pub struct ExistConstantRule;

impl Rule for ExistConstantRule {
    fn name(&self) -> QualifiedName {
        QualifiedName::logic("ExistConstant")
    }

    fn description(&self) -> &str {
        "From φ(c) for a constant c, derive ∃x. φ(x)"
    }

    fn apply_incremental(
        &self,
        _context: &FormulaContext,
        obtained: &Frontier,
        _formulas: &[Formula],
        terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        let hinted: Option<BTreeSet<Constant>> = if terms.is_empty() {
            None
        } else {
            Some(
                terms
                    .iter()
                    .filter_map(|t| match t {
                        Term::Constant(c) => Some(c.clone()),
                        _ => None,
                    })
                    .collect(),
            )
        };

        let mut collector = TowardCollector::new(desired);
        for subject in obtained {
            let mut seen = BTreeSet::new();
            for constant in subject.all_constants() {
                if !seen.insert(constant.clone()) {
                    continue;
                }
                if let Some(hints) = &hinted {
                    if !hints.contains(&constant) {
                        continue;
                    }
                }
                let fresh = subject.next_var();
                let body = subject.replace_term(
                    &Term::Constant(constant.clone()),
                    &Term::Variable(fresh.clone()),
                );
                let produced = Formula::exists(body, fresh);
                let deduction =
                    Deduction::new(self.name(), produced, vec![subject.clone()]).with_meta(
                        META_CONSTANT,
                        MetaValue::Term(Term::Constant(constant)),
                    );
                if collector.push(deduction) {
                    return Ok(collector.finish());
                }
            }
        }
        Ok(collector.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fol::Variable;

    #[test]
    fn test_generalizes_constant() {
        let fact = Formula::pred("p", vec![Term::constant("a")]);
        let obtained: Frontier = [fact.clone()].into_iter().collect();

        let result = ExistConstantRule
            .apply_incremental(&FormulaContext::new(), &obtained, &[], &[], None)
            .unwrap();
        let ds = result.into_deductions();
        assert_eq!(ds.len(), 1);
        assert_eq!(
            ds[0].produced,
            Formula::exists(
                Formula::pred("p", vec![Term::var("x0")]),
                Variable::new("x0")
            )
        );
        assert_eq!(
            ds[0].metadata.get(META_CONSTANT),
            Some(&MetaValue::Term(Term::constant("a")))
        );
    }

    #[test]
    fn test_reaches_alpha_variant_goal() {
        let fact = Formula::pred("p", vec![Term::constant("a")]);
        let obtained: Frontier = [fact].into_iter().collect();
        let x = Variable::new("x");
        let goal = Formula::exists(
            Formula::pred("p", vec![Term::Variable(x.clone())]),
            x,
        );

        let result = ExistConstantRule
            .apply_incremental(&FormulaContext::new(), &obtained, &[], &[], Some(&goal))
            .unwrap();
        assert!(result.is_reached());
    }

    #[test]
    fn test_each_distinct_constant_once() {
        let fact = Formula::pred(
            "r",
            vec![Term::constant("a"), Term::constant("b"), Term::constant("a")],
        );
        let obtained: Frontier = [fact].into_iter().collect();

        let result = ExistConstantRule
            .apply_incremental(&FormulaContext::new(), &obtained, &[], &[], None)
            .unwrap();
        // One generalization per distinct constant; both occurrences of `a`
        // are replaced together
        let ds = result.into_deductions();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_term_hint_restricts_constants() {
        let fact = Formula::pred("r", vec![Term::constant("a"), Term::constant("b")]);
        let obtained: Frontier = [fact].into_iter().collect();

        let result = ExistConstantRule
            .apply_incremental(
                &FormulaContext::new(),
                &obtained,
                &[],
                &[Term::constant("b")],
                None,
            )
            .unwrap();
        let ds = result.into_deductions();
        assert_eq!(ds.len(), 1);
        assert_eq!(
            ds[0].metadata.get(META_CONSTANT),
            Some(&MetaValue::Term(Term::constant("b")))
        );
    }
}
