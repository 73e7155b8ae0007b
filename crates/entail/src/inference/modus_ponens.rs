//! Modus ponens across known facts

use super::deduction::{Deduction, TowardResult};
use super::rule::{Frontier, QualifiedName, Rule, TowardCollector};
use crate::error::Result;
use crate::fol::{Formula, FormulaContext, Term};
use std::collections::BTreeSet;

/// Given an implication `P → Q` and a fact whose regular form equals that of
/// `P`, yields `Q` with dependencies on both. Implications and antecedents
/// are drawn from the context and the frontier together, with at least one of
/// the pair coming from the frontier, so a chain keeps firing as new
/// antecedents arrive.
///
/// A non-empty `formulas` hint restricts the implications considered to the
/// hinted ones (compared by regular form).
pub struct ImplyRule;

impl Rule for ImplyRule {
    fn name(&self) -> QualifiedName {
        QualifiedName::logic("Imply")
    }

    fn description(&self) -> &str {
        "Modus ponens: from P → Q and P, derive Q"
    }

    fn apply_incremental(
        &self,
        context: &FormulaContext,
        obtained: &Frontier,
        formulas: &[Formula],
        _terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        let hinted: Option<BTreeSet<Formula>> = if formulas.is_empty() {
            None
        } else {
            Some(formulas.iter().map(|f| f.regular_form()).collect())
        };

        // Everything known at this step; elements are regular forms already
        let mut known: BTreeSet<Formula> =
            context.regular_forms().keys().cloned().collect();
        known.extend(obtained.iter().cloned());

        let mut collector = TowardCollector::new(desired);
        for implication in &known {
            let Formula::Imply(antecedent, consequent) = implication else {
                continue;
            };
            if let Some(hints) = &hinted {
                if !hints.contains(&implication.regular_form()) {
                    continue;
                }
            }
            let antecedent_regular = antecedent.regular_form();
            // At least one side of the pair must be newly obtained
            let fact_known = if obtained.contains(implication) {
                known.contains(&antecedent_regular)
            } else {
                obtained.contains(&antecedent_regular)
            };
            if !fact_known {
                continue;
            }
            let deduction = Deduction::new(
                self.name(),
                (**consequent).clone(),
                vec![antecedent_regular, implication.clone()],
            );
            if collector.push(deduction) {
                return Ok(collector.finish());
            }
        }
        Ok(collector.finish())
    }
}
