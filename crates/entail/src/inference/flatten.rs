//! Flattening of nested conjunctions and disjunctions

use super::deduction::{Deduction, TowardResult};
use super::rule::{Frontier, QualifiedName, Rule, TowardCollector};
use crate::error::Result;
use crate::fol::{Formula, FormulaContext, Term};

/// Collapses a nested AND into its parent AND, and a nested OR into its
/// parent OR. Other node kinds are left untouched.
pub struct FlattenRule;

impl Rule for FlattenRule {
    fn name(&self) -> QualifiedName {
        QualifiedName::logic("Flatten")
    }

    fn description(&self) -> &str {
        "Collapse nested conjunctions and disjunctions one level"
    }

    fn apply_incremental(
        &self,
        _context: &FormulaContext,
        obtained: &Frontier,
        _formulas: &[Formula],
        _terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        let mut collector = TowardCollector::new(desired);
        for subject in obtained {
            let flat = subject.flatten();
            if flat != *subject {
                let deduction =
                    Deduction::new(self.name(), flat, vec![subject.clone()]);
                if collector.push(deduction) {
                    return Ok(collector.finish());
                }
            }
        }
        Ok(collector.finish())
    }
}
