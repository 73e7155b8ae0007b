//! Schematic rules: a matcher pattern paired with a replacer expression.
//!
//! A replacer receives the bindings of one match plus the matched subformula
//! (the latter for fresh-variable supply) and builds the replacement. The
//! unidirectional flavor rewrites one way; the equivalence flavor carries
//! both directions and applies them both.

use super::deduction::{Deduction, TowardResult};
use super::rule::{Frontier, QualifiedName, Rule, TowardCollector};
use crate::error::Result;
use crate::fol::{Formula, FormulaContext, Term};
use crate::matcher::{FormulaMatcher, MatchBinding};

/// Builds the replacement formula from one match
pub type Replacer = Box<dyn Fn(&MatchBinding, &Formula) -> Result<Formula> + Send + Sync>;

/// A unidirectional schematic rule: one pattern, one replacer
pub struct MatcherRule {
    name: QualifiedName,
    description: String,
    matcher: FormulaMatcher,
    replacer: Replacer,
}

impl MatcherRule {
    pub fn new(
        local: &str,
        description: &str,
        matcher: FormulaMatcher,
        replacer: Replacer,
    ) -> Self {
        MatcherRule {
            name: QualifiedName::logic(local),
            description: description.into(),
            matcher,
            replacer,
        }
    }

    /// All rewrites of `f`, at any subformula position
    pub fn apply_one(&self, f: &Formula) -> Result<Vec<Formula>> {
        Ok(self
            .matcher
            .replace_one_with(f, &*self.replacer)?
            .into_iter()
            .map(|(g, _)| g)
            .collect())
    }
}

impl Rule for MatcherRule {
    fn name(&self) -> QualifiedName {
        self.name.clone()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply_incremental(
        &self,
        _context: &FormulaContext,
        obtained: &Frontier,
        _formulas: &[Formula],
        _terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        run_schematic(&self.name, obtained, desired, &|f| self.apply_one(f))
    }
}

/// An equivalence schematic rule: two patterns with replacers in both
/// directions; `apply_one` yields the rewrites of both
pub struct MatcherEquivRule {
    name: QualifiedName,
    description: String,
    forward: (FormulaMatcher, Replacer),
    backward: (FormulaMatcher, Replacer),
}

impl MatcherEquivRule {
    pub fn new(
        local: &str,
        description: &str,
        forward: (FormulaMatcher, Replacer),
        backward: (FormulaMatcher, Replacer),
    ) -> Self {
        MatcherEquivRule {
            name: QualifiedName::logic(local),
            description: description.into(),
            forward,
            backward,
        }
    }

    pub fn apply_one(&self, f: &Formula) -> Result<Vec<Formula>> {
        let mut out: Vec<Formula> = self
            .forward
            .0
            .replace_one_with(f, &*self.forward.1)?
            .into_iter()
            .map(|(g, _)| g)
            .collect();
        out.extend(
            self.backward
                .0
                .replace_one_with(f, &*self.backward.1)?
                .into_iter()
                .map(|(g, _)| g),
        );
        Ok(out)
    }
}

impl Rule for MatcherEquivRule {
    fn name(&self) -> QualifiedName {
        self.name.clone()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn apply_incremental(
        &self,
        _context: &FormulaContext,
        obtained: &Frontier,
        _formulas: &[Formula],
        _terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        run_schematic(&self.name, obtained, desired, &|f| self.apply_one(f))
    }
}

/// Shared rule-level loop: rewrite every frontier subject, emit one deduction
/// per rewrite, short-circuit on the goal
fn run_schematic(
    name: &QualifiedName,
    obtained: &Frontier,
    desired: Option<&Formula>,
    apply_one: &dyn Fn(&Formula) -> Result<Vec<Formula>>,
) -> Result<TowardResult> {
    let mut collector = TowardCollector::new(desired);
    for subject in obtained {
        for produced in apply_one(subject)? {
            let deduction = Deduction::new(name.clone(), produced, vec![subject.clone()]);
            if collector.push(deduction) {
                return Ok(collector.finish());
            }
        }
    }
    Ok(collector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchBinding;

    fn atom(name: &str) -> Formula {
        Formula::pred(name, vec![])
    }

    fn double_negate_forward() -> MatcherRule {
        MatcherRule::new(
            "TestDoubleNegate",
            "¬¬P rewrites to P",
            FormulaMatcher::not(FormulaMatcher::not(FormulaMatcher::any("P"))),
            Box::new(|b: &MatchBinding, _: &Formula| b.formula("P").cloned()),
        )
    }

    #[test]
    fn test_apply_one_rewrites_everywhere() {
        let rule = double_negate_forward();
        let f = Formula::and(vec![Formula::not(Formula::not(atom("a"))), atom("b")]);
        let results = rule.apply_one(&f).unwrap();
        assert_eq!(results, vec![Formula::and(vec![atom("a"), atom("b")])]);
    }

    #[test]
    fn test_reaches_goal_through_frontier() {
        let rule = double_negate_forward();
        let subject = Formula::not(Formula::not(atom("a"))).regular_form();
        let obtained: Frontier = [subject.clone()].into_iter().collect();
        let goal = atom("a");

        let result = rule
            .apply_incremental(
                &FormulaContext::new(),
                &obtained,
                &[],
                &[],
                Some(&goal),
            )
            .unwrap();
        match result {
            TowardResult::Reached(d) => {
                assert_eq!(d.produced, atom("a"));
                assert_eq!(d.dependencies, vec![subject]);
            }
            TowardResult::NotReached(_) => panic!("goal should be reached"),
        }
    }

    #[test]
    fn test_inapplicable_is_empty_not_reached() {
        let rule = double_negate_forward();
        let obtained: Frontier = [atom("a")].into_iter().collect();
        let result = rule
            .apply_incremental(&FormulaContext::new(), &obtained, &[], &[], None)
            .unwrap();
        assert_eq!(result, TowardResult::none());
    }
}
