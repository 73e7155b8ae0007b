//! Bounded forward search: the meta-rule composing the whole catalog.
//!
//! The search runs breadth-first to a fixed point or a depth bound, keying
//! everything it derives by regular form so equivalent derivations collapse
//! into one node. Provenance is kept as a tree of deduction nodes; when the
//! goal is reached the tree is attached to the result and its premise leaves
//! become the flat dependency list.

use crate::error::Result;
use crate::fol::{Formula, FormulaContext, Term};
use crate::inference::{
    catalog, Deduction, DeductionNode, Frontier, MetaValue, QualifiedName, Rule, TowardResult,
};
use indexmap::IndexMap;

/// Metadata key carrying the proof tree on a successful search
pub const META_DEDUCTION_TREE: &str = "DeductionTree";

/// Default number of search iterations
pub const DEFAULT_SEARCH_DEPTH: usize = 3;

/// The composite rule `logic::Logic`: iterates every built-in rule against
/// the frontier, admits whatever is new, and repeats up to `search_depth`
/// times.
///
/// One invocation owns its working context, its reached table, and its
/// frontier; nothing escapes, and two invocations with identical inputs
/// produce identical results, deduction trees included.
pub struct AllLogicRule {
    pub search_depth: usize,
}

impl AllLogicRule {
    pub fn new(search_depth: usize) -> Self {
        AllLogicRule { search_depth }
    }
}

impl Default for AllLogicRule {
    fn default() -> Self {
        AllLogicRule::new(DEFAULT_SEARCH_DEPTH)
    }
}

impl Rule for AllLogicRule {
    fn name(&self) -> QualifiedName {
        QualifiedName::logic("Logic")
    }

    fn description(&self) -> &str {
        "Chain every built-in rule breadth-first up to the search depth"
    }

    fn apply_incremental(
        &self,
        context: &FormulaContext,
        obtained: &Frontier,
        formulas: &[Formula],
        terms: &[Term],
        desired: Option<&Formula>,
    ) -> Result<TowardResult> {
        let rules = catalog();
        let mut working = context.clone();

        // One identity node per known fact, keyed by regular form
        let mut reached: IndexMap<Formula, DeductionNode> = IndexMap::new();
        for (regular, original) in working.regular_forms() {
            reached.insert(
                regular.clone(),
                DeductionNode::leaf(Deduction::premise(original.clone())),
            );
        }

        let mut obtained = obtained.clone();
        // Every admitted deduction, for the goal-free path
        let mut admitted: Vec<Deduction> = Vec::new();

        for _ in 0..self.search_depth {
            let mut new_obtained = Frontier::new();
            let mut applied = false;

            for rule in &rules {
                match rule.apply_incremental(&working, &obtained, formulas, terms, desired)? {
                    TowardResult::Reached(deduction) => {
                        let node = node_for(&deduction, &reached);
                        let dependencies = node.premise_leaves();
                        let produced = match desired {
                            Some(goal) => goal.clone(),
                            None => deduction.produced.clone(),
                        };
                        return Ok(TowardResult::Reached(
                            Deduction::new(self.name(), produced, dependencies).with_meta(
                                META_DEDUCTION_TREE,
                                MetaValue::Tree(Box::new(node)),
                            ),
                        ));
                    }
                    TowardResult::NotReached(deductions) => {
                        for deduction in deductions {
                            let regular = deduction.produced.regular_form();
                            if reached.contains_key(&regular) {
                                continue;
                            }
                            let node = node_for(&deduction, &reached);
                            reached.insert(regular.clone(), node);
                            new_obtained.insert(regular);
                            admitted.push(deduction);
                            applied = true;
                        }
                    }
                }
            }

            if !applied {
                break;
            }
            for formula in std::mem::take(&mut obtained) {
                if !working.contains(&formula) {
                    working.add(formula);
                }
            }
            obtained = new_obtained;
        }

        Ok(TowardResult::NotReached(if desired.is_some() {
            Vec::new()
        } else {
            admitted
        }))
    }
}

/// Wrap a deduction in a node whose children justify its dependencies
fn node_for(deduction: &Deduction, reached: &IndexMap<Formula, DeductionNode>) -> DeductionNode {
    let children = deduction
        .dependencies
        .iter()
        .filter_map(|dep| reached.get(&dep.regular_form()).cloned())
        .collect();
    DeductionNode::new(deduction.clone(), children)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Formula {
        Formula::pred(name, vec![])
    }

    fn search(context: &FormulaContext, goal: &Formula) -> TowardResult {
        AllLogicRule::default()
            .apply_toward(context, &[], &[], goal)
            .unwrap()
    }

    #[test]
    fn test_goal_already_derivable_in_one_step() {
        let context = FormulaContext::from_formulas(vec![
            atom("p"),
            Formula::imply(atom("p"), atom("q")),
        ]);
        let result = search(&context, &atom("q"));

        let TowardResult::Reached(d) = result else {
            panic!("expected a proof");
        };
        assert_eq!(d.rule, QualifiedName::logic("Logic"));
        assert_eq!(d.produced, atom("q"));
        assert_eq!(
            d.dependencies,
            vec![atom("p"), Formula::imply(atom("p"), atom("q"))]
        );
        assert!(matches!(
            d.metadata.get(META_DEDUCTION_TREE),
            Some(MetaValue::Tree(_))
        ));
    }

    #[test]
    fn test_unreachable_goal_exhausts_to_empty() {
        let context = FormulaContext::from_formulas(vec![atom("p")]);
        let result = search(&context, &atom("q"));
        assert_eq!(result, TowardResult::NotReached(vec![]));
    }

    #[test]
    fn test_goal_free_apply_returns_all_new_deductions() {
        let context = FormulaContext::from_formulas(vec![
            atom("p"),
            Formula::imply(atom("p"), atom("q")),
        ]);
        let deductions = AllLogicRule::new(1).apply(&context, &[], &[]).unwrap();
        assert!(deductions.iter().any(|d| d.produced == atom("q")));
        // Everything admitted is new: no regular form repeats
        let mut seen = std::collections::BTreeSet::new();
        for d in &deductions {
            assert!(seen.insert(d.produced.regular_form()));
        }
    }

    #[test]
    fn test_zero_depth_never_searches() {
        let context = FormulaContext::from_formulas(vec![
            atom("p"),
            Formula::imply(atom("p"), atom("q")),
        ]);
        let result = AllLogicRule::new(0)
            .apply_toward(&context, &[], &[], &atom("q"))
            .unwrap();
        assert_eq!(result, TowardResult::NotReached(vec![]));
    }
}
