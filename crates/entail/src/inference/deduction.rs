//! Deduction tracking.
//!
//! Records how each formula was derived (rule + dependencies), the
//! goal-directed result of a rule application, and the proof tree linking a
//! deduction to the nodes justifying each dependency.

use super::rule::QualifiedName;
use crate::fol::{Formula, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An opaque metadata value attached to a deduction.
///
/// Built-in keys: `"constant"` (generalized constant, from exist-constant),
/// `"variable"` (generalized variable, from for-any-variable), and
/// `"DeductionTree"` (the proof tree, from the search meta-rule).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetaValue {
    Text(String),
    Term(Term),
    Formula(Formula),
    Tree(Box<DeductionNode>),
}

/// One derivation step: which rule produced which formula from which
/// already-known dependencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deduction {
    pub rule: QualifiedName,
    pub produced: Formula,
    pub dependencies: Vec<Formula>,
    pub metadata: BTreeMap<String, MetaValue>,
}

impl Deduction {
    pub fn new(rule: QualifiedName, produced: Formula, dependencies: Vec<Formula>) -> Self {
        Deduction {
            rule,
            produced,
            dependencies,
            metadata: BTreeMap::new(),
        }
    }

    /// The identity step recorded for a formula already in the context
    pub fn premise(f: Formula) -> Self {
        Deduction::new(QualifiedName::premise(), f, vec![])
    }

    pub fn is_premise(&self) -> bool {
        self.rule == QualifiedName::premise()
    }

    pub fn with_meta(mut self, key: &str, value: MetaValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Outcome of a goal-directed rule application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TowardResult {
    /// A single deduction that reaches the goal
    Reached(Deduction),
    /// Zero or more newly derived deductions that did not reach the goal
    NotReached(Vec<Deduction>),
}

impl TowardResult {
    /// The inapplicable case: nothing new, goal not reached
    pub fn none() -> Self {
        TowardResult::NotReached(Vec::new())
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, TowardResult::Reached(_))
    }

    /// Every deduction carried by the result, regardless of variant
    pub fn into_deductions(self) -> Vec<Deduction> {
        match self {
            TowardResult::Reached(d) => vec![d],
            TowardResult::NotReached(ds) => ds,
        }
    }
}

/// A node of the proof tree: a deduction together with the nodes justifying
/// each of its dependencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionNode {
    pub deduction: Deduction,
    pub children: Vec<DeductionNode>,
}

impl DeductionNode {
    pub fn new(deduction: Deduction, children: Vec<DeductionNode>) -> Self {
        DeductionNode {
            deduction,
            children,
        }
    }

    pub fn leaf(deduction: Deduction) -> Self {
        DeductionNode::new(deduction, Vec::new())
    }

    /// Pre-order traversal; the visitor returns `false` to stop early.
    /// Returns `false` iff the traversal was stopped.
    pub fn recur_apply(&self, visit: &mut dyn FnMut(&DeductionNode) -> bool) -> bool {
        if !visit(self) {
            return false;
        }
        for child in &self.children {
            if !child.recur_apply(visit) {
                return false;
            }
        }
        true
    }

    /// The context formulas this proof ultimately rests on: premise leaves in
    /// traversal order, without duplicates
    pub fn premise_leaves(&self) -> Vec<Formula> {
        let mut out: Vec<Formula> = Vec::new();
        self.recur_apply(&mut |node| {
            if node.deduction.is_premise() && !out.contains(&node.deduction.produced) {
                out.push(node.deduction.produced.clone());
            }
            true
        });
        out
    }
}
