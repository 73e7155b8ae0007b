//! Regular form: the canonical representative of a formula's equivalence
//! class under AND/OR associativity and commutativity, duplicate
//! conjunct/disjunct removal, and bound-variable renaming.
//!
//! Canonicalization works bottom-up: children are regularized first, nested
//! conjunctions/disjunctions are spliced, duplicates removed, children sorted
//! by the formula order, and a singleton collapses to its only element. Bound
//! variables are renamed to reserved names keyed by quantifier nesting depth
//! (`#0`, `#1`, …); the name of a binder therefore depends only on how many
//! quantifiers enclose it, never on sibling order, which is what makes
//! sorting after renaming well-defined.

use super::formula::Formula;
use super::term::{Term, Variable};
use std::collections::BTreeMap;

impl Formula {
    /// The canonical representative of this formula. Pure and deterministic;
    /// two formulas have identical regular forms iff they are equivalent
    /// modulo AC of ∧/∨, duplicate removal, and α-renaming.
    pub fn regular_form(&self) -> Formula {
        self.regularize(0, &BTreeMap::new())
    }

    fn regularize(&self, depth: usize, renaming: &BTreeMap<String, String>) -> Formula {
        match self {
            Formula::Predicate(p, args) => Formula::Predicate(
                p.clone(),
                args.iter().map(|t| rename_term(t, renaming)).collect(),
            ),
            Formula::Named(n, args) => Formula::Named(
                n.clone(),
                args.iter().map(|t| rename_term(t, renaming)).collect(),
            ),
            Formula::Not(f) => Formula::not(f.regularize(depth, renaming)),
            Formula::And(cs) => {
                let mut out: Vec<Formula> = Vec::new();
                for c in cs {
                    match c.regularize(depth, renaming) {
                        Formula::And(inner) => out.extend(inner),
                        r => out.push(r),
                    }
                }
                out.sort();
                out.dedup();
                if out.len() == 1 {
                    out.pop().unwrap()
                } else {
                    Formula::And(out)
                }
            }
            Formula::Or(cs) => {
                let mut out: Vec<Formula> = Vec::new();
                for c in cs {
                    match c.regularize(depth, renaming) {
                        Formula::Or(inner) => out.extend(inner),
                        r => out.push(r),
                    }
                }
                out.sort();
                out.dedup();
                if out.len() == 1 {
                    out.pop().unwrap()
                } else {
                    Formula::Or(out)
                }
            }
            Formula::Imply(p, q) => Formula::imply(
                p.regularize(depth, renaming),
                q.regularize(depth, renaming),
            ),
            Formula::Equiv(p, q) => Formula::equiv(
                p.regularize(depth, renaming),
                q.regularize(depth, renaming),
            ),
            Formula::ForAll(body, v) | Formula::Exists(body, v) => {
                let fresh = format!("#{}", depth);
                let mut inner = renaming.clone();
                inner.insert(v.name.clone(), fresh.clone());
                let body = body.regularize(depth + 1, &inner);
                match self {
                    Formula::ForAll(..) => Formula::forall(body, Variable::new(fresh)),
                    _ => Formula::exists(body, Variable::new(fresh)),
                }
            }
        }
    }
}

fn rename_term(t: &Term, renaming: &BTreeMap<String, String>) -> Term {
    match t {
        Term::Variable(v) => match renaming.get(&v.name) {
            Some(fresh) => Term::Variable(Variable::new(fresh.clone())),
            None => t.clone(),
        },
        Term::Constant(_) => t.clone(),
        Term::Function(f, args) => Term::Function(
            f.clone(),
            args.iter().map(|a| rename_term(a, renaming)).collect(),
        ),
        Term::Ref(inner) => rename_term(inner, renaming),
    }
}
