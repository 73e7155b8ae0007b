//! Formulas in first-order logic
//!
//! The formula tree is a closed sum type: predicate and named-schema atoms at
//! the leaves, connectives and quantifiers above them. Conjunction and
//! disjunction are n-ary; their children are treated as multisets by the
//! regular form. Formulas are immutable values, cheap to clone and share.

use super::term::{Constant, Term, Variable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A predicate symbol with arity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PredicateSymbol {
    pub name: String,
    pub arity: usize,
}

impl PredicateSymbol {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        PredicateSymbol {
            name: name.into(),
            arity,
        }
    }

    /// The built-in equality predicate
    pub fn equality() -> Self {
        PredicateSymbol::new("=", 2)
    }

    pub fn is_equality(&self) -> bool {
        self.name == "=" && self.arity == 2
    }
}

/// A first-order formula.
///
/// The derived `Ord` doubles as the formula comparator: any stable total
/// order consistent with structural equality works, and the derived
/// lexicographic order on the tree is exactly that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Formula {
    /// Atomic predicate applied to terms
    Predicate(PredicateSymbol, Vec<Term>),
    /// Named schema atom with term parameters
    Named(String, Vec<Term>),
    /// Negation
    Not(Box<Formula>),
    /// N-ary conjunction
    And(Vec<Formula>),
    /// N-ary disjunction
    Or(Vec<Formula>),
    /// Implication
    Imply(Box<Formula>, Box<Formula>),
    /// Biconditional
    Equiv(Box<Formula>, Box<Formula>),
    /// Universal quantification
    ForAll(Box<Formula>, Variable),
    /// Existential quantification
    Exists(Box<Formula>, Variable),
}

impl Formula {
    pub fn pred(name: impl Into<String>, args: Vec<Term>) -> Formula {
        let arity = args.len();
        Formula::Predicate(PredicateSymbol::new(name, arity), args)
    }

    pub fn named(name: impl Into<String>, parameters: Vec<Term>) -> Formula {
        Formula::Named(name.into(), parameters)
    }

    pub fn equality(lhs: Term, rhs: Term) -> Formula {
        Formula::Predicate(PredicateSymbol::equality(), vec![lhs, rhs])
    }

    pub fn not(f: Formula) -> Formula {
        Formula::Not(Box::new(f))
    }

    pub fn and(children: Vec<Formula>) -> Formula {
        Formula::And(children)
    }

    pub fn or(children: Vec<Formula>) -> Formula {
        Formula::Or(children)
    }

    pub fn imply(p: Formula, q: Formula) -> Formula {
        Formula::Imply(Box::new(p), Box::new(q))
    }

    pub fn equiv(p: Formula, q: Formula) -> Formula {
        Formula::Equiv(Box::new(p), Box::new(q))
    }

    pub fn forall(body: Formula, v: Variable) -> Formula {
        Formula::ForAll(Box::new(body), v)
    }

    pub fn exists(body: Formula, v: Variable) -> Formula {
        Formula::Exists(Box::new(body), v)
    }

    /// Conjoin a list of formulas, splicing nested conjunctions and
    /// collapsing a singleton to its only element
    pub fn conjoin(mut parts: Vec<Formula>) -> Formula {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Formula::And(parts).flatten()
        }
    }

    /// Disjunctive counterpart of [`Formula::conjoin`]
    pub fn disjoin(mut parts: Vec<Formula>) -> Formula {
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Formula::Or(parts).flatten()
        }
    }

    /// Strict structural equality; associativity and commutativity are NOT
    /// applied (compare regular forms for that)
    pub fn is_identical_to(&self, other: &Formula) -> bool {
        self == other
    }

    /// Collapse nested conjunction into conjunction and nested disjunction
    /// into disjunction. Does not recurse into other node kinds.
    pub fn flatten(&self) -> Formula {
        fn splice(f: &Formula, conjunctive: bool, out: &mut Vec<Formula>) {
            match f {
                Formula::And(cs) if conjunctive => {
                    for c in cs {
                        splice(c, conjunctive, out);
                    }
                }
                Formula::Or(cs) if !conjunctive => {
                    for c in cs {
                        splice(c, conjunctive, out);
                    }
                }
                _ => out.push(f.clone()),
            }
        }
        match self {
            Formula::And(_) => {
                let mut out = Vec::new();
                splice(self, true, &mut out);
                Formula::And(out)
            }
            Formula::Or(_) => {
                let mut out = Vec::new();
                splice(self, false, &mut out);
                Formula::Or(out)
            }
            _ => self.clone(),
        }
    }

    /// Free variables of the formula
    pub fn variables(&self) -> BTreeSet<Variable> {
        let mut out = BTreeSet::new();
        self.collect_free_variables(&BTreeSet::new(), &mut out);
        out
    }

    fn collect_free_variables(&self, bound: &BTreeSet<Variable>, out: &mut BTreeSet<Variable>) {
        match self {
            Formula::Predicate(_, args) | Formula::Named(_, args) => {
                let mut vars = BTreeSet::new();
                for arg in args {
                    arg.collect_variables(&mut vars);
                }
                for v in vars {
                    if !bound.contains(&v) {
                        out.insert(v);
                    }
                }
            }
            Formula::Not(f) => f.collect_free_variables(bound, out),
            Formula::And(cs) | Formula::Or(cs) => {
                for c in cs {
                    c.collect_free_variables(bound, out);
                }
            }
            Formula::Imply(p, q) | Formula::Equiv(p, q) => {
                p.collect_free_variables(bound, out);
                q.collect_free_variables(bound, out);
            }
            Formula::ForAll(body, v) | Formula::Exists(body, v) => {
                let mut inner = bound.clone();
                inner.insert(v.clone());
                body.collect_free_variables(&inner, out);
            }
        }
    }

    /// All constants appearing in terms, in order of appearance (a multiset)
    pub fn all_constants(&self) -> Vec<Constant> {
        let mut out = Vec::new();
        self.collect_constants(&mut out);
        out
    }

    fn collect_constants(&self, out: &mut Vec<Constant>) {
        match self {
            Formula::Predicate(_, args) | Formula::Named(_, args) => {
                for arg in args {
                    arg.collect_constants(out);
                }
            }
            Formula::Not(f) => f.collect_constants(out),
            Formula::And(cs) | Formula::Or(cs) => {
                for c in cs {
                    c.collect_constants(out);
                }
            }
            Formula::Imply(p, q) | Formula::Equiv(p, q) => {
                p.collect_constants(out);
                q.collect_constants(out);
            }
            Formula::ForAll(body, _) | Formula::Exists(body, _) => body.collect_constants(out),
        }
    }

    /// All variable names in use, free and bound alike
    pub(crate) fn collect_var_names(&self, out: &mut BTreeSet<String>) {
        match self {
            Formula::Predicate(_, args) | Formula::Named(_, args) => {
                let mut vars = BTreeSet::new();
                for arg in args {
                    arg.collect_variables(&mut vars);
                }
                for v in vars {
                    out.insert(v.name);
                }
            }
            Formula::Not(f) => f.collect_var_names(out),
            Formula::And(cs) | Formula::Or(cs) => {
                for c in cs {
                    c.collect_var_names(out);
                }
            }
            Formula::Imply(p, q) | Formula::Equiv(p, q) => {
                p.collect_var_names(out);
                q.collect_var_names(out);
            }
            Formula::ForAll(body, v) | Formula::Exists(body, v) => {
                out.insert(v.name.clone());
                body.collect_var_names(out);
            }
        }
    }

    /// A variable guaranteed not to occur in this formula, free or bound.
    /// Deterministic: the first unused name in the `x0, x1, …` supply.
    pub fn next_var(&self) -> Variable {
        let mut names = BTreeSet::new();
        self.collect_var_names(&mut names);
        let mut i = 0usize;
        loop {
            let name = format!("x{}", i);
            if !names.contains(&name) {
                return Variable::new(name);
            }
            i += 1;
        }
    }

    /// Bottom-up term rewrite preserving the formula structure
    pub fn recur_map_term(&self, f: &impl Fn(Term) -> Term) -> Formula {
        self.map_args(&|t| t.recur_map(f))
    }

    /// Replace every occurrence of the term `from` by `to` in all atoms.
    /// When `from` is a variable, occurrences shadowed by a quantifier on the
    /// same variable are left alone.
    pub fn replace_term(&self, from: &Term, to: &Term) -> Formula {
        if let Term::Variable(v) = from {
            if let Formula::ForAll(_, bv) | Formula::Exists(_, bv) = self {
                if bv == v {
                    return self.clone();
                }
            }
        }
        match self {
            Formula::Predicate(p, args) => Formula::Predicate(
                p.clone(),
                args.iter().map(|a| a.replace_term(from, to)).collect(),
            ),
            Formula::Named(n, args) => Formula::Named(
                n.clone(),
                args.iter().map(|a| a.replace_term(from, to)).collect(),
            ),
            Formula::Not(f) => Formula::not(f.replace_term(from, to)),
            Formula::And(cs) => {
                Formula::And(cs.iter().map(|c| c.replace_term(from, to)).collect())
            }
            Formula::Or(cs) => Formula::Or(cs.iter().map(|c| c.replace_term(from, to)).collect()),
            Formula::Imply(p, q) => {
                Formula::imply(p.replace_term(from, to), q.replace_term(from, to))
            }
            Formula::Equiv(p, q) => {
                Formula::equiv(p.replace_term(from, to), q.replace_term(from, to))
            }
            Formula::ForAll(body, v) => {
                Formula::forall(body.replace_term(from, to), v.clone())
            }
            Formula::Exists(body, v) => {
                Formula::exists(body.replace_term(from, to), v.clone())
            }
        }
    }

    /// Check whether the term `sub` occurs anywhere in the formula's atoms
    pub fn contains_term(&self, sub: &Term) -> bool {
        match self {
            Formula::Predicate(_, args) | Formula::Named(_, args) => {
                args.iter().any(|a| a.contains_term(sub))
            }
            Formula::Not(f) => f.contains_term(sub),
            Formula::And(cs) | Formula::Or(cs) => cs.iter().any(|c| c.contains_term(sub)),
            Formula::Imply(p, q) | Formula::Equiv(p, q) => {
                p.contains_term(sub) || q.contains_term(sub)
            }
            Formula::ForAll(body, _) | Formula::Exists(body, _) => body.contains_term(sub),
        }
    }

    /// Strip `Term::Ref` splice markers from all atoms
    pub fn resolve_refs(&self) -> Formula {
        self.map_args(&|t| t.resolved())
    }

    /// Substitute free variables via a lookup map, scope-aware: a quantifier
    /// shadows its variable for the whole body.
    pub fn replace_var(&self, map: &BTreeMap<Variable, Term>) -> Formula {
        if map.is_empty() {
            return self.clone();
        }
        match self {
            Formula::Predicate(p, args) => Formula::Predicate(
                p.clone(),
                args.iter().map(|a| subst_term(a, map)).collect(),
            ),
            Formula::Named(n, args) => Formula::Named(
                n.clone(),
                args.iter().map(|a| subst_term(a, map)).collect(),
            ),
            Formula::Not(f) => Formula::not(f.replace_var(map)),
            Formula::And(cs) => Formula::And(cs.iter().map(|c| c.replace_var(map)).collect()),
            Formula::Or(cs) => Formula::Or(cs.iter().map(|c| c.replace_var(map)).collect()),
            Formula::Imply(p, q) => Formula::imply(p.replace_var(map), q.replace_var(map)),
            Formula::Equiv(p, q) => Formula::equiv(p.replace_var(map), q.replace_var(map)),
            Formula::ForAll(body, v) | Formula::Exists(body, v) => {
                let body = if map.contains_key(v) {
                    let mut inner = map.clone();
                    inner.remove(v);
                    body.replace_var(&inner)
                } else {
                    body.replace_var(map)
                };
                match self {
                    Formula::ForAll(..) => Formula::forall(body, v.clone()),
                    _ => Formula::exists(body, v.clone()),
                }
            }
        }
    }

    /// Substitute named-schema atoms via a lookup. The lookup receives the
    /// atom's name and parameters and returns the expansion, or `None` to
    /// leave the atom in place.
    pub fn replace_named(&self, lookup: &impl Fn(&str, &[Term]) -> Option<Formula>) -> Formula {
        match self {
            Formula::Named(name, params) => {
                lookup(name, params).unwrap_or_else(|| self.clone())
            }
            Formula::Predicate(..) => self.clone(),
            Formula::Not(f) => Formula::not(f.replace_named(lookup)),
            Formula::And(cs) => {
                Formula::And(cs.iter().map(|c| c.replace_named(lookup)).collect())
            }
            Formula::Or(cs) => Formula::Or(cs.iter().map(|c| c.replace_named(lookup)).collect()),
            Formula::Imply(p, q) => {
                Formula::imply(p.replace_named(lookup), q.replace_named(lookup))
            }
            Formula::Equiv(p, q) => {
                Formula::equiv(p.replace_named(lookup), q.replace_named(lookup))
            }
            Formula::ForAll(body, v) => Formula::forall(body.replace_named(lookup), v.clone()),
            Formula::Exists(body, v) => Formula::exists(body.replace_named(lookup), v.clone()),
        }
    }

    /// α-rename every bound variable from a fresh supply, outside-in and
    /// left-to-right, so no two quantifiers share a variable afterwards
    pub fn regularize_quantified_vars(&self, supply: &mut FreshVars) -> Formula {
        match self {
            Formula::Predicate(..) | Formula::Named(..) => self.clone(),
            Formula::Not(f) => Formula::not(f.regularize_quantified_vars(supply)),
            Formula::And(cs) => Formula::And(
                cs.iter()
                    .map(|c| c.regularize_quantified_vars(supply))
                    .collect(),
            ),
            Formula::Or(cs) => Formula::Or(
                cs.iter()
                    .map(|c| c.regularize_quantified_vars(supply))
                    .collect(),
            ),
            Formula::Imply(p, q) => Formula::imply(
                p.regularize_quantified_vars(supply),
                q.regularize_quantified_vars(supply),
            ),
            Formula::Equiv(p, q) => Formula::equiv(
                p.regularize_quantified_vars(supply),
                q.regularize_quantified_vars(supply),
            ),
            Formula::ForAll(body, v) | Formula::Exists(body, v) => {
                let fresh = supply.next();
                let mut map = BTreeMap::new();
                map.insert(v.clone(), Term::Variable(fresh.clone()));
                let body = body.replace_var(&map).regularize_quantified_vars(supply);
                match self {
                    Formula::ForAll(..) => Formula::forall(body, fresh),
                    _ => Formula::exists(body, fresh),
                }
            }
        }
    }

    /// Apply a whole-term map to every atom argument
    fn map_args(&self, f: &impl Fn(&Term) -> Term) -> Formula {
        match self {
            Formula::Predicate(p, args) => {
                Formula::Predicate(p.clone(), args.iter().map(f).collect())
            }
            Formula::Named(n, args) => Formula::Named(n.clone(), args.iter().map(f).collect()),
            Formula::Not(inner) => Formula::not(inner.map_args(f)),
            Formula::And(cs) => Formula::And(cs.iter().map(|c| c.map_args(f)).collect()),
            Formula::Or(cs) => Formula::Or(cs.iter().map(|c| c.map_args(f)).collect()),
            Formula::Imply(p, q) => Formula::imply(p.map_args(f), q.map_args(f)),
            Formula::Equiv(p, q) => Formula::equiv(p.map_args(f), q.map_args(f)),
            Formula::ForAll(body, v) => Formula::forall(body.map_args(f), v.clone()),
            Formula::Exists(body, v) => Formula::exists(body.map_args(f), v.clone()),
        }
    }
}

fn subst_term(t: &Term, map: &BTreeMap<Variable, Term>) -> Term {
    match t {
        Term::Variable(v) => map.get(v).cloned().unwrap_or_else(|| t.clone()),
        Term::Constant(_) => t.clone(),
        Term::Function(f, args) => Term::Function(
            f.clone(),
            args.iter().map(|a| subst_term(a, map)).collect(),
        ),
        Term::Ref(_) => t.clone(),
    }
}

/// Deterministic supply of fresh variables: `v0, v1, …`, skipping any name
/// already in use by the formulas it was seeded from
#[derive(Debug, Clone, Default)]
pub struct FreshVars {
    counter: usize,
    used: BTreeSet<String>,
}

impl FreshVars {
    pub fn new() -> Self {
        FreshVars::default()
    }

    /// A supply that avoids every variable name occurring in `f`
    pub fn excluding(f: &Formula) -> Self {
        let mut used = BTreeSet::new();
        f.collect_var_names(&mut used);
        FreshVars { counter: 0, used }
    }

    pub fn next(&mut self) -> Variable {
        loop {
            let name = format!("v{}", self.counter);
            self.counter += 1;
            if self.used.insert(name.clone()) {
                return Variable::new(name);
            }
        }
    }
}

// Display implementations

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Predicate(p, args) => {
                if p.is_equality() && args.len() == 2 {
                    write!(f, "{} = {}", args[0], args[1])
                } else if args.is_empty() {
                    write!(f, "{}", p.name)
                } else {
                    write!(f, "{}(", p.name)?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ")")
                }
            }
            Formula::Named(name, params) => {
                if params.is_empty() {
                    write!(f, "{}", name)
                } else {
                    write!(f, "{}(", name)?;
                    for (i, p) in params.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", p)?;
                    }
                    write!(f, ")")
                }
            }
            Formula::Not(inner) => write!(f, "¬{}", paren(inner)),
            Formula::And(cs) => join(f, cs, " ∧ "),
            Formula::Or(cs) => join(f, cs, " ∨ "),
            Formula::Imply(p, q) => write!(f, "({} → {})", p, q),
            Formula::Equiv(p, q) => write!(f, "({} ↔ {})", p, q),
            Formula::ForAll(body, v) => write!(f, "(∀{}. {})", v, body),
            Formula::Exists(body, v) => write!(f, "(∃{}. {})", v, body),
        }
    }
}

fn paren(f: &Formula) -> String {
    match f {
        Formula::Predicate(..) | Formula::Named(..) | Formula::Not(_) => format!("{}", f),
        _ => format!("({})", f),
    }
}

fn join(f: &mut fmt::Formatter<'_>, children: &[Formula], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, c) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", c)?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p_of(t: Term) -> Formula {
        Formula::pred("p", vec![t])
    }

    #[test]
    fn test_flatten_collapses_same_connective_only() {
        let a = Formula::pred("a", vec![]);
        let b = Formula::pred("b", vec![]);
        let c = Formula::pred("c", vec![]);

        let nested = Formula::and(vec![a.clone(), Formula::and(vec![b.clone(), c.clone()])]);
        assert_eq!(
            nested.flatten(),
            Formula::and(vec![a.clone(), b.clone(), c.clone()])
        );

        // An OR nested under AND is left alone
        let mixed = Formula::and(vec![a.clone(), Formula::or(vec![b, c])]);
        assert_eq!(mixed.flatten(), mixed);
    }

    #[test]
    fn test_free_variables_exclude_bound() {
        let x = Variable::new("x");
        let y = Variable::new("y");
        let body = Formula::pred("r", vec![Term::Variable(x.clone()), Term::Variable(y.clone())]);
        let quantified = Formula::forall(body, x.clone());

        let free = quantified.variables();
        assert!(!free.contains(&x));
        assert!(free.contains(&y));
    }

    #[test]
    fn test_next_var_avoids_bound_names() {
        let f = Formula::forall(p_of(Term::var("x0")), Variable::new("x0"));
        assert_eq!(f.next_var(), Variable::new("x1"));
    }

    #[test]
    fn test_replace_var_respects_shadowing() {
        let x = Variable::new("x");
        let inner = Formula::forall(p_of(Term::Variable(x.clone())), x.clone());
        let outer = Formula::and(vec![p_of(Term::Variable(x.clone())), inner.clone()]);

        let mut map = BTreeMap::new();
        map.insert(x.clone(), Term::constant("a"));
        let replaced = outer.replace_var(&map);

        // Free occurrence replaced, bound occurrence untouched
        assert_eq!(
            replaced,
            Formula::and(vec![p_of(Term::constant("a")), inner])
        );
    }

    #[test]
    fn test_replace_named_expands_schema_atoms() {
        let f = Formula::and(vec![
            Formula::named("phi", vec![Term::constant("a")]),
            Formula::pred("q", vec![]),
        ]);
        let expanded = f.replace_named(&|name, params| {
            (name == "phi").then(|| Formula::pred("p", params.to_vec()))
        });
        assert_eq!(
            expanded,
            Formula::and(vec![
                Formula::pred("p", vec![Term::constant("a")]),
                Formula::pred("q", vec![]),
            ])
        );
    }

    #[test]
    fn test_regularize_quantified_vars_standardizes_apart() {
        let x = Variable::new("x");
        let f = Formula::and(vec![
            Formula::forall(p_of(Term::Variable(x.clone())), x.clone()),
            Formula::exists(p_of(Term::Variable(x.clone())), x.clone()),
        ]);

        let mut supply = FreshVars::excluding(&f);
        let renamed = f.regularize_quantified_vars(&mut supply);

        let expected = Formula::and(vec![
            Formula::forall(p_of(Term::var("v0")), Variable::new("v0")),
            Formula::exists(p_of(Term::var("v1")), Variable::new("v1")),
        ]);
        assert_eq!(renamed, expected);
    }

    #[test]
    fn test_recur_map_term_rewrites_bottom_up() {
        let f = p_of(Term::fun("f", vec![Term::constant("a")]));
        let mapped = f.recur_map_term(&|t| {
            if t == Term::constant("a") {
                Term::constant("b")
            } else {
                t
            }
        });
        assert_eq!(mapped, p_of(Term::fun("f", vec![Term::constant("b")])));
    }
}
