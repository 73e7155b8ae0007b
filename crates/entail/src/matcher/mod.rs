//! Pattern matching over formulas
//!
//! A `FormulaMatcher` is a pattern tree mirroring the formula tree, extended
//! with three kinds of holes: formula holes (`P`, `Q`, …) that capture whole
//! subformulas, term holes (`x`, `y`, …) that capture terms, and schema holes
//! (`phi(x)`) that capture a formula *abstracted over* the terms bound to
//! their arguments. AND/OR patterns match children as multisets, optionally
//! capturing the unmatched remainder under a formula hole.
//!
//! The engine is a plain recursive matcher; a repeated hole must match a
//! subject equal to its first binding up to regular form, which is what makes
//! patterns like `P ∧ (P ∨ Q)` work on associative-commutative subjects.

use crate::error::{EngineError, Result};
use crate::fol::{Formula, FunctionSymbol, PredicateSymbol, Term, Variable};
use std::collections::BTreeMap;

/// A pattern over terms
#[derive(Debug, Clone)]
pub enum TermMatcher {
    /// Capture any term under a name
    Hole(String),
    /// Match exactly this term
    Exact(Term),
    /// Match a function application argument-wise
    Function(FunctionSymbol, Vec<TermMatcher>),
}

impl TermMatcher {
    pub fn hole(name: impl Into<String>) -> Self {
        TermMatcher::Hole(name.into())
    }
}

/// A pattern over formulas
#[derive(Debug, Clone)]
pub enum FormulaMatcher {
    /// Capture any formula under a name
    Any(String),
    /// Capture any formula abstracted over the terms its arguments resolve to
    Schema { name: String, args: Vec<TermMatcher> },
    /// Match a named-schema atom literally
    Named { name: String, args: Vec<TermMatcher> },
    /// Match a predicate atom argument-wise
    Predicate {
        predicate: PredicateSymbol,
        args: Vec<TermMatcher>,
    },
    Not(Box<FormulaMatcher>),
    /// Multiset match over conjunction children; `rest`, when present, must
    /// capture a non-empty remainder
    And {
        parts: Vec<FormulaMatcher>,
        rest: Option<String>,
    },
    /// Multiset match over disjunction children
    Or {
        parts: Vec<FormulaMatcher>,
        rest: Option<String>,
    },
    Imply(Box<FormulaMatcher>, Box<FormulaMatcher>),
    Equiv(Box<FormulaMatcher>, Box<FormulaMatcher>),
    /// Match a universal quantifier, binding its variable to the term hole
    ForAll(Box<FormulaMatcher>, String),
    /// Match an existential quantifier likewise
    Exists(Box<FormulaMatcher>, String),
}

/// A formula captured by a schema hole, abstracted over parameter terms
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaBinding {
    pub name: String,
    pub body: Formula,
    pub params: Vec<Term>,
}

impl SchemaBinding {
    /// Apply the schema to new arguments: every occurrence of `params[i]` in
    /// the body is replaced by `args[i]`. Replacement goes through
    /// `Term::Ref` splice markers so arguments containing a parameter are not
    /// substituted twice.
    pub fn instantiate(&self, args: &[Term]) -> Result<Formula> {
        if args.len() != self.params.len() {
            return Err(EngineError::SchemaArity {
                name: self.name.clone(),
                expected: self.params.len(),
                got: args.len(),
            });
        }
        let mut out = self.body.clone();
        for (param, arg) in self.params.iter().zip(args) {
            let wrapped = Term::Ref(Box::new(arg.clone()));
            out = out.replace_term(param, &wrapped);
        }
        Ok(out.resolve_refs())
    }
}

/// Bindings accumulated by one successful match
#[derive(Debug, Clone, Default)]
pub struct MatchBinding {
    pub formulas: BTreeMap<String, Formula>,
    pub terms: BTreeMap<String, Term>,
    pub schemas: BTreeMap<String, SchemaBinding>,
}

impl MatchBinding {
    pub fn formula(&self, name: &str) -> Result<&Formula> {
        self.formulas
            .get(name)
            .ok_or_else(|| EngineError::UnboundFormulaHole(name.into()))
    }

    pub fn term(&self, name: &str) -> Result<&Term> {
        self.terms
            .get(name)
            .ok_or_else(|| EngineError::UnboundTermHole(name.into()))
    }

    /// The variable bound to a term hole (quantifier patterns always bind
    /// variables)
    pub fn variable(&self, name: &str) -> Result<Variable> {
        match self.term(name)? {
            Term::Variable(v) => Ok(v.clone()),
            _ => Err(EngineError::TermHoleNotVariable(name.into())),
        }
    }

    pub fn schema(&self, name: &str) -> Result<&SchemaBinding> {
        self.schemas
            .get(name)
            .ok_or_else(|| EngineError::UnboundSchemaHole(name.into()))
    }

    fn bind_formula(&self, name: &str, f: &Formula) -> Option<MatchBinding> {
        match self.formulas.get(name) {
            Some(prev) => (prev.regular_form() == f.regular_form()).then(|| self.clone()),
            None => {
                let mut next = self.clone();
                next.formulas.insert(name.into(), f.clone());
                Some(next)
            }
        }
    }

    fn bind_term(&self, name: &str, t: &Term) -> Option<MatchBinding> {
        match self.terms.get(name) {
            Some(prev) => (prev == t).then(|| self.clone()),
            None => {
                let mut next = self.clone();
                next.terms.insert(name.into(), t.clone());
                Some(next)
            }
        }
    }
}

impl FormulaMatcher {
    pub fn any(name: impl Into<String>) -> Self {
        FormulaMatcher::Any(name.into())
    }

    pub fn schema(name: impl Into<String>, args: Vec<TermMatcher>) -> Self {
        FormulaMatcher::Schema {
            name: name.into(),
            args,
        }
    }

    pub fn not(inner: FormulaMatcher) -> Self {
        FormulaMatcher::Not(Box::new(inner))
    }

    pub fn imply(p: FormulaMatcher, q: FormulaMatcher) -> Self {
        FormulaMatcher::Imply(Box::new(p), Box::new(q))
    }

    pub fn equiv(p: FormulaMatcher, q: FormulaMatcher) -> Self {
        FormulaMatcher::Equiv(Box::new(p), Box::new(q))
    }

    pub fn forall(body: FormulaMatcher, var_hole: impl Into<String>) -> Self {
        FormulaMatcher::ForAll(Box::new(body), var_hole.into())
    }

    pub fn exists(body: FormulaMatcher, var_hole: impl Into<String>) -> Self {
        FormulaMatcher::Exists(Box::new(body), var_hole.into())
    }

    pub fn and(parts: Vec<FormulaMatcher>, rest: Option<&str>) -> Self {
        FormulaMatcher::And {
            parts,
            rest: rest.map(Into::into),
        }
    }

    pub fn or(parts: Vec<FormulaMatcher>, rest: Option<&str>) -> Self {
        FormulaMatcher::Or {
            parts,
            rest: rest.map(Into::into),
        }
    }

    /// Build a matcher from an example formula. In strict mode every term
    /// must match exactly; otherwise the example's variables become term
    /// holes of the same name.
    pub fn from_formula(f: &Formula, strict: bool) -> FormulaMatcher {
        fn term(t: &Term, strict: bool) -> TermMatcher {
            if strict {
                return TermMatcher::Exact(t.clone());
            }
            match t {
                Term::Variable(v) => TermMatcher::Hole(v.name.clone()),
                Term::Constant(_) => TermMatcher::Exact(t.clone()),
                Term::Function(fs, args) => TermMatcher::Function(
                    fs.clone(),
                    args.iter().map(|a| term(a, strict)).collect(),
                ),
                Term::Ref(inner) => term(inner, strict),
            }
        }
        match f {
            Formula::Predicate(p, args) => FormulaMatcher::Predicate {
                predicate: p.clone(),
                args: args.iter().map(|a| term(a, strict)).collect(),
            },
            Formula::Named(n, args) => FormulaMatcher::Named {
                name: n.clone(),
                args: args.iter().map(|a| term(a, strict)).collect(),
            },
            Formula::Not(g) => FormulaMatcher::not(Self::from_formula(g, strict)),
            Formula::And(cs) => FormulaMatcher::And {
                parts: cs.iter().map(|c| Self::from_formula(c, strict)).collect(),
                rest: None,
            },
            Formula::Or(cs) => FormulaMatcher::Or {
                parts: cs.iter().map(|c| Self::from_formula(c, strict)).collect(),
                rest: None,
            },
            Formula::Imply(p, q) => FormulaMatcher::imply(
                Self::from_formula(p, strict),
                Self::from_formula(q, strict),
            ),
            Formula::Equiv(p, q) => FormulaMatcher::equiv(
                Self::from_formula(p, strict),
                Self::from_formula(q, strict),
            ),
            Formula::ForAll(body, v) => {
                FormulaMatcher::forall(Self::from_formula(body, strict), v.name.clone())
            }
            Formula::Exists(body, v) => {
                FormulaMatcher::exists(Self::from_formula(body, strict), v.name.clone())
            }
        }
    }

    /// All ways this pattern matches the subject at its root
    pub fn matches(&self, subject: &Formula) -> Result<Vec<MatchBinding>> {
        match_formula(self, subject, &MatchBinding::default())
    }

    /// Rewrite the subject at every position where this pattern matches.
    ///
    /// For each subformula position and each binding there, `transform` is
    /// called with the binding and the matched subformula; its result is
    /// spliced back into the whole subject. Positions are visited root-first.
    pub fn replace_one_with<F>(
        &self,
        subject: &Formula,
        transform: &F,
    ) -> Result<Vec<(Formula, MatchBinding)>>
    where
        F: Fn(&MatchBinding, &Formula) -> Result<Formula> + ?Sized,
    {
        let mut out = Vec::new();
        for binding in self.matches(subject)? {
            let replaced = transform(&binding, subject)?;
            out.push((replaced, binding));
        }
        match subject {
            Formula::Predicate(..) | Formula::Named(..) => {}
            Formula::Not(inner) => {
                for (r, b) in self.replace_one_with(inner, transform)? {
                    out.push((Formula::not(r), b));
                }
            }
            Formula::And(cs) | Formula::Or(cs) => {
                let conjunctive = matches!(subject, Formula::And(_));
                for (i, child) in cs.iter().enumerate() {
                    for (r, b) in self.replace_one_with(child, transform)? {
                        let mut next = cs.clone();
                        next[i] = r;
                        out.push((
                            if conjunctive {
                                Formula::And(next)
                            } else {
                                Formula::Or(next)
                            },
                            b,
                        ));
                    }
                }
            }
            Formula::Imply(p, q) => {
                for (r, b) in self.replace_one_with(p, transform)? {
                    out.push((Formula::imply(r, (**q).clone()), b));
                }
                for (r, b) in self.replace_one_with(q, transform)? {
                    out.push((Formula::imply((**p).clone(), r), b));
                }
            }
            Formula::Equiv(p, q) => {
                for (r, b) in self.replace_one_with(p, transform)? {
                    out.push((Formula::equiv(r, (**q).clone()), b));
                }
                for (r, b) in self.replace_one_with(q, transform)? {
                    out.push((Formula::equiv((**p).clone(), r), b));
                }
            }
            Formula::ForAll(body, v) => {
                for (r, b) in self.replace_one_with(body, transform)? {
                    out.push((Formula::forall(r, v.clone()), b));
                }
            }
            Formula::Exists(body, v) => {
                for (r, b) in self.replace_one_with(body, transform)? {
                    out.push((Formula::exists(r, v.clone()), b));
                }
            }
        }
        Ok(out)
    }
}

fn match_formula(
    pattern: &FormulaMatcher,
    subject: &Formula,
    binding: &MatchBinding,
) -> Result<Vec<MatchBinding>> {
    match (pattern, subject) {
        (FormulaMatcher::Any(name), _) => Ok(binding.bind_formula(name, subject).into_iter().collect()),
        (FormulaMatcher::Schema { name, args }, _) => {
            let params: Vec<Term> = args
                .iter()
                .map(|a| resolve_term(a, binding))
                .collect::<Result<_>>()?;
            match binding.schemas.get(name) {
                Some(prev) => {
                    let inst = prev.instantiate(&params)?;
                    if inst.regular_form() == subject.regular_form() {
                        Ok(vec![binding.clone()])
                    } else {
                        Ok(vec![])
                    }
                }
                None => {
                    let mut next = binding.clone();
                    next.schemas.insert(
                        name.clone(),
                        SchemaBinding {
                            name: name.clone(),
                            body: subject.clone(),
                            params,
                        },
                    );
                    Ok(vec![next])
                }
            }
        }
        (FormulaMatcher::Named { name, args }, Formula::Named(sn, sargs))
            if name == sn && args.len() == sargs.len() =>
        {
            match_term_seq(args, sargs, binding)
        }
        (FormulaMatcher::Predicate { predicate, args }, Formula::Predicate(sp, sargs))
            if predicate == sp && args.len() == sargs.len() =>
        {
            match_term_seq(args, sargs, binding)
        }
        (FormulaMatcher::Not(p), Formula::Not(f)) => match_formula(p, f, binding),
        (FormulaMatcher::Imply(p1, p2), Formula::Imply(f1, f2)) => {
            let mut out = Vec::new();
            for b1 in match_formula(p1, f1, binding)? {
                out.extend(match_formula(p2, f2, &b1)?);
            }
            Ok(out)
        }
        (FormulaMatcher::Equiv(p1, p2), Formula::Equiv(f1, f2)) => {
            let mut out = Vec::new();
            for b1 in match_formula(p1, f1, binding)? {
                out.extend(match_formula(p2, f2, &b1)?);
            }
            Ok(out)
        }
        (FormulaMatcher::ForAll(body, var_hole), Formula::ForAll(sbody, v))
        | (FormulaMatcher::Exists(body, var_hole), Formula::Exists(sbody, v)) => {
            match binding.bind_term(var_hole, &Term::Variable(v.clone())) {
                Some(b1) => match_formula(body, sbody, &b1),
                None => Ok(vec![]),
            }
        }
        (FormulaMatcher::And { parts, rest }, Formula::And(children)) => {
            ac_match(parts, rest.as_deref(), children, binding, true)
        }
        (FormulaMatcher::Or { parts, rest }, Formula::Or(children)) => {
            ac_match(parts, rest.as_deref(), children, binding, false)
        }
        _ => Ok(vec![]),
    }
}

fn match_term_seq(
    patterns: &[TermMatcher],
    terms: &[Term],
    binding: &MatchBinding,
) -> Result<Vec<MatchBinding>> {
    let mut current = binding.clone();
    for (p, t) in patterns.iter().zip(terms) {
        match match_term(p, t, &current) {
            Some(next) => current = next,
            None => return Ok(vec![]),
        }
    }
    Ok(vec![current])
}

fn match_term(pattern: &TermMatcher, term: &Term, binding: &MatchBinding) -> Option<MatchBinding> {
    match (pattern, term) {
        (TermMatcher::Hole(name), _) => binding.bind_term(name, term),
        (TermMatcher::Exact(t), _) => (t == term).then(|| binding.clone()),
        (TermMatcher::Function(fs, args), Term::Function(tf, targs))
            if fs == tf && args.len() == targs.len() =>
        {
            let mut current = binding.clone();
            for (p, t) in args.iter().zip(targs) {
                current = match_term(p, t, &current)?;
            }
            Some(current)
        }
        _ => None,
    }
}

fn resolve_term(pattern: &TermMatcher, binding: &MatchBinding) -> Result<Term> {
    match pattern {
        TermMatcher::Hole(name) => binding.term(name).cloned(),
        TermMatcher::Exact(t) => Ok(t.clone()),
        TermMatcher::Function(fs, args) => Ok(Term::Function(
            fs.clone(),
            args.iter()
                .map(|a| resolve_term(a, binding))
                .collect::<Result<_>>()?,
        )),
    }
}

/// Multiset matching: assign each pattern part to a distinct child, in every
/// possible way, then bind the remainder under the rest hole (which requires
/// the remainder to be non-empty) or require an exact cover.
fn ac_match(
    parts: &[FormulaMatcher],
    rest: Option<&str>,
    children: &[Formula],
    binding: &MatchBinding,
    conjunctive: bool,
) -> Result<Vec<MatchBinding>> {
    match rest {
        None if parts.len() != children.len() => return Ok(vec![]),
        Some(_) if parts.len() >= children.len() => return Ok(vec![]),
        _ => {}
    }

    let mut assignments: Vec<(MatchBinding, Vec<bool>)> = Vec::new();
    assign_parts(
        parts,
        0,
        children,
        &mut vec![false; children.len()],
        binding,
        &mut assignments,
    )?;

    let mut out = Vec::new();
    for (b, used) in assignments {
        match rest {
            None => out.push(b),
            Some(name) => {
                let remaining: Vec<Formula> = children
                    .iter()
                    .zip(&used)
                    .filter(|(_, u)| !**u)
                    .map(|(c, _)| c.clone())
                    .collect();
                let rest_formula = if conjunctive {
                    Formula::conjoin(remaining)
                } else {
                    Formula::disjoin(remaining)
                };
                if let Some(bound) = b.bind_formula(name, &rest_formula) {
                    out.push(bound);
                }
            }
        }
    }
    Ok(out)
}

fn assign_parts(
    parts: &[FormulaMatcher],
    part_idx: usize,
    children: &[Formula],
    used: &mut Vec<bool>,
    binding: &MatchBinding,
    out: &mut Vec<(MatchBinding, Vec<bool>)>,
) -> Result<()> {
    if part_idx == parts.len() {
        out.push((binding.clone(), used.clone()));
        return Ok(());
    }
    for i in 0..children.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        for next in match_formula(&parts[part_idx], &children[i], binding)? {
            assign_parts(parts, part_idx + 1, children, used, &next, out)?;
        }
        used[i] = false;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(name: &str) -> Formula {
        Formula::pred(name, vec![])
    }

    #[test]
    fn test_formula_hole_repeats_up_to_regular_form() {
        // P ∧ P against (a ∨ b) ∧ (b ∨ a)
        let pattern = FormulaMatcher::and(
            vec![FormulaMatcher::any("P"), FormulaMatcher::any("P")],
            None,
        );
        let subject = Formula::and(vec![
            Formula::or(vec![atom("a"), atom("b")]),
            Formula::or(vec![atom("b"), atom("a")]),
        ]);
        let bindings = pattern.matches(&subject).unwrap();
        assert!(!bindings.is_empty());
    }

    #[test]
    fn test_rest_capture_requires_remainder() {
        let pattern = FormulaMatcher::and(vec![FormulaMatcher::any("P")], Some("Q"));

        let two = Formula::and(vec![atom("a"), atom("b")]);
        let bindings = pattern.matches(&two).unwrap();
        // Each child can play P, with the other as Q
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].formula("Q").unwrap(), &atom("b"));

        // No remainder, no match
        let one = Formula::and(vec![atom("a")]);
        assert!(pattern.matches(&one).unwrap().is_empty());
    }

    #[test]
    fn test_rest_collapses_to_single_child() {
        let pattern = FormulaMatcher::or(
            vec![FormulaMatcher::not(FormulaMatcher::any("P"))],
            Some("Q"),
        );
        let subject = Formula::or(vec![Formula::not(atom("a")), atom("b")]);
        let bindings = pattern.matches(&subject).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].formula("P").unwrap(), &atom("a"));
        assert_eq!(bindings[0].formula("Q").unwrap(), &atom("b"));
    }

    #[test]
    fn test_schema_hole_abstraction() {
        // phi(x) with x already bound to the constant a
        let mut binding = MatchBinding::default();
        binding.terms.insert("x".into(), Term::constant("a"));

        let pattern = FormulaMatcher::schema("phi", vec![TermMatcher::hole("x")]);
        let subject = Formula::pred("p", vec![Term::constant("a")]);
        let results = match_formula(&pattern, &subject, &binding).unwrap();
        assert_eq!(results.len(), 1);

        let schema = results[0].schema("phi").unwrap();
        let at_b = schema.instantiate(&[Term::constant("b")]).unwrap();
        assert_eq!(at_b, Formula::pred("p", vec![Term::constant("b")]));
    }

    #[test]
    fn test_quantifier_pattern_binds_variable() {
        let x = Variable::new("x");
        let subject = Formula::forall(
            Formula::pred("p", vec![Term::Variable(x.clone())]),
            x.clone(),
        );
        let pattern = FormulaMatcher::forall(
            FormulaMatcher::schema("phi", vec![TermMatcher::hole("v")]),
            "v",
        );
        let bindings = pattern.matches(&subject).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].variable("v").unwrap(), x);
    }

    #[test]
    fn test_replace_one_with_rewrites_subtrees() {
        // Rewrite ¬¬P to P wherever it occurs
        let pattern = FormulaMatcher::not(FormulaMatcher::not(FormulaMatcher::any("P")));
        let subject = Formula::and(vec![
            Formula::not(Formula::not(atom("a"))),
            atom("b"),
        ]);
        let results = pattern
            .replace_one_with(&subject, &|b: &MatchBinding, _: &Formula| {
                b.formula("P").cloned()
            })
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, Formula::and(vec![atom("a"), atom("b")]));
    }

    #[test]
    fn test_from_formula_strict_and_loose() {
        let f = Formula::pred("p", vec![Term::var("x"), Term::constant("a")]);

        let strict = FormulaMatcher::from_formula(&f, true);
        assert_eq!(strict.matches(&f).unwrap().len(), 1);
        let other = Formula::pred("p", vec![Term::constant("b"), Term::constant("a")]);
        assert!(strict.matches(&other).unwrap().is_empty());

        let loose = FormulaMatcher::from_formula(&f, false);
        let bindings = loose.matches(&other).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].term("x").unwrap(), &Term::constant("b"));
    }
}
