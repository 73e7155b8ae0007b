//! The built-in rule catalog.
//!
//! Schematic rules are defined here as matcher/replacer pairs; the bespoke
//! rules live in their own files. The catalog order is fixed and the search
//! meta-rule iterates it as given.

use super::and_construct::AndConstructRule;
use super::exclude_middle::ExcludeMiddleRule;
use super::exist_constant::ExistConstantRule;
use super::flatten::FlattenRule;
use super::for_any_variable::ForAnyVariableRule;
use super::modus_ponens::ImplyRule;
use super::rule::{QualifiedName, Rule};
use super::schematic::{MatcherEquivRule, MatcherRule};
use crate::fol::{Formula, PredicateSymbol};
use crate::matcher::{FormulaMatcher, MatchBinding, TermMatcher};
use indexmap::IndexMap;

/// `¬¬P ≡ P`
pub fn double_negate() -> MatcherEquivRule {
    MatcherEquivRule::new(
        "DoubleNegate",
        "Double negation: ¬¬P is equivalent to P",
        (
            FormulaMatcher::not(FormulaMatcher::not(FormulaMatcher::any("P"))),
            Box::new(|b: &MatchBinding, _: &Formula| b.formula("P").cloned()),
        ),
        (
            FormulaMatcher::any("P"),
            Box::new(|b: &MatchBinding, _: &Formula| Ok(Formula::not(b.formula("P")?.clone()))),
        ),
    )
}

/// `Q ∧ P ∧ P ⇒ Q ∧ P`
pub fn identity_and() -> MatcherRule {
    MatcherRule::new(
        "IdentityAnd",
        "Drop a duplicated conjunct",
        FormulaMatcher::and(
            vec![FormulaMatcher::any("P"), FormulaMatcher::any("P")],
            Some("Q"),
        ),
        Box::new(|b: &MatchBinding, _: &Formula| {
            Ok(Formula::conjoin(vec![
                b.formula("Q")?.clone(),
                b.formula("P")?.clone(),
            ]))
        }),
    )
}

/// `Q ∨ P ∨ P ⇒ Q ∨ P`
pub fn identity_or() -> MatcherRule {
    MatcherRule::new(
        "IdentityOr",
        "Drop a duplicated disjunct",
        FormulaMatcher::or(
            vec![FormulaMatcher::any("P"), FormulaMatcher::any("P")],
            Some("Q"),
        ),
        Box::new(|b: &MatchBinding, _: &Formula| {
            Ok(Formula::disjoin(vec![
                b.formula("Q")?.clone(),
                b.formula("P")?.clone(),
            ]))
        }),
    )
}

/// `R ∧ P ∧ (P ∨ Q) ⇒ R ∧ P`
pub fn absorption_and() -> MatcherRule {
    MatcherRule::new(
        "AbsorptionAnd",
        "Absorb a disjunction subsumed by a conjunct",
        FormulaMatcher::and(
            vec![
                FormulaMatcher::any("P"),
                FormulaMatcher::or(vec![FormulaMatcher::any("P")], Some("Q")),
            ],
            Some("R"),
        ),
        Box::new(|b: &MatchBinding, _: &Formula| {
            Ok(Formula::conjoin(vec![
                b.formula("R")?.clone(),
                b.formula("P")?.clone(),
            ]))
        }),
    )
}

/// `R ∨ P ∨ (P ∧ Q) ⇒ R ∨ P`
pub fn absorption_or() -> MatcherRule {
    MatcherRule::new(
        "AbsorptionOr",
        "Absorb a conjunction subsumed by a disjunct",
        FormulaMatcher::or(
            vec![
                FormulaMatcher::any("P"),
                FormulaMatcher::and(vec![FormulaMatcher::any("P")], Some("Q")),
            ],
            Some("R"),
        ),
        Box::new(|b: &MatchBinding, _: &Formula| {
            Ok(Formula::disjoin(vec![
                b.formula("R")?.clone(),
                b.formula("P")?.clone(),
            ]))
        }),
    )
}

/// `Q ∧ P ⇒ P`
pub fn and_project() -> MatcherRule {
    MatcherRule::new(
        "AndProject",
        "Project a conjunct out of a conjunction",
        FormulaMatcher::and(vec![FormulaMatcher::any("P")], Some("Q")),
        Box::new(|b: &MatchBinding, _: &Formula| b.formula("P").cloned()),
    )
}

/// `(P → Q) ∧ (Q → R) ⇒ P → R`
pub fn imply_compose() -> MatcherRule {
    MatcherRule::new(
        "ImplyCompose",
        "Compose two chained implications",
        FormulaMatcher::and(
            vec![
                FormulaMatcher::imply(FormulaMatcher::any("P"), FormulaMatcher::any("Q")),
                FormulaMatcher::imply(FormulaMatcher::any("Q"), FormulaMatcher::any("R")),
            ],
            None,
        ),
        Box::new(|b: &MatchBinding, _: &Formula| {
            Ok(Formula::imply(
                b.formula("P")?.clone(),
                b.formula("R")?.clone(),
            ))
        }),
    )
}

/// `P → Q ≡ ¬P ∨ Q`
pub fn def_imply() -> MatcherEquivRule {
    MatcherEquivRule::new(
        "DefImply",
        "Definition of implication: P → Q is equivalent to ¬P ∨ Q",
        (
            FormulaMatcher::imply(FormulaMatcher::any("P"), FormulaMatcher::any("Q")),
            Box::new(|b: &MatchBinding, _: &Formula| {
                Ok(Formula::disjoin(vec![
                    Formula::not(b.formula("P")?.clone()),
                    b.formula("Q")?.clone(),
                ]))
            }),
        ),
        (
            FormulaMatcher::or(
                vec![FormulaMatcher::not(FormulaMatcher::any("P"))],
                Some("Q"),
            ),
            Box::new(|b: &MatchBinding, _: &Formula| {
                Ok(Formula::imply(
                    b.formula("P")?.clone(),
                    b.formula("Q")?.clone(),
                ))
            }),
        ),
    )
}

/// `(P → Q) ∧ (Q → P) ≡ P ↔ Q`
pub fn def_equiv_to() -> MatcherEquivRule {
    MatcherEquivRule::new(
        "DefEquivTo",
        "Definition of equivalence: mutual implication is a biconditional",
        (
            FormulaMatcher::and(
                vec![
                    FormulaMatcher::imply(FormulaMatcher::any("P"), FormulaMatcher::any("Q")),
                    FormulaMatcher::imply(FormulaMatcher::any("Q"), FormulaMatcher::any("P")),
                ],
                None,
            ),
            Box::new(|b: &MatchBinding, _: &Formula| {
                Ok(Formula::equiv(
                    b.formula("P")?.clone(),
                    b.formula("Q")?.clone(),
                ))
            }),
        ),
        (
            FormulaMatcher::equiv(FormulaMatcher::any("P"), FormulaMatcher::any("Q")),
            Box::new(|b: &MatchBinding, _: &Formula| {
                let p = b.formula("P")?.clone();
                let q = b.formula("Q")?.clone();
                Ok(Formula::and(vec![
                    Formula::imply(p.clone(), q.clone()),
                    Formula::imply(q, p),
                ]))
            }),
        ),
    )
}

/// `x = y ∧ φ(x) ⇒ φ(y)`
pub fn equal_replace() -> MatcherRule {
    MatcherRule::new(
        "EqualReplace",
        "Rewrite with an equality: from x = y and φ(x), derive φ(y)",
        FormulaMatcher::and(
            vec![
                FormulaMatcher::Predicate {
                    predicate: PredicateSymbol::equality(),
                    args: vec![TermMatcher::hole("x"), TermMatcher::hole("y")],
                },
                FormulaMatcher::schema("phi", vec![TermMatcher::hole("x")]),
            ],
            None,
        ),
        Box::new(|b: &MatchBinding, _: &Formula| {
            let y = b.term("y")?.clone();
            b.schema("phi")?.instantiate(&[y])
        }),
    )
}

/// `(∀x. φ(x)) ∧ (∀y. ψ(y)) ≡ ∀z. (φ(z) ∧ ψ(z))`
pub fn for_any_and() -> MatcherEquivRule {
    MatcherEquivRule::new(
        "ForAnyAnd",
        "Merge two universal quantifiers over a conjunction, and split back",
        (
            FormulaMatcher::and(
                vec![
                    FormulaMatcher::forall(
                        FormulaMatcher::schema("phi", vec![TermMatcher::hole("x")]),
                        "x",
                    ),
                    FormulaMatcher::forall(
                        FormulaMatcher::schema("psi", vec![TermMatcher::hole("y")]),
                        "y",
                    ),
                ],
                None,
            ),
            Box::new(|b: &MatchBinding, subject: &Formula| {
                let z = subject.next_var();
                let zt = crate::fol::Term::Variable(z.clone());
                let phi = b.schema("phi")?.instantiate(&[zt.clone()])?;
                let psi = b.schema("psi")?.instantiate(&[zt])?;
                Ok(Formula::forall(Formula::and(vec![phi, psi]), z))
            }),
        ),
        (
            FormulaMatcher::forall(
                FormulaMatcher::and(
                    vec![FormulaMatcher::any("A"), FormulaMatcher::any("B")],
                    None,
                ),
                "z",
            ),
            Box::new(|b: &MatchBinding, _: &Formula| {
                let z = b.variable("z")?;
                Ok(Formula::and(vec![
                    Formula::forall(b.formula("A")?.clone(), z.clone()),
                    Formula::forall(b.formula("B")?.clone(), z),
                ]))
            }),
        ),
    )
}

/// The full built-in catalog, in the order the search meta-rule iterates it
pub fn catalog() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(FlattenRule),
        Box::new(double_negate()),
        Box::new(identity_and()),
        Box::new(identity_or()),
        Box::new(absorption_and()),
        Box::new(absorption_or()),
        Box::new(and_project()),
        Box::new(AndConstructRule),
        Box::new(imply_compose()),
        Box::new(def_imply()),
        Box::new(def_equiv_to()),
        Box::new(ImplyRule),
        Box::new(equal_replace()),
        Box::new(ExcludeMiddleRule),
        Box::new(ExistConstantRule),
        Box::new(ForAnyVariableRule),
        Box::new(for_any_and()),
    ]
}

/// The catalog as a lookup table keyed by qualified name, insertion-ordered
pub fn rules_as_map() -> IndexMap<QualifiedName, Box<dyn Rule>> {
    catalog().into_iter().map(|r| (r.name(), r)).collect()
}
