//! Terms in first-order logic

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A variable in first-order logic
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable { name: name.into() }
    }
}

/// A constant symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Constant {
    pub name: String,
}

impl Constant {
    pub fn new(name: impl Into<String>) -> Self {
        Constant { name: name.into() }
    }
}

/// A function symbol with arity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionSymbol {
    pub name: String,
    pub arity: usize,
}

impl FunctionSymbol {
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        FunctionSymbol {
            name: name.into(),
            arity,
        }
    }
}

/// A term in first-order logic.
///
/// `Ref` is a splice marker used while instantiating matcher bindings: a
/// subterm wrapped in `Ref` is opaque to further substitution, so replacing
/// `x` by `f(x)` terminates. Rules never observe it; `resolved` strips it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    Variable(Variable),
    Constant(Constant),
    Function(FunctionSymbol, Vec<Term>),
    Ref(Box<Term>),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Term {
        Term::Variable(Variable::new(name))
    }

    pub fn constant(name: impl Into<String>) -> Term {
        Term::Constant(Constant::new(name))
    }

    pub fn fun(name: impl Into<String>, args: Vec<Term>) -> Term {
        let arity = args.len();
        Term::Function(FunctionSymbol::new(name, arity), args)
    }

    /// Collect all variables in this term
    pub fn collect_variables(&self, vars: &mut BTreeSet<Variable>) {
        match self {
            Term::Variable(v) => {
                vars.insert(v.clone());
            }
            Term::Constant(_) => {}
            Term::Function(_, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
            Term::Ref(inner) => inner.collect_variables(vars),
        }
    }

    /// Collect all constants in this term, in order of appearance
    pub fn collect_constants(&self, consts: &mut Vec<Constant>) {
        match self {
            Term::Variable(_) => {}
            Term::Constant(c) => consts.push(c.clone()),
            Term::Function(_, args) => {
                for arg in args {
                    arg.collect_constants(consts);
                }
            }
            Term::Ref(inner) => inner.collect_constants(consts),
        }
    }

    /// Strip all `Ref` wrappers
    pub fn resolved(&self) -> Term {
        match self {
            Term::Variable(_) | Term::Constant(_) => self.clone(),
            Term::Function(f, args) => {
                Term::Function(f.clone(), args.iter().map(|a| a.resolved()).collect())
            }
            Term::Ref(inner) => inner.resolved(),
        }
    }

    /// Bottom-up rewrite: children first, then the node itself
    pub fn recur_map(&self, f: &impl Fn(Term) -> Term) -> Term {
        let mapped = match self {
            Term::Variable(_) | Term::Constant(_) => self.clone(),
            Term::Function(fs, args) => Term::Function(
                fs.clone(),
                args.iter().map(|a| a.recur_map(f)).collect(),
            ),
            Term::Ref(inner) => Term::Ref(Box::new(inner.recur_map(f))),
        };
        f(mapped)
    }

    /// Replace every occurrence of `from` by `to`, top-down.
    ///
    /// Does not descend into `Ref` wrappers, so already-spliced content is
    /// protected from re-substitution.
    pub fn replace_term(&self, from: &Term, to: &Term) -> Term {
        if self == from {
            return to.clone();
        }
        match self {
            Term::Function(f, args) => Term::Function(
                f.clone(),
                args.iter().map(|a| a.replace_term(from, to)).collect(),
            ),
            _ => self.clone(),
        }
    }

    /// Check whether `sub` occurs anywhere in this term
    pub fn contains_term(&self, sub: &Term) -> bool {
        if self == sub {
            return true;
        }
        match self {
            Term::Function(_, args) => args.iter().any(|a| a.contains_term(sub)),
            Term::Ref(inner) => inner.contains_term(sub),
            _ => false,
        }
    }
}

// Display implementations for pretty printing

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(v) => write!(f, "{}", v),
            Term::Constant(c) => write!(f, "{}", c),
            Term::Function(func, args) => {
                write!(f, "{}(", func.name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Term::Ref(inner) => write!(f, "{}", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_term_skips_refs() {
        let x = Term::var("x");
        let fx = Term::fun("f", vec![x.clone()]);

        // Wrapping the replacement in Ref protects it from a second pass
        let once = x.replace_term(&x, &Term::Ref(Box::new(fx.clone())));
        let twice = once.replace_term(&x, &Term::Ref(Box::new(fx.clone())));
        assert_eq!(once, twice);
        assert_eq!(twice.resolved(), fx);
    }

    #[test]
    fn test_collect_variables() {
        let t = Term::fun("f", vec![Term::var("x"), Term::fun("g", vec![Term::var("y")])]);
        let mut vars = BTreeSet::new();
        t.collect_variables(&mut vars);
        assert_eq!(vars.len(), 2);
        assert!(vars.contains(&Variable::new("x")));
        assert!(vars.contains(&Variable::new("y")));
    }

    #[test]
    fn test_collect_constants_keeps_duplicates() {
        let t = Term::fun("f", vec![Term::constant("a"), Term::constant("a")]);
        let mut consts = Vec::new();
        t.collect_constants(&mut consts);
        assert_eq!(consts, vec![Constant::new("a"), Constant::new("a")]);
    }
}
