//! Entail: a first-order-logic rule engine with bounded forward proof search
//!
//! Given a context of known formulas and a desired formula, the engine
//! searches for a derivation of the goal by chaining a catalog of logical
//! inference rules breadth-first up to a depth bound. Derived formulas are
//! deduplicated by their regular form (the canonical representative under
//! AND/OR associativity-commutativity and bound-variable renaming), and every
//! result carries its deduction tree back to the original context.

pub mod error;
pub mod fol;
pub mod inference;
pub mod matcher;
pub mod search;

// Re-export commonly used types from fol
pub use fol::{
    Constant, Formula, FormulaContext, FreshVars, FunctionSymbol, PredicateSymbol, Term, Variable,
};

// Re-export inference types
pub use inference::{
    catalog, frontier_of, rules_as_map, Deduction, DeductionNode, Frontier, MatcherEquivRule,
    MatcherRule, MetaValue, QualifiedName, Rule, TowardResult,
};

// Re-export matcher types
pub use matcher::{FormulaMatcher, MatchBinding, SchemaBinding, TermMatcher};

// Re-export the search meta-rule
pub use search::{AllLogicRule, DEFAULT_SEARCH_DEPTH, META_DEDUCTION_TREE};

pub use error::{EngineError, Result};
