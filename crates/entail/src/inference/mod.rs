//! Inference rules and deduction tracking
//!
//! The rule abstraction, the deduction/proof-tree records, the schematic
//! (matcher/replacer) rule flavors, the bespoke built-in rules, and the
//! ordered catalog the search meta-rule iterates.

pub mod and_construct;
pub mod catalog;
pub mod deduction;
pub mod exclude_middle;
pub mod exist_constant;
pub mod flatten;
pub mod for_any_variable;
pub mod modus_ponens;
pub mod rule;
pub mod schematic;

// Re-export commonly used types
pub use and_construct::AndConstructRule;
pub use catalog::{catalog, rules_as_map};
pub use deduction::{Deduction, DeductionNode, MetaValue, TowardResult};
pub use exclude_middle::ExcludeMiddleRule;
pub use exist_constant::{ExistConstantRule, META_CONSTANT};
pub use flatten::FlattenRule;
pub use for_any_variable::{ForAnyVariableRule, META_VARIABLE};
pub use modus_ponens::ImplyRule;
pub use rule::{frontier_of, Frontier, QualifiedName, Rule, LOGIC_NAMESPACE};
pub use schematic::{MatcherEquivRule, MatcherRule, Replacer};
