//! Error types for the rule engine
//!
//! Non-applicability of a rule is never an error; these variants only signal
//! contract violations by the matcher/builder collaborator, which abort the
//! current call.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("replacer references unbound formula hole `{0}`")]
    UnboundFormulaHole(String),

    #[error("replacer references unbound term hole `{0}`")]
    UnboundTermHole(String),

    #[error("replacer references unbound schema hole `{0}`")]
    UnboundSchemaHole(String),

    #[error("term hole `{0}` is bound to a non-variable term")]
    TermHoleNotVariable(String),

    #[error("schema `{name}` applied to {got} arguments, expected {expected}")]
    SchemaArity {
        name: String,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
