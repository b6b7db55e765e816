pub mod normalizer;
pub mod rules;
pub mod matcher;
pub mod substitution;
pub mod filter;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("unknown disease code: '{0}'")]
    UnknownDisease(String),
    #[error("malformed recipe: {0}")]
    MalformedRecipe(String),
}

pub use filter::{filter, FilterRequest};
pub use rules::{Disease, RuleRepository};
