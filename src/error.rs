use thiserror::Error;

use crate::membership::Shape;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Variable '{name}' is already registered")]
    DuplicateName { name: String },
    #[error("Invalid role '{role}': expected 'antecedent' or 'consequent'")]
    InvalidRole { role: String },
    #[error("Unrecognized membership shape '{shape}'")]
    InvalidShape { shape: String },
    #[error("Invalid parameters for {shape} membership {params:?}: {reason}")]
    InvalidParameter {
        shape: Shape,
        params: Vec<f64>,
        reason: String,
    },
    #[error("Invalid domain for variable '{name}': {reason}")]
    InvalidDomain { name: String, reason: String },
    #[error("Variable '{name}' not found in registry")]
    UnknownVariable { name: String },
    #[error("Variable '{variable}' has no term '{term}'")]
    UnknownTerm { variable: String, term: String },
    #[error("Invalid rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },
    #[error("No input value for antecedent '{variable}'")]
    MissingInput { variable: String },
    #[error("Input for '{variable}' is not a finite number: {value}")]
    InvalidInput { variable: String, value: f64 },
    #[error("No rule fired for consequent '{variable}'")]
    NoRuleFired { variable: String },
    #[error("Attribution shape {actual:?} does not match training features {expected:?}")]
    AttributionShape {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("Model has no training data to describe")]
    NotTrained,
    #[error("Data error: {0}")]
    Data(String),
}

pub type Result<T> = std::result::Result<T, Error>;
