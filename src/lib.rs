//! plugin-validate - layered-architecture validator for markdown plugin packages

pub mod architecture;
pub mod error;
pub mod markdown;
pub mod report;

pub use architecture::{
    validate, validate_with, CheckType, Finding, Layer, LayeredFile, Results, Severity,
    ValidateOptions,
};
pub use error::{Result, ValidateError};
