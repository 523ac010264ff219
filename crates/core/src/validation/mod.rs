//! Rule-based validation of submitted records.
//!
//! Rules are typed, loaded once (patterns compiled up front) and evaluated
//! per record without any I/O. Error-severity hits become [`Violation`]s
//! attributed to the record's key; warnings are returned separately.
//!
//! [`Violation`]: crate::violation::Violation

pub mod evaluator;
pub mod rules;

pub use evaluator::{evaluate_record, RecordCheck};
pub use rules::{Constraint, JsonType, RuleSet, ValidationRule, ValidationSeverity};
