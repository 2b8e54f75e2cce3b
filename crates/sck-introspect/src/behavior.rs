//! # Declarative Member Behavior
//!
//! Method bodies for the in-memory reference program. They cover the
//! accessor shapes the behavioral checks exercise: read a field, assign a
//! field, accumulate into a field, return a constant, or raise.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// What a method does when invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodBehavior {
    /// Return the current value of a field.
    Get {
        /// Field to read.
        field: String,
    },
    /// Replace a field with the first argument.
    Set {
        /// Field to write.
        field: String,
    },
    /// Add the first argument to a field (numbers sum, strings concatenate).
    Add {
        /// Field to update.
        field: String,
    },
    /// Return a fixed value.
    Return {
        /// The value returned.
        value: Value,
    },
    /// Raise an error with the given message.
    Raise {
        /// Error message.
        message: String,
    },
}

impl MethodBehavior {
    /// Number of arguments the behavior consumes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Set { .. } | Self::Add { .. } => 1,
            Self::Get { .. } | Self::Return { .. } | Self::Raise { .. } => 0,
        }
    }
}

/// Combine two values for [`MethodBehavior::Add`].
///
/// Integers add with overflow checking, mixed numbers add as floats, strings
/// concatenate, and a null accumulator takes the addend as-is.
pub fn accumulate(current: &Value, addend: &Value) -> Result<Value, String> {
    match (current, addend) {
        (Value::Null, v) => Ok(v.clone()),
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                return x
                    .checked_add(y)
                    .map(|sum| Value::Number(sum.into()))
                    .ok_or_else(|| format!("integer overflow adding {y} to {x}"));
            }
            let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) else {
                return Err(format!("cannot add {b} to {a}"));
            };
            Number::from_f64(x + y)
                .map(Value::Number)
                .ok_or_else(|| format!("non-finite result adding {y} to {x}"))
        }
        (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
        (a, b) => Err(format!("cannot add {b} to {a}")),
    }
}
