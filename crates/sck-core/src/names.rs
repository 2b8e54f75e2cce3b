//! # Type and Member Names
//!
//! Qualified type names, simple-name extraction from erased or generic type
//! names, and canonical rendering of modifier tokens.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical modifier order used when rendering a modifier string.
///
/// Tokens outside this list keep their declaration order and are appended
/// after the known ones.
const MODIFIER_ORDER: &[&str] = &[
    "public",
    "protected",
    "private",
    "abstract",
    "static",
    "final",
    "transient",
    "volatile",
    "synchronized",
    "native",
    "strictfp",
    "interface",
];

/// Error parsing a qualified name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The input was empty or only whitespace.
    #[error("qualified name must not be empty")]
    Empty,

    /// The input ended with a separator or contained an empty segment.
    #[error("qualified name {0:?} contains an empty segment")]
    EmptySegment(String),
}

/// A package-qualified type name such as `com.example.Contact`.
///
/// The package may be empty for types in the default package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    package: String,
    name: String,
}

impl QualifiedName {
    /// Build a qualified name from its package and simple name.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Parse a dotted name, splitting the package at the last `.`.
    pub fn parse(input: &str) -> Result<Self, NameError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(NameError::Empty);
        }
        if input.split('.').any(str::is_empty) {
            return Err(NameError::EmptySegment(input.to_string()));
        }
        Ok(match input.rsplit_once('.') {
            Some((package, name)) => Self::new(package, name),
            None => Self::new("", input),
        })
    }

    /// The package part, empty for the default package.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The simple (unqualified) type name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.package.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.package, self.name)
        }
    }
}

impl FromStr for QualifiedName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QualifiedName> for String {
    fn from(value: QualifiedName) -> Self {
        value.to_string()
    }
}

/// Extract the simple name from an erased or generic type name.
///
/// Generic arguments are dropped, then everything up to the last `.` or `$`
/// (nested types) is stripped. Array suffixes are kept.
///
/// ```
/// use sck_core::simple_type_name;
/// assert_eq!(simple_type_name("java.util.List<java.lang.String>"), "List");
/// assert_eq!(simple_type_name("java.util.Map$Entry"), "Entry");
/// assert_eq!(simple_type_name("int[]"), "int[]");
/// ```
pub fn simple_type_name(type_name: &str) -> &str {
    let erased = match type_name.find('<') {
        Some(idx) => &type_name[..idx],
        None => type_name,
    };
    let erased = erased.trim();
    match erased.rfind(['.', '$']) {
        Some(idx) => &erased[idx + 1..],
        None => erased,
    }
}

/// Render modifier tokens as a single space-separated string in canonical
/// order, the form the modifier matching rule searches.
pub fn modifier_string<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut ordered: Vec<&str> = MODIFIER_ORDER
        .iter()
        .copied()
        .filter(|known| tokens.iter().any(|t| t.as_ref() == *known))
        .collect();
    for token in tokens {
        let token = token.as_ref();
        if !MODIFIER_ORDER.contains(&token) && !ordered.contains(&token) {
            ordered.push(token);
        }
    }
    ordered.join(" ")
}
