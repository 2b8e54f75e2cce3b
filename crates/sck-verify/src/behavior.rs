//! # Behavioral Assembler
//!
//! Builds getter and setter diagnostic units by constructing an instance of
//! a target type and invoking accessors on it by name.
//!
//! All units of one `verify_*` call share the instance they were assembled
//! against, so setter units observe one another's effects in the order of
//! the value map.
//!
//! ## Setter Contract
//!
//! After invoking `setX(v)`, the unit reads every field of the instance's
//! own type and of its direct superclass. It passes when those values
//! contain `v`, or, when expected post-values are supplied, the post-value
//! at the setter's position in the value map.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use sck_core::{CheckFailure, QualifiedName};
use sck_introspect::{HostRuntime, Instance, RuntimeError, TypeDescriptor};

use crate::diagnostic::{Category, DiagnosticUnit};

/// Constructor selection for a behavioral check.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstructorCall {
    /// Parameter type names of the constructor to use.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Arguments passed to it.
    #[serde(default)]
    pub arguments: Vec<Value>,
}

/// Builds behavioral units against a host runtime.
#[derive(Clone)]
pub struct BehavioralAssembler {
    runtime: Arc<dyn HostRuntime>,
}

impl std::fmt::Debug for BehavioralAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehavioralAssembler").finish_non_exhaustive()
    }
}

fn unit_name(category: Category, type_name: &QualifiedName, method: &str) -> String {
    format!("{}[{}|{}]", category.test_prefix(), type_name, method)
}

fn failing_units<'a>(
    category: Category,
    type_name: &QualifiedName,
    methods: impl Iterator<Item = &'a String>,
    failure: CheckFailure,
) -> Vec<DiagnosticUnit> {
    methods
        .map(|m| DiagnosticUnit::failing(unit_name(category, type_name, m), category, failure.clone()))
        .collect()
}

impl BehavioralAssembler {
    /// Create an assembler over a target program.
    pub fn new(runtime: Arc<dyn HostRuntime>) -> Self {
        Self { runtime }
    }

    /// Locate and construct the target, or explain why not.
    fn instantiate(
        &self,
        type_name: &QualifiedName,
        constructor: Option<&ConstructorCall>,
    ) -> Result<(Arc<TypeDescriptor>, Instance), CheckFailure> {
        let ty = self.runtime.locate(type_name).ok_or_else(|| {
            tracing::warn!(%type_name, "Target type not found");
            CheckFailure::TargetTypeMissing(format!(
                "Could not find the \"{type_name}\" class within the submission. Make sure it is implemented properly."
            ))
        })?;
        let built = match constructor {
            None => self.runtime.construct(&ty, None, &[]),
            Some(call) => self
                .runtime
                .construct(&ty, Some(call.parameters.as_slice()), &call.arguments),
        };
        let instance = built.map_err(|e| {
            tracing::warn!(%type_name, error = %e, "Could not instantiate target");
            CheckFailure::TargetNotConstructible(format!(
                "Could not initialize the \"{type_name}\" class. Make sure that it is implemented properly."
            ))
        })?;
        Ok((ty, instance))
    }

    /// One unit per getter: invoke it without arguments and compare the
    /// result with the expected value.
    pub fn verify_getters(
        &self,
        type_name: &QualifiedName,
        constructor: Option<&ConstructorCall>,
        expected: &IndexMap<String, Value>,
    ) -> Vec<DiagnosticUnit> {
        let category = Category::Getter;
        let instance = match self.instantiate(type_name, constructor) {
            Ok((_, instance)) => instance,
            Err(failure) => return failing_units(category, type_name, expected.keys(), failure),
        };

        expected
            .iter()
            .map(|(method, value)| {
                let runtime = Arc::clone(&self.runtime);
                let instance = instance.clone();
                let method = method.clone();
                let value = value.clone();
                DiagnosticUnit::new(unit_name(category, type_name, &method), category, move || {
                    check_getter(runtime.as_ref(), &instance, &method, &value).into()
                })
            })
            .collect()
    }

    /// One unit per setter: invoke it with the value and look for the
    /// relevant value among the instance's field values.
    pub fn verify_setters(
        &self,
        type_name: &QualifiedName,
        constructor: Option<&ConstructorCall>,
        values: &IndexMap<String, Value>,
        expected_post_values: Option<&[Value]>,
    ) -> Vec<DiagnosticUnit> {
        let category = Category::Setter;
        let (ty, instance) = match self.instantiate(type_name, constructor) {
            Ok(built) => built,
            Err(failure) => return failing_units(category, type_name, values.keys(), failure),
        };

        values
            .iter()
            .enumerate()
            .map(|(position, (method, value))| {
                let runtime = Arc::clone(&self.runtime);
                let ty = Arc::clone(&ty);
                let instance = instance.clone();
                let method = method.clone();
                let value = value.clone();
                let wanted = match expected_post_values {
                    Some(post) => post.get(position).cloned(),
                    None => Some(value.clone()),
                };
                DiagnosticUnit::new(unit_name(category, type_name, &method), category, move || {
                    check_setter(runtime.as_ref(), &ty, &instance, &method, &value, wanted.as_ref())
                        .into()
                })
            })
            .collect()
    }

    /// Build every unit a plan describes, getters before setters per entry.
    pub fn plan_units(&self, plan: &BehaviorPlan) -> Result<Vec<DiagnosticUnit>, PlanError> {
        let mut units = Vec::new();
        for check in &plan.checks {
            let type_name = QualifiedName::parse(&check.type_name).map_err(|e| {
                PlanError::InvalidEntry {
                    type_name: check.type_name.clone(),
                    message: e.to_string(),
                }
            })?;
            if let Some(post) = &check.expected_post_values {
                if post.len() != check.setters.len() {
                    return Err(PlanError::InvalidEntry {
                        type_name: check.type_name.clone(),
                        message: format!(
                            "{} expected post-values for {} setters",
                            post.len(),
                            check.setters.len()
                        ),
                    });
                }
            }
            let constructor = check.constructor.as_ref();
            if !check.getters.is_empty() {
                units.extend(self.verify_getters(&type_name, constructor, &check.getters));
            }
            if !check.setters.is_empty() {
                units.extend(self.verify_setters(
                    &type_name,
                    constructor,
                    &check.setters,
                    check.expected_post_values.as_deref(),
                ));
            }
        }
        Ok(units)
    }
}

/// Value equality where numbers compare numerically, so `42` equals `42.0`.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(i), Some(j)) => i == j,
            _ => match (x.as_u64(), y.as_u64()) {
                (Some(i), Some(j)) => i == j,
                _ => x.as_f64() == y.as_f64(),
            },
        },
        _ => a == b,
    }
}

fn check_getter(
    runtime: &dyn HostRuntime,
    instance: &Instance,
    method: &str,
    expected: &Value,
) -> Result<(), CheckFailure> {
    let wrong = || {
        format!(
            "Could not find the \"{method}\" method or it did not return the correct value. Make sure that it is implemented properly."
        )
    };
    match runtime.invoke(instance, method, &[]) {
        Ok(actual) if values_equal(&actual, expected) => Ok(()),
        Ok(actual) => {
            tracing::debug!(method, %actual, %expected, "Getter returned unexpected value");
            Err(CheckFailure::ElementMismatch(wrong()))
        }
        Err(RuntimeError::NoSuchMethod { .. }) => Err(CheckFailure::ElementNotFound(wrong())),
        Err(e) => {
            tracing::debug!(method, error = %e, "Getter raised");
            Err(CheckFailure::InvocationFailure(format!(
                "Could not invoke the \"{method}\" method due to exception during the method execution."
            )))
        }
    }
}

fn check_setter(
    runtime: &dyn HostRuntime,
    ty: &TypeDescriptor,
    instance: &Instance,
    method: &str,
    value: &Value,
    wanted: Option<&Value>,
) -> Result<(), CheckFailure> {
    let improper = || {
        CheckFailure::ElementMismatch(format!(
            "The \"{method}()\" method is not implemented properly. Please read the problem statement again."
        ))
    };
    match runtime.invoke(instance, method, std::slice::from_ref(value)) {
        Ok(_) => {}
        Err(RuntimeError::NoSuchMethod { .. }) => {
            return Err(CheckFailure::ElementNotFound(format!(
                "Could not find the \"{method}()\" method within the submission."
            )))
        }
        Err(e) => {
            return Err(CheckFailure::InvocationFailure(format!(
                "Could not invoke the \"{method}()\" method: {e}"
            )))
        }
    }

    let parent = ty.superclass_simple_name();
    let values = runtime
        .field_values(instance)
        .map_err(|e| CheckFailure::InvocationFailure(format!("Could not read field values: {e}")))?;
    let visible: Vec<&Value> = values
        .iter()
        .filter(|f| f.owner == ty.name || Some(f.owner.simple_name()) == parent)
        .map(|f| &f.value)
        .collect();

    match wanted {
        Some(w) if visible.iter().any(|v| values_equal(v, w)) => Ok(()),
        _ => Err(improper()),
    }
}

// ─── Plans ───────────────────────────────────────────────────────────

/// Errors loading or applying a behavior plan.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The plan file does not exist.
    #[error("behavior plan not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The plan file could not be read.
    #[error("failed to read behavior plan {}: {source}", path.display())]
    Io {
        /// The plan path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The plan is not valid JSON/YAML or does not fit the layout.
    #[error("malformed behavior plan {source_name}: {message}")]
    Parse {
        /// Plan path or label.
        source_name: String,
        /// Parser message.
        message: String,
    },

    /// An entry is inconsistent.
    #[error("invalid plan entry for {type_name}: {message}")]
    InvalidEntry {
        /// The entry's `type`.
        type_name: String,
        /// What is wrong.
        message: String,
    },
}

/// Getter/setter checks for one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessorCheck {
    /// Qualified type name.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Constructor to use; the no-argument constructor when absent.
    #[serde(default)]
    pub constructor: Option<ConstructorCall>,
    /// Getter name to expected return value, in evaluation order.
    #[serde(default)]
    pub getters: IndexMap<String, Value>,
    /// Setter name to value, in evaluation order.
    #[serde(default)]
    pub setters: IndexMap<String, Value>,
    /// Post-values expected after each setter, by position.
    #[serde(default)]
    pub expected_post_values: Option<Vec<Value>>,
}

/// A behavior plan document: a list of accessor checks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BehaviorPlan {
    /// Checks in evaluation order.
    pub checks: Vec<AccessorCheck>,
}

impl BehaviorPlan {
    /// Load a plan file; `.yaml`/`.yml` is read as YAML, anything else as
    /// JSON.
    pub fn load_path(path: &Path) -> Result<Self, PlanError> {
        if !path.exists() {
            return Err(PlanError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        Self::load_str(&content, yaml, &path.display().to_string())
    }

    /// Parse a plan from a string.
    pub fn load_str(content: &str, yaml: bool, source_name: &str) -> Result<Self, PlanError> {
        let parsed: Result<Self, String> = if yaml {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| PlanError::Parse {
            source_name: source_name.to_string(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Outcome;
    use sck_introspect::{InMemoryProgram, ManifestFormat};
    use serde_json::json;
    use std::io::Write;

    const PROGRAM: &str = r#"{
      "types": [
        {
          "name": "shop.Item",
          "fields": [
            { "name": "label", "type": "String", "initial": "alice" },
            { "name": "count", "type": "int", "initial": 0 },
            { "name": "price", "type": "double", "initial": 0 }
          ],
          "methods": [
            { "name": "getLabel", "returnType": "String", "behavior": { "kind": "get", "field": "label" } },
            { "name": "setLabel", "parameters": ["String"], "behavior": { "kind": "set", "field": "label" } },
            { "name": "addCount", "parameters": ["int"], "behavior": { "kind": "add", "field": "count" } },
            { "name": "getPrice", "returnType": "double", "behavior": { "kind": "get", "field": "price" } },
            { "name": "raisePrice", "parameters": ["double"], "behavior": { "kind": "add", "field": "price" } },
            { "name": "setBroken", "parameters": ["int"] },
            { "name": "explode", "returnType": "int", "behavior": { "kind": "raise", "message": "boom" } }
          ]
        }
      ]
    }"#;

    fn assembler() -> BehavioralAssembler {
        let program = InMemoryProgram::load_str(PROGRAM, ManifestFormat::Json, "inline").unwrap();
        BehavioralAssembler::new(Arc::new(program))
    }

    fn item() -> QualifiedName {
        QualifiedName::new("shop", "Item")
    }

    fn map(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_getter_value_mismatch_names_method() {
        let units = assembler().verify_getters(&item(), None, &map(&[("getLabel", json!("Alice"))]));
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].name(), "GetterTest[shop.Item|getLabel]");
        match units[0].evaluate() {
            Outcome::Failed {
                failure: CheckFailure::ElementMismatch(msg),
            } => assert!(msg.contains("\"getLabel\""), "got: {msg}"),
            other => panic!("Expected ElementMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn test_getter_missing_and_raising() {
        let units = assembler().verify_getters(
            &item(),
            None,
            &map(&[("getNope", json!(1)), ("explode", json!(1))]),
        );
        let kinds: Vec<_> = units
            .iter()
            .map(|u| match u.evaluate() {
                Outcome::Failed { failure } => failure.kind(),
                other => panic!("Expected failure, got: {other:?}"),
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                sck_core::FailureKind::ElementNotFound,
                sck_core::FailureKind::InvocationFailure
            ]
        );
    }

    #[test]
    fn test_setter_passes_when_field_updated() {
        let a = assembler();
        let setters = map(&[("setLabel", json!("bob"))]);
        let units = a.verify_setters(&item(), None, &setters, None);
        assert_eq!(units[0].evaluate(), Outcome::Passed);
    }

    #[test]
    fn test_setter_without_effect_fails() {
        let units = assembler().verify_setters(&item(), None, &map(&[("setBroken", json!(77))]), None);
        match units[0].evaluate() {
            Outcome::Failed {
                failure: CheckFailure::ElementMismatch(msg),
            } => assert_eq!(
                msg,
                "The \"setBroken()\" method is not implemented properly. Please read the problem statement again."
            ),
            other => panic!("Expected ElementMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn test_expected_post_values_by_position() {
        let setters = map(&[("setLabel", json!("x")), ("addCount", json!(5))]);
        let post = [json!("x"), json!(5)];
        let units = assembler().verify_setters(&item(), None, &setters, Some(post.as_slice()));
        assert!(units.iter().all(|u| u.evaluate() == Outcome::Passed));

        let wrong_post = [json!("x"), json!(6)];
        let units = assembler().verify_setters(&item(), None, &setters, Some(wrong_post.as_slice()));
        assert_eq!(units[0].evaluate(), Outcome::Passed);
        assert!(units[1].evaluate().is_failure());
    }

    #[test]
    fn test_missing_type_fails_every_method() {
        let units = assembler().verify_getters(
            &QualifiedName::new("shop", "Ghost"),
            None,
            &map(&[("getA", json!(1)), ("getB", json!(2))]),
        );
        assert_eq!(units.len(), 2);
        for unit in &units {
            match unit.evaluate() {
                Outcome::Failed {
                    failure: CheckFailure::TargetTypeMissing(msg),
                } => assert!(msg.contains("shop.Ghost")),
                other => panic!("Expected TargetTypeMissing, got: {other:?}"),
            }
        }
    }

    #[test]
    fn test_unmatched_constructor_fails_every_method() {
        let call = ConstructorCall {
            parameters: vec!["String".into()],
            arguments: vec![json!("x")],
        };
        let units = assembler().verify_setters(
            &item(),
            Some(&call),
            &map(&[("setLabel", json!("y"))]),
            None,
        );
        match units[0].evaluate() {
            Outcome::Failed {
                failure: CheckFailure::TargetNotConstructible(msg),
            } => assert!(msg.starts_with("Could not initialize the \"shop.Item\" class")),
            other => panic!("Expected TargetNotConstructible, got: {other:?}"),
        }
    }

    #[test]
    fn test_plan_post_value_count_checked() {
        let plan = BehaviorPlan::load_str(
            r#"{"checks": [{"type": "shop.Item", "setters": {"setLabel": "a"}, "expectedPostValues": []}]}"#,
            false,
            "plan.json",
        )
        .unwrap();
        assert!(matches!(
            assembler().plan_units(&plan),
            Err(PlanError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert!(values_equal(&json!(42), &json!(42.0)));
        assert!(values_equal(&json!(0.0), &json!(0)));
        assert!(values_equal(&json!(u64::MAX), &json!(u64::MAX)));
        assert!(!values_equal(&json!(42), &json!(42.5)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(values_equal(&json!("a"), &json!("a")));
    }

    #[test]
    fn test_double_field_accepts_float_literals() {
        let a = assembler();
        let units = a.verify_getters(&item(), None, &map(&[("getPrice", json!(0.0))]));
        assert_eq!(units[0].evaluate(), Outcome::Passed);

        let post = [json!(42.0)];
        let units = a.verify_setters(
            &item(),
            None,
            &map(&[("raisePrice", json!(42))]),
            Some(post.as_slice()),
        );
        assert_eq!(units[0].evaluate(), Outcome::Passed);
    }

    #[test]
    fn test_plan_loads_from_yaml_and_json_files() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            yaml,
            "checks:\n  - type: shop.Item\n    getters:\n      getLabel: alice\n    setters:\n      setLabel: bob\n      addCount: 3\n"
        )
        .unwrap();
        let plan = BehaviorPlan::load_path(yaml.path()).unwrap();
        assert_eq!(plan.checks.len(), 1);
        let setters: Vec<_> = plan.checks[0].setters.keys().cloned().collect();
        assert_eq!(setters, vec!["setLabel", "addCount"]);
        let units = assembler().plan_units(&plan).unwrap();
        assert_eq!(units.len(), 3);
        assert!(units.iter().all(|u| u.evaluate() == Outcome::Passed));

        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json_file, r#"{{"checks": [{{"type": "shop.Item", "getters": {{"getPrice": 0}}}}]}}"#).unwrap();
        let plan = BehaviorPlan::load_path(json_file.path()).unwrap();
        assert_eq!(plan.checks[0].getters["getPrice"], json!(0));
    }

    #[test]
    fn test_plan_load_errors() {
        let missing = BehaviorPlan::load_path(Path::new("/nonexistent/plan.yaml"));
        assert!(matches!(missing, Err(PlanError::NotFound { .. })));

        let mut broken = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(broken, "{{ not json").unwrap();
        match BehaviorPlan::load_path(broken.path()) {
            Err(PlanError::Parse { source_name, .. }) => {
                assert_eq!(source_name, broken.path().display().to_string())
            }
            other => panic!("Expected Parse error, got: {other:?}"),
        }
    }
}
