//! Resolution of symbolic values
//!
//! App scripts rarely hard-code everything: Flutter projects read SDK levels
//! and version numbers from the Flutter Gradle plugin (`flutter.*`) and Java
//! levels from `JavaVersion` constants. The symbol table maps those references
//! to concrete values.

use crate::descriptor::JavaVersion;
use crate::error::{DescriptorError, Result};
use crate::gradle::Expr;
use crate::properties::LocalProperties;
use builddesc_core::config::FlutterConfig;
use std::collections::{BTreeMap, BTreeSet};

/// A resolved value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// String literal or string-typed symbol
    Str(String),
    /// Integer literal or integer-typed symbol
    Int(i64),
    /// `true` / `false`
    Bool(bool),
    /// A `JavaVersion` constant
    Java(JavaVersion),
}

impl Value {
    /// Type name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Java(_) => "JavaVersion",
        }
    }

    fn to_display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Int(i) => i.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Java(v) => v.to_string(),
        }
    }
}

/// Outcome of evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eval {
    /// The expression evaluated to a value
    Value(Value),
    /// A reference that names no known symbol
    Unresolved(String),
    /// An expression form the loader does not evaluate
    Unsupported,
}

/// Known symbols
#[derive(Debug, Clone, Default)]
pub struct Symbols {
    values: BTreeMap<String, Value>,
    /// Names bound to values only known at build time, e.g. `Properties()`
    opaque: BTreeSet<String>,
}

impl Symbols {
    /// Flutter plugin values: `local.properties` first, then loader defaults
    ///
    /// A `flutter.versionCode` property that is not an integer is a
    /// constraint violation.
    pub fn new(flutter: &FlutterConfig, props: &LocalProperties) -> Result<Self> {
        let mut symbols = Self::default();

        let version_code = match props.get("flutter.versionCode") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| {
                DescriptorError::constraint(
                    "local.properties:flutter.versionCode",
                    format!("'{}' is not an integer", raw),
                )
            })?,
            None => i64::from(flutter.version_code),
        };
        let version_name = props
            .get("flutter.versionName")
            .map(str::to_string)
            .unwrap_or_else(|| flutter.version_name.clone());

        symbols.define(
            "flutter.compileSdkVersion",
            Value::Int(i64::from(flutter.compile_sdk_version)),
        );
        symbols.define(
            "flutter.targetSdkVersion",
            Value::Int(i64::from(flutter.target_sdk_version)),
        );
        symbols.define(
            "flutter.minSdkVersion",
            Value::Int(i64::from(flutter.min_sdk_version)),
        );
        symbols.define("flutter.ndkVersion", Value::Str(flutter.ndk_version.clone()));
        symbols.define("flutter.versionCode", Value::Int(version_code));
        symbols.define("flutter.versionName", Value::Str(version_name));
        Ok(symbols)
    }

    /// Add or replace a symbol
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        self.opaque.remove(&name);
        self.values.insert(name, value);
    }

    /// Declare a local whose value cannot be evaluated. References to it
    /// evaluate to [`Eval::Unsupported`] rather than failing to resolve.
    pub fn define_opaque(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.values.remove(&name);
        self.opaque.insert(name);
    }

    /// Look up a symbol by dotted name
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Defined names sharing the first segment of `name`, for error messages
    pub fn similar(&self, name: &str) -> Vec<String> {
        let head = name.split('.').next().unwrap_or(name);
        let prefix = format!("{}.", head);
        self.values
            .keys()
            .filter(|k| k.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Evaluate a value expression
    pub fn eval(&self, expr: &Expr) -> Eval {
        match expr {
            Expr::Str(s) => Eval::Value(Value::Str(s.clone())),
            Expr::Int(i) => Eval::Value(Value::Int(*i)),
            Expr::Bool(b) => Eval::Value(Value::Bool(*b)),
            Expr::Path(parts) => self.eval_path(parts),
            Expr::Call {
                receiver: None,
                callee,
                args,
            } if args.is_empty() => match callee.split_last() {
                Some((method, target)) if !target.is_empty() => match self.eval_path(target) {
                    Eval::Value(value) => convert(value, method),
                    other => other,
                },
                _ => Eval::Unsupported,
            },
            Expr::Cast { value, .. } => self.eval(value),
            _ => Eval::Unsupported,
        }
    }

    fn eval_path(&self, parts: &[String]) -> Eval {
        let name = parts.join(".");
        if let Some(value) = self.lookup(&name) {
            return Eval::Value(value.clone());
        }
        if parts.first().is_some_and(|head| self.opaque.contains(head)) {
            return Eval::Unsupported;
        }

        match parts {
            [class, constant] if class == "JavaVersion" => match JavaVersion::from_constant(constant) {
                Some(version) => Eval::Value(Value::Java(version)),
                None => Eval::Unresolved(name),
            },
            [class, constant, property] if class == "JavaVersion" && property == "majorVersion" => {
                match JavaVersion::from_constant(constant) {
                    Some(version) => {
                        let major = version.as_str().strip_prefix("1.").unwrap_or(version.as_str());
                        Eval::Value(Value::Str(major.to_string()))
                    }
                    None => Eval::Unresolved(name),
                }
            }
            _ => Eval::Unresolved(name),
        }
    }
}

fn convert(value: Value, method: &str) -> Eval {
    match method {
        "toString" => Eval::Value(Value::Str(value.to_display_string())),
        "toInt" => match value {
            Value::Int(i) => Eval::Value(Value::Int(i)),
            Value::Str(s) => s
                .trim()
                .parse::<i64>()
                .map(|i| Eval::Value(Value::Int(i)))
                .unwrap_or(Eval::Unsupported),
            _ => Eval::Unsupported,
        },
        _ => Eval::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradle::{parse, StatementKind};

    fn value_of(source: &str) -> Expr {
        let script = parse(source).unwrap();
        match script.statements.into_iter().next().unwrap().kind {
            StatementKind::Assign { value, .. } => value,
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    fn symbols() -> Symbols {
        Symbols::new(&FlutterConfig::default(), &LocalProperties::default()).unwrap()
    }

    #[test]
    fn test_flutter_defaults() {
        let symbols = symbols();
        assert_eq!(
            symbols.eval(&value_of("compileSdk = flutter.compileSdkVersion")),
            Eval::Value(Value::Int(35))
        );
        assert_eq!(
            symbols.eval(&value_of("versionName = flutter.versionName")),
            Eval::Value(Value::Str("1.0.0".into()))
        );
    }

    #[test]
    fn test_local_properties_override() {
        let props = LocalProperties::parse("flutter.versionCode=12\nflutter.versionName=2.0.1\n");
        let symbols = Symbols::new(&FlutterConfig::default(), &props).unwrap();
        assert_eq!(symbols.lookup("flutter.versionCode"), Some(&Value::Int(12)));
        assert_eq!(
            symbols.lookup("flutter.versionName"),
            Some(&Value::Str("2.0.1".into()))
        );
    }

    #[test]
    fn test_java_version_forms() {
        let symbols = symbols();
        assert_eq!(
            symbols.eval(&value_of("x = JavaVersion.VERSION_11")),
            Eval::Value(Value::Java(JavaVersion::from_constant("VERSION_11").unwrap()))
        );
        assert_eq!(
            symbols.eval(&value_of("x = JavaVersion.VERSION_11.toString()")),
            Eval::Value(Value::Str("11".into()))
        );
        assert_eq!(
            symbols.eval(&value_of("x = JavaVersion.VERSION_1_8.majorVersion")),
            Eval::Value(Value::Str("8".into()))
        );
    }

    #[test]
    fn test_to_int_on_string_symbol() {
        let mut symbols = symbols();
        symbols.define("flutterVersionCode", Value::Str("9".into()));
        assert_eq!(
            symbols.eval(&value_of("versionCode = flutterVersionCode.toInt()")),
            Eval::Value(Value::Int(9))
        );
    }

    #[test]
    fn test_unresolved_and_unsupported() {
        let symbols = symbols();
        assert_eq!(
            symbols.eval(&value_of("x = flutter.maxSdkVersion")),
            Eval::Unresolved("flutter.maxSdkVersion".into())
        );
        assert_eq!(
            symbols.eval(&value_of("x = System.getenv(\"KEY\")")),
            Eval::Unsupported
        );
        assert!(symbols.similar("flutter.maxSdkVersion").contains(&"flutter.versionCode".to_string()));
    }

    #[test]
    fn test_non_numeric_version_code_is_rejected() {
        let props = LocalProperties::parse("flutter.versionCode=1.0.3\n");
        match Symbols::new(&FlutterConfig::default(), &props) {
            Err(DescriptorError::ConstraintViolation { field, message }) => {
                assert_eq!(field, "local.properties:flutter.versionCode");
                assert_eq!(message, "'1.0.3' is not an integer");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_opaque_local_is_unsupported() {
        let mut symbols = symbols();
        symbols.define_opaque("keystoreProperties");
        assert_eq!(symbols.eval(&value_of("x = keystoreProperties")), Eval::Unsupported);
        assert_eq!(
            symbols.eval(&value_of("x = keystoreProperties.storeFile")),
            Eval::Unsupported
        );
        assert_eq!(
            symbols.eval(&value_of("x = keystore")),
            Eval::Unresolved("keystore".into())
        );

        symbols.define("keystoreProperties", Value::Str("k".into()));
        assert_eq!(
            symbols.eval(&value_of("x = keystoreProperties")),
            Eval::Value(Value::Str("k".into()))
        );
    }
}
