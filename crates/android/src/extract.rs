//! Walks a parsed script and collects the values a descriptor needs.
//!
//! Recognised blocks: `plugins`, `android` (with `compileOptions`,
//! `kotlinOptions`, `defaultConfig`, `signingConfigs`, `buildTypes`),
//! `flutter` and `dependencies`. Everything else is ignored with a warning.

use crate::dependency::Dependency;
use crate::descriptor::{BuildDescriptor, BuildType, JavaOptions, JavaVersion, SigningConfig};
use crate::error::{DescriptorError, Result};
use crate::gradle::{Call, Expr, Script, Statement, StatementKind};
use crate::plugins::{Plugin, PluginId};
use crate::symbols::{Eval, Symbols, Value};
use builddesc_core::validation::{ValidationIssue, ValidationReport, UNKNOWN_KEY, UNSUPPORTED_EXPR};
use tracing::{debug, warn};

/// Calls that name an element of a named container, e.g. `create("release")`
const CONTAINER_CALLS: &[&str] = &["create", "register", "maybeCreate", "getByName", "named"];

/// Values collected from a script, before required-field checks
#[derive(Debug, Default)]
pub(crate) struct Draft {
    application_id: Option<String>,
    namespace: Option<String>,
    min_sdk: Option<u32>,
    target_sdk: Option<u32>,
    compile_sdk: Option<u32>,
    ndk_version: Option<String>,
    version_code: Option<u32>,
    version_name: Option<String>,
    plugins: Vec<Plugin>,
    dependencies: Vec<Dependency>,
    java: JavaOptions,
    signing_configs: Vec<SigningConfig>,
    build_types: Vec<BuildType>,
    flutter_source: Option<String>,
}

impl Draft {
    /// Check that every required property was set
    pub(crate) fn into_descriptor(self) -> Result<BuildDescriptor> {
        Ok(BuildDescriptor {
            application_id: required(self.application_id, "android.defaultConfig.applicationId")?,
            namespace: self.namespace,
            min_sdk: required(self.min_sdk, "android.defaultConfig.minSdk")?,
            target_sdk: required(self.target_sdk, "android.defaultConfig.targetSdk")?,
            compile_sdk: required(self.compile_sdk, "android.compileSdk")?,
            ndk_version: self.ndk_version,
            version_code: required(self.version_code, "android.defaultConfig.versionCode")?,
            version_name: required(self.version_name, "android.defaultConfig.versionName")?,
            plugins: self.plugins,
            dependencies: self.dependencies,
            java: (!self.java.is_empty()).then_some(self.java),
            signing_configs: self.signing_configs,
            build_types: self.build_types,
            flutter_source: self.flutter_source,
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| DescriptorError::constraint(field, "required property is not set"))
}

/// Collect a draft descriptor and the non-fatal issues found on the way
pub(crate) fn extract(
    script: &Script,
    symbols: Symbols,
    warn_unknown_keys: bool,
) -> Result<(Draft, ValidationReport)> {
    let mut extractor = Extractor {
        symbols,
        warn_unknown_keys,
        draft: Draft::default(),
        report: ValidationReport::new(),
    };
    extractor.top_level(&script.statements)?;
    Ok((extractor.draft, extractor.report))
}

struct Extractor {
    symbols: Symbols,
    warn_unknown_keys: bool,
    draft: Draft,
    report: ValidationReport,
}

fn block(call: &Call) -> &[Statement] {
    call.block.as_deref().unwrap_or(&[])
}

fn statement_name(stmt: &Statement) -> String {
    match &stmt.kind {
        StatementKind::Assign { target, .. } => target.join("."),
        StatementKind::Val { name, .. } => name.clone(),
        StatementKind::Import(path) => path.join("."),
        StatementKind::Call(call) => call.name(),
        StatementKind::Other(label) => label.clone(),
    }
}

fn scoped(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

impl Extractor {
    fn unknown(&mut self, scope: &str, stmt: &Statement) {
        if !self.warn_unknown_keys {
            return;
        }
        let field = scoped(scope, &statement_name(stmt));
        warn!(field = %field, line = stmt.line, "ignoring unknown key");
        self.report.add_warning(
            ValidationIssue::new(&field, format!("Unknown key '{}' ignored", field), UNKNOWN_KEY)
                .at_line(stmt.line),
        );
    }

    fn unsupported(&mut self, field: &str, expr: &Expr, line: usize) {
        let rendered = expr.describe();
        warn!(field = %field, line, expr = %rendered, "cannot evaluate expression");
        self.report.add_warning(
            ValidationIssue::new(
                field,
                format!("Expression '{}' cannot be evaluated; value ignored", rendered),
                UNSUPPORTED_EXPR,
            )
            .at_line(line),
        );
    }

    fn value(&mut self, field: &str, expr: &Expr, line: usize) -> Result<Option<Value>> {
        match self.symbols.eval(expr) {
            Eval::Value(value) => Ok(Some(value)),
            Eval::Unresolved(name) => Err(DescriptorError::UnresolvedReference {
                kind: "symbol".to_string(),
                available: self.symbols.similar(&name),
                name,
            }),
            Eval::Unsupported => {
                self.unsupported(field, expr, line);
                Ok(None)
            }
        }
    }

    fn int_value(&mut self, field: &str, expr: &Expr, line: usize) -> Result<Option<u32>> {
        match self.value(field, expr, line)? {
            Some(Value::Int(i)) => u32::try_from(i)
                .map(Some)
                .map_err(|_| DescriptorError::constraint(field, format!("{} is out of range", i))),
            Some(other) => Err(type_mismatch(field, "integer", &other)),
            None => Ok(None),
        }
    }

    fn str_value(&mut self, field: &str, expr: &Expr, line: usize) -> Result<Option<String>> {
        match self.value(field, expr, line)? {
            Some(Value::Str(s)) => Ok(Some(s)),
            Some(other) => Err(type_mismatch(field, "string", &other)),
            None => Ok(None),
        }
    }

    fn bool_value(&mut self, field: &str, expr: &Expr, line: usize) -> Result<Option<bool>> {
        match self.value(field, expr, line)? {
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(type_mismatch(field, "boolean", &other)),
            None => Ok(None),
        }
    }

    fn java_value(&mut self, field: &str, expr: &Expr, line: usize) -> Result<Option<JavaVersion>> {
        let version = match self.value(field, expr, line)? {
            Some(Value::Java(v)) => Some(v),
            Some(Value::Str(s)) => JavaVersion::from_version(&s),
            Some(Value::Int(i)) => JavaVersion::from_version(&i.to_string()),
            Some(other) => return Err(type_mismatch(field, "JavaVersion", &other)),
            None => return Ok(None),
        };
        version
            .map(Some)
            .ok_or_else(|| DescriptorError::constraint(field, "not a valid Java version"))
    }

    fn top_level(&mut self, statements: &[Statement]) -> Result<()> {
        for stmt in statements {
            match &stmt.kind {
                StatementKind::Import(_) => {}
                StatementKind::Val { name, value } => match self.symbols.eval(value) {
                    Eval::Value(v) => self.symbols.define(name.clone(), v),
                    _ => {
                        debug!(name = %name, line = stmt.line, "local value is not a constant");
                        self.symbols.define_opaque(name.clone());
                    }
                },
                StatementKind::Call(call) => match call.name().as_str() {
                    "plugins" => self.plugins(block(call))?,
                    "android" => self.android(block(call))?,
                    "flutter" => self.flutter(block(call))?,
                    "dependencies" => self.dependencies(block(call))?,
                    _ => self.unknown("", stmt),
                },
                StatementKind::Assign { .. } | StatementKind::Other(_) => self.unknown("", stmt),
            }
        }
        Ok(())
    }

    fn plugins(&mut self, statements: &[Statement]) -> Result<()> {
        for stmt in statements {
            let StatementKind::Call(call) = &stmt.kind else {
                self.unknown("plugins", stmt);
                continue;
            };

            let id = match (call.name().as_str(), call.single_arg()) {
                ("id", Some(Expr::Str(id))) => PluginId::new(id.clone()),
                ("kotlin", Some(Expr::Str(module))) => PluginId::kotlin(module),
                ("id" | "kotlin", _) => {
                    return Err(DescriptorError::constraint(
                        "plugins",
                        format!("line {}: plugin id must be a string literal", stmt.line),
                    ))
                }
                ("alias", Some(expr)) => {
                    self.unsupported("plugins.alias", expr, stmt.line);
                    continue;
                }
                // Core plugins: `java`, `application`, `` `java-library` ``
                (name, None) if call.args.is_none() && call.block.is_none() && call.target.len() == 1 => {
                    PluginId::new(name)
                }
                _ => {
                    self.unknown("plugins", stmt);
                    continue;
                }
            };

            let mut plugin = Plugin {
                id,
                version: None,
                apply: true,
            };
            for (word, expr) in &call.infix {
                let field = format!("plugins.{}.{}", plugin.id, word);
                match word.as_str() {
                    "version" => plugin.version = self.str_value(&field, expr, stmt.line)?,
                    _ => plugin.apply = self.bool_value(&field, expr, stmt.line)?.unwrap_or(true),
                }
            }
            self.draft.plugins.push(plugin);
        }
        Ok(())
    }

    fn android(&mut self, statements: &[Statement]) -> Result<()> {
        for stmt in statements {
            match &stmt.kind {
                StatementKind::Assign { target, value } => match target.join(".").as_str() {
                    "namespace" => {
                        self.draft.namespace = self.str_value("android.namespace", value, stmt.line)?
                    }
                    "compileSdk" | "compileSdkVersion" => {
                        self.draft.compile_sdk = self.int_value("android.compileSdk", value, stmt.line)?
                    }
                    "ndkVersion" => {
                        self.draft.ndk_version = self.str_value("android.ndkVersion", value, stmt.line)?
                    }
                    _ => self.unknown("android", stmt),
                },
                StatementKind::Call(call) => match (call.name().as_str(), call.single_arg()) {
                    ("compileSdk" | "compileSdkVersion", Some(arg)) => {
                        self.draft.compile_sdk = self.int_value("android.compileSdk", arg, stmt.line)?
                    }
                    ("compileOptions", _) => self.compile_options(block(call))?,
                    ("kotlinOptions", _) => self.kotlin_options(block(call))?,
                    ("defaultConfig", _) => self.default_config(block(call))?,
                    ("signingConfigs", _) => self.signing_configs(block(call))?,
                    ("buildTypes", _) => self.build_types(block(call))?,
                    _ => self.unknown("android", stmt),
                },
                _ => self.unknown("android", stmt),
            }
        }
        Ok(())
    }

    fn compile_options(&mut self, statements: &[Statement]) -> Result<()> {
        for stmt in statements {
            match &stmt.kind {
                StatementKind::Assign { target, value } if target.len() == 1 => match target[0].as_str() {
                    "sourceCompatibility" => {
                        self.draft.java.source_compatibility =
                            self.java_value("android.compileOptions.sourceCompatibility", value, stmt.line)?
                    }
                    "targetCompatibility" => {
                        self.draft.java.target_compatibility =
                            self.java_value("android.compileOptions.targetCompatibility", value, stmt.line)?
                    }
                    _ => self.unknown("android.compileOptions", stmt),
                },
                _ => self.unknown("android.compileOptions", stmt),
            }
        }
        Ok(())
    }

    fn kotlin_options(&mut self, statements: &[Statement]) -> Result<()> {
        for stmt in statements {
            match &stmt.kind {
                StatementKind::Assign { target, value } if target.len() == 1 && target[0] == "jvmTarget" => {
                    let field = "android.kotlinOptions.jvmTarget";
                    self.draft.java.jvm_target = match self.value(field, value, stmt.line)? {
                        Some(Value::Str(s)) => Some(s),
                        Some(Value::Java(v)) => Some(v.to_string()),
                        Some(other) => return Err(type_mismatch(field, "string", &other)),
                        None => None,
                    };
                }
                _ => self.unknown("android.kotlinOptions", stmt),
            }
        }
        Ok(())
    }

    fn default_config(&mut self, statements: &[Statement]) -> Result<()> {
        const SCOPE: &str = "android.defaultConfig";
        for stmt in statements {
            // `minSdkVersion(21)` is the legacy call form of `minSdk = 21`
            let (key, value) = match &stmt.kind {
                StatementKind::Assign { target, value } if target.len() == 1 => (target[0].as_str(), value),
                StatementKind::Call(call) if call.target.len() == 1 && call.block.is_none() => {
                    match call.single_arg() {
                        Some(arg) => (call.target[0].as_str(), arg),
                        None => {
                            self.unknown(SCOPE, stmt);
                            continue;
                        }
                    }
                }
                _ => {
                    self.unknown(SCOPE, stmt);
                    continue;
                }
            };

            let line = stmt.line;
            match key {
                "applicationId" => {
                    self.draft.application_id = self.str_value("android.defaultConfig.applicationId", value, line)?
                }
                "minSdk" | "minSdkVersion" => {
                    self.draft.min_sdk = self.int_value("android.defaultConfig.minSdk", value, line)?
                }
                "targetSdk" | "targetSdkVersion" => {
                    self.draft.target_sdk = self.int_value("android.defaultConfig.targetSdk", value, line)?
                }
                "versionCode" => {
                    self.draft.version_code = self.int_value("android.defaultConfig.versionCode", value, line)?
                }
                "versionName" => {
                    self.draft.version_name = self.str_value("android.defaultConfig.versionName", value, line)?
                }
                _ => self.unknown(SCOPE, stmt),
            }
        }
        Ok(())
    }
}

/// Name of the container element a call declares or configures, and whether
/// the call configures an element that already exists
fn element_name(call: &Call) -> Option<(String, bool)> {
    match (call.target.as_slice(), call.single_arg()) {
        ([method], Some(Expr::Str(name))) if CONTAINER_CALLS.contains(&method.as_str()) => {
            Some((name.clone(), matches!(method.as_str(), "getByName" | "named")))
        }
        // Kotlin accessor blocks such as `release { }`
        ([name], None) if call.args.is_none() && call.block.is_some() => Some((name.clone(), true)),
        _ => None,
    }
}

impl Extractor {
    fn signing_configs(&mut self, statements: &[Statement]) -> Result<()> {
        const SCOPE: &str = "android.signingConfigs";
        for stmt in statements {
            let element = match &stmt.kind {
                StatementKind::Call(call) => element_name(call).map(|e| (e, call)),
                _ => None,
            };
            let Some(((name, extends_existing), call)) = element else {
                self.unknown(SCOPE, stmt);
                continue;
            };

            let idx = match self.draft.signing_configs.iter().position(|sc| sc.name == name) {
                Some(idx) => idx,
                None => {
                    let mut config = SigningConfig::new(&name);
                    config.extends_existing = extends_existing;
                    self.draft.signing_configs.push(config);
                    self.draft.signing_configs.len() - 1
                }
            };

            let scope = format!("{}.{}", SCOPE, name);
            for inner in block(call) {
                let StatementKind::Assign { target, value } = &inner.kind else {
                    self.unknown(&scope, inner);
                    continue;
                };
                let key = target.join(".");
                let field = format!("{}.{}", scope, key);
                let line = inner.line;
                match key.as_str() {
                    "storeFile" => {
                        let file = match value {
                            Expr::Call { callee, args, .. }
                                if callee.last().is_some_and(|c| c == "file") && args.len() == 1 =>
                            {
                                self.str_value(&field, &args[0], line)?
                            }
                            other => self.str_value(&field, other, line)?,
                        };
                        self.draft.signing_configs[idx].store_file = file;
                    }
                    "storePassword" => {
                        self.draft.signing_configs[idx].store_password = self.str_value(&field, value, line)?
                    }
                    "keyAlias" => {
                        self.draft.signing_configs[idx].key_alias = self.str_value(&field, value, line)?
                    }
                    "keyPassword" => {
                        self.draft.signing_configs[idx].key_password = self.str_value(&field, value, line)?
                    }
                    _ => self.unknown(&scope, inner),
                }
            }
        }
        Ok(())
    }

    fn build_types(&mut self, statements: &[Statement]) -> Result<()> {
        const SCOPE: &str = "android.buildTypes";
        for stmt in statements {
            let element = match &stmt.kind {
                StatementKind::Call(call) => element_name(call).map(|(name, _)| (name, call)),
                _ => None,
            };
            let Some((name, call)) = element else {
                self.unknown(SCOPE, stmt);
                continue;
            };

            let idx = match self.draft.build_types.iter().position(|bt| bt.name == name) {
                Some(idx) => idx,
                None => {
                    self.draft.build_types.push(BuildType::new(&name));
                    self.draft.build_types.len() - 1
                }
            };

            let scope = format!("{}.{}", SCOPE, name);
            for inner in block(call) {
                let StatementKind::Assign { target, value } = &inner.kind else {
                    self.unknown(&scope, inner);
                    continue;
                };
                let key = target.join(".");
                let field = format!("{}.{}", scope, key);
                let line = inner.line;
                match key.as_str() {
                    "signingConfig" => match signing_reference(value) {
                        Some(reference) => self.draft.build_types[idx].signing_ref = reference,
                        None => self.unsupported(&field, value, line),
                    },
                    "isMinifyEnabled" | "minifyEnabled" => {
                        self.draft.build_types[idx].minify_enabled = self.bool_value(&field, value, line)?
                    }
                    "isShrinkResources" | "shrinkResources" => {
                        self.draft.build_types[idx].shrink_resources = self.bool_value(&field, value, line)?
                    }
                    "isDebuggable" | "debuggable" => {
                        self.draft.build_types[idx].debuggable = self.bool_value(&field, value, line)?
                    }
                    _ => self.unknown(&scope, inner),
                }
            }
        }
        Ok(())
    }

    fn flutter(&mut self, statements: &[Statement]) -> Result<()> {
        for stmt in statements {
            match &stmt.kind {
                StatementKind::Assign { target, value } if target.len() == 1 && target[0] == "source" => {
                    self.draft.flutter_source = self.str_value("flutter.source", value, stmt.line)?
                }
                _ => self.unknown("flutter", stmt),
            }
        }
        Ok(())
    }

    fn dependencies(&mut self, statements: &[Statement]) -> Result<()> {
        for stmt in statements {
            let StatementKind::Call(call) = &stmt.kind else {
                self.unknown("dependencies", stmt);
                continue;
            };
            let [configuration] = call.target.as_slice() else {
                self.unknown("dependencies", stmt);
                continue;
            };
            let field = format!("dependencies.{}", configuration);

            let dependency = if call.arguments().iter().any(|arg| arg.name.is_some()) {
                match self.named_coordinate(&field, call, stmt.line)? {
                    Some(coordinate) => Dependency::parse(configuration, &coordinate)?,
                    None => {
                        self.unknown("dependencies", stmt);
                        continue;
                    }
                }
            } else {
                match call.single_arg() {
                    Some(Expr::Str(coordinate)) => Dependency::parse(configuration, coordinate)?,
                    Some(arg) => match arg.as_call("platform").or_else(|| arg.as_call("enforcedPlatform")) {
                        Some([Expr::Str(coordinate)]) => {
                            Dependency::parse(configuration, coordinate)?.into_platform()
                        }
                        _ => {
                            self.unsupported(&field, arg, stmt.line);
                            continue;
                        }
                    },
                    None => {
                        self.unknown("dependencies", stmt);
                        continue;
                    }
                }
            };

            if call.block.is_some() {
                debug!(dependency = %dependency, "dependency configuration block ignored");
            }
            self.draft.dependencies.push(dependency);
        }
        Ok(())
    }

    /// `group = "g", name = "a", version = "v", classifier = "c"` in any
    /// order, as a `g:a[:v[:c]]` coordinate
    fn named_coordinate(&mut self, field: &str, call: &Call, line: usize) -> Result<Option<String>> {
        let mut parts = Vec::with_capacity(4);
        for key in ["group", "name", "version", "classifier"] {
            let part = match call.named_arg(key) {
                Some(expr) => self.str_value(&format!("{}.{}", field, key), expr, line)?,
                None => None,
            };
            parts.push(part);
        }
        Ok(match parts.as_slice() {
            [Some(group), Some(name), None, None] => Some(format!("{}:{}", group, name)),
            [Some(group), Some(name), Some(version), None] => Some(format!("{}:{}:{}", group, name, version)),
            [Some(group), Some(name), Some(version), Some(classifier)] => {
                Some(format!("{}:{}:{}:{}", group, name, version, classifier))
            }
            _ => None,
        })
    }
}

/// Signing config named by a `signingConfig = ...` value.
/// `Some(None)` is an explicit `null`.
fn signing_reference(expr: &Expr) -> Option<Option<String>> {
    match expr {
        Expr::Call {
            receiver: None,
            callee,
            args,
        } if matches!(callee.as_slice(), [c, m] if c == "signingConfigs" && (m == "getByName" || m == "named")) => {
            match args.as_slice() {
                [Expr::Str(name)] => Some(Some(name.clone())),
                _ => None,
            }
        }
        Expr::Index { receiver, key } if receiver.as_path().as_deref() == Some("signingConfigs") => {
            key.as_str().map(|name| Some(name.to_string()))
        }
        Expr::Path(parts) => match parts.as_slice() {
            [null] if null == "null" => Some(None),
            [c, name] if c == "signingConfigs" => Some(Some(name.clone())),
            _ => None,
        },
        _ => None,
    }
}

fn type_mismatch(field: &str, expected: &str, found: &Value) -> DescriptorError {
    DescriptorError::constraint(
        field,
        format!("expected {}, found {}", expected, found.type_name()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradle::parse;
    use crate::properties::LocalProperties;
    use builddesc_core::config::FlutterConfig;

    fn run(source: &str) -> Result<(Draft, ValidationReport)> {
        let script = parse(source)?;
        let symbols = Symbols::new(&FlutterConfig::default(), &LocalProperties::default()).unwrap();
        extract(&script, symbols, true)
    }

    #[test]
    fn test_plugins_keep_declared_order() {
        let (draft, _) = run(
            "plugins {\n  id(\"com.android.application\")\n  kotlin(\"android\")\n  id(\"x.y\") version \"1.0\" apply false\n  `java-library`\n}\n",
        )
        .unwrap();
        let ids: Vec<&str> = draft.plugins.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["com.android.application", "org.jetbrains.kotlin.android", "x.y", "java-library"]
        );
        assert_eq!(draft.plugins[2].version.as_deref(), Some("1.0"));
        assert!(!draft.plugins[2].apply);
    }

    #[test]
    fn test_unknown_keys_warn_with_scope_and_line() {
        let (_, report) = run("android {\n  lint {\n  }\n  defaultConfig {\n    multiDexEnabled = true\n  }\n}\n").unwrap();
        let fields: Vec<(&str, Option<usize>)> = report
            .warnings()
            .iter()
            .map(|w| (w.field.as_str(), w.line))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("android.lint", Some(2)),
                ("android.defaultConfig.multiDexEnabled", Some(5)),
            ]
        );
        assert!(report.warnings().iter().all(|w| w.code == UNKNOWN_KEY));
    }

    #[test]
    fn test_unknown_keys_silenced() {
        let script = parse("tasks {\n}\n").unwrap();
        let symbols = Symbols::new(&FlutterConfig::default(), &LocalProperties::default()).unwrap();
        let (_, report) = extract(&script, symbols, false).unwrap();
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn test_legacy_call_forms() {
        let (draft, _) = run(
            "android {\n  compileSdkVersion(34)\n  defaultConfig {\n    minSdkVersion(23)\n    targetSdkVersion(34)\n  }\n}\n",
        )
        .unwrap();
        assert_eq!(draft.compile_sdk, Some(34));
        assert_eq!(draft.min_sdk, Some(23));
        assert_eq!(draft.target_sdk, Some(34));
    }

    #[test]
    fn test_type_mismatch_is_constraint_violation() {
        let err = run("android {\n  defaultConfig {\n    minSdk = \"21\"\n  }\n}\n").unwrap_err();
        match err {
            DescriptorError::ConstraintViolation { field, message } => {
                assert_eq!(field, "android.defaultConfig.minSdk");
                assert_eq!(message, "expected integer, found string");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_flutter_symbol_is_unresolved() {
        let err = run("android {\n  compileSdk = flutter.compileSdk\n}\n").unwrap_err();
        match err {
            DescriptorError::UnresolvedReference { kind, name, available } => {
                assert_eq!(kind, "symbol");
                assert_eq!(name, "flutter.compileSdk");
                assert!(available.contains(&"flutter.compileSdkVersion".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_local_val_is_resolved() {
        let (draft, _) = run("val appId = \"com.example.app\"\nandroid {\n  defaultConfig {\n    applicationId = appId\n  }\n}\n").unwrap();
        assert_eq!(draft.application_id.as_deref(), Some("com.example.app"));
    }

    #[test]
    fn test_signing_configs_and_build_types() {
        let (draft, report) = run(
            r#"
android {
    signingConfigs {
        create("release") {
            storeFile = file("upload-keystore.jks")
            storePassword = System.getenv("STORE_PASSWORD")
            keyAlias = "upload"
        }
    }
    buildTypes {
        release {
            signingConfig = signingConfigs.getByName("release")
            isMinifyEnabled = true
        }
        getByName("debug") {
            signingConfig = signingConfigs["debug"]
        }
        create("staging") {
            signingConfig = null
        }
    }
}
"#,
        )
        .unwrap();

        let release = &draft.signing_configs[0];
        assert_eq!(release.name, "release");
        assert!(!release.extends_existing);
        assert_eq!(release.store_file.as_deref(), Some("upload-keystore.jks"));
        assert_eq!(release.store_password, None);
        assert_eq!(release.key_alias.as_deref(), Some("upload"));
        assert_eq!(report.warnings()[0].code, UNSUPPORTED_EXPR);

        let names: Vec<&str> = draft.build_types.iter().map(|bt| bt.name.as_str()).collect();
        assert_eq!(names, vec!["release", "debug", "staging"]);
        assert_eq!(draft.build_types[0].signing_ref.as_deref(), Some("release"));
        assert_eq!(draft.build_types[0].minify_enabled, Some(true));
        assert_eq!(draft.build_types[1].signing_ref.as_deref(), Some("debug"));
        assert_eq!(draft.build_types[2].signing_ref, None);
    }

    #[test]
    fn test_repeated_build_type_blocks_merge() {
        let (draft, _) = run(
            "android {\n  buildTypes {\n    release {\n      isMinifyEnabled = true\n    }\n    getByName(\"release\") {\n      isDebuggable = false\n    }\n  }\n}\n",
        )
        .unwrap();
        assert_eq!(draft.build_types.len(), 1);
        assert_eq!(draft.build_types[0].minify_enabled, Some(true));
        assert_eq!(draft.build_types[0].debuggable, Some(false));
    }

    #[test]
    fn test_dependency_forms() {
        let (draft, report) = run(
            r#"
dependencies {
    implementation(platform("com.google.firebase:firebase-bom:33.1.0"))
    implementation("com.google.firebase:firebase-analytics-ktx")
    testImplementation(version = "4.13.2", name = "junit", group = "org.junit")
    implementation(project(":core"))
    runtimeOnly(group = "com.example", name = "native", version = "1.0", classifier = "arm64")
}
"#,
        )
        .unwrap();
        assert_eq!(draft.dependencies.len(), 4);
        assert!(draft.dependencies[0].platform);
        assert_eq!(draft.dependencies[2].package, "org.junit:junit");
        assert_eq!(draft.dependencies[2].version.as_deref(), Some("4.13.2"));
        assert_eq!(draft.dependencies[3].coordinate(), "com.example:native:1.0:arm64");
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].field, "dependencies.implementation");
    }

    #[test]
    fn test_named_dependency_without_group_is_ignored() {
        let (draft, report) = run("dependencies {\n  implementation(name = \"lib\", version = \"1.0\")\n}\n").unwrap();
        assert!(draft.dependencies.is_empty());
        assert_eq!(report.warnings()[0].code, UNKNOWN_KEY);
    }

    #[test]
    fn test_non_constant_val_is_opaque() {
        let (draft, report) = run(
            "val ns = System.getenv(\"NS\")\nandroid {\n  namespace = ns\n}\n",
        )
        .unwrap();
        assert_eq!(draft.namespace, None);
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].code, UNSUPPORTED_EXPR);
        assert_eq!(report.warnings()[0].field, "android.namespace");
        assert_eq!(report.warnings()[0].line, Some(3));
    }

    #[test]
    fn test_top_level_control_flow_warns() {
        let (_, report) = run("if (file(\"key.properties\").exists()) {\n  println(\"signed\")\n}\n").unwrap();
        assert_eq!(report.warnings().len(), 1);
        assert_eq!(report.warnings()[0].code, UNKNOWN_KEY);
        assert_eq!(report.warnings()[0].line, Some(1));
    }

    #[test]
    fn test_missing_required_property() {
        let (draft, _) = run("android {\n  compileSdk = 35\n}\n").unwrap();
        let err = draft.into_descriptor().unwrap_err();
        match err {
            DescriptorError::ConstraintViolation { field, .. } => {
                assert_eq!(field, "android.defaultConfig.applicationId")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
