//! Semantic validation of a build descriptor
//!
//! Rules run in a fixed order so the first failure is deterministic. Loading
//! stops at the first failure; [`BuildDescriptor::audit`] runs every rule and
//! reports all of them.

use crate::dependency::check_duplicates;
use crate::descriptor::BuildDescriptor;
use crate::error::{DescriptorError, Result};
use crate::plugins::check_order;
use builddesc_core::config::ConfigSchema;
use builddesc_core::validation::{ValidationIssue, ValidationReport};
use once_cell::sync::Lazy;
use regex::Regex;

static APPLICATION_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_]*(\.[a-zA-Z][a-zA-Z0-9_]*)+$")
        .expect("application id pattern is valid")
});

type Rule = fn(&BuildDescriptor, &ConfigSchema) -> Result<()>;

const RULES: &[Rule] = &[
    application_id,
    sdk_floor,
    sdk_order,
    version,
    plugin_order,
    signing_refs,
    duplicate_dependencies,
];

impl BuildDescriptor {
    /// Check every rule, stopping at the first violation
    pub fn validate(&self, config: &ConfigSchema) -> Result<()> {
        RULES.iter().try_for_each(|rule| rule(self, config))
    }

    /// Check every rule and collect all violations
    pub fn audit(&self, config: &ConfigSchema) -> ValidationReport {
        let mut report = ValidationReport::new();
        for rule in RULES {
            if let Err(err) = rule(self, config) {
                report.add_error(issue(&err));
            }
        }
        report
    }
}

fn issue(err: &DescriptorError) -> ValidationIssue {
    let field = match err {
        DescriptorError::ConstraintViolation { field, .. } => field.clone(),
        DescriptorError::UnresolvedReference { .. } => "android.buildTypes".to_string(),
        DescriptorError::DuplicateDependency { configuration, .. } => {
            format!("dependencies.{}", configuration)
        }
        _ => String::new(),
    };
    ValidationIssue::new(field, err.to_string(), err.code().to_string())
}

fn is_reverse_domain(id: &str) -> bool {
    APPLICATION_ID_RE.is_match(id)
}

fn application_id(d: &BuildDescriptor, _: &ConfigSchema) -> Result<()> {
    if !is_reverse_domain(&d.application_id) {
        return Err(DescriptorError::constraint(
            "android.defaultConfig.applicationId",
            format!(
                "'{}' is not a reverse-domain identifier such as com.example.app",
                d.application_id
            ),
        ));
    }
    if let Some(namespace) = &d.namespace {
        if !is_reverse_domain(namespace) {
            return Err(DescriptorError::constraint(
                "android.namespace",
                format!("'{}' is not a valid package name", namespace),
            ));
        }
    }
    Ok(())
}

fn sdk_floor(d: &BuildDescriptor, config: &ConfigSchema) -> Result<()> {
    let floor = config.sdk.min_floor;
    if d.min_sdk < floor {
        return Err(DescriptorError::constraint(
            "android.defaultConfig.minSdk",
            format!(
                "minSdk {} is below {}, the lowest level the declared dependencies support",
                d.min_sdk, floor
            ),
        ));
    }
    Ok(())
}

fn sdk_order(d: &BuildDescriptor, _: &ConfigSchema) -> Result<()> {
    if d.min_sdk > d.target_sdk {
        return Err(DescriptorError::constraint(
            "android.defaultConfig.targetSdk",
            format!("targetSdk {} is lower than minSdk {}", d.target_sdk, d.min_sdk),
        ));
    }
    if d.target_sdk > d.compile_sdk {
        return Err(DescriptorError::constraint(
            "android.compileSdk",
            format!("compileSdk {} is lower than targetSdk {}", d.compile_sdk, d.target_sdk),
        ));
    }
    Ok(())
}

fn version(d: &BuildDescriptor, _: &ConfigSchema) -> Result<()> {
    if d.version_code == 0 {
        return Err(DescriptorError::constraint(
            "android.defaultConfig.versionCode",
            "versionCode must be a positive integer",
        ));
    }
    if d.version_name.trim().is_empty() {
        return Err(DescriptorError::constraint(
            "android.defaultConfig.versionName",
            "versionName must not be empty",
        ));
    }
    Ok(())
}

fn plugin_order(d: &BuildDescriptor, _: &ConfigSchema) -> Result<()> {
    check_order(&d.plugins)
}

fn signing_refs(d: &BuildDescriptor, config: &ConfigSchema) -> Result<()> {
    let mut available: Vec<String> = config.signing.implicit_configs.clone();
    for declared in &d.signing_configs {
        if !available.contains(&declared.name) {
            available.push(declared.name.clone());
        }
    }

    for build_type in &d.build_types {
        if let Some(reference) = &build_type.signing_ref {
            if !available.contains(reference) {
                return Err(DescriptorError::UnresolvedReference {
                    kind: "signing config".to_string(),
                    name: reference.clone(),
                    available,
                });
            }
        }
    }
    Ok(())
}

fn duplicate_dependencies(d: &BuildDescriptor, _: &ConfigSchema) -> Result<()> {
    check_duplicates(&d.dependencies)
}
