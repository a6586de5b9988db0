//! Dependency declarations

use crate::error::{DescriptorError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

static COORDINATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_.\-]+):([A-Za-z0-9_.\-]+)(?::([^:\s]+)(?::([A-Za-z0-9_.\-]+))?)?$")
        .expect("coordinate pattern is valid")
});

/// One entry of the `dependencies { }` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Gradle configuration, e.g. `implementation` or `testImplementation`
    pub configuration: String,
    /// `group:artifact`
    pub package: String,
    /// Pinned version; `None` when a BOM or plugin supplies it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Artifact classifier, e.g. `sources` or a native ABI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    /// Declared through `platform(...)` (a BOM import)
    #[serde(default)]
    pub platform: bool,
}

impl Dependency {
    /// Parse a `group:artifact[:version[:classifier]]` coordinate
    pub fn parse(configuration: &str, coordinate: &str) -> Result<Self> {
        let caps = COORDINATE_RE.captures(coordinate.trim()).ok_or_else(|| {
            DescriptorError::constraint(
                format!("dependencies.{}", configuration),
                format!("'{}' is not a group:artifact[:version[:classifier]] coordinate", coordinate),
            )
        })?;

        Ok(Self {
            configuration: configuration.to_string(),
            package: format!("{}:{}", &caps[1], &caps[2]),
            version: caps.get(3).map(|m| m.as_str().to_string()),
            classifier: caps.get(4).map(|m| m.as_str().to_string()),
            platform: false,
        })
    }

    /// Mark as a `platform(...)` import
    pub fn into_platform(mut self) -> Self {
        self.platform = true;
        self
    }

    /// The full coordinate string
    pub fn coordinate(&self) -> String {
        let mut coordinate = self.package.clone();
        if let Some(version) = &self.version {
            coordinate.push(':');
            coordinate.push_str(version);
            if let Some(classifier) = &self.classifier {
                coordinate.push(':');
                coordinate.push_str(classifier);
            }
        }
        coordinate
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.platform {
            write!(f, "{}(platform(\"{}\"))", self.configuration, self.coordinate())
        } else {
            write!(f, "{}(\"{}\")", self.configuration, self.coordinate())
        }
    }
}

/// Reject a package declared twice, in the same or different configurations.
/// `platform(...)` imports are keyed per configuration: the same BOM is
/// commonly imported for both main and test classpaths.
pub fn check_duplicates(dependencies: &[Dependency]) -> Result<()> {
    let mut seen = HashSet::new();
    for dep in dependencies {
        let scope = dep.platform.then_some(dep.configuration.as_str());
        if !seen.insert((scope, dep.package.as_str())) {
            return Err(DescriptorError::DuplicateDependency {
                configuration: dep.configuration.clone(),
                package: dep.package.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_version() {
        let dep = Dependency::parse("implementation", "com.google.firebase:firebase-analytics-ktx").unwrap();
        assert_eq!(dep.package, "com.google.firebase:firebase-analytics-ktx");
        assert_eq!(dep.version, None);
        assert!(!dep.platform);
    }

    #[test]
    fn test_parse_with_version() {
        let dep = Dependency::parse("api", "androidx.core:core-ktx:1.13.1").unwrap();
        assert_eq!(dep.package, "androidx.core:core-ktx");
        assert_eq!(dep.version.as_deref(), Some("1.13.1"));
        assert_eq!(dep.coordinate(), "androidx.core:core-ktx:1.13.1");
    }

    #[test]
    fn test_parse_rejects_bad_coordinate() {
        assert!(matches!(
            Dependency::parse("implementation", "firebase-analytics"),
            Err(DescriptorError::ConstraintViolation { .. })
        ));
        assert!(Dependency::parse("implementation", "a:b:c:d:e").is_err());
        assert!(Dependency::parse("implementation", "a:b:1.0:x86 64").is_err());
    }

    #[test]
    fn test_parse_with_classifier() {
        let dep = Dependency::parse("runtimeOnly", "org.lwjgl:lwjgl:3.3.3:natives-linux").unwrap();
        assert_eq!(dep.package, "org.lwjgl:lwjgl");
        assert_eq!(dep.version.as_deref(), Some("3.3.3"));
        assert_eq!(dep.classifier.as_deref(), Some("natives-linux"));
        assert_eq!(dep.coordinate(), "org.lwjgl:lwjgl:3.3.3:natives-linux");
        assert_eq!(dep.to_string(), "runtimeOnly(\"org.lwjgl:lwjgl:3.3.3:natives-linux\")");
    }

    #[test]
    fn test_display_platform() {
        let dep = Dependency::parse("implementation", "com.google.firebase:firebase-bom:33.1.0")
            .unwrap()
            .into_platform();
        assert_eq!(
            dep.to_string(),
            "implementation(platform(\"com.google.firebase:firebase-bom:33.1.0\"))"
        );
    }

    #[test]
    fn test_duplicate_in_same_configuration() {
        let deps = vec![
            Dependency::parse("implementation", "com.example:lib").unwrap(),
            Dependency::parse("implementation", "com.example:lib:2.0").unwrap(),
        ];
        match check_duplicates(&deps) {
            Err(DescriptorError::DuplicateDependency { package, .. }) => {
                assert_eq!(package, "com.example:lib")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_across_configurations() {
        let deps = vec![
            Dependency::parse("implementation", "com.example:lib").unwrap(),
            Dependency::parse("api", "com.example:lib:1.1").unwrap(),
        ];
        match check_duplicates(&deps) {
            Err(DescriptorError::DuplicateDependency { configuration, package }) => {
                assert_eq!(configuration, "api");
                assert_eq!(package, "com.example:lib");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_platform_import_per_configuration() {
        let bom = "com.google.firebase:firebase-bom:33.1.0";
        let deps = vec![
            Dependency::parse("implementation", bom).unwrap().into_platform(),
            Dependency::parse("androidTestImplementation", bom).unwrap().into_platform(),
        ];
        assert!(check_duplicates(&deps).is_ok());

        let twice = vec![deps[0].clone(), deps[0].clone()];
        assert!(check_duplicates(&twice).is_err());
    }
}
