//! The typed build descriptor
//!
//! A [`BuildDescriptor`] is what an app module's `build.gradle.kts` declares,
//! with every symbolic value (`flutter.versionCode`, `JavaVersion.VERSION_11`)
//! already resolved.

use crate::dependency::Dependency;
use crate::plugins::Plugin;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the build type whose signing config is the descriptor's signing reference
pub const RELEASE_BUILD_TYPE: &str = "release";

/// Validated build configuration of an Android app module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDescriptor {
    /// Reverse-domain application id, e.g. `com.example.assignment`
    pub application_id: String,
    /// Package of the generated `R` and `BuildConfig` classes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// `defaultConfig.minSdk`
    pub min_sdk: u32,
    /// `defaultConfig.targetSdk`
    pub target_sdk: u32,
    /// `compileSdk`
    pub compile_sdk: u32,
    /// `ndkVersion`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndk_version: Option<String>,
    /// Positive integer, monotonic across releases
    pub version_code: u32,
    /// Human-readable version, e.g. `1.0.0`
    pub version_name: String,
    /// Declaration order is application order
    pub plugins: Vec<Plugin>,
    /// Declaration order is kept
    pub dependencies: Vec<Dependency>,
    /// Java and Kotlin bytecode levels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<JavaOptions>,
    /// Declared signing configs; `debug` exists without a declaration
    #[serde(default)]
    pub signing_configs: Vec<SigningConfig>,
    /// Configured build types, in declaration order
    #[serde(default)]
    pub build_types: Vec<BuildType>,
    /// `flutter { source = ... }`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flutter_source: Option<String>,
}

impl BuildDescriptor {
    /// The signing config the release build is signed with
    pub fn signing_ref(&self) -> Option<&str> {
        self.build_type(RELEASE_BUILD_TYPE)
            .and_then(|bt| bt.signing_ref.as_deref())
    }

    /// Look up a build type by name
    pub fn build_type(&self, name: &str) -> Option<&BuildType> {
        self.build_types.iter().find(|bt| bt.name == name)
    }

    /// Look up a declared signing config by name
    pub fn signing_config(&self, name: &str) -> Option<&SigningConfig> {
        self.signing_configs.iter().find(|sc| sc.name == name)
    }

    /// Serialize for hand-off to the build engine
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `compileOptions { }` and `kotlinOptions { }` settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaOptions {
    /// `compileOptions.sourceCompatibility`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_compatibility: Option<JavaVersion>,
    /// `compileOptions.targetCompatibility`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_compatibility: Option<JavaVersion>,
    /// `kotlinOptions.jvmTarget`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_target: Option<String>,
}

impl JavaOptions {
    /// No option set
    pub fn is_empty(&self) -> bool {
        self.source_compatibility.is_none()
            && self.target_compatibility.is_none()
            && self.jvm_target.is_none()
    }
}

/// A `JavaVersion` constant, stored as its version string (`"11"`, `"1.8"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JavaVersion(String);

impl JavaVersion {
    /// Parse a constant name such as `VERSION_11` or `VERSION_1_8`
    pub fn from_constant(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("VERSION_")?;
        if rest.is_empty() || !rest.split('_').all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())) {
            return None;
        }
        Some(Self(rest.replace('_', ".")))
    }

    /// Parse a version string such as `11` or `1.8`
    pub fn from_version(version: &str) -> Option<Self> {
        Self::from_constant(&format!("VERSION_{}", version.trim().replace('.', "_")))
    }

    /// The constant name, e.g. `VERSION_1_8`
    pub fn constant_name(&self) -> String {
        format!("VERSION_{}", self.0.replace('.', "_"))
    }

    /// The version string, as `JavaVersion.toString()` renders it
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JavaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry of `signingConfigs { }`
///
/// Only literal values are captured. Passwords are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Container element name
    pub name: String,
    /// Declared with `getByName(...)`, configuring a config the Android plugin already defines
    #[serde(default)]
    pub extends_existing: bool,
    /// Keystore path, relative to the module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_file: Option<String>,
    /// Literal keystore password
    #[serde(default, skip_serializing)]
    pub store_password: Option<String>,
    /// Key alias inside the keystore
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_alias: Option<String>,
    /// Literal key password
    #[serde(default, skip_serializing)]
    pub key_password: Option<String>,
}

impl SigningConfig {
    /// An empty config declared with `create(name)`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An entry of `buildTypes { }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildType {
    /// Container element name, e.g. `release`
    pub name: String,
    /// Name of the signing config this build type uses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_ref: Option<String>,
    /// `isMinifyEnabled`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minify_enabled: Option<bool>,
    /// `isShrinkResources`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink_resources: Option<bool>,
    /// `isDebuggable`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debuggable: Option<bool>,
}

impl BuildType {
    /// A build type with nothing configured
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_version_constants() {
        let v11 = JavaVersion::from_constant("VERSION_11").unwrap();
        assert_eq!(v11.as_str(), "11");
        assert_eq!(v11.constant_name(), "VERSION_11");

        let v18 = JavaVersion::from_constant("VERSION_1_8").unwrap();
        assert_eq!(v18.to_string(), "1.8");
        assert_eq!(v18.constant_name(), "VERSION_1_8");

        assert!(JavaVersion::from_constant("VERSION_").is_none());
        assert!(JavaVersion::from_constant("VERSION_HIGHER").is_none());
        assert!(JavaVersion::from_constant("current").is_none());

        assert_eq!(JavaVersion::from_version("17").unwrap().constant_name(), "VERSION_17");
        assert_eq!(JavaVersion::from_version("1.8"), Some(v18));
        assert!(JavaVersion::from_version("eleven").is_none());
    }

    #[test]
    fn test_signing_ref_reads_release_build_type() {
        let mut release = BuildType::new("release");
        release.signing_ref = Some("debug".into());
        let descriptor = BuildDescriptor {
            application_id: "com.example.assignment".into(),
            namespace: None,
            min_sdk: 21,
            target_sdk: 35,
            compile_sdk: 35,
            ndk_version: None,
            version_code: 1,
            version_name: "1.0.0".into(),
            plugins: vec![],
            dependencies: vec![],
            java: None,
            signing_configs: vec![],
            build_types: vec![BuildType::new("debug"), release],
            flutter_source: None,
        };
        assert_eq!(descriptor.signing_ref(), Some("debug"));
        assert!(descriptor.signing_config("debug").is_none());
    }

    #[test]
    fn test_passwords_are_not_serialized() {
        let mut config = SigningConfig::new("release");
        config.store_password = Some("hunter2".into());
        config.key_alias = Some("upload".into());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(json.contains("upload"));
    }
}
