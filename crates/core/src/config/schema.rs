//! Configuration schema definitions
//!
//! Loader settings shared by every descriptor dialect.

use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ConfigSchema {
    /// `[sdk]`
    #[serde(default)]
    pub sdk: SdkConfig,

    /// `[flutter]`
    #[serde(default)]
    pub flutter: FlutterConfig,

    /// `[signing]`
    #[serde(default)]
    pub signing: SigningConfig,

    /// `[validation]`
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// SDK constraints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SdkConfig {
    /// Lowest `minSdk` the declared dependency surface supports
    #[serde(default = "default_min_floor")]
    pub min_floor: u32,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            min_floor: default_min_floor(),
        }
    }
}

fn default_min_floor() -> u32 {
    21
}

/// Values the Flutter Gradle plugin exposes as `flutter.*`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlutterConfig {
    /// `flutter.compileSdkVersion`
    #[serde(default = "default_compile_sdk")]
    pub compile_sdk_version: u32,

    /// `flutter.targetSdkVersion`
    #[serde(default = "default_target_sdk")]
    pub target_sdk_version: u32,

    /// `flutter.minSdkVersion`
    #[serde(default = "default_min_sdk")]
    pub min_sdk_version: u32,

    /// `flutter.ndkVersion`
    #[serde(default = "default_ndk_version")]
    pub ndk_version: String,

    /// Fallback when `local.properties` carries no `flutter.versionCode`
    #[serde(default = "default_version_code")]
    pub version_code: u32,

    /// Fallback when `local.properties` carries no `flutter.versionName`
    #[serde(default = "default_version_name")]
    pub version_name: String,
}

impl Default for FlutterConfig {
    fn default() -> Self {
        Self {
            compile_sdk_version: default_compile_sdk(),
            target_sdk_version: default_target_sdk(),
            min_sdk_version: default_min_sdk(),
            ndk_version: default_ndk_version(),
            version_code: default_version_code(),
            version_name: default_version_name(),
        }
    }
}

fn default_compile_sdk() -> u32 {
    35
}

fn default_target_sdk() -> u32 {
    35
}

fn default_min_sdk() -> u32 {
    21
}

fn default_ndk_version() -> String {
    "27.0.12077973".to_string()
}

fn default_version_code() -> u32 {
    1
}

fn default_version_name() -> String {
    "1.0.0".to_string()
}

/// Signing configuration resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SigningConfig {
    /// Signing configs the Android plugin defines without a declaration
    #[serde(default = "default_implicit_configs")]
    pub implicit_configs: Vec<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            implicit_configs: default_implicit_configs(),
        }
    }
}

fn default_implicit_configs() -> Vec<String> {
    vec!["debug".to_string()]
}

/// Validation behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
    /// Record a warning for keys the loader does not understand
    #[serde(default = "default_true")]
    pub warn_unknown_keys: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            warn_unknown_keys: true,
        }
    }
}

fn default_true() -> bool {
    true
}
