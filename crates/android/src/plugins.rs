//! Plugin identifiers and declaration-order rules
//!
//! Gradle applies plugins in the order they are declared. A plugin that hooks
//! into the Android or Kotlin extensions only sees them if those plugins were
//! applied first, so the order of the `plugins { }` block is significant.

use crate::error::{DescriptorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A Gradle plugin id, e.g. `com.android.application`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    /// Wrap a plugin id as declared
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Expand the `kotlin("android")` shorthand
    pub fn kotlin(module: &str) -> Self {
        Self(format!("org.jetbrains.kotlin.{}", module))
    }

    /// The id string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// What the plugin is, for ordering purposes
    pub fn kind(&self) -> PluginKind {
        match self.0.as_str() {
            "com.android.application" => PluginKind::AndroidApplication,
            "com.android.library" => PluginKind::AndroidLibrary,
            "kotlin-android" | "org.jetbrains.kotlin.android" => PluginKind::KotlinAndroid,
            "dev.flutter.flutter-gradle-plugin" => PluginKind::Flutter,
            "com.google.gms.google-services" => PluginKind::GoogleServices,
            "com.google.firebase.crashlytics" => PluginKind::Crashlytics,
            _ => PluginKind::Other,
        }
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plugins the ordering rules know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    /// `com.android.application`
    AndroidApplication,
    /// `com.android.library`
    AndroidLibrary,
    /// `kotlin-android` / `org.jetbrains.kotlin.android`
    KotlinAndroid,
    /// `dev.flutter.flutter-gradle-plugin`
    Flutter,
    /// `com.google.gms.google-services`
    GoogleServices,
    /// `com.google.firebase.crashlytics`
    Crashlytics,
    /// Anything else
    Other,
}

/// A `plugins { }` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Plugin id as declared
    pub id: PluginId,
    /// `version "x"` suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// `false` for `apply false` declarations
    #[serde(default = "default_apply")]
    pub apply: bool,
}

fn default_apply() -> bool {
    true
}

impl Plugin {
    /// An applied plugin without a version
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: PluginId::new(id),
            version: None,
            apply: true,
        }
    }
}

struct OrderingRule {
    plugin: PluginKind,
    after: &'static [PluginKind],
}

const ORDERING_RULES: &[OrderingRule] = &[
    OrderingRule {
        plugin: PluginKind::KotlinAndroid,
        after: &[PluginKind::AndroidApplication, PluginKind::AndroidLibrary],
    },
    OrderingRule {
        plugin: PluginKind::Flutter,
        after: &[
            PluginKind::AndroidApplication,
            PluginKind::AndroidLibrary,
            PluginKind::KotlinAndroid,
        ],
    },
    OrderingRule {
        plugin: PluginKind::GoogleServices,
        after: &[PluginKind::AndroidApplication],
    },
    OrderingRule {
        plugin: PluginKind::Crashlytics,
        after: &[PluginKind::AndroidApplication],
    },
];

/// Reject repeated plugin ids and applied plugins declared before the
/// plugins they hook into. Rules only fire when both plugins are applied.
pub fn check_order(plugins: &[Plugin]) -> Result<()> {
    let mut seen = HashSet::new();
    for plugin in plugins {
        if !seen.insert(&plugin.id) {
            return Err(DescriptorError::constraint(
                "plugins",
                format!("plugin '{}' is declared more than once", plugin.id),
            ));
        }
    }

    let applied: Vec<&Plugin> = plugins.iter().filter(|p| p.apply).collect();
    for (idx, plugin) in applied.iter().enumerate() {
        let kind = plugin.id.kind();
        for rule in ORDERING_RULES.iter().filter(|r| r.plugin == kind) {
            for required in rule.after {
                let later = applied[idx + 1..]
                    .iter()
                    .find(|p| p.id.kind() == *required);
                if let Some(prerequisite) = later {
                    return Err(DescriptorError::constraint(
                        "plugins",
                        format!(
                            "plugin '{}' must be declared after '{}'",
                            plugin.id, prerequisite.id
                        ),
                    ));
                }
            }
        }
    }

    Ok(())
}
