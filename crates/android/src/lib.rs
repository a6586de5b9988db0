//! Android app build descriptors
//!
//! This crate reads the app module's `build.gradle.kts` of an Android (or
//! Flutter) project into a typed, validated [`BuildDescriptor`]:
//!
//! - Parsing of Kotlin DSL build scripts with tree-sitter-kotlin
//! - Resolution of `flutter.*`, `JavaVersion` and local `val` symbols
//! - Validation of SDK levels, plugin order, signing references and dependencies
//! - Rendering a descriptor back to a canonical build script
//!
//! # Example
//!
//! ```rust,no_run
//! use builddesc_android::load_path;
//! use std::path::Path;
//!
//! let loaded = load_path(Path::new("android/app/build.gradle.kts")).unwrap();
//! println!("{} signs release with {:?}", loaded.descriptor.application_id, loaded.descriptor.signing_ref());
//! ```

#![warn(missing_docs)]

pub mod dependency;
pub mod descriptor;
pub mod error;
mod extract;
pub mod gradle;
pub mod loader;
pub mod plugins;
pub mod properties;
pub mod symbols;
mod validate;
pub mod writer;

pub use dependency::Dependency;
pub use descriptor::{BuildDescriptor, BuildType, JavaOptions, JavaVersion, SigningConfig};
pub use error::{DescriptorError, Result};
pub use loader::{load_path, load_str, DescriptorLoader, Loaded};
pub use plugins::{Plugin, PluginId, PluginKind};
pub use properties::LocalProperties;
pub use writer::to_gradle_kts;
