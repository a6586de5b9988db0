//! Loading a descriptor from a build script
//!
//! The pipeline is parse, resolve symbols, extract, check required fields and
//! validate. The first hard error aborts; non-fatal findings are returned in
//! the [`Loaded`] report.

use crate::descriptor::BuildDescriptor;
use crate::error::Result;
use crate::extract::extract;
use crate::gradle::parse;
use crate::properties::LocalProperties;
use crate::symbols::Symbols;
use builddesc_core::config::{Config, ConfigSchema};
use builddesc_core::validation::{ValidationIssue, ValidationReport};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A validated descriptor and the warnings raised while loading it
#[derive(Debug, Clone)]
pub struct Loaded {
    /// The validated descriptor
    pub descriptor: BuildDescriptor,
    /// Warnings only; errors abort loading
    pub report: ValidationReport,
}

impl Loaded {
    /// Unknown keys and unevaluated expressions
    pub fn warnings(&self) -> &[ValidationIssue] {
        self.report.warnings()
    }
}

/// Loads build scripts into validated descriptors
#[derive(Debug, Clone, Default)]
pub struct DescriptorLoader {
    config: ConfigSchema,
    properties: Option<LocalProperties>,
}

impl DescriptorLoader {
    /// Loader with the given settings
    pub fn new(config: ConfigSchema) -> Self {
        Self {
            config,
            properties: None,
        }
    }

    /// Loader using the settings of a loaded `builddesc.toml`
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.schema.clone())
    }

    /// Use these properties instead of discovering `local.properties`
    pub fn with_local_properties(mut self, properties: LocalProperties) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Settings in effect
    pub fn config(&self) -> &ConfigSchema {
        &self.config
    }

    /// Load a script from text
    pub fn load_str(&self, source: &str) -> Result<Loaded> {
        let properties = self.properties.clone().unwrap_or_default();
        self.load_with(source, &properties)
    }

    /// Load a script from disk
    ///
    /// `local.properties` is looked up next to the script and one directory
    /// up unless properties were supplied explicitly.
    pub fn load_path(&self, path: &Path) -> Result<Loaded> {
        let source = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = source.len(), "read build script");

        let properties = match &self.properties {
            Some(props) => props.clone(),
            None => match path.parent() {
                Some(dir) => LocalProperties::discover(dir)?,
                None => LocalProperties::default(),
            },
        };
        self.load_with(&source, &properties)
    }

    fn load_with(&self, source: &str, properties: &LocalProperties) -> Result<Loaded> {
        let script = parse(source)?;
        debug!(statements = script.statements.len(), "parsed build script");

        let symbols = Symbols::new(&self.config.flutter, properties)?;
        let (draft, report) = extract(&script, symbols, self.config.validation.warn_unknown_keys)?;
        let descriptor = draft.into_descriptor()?;
        descriptor.validate(&self.config)?;

        info!(
            application_id = %descriptor.application_id,
            plugins = descriptor.plugins.len(),
            dependencies = descriptor.dependencies.len(),
            warnings = report.warnings().len(),
            "loaded build descriptor"
        );
        Ok(Loaded { descriptor, report })
    }
}

/// Load a script from text with default settings
pub fn load_str(source: &str) -> Result<Loaded> {
    DescriptorLoader::default().load_str(source)
}

/// Load a script from disk with default settings
pub fn load_path(path: &Path) -> Result<Loaded> {
    DescriptorLoader::default().load_path(path)
}
