//! Rendering a descriptor back to `build.gradle.kts`
//!
//! Output is canonical: four-space indentation, sections in a fixed order
//! and every symbolic value replaced by the literal it resolved to. Loading
//! the rendered script yields an equal descriptor.

use crate::dependency::Dependency;
use crate::descriptor::{BuildDescriptor, BuildType, JavaOptions, SigningConfig};
use crate::plugins::Plugin;

const INDENT: &str = "    ";

/// Build types the Android plugin creates, configured with accessor blocks
const BUILT_IN_BUILD_TYPES: &[&str] = &["debug", "release"];

impl BuildDescriptor {
    /// Render as a Kotlin DSL build script
    pub fn to_script(&self) -> String {
        to_gradle_kts(self)
    }
}

/// Render a descriptor as a Kotlin DSL build script
pub fn to_gradle_kts(descriptor: &BuildDescriptor) -> String {
    let mut w = ScriptWriter::default();

    if !descriptor.plugins.is_empty() {
        w.open("plugins");
        for plugin in &descriptor.plugins {
            w.line(&plugin_line(plugin));
        }
        w.close();
        w.blank();
    }

    android(&mut w, descriptor);

    if let Some(source) = &descriptor.flutter_source {
        w.blank();
        w.open("flutter");
        w.line(&format!("source = {}", quote(source)));
        w.close();
    }

    if !descriptor.dependencies.is_empty() {
        w.blank();
        w.open("dependencies");
        for dep in &descriptor.dependencies {
            w.line(&dependency_line(dep));
        }
        w.close();
    }

    w.finish()
}

fn android(w: &mut ScriptWriter, d: &BuildDescriptor) {
    w.open("android");
    if let Some(namespace) = &d.namespace {
        w.line(&format!("namespace = {}", quote(namespace)));
    }
    w.line(&format!("compileSdk = {}", d.compile_sdk));
    if let Some(ndk) = &d.ndk_version {
        w.line(&format!("ndkVersion = {}", quote(ndk)));
    }

    if let Some(java) = &d.java {
        java_options(w, java);
    }

    w.blank();
    w.open("defaultConfig");
    w.line(&format!("applicationId = {}", quote(&d.application_id)));
    w.line(&format!("minSdk = {}", d.min_sdk));
    w.line(&format!("targetSdk = {}", d.target_sdk));
    w.line(&format!("versionCode = {}", d.version_code));
    w.line(&format!("versionName = {}", quote(&d.version_name)));
    w.close();

    if !d.signing_configs.is_empty() {
        w.blank();
        w.open("signingConfigs");
        for config in &d.signing_configs {
            signing_config(w, config);
        }
        w.close();
    }

    if !d.build_types.is_empty() {
        w.blank();
        w.open("buildTypes");
        for bt in &d.build_types {
            build_type(w, bt);
        }
        w.close();
    }
    w.close();
}

fn java_options(w: &mut ScriptWriter, java: &JavaOptions) {
    if java.source_compatibility.is_some() || java.target_compatibility.is_some() {
        w.blank();
        w.open("compileOptions");
        if let Some(v) = &java.source_compatibility {
            w.line(&format!("sourceCompatibility = JavaVersion.{}", v.constant_name()));
        }
        if let Some(v) = &java.target_compatibility {
            w.line(&format!("targetCompatibility = JavaVersion.{}", v.constant_name()));
        }
        w.close();
    }

    if let Some(target) = &java.jvm_target {
        w.blank();
        w.open("kotlinOptions");
        w.line(&format!("jvmTarget = {}", quote(target)));
        w.close();
    }
}

fn signing_config(w: &mut ScriptWriter, config: &SigningConfig) {
    let header = if config.extends_existing {
        format!("getByName({})", quote(&config.name))
    } else {
        format!("create({})", quote(&config.name))
    };
    w.open(&header);
    if let Some(file) = &config.store_file {
        w.line(&format!("storeFile = file({})", quote(file)));
    }
    if let Some(password) = &config.store_password {
        w.line(&format!("storePassword = {}", quote(password)));
    }
    if let Some(alias) = &config.key_alias {
        w.line(&format!("keyAlias = {}", quote(alias)));
    }
    if let Some(password) = &config.key_password {
        w.line(&format!("keyPassword = {}", quote(password)));
    }
    w.close();
}

fn build_type(w: &mut ScriptWriter, build_type: &BuildType) {
    let header = if BUILT_IN_BUILD_TYPES.contains(&build_type.name.as_str()) {
        build_type.name.clone()
    } else {
        format!("create({})", quote(&build_type.name))
    };
    w.open(&header);
    if let Some(reference) = &build_type.signing_ref {
        w.line(&format!(
            "signingConfig = signingConfigs.getByName({})",
            quote(reference)
        ));
    }
    if let Some(v) = build_type.minify_enabled {
        w.line(&format!("isMinifyEnabled = {}", v));
    }
    if let Some(v) = build_type.shrink_resources {
        w.line(&format!("isShrinkResources = {}", v));
    }
    if let Some(v) = build_type.debuggable {
        w.line(&format!("isDebuggable = {}", v));
    }
    w.close();
}

fn plugin_line(plugin: &Plugin) -> String {
    let mut line = format!("id({})", quote(plugin.id.as_str()));
    if let Some(version) = &plugin.version {
        line.push_str(&format!(" version {}", quote(version)));
    }
    if !plugin.apply {
        line.push_str(" apply false");
    }
    line
}

fn dependency_line(dep: &Dependency) -> String {
    let coordinate = quote(&dep.coordinate());
    if dep.platform {
        format!("{}(platform({}))", dep.configuration, coordinate)
    } else {
        format!("{}({})", dep.configuration, coordinate)
    }
}

/// A Kotlin string literal with `\`, `"`, `$` and newlines escaped
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[derive(Default)]
struct ScriptWriter {
    out: String,
    depth: usize,
}

impl ScriptWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Blank separator line, never doubled and never right after `{`
    fn blank(&mut self) {
        if self.out.is_empty() || self.out.ends_with("\n\n") || self.out.ends_with("{\n") {
            return;
        }
        self.out.push('\n');
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::JavaVersion;

    fn minimal() -> BuildDescriptor {
        BuildDescriptor {
            application_id: "com.example.app".into(),
            namespace: None,
            min_sdk: 21,
            target_sdk: 34,
            compile_sdk: 34,
            ndk_version: None,
            version_code: 3,
            version_name: "1.2.0".into(),
            plugins: vec![],
            dependencies: vec![],
            java: None,
            signing_configs: vec![],
            build_types: vec![],
            flutter_source: None,
        }
    }

    #[test]
    fn test_minimal_output() {
        let expected = "\
android {
    compileSdk = 34

    defaultConfig {
        applicationId = \"com.example.app\"
        minSdk = 21
        targetSdk = 34
        versionCode = 3
        versionName = \"1.2.0\"
    }
}
";
        assert_eq!(minimal().to_script(), expected);
    }

    #[test]
    fn test_sections_and_headers() {
        let mut d = minimal();
        d.plugins = vec![Plugin::new("com.android.application")];
        d.plugins.push(Plugin {
            version: Some("4.4.2".into()),
            apply: false,
            ..Plugin::new("com.google.gms.google-services")
        });
        d.java = Some(JavaOptions {
            source_compatibility: JavaVersion::from_version("1.8"),
            target_compatibility: None,
            jvm_target: Some("1.8".into()),
        });
        d.signing_configs = vec![SigningConfig::new("upload")];
        let mut staging = BuildType::new("staging");
        staging.signing_ref = Some("upload".into());
        staging.debuggable = Some(true);
        d.build_types = vec![BuildType::new("release"), staging];
        d.dependencies = vec![Dependency::parse("implementation", "com.google.firebase:firebase-bom:33.1.0")
            .unwrap()
            .into_platform()];

        let script = d.to_script();
        assert!(script.starts_with("plugins {\n    id(\"com.android.application\")\n"));
        assert!(script.contains("    id(\"com.google.gms.google-services\") version \"4.4.2\" apply false\n"));
        assert!(script.contains("        sourceCompatibility = JavaVersion.VERSION_1_8\n"));
        assert!(!script.contains("targetCompatibility"));
        assert!(script.contains("    kotlinOptions {\n        jvmTarget = \"1.8\"\n    }\n"));
        assert!(script.contains("        create(\"upload\") {\n        }\n"));
        assert!(script.contains("        release {\n        }\n"));
        assert!(script.contains(
            "        create(\"staging\") {\n            signingConfig = signingConfigs.getByName(\"upload\")\n            isDebuggable = true\n"
        ));
        assert!(script.ends_with("dependencies {\n    implementation(platform(\"com.google.firebase:firebase-bom:33.1.0\"))\n}\n"));
        assert!(!script.contains("\n\n\n"));
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote("C:\\keys"), "\"C:\\\\keys\"");
        assert_eq!(quote("$HOME"), "\"\\$HOME\"");
        assert_eq!(quote("one\ntwo"), "\"one\\ntwo\"");
    }
}
