//! Generator configuration
//!
//! Generation is driven by build properties handed over by the build system,
//! with a few environment variables layered on top.
//!
//! # Build properties
//!
//! - `build_property.FunctionsEnableMetadataSourceGen`: enables generation - default: false
//! - `build_property.FunctionsAutoRegisterGeneratedMetadataProvider`: also emit the
//!   auto-startup registration type - default: false
//! - `build_property.FunctionsGeneratedCodeNamespace`: namespace of the generated
//!   types - default: derived from the assembly name
//! - `build_property.AssemblyName`: used when no assembly name is passed explicitly
//!
//! Boolean properties are true only for a case-insensitive `true`.
//!
//! # Environment Variables
//!
//! - `FNMETA_ENABLE_SOURCE_GEN`: overrides the enable switch
//! - `FNMETA_AUTO_REGISTER`: overrides the auto-registration flag
//! - `FNMETA_NAMESPACE`: overrides the generated namespace
//!
//! # Example
//!
//! ```
//! use fnmeta::{BuildProperties, GeneratorConfig};
//!
//! let props = BuildProperties::from_toml_str(
//!     "build_property.FunctionsEnableMetadataSourceGen = true",
//! ).unwrap();
//! let config = GeneratorConfig::from_properties(&props, Some("Contoso.Api")).unwrap();
//! assert_eq!(config.namespace, "Contoso.Api");
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub const ENABLE_SOURCE_GEN: &str = "build_property.FunctionsEnableMetadataSourceGen";
pub const AUTO_REGISTER: &str = "build_property.FunctionsAutoRegisterGeneratedMetadataProvider";
pub const GENERATED_CODE_NAMESPACE: &str = "build_property.FunctionsGeneratedCodeNamespace";
pub const ASSEMBLY_NAME: &str = "build_property.AssemblyName";

const ENV_ENABLE_SOURCE_GEN: &str = "FNMETA_ENABLE_SOURCE_GEN";
const ENV_AUTO_REGISTER: &str = "FNMETA_AUTO_REGISTER";
const ENV_NAMESPACE: &str = "FNMETA_NAMESPACE";

/// Namespace used when nothing usable can be derived from the assembly name
const FALLBACK_NAMESPACE: &str = "GeneratedFunctions";

/// C# reserved keywords; usable as identifiers only with a leading `@`
const RESERVED_KEYWORDS: [&str; 77] = [
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No assembly name given. Pass --assembly-name or set build_property.AssemblyName")]
    MissingAssemblyName,

    #[error("Invalid namespace '{0}': segments must be identifiers separated by '.' (prefix keywords with '@')")]
    InvalidNamespace(String),

    #[error("Invalid build property '{0}'. Expected KEY=VALUE")]
    InvalidProperty(String),

    #[error("Failed to read build properties from {path}: {error}")]
    PropertiesFile { path: String, error: String },
}

/// Build properties as handed over by the build system
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildProperties {
    values: BTreeMap<String, String>,
}

impl BuildProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Reads a boolean property; missing or unparseable values are `false`
    pub fn get_bool(&self, key: &str) -> bool {
        parse_bool(self.get(key))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Later values win
    pub fn merge(&mut self, other: BuildProperties) {
        self.values.extend(other.values);
    }

    /// Parses a single `KEY=VALUE` pair
    pub fn parse_pair(pair: &str) -> Result<(String, String), ConfigError> {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidProperty(pair.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::InvalidProperty(pair.to_string()));
        }
        Ok((key.to_string(), value.trim().to_string()))
    }

    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut props = Self::new();
        for pair in pairs {
            let (key, value) = Self::parse_pair(pair.as_ref())?;
            props.insert(key, value);
        }
        Ok(props)
    }

    /// Parses a TOML document; nested tables are flattened into dotted keys
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
            ConfigError::PropertiesFile {
                path: "<inline>".to_string(),
                error: e.to_string(),
            }
        })?;

        let mut props = Self::new();
        flatten_table("", &table, &mut props);
        Ok(props)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PropertiesFile {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::PropertiesFile { error, .. } => ConfigError::PropertiesFile {
                path: path.display().to_string(),
                error,
            },
            other => other,
        })
    }
}

fn flatten_table(prefix: &str, table: &toml::Table, props: &mut BuildProperties) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(nested) => flatten_table(&full_key, nested, props),
            toml::Value::String(s) => props.insert(full_key, s.clone()),
            other => props.insert(full_key, other.to_string()),
        }
    }
}

fn parse_bool(value: Option<&str>) -> bool {
    value
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Resolved settings for one generation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Build-time switch gating the whole pass
    pub enabled: bool,

    /// Emit the auto-startup type that registers the provider implicitly
    pub auto_register: bool,

    /// Name of the compiled assembly; the script file is `<name>.dll`
    pub assembly_name: String,

    /// Namespace of the generated types
    pub namespace: String,
}

impl GeneratorConfig {
    /// Enabled configuration with defaults derived from the assembly name
    pub fn new(assembly_name: impl Into<String>) -> Self {
        let assembly_name = assembly_name.into();
        let namespace = namespace_for_assembly(&assembly_name);
        Self {
            enabled: true,
            auto_register: false,
            assembly_name,
            namespace,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_auto_register(mut self, auto_register: bool) -> Self {
        self.auto_register = auto_register;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Resolves configuration from build properties and environment overrides
    ///
    /// An explicit `assembly_name` takes precedence over `build_property.AssemblyName`.
    pub fn from_properties(
        props: &BuildProperties,
        assembly_name: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let assembly_name = assembly_name
            .or_else(|| props.get(ASSEMBLY_NAME))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingAssemblyName)?;

        let enabled = env::var(ENV_ENABLE_SOURCE_GEN)
            .ok()
            .map(|v| parse_bool(Some(&v)))
            .unwrap_or_else(|| props.get_bool(ENABLE_SOURCE_GEN));

        let auto_register = env::var(ENV_AUTO_REGISTER)
            .ok()
            .map(|v| parse_bool(Some(&v)))
            .unwrap_or_else(|| props.get_bool(AUTO_REGISTER));

        let namespace = env::var(ENV_NAMESPACE)
            .ok()
            .or_else(|| props.get(GENERATED_CODE_NAMESPACE).map(str::to_string))
            .map(|ns| ns.trim().to_string())
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| namespace_for_assembly(assembly_name));

        let config = Self {
            enabled,
            auto_register,
            assembly_name: assembly_name.to_string(),
            namespace,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assembly_name.trim().is_empty() {
            return Err(ConfigError::MissingAssemblyName);
        }
        if !is_valid_namespace(&self.namespace) {
            return Err(ConfigError::InvalidNamespace(self.namespace.clone()));
        }
        Ok(())
    }

    pub fn to_display_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("enabled".to_string(), self.enabled.to_string());
        map.insert("auto_register".to_string(), self.auto_register.to_string());
        map.insert("assembly_name".to_string(), self.assembly_name.clone());
        map.insert("namespace".to_string(), self.namespace.clone());
        map
    }
}

impl fmt::Display for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generator Configuration:")?;
        writeln!(f, "  Enabled: {}", self.enabled)?;
        writeln!(f, "  Auto Register: {}", self.auto_register)?;
        writeln!(f, "  Assembly: {}", self.assembly_name)?;
        writeln!(f, "  Namespace: {}", self.namespace)?;
        Ok(())
    }
}

/// Derives a namespace from an assembly name
///
/// Characters outside `[A-Za-z0-9_]` become `_`, segments starting with a digit
/// get a leading `_`, reserved keywords get a leading `@`, and empty segments
/// are dropped.
pub fn namespace_for_assembly(assembly_name: &str) -> String {
    let segments: Vec<String> = assembly_name
        .split('.')
        .filter(|s| !s.trim().is_empty())
        .map(|segment| {
            let mut cleaned: String = segment
                .trim()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
                .collect();
            if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
                cleaned.insert(0, '_');
            }
            if is_reserved_keyword(&cleaned) {
                cleaned.insert(0, '@');
            }
            cleaned
        })
        .collect();

    if segments.is_empty() {
        FALLBACK_NAMESPACE.to_string()
    } else {
        segments.join(".")
    }
}

fn is_reserved_keyword(segment: &str) -> bool {
    RESERVED_KEYWORDS.contains(&segment)
}

fn is_valid_namespace(namespace: &str) -> bool {
    !namespace.is_empty()
        && namespace.split('.').all(|segment| {
            // `@class` is the verbatim form of a keyword
            let (verbatim, identifier) = match segment.strip_prefix('@') {
                Some(rest) => (true, rest),
                None => (false, segment),
            };
            let mut chars = identifier.chars();
            let well_formed = match chars.next() {
                Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                }
                _ => false,
            };
            well_formed && (verbatim || !is_reserved_keyword(identifier))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    fn clear_env() -> Vec<EnvGuard> {
        vec![
            EnvGuard::unset(ENV_ENABLE_SOURCE_GEN),
            EnvGuard::unset(ENV_AUTO_REGISTER),
            EnvGuard::unset(ENV_NAMESPACE),
        ]
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            BuildProperties::parse_pair("build_property.X = true").unwrap(),
            ("build_property.X".to_string(), "true".to_string())
        );
        assert!(BuildProperties::parse_pair("novalue").is_err());
        assert!(BuildProperties::parse_pair("=true").is_err());
    }

    #[test]
    fn test_get_bool_is_case_insensitive() {
        let props = BuildProperties::from_pairs(["a=True", "b=FALSE", "c=yes"]).unwrap();
        assert!(props.get_bool("a"));
        assert!(!props.get_bool("b"));
        assert!(!props.get_bool("c"));
        assert!(!props.get_bool("missing"));
    }

    #[test]
    fn test_from_toml_flattens_dotted_keys() {
        let props = BuildProperties::from_toml_str(
            r#"
build_property.FunctionsEnableMetadataSourceGen = true
build_property.FunctionsGeneratedCodeNamespace = "Contoso.Functions"

[msbuild]
RetryCount = 3
"#,
        )
        .unwrap();

        assert_eq!(props.get(ENABLE_SOURCE_GEN), Some("true"));
        assert_eq!(props.get(GENERATED_CODE_NAMESPACE), Some("Contoso.Functions"));
        assert_eq!(props.get("msbuild.RetryCount"), Some("3"));
        assert_eq!(props.len(), 3);
    }

    #[test]
    fn test_from_toml_invalid() {
        let err = BuildProperties::from_toml_str("this is = = not toml").unwrap_err();
        assert!(matches!(err, ConfigError::PropertiesFile { .. }));
    }

    #[test]
    fn test_from_path_reports_path() {
        let err = BuildProperties::from_path(Path::new("/nonexistent/props.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/props.toml"));
    }

    #[test]
    fn test_merge_later_wins() {
        let mut base = BuildProperties::from_pairs(["k=1", "a=x"]).unwrap();
        base.merge(BuildProperties::from_pairs(["k=2"]).unwrap());
        assert_eq!(base.get("k"), Some("2"));
        assert_eq!(base.get("a"), Some("x"));
    }

    #[test]
    #[serial]
    fn test_from_properties_defaults() {
        let _guards = clear_env();
        let props = BuildProperties::new();

        let config = GeneratorConfig::from_properties(&props, Some("Contoso.Api")).unwrap();

        assert!(!config.enabled);
        assert!(!config.auto_register);
        assert_eq!(config.assembly_name, "Contoso.Api");
        assert_eq!(config.namespace, "Contoso.Api");
    }

    #[test]
    #[serial]
    fn test_from_properties_reads_switches() {
        let _guards = clear_env();
        let props = BuildProperties::from_pairs([
            format!("{}=true", ENABLE_SOURCE_GEN),
            format!("{}=True", AUTO_REGISTER),
            format!("{}=My.Generated", GENERATED_CODE_NAMESPACE),
            format!("{}=FromProps", ASSEMBLY_NAME),
        ])
        .unwrap();

        let config = GeneratorConfig::from_properties(&props, None).unwrap();

        assert!(config.enabled);
        assert!(config.auto_register);
        assert_eq!(config.assembly_name, "FromProps");
        assert_eq!(config.namespace, "My.Generated");
    }

    #[test]
    #[serial]
    fn test_environment_overrides_properties() {
        let _cleared = clear_env();
        let _guards = vec![
            EnvGuard::set(ENV_ENABLE_SOURCE_GEN, "false"),
            EnvGuard::set(ENV_NAMESPACE, "Env.Namespace"),
        ];
        let props = BuildProperties::from_pairs([format!("{}=true", ENABLE_SOURCE_GEN)]).unwrap();

        let config = GeneratorConfig::from_properties(&props, Some("App")).unwrap();

        assert!(!config.enabled);
        assert_eq!(config.namespace, "Env.Namespace");
    }

    #[test]
    #[serial]
    fn test_missing_assembly_name() {
        let _guards = clear_env();
        let err = GeneratorConfig::from_properties(&BuildProperties::new(), Some("  ")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAssemblyName));
    }

    #[test]
    #[serial]
    fn test_invalid_namespace_rejected() {
        let _guards = clear_env();
        let props =
            BuildProperties::from_pairs([format!("{}=My..Bad-Namespace", GENERATED_CODE_NAMESPACE)])
                .unwrap();

        let err = GeneratorConfig::from_properties(&props, Some("App")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNamespace(_)));
    }

    #[test]
    fn test_namespace_for_assembly() {
        assert_eq!(namespace_for_assembly("Contoso.Api"), "Contoso.Api");
        assert_eq!(namespace_for_assembly("my-app"), "my_app");
        assert_eq!(namespace_for_assembly("1st.Api"), "_1st.Api");
        assert_eq!(namespace_for_assembly("a..b"), "a.b");
        assert_eq!(namespace_for_assembly("..."), FALLBACK_NAMESPACE);
    }

    #[test]
    fn test_namespace_for_assembly_escapes_keywords() {
        assert_eq!(namespace_for_assembly("My.class"), "My.@class");
        assert_eq!(namespace_for_assembly("namespace.Api"), "@namespace.Api");
        assert_eq!(namespace_for_assembly("My.Class"), "My.Class");

        let config = GeneratorConfig::new("My.class");
        assert_eq!(config.namespace, "My.@class");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_keyword_namespace_segments() {
        assert!(!is_valid_namespace("My.class"));
        assert!(!is_valid_namespace("int"));
        assert!(is_valid_namespace("My.@class"));
        assert!(is_valid_namespace("My.var"));
        assert!(!is_valid_namespace("My.@"));
        assert!(!is_valid_namespace("My.@9x"));

        let invalid = GeneratorConfig::new("App").with_namespace("Contoso.public");
        assert!(matches!(invalid.validate(), Err(ConfigError::InvalidNamespace(_))));
    }

    #[test]
    fn test_builder_and_validate() {
        let config = GeneratorConfig::new("App")
            .with_enabled(false)
            .with_auto_register(true)
            .with_namespace("Custom.Ns");

        assert!(!config.enabled);
        assert!(config.auto_register);
        assert!(config.validate().is_ok());

        let invalid = config.with_namespace("9bad");
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_config_display() {
        let display = GeneratorConfig::new("App").to_string();
        assert!(display.contains("Generator Configuration:"));
        assert!(display.contains("Namespace: App"));
        assert_eq!(GeneratorConfig::new("App").to_display_map()["enabled"], "true");
    }
}
