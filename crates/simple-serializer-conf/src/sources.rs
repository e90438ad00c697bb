//! Configuration sources for layered settings
//!
//! Sources are merged in priority order
//! (environment variables > config files > defaults).

use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of the environment variables read by default
pub const ENV_PREFIX: &str = "SIMPLE_SERIALIZER_";

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Invalid source: {0}")]
	InvalidSource(String),
}

/// Environment variable configuration source
///
/// Reads `SIMPLE_SERIALIZER_*` variables; the remainder of the name, in
/// lower case, is the settings key (`SIMPLE_SERIALIZER_OWN` sets `own`).
///
/// # Examples
///
/// ```
/// use simple_serializer_conf::sources::{ConfigSource, EnvSource};
/// use serde_json::json;
///
/// let source = EnvSource::new().with_vars([
///     ("SIMPLE_SERIALIZER_OWN", "false"),
///     ("SIMPLE_SERIALIZER_MAX_DEPTH", "8"),
///     ("HOME", "/root"),
/// ]);
/// let values = source.load().unwrap();
///
/// assert_eq!(values["own"], json!(false));
/// assert_eq!(values["max_depth"], json!(8));
/// assert!(!values.contains_key("home"));
/// ```
pub struct EnvSource {
	prefix: String,
	vars: Option<Vec<(String, String)>>,
}

impl EnvSource {
	/// Read the process environment with the default prefix
	pub fn new() -> Self {
		Self {
			prefix: ENV_PREFIX.to_string(),
			vars: None,
		}
	}

	/// Use another prefix
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	/// Read the given variables instead of the process environment
	pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.vars = Some(
			vars.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		);
		self
	}

	fn variables(&self) -> Vec<(String, String)> {
		match &self.vars {
			Some(vars) => vars.clone(),
			None => std::env::vars().collect(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();

		for (key, value) in self.variables() {
			let Some(clean_key) = key.strip_prefix(&self.prefix) else {
				continue;
			};
			if clean_key.is_empty() {
				continue;
			}
			let key = clean_key.to_lowercase();
			let parsed = if STRING_KEYS.contains(&key.as_str()) {
				Value::String(value)
			} else {
				parse_env_value(value)
			};
			config.insert(key, parsed);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}

/// Keys whose values are names, never numbers or flags
const STRING_KEYS: &[&str] = &["through_key", "datetime_format", "output_type"];

fn parse_env_value(value: String) -> Value {
	match value.trim().to_lowercase().as_str() {
		"true" | "yes" | "on" => return Value::Bool(true),
		"false" | "no" | "off" => return Value::Bool(false),
		_ => {}
	}
	if let Ok(num) = value.trim().parse::<i64>() {
		Value::Number(num.into())
	} else {
		Value::String(value)
	}
}

/// TOML file configuration source
///
/// A missing file contributes nothing.
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;

		// TOML and JSON share the data model, so go through serde
		let json_value = serde_json::to_value(toml_value)?;
		into_map(json_value)
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// JSON file configuration source
///
/// A missing file contributes nothing.
pub struct JsonFileSource {
	path: PathBuf,
}

impl JsonFileSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for JsonFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		into_map(serde_json::from_str(&content)?)
	}

	fn priority(&self) -> u8 {
		50 // Medium priority
	}

	fn description(&self) -> String {
		format!("JSON file: {}", self.path.display())
	}
}

fn into_map(value: Value) -> Result<IndexMap<String, Value>, SourceError> {
	match value {
		Value::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(SourceError::Parse("Expected object at root".to_string())),
	}
}

/// Default values configuration source
///
/// # Examples
///
/// ```
/// use simple_serializer_conf::sources::{ConfigSource, DefaultSource};
/// use serde_json::Value;
///
/// let source = DefaultSource::new()
///     .with_value("own", Value::Bool(true))
///     .with_value("through_key", Value::String("through".to_string()));
///
/// assert_eq!(source.load().unwrap().len(), 2);
/// assert_eq!(source.priority(), 0);
/// ```
pub struct DefaultSource {
	values: IndexMap<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self {
			values: IndexMap::new(),
		}
	}

	/// Add a default value for a configuration key
	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}

	/// Add all entries of a JSON object
	pub fn with_object(mut self, object: serde_json::Map<String, Value>) -> Self {
		self.values.extend(object);
		self
	}
}

impl Default for DefaultSource {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0 // Lowest priority
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// Pick a file source from the file extension
///
/// # Examples
///
/// ```
/// use simple_serializer_conf::sources::auto_source;
///
/// assert!(auto_source("serializer.toml").is_ok());
/// assert!(auto_source("serializer.json").is_ok());
/// assert!(auto_source("serializer.ini").is_err());
/// ```
pub fn auto_source(path: impl AsRef<Path>) -> Result<Box<dyn ConfigSource>, SourceError> {
	let path = path.as_ref();
	let ext = path
		.extension()
		.and_then(|e| e.to_str())
		.ok_or_else(|| SourceError::InvalidSource("No file extension".to_string()))?;

	match ext {
		"toml" => Ok(Box::new(TomlFileSource::new(path))),
		"json" => Ok(Box::new(JsonFileSource::new(path))),
		_ => Err(SourceError::InvalidSource(format!(
			"Unsupported file extension: {}",
			ext
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::io::Write;

	#[rstest]
	#[case("true", json!(true))]
	#[case("Off", json!(false))]
	#[case("12", json!(12))]
	#[case("json", json!("json"))]
	#[case("1", json!(1))]
	fn test_parse_env_value(#[case] raw: &str, #[case] expected: Value) {
		assert_eq!(parse_env_value(raw.to_string()), expected);
	}

	#[rstest]
	#[case("SIMPLE_SERIALIZER_THROUGH_KEY", "2024", "through_key")]
	#[case("SIMPLE_SERIALIZER_THROUGH_KEY", "on", "through_key")]
	#[case("SIMPLE_SERIALIZER_OUTPUT_TYPE", "1", "output_type")]
	#[case("SIMPLE_SERIALIZER_DATETIME_FORMAT", "true", "datetime_format")]
	fn test_name_keys_stay_strings(#[case] var: &str, #[case] raw: &str, #[case] key: &str) {
		let values = EnvSource::new().with_vars([(var, raw)]).load().unwrap();

		assert_eq!(values[key], json!(raw));
	}

	#[rstest]
	fn test_env_source_custom_prefix() {
		let source = EnvSource::new()
			.with_prefix("APP_")
			.with_vars([("APP_OUTPUT_TYPE", "json"), ("SIMPLE_SERIALIZER_OWN", "false"), ("APP_", "x")]);

		let values = source.load().unwrap();

		assert_eq!(values.len(), 1);
		assert_eq!(values["output_type"], json!("json"));
		assert_eq!(source.description(), "Environment variables (prefix: APP_)");
	}

	#[rstest]
	fn test_missing_files_are_empty() {
		let dir = tempfile::tempdir().unwrap();

		assert!(TomlFileSource::new(dir.path().join("absent.toml")).load().unwrap().is_empty());
		assert!(JsonFileSource::new(dir.path().join("absent.json")).load().unwrap().is_empty());
	}

	#[rstest]
	fn test_toml_source() {
		let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
		writeln!(file, "datetime_format = \"string\"\nmax_depth = 10").unwrap();

		let values = TomlFileSource::new(file.path()).load().unwrap();

		assert_eq!(values["datetime_format"], json!("string"));
		assert_eq!(values["max_depth"], json!(10));
	}

	#[rstest]
	fn test_json_root_must_be_object() {
		let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
		write!(file, "[1, 2]").unwrap();

		let err = JsonFileSource::new(file.path()).load().unwrap_err();

		assert!(matches!(err, SourceError::Parse(_)));
	}

	#[rstest]
	fn test_priorities() {
		assert!(EnvSource::new().priority() > TomlFileSource::new("a.toml").priority());
		assert!(JsonFileSource::new("a.json").priority() > DefaultSource::new().priority());
	}
}
