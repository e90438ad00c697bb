//! Merging of configuration sources

use crate::error::{SettingsError, SettingsResult};
use crate::sources::ConfigSource;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Collects sources and merges them by priority
///
/// Keys from a higher priority source replace the same keys of lower ones.
/// Sources with equal priority apply in the order they were added.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_serializer_conf::builder::SettingsBuilder;
/// use simple_serializer_conf::sources::{DefaultSource, EnvSource};
///
/// let merged = SettingsBuilder::new()
///     .add_source(EnvSource::new().with_vars([("SIMPLE_SERIALIZER_OWN", "false")]))
///     .add_source(DefaultSource::new().with_value("own", json!(true)).with_value("through", json!(true)))
///     .build()
///     .unwrap();
///
/// assert_eq!(merged.get("own"), Some(&json!(false)));
/// assert_eq!(merged.get("through"), Some(&json!(true)));
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a configuration source
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Add an already boxed source, as returned by [`auto_source`](crate::sources::auto_source)
	pub fn add_boxed_source(mut self, source: Box<dyn ConfigSource>) -> Self {
		self.sources.push(source);
		self
	}

	/// Load every source and merge the results
	pub fn build(mut self) -> SettingsResult<MergedSettings> {
		// Stable sort keeps insertion order among equal priorities
		self.sources.sort_by_key(|source| source.priority());

		let mut values = IndexMap::new();
		for source in &self.sources {
			let loaded = source.load().map_err(|error| SettingsError::Source {
				source_name: source.description(),
				error,
			})?;
			debug!(
				source = %source.description(),
				keys = loaded.len(),
				"loaded configuration source"
			);
			values.extend(loaded);
		}

		Ok(MergedSettings { values })
	}
}

/// Result of merging all sources
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSettings {
	values: IndexMap<String, Value>,
}

impl MergedSettings {
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	pub fn as_map(&self) -> &IndexMap<String, Value> {
		&self.values
	}

	/// Deserialize the merged values into a typed settings struct
	pub fn into_typed<T: DeserializeOwned>(self) -> SettingsResult<T> {
		let object: serde_json::Map<String, Value> = self.values.into_iter().collect();
		Ok(serde_json::from_value(Value::Object(object))?)
	}
}
