//! Typed serializer settings

use crate::builder::SettingsBuilder;
use crate::error::{SettingsError, SettingsResult};
use crate::sources::{DefaultSource, EnvSource, auto_source};
use serde::{Deserialize, Serialize};
use simple_serializer_core::{OutputType, SerializerOptions, TimeFormat};
use std::path::Path;
use tracing::debug;

/// Serializer settings as read from configuration
///
/// Every key is optional; absent keys keep the converter defaults.
///
/// # Examples
///
/// ```
/// use simple_serializer_conf::SerializerSettings;
/// use simple_serializer_core::{OutputType, TimeFormat};
///
/// let settings: SerializerSettings =
///     serde_json::from_str(r#"{"datetime_format": "string", "output_type": "json"}"#).unwrap();
/// let options = settings.into_options().unwrap();
///
/// assert_eq!(options.datetime_format, TimeFormat::String);
/// assert_eq!(options.output_type, OutputType::Json);
/// assert!(options.own);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerSettings {
	pub datetime_format: TimeFormat,
	pub output_type: OutputType,
	pub own: bool,
	pub dict_check: bool,
	pub through: bool,
	pub through_key: String,
	pub strict_types: bool,
	pub max_depth: usize,
}

impl Default for SerializerSettings {
	fn default() -> Self {
		SerializerOptions::default().into()
	}
}

impl From<SerializerOptions> for SerializerSettings {
	fn from(options: SerializerOptions) -> Self {
		Self {
			datetime_format: options.datetime_format,
			output_type: options.output_type,
			own: options.own,
			dict_check: options.dict_check,
			through: options.through,
			through_key: options.through_key,
			strict_types: options.strict_types,
			max_depth: options.max_depth,
		}
	}
}

impl SerializerSettings {
	/// Merge all sources of `builder` into settings
	pub fn from_builder(builder: SettingsBuilder) -> SettingsResult<Self> {
		let settings: Self = builder.build()?.into_typed()?;
		settings.validate()?;
		Ok(settings)
	}

	/// Defaults, then the optional config file, then `SIMPLE_SERIALIZER_*` variables
	pub fn load(path: Option<&Path>) -> SettingsResult<Self> {
		let mut builder = SettingsBuilder::new().add_source(Self::defaults_source());
		if let Some(path) = path {
			let source = auto_source(path).map_err(|error| SettingsError::Source {
				source_name: path.display().to_string(),
				error,
			})?;
			builder = builder.add_boxed_source(source);
		}
		let settings = Self::from_builder(builder.add_source(EnvSource::new()))?;
		debug!(settings = ?settings, "serializer settings loaded");
		Ok(settings)
	}

	/// Source carrying the converter defaults
	pub fn defaults_source() -> DefaultSource {
		match serde_json::to_value(Self::default()) {
			Ok(serde_json::Value::Object(object)) => DefaultSource::new().with_object(object),
			_ => DefaultSource::new(),
		}
	}

	/// Reject values the converter cannot work with
	pub fn validate(&self) -> SettingsResult<()> {
		if self.max_depth == 0 {
			return Err(SettingsError::InvalidValue {
				key: "max_depth".to_string(),
				message: "must be greater than zero".to_string(),
			});
		}
		if self.through_key.trim().is_empty() {
			return Err(SettingsError::InvalidValue {
				key: "through_key".to_string(),
				message: "must not be empty".to_string(),
			});
		}
		Ok(())
	}

	/// Validate and turn into converter options
	pub fn into_options(self) -> SettingsResult<SerializerOptions> {
		self.validate()?;
		Ok(SerializerOptions::new()
			.with_datetime_format(self.datetime_format)
			.with_output_type(self.output_type)
			.with_own(self.own)
			.with_dict_check(self.dict_check)
			.with_through(self.through)
			.with_through_key(self.through_key)
			.with_strict_types(self.strict_types)
			.with_max_depth(self.max_depth))
	}
}

impl TryFrom<SerializerSettings> for SerializerOptions {
	type Error = SettingsError;

	fn try_from(settings: SerializerSettings) -> SettingsResult<Self> {
		settings.into_options()
	}
}
