//! Conversion options

use crate::serializer::OutputType;
use crate::time::TimeFormat;
use serde::{Deserialize, Serialize};

/// Default reserved key for junction data merged into related objects
pub const DEFAULT_THROUGH_KEY: &str = "through";

/// Default nesting limit
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options of one serialization request
///
/// # Examples
///
/// ```
/// use simple_serializer_core::{OutputType, SerializerOptions, TimeFormat};
///
/// let options = SerializerOptions::new()
///     .with_datetime_format(TimeFormat::String)
///     .with_output_type(OutputType::Json)
///     .with_own(false);
///
/// assert_eq!(options.datetime_format, TimeFormat::String);
/// assert!(!options.own);
/// assert!(options.through);
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
	/// How temporal values are rendered
	pub datetime_format: TimeFormat,
	/// Plain structure or JSON text
	pub output_type: OutputType,
	/// Whether the requester owns the objects (selects visibility rules)
	pub own: bool,
	/// Strict dictionary traversal; reserved, both modes traverse the same way
	pub dict_check: bool,
	/// Surface junction data of many-to-many relations
	pub through: bool,
	/// Key under which junction data is merged into each related object
	pub through_key: String,
	/// Fail on unrecognized values instead of producing null
	pub strict_types: bool,
	/// Nesting limit
	pub max_depth: usize,
}

impl SerializerOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_datetime_format(mut self, format: TimeFormat) -> Self {
		self.datetime_format = format;
		self
	}

	pub fn with_output_type(mut self, output_type: OutputType) -> Self {
		self.output_type = output_type;
		self
	}

	pub fn with_own(mut self, own: bool) -> Self {
		self.own = own;
		self
	}

	pub fn with_dict_check(mut self, dict_check: bool) -> Self {
		self.dict_check = dict_check;
		self
	}

	pub fn with_through(mut self, through: bool) -> Self {
		self.through = through;
		self
	}

	pub fn with_through_key(mut self, key: impl Into<String>) -> Self {
		self.through_key = key.into();
		self
	}

	pub fn with_strict_types(mut self, strict: bool) -> Self {
		self.strict_types = strict;
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}
}

impl Default for SerializerOptions {
	fn default() -> Self {
		Self {
			datetime_format: TimeFormat::Timestamp,
			output_type: OutputType::Raw,
			own: true,
			dict_check: false,
			through: true,
			through_key: DEFAULT_THROUGH_KEY.to_string(),
			strict_types: false,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}
