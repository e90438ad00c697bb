//! Top-level driver
//!
//! Runs the [`Converter`] once on a root value and encodes the result as a
//! plain structure or as indented JSON text.

use crate::converter::Converter;
use crate::error::SerializeResult;
use crate::options::SerializerOptions;
use crate::time::{Temporal, TimeFormat};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use serde_json::ser::PrettyFormatter;
use std::fmt;
use tracing::{debug, warn};

const JSON_INDENT: &[u8] = b"    ";

/// Requested output encoding
///
/// Unknown names fall back to [`OutputType::Raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OutputType {
	/// Plain structure
	#[default]
	Raw,
	/// Plain structure
	Dict,
	/// Indented JSON text
	Json,
}

impl OutputType {
	/// Resolve an output selector
	///
	/// # Examples
	///
	/// ```
	/// use simple_serializer_core::OutputType;
	///
	/// assert_eq!(OutputType::from_name("json"), OutputType::Json);
	/// assert_eq!(OutputType::from_name("dict"), OutputType::Dict);
	/// assert_eq!(OutputType::from_name("xml"), OutputType::Raw);
	/// ```
	pub fn from_name(name: &str) -> Self {
		match name.trim().to_ascii_lowercase().as_str() {
			"raw" => Self::Raw,
			"dict" => Self::Dict,
			"json" => Self::Json,
			other => {
				warn!(output_type = other, "unknown output type, falling back to raw");
				Self::Raw
			}
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Raw => "raw",
			Self::Dict => "dict",
			Self::Json => "json",
		}
	}
}

impl From<String> for OutputType {
	fn from(name: String) -> Self {
		Self::from_name(&name)
	}
}

impl From<OutputType> for String {
	fn from(output_type: OutputType) -> Self {
		output_type.as_str().to_string()
	}
}

impl fmt::Display for OutputType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Encoded result of a serialization
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
	Plain(JsonValue),
	Text(String),
}

impl Output {
	pub fn as_plain(&self) -> Option<&JsonValue> {
		match self {
			Output::Plain(value) => Some(value),
			Output::Text(_) => None,
		}
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Output::Text(text) => Some(text),
			Output::Plain(_) => None,
		}
	}

	pub fn into_plain(self) -> Option<JsonValue> {
		match self {
			Output::Plain(value) => Some(value),
			Output::Text(_) => None,
		}
	}

	pub fn into_text(self) -> Option<String> {
		match self {
			Output::Text(text) => Some(text),
			Output::Plain(_) => None,
		}
	}
}

/// Reusable serializer for one set of options
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_serializer_core::{OutputType, Serializer, SerializerOptions, Value};
///
/// let serializer = Serializer::new(SerializerOptions::new().with_output_type(OutputType::Json));
/// let output = serializer.serialize(&Value::mapping([("a", 1)])).unwrap();
///
/// assert_eq!(output.as_text(), Some("{\n    \"a\": 1\n}"));
/// ```
#[derive(Debug, Clone)]
pub struct Serializer {
	converter: Converter,
}

impl Serializer {
	pub fn new(options: SerializerOptions) -> Self {
		Self {
			converter: Converter::new(options),
		}
	}

	/// Use an already configured converter
	pub fn with_converter(converter: Converter) -> Self {
		Self { converter }
	}

	pub fn converter(&self) -> &Converter {
		&self.converter
	}

	/// Convert `value` and encode it per the configured output type
	pub fn serialize(&self, value: &Value) -> SerializeResult<Output> {
		let output_type = self.converter.options().output_type;
		debug!(kind = value.kind(), output_type = %output_type, "serializing value");

		let plain = self.converter.convert(value)?;
		match output_type {
			OutputType::Raw | OutputType::Dict => Ok(Output::Plain(plain)),
			OutputType::Json => Ok(Output::Text(to_indented_json(&plain)?)),
		}
	}
}

/// Render a plain value as JSON indented by four spaces
pub fn to_indented_json(value: &JsonValue) -> SerializeResult<String> {
	let mut buffer = Vec::new();
	let formatter = PrettyFormatter::with_indent(JSON_INDENT);
	let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
	value.serialize(&mut serializer)?;
	Ok(String::from_utf8(buffer)?)
}

/// A root value together with the options to serialize it with
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_serializer_core::{SerializationRequest, Value};
///
/// let output = SerializationRequest::new(Value::from(vec![1, 2, 3]))
///     .output_type("dict")
///     .execute()
///     .unwrap();
///
/// assert_eq!(output.into_plain(), Some(json!([1, 2, 3])));
/// ```
#[derive(Debug, Clone)]
pub struct SerializationRequest {
	pub root: Value,
	pub options: SerializerOptions,
}

impl SerializationRequest {
	/// Request with default options
	pub fn new(root: Value) -> Self {
		Self {
			root,
			options: SerializerOptions::default(),
		}
	}

	/// Select the time format by name
	pub fn datetime_format(mut self, name: &str) -> Self {
		self.options.datetime_format = TimeFormat::from_name(name);
		self
	}

	/// Select the output encoding by name
	pub fn output_type(mut self, name: &str) -> Self {
		self.options.output_type = OutputType::from_name(name);
		self
	}

	/// Set the ownership flag
	pub fn own(mut self, own: bool) -> Self {
		self.options.own = own;
		self
	}

	/// Set the dictionary strictness flag
	pub fn dict_check(mut self, dict_check: bool) -> Self {
		self.options.dict_check = dict_check;
		self
	}

	/// Replace all options
	pub fn with_options(mut self, options: SerializerOptions) -> Self {
		self.options = options;
		self
	}

	/// Serialize the root value
	pub fn execute(&self) -> SerializeResult<Output> {
		Serializer::new(self.options.clone()).serialize(&self.root)
	}

	/// Serialize the root value with an injected time function
	pub fn execute_with_time_func<F>(&self, f: F) -> SerializeResult<Output>
	where
		F: Fn(&Temporal) -> JsonValue + Send + Sync + 'static,
	{
		let converter = Converter::new(self.options.clone()).with_time_func(f);
		Serializer::with_converter(converter).serialize(&self.root)
	}
}

/// Serialize `data` in one call
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_serializer_core::{Output, SerializerOptions, Value, serializer};
///
/// let output = serializer(&Value::from("hello"), SerializerOptions::default()).unwrap();
/// assert_eq!(output, Output::Plain(json!("hello")));
/// ```
pub fn serializer(data: &Value, options: SerializerOptions) -> SerializeResult<Output> {
	Serializer::new(options).serialize(data)
}
