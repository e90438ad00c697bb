//! Error types for object graph conversion.
//!
//! Every error aborts the whole conversion; no partial result is returned.

use crate::visibility::RuleContext;
use thiserror::Error;

/// Errors that can occur while converting an object graph.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SerializeError {
	/// A value matched no conversion case (only raised with `strict_types`).
	#[error("Unsupported value type: {type_name}")]
	UnsupportedType {
		/// Type name reported by the opaque value.
		type_name: String,
	},

	/// A model type has no serializer rule for the requested context.
	#[error("Model '{model}' has no serializer rule for the {context} context")]
	Configuration {
		/// Model label.
		model: String,
		/// Ownership context that was requested.
		context: RuleContext,
	},

	/// A model was reached again while it was still being converted.
	#[error("Circular reference detected: {object_id}")]
	CyclicReference {
		/// Identity of the model that closed the cycle.
		object_id: String,
	},

	/// The graph is nested deeper than the configured limit.
	#[error("Maximum depth exceeded: current={current_depth}, max={max_depth}")]
	MaxDepthExceeded {
		current_depth: usize,
		max_depth: usize,
	},

	/// JSON text encoding failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Encoded output was not valid UTF-8.
	#[error("Encoding error: {0}")]
	Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type alias for conversion operations.
pub type SerializeResult<T> = Result<T, SerializeError>;
