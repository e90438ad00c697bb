//! Settings errors

use crate::sources::SourceError;
use thiserror::Error;

/// Errors raised while assembling settings
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Failed to load {source_name}: {error}")]
	Source {
		source_name: String,
		#[source]
		error: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;
