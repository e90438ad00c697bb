//! # Simple Serializer
//!
//! Recursive conversion of ORM-style object graphs into plain dictionaries
//! or JSON text.
//!
//! A graph is made of [`Value`]s: model instances, many-to-many relations
//! (with optional junction data), query sets, pages, temporal values, files,
//! decimals, mappings and primitives. Each model type decides per ownership
//! context which attributes are visible and which relations are expanded.
//!
//! ## Feature Flags
//!
//! - `conf` (default) - layered settings loading via [`conf`]
//!
//! ## Quick Example
//!
//! ```
//! use simple_serializer::prelude::*;
//! use std::sync::Arc;
//!
//! let meta = Arc::new(
//!     ModelMeta::new("accounts.User")
//!         .field("id")
//!         .field("name")
//!         .field("password")
//!         .with_rule(VisibilityRule::new().with_exclude(["password"])),
//! );
//! let user = Record::new(meta)
//!     .with("id", 1)
//!     .with("name", "Alice")
//!     .with("password", "hunter2")
//!     .into_value();
//!
//! let output = SerializationRequest::new(user).output_type("json").execute().unwrap();
//! assert_eq!(output.as_text(), Some("{\n    \"id\": 1,\n    \"name\": \"Alice\"\n}"));
//! ```

#[cfg(feature = "conf")]
pub use simple_serializer_conf as conf;

pub use simple_serializer_core::{
	Converter, FileRef, JunctionSet, ManyToManyManager, Model, ModelMeta, Output, OutputType, Page,
	QuerySet, Record, RelatedManager, RuleContext, SerializationContext, SerializationRequest,
	SerializeError, SerializeResult, Serializer, SerializerOptions, Temporal, ThroughTable,
	TimeFormat, Value, VisibilityRule, is_visible, serializer, to_indented_json,
};

/// Load options from defaults, an optional config file and the environment
///
/// # Examples
///
/// ```
/// let options = simple_serializer::load_options(None).unwrap();
/// assert!(options.max_depth > 0);
/// ```
#[cfg(feature = "conf")]
pub fn load_options(
	path: Option<&std::path::Path>,
) -> Result<SerializerOptions, simple_serializer_conf::SettingsError> {
	simple_serializer_conf::SerializerSettings::load(path)?.into_options()
}

pub mod prelude {
	pub use crate::{
		Converter, FileRef, ManyToManyManager, Model, ModelMeta, Output, OutputType, Page, QuerySet,
		Record, RelatedManager, SerializationRequest, SerializeError, SerializeResult, Serializer,
		SerializerOptions, Temporal, ThroughTable, TimeFormat, Value, VisibilityRule, serializer,
	};
	pub use serde_json::Value as JsonValue;

	#[cfg(feature = "conf")]
	pub use crate::conf::SerializerSettings;
}
