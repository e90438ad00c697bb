//! # Simple Serializer Conf
//!
//! Layered settings for the serializer. Values come from defaults, an
//! optional TOML or JSON file and `SIMPLE_SERIALIZER_*` environment
//! variables, in increasing priority, and end up as core
//! [`SerializerOptions`](simple_serializer_core::SerializerOptions).
//!
//! ```
//! use simple_serializer_conf::{SerializerSettings, SettingsBuilder};
//! use simple_serializer_conf::sources::EnvSource;
//! use simple_serializer_core::OutputType;
//!
//! let builder = SettingsBuilder::new()
//!     .add_source(SerializerSettings::defaults_source())
//!     .add_source(EnvSource::new().with_vars([("SIMPLE_SERIALIZER_OUTPUT_TYPE", "json")]));
//! let options = SerializerSettings::from_builder(builder)
//!     .unwrap()
//!     .into_options()
//!     .unwrap();
//!
//! assert_eq!(options.output_type, OutputType::Json);
//! ```

pub mod builder;
pub mod error;
pub mod settings;
pub mod sources;

pub use builder::{MergedSettings, SettingsBuilder};
pub use error::{SettingsError, SettingsResult};
pub use settings::SerializerSettings;
pub use sources::{
	ConfigSource, DefaultSource, ENV_PREFIX, EnvSource, JsonFileSource, SourceError,
	TomlFileSource, auto_source,
};
