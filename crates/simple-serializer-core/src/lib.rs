//! # Simple Serializer Core
//!
//! Converts in-memory object graphs (models, relations, query results,
//! temporal values, files, decimals and nested containers) into plain
//! `serde_json::Value` trees or indented JSON text.
//!
//! ## Building blocks
//!
//! - **Value**: closed set of convertible kinds
//! - **Model / ModelMeta / Record**: structured records with declared fields
//!   and per-ownership [`VisibilityRule`]s
//! - **RelatedManager / JunctionSet**: many-to-many relations and their
//!   junction tables, including extra pairing columns
//! - **Converter**: the recursive conversion, guarded by a per-call
//!   [`SerializationContext`] against cycles and runaway nesting
//! - **Serializer**: option handling and output encoding
//!
//! ## Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//! use simple_serializer_core::{ModelMeta, Output, Record, SerializerOptions, serializer};
//! use std::sync::Arc;
//!
//! let meta = Arc::new(ModelMeta::new("accounts.User").field("id").field("name").field("created"));
//! let user = Record::new(meta)
//!     .with("id", 1)
//!     .with("name", "Alice")
//!     .with("created", Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
//!     .into_value();
//!
//! let output = serializer(&user, SerializerOptions::default()).unwrap();
//! assert_eq!(output, Output::Plain(json!({"id": 1, "name": "Alice", "created": 1609459200})));
//! ```

pub mod collections;
pub mod context;
pub mod converter;
pub mod error;
pub mod file;
pub mod model;
pub mod options;
pub mod relation;
pub mod serializer;
pub mod time;
pub mod value;
pub mod visibility;

pub use collections::{Page, QuerySet};
pub use context::SerializationContext;
pub use converter::{Converter, ThroughContext};
pub use error::{SerializeError, SerializeResult};
pub use file::{FileKind, FileRef};
pub use model::{FieldDescriptor, FieldKind, Model, ModelMeta, Record};
pub use options::{DEFAULT_MAX_DEPTH, DEFAULT_THROUGH_KEY, SerializerOptions};
pub use relation::{
	JunctionLookup, JunctionSet, ManyToManyManager, RelatedManager, ThroughTable, refers_to,
};
pub use serializer::{
	Output, OutputType, SerializationRequest, Serializer, serializer, to_indented_json,
};
pub use time::{Temporal, TimeFormat, TimeFunc};
pub use value::Value;
pub use visibility::{RuleContext, VisibilityRule, is_visible};
