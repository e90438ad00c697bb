//! Input values
//!
//! [`Value`] is the closed set of kinds the converter understands. Callers
//! classify their data once, when building the graph; the converter then
//! dispatches on the variant without any further type probing.

use crate::collections::{Page, QuerySet};
use crate::file::FileRef;
use crate::model::Model;
use crate::relation::RelatedManager;
use crate::time::Temporal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// A node of an object graph
#[derive(Debug, Clone)]
pub enum Value {
	/// Bare ordered list
	List(Vec<Value>),
	/// Ordered collection of model instances
	QuerySet(QuerySet),
	/// One page of a paginated collection
	Page(Page),
	/// Model instance
	Model(Arc<dyn Model>),
	/// Live set of objects related through a many-to-many field
	Relation(Arc<dyn RelatedManager>),
	/// Date, time or date-time
	Temporal(Temporal),
	/// File or image reference
	File(FileRef),
	/// Fixed-point decimal
	Decimal(Decimal),
	/// String-keyed container, insertion ordered
	Mapping(IndexMap<String, Value>),
	String(String),
	Bool(bool),
	Int(i64),
	UInt(u64),
	Float(f64),
	Null,
	/// Object of an unrecognized kind, carrying its type name
	Opaque(String),
}

impl Value {
	/// Wrap a model instance
	pub fn model<M: Model + 'static>(model: Arc<M>) -> Self {
		Value::Model(model)
	}

	/// Wrap a many-to-many manager
	pub fn relation<R: RelatedManager + 'static>(manager: R) -> Self {
		Value::Relation(Arc::new(manager))
	}

	/// Mark a value of type `T` as unrecognized
	pub fn opaque<T: ?Sized>() -> Self {
		Value::Opaque(std::any::type_name::<T>().to_string())
	}

	/// Build a mapping from key/value pairs
	pub fn mapping<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<Value>,
	{
		Value::Mapping(
			entries
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}

	/// Short name of the variant, used in log output
	pub fn kind(&self) -> &'static str {
		match self {
			Value::List(_) => "list",
			Value::QuerySet(_) => "queryset",
			Value::Page(_) => "page",
			Value::Model(_) => "model",
			Value::Relation(_) => "relation",
			Value::Temporal(_) => "temporal",
			Value::File(_) => "file",
			Value::Decimal(_) => "decimal",
			Value::Mapping(_) => "mapping",
			Value::String(_) => "string",
			Value::Bool(_) => "bool",
			Value::Int(_) | Value::UInt(_) => "integer",
			Value::Float(_) => "float",
			Value::Null => "null",
			Value::Opaque(_) => "opaque",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// The model behind a [`Value::Model`]
	pub fn as_model(&self) -> Option<&Arc<dyn Model>> {
		match self {
			Value::Model(model) => Some(model),
			_ => None,
		}
	}

	/// Textual form of a key-like scalar (string, integer, boolean)
	pub fn scalar_key(&self) -> Option<String> {
		match self {
			Value::String(s) => Some(s.clone()),
			Value::Int(i) => Some(i.to_string()),
			Value::UInt(u) => Some(u.to_string()),
			Value::Bool(b) => Some(b.to_string()),
			_ => None,
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(i64::from(value))
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::UInt(u64::from(value))
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Value::UInt(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<Decimal> for Value {
	fn from(value: Decimal) -> Self {
		Value::Decimal(value)
	}
}

impl From<Temporal> for Value {
	fn from(value: Temporal) -> Self {
		Value::Temporal(value)
	}
}

impl From<NaiveDate> for Value {
	fn from(value: NaiveDate) -> Self {
		Value::Temporal(Temporal::Date(value))
	}
}

impl From<NaiveTime> for Value {
	fn from(value: NaiveTime) -> Self {
		Value::Temporal(Temporal::Time(value))
	}
}

impl From<NaiveDateTime> for Value {
	fn from(value: NaiveDateTime) -> Self {
		Value::Temporal(Temporal::DateTime(value))
	}
}

impl From<DateTime<FixedOffset>> for Value {
	fn from(value: DateTime<FixedOffset>) -> Self {
		Value::Temporal(Temporal::DateTimeTz(value))
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(value: DateTime<Utc>) -> Self {
		Value::Temporal(Temporal::DateTimeTz(value.fixed_offset()))
	}
}

impl From<FileRef> for Value {
	fn from(value: FileRef) -> Self {
		Value::File(value)
	}
}

impl From<QuerySet> for Value {
	fn from(value: QuerySet) -> Self {
		Value::QuerySet(value)
	}
}

impl From<Page> for Value {
	fn from(value: Page) -> Self {
		Value::Page(value)
	}
}

impl<M: Model + 'static> From<Arc<M>> for Value {
	fn from(value: Arc<M>) -> Self {
		Value::Model(value)
	}
}

impl From<IndexMap<String, Value>> for Value {
	fn from(value: IndexMap<String, Value>) -> Self {
		Value::Mapping(value)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(value: Vec<T>) -> Self {
		Value::List(value.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::Null, Into::into)
	}
}

/// Already-plain JSON data maps onto the matching plain kinds.
impl From<JsonValue> for Value {
	fn from(value: JsonValue) -> Self {
		match value {
			JsonValue::Null => Value::Null,
			JsonValue::Bool(b) => Value::Bool(b),
			JsonValue::Number(n) => {
				if let Some(i) = n.as_i64() {
					Value::Int(i)
				} else if let Some(u) = n.as_u64() {
					Value::UInt(u)
				} else {
					n.as_f64().map_or(Value::Null, Value::Float)
				}
			}
			JsonValue::String(s) => Value::String(s),
			JsonValue::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
			JsonValue::Object(map) => Value::Mapping(
				map.into_iter()
					.map(|(k, v)| (k, Value::from(v)))
					.collect(),
			),
		}
	}
}
