//! Recursive converter
//!
//! Turns a [`Value`] graph into a plain `serde_json::Value`. Dispatch happens
//! once per node on the closed [`Value`] enum:
//!
//! 1. sequences (list, query set, page) convert element-wise, optionally
//!    merging junction data into each element;
//! 2. models become mappings filtered by their [`VisibilityRule`];
//! 3. many-to-many managers convert their related objects, with junction
//!    data when the junction model carries extra columns;
//! 4. temporal values go through the configured time function;
//! 5. files become their URL or path;
//! 6. decimals become floats (lossy);
//! 7. mappings convert value-wise;
//! 8. primitives pass through;
//! 9. everything else becomes null.
//!
//! Junction information travels as an explicit [`ThroughContext`] argument,
//! so sibling relations can never observe each other's state.

use crate::context::SerializationContext;
use crate::error::{SerializeError, SerializeResult};
use crate::model::{FieldKind, Model, ModelMeta};
use crate::options::SerializerOptions;
use crate::relation::{JunctionLookup, JunctionSet, RelatedManager};
use crate::time::{Temporal, TimeFunc};
use crate::value::Value;
use crate::visibility::VisibilityRule;
use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map as JsonMap, Number, Value as JsonValue};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Minimum number of junction fields that signals extra pairing data
const PLAIN_JUNCTION_FIELDS: usize = 3;

/// Prefix of internal attributes that are never exported
const INTERNAL_PREFIX: char = '_';

/// Junction information for the elements of one many-to-many relation
#[derive(Debug, Clone, Copy)]
pub struct ThroughContext<'a> {
	/// Junction collection to look pairings up in
	pub junction: &'a dyn JunctionSet,
	/// Junction field pointing at each element
	pub target_field: &'a str,
	/// Junction field pointing at the owner
	pub source_field: &'a str,
	/// Owning instance of the relation
	pub source: &'a dyn Model,
}

/// Converts object graphs into plain values
///
/// The converter only holds configuration. All traversal state lives in a
/// [`SerializationContext`] created per call, so one converter can be shared
/// between threads.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use simple_serializer_core::{Converter, ModelMeta, Record, SerializerOptions, VisibilityRule};
/// use std::sync::Arc;
///
/// let meta = Arc::new(
///     ModelMeta::new("accounts.User")
///         .field("id")
///         .field("name")
///         .field("password")
///         .with_rule(VisibilityRule::new().with_exclude(["password"])),
/// );
/// let user = Record::new(meta)
///     .with("id", 1)
///     .with("name", "Alice")
///     .with("password", "hunter2")
///     .into_value();
///
/// let converter = Converter::new(SerializerOptions::default());
/// assert_eq!(converter.convert(&user).unwrap(), json!({"id": 1, "name": "Alice"}));
/// ```
#[derive(Clone)]
pub struct Converter {
	options: SerializerOptions,
	time_func: TimeFunc,
}

impl Converter {
	/// Create a converter using the time function of `options.datetime_format`
	pub fn new(options: SerializerOptions) -> Self {
		let time_func = options.datetime_format.time_func();
		Self { options, time_func }
	}

	/// Replace the time normalization function
	///
	/// # Examples
	///
	/// ```
	/// use chrono::NaiveDate;
	/// use serde_json::json;
	/// use simple_serializer_core::{Converter, SerializerOptions, Temporal, Value};
	///
	/// let converter = Converter::new(SerializerOptions::default()).with_time_func(|t| match t {
	///     Temporal::Date(d) => json!(d.to_string()),
	///     _ => json!(null),
	/// });
	///
	/// let day = Value::from(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
	/// assert_eq!(converter.convert(&day).unwrap(), json!("2024-05-01"));
	/// ```
	pub fn with_time_func<F>(mut self, f: F) -> Self
	where
		F: Fn(&Temporal) -> JsonValue + Send + Sync + 'static,
	{
		self.time_func = Arc::new(f);
		self
	}

	pub fn options(&self) -> &SerializerOptions {
		&self.options
	}

	/// Visibility of `attr` on a model type under this converter's ownership flag
	pub fn is_visible(&self, meta: &ModelMeta, attr: &str) -> SerializeResult<bool> {
		crate::visibility::is_visible(meta, attr, self.options.own)
	}

	/// Convert a value graph into a plain value
	pub fn convert(&self, value: &Value) -> SerializeResult<JsonValue> {
		let mut context = SerializationContext::new(self.options.max_depth);
		self.convert_value(value, None, &mut context)
	}

	/// Convert with an explicit context and optional junction information
	pub fn convert_value(
		&self,
		value: &Value,
		through: Option<&ThroughContext<'_>>,
		context: &mut SerializationContext,
	) -> SerializeResult<JsonValue> {
		match value {
			Value::List(items) => self.convert_sequence(items, through, context),
			Value::QuerySet(queryset) => self.convert_sequence(queryset.items(), through, context),
			Value::Page(page) => self.convert_sequence(&page.object_list, through, context),
			Value::Model(model) => self.convert_model(model, &[], context),
			Value::Relation(manager) => self.convert_relation(manager.as_ref(), context),
			Value::Temporal(temporal) => Ok((self.time_func)(temporal)),
			Value::File(file) => Ok(JsonValue::String(file.resolve().to_string())),
			Value::Decimal(decimal) => Ok(float_or_null(decimal.to_f64())),
			Value::Mapping(map) => self.convert_mapping(map, context),
			Value::String(s) => Ok(JsonValue::String(s.clone())),
			Value::Bool(b) => Ok(JsonValue::Bool(*b)),
			Value::Int(i) => Ok(JsonValue::from(*i)),
			Value::UInt(u) => Ok(JsonValue::from(*u)),
			Value::Float(f) => Ok(float_or_null(Some(*f))),
			Value::Null => Ok(JsonValue::Null),
			Value::Opaque(type_name) => {
				if self.options.strict_types {
					return Err(SerializeError::UnsupportedType {
						type_name: type_name.clone(),
					});
				}
				trace!(type_name = %type_name, "unrecognized value converted to null");
				Ok(JsonValue::Null)
			}
		}
	}

	fn convert_sequence(
		&self,
		items: &[Value],
		through: Option<&ThroughContext<'_>>,
		context: &mut SerializationContext,
	) -> SerializeResult<JsonValue> {
		context.descend_with(|ctx| {
			let mut converted = Vec::with_capacity(items.len());
			for item in items {
				let mut element = self.convert_value(item, None, ctx)?;
				if let Some(through) = through {
					self.attach_junction(item, &mut element, through, ctx)?;
				}
				converted.push(element);
			}
			Ok(JsonValue::Array(converted))
		})
	}

	/// Merge the junction record pairing `item` with the owner into `element`
	fn attach_junction(
		&self,
		item: &Value,
		element: &mut JsonValue,
		through: &ThroughContext<'_>,
		context: &mut SerializationContext,
	) -> SerializeResult<()> {
		let (Value::Model(target), JsonValue::Object(fields)) = (item, element) else {
			return Ok(());
		};
		let key = &self.options.through_key;
		if fields.contains_key(key) {
			trace!(key = %key, "element already has the through key, junction data skipped");
			return Ok(());
		}

		let lookup = JunctionLookup {
			target_field: through.target_field,
			target: target.as_ref(),
			source_field: through.source_field,
			source: through.source,
		};
		let Some(record) = through.junction.lookup(&lookup) else {
			trace!(
				junction = through.junction.meta().label(),
				"no junction record for element"
			);
			return Ok(());
		};

		let omit = [through.target_field, through.source_field];
		let payload = self.convert_model(&record, &omit, context)?;
		fields.insert(key.clone(), payload);
		Ok(())
	}

	fn convert_model(
		&self,
		model: &Arc<dyn Model>,
		omit: &[&str],
		context: &mut SerializationContext,
	) -> SerializeResult<JsonValue> {
		let meta = model.meta();
		let rule = meta.serializer_rule(self.options.own)?;
		let object_id = model
			.object_id()
			.unwrap_or_else(|| format!("{}@{:p}", meta.label(), Arc::as_ptr(model)));

		context.visit_with(&**model, &object_id, |ctx| {
			self.model_fields(model.as_ref(), rule, omit, ctx)
				.map(JsonValue::Object)
		})
	}

	fn model_fields(
		&self,
		model: &dyn Model,
		rule: &VisibilityRule,
		omit: &[&str],
		context: &mut SerializationContext,
	) -> SerializeResult<JsonMap<String, JsonValue>> {
		let meta = model.meta();
		let mut fields = JsonMap::new();

		// Scalar fields first, then direct relations, keeping declaration order
		for kind in [FieldKind::Scalar, FieldKind::ForeignKey] {
			for field in meta.local_fields().iter().filter(|f| f.kind == kind) {
				let name = field.name.as_str();
				if omit.contains(&name) || !rule.allows(name) {
					continue;
				}
				if kind == FieldKind::ForeignKey && !rule.expands_foreign(name) {
					continue;
				}
				if let Some(value) = model.value(name) {
					let converted = self.convert_value(&value, None, context)?;
					fields.insert(name.to_string(), converted);
				}
			}
		}

		for name in meta.many_to_many_fields() {
			if omit.contains(&name.as_str()) || !rule.allows(name) || !rule.expands_many(name) {
				continue;
			}
			if let Some(value) = model.value(name) {
				let converted = self.convert_value(&value, None, context)?;
				fields.insert(name.clone(), converted);
			}
		}

		for (name, value) in model.extra_attributes() {
			if name.starts_with(INTERNAL_PREFIX)
				|| fields.contains_key(&name)
				|| omit.contains(&name.as_str())
				|| !rule.allows(&name)
			{
				continue;
			}
			let converted = self.convert_value(&value, None, context)?;
			fields.insert(name, converted);
		}

		Ok(fields)
	}

	fn convert_relation(
		&self,
		manager: &dyn RelatedManager,
		context: &mut SerializationContext,
	) -> SerializeResult<JsonValue> {
		let junction = manager.through();
		let related = manager.all();
		let expand = self.options.through && junction.local_field_count() > PLAIN_JUNCTION_FIELDS;

		if expand {
			if let Some(source) = manager.instance() {
				debug!(
					junction = junction.meta().label(),
					target_field = manager.target_field_name(),
					source_field = manager.source_field_name(),
					"expanding many-to-many relation with junction data"
				);
				let through = ThroughContext {
					junction,
					target_field: manager.target_field_name(),
					source_field: manager.source_field_name(),
					source: source.as_ref(),
				};
				return self.convert_value(&related, Some(&through), context);
			}
			debug!(
				junction = junction.meta().label(),
				"relation owner is gone, converting without junction data"
			);
		}

		self.convert_value(&related, None, context)
	}

	fn convert_mapping(
		&self,
		map: &IndexMap<String, Value>,
		context: &mut SerializationContext,
	) -> SerializeResult<JsonValue> {
		// `dict_check` is reserved: strict and lenient traversal are identical for now
		context.descend_with(|ctx| {
			let mut converted = JsonMap::new();
			for (key, value) in map {
				converted.insert(key.clone(), self.convert_value(value, None, ctx)?);
			}
			Ok(JsonValue::Object(converted))
		})
	}
}

impl fmt::Debug for Converter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Converter")
			.field("options", &self.options)
			.finish_non_exhaustive()
	}
}

/// Non-finite floats have no plain representation
fn float_or_null(value: Option<f64>) -> JsonValue {
	value
		.and_then(Number::from_f64)
		.map_or(JsonValue::Null, JsonValue::Number)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::FileRef;
	use crate::model::Record;
	use crate::visibility::RuleContext;
	use rstest::rstest;
	use rust_decimal::Decimal;
	use serde_json::json;
	use std::str::FromStr;

	fn converter() -> Converter {
		Converter::new(SerializerOptions::default())
	}

	#[rstest]
	#[case(Value::from("text"), json!("text"))]
	#[case(Value::from(true), json!(true))]
	#[case(Value::from(-7), json!(-7))]
	#[case(Value::from(u64::MAX), json!(u64::MAX))]
	#[case(Value::from(2.25), json!(2.25))]
	#[case(Value::Null, json!(null))]
	#[case(Value::opaque::<std::fs::File>(), json!(null))]
	#[case(Value::Float(f64::NAN), json!(null))]
	fn test_scalar_cases(#[case] value: Value, #[case] expected: JsonValue) {
		assert_eq!(converter().convert(&value).unwrap(), expected);
	}

	#[rstest]
	fn test_decimal_is_float() {
		let value = Value::from(Decimal::from_str("12.50").unwrap());
		assert_eq!(converter().convert(&value).unwrap(), json!(12.5));
	}

	#[rstest]
	fn test_file_reference() {
		let with_url = Value::from(FileRef::image("/srv/a.png").with_url("/media/a.png"));
		let without_url = Value::from(FileRef::file("/srv/b.txt"));

		assert_eq!(converter().convert(&with_url).unwrap(), json!("/media/a.png"));
		assert_eq!(converter().convert(&without_url).unwrap(), json!("/srv/b.txt"));
	}

	#[rstest]
	fn test_strict_types_rejects_opaque() {
		let converter = Converter::new(SerializerOptions::default().with_strict_types(true));

		let err = converter.convert(&Value::opaque::<std::fs::File>()).unwrap_err();
		assert!(matches!(err, SerializeError::UnsupportedType { .. }));
		// Null is not an unsupported kind
		assert_eq!(converter.convert(&Value::Null).unwrap(), json!(null));
	}

	#[rstest]
	fn test_mapping_preserves_key_order() {
		let value = Value::mapping([("z", Value::from(1)), ("a", Value::from(2))]);
		let converted = converter().convert(&value).unwrap();

		let keys: Vec<_> = converted.as_object().unwrap().keys().cloned().collect();
		assert_eq!(keys, ["z", "a"]);
	}

	#[rstest]
	fn test_dict_check_traverses_identically() {
		let value = Value::mapping([("n", Value::from(Decimal::from(3)))]);
		let lenient = converter().convert(&value).unwrap();
		let strict = Converter::new(SerializerOptions::default().with_dict_check(true))
			.convert(&value)
			.unwrap();
		assert_eq!(lenient, strict);
	}

	#[rstest]
	fn test_model_field_ordering() {
		let meta = Arc::new(
			ModelMeta::new("shop.Order")
				.field("id")
				.foreign_key("customer")
				.field("total")
				.many_to_many("items")
				.with_rule(
					VisibilityRule::new()
						.with_foreign(["customer"])
						.with_many(["items"]),
				),
		);
		let order = Record::new(meta)
			.with("id", 1)
			.with("customer", "c-1")
			.with("total", 10)
			.with("items", vec![Value::from("x")])
			.with_extra("note", "gift")
			.with_extra("_state", "internal")
			.with_extra("total", 999);

		let converted = converter().convert(&order.into_value()).unwrap();
		let keys: Vec<_> = converted.as_object().unwrap().keys().cloned().collect();

		assert_eq!(keys, ["id", "total", "customer", "items", "note"]);
		assert_eq!(converted["total"], json!(10));
	}

	#[rstest]
	fn test_missing_attribute_is_skipped() {
		let meta = Arc::new(ModelMeta::new("shop.Item").field("id").field("sku"));
		let item = Record::new(meta).with("id", 4);

		assert_eq!(converter().convert(&item.into_value()).unwrap(), json!({"id": 4}));
	}

	#[rstest]
	fn test_missing_rule_is_configuration_error() {
		let meta = Arc::new(ModelMeta::new("shop.Item").field("id").without_rule(RuleContext::Owner));
		let item = Record::new(meta).with("id", 4);

		let err = converter().convert(&item.into_value()).unwrap_err();
		assert!(matches!(err, SerializeError::Configuration { .. }));
	}

	#[rstest]
	fn test_converter_is_send_sync() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<Converter>();
	}
}
