//! Model abstraction
//!
//! A model is a structured record with a concrete type ([`ModelMeta`]),
//! declared local fields, declared relation fields and optionally some
//! dynamically attached attributes. The converter never inspects runtime
//! internals; everything it needs goes through the [`Model`] trait.

use crate::error::{SerializeError, SerializeResult};
use crate::value::Value;
use crate::visibility::{RuleContext, VisibilityRule};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Kind of a local field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	/// Plain column value
	Scalar,
	/// Direct relation to a single related object
	ForeignKey,
}

/// A local field declared on a model type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	pub name: String,
	pub kind: FieldKind,
}

impl FieldDescriptor {
	/// Create a scalar field
	pub fn scalar(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: FieldKind::Scalar,
		}
	}

	/// Create a foreign key field
	pub fn foreign_key(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: FieldKind::ForeignKey,
		}
	}

	/// Whether the field points to another model
	pub fn is_relation(&self) -> bool {
		self.kind == FieldKind::ForeignKey
	}
}

/// Type-level description of a model
///
/// Field declaration order is the output order of the converted mapping.
/// Both ownership contexts start out with an unrestricted rule.
///
/// # Examples
///
/// ```
/// use simple_serializer_core::{ModelMeta, VisibilityRule};
///
/// let meta = ModelMeta::new("library.Book")
///     .field("id")
///     .field("title")
///     .foreign_key("author")
///     .many_to_many("tags")
///     .with_rule(VisibilityRule::new().with_foreign(["author"]));
///
/// assert_eq!(meta.label(), "library.Book");
/// assert_eq!(meta.local_field_count(), 3);
/// assert_eq!(meta.many_to_many_fields(), ["tags".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct ModelMeta {
	label: String,
	pk_name: String,
	local_fields: Vec<FieldDescriptor>,
	many_to_many: Vec<String>,
	owner_rule: Option<VisibilityRule>,
	public_rule: Option<VisibilityRule>,
}

impl ModelMeta {
	/// Create metadata for a model type with primary key `id`
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			pk_name: "id".to_string(),
			local_fields: Vec::new(),
			many_to_many: Vec::new(),
			owner_rule: Some(VisibilityRule::default()),
			public_rule: Some(VisibilityRule::default()),
		}
	}

	/// Declare a scalar field
	pub fn field(mut self, name: impl Into<String>) -> Self {
		self.local_fields.push(FieldDescriptor::scalar(name));
		self
	}

	/// Declare a foreign key field
	pub fn foreign_key(mut self, name: impl Into<String>) -> Self {
		self.local_fields.push(FieldDescriptor::foreign_key(name));
		self
	}

	/// Declare a many-to-many field
	pub fn many_to_many(mut self, name: impl Into<String>) -> Self {
		self.many_to_many.push(name.into());
		self
	}

	/// Use a different primary key field name
	pub fn primary_key(mut self, name: impl Into<String>) -> Self {
		self.pk_name = name.into();
		self
	}

	/// Use the same rule for both ownership contexts
	pub fn with_rule(mut self, rule: VisibilityRule) -> Self {
		self.owner_rule = Some(rule.clone());
		self.public_rule = Some(rule);
		self
	}

	/// Set the rule used when the requester owns the object
	pub fn with_owner_rule(mut self, rule: VisibilityRule) -> Self {
		self.owner_rule = Some(rule);
		self
	}

	/// Set the rule used for everybody else
	pub fn with_public_rule(mut self, rule: VisibilityRule) -> Self {
		self.public_rule = Some(rule);
		self
	}

	/// Remove the rule of a context
	pub fn without_rule(mut self, context: RuleContext) -> Self {
		match context {
			RuleContext::Owner => self.owner_rule = None,
			RuleContext::Public => self.public_rule = None,
		}
		self
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn pk_name(&self) -> &str {
		&self.pk_name
	}

	pub fn local_fields(&self) -> &[FieldDescriptor] {
		&self.local_fields
	}

	pub fn many_to_many_fields(&self) -> &[String] {
		&self.many_to_many
	}

	/// Number of local fields, relations included
	pub fn local_field_count(&self) -> usize {
		self.local_fields.len()
	}

	/// Look up the rule of a context
	pub fn rule(&self, context: RuleContext) -> Option<&VisibilityRule> {
		match context {
			RuleContext::Owner => self.owner_rule.as_ref(),
			RuleContext::Public => self.public_rule.as_ref(),
		}
	}

	/// Look up the rule for the `own` flag, failing when it is not configured
	pub fn serializer_rule(&self, own: bool) -> SerializeResult<&VisibilityRule> {
		let context = RuleContext::from_own(own);
		self.rule(context)
			.ok_or_else(|| SerializeError::Configuration {
				model: self.label.clone(),
				context,
			})
	}
}

/// A model instance that can be converted
///
/// Implementors only expose already-loaded data; the converter never asks a
/// model to fetch anything.
pub trait Model: Send + Sync + fmt::Debug {
	/// Type-level metadata
	fn meta(&self) -> &ModelMeta;

	/// Current value of a declared field, `None` when the instance does not carry it
	fn value(&self, name: &str) -> Option<Value>;

	/// Dynamically attached attributes that are not declared fields
	///
	/// Names starting with `_` are treated as internal and never exported.
	fn extra_attributes(&self) -> IndexMap<String, Value> {
		IndexMap::new()
	}

	/// Primary key value
	fn pk(&self) -> Option<Value> {
		self.value(self.meta().pk_name())
	}

	/// Stable identity such as `library.Book:1`, `None` for unsaved instances
	fn object_id(&self) -> Option<String> {
		let pk = self.pk()?.scalar_key()?;
		Some(format!("{}:{}", self.meta().label(), pk))
	}
}

/// Dynamic in-memory model instance
///
/// Attributes can be assigned after the record is shared, which is how
/// back references (and many-to-many managers pointing at their owner) are
/// wired up.
///
/// # Examples
///
/// ```
/// use simple_serializer_core::{Model, ModelMeta, Record};
/// use std::sync::Arc;
///
/// let meta = Arc::new(ModelMeta::new("library.Author").field("id").field("name"));
/// let author = Record::new(meta).with("id", 1).with("name", "Ursula");
///
/// assert_eq!(author.object_id().as_deref(), Some("library.Author:1"));
/// assert!(author.value("email").is_none());
/// ```
#[derive(Debug)]
pub struct Record {
	meta: Arc<ModelMeta>,
	values: RwLock<IndexMap<String, Value>>,
	extras: RwLock<IndexMap<String, Value>>,
}

impl Record {
	/// Create an instance without any attribute
	pub fn new(meta: Arc<ModelMeta>) -> Self {
		Self {
			meta,
			values: RwLock::new(IndexMap::new()),
			extras: RwLock::new(IndexMap::new()),
		}
	}

	/// Set a field value while building
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.values.get_mut().insert(name.into(), value.into());
		self
	}

	/// Attach a dynamic attribute while building
	pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extras.get_mut().insert(name.into(), value.into());
		self
	}

	/// Set a field value on a shared instance
	pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
		self.values.write().insert(name.into(), value.into());
	}

	/// Attach a dynamic attribute on a shared instance
	pub fn set_extra(&self, name: impl Into<String>, value: impl Into<Value>) {
		self.extras.write().insert(name.into(), value.into());
	}

	/// Wrap the record into a [`Value`]
	pub fn into_value(self) -> Value {
		Value::Model(Arc::new(self))
	}
}

impl Model for Record {
	fn meta(&self) -> &ModelMeta {
		&self.meta
	}

	fn value(&self, name: &str) -> Option<Value> {
		self.values.read().get(name).cloned()
	}

	fn extra_attributes(&self) -> IndexMap<String, Value> {
		self.extras.read().clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn author_meta() -> Arc<ModelMeta> {
		Arc::new(
			ModelMeta::new("library.Author")
				.field("id")
				.field("name")
				.foreign_key("agent"),
		)
	}

	#[rstest]
	fn test_meta_field_order() {
		let meta = author_meta();
		let names: Vec<_> = meta.local_fields().iter().map(|f| f.name.as_str()).collect();

		assert_eq!(names, ["id", "name", "agent"]);
		assert!(meta.local_fields()[2].is_relation());
		assert!(!meta.local_fields()[0].is_relation());
	}

	#[rstest]
	fn test_meta_default_rules_exist() {
		let meta = author_meta();
		assert!(meta.serializer_rule(true).is_ok());
		assert!(meta.serializer_rule(false).is_ok());
	}

	#[rstest]
	fn test_meta_custom_primary_key() {
		let meta = Arc::new(ModelMeta::new("geo.Country").field("code").primary_key("code"));
		let country = Record::new(meta).with("code", "NZ");

		assert_eq!(country.object_id().as_deref(), Some("geo.Country:NZ"));
	}

	#[rstest]
	fn test_record_without_pk_has_no_identity() {
		let author = Record::new(author_meta()).with("name", "Ursula");
		assert!(author.object_id().is_none());
	}

	#[rstest]
	fn test_record_late_assignment() {
		let author = Arc::new(Record::new(author_meta()).with("id", 7));
		author.set("name", "Octavia");
		author.set_extra("book_count", 12);

		assert!(matches!(author.value("name"), Some(Value::String(ref s)) if s == "Octavia"));
		assert!(author.extra_attributes().contains_key("book_count"));
	}

	#[rstest]
	fn test_record_builder_overwrites_in_place() {
		let author = Record::new(author_meta())
			.with("id", 1)
			.with("name", "Ursula")
			.with("id", 2)
			.with_extra("alias", "UKL");

		assert_eq!(author.object_id().as_deref(), Some("library.Author:2"));
		let names: Vec<String> = author.values.read().keys().cloned().collect();
		assert_eq!(names, ["id", "name"]);
		assert!(author.extra_attributes().contains_key("alias"));
	}
}
