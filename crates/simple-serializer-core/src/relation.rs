//! Many-to-many relations and their junction ("through") tables
//!
//! A [`RelatedManager`] is the handle a model exposes for one of its
//! many-to-many fields. It knows the owning instance, the already-loaded
//! related objects and the junction collection that records each pairing.
//! Junction collections with extra columns can be surfaced inline in the
//! output; see the converter for how.

use crate::collections::QuerySet;
use crate::model::{Model, ModelMeta};
use crate::value::Value;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

/// Query used to find the junction record of one pairing
#[derive(Debug, Clone, Copy)]
pub struct JunctionLookup<'a> {
	/// Junction field pointing at the related object
	pub target_field: &'a str,
	/// The related object
	pub target: &'a dyn Model,
	/// Junction field pointing at the owning instance
	pub source_field: &'a str,
	/// The owning instance
	pub source: &'a dyn Model,
}

/// Junction collection of a many-to-many relation
pub trait JunctionSet: Send + Sync + fmt::Debug {
	/// Metadata of the junction model
	fn meta(&self) -> &ModelMeta;

	/// Number of local fields of the junction model
	///
	/// A plain junction has three (primary key plus the two links); anything
	/// above carries extra data.
	fn local_field_count(&self) -> usize {
		self.meta().local_field_count()
	}

	/// Find the record linking `lookup.target` to `lookup.source`
	fn lookup(&self, lookup: &JunctionLookup<'_>) -> Option<Arc<dyn Model>>;
}

/// Live set of objects related to one instance through a many-to-many field
pub trait RelatedManager: Send + Sync + fmt::Debug {
	/// Junction collection backing the relation
	fn through(&self) -> &dyn JunctionSet;

	/// Junction field that points at the related objects
	fn target_field_name(&self) -> &str;

	/// Junction field that points at the owning instance
	fn source_field_name(&self) -> &str;

	/// Owning instance, `None` once it has been dropped
	fn instance(&self) -> Option<Arc<dyn Model>>;

	/// Materialized related objects
	fn all(&self) -> Value;
}

/// Check whether a junction field value refers to `model`
///
/// A loaded relation matches by object or identity, a raw key matches the
/// model's primary key.
pub fn refers_to(field_value: &Value, model: &dyn Model) -> bool {
	match field_value {
		Value::Model(other) => {
			if std::ptr::addr_eq(Arc::as_ptr(other), model as *const dyn Model) {
				return true;
			}
			match (other.object_id(), model.object_id()) {
				(Some(a), Some(b)) => a == b,
				_ => false,
			}
		}
		scalar => match (scalar.scalar_key(), model.pk().and_then(|pk| pk.scalar_key())) {
			(Some(a), Some(b)) => a == b,
			_ => false,
		},
	}
}

/// In-memory junction table
///
/// # Examples
///
/// ```
/// use simple_serializer_core::{JunctionSet, ModelMeta, Record, ThroughTable};
/// use std::sync::Arc;
///
/// let membership = Arc::new(
///     ModelMeta::new("club.Membership")
///         .field("id")
///         .foreign_key("person")
///         .foreign_key("club")
///         .field("joined"),
/// );
/// let table = ThroughTable::new(membership.clone());
/// table.insert(Arc::new(Record::new(membership).with("id", 1).with("person", 10).with("club", 20)));
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.local_field_count(), 4);
/// ```
#[derive(Debug)]
pub struct ThroughTable {
	meta: Arc<ModelMeta>,
	rows: RwLock<Vec<Arc<dyn Model>>>,
}

impl ThroughTable {
	/// Create an empty junction table
	pub fn new(meta: Arc<ModelMeta>) -> Self {
		Self {
			meta,
			rows: RwLock::new(Vec::new()),
		}
	}

	/// Add a junction record
	pub fn insert(&self, row: Arc<dyn Model>) {
		self.rows.write().push(row);
	}

	pub fn len(&self) -> usize {
		self.rows.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.read().is_empty()
	}
}

impl JunctionSet for ThroughTable {
	fn meta(&self) -> &ModelMeta {
		&self.meta
	}

	fn lookup(&self, lookup: &JunctionLookup<'_>) -> Option<Arc<dyn Model>> {
		self.rows
			.read()
			.iter()
			.find(|row| {
				let target = row.value(lookup.target_field);
				let source = row.value(lookup.source_field);
				target.is_some_and(|v| refers_to(&v, lookup.target))
					&& source.is_some_and(|v| refers_to(&v, lookup.source))
			})
			.cloned()
	}
}

/// Many-to-many manager over already-loaded related objects
///
/// Holds its owner weakly, so a record can store its own manager without
/// creating a reference cycle.
///
/// # Examples
///
/// ```
/// use simple_serializer_core::{ManyToManyManager, ModelMeta, Record, RelatedManager, ThroughTable, Value};
/// use std::sync::Arc;
///
/// let tag_meta = Arc::new(ModelMeta::new("library.Tag").field("id").field("name"));
/// let link_meta = Arc::new(ModelMeta::new("library.BookTag").field("id").foreign_key("book").foreign_key("tag"));
/// let book_meta = Arc::new(ModelMeta::new("library.Book").field("id").many_to_many("tags"));
///
/// let book = Arc::new(Record::new(book_meta).with("id", 1));
/// let rust = Value::from(Arc::new(Record::new(tag_meta).with("id", 1).with("name", "rust")));
/// let manager = ManyToManyManager::new(
///     Arc::new(ThroughTable::new(link_meta)),
///     "tag",
///     "book",
///     &book,
///     vec![rust],
/// );
///
/// assert!(manager.instance().is_some());
/// assert_eq!(manager.target_field_name(), "tag");
/// book.set("tags", Value::relation(manager));
/// ```
#[derive(Debug)]
pub struct ManyToManyManager {
	through: Arc<dyn JunctionSet>,
	target_field: String,
	source_field: String,
	instance: Weak<dyn Model>,
	related: Vec<Value>,
}

impl ManyToManyManager {
	/// Create a manager for `instance`
	///
	/// # Arguments
	///
	/// * `through` - Junction collection of the relation
	/// * `target_field` - Junction field pointing at the related objects
	/// * `source_field` - Junction field pointing at `instance`
	/// * `instance` - Owning instance
	/// * `related` - Already-loaded related objects
	pub fn new<M: Model + 'static>(
		through: Arc<dyn JunctionSet>,
		target_field: impl Into<String>,
		source_field: impl Into<String>,
		instance: &Arc<M>,
		related: Vec<Value>,
	) -> Self {
		let instance: Weak<M> = Arc::downgrade(instance);
		let instance: Weak<dyn Model> = instance;
		Self {
			through,
			target_field: target_field.into(),
			source_field: source_field.into(),
			instance,
			related,
		}
	}
}

impl RelatedManager for ManyToManyManager {
	fn through(&self) -> &dyn JunctionSet {
		self.through.as_ref()
	}

	fn target_field_name(&self) -> &str {
		&self.target_field
	}

	fn source_field_name(&self) -> &str {
		&self.source_field
	}

	fn instance(&self) -> Option<Arc<dyn Model>> {
		self.instance.upgrade()
	}

	fn all(&self) -> Value {
		let label = self
			.related
			.iter()
			.find_map(|item| item.as_model().map(|m| m.meta().label().to_string()))
			.unwrap_or_default();
		Value::QuerySet(QuerySet::new(label, self.related.clone()))
	}
}
