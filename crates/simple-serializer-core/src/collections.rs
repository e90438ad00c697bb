//! Ordered collections of model instances
//!
//! Both kinds convert exactly like a bare list of their items.

use crate::value::Value;

/// Materialized result of a query over one model type
#[derive(Debug, Clone, Default)]
pub struct QuerySet {
	model: String,
	items: Vec<Value>,
}

impl QuerySet {
	/// Create a query set for the given model label
	pub fn new(model: impl Into<String>, items: Vec<Value>) -> Self {
		Self {
			model: model.into(),
			items,
		}
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn items(&self) -> &[Value] {
		&self.items
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Represents a single page of results
#[derive(Debug, Clone)]
pub struct Page {
	/// Items in this page
	pub object_list: Vec<Value>,
	/// Current page number (1-indexed)
	pub number: usize,
	/// Total number of pages
	pub num_pages: usize,
	/// Total number of items across all pages
	pub count: usize,
}

impl Page {
	/// Creates a new page with the given parameters.
	///
	/// # Examples
	///
	/// ```
	/// use simple_serializer_core::{Page, Value};
	///
	/// let page = Page::new(vec![Value::from(1), Value::from(2)], 2, 5, 10);
	/// assert_eq!(page.number, 2);
	/// assert!(page.has_next());
	/// assert!(page.has_previous());
	/// ```
	pub fn new(object_list: Vec<Value>, number: usize, num_pages: usize, count: usize) -> Self {
		Self {
			object_list,
			number,
			num_pages,
			count,
		}
	}

	/// Returns true if there is a next page
	pub fn has_next(&self) -> bool {
		self.number < self.num_pages
	}

	/// Returns true if there is a previous page
	pub fn has_previous(&self) -> bool {
		self.number > 1
	}
}
