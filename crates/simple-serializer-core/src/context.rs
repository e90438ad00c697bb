//! Per-call traversal state
//!
//! Tracks nesting depth and the models currently being converted, so that a
//! cyclic graph fails with an error instead of recursing forever. One
//! context lives for exactly one top-level conversion.

use crate::error::{SerializeError, SerializeResult};
use crate::options::DEFAULT_MAX_DEPTH;
use std::collections::HashSet;

/// Context for tracking serialization depth and visited objects
#[derive(Debug, Clone)]
pub struct SerializationContext {
	/// Current depth level (0 = root)
	current_depth: usize,
	/// Maximum allowed depth
	max_depth: usize,
	/// Addresses of the objects on the current path
	visited: HashSet<usize>,
}

impl SerializationContext {
	/// Create a new serialization context
	///
	/// # Examples
	///
	/// ```
	/// use simple_serializer_core::SerializationContext;
	///
	/// let context = SerializationContext::new(3);
	/// assert_eq!(context.current_depth(), 0);
	/// assert_eq!(context.max_depth(), 3);
	/// ```
	pub fn new(max_depth: usize) -> Self {
		Self {
			current_depth: 0,
			max_depth,
			visited: HashSet::new(),
		}
	}

	pub fn current_depth(&self) -> usize {
		self.current_depth
	}

	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	/// Check if we can go deeper
	pub fn can_go_deeper(&self) -> bool {
		self.current_depth < self.max_depth
	}

	/// Whether the object is on the current path
	pub fn is_visiting<T: ?Sized>(&self, obj: &T) -> bool {
		self.visited.contains(&address_of(obj))
	}

	/// Run `f` one level deeper
	///
	/// # Examples
	///
	/// ```
	/// use simple_serializer_core::SerializationContext;
	///
	/// let mut context = SerializationContext::new(1);
	/// let depth = context.descend_with(|ctx| Ok(ctx.current_depth())).unwrap();
	/// assert_eq!(depth, 1);
	/// assert_eq!(context.current_depth(), 0);
	///
	/// // A second level exceeds the limit
	/// let nested = context.descend_with(|ctx| ctx.descend_with(|_| Ok(())));
	/// assert!(nested.is_err());
	/// ```
	pub fn descend_with<F, R>(&mut self, f: F) -> SerializeResult<R>
	where
		F: FnOnce(&mut Self) -> SerializeResult<R>,
	{
		if !self.can_go_deeper() {
			return Err(SerializeError::MaxDepthExceeded {
				current_depth: self.current_depth,
				max_depth: self.max_depth,
			});
		}

		self.current_depth += 1;
		let result = f(self);
		self.current_depth -= 1;
		result
	}

	/// Visit an object and run `f` one level deeper, unmarking it afterwards
	///
	/// Objects are identified by address. The object stays marked while `f`
	/// runs, so reaching the same object again from inside `f` is a cycle.
	/// Siblings referring to the same object, and distinct objects that
	/// merely share `object_id`, are fine.
	///
	/// # Examples
	///
	/// ```
	/// use simple_serializer_core::SerializationContext;
	///
	/// struct Book { id: i64 }
	/// let book = Book { id: 1 };
	/// let copy = Book { id: 1 };
	///
	/// let mut context = SerializationContext::new(5);
	///
	/// let cyclic = context.visit_with(&book, "library.Book:1", |ctx| {
	///     ctx.visit_with(&book, "library.Book:1", |_| Ok(()))
	/// });
	/// assert!(cyclic.is_err());
	///
	/// // Cleaned up even on error
	/// assert!(!context.is_visiting(&book));
	///
	/// let nested_copy = context.visit_with(&book, "library.Book:1", |ctx| {
	///     ctx.visit_with(&copy, "library.Book:1", |_| Ok(copy.id))
	/// });
	/// assert_eq!(nested_copy.unwrap(), book.id);
	/// ```
	pub fn visit_with<T, F, R>(&mut self, obj: &T, object_id: &str, f: F) -> SerializeResult<R>
	where
		T: ?Sized,
		F: FnOnce(&mut Self) -> SerializeResult<R>,
	{
		let address = address_of(obj);
		if self.visited.contains(&address) {
			return Err(SerializeError::CyclicReference {
				object_id: object_id.to_string(),
			});
		}

		self.visited.insert(address);
		let result = self.descend_with(f);
		self.visited.remove(&address);
		result
	}
}

impl Default for SerializationContext {
	fn default() -> Self {
		Self::new(DEFAULT_MAX_DEPTH)
	}
}

fn address_of<T: ?Sized>(obj: &T) -> usize {
	obj as *const T as *const () as usize
}
