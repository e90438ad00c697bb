//! Attribute visibility rules
//!
//! Each model type carries a [`VisibilityRule`] per ownership context. The
//! rule decides which attributes appear in the output and which relation
//! attributes are expanded.

use crate::error::SerializeResult;
use crate::model::ModelMeta;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ownership context used to select a model's rule.
///
/// The owner of an object usually sees more of it than everybody else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleContext {
	Owner,
	Public,
}

impl RuleContext {
	/// Map the `own` flag of a request to a context.
	pub fn from_own(own: bool) -> Self {
		if own { Self::Owner } else { Self::Public }
	}
}

impl fmt::Display for RuleContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RuleContext::Owner => write!(f, "owner"),
			RuleContext::Public => write!(f, "public"),
		}
	}
}

/// Per-type visibility configuration.
///
/// `exclude_attr` always wins over `include_attr`. An empty `include_attr`
/// places no restriction. Relation attributes additionally need to be listed
/// in `foreign` (direct relations) or `many` (many-to-many relations) to be
/// expanded at all.
///
/// # Examples
///
/// ```
/// use simple_serializer_core::VisibilityRule;
///
/// let rule = VisibilityRule::new()
///     .with_include(["name", "secret"])
///     .with_exclude(["secret"]);
///
/// assert!(rule.allows("name"));
/// assert!(!rule.allows("secret"));
/// assert!(!rule.allows("age"));
/// ```
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityRule {
	/// Whitelist of attribute names; empty means unrestricted
	#[serde(default)]
	pub include_attr: IndexSet<String>,
	/// Blacklist of attribute names
	#[serde(default)]
	pub exclude_attr: IndexSet<String>,
	/// Direct relation attributes to expand
	#[serde(default)]
	pub foreign: IndexSet<String>,
	/// Many-to-many attributes to expand
	#[serde(default)]
	pub many: IndexSet<String>,
}

impl VisibilityRule {
	/// Create a rule that shows every attribute and expands no relation
	pub fn new() -> Self {
		Self::default()
	}

	/// Restrict the output to the given attributes
	pub fn with_include<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.include_attr.extend(names.into_iter().map(Into::into));
		self
	}

	/// Hide the given attributes
	pub fn with_exclude<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.exclude_attr.extend(names.into_iter().map(Into::into));
		self
	}

	/// Expand the given direct relation attributes
	pub fn with_foreign<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.foreign.extend(names.into_iter().map(Into::into));
		self
	}

	/// Expand the given many-to-many attributes
	pub fn with_many<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.many.extend(names.into_iter().map(Into::into));
		self
	}

	/// Check whether an attribute passes the include/exclude lists
	pub fn allows(&self, attr: &str) -> bool {
		if !self.exclude_attr.is_empty() && self.exclude_attr.contains(attr) {
			return false;
		}
		if !self.include_attr.is_empty() && !self.include_attr.contains(attr) {
			return false;
		}
		true
	}

	/// Check whether a direct relation attribute is opted into expansion
	pub fn expands_foreign(&self, attr: &str) -> bool {
		self.foreign.contains(attr)
	}

	/// Check whether a many-to-many attribute is opted into expansion
	pub fn expands_many(&self, attr: &str) -> bool {
		self.many.contains(attr)
	}
}

/// Decide whether `attr` of a model type is visible for the given ownership flag.
///
/// Fails with [`SerializeError::Configuration`](crate::SerializeError::Configuration)
/// when the type has no rule for that context.
///
/// # Examples
///
/// ```
/// use simple_serializer_core::{ModelMeta, VisibilityRule, is_visible};
///
/// let meta = ModelMeta::new("accounts.User")
///     .field("id")
///     .field("password")
///     .with_public_rule(VisibilityRule::new().with_exclude(["password"]));
///
/// assert!(is_visible(&meta, "password", true).unwrap());
/// assert!(!is_visible(&meta, "password", false).unwrap());
/// ```
pub fn is_visible(meta: &ModelMeta, attr: &str, own: bool) -> SerializeResult<bool> {
	Ok(meta.serializer_rule(own)?.allows(attr))
}
