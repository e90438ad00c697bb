//! Shared fixtures: a small library with authors, books and tags

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use simple_serializer_core::{
	JunctionSet, ManyToManyManager, ModelMeta, Record, ThroughTable, Value, VisibilityRule,
};
use std::sync::Arc;

pub fn author_meta() -> Arc<ModelMeta> {
	Arc::new(
		ModelMeta::new("library.Author")
			.field("id")
			.field("name")
			.field("email")
			.with_public_rule(VisibilityRule::new().with_exclude(["email"])),
	)
}

pub fn tag_meta() -> Arc<ModelMeta> {
	Arc::new(ModelMeta::new("library.Tag").field("id").field("name"))
}

pub fn book_meta() -> Arc<ModelMeta> {
	Arc::new(
		ModelMeta::new("library.Book")
			.field("id")
			.field("title")
			.field("published")
			.field("price")
			.foreign_key("author")
			.many_to_many("tags")
			.with_rule(
				VisibilityRule::new()
					.with_foreign(["author"])
					.with_many(["tags"]),
			),
	)
}

/// Junction with an extra `note` column
pub fn book_tag_meta() -> Arc<ModelMeta> {
	Arc::new(
		ModelMeta::new("library.BookTag")
			.field("id")
			.foreign_key("book")
			.foreign_key("tag")
			.field("note"),
	)
}

/// Junction with only the primary key and the two links
pub fn plain_link_meta() -> Arc<ModelMeta> {
	Arc::new(
		ModelMeta::new("library.Book_tags")
			.field("id")
			.foreign_key("book")
			.foreign_key("tag"),
	)
}

pub struct Library {
	pub author: Arc<Record>,
	pub book: Arc<Record>,
	pub tags: Vec<Arc<Record>>,
	pub links: Arc<ThroughTable>,
}

impl Library {
	pub fn book_value(&self) -> Value {
		Value::from(self.book.clone())
	}
}

pub fn tag(id: i64, name: &str) -> Arc<Record> {
	Arc::new(Record::new(tag_meta()).with("id", id).with("name", name))
}

/// One author, one book tagged `rust` and `async`
///
/// `junction_meta` selects whether the junction carries extra data.
pub fn library_with(junction_meta: Arc<ModelMeta>) -> Library {
	let author = Arc::new(
		Record::new(author_meta())
			.with("id", 1)
			.with("name", "Ursula")
			.with("email", "ursula@example.com"),
	);
	let book = Arc::new(
		Record::new(book_meta())
			.with("id", 7)
			.with("title", "The Dispossessed")
			.with("published", NaiveDate::from_ymd_opt(1974, 5, 1).unwrap())
			.with("price", Decimal::new(1250, 2))
			.with("author", author.clone()),
	);
	let tags = vec![tag(1, "rust"), tag(2, "async")];

	let has_note = junction_meta.local_field_count() > 3;
	let links = Arc::new(ThroughTable::new(junction_meta.clone()));
	for (offset, (tag_id, note)) in [(1, "core"), (2, "runtime")].into_iter().enumerate() {
		let mut row = Record::new(junction_meta.clone())
			.with("id", 100 + offset as i64)
			.with("book", 7)
			.with("tag", tag_id);
		if has_note {
			row = row.with("note", note);
		}
		links.insert(Arc::new(row));
	}

	let manager = ManyToManyManager::new(
		links.clone() as Arc<dyn JunctionSet>,
		"tag",
		"book",
		&book,
		tags.iter().cloned().map(Value::from).collect(),
	);
	book.set("tags", Value::relation(manager));

	Library {
		author,
		book,
		tags,
		links,
	}
}

pub fn library() -> Library {
	library_with(book_tag_meta())
}
