//! Integration tests for converting models and their direct relations

mod common;

use chrono::{TimeZone, Utc};
use common::{author_meta, library};
use rstest::rstest;
use serde_json::json;
use simple_serializer_core::{
	Converter, ModelMeta, Output, Page, QuerySet, Record, RuleContext, SerializeError,
	SerializerOptions, TimeFormat, Value, VisibilityRule, serializer,
};
use std::sync::Arc;

#[rstest]
fn test_user_with_created_timestamp() {
	let meta = Arc::new(
		ModelMeta::new("accounts.User")
			.field("id")
			.field("name")
			.field("created"),
	);
	let user = Record::new(meta)
		.with("id", 1)
		.with("name", "Alice")
		.with("created", Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap())
		.into_value();

	let output = serializer(&user, SerializerOptions::default()).unwrap();

	assert_eq!(
		output,
		Output::Plain(json!({"id": 1, "name": "Alice", "created": 1609459200}))
	);
}

#[rstest]
fn test_book_with_author_and_tags() {
	let library = library();
	let converter = Converter::new(SerializerOptions::default());

	let result = converter.convert(&library.book_value()).unwrap();

	assert_eq!(
		result,
		json!({
			"id": 7,
			"title": "The Dispossessed",
			"published": 136598400,
			"price": 12.5,
			"author": {"id": 1, "name": "Ursula", "email": "ursula@example.com"},
			"tags": [
				{"id": 1, "name": "rust", "through": {"id": 100, "note": "core"}},
				{"id": 2, "name": "async", "through": {"id": 101, "note": "runtime"}},
			],
		})
	);
}

#[rstest]
fn test_output_follows_declaration_order() {
	let library = library();
	let converter = Converter::new(SerializerOptions::default());

	let result = converter.convert(&library.book_value()).unwrap();
	let keys: Vec<&str> = result
		.as_object()
		.unwrap()
		.keys()
		.map(String::as_str)
		.collect();

	assert_eq!(keys, ["id", "title", "published", "price", "author", "tags"]);
}

#[rstest]
fn test_public_rule_hides_attributes() {
	let library = library();
	let options = SerializerOptions::default().with_own(false);

	let result = Converter::new(options)
		.convert(&Value::from(library.author.clone()))
		.unwrap();

	assert_eq!(result, json!({"id": 1, "name": "Ursula"}));
}

#[rstest]
fn test_foreign_key_requires_opt_in() {
	let author = Arc::new(Record::new(author_meta()).with("id", 1).with("name", "Ursula"));
	let meta = Arc::new(
		ModelMeta::new("library.Review")
			.field("id")
			.foreign_key("author")
			.field("stars"),
	);
	let review = Record::new(meta)
		.with("id", 3)
		.with("author", author)
		.with("stars", 5)
		.into_value();

	let result = Converter::new(SerializerOptions::default())
		.convert(&review)
		.unwrap();

	assert_eq!(result, json!({"id": 3, "stars": 5}));
}

#[rstest]
fn test_string_time_format() {
	let meta = Arc::new(ModelMeta::new("events.Event").field("id").field("at"));
	let event = Record::new(meta)
		.with("id", 1)
		.with("at", Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap())
		.into_value();
	let options = SerializerOptions::default().with_datetime_format(TimeFormat::String);

	let result = Converter::new(options).convert(&event).unwrap();

	assert_eq!(result["at"], json!("2021-03-04 05:06:07"));
}

#[rstest]
fn test_extra_attributes_follow_fields() {
	let meta = Arc::new(ModelMeta::new("shop.Order").field("id").field("total"));
	let order = Record::new(meta)
		.with("id", 9)
		.with("total", 30)
		.with_extra("total", 999)
		.with_extra("_cache", "hidden")
		.with_extra("discount", 5)
		.into_value();

	let result = Converter::new(SerializerOptions::default())
		.convert(&order)
		.unwrap();

	assert_eq!(result, json!({"id": 9, "total": 30, "discount": 5}));
	let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
	assert_eq!(keys, ["id", "total", "discount"]);
}

#[rstest]
fn test_queryset_and_page() {
	let authors: Vec<Value> = (1..=3)
		.map(|id| {
			Record::new(author_meta())
				.with("id", id)
				.with("name", format!("author-{id}"))
				.into_value()
		})
		.collect();
	let converter = Converter::new(SerializerOptions::default().with_own(false));

	let queryset = Value::from(QuerySet::new("library.Author", authors.clone()));
	assert_eq!(
		converter.convert(&queryset).unwrap(),
		json!([
			{"id": 1, "name": "author-1"},
			{"id": 2, "name": "author-2"},
			{"id": 3, "name": "author-3"},
		])
	);

	let page = Value::from(Page::new(authors[..2].to_vec(), 1, 2, 3));
	assert_eq!(
		converter.convert(&page).unwrap(),
		json!([{"id": 1, "name": "author-1"}, {"id": 2, "name": "author-2"}])
	);
}

#[rstest]
fn test_empty_collections() {
	let converter = Converter::new(SerializerOptions::default());

	assert_eq!(converter.convert(&Value::List(Vec::new())).unwrap(), json!([]));
	assert_eq!(
		converter
			.convert(&Value::from(QuerySet::new("library.Author", Vec::new())))
			.unwrap(),
		json!([])
	);
}

#[rstest]
#[case(true, RuleContext::Owner)]
#[case(false, RuleContext::Public)]
fn test_missing_rule_is_configuration_error(#[case] own: bool, #[case] context: RuleContext) {
	let meta = Arc::new(ModelMeta::new("legacy.Thing").field("id").without_rule(context));
	let thing = Record::new(meta).with("id", 1).into_value();

	let err = Converter::new(SerializerOptions::default().with_own(own))
		.convert(&thing)
		.unwrap_err();

	assert!(matches!(
		err,
		SerializeError::Configuration { ref model, context: ctx } if model == "legacy.Thing" && ctx == context
	));
}

#[rstest]
fn test_missing_rule_fails_whole_conversion() {
	let broken = Arc::new(
		ModelMeta::new("legacy.Thing")
			.field("id")
			.without_rule(RuleContext::Owner),
	);
	let list = Value::from(vec![
		Value::from(1),
		Record::new(broken).with("id", 2).into_value(),
	]);

	let result = Converter::new(SerializerOptions::default()).convert(&list);

	assert!(result.is_err());
}

#[rstest]
fn test_include_and_exclude_lists() {
	let meta = Arc::new(
		ModelMeta::new("accounts.Profile")
			.field("id")
			.field("bio")
			.field("phone")
			.field("token")
			.with_owner_rule(
				VisibilityRule::new()
					.with_include(["id", "bio", "token"])
					.with_exclude(["token"]),
			),
	);
	let profile = Record::new(meta)
		.with("id", 1)
		.with("bio", "hi")
		.with("phone", "555")
		.with("token", "secret")
		.into_value();

	let result = Converter::new(SerializerOptions::default())
		.convert(&profile)
		.unwrap();

	assert_eq!(result, json!({"id": 1, "bio": "hi"}));
}
