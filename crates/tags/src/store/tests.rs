use marginalia_host::{Attributes, Comments, MemoryDatabase};
use marginalia_primitives::Function;
use pretty_assertions::assert_eq;

use super::*;
use crate::config::TagConfig;

const GLOBAL: Ea = Ea(0x1000);
const ENTRY: Ea = Ea(0x2000);
const INSIDE: Ea = Ea(0x2010);

fn open() -> TagDatabase<MemoryDatabase> {
	let mut host = MemoryDatabase::new(0u64, 0x10000u64);
	host.add_function(Function::new(0x2000u64, 0x2100u64)).unwrap();
	TagDatabase::open(host, TagConfig::default())
}

fn map(pairs: &[(&str, TagValue)]) -> TagMap {
	pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn global_tags_use_the_repeatable_slot() {
	let mut db = open();
	assert_eq!(db.set_tag(GLOBAL, "note", "hello").unwrap(), None);
	assert_eq!(db.host().comment(GLOBAL, Slot::Repeatable).as_deref(), Some("[note] \"hello\""));
	assert_eq!(db.host().comment(GLOBAL, Slot::NonRepeatable), None);
	assert_eq!(db.index(IndexKind::Global).count("note"), 1);
}

#[test]
fn contents_tags_use_the_non_repeatable_slot() {
	let mut db = open();
	db.set_tag(INSIDE, "k", 1).unwrap();
	assert!(db.host().comment(INSIDE, Slot::NonRepeatable).is_some());
	assert_eq!(db.index(IndexKind::Contents).count("k"), 1);
	assert_eq!(db.index(IndexKind::Global).count("k"), 0);
}

#[test]
fn overwriting_returns_the_old_value_and_keeps_the_count() {
	let mut db = open();
	db.set_tag(GLOBAL, "n", 1).unwrap();
	assert_eq!(db.set_tag(GLOBAL, "n", 2).unwrap(), Some(TagValue::Int(1)));
	assert_eq!(db.tag(GLOBAL, "n").unwrap(), TagValue::Int(2));
	assert_eq!(db.index(IndexKind::Global).count("n"), 1);
}

#[test]
fn delete_twice_fails_the_second_time() {
	let mut db = open();
	db.set_tag(GLOBAL, "n", true).unwrap();
	assert_eq!(db.delete_tag(GLOBAL, "n").unwrap(), TagValue::Bool(true));
	assert!(db.delete_tag(GLOBAL, "n").unwrap_err().is_not_found());
	assert_eq!(db.host().comment(GLOBAL, Slot::Repeatable), None);
}

#[test]
fn update_with_none_deletes() {
	let mut db = open();
	db.update(GLOBAL, "n", Some(3.into())).unwrap();
	assert_eq!(db.update(GLOBAL, "n", None).unwrap(), Some(TagValue::Int(3)));
	assert!(db.update(GLOBAL, "n", None).unwrap_err().is_not_found());
}

#[test]
fn oversized_blob_writes_nothing() {
	let mut host = MemoryDatabase::new(0u64, 0x10000u64);
	host.set_comment(GLOBAL, Slot::Repeatable, "[a] 1").unwrap();
	let mut db = TagDatabase::open(
		host,
		TagConfig {
			max_blob_len: 16,
			..TagConfig::default()
		},
	);
	let err = db.set_tag(GLOBAL, "long", "x".repeat(32)).unwrap_err();
	assert!(matches!(err, TagError::EncodingTooLarge { ea: GLOBAL, max: 16, .. }));
	assert_eq!(db.host().comment(GLOBAL, Slot::Repeatable).as_deref(), Some("[a] 1"));
	assert_eq!(db.index(IndexKind::Global).count("long"), 0);
}

#[test]
fn removal_ignores_a_smaller_blob_limit() {
	let mut db = open();
	db.set_tag(GLOBAL, "small", 1).unwrap();
	db.set_tag(GLOBAL, "large", "x".repeat(100)).unwrap();
	db.set_tag(GLOBAL, "other", 2).unwrap();

	let small = TagConfig {
		max_blob_len: 16,
		..TagConfig::default()
	};
	let mut db = TagDatabase::open(db.into_host(), small);
	assert_eq!(db.delete_tag(GLOBAL, "small").unwrap(), TagValue::Int(1));
	assert!(matches!(db.set_tag(GLOBAL, "small", 1), Err(TagError::EncodingTooLarge { .. })));

	let removed = db.erase(GLOBAL).unwrap();
	assert_eq!(removed.len(), 2);
	assert_eq!(db.host().comment(GLOBAL, Slot::Repeatable), None);
	assert_eq!(db.tag_names().count(), 0);
}

#[test]
fn invalid_names_and_values_are_rejected() {
	let mut db = open();
	assert!(matches!(db.set_tag(GLOBAL, "", 1), Err(TagError::InvalidValue { .. })));
	assert!(matches!(db.set_tag(GLOBAL, "a\nb", 1), Err(TagError::InvalidValue { .. })));
	assert!(matches!(db.set_tag(GLOBAL, "f", f64::NAN), Err(TagError::InvalidValue { .. })));
	assert_eq!(db.tag_names().count(), 0);
}

#[test]
fn out_of_bounds_addresses_fail() {
	let mut db = open();
	let outside = Ea(0x20000);
	assert!(matches!(db.tags(outside), Err(TagError::OutOfBounds(ea)) if ea == outside));
	assert!(matches!(db.set_tag(outside, "k", 1), Err(TagError::OutOfBounds(_))));
	assert!(matches!(db.delete_tag(outside, "k"), Err(TagError::OutOfBounds(_))));
}

#[test]
fn implicit_tags_overlay_the_blob() {
	let mut db = open();
	db.set_tag(GLOBAL, "note", "x").unwrap();
	db.set_tag(GLOBAL, "__name__", "label").unwrap();
	db.set_tag(GLOBAL, "__color__", 0xff0000).unwrap();
	db.set_tag(GLOBAL, "__extra_prefix__", "above").unwrap();

	assert_eq!(
		db.tags(GLOBAL).unwrap(),
		map(&[
			("__color__", TagValue::Int(0xff0000)),
			("__extra_prefix__", "above".into()),
			("__name__", "label".into()),
			("note", "x".into()),
		])
	);
	assert_eq!(db.host().comment(GLOBAL, Slot::Repeatable).as_deref(), Some("[note] \"x\""));
	assert_eq!(db.tag_names().collect::<Vec<_>>(), vec!["note"]);
}

#[test]
fn implicit_delete_reaches_the_attribute() {
	let mut db = open();
	db.set_tag(GLOBAL, "__name__", "label").unwrap();
	assert_eq!(db.delete_tag(GLOBAL, "__name__").unwrap(), TagValue::from("label"));
	assert_eq!(db.host().name(GLOBAL), None);
	assert!(db.delete_tag(GLOBAL, "__name__").unwrap_err().is_not_found());
}

#[test]
fn canonical_slot_wins_a_conflict() {
	let mut db = open();
	db.host_mut().set_comment(GLOBAL, Slot::Repeatable, "[k] 1").unwrap();
	db.host_mut().set_comment(GLOBAL, Slot::NonRepeatable, "[k] 2\n[only] true").unwrap();
	let tags = db.tags(GLOBAL).unwrap();
	assert_eq!(tags["k"], TagValue::Int(1));
	assert_eq!(tags["only"], TagValue::Bool(true));

	db.host_mut().set_comment(INSIDE, Slot::Repeatable, "[k] 1").unwrap();
	db.host_mut().set_comment(INSIDE, Slot::NonRepeatable, "[k] 2").unwrap();
	assert_eq!(db.tag(INSIDE, "k").unwrap(), TagValue::Int(2));
}

#[test]
fn writes_leave_the_other_slot_alone() {
	let mut db = open();
	db.host_mut().set_comment(GLOBAL, Slot::NonRepeatable, "[stray] 1").unwrap();
	db.set_tag(GLOBAL, "k", 1).unwrap();
	assert_eq!(db.host().comment(GLOBAL, Slot::NonRepeatable).as_deref(), Some("[stray] 1"));
	assert!(db.delete_tag(GLOBAL, "stray").unwrap_err().is_not_found());
}

#[test]
fn erase_removes_tags_and_color() {
	let mut db = open();
	db.set_tag(GLOBAL, "a", 1).unwrap();
	db.set_tag(GLOBAL, "b", 2).unwrap();
	db.set_tag(GLOBAL, "__color__", 0x00ff00).unwrap();
	db.host_mut().set_comment(GLOBAL, Slot::NonRepeatable, "[stray] 1").unwrap();

	let removed = db.erase(GLOBAL).unwrap();
	assert_eq!(
		removed,
		map(&[("__color__", TagValue::Int(0x00ff00)), ("a", 1.into()), ("b", 2.into())])
	);
	assert_eq!(db.tags(GLOBAL).unwrap(), map(&[("stray", 1.into())]));
	assert_eq!(db.host().item_color(GLOBAL), DEFCOLOR);
	assert_eq!(db.tag_names().count(), 0);
}

#[test]
fn entry_location_tags_sit_beside_function_tags() {
	let mut db = open();
	db.set_tag(ENTRY, "local", 1).unwrap();
	db.set_function_tag(INSIDE, "whole", 2).unwrap();

	let tags = db.tags(ENTRY).unwrap();
	assert_eq!(tags["local"], TagValue::Int(1));
	assert_eq!(tags["whole"], TagValue::Int(2));
	assert_eq!(db.function_tags(ENTRY).unwrap(), map(&[("whole", 2.into())]));
	assert_eq!(db.index(IndexKind::Global).count("whole"), 1);
	assert_eq!(db.index(IndexKind::Contents).count("local"), 1);
}

#[test]
fn function_tags_require_a_function() {
	let mut db = open();
	assert!(matches!(db.function_tags(GLOBAL), Err(TagError::FunctionNotFound(_))));
	assert!(matches!(db.set_function_tag(GLOBAL, "k", 1), Err(TagError::FunctionNotFound(_))));
	assert!(matches!(
		db.set_function_tag(INSIDE, "__extra_prefix__", "x"),
		Err(TagError::InvalidValue { .. })
	));
}

#[test]
fn extra_keys_are_rejected_on_every_function_path() {
	let mut db = open();
	db.set_tag(ENTRY, "__extra_prefix__", "item").unwrap();
	for result in [
		db.function_tag(INSIDE, "__extra_prefix__"),
		db.function_tag(INSIDE, "__extra_suffix__"),
	] {
		assert!(matches!(result, Err(TagError::InvalidValue { .. })));
	}
	assert!(matches!(
		db.delete_function_tag(INSIDE, "__extra_prefix__"),
		Err(TagError::InvalidValue { .. })
	));
	assert_eq!(db.tag(ENTRY, "__extra_prefix__").unwrap(), TagValue::from("item"));
}

#[test]
fn function_name_is_the_entry_name() {
	let mut db = open();
	db.set_function_tag(INSIDE, "__name__", "handler").unwrap();
	assert_eq!(db.host().name(ENTRY).as_deref(), Some("handler"));
	assert_eq!(db.function_tag(INSIDE, "__name__").unwrap(), TagValue::from("handler"));
	assert_eq!(db.delete_function_tag(ENTRY, "__name__").unwrap(), TagValue::from("handler"));
	assert!(db.function_tag(INSIDE, "__name__").unwrap_err().is_not_found());
}
