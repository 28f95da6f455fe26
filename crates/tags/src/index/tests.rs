use marginalia_host::MemoryDatabase;
use pretty_assertions::assert_eq;

use super::*;

const ANCHOR: Ea = Ea(0xFF00_0000);

fn db() -> MemoryDatabase {
	MemoryDatabase::new(0u64, 0x10000u64)
}

fn set(names: &[&str]) -> BTreeSet<String> {
	names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn increment_is_idempotent_per_location() {
	let mut db = db();
	let mut index = RefIndex::load(&db, IndexKind::Global, ANCHOR);
	assert!(index.increment(&mut db, Ea(0x10), None, "note").unwrap());
	assert!(!index.increment(&mut db, Ea(0x10), None, "note").unwrap());
	assert!(index.increment(&mut db, Ea(0x20), None, "note").unwrap());
	assert_eq!(index.count("note"), 2);
	assert_eq!(index.keys(&db, Ea(0x10)), set(&["note"]));
}

#[test]
fn counts_drop_to_zero_and_vanish() {
	let mut db = db();
	let mut index = RefIndex::load(&db, IndexKind::Global, ANCHOR);
	index.increment(&mut db, Ea(0x10), None, "a").unwrap();
	index.increment(&mut db, Ea(0x10), None, "b").unwrap();
	assert!(index.decrement(&mut db, Ea(0x10), None, "a").unwrap());
	assert_eq!(index.names().collect::<Vec<_>>(), vec!["b"]);
	assert!(index.decrement(&mut db, Ea(0x10), None, "b").unwrap());
	assert_eq!(index.names().count(), 0);
	assert_eq!(index.addresses(&db).count(), 0);
	assert_eq!(db.sup(ANCHOR, GLOBAL_COUNTS), None);
}

#[test]
fn decrementing_an_unrecorded_key_is_a_no_op() {
	let mut db = db();
	let mut index = RefIndex::load(&db, IndexKind::Global, ANCHOR);
	index.increment(&mut db, Ea(0x10), None, "a").unwrap();
	assert!(!index.decrement(&mut db, Ea(0x10), None, "zzz").unwrap());
	assert_eq!(index.count("a"), 1);
}

#[test]
fn addresses_walk_in_order() {
	let mut db = db();
	let mut index = RefIndex::load(&db, IndexKind::Global, ANCHOR);
	for ea in [0x300u64, 0x100, 0x200] {
		index.increment(&mut db, Ea(ea), None, "k").unwrap();
	}
	assert_eq!(index.addresses(&db).collect::<Vec<_>>(), vec![Ea(0x100), Ea(0x200), Ea(0x300)]);
}

#[test]
fn counts_survive_reload() {
	let mut db = db();
	let mut index = RefIndex::load(&db, IndexKind::Contents, ANCHOR);
	index.increment(&mut db, Ea(0x110), Some(Ea(0x100)), "x").unwrap();
	index.increment(&mut db, Ea(0x120), Some(Ea(0x100)), "x").unwrap();

	let reloaded = RefIndex::load(&db, IndexKind::Contents, ANCHOR);
	assert_eq!(reloaded, index);
	assert_eq!(reloaded.count("x"), 2);
}

#[test]
fn indices_do_not_share_records() {
	let mut db = db();
	let mut global = RefIndex::load(&db, IndexKind::Global, ANCHOR);
	let contents = RefIndex::load(&db, IndexKind::Contents, ANCHOR);
	global.increment(&mut db, Ea(0x10), None, "k").unwrap();
	assert!(contents.keys(&db, Ea(0x10)).is_empty());
	assert_eq!(contents.addresses(&db).count(), 0);
}

#[test]
fn contents_keep_per_function_tables() {
	let mut db = db();
	let mut index = RefIndex::load(&db, IndexKind::Contents, ANCHOR);
	index.increment(&mut db, Ea(0x110), Some(Ea(0x100)), "a").unwrap();
	index.increment(&mut db, Ea(0x120), Some(Ea(0x100)), "b").unwrap();
	index.increment(&mut db, Ea(0x210), Some(Ea(0x200)), "a").unwrap();

	assert_eq!(function_names(&db, Ea(0x100)), set(&["a", "b"]));
	assert_eq!(
		index.iterate(&db).collect::<Vec<_>>(),
		vec![(Ea(0x100), set(&["a", "b"])), (Ea(0x200), set(&["a"]))]
	);

	index.decrement(&mut db, Ea(0x210), Some(Ea(0x200)), "a").unwrap();
	assert_eq!(index.iterate(&db).map(|(entry, _)| entry).collect::<Vec<_>>(), vec![Ea(0x100)]);
	assert_eq!(index.count("a"), 1);
}

#[test]
fn global_index_has_no_function_tables() {
	let mut db = db();
	let mut index = RefIndex::load(&db, IndexKind::Global, ANCHOR);
	index.increment(&mut db, Ea(0x100), Some(Ea(0x100)), "a").unwrap();
	assert_eq!(index.iterate(&db).count(), 0);
	assert_eq!(db.sup(Ea(0x100), FUNCTION_COUNTS), None);
}

#[test]
fn corrupt_records_read_as_empty() {
	let mut db = db();
	db.set_sup(Ea(0x10), GLOBAL_KEYS, &[0xff, 0xff, 0xff]).unwrap();
	db.set_sup(ANCHOR, GLOBAL_COUNTS, &[0x05]).unwrap();
	let index = RefIndex::load(&db, IndexKind::Global, ANCHOR);
	assert_eq!(index.names().count(), 0);
	assert!(index.keys(&db, Ea(0x10)).is_empty());
}

#[test]
fn clear_removes_everything() {
	let mut db = db();
	let mut index = RefIndex::load(&db, IndexKind::Contents, ANCHOR);
	index.increment(&mut db, Ea(0x110), Some(Ea(0x100)), "a").unwrap();
	index.increment(&mut db, Ea(0x210), Some(Ea(0x200)), "b").unwrap();
	index.clear(&mut db);

	assert_eq!(index.names().count(), 0);
	assert_eq!(index.addresses(&db).count(), 0);
	assert_eq!(index.iterate(&db).count(), 0);
	assert_eq!(db.sup(ANCHOR, CONTENTS_COUNTS), None);
	assert_eq!(RefIndex::load(&db, IndexKind::Contents, ANCHOR).names().count(), 0);
}
