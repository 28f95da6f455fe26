use marginalia_primitives::{DEFCOLOR, Ea, Function, Slot};

use super::*;

fn db() -> MemoryDatabase {
	MemoryDatabase::new(0x1000u64, 0x9000u64)
}

#[test]
fn comments_are_per_slot() {
	let mut db = db();
	db.set_comment(Ea(0x1000), Slot::Repeatable, "r").unwrap();
	db.set_comment(Ea(0x1000), Slot::NonRepeatable, "n").unwrap();
	assert_eq!(db.comment(Ea(0x1000), Slot::Repeatable).as_deref(), Some("r"));
	assert_eq!(db.comment(Ea(0x1000), Slot::NonRepeatable).as_deref(), Some("n"));

	db.set_comment(Ea(0x1000), Slot::Repeatable, "").unwrap();
	assert_eq!(db.comment(Ea(0x1000), Slot::Repeatable), None);
	assert_eq!(db.comment_next(None), Some(Ea(0x1000)));

	db.set_comment(Ea(0x1000), Slot::NonRepeatable, "").unwrap();
	assert_eq!(db.comment_next(None), None);
}

#[test]
fn comment_writes_outside_bounds_fail() {
	let mut db = db();
	assert_eq!(
		db.set_comment(Ea(0x9000), Slot::Repeatable, "x"),
		Err(HostError::OutOfBounds(Ea(0x9000)))
	);
}

#[test]
fn comment_next_walks_in_order() {
	let mut db = db();
	for ea in [0x3000, 0x1000, 0x2000] {
		db.set_comment(Ea(ea), Slot::Repeatable, "x").unwrap();
	}
	let walked: Vec<_> = std::iter::successors(db.comment_next(None), |ea| db.comment_next(Some(*ea))).collect();
	assert_eq!(walked, vec![Ea(0x1000), Ea(0x2000), Ea(0x3000)]);
}

#[test]
fn function_lookup() {
	let mut db = db();
	db.add_function(Function::new(0x2000, 0x2100)).unwrap();
	db.add_function(Function::new(0x3000, 0x3010)).unwrap();

	assert_eq!(db.function_at(Ea(0x2050)), Some(Function::new(0x2000, 0x2100)));
	assert_eq!(db.function_at(Ea(0x2100)), None);
	assert_eq!(db.function_at(Ea(0x1fff)), None);
	assert!(db.is_within_function(Ea(0x3000)));
	assert_eq!(db.functions().len(), 2);
}

#[test]
fn overlapping_functions_are_rejected() {
	let mut db = db();
	db.add_function(Function::new(0x2000, 0x2100)).unwrap();
	assert!(matches!(
		db.add_function(Function::new(0x20f0, 0x2200)),
		Err(HostError::FunctionOverlap { .. })
	));
	assert!(matches!(
		db.add_function(Function::new(0x1f00, 0x3000)),
		Err(HostError::FunctionOverlap { .. })
	));
	assert!(matches!(
		db.add_function(Function::new(0x4000, 0x4000)),
		Err(HostError::EmptyFunction { .. })
	));
	db.add_function(Function::new(0x2100, 0x2200)).unwrap();
}

#[test]
fn sup_store_iterates_per_index() {
	let mut db = db();
	db.set_sup(Ea(0x2000), 7, b"b").unwrap();
	db.set_sup(Ea(0x1000), 7, b"a").unwrap();
	db.set_sup(Ea(0x1500), 8, b"c").unwrap();

	assert_eq!(db.sup_next(7, None), Some(Ea(0x1000)));
	assert_eq!(db.sup_next(7, Some(Ea(0x1000))), Some(Ea(0x2000)));
	assert_eq!(db.sup_next(7, Some(Ea(0x2000))), None);
	assert_eq!(db.sup(Ea(0x1500), 8), Some(b"c".to_vec()));

	assert!(db.remove_sup(Ea(0x1000), 7));
	assert!(!db.remove_sup(Ea(0x1000), 7));
	assert_eq!(db.sup_next(7, None), Some(Ea(0x2000)));
}

#[test]
fn names_and_colors() {
	let mut db = db();
	db.set_name(Ea(0x1000), Some("entry"), true).unwrap();
	assert_eq!(db.name(Ea(0x1000)).as_deref(), Some("entry"));
	assert!(db.is_listed(Ea(0x1000)));
	assert!(matches!(
		db.set_name(Ea(0x1000), Some("two words"), true),
		Err(HostError::InvalidName { .. })
	));
	db.set_name(Ea(0x1000), None, true).unwrap();
	assert_eq!(db.name(Ea(0x1000)), None);

	assert_eq!(db.item_color(Ea(0x1000)), DEFCOLOR);
	db.set_item_color(Ea(0x1000), 0x0000ff).unwrap();
	assert_eq!(db.item_color(Ea(0x1000)), 0x0000ff);
	db.set_item_color(Ea(0x1000), DEFCOLOR).unwrap();
	assert_eq!(db.item_color(Ea(0x1000)), DEFCOLOR);
}

#[test]
fn snapshot_survives_json() {
	let mut db = db();
	db.add_function(Function::new(0x2000, 0x2100)).unwrap();
	db.set_comment(Ea(0x2004), Slot::NonRepeatable, "[a] 1").unwrap();
	db.set_sup(Ea(0x2004), 0x11, &[1, 2, 3]).unwrap();
	db.set_name(Ea(0x2000), Some("main"), true).unwrap();
	db.set_item_color(Ea(0x2004), 0x123456).unwrap();

	let json = serde_json::to_string(&db).unwrap();
	let back: MemoryDatabase = serde_json::from_str(&json).unwrap();
	assert_eq!(back, db);
}
