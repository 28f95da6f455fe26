//! Running one command against a snapshot.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use marginalia_host::{Functions, MemoryDatabase};
use marginalia_primitives::{Ea, Function, TagMap, TagValue};
use marginalia_tags::{IndexKind, Query, TagConfig, TagDatabase};
use serde_json::{Map, Value};

use crate::cli::{Command, FunctionAction, QueryArgs, Side};

/// Runs `command` against the snapshot at `path`, writing results to `out`.
pub fn execute(command: Command, path: &Path, config: &TagConfig, out: &mut impl Write) -> anyhow::Result<()> {
	if let Command::Init { min, max, force } = command {
		return init(path, min, max, force);
	}

	let host = load(path)?;
	let mut db = TagDatabase::open(host, config.clone());
	if run(command, &mut db, out)? {
		save(path, db.host())?;
	}
	Ok(())
}

fn init(path: &Path, min: Ea, max: Ea, force: bool) -> anyhow::Result<()> {
	if min >= max {
		bail!("empty database bounds {min}..{max}");
	}
	if path.exists() && !force {
		bail!("{} already exists (use --force to overwrite)", path.display());
	}
	save(path, &MemoryDatabase::new(min, max))?;
	tracing::info!(path = %path.display(), %min, %max, "created snapshot");
	Ok(())
}

pub fn load(path: &Path) -> anyhow::Result<MemoryDatabase> {
	let text = std::fs::read_to_string(path).with_context(|| format!("failed to read snapshot {}", path.display()))?;
	serde_json::from_str(&text).with_context(|| format!("failed to parse snapshot {}", path.display()))
}

pub fn save(path: &Path, host: &MemoryDatabase) -> anyhow::Result<()> {
	let text = serde_json::to_string_pretty(host).context("failed to serialize snapshot")?;
	std::fs::write(path, text).with_context(|| format!("failed to write snapshot {}", path.display()))
}

/// Runs a command. Returns whether the database changed.
fn run(command: Command, db: &mut TagDatabase<MemoryDatabase>, out: &mut impl Write) -> anyhow::Result<bool> {
	match command {
		Command::Init { .. } => bail!("init creates a snapshot and cannot run against an open one"),
		Command::Function { action } => match action {
			FunctionAction::Add { start, end } => {
				db.host_mut().add_function(Function::new(start, end))?;
				if !db.audit().is_empty() {
					tracing::info!(%start, "new function changes the scope of tagged locations; rebuilding indices");
					db.rebuild()?;
				}
				Ok(true)
			}
			FunctionAction::List => {
				for function in db.host().functions() {
					writeln!(out, "{}\t{}", function.start, function.end)?;
				}
				Ok(false)
			}
		},
		Command::Tag {
			ea,
			key: None,
			value: None,
			function,
		} => {
			let tags = if function { db.function_tags(ea)? } else { db.tags(ea)? };
			writeln!(out, "{}", serde_json::to_string_pretty(&tags_json(&tags)?)?)?;
			Ok(false)
		}
		Command::Tag {
			ea,
			key: Some(key),
			value: None,
			function,
		} => {
			let value = if function { db.function_tag(ea, &key)? } else { db.tag(ea, &key)? };
			writeln!(out, "{}", value.to_json()?)?;
			Ok(false)
		}
		Command::Tag {
			ea,
			key: Some(key),
			value: Some(raw),
			function,
		} => {
			let value = parse_value(&raw)?;
			let previous = if function {
				db.set_function_tag(ea, &key, value)?
			} else {
				db.set_tag(ea, &key, value)?
			};
			if let Some(previous) = previous {
				writeln!(out, "{}", previous.to_json()?)?;
			}
			Ok(true)
		}
		Command::Tag { value: Some(_), .. } => bail!("a value needs a tag name"),
		Command::Untag { ea, key, function } => {
			let removed = if function {
				db.delete_function_tag(ea, &key)?
			} else {
				db.delete_tag(ea, &key)?
			};
			writeln!(out, "{}", removed.to_json()?)?;
			Ok(true)
		}
		Command::Erase { ea } => {
			let removed = db.erase(ea)?;
			writeln!(out, "{}", serde_json::to_string_pretty(&tags_json(&removed)?)?)?;
			Ok(true)
		}
		Command::Names { contents } => {
			let kind = if contents { IndexKind::Contents } else { IndexKind::Global };
			for (name, count) in db.index(kind).counts() {
				writeln!(out, "{count}\t{name}")?;
			}
			Ok(false)
		}
		Command::Select(args) => {
			for (ea, tags) in db.select(&query(args)) {
				writeln!(out, "{ea}\t{}", Value::Object(tags_json(&tags)?))?;
			}
			Ok(false)
		}
		Command::SelectContents(args) => {
			for (ea, names) in db.select_contents(&query(args)) {
				writeln!(out, "{ea}\t{}", join(names))?;
			}
			Ok(false)
		}
		Command::SelectFunctions(args) => {
			for (entry, names) in db.select_functions(&query(args)) {
				writeln!(out, "{entry}\t{}", join(names))?;
			}
			Ok(false)
		}
		Command::Extra {
			ea,
			side,
			text,
			delete,
			insert,
			append,
		} => {
			let mut extra = db.extra(ea)?;
			let previous = match (side, text, delete, insert, append) {
				(Side::Prefix, Some(text), ..) => extra.set_prefix(&text)?,
				(Side::Suffix, Some(text), ..) => extra.set_suffix(&text)?,
				(Side::Prefix, None, true, ..) => extra.delete_prefix(),
				(Side::Suffix, None, true, ..) => extra.delete_suffix(),
				(Side::Prefix, None, false, Some(count), _) => extra.preinsert(count)?,
				(Side::Suffix, None, false, Some(count), _) => extra.postinsert(count)?,
				(Side::Prefix, None, false, None, Some(count)) => extra.preappend(count)?,
				(Side::Suffix, None, false, None, Some(count)) => extra.postappend(count)?,
				(side, None, false, None, None) => {
					let current = match side {
						Side::Prefix => extra.prefix(),
						Side::Suffix => extra.suffix(),
					};
					if let Some(current) = current {
						writeln!(out, "{current}")?;
					}
					return Ok(false);
				}
			};
			if let Some(previous) = previous {
				writeln!(out, "{previous}")?;
			}
			Ok(true)
		}
		Command::Audit => {
			let drift = db.audit();
			for desync in &drift {
				writeln!(
					out,
					"{}\t{}\trecorded={}\tlive={}",
					desync.ea,
					desync.index,
					join(desync.recorded.clone()),
					join(desync.live.clone())
				)?;
			}
			if !drift.is_empty() {
				bail!("{} index entries out of sync; run `marginalia rebuild`", drift.len());
			}
			Ok(false)
		}
		Command::Rebuild => {
			let report = db.rebuild()?;
			writeln!(
				out,
				"{} locations, {} global and {} contents references",
				report.locations, report.global, report.contents
			)?;
			Ok(true)
		}
	}
}

/// Parses a command-line value as JSON, falling back to plain text.
pub fn parse_value(raw: &str) -> anyhow::Result<TagValue> {
	match serde_json::from_str::<Value>(raw) {
		Ok(Value::Null) => bail!("null cannot be stored; use `marginalia untag` to remove a tag"),
		Ok(json) => TagValue::try_from(json).with_context(|| format!("unsupported value {raw}")),
		Err(_) => Ok(TagValue::Str(raw.to_string())),
	}
}

fn tags_json(tags: &TagMap) -> anyhow::Result<Map<String, Value>> {
	let mut object = Map::new();
	for (key, value) in tags {
		object.insert(key.clone(), value.to_json()?);
	}
	Ok(object)
}

fn query(args: QueryArgs) -> Query {
	Query::new().and(args.and).or(args.or)
}

fn join(names: impl IntoIterator<Item = String>) -> String {
	names.into_iter().collect::<Vec<_>>().join(",")
}
