//! Tag storage and indexing for an analysis database.
//!
//! Tags are named values attached to locations and to whole functions. A
//! location's tags are packed into one of its comment slots by
//! [`marginalia_codec`]; which slot depends on whether the location lies in a
//! function body (see [`slot_for`]). Every write also updates one of two
//! reference-counted indices, so queries walk only tagged locations:
//!
//! - the global index covers locations outside functions and function tags;
//! - the contents index covers locations inside function bodies, with a
//!   per-function summary.
//!
//! A few reserved names (`__name__`, `__color__`, `__extra_prefix__`,
//! `__extra_suffix__`) read and write item attributes instead of the blob;
//! see [`ImplicitKey`].
//!
//! ```
//! use marginalia_host::MemoryDatabase;
//! use marginalia_tags::{Query, TagConfig, TagDatabase};
//!
//! let mut db = TagDatabase::open(MemoryDatabase::new(0u64, 0x10000u64), TagConfig::default());
//! db.set_tag(0x1000u64.into(), "note", "hello").unwrap();
//!
//! let query = Query::all_of("note");
//! let hits: Vec<_> = db.select(&query).collect();
//! assert_eq!(hits.len(), 1);
//! ```

mod config;
mod database;
mod error;
pub mod extra;
mod function;
mod implicit;
pub mod index;
mod maintenance;
mod query;
mod select;
mod slot;
mod store;

pub use config::{ConfigError, DEFAULT_ANCHOR, TagConfig};
pub use database::TagDatabase;
pub use error::{Result, TagError};
pub use extra::ExtraComments;
pub use function::FUNCTION_SLOT;
pub use implicit::ImplicitKey;
pub use index::{IndexKind, RefIndex};
pub use maintenance::{Desync, RebuildReport};
pub use query::{Names, Query};
pub use slot::{Conflict, Resolved, resolve, slot_for};
