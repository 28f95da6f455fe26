use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use marginalia_primitives::Ea;

#[derive(Parser, Debug)]
#[command(name = "marginalia")]
#[command(about = "Tag locations and functions in an analysis database snapshot")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Database snapshot to operate on (defaults to the configured one, then `marginalia.json`)
	#[arg(long, short = 'd', value_name = "PATH", global = true)]
	pub database: Option<PathBuf>,

	/// Configuration file (defaults to `marginalia.toml` when present)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Log at debug level unless a filter is configured
	#[arg(long, short = 'v', global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Create an empty snapshot spanning [MIN, MAX)
	Init {
		min: Ea,
		max: Ea,
		/// Overwrite an existing snapshot
		#[arg(long)]
		force: bool,
	},
	/// Manage function bodies
	Function {
		#[command(subcommand)]
		action: FunctionAction,
	},
	/// Read or write tags at an address
	///
	/// VALUE is parsed as JSON; anything that is not valid JSON is stored as text.
	Tag {
		ea: Ea,
		key: Option<String>,
		value: Option<String>,
		/// Operate on the tags of the function containing EA
		#[arg(long, short = 'f')]
		function: bool,
	},
	/// Remove a tag
	Untag {
		ea: Ea,
		key: String,
		/// Operate on the tags of the function containing EA
		#[arg(long, short = 'f')]
		function: bool,
	},
	/// Remove every tag at an address and clear its color
	Erase { ea: Ea },
	/// List tag names and how many locations use each
	Names {
		/// List names used inside function bodies
		#[arg(long)]
		contents: bool,
	},
	/// Select global locations and functions by tag
	Select(QueryArgs),
	/// Select locations inside function bodies by tag name
	SelectContents(QueryArgs),
	/// Select functions by the tag names used in their bodies
	SelectFunctions(QueryArgs),
	/// Read or change the extra comment lines around an item
	Extra {
		ea: Ea,
		side: Side,
		/// Replace the block with this text
		text: Option<String>,
		/// Remove the block
		#[arg(long, conflicts_with_all = ["text", "insert", "append"])]
		delete: bool,
		/// Add blank lines at the top of the block (negative removes them)
		#[arg(long, allow_negative_numbers = true, conflicts_with_all = ["text", "append"])]
		insert: Option<i64>,
		/// Add blank lines at the bottom of the block (negative removes them)
		#[arg(long, allow_negative_numbers = true, conflicts_with = "text")]
		append: Option<i64>,
	},
	/// Report locations whose index entries disagree with their tags
	Audit,
	/// Rebuild both tag indices from the stored tags
	Rebuild,
}

/// Function subcommands.
#[derive(Subcommand, Debug)]
pub enum FunctionAction {
	/// Define a function body [START, END)
	Add { start: Ea, end: Ea },
	/// List function bodies
	List,
}

/// Which extra comment block.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
	Prefix,
	Suffix,
}

/// Tag names a selection requires or accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
	/// Require this tag (repeatable)
	#[arg(long = "and", value_name = "TAG")]
	pub and: Vec<String>,
	/// Accept this tag (repeatable)
	#[arg(long = "or", value_name = "TAG")]
	pub or: Vec<String>,
}
