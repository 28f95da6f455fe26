//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use marginalia_host::MemoryDatabase;
use marginalia_primitives::Function;
use marginalia_tags::{TagConfig, TagDatabase};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Function body used by the fixtures.
pub const FUNCTION: (u64, u64) = (0x4000, 0x4100);

/// A database spanning `[0, 0x10000)` with one function.
pub fn open() -> TagDatabase<MemoryDatabase> {
	let mut host = MemoryDatabase::new(0u64, 0x10000u64);
	host.add_function(Function::new(FUNCTION.0, FUNCTION.1)).unwrap();
	TagDatabase::open(host, TagConfig::default())
}

/// One captured log event.
#[derive(Debug, Clone)]
pub struct Captured {
	pub level: Level,
	pub message: String,
	pub fields: Vec<(String, String)>,
}

impl Captured {
	pub fn field(&self, name: &str) -> Option<&str> {
		self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
	}
}

#[derive(Default)]
struct EventVisitor {
	message: String,
	fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
		let value = format!("{value:?}");
		if field.name() == "message" {
			self.message = value;
		} else {
			self.fields.push((field.name().to_string(), value));
		}
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.message = value.to_string();
		} else {
			self.fields.push((field.name().to_string(), value.to_string()));
		}
	}
}

/// A layer collecting every event into a shared buffer.
#[derive(Clone, Default)]
pub struct LogCapture {
	events: Arc<Mutex<Vec<Captured>>>,
}

impl LogCapture {
	/// Runs `f` with this capture installed as the thread's subscriber.
	pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
		let subscriber = tracing_subscriber::registry().with(self.clone());
		tracing::subscriber::with_default(subscriber, f)
	}

	pub fn events(&self) -> Vec<Captured> {
		self.events.lock().unwrap().clone()
	}

	/// Events at `level` whose message contains `needle`.
	pub fn matching(&self, level: Level, needle: &str) -> Vec<Captured> {
		self.events()
			.into_iter()
			.filter(|e| e.level == level && e.message.contains(needle))
			.collect()
	}
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for LogCapture {
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let mut visitor = EventVisitor::default();
		event.record(&mut visitor);
		self.events.lock().unwrap().push(Captured {
			level: *event.metadata().level(),
			message: visitor.message,
			fields: visitor.fields,
		});
	}
}
