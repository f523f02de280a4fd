//! Modal declarations and the callables they carry.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::message::Commit;

/// Derives a value from a modal's state slice.
pub type GetterFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Computes a mutation from call arguments.
pub type ActionFn = Arc<dyn Fn(Value) -> ActionResult + Send + Sync>;

/// Applies one named mutation: `(state, payload) -> new state`.
pub type ReducerFn = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

/// Insertion-ordered name table.
pub type Table<F> = IndexMap<String, F>;

/// What an action produced.
pub enum ActionResult {
	/// Payload to dispatch immediately under the action's own reducer name.
	Value(Value),
	/// Deferred sequence of commits, run once with a [`Commit`] handle.
	Deferred(Continuation),
}

impl ActionResult {
	/// Wraps a continuation closure.
	pub fn deferred(f: impl FnOnce(Commit) -> Value + Send + 'static) -> Self {
		Self::Deferred(Continuation(Box::new(f)))
	}
}

impl From<Value> for ActionResult {
	fn from(value: Value) -> Self {
		Self::Value(value)
	}
}

impl fmt::Debug for ActionResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
			Self::Deferred(_) => f.write_str("Deferred(..)"),
		}
	}
}

/// One-shot deferred dispatch sequence.
pub struct Continuation(Box<dyn FnOnce(Commit) -> Value + Send>);

impl Continuation {
	pub(crate) fn run(self, commit: Commit) -> Value {
		(self.0)(commit)
	}
}

/// Declaration input for one modal.
///
/// ```ignore
/// let spec = ModalSpec::new("counter")
///     .state(json!({ "n": 0 }))
///     .getter("double", |s| json!(s["n"].as_i64().unwrap_or(0) * 2))
///     .reducer("inc", |s, p| json!({ "n": s["n"].as_i64().unwrap_or(0) + p.as_i64().unwrap_or(0) }));
/// ```
#[derive(Default)]
pub struct ModalSpec {
	pub(crate) namespace: Option<String>,
	pub(crate) state: Option<Value>,
	pub(crate) getters: Table<GetterFn>,
	pub(crate) actions: Table<ActionFn>,
	pub(crate) reducers: Table<ReducerFn>,
}

impl ModalSpec {
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: Some(namespace.into()),
			..Self::default()
		}
	}

	/// Sets the initial state. Defaults to an empty object.
	pub fn state(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}

	pub fn getter(
		mut self,
		name: impl Into<String>,
		f: impl Fn(&Value) -> Value + Send + Sync + 'static,
	) -> Self {
		self.getters.insert(name.into(), Arc::new(f));
		self
	}

	pub fn action(
		mut self,
		name: impl Into<String>,
		f: impl Fn(Value) -> ActionResult + Send + Sync + 'static,
	) -> Self {
		self.actions.insert(name.into(), Arc::new(f));
		self
	}

	pub fn reducer(
		mut self,
		name: impl Into<String>,
		f: impl Fn(&Value, &Value) -> Value + Send + Sync + 'static,
	) -> Self {
		self.reducers.insert(name.into(), Arc::new(f));
		self
	}
}

impl fmt::Debug for ModalSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ModalSpec")
			.field("namespace", &self.namespace)
			.field("getters", &self.getters.keys().collect::<Vec<_>>())
			.field("actions", &self.actions.keys().collect::<Vec<_>>())
			.field("reducers", &self.reducers.keys().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

/// A registered modal. Immutable once stored in a [`crate::Registry`].
pub struct Modal {
	pub(crate) namespace: Arc<str>,
	pub(crate) initial_state: Value,
	pub(crate) getters: Table<GetterFn>,
	pub(crate) actions: Table<ActionFn>,
	pub(crate) reducers: Table<ReducerFn>,
}

impl Modal {
	pub(crate) fn from_spec(namespace: Arc<str>, spec: ModalSpec) -> Self {
		Self {
			namespace,
			initial_state: spec.state.unwrap_or_else(|| Value::Object(Map::new())),
			getters: spec.getters,
			actions: spec.actions,
			reducers: spec.reducers,
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn initial_state(&self) -> &Value {
		&self.initial_state
	}

	/// Keys of the initial state, in order. Empty unless the state is an object.
	pub fn state_keys(&self) -> impl Iterator<Item = &str> + '_ {
		self.initial_state
			.as_object()
			.into_iter()
			.flat_map(|map| map.keys().map(String::as_str))
	}

	pub fn getter_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.getters.keys().map(String::as_str)
	}

	pub fn action_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.actions.keys().map(String::as_str)
	}

	pub fn reducer_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.reducers.keys().map(String::as_str)
	}

	pub(crate) fn getter(&self, name: &str) -> Option<&GetterFn> {
		self.getters.get(name)
	}

	pub(crate) fn action(&self, name: &str) -> Option<&ActionFn> {
		self.actions.get(name)
	}

	pub(crate) fn reducer(&self, name: &str) -> Option<&ReducerFn> {
		self.reducers.get(name)
	}
}

impl fmt::Debug for Modal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Modal")
			.field("namespace", &self.namespace)
			.field("initial_state", &self.initial_state)
			.field("getters", &self.getters.keys().collect::<Vec<_>>())
			.field("actions", &self.actions.keys().collect::<Vec<_>>())
			.field("reducers", &self.reducers.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// `root[namespace]`, or null when absent.
pub(crate) fn slice_of<'a>(root: &'a Value, namespace: &str) -> &'a Value {
	root.get(namespace).unwrap_or(&Value::Null)
}
