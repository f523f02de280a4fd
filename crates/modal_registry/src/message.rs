//! The mutation wire unit and the handles that carry it to a store.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Store;

/// Separator between the namespace and reducer segments of a type tag.
pub const TYPE_SEPARATOR: char = '/';

/// The only unit ever sent to a store's mutation channel.
///
/// Serializes as `{ "type": "<namespace>/<reducer>", "payload": <any> }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
	#[serde(rename = "type")]
	pub kind: String,
	pub payload: Value,
}

impl Message {
	/// Builds a message tagged `namespace/reducer`.
	pub fn new(namespace: &str, reducer: &str, payload: Value) -> Self {
		Self {
			kind: format!("{namespace}{TYPE_SEPARATOR}{reducer}"),
			payload,
		}
	}

	/// Returns the namespace segment of the type tag.
	pub fn namespace(&self) -> &str {
		self.kind
			.split(TYPE_SEPARATOR)
			.next()
			.unwrap_or_default()
	}

	/// Returns the second segment of the type tag, if any.
	///
	/// Anything past a second separator is ignored, so reducer names that
	/// themselves contain `/` cannot be addressed.
	pub fn reducer(&self) -> Option<&str> {
		self.kind.split(TYPE_SEPARATOR).nth(1)
	}
}

impl fmt::Display for Message {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}({})", self.kind, self.payload)
	}
}

/// Cloneable handle to a store's mutation channel.
///
/// This is the `dispatch` a binding adapter hands to
/// [`crate::ActionProjection::bind`].
#[derive(Clone)]
pub struct Dispatch(Arc<dyn Fn(Message) -> Value + Send + Sync>);

impl Dispatch {
	/// Wraps a plain dispatch function.
	pub fn new(f: impl Fn(Message) -> Value + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	/// Dispatches into `store`.
	pub fn from_store(store: Arc<dyn Store>) -> Self {
		Self::new(move |message| store.dispatch(message))
	}

	/// Sends one message and returns whatever the store returned.
	pub fn send(&self, message: Message) -> Value {
		tracing::trace!(kind = %message.kind, "dispatch");
		(self.0)(message)
	}
}

impl fmt::Debug for Dispatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatch").finish_non_exhaustive()
	}
}

/// Callback handed to a deferred action.
///
/// Each [`Commit::commit`] produces exactly one message in the owning
/// namespace. The handle can be cloned and moved to other threads or tasks,
/// and may be invoked any number of times, including never.
#[derive(Clone, Debug)]
pub struct Commit {
	namespace: Arc<str>,
	dispatch: Dispatch,
}

impl Commit {
	pub(crate) fn new(namespace: Arc<str>, dispatch: Dispatch) -> Self {
		Self { namespace, dispatch }
	}

	/// The namespace every committed message is tagged with.
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Dispatches `{ type: "<namespace>/<reducer>", payload }`.
	pub fn commit(&self, reducer: &str, payload: Value) -> Value {
		self.dispatch
			.send(Message::new(&self.namespace, reducer, payload))
	}
}
