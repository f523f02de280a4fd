//! Dispatch normalization.
//!
//! Actions return [`ActionResult`]. A bound action turns either variant into
//! store dispatches:
//!
//! - `Value(payload)`: one message `namespace/reducer`, dispatched
//!   immediately; the call returns the store's dispatch result.
//! - `Deferred(continuation)`: the continuation runs once with a [`Commit`]
//!   handle; every commit is one message; the call returns whatever the
//!   continuation returns.
//!
//! No ordering or completion tracking exists across pending continuations.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::message::{Commit, Dispatch, Message};
use crate::modal::{ActionFn, ActionResult};

/// Action that dispatches its arguments unchanged as the payload.
pub(crate) fn passthrough() -> ActionFn {
	Arc::new(ActionResult::Value)
}

/// Binds `action` to `dispatch` under `namespace`, with `reducer` as the
/// type-tag suffix for synchronous results.
pub fn wrap(dispatch: Dispatch, action: ActionFn, namespace: Arc<str>, reducer: impl Into<Arc<str>>) -> BoundAction {
	BoundAction {
		dispatch,
		action,
		namespace,
		reducer: reducer.into(),
	}
}

/// An action ready to call.
#[derive(Clone)]
pub struct BoundAction {
	dispatch: Dispatch,
	action: ActionFn,
	namespace: Arc<str>,
	reducer: Arc<str>,
}

impl BoundAction {
	/// Runs the action with `args` and dispatches its result.
	pub fn call(&self, args: Value) -> Value {
		match (self.action)(args) {
			ActionResult::Value(payload) => self
				.dispatch
				.send(Message::new(&self.namespace, &self.reducer, payload)),
			ActionResult::Deferred(continuation) => {
				tracing::trace!(
					namespace = %self.namespace,
					action = %self.reducer,
					"running deferred action",
				);
				continuation.run(Commit::new(self.namespace.clone(), self.dispatch.clone()))
			}
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	/// Reducer name used for synchronous results.
	pub fn reducer(&self) -> &str {
		&self.reducer
	}
}

impl fmt::Debug for BoundAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BoundAction")
			.field("namespace", &self.namespace)
			.field("reducer", &self.reducer)
			.finish_non_exhaustive()
	}
}
