//! Per-namespace reducer synthesized from a modal's reducer table.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::message::Message;
use crate::modal::Modal;

/// Synthesized reducers keyed by namespace, in declaration order.
pub type ReducerMap = IndexMap<String, SynthesizedReducer>;

/// Single reducer handed to the external store constructor for one namespace.
#[derive(Clone, Debug)]
pub struct SynthesizedReducer {
	modal: Arc<Modal>,
	scoped: bool,
}

impl SynthesizedReducer {
	pub(crate) fn new(modal: Arc<Modal>, scoped: bool) -> Self {
		Self { modal, scoped }
	}

	pub fn namespace(&self) -> &str {
		self.modal.namespace()
	}

	pub fn initial_state(&self) -> &Value {
		self.modal.initial_state()
	}

	/// Applies `message` to `state`, starting from the initial state when `None`.
	///
	/// The reducer is picked by the second segment of the message type. Unknown
	/// names leave the state unchanged: messages meant for other modals pass
	/// through every reducer.
	pub fn reduce(&self, state: Option<Value>, message: &Message) -> Value {
		let state = state.unwrap_or_else(|| self.modal.initial_state().clone());

		if self.scoped && message.namespace() != self.modal.namespace() {
			return state;
		}

		let Some(reducer) = message.reducer().and_then(|name| self.modal.reducer(name)) else {
			tracing::trace!(
				namespace = self.modal.namespace(),
				kind = %message.kind,
				"message ignored by reducer",
			);
			return state;
		};

		reducer(&state, &message.payload)
	}
}
