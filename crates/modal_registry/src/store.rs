//! Seam to the externally owned store.

use serde_json::Value;

use crate::message::Message;

/// A mutable state container owned outside this crate.
///
/// The registry only reads the root state tree and pushes messages into it;
/// subscription and change notification stay with the implementor.
pub trait Store: Send + Sync {
	/// Returns the current root state tree, keyed by namespace.
	fn get_state(&self) -> Value;

	/// Applies one message and returns the store's dispatch result.
	fn dispatch(&self, message: Message) -> Value;
}
