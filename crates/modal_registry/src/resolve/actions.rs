//! Action resolution and the dispatch projection.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{Candidates, Collision, DECLARED_PRIORITY, EntryKind, SYNTHESIZED_PRIORITY, fold};
use crate::address::{Address, WILDCARD};
use crate::dispatch::{BoundAction, passthrough, wrap};
use crate::error::RegistryError;
use crate::message::Dispatch;
use crate::modal::ActionFn;
use crate::registry::Registry;

/// Property that expands to every declared action of a namespace.
pub const ACTIONS_TABLE: &str = "actions";

/// An action waiting for a dispatch handle.
#[derive(Clone)]
pub(crate) struct ActionBinding {
	namespace: Arc<str>,
	reducer: Arc<str>,
	action: ActionFn,
}

impl ActionBinding {
	pub(crate) fn declared(namespace: &Arc<str>, name: &str, action: &ActionFn) -> Self {
		Self {
			namespace: namespace.clone(),
			reducer: name.into(),
			action: action.clone(),
		}
	}

	pub(crate) fn reducer(namespace: &Arc<str>, reducer: &str) -> Self {
		Self {
			namespace: namespace.clone(),
			reducer: reducer.into(),
			action: passthrough(),
		}
	}

	pub(crate) fn bind(&self, dispatch: &Dispatch) -> BoundAction {
		wrap(
			dispatch.clone(),
			self.action.clone(),
			self.namespace.clone(),
			self.reducer.clone(),
		)
	}
}

impl fmt::Debug for ActionBinding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ActionBinding")
			.field("namespace", &self.namespace)
			.field("reducer", &self.reducer)
			.finish_non_exhaustive()
	}
}

/// Dispatch half of a binding: turns a dispatch handle into named callables.
#[derive(Debug, Clone)]
pub struct ActionProjection {
	bindings: IndexMap<String, ActionBinding>,
	collisions: Vec<Collision>,
}

impl ActionProjection {
	/// Wraps every surviving action around `dispatch`.
	pub fn bind(&self, dispatch: &Dispatch) -> IndexMap<String, BoundAction> {
		self.bindings
			.iter()
			.map(|(name, binding)| (name.clone(), binding.bind(dispatch)))
			.collect()
	}

	/// Output names, in the order they were first claimed.
	pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
		self.bindings.keys().map(String::as_str)
	}

	/// Candidates dropped while resolving.
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}

	pub fn len(&self) -> usize {
		self.bindings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bindings.is_empty()
	}
}

pub(crate) fn resolve<S: AsRef<str>>(registry: &Registry, addresses: &[S]) -> Result<ActionProjection, RegistryError> {
	let mut candidates = Candidates::new();

	for src in addresses {
		match Address::parse(src.as_ref())? {
			Address::Bare(name) => {
				let (modal, action) = registry
					.find_action(name)
					.ok_or_else(|| RegistryError::UnknownAction(name.to_string()))?;
				candidates.push(
					name,
					ActionBinding::declared(&modal.namespace, name, action),
					EntryKind::Action,
					&modal.namespace,
					DECLARED_PRIORITY,
				);
			}
			Address::Namespaced {
				namespace,
				property: ACTIONS_TABLE,
			} => {
				let modal = registry.require_modal(namespace)?;
				for (name, action) in &modal.actions {
					candidates.push(
						name.as_str(),
						ActionBinding::declared(&modal.namespace, name, action),
						EntryKind::Action,
						&modal.namespace,
						DECLARED_PRIORITY,
					);
				}
			}
			Address::Namespaced {
				namespace,
				property: WILDCARD,
			} => {
				let modal = registry.require_modal(namespace)?;
				for name in modal.reducer_names() {
					candidates.push(
						name,
						ActionBinding::reducer(&modal.namespace, name),
						EntryKind::Reducer,
						&modal.namespace,
						SYNTHESIZED_PRIORITY,
					);
				}
			}
			Address::Namespaced { namespace, property } => {
				let namespace: Arc<str> = registry
					.modal(namespace)
					.map_or_else(|| namespace.into(), |m| m.namespace.clone());
				candidates.push(
					property,
					ActionBinding::reducer(&namespace, property),
					EntryKind::Reducer,
					&namespace,
					SYNTHESIZED_PRIORITY,
				);
			}
		}
	}

	let (winners, collisions) = fold("actions", candidates.into_vec(), registry.config().tie_break)?;
	Ok(ActionProjection {
		bindings: winners
			.into_iter()
			.map(|(name, entry)| (name, entry.producer))
			.collect(),
		collisions,
	})
}
