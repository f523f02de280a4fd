//! Getter resolution and the state projection.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use super::{Candidates, Collision, DECLARED_PRIORITY, EntryKind, SYNTHESIZED_PRIORITY, fold};
use crate::address::{Address, WILDCARD};
use crate::error::RegistryError;
use crate::modal::{GetterFn, Modal, slice_of};
use crate::registry::Registry;

/// Property that expands to every declared getter of a namespace.
pub const GETTERS_TABLE: &str = "getters";

/// Reads one value out of a root state tree.
#[derive(Clone)]
pub enum Accessor {
	/// Declared getter applied to its modal's slice.
	Getter { namespace: Arc<str>, getter: GetterFn },
	/// `root[namespace][property]`, read lazily; null when absent.
	Property { namespace: Arc<str>, property: String },
}

impl Accessor {
	pub(crate) fn declared(modal: &Modal, getter: &GetterFn) -> Self {
		Self::Getter {
			namespace: modal.namespace.clone(),
			getter: getter.clone(),
		}
	}

	pub(crate) fn property(namespace: &Arc<str>, property: &str) -> Self {
		Self::Property {
			namespace: namespace.clone(),
			property: property.to_string(),
		}
	}

	pub fn read(&self, root: &Value) -> Value {
		match self {
			Self::Getter { namespace, getter } => getter(slice_of(root, namespace)),
			Self::Property { namespace, property } => slice_of(root, namespace)
				.get(property)
				.cloned()
				.unwrap_or(Value::Null),
		}
	}
}

impl fmt::Debug for Accessor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Getter { namespace, .. } => f.debug_struct("Getter").field("namespace", namespace).finish_non_exhaustive(),
			Self::Property { namespace, property } => f
				.debug_struct("Property")
				.field("namespace", namespace)
				.field("property", property)
				.finish(),
		}
	}
}

/// State half of a binding: maps a root state tree to named values.
#[derive(Debug, Clone)]
pub struct StateProjection {
	accessors: IndexMap<String, Accessor>,
	collisions: Vec<Collision>,
}

impl StateProjection {
	/// Evaluates every accessor against `root`.
	pub fn project(&self, root: &Value) -> IndexMap<String, Value> {
		self.accessors
			.iter()
			.map(|(name, accessor)| (name.clone(), accessor.read(root)))
			.collect()
	}

	pub fn get(&self, name: &str) -> Option<&Accessor> {
		self.accessors.get(name)
	}

	/// Output names, in the order they were first claimed.
	pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
		self.accessors.keys().map(String::as_str)
	}

	/// Candidates dropped while resolving.
	pub fn collisions(&self) -> &[Collision] {
		&self.collisions
	}

	pub fn len(&self) -> usize {
		self.accessors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.accessors.is_empty()
	}
}

pub(crate) fn resolve<S: AsRef<str>>(registry: &Registry, addresses: &[S]) -> Result<StateProjection, RegistryError> {
	let mut candidates = Candidates::new();

	for src in addresses {
		match Address::parse(src.as_ref())? {
			Address::Bare(name) => {
				let (modal, getter) = registry
					.find_getter(name)
					.ok_or_else(|| RegistryError::UnknownGetter(name.to_string()))?;
				candidates.push(
					name,
					Accessor::declared(modal, getter),
					EntryKind::Getter,
					&modal.namespace,
					DECLARED_PRIORITY,
				);
			}
			Address::Namespaced {
				namespace,
				property: GETTERS_TABLE,
			} => {
				let modal = registry.require_modal(namespace)?;
				for (name, getter) in &modal.getters {
					candidates.push(
						name.as_str(),
						Accessor::declared(modal, getter),
						EntryKind::Getter,
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
				for key in modal.state_keys() {
					candidates.push(
						key,
						Accessor::property(&modal.namespace, key),
						EntryKind::Property,
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
					Accessor::property(&namespace, property),
					EntryKind::Property,
					&namespace,
					SYNTHESIZED_PRIORITY,
				);
			}
		}
	}

	let (winners, collisions) = fold("getters", candidates.into_vec(), registry.config().tie_break)?;
	Ok(StateProjection {
		accessors: winners
			.into_iter()
			.map(|(name, entry)| (name, entry.producer))
			.collect(),
		collisions,
	})
}
