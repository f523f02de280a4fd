//! The modal registry.
//!
//! # Lifecycle
//!
//! 1. **Declaration:** the composition root calls [`Registry::declare`] one or
//!    more times during startup and hands the returned reducers to the store
//!    constructor.
//! 2. **Attachment:** [`Registry::attach_store`] records the live store used
//!    by the direct accessors.
//! 3. **Resolution:** binding adapters call [`Registry::resolve_getters`],
//!    [`Registry::resolve_actions`] or [`Registry::connect`]. The registry is
//!    read-only from here on and can be shared behind an `Arc`.
//!
//! # Invariants
//!
//! - A namespace is declared at most once per registry.
//! - Declaration is all-or-nothing per batch: a failing batch leaves the
//!   registry unchanged.
//! - Modal tables never change after registration.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use crate::config::{RegistryConfig, is_valid_namespace};
use crate::error::RegistryError;
use crate::modal::{ActionFn, GetterFn, Modal, ModalSpec};
use crate::reducer::{ReducerMap, SynthesizedReducer};
use crate::resolve::{self, ActionProjection, Connection, StateProjection};
use crate::store::Store;


/// Table of declared modals keyed by namespace.
pub struct Registry {
	config: RegistryConfig,
	namespaces: Vec<Arc<str>>,
	modals: HashMap<Arc<str>, Arc<Modal>>,
	store: RwLock<Option<Arc<dyn Store>>>,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl Registry {
	/// Creates an empty registry with default configuration.
	pub fn new() -> Self {
		Self::with_config(RegistryConfig::default())
	}

	/// Creates an empty registry with the given configuration.
	pub fn with_config(config: RegistryConfig) -> Self {
		Self {
			config,
			namespaces: Vec::new(),
			modals: HashMap::default(),
			store: RwLock::new(None),
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Declares a batch of modals and returns one synthesized reducer per namespace.
	///
	/// Specs without a namespace are registered under the configured default
	/// namespace. The whole batch is validated before anything is committed.
	pub fn declare(
		&mut self,
		specs: impl IntoIterator<Item = ModalSpec>,
	) -> Result<ReducerMap, RegistryError> {
		let mut staged: Vec<Arc<Modal>> = Vec::new();

		for mut spec in specs {
			let namespace = spec
				.namespace
				.take()
				.unwrap_or_else(|| self.config.default_namespace.clone());

			if !is_valid_namespace(&namespace) {
				return Err(RegistryError::InvalidNamespace(namespace));
			}
			if self.modals.contains_key(namespace.as_str())
				|| staged.iter().any(|m| m.namespace() == namespace)
			{
				return Err(RegistryError::DuplicateNamespace(namespace));
			}

			let modal = Modal::from_spec(namespace.into(), spec);
			if self.config.strict_names {
				self.check_flat_names(&staged, &modal)?;
			}
			staged.push(Arc::new(modal));
		}

		let mut reducers = ReducerMap::with_capacity(staged.len());
		for modal in staged {
			tracing::debug!(
				namespace = modal.namespace(),
				getters = modal.getters.len(),
				actions = modal.actions.len(),
				reducers = modal.reducers.len(),
				"modal declared",
			);
			reducers.insert(
				modal.namespace().to_string(),
				SynthesizedReducer::new(modal.clone(), self.config.scoped_reducers),
			);
			self.namespaces.push(modal.namespace.clone());
			self.modals.insert(modal.namespace.clone(), modal);
		}

		Ok(reducers)
	}

	/// Legacy flat-registry check: getter and action names must be unique
	/// across every modal, not just within one.
	fn check_flat_names(&self, staged: &[Arc<Modal>], incoming: &Modal) -> Result<(), RegistryError> {
		let earlier = || self.modals_in_order().chain(staged.iter());

		for name in incoming.getter_names() {
			if let Some(existing) = earlier().find(|m| m.getter(name).is_some()) {
				return Err(RegistryError::DuplicateGetter {
					name: name.to_string(),
					existing: existing.namespace().to_string(),
					incoming: incoming.namespace().to_string(),
				});
			}
		}
		for name in incoming.action_names() {
			if let Some(existing) = earlier().find(|m| m.action(name).is_some()) {
				return Err(RegistryError::DuplicateAction {
					name: name.to_string(),
					existing: existing.namespace().to_string(),
					incoming: incoming.namespace().to_string(),
				});
			}
		}
		Ok(())
	}

	/// Records the store used by [`Registry::read_getter`] and
	/// [`Registry::write_action`]. Later calls replace it.
	pub fn attach_store(&self, store: Arc<dyn Store>) {
		if self.store.write().replace(store).is_some() {
			tracing::debug!("store replaced");
		}
	}

	pub(crate) fn store(&self) -> Result<Arc<dyn Store>, RegistryError> {
		self.store
			.read()
			.clone()
			.ok_or(RegistryError::StoreNotInitialized)
	}

	/// Declared namespaces, in declaration order.
	pub fn namespaces(&self) -> &[Arc<str>] {
		&self.namespaces
	}

	pub fn modal(&self, namespace: &str) -> Option<&Arc<Modal>> {
		self.modals.get(namespace)
	}

	pub(crate) fn require_modal(&self, namespace: &str) -> Result<&Arc<Modal>, RegistryError> {
		self.modal(namespace)
			.ok_or_else(|| RegistryError::UnknownNamespace(namespace.to_string()))
	}

	/// Declared modals, in declaration order.
	pub fn modals_in_order(&self) -> impl Iterator<Item = &Arc<Modal>> + '_ {
		self.namespaces.iter().filter_map(|ns| self.modals.get(ns))
	}

	/// First modal in declaration order that declares getter `name`.
	pub(crate) fn find_getter(&self, name: &str) -> Option<(&Arc<Modal>, &GetterFn)> {
		self.modals_in_order()
			.find_map(|m| m.getter(name).map(|g| (m, g)))
	}

	/// First modal in declaration order that declares action `name`.
	pub(crate) fn find_action(&self, name: &str) -> Option<(&Arc<Modal>, &ActionFn)> {
		self.modals_in_order()
			.find_map(|m| m.action(name).map(|a| (m, a)))
	}

	/// Resolves getter addresses into a state projection.
	pub fn resolve_getters<S: AsRef<str>>(&self, addresses: &[S]) -> Result<StateProjection, RegistryError> {
		resolve::getters::resolve(self, addresses)
	}

	/// Resolves action addresses into a dispatch projection.
	pub fn resolve_actions<S: AsRef<str>>(&self, addresses: &[S]) -> Result<ActionProjection, RegistryError> {
		resolve::actions::resolve(self, addresses)
	}

	/// Resolves both binding halves at once.
	pub fn connect<G: AsRef<str>, A: AsRef<str>>(
		&self,
		getters: &[G],
		actions: &[A],
	) -> Result<Connection, RegistryError> {
		Ok(Connection {
			state: self.resolve_getters(getters)?,
			actions: self.resolve_actions(actions)?,
		})
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry")
			.field("config", &self.config)
			.field("namespaces", &self.namespaces)
			.field("store_attached", &self.store.read().is_some())
			.finish()
	}
}
