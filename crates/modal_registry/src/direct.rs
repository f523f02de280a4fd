//! Ad-hoc reads and writes against the attached store.

use std::sync::Arc;

use serde_json::Value;

use crate::address::{Address, WILDCARD};
use crate::dispatch::BoundAction;
use crate::error::RegistryError;
use crate::message::Dispatch;
use crate::registry::Registry;
use crate::resolve::actions::{ACTIONS_TABLE, ActionBinding};
use crate::resolve::getters::{Accessor, GETTERS_TABLE};

impl Registry {
	/// Reads one getter or state property from the attached store.
	///
	/// Fails with [`RegistryError::StoreNotInitialized`] before any name
	/// lookup when no store is attached; only malformed addresses are
	/// reported ahead of it.
	///
	/// `name` resolves to the first modal in declaration order declaring
	/// getter `name`. `ns.name` resolves to getter `name` on `ns` when
	/// declared, otherwise to the raw property `state[ns][name]`.
	pub fn read_getter(&self, address: &str) -> Result<Value, RegistryError> {
		let parsed = parse_direct(address)?;
		let store = self.store()?;

		let accessor = match parsed {
			Address::Bare(name) => {
				let (modal, getter) = self
					.find_getter(name)
					.ok_or_else(|| RegistryError::UnknownGetter(name.to_string()))?;
				Accessor::declared(modal, getter)
			}
			Address::Namespaced { namespace, property } => match self.modal(namespace) {
				Some(modal) => match modal.getter(property) {
					Some(getter) => Accessor::declared(modal, getter),
					None => Accessor::property(&modal.namespace, property),
				},
				None => Accessor::property(&Arc::from(namespace), property),
			},
		};

		Ok(accessor.read(&store.get_state()))
	}

	/// Returns a callable that dispatches into the attached store.
	///
	/// `name` resolves to the first modal declaring action `name`. `ns.name`
	/// resolves to action `name` on `ns` when declared, otherwise to a direct
	/// `ns/name` reducer dispatch.
	pub fn write_action(&self, address: &str) -> Result<BoundAction, RegistryError> {
		let parsed = parse_direct(address)?;
		let store = self.store()?;

		let binding = match parsed {
			Address::Bare(name) => {
				let (modal, action) = self
					.find_action(name)
					.ok_or_else(|| RegistryError::UnknownAction(name.to_string()))?;
				ActionBinding::declared(&modal.namespace, name, action)
			}
			Address::Namespaced { namespace, property } => match self.modal(namespace) {
				Some(modal) => match modal.action(property) {
					Some(action) => ActionBinding::declared(&modal.namespace, property, action),
					None => ActionBinding::reducer(&modal.namespace, property),
				},
				None => ActionBinding::reducer(&Arc::from(namespace), property),
			},
		};

		Ok(binding.bind(&Dispatch::from_store(store)))
	}
}

/// Parses an address for direct access, where table expansions have no
/// single value to return.
fn parse_direct(address: &str) -> Result<Address<'_>, RegistryError> {
	let parsed = Address::parse(address)?;
	if matches!(
		parsed,
		Address::Namespaced {
			property: GETTERS_TABLE | ACTIONS_TABLE | WILDCARD,
			..
		}
	) {
		return Err(RegistryError::invalid_address(address, "table expansions need a binding"));
	}
	Ok(parsed)
}
