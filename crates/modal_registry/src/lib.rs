//! Namespaced modal registry with collision-aware binding.
//!
//! Independently declared state modules ("modals") register getters,
//! actions and reducers under a namespace. Consumers ask for a subset of
//! them by short dot addresses and receive two plain projections: one from
//! the root state tree to named values, one from a dispatch handle to named
//! callables.
//!
//! # Addresses
//!
//! | Address | Getter resolution | Action resolution |
//! |---------|-------------------|-------------------|
//! | `name` | first modal declaring getter `name` (2) | first modal declaring action `name` (2) |
//! | `ns.getters` | every declared getter of `ns` (2) | dispatch `ns/getters` (1) |
//! | `ns.actions` | `state[ns].actions` (1) | every declared action of `ns` (2) |
//! | `ns.prop` | `state[ns][prop]` (1) | dispatch `ns/prop` with the arguments as payload (1) |
//! | `ns.*` | one accessor per initial-state key (1) | one dispatcher per reducer (1) |
//!
//! Parenthesized numbers are priorities. Higher priority wins a contested
//! output name; equal priority keeps the first candidate (see [`resolve`]).
//!
//! # Messages
//!
//! Every mutation reaches the store as [`Message`]
//! `{ "type": "<namespace>/<reducer>", "payload": ... }`. Actions return
//! [`ActionResult::Value`] for one immediate message or
//! [`ActionResult::Deferred`] to commit any number of messages later.

mod address;
pub mod config;
mod direct;
pub mod dispatch;
pub mod error;
mod message;
mod modal;
mod reducer;
mod registry;
pub mod resolve;
mod store;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use address::{Address, WILDCARD};
pub use config::{RegistryConfig, TieBreak};
pub use dispatch::{BoundAction, wrap};
pub use error::{ConfigError, RegistryError};
pub use message::{Commit, Dispatch, Message, TYPE_SEPARATOR};
pub use modal::{ActionFn, ActionResult, Continuation, GetterFn, Modal, ModalSpec, ReducerFn};
pub use reducer::{ReducerMap, SynthesizedReducer};
pub use registry::Registry;
pub use resolve::{
	Accessor, ActionProjection, Collision, Connection, DECLARED_PRIORITY, EntryKind, Party,
	Resolution, SYNTHESIZED_PRIORITY, StateProjection,
};
pub use store::Store;
