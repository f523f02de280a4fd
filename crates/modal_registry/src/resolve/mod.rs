//! Bind-time name resolution.
//!
//! # Mental Model
//!
//! 1. **Collection:** every address is parsed and expanded into candidate
//!    [`ResolvedEntry`] values, in address order. Expansions (`ns.getters`,
//!    `ns.*`) contribute in declaration order.
//! 2. **Fold:** candidates are folded into one entry per output name.
//! 3. **Projection:** the surviving producers become a [`StateProjection`] or
//!    an [`ActionProjection`]; the candidate list is discarded.
//!
//! # Precedence Contract
//!
//! 1. **Priority:** declared members ([`DECLARED_PRIORITY`]) beat synthesized
//!    property accessors and reducer dispatchers ([`SYNTHESIZED_PRIORITY`]).
//! 2. **Collection order:** on equal priority the earlier candidate wins,
//!    unless the registry's tie policy is [`TieBreak::Reject`].
//!
//! Candidates from the same namespace at the same priority are the same
//! member reached twice and merge silently under either policy.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::Value;

use crate::config::TieBreak;
use crate::dispatch::BoundAction;
use crate::error::RegistryError;
use crate::message::Dispatch;

pub(crate) mod actions;
pub(crate) mod getters;


pub use actions::{ACTIONS_TABLE, ActionProjection};
pub use getters::{Accessor, GETTERS_TABLE, StateProjection};

/// Priority of members a modal declares explicitly.
pub const DECLARED_PRIORITY: i16 = 2;

/// Priority of accessors and dispatchers synthesized from state or reducer keys.
pub const SYNTHESIZED_PRIORITY: i16 = 1;

/// What produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	/// Declared getter.
	Getter,
	/// Synthesized `state[ns][prop]` accessor.
	Property,
	/// Declared action.
	Action,
	/// Synthesized direct reducer dispatcher.
	Reducer,
}

impl fmt::Display for EntryKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Getter => write!(f, "getter"),
			Self::Property => write!(f, "property"),
			Self::Action => write!(f, "action"),
			Self::Reducer => write!(f, "reducer"),
		}
	}
}

/// Identity of a candidate, kept for collision diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
	pub kind: EntryKind,
	pub namespace: Arc<str>,
	pub priority: i16,
	/// Position in the candidate list.
	pub ordinal: usize,
}

impl Party {
	fn same_source(&self, other: &Party) -> bool {
		self.namespace == other.namespace && self.priority == other.priority
	}
}

impl fmt::Display for Party {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} in {:?}", self.kind, self.namespace)
	}
}

/// How a collision was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
	/// Existing entry kept; incoming dropped.
	KeptExisting,
	/// Existing entry replaced by a higher-priority incoming one.
	ReplacedExisting,
}

/// A candidate dropped during the fold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
	/// The contested output name.
	pub name: String,
	pub winner: Party,
	pub loser: Party,
	pub resolution: Resolution,
}

/// One candidate binding: an output name, its producer, and its rank.
pub struct ResolvedEntry<P> {
	pub name: String,
	pub producer: P,
	pub party: Party,
}

/// Accumulates candidates in collection order.
pub(crate) struct Candidates<P> {
	entries: Vec<ResolvedEntry<P>>,
}

impl<P> Candidates<P> {
	pub(crate) fn new() -> Self {
		Self { entries: Vec::new() }
	}

	pub(crate) fn push(
		&mut self,
		name: impl Into<String>,
		producer: P,
		kind: EntryKind,
		namespace: &Arc<str>,
		priority: i16,
	) {
		let ordinal = self.entries.len();
		self.entries.push(ResolvedEntry {
			name: name.into(),
			producer,
			party: Party {
				kind,
				namespace: namespace.clone(),
				priority,
				ordinal,
			},
		});
	}

	pub(crate) fn into_vec(self) -> Vec<ResolvedEntry<P>> {
		self.entries
	}
}

/// Folds candidates into one entry per name: max priority, then first wins.
///
/// Output order is the order in which each name was first claimed.
pub(crate) fn fold<P>(
	label: &'static str,
	candidates: Vec<ResolvedEntry<P>>,
	tie_break: TieBreak,
) -> Result<(IndexMap<String, ResolvedEntry<P>>, Vec<Collision>), RegistryError> {
	let mut winners: IndexMap<String, ResolvedEntry<P>> = IndexMap::with_capacity(candidates.len());
	let mut collisions = Vec::new();

	for incoming in candidates {
		let mut slot = match winners.entry(incoming.name.clone()) {
			Entry::Vacant(slot) => {
				slot.insert(incoming);
				continue;
			}
			Entry::Occupied(slot) => slot,
		};
		let existing = slot.get();

		if incoming.party.priority > existing.party.priority {
			collisions.push(Collision {
				name: incoming.name.clone(),
				winner: incoming.party.clone(),
				loser: existing.party.clone(),
				resolution: Resolution::ReplacedExisting,
			});
			slot.insert(incoming);
			continue;
		}

		if incoming.party.priority == existing.party.priority {
			if existing.party.same_source(&incoming.party) {
				continue;
			}
			if tie_break == TieBreak::Reject {
				tracing::warn!(
					registry = label,
					name = %incoming.name,
					existing = %existing.party,
					incoming = %incoming.party,
					"equal-priority collision rejected",
				);
				return Err(RegistryError::AmbiguousName {
					name: incoming.name,
					existing: existing.party.to_string(),
					incoming: incoming.party.to_string(),
					priority: incoming.party.priority,
				});
			}
		}

		collisions.push(Collision {
			name: incoming.name,
			winner: existing.party.clone(),
			loser: incoming.party,
			resolution: Resolution::KeptExisting,
		});
	}

	if !collisions.is_empty() {
		let samples: Vec<_> = collisions
			.iter()
			.take(5)
			.map(|c| format!("{}: {} over {}", c.name, c.winner, c.loser))
			.collect();
		tracing::debug!(registry = label, count = collisions.len(), ?samples, "binding collisions");
	}

	Ok((winners, collisions))
}

/// Both halves of a binding, produced by [`crate::Registry::connect`].
#[derive(Debug, Clone)]
pub struct Connection {
	pub state: StateProjection,
	pub actions: ActionProjection,
}

impl Connection {
	/// Evaluates the state half against a root state tree.
	pub fn project(&self, root: &Value) -> IndexMap<String, Value> {
		self.state.project(root)
	}

	/// Binds the action half to a dispatch handle.
	pub fn bind(&self, dispatch: &Dispatch) -> IndexMap<String, BoundAction> {
		self.actions.bind(dispatch)
	}
}
