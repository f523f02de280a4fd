//! Error types for declaration, resolution and direct access.

/// Errors raised while declaring modals or resolving addresses against them.
///
/// Every variant is a programming error detected at startup or bind time.
/// None of them are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A namespace was declared twice on the same registry.
	#[error("duplicate namespace: {0:?}")]
	DuplicateNamespace(String),

	/// A namespace that cannot be addressed: empty, or containing `.` or `/`.
	#[error("invalid namespace {0:?}: must be non-empty and contain no '.' or '/'")]
	InvalidNamespace(String),

	/// Two modals declare the same getter name while strict names are enabled.
	#[error("duplicate getter {name:?}: declared by {existing:?} and {incoming:?}")]
	DuplicateGetter {
		name: String,
		existing: String,
		incoming: String,
	},

	/// Two modals declare the same action name while strict names are enabled.
	#[error("duplicate action {name:?}: declared by {existing:?} and {incoming:?}")]
	DuplicateAction {
		name: String,
		existing: String,
		incoming: String,
	},

	/// A bare getter name matched no declared modal.
	#[error("unknown getter: {0:?}")]
	UnknownGetter(String),

	/// A bare action name matched no declared modal.
	#[error("unknown action: {0:?}")]
	UnknownAction(String),

	/// A table expansion (`ns.getters`, `ns.actions`, `ns.*`) named an undeclared modal.
	#[error("unknown namespace: {0:?}")]
	UnknownNamespace(String),

	/// The address string is not a bare name or a `namespace.name` pair.
	#[error("invalid address {address:?}: {reason}")]
	InvalidAddress { address: String, reason: &'static str },

	/// A direct accessor was used before a store was attached.
	#[error("no store attached; call Registry::attach_store first")]
	StoreNotInitialized,

	/// Two different sources claimed the same output name at equal priority
	/// under the `reject` tie policy.
	#[error("ambiguous name {name:?}: {existing} and {incoming} tie at priority {priority}")]
	AmbiguousName {
		name: String,
		existing: String,
		incoming: String,
		priority: i16,
	},
}

impl RegistryError {
	pub(crate) fn invalid_address(address: &str, reason: &'static str) -> Self {
		Self::InvalidAddress {
			address: address.to_string(),
			reason,
		}
	}
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// The TOML document could not be parsed or did not match the schema.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// The default namespace is unusable as an address root.
	#[error("invalid default namespace {0:?}: must be non-empty and contain no '.' or '/'")]
	InvalidNamespace(String),
}
