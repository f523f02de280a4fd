//! Registry configuration.
//!
//! Format-neutral settings with a TOML loader. Every key is optional; an empty
//! document yields [`RegistryConfig::default`].
//!
//! ```toml
//! default_namespace = "app"
//! tie_break = "reject"
//! strict_names = true
//! scoped_reducers = false
//! ```

use serde::Deserialize;

use crate::error::ConfigError;

/// Namespace given to modal specs that do not name one.
pub const DEFAULT_NAMESPACE: &str = "none";

/// How equal-priority candidates for the same output name are settled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
	/// Keep the candidate that was collected first; drop the rest.
	#[default]
	FirstWins,
	/// Fail the binding with [`crate::RegistryError::AmbiguousName`].
	Reject,
}

/// Settings applied to a [`crate::Registry`] for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Namespace used by specs declared without one.
	pub default_namespace: String,
	/// Equal-priority collision policy for bind-time resolution.
	pub tie_break: TieBreak,
	/// Reject getter or action names already declared by another modal.
	pub strict_names: bool,
	/// Synthesized reducers ignore messages whose namespace segment differs.
	pub scoped_reducers: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			default_namespace: DEFAULT_NAMESPACE.to_string(),
			tie_break: TieBreak::default(),
			strict_names: false,
			scoped_reducers: false,
		}
	}
}

impl RegistryConfig {
	/// Parses a TOML document and validates the result.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(src)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks values that deserialize fine but cannot be used.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !is_valid_namespace(&self.default_namespace) {
			return Err(ConfigError::InvalidNamespace(self.default_namespace.clone()));
		}
		Ok(())
	}
}

/// Returns true if `ns` can be used both as an address root and a type-tag prefix.
pub(crate) fn is_valid_namespace(ns: &str) -> bool {
	!ns.is_empty() && !ns.contains(['.', '/'])
}
