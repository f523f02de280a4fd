//! Dot-address parsing.
//!
//! An address is either a bare member name (`"double"`) or a
//! `namespace.property` pair (`"counter.n"`). What the property selects is
//! decided by the resolver; the parser only splits and validates.

use std::fmt;

use crate::error::RegistryError;

/// Property selecting every key of a table (`ns.*`).
pub const WILDCARD: &str = "*";

/// A parsed address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address<'a> {
	/// A member name searched across all modals in declaration order.
	Bare(&'a str),
	/// A property on one namespace.
	Namespaced { namespace: &'a str, property: &'a str },
}

impl<'a> Address<'a> {
	/// Splits `src` on `.` into one or two non-empty segments.
	pub fn parse(src: &'a str) -> Result<Self, RegistryError> {
		let mut parts = src.split('.');
		let first = parts.next().unwrap_or_default();
		let second = parts.next();

		if parts.next().is_some() {
			return Err(RegistryError::invalid_address(src, "more than one '.'"));
		}

		match second {
			_ if first.is_empty() => Err(RegistryError::invalid_address(src, "empty namespace or name")),
			None => Ok(Self::Bare(first)),
			Some("") => Err(RegistryError::invalid_address(src, "empty property")),
			Some(property) => Ok(Self::Namespaced {
				namespace: first,
				property,
			}),
		}
	}
}

impl fmt::Display for Address<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bare(name) => f.write_str(name),
			Self::Namespaced { namespace, property } => write!(f, "{namespace}.{property}"),
		}
	}
}
