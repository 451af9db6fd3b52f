use std::sync::Arc;

use crate::identifier::Identifier;
use crate::provenance::{ContentPath, Provenance};

/// Recoverable lookup and insertion failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	#[error("prefab has no identifier")]
	EmptyIdentifier,

	#[error("{registry}: no prefab with identifier \"{identifier}\"")]
	NotFound { registry: &'static str, identifier: Identifier },

	#[error("{registry}: prefab \"{identifier}\" is hidden by override file \"{file}\"")]
	OverriddenByFile {
		registry: &'static str,
		identifier: Identifier,
		file: ContentPath,
	},
}

/// A non-overriding definition collided with an existing active one.
///
/// The existing definition stays active; the rejected prefab is handed back so
/// the loader can report or dispose of it.
pub struct DuplicateIdentifier<T> {
	pub identifier: Identifier,
	pub rejected: Arc<T>,
	pub rejected_from: Provenance,
	pub existing_from: Provenance,
}

/// Reason an `add` did not change the registry.
pub enum AddError<T> {
	/// The prefab reported an empty or sentinel identifier.
	EmptyIdentifier { rejected: Arc<T> },
	Duplicate(DuplicateIdentifier<T>),
}

impl<T> AddError<T> {
	/// The prefab that was not inserted.
	pub fn rejected(&self) -> &Arc<T> {
		match self {
			Self::EmptyIdentifier { rejected } => rejected,
			Self::Duplicate(dup) => &dup.rejected,
		}
	}

	pub fn into_rejected(self) -> Arc<T> {
		match self {
			Self::EmptyIdentifier { rejected } => rejected,
			Self::Duplicate(dup) => dup.rejected,
		}
	}
}

impl<T> From<DuplicateIdentifier<T>> for AddError<T> {
	fn from(value: DuplicateIdentifier<T>) -> Self {
		Self::Duplicate(value)
	}
}

impl<T> std::fmt::Debug for DuplicateIdentifier<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DuplicateIdentifier")
			.field("identifier", &self.identifier)
			.field("rejected_from", &self.rejected_from)
			.field("existing_from", &self.existing_from)
			.finish()
	}
}

impl<T> std::fmt::Display for DuplicateIdentifier<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"duplicate identifier \"{}\": definition from {} rejected, keeping the one from {} (mark it as an override to replace it)",
			self.identifier, self.rejected_from, self.existing_from
		)
	}
}

impl<T> std::error::Error for DuplicateIdentifier<T> {}

impl<T> std::fmt::Debug for AddError<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::EmptyIdentifier { .. } => f.write_str("EmptyIdentifier"),
			Self::Duplicate(dup) => f.debug_tuple("Duplicate").field(dup).finish(),
		}
	}
}

impl<T> std::fmt::Display for AddError<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::EmptyIdentifier { .. } => write!(f, "{}", RegistryError::EmptyIdentifier),
			Self::Duplicate(dup) => write!(f, "{dup}"),
		}
	}
}

impl<T: 'static> std::error::Error for AddError<T> {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::EmptyIdentifier { .. } => None,
			Self::Duplicate(dup) => Some(dup),
		}
	}
}
