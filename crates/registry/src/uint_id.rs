//! Stable 32-bit identifiers for network messages.
//!
//! Peers refer to prefabs by a `u32` instead of the full identifier string. The
//! value is derived from a digest of the normalized identifier, so every peer
//! that loads the same content in the same order computes the same table.

use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};

use crate::identifier::Identifier;

/// Hashes a normalized identifier into its preferred network id.
pub fn hash_identifier(identifier: &Identifier) -> u32 {
	let digest = Sha256::digest(identifier.as_str().as_bytes());
	u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Bidirectional assignment of network ids within one registry.
#[derive(Debug, Default)]
pub(crate) struct UintIds {
	owners: FxHashMap<u32, Identifier>,
}

impl UintIds {
	/// Assigns an id to a newly registered identifier.
	///
	/// Collisions with a different identifier are resolved by probing upward;
	/// the result then depends on registration order, which is why it is logged.
	pub(crate) fn assign(&mut self, registry: &'static str, identifier: &Identifier) -> u32 {
		let mut id = hash_identifier(identifier);
		while let Some(owner) = self.owners.get(&id) {
			if owner == identifier {
				return id;
			}
			tracing::error!(
				registry,
				identifier = %identifier,
				collides_with = %owner,
				uint_id = id,
				"hash collision when generating network id"
			);
			id = id.wrapping_add(1);
		}
		self.owners.insert(id, identifier.clone());
		id
	}

	pub(crate) fn release(&mut self, id: u32) {
		self.owners.remove(&id);
	}

	pub(crate) fn owner(&self, id: u32) -> Option<&Identifier> {
		self.owners.get(&id)
	}

	pub(crate) fn clear(&mut self) {
		self.owners.clear();
	}
}
