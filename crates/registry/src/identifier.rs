//! Case-insensitive prefab identifiers.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// Spelling that content authors use to mean "no such prefab".
const NOT_FOUND: &str = "notfound";

/// Canonical key naming a prefab.
///
/// Construction trims surrounding whitespace and lowercases the value; equality,
/// ordering and hashing use the normalized form only. The author's spelling is
/// kept for display.
#[derive(Clone)]
pub struct Identifier {
	key: Arc<str>,
	original: Arc<str>,
}

impl Identifier {
	/// Normalizes `value` into an identifier.
	pub fn new(value: &str) -> Self {
		let trimmed = value.trim();
		// Titlecase letters are not uppercase but still lowercase to something else.
		let key: Arc<str> = if trimmed.is_ascii() && !trimmed.bytes().any(|b| b.is_ascii_uppercase()) {
			Arc::from(trimmed)
		} else {
			Arc::from(trimmed.to_lowercase())
		};
		let original = if &*key == trimmed { key.clone() } else { Arc::from(trimmed) };
		Self { key, original }
	}

	/// The unresolved sentinel.
	pub fn empty() -> Self {
		Self::new("")
	}

	/// Normalized form used for comparison.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.key
	}

	/// Spelling as written by the author, trimmed.
	#[inline]
	pub fn original(&self) -> &str {
		&self.original
	}

	/// Returns true for the empty and `"notfound"` sentinels.
	pub fn is_empty(&self) -> bool {
		self.key.is_empty() || &*self.key == NOT_FOUND
	}

	/// Compares against an unnormalized string without allocating for ASCII input.
	pub fn matches(&self, other: &str) -> bool {
		let other = other.trim();
		if other.is_ascii() {
			self.key.eq_ignore_ascii_case(other)
		} else {
			*self.key == *other.to_lowercase()
		}
	}
}

impl Default for Identifier {
	fn default() -> Self {
		Self::empty()
	}
}

impl PartialEq for Identifier {
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for Identifier {}

impl Hash for Identifier {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

impl PartialOrd for Identifier {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Identifier {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.key.cmp(&other.key)
	}
}

impl Borrow<str> for Identifier {
	fn borrow(&self) -> &str {
		&self.key
	}
}

impl From<&str> for Identifier {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for Identifier {
	fn from(value: String) -> Self {
		Self::new(&value)
	}
}

impl From<&String> for Identifier {
	fn from(value: &String) -> Self {
		Self::new(value)
	}
}

impl std::fmt::Debug for Identifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Identifier({:?})", &*self.original)
	}
}

impl std::fmt::Display for Identifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.original)
	}
}
