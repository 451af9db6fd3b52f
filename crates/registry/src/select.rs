//! Deterministic weighted-random selection.
//!
//! # Role
//!
//! Picks one candidate with probability proportional to its weight, drawing a
//! single value from a named [`RandomStreams`] sequence.
//!
//! # Invariants
//!
//! - Candidates are walked in the order the caller yields them. Callers pass a
//!   fixed order (registry enumeration order, or declaration order), never hash
//!   iteration order, so peers consuming the same stream agree on the result.
//! - Exactly one draw is consumed per successful selection, none otherwise.
//! - Negative, NaN and infinite weights count as zero.

use tessera_random::{RandSync, RandomStreams};

#[cfg(test)]
mod tests;

/// Result of a weighted selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome<T> {
	Selected(T),
	/// There was nothing to choose from.
	EmptyCandidateSet,
	/// Every candidate had zero weight.
	ZeroTotalWeight,
}

impl<T> SelectOutcome<T> {
	pub fn into_option(self) -> Option<T> {
		match self {
			Self::Selected(value) => Some(value),
			Self::EmptyCandidateSet | Self::ZeroTotalWeight => None,
		}
	}

	pub fn is_selected(&self) -> bool {
		matches!(self, Self::Selected(_))
	}
}

#[inline]
fn sanitize(weight: f64) -> f64 {
	if weight.is_finite() && weight > 0.0 { weight } else { 0.0 }
}

/// Selects one candidate by cumulative weight.
pub fn select_weighted_outcome<I, T, F, R>(candidates: I, mut weight: F, streams: &mut R, stream: RandSync) -> SelectOutcome<T>
where
	I: IntoIterator<Item = T>,
	F: FnMut(&T) -> f64,
	R: RandomStreams + ?Sized,
{
	let weighted: Vec<(T, f64)> = candidates
		.into_iter()
		.map(|c| {
			let w = sanitize(weight(&c));
			(c, w)
		})
		.collect();
	if weighted.is_empty() {
		return SelectOutcome::EmptyCandidateSet;
	}

	let total: f64 = weighted.iter().map(|(_, w)| w).sum();
	if !(total > 0.0 && total.is_finite()) {
		return SelectOutcome::ZeroTotalWeight;
	}

	let draw = streams.next_unit(stream) * total;
	let mut cumulative = 0.0;
	let mut last_positive = None;
	for (candidate, w) in weighted {
		if w <= 0.0 {
			continue;
		}
		cumulative += w;
		if draw < cumulative {
			return SelectOutcome::Selected(candidate);
		}
		last_positive = Some(candidate);
	}

	// Rounding can leave `draw` a hair above the final cumulative sum.
	match last_positive {
		Some(candidate) => SelectOutcome::Selected(candidate),
		None => SelectOutcome::ZeroTotalWeight,
	}
}

/// Selects one candidate by cumulative weight, or `None` when nothing can be drawn.
pub fn select_weighted<I, T, F, R>(candidates: I, weight: F, streams: &mut R, stream: RandSync) -> Option<T>
where
	I: IntoIterator<Item = T>,
	F: FnMut(&T) -> f64,
	R: RandomStreams + ?Sized,
{
	match select_weighted_outcome(candidates, weight, streams, stream) {
		SelectOutcome::Selected(value) => Some(value),
		SelectOutcome::EmptyCandidateSet => {
			tracing::debug!(stream = %stream, "weighted selection over an empty candidate set");
			None
		}
		SelectOutcome::ZeroTotalWeight => {
			tracing::debug!(stream = %stream, "weighted selection with zero total weight");
			None
		}
	}
}
