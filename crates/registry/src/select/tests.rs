use proptest::prelude::*;
use tessera_random::{RandSync, ScriptedStreams, SeededStreams};

use super::*;

#[test]
fn draw_at_ninety_percent_picks_heavier_second_candidate() {
	let mut streams = ScriptedStreams::new([0.9]);
	let picked = select_weighted(["light", "heavy"], |c| if *c == "light" { 1.0 } else { 3.0 }, &mut streams, RandSync::ServerAndClient);
	assert_eq!(picked, Some("heavy"));
	assert_eq!(streams.consumed(), 1);
}

#[test]
fn low_draw_picks_first_candidate() {
	let mut streams = ScriptedStreams::new([0.2]);
	let weights = [1.0, 3.0];
	let picked = select_weighted(0..2usize, |i| weights[*i], &mut streams, RandSync::ServerAndClient);
	assert_eq!(picked, Some(0));
}

#[test]
fn empty_candidates_yield_none_without_drawing() {
	let mut streams = ScriptedStreams::new([0.5]);
	let outcome = select_weighted_outcome(Vec::<u8>::new(), |_| 1.0, &mut streams, RandSync::Unsynced);
	assert_eq!(outcome, SelectOutcome::EmptyCandidateSet);
	assert_eq!(streams.consumed(), 0);
}

#[test]
fn all_zero_weights_yield_none_without_drawing() {
	let mut streams = ScriptedStreams::new([0.5]);
	let outcome = select_weighted_outcome([1, 2], |_| 0.0, &mut streams, RandSync::Unsynced);
	assert_eq!(outcome, SelectOutcome::ZeroTotalWeight);
	assert_eq!(streams.consumed(), 0);
	assert_eq!(select_weighted([1, 2], |_| 0.0, &mut streams, RandSync::Unsynced), None);
}

#[test]
fn invalid_weights_count_as_zero() {
	let mut streams = ScriptedStreams::new([0.0, 0.999]);
	let weights = [f64::NAN, -4.0, 2.0, f64::INFINITY];
	let first = select_weighted(0..4usize, |i| weights[*i], &mut streams, RandSync::Server);
	let second = select_weighted(0..4usize, |i| weights[*i], &mut streams, RandSync::Server);
	assert_eq!(first, Some(2));
	assert_eq!(second, Some(2));
}

#[test]
fn zero_weight_candidate_is_never_selected_at_boundary() {
	// A draw landing exactly on a boundary belongs to the next positive candidate.
	let mut streams = ScriptedStreams::new([0.5]);
	let weights = [1.0, 0.0, 1.0];
	assert_eq!(select_weighted(0..3usize, |i| weights[*i], &mut streams, RandSync::Server), Some(2));
}

#[test]
fn two_peers_with_same_seed_agree() {
	let weights = [0.5, 2.0, 1.0, 4.0, 0.0, 3.5];
	let mut host = SeededStreams::new(99);
	let mut client = SeededStreams::new(99);
	for _ in 0..200 {
		let a = select_weighted(0..weights.len(), |i| weights[*i], &mut host, RandSync::ServerAndClient);
		let b = select_weighted(0..weights.len(), |i| weights[*i], &mut client, RandSync::ServerAndClient);
		assert_eq!(a, b);
		assert_ne!(a, Some(4));
	}
}

proptest! {
	#[test]
	fn selection_is_deterministic(seed in any::<u64>(), weights in prop::collection::vec(0.0f64..10.0, 1..16)) {
		let mut a = SeededStreams::new(seed);
		let mut b = SeededStreams::new(seed);
		let x = select_weighted(0..weights.len(), |i| weights[*i], &mut a, RandSync::ServerAndClient);
		let y = select_weighted(0..weights.len(), |i| weights[*i], &mut b, RandSync::ServerAndClient);
		prop_assert_eq!(x, y);
		if let Some(i) = x {
			prop_assert!(weights[i] > 0.0);
		}
	}

	#[test]
	fn positive_total_always_selects(unit in 0.0f64..1.0, weights in prop::collection::vec(0.001f64..10.0, 1..16)) {
		let mut streams = ScriptedStreams::new([unit]);
		let picked = select_weighted(0..weights.len(), |i| weights[*i], &mut streams, RandSync::Server);
		prop_assert!(picked.is_some());
	}
}
