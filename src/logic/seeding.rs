//! Participant seeding: order the confirmed list so consecutive pairs form round-1 matches.

use crate::models::{BracketError, Participant, SeedingStrategy, TournamentFormat};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashSet, VecDeque};

/// Seed participants using the thread RNG for the random strategy.
pub fn seed(
    participants: Vec<Participant>,
    strategy: SeedingStrategy,
    format: TournamentFormat,
) -> Result<Vec<Participant>, BracketError> {
    seed_with_rng(participants, strategy, format, &mut rand::thread_rng())
}

/// Seed participants with a caller-supplied RNG (only consumed by `Random`).
///
/// * `Rating`: stable sort by `seed_value` descending, then emit 1 vs N, 2 vs N-1, ...
///   so round-1 match k is seed k against seed N+1-k.
/// * `Random`: Fisher-Yates shuffle; consecutive pairs play each other.
///
/// `display_seed_index` is set to the 1-based rank (rating rank or draw position).
pub fn seed_with_rng<R: Rng + ?Sized>(
    mut participants: Vec<Participant>,
    strategy: SeedingStrategy,
    format: TournamentFormat,
    rng: &mut R,
) -> Result<Vec<Participant>, BracketError> {
    let needed = format.min_participants();
    if participants.len() < needed {
        return Err(BracketError::InsufficientParticipants {
            needed,
            got: participants.len(),
        });
    }
    let mut seen = HashSet::with_capacity(participants.len());
    for p in &participants {
        if !seen.insert(p.id) {
            return Err(BracketError::DuplicateParticipant(p.id));
        }
    }

    match strategy {
        SeedingStrategy::Rating => {
            participants.sort_by(|a, b| b.seed_value.cmp(&a.seed_value));
            for (i, p) in participants.iter_mut().enumerate() {
                p.display_seed_index = i as u32 + 1;
            }
            Ok(pair_high_low(participants))
        }
        SeedingStrategy::Random => {
            participants.shuffle(rng);
            for (i, p) in participants.iter_mut().enumerate() {
                p.display_seed_index = i as u32 + 1;
            }
            Ok(participants)
        }
    }
}

/// [s1, s2, ..., sN] -> [s1, sN, s2, sN-1, ...]. An odd middle entry goes last.
fn pair_high_low(ranked: Vec<Participant>) -> Vec<Participant> {
    let mut ordered = Vec::with_capacity(ranked.len());
    let mut ranked = VecDeque::from(ranked);
    while let Some(high) = ranked.pop_front() {
        ordered.push(high);
        if let Some(low) = ranked.pop_back() {
            ordered.push(low);
        }
    }
    ordered
}
