//! Bracket topology: the static set of match slots and their routing pointers.
//!
//! The builder works on an index arena. Every pointer is computed from
//! `(branch, round, match number)` arithmetic, never looked up, so a bracket
//! either has a complete set of downstream pointers or fails to build.

use crate::models::{
    BracketError, BracketType, Match, MatchSet, Participant, Slot, SlotRef, TournamentFormat,
    TournamentId,
};
use uuid::Uuid;

/// Rounds of the SABO double-elimination layout: (branch, branch round, match count).
const SABO_LAYOUT: [(BracketType, u32, u32); 10] = [
    (BracketType::Winner, 1, 8),
    (BracketType::Winner, 2, 4),
    (BracketType::Winner, 3, 2),
    (BracketType::Winner, 4, 1),
    (BracketType::LoserA, 1, 4),
    (BracketType::LoserA, 2, 2),
    (BracketType::LoserA, 3, 1),
    (BracketType::LoserB, 1, 2),
    (BracketType::LoserB, 2, 1),
    (BracketType::Final, 1, 1),
];

/// Last winner-bracket round of the SABO layout (winner-bracket final).
const SABO_WINNER_ROUNDS: u32 = 4;

/// Arena pointer: index of the target match and the slot to fill.
pub type SpecPointer = (usize, Slot);

/// One match slot of a topology before ids are assigned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchSpec {
    pub bracket: BracketType,
    /// Branch-local round (1-based). A single-elimination final keeps the winner numbering.
    pub round: u32,
    /// Stored round number: `round` plus the branch offset in double elimination.
    pub round_number: u32,
    pub match_number: u32,
    pub next_winner: Option<SpecPointer>,
    pub next_loser: Option<SpecPointer>,
}

/// Static bracket shape for one format and participant count.
#[derive(Clone, Debug)]
pub struct Topology {
    pub format: TournamentFormat,
    pub participant_count: usize,
    pub matches: Vec<MatchSpec>,
}

/// Build the topology for `participant_count` entrants in `format`.
pub fn build(participant_count: usize, format: TournamentFormat) -> Result<Topology, BracketError> {
    if !format.supported_counts().contains(&participant_count) {
        return Err(BracketError::UnsupportedParticipantCount {
            format,
            count: participant_count,
        });
    }
    let matches = match format {
        TournamentFormat::SingleElimination => single_elimination(participant_count),
        TournamentFormat::DoubleElimination => sabo_double_elimination(),
    };
    Ok(Topology {
        format,
        participant_count,
        matches,
    })
}

/// `log2(n)` rounds; the winner of match n plays in match ceil(n/2) of the next round.
fn single_elimination(participant_count: usize) -> Vec<MatchSpec> {
    let rounds = participant_count.trailing_zeros();
    let mut round_start = Vec::with_capacity(rounds as usize);
    let mut total = 0usize;
    for round in 1..=rounds {
        round_start.push(total);
        total += participant_count >> round;
    }

    let mut specs = Vec::with_capacity(total);
    for round in 1..=rounds {
        let count = (participant_count >> round) as u32;
        let bracket = if round == rounds {
            BracketType::Final
        } else {
            BracketType::Winner
        };
        for number in 1..=count {
            let next_winner = (round < rounds).then(|| {
                let next = round_start[round as usize] + (div_ceil(number, 2) - 1) as usize;
                (next, Slot::from_parity(number))
            });
            specs.push(MatchSpec {
                bracket,
                round,
                round_number: round,
                match_number: number,
                next_winner,
                next_loser: None,
            });
        }
    }
    specs
}

/// Arena index of a SABO match.
fn sabo_index(bracket: BracketType, round: u32, number: u32) -> usize {
    let mut offset = 0usize;
    for (b, r, count) in SABO_LAYOUT {
        if b == bracket && r == round {
            debug_assert!(number >= 1 && number <= count);
            return offset + (number - 1) as usize;
        }
        offset += count as usize;
    }
    unreachable!("no SABO round {bracket:?} {round}")
}

fn sabo_double_elimination() -> Vec<MatchSpec> {
    let mut specs = Vec::with_capacity(26);
    for (bracket, round, count) in SABO_LAYOUT {
        for number in 1..=count {
            let (next_winner, next_loser) = sabo_routes(bracket, round, number);
            specs.push(MatchSpec {
                bracket,
                round,
                round_number: bracket.round_base() + round,
                match_number: number,
                next_winner,
                next_loser,
            });
        }
    }
    specs
}

/// Winner and loser destinations of SABO match `number` in `bracket`/`round`.
fn sabo_routes(
    bracket: BracketType,
    round: u32,
    number: u32,
) -> (Option<SpecPointer>, Option<SpecPointer>) {
    use BracketType::*;
    let halved = div_ceil(number, 2);
    let parity = Slot::from_parity(number);
    let final_idx = sabo_index(Final, 1, 1);
    match (bracket, round) {
        (Winner, r) if r < SABO_WINNER_ROUNDS => {
            let winner = (sabo_index(Winner, r + 1, halved), parity);
            let loser = match r {
                1 => Some((sabo_index(LoserA, 1, halved), parity)),
                // Winner round 2 losers are out: 26 matches only leave room for 11 routed losers.
                2 => None,
                _ => Some((sabo_index(LoserB, 1, 1), parity)),
            };
            (Some(winner), loser)
        }
        (Winner, _) => (
            Some((final_idx, Slot::A)),
            Some((sabo_index(LoserB, 1, 2), Slot::B)),
        ),
        (LoserA, r) if r < 3 => (Some((sabo_index(LoserA, r + 1, halved), parity)), None),
        (LoserA, _) => (Some((sabo_index(LoserB, 1, 2), Slot::A)), None),
        (LoserB, 1) => (Some((sabo_index(LoserB, 2, 1), parity)), None),
        (LoserB, _) => (Some((final_idx, Slot::B)), None),
        (Final, _) => (None, None),
    }
}

fn div_ceil(n: u32, d: u32) -> u32 {
    (n + d - 1) / d
}

impl Topology {
    /// Arena indices of the winner-bracket round 1, in match-number order.
    fn first_round(&self) -> Vec<usize> {
        self.matches
            .iter()
            .enumerate()
            .filter(|(_, s)| s.bracket == BracketType::Winner && s.round == 1)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Assign ids, resolve arena pointers and place the seeded participants into round 1.
    ///
    /// `seeded` must hold exactly `participant_count` entries; consecutive pairs play each other.
    pub fn materialize(
        &self,
        tournament_id: TournamentId,
        seeded: Vec<Participant>,
    ) -> Result<MatchSet, BracketError> {
        if seeded.len() != self.participant_count {
            return Err(BracketError::UnsupportedParticipantCount {
                format: self.format,
                count: seeded.len(),
            });
        }
        let ids: Vec<Uuid> = self.matches.iter().map(|_| Uuid::new_v4()).collect();
        let resolve = |p: Option<SpecPointer>| {
            p.map(|(idx, slot)| SlotRef {
                match_id: ids[idx],
                slot,
            })
        };
        let mut matches: Vec<Match> = self
            .matches
            .iter()
            .zip(&ids)
            .map(|(spec, &id)| Match {
                id,
                tournament_id,
                bracket: spec.bracket,
                round_number: spec.round_number,
                match_number: spec.match_number,
                slot_a: None,
                slot_b: None,
                next_winner: resolve(spec.next_winner),
                next_loser: resolve(spec.next_loser),
                result: None,
                advancement: None,
            })
            .collect();

        for (idx, pair) in self.first_round().into_iter().zip(seeded.chunks_exact(2)) {
            matches[idx].slot_a = Some(pair[0].id);
            matches[idx].slot_b = Some(pair[1].id);
        }

        Ok(MatchSet {
            tournament_id,
            format: self.format,
            participants: seeded,
            matches,
        })
    }
}
