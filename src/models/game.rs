//! Match, slots, routing pointers and results.

use crate::models::participant::ParticipantId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Identifier of whoever reported a result (player, referee or organizer).
pub type ReporterId = Uuid;

/// Double-elimination round-number offsets (round 1 of loser A is 101, the grand final 301).
pub const LOSER_A_ROUND_BASE: u32 = 100;
pub const LOSER_B_ROUND_BASE: u32 = 200;
pub const FINAL_ROUND_BASE: u32 = 300;

/// Branch of the bracket a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketType {
    Winner,
    LoserA,
    LoserB,
    Final,
}

impl BracketType {
    /// Offset added to the branch-local round to get a double-elimination `round_number`.
    /// Single elimination numbers every round, the final included, from 1.
    pub fn round_base(self) -> u32 {
        match self {
            BracketType::Winner => 0,
            BracketType::LoserA => LOSER_A_ROUND_BASE,
            BracketType::LoserB => LOSER_B_ROUND_BASE,
            BracketType::Final => FINAL_ROUND_BASE,
        }
    }

    pub fn is_loser_branch(self) -> bool {
        matches!(self, BracketType::LoserA | BracketType::LoserB)
    }
}

/// One of the two participant positions in a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// Slot fed by source match `number` when two matches feed one target: odd → A, even → B.
    pub fn from_parity(number: u32) -> Self {
        if number % 2 == 1 {
            Slot::A
        } else {
            Slot::B
        }
    }
}

/// Downstream target of a result: a slot of another match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct SlotRef {
    pub match_id: MatchId,
    pub slot: Slot,
}

/// Derived lifecycle state of a match. Never stored.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// At least one slot is still empty.
    Pending,
    /// Both slots filled, no result yet.
    Ready,
    /// Result recorded.
    Completed,
}

/// Recorded result. Scores, winner and loser are always written together.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score_a: u32,
    pub score_b: u32,
    pub winner: ParticipantId,
    pub loser: ParticipantId,
    pub reported_by: ReporterId,
    pub completed_at: DateTime<Utc>,
}

impl MatchResult {
    pub fn same_scores(&self, score_a: u32, score_b: u32) -> bool {
        self.score_a == score_a && self.score_b == score_b
    }
}

/// What a completed result changed downstream. Surfaced to notification collaborators.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdvancementOutcome {
    pub match_id: MatchId,
    pub winner: ParticipantId,
    pub loser: ParticipantId,
    /// Where the winner was placed (None for the grand final).
    pub winner_to: Option<SlotRef>,
    /// Where the loser was placed (None when the loser is eliminated).
    pub loser_to: Option<SlotRef>,
    /// Downstream matches that became ready because of this result.
    pub ready_matches: Vec<MatchId>,
    /// Set when this result decided the tournament.
    pub champion: Option<ParticipantId>,
}

impl AdvancementOutcome {
    pub fn tournament_concluded(&self) -> bool {
        self.champion.is_some()
    }
}

/// A single match of a bracket.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub bracket: BracketType,
    /// Branch-offset round: winner and final 1.., loser A 101.., loser B 201..
    pub round_number: u32,
    /// 1-based ordinal within the round.
    pub match_number: u32,
    pub slot_a: Option<ParticipantId>,
    pub slot_b: Option<ParticipantId>,
    pub next_winner: Option<SlotRef>,
    pub next_loser: Option<SlotRef>,
    /// None if not yet played.
    pub result: Option<MatchResult>,
    /// Outcome stored once advancement finished; replayed on retries.
    #[serde(default)]
    pub advancement: Option<AdvancementOutcome>,
}

impl Match {
    pub fn status(&self) -> MatchStatus {
        if self.result.is_some() {
            MatchStatus::Completed
        } else if self.slot_a.is_some() && self.slot_b.is_some() {
            MatchStatus::Ready
        } else {
            MatchStatus::Pending
        }
    }

    /// Round within the match's own branch (1-based).
    pub fn branch_round(&self) -> u32 {
        // A single-elimination final sits below the offset and keeps its plain number.
        self.round_number
            .checked_sub(self.bracket.round_base())
            .unwrap_or(self.round_number)
    }

    pub fn slot(&self, slot: Slot) -> Option<ParticipantId> {
        match slot {
            Slot::A => self.slot_a,
            Slot::B => self.slot_b,
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut Option<ParticipantId> {
        match slot {
            Slot::A => &mut self.slot_a,
            Slot::B => &mut self.slot_b,
        }
    }

    pub fn has_participant(&self, id: ParticipantId) -> bool {
        self.slot_a == Some(id) || self.slot_b == Some(id)
    }

    /// The grand final (double elimination) or the last match (single elimination).
    pub fn is_final(&self) -> bool {
        self.bracket == BracketType::Final
    }

    /// Ordering key for listings: branch, then round, then match number.
    pub fn sort_key(&self) -> (BracketType, u32, u32) {
        (self.bracket, self.round_number, self.match_number)
    }
}
