//! Data structures for the bracket engine: participants, matches, tournament records.

mod game;
mod participant;
mod tournament;

pub use game::{
    AdvancementOutcome, BracketType, Match, MatchId, MatchResult, MatchStatus, ReporterId, Slot,
    SlotRef, FINAL_ROUND_BASE, LOSER_A_ROUND_BASE, LOSER_B_ROUND_BASE,
};
pub use participant::{Participant, ParticipantId};
pub use tournament::{
    BracketError, BracketResult, MatchSet, SeedingStrategy, TournamentFormat, TournamentId,
    TournamentRecord, TournamentStatus,
};
