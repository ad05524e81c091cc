//! Billiards tournament bracket engine: seeding, SABO double-elimination topology,
//! match advancement and progress, over an injected match store.

pub mod api;
pub mod engine;
pub mod logic;
pub mod models;
pub mod store;

pub use engine::BracketEngine;
pub use logic::{read_roster, seed, seed_with_rng, ProgressReport, StatusCounts};
pub use models::{
    AdvancementOutcome, BracketError, BracketResult, BracketType, Match, MatchId, MatchResult,
    MatchSet, MatchStatus, Participant, ParticipantId, ReporterId, SeedingStrategy, Slot, SlotRef,
    TournamentFormat, TournamentId, TournamentRecord, TournamentStatus,
};
pub use store::{Completion, InMemoryMatchStore, MatchStore, SlotAssignment};
