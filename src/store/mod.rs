//! Match store: the persistence boundary of the engine.
//!
//! The engine only needs single-row atomic primitives. Each conditional write
//! locks exactly one match; nothing here locks across matches.

mod memory;

pub use memory::InMemoryMatchStore;

use crate::models::{
    AdvancementOutcome, BracketResult, Match, MatchId, MatchResult, MatchSet, ParticipantId, Slot,
    TournamentId, TournamentRecord,
};

/// Result of a conditional slot write.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotAssignment {
    /// The slot was empty and now holds the participant. `now_ready` is true when this
    /// write filled the second slot of the match.
    Assigned { now_ready: bool },
    /// The slot already held a participant (possibly the same one).
    AlreadyOccupied(ParticipantId),
}

/// Result of a conditional completion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Completion {
    Completed,
    AlreadyCompleted(MatchResult),
}

/// Persistence operations the bracket engine depends on.
pub trait MatchStore: Send + Sync {
    /// Bulk insert at generation time. Fails with `AlreadyGenerated` if the tournament has matches.
    fn create_matches(&self, tournament_id: TournamentId, set: MatchSet) -> BracketResult<()>;

    fn get_match(&self, match_id: MatchId) -> BracketResult<Match>;

    /// All matches of a tournament (empty if no bracket was generated).
    fn list_matches(&self, tournament_id: TournamentId) -> BracketResult<Vec<Match>>;

    fn tournament(&self, tournament_id: TournamentId) -> BracketResult<TournamentRecord>;

    /// Write `participant` into `slot` only if the slot is empty.
    fn conditional_assign_slot(
        &self,
        match_id: MatchId,
        slot: Slot,
        participant: ParticipantId,
    ) -> BracketResult<SlotAssignment>;

    /// Record the result only if the match has none yet.
    fn conditional_complete(&self, match_id: MatchId, result: MatchResult)
        -> BracketResult<Completion>;

    /// Store the outcome of a completed match so retries can replay it. If an outcome is
    /// already stored, the ready matches are merged into it. Returns the stored outcome,
    /// which is the authoritative one once every racing submission has saved.
    fn save_outcome(
        &self,
        match_id: MatchId,
        outcome: AdvancementOutcome,
    ) -> BracketResult<AdvancementOutcome>;

    /// Mark the tournament completed with its champion.
    fn mark_champion(&self, tournament_id: TournamentId, champion: ParticipantId)
        -> BracketResult<()>;

    /// Stop accepting results for the tournament.
    fn abort(&self, tournament_id: TournamentId) -> BracketResult<()>;

    /// Discard the tournament record and every match so the bracket can be regenerated.
    fn reset(&self, tournament_id: TournamentId) -> BracketResult<()>;
}

impl<S: MatchStore + ?Sized> MatchStore for std::sync::Arc<S> {
    fn create_matches(&self, tournament_id: TournamentId, set: MatchSet) -> BracketResult<()> {
        (**self).create_matches(tournament_id, set)
    }

    fn get_match(&self, match_id: MatchId) -> BracketResult<Match> {
        (**self).get_match(match_id)
    }

    fn list_matches(&self, tournament_id: TournamentId) -> BracketResult<Vec<Match>> {
        (**self).list_matches(tournament_id)
    }

    fn tournament(&self, tournament_id: TournamentId) -> BracketResult<TournamentRecord> {
        (**self).tournament(tournament_id)
    }

    fn conditional_assign_slot(
        &self,
        match_id: MatchId,
        slot: Slot,
        participant: ParticipantId,
    ) -> BracketResult<SlotAssignment> {
        (**self).conditional_assign_slot(match_id, slot, participant)
    }

    fn conditional_complete(
        &self,
        match_id: MatchId,
        result: MatchResult,
    ) -> BracketResult<Completion> {
        (**self).conditional_complete(match_id, result)
    }

    fn save_outcome(
        &self,
        match_id: MatchId,
        outcome: AdvancementOutcome,
    ) -> BracketResult<AdvancementOutcome> {
        (**self).save_outcome(match_id, outcome)
    }

    fn mark_champion(
        &self,
        tournament_id: TournamentId,
        champion: ParticipantId,
    ) -> BracketResult<()> {
        (**self).mark_champion(tournament_id, champion)
    }

    fn abort(&self, tournament_id: TournamentId) -> BracketResult<()> {
        (**self).abort(tournament_id)
    }

    fn reset(&self, tournament_id: TournamentId) -> BracketResult<()> {
        (**self).reset(tournament_id)
    }
}
