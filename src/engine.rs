//! Bracket engine: the operations exposed to callers (UI, notifications, ranking updates).

use crate::logic::{advancement, progress, seeding, topology, ProgressReport};
use crate::models::{
    AdvancementOutcome, BracketError, Match, MatchId, Participant, ReporterId, SeedingStrategy,
    TournamentFormat, TournamentId, TournamentStatus,
};
use crate::store::MatchStore;
use rand::Rng;

/// Engine over an injected match store. Holds no state of its own, so it can be
/// shared between threads as long as the store can.
pub struct BracketEngine<S> {
    store: S,
}

impl<S: MatchStore> BracketEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seed, build the topology and persist the full match set.
    /// Returns the matches in bracket order.
    pub fn generate_bracket(
        &self,
        tournament_id: TournamentId,
        participants: Vec<Participant>,
        format: TournamentFormat,
        strategy: SeedingStrategy,
    ) -> Result<Vec<Match>, BracketError> {
        self.generate_bracket_with_rng(
            tournament_id,
            participants,
            format,
            strategy,
            &mut rand::thread_rng(),
        )
    }

    /// Same as `generate_bracket` with a caller-supplied RNG for the random strategy.
    pub fn generate_bracket_with_rng<R: Rng + ?Sized>(
        &self,
        tournament_id: TournamentId,
        participants: Vec<Participant>,
        format: TournamentFormat,
        strategy: SeedingStrategy,
        rng: &mut R,
    ) -> Result<Vec<Match>, BracketError> {
        let seeded = seeding::seed_with_rng(participants, strategy, format, rng)?;
        let topology = topology::build(seeded.len(), format)?;
        let set = topology.materialize(tournament_id, seeded)?;
        let count = set.matches.len();
        self.store.create_matches(tournament_id, set)?;
        log::info!(
            "Generated {} bracket for tournament {} ({} matches, {:?} seeding)",
            format,
            tournament_id,
            count,
            strategy
        );
        self.matches(tournament_id)
    }

    pub fn record_result(
        &self,
        match_id: MatchId,
        score_a: u32,
        score_b: u32,
        reported_by: ReporterId,
    ) -> Result<AdvancementOutcome, BracketError> {
        advancement::record_result(&self.store, match_id, score_a, score_b, reported_by)
    }

    pub fn status(&self, tournament_id: TournamentId) -> Result<TournamentStatus, BracketError> {
        let matches = self.store.list_matches(tournament_id)?;
        Ok(progress::status(&matches))
    }

    /// Per-branch counts; fails with `TournamentNotFound` when no bracket exists.
    pub fn progress(&self, tournament_id: TournamentId) -> Result<ProgressReport, BracketError> {
        let record = self.store.tournament(tournament_id)?;
        let matches = self.store.list_matches(tournament_id)?;
        Ok(progress::progress(&matches, record.aborted))
    }

    pub fn get_match(&self, match_id: MatchId) -> Result<Match, BracketError> {
        self.store.get_match(match_id)
    }

    /// All matches ordered by branch, round and match number.
    pub fn matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, BracketError> {
        let mut matches = self.store.list_matches(tournament_id)?;
        matches.sort_by_key(Match::sort_key);
        Ok(matches)
    }

    /// Stop accepting results for the tournament.
    pub fn abort(&self, tournament_id: TournamentId) -> Result<(), BracketError> {
        self.store.abort(tournament_id)?;
        log::info!("Tournament {} aborted", tournament_id);
        Ok(())
    }

    /// Discard the bracket so it can be generated again.
    pub fn reset(&self, tournament_id: TournamentId) -> Result<(), BracketError> {
        self.store.reset(tournament_id)?;
        log::info!("Tournament {} bracket reset", tournament_id);
        Ok(())
    }
}
