//! In-memory match store. Map locks are held only for lookup/insert;
//! every conditional write locks a single match row.

use super::{Completion, MatchStore, SlotAssignment};
use crate::models::{
    AdvancementOutcome, BracketError, BracketResult, Match, MatchId, MatchResult, MatchSet,
    ParticipantId, Slot, TournamentId, TournamentRecord,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Per-tournament entry: record + ids of its matches in generation order.
struct TournamentEntry {
    record: TournamentRecord,
    match_ids: Vec<MatchId>,
}

type MatchRow = Arc<Mutex<Match>>;

/// Lock order is always `tournaments` before `matches`, and rows last.
#[derive(Default)]
pub struct InMemoryMatchStore {
    tournaments: RwLock<HashMap<TournamentId, TournamentEntry>>,
    matches: RwLock<HashMap<MatchId, MatchRow>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn row(&self, match_id: MatchId) -> BracketResult<MatchRow> {
        let g = self.matches.read().map_err(|_| BracketError::StorePoisoned)?;
        g.get(&match_id)
            .cloned()
            .ok_or(BracketError::MatchNotFound(match_id))
    }

    fn lock(row: &MatchRow) -> BracketResult<MutexGuard<'_, Match>> {
        row.lock().map_err(|_| BracketError::StorePoisoned)
    }
}

impl MatchStore for InMemoryMatchStore {
    fn create_matches(&self, tournament_id: TournamentId, set: MatchSet) -> BracketResult<()> {
        let mut tournaments = self
            .tournaments
            .write()
            .map_err(|_| BracketError::StorePoisoned)?;
        if tournaments.contains_key(&tournament_id) {
            return Err(BracketError::AlreadyGenerated(tournament_id));
        }
        let record = TournamentRecord::new(&set);
        let match_ids: Vec<MatchId> = set.matches.iter().map(|m| m.id).collect();

        let mut matches = self.matches.write().map_err(|_| BracketError::StorePoisoned)?;
        for m in set.matches {
            matches.insert(m.id, Arc::new(Mutex::new(m)));
        }
        tournaments.insert(tournament_id, TournamentEntry { record, match_ids });
        Ok(())
    }

    fn get_match(&self, match_id: MatchId) -> BracketResult<Match> {
        let row = self.row(match_id)?;
        let m = Self::lock(&row)?;
        Ok(m.clone())
    }

    fn list_matches(&self, tournament_id: TournamentId) -> BracketResult<Vec<Match>> {
        let ids = {
            let g = self
                .tournaments
                .read()
                .map_err(|_| BracketError::StorePoisoned)?;
            match g.get(&tournament_id) {
                Some(entry) => entry.match_ids.clone(),
                None => return Ok(Vec::new()),
            }
        };
        ids.into_iter().map(|id| self.get_match(id)).collect()
    }

    fn tournament(&self, tournament_id: TournamentId) -> BracketResult<TournamentRecord> {
        let g = self
            .tournaments
            .read()
            .map_err(|_| BracketError::StorePoisoned)?;
        g.get(&tournament_id)
            .map(|entry| entry.record.clone())
            .ok_or(BracketError::TournamentNotFound(tournament_id))
    }

    fn conditional_assign_slot(
        &self,
        match_id: MatchId,
        slot: Slot,
        participant: ParticipantId,
    ) -> BracketResult<SlotAssignment> {
        let row = self.row(match_id)?;
        let mut m = Self::lock(&row)?;
        if let Some(existing) = m.slot(slot) {
            return Ok(SlotAssignment::AlreadyOccupied(existing));
        }
        *m.slot_mut(slot) = Some(participant);
        let now_ready = m.slot_a.is_some() && m.slot_b.is_some();
        Ok(SlotAssignment::Assigned { now_ready })
    }

    fn conditional_complete(
        &self,
        match_id: MatchId,
        result: MatchResult,
    ) -> BracketResult<Completion> {
        let row = self.row(match_id)?;
        let mut m = Self::lock(&row)?;
        if let Some(existing) = &m.result {
            return Ok(Completion::AlreadyCompleted(existing.clone()));
        }
        m.result = Some(result);
        Ok(Completion::Completed)
    }

    fn save_outcome(
        &self,
        match_id: MatchId,
        outcome: AdvancementOutcome,
    ) -> BracketResult<AdvancementOutcome> {
        let row = self.row(match_id)?;
        let mut m = Self::lock(&row)?;
        let stored = m.advancement.get_or_insert_with(|| outcome.clone());
        for id in outcome.ready_matches {
            if !stored.ready_matches.contains(&id) {
                stored.ready_matches.push(id);
            }
        }
        Ok(stored.clone())
    }

    fn mark_champion(
        &self,
        tournament_id: TournamentId,
        champion: ParticipantId,
    ) -> BracketResult<()> {
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| BracketError::StorePoisoned)?;
        let entry = g
            .get_mut(&tournament_id)
            .ok_or(BracketError::TournamentNotFound(tournament_id))?;
        if entry.record.champion.is_none() {
            entry.record.champion = Some(champion);
            entry.record.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    fn abort(&self, tournament_id: TournamentId) -> BracketResult<()> {
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| BracketError::StorePoisoned)?;
        let entry = g
            .get_mut(&tournament_id)
            .ok_or(BracketError::TournamentNotFound(tournament_id))?;
        entry.record.aborted = true;
        Ok(())
    }

    fn reset(&self, tournament_id: TournamentId) -> BracketResult<()> {
        let mut tournaments = self
            .tournaments
            .write()
            .map_err(|_| BracketError::StorePoisoned)?;
        let entry = tournaments
            .remove(&tournament_id)
            .ok_or(BracketError::TournamentNotFound(tournament_id))?;
        let mut matches = self.matches.write().map_err(|_| BracketError::StorePoisoned)?;
        for id in entry.match_ids {
            matches.remove(&id);
        }
        Ok(())
    }
}
