//! Match advancement: apply a result and route winner/loser into their downstream slots.
//!
//! `conditional_complete` is the linearisation point. Each downstream slot has
//! exactly one feeding match, so once a caller has completed the source match
//! nobody else can write its target slots.
//!
//! Targets are checked before completion and written after it. A writer outside
//! this module that fills a target slot in between leaves the match completed
//! with no stored outcome; every retry then fails with `SlotConflict`.
//!
//! The outcome stored on the match is authoritative. Identical submissions that
//! race may each return a subset of its `ready_matches`; a later retry returns
//! the merged list.

use crate::models::{
    AdvancementOutcome, BracketError, Match, MatchId, MatchResult, MatchStatus, ParticipantId,
    ReporterId, SlotRef,
};
use crate::store::{Completion, MatchStore, SlotAssignment};
use chrono::Utc;

/// Record a result for `match_id` and advance both participants.
///
/// Retrying with the same scores after success returns the stored outcome
/// without further writes. If the match was completed but its outcome never
/// stored, the retry finishes the slot assignments and stores it. Different
/// scores on a completed match fail with `MatchAlreadyCompleted`.
pub fn record_result<S: MatchStore + ?Sized>(
    store: &S,
    match_id: MatchId,
    score_a: u32,
    score_b: u32,
    reported_by: ReporterId,
) -> Result<AdvancementOutcome, BracketError> {
    let m = store.get_match(match_id)?;
    let tournament = store.tournament(m.tournament_id)?;
    if tournament.aborted {
        return Err(BracketError::TournamentAborted(m.tournament_id));
    }
    if score_a == score_b {
        return Err(BracketError::InvalidScore {
            score_a: score_a.into(),
            score_b: score_b.into(),
        });
    }

    if let Some(existing) = &m.result {
        return replay(store, &m, existing, score_a, score_b);
    }
    let (slot_a, slot_b) = match (m.status(), m.slot_a, m.slot_b) {
        (MatchStatus::Ready, Some(a), Some(b)) => (a, b),
        _ => return Err(BracketError::MatchNotReady(match_id)),
    };

    let (winner, loser) = if score_a > score_b {
        (slot_a, slot_b)
    } else {
        (slot_b, slot_a)
    };

    // Reject before writing anything if a downstream slot already holds someone else.
    check_target(store, m.next_winner, winner)?;
    check_target(store, m.next_loser, loser)?;

    let result = MatchResult {
        score_a,
        score_b,
        winner,
        loser,
        reported_by,
        completed_at: Utc::now(),
    };
    match store.conditional_complete(match_id, result)? {
        Completion::Completed => {
            log::info!(
                "Match {} ({:?} round {} #{}) completed {}-{}",
                match_id,
                m.bracket,
                m.round_number,
                m.match_number,
                score_a,
                score_b
            );
            advance(store, &m, winner, loser)
        }
        Completion::AlreadyCompleted(existing) => {
            log::warn!("Match {} was completed concurrently", match_id);
            replay(store, &m, &existing, score_a, score_b)
        }
    }
}

/// Handle a submission for a match that already has a result.
fn replay<S: MatchStore + ?Sized>(
    store: &S,
    m: &Match,
    existing: &MatchResult,
    score_a: u32,
    score_b: u32,
) -> Result<AdvancementOutcome, BracketError> {
    if !existing.same_scores(score_a, score_b) {
        log::warn!(
            "Rejected {}-{} for match {}: already completed {}-{}",
            score_a,
            score_b,
            m.id,
            existing.score_a,
            existing.score_b
        );
        return Err(BracketError::MatchAlreadyCompleted(m.id));
    }
    // Re-read: the snapshot may predate the outcome written by the first submission.
    let current = store.get_match(m.id)?;
    if let Some(outcome) = current.advancement {
        return Ok(outcome);
    }
    // A previous call stopped between completion and saving the outcome: finish it.
    // Assignments already made come back as occupied by the same participant.
    log::info!("Resuming advancement of match {}", m.id);
    advance(store, &current, existing.winner, existing.loser)
}

fn check_target<S: MatchStore + ?Sized>(
    store: &S,
    target: Option<SlotRef>,
    participant: ParticipantId,
) -> Result<(), BracketError> {
    let Some(target) = target else {
        return Ok(());
    };
    let downstream = store.get_match(target.match_id)?;
    match downstream.slot(target.slot) {
        Some(existing) if existing != participant => Err(BracketError::SlotConflict {
            match_id: target.match_id,
            slot: target.slot,
        }),
        _ => Ok(()),
    }
}

/// Place winner and loser, crown the champion on the final, store the outcome.
fn advance<S: MatchStore + ?Sized>(
    store: &S,
    m: &Match,
    winner: ParticipantId,
    loser: ParticipantId,
) -> Result<AdvancementOutcome, BracketError> {
    let mut ready_matches = Vec::new();
    for (target, participant) in [(m.next_winner, winner), (m.next_loser, loser)] {
        let Some(target) = target else {
            continue;
        };
        if assign(store, target, participant)? {
            ready_matches.push(target.match_id);
        }
    }

    let champion = if m.is_final() {
        store.mark_champion(m.tournament_id, winner)?;
        log::info!("Tournament {} champion: {}", m.tournament_id, winner);
        Some(winner)
    } else {
        if m.next_loser.is_none() {
            log::debug!("Participant {} eliminated in match {}", loser, m.id);
        }
        None
    };

    let outcome = AdvancementOutcome {
        match_id: m.id,
        winner,
        loser,
        winner_to: m.next_winner,
        loser_to: m.next_loser,
        ready_matches,
        champion,
    };
    // Concurrent identical submissions converge on the first stored outcome.
    store.save_outcome(m.id, outcome)
}

/// Conditional write of one slot. Returns true when this write made the target ready.
fn assign<S: MatchStore + ?Sized>(
    store: &S,
    target: SlotRef,
    participant: ParticipantId,
) -> Result<bool, BracketError> {
    match store.conditional_assign_slot(target.match_id, target.slot, participant)? {
        SlotAssignment::Assigned { now_ready } => {
            log::debug!(
                "Placed {} into match {} slot {:?}{}",
                participant,
                target.match_id,
                target.slot,
                if now_ready { " (ready)" } else { "" }
            );
            Ok(now_ready)
        }
        SlotAssignment::AlreadyOccupied(existing) if existing == participant => Ok(false),
        SlotAssignment::AlreadyOccupied(existing) => {
            log::error!(
                "Slot {:?} of match {} holds {} while routing {}",
                target.slot,
                target.match_id,
                existing,
                participant
            );
            Err(BracketError::SlotConflict {
                match_id: target.match_id,
                slot: target.slot,
            })
        }
    }
}
