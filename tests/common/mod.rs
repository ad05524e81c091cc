//! Shared helpers for the integration tests.
#![allow(dead_code)]

use sabo_bracket::{
    AdvancementOutcome, BracketEngine, BracketType, InMemoryMatchStore, Match, MatchStatus,
    Participant, SeedingStrategy, TournamentFormat, TournamentId,
};
use uuid::Uuid;

pub type Engine = BracketEngine<InMemoryMatchStore>;

/// `n` participants with distinct ratings; P0 is the highest rated.
pub fn participants(n: usize) -> Vec<Participant> {
    (0..n)
        .map(|i| Participant::new(format!("P{i}"), 2000 - (i as u32) * 10))
        .collect()
}

/// Fresh engine with a rating-seeded bracket for `n` participants.
pub fn generated(n: usize, format: TournamentFormat) -> (Engine, TournamentId, Vec<Participant>) {
    let engine = BracketEngine::new(InMemoryMatchStore::new());
    let tid = Uuid::new_v4();
    let players = participants(n);
    engine
        .generate_bracket(tid, players.clone(), format, SeedingStrategy::Rating)
        .unwrap();
    (engine, tid, players)
}

pub fn sabo() -> (Engine, TournamentId, Vec<Participant>) {
    generated(16, TournamentFormat::DoubleElimination)
}

/// Match by branch, branch-offset round number and match number.
pub fn find(matches: &[Match], bracket: BracketType, round_number: u32, number: u32) -> Match {
    matches
        .iter()
        .find(|m| {
            m.bracket == bracket && m.round_number == round_number && m.match_number == number
        })
        .cloned()
        .unwrap_or_else(|| panic!("no match {bracket:?} {round_number} #{number}"))
}

/// Play every ready match until none are left. `scores` decides each result.
pub fn play_out(
    engine: &Engine,
    tid: TournamentId,
    scores: impl Fn(&Match) -> (u32, u32),
) -> Vec<AdvancementOutcome> {
    let reporter = Uuid::new_v4();
    let mut outcomes = Vec::new();
    loop {
        let ready: Vec<Match> = engine
            .matches(tid)
            .unwrap()
            .into_iter()
            .filter(|m| m.status() == MatchStatus::Ready)
            .collect();
        if ready.is_empty() {
            return outcomes;
        }
        for m in ready {
            let (a, b) = scores(&m);
            outcomes.push(engine.record_result(m.id, a, b, reporter).unwrap());
        }
    }
}

/// Slot A always wins 9-5.
pub fn slot_a_wins(_: &Match) -> (u32, u32) {
    (9, 5)
}
