//! Tournament progress: read-only projections over the stored matches.

use crate::models::{BracketType, Match, MatchStatus, TournamentStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Status from the grand final. No matches (no bracket) or no result yet means not started.
pub fn status(matches: &[Match]) -> TournamentStatus {
    let final_result = matches
        .iter()
        .find(|m| m.is_final())
        .and_then(|m| m.result.as_ref());
    if let Some(result) = final_result {
        return TournamentStatus::Completed {
            champion: result.winner,
        };
    }
    if matches.iter().any(|m| m.result.is_some()) {
        TournamentStatus::InProgress
    } else {
        TournamentStatus::NotStarted
    }
}

/// Match counts by derived status.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub ready: usize,
    pub completed: usize,
}

impl StatusCounts {
    fn add(&mut self, status: MatchStatus) {
        match status {
            MatchStatus::Pending => self.pending += 1,
            MatchStatus::Ready => self.ready += 1,
            MatchStatus::Completed => self.completed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.pending + self.ready + self.completed
    }
}

/// Per-branch completion report for dashboards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ProgressReport {
    pub status: TournamentStatus,
    pub aborted: bool,
    pub overall: StatusCounts,
    pub by_bracket: BTreeMap<BracketType, StatusCounts>,
}

pub fn progress(matches: &[Match], aborted: bool) -> ProgressReport {
    let mut overall = StatusCounts::default();
    let mut by_bracket: BTreeMap<BracketType, StatusCounts> = BTreeMap::new();
    for m in matches {
        let s = m.status();
        overall.add(s);
        by_bracket.entry(m.bracket).or_default().add(s);
    }
    ProgressReport {
        status: status(matches),
        aborted,
        overall,
        by_bracket,
    }
}
