//! Tournament format, seeding strategy, status, the generated match set and errors.

use crate::models::game::{Match, MatchId, Slot};
use crate::models::participant::{Participant, ParticipantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during bracket operations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BracketError {
    /// Fewer participants than the format needs.
    #[error("Need at least {needed} participants (got {got})")]
    InsufficientParticipants { needed: usize, got: usize },
    /// Participant count not allowed by the format.
    #[error("{format} does not support {count} participants")]
    UnsupportedParticipantCount { format: TournamentFormat, count: usize },
    /// Unrecognized format name.
    #[error("Unknown tournament format: {0}")]
    InvalidFormat(String),
    /// Unrecognized seeding strategy name.
    #[error("Unknown seeding strategy: {0}")]
    InvalidSeedingStrategy(String),
    /// A roster file could not be parsed.
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),
    /// The same participant was entered twice.
    #[error("Participant {0} entered more than once")]
    DuplicateParticipant(ParticipantId),
    /// A slot of the match is still empty.
    #[error("Match {0} is not ready (a slot is still empty)")]
    MatchNotReady(MatchId),
    /// The match already has a different result.
    #[error("Match {0} already has a result")]
    MatchAlreadyCompleted(MatchId),
    /// Draws and out-of-range scores are rejected.
    #[error("Invalid score {score_a}-{score_b}")]
    InvalidScore { score_a: i64, score_b: i64 },
    /// A downstream slot is already held by a different participant.
    #[error("Slot {slot:?} of match {match_id} is already taken by another participant")]
    SlotConflict { match_id: MatchId, slot: Slot },
    /// Matches already exist for the tournament.
    #[error("Bracket already generated for tournament {0}")]
    AlreadyGenerated(TournamentId),
    #[error("Match {0} not found")]
    MatchNotFound(MatchId),
    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),
    /// The tournament was aborted; no more results are accepted.
    #[error("Tournament {0} was aborted")]
    TournamentAborted(TournamentId),
    /// A store lock was poisoned by a panicking writer.
    #[error("Match store lock poisoned")]
    StorePoisoned,
}

impl BracketError {
    /// Benign races under concurrent submission: the caller may re-read and retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BracketError::SlotConflict { .. } | BracketError::MatchAlreadyCompleted(_)
        )
    }
}

pub type BracketResult<T> = Result<T, BracketError>;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Bracket format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    SingleElimination,
    /// SABO double elimination, 16 participants.
    DoubleElimination,
}

impl TournamentFormat {
    /// Minimum number of participants the seeder accepts for this format.
    pub fn min_participants(self) -> usize {
        match self {
            TournamentFormat::SingleElimination => 4,
            TournamentFormat::DoubleElimination => 16,
        }
    }

    /// Participant counts the topology builder accepts.
    pub fn supported_counts(self) -> &'static [usize] {
        match self {
            TournamentFormat::SingleElimination => &[4, 8, 16, 32],
            TournamentFormat::DoubleElimination => &[16],
        }
    }
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentFormat::SingleElimination => write!(f, "single_elimination"),
            TournamentFormat::DoubleElimination => write!(f, "double_elimination"),
        }
    }
}

impl FromStr for TournamentFormat {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single_elimination" | "single" | "se" => Ok(TournamentFormat::SingleElimination),
            "double_elimination" | "double" | "de" | "sabo" | "sabo_de16" => {
                Ok(TournamentFormat::DoubleElimination)
            }
            other => Err(BracketError::InvalidFormat(other.to_string())),
        }
    }
}

/// How the confirmed participant list is ordered into round-1 pairs.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingStrategy {
    /// Highest rating vs lowest rating.
    #[default]
    Rating,
    /// Uniform shuffle.
    Random,
}

impl FromStr for SeedingStrategy {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rating" | "elo" => Ok(SeedingStrategy::Rating),
            "random" | "shuffle" => Ok(SeedingStrategy::Random),
            other => Err(BracketError::InvalidSeedingStrategy(other.to_string())),
        }
    }
}

/// Overall tournament progress, derived from the grand final.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum TournamentStatus {
    NotStarted,
    InProgress,
    Completed { champion: ParticipantId },
}

/// Full set of matches produced at bracket generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchSet {
    pub tournament_id: TournamentId,
    pub format: TournamentFormat,
    /// Participants in seeded order.
    pub participants: Vec<Participant>,
    pub matches: Vec<Match>,
}

impl MatchSet {
    pub fn grand_final(&self) -> Option<&Match> {
        self.matches.iter().find(|m| m.is_final())
    }
}

/// Tournament-level record kept by the store next to its matches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub id: TournamentId,
    pub format: TournamentFormat,
    pub participants: Vec<Participant>,
    pub champion: Option<ParticipantId>,
    pub aborted: bool,
    pub generated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TournamentRecord {
    pub fn new(set: &MatchSet) -> Self {
        Self {
            id: set.tournament_id,
            format: set.format,
            participants: set.participants.clone(),
            champion: None,
            aborted: false,
            generated_at: Utc::now(),
            completed_at: None,
        }
    }
}
