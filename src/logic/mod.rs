//! Bracket business logic: seeding, topology, advancement, progress, roster import.

pub mod advancement;
pub mod progress;
pub mod roster;
pub mod seeding;
pub mod topology;

pub use advancement::record_result;
pub use progress::{ProgressReport, StatusCounts};
pub use roster::read_roster;
pub use seeding::{seed, seed_with_rng};
pub use topology::{build, MatchSpec, Topology};
