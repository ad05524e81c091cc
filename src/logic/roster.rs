//! Roster import: CSV rows `name,rating[,id]` into participants.

use crate::models::{BracketError, Participant};
use serde::Deserialize;
use std::io;
use uuid::Uuid;

#[derive(Deserialize)]
struct RosterRow {
    name: String,
    rating: u32,
    #[serde(default)]
    id: Option<Uuid>,
}

/// Parse a roster with a header row. Blank names are rejected; a missing id gets a fresh one.
pub fn read_roster<R: io::Read>(reader: R) -> Result<Vec<Participant>, BracketError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut participants = Vec::new();
    for (line, row) in rdr.deserialize::<RosterRow>().enumerate() {
        // +2: 1-based and the header row.
        let row =
            row.map_err(|e| BracketError::InvalidRoster(format!("row {}: {}", line + 2, e)))?;
        if row.name.is_empty() {
            return Err(BracketError::InvalidRoster(format!(
                "row {}: empty name",
                line + 2
            )));
        }
        participants.push(Participant::with_id(
            row.id.unwrap_or_else(Uuid::new_v4),
            row.name,
            row.rating,
        ));
    }
    Ok(participants)
}
