//! REST API over the bracket engine. Mounted by the `web` binary via [`configure`].

use crate::engine::BracketEngine;
use crate::logic::read_roster;
use crate::models::{
    BracketError, Match, MatchId, MatchStatus, Participant, ReporterId, SeedingStrategy,
    TournamentFormat, TournamentId,
};
use crate::store::InMemoryMatchStore;
use actix_web::{
    get, post,
    web::{self, Data, Json, Path, Query},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shared engine. The store synchronizes itself per match row, so handlers need no outer lock.
pub type AppState = Data<BracketEngine<InMemoryMatchStore>>;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Serialize)]
struct CreatedTournament {
    id: TournamentId,
}

#[derive(Deserialize)]
struct GenerateBracketBody {
    participants: Vec<Participant>,
    format: String,
    #[serde(default)]
    seeding: Option<String>,
}

#[derive(Deserialize)]
struct RosterQuery {
    format: String,
    #[serde(default)]
    seeding: Option<String>,
}

/// Scores arrive signed so negative values surface as `InvalidScore` rather than a parse error.
#[derive(Deserialize)]
struct RecordResultBody {
    score_a: i64,
    score_b: i64,
    reported_by: ReporterId,
}

/// Match with its derived status, for API responses.
#[derive(Serialize)]
struct MatchView {
    #[serde(flatten)]
    inner: Match,
    status: MatchStatus,
}

impl From<Match> for MatchView {
    fn from(m: Match) -> Self {
        let status = m.status();
        Self { inner: m, status }
    }
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segment: match id (e.g. /api/matches/{match_id})
#[derive(Deserialize)]
struct MatchPath {
    match_id: MatchId,
}

/// 404 for unknown ids, 409 for the retryable races and duplicate generation, 400 otherwise.
fn error_response(e: &BracketError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string(), "retryable": e.is_retryable() });
    match e {
        BracketError::MatchNotFound(_) | BracketError::TournamentNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        BracketError::SlotConflict { .. }
        | BracketError::MatchAlreadyCompleted(_)
        | BracketError::AlreadyGenerated(_) => HttpResponse::Conflict().json(body),
        BracketError::StorePoisoned => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn parse_options(
    format: &str,
    seeding: Option<&str>,
) -> Result<(TournamentFormat, SeedingStrategy), BracketError> {
    let format = format.parse()?;
    let seeding = match seeding {
        Some(s) => s.parse()?,
        None => SeedingStrategy::default(),
    };
    Ok((format, seeding))
}

fn matches_response(result: Result<Vec<Match>, BracketError>) -> HttpResponse {
    match result {
        Ok(matches) => {
            let views: Vec<MatchView> = matches.into_iter().map(MatchView::from).collect();
            HttpResponse::Ok().json(views)
        }
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "sabo-bracket",
    })
}

/// Mint a tournament id; the bracket is stored once generated.
#[post("/api/tournaments")]
async fn api_create_tournament() -> HttpResponse {
    HttpResponse::Ok().json(CreatedTournament { id: Uuid::new_v4() })
}

/// Seed participants and generate the bracket.
#[post("/api/tournaments/{id}/bracket")]
async fn api_generate_bracket(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<GenerateBracketBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let (format, seeding) = match parse_options(&body.format, body.seeding.as_deref()) {
        Ok(opts) => opts,
        Err(e) => return error_response(&e),
    };
    matches_response(state.generate_bracket(path.id, body.participants, format, seeding))
}

/// Generate the bracket from a CSV roster (`name,rating[,id]`).
#[post("/api/tournaments/{id}/bracket/csv")]
async fn api_generate_bracket_csv(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<RosterQuery>,
    body: String,
) -> HttpResponse {
    let (format, seeding) = match parse_options(&query.format, query.seeding.as_deref()) {
        Ok(opts) => opts,
        Err(e) => return error_response(&e),
    };
    let participants = match read_roster(body.as_bytes()) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };
    matches_response(state.generate_bracket(path.id, participants, format, seeding))
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    matches_response(state.matches(path.id))
}

#[get("/api/tournaments/{id}/status")]
async fn api_status(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.status(path.id) {
        Ok(status) => HttpResponse::Ok().json(status),
        Err(e) => error_response(&e),
    }
}

#[get("/api/tournaments/{id}/progress")]
async fn api_progress(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.progress(path.id) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => error_response(&e),
    }
}

/// Discard the bracket so it can be generated again.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.reset(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[post("/api/tournaments/{id}/abort")]
async fn api_abort(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.abort(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[get("/api/matches/{match_id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    match state.get_match(path.match_id) {
        Ok(m) => HttpResponse::Ok().json(MatchView::from(m)),
        Err(e) => error_response(&e),
    }
}

/// Submit a result. Identical resubmissions return the original outcome.
#[post("/api/matches/{match_id}/result")]
async fn api_record_result(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let scores = (u32::try_from(body.score_a), u32::try_from(body.score_b));
    let (score_a, score_b) = match scores {
        (Ok(a), Ok(b)) => (a, b),
        _ => {
            return error_response(&BracketError::InvalidScore {
                score_a: body.score_a,
                score_b: body.score_b,
            })
        }
    };
    match state.record_result(path.match_id, score_a, score_b, body.reported_by) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}

/// Register every route on an actix `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_create_tournament)
        .service(api_generate_bracket)
        .service(api_generate_bracket_csv)
        .service(api_list_matches)
        .service(api_status)
        .service(api_progress)
        .service(api_reset)
        .service(api_abort)
        .service(api_get_match)
        .service(api_record_result);
}
