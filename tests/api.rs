//! HTTP tests for the REST API.

mod common;

use actix_web::{http::StatusCode, test, web::Data, App};
use common::participants;
use sabo_bracket::{api, BracketEngine, InMemoryMatchStore};
use serde_json::{json, Value};
use uuid::Uuid;

fn engine() -> Data<BracketEngine<InMemoryMatchStore>> {
    Data::new(BracketEngine::new(InMemoryMatchStore::new()))
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(api::configure)).await
    };
}

fn first_ready(matches: &Value) -> Value {
    matches
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["status"] == "ready")
        .cloned()
        .unwrap()
}

#[actix_web::test]
async fn health_reports_ok() {
    let state = engine();
    let app = app!(state);
    let resp: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;
    assert_eq!(resp["ok"], true);
    assert_eq!(resp["service"], "sabo-bracket");
}

#[actix_web::test]
async fn generate_then_report_result() {
    let state = engine();
    let app = app!(state);
    let tid = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/bracket"))
        .set_json(json!({ "participants": participants(16), "format": "sabo" }))
        .to_request();
    let matches: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.as_array().unwrap().len(), 26);

    let m = first_ready(&matches);
    assert_eq!(m["bracket"], "winner");
    let match_id = m["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{match_id}/result"))
        .set_json(json!({ "score_a": 9, "score_b": 4, "reported_by": Uuid::new_v4() }))
        .to_request();
    let outcome: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(outcome["winner"], m["slot_a"]);
    assert_eq!(outcome["loser"], m["slot_b"]);
    assert!(outcome["winner_to"].is_object());
    assert!(outcome["loser_to"].is_object());

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{tid}/status"))
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["state"], "in_progress");

    let req = test::TestRequest::get()
        .uri(&format!("/api/matches/{match_id}"))
        .to_request();
    let stored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stored["status"], "completed");

    // A different score for the same match is a conflict.
    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{match_id}/result"))
        .set_json(json!({ "score_a": 2, "score_b": 9, "reported_by": Uuid::new_v4() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["retryable"], true);

    // Generating twice is a conflict too.
    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/bracket"))
        .set_json(json!({ "participants": participants(16), "format": "sabo" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn invalid_input_is_bad_request() {
    let state = engine();
    let app = app!(state);
    let tid = Uuid::new_v4();

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/bracket"))
        .set_json(json!({ "participants": participants(16), "format": "swiss" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/bracket"))
        .set_json(json!({ "participants": participants(8), "format": "sabo" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    state
        .generate_bracket(
            tid,
            participants(4),
            sabo_bracket::TournamentFormat::SingleElimination,
            sabo_bracket::SeedingStrategy::Rating,
        )
        .unwrap();
    let m = state.matches(tid).unwrap().remove(0);
    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{}/result", m.id))
        .set_json(json!({ "score_a": -1, "score_b": 3, "reported_by": Uuid::new_v4() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["retryable"], false);
}

#[actix_web::test]
async fn unknown_ids_are_not_found() {
    let state = engine();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/matches/{}", Uuid::new_v4()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{}/result", Uuid::new_v4()))
        .set_json(json!({ "score_a": 3, "score_b": 1, "reported_by": Uuid::new_v4() }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{}/progress", Uuid::new_v4()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn csv_roster_generates_bracket() {
    let state = engine();
    let app = app!(state);
    let tid = Uuid::new_v4();

    let mut roster = String::from("name,rating\n");
    for i in 0..8 {
        roster.push_str(&format!("Player {i},{}\n", 1900 - i * 25));
    }
    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/tournaments/{tid}/bracket/csv?format=single_elimination&seeding=rating"
        ))
        .insert_header(("content-type", "text/csv"))
        .set_payload(roster)
        .to_request();
    let matches: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(matches.as_array().unwrap().len(), 7);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{tid}/progress"))
        .to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(report["overall"]["ready"], 4);
    assert_eq!(report["by_bracket"]["final"]["pending"], 1);
}

#[actix_web::test]
async fn abort_then_reset() {
    let state = engine();
    let app = app!(state);
    let tid = Uuid::new_v4();
    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/bracket"))
        .set_json(json!({
            "participants": participants(4),
            "format": "single",
            "seeding": "random"
        }))
        .to_request();
    let matches: Value = test::call_and_read_body_json(&app, req).await;
    let match_id = first_ready(&matches)["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/abort"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::post()
        .uri(&format!("/api/matches/{match_id}/result"))
        .set_json(json!({ "score_a": 5, "score_b": 3, "reported_by": Uuid::new_v4() }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tournaments/{tid}/reset"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tournaments/{tid}/matches"))
        .to_request();
    let matches: Value = test::call_and_read_body_json(&app, req).await;
    assert!(matches.as_array().unwrap().is_empty());
}
