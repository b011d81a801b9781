//! HTTP-level integration tests for ticket intake and triage.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, post_json_auth, put_json_auth, seed_user, token_for,
};
use helpdesk_core::roles::Role;
use helpdesk_db::repositories::TicketRepo;
use helpdesk_events::{EventBus, EVENT_TICKET_CREATED};
use helpdesk_llm::{ScriptedGenerator, TextGenerator};
use serde_json::json;
use sqlx::PgPool;

const POLISH: &str =
    r#"{"description":"User cannot log in to the platform","skills":["auth","debugging"]}"#;
const HIGH: &str = r#"{"priority":"high"}"#;

fn draft() -> serde_json::Value {
    json!({ "title": "Login Issue", "description": "Cannot log in", "requester_id": "u1" })
}

fn scripted(responses: &[&str]) -> Arc<ScriptedGenerator> {
    Arc::new(ScriptedGenerator::new(responses.iter().copied()))
}

fn as_generator(generator: &Arc<ScriptedGenerator>) -> Option<Arc<dyn TextGenerator>> {
    Some(generator.clone() as Arc<dyn TextGenerator>)
}

/// File a ticket for u1 through the API and return its JSON.
async fn file_ticket(pool: &PgPool) -> serde_json::Value {
    let generator = scripted(&[POLISH, HIGH]);
    let app = common::build_test_app(pool.clone(), as_generator(&generator));
    let response =
        post_json_auth(app, "/api/v1/tickets", draft(), &token_for("u1", Role::User)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Intake
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn intake_creates_polished_prioritized_ticket(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;

    let ticket = file_ticket(&pool).await;

    assert_eq!(ticket["title"], "Login Issue");
    assert_eq!(ticket["description"], "User cannot log in to the platform");
    assert_eq!(ticket["priority"], "high");
    assert_eq!(ticket["status"], "to-do");
    assert_eq!(ticket["related_skills"], json!(["auth", "debugging"]));
    assert_eq!(ticket["assigned_to"], serde_json::Value::Null);
    assert_eq!(ticket["created_by"], "u1");

    let stored = TicketRepo::list_by_creator(&pool, "u1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, ticket["id"].as_i64().unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn intake_publishes_ticket_created(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let generator = scripted(&[POLISH, HIGH]);
    let app = common::build_test_app_with_bus(pool, as_generator(&generator), Arc::clone(&bus));

    let response =
        post_json_auth(app, "/api/v1/tickets", draft(), &token_for("u1", Role::User)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let ticket = body_json(response).await["data"].clone();

    let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.event_type, EVENT_TICKET_CREATED);
    assert_eq!(
        event.source_entity_id,
        Some(ticket["id"].as_i64().unwrap().to_string())
    );
    assert_eq!(event.payload["priority"], "high");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn requester_defaults_to_caller(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let generator = scripted(&[POLISH, HIGH]);
    let app = common::build_test_app(pool, as_generator(&generator));

    let body = json!({ "title": "Login Issue", "description": "Cannot log in" });
    let response =
        post_json_auth(app, "/api/v1/tickets", body, &token_for("u1", Role::User)).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["created_by"], "u1");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn urgent_priority_is_rejected_with_400(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let generator = scripted(&[POLISH, r#"{"priority": "urgent"}"#]);
    let app = common::build_test_app(pool.clone(), as_generator(&generator));

    let response =
        post_json_auth(app, "/api/v1/tickets", draft(), &token_for("u1", Role::User)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_PRIORITY_VALUE");
    assert_eq!(json["error"], "Invalid priority determined by model");
    assert!(TicketRepo::list_by_creator(&pool, "u1").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn numeric_priority_is_rejected_with_400(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let generator = scripted(&[POLISH, r#"{"priority": 3}"#]);
    let app = common::build_test_app(pool.clone(), as_generator(&generator));

    let response =
        post_json_auth(app, "/api/v1/tickets", draft(), &token_for("u1", Role::User)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PRIORITY_VALUE");
    assert!(TicketRepo::list_by_creator(&pool, "u1").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_json_model_output_is_500_without_leaking_text(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let generator = scripted(&["Sure! Here's a nicer description.", HIGH]);
    let app = common::build_test_app(pool, as_generator(&generator));

    let response =
        post_json_auth(app, "/api/v1/tickets", draft(), &token_for("u1", Role::User)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "MALFORMED_MODEL_OUTPUT");
    assert_eq!(json["error"], "Failed to parse polish output from model");
    assert!(!json.to_string().contains("nicer description"));
    assert_eq!(generator.call_count(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_requester_is_404_and_model_is_not_called(pool: PgPool) {
    seed_user(&pool, "admin1", Role::Admin).await;
    let generator = scripted(&[POLISH, HIGH]);
    let app = common::build_test_app(pool, as_generator(&generator));

    let body = json!({ "title": "Login Issue", "description": "Cannot log in", "requester_id": "ghost" });
    let response =
        post_json_auth(app, "/api/v1/tickets", body, &token_for("admin1", Role::Admin)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "REQUESTER_NOT_FOUND");
    assert_eq!(json["error"], "Requester ghost not found");
    assert_eq!(generator.call_count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_generation_config_is_500(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let app = common::build_test_app(pool, None);

    let response =
        post_json_auth(app, "/api/v1/tickets", draft(), &token_for("u1", Role::User)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFIGURATION_MISSING");
    assert_eq!(json["error"], "Text generation service is not configured");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn generation_failure_is_500_and_persists_nothing(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let generator = Arc::new(ScriptedGenerator::new([POLISH]).then_fail("quota exceeded"));
    let app = common::build_test_app(pool.clone(), as_generator(&generator));

    let response =
        post_json_auth(app, "/api/v1/tickets", draft(), &token_for("u1", Role::User)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "GENERATION_UNAVAILABLE");
    assert_eq!(json["error"], "Text generation service unavailable");
    assert!(TicketRepo::list_by_creator(&pool, "u1").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_title_is_validation_error(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let generator = scripted(&[POLISH, HIGH]);
    let app = common::build_test_app(pool, as_generator(&generator));

    let body = json!({ "title": "  ", "description": "Cannot log in", "requester_id": "u1" });
    let response =
        post_json_auth(app, "/api/v1/tickets", body, &token_for("u1", Role::User)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "title is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_cannot_file_for_someone_else(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    seed_user(&pool, "u2", Role::User).await;
    let generator = scripted(&[POLISH, HIGH]);
    let app = common::build_test_app(pool, as_generator(&generator));

    let response =
        post_json_auth(app, "/api/v1/tickets", draft(), &token_for("u2", Role::User)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(generator.call_count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn intake_requires_a_token(pool: PgPool) {
    let app = common::build_test_app(pool, None);

    let response = common::post_json(app, "/api/v1/tickets", draft()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn listing_all_tickets_requires_staff(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    seed_user(&pool, "mod1", Role::Moderator).await;
    file_ticket(&pool).await;

    let app = common::build_test_app(pool.clone(), None);
    let response = get_auth(app, "/api/v1/tickets", &token_for("u1", Role::User)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool, None);
    let response = get_auth(
        app,
        "/api/v1/tickets?priority=high&status=to-do",
        &token_for("mod1", Role::Moderator),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filter_excludes_other_priorities(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    seed_user(&pool, "mod1", Role::Moderator).await;
    file_ticket(&pool).await;

    let app = common::build_test_app(pool, None);
    let response = get_auth(
        app,
        "/api/v1/tickets?priority=low",
        &token_for("mod1", Role::Moderator),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn requester_listing_is_self_or_staff(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    seed_user(&pool, "u2", Role::User).await;
    let created = file_ticket(&pool).await;

    let app = common::build_test_app(pool.clone(), None);
    let response = get_auth(
        app,
        "/api/v1/tickets/requester/u1",
        &token_for("u1", Role::User),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0], created);

    let app = common::build_test_app(pool, None);
    let response = get_auth(
        app,
        "/api/v1/tickets/requester/u1",
        &token_for("u2", Role::User),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_ticket_is_owner_or_staff(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    seed_user(&pool, "u2", Role::User).await;
    let id = file_ticket(&pool).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tickets/{id}");

    let app = common::build_test_app(pool.clone(), None);
    let response = get_auth(app, &uri, &token_for("u1", Role::User)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone(), None);
    let response = get_auth(app, &uri, &token_for("u2", Role::User)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool, None);
    let response = get_auth(app, "/api/v1/tickets/999999", &token_for("u1", Role::User)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_can_assign_and_unassign(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    seed_user(&pool, "mod1", Role::Moderator).await;
    let id = file_ticket(&pool).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tickets/{id}/assign");
    let token = token_for("mod1", Role::Moderator);

    let app = common::build_test_app(pool.clone(), None);
    let response = put_json_auth(app, &uri, json!({ "assignee_id": "mod1" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["assigned_to"], "mod1");

    let app = common::build_test_app(pool.clone(), None);
    let response = put_json_auth(app, &uri, json!({ "assignee_id": "ghost" }), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool, None);
    let response = put_json_auth(app, &uri, json!({ "assignee_id": null }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["assigned_to"],
        serde_json::Value::Null
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_cannot_assign(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    let id = file_ticket(&pool).await["id"].as_i64().unwrap();

    let app = common::build_test_app(pool, None);
    let response = put_json_auth(
        app,
        &format!("/api/v1/tickets/{id}/assign"),
        json!({ "assignee_id": "u1" }),
        &token_for("u1", Role::User),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_transitions_are_validated(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    seed_user(&pool, "mod1", Role::Moderator).await;
    let id = file_ticket(&pool).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tickets/{id}/status");
    let token = token_for("mod1", Role::Moderator);

    let app = common::build_test_app(pool.clone(), None);
    let response = put_json_auth(app, &uri, json!({ "status": "done" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "done");

    let app = common::build_test_app(pool.clone(), None);
    let response = put_json_auth(app, &uri, json!({ "status": "in-progress" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool, None);
    let response = put_json_auth(app, &uri, json!({ "status": "to-do" }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_admin_can_delete(pool: PgPool) {
    seed_user(&pool, "u1", Role::User).await;
    seed_user(&pool, "mod1", Role::Moderator).await;
    seed_user(&pool, "admin1", Role::Admin).await;
    let id = file_ticket(&pool).await["id"].as_i64().unwrap();
    let uri = format!("/api/v1/tickets/{id}");

    let app = common::build_test_app(pool.clone(), None);
    let response = delete_auth(app, &uri, &token_for("mod1", Role::Moderator)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone(), None);
    let response = delete_auth(app, &uri, &token_for("admin1", Role::Admin)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool, None);
    let response = delete_auth(app, &uri, &token_for("admin1", Role::Admin)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
