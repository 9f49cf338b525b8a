pub mod auth;
pub mod error;
pub mod rooms;
mod validation;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Protected API routes
    let protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        // Rooms
        .route("/rooms", get(rooms::list_rooms))
        .route("/add-room", post(rooms::add_room))
        .route("/rooms/:id/edit", get(rooms::edit_room))
        .route("/rooms/:id", put(rooms::update_room))
        .route("/rooms/:id", delete(rooms::delete_room))
        // Statistics
        .route("/room-statistics", get(rooms::room_statistics))
        // Protected by auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let db = crate::db::init_in_memory().await.expect("in-memory db");
        let state = Arc::new(AppState::new(Config::default(), db));
        create_router(state)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        let response = app.clone().oneshot(request).await.expect("request succeeds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, payload)
    }

    async fn register_user(app: &Router, email: &str) -> (StatusCode, Value) {
        send(
            app,
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "Ama Mensah",
                "phone_number": "0241234567",
                "email": email,
                "password": "hunter2hunter2",
            })),
        )
        .await
    }

    async fn login_token(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/login",
            None,
            Some(json!({"email": email, "password": "hunter2hunter2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("token in response").to_string()
    }

    async fn auth_token(app: &Router) -> String {
        let (status, _) = register_user(app, "manager@example.com").await;
        assert_eq!(status, StatusCode::CREATED);
        login_token(app, "manager@example.com").await
    }

    async fn add_room(app: &Router, token: &str, room_number: &str, status: &str) -> Value {
        let (code, body) = send(
            app,
            "POST",
            "/api/add-room",
            Some(token),
            Some(json!({"room_number": room_number, "status": status})),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);
        body["room"].clone()
    }

    async fn list_rooms(app: &Router, token: &str) -> Vec<Value> {
        let (status, body) = send(app, "GET", "/api/rooms", Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        body["rooms"].as_array().expect("rooms array").clone()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app().await;
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_then_login_returns_token() {
        let app = test_app().await;

        let (status, body) = register_user(&app, "owner@example.com").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["email"], "owner@example.com");
        assert!(body.get("password_hash").is_none());

        let token = login_token(&app, "owner@example.com").await;
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_fields() {
        let app = test_app().await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/register",
            None,
            Some(json!({
                "name": "",
                "phone_number": "phone",
                "email": "not-an-email",
                "password": "short",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation_error");
        let details = body["error"]["details"].as_object().expect("field details");
        for field in ["name", "phone_number", "email", "password"] {
            assert!(details.contains_key(field), "missing detail for {}", field);
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_validation_error() {
        let app = test_app().await;

        let (status, _) = register_user(&app, "dup@example.com").await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = register_user(&app, "dup@example.com").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let app = test_app().await;
        register_user(&app, "owner@example.com").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/login",
            None,
            Some(json!({"email": "owner@example.com", "password": "wrong-password"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn test_login_with_unknown_email_is_unauthorized() {
        let app = test_app().await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "hunter2hunter2"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_routes_require_bearer_token() {
        let app = test_app().await;

        let (status, body) = send(&app, "GET", "/api/rooms", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");

        let (status, _) = send(&app, "GET", "/api/rooms", Some("bogus-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "GET", "/api/room-statistics", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_invalidates_token() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let (status, _) = send(&app, "GET", "/api/rooms", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "POST", "/api/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", "/api/rooms", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_add_room_appears_once_in_listing() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let room = add_room(&app, &token, "101", "vacant").await;
        assert_eq!(room["room_number"], "101");
        assert_eq!(room["status"], "vacant");

        let rooms = list_rooms(&app, &token).await;
        let matching: Vec<_> = rooms
            .iter()
            .filter(|r| r["room_number"] == "101")
            .collect();
        assert_eq!(matching.len(), 1);
    }

    #[tokio::test]
    async fn test_add_room_with_all_fields() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/add-room",
            Some(&token),
            Some(json!({
                "room_number": "A-12",
                "status": "occupied",
                "capacity": 2,
                "price": 450.5,
                "floor": "1st",
                "description": "Corner room",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["room"]["capacity"], 2);
        assert_eq!(body["room"]["price"], 450.5);
        assert_eq!(body["room"]["floor"], "1st");
    }

    #[tokio::test]
    async fn test_duplicate_room_number_is_rejected_and_count_unchanged() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        add_room(&app, &token, "101", "vacant").await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/add-room",
            Some(&token),
            Some(json!({"room_number": "101", "status": "occupied"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "validation_error");
        assert!(body["error"]["details"]["room_number"].is_array());

        assert_eq!(list_rooms(&app, &token).await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_room_rejects_invalid_status() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/add-room",
            Some(&token),
            Some(json!({"room_number": "101", "status": "reserved"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_add_room_rejects_bad_capacity_and_price() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/add-room",
            Some(&token),
            Some(json!({
                "room_number": "101",
                "status": "vacant",
                "capacity": 0,
                "price": -5.0,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let details = body["error"]["details"].as_object().expect("field details");
        assert!(details.contains_key("capacity"));
        assert!(details.contains_key("price"));
    }

    #[tokio::test]
    async fn test_edit_room_returns_room() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let room = add_room(&app, &token, "305", "maintenance").await;
        let id = room["id"].as_str().unwrap();

        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/rooms/{}/edit", id),
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["room"]["id"], *id);
        assert_eq!(body["room"]["room_number"], "305");
    }

    #[tokio::test]
    async fn test_edit_unknown_room_returns_404() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let missing = uuid::Uuid::new_v4().to_string();
        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/rooms/{}/edit", missing),
            Some(&token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_id() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let room = add_room(&app, &token, "101", "vacant").await;
        let id = room["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/rooms/{}", id),
            Some(&token),
            Some(json!({
                "room_number": "101",
                "status": "occupied",
                "capacity": 3,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["room"]["id"], id);
        assert_eq!(body["room"]["status"], "occupied");
        assert_eq!(body["room"]["capacity"], 3);
        // Absent optional fields are cleared on full replace
        assert!(body["room"]["price"].is_null());
    }

    #[tokio::test]
    async fn test_update_keeps_room_number_unique_except_self() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let room = add_room(&app, &token, "101", "vacant").await;
        add_room(&app, &token, "102", "vacant").await;
        let id = room["id"].as_str().unwrap().to_string();

        // Re-submitting its own number is not a conflict
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/rooms/{}", id),
            Some(&token),
            Some(json!({"room_number": "101", "status": "occupied"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Taking another room's number is
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/rooms/{}", id),
            Some(&token),
            Some(json!({"room_number": "102", "status": "occupied"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_unknown_room_returns_404() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let missing = uuid::Uuid::new_v4().to_string();
        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/rooms/{}", missing),
            Some(&token),
            Some(json!({"room_number": "900", "status": "vacant"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_second_delete_returns_404() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let room = add_room(&app, &token, "101", "vacant").await;
        let id = room["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/rooms/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(list_rooms(&app, &token).await.is_empty());

        let (status, body) = send(
            &app,
            "DELETE",
            &format!("/api/rooms/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn test_statistics_zero_filled_when_no_rooms() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        let (status, body) = send(&app, "GET", "/api/room-statistics", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["occupied"], 0);
        assert_eq!(body["vacant"], 0);
        assert_eq!(body["maintenance"], 0);
    }

    #[tokio::test]
    async fn test_statistics_sum_matches_room_count() {
        let app = test_app().await;
        let token = auth_token(&app).await;

        add_room(&app, &token, "101", "occupied").await;
        add_room(&app, &token, "102", "occupied").await;
        add_room(&app, &token, "103", "occupied").await;
        add_room(&app, &token, "104", "vacant").await;

        let (status, body) = send(&app, "GET", "/api/room-statistics", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["occupied"], 3);
        assert_eq!(body["vacant"], 1);
        assert_eq!(body["maintenance"], 0);

        let total = body["occupied"].as_i64().unwrap()
            + body["vacant"].as_i64().unwrap()
            + body["maintenance"].as_i64().unwrap();
        assert_eq!(total as usize, list_rooms(&app, &token).await.len());
    }
}
