//! HTTP client for the lodgr API.
//!
//! Wraps every REST endpoint in a typed method. The session token is
//! explicit constructor input; there is no ambient token state.

mod token_store;

pub use token_store::TokenStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::api::error::ErrorResponse;
use crate::api::rooms::{RoomListResponse, RoomResponse};
use crate::db::{
    LoginRequest, LoginResponse, RegisterRequest, Room, RoomRequest, RoomStatistics, UserResponse,
};

/// Error returned by API client calls, classified by response status.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Map a non-success response status to an error variant.
fn classify(status: u16, message: String) -> ClientError {
    match status {
        401 => ClientError::Auth(message),
        400 | 422 => ClientError::Validation(message),
        404 => ClientError::NotFound(message),
        _ => ClientError::Server { status, message },
    }
}

/// Pull the human-readable message out of an error response body.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return parsed.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

/// Client for a running lodgr server.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a new client. `token` is required for everything except
    /// `register` and `login`.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.apply_auth(req).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status.as_u16(), error_message(status.as_u16(), &body)));
        }

        Ok(response.json().await?)
    }

    /// Like `execute`, for endpoints whose success response carries no body
    /// the caller needs.
    async fn execute_empty(&self, req: reqwest::RequestBuilder) -> Result<(), ClientError> {
        let response = self.apply_auth(req).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify(status.as_u16(), error_message(status.as_u16(), &body)));
        }

        Ok(())
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.execute(self.client.post(self.url(path)).json(body))
            .await
    }

    /// Register a new account
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserResponse, ClientError> {
        self.post_json("/api/register", request).await
    }

    /// Log in and obtain a session token
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        self.post_json(
            "/api/login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await
    }

    /// Invalidate the current session token server-side
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.execute_empty(self.client.post(self.url("/api/logout")))
            .await
    }

    /// List all rooms
    pub async fn list_rooms(&self) -> Result<Vec<Room>, ClientError> {
        let response: RoomListResponse = self.execute(self.client.get(self.url("/api/rooms"))).await?;
        Ok(response.rooms)
    }

    /// Fetch a single room by id
    pub async fn get_room(&self, id: &str) -> Result<Room, ClientError> {
        let response: RoomResponse = self
            .execute(self.client.get(self.url(&format!("/api/rooms/{}/edit", id))))
            .await?;
        Ok(response.room)
    }

    /// Create a new room
    pub async fn add_room(&self, request: &RoomRequest) -> Result<Room, ClientError> {
        let response: RoomResponse = self.post_json("/api/add-room", request).await?;
        Ok(response.room)
    }

    /// Replace a room's fields
    pub async fn update_room(&self, id: &str, request: &RoomRequest) -> Result<Room, ClientError> {
        let response: RoomResponse = self
            .execute(
                self.client
                    .put(self.url(&format!("/api/rooms/{}", id)))
                    .json(request),
            )
            .await?;
        Ok(response.room)
    }

    /// Delete a room by id
    pub async fn delete_room(&self, id: &str) -> Result<(), ClientError> {
        self.execute_empty(self.client.delete(self.url(&format!("/api/rooms/{}", id))))
            .await
    }

    /// Fetch room occupancy statistics
    pub async fn room_statistics(&self) -> Result<RoomStatistics, ClientError> {
        self.execute(self.client.get(self.url("/api/room-statistics")))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_statuses() {
        assert!(matches!(classify(401, "m".into()), ClientError::Auth(_)));
        assert!(matches!(
            classify(422, "m".into()),
            ClientError::Validation(_)
        ));
        assert!(matches!(
            classify(400, "m".into()),
            ClientError::Validation(_)
        ));
        assert!(matches!(classify(404, "m".into()), ClientError::NotFound(_)));
        assert!(matches!(
            classify(500, "m".into()),
            ClientError::Server { status: 500, .. }
        ));
    }

    #[test]
    fn test_error_message_parses_envelope() {
        let body = r#"{"error":{"code":"not_found","message":"Room not found"}}"#;
        assert_eq!(error_message(404, body), "Room not found");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message(502, "Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(502, "  "), "HTTP 502");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8000/", None);
        assert_eq!(client.url("/api/rooms"), "http://localhost:8000/api/rooms");
    }
}
