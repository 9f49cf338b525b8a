//! Room CRUD and occupancy statistics endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{
    validate_capacity, validate_description, validate_floor, validate_price, validate_room_number,
    validate_uuid,
};
use crate::db::{Room, RoomRequest, RoomStatistics, RoomStatus};
use crate::AppState;

/// List all rooms response
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub rooms: Vec<Room>,
}

/// Single room response
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomResponse {
    pub room: Room,
}

/// Validate a RoomRequest
fn validate_room_request(req: &RoomRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_room_number(&req.room_number) {
        errors.add("room_number", e);
    }
    if let Err(e) = validate_capacity(&req.capacity) {
        errors.add("capacity", e);
    }
    if let Err(e) = validate_price(&req.price) {
        errors.add("price", e);
    }
    if let Err(e) = validate_floor(&req.floor) {
        errors.add("floor", e);
    }
    if let Err(e) = validate_description(&req.description) {
        errors.add("description", e);
    }

    errors.finish()
}

/// List all rooms
///
/// GET /api/rooms
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RoomListResponse>, ApiError> {
    let rooms = sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY room_number")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(RoomListResponse { rooms }))
}

/// Add a new room
///
/// POST /api/add-room
pub async fn add_room(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), ApiError> {
    validate_room_request(&req)?;

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO rooms (id, room_number, status, capacity, price, floor, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.room_number)
    .bind(req.status)
    .bind(req.capacity)
    .bind(req.price)
    .bind(&req.floor)
    .bind(&req.description)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::validation_field("room_number", "A room with this number already exists")
        } else {
            tracing::error!("Failed to create room: {}", e);
            ApiError::database("Failed to create room")
        }
    })?;

    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    info!(room_number = %room.room_number, "Room added");

    Ok((StatusCode::CREATED, Json(RoomResponse { room })))
}

/// Retrieve a room by id for editing
///
/// GET /api/rooms/:id/edit
pub async fn edit_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RoomResponse>, ApiError> {
    if let Err(e) = validate_uuid(&id, "room_id") {
        return Err(ApiError::validation_field("room_id", e));
    }

    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;

    Ok(Json(RoomResponse { room }))
}

/// Update a room, replacing its mutable fields
///
/// PUT /api/rooms/:id
pub async fn update_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<RoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    if let Err(e) = validate_uuid(&id, "room_id") {
        return Err(ApiError::validation_field("room_id", e));
    }

    validate_room_request(&req)?;

    // Check the room exists
    let _existing = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;

    let now = chrono::Utc::now().to_rfc3339();

    // Full replace; absent optional fields clear the stored value
    sqlx::query(
        r#"
        UPDATE rooms SET
            room_number = ?,
            status = ?,
            capacity = ?,
            price = ?,
            floor = ?,
            description = ?,
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.room_number)
    .bind(req.status)
    .bind(req.capacity)
    .bind(req.price)
    .bind(&req.floor)
    .bind(&req.description)
    .bind(&now)
    .bind(&id)
    .execute(&state.db)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::validation_field("room_number", "A room with this number already exists")
        } else {
            tracing::error!("Failed to update room: {}", e);
            ApiError::database("Failed to update room")
        }
    })?;

    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    info!(room_number = %room.room_number, "Room updated");

    Ok(Json(RoomResponse { room }))
}

/// Delete a room
///
/// DELETE /api/rooms/:id
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if let Err(e) = validate_uuid(&id, "room_id") {
        return Err(ApiError::validation_field("room_id", e));
    }

    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Room not found"))?;

    let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Room not found"));
    }

    info!(room_number = %room.room_number, "Room deleted");

    Ok(StatusCode::OK)
}

/// Room occupancy statistics
///
/// GET /api/room-statistics
pub async fn room_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RoomStatistics>, ApiError> {
    // One grouped query; the three counts come from the same read
    let rows: Vec<(RoomStatus, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM rooms GROUP BY status")
            .fetch_all(&state.db)
            .await?;

    let mut stats = RoomStatistics::default();
    for (status, count) in rows {
        match status {
            RoomStatus::Occupied => stats.occupied = count,
            RoomStatus::Vacant => stats.vacant = count,
            RoomStatus::Maintenance => stats.maintenance = count,
        }
    }

    Ok(Json(stats))
}
