//! Room records and derived occupancy statistics.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Occupancy state of a room. The three states are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RoomStatus {
    Occupied,
    Vacant,
    Maintenance,
}

impl Default for RoomStatus {
    fn default() -> Self {
        Self::Vacant
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Occupied => write!(f, "occupied"),
            Self::Vacant => write!(f, "vacant"),
            Self::Maintenance => write!(f, "maintenance"),
        }
    }
}

impl std::str::FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "occupied" => Ok(Self::Occupied),
            "vacant" => Ok(Self::Vacant),
            "maintenance" => Ok(Self::Maintenance),
            _ => Err(format!("Unknown room status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub status: RoomStatus,
    pub capacity: Option<i64>,
    pub price: Option<f64>,
    pub floor: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Payload for creating a room or fully replacing its mutable fields.
/// The id is server-assigned and never part of the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomRequest {
    pub room_number: String,
    pub status: RoomStatus,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Count of rooms per status, computed fresh per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStatistics {
    pub occupied: i64,
    pub vacant: i64,
    pub maintenance: i64,
}

impl RoomStatistics {
    pub fn total(&self) -> i64 {
        self.occupied + self.vacant + self.maintenance
    }

    /// Share of `count` against the total, rounded to a whole percent.
    /// An empty table yields 0% for every category.
    pub fn percentage(&self, count: i64) -> u8 {
        let total = self.total();
        if total == 0 {
            return 0;
        }
        ((count as f64 / total as f64) * 100.0).round() as u8
    }
}
