//! Logistics status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a shipment.
///
/// The usual progression is Preparing → Shipping → Arrived → Complete,
/// but no adjacency rule is enforced: any status may be set to any other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "logistics_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LogisticsStatus {
    /// Goods are being prepared for loading.
    #[default]
    Preparing,
    /// Goods are in transit.
    Shipping,
    /// Goods reached the destination port/airport.
    Arrived,
    /// The shipment is closed.
    Complete,
}

impl LogisticsStatus {
    /// All statuses in their usual order.
    pub const ALL: [LogisticsStatus; 4] = [
        Self::Preparing,
        Self::Shipping,
        Self::Arrived,
        Self::Complete,
    ];

    /// Return the status as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Shipping => "shipping",
            Self::Arrived => "arrived",
            Self::Complete => "complete",
        }
    }

    /// Return the human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Shipping => "Shipping",
            Self::Arrived => "Arrived",
            Self::Complete => "Complete",
        }
    }
}

impl fmt::Display for LogisticsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LogisticsStatus {
    type Err = cargotrack_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preparing" => Ok(Self::Preparing),
            "shipping" => Ok(Self::Shipping),
            "arrived" => Ok(Self::Arrived),
            "complete" => Ok(Self::Complete),
            _ => Err(cargotrack_core::AppError::validation(format!(
                "Invalid logistics status: '{s}'. Expected one of: preparing, shipping, arrived, complete"
            ))),
        }
    }
}
