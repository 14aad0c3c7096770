//! Shipment classification enums: transport mode, packaging, and Incoterms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use cargotrack_core::AppError;

/// Transport mode of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shipment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShipmentType {
    /// Air freight.
    AirFreight,
    /// Sea freight.
    SeaFreight,
    /// Rail freight.
    RailFreight,
    /// Postal service.
    Post,
}

impl ShipmentType {
    /// Return the type as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AirFreight => "air_freight",
            Self::SeaFreight => "sea_freight",
            Self::RailFreight => "rail_freight",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for ShipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShipmentType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "air_freight" => Ok(Self::AirFreight),
            "sea_freight" => Ok(Self::SeaFreight),
            "rail_freight" => Ok(Self::RailFreight),
            "post" => Ok(Self::Post),
            _ => Err(AppError::validation(format!(
                "Invalid shipment type: '{s}'. Expected one of: air_freight, sea_freight, rail_freight, post"
            ))),
        }
    }
}

/// How the goods are packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "packaging_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PackagingType {
    /// Palletised goods.
    Pallet,
    /// Goods in cartons.
    Cartons,
    /// Loose pieces.
    Pieces,
}

impl PackagingType {
    /// Return the packaging as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pallet => "pallet",
            Self::Cartons => "cartons",
            Self::Pieces => "pieces",
        }
    }
}

impl fmt::Display for PackagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Incoterms agreed for the shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "freight_terms", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FreightTerms {
    /// Ex Works.
    Exw,
    /// Free On Board.
    Fob,
    /// Cost, Insurance and Freight.
    Cif,
    /// Cost and Freight.
    Cfr,
    /// Delivered At Place.
    Dap,
}

impl FreightTerms {
    /// Return the terms as their stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exw => "exw",
            Self::Fob => "fob",
            Self::Cif => "cif",
            Self::Cfr => "cfr",
            Self::Dap => "dap",
        }
    }
}

impl fmt::Display for FreightTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}
